//! URL and file naming scheme for the remote archive.

use super::error::DownloadError;

/// Placeholder replaced by the remote identifier in URL templates.
pub const ID_PLACEHOLDER: &str = "{id}";

/// Default template: Project Gutenberg plain-text cache.
pub const DEFAULT_URL_TEMPLATE: &str = "https://www.gutenberg.org/cache/epub/{id}/pg{id}.txt";

/// Where items live remotely and how they are named locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSource {
    url_template: String,
}

impl Default for RemoteSource {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
        }
    }
}

impl RemoteSource {
    /// Creates a source from a URL template containing `{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::InvalidUrl`] if the template has no `{id}`
    /// placeholder.
    pub fn new(url_template: impl Into<String>) -> Result<Self, DownloadError> {
        let url_template = url_template.into();
        if !url_template.contains(ID_PLACEHOLDER) {
            return Err(DownloadError::invalid_url(url_template));
        }
        Ok(Self { url_template })
    }

    /// Renders the URL for one item.
    #[must_use]
    pub fn url_for(&self, remote_id: u64) -> String {
        self.url_template
            .replace(ID_PLACEHOLDER, &remote_id.to_string())
    }

    /// Local file name for one item: `pg{remote_id}.txt`.
    #[must_use]
    pub fn file_name(remote_id: u64) -> String {
        format!("pg{remote_id}.txt")
    }
}
