//! Identifying User-Agent string for requests to the remote archive.
//!
//! The header names the tool, its version and a contact URL (RFC 9308).

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/corpus-fetcher";

/// Default User-Agent for item requests (identifies the tool and its purpose).
#[must_use]
pub fn default_fetch_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("corpus-fetcher/{version} (public-domain-corpus-builder; +{PROJECT_UA_URL})")
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_contains_version_and_project_url() {
        let ua = default_fetch_user_agent();
        assert!(ua.contains(PROJECT_UA_URL), "UA must contain project URL: {ua}");
        assert_eq!(
            env!("CARGO_PKG_VERSION"),
            ua.strip_prefix("corpus-fetcher/")
                .and_then(|s| s.split(' ').next())
                .expect("UA has version"),
            "UA must contain crate version"
        );
    }

    #[test]
    fn test_user_agent_states_purpose() {
        let ua = default_fetch_user_agent();
        assert!(
            ua.contains("public-domain-corpus-builder"),
            "UA must identify its purpose: {ua}"
        );
    }
}
