//! Configuration layering: built-in defaults, then an optional TOML file,
//! then CLI flags given explicitly on the command line.

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{ArgMatches, CommandFactory, FromArgMatches, parser::ValueSource};
use serde::Deserialize;

use corpus_fetcher_core::batch::Selection;
use corpus_fetcher_core::download::constants::CONNECT_TIMEOUT_SECS;
use corpus_fetcher_core::download::{DEFAULT_URL_TEMPLATE, ID_PLACEHOLDER};
use corpus_fetcher_core::user_agent;

use crate::cli::{Args, MAX_DELAY_SECS};

/// TOML-backed file configuration. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    /// Default output directory.
    pub(crate) output_dir: Option<PathBuf>,
    /// Default courtesy delay in seconds.
    pub(crate) delay_secs: Option<f64>,
    /// Default maximum attempts per item.
    pub(crate) max_retries: Option<u32>,
    /// Per-attempt request timeout in seconds.
    pub(crate) request_timeout_secs: Option<u64>,
    /// Connect timeout in seconds.
    pub(crate) connect_timeout_secs: Option<u64>,
    /// Source URL template containing `{id}`.
    pub(crate) url_template: Option<String>,
    /// User-Agent override.
    pub(crate) user_agent: Option<String>,
    /// Catalog file replacing the curated catalog. Relative paths are
    /// resolved against the config file's directory.
    pub(crate) catalog_path: Option<PathBuf>,
}

impl FileConfig {
    /// Validates config values against runtime and CLI constraints.
    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(max_retries) = self.max_retries
            && !(1..=10).contains(&max_retries)
        {
            bail!("Invalid config value for `max_retries`: {max_retries}. Expected range: 1..=10");
        }

        if let Some(delay) = self.delay_secs
            && (!delay.is_finite() || !(0.0..=MAX_DELAY_SECS).contains(&delay))
        {
            bail!("Invalid config value for `delay_secs`: {delay}. Expected range: 0..=3600");
        }

        validate_timeout_secs("request_timeout_secs", self.request_timeout_secs)?;
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;

        if let Some(template) = &self.url_template {
            validate_url_template(template)
                .context("Invalid config value for `url_template`")?;
        }

        if let Some(user_agent) = &self.user_agent
            && user_agent.trim().is_empty()
        {
            bail!("Invalid config value for `user_agent`: must not be empty");
        }

        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

fn validate_url_template(template: &str) -> Result<()> {
    if !template.contains(ID_PLACEHOLDER) {
        bail!("URL template '{template}' must contain the {ID_PLACEHOLDER} placeholder");
    }
    Ok(())
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/corpus-fetcher/config.toml`
/// 2. `$HOME/.config/corpus-fetcher/config.toml`
#[must_use]
pub(crate) fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("corpus-fetcher")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("corpus-fetcher")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads the explicit config file, or the default one if it exists.
///
/// An explicit `--config` path that does not exist is an error; a missing
/// default file is not.
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<Option<FileConfig>> {
    if let Some(path) = explicit {
        return load_file_config(path).map(Some);
    }

    match resolve_default_config_path() {
        Some(path) if path.exists() => load_file_config(&path).map(Some),
        _ => Ok(None),
    }
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    let mut config = parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;

    if let (Some(catalog_path), Some(base)) = (&config.catalog_path, path.parent())
        && catalog_path.is_relative()
    {
        config.catalog_path = Some(base.join(catalog_path));
    }
    Ok(config)
}

pub(crate) fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let config: FileConfig = toml::from_str(raw)?;
    config.validate()?;
    Ok(config)
}

/// Which flags were given explicitly on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CliValueSources {
    pub(crate) output_dir: bool,
    pub(crate) delay: bool,
    pub(crate) max_retries: bool,
    pub(crate) timeout_secs: bool,
}

pub(crate) fn parse_cli_with_sources() -> (Args, CliValueSources) {
    let matches = Args::command().get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());
    let sources = sources_from_matches(&matches);
    (args, sources)
}

fn sources_from_matches(matches: &ArgMatches) -> CliValueSources {
    CliValueSources {
        output_dir: is_commandline_value(matches, "output_dir"),
        delay: is_commandline_value(matches, "delay"),
        max_retries: is_commandline_value(matches, "max_retries"),
        timeout_secs: is_commandline_value(matches, "timeout_secs"),
    }
}

fn is_commandline_value(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(ValueSource::CommandLine)
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) output_dir: PathBuf,
    pub(crate) selection: Selection,
    pub(crate) max_retries: u32,
    pub(crate) request_timeout: Duration,
    pub(crate) connect_timeout: Duration,
    pub(crate) url_template: String,
    pub(crate) user_agent: String,
    pub(crate) catalog_path: Option<PathBuf>,
}

/// Merges CLI arguments over file config over defaults.
pub(crate) fn resolve_settings(
    args: &Args,
    sources: &CliValueSources,
    file_config: Option<&FileConfig>,
) -> Result<Settings> {
    let file = file_config.cloned().unwrap_or_default();

    let output_dir = match (&file.output_dir, sources.output_dir) {
        (Some(dir), false) => dir.clone(),
        _ => args.output_dir.clone(),
    };

    let delay_secs = match file.delay_secs {
        Some(delay) if !sources.delay => delay,
        _ => args.delay,
    };

    let max_retries = match file.max_retries {
        Some(retries) if !sources.max_retries => retries,
        _ => u32::from(args.max_retries),
    };

    let request_timeout_secs = match file.request_timeout_secs {
        Some(secs) if !sources.timeout_secs => secs,
        _ => args.timeout_secs,
    };

    let url_template = args
        .url_template
        .clone()
        .or(file.url_template)
        .unwrap_or_else(|| DEFAULT_URL_TEMPLATE.to_string());
    validate_url_template(&url_template)?;

    let delay = Duration::try_from_secs_f64(delay_secs)
        .with_context(|| format!("Invalid delay: {delay_secs}"))?;

    let mut selection = Selection::default().with_delay(delay);
    if let Some(max_items) = args.max_items {
        selection = selection.with_max_items(usize::try_from(max_items)?);
    }
    if !args.genres.is_empty() {
        let genres: BTreeSet<_> = args.genres.iter().copied().collect();
        selection = selection.with_genres(genres);
    }

    Ok(Settings {
        output_dir,
        selection,
        max_retries,
        request_timeout: Duration::from_secs(request_timeout_secs),
        connect_timeout: Duration::from_secs(
            file.connect_timeout_secs.unwrap_or(CONNECT_TIMEOUT_SECS),
        ),
        url_template,
        user_agent: file
            .user_agent
            .unwrap_or_else(user_agent::default_fetch_user_agent),
        catalog_path: args.catalog.clone().or(file.catalog_path),
    })
}

/// Default log level from verbosity flags (`RUST_LOG` still wins).
pub(crate) fn resolve_default_log_level(args: &Args) -> &'static str {
    if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
