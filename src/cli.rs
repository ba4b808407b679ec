//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use corpus_fetcher_core::DEFAULT_MAX_RETRIES;
use corpus_fetcher_core::catalog::Genre;

/// Default directory for fetched texts and `metadata.json`.
pub const DEFAULT_OUTPUT_DIR: &str = "data/raw";

/// Default courtesy delay between items, in seconds.
pub const DEFAULT_DELAY_SECS: f64 = 1.0;

/// Default per-attempt request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Largest accepted courtesy delay, in seconds.
pub const MAX_DELAY_SECS: f64 = 3600.0;

/// Fetch a curated public-domain text corpus.
///
/// Downloads the catalog's texts one at a time with retries and a courtesy
/// delay, skips files already present, and records one outcome per item in
/// `metadata.json`.
#[derive(Parser, Debug, Clone)]
#[command(name = "corpus-fetcher")]
#[command(author, version, about)]
pub struct Args {
    /// Output directory for texts and metadata.json
    #[arg(short = 'o', long = "output", value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Fetch at most N items (after genre filtering)
    #[arg(short = 'n', long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_items: Option<u32>,

    /// Only fetch items of this genre (repeatable: general_literature, thriller_mystery, fantasy_sci_fi)
    #[arg(short = 'g', long = "genre", value_name = "GENRE")]
    pub genres: Vec<Genre>,

    /// Seconds to wait between items (0 to disable, max 3600)
    #[arg(short = 'd', long, value_name = "SECS", default_value_t = DEFAULT_DELAY_SECS, value_parser = parse_delay_secs)]
    pub delay: f64,

    /// Maximum attempts per item for transient failures (1-10)
    #[arg(short = 'r', long, default_value_t = DEFAULT_MAX_RETRIES as u8, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub max_retries: u8,

    /// Per-attempt request timeout in seconds (1-3600)
    #[arg(long = "timeout", value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout_secs: u64,

    /// Source URL template; `{id}` is replaced by the item identifier
    #[arg(long, value_name = "TEMPLATE")]
    pub url_template: Option<String>,

    /// Use this catalog TOML file instead of the built-in curated catalog
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Read configuration from this TOML file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// List the catalog with its genres and exit without fetching
    #[arg(long)]
    pub list: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Parses and range-checks a delay in seconds.
pub fn parse_delay_secs(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if !value.is_finite() || !(0.0..=MAX_DELAY_SECS).contains(&value) {
        return Err(format!("{value} is out of range (0-{MAX_DELAY_SECS})"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_args_parses_successfully() {
        let args = Args::try_parse_from(["corpus-fetcher"]).unwrap();
        assert_eq!(args.output_dir, PathBuf::from("data/raw"));
        assert_eq!(args.max_items, None);
        assert!(args.genres.is_empty());
        assert!((args.delay - 1.0).abs() < f64::EPSILON);
        assert_eq!(args.max_retries, 3); // DEFAULT_MAX_RETRIES
        assert_eq!(args.timeout_secs, 30);
        assert!(!args.list);
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["corpus-fetcher", "-v"]).unwrap();
        assert_eq!(args.verbose, 1);

        let args = Args::try_parse_from(["corpus-fetcher", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_conflicts_with_verbose() {
        let result = Args::try_parse_from(["corpus-fetcher", "-q", "-v"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::ArgumentConflict
        );
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let result = Args::try_parse_from(["corpus-fetcher", "--help"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::DisplayHelp
        );
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let result = Args::try_parse_from(["corpus-fetcher", "--version"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::DisplayVersion
        );
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let result = Args::try_parse_from(["corpus-fetcher", "--invalid-flag"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::UnknownArgument
        );
    }

    // ==================== Selection Tests ====================

    #[test]
    fn test_cli_genre_repeatable() {
        let args = Args::try_parse_from([
            "corpus-fetcher",
            "-g",
            "thriller_mystery",
            "--genre",
            "fantasy-sci-fi",
        ])
        .unwrap();
        assert_eq!(
            args.genres,
            vec![Genre::ThrillerMystery, Genre::FantasySciFi]
        );
    }

    #[test]
    fn test_cli_genre_accepts_legacy_label() {
        let args = Args::try_parse_from(["corpus-fetcher", "-g", "fantasy_sf"]).unwrap();
        assert_eq!(args.genres, vec![Genre::FantasySciFi]);
    }

    #[test]
    fn test_cli_unknown_genre_rejected() {
        let result = Args::try_parse_from(["corpus-fetcher", "-g", "poetry"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::ValueValidation
        );
    }

    #[test]
    fn test_cli_max_items_zero_rejected() {
        let result = Args::try_parse_from(["corpus-fetcher", "-n", "0"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::ValueValidation
        );
    }

    #[test]
    fn test_cli_max_items_long_flag() {
        let args = Args::try_parse_from(["corpus-fetcher", "--max-items", "5"]).unwrap();
        assert_eq!(args.max_items, Some(5));
    }

    // ==================== Delay / Retry / Timeout Tests ====================

    #[test]
    fn test_cli_delay_fractional_and_zero() {
        let args = Args::try_parse_from(["corpus-fetcher", "-d", "0.25"]).unwrap();
        assert!((args.delay - 0.25).abs() < f64::EPSILON);

        let args = Args::try_parse_from(["corpus-fetcher", "--delay", "0"]).unwrap();
        assert!(args.delay.abs() < f64::EPSILON);
    }

    #[test]
    fn test_cli_delay_negative_or_nan_rejected() {
        for bad in ["-1", "NaN", "inf", "3601", "soon"] {
            let result = Args::try_parse_from(["corpus-fetcher", "--delay", bad]);
            assert!(result.is_err(), "delay {bad} should be rejected");
        }
    }

    #[test]
    fn test_cli_max_retries_bounds() {
        let args = Args::try_parse_from(["corpus-fetcher", "-r", "10"]).unwrap();
        assert_eq!(args.max_retries, 10);

        for bad in ["0", "11"] {
            let result = Args::try_parse_from(["corpus-fetcher", "-r", bad]);
            assert_eq!(
                result.unwrap_err().kind(),
                clap::error::ErrorKind::ValueValidation,
                "retries {bad}"
            );
        }
    }

    #[test]
    fn test_cli_timeout_bounds() {
        let args = Args::try_parse_from(["corpus-fetcher", "--timeout", "5"]).unwrap();
        assert_eq!(args.timeout_secs, 5);

        let result = Args::try_parse_from(["corpus-fetcher", "--timeout", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_combined_flags() {
        let args = Args::try_parse_from([
            "corpus-fetcher",
            "-o",
            "/tmp/corpus",
            "-n",
            "2",
            "-g",
            "general_literature",
            "-d",
            "0.5",
            "-r",
            "4",
            "--url-template",
            "http://localhost:9/{id}.txt",
            "--list",
            "--no-progress",
        ])
        .unwrap();
        assert_eq!(args.output_dir, PathBuf::from("/tmp/corpus"));
        assert_eq!(args.max_items, Some(2));
        assert_eq!(args.genres, vec![Genre::GeneralLiterature]);
        assert_eq!(args.max_retries, 4);
        assert_eq!(
            args.url_template.as_deref(),
            Some("http://localhost:9/{id}.txt")
        );
        assert!(args.list);
        assert!(args.no_progress);
    }
}
