//! Genre tags and the prefix-based classifier for catalog keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse genre tag derived from a catalog key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    /// General literature (novels, tales, philosophy).
    #[serde(alias = "litterature_generale")]
    GeneralLiterature,
    /// Thrillers, mysteries, detective fiction.
    #[serde(alias = "thriller_policier")]
    ThrillerMystery,
    /// Fantasy, science fiction, the fantastic.
    #[serde(alias = "fantasy_sf")]
    FantasySciFi,
}

impl Genre {
    /// Every genre, in declaration order.
    pub const ALL: [Genre; 3] = [
        Genre::GeneralLiterature,
        Genre::ThrillerMystery,
        Genre::FantasySciFi,
    ];

    /// Returns the stable label used in reports and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GeneralLiterature => "general_literature",
            Self::ThrillerMystery => "thriller_mystery",
            Self::FantasySciFi => "fantasy_sci_fi",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a genre label is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown genre '{label}' (expected one of: general_literature, thriller_mystery, fantasy_sci_fi)")]
pub struct ParseGenreError {
    /// The label that failed to parse.
    pub label: String,
}

impl FromStr for Genre {
    type Err = ParseGenreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "general_literature" | "litterature_generale" => Ok(Self::GeneralLiterature),
            "thriller_mystery" | "thriller_policier" => Ok(Self::ThrillerMystery),
            "fantasy_sci_fi" | "fantasy_scifi" | "fantasy_sf" => Ok(Self::FantasySciFi),
            _ => Err(ParseGenreError {
                label: s.to_string(),
            }),
        }
    }
}

/// One `prefix -> genre` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenreRule {
    /// Key prefix the rule matches.
    pub prefix: String,
    /// Genre assigned when the prefix matches.
    pub genre: Genre,
}

impl GenreRule {
    /// Creates a rule.
    pub fn new(prefix: impl Into<String>, genre: Genre) -> Self {
        Self {
            prefix: prefix.into(),
            genre,
        }
    }
}

/// Ordered first-match classifier with an explicit fallback genre.
///
/// Rules are evaluated in the order given; the first rule whose prefix
/// starts the key wins. Keys matching no rule get the fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreClassifier {
    rules: Vec<GenreRule>,
    fallback: Genre,
}

impl Default for GenreClassifier {
    fn default() -> Self {
        Self::new(Vec::new(), Genre::GeneralLiterature)
    }
}

impl GenreClassifier {
    /// Creates a classifier from ordered rules and a fallback.
    #[must_use]
    pub fn new(rules: Vec<GenreRule>, fallback: Genre) -> Self {
        Self { rules, fallback }
    }

    /// Classifies a catalog key. Never fails.
    #[must_use]
    pub fn classify(&self, key: &str) -> Genre {
        self.rules
            .iter()
            .find(|rule| key.starts_with(rule.prefix.as_str()))
            .map_or(self.fallback, |rule| rule.genre)
    }

    /// Returns the rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[GenreRule] {
        &self.rules
    }
}
