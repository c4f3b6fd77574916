// src/core/types.rs
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Character removed from raw transcriptions before they are stored.
pub const STRESS_MARK: char = 'ˑ';

/// Cost of each code point of a substring that is not a lexicon key.
/// Several orders of magnitude above any real word cost (which is at most 1.0),
/// yet small enough that known costs added on top stay representable.
pub const UNKNOWN_CHAR_COST: f64 = 1e6;

/// Locales with a bundled phonemic dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[serde(rename = "th_TH")]
    ThTh,
}

impl Locale {
    pub fn code(&self) -> &'static str {
        match self {
            Locale::ThTh => "th_TH",
        }
    }

    /// Whether a dataset exists for this locale written in `system`.
    pub fn supports(&self, system: PhonemicSystem) -> bool {
        matches!((self, system), (Locale::ThTh, PhonemicSystem::Paiboon))
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "th_TH" => Ok(Locale::ThTh),
            _ => Err(Error::UnsupportedLocale(s.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Transcription systems a dataset may be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhonemicSystem {
    #[serde(rename = "paiboon")]
    Paiboon,
}

impl PhonemicSystem {
    pub fn code(&self) -> &'static str {
        match self {
            PhonemicSystem::Paiboon => "paiboon",
        }
    }

    /// Parses `system` and checks that `locale` has a dataset for it.
    pub fn for_locale(locale: Locale, system: &str) -> Result<Self, Error> {
        let unsupported = || Error::UnsupportedSystem {
            locale: locale.code().to_string(),
            system: system.to_string(),
        };
        let parsed = match system {
            "paiboon" => PhonemicSystem::Paiboon,
            _ => return Err(unsupported()),
        };
        if locale.supports(parsed) {
            Ok(parsed)
        } else {
            Err(unsupported())
        }
    }
}

impl fmt::Display for PhonemicSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single known word with its cleaned transcription and unigram cost.
#[derive(Debug, Clone, PartialEq)]
pub struct LexiconEntry {
    pub word: String,
    pub transcription: String,
    /// `1 / code_point_len(word)`.
    pub cost: f64,
}

impl LexiconEntry {
    /// Builds an entry from a raw dataset row, stripping stress marks from the transcription.
    pub fn new(word: &str, raw_transcription: &str) -> Self {
        let transcription: String = raw_transcription
            .chars()
            .filter(|&c| c != STRESS_MARK)
            .collect();
        let len = word.chars().count().max(1);
        Self {
            word: word.to_string(),
            transcription,
            cost: 1.0 / len as f64,
        }
    }

    /// Overrides the unigram cost. Used to pin down tie-breaking with synthetic lexicons.
    #[cfg(test)]
    pub(crate) fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    pub fn width(&self) -> usize {
        self.word.chars().count()
    }
}

/// One unit of a recovered partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// The covered input with whitespace removed.
    pub text: String,
    /// Number of input code points consumed, whitespace included.
    pub width: usize,
}

impl Segment {
    pub fn new(raw: &str, width: usize) -> Self {
        Self {
            text: raw.chars().filter(|c| !c.is_whitespace()).collect(),
            width,
        }
    }
}

/// Best split found so far for a single end position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub cost: f64,
    pub width: usize,
}
