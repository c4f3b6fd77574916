// --- File: src/core/lexicon.rs
use crate::core::types::{Locale, LexiconEntry, PhonemicSystem, UNKNOWN_CHAR_COST};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Conventional location of the dataset for `(locale, system)` under `data_dir`.
pub fn dataset_path(data_dir: &Path, locale: Locale, system: PhonemicSystem) -> PathBuf {
    data_dir
        .join(locale.code())
        .join(format!("{}.data", system.code()))
}

/// Immutable table of known words, their transcriptions and unigram costs.
/// Built once through [`LexiconBuilder`] or [`Lexicon::load`] and only read afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lexicon {
    transcriptions: HashMap<String, String>,
    costs: HashMap<String, f64>,
    max_word_len: usize,
}

impl Lexicon {
    /// Validates the `(locale, system)` pair and loads its dataset from `data_dir`.
    pub fn load(locale: &str, system: &str, data_dir: &Path) -> Result<Self> {
        let locale: Locale = locale.parse()?;
        let system = PhonemicSystem::for_locale(locale, system)?;
        let path = dataset_path(data_dir, locale, system);

        let file = File::open(&path).map_err(|source| Error::DatasetRead {
            path: path.clone(),
            source,
        })?;
        let lexicon = Self::from_reader(BufReader::new(file), &path)?;
        tracing::info!(
            locale = %locale,
            system = %system,
            words = lexicon.len(),
            max_word_len = lexicon.max_word_len(),
            "loaded phonemic lexicon"
        );
        Ok(lexicon)
    }

    /// Parses `word<TAB>transcription` rows. `source` only labels errors.
    pub fn from_reader<R: BufRead>(reader: R, source: &Path) -> Result<Self> {
        let mut builder = LexiconBuilder::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| Error::DatasetRead {
                path: source.to_path_buf(),
                source: e,
            })?;
            let row = line.trim_end_matches('\r');
            if row.is_empty() {
                continue;
            }
            let malformed = |reason| Error::MalformedRow {
                path: source.to_path_buf(),
                line: idx + 1,
                reason,
            };
            let (word, transcription) = row
                .split_once('\t')
                .ok_or_else(|| malformed("missing transcription column"))?;
            if word.is_empty() {
                return Err(malformed("empty word"));
            }
            if word.chars().any(char::is_whitespace) {
                return Err(malformed("word contains whitespace"));
            }
            // Extra columns are tolerated; only the first two carry data.
            let transcription = transcription.split('\t').next().unwrap_or_default();
            builder.insert(LexiconEntry::new(word, transcription));
        }
        Ok(builder.build())
    }

    pub fn from_tsv_str(s: &str) -> Result<Self> {
        Self::from_reader(s.as_bytes(), Path::new("<memory>"))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.transcriptions.contains_key(word)
    }

    pub fn transcription(&self, word: &str) -> Option<&str> {
        self.transcriptions.get(word).map(String::as_str)
    }

    /// Unigram cost of `word`, or [`UNKNOWN_CHAR_COST`] per code point when it is not a key.
    pub fn word_cost(&self, word: &str) -> f64 {
        self.chunk_cost(word, word.chars().count())
    }

    /// Same as [`Lexicon::word_cost`] for a caller that already knows the width of `word`.
    pub(crate) fn chunk_cost(&self, word: &str, width: usize) -> f64 {
        match self.costs.get(word) {
            Some(&cost) => cost,
            None => UNKNOWN_CHAR_COST * width as f64,
        }
    }

    /// Longest key length in code points.
    pub fn max_word_len(&self) -> usize {
        self.max_word_len
    }

    pub fn len(&self) -> usize {
        self.transcriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcriptions.is_empty()
    }
}

/// Accumulates entries before freezing them into a [`Lexicon`].
#[derive(Debug, Default)]
pub struct LexiconBuilder {
    lexicon: Lexicon,
}

impl LexiconBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry; a repeated word replaces the earlier one.
    pub fn insert(&mut self, entry: LexiconEntry) -> &mut Self {
        let width = entry.width();
        if width > self.lexicon.max_word_len {
            self.lexicon.max_word_len = width;
        }
        self.lexicon.costs.insert(entry.word.clone(), entry.cost);
        self.lexicon.transcriptions.insert(entry.word, entry.transcription);
        self
    }

    pub fn build(self) -> Lexicon {
        self.lexicon
    }
}

impl FromIterator<LexiconEntry> for Lexicon {
    fn from_iter<I: IntoIterator<Item = LexiconEntry>>(iter: I) -> Self {
        let mut builder = LexiconBuilder::new();
        for entry in iter {
            builder.insert(entry);
        }
        builder.build()
    }
}
