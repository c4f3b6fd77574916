use crate::config::PhonemicConfig;
use crate::core::assembler::Assembler;
use crate::core::lexicon::Lexicon;
use crate::core::segmenter::Segmenter;
use crate::core::types::{Locale, PhonemicSystem, Segment};
use crate::error::Result;
use crate::persistence::{load_lexicon, save_lexicon};

/// Transcribes phonetic definitions against one loaded lexicon.
///
/// Holds no per-request state, so a shared reference can serve concurrent callers.
pub struct PhonemicEngine {
    lexicon: Lexicon,
}

impl PhonemicEngine {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    /// Loads the configured lexicon, going through the binary cache when one is set.
    pub fn from_config(cfg: &PhonemicConfig) -> Result<Self> {
        let locale: Locale = cfg.locale.parse()?;
        let system = PhonemicSystem::for_locale(locale, &cfg.system)?;

        let Some(cache_path) = &cfg.lexicon_cache else {
            return Ok(Self::new(Lexicon::load(&cfg.locale, &cfg.system, &cfg.data_dir)?));
        };

        if cache_path.exists() {
            match load_lexicon(cache_path, locale, system) {
                Ok(lexicon) => {
                    tracing::info!(path = %cache_path.display(), words = lexicon.len(), "loaded lexicon cache");
                    return Ok(Self::new(lexicon));
                }
                Err(e) => {
                    tracing::warn!(path = %cache_path.display(), error = %e, "ignoring lexicon cache");
                }
            }
        }

        let lexicon = Lexicon::load(&cfg.locale, &cfg.system, &cfg.data_dir)?;
        if let Err(e) = save_lexicon(&lexicon, locale, system, cache_path) {
            tracing::warn!(path = %cache_path.display(), error = %e, "failed to write lexicon cache");
        }
        Ok(Self::new(lexicon))
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn segment(&self, definition: &str) -> Result<Vec<Segment>> {
        Segmenter::new(&self.lexicon).segment(definition)
    }

    /// Builds the output string from segments already produced by [`PhonemicEngine::segment`].
    pub fn assemble(&self, segments: &[Segment]) -> String {
        Assembler::new(&self.lexicon).assemble(segments)
    }

    /// Full pipeline: segmentation followed by assembly.
    pub fn transcript(&self, definition: &str) -> Result<String> {
        let segments = self.segment(definition)?;
        Ok(self.assemble(&segments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn engine() -> PhonemicEngine {
        PhonemicEngine::new(Lexicon::from_tsv_str("cat\tK AE T\ndog\tD AO G\nab\t.ˑAB\n").unwrap())
    }

    #[test]
    fn test_transcript_examples() {
        let engine = engine();
        assert_eq!(engine.transcript("catdog").unwrap(), "K AE T D AO G");
        assert_eq!(engine.transcript("ab").unwrap(), ".AB");
        assert_eq!(engine.transcript("").unwrap(), "");
    }

    #[test]
    fn test_unknown_text_passes_through() {
        assert_eq!(engine().transcript("catxdog").unwrap(), "K AE T x D AO G");
        assert_eq!(engine().transcript("catxyzwdog").unwrap(), "K AE T xyzw D AO G");
    }

    #[test]
    fn test_assemble_matches_transcript() {
        let engine = engine();
        for input in ["catdog", "ab", "qcat dogz", ""] {
            let segments = engine.segment(input).unwrap();
            assert_eq!(engine.assemble(&segments), engine.transcript(input).unwrap());
        }
    }

    fn write_dataset(dir: &std::path::Path, rows: &str) {
        let path = dir.join("th_TH");
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("paiboon.data"), rows).unwrap();
    }

    #[test]
    fn test_from_config_builds_and_reuses_cache() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path(), "cat\tK AE T\n");
        let cfg = PhonemicConfig {
            locale: "th_TH".into(),
            system: "paiboon".into(),
            data_dir: dir.path().to_path_buf(),
            lexicon_cache: Some(dir.path().join("lexicon.bin")),
        };

        let first = PhonemicEngine::from_config(&cfg).unwrap();
        assert_eq!(first.lexicon().len(), 1);
        assert!(dir.path().join("lexicon.bin").exists());

        // With the dataset gone the cache alone must be enough.
        fs::remove_dir_all(dir.path().join("th_TH")).unwrap();
        let second = PhonemicEngine::from_config(&cfg).unwrap();
        assert_eq!(second.transcript("cat").unwrap(), "K AE T");
    }

    #[test]
    fn test_from_config_rebuilds_corrupt_cache() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path(), "dog\tD AO G\n");
        let cache = dir.path().join("lexicon.bin");
        fs::write(&cache, b"garbage").unwrap();
        let cfg = PhonemicConfig {
            locale: "th_TH".into(),
            system: "paiboon".into(),
            data_dir: dir.path().to_path_buf(),
            lexicon_cache: Some(cache),
        };
        let engine = PhonemicEngine::from_config(&cfg).unwrap();
        assert_eq!(engine.transcript("dog").unwrap(), "D AO G");
    }

    #[test]
    fn test_from_config_validates_before_cache() {
        let cfg = PhonemicConfig {
            locale: "xx_XX".into(),
            system: "paiboon".into(),
            data_dir: "data".into(),
            lexicon_cache: None,
        };
        assert!(PhonemicEngine::from_config(&cfg).is_err());
    }
}
