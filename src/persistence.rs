// File: src/persistence.rs
use crate::core::lexicon::Lexicon;
use crate::core::types::{Locale, PhonemicSystem};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// On-disk form of a compiled lexicon, tagged with the dataset it came from.
#[derive(Serialize, Deserialize)]
struct LexiconCache {
    locale: Locale,
    system: PhonemicSystem,
    lexicon: Lexicon,
}

/// Writes through a temp file in the target's directory, then renames it over `path`.
pub fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&NamedTempFile>) -> Result<()>,
{
    let parent_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        write(&mut writer)?;
        writer.flush()?;
    }

    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub fn save_lexicon(
    lexicon: &Lexicon,
    locale: Locale,
    system: PhonemicSystem,
    path: &Path,
) -> Result<()> {
    let cache = LexiconCache {
        locale,
        system,
        lexicon: lexicon.clone(),
    };
    write_atomically(path, |writer| Ok(bincode::serialize_into(writer, &cache)?))
}

/// Loads a cached lexicon, refusing one built from a different dataset.
pub fn load_lexicon(path: &Path, locale: Locale, system: PhonemicSystem) -> Result<Lexicon> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let cache: LexiconCache = bincode::deserialize_from(reader)?;

    if cache.locale != locale || cache.system != system {
        return Err(Error::CacheMismatch {
            cached: format!("{}/{}", cache.locale, cache.system),
            expected: format!("{}/{}", locale, system),
        });
    }
    Ok(cache.lexicon)
}
