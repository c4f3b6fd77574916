// File: src/notes.rs
use crate::config::NotesConfig;
use crate::error::{Error, Result};
use crate::persistence::write_atomically;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Audio markers appended to a field; everything from here on is not part of the definition.
const SOUND_MARKER: &str = " [sound";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub file_name: String,
}

/// A card that still needs an image, a transcription, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Note {
    pub id: i64,
    pub image_definition: String,
    pub image: Option<Image>,
    pub phonemic_definition: String,
    pub phonemic: String,
    pub skip_image_update: bool,
    pub skip_phonemic_update: bool,
}

/// Source of pending notes and sink for their filled-in fields.
pub trait NoteStore {
    fn notes(&self) -> Result<Vec<Note>>;
    fn update_note(&mut self, note: &Note) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPicture {
    pub url: String,
    pub filename: String,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredNote {
    pub id: i64,
    pub deck: String,
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub pictures: Vec<StoredPicture>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeckFile {
    pub notes: Vec<StoredNote>,
}

/// Note store backed by a JSON deck file that is rewritten atomically on every update.
pub struct JsonDeckStore {
    path: PathBuf,
    cfg: NotesConfig,
    deck: DeckFile,
}

impl JsonDeckStore {
    pub fn open(cfg: NotesConfig) -> Result<Self> {
        let file = File::open(&cfg.path).map_err(|source| Error::DeckRead {
            path: cfg.path.clone(),
            source,
        })?;
        let deck: DeckFile =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| Error::DeckFormat {
                path: cfg.path.clone(),
                source,
            })?;
        Ok(Self {
            path: cfg.path.clone(),
            cfg,
            deck,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn deck(&self) -> &DeckFile {
        &self.deck
    }

    fn save(&self) -> Result<()> {
        write_atomically(&self.path, |writer| {
            Ok(serde_json::to_writer_pretty(writer, &self.deck)?)
        })
    }

    /// Checks the configured fields against the first note of the deck.
    fn validate_fields(&self, first: &StoredNote) -> Result<()> {
        let configured = [
            &self.cfg.image_field,
            &self.cfg.image_definition_field,
            &self.cfg.phonemic_field,
            &self.cfg.phonemic_definition_field,
        ];
        for name in configured.into_iter().flatten() {
            if !first.fields.contains_key(name) {
                return Err(Error::MissingField(name.clone()));
            }
        }
        Ok(())
    }
}

/// Value of `field` with any trailing sound marker cut off.
fn definition(stored: &StoredNote, field: &str) -> String {
    let value = stored.fields.get(field).map(String::as_str).unwrap_or_default();
    match value.split_once(SOUND_MARKER) {
        Some((head, _)) => head.to_string(),
        None => value.to_string(),
    }
}

/// True when the update must be skipped: either field unset, or target already filled.
fn skip_update(stored: &StoredNote, definition_field: &Option<String>, target_field: &Option<String>) -> bool {
    match (definition_field, target_field) {
        (Some(_), Some(target)) => stored.fields.get(target).is_some_and(|v| !v.is_empty()),
        _ => true,
    }
}

impl NoteStore for JsonDeckStore {
    fn notes(&self) -> Result<Vec<Note>> {
        let in_deck: Vec<&StoredNote> = self
            .deck
            .notes
            .iter()
            .filter(|n| n.deck == self.cfg.deck)
            .collect();
        if let Some(first) = in_deck.first() {
            self.validate_fields(first)?;
        }

        let mut notes = Vec::new();
        for stored in in_deck {
            let mut note = Note {
                id: stored.id,
                skip_image_update: skip_update(stored, &self.cfg.image_definition_field, &self.cfg.image_field),
                skip_phonemic_update: skip_update(
                    stored,
                    &self.cfg.phonemic_definition_field,
                    &self.cfg.phonemic_field,
                ),
                ..Note::default()
            };
            if note.skip_image_update && note.skip_phonemic_update {
                continue;
            }
            if let (false, Some(field)) = (note.skip_image_update, &self.cfg.image_definition_field) {
                note.image_definition = definition(stored, field);
            }
            if let (false, Some(field)) = (note.skip_phonemic_update, &self.cfg.phonemic_definition_field) {
                note.phonemic_definition = definition(stored, field);
            }
            notes.push(note);
        }
        Ok(notes)
    }

    fn update_note(&mut self, note: &Note) -> Result<()> {
        let stored = self
            .deck
            .notes
            .iter_mut()
            .find(|n| n.id == note.id)
            .ok_or(Error::NoteNotFound(note.id))?;

        if let (false, Some(field)) = (note.skip_image_update, &self.cfg.image_field) {
            let image = note
                .image
                .as_ref()
                .ok_or_else(|| Error::ImageLookup(format!("no image for note {}", note.id)))?;
            stored.fields.insert(field.clone(), String::new());
            stored.pictures.push(StoredPicture {
                url: image.url.clone(),
                filename: image.file_name.clone(),
                fields: vec![field.clone()],
            });
        }
        if let (false, Some(field)) = (note.skip_phonemic_update, &self.cfg.phonemic_field) {
            stored.fields.insert(field.clone(), note.phonemic.clone());
        }

        self.save()
    }
}
