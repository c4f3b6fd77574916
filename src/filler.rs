// File: src/filler.rs
use crate::core::engine::PhonemicEngine;
use crate::error::Result;
use crate::notes::{Image, NoteStore};

/// Resolves an illustration for a definition.
pub trait ImageProvider {
    fn image_by_definition(&self, definition: &str) -> Result<Image>;
}

/// Counts of what a [`Filler::run`] changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillReport {
    pub notes: usize,
    pub images: usize,
    pub transcriptions: usize,
}

/// Walks pending notes and fills whatever their configuration asks for.
pub struct Filler<S: NoteStore> {
    store: S,
    engine: Option<PhonemicEngine>,
    images: Option<Box<dyn ImageProvider>>,
}

impl<S: NoteStore> Filler<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            engine: None,
            images: None,
        }
    }

    pub fn with_engine(mut self, engine: PhonemicEngine) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn with_image_provider(mut self, provider: Box<dyn ImageProvider>) -> Self {
        self.images = Some(provider);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stops at the first failing note; notes updated before it stay updated.
    pub fn run(&mut self) -> Result<FillReport> {
        let mut report = FillReport::default();

        for mut note in self.store.notes()? {
            let mut changed = false;

            if let (false, Some(provider)) = (note.skip_image_update, &self.images) {
                note.image = Some(provider.image_by_definition(&note.image_definition)?);
                tracing::info!(definition = %note.image_definition, "added card image");
                report.images += 1;
                changed = true;
            } else {
                note.skip_image_update = true;
            }

            if let (false, Some(engine)) = (note.skip_phonemic_update, &self.engine) {
                note.phonemic = engine.transcript(&note.phonemic_definition)?;
                tracing::info!(
                    definition = %note.phonemic_definition,
                    phonemic = %note.phonemic,
                    "added card phonemic"
                );
                report.transcriptions += 1;
                changed = true;
            } else {
                note.skip_phonemic_update = true;
            }

            if changed {
                self.store.update_note(&note)?;
                report.notes += 1;
            }
        }

        Ok(report)
    }
}
