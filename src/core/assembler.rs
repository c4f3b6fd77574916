use crate::core::lexicon::Lexicon;
use crate::core::types::Segment;
use std::borrow::Cow;

/// Turns a recovered partition into the final transcription string.
pub struct Assembler<'a> {
    lexicon: &'a Lexicon,
}

impl<'a> Assembler<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon }
    }

    /// Known chunks become their transcription. Consecutive unknown chunks pass
    /// through glued together, so text with no lexicon coverage comes back as written
    /// minus whitespace. Pieces are separated by a single space.
    pub fn assemble(&self, segments: &[Segment]) -> String {
        let mut pieces: Vec<Cow<'_, str>> = Vec::with_capacity(segments.len());
        let mut in_unknown_run = false;

        for segment in segments.iter().filter(|s| !s.text.is_empty()) {
            match self.lexicon.transcription(&segment.text) {
                Some(transcription) => {
                    pieces.push(Cow::Borrowed(transcription));
                    in_unknown_run = false;
                }
                None if in_unknown_run => {
                    if let Some(run) = pieces.last_mut() {
                        run.to_mut().push_str(&segment.text);
                    }
                }
                None => {
                    pieces.push(Cow::Borrowed(segment.text.as_str()));
                    in_unknown_run = true;
                }
            }
        }
        pieces.join(" ")
    }
}
