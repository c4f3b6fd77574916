pub mod assembler;
pub mod engine;
pub mod lexicon;
pub mod segmenter;
pub mod types;
