// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod filler;
pub mod notes;
pub mod persistence;
pub use crate::core::engine::PhonemicEngine;
pub use crate::error::{Error, Result};
