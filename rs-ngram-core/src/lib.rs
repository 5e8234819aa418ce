//! Word-level n-gram text generation library.
//!
//! This crate provides an n-gram generator including:
//! - An interning dictionary of known tokens (first-seen order)
//! - A frequency table of n-token windows
//! - A single-pass trainer over a token sequence
//! - Deterministic next-token prediction and sequence generation
//! - Frequency-weighted sampling of the next token
//! - A corpus loader that normalizes raw text into tokens

/// Core n-gram model, training and generation logic.
pub mod model;

/// Corpus loading and tokenization.
pub mod io;

/// Error type shared by every fallible operation of the crate.
pub mod error;

pub use error::{NGramError, Result};
pub use model::EOF_TOKEN;
