//! Top-level module for the n-gram generation system.
//!
//! - Token interning in first-seen order (`Dictionary`)
//! - Window occurrence counting (`FrequencyTable`)
//! - Single-pass training (`Trainer`)
//! - The trained model with its greedy and sampled predictors (`NGramModel`)
//! - Generation configuration (`GenerationConfig`)
//! - A high-level generation interface (`Generator`)

/// Reserved token marking a paragraph boundary in the corpus.
///
/// It is also the stop signal of generation and the fallback prediction
/// when no known token follows a context.
pub const EOF_TOKEN: &str = "EOF";

/// Ordered, deduplicated set of training tokens with integer ids.
pub mod dictionary;

/// Occurrence counter keyed by n-token windows.
///
/// Supports exact keys and the legacy polynomial fingerprint keys.
pub mod frequency_table;

/// Trained n-gram model and next-token prediction.
pub mod ngram_model;

/// Sliding-window training over a token sequence.
pub mod trainer;

/// Generation parameters (window width, seed, length cap, key mode, decoding).
pub mod generation_config;

/// High-level interface extending a seed with greedy or sampled predictions.
pub mod generator;
