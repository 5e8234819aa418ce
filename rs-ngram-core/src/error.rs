use std::collections::TryReserveError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors reported by training, prediction and generation.
///
/// Precondition violations are detected before any index arithmetic is
/// performed, so a too-short corpus or seed never turns into an underflow
/// or an out-of-bounds slice.
#[derive(Error, Debug)]
pub enum NGramError {
	/// The window width is below 2.
	#[error("n must be >= 2, got {n}")]
	InvalidOrder { n: usize },

	/// The training corpus holds fewer tokens than one window.
	#[error("corpus has {len} tokens, at least n = {n} are required")]
	CorpusTooShort { len: usize, n: usize },

	/// The seed cannot provide the `n - 1` trailing tokens a prediction needs.
	#[error("seed has {len} tokens, at least {needed} are required")]
	SeedTooShort { len: usize, needed: usize },

	/// A trailing context or window does not have the expected length.
	#[error("expected a context of {expected} tokens, got {got}")]
	ContextLength { expected: usize, got: usize },

	/// A configuration value is out of range.
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	/// Growing the dictionary or the frequency table failed.
	#[error("allocation failed: {0}")]
	Resource(#[from] TryReserveError),

	/// A corpus or configuration file could not be read.
	#[error("could not read {}: {source}", .path.display())]
	Load {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	/// A configuration file is not valid JSON for `GenerationConfig`.
	#[error("malformed configuration: {0}")]
	Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NGramError>;
