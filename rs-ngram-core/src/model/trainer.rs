use log::{debug, info};

use super::dictionary::Dictionary;
use super::frequency_table::{fingerprint, FrequencyTable, KeyMode, WindowKeyRef};
use super::ngram_model::NGramModel;
use crate::error::{NGramError, Result};

/// Builds an [`NGramModel`] from a token sequence.
///
/// A window of width `n` slides over the corpus one token at a time. For
/// each window, its tokens are added to the dictionary left to right and
/// the window's counter is incremented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Trainer {
	n: usize,
	key_mode: KeyMode,
}

impl Trainer {
	/// Creates a trainer for windows of width `n`, using exact window keys.
	///
	/// # Errors
	/// Returns `NGramError::InvalidOrder` if `n < 2`.
	pub fn new(n: usize) -> Result<Self> {
		if n < 2 {
			return Err(NGramError::InvalidOrder { n });
		}
		Ok(Self { n, key_mode: KeyMode::default() })
	}

	/// Selects how windows are keyed in the frequency table.
	pub fn with_key_mode(mut self, key_mode: KeyMode) -> Self {
		self.key_mode = key_mode;
		self
	}

	pub fn n(&self) -> usize {
		self.n
	}

	pub fn key_mode(&self) -> KeyMode {
		self.key_mode
	}

	/// Trains a model over `corpus` in a single pass.
	///
	/// Every one of the `corpus.len() - n + 1` windows is counted exactly
	/// once. Training is deterministic: the same corpus always yields the
	/// same dictionary order and the same table.
	///
	/// # Errors
	/// - `NGramError::CorpusTooShort` if the corpus holds fewer than `n`
	///   tokens. Nothing is built in that case.
	/// - `NGramError::Resource` if the dictionary or the table cannot grow.
	///   No partial model is returned.
	pub fn train<S: AsRef<str>>(&self, corpus: &[S]) -> Result<NGramModel> {
		if corpus.len() < self.n {
			return Err(NGramError::CorpusTooShort { len: corpus.len(), n: self.n });
		}

		let mut dictionary = Dictionary::new();
		let mut table = FrequencyTable::new(self.key_mode);
		let mut ids = Vec::with_capacity(self.n);

		for window in corpus.windows(self.n) {
			ids.clear();
			for token in window {
				ids.push(dictionary.add(token.as_ref())?);
			}

			let key = match self.key_mode {
				KeyMode::Exact => WindowKeyRef::Exact(&ids),
				KeyMode::Fingerprint => WindowKeyRef::Fingerprint(fingerprint(window)),
			};
			table.increment(key)?;
		}

		debug!(
			"trained {} windows of width {} ({:?} keys)",
			table.total(),
			self.n,
			self.key_mode
		);
		info!(
			"model ready: {} distinct tokens, {} distinct windows",
			dictionary.len(),
			table.len()
		);

		Ok(NGramModel::from_parts(self.n, dictionary, table))
	}
}
