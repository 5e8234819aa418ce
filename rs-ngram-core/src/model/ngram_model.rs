use log::trace;
use rand::Rng;

use super::dictionary::Dictionary;
use super::frequency_table::{fingerprint, fold_fingerprint, FrequencyTable, KeyMode, WindowKeyRef};
use super::EOF_TOKEN;
use crate::error::{NGramError, Result};

/// A trained word-level n-gram model.
///
/// The model owns the dictionary of known tokens and the frequency table of
/// n-token windows. It is produced by [`Trainer::train`](super::trainer::Trainer::train)
/// in a single pass and is immutable afterwards, so any number of
/// predictions can read it concurrently.
///
/// # Responsibilities
/// - Look up the frequency of an n-token window
/// - Predict the most frequent token following an (n-1)-token context
/// - Draw a following token with probability proportional to its count
///
/// # Invariants
/// - `n` is always >= 2
/// - Every token referenced by an exact window key is in `dictionary`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NGramModel {
	/// Window width (context length is `n - 1`)
	n: usize, // must be >= 2

	dictionary: Dictionary,
	table: FrequencyTable,
}

impl NGramModel {
	pub(crate) fn from_parts(n: usize, dictionary: Dictionary, table: FrequencyTable) -> Self {
		Self { n, dictionary, table }
	}

	/// Window width the model was trained with.
	pub fn n(&self) -> usize {
		self.n
	}

	pub fn key_mode(&self) -> KeyMode {
		self.table.key_mode()
	}

	pub fn dictionary(&self) -> &Dictionary {
		&self.dictionary
	}

	pub fn frequency_table(&self) -> &FrequencyTable {
		&self.table
	}

	/// Returns how many training windows matched `window`.
	///
	/// In exact mode a window holding an unknown token was never counted.
	///
	/// # Errors
	/// Returns `NGramError::ContextLength` if `window` does not hold exactly
	/// `n` tokens.
	pub fn frequency<S: AsRef<str>>(&self, window: &[S]) -> Result<u64> {
		if window.len() != self.n {
			return Err(NGramError::ContextLength { expected: self.n, got: window.len() });
		}

		Ok(match self.table.key_mode() {
			KeyMode::Exact => window
				.iter()
				.map(|token| self.dictionary.id_of(token.as_ref()))
				.collect::<Option<Vec<_>>>()
				.map(|ids| self.table.get(WindowKeyRef::Exact(&ids)))
				.unwrap_or(0),
			KeyMode::Fingerprint => self.table.get(WindowKeyRef::Fingerprint(fingerprint(window))),
		})
	}

	fn check_context<S>(&self, trailing: &[S]) -> Result<()> {
		let expected = self.n - 1;
		if trailing.len() != expected {
			return Err(NGramError::ContextLength { expected, got: trailing.len() });
		}
		Ok(())
	}

	/// Calls `visit` with every dictionary token, in dictionary order, and
	/// the frequency of `trailing` followed by that token.
	///
	/// Nothing is visited in exact mode when a context token is unknown:
	/// no counted window can contain it.
	fn for_each_candidate<'a, S: AsRef<str>>(&'a self, trailing: &[S], mut visit: impl FnMut(&'a str, u64)) {
		match self.table.key_mode() {
			KeyMode::Exact => {
				let mut window = Vec::with_capacity(self.n);
				for token in trailing {
					match self.dictionary.id_of(token.as_ref()) {
						Some(id) => window.push(id),
						None => return,
					}
				}
				window.push(0);

				let last = self.n - 1;
				for (id, candidate) in self.dictionary.ids() {
					window[last] = id;
					visit(candidate, self.table.get(WindowKeyRef::Exact(&window)));
				}
			}
			KeyMode::Fingerprint => {
				let prefix = fingerprint(trailing);
				for candidate in self.dictionary.iter() {
					let key = WindowKeyRef::Fingerprint(fold_fingerprint(prefix, candidate));
					visit(candidate, self.table.get(key));
				}
			}
		}
	}

	/// Predicts the token that most frequently followed `trailing`.
	///
	/// Candidates are tried in dictionary order and only a strictly greater
	/// frequency replaces the current best, so ties go to the token seen
	/// first during training.
	///
	/// Returns [`EOF_TOKEN`] if no known token ever followed `trailing`.
	///
	/// # Errors
	/// Returns `NGramError::ContextLength` if `trailing` does not hold
	/// exactly `n - 1` tokens.
	pub fn predict<S: AsRef<str>>(&self, trailing: &[S]) -> Result<&str> {
		self.check_context(trailing)?;

		let mut best = None;
		let mut best_frequency = 0;
		self.for_each_candidate(trailing, |candidate, frequency| {
			if frequency > best_frequency {
				trace!("candidate {candidate:?} takes the lead with frequency {frequency}");
				best = Some(candidate);
				best_frequency = frequency;
			}
		});

		Ok(best.unwrap_or(EOF_TOKEN))
	}

	/// Draws a token that followed `trailing`, weighted by how often it did.
	///
	/// This performs:
	/// - an O(dictionary) scan collecting the observed followers
	/// - a cumulative subtraction to select a bucket
	///
	/// Returns [`EOF_TOKEN`] if no known token ever followed `trailing`.
	///
	/// # Errors
	/// Returns `NGramError::ContextLength` if `trailing` does not hold
	/// exactly `n - 1` tokens.
	pub fn sample<S: AsRef<str>, R: Rng>(&self, trailing: &[S], rng: &mut R) -> Result<&str> {
		self.check_context(trailing)?;

		let mut followers = Vec::new();
		self.for_each_candidate(trailing, |candidate, frequency| {
			if frequency > 0 {
				followers.push((candidate, frequency));
			}
		});

		let total: u64 = followers.iter().map(|(_, frequency)| frequency).sum();
		if total == 0 {
			return Ok(EOF_TOKEN);
		}

		let mut r = rng.random_range(0..total);
		for &(candidate, frequency) in &followers {
			if r < frequency {
				return Ok(candidate);
			}
			r -= frequency;
		}

		// r < total, so the walk always returns above
		Ok(followers.last().map_or(EOF_TOKEN, |&(candidate, _)| candidate))
	}
}
