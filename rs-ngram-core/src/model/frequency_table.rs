use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::dictionary::TokenId;
use crate::error::Result;

/// How n-token windows are keyed in a `FrequencyTable`.
///
/// # Variants
/// - `Exact`: the key is the tuple of interned token ids. Two windows share
///   a counter only if they hold the same tokens in the same order.
/// - `Fingerprint`: the key is the 32-bit polynomial fingerprint of the
///   concatenated window (see [`fingerprint`]). Distinct windows whose
///   fingerprints collide are counted together.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum KeyMode {
	#[default]
	Exact,
	Fingerprint,
}

/// Key of one n-token window, as stored in a `FrequencyTable`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum WindowKey {
	Exact(Box<[TokenId]>),
	Fingerprint(i32),
}

/// Borrowed form of a `WindowKey`, used for lookups without allocating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WindowKeyRef<'a> {
	Exact(&'a [TokenId]),
	Fingerprint(i32),
}

impl WindowKey {
	pub fn view(&self) -> WindowKeyRef<'_> {
		match self {
			WindowKey::Exact(ids) => WindowKeyRef::Exact(ids),
			WindowKey::Fingerprint(h) => WindowKeyRef::Fingerprint(*h),
		}
	}
}

impl WindowKeyRef<'_> {
	pub fn to_owned_key(self) -> WindowKey {
		match self {
			WindowKeyRef::Exact(ids) => WindowKey::Exact(ids.into()),
			WindowKeyRef::Fingerprint(h) => WindowKey::Fingerprint(h),
		}
	}
}

/// Folds the characters of `token` into a running fingerprint.
///
/// Each character contributes `state * 31 + code_point`, wrapping on
/// 32-bit signed overflow.
pub fn fold_fingerprint(state: i32, token: &str) -> i32 {
	token
		.chars()
		.fold(state, |h, c| h.wrapping_mul(31).wrapping_add(c as u32 as i32))
}

/// Computes the polynomial fingerprint of a window.
///
/// Tokens are folded in order with no separator, so `["ab", "c"]` and
/// `["a", "bc"]` have the same fingerprint.
pub fn fingerprint<S: AsRef<str>>(window: &[S]) -> i32 {
	window
		.iter()
		.fold(0, |h, token| fold_fingerprint(h, token.as_ref()))
}

/// Occurrence counter of n-token windows.
///
/// Entries are kept as `(key, count)` pairs in the order their key was first
/// incremented; a hash index on top gives constant-time lookups by borrowed
/// key. Only the index matching `key_mode` is ever populated.
/// Growth never reorders or drops existing entries.
///
/// # Invariants
/// - Every key of the index points at the entry holding that key
/// - Every count is >= 1
/// - All keys use the variant selected by `key_mode`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyTable {
	key_mode: KeyMode,
	entries: Vec<(WindowKey, u64)>,
	exact_index: HashMap<Box<[TokenId]>, usize>,
	fingerprint_index: HashMap<i32, usize>,
}

impl FrequencyTable {
	/// Creates an empty table keyed according to `key_mode`.
	pub fn new(key_mode: KeyMode) -> Self {
		Self {
			key_mode,
			entries: Vec::new(),
			exact_index: HashMap::new(),
			fingerprint_index: HashMap::new(),
		}
	}

	pub fn key_mode(&self) -> KeyMode {
		self.key_mode
	}

	fn position(&self, key: WindowKeyRef<'_>) -> Option<usize> {
		match key {
			WindowKeyRef::Exact(ids) => self.exact_index.get(ids).copied(),
			WindowKeyRef::Fingerprint(h) => self.fingerprint_index.get(&h).copied(),
		}
	}

	/// Returns how many times `key` was incremented, 0 if never.
	pub fn get(&self, key: WindowKeyRef<'_>) -> u64 {
		self.position(key)
			.map(|i| self.entries[i].1)
			.unwrap_or(0)
	}

	/// Records one occurrence of `key`.
	///
	/// The key is copied only the first time it is seen.
	///
	/// # Errors
	/// Returns `NGramError::Resource` if a new entry cannot be stored. The
	/// table is left unchanged in that case.
	pub fn increment(&mut self, key: WindowKeyRef<'_>) -> Result<()> {
		debug_assert_eq!(
			matches!(key, WindowKeyRef::Exact(_)),
			self.key_mode == KeyMode::Exact,
			"window key does not match the table key mode"
		);

		if let Some(i) = self.position(key) {
			self.entries[i].1 += 1;
			return Ok(());
		}

		self.entries.try_reserve(1)?;
		let i = self.entries.len();
		match key {
			WindowKeyRef::Exact(ids) => {
				self.exact_index.try_reserve(1)?;
				self.exact_index.insert(ids.into(), i);
			}
			WindowKeyRef::Fingerprint(h) => {
				self.fingerprint_index.try_reserve(1)?;
				self.fingerprint_index.insert(h, i);
			}
		}
		self.entries.push((key.to_owned_key(), 1));
		Ok(())
	}

	/// Number of distinct keys.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Sum of all counts, i.e. the number of `increment` calls.
	pub fn total(&self) -> u64 {
		self.entries.iter().map(|(_, count)| count).sum()
	}

	/// Iterates over `(key, count)` pairs in first-seen order.
	pub fn entries(&self) -> impl Iterator<Item = (&WindowKey, u64)> {
		self.entries.iter().map(|(key, count)| (key, *count))
	}
}
