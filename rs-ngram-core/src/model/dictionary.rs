use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;

/// Integer handle of a token, equal to its position in the dictionary.
pub type TokenId = usize;

/// The set of distinct tokens seen during training.
///
/// Tokens are kept in the order they were first added and are never removed
/// or reordered, so a token's id is stable for the lifetime of the model.
/// The dictionary doubles as the interner used by the frequency table:
/// windows are stored as id tuples rather than copies of their strings.
/// Each token's text is allocated once and shared by both lookups.
///
/// # Invariants
/// - `tokens[id]` and `ids[token]` are inverse mappings
/// - No token appears twice
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dictionary {
	/// Tokens in first-seen order, indexed by `TokenId`.
	tokens: Vec<Arc<str>>,

	/// Reverse lookup from token text to id.
	ids: HashMap<Arc<str>, TokenId>,
}

impl Dictionary {
	/// Creates an empty dictionary.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a token and returns its id.
	///
	/// Adding a token that is already present is a no-op returning the
	/// existing id.
	///
	/// # Errors
	/// Returns `NGramError::Resource` if the storage cannot grow.
	pub fn add(&mut self, token: &str) -> Result<TokenId> {
		if let Some(&id) = self.ids.get(token) {
			return Ok(id);
		}

		self.tokens.try_reserve(1)?;
		self.ids.try_reserve(1)?;

		let id = self.tokens.len();
		let token: Arc<str> = Arc::from(token);
		self.ids.insert(Arc::clone(&token), id);
		self.tokens.push(token);
		Ok(id)
	}

	/// Returns `true` if `token` was added before.
	pub fn contains(&self, token: &str) -> bool {
		self.ids.contains_key(token)
	}

	/// Returns the id of a known token.
	pub fn id_of(&self, token: &str) -> Option<TokenId> {
		self.ids.get(token).copied()
	}

	/// Returns the text of the token with the given id.
	pub fn token(&self, id: TokenId) -> Option<&str> {
		self.tokens.get(id).map(|token| &**token)
	}

	/// Iterates over the tokens in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.tokens.iter().map(|token| &**token)
	}

	/// Iterates over `(id, token)` pairs in insertion order.
	pub fn ids(&self) -> impl Iterator<Item = (TokenId, &str)> {
		self.iter().enumerate()
	}

	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_add_preserves_first_seen_order() {
		let mut dictionary = Dictionary::new();
		for token in ["the", "cat", "the", "sat", "cat"] {
			dictionary.add(token).unwrap();
		}
		assert_eq!(dictionary.iter().collect::<Vec<_>>(), vec!["the", "cat", "sat"]);
		assert_eq!(dictionary.len(), 3);
	}

	#[test]
	fn test_add_returns_stable_ids() {
		let mut dictionary = Dictionary::new();
		let the = dictionary.add("the").unwrap();
		let cat = dictionary.add("cat").unwrap();
		assert_eq!(dictionary.add("the").unwrap(), the);
		assert_eq!(dictionary.id_of("cat"), Some(cat));
		assert_eq!(dictionary.token(cat), Some("cat"));
		assert_eq!(dictionary.token(42), None);
	}

	#[test]
	fn test_contains_is_exact() {
		let mut dictionary = Dictionary::new();
		dictionary.add("cat").unwrap();
		assert!(dictionary.contains("cat"));
		assert!(!dictionary.contains("Cat"));
		assert!(!dictionary.contains("ca"));
	}

	#[test]
	fn test_iteration_is_restartable() {
		let mut dictionary = Dictionary::new();
		dictionary.add("a").unwrap();
		dictionary.add("b").unwrap();
		let first: Vec<_> = dictionary.ids().collect();
		let second: Vec<_> = dictionary.ids().collect();
		assert_eq!(first, vec![(0, "a"), (1, "b")]);
		assert_eq!(first, second);
	}

	#[test]
	fn test_token_text_is_stored_once() {
		let mut dictionary = Dictionary::new();
		dictionary.add("rabbit").unwrap();
		dictionary.add("rabbit").unwrap();
		let (key, _) = dictionary.ids.get_key_value("rabbit").unwrap();
		assert!(Arc::ptr_eq(key, &dictionary.tokens[0]));
		assert_eq!(Arc::strong_count(&dictionary.tokens[0]), 2);
	}

	#[test]
	fn test_empty() {
		let dictionary = Dictionary::new();
		assert!(dictionary.is_empty());
		assert_eq!(dictionary.iter().count(), 0);
	}
}
