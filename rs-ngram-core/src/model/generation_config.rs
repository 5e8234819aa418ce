use std::path::Path;

use serde::{Deserialize, Serialize};

use super::frequency_table::KeyMode;
use crate::error::{NGramError, Result};
use crate::io;

/// How the next token is chosen among the followers of a context.
///
/// # Variants
/// - `Greedy`: the most frequent follower, first seen on ties. Output is a
///   pure function of the corpus and the seed.
/// - `Sampled`: a follower drawn with probability proportional to its count.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Decoding {
	#[default]
	Greedy,
	Sampled,
}

/// Parameters of one training and generation run.
///
/// Missing fields take their default value when deserialized, so a config
/// file only needs to name what it changes.
///
/// # Invariants (checked by `validate`)
/// - `n >= 2`
/// - `seed_tokens` holds at least `n - 1` tokens
/// - `max_length >= seed_tokens.len()`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct GenerationConfig {
	/// Window width used for training; predictions look at `n - 1` tokens.
	pub n: usize,

	/// Tokens the generated sequence starts with.
	pub seed_tokens: Vec<String>,

	/// Upper bound on the length of the generated sequence, seed included.
	pub max_length: usize,

	/// How windows are keyed in the frequency table.
	pub key_mode: KeyMode,

	pub decoding: Decoding,

	/// Seed of the random generator used by sampled decoding. Without one,
	/// the generator is seeded from the operating system.
	pub rng_seed: Option<u64>,
}

impl Default for GenerationConfig {
	fn default() -> Self {
		Self {
			n: 3,
			seed_tokens: vec!["alice".to_owned(), "in".to_owned(), "a".to_owned()],
			max_length: 100,
			key_mode: KeyMode::Exact,
			decoding: Decoding::Greedy,
			rng_seed: None,
		}
	}
}

impl GenerationConfig {
	/// Parses a configuration from JSON.
	///
	/// # Errors
	/// Returns `NGramError::Config` on malformed JSON. The values are not
	/// validated; call `validate` before use.
	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	/// Reads a JSON configuration file.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
		Self::from_json(&io::read_text(path)?)
	}

	/// Checks that the values can drive a generation.
	pub fn validate(&self) -> Result<()> {
		if self.n < 2 {
			return Err(NGramError::InvalidOrder { n: self.n });
		}
		let needed = self.n - 1;
		if self.seed_tokens.len() < needed {
			return Err(NGramError::SeedTooShort { len: self.seed_tokens.len(), needed });
		}
		if self.max_length < self.seed_tokens.len() {
			return Err(NGramError::InvalidConfig(format!(
				"max_length ({}) is shorter than the seed ({} tokens)",
				self.max_length,
				self.seed_tokens.len()
			)));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_is_valid() {
		let config = GenerationConfig::default();
		assert_eq!(config.n, 3);
		assert_eq!(config.seed_tokens, vec!["alice", "in", "a"]);
		assert_eq!(config.max_length, 100);
		assert_eq!(config.decoding, Decoding::Greedy);
		config.validate().unwrap();
	}

	#[test]
	fn test_partial_json_uses_defaults() {
		let config = GenerationConfig::from_json(r#"{ "n": 2, "key_mode": "fingerprint" }"#).unwrap();
		assert_eq!(config.n, 2);
		assert_eq!(config.key_mode, KeyMode::Fingerprint);
		assert_eq!(config.max_length, 100);
		assert_eq!(config.seed_tokens.len(), 3);
	}

	#[test]
	fn test_sampled_decoding_from_json() {
		let config = GenerationConfig::from_json(r#"{ "decoding": "sampled", "rng_seed": 17 }"#).unwrap();
		assert_eq!(config.decoding, Decoding::Sampled);
		assert_eq!(config.rng_seed, Some(17));
		assert_eq!(GenerationConfig::from_json("{}").unwrap().rng_seed, None);
		let err = GenerationConfig::from_json(r#"{ "decoding": "beam" }"#).unwrap_err();
		assert!(matches!(err, NGramError::Config(_)));
	}

	#[test]
	fn test_malformed_json() {
		let err = GenerationConfig::from_json("{ n: 2 }").unwrap_err();
		assert!(matches!(err, NGramError::Config(_)));
		let err = GenerationConfig::from_json(r#"{ "key_mode": "fuzzy" }"#).unwrap_err();
		assert!(matches!(err, NGramError::Config(_)));
	}

	#[test]
	fn test_validate_order() {
		let config = GenerationConfig { n: 1, ..Default::default() };
		assert!(matches!(config.validate(), Err(NGramError::InvalidOrder { n: 1 })));
	}

	#[test]
	fn test_validate_seed_length() {
		let config = GenerationConfig {
			n: 4,
			seed_tokens: vec!["alice".to_owned(), "in".to_owned()],
			..Default::default()
		};
		assert!(matches!(
			config.validate(),
			Err(NGramError::SeedTooShort { len: 2, needed: 3 })
		));
	}

	#[test]
	fn test_validate_max_length() {
		let config = GenerationConfig { max_length: 2, ..Default::default() };
		assert!(matches!(config.validate(), Err(NGramError::InvalidConfig(_))));

		let config = GenerationConfig { max_length: 3, ..Default::default() };
		config.validate().unwrap();
	}

	#[test]
	fn test_missing_file() {
		let err = GenerationConfig::from_file("does/not/exist.json").unwrap_err();
		assert!(matches!(err, NGramError::Load { .. }));
	}
}
