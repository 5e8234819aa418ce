use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::generation_config::{Decoding, GenerationConfig};
use super::ngram_model::NGramModel;
use super::trainer::Trainer;
use super::EOF_TOKEN;
use crate::error::{NGramError, Result};

/// High-level generator extending seeds with model predictions.
///
/// # Responsibilities
/// - Own a trained `NGramModel`
/// - Repeatedly predict or sample the next token from the last `n - 1` tokens
/// - Stop on [`EOF_TOKEN`] or when the length cap is reached
#[derive(Debug)]
pub struct Generator {
	model: NGramModel,
}

impl Generator {
	/// Wraps an already trained model.
	pub fn new(model: NGramModel) -> Self {
		Self { model }
	}

	/// Validates `config` and trains a model over `corpus` with its window
	/// width and key mode.
	///
	/// # Errors
	/// Any configuration or training error (`InvalidOrder`, `SeedTooShort`,
	/// `InvalidConfig`, `CorpusTooShort`, `Resource`).
	pub fn from_config<S: AsRef<str>>(corpus: &[S], config: &GenerationConfig) -> Result<Self> {
		config.validate()?;
		let model = Trainer::new(config.n)?
			.with_key_mode(config.key_mode)
			.train(corpus)?;
		Ok(Self::new(model))
	}

	pub fn model(&self) -> &NGramModel {
		&self.model
	}

	/// Extends `seed` until the model predicts [`EOF_TOKEN`] or the sequence
	/// holds `max_length` tokens.
	///
	/// The seed is always a prefix of the result. When `EOF_TOKEN` is
	/// predicted it is appended before stopping. If `max_length` is not
	/// greater than the seed length, the seed is returned unchanged.
	///
	/// # Errors
	/// Returns `NGramError::SeedTooShort` if `seed` holds fewer than `n - 1`
	/// tokens.
	pub fn generate<S: AsRef<str>>(&self, seed: &[S], max_length: usize) -> Result<Vec<String>> {
		self.extend(seed, max_length, |trailing| self.model.predict(trailing))
	}

	/// Like `generate`, but each token is drawn with `NGramModel::sample`.
	///
	/// The same `rng` state always yields the same sequence.
	pub fn sample<S: AsRef<str>, R: Rng>(&self, seed: &[S], max_length: usize, rng: &mut R) -> Result<Vec<String>> {
		self.extend(seed, max_length, |trailing| self.model.sample(trailing, rng))
	}

	fn extend<'a, S: AsRef<str>>(
		&'a self,
		seed: &[S],
		max_length: usize,
		mut next_token: impl FnMut(&[String]) -> Result<&'a str>,
	) -> Result<Vec<String>> {
		let needed = self.model.n() - 1;
		if seed.len() < needed {
			return Err(NGramError::SeedTooShort { len: seed.len(), needed });
		}

		let mut sequence: Vec<String> = seed.iter().map(|token| token.as_ref().to_owned()).collect();
		while sequence.len() < max_length {
			let trailing = &sequence[sequence.len() - needed..];
			let next = next_token(trailing)?;
			trace!("{:?} -> {next:?}", trailing);

			sequence.push(next.to_owned());
			if next == EOF_TOKEN {
				break;
			}
		}

		debug!(
			"generated {} tokens after a seed of {}",
			sequence.len() - seed.len(),
			seed.len()
		);
		Ok(sequence)
	}

	/// Generates from the seed, length cap and decoding of `config`.
	///
	/// Sampled decoding uses a `StdRng` seeded with `config.rng_seed`, or
	/// from the operating system when it is unset.
	///
	/// # Errors
	/// Returns `NGramError::InvalidConfig` if `config` names a window width
	/// other than the model's, plus any error of `validate` or `generate`.
	pub fn run(&self, config: &GenerationConfig) -> Result<Vec<String>> {
		config.validate()?;
		if config.n != self.model.n() {
			return Err(NGramError::InvalidConfig(format!(
				"config n ({}) does not match the model n ({})",
				config.n,
				self.model.n()
			)));
		}
		match config.decoding {
			Decoding::Greedy => self.generate(&config.seed_tokens, config.max_length),
			Decoding::Sampled => {
				let mut rng = match config.rng_seed {
					Some(seed) => StdRng::seed_from_u64(seed),
					None => StdRng::from_os_rng(),
				};
				self.sample(&config.seed_tokens, config.max_length, &mut rng)
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn generator(corpus: &[&str], n: usize) -> Generator {
		Generator::new(Trainer::new(n).unwrap().train(corpus).unwrap())
	}

	#[test]
	fn test_generate_stops_on_eof() {
		let generator = generator(&["the", "cat", "sat", "EOF", "the", "cat", "ran"], 2);
		let sequence = generator.generate(&["the"], 50).unwrap();
		assert_eq!(sequence, vec!["the", "cat", "sat", "EOF"]);
	}

	#[test]
	fn test_generate_stops_at_max_length() {
		let generator = generator(&["a", "b", "a", "b", "a"], 2);
		let sequence = generator.generate(&["a"], 6).unwrap();
		assert_eq!(sequence, vec!["a", "b", "a", "b", "a", "b"]);
	}

	#[test]
	fn test_generate_unknown_seed_appends_eof() {
		let generator = generator(&["a", "b", "c"], 2);
		let sequence = generator.generate(&["zebra"], 10).unwrap();
		assert_eq!(sequence, vec!["zebra", EOF_TOKEN]);
	}

	#[test]
	fn test_generate_uses_only_trailing_context() {
		let generator = generator(&["x", "y", "z", "w"], 3);
		// Leading tokens beyond n - 1 are ignored
		let sequence = generator.generate(&["q", "q", "x", "y"], 10).unwrap();
		assert_eq!(sequence, vec!["q", "q", "x", "y", "z", "w", EOF_TOKEN]);
	}

	#[test]
	fn test_generate_rejects_short_seed() {
		let generator = generator(&["a", "b", "c"], 3);
		let err = generator.generate(&["a"], 10).unwrap_err();
		assert!(matches!(err, NGramError::SeedTooShort { len: 1, needed: 2 }));
	}

	#[test]
	fn test_generate_max_length_below_seed() {
		let generator = generator(&["a", "b", "c"], 2);
		assert_eq!(generator.generate(&["a", "b"], 0).unwrap(), vec!["a", "b"]);
	}

	#[test]
	fn test_from_config_and_run() {
		let corpus = ["alice", "in", "a", "hole", "EOF", "alice", "in", "a", "hurry"];
		let config = GenerationConfig::default();
		let generator = Generator::from_config(&corpus, &config).unwrap();
		assert_eq!(generator.model().n(), 3);
		assert_eq!(generator.run(&config).unwrap(), vec!["alice", "in", "a", "hole", "EOF"]);
	}

	#[test]
	fn test_run_rejects_mismatched_order() {
		let generator = generator(&["alice", "in", "a", "hole"], 2);
		let err = generator.run(&GenerationConfig::default()).unwrap_err();
		assert!(matches!(err, NGramError::InvalidConfig(_)));
	}

	#[test]
	fn test_sample_follows_observed_transitions() {
		let corpus = ["the", "cat", "sat", "EOF", "the", "dog", "sat", "EOF", "the", "cat", "ran", "EOF"];
		let generator = generator(&corpus, 2);
		let mut rng = StdRng::seed_from_u64(11);
		for _ in 0..30 {
			let sequence = generator.sample(&["the"], 20, &mut rng).unwrap();
			for pair in sequence.windows(2) {
				assert!(generator.model().frequency(pair).unwrap() > 0, "unobserved transition {pair:?}");
			}
			assert_eq!(sequence.last().map(String::as_str), Some(EOF_TOKEN));
		}
	}

	#[test]
	fn test_sample_single_follower_chain_matches_greedy() {
		let corpus = ["alice", "in", "a", "hole", "EOF"];
		let generator = generator(&corpus, 3);
		let mut rng = StdRng::seed_from_u64(5);
		assert_eq!(
			generator.sample(&["alice", "in"], 10, &mut rng).unwrap(),
			generator.generate(&["alice", "in"], 10).unwrap()
		);
	}

	#[test]
	fn test_sample_rejects_short_seed() {
		let generator = generator(&["a", "b", "c"], 3);
		let mut rng = StdRng::seed_from_u64(0);
		let err = generator.sample(&["a"], 10, &mut rng).unwrap_err();
		assert!(matches!(err, NGramError::SeedTooShort { len: 1, needed: 2 }));
	}

	#[test]
	fn test_run_sampled_is_reproducible_with_rng_seed() {
		let corpus = ["alice", "in", "a", "hole", "EOF", "alice", "in", "a", "hurry", "EOF", "alice", "in", "a", "dream"];
		let config = GenerationConfig {
			decoding: Decoding::Sampled,
			rng_seed: Some(99),
			..Default::default()
		};
		let generator = Generator::from_config(&corpus, &config).unwrap();
		let first = generator.run(&config).unwrap();
		assert_eq!(first, generator.run(&config).unwrap());
		assert_eq!(&first[..3], &["alice", "in", "a"]);
		assert!(["hole", "hurry", "dream"].contains(&first[3].as_str()));
	}
}
