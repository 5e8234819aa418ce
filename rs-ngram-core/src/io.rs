use std::fs;
use std::path::Path;

use log::debug;

use crate::error::{NGramError, Result};
use crate::model::EOF_TOKEN;

/// Characters removed from the corpus before splitting.
pub const PUNCTUATION: [char; 10] = ['.', ',', '!', '?', '(', ')', ':', '_', ';', '\r'];

/// Reads a whole UTF-8 text file.
///
/// # Errors
/// Returns `NGramError::Load` carrying the path if the file cannot be read.
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<String> {
	let path = path.as_ref();
	fs::read_to_string(path).map_err(|source| NGramError::Load { path: path.to_path_buf(), source })
}

/// Reads a text file and normalizes it into a token sequence.
///
/// See [`tokenize`] for the normalization rules.
pub fn read_corpus<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
	let path = path.as_ref();
	let tokens = tokenize(&read_text(path)?);
	debug!("read {} tokens from {}", tokens.len(), path.display());
	Ok(tokens)
}

/// Normalizes raw text into tokens.
///
/// - Characters of [`PUNCTUATION`] are dropped and do not count as the
///   previous character
/// - A newline directly following a newline becomes the [`EOF_TOKEN`]
///   sentinel, so each blank line marks a paragraph boundary
/// - Other characters are ASCII-lowercased
/// - The result is split on ASCII whitespace
///
/// The text is treated as starting right after a newline, so a leading
/// blank line also yields a sentinel.
pub fn tokenize(text: &str) -> Vec<String> {
	let mut normalized = String::with_capacity(text.len());
	let mut previous = '\n';

	for c in text.chars() {
		if PUNCTUATION.contains(&c) {
			continue;
		}

		if previous == '\n' && c == '\n' {
			normalized.push(' ');
			normalized.push_str(EOF_TOKEN);
			normalized.push(' ');
		} else {
			normalized.push(c.to_ascii_lowercase());
		}
		previous = c;
	}

	normalized
		.split_ascii_whitespace()
		.map(str::to_owned)
		.collect()
}
