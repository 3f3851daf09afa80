//! Loading `{word, clue}` pairs from plain-text word lists.
//!
//! Each non-blank line holds a word and its clue separated by a tab or a `|`:
//!
//! ```text
//! # Kicks
//! Mae geri	Front kick
//! Yoko-geri | Side kick
//! ```
//!
//! Lines starting with `#` are comments.

use crate::{Candidate, Error};
use encoding::DecoderTrap::Strict;
use encoding::Encoding;
use encoding::all::ISO_8859_1;
use log::{debug, info};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// A deduplicated list of candidates, ready to hand to [build](crate::build).
#[derive(Debug, Clone, Default)]
pub struct WordList {
  candidates: Vec<Candidate>,
}

impl WordList {
  /// Reads and parses a word list file.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
    let data: Vec<u8> = fs::read(path)?;
    Self::parse(data)
  }

  /// Parses the bytes of a word list. UTF-8 is tried first; anything else is read
  /// as ISO-8859-1.
  pub fn parse(data: Vec<u8>) -> Result<Self, Error> {
    let text = decode(data)?;

    let mut seen = HashSet::new();
    let mut candidates = vec![];

    for (index, line) in text.lines().enumerate() {
      let line = line.trim_start_matches('\u{feff}').trim();
      if line.is_empty() || line.starts_with('#') {
        continue;
      }

      let parse_error = |message: &str| Error::ParseError {
        line: index + 1,
        message: message.to_string(),
      };

      let (raw_word, clue) = line
        .split_once('\t')
        .or_else(|| line.split_once('|'))
        .ok_or_else(|| parse_error("expected a word and a clue separated by a tab or '|'"))?;

      let word = normalize_word(raw_word);
      if word.is_empty() {
        return Err(parse_error("word has no letters"));
      }
      let clue = clue.trim();
      if clue.is_empty() {
        return Err(parse_error("missing clue"));
      }

      if !seen.insert(word.clone()) {
        debug!("Skipping duplicate word {:?} on line {}", word, index + 1);
        continue;
      }
      candidates.push(Candidate::new(word, clue));
    }

    info!("Loaded {} words", candidates.len());
    Ok(Self { candidates })
  }

  pub fn candidates(&self) -> &[Candidate] {
    &self.candidates
  }

  pub fn into_candidates(self) -> Vec<Candidate> {
    self.candidates
  }

  pub fn len(&self) -> usize {
    self.candidates.len()
  }

  pub fn is_empty(&self) -> bool {
    self.candidates.is_empty()
  }
}

impl FromIterator<Candidate> for WordList {
  fn from_iter<I: IntoIterator<Item = Candidate>>(iter: I) -> Self {
    Self {
      candidates: iter.into_iter().collect(),
    }
  }
}

fn decode(data: Vec<u8>) -> Result<String, Error> {
  match String::from_utf8(data) {
    Ok(text) => Ok(text),
    Err(e) => {
      debug!("Word list is not UTF-8, reading it as ISO-8859-1");
      ISO_8859_1
        .decode(e.as_bytes(), Strict)
        .map_err(|msg| Error::EncodingError(format!("Failed parsing word list as ISO-8859-1: {}", msg)))
    }
  }
}

/// Uppercases a word, folds accented Latin letters to plain ones, and drops
/// everything except letters and single spaces between words.
///
/// ```
/// assert_eq!(crossgen::normalize_word("  mae-geri "), "MAEGERI");
/// assert_eq!(crossgen::normalize_word("Mae  Geri"), "MAE GERI");
/// assert_eq!(crossgen::normalize_word("Café crème"), "CAFE CREME");
/// ```
pub fn normalize_word(raw: &str) -> String {
  let mut word = String::with_capacity(raw.len());
  for c in raw.chars() {
    let c = fold(c);
    if c.is_ascii_alphabetic() {
      word.push(c.to_ascii_uppercase());
    } else if c.is_whitespace() && !word.is_empty() && !word.ends_with(' ') {
      word.push(' ');
    }
  }
  if word.ends_with(' ') {
    word.pop();
  }
  word
}

/// Maps accented Latin-1 letters to their base letter.
fn fold(c: char) -> char {
  match c {
    'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
    'ç' | 'Ç' => 'C',
    'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' | 'Ê' | 'Ë' => 'E',
    'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
    'ñ' | 'Ñ' => 'N',
    'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => 'O',
    'ù' | 'ú' | 'û' | 'ü' | 'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
    'ý' | 'ÿ' | 'Ý' => 'Y',
    _ => c,
  }
}
