use crate::{Pos, Puzzle};
use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// How much of the puzzle is filled in before play starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
  Beginner,
  Easy,
  #[default]
  Medium,
  Hard,
  Expert,
}

impl Difficulty {
  /// Maps a level from 1 (easiest) to 5 (hardest).
  pub fn from_level(level: u8) -> Option<Self> {
    match level {
      1 => Some(Self::Beginner),
      2 => Some(Self::Easy),
      3 => Some(Self::Medium),
      4 => Some(Self::Hard),
      5 => Some(Self::Expert),
      _ => None,
    }
  }

  pub fn level(self) -> u8 {
    match self {
      Self::Beginner => 1,
      Self::Easy => 2,
      Self::Medium => 3,
      Self::Hard => 4,
      Self::Expert => 5,
    }
  }

  /// Percentage of each word's letters to reveal.
  pub fn reveal_percent(self) -> u8 {
    match self {
      Self::Beginner => 80,
      Self::Easy => 60,
      Self::Medium => 40,
      Self::Hard => 20,
      Self::Expert => 0,
    }
  }
}

pub fn apply_difficulty_reveal<R: Rng + ?Sized>(
  puzzle: &mut Puzzle,
  difficulty: Difficulty,
  rng: &mut R,
) {
  apply_reveal(puzzle, difficulty.reveal_percent(), rng);
}

/// Pre-fills `reveal_percent` of each word's letters, rounded down, at random
/// positions.
///
/// A word never has all of its letters revealed: the budget is capped at one less
/// than its letter count, and a cell is skipped if revealing it would leave any word
/// through it without a hidden letter. Cells already revealed through a crossing
/// word count towards the budget.
pub fn apply_reveal<R: Rng + ?Sized>(puzzle: &mut Puzzle, reveal_percent: u8, rng: &mut R) {
  let percent = usize::from(reveal_percent.min(100));

  let mut words_at: HashMap<Pos, Vec<usize>> = HashMap::new();
  for (i, word) in puzzle.words.iter().enumerate() {
    for (pos, _) in word.letter_positions() {
      words_at.entry(pos).or_default().push(i);
    }
  }

  let mut hidden: Vec<usize> = puzzle
    .words
    .iter()
    .map(|w| {
      w.letter_positions()
        .filter(|&(p, _)| !puzzle.grid.get(p).is_some_and(|c| c.is_locked()))
        .count()
    })
    .collect();

  let mut revealed: HashSet<Pos> = HashSet::new();

  for i in 0..puzzle.words.len() {
    let mut cells: Vec<Pos> = puzzle.words[i].letter_positions().map(|(p, _)| p).collect();
    let n = cells.len();
    let budget = (n * percent / 100).min(n.saturating_sub(1));
    let mut shown = n - hidden[i];

    cells.shuffle(rng);
    for pos in cells {
      if shown >= budget {
        break;
      }
      if revealed.contains(&pos) {
        continue;
      }
      let Some(cell) = puzzle.grid.get_mut(pos) else {
        continue;
      };
      if cell.is_locked() {
        continue;
      }

      let crossing = &words_at[&pos];
      if crossing.iter().any(|&w| hidden[w] < 2) {
        continue;
      }

      cell.value = cell.letter;
      revealed.insert(pos);
      for &w in crossing {
        hidden[w] -= 1;
      }
      shown += 1;
    }
  }

  debug!(
    "Revealed {} cells at {}%",
    revealed.len(),
    percent
  );
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Candidate;
  use crate::Direction::{Across, Down};
  use crate::builder::Layout;
  use rand::SeedableRng;
  use rand::rngs::StdRng;

  fn revealed_in(puzzle: &Puzzle, index: usize) -> usize {
    puzzle.words()[index]
      .letter_positions()
      .filter(|&(p, _)| puzzle.grid().get(p).unwrap().value.is_some())
      .count()
  }

  #[test]
  fn levels() {
    let percents: Vec<u8> = (1..=5)
      .map(|l| Difficulty::from_level(l).unwrap().reveal_percent())
      .collect();
    assert_eq!(percents, [80, 60, 40, 20, 0]);
    assert_eq!(Difficulty::from_level(0), None);
    assert_eq!(Difficulty::from_level(6), None);
    assert_eq!(Difficulty::from_level(4).unwrap().level(), 4);
  }

  #[test]
  fn five_letters_at_eighty_percent() {
    let mut layout = Layout::new(8);
    layout.place(&Candidate::new("KIHON", ""), (0, 0), Across);
    let mut puzzle = layout.into_puzzle();

    let mut rng = StdRng::seed_from_u64(5);
    apply_difficulty_reveal(&mut puzzle, Difficulty::Beginner, &mut rng);

    assert_eq!(revealed_in(&puzzle, 0), 4);
    for cell in puzzle.grid().cells().filter(|c| c.value.is_some()) {
      assert_eq!(cell.value, cell.letter);
    }
  }

  #[test]
  fn full_reveal_leaves_one_letter_per_word() {
    let mut layout = Layout::new(8);
    layout.place(&Candidate::new("HELLO", ""), (0, 0), Across);
    layout.place(&Candidate::new("HOUSE", ""), (0, 0), Down);
    layout.place(&Candidate::new("LIME", ""), (0, 3), Down);
    layout.place(&Candidate::new("E ON", ""), (3, 3), Across);
    let puzzle = layout.into_puzzle();

    for seed in 0..20 {
      let mut puzzle = puzzle.clone();
      let mut rng = StdRng::seed_from_u64(seed);
      apply_reveal(&mut puzzle, 100, &mut rng);

      for word in puzzle.words() {
        assert!(!puzzle.is_word_complete(word), "{} fully revealed", word.id);
      }
    }
  }

  #[test]
  fn zero_percent_reveals_nothing() {
    let mut layout = Layout::new(8);
    layout.place(&Candidate::new("HELLO", ""), (0, 0), Across);
    let mut puzzle = layout.into_puzzle();

    let mut rng = StdRng::seed_from_u64(5);
    apply_difficulty_reveal(&mut puzzle, Difficulty::Expert, &mut rng);
    assert!(puzzle.grid().cells().all(|c| c.value.is_none()));
  }
}
