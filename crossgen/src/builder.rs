//! Lays candidate words onto a working grid by randomized intersection search.

use crate::Direction::{Across, Down};
use crate::{CellKind, Direction, Grid, Pos, Puzzle, Word, offset, trim};
use log::{debug, info};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashSet;

/// Shortest word accepted, in characters.
pub const MIN_WORD_LEN: usize = 3;
/// Longest word accepted, in characters.
pub const MAX_WORD_LEN: usize = 20;
/// A puzzle needs at least this many usable candidates.
pub const MIN_CANDIDATES: usize = 3;
pub const DEFAULT_GRID_SIZE: usize = 40;
pub const DEFAULT_MAX_ATTEMPTS: usize = 200;

/// A word and its clue, as supplied by a word source.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Candidate {
  /// Uppercase `A-Z`, with single interior spaces for phrases.
  pub word: String,
  pub clue: String,
}

impl Candidate {
  pub fn new(word: impl Into<String>, clue: impl Into<String>) -> Self {
    Self {
      word: word.into(),
      clue: clue.into(),
    }
  }

  fn len(&self) -> usize {
    self.word.chars().count()
  }
}

/// Where the decorative placeholder block goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaceholderLayout {
  /// Stamped in the middle of the working grid before any word is placed.
  #[default]
  Center,
  /// Appended to the right of the trimmed grid.
  TopRight,
}

/// A rectangular block reserved for an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
  pub rows: usize,
  pub cols: usize,
  pub layout: PlaceholderLayout,
}

/// Configuration for puzzle generation
#[derive(Debug, Clone)]
pub struct BuildOptions {
  /// Side length of the square working grid.
  pub grid_size: usize,
  /// How many intersection attempts each word gets before it is dropped.
  pub max_attempts: usize,
  pub placeholder: Option<Placeholder>,
}

impl Default for BuildOptions {
  fn default() -> Self {
    Self {
      grid_size: DEFAULT_GRID_SIZE,
      max_attempts: DEFAULT_MAX_ATTEMPTS,
      placeholder: None,
    }
  }
}

/// Why a candidate is missing from the puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropReason {
  /// Shorter than [MIN_WORD_LEN] or longer than [MAX_WORD_LEN].
  Length,
  /// Contains something other than `A-Z` and interior spaces.
  Characters,
  /// Same text as a candidate that was accepted earlier.
  Duplicate,
  /// No valid intersection was found within the attempt budget.
  Unplaceable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dropped {
  pub candidate: Candidate,
  pub reason: DropReason,
}

/// The result of a successful build: the puzzle and every candidate left out of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generated {
  pub puzzle: Puzzle,
  pub dropped: Vec<Dropped>,
}

impl Generated {
  /// The share of usable candidates that made it onto the grid, from 0 to 1.
  /// Candidates filtered out before placement do not count.
  pub fn placement_rate(&self) -> f64 {
    let placed = self.puzzle.words().len();
    let unplaceable = self
      .dropped
      .iter()
      .filter(|d| d.reason == DropReason::Unplaceable)
      .count();
    placed as f64 / (placed + unplaceable) as f64
  }
}

/// Builds and trims a puzzle. Returns `None` when there is not enough usable content.
pub fn generate_puzzle<R: Rng + ?Sized>(
  candidates: &[Candidate],
  options: &BuildOptions,
  rng: &mut R,
) -> Option<Generated> {
  let Generated { puzzle, dropped } = build(candidates, options, rng)?;
  let puzzle = trim(&puzzle, options.placeholder);
  Some(Generated { puzzle, dropped })
}

/// Lays out `candidates` on an untrimmed `grid_size` x `grid_size` grid.
///
/// Longer words go first. Each later word is crossed over a randomly chosen word
/// already on the grid, trying every pair of matching letters; words that cannot be
/// placed within `max_attempts` are left out and reported in [Generated::dropped].
///
/// Returns `None` if fewer than [MIN_CANDIDATES] candidates are usable, or if the
/// longest word does not fit on the grid at all.
pub fn build<R: Rng + ?Sized>(
  candidates: &[Candidate],
  options: &BuildOptions,
  rng: &mut R,
) -> Option<Generated> {
  let (mut usable, mut dropped) = filter_candidates(candidates);
  if usable.len() < MIN_CANDIDATES {
    info!(
      "Only {} usable candidates, need at least {}",
      usable.len(),
      MIN_CANDIDATES
    );
    return None;
  }

  // Shuffle first so that words of equal length come out in random order.
  usable.shuffle(rng);
  usable.sort_by_key(|c| Reverse(c.len()));

  let mut layout = Layout::new(options.grid_size);
  let center_block = match options.placeholder {
    Some(p) if p.layout == PlaceholderLayout::Center => {
      let block = Block::centered(options.grid_size, p.rows, p.cols);
      layout.stamp_placeholder(block);
      Some(block)
    }
    _ => None,
  };

  let mut usable = usable.into_iter();
  let anchor = usable.next()?;
  if !layout.place_anchor(&anchor, center_block) {
    info!("Anchor word {:?} does not fit on the grid", anchor.word);
    return None;
  }

  for candidate in usable {
    if !layout.place_crossing(&candidate, options.max_attempts, rng) {
      debug!("Dropping {:?}: no valid intersection", candidate.word);
      dropped.push(Dropped {
        candidate,
        reason: DropReason::Unplaceable,
      });
    }
  }

  let puzzle = layout.into_puzzle();
  info!(
    "Placed {} words, dropped {}",
    puzzle.words().len(),
    dropped.len()
  );
  Some(Generated { puzzle, dropped })
}

/// Splits candidates into those that can be placed and those that cannot.
fn filter_candidates(candidates: &[Candidate]) -> (Vec<Candidate>, Vec<Dropped>) {
  let mut seen = HashSet::new();
  let mut usable = Vec::with_capacity(candidates.len());
  let mut dropped = vec![];

  for candidate in candidates {
    let reason = if !(MIN_WORD_LEN..=MAX_WORD_LEN).contains(&candidate.len()) {
      Some(DropReason::Length)
    } else if !is_well_formed(&candidate.word) {
      Some(DropReason::Characters)
    } else if !seen.insert(candidate.word.as_str()) {
      Some(DropReason::Duplicate)
    } else {
      None
    };

    match reason {
      Some(reason) => {
        debug!("Dropping {:?}: {:?}", candidate.word, reason);
        dropped.push(Dropped {
          candidate: candidate.clone(),
          reason,
        });
      }
      None => usable.push(candidate.clone()),
    }
  }

  (usable, dropped)
}

/// Uppercase letters, with spaces only between letters.
fn is_well_formed(word: &str) -> bool {
  word.chars().all(|c| c.is_ascii_uppercase() || c == ' ')
    && !word.starts_with(' ')
    && !word.ends_with(' ')
}

/// A rectangle of the grid: top-left corner and size.
#[derive(Debug, Clone, Copy)]
struct Block {
  top: usize,
  left: usize,
  rows: usize,
  cols: usize,
}

impl Block {
  fn centered(grid_size: usize, rows: usize, cols: usize) -> Self {
    let rows = rows.min(grid_size);
    let cols = cols.min(grid_size);
    Self {
      top: (grid_size - rows) / 2,
      left: (grid_size - cols) / 2,
      rows,
      cols,
    }
  }
}

/// The working state of a build: a grid being filled and the words placed so far.
pub(crate) struct Layout {
  grid: Grid,
  words: Vec<Word>,
  next_number: u32,
}

impl Layout {
  pub(crate) fn new(size: usize) -> Self {
    Self {
      grid: Grid::new(size, size),
      words: vec![],
      next_number: 1,
    }
  }

  fn stamp_placeholder(&mut self, block: Block) {
    for row in block.top..block.top + block.rows {
      for col in block.left..block.left + block.cols {
        if let Some(cell) = self.grid.get_mut((row, col)) {
          cell.kind = CellKind::Placeholder;
        }
      }
    }
  }

  /// Whether `chars` can be written starting at `start` in `direction`. Every cell
  /// must be in bounds and either empty, or already hold the same letter, or be a
  /// space/placeholder cell receiving a space.
  fn fits(&self, chars: &[char], (row, col): (isize, isize), direction: Direction) -> bool {
    if row < 0 || col < 0 {
      return false;
    }
    let start = (row as usize, col as usize);

    chars.iter().enumerate().all(|(i, &ch)| {
      let Some(cell) = self.grid.get(offset(start, direction, i)) else {
        return false;
      };
      match cell.kind {
        CellKind::Empty => true,
        CellKind::Filled | CellKind::Start => cell.letter == Some(ch),
        CellKind::Space | CellKind::Placeholder => ch == ' ',
      }
    })
  }

  /// Writes a candidate onto the grid and records it as a [Word]. The caller is
  /// responsible for checking that it [fits](Self::fits).
  pub(crate) fn place(&mut self, candidate: &Candidate, start: Pos, direction: Direction) {
    for (i, ch) in candidate.word.chars().enumerate() {
      let Some(cell) = self.grid.get_mut(offset(start, direction, i)) else {
        continue;
      };
      match (cell.kind, ch) {
        (CellKind::Empty, ' ') => cell.kind = CellKind::Space,
        (CellKind::Empty, _) => {
          cell.kind = CellKind::Filled;
          cell.letter = Some(ch);
          cell.word_id = Some(candidate.word.clone());
          cell.direction = Some(direction);
        }
        // Crossings keep the letter and owner they already have.
        _ => {}
      }
    }

    let number = match self.grid.get_mut(start) {
      Some(cell) => match cell.number {
        Some(number) => number,
        None => {
          let number = self.next_number;
          self.next_number += 1;
          cell.number = Some(number);
          cell.kind = CellKind::Start;
          number
        }
      },
      None => 0,
    };

    self.words.push(Word {
      id: candidate.word.clone(),
      word: candidate.word.clone(),
      clue: candidate.clue.clone(),
      direction,
      start_row: start.0,
      start_col: start.1,
      number,
    });
  }

  /// Places the first word across the middle of the grid, moving it above the
  /// placeholder block if it would run into it.
  fn place_anchor(&mut self, candidate: &Candidate, center_block: Option<Block>) -> bool {
    let chars: Vec<char> = candidate.word.chars().collect();
    let size = self.grid.width();
    if chars.len() > size {
      return false;
    }

    let col = (size - chars.len()) / 2;
    let mut rows = vec![size / 2];
    if let Some(block) = center_block {
      if let Some(above) = block.top.checked_sub(1) {
        rows.push(above);
      }
      rows.push(block.top + block.rows);
    }

    for row in rows {
      if self.fits(&chars, (row as isize, col as isize), Across) {
        self.place(candidate, (row, col), Across);
        return true;
      }
    }
    false
  }

  /// Randomized intersection search. Each attempt picks a placed word at random and
  /// tries every pair of matching letters for a perpendicular crossing.
  fn place_crossing<R: Rng + ?Sized>(
    &mut self,
    candidate: &Candidate,
    max_attempts: usize,
    rng: &mut R,
  ) -> bool {
    let chars: Vec<char> = candidate.word.chars().collect();

    for attempt in 0..max_attempts {
      let Some(target) = self.words.choose(rng) else {
        return false;
      };
      let direction = !target.direction;

      let found = target
        .positions()
        .zip(target.word.chars())
        .filter(|&(_, t)| t != ' ')
        .flat_map(|((row, col), t)| {
          chars
            .iter()
            .enumerate()
            .filter(move |&(_, &c)| c == t)
            .map(move |(i, _)| match direction {
              Across => (row as isize, col as isize - i as isize),
              Down => (row as isize - i as isize, col as isize),
            })
        })
        .find(|&start| self.fits(&chars, start, direction));

      if let Some((row, col)) = found {
        debug!(
          "Placed {:?} {:?} at ({}, {}) after {} attempts",
          candidate.word,
          direction,
          row,
          col,
          attempt + 1
        );
        self.place(candidate, (row as usize, col as usize), direction);
        return true;
      }
    }
    false
  }

  pub(crate) fn into_puzzle(self) -> Puzzle {
    Puzzle {
      grid: self.grid,
      words: self.words,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::SeedableRng;
  use rand::rngs::StdRng;

  fn candidates(words: &[&str]) -> Vec<Candidate> {
    words
      .iter()
      .map(|w| Candidate::new(*w, format!("clue for {}", w)))
      .collect()
  }

  #[test]
  fn too_few_candidates() {
    let mut rng = StdRng::seed_from_u64(1);
    let options = BuildOptions::default();

    assert!(build(&candidates(&["AB"]), &options, &mut rng).is_none());
    assert!(build(&candidates(&["HELLO", "WORLD"]), &options, &mut rng).is_none());
    // Filtering happens before counting.
    assert!(build(&candidates(&["HELLO", "WORLD", "AB"]), &options, &mut rng).is_none());
  }

  #[test]
  fn filter_reasons() {
    let (usable, dropped) = filter_candidates(&candidates(&[
      "HELLO",
      "AB",
      "ABCDEFGHIJKLMNOPQRSTU",
      "hello",
      " LEAD",
      "HELLO",
      "MAE GERI",
    ]));

    let usable: Vec<&str> = usable.iter().map(|c| c.word.as_str()).collect();
    assert_eq!(usable, ["HELLO", "MAE GERI"]);

    let reasons: Vec<DropReason> = dropped.iter().map(|d| d.reason).collect();
    assert_eq!(
      reasons,
      [
        DropReason::Length,
        DropReason::Length,
        DropReason::Characters,
        DropReason::Characters,
        DropReason::Duplicate,
      ]
    );
  }

  #[test]
  fn anchor_is_longest_and_centered() {
    let mut rng = StdRng::seed_from_u64(7);
    let options = BuildOptions {
      grid_size: 20,
      ..Default::default()
    };
    let generated = build(
      &candidates(&["UKE", "SEIKEN", "MAE GERI"]),
      &options,
      &mut rng,
    )
    .unwrap();

    let anchor = &generated.puzzle.words()[0];
    assert_eq!(anchor.word, "MAE GERI");
    assert_eq!(anchor.direction, Across);
    assert_eq!(anchor.start(), (10, 6));
    assert_eq!(anchor.number, 1);

    let space = generated.puzzle.grid().get((10, 9)).unwrap();
    assert_eq!(space.kind, CellKind::Space);
    assert_eq!(space.letter, None);
  }

  #[test]
  fn anchor_moves_above_center_placeholder() {
    let mut rng = StdRng::seed_from_u64(3);
    let options = BuildOptions {
      grid_size: 20,
      placeholder: Some(Placeholder {
        rows: 4,
        cols: 4,
        layout: PlaceholderLayout::Center,
      }),
      ..Default::default()
    };
    let generated = build(&candidates(&["KARATE", "KATA", "DOJO"]), &options, &mut rng).unwrap();

    let anchor = &generated.puzzle.words()[0];
    assert_eq!(anchor.word, "KARATE");
    assert_eq!(anchor.start(), (7, 7));

    let placeholders = generated
      .puzzle
      .grid()
      .cells()
      .filter(|c| c.kind == CellKind::Placeholder)
      .count();
    assert_eq!(placeholders, 16);
  }

  #[test]
  fn anchor_too_long_for_grid() {
    let mut rng = StdRng::seed_from_u64(3);
    let options = BuildOptions {
      grid_size: 4,
      ..Default::default()
    };
    assert!(build(&candidates(&["KARATE", "KATA", "DOJO"]), &options, &mut rng).is_none());
  }

  #[test]
  fn unplaceable_words_are_reported() {
    let mut rng = StdRng::seed_from_u64(11);
    let options = BuildOptions::default();
    let generated = build(&candidates(&["HELLO", "WORLD", "XXX"]), &options, &mut rng).unwrap();

    let ids: Vec<&str> = generated.puzzle.words().iter().map(|w| w.id.as_str()).collect();
    assert_eq!(ids.len(), 2);
    assert!(!ids.contains(&"XXX"));
    assert_eq!(
      generated.dropped,
      [Dropped {
        candidate: Candidate::new("XXX", "clue for XXX"),
        reason: DropReason::Unplaceable,
      }]
    );
    assert!((generated.placement_rate() - 2.0 / 3.0).abs() < 1e-9);
  }

  #[test]
  fn fits_rules() {
    let mut layout = Layout::new(10);
    layout.place(&Candidate::new("HELLO", ""), (2, 2), Across);
    layout.stamp_placeholder(Block {
      top: 6,
      left: 0,
      rows: 1,
      cols: 10,
    });

    let chars = |s: &str| s.chars().collect::<Vec<char>>();

    // Crossing on a matching letter.
    assert!(layout.fits(&chars("SHE"), (1, 2), Down));
    // Crossing on a different letter.
    assert!(!layout.fits(&chars("SHE"), (1, 3), Down));
    // Out of bounds.
    assert!(!layout.fits(&chars("SHE"), (-1, 3), Down));
    assert!(!layout.fits(&chars("HELLO"), (0, 7), Across));
    // Letters may not land in the placeholder, spaces may.
    assert!(!layout.fits(&chars("ABCDEF"), (3, 0), Down));
    assert!(layout.fits(&chars("ABC D"), (3, 0), Down));
    // A space may not land on a letter.
    assert!(!layout.fits(&chars("AB CD"), (0, 4), Down));
  }

  #[test]
  fn crossings_keep_existing_numbers() {
    let mut layout = Layout::new(10);
    layout.place(&Candidate::new("HELLO", ""), (0, 0), Across);
    layout.place(&Candidate::new("HOUSE", ""), (0, 0), Down);
    layout.place(&Candidate::new("LIME", ""), (0, 3), Down);
    let puzzle = layout.into_puzzle();

    let numbers: Vec<u32> = puzzle.words().iter().map(|w| w.number).collect();
    assert_eq!(numbers, [1, 1, 2]);

    let start = puzzle.grid().get((0, 0)).unwrap();
    assert_eq!(start.kind, CellKind::Start);
    assert_eq!(start.word_id.as_deref(), Some("HELLO"));
    assert_eq!(start.direction, Some(Across));

    let crossing = puzzle.grid().get((0, 3)).unwrap();
    assert_eq!(crossing.kind, CellKind::Start);
    assert_eq!(crossing.number, Some(2));
    assert_eq!(crossing.word_id.as_deref(), Some("HELLO"));
  }
}
