//! This crate is the engine behind a vocabulary crossword game. It provides no UI
//! itself, but see `crosstui` for an example of how you can use it to produce a
//! playable crossword app.
//!
//! A puzzle is produced in stages:
//!
//! 1. [build] lays a list of [Candidate] words onto a large working grid, crossing
//!    them wherever letters match.
//! 2. [trim] cuts the working grid down to its bounding box, optionally adding a
//!    decorative placeholder block.
//! 3. [apply_reveal] pre-fills some letters according to a [Difficulty].
//! 4. A [Session] wraps the finished [Puzzle] and handles the player's input.
//!
//! [generate_puzzle] runs the first two stages in one call.

use Direction::{Across, Down};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::fmt::Display;
use std::ops::Not;

mod builder;
pub mod cli;
pub mod logging;
mod reveal;
mod session;
mod trim;
mod wordlist;

pub use builder::{
  BuildOptions, Candidate, DEFAULT_GRID_SIZE, DEFAULT_MAX_ATTEMPTS, DropReason, Dropped,
  Generated, MAX_WORD_LEN, MIN_CANDIDATES, MIN_WORD_LEN, Placeholder, PlaceholderLayout, build,
  generate_puzzle,
};
pub use reveal::{Difficulty, apply_difficulty_reveal, apply_reveal};
pub use session::{Arrow, Session, SquareStyle};
pub use trim::trim;
pub use wordlist::{WordList, normalize_word};

/// The two crossword directions: `Across` and `Down`
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone, Serialize, Deserialize)]
pub enum Direction {
  Across,
  Down,
}

impl Not for Direction {
  type Output = Self;
  fn not(self) -> Self {
    match self {
      Across => Down,
      Down => Across,
    }
  }
}

/// A position in a grid: (row, column)
pub type Pos = (usize, usize);

/// The position `distance` squares after `start` in the given direction.
fn offset((row, col): Pos, direction: Direction, distance: usize) -> Pos {
  match direction {
    Across => (row, col + distance),
    Down => (row + distance, col),
  }
}

/// What a cell in the grid is used for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum CellKind {
  /// Unused background.
  Empty,
  /// A letter of one or more words.
  Filled,
  /// The first letter of at least one word. Carries a clue number.
  Start,
  /// A black separator standing in for the space inside a phrase.
  Space,
  /// Reserved for a decorative image. Never holds a letter.
  Placeholder,
}

/// A single square of a [Puzzle].
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Cell {
  pub row: usize,
  pub col: usize,
  /// The correct letter. Only set for `Filled` and `Start` cells.
  pub letter: Option<char>,
  /// What the player entered, or what was revealed for them.
  pub value: Option<char>,
  pub kind: CellKind,
  /// The word that first claimed this cell.
  pub word_id: Option<String>,
  /// The direction of the word that first claimed this cell.
  pub direction: Option<Direction>,
  /// The clue number, if a word starts here.
  pub number: Option<u32>,
}

impl Cell {
  fn empty((row, col): Pos) -> Self {
    Self {
      row,
      col,
      letter: None,
      value: None,
      kind: CellKind::Empty,
      word_id: None,
      direction: None,
      number: None,
    }
  }

  pub fn pos(&self) -> Pos {
    (self.row, self.col)
  }

  /// Whether a letter can be entered here, i.e. the cell is `Filled` or `Start`.
  pub fn is_playable(&self) -> bool {
    matches!(self.kind, CellKind::Filled | CellKind::Start)
  }

  /// Whether this is an `Empty`, `Space` or `Placeholder` cell.
  pub fn is_blocked(&self) -> bool {
    !self.is_playable()
  }

  /// A cell whose value already matches its letter can no longer be changed.
  pub fn is_locked(&self) -> bool {
    self.letter.is_some() && self.value == self.letter
  }

  fn symbol(&self) -> char {
    match self.kind {
      CellKind::Empty => '·',
      CellKind::Space => '■',
      CellKind::Placeholder => '▒',
      CellKind::Filled | CellKind::Start => self.letter.unwrap_or('?'),
    }
  }
}

/// A rectangular grid of cells, indexed by [Pos].
#[derive(Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Grid(Vec<Vec<Cell>>);

impl Grid {
  /// A grid of `rows` x `cols` empty cells.
  fn new(rows: usize, cols: usize) -> Self {
    let grid = (0..rows)
      .map(|row| (0..cols).map(|col| Cell::empty((row, col))).collect())
      .collect();
    Self(grid)
  }

  /// The size of this grid, expressed as (rows, columns).
  pub fn size(&self) -> (usize, usize) {
    (self.height(), self.width())
  }

  /// The width of this grid.
  pub fn width(&self) -> usize {
    self.0.first().map_or(0, Vec::len)
  }

  /// The height of this grid.
  pub fn height(&self) -> usize {
    self.0.len()
  }

  /// An iterator over all the positions of this grid, from left to right and top to bottom.
  pub fn positions(&self) -> GridPosIter {
    GridPosIter::new(self.size())
  }

  /// The rows of this grid, top to bottom.
  pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
    self.0.iter().map(Vec::as_slice)
  }

  /// Every cell, in reading order.
  pub fn cells(&self) -> impl Iterator<Item = &Cell> {
    self.0.iter().flatten()
  }

  /// Returns the [Cell] at the given [Pos], or `None` if it is out of bounds.
  pub fn get(&self, (r, c): Pos) -> Option<&Cell> {
    self.0.get(r).and_then(|row| row.get(c))
  }

  fn get_mut(&mut self, (r, c): Pos) -> Option<&mut Cell> {
    self.0.get_mut(r).and_then(|row| row.get_mut(c))
  }

  fn is_playable(&self, pos: Pos) -> bool {
    self.get(pos).is_some_and(Cell::is_playable)
  }

  /// The position one square away from `pos`, forwards or backwards in `direction`,
  /// or `None` at the edge of the grid.
  fn step(&self, (row, col): Pos, direction: Direction, forward: bool) -> Option<Pos> {
    let (row, col) = match (direction, forward) {
      (Across, true) => (row, col + 1),
      (Across, false) => (row, col.checked_sub(1)?),
      (Down, true) => (row + 1, col),
      (Down, false) => (row.checked_sub(1)?, col),
    };
    (row < self.height() && col < self.width()).then_some((row, col))
  }

  /// Returns the position of the next cell from `pos` that satisfies `accept`.
  /// Does not wrap around at the edge of the grid.
  fn seek(
    &self,
    mut pos: Pos,
    direction: Direction,
    forward: bool,
    accept: impl Fn(&Cell) -> bool,
  ) -> Option<Pos> {
    loop {
      pos = self.step(pos, direction, forward)?;
      if self.get(pos).is_some_and(&accept) {
        return Some(pos);
      }
    }
  }

  /// Returns the position of the next playable cell from `pos`, skipping blocked ones.
  fn next_playable(&self, pos: Pos, direction: Direction, forward: bool) -> Option<Pos> {
    self.seek(pos, direction, forward, Cell::is_playable)
  }
}

/// Iterator over all the positions in the grid.
pub struct GridPosIter {
  pos: Pos,
  size: (usize, usize),
}

impl GridPosIter {
  fn new(size: (usize, usize)) -> Self {
    Self { pos: (0, 0), size }
  }
}

impl Iterator for GridPosIter {
  type Item = Pos;
  fn next(&mut self) -> Option<Self::Item> {
    let (height, width) = self.size;
    let (row, col) = self.pos;

    if row >= height || width == 0 {
      return None;
    }

    if col == width - 1 {
      self.pos = (row + 1, 0);
    } else {
      self.pos = (row, col + 1);
    }

    Some((row, col))
  }
}

impl Debug for Grid {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    for row in &self.0 {
      for cell in row {
        write!(f, "{}", cell.symbol())?;
      }
      writeln!(f)?;
    }
    Ok(())
  }
}

impl Display for Grid {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "\n{:?}", self)
  }
}

/// A word laid out on the grid, together with its clue.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Word {
  /// The normalized word text, which doubles as its identifier.
  pub id: String,
  /// The answer. May contain interior spaces, which occupy `Space` cells.
  pub word: String,
  pub clue: String,
  pub direction: Direction,
  pub start_row: usize,
  pub start_col: usize,
  pub number: u32,
}

impl Word {
  pub fn start(&self) -> Pos {
    (self.start_row, self.start_col)
  }

  /// Number of cells the word covers, spaces included.
  pub fn len(&self) -> usize {
    self.word.chars().count()
  }

  pub fn is_empty(&self) -> bool {
    self.word.is_empty()
  }

  /// Every position the word covers, in reading order.
  pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
    let start = self.start();
    (0..self.len()).map(move |i| offset(start, self.direction, i))
  }

  /// The positions holding letters, paired with the letter. Spaces are skipped.
  pub fn letter_positions(&self) -> impl Iterator<Item = (Pos, char)> + '_ {
    self
      .positions()
      .zip(self.word.chars())
      .filter(|&(_, ch)| ch != ' ')
  }

  /// The character this word puts at `pos`, if it covers it.
  pub fn char_at(&self, pos: Pos) -> Option<char> {
    self
      .positions()
      .zip(self.word.chars())
      .find_map(|(p, ch)| (p == pos).then_some(ch))
  }

  pub fn contains(&self, pos: Pos) -> bool {
    self.char_at(pos).is_some()
  }
}

/// A generated crossword: the grid and the words laid out on it.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Puzzle {
  grid: Grid,
  words: Vec<Word>,
}

impl Puzzle {
  /// Returns a reference to the puzzle grid.
  pub fn grid(&self) -> &Grid {
    &self.grid
  }

  pub fn words(&self) -> &[Word] {
    &self.words
  }

  /// The size of the grid as (rows, columns).
  pub fn size(&self) -> (usize, usize) {
    self.grid.size()
  }

  pub fn word(&self, id: &str) -> Option<&Word> {
    self.words.iter().find(|w| w.id == id)
  }

  /// All the words passing through `pos`.
  pub fn words_at(&self, pos: Pos) -> impl Iterator<Item = &Word> {
    self.words.iter().filter(move |w| w.contains(pos))
  }

  /// The words running in one direction, ordered by clue number.
  pub fn clues(&self, direction: Direction) -> Vec<&Word> {
    let mut clues: Vec<&Word> = self
      .words
      .iter()
      .filter(|w| w.direction == direction)
      .collect();
    clues.sort_by_key(|w| w.number);
    clues
  }

  /// Reads a word back off the grid. Cells without a letter read as spaces.
  pub fn read_word(&self, word: &Word) -> String {
    word
      .positions()
      .map(|p| self.grid.get(p).and_then(|c| c.letter).unwrap_or(' '))
      .collect()
  }

  /// Whether every letter of `word` has been entered correctly.
  pub fn is_word_complete(&self, word: &Word) -> bool {
    word
      .letter_positions()
      .all(|(p, _)| self.grid.get(p).is_some_and(Cell::is_locked))
  }

  /// The first playable cell in reading order.
  pub fn first_playable(&self) -> Option<Pos> {
    self.grid.positions().find(|&p| self.grid.is_playable(p))
  }
}

impl Display for Puzzle {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.grid)
  }
}

/// The errors that may be produced by functions in this crate. Puzzle generation and
/// play never fail; only loading word lists does.
#[derive(Debug)]
pub enum Error {
  /// An [I/O error](std::io::Error) occurred.
  IoError(std::io::Error),
  /// A word list was neither valid UTF-8 nor valid ISO-8859-1.
  EncodingError(String),
  /// A line of a word list could not be understood. Lines are numbered from 1.
  ParseError { line: usize, message: String },
}

impl Display for Error {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::IoError(e) => write!(f, "I/O error: {}", e),
      Self::EncodingError(msg) => write!(f, "encoding error: {}", msg),
      Self::ParseError { line, message } => write!(f, "line {}: {}", line, message),
    }
  }
}

impl std::error::Error for Error {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::IoError(e) => Some(e),
      _ => None,
    }
  }
}

impl From<std::io::Error> for Error {
  fn from(e: std::io::Error) -> Self {
    Self::IoError(e)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn word(text: &str, direction: Direction, start: Pos) -> Word {
    Word {
      id: text.to_string(),
      word: text.to_string(),
      clue: String::new(),
      direction,
      start_row: start.0,
      start_col: start.1,
      number: 1,
    }
  }

  #[test]
  fn word_positions_skip_spaces_for_letters() {
    let w = word("MAE GERI", Across, (2, 1));

    assert_eq!(w.positions().count(), 8);
    assert_eq!(w.letter_positions().count(), 7);
    assert_eq!(w.char_at((2, 4)), Some(' '));
    assert_eq!(w.char_at((2, 5)), Some('G'));
    assert_eq!(w.char_at((3, 5)), None);
    assert!(!w.letter_positions().any(|(p, _)| p == (2, 4)));
  }

  #[test]
  fn grid_positions_in_reading_order() {
    let grid = Grid::new(2, 3);
    let positions: Vec<Pos> = grid.positions().collect();
    assert_eq!(positions, [(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);

    assert_eq!(Grid::new(0, 0).positions().count(), 0);
  }

  #[test]
  fn grid_step_stops_at_edges() {
    let grid = Grid::new(3, 3);

    assert_eq!(grid.step((0, 0), Across, false), None);
    assert_eq!(grid.step((0, 0), Down, false), None);
    assert_eq!(grid.step((2, 2), Across, true), None);
    assert_eq!(grid.step((2, 2), Down, true), None);
    assert_eq!(grid.step((1, 1), Down, true), Some((2, 1)));
    assert_eq!(grid.step((1, 1), Across, false), Some((1, 0)));
  }

  #[test]
  fn locked_cells() {
    let mut cell = Cell::empty((0, 0));
    assert!(!cell.is_locked());

    cell.kind = CellKind::Filled;
    cell.letter = Some('A');
    assert!(!cell.is_locked());

    cell.value = Some('B');
    assert!(!cell.is_locked());

    cell.value = Some('A');
    assert!(cell.is_locked());
  }
}
