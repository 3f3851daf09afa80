//! Interactive solving: selection, letter entry, navigation and completion tracking.

use crate::Direction::{Across, Down};
use crate::{Cell, CellKind, Direction, Pos, Puzzle, Word};
use log::{debug, info};
use std::collections::HashSet;

/// An arrow key.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Arrow {
  Up,
  Down,
  Left,
  Right,
}

impl Arrow {
  fn direction(self) -> Direction {
    match self {
      Self::Left | Self::Right => Across,
      Self::Up | Self::Down => Down,
    }
  }

  fn forward(self) -> bool {
    matches!(self, Self::Right | Self::Down)
  }
}

/// Indicates how a particular square should look. For instance, [Standard](Self::Standard)
/// might map to white, [Cursor](Self::Cursor) to yellow, and [Word](Self::Word) to gray.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SquareStyle {
  /// Default styling
  Standard,
  /// The cursor is positioned on this square.
  Cursor,
  /// The cursor is not on this square, but the word indicated by the cursor includes this square.
  Word,
}

/// A [Puzzle] being solved. The session is the only thing that changes cell values;
/// the layout itself never changes.
///
/// Every operation is a no-op on blocked cells and on locked cells (cells whose value
/// already matches their letter). Mutating operations return whether anything changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
  puzzle: Puzzle,
  selected: Option<Pos>,
  direction: Direction,
  completed: HashSet<String>,
}

impl Session {
  pub fn new(puzzle: Puzzle) -> Self {
    let mut session = Self {
      puzzle,
      selected: None,
      direction: Across,
      completed: HashSet::new(),
    };
    for pos in session.puzzle.grid.positions() {
      session.check_word_completion(pos);
    }
    session
  }

  /// Returns a reference to the puzzle, including the current cell values.
  pub fn puzzle(&self) -> &Puzzle {
    &self.puzzle
  }

  pub fn into_puzzle(self) -> Puzzle {
    self.puzzle
  }

  pub fn selected_cell(&self) -> Option<Pos> {
    self.selected
  }

  pub fn direction(&self) -> Direction {
    self.direction
  }

  /// Ids of the words entered correctly so far. Never shrinks.
  pub fn completed_word_ids(&self) -> &HashSet<String> {
    &self.completed
  }

  /// Whether every word has been completed.
  pub fn is_solved(&self) -> bool {
    self.completed.len() == self.puzzle.words.len()
  }

  /// Completed words as a rounded percentage of all words.
  pub fn progress_percent(&self) -> u8 {
    let total = self.puzzle.words.len();
    if total == 0 {
      return 0;
    }
    (100.0 * self.completed.len() as f64 / total as f64).round() as u8
  }

  /// Selects a playable cell. Selecting the already-selected cell swaps the direction
  /// instead; selecting a new cell adopts the direction of the word that owns it.
  pub fn select_cell(&mut self, row: usize, col: usize) -> bool {
    let pos = (row, col);
    let Some(owner_direction) = self.playable(pos).map(|c| c.direction) else {
      return false;
    };

    if self.selected == Some(pos) {
      self.direction = !self.direction;
    } else {
      if let Some(direction) = owner_direction {
        self.direction = direction;
      }
      self.selected = Some(pos);
    }
    true
  }

  /// Writes a letter to the selected cell. A correct letter moves the cursor on to
  /// the next unsolved cell in the current direction.
  pub fn input_letter(&mut self, letter: char) -> bool {
    let Some(pos) = self.selected else {
      return false;
    };
    if !self.write(pos, letter) {
      return false;
    }

    if self.puzzle.grid.get(pos).is_some_and(Cell::is_locked) {
      let next = self
        .puzzle
        .grid
        .seek(pos, self.direction, true, |c| c.is_playable() && !c.is_locked());
      if let Some(next) = next {
        self.selected = Some(next);
      }
    }
    true
  }

  /// Places a dragged letter on any cell. The selection does not move.
  pub fn drop_letter(&mut self, row: usize, col: usize, letter: char) -> bool {
    self.write((row, col), letter)
  }

  /// Clears the selected cell, then moves the cursor back one cell. The spaces of a
  /// phrase are passed over; any other gap stops the cursor.
  pub fn backspace(&mut self) -> bool {
    let Some(pos) = self.selected else {
      return false;
    };
    let mut changed = self.erase(pos);

    if let Some(previous) = self.previous_in_word(pos) {
      self.selected = Some(previous);
      changed = true;
    }
    changed
  }

  /// Clears the selected cell without moving.
  pub fn clear(&mut self) -> bool {
    match self.selected {
      Some(pos) => self.erase(pos),
      None => false,
    }
  }

  /// Turns to the arrow's direction and moves to the next playable cell that way.
  pub fn move_cursor(&mut self, arrow: Arrow) -> bool {
    let Some(pos) = self.selected else {
      return false;
    };
    let turned = self.direction != arrow.direction();
    self.direction = arrow.direction();

    match self
      .puzzle
      .grid
      .next_playable(pos, self.direction, arrow.forward())
    {
      Some(next) => {
        self.selected = Some(next);
        true
      }
      None => turned,
    }
  }

  /// Reveals the correct letter of the selected cell. The cursor stays put.
  pub fn hint(&mut self) -> bool {
    let Some(pos) = self.selected else {
      return false;
    };
    let Some(letter) = self.playable(pos).and_then(|c| c.letter) else {
      return false;
    };
    debug!("Hint at {:?}", pos);
    self.write(pos, letter)
  }

  /// The word through the selected cell in the current direction, or any word
  /// through it if none runs that way.
  pub fn current_word(&self) -> Option<&Word> {
    let pos = self.selected?;
    self
      .puzzle
      .words_at(pos)
      .find(|w| w.direction == self.direction)
      .or_else(|| self.puzzle.words_at(pos).next())
  }

  /// Returns the text of the clue corresponding to the cursor.
  pub fn current_clue(&self) -> Option<&str> {
    self.current_word().map(|w| w.clue.as_str())
  }

  /// Determines how a particular square should be styled.
  /// See [SquareStyle].
  pub fn square_style(&self, pos: Pos) -> SquareStyle {
    if self.selected == Some(pos) {
      SquareStyle::Cursor
    } else if self.current_word().is_some_and(|w| w.contains(pos)) {
      SquareStyle::Word
    } else {
      SquareStyle::Standard
    }
  }

  /// The letters still missing from the grid, sorted, for a drag-and-drop tray.
  pub fn letter_bank(&self) -> Vec<char> {
    let mut letters: Vec<char> = self
      .puzzle
      .grid
      .cells()
      .filter(|c| c.is_playable() && !c.is_locked())
      .filter_map(|c| c.letter)
      .collect();
    letters.sort_unstable();
    letters
  }

  fn previous_in_word(&self, mut pos: Pos) -> Option<Pos> {
    let grid = &self.puzzle.grid;
    loop {
      pos = grid.step(pos, self.direction, false)?;
      match grid.get(pos)?.kind {
        CellKind::Space => continue,
        CellKind::Filled | CellKind::Start => return Some(pos),
        CellKind::Empty | CellKind::Placeholder => return None,
      }
    }
  }

  fn playable(&self, pos: Pos) -> Option<&Cell> {
    self.puzzle.grid.get(pos).filter(|c| c.is_playable())
  }

  /// Sets the value of an unlocked playable cell and checks the words through it.
  fn write(&mut self, pos: Pos, letter: char) -> bool {
    if !letter.is_ascii_alphabetic() {
      return false;
    }
    let letter = letter.to_ascii_uppercase();

    let Some(cell) = self.puzzle.grid.get_mut(pos) else {
      return false;
    };
    if cell.is_blocked() || cell.is_locked() {
      return false;
    }
    let changed = cell.value != Some(letter);
    cell.value = Some(letter);

    self.check_word_completion(pos);
    changed
  }

  fn erase(&mut self, pos: Pos) -> bool {
    match self.puzzle.grid.get_mut(pos) {
      Some(cell) if cell.is_playable() && !cell.is_locked() && cell.value.is_some() => {
        cell.value = None;
        true
      }
      _ => false,
    }
  }

  /// Adds every word through `pos` whose letters are all correct to the completed
  /// set. Returns whether any word was newly completed.
  fn check_word_completion(&mut self, pos: Pos) -> bool {
    let newly_completed: Vec<String> = self
      .puzzle
      .words_at(pos)
      .filter(|w| !self.completed.contains(&w.id) && self.puzzle.is_word_complete(w))
      .map(|w| w.id.clone())
      .collect();

    for id in &newly_completed {
      debug!("Completed {:?}", id);
    }
    let any = !newly_completed.is_empty();
    self.completed.extend(newly_completed);

    if any && self.is_solved() {
      info!("Puzzle solved");
    }
    any
  }
}
