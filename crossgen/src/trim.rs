//! Cuts a working grid down to the cells actually in use.

use crate::{Cell, CellKind, Grid, Placeholder, PlaceholderLayout, Puzzle, Word};
use log::debug;

/// Returns a copy of `puzzle` reduced to the smallest rectangle containing every
/// non-empty cell (placeholder cells included), with all coordinates re-indexed.
///
/// With a [TopRight](PlaceholderLayout::TopRight) placeholder, the trimmed grid is
/// then widened to make room for the block to the right of the words.
pub fn trim(puzzle: &Puzzle, placeholder: Option<Placeholder>) -> Puzzle {
  let trimmed = trim_to_bounds(puzzle);
  match placeholder {
    Some(p) if p.layout == PlaceholderLayout::TopRight => append_placeholder(&trimmed, p),
    _ => trimmed,
  }
}

fn trim_to_bounds(puzzle: &Puzzle) -> Puzzle {
  let used = puzzle
    .grid
    .cells()
    .filter(|c| c.kind != CellKind::Empty)
    .map(Cell::pos);

  let bounds = used.fold(None::<(usize, usize, usize, usize)>, |bounds, (r, c)| {
    Some(match bounds {
      None => (r, r, c, c),
      Some((r0, r1, c0, c1)) => (r0.min(r), r1.max(r), c0.min(c), c1.max(c)),
    })
  });
  let Some((min_row, max_row, min_col, max_col)) = bounds else {
    return puzzle.clone();
  };

  let grid = puzzle.grid.0[min_row..=max_row]
    .iter()
    .map(|row| {
      row[min_col..=max_col]
        .iter()
        .map(|cell| Cell {
          row: cell.row - min_row,
          col: cell.col - min_col,
          ..cell.clone()
        })
        .collect()
    })
    .collect();

  let words = puzzle
    .words
    .iter()
    .map(|w| Word {
      start_row: w.start_row - min_row,
      start_col: w.start_col - min_col,
      ..w.clone()
    })
    .collect();

  let trimmed = Puzzle {
    grid: Grid(grid),
    words,
  };
  debug!(
    "Trimmed {:?} grid to {:?}",
    puzzle.size(),
    trimmed.size()
  );
  trimmed
}

/// Widens the grid by `placeholder.cols` columns and stamps the block into the new
/// top-right corner. Words keep their coordinates.
fn append_placeholder(puzzle: &Puzzle, placeholder: Placeholder) -> Puzzle {
  let (base_rows, base_cols) = puzzle.size();
  let rows = base_rows.max(placeholder.rows);
  let cols = base_cols + placeholder.cols;

  let mut grid = Grid::new(rows, cols);
  for cell in puzzle.grid.cells() {
    if let Some(target) = grid.get_mut(cell.pos()) {
      *target = cell.clone();
    }
  }
  for row in 0..placeholder.rows {
    for col in base_cols..cols {
      if let Some(cell) = grid.get_mut((row, col)) {
        cell.kind = CellKind::Placeholder;
      }
    }
  }

  Puzzle {
    grid,
    words: puzzle.words.clone(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Direction::{Across, Down};
  use crate::builder::Layout;
  use crate::{Candidate, Pos};

  fn sample() -> Puzzle {
    let mut layout = Layout::new(12);
    layout.place(&Candidate::new("HELLO", ""), (5, 3), Across);
    layout.place(&Candidate::new("LIME", ""), (5, 5), Down);
    layout.into_puzzle()
  }

  fn is_empty_line<'a>(mut cells: impl Iterator<Item = &'a Cell>) -> bool {
    cells.all(|c| c.kind == CellKind::Empty)
  }

  #[test]
  fn trims_to_bounding_box() {
    let puzzle = trim(&sample(), None);

    assert_eq!(puzzle.size(), (4, 5));
    let starts: Vec<Pos> = puzzle.words().iter().map(Word::start).collect();
    assert_eq!(starts, [(0, 0), (0, 2)]);

    for word in puzzle.words() {
      assert_eq!(puzzle.read_word(word), word.word);
    }
    for pos in puzzle.grid().positions() {
      assert_eq!(puzzle.grid().get(pos).unwrap().pos(), pos);
    }

    let grid = puzzle.grid();
    let rows: Vec<&[Cell]> = grid.rows().collect();
    assert!(!is_empty_line(rows[0].iter()));
    assert!(!is_empty_line(rows[3].iter()));
    assert!(!is_empty_line(rows.iter().map(|r| &r[0])));
    assert!(!is_empty_line(rows.iter().map(|r| &r[4])));

    #[rustfmt::skip]
    assert_eq!(
      puzzle.to_string(),
      concat!(
        "\n",
        "HELLO\n",
        "··I··\n",
        "··M··\n",
        "··E··\n",
      )
    );
  }

  #[test]
  fn center_placeholder_is_kept_inside_bounds() {
    let mut layout = Layout::new(12);
    layout.place(&Candidate::new("HELLO", ""), (2, 3), Across);
    let mut puzzle = layout.into_puzzle();
    for col in 4..6 {
      puzzle.grid.get_mut((6, col)).unwrap().kind = CellKind::Placeholder;
    }

    let puzzle = trim(&puzzle, None);
    assert_eq!(puzzle.size(), (5, 5));
    assert_eq!(puzzle.grid().get((4, 1)).unwrap().kind, CellKind::Placeholder);
  }

  #[test]
  fn top_right_placeholder_is_appended() {
    let placeholder = Placeholder {
      rows: 6,
      cols: 3,
      layout: PlaceholderLayout::TopRight,
    };
    let puzzle = trim(&sample(), Some(placeholder));

    assert_eq!(puzzle.size(), (6, 8));
    for pos in puzzle.grid().positions() {
      let cell = puzzle.grid().get(pos).unwrap();
      assert_eq!(cell.pos(), pos);
      if pos.1 >= 5 {
        assert_eq!(cell.kind, CellKind::Placeholder);
      } else if pos.0 >= 4 {
        assert_eq!(cell.kind, CellKind::Empty);
      }
    }
    for word in puzzle.words() {
      assert_eq!(puzzle.read_word(word), word.word);
    }

    let short = Placeholder { rows: 2, ..placeholder };
    let puzzle = trim(&sample(), Some(short));
    assert_eq!(puzzle.size(), (4, 8));
    assert_eq!(puzzle.grid().get((1, 7)).unwrap().kind, CellKind::Placeholder);
    assert_eq!(puzzle.grid().get((2, 7)).unwrap().kind, CellKind::Empty);
  }
}
