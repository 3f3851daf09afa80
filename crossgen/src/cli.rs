//! Command-line options shared by the binaries that generate puzzles.

use crate::{
  BuildOptions, DEFAULT_GRID_SIZE, DEFAULT_MAX_ATTEMPTS, Difficulty, Error, Placeholder,
  PlaceholderLayout, WordList,
};
use clap::{Args, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LayoutArg {
  #[default]
  Center,
  TopRight,
}

impl From<LayoutArg> for PlaceholderLayout {
  fn from(value: LayoutArg) -> Self {
    match value {
      LayoutArg::Center => Self::Center,
      LayoutArg::TopRight => Self::TopRight,
    }
  }
}

#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
  /// Word list: one `WORD<TAB>clue` or `WORD | clue` per line
  pub words: PathBuf,

  /// Side length of the working grid
  #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
  pub grid_size: usize,

  /// Intersection attempts per word before it is dropped
  #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
  pub max_attempts: usize,

  /// 1 (most letters revealed) to 5 (none revealed)
  #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
  pub difficulty: u8,

  /// Reserve an image block of ROWSxCOLS cells
  #[arg(long, value_parser = parse_block)]
  pub placeholder: Option<(usize, usize)>,

  /// Where the image block goes
  #[arg(long, value_enum, default_value_t = LayoutArg::Center)]
  pub layout: LayoutArg,

  /// Seed for reproducible puzzles
  #[arg(long)]
  pub seed: Option<u64>,

  /// Log placement details
  #[arg(long)]
  pub debug: bool,
}

impl GenerateArgs {
  pub fn build_options(&self) -> BuildOptions {
    BuildOptions {
      grid_size: self.grid_size,
      max_attempts: self.max_attempts,
      placeholder: self.placeholder.map(|(rows, cols)| Placeholder {
        rows,
        cols,
        layout: self.layout.into(),
      }),
    }
  }

  pub fn difficulty(&self) -> Difficulty {
    Difficulty::from_level(self.difficulty).unwrap_or_default()
  }

  pub fn rng(&self) -> StdRng {
    match self.seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    }
  }

  pub fn load_words(&self) -> Result<WordList, Error> {
    WordList::from_path(&self.words)
  }
}

/// Parses `ROWSxCOLS`, e.g. `4x6`.
fn parse_block(s: &str) -> Result<(usize, usize), String> {
  let (rows, cols) = s
    .split_once(['x', 'X'])
    .ok_or_else(|| format!("expected ROWSxCOLS, got '{}'", s))?;
  let rows = rows.trim().parse::<usize>().map_err(|e| format!("bad row count: {}", e))?;
  let cols = cols.trim().parse::<usize>().map_err(|e| format!("bad column count: {}", e))?;
  if rows == 0 || cols == 0 {
    return Err(format!("block must be at least 1x1, got '{}'", s));
  }
  Ok((rows, cols))
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::Parser;

  #[derive(Parser)]
  struct TestCli {
    #[command(flatten)]
    generate: GenerateArgs,
  }

  #[test]
  fn block_sizes() {
    assert_eq!(parse_block("4x6"), Ok((4, 6)));
    assert_eq!(parse_block("3X3"), Ok((3, 3)));
    assert!(parse_block("4").is_err());
    assert!(parse_block("ax2").is_err());
    assert!(parse_block("0x3").is_err());
    assert!(parse_block("3x0").is_err());
  }

  #[test]
  fn options_from_arguments() {
    let cli = TestCli::parse_from([
      "test",
      "words.txt",
      "--placeholder",
      "3x4",
      "--layout",
      "top-right",
      "-d",
      "5",
    ]);
    let options = cli.generate.build_options();

    assert_eq!(options.grid_size, DEFAULT_GRID_SIZE);
    assert_eq!(
      options.placeholder,
      Some(Placeholder {
        rows: 3,
        cols: 4,
        layout: PlaceholderLayout::TopRight,
      })
    );
    assert_eq!(cli.generate.difficulty(), Difficulty::Expert);

    assert!(TestCli::try_parse_from(["test", "words.txt", "-d", "6"]).is_err());
  }
}
