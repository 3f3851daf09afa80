use clap::Parser;
use crossgen::Direction::{Across, Down};
use crossgen::cli::GenerateArgs;
use crossgen::logging::init_logger;
use crossgen::{Error, Generated, Puzzle, apply_difficulty_reveal, generate_puzzle};

/// Generate a crossword from a word list and print it.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
  #[command(flatten)]
  generate: GenerateArgs,

  /// Print the puzzle as JSON instead of a picture
  #[arg(long)]
  json: bool,
}

fn main() -> Result<(), Error> {
  let cli = Cli::parse();
  init_logger(cli.generate.debug);

  let words = cli.generate.load_words()?;
  let mut rng = cli.generate.rng();

  let Some(Generated {
    mut puzzle,
    dropped,
  }) = generate_puzzle(words.candidates(), &cli.generate.build_options(), &mut rng)
  else {
    println!(
      "Not enough usable words in {} to build a puzzle",
      cli.generate.words.display()
    );
    std::process::exit(2);
  };
  apply_difficulty_reveal(&mut puzzle, cli.generate.difficulty(), &mut rng);

  if cli.json {
    let generated = Generated { puzzle, dropped };
    let json = serde_json::to_string_pretty(&generated).unwrap_or_else(|e| {
      println!("Failed to serialize puzzle: {:?}", e);
      std::process::exit(3);
    });
    println!("{}", json);
    return Ok(());
  }

  print_puzzle(&puzzle);
  if !dropped.is_empty() {
    println!("\nLeft out:");
    for d in &dropped {
      println!("  {} ({:?})", d.candidate.word, d.reason);
    }
  }

  Ok(())
}

fn print_puzzle(puzzle: &Puzzle) {
  let (rows, cols) = puzzle.size();
  println!("{} words on a {}x{} grid", puzzle.words().len(), rows, cols);
  println!("{}", puzzle);

  for (title, direction) in [("Across", Across), ("Down", Down)] {
    println!("{}", title);
    for word in puzzle.clues(direction) {
      println!("  {:>2}. {} ({})", word.number, word.clue, word.len());
    }
  }
}
