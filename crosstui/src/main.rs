use std::io;

use clap::Parser;
use crossgen::Direction::{Across, Down};
use crossgen::cli::GenerateArgs;
use crossgen::logging::init_logger;
use crossgen::{
  Arrow, BuildOptions, Candidate, Cell, CellKind, Difficulty, Direction, Session,
  SquareStyle, apply_difficulty_reveal, generate_puzzle,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::info;
use rand::rngs::StdRng;
use ratatui::{
  DefaultTerminal, Frame,
  buffer::Buffer,
  layout::{Constraint, Flex, Layout, Rect},
  style::{Color, Modifier, Style, Stylize},
  text::{Line, Span},
  widgets::{Block, Padding, Paragraph, Widget, Wrap},
};
use ratatui_macros::{line, span};

const SQUARE_WIDTH: u16 = 3;
const SQUARE_HEIGHT: u16 = 1;
const GAP: u16 = 1;

/// Solve a crossword generated from a word list
#[derive(Parser)]
#[command(version, about)]
struct Cli {
  #[command(flatten)]
  generate: GenerateArgs,
}

fn main() -> io::Result<()> {
  let cli = Cli::parse();
  // stderr shares the terminal, so only log when asked to.
  if cli.generate.debug {
    init_logger(true);
  }

  let words = cli.generate.load_words().unwrap_or_else(|e| {
    println!("Failed to load word list: {}", e);
    std::process::exit(1);
  });

  let mut app = App {
    candidates: words.into_candidates(),
    options: cli.generate.build_options(),
    difficulty: cli.generate.difficulty(),
    rng: cli.generate.rng(),
    session: None,
    running: true,
  };
  if !app.regenerate() {
    println!(
      "Not enough usable words in {} to build a puzzle",
      cli.generate.words.display()
    );
    std::process::exit(2);
  }

  let terminal = ratatui::init();
  let result = app.run(terminal);
  ratatui::restore();
  result
}

fn square_style(value: SquareStyle) -> Style {
  let base_style = match value {
    SquareStyle::Standard => Style::new().bg(Color::White),
    SquareStyle::Cursor => Style::new().bg(Color::LightRed),
    SquareStyle::Word => Style::new().bg(Color::LightYellow),
  };
  base_style.fg(Color::Black).add_modifier(Modifier::BOLD)
}

pub struct App {
  candidates: Vec<Candidate>,
  options: BuildOptions,
  difficulty: Difficulty,
  rng: StdRng,
  session: Option<Session>,
  running: bool,
}

impl App {
  /// Builds a fresh puzzle from the word list, replacing the current session.
  /// Returns false if there are not enough words.
  fn regenerate(&mut self) -> bool {
    let Some(generated) = generate_puzzle(&self.candidates, &self.options, &mut self.rng) else {
      return false;
    };
    let mut puzzle = generated.puzzle;
    info!(
      "New puzzle: {} words, {} left out",
      puzzle.words().len(),
      generated.dropped.len()
    );
    apply_difficulty_reveal(&mut puzzle, self.difficulty, &mut self.rng);

    let mut session = Session::new(puzzle);
    if let Some((row, col)) = session.puzzle().first_playable() {
      session.select_cell(row, col);
    }
    self.session = Some(session);
    true
  }

  pub fn run(mut self, mut terminal: DefaultTerminal) -> io::Result<()> {
    self.running = true;
    while self.running {
      terminal.draw(|frame| self.draw(frame))?;
      self.handle_crossterm_events()?;
    }
    Ok(())
  }

  fn draw(&self, frame: &mut Frame) {
    frame.render_widget(self, frame.area());
  }

  /// Reads the crossterm events and updates the state of [`App`].
  fn handle_crossterm_events(&mut self) -> io::Result<()> {
    match event::read()? {
      // it's important to check KeyEventKind::Press to avoid handling key release events
      Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
      Event::Mouse(_) => {}
      Event::Resize(_, _) => {}
      _ => {}
    }
    Ok(())
  }

  /// Handles the key events and updates the state of [`App`].
  fn on_key_event(&mut self, key: KeyEvent) {
    match (key.modifiers, key.code) {
      (_, KeyCode::Esc) | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => {
        self.quit()
      }
      (KeyModifiers::CONTROL, KeyCode::Char('n') | KeyCode::Char('N')) => {
        self.regenerate();
      }
      _ => self.on_puzzle_key(key),
    }
  }

  fn on_puzzle_key(&mut self, key: KeyEvent) {
    let Some(session) = self.session.as_mut() else {
      return;
    };
    match key.code {
      KeyCode::Char(c) if c.is_ascii_alphabetic() && !key.modifiers.contains(KeyModifiers::CONTROL) => {
        session.input_letter(c);
      }
      KeyCode::Backspace => {
        session.backspace();
      }
      KeyCode::Delete => {
        session.clear();
      }
      KeyCode::F(2) => {
        session.hint();
      }
      KeyCode::Enter => {
        if let Some((row, col)) = session.selected_cell() {
          session.select_cell(row, col);
        }
      }
      KeyCode::Up => {
        session.move_cursor(Arrow::Up);
      }
      KeyCode::Down => {
        session.move_cursor(Arrow::Down);
      }
      KeyCode::Left => {
        session.move_cursor(Arrow::Left);
      }
      KeyCode::Right => {
        session.move_cursor(Arrow::Right);
      }
      _ => {}
    }
  }

  /// Set running to false to quit the application.
  fn quit(&mut self) {
    self.running = false;
  }
}

fn render_square(cell: &Cell, style: SquareStyle, square_area: Rect, buf: &mut Buffer) {
  match cell.kind {
    CellKind::Empty => {}
    CellKind::Space => Block::new()
      .style(Style::new().bg(Color::Black))
      .render(square_area, buf),
    CellKind::Placeholder => Paragraph::new("░".repeat(SQUARE_WIDTH as usize))
      .style(Style::new().fg(Color::Cyan).bg(Color::DarkGray))
      .render(square_area, buf),
    CellKind::Filled | CellKind::Start => {
      let mut style = square_style(style);
      if cell.is_locked() {
        style = style.fg(Color::Green);
      } else if cell.value.is_some() {
        style = style.fg(Color::Red);
      }
      let text = cell.value.map(String::from).unwrap_or_default();
      Paragraph::new(text)
        .style(style)
        .centered()
        .render(square_area, buf);
    }
  }
}

/// Terminal cells taken up by `count` squares of `step` cells each. Saturates for
/// grids too large to draw.
fn extent(count: usize, step: u16) -> u16 {
  u16::try_from(count).unwrap_or(u16::MAX).saturating_mul(step)
}

fn render_grid(session: &Session, area: Rect, buf: &mut Buffer) {
  let grid = session.puzzle().grid();
  let (rows, cols) = grid.size();

  let puzzle_area = center(
    area,
    Constraint::Length(extent(cols, SQUARE_WIDTH + GAP)),
    Constraint::Length(extent(rows, SQUARE_HEIGHT + GAP)),
  );

  for pos in grid.positions() {
    let Some(cell) = grid.get(pos) else {
      continue;
    };
    let (row, col) = pos;
    let square_area = Rect {
      x: puzzle_area.x.saturating_add(extent(col, SQUARE_WIDTH + GAP)),
      y: puzzle_area.y.saturating_add(extent(row, SQUARE_HEIGHT + GAP)),
      width: SQUARE_WIDTH,
      height: SQUARE_HEIGHT,
    }
    .intersection(area);
    if square_area.is_empty() {
      continue;
    }
    render_square(cell, session.square_style(pos), square_area, buf);
  }
}

fn clue_lines(session: &Session, direction: Direction) -> Vec<Line<'_>> {
  let current = session.current_word().map(|w| w.id.as_str());
  session
    .puzzle()
    .clues(direction)
    .into_iter()
    .map(|word| {
      let mut style = Style::new();
      if session.completed_word_ids().contains(&word.id) {
        style = style.add_modifier(Modifier::CROSSED_OUT).fg(Color::DarkGray);
      }
      if current == Some(word.id.as_str()) {
        style = style.bold().fg(Color::LightRed);
      }
      Line::from(Span::styled(format!("{:>2}. {}", word.number, word.clue), style))
    })
    .collect()
}

fn direction_name(direction: Direction) -> &'static str {
  match direction {
    Across => "Across",
    Down => "Down",
  }
}

fn current_clue_text(session: &Session) -> Line<'_> {
  match session.current_word() {
    Some(word) => line![
      span!(Style::new().bold(); "{} {}: ", word.number, direction_name(word.direction)),
      span!("{}", word.clue)
    ],
    None => line!["Select a square"],
  }
}

impl Widget for &App {
  fn render(self, area: Rect, buf: &mut Buffer) {
    let [title_area, main_area, help_area] = Layout::vertical([
      Constraint::Length(2),
      Constraint::Percentage(100),
      Constraint::Length(1),
    ])
    .areas(area);

    let Some(session) = &self.session else {
      return;
    };

    let title = Line::from(vec![
      "Ratatui Crossword".bold().blue(),
      ": ".bold(),
      format!("{} words", session.puzzle().words().len()).bold(),
      format!("  {}% done", session.progress_percent()).into(),
    ])
    .centered();
    title.render(title_area, buf);

    let [puzzle_area, clue_area] =
      Layout::horizontal([Constraint::Percentage(100), Constraint::Length(45)]).areas(main_area);

    render_grid(session, puzzle_area, buf);

    let [current_area, across_area, down_area] = Layout::vertical([
      Constraint::Length(7),
      Constraint::Percentage(50),
      Constraint::Percentage(50),
    ])
    .areas(clue_area);

    let mut current = vec![current_clue_text(session)];
    if session.is_solved() {
      current.push(Line::default());
      current.push(line![span!(Style::new().bold().green(); "Solved! Ctrl-N for another")]);
    } else if let Some((row, col)) = session.selected_cell() {
      current.push(Line::default());
      current.push(line![span!(Style::new().dark_gray(); "row {}, column {}", row + 1, col + 1)]);
    }
    Paragraph::new(current)
      .wrap(Wrap { trim: true })
      .block(
        Block::bordered()
          .title(Line::from("Current clue").centered())
          .padding(Padding::horizontal(1)),
      )
      .render(current_area, buf);

    for (direction, clue_area) in [(Across, across_area), (Down, down_area)] {
      Paragraph::new(clue_lines(session, direction))
        .wrap(Wrap { trim: true })
        .block(Block::bordered().title(Line::from(direction_name(direction)).centered()))
        .render(clue_area, buf);
    }

    Line::from("Type to fill · Enter: turn · F2: hint · Del: clear · Ctrl-N: new · Esc: quit")
      .dark_gray()
      .centered()
      .render(help_area, buf);
  }
}

/// https://ratatui.rs/recipes/layout/center-a-widget/
fn center(area: Rect, horizontal: Constraint, vertical: Constraint) -> Rect {
  let [area] = Layout::horizontal([horizontal])
    .flex(Flex::Center)
    .areas(area);
  let [area] = Layout::vertical([vertical]).flex(Flex::Center).areas(area);
  area
}
