mod display;

use crate::display::render;

use anyhow::{Context, Result, ensure};
use clap::Parser;
use patience_engine::{Board, Game, Move, MoveError, format_actions};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use std::io::{Write, stdin, stdout};
use std::path::PathBuf;

const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Seed for a reproducible deal
    #[arg(short, long, value_name = "SEED")]
    seed: Option<u64>,
    /// Path to a game state file to load
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let game = match cli.file {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let board = Board::parse(&content).context("Failed to parse board")?;
            ensure!(board.is_valid(), "The file is not a legal game state");
            Game::from_board(board)
        }
        None => {
            let mut rng = match cli.seed {
                Some(seed) => SmallRng::seed_from_u64(seed),
                None => SmallRng::from_os_rng(),
            };
            Game::new(&mut rng)
        }
    };

    play(game)
}

fn play(mut game: Game) -> Result<()> {
    let mut lines = stdin().lines();
    let mut warning: Option<String> = None;

    println!("Let's play Solitaire!");
    loop {
        println!();
        print!("{}", render(game.board()));
        if let Some(warning) = warning.take() {
            println!("{YELLOW}{warning}{RESET}");
        }
        if game.is_won() {
            println!("Congratulations, you won in {} moves!", game.moves());
            return Ok(());
        }

        let Some(answer) = prompt(&mut lines, "What is your next move?")? else {
            return Ok(());
        };
        match answer.to_lowercase().as_str() {
            "dr" | "draw" => game.draw(),
            "mv" | "move" => match read_move(&mut lines)? {
                Some(Ok(mov)) => {
                    if let Err(err) = game.apply(mov) {
                        warning = Some(err.to_string());
                    }
                }
                Some(Err(err)) => warning = Some(err.to_string()),
                None => return Ok(()),
            },
            "un" | "undo" => {
                if !game.undo() {
                    warning = Some("Nothing to undo".to_string());
                }
            }
            "re" | "redo" => {
                if !game.redo() {
                    warning = Some("Nothing to redo".to_string());
                }
            }
            "hi" | "history" => {
                if game.moves() == 0 {
                    println!("No moves yet.");
                } else {
                    println!("{}", format_actions(game.actions()));
                }
            }
            "q" | "quit" => return Ok(()),
            _ => warning = Some("Please select a valid menu option".to_string()),
        }
    }
}

fn prompt<I>(lines: &mut I, message: &str) -> Result<Option<String>>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    println!("{message}");
    print!(" - ");
    stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(Some(line.context("Failed to read input")?.trim().to_string())),
        None => Ok(None),
    }
}

/// Prompts for `target,destination` and, for pile-to-pile moves, the card
/// count. Returns `None` on end of input.
fn read_move<I>(lines: &mut I) -> Result<Option<Result<Move, MoveError>>>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    let Some(answer) = prompt(
        lines,
        "pick your target and destination (comma separated, no spaces)\n\
         [wa] = waste\t[p#] = pile #\t[fo] = foundation\t[f#] = foundation #",
    )?
    else {
        return Ok(None);
    };
    let Some((target, destination)) = answer.split_once(',') else {
        return Ok(Some(Err(MoveError::InvalidDestination)));
    };

    let mov = match parse_move(target.trim(), destination.trim()) {
        Ok(PartialMove::Complete(mov)) => Ok(mov),
        Ok(PartialMove::NeedsCount { from, to }) => {
            let Some(count) =
                prompt(lines, "how many cards would you like to move? (from the top)")?
            else {
                return Ok(None);
            };
            match count.parse::<usize>() {
                Ok(count) => Ok(Move::TableauToTableau { from, to, count }),
                Err(_) => Err(MoveError::InvalidIndex),
            }
        }
        Err(err) => Err(err),
    };
    Ok(Some(mov))
}

/// A container reference as the player writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Place {
    Waste,
    Pile(usize),
    AnyFoundation,
    Foundation(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PartialMove {
    Complete(Move),
    NeedsCount { from: usize, to: usize },
}

fn parse_place(s: &str) -> Option<Place> {
    match s {
        "wa" => Some(Place::Waste),
        "fo" => Some(Place::AnyFoundation),
        _ => {
            if let Some(num) = s.strip_prefix('p') {
                let num: usize = num.parse().ok()?;
                (1..=7).contains(&num).then(|| Place::Pile(num - 1))
            } else if let Some(num) = s.strip_prefix('f') {
                let num: usize = num.parse().ok()?;
                (1..=4).contains(&num).then(|| Place::Foundation(num - 1))
            } else {
                None
            }
        }
    }
}

fn parse_move(target: &str, destination: &str) -> Result<PartialMove, MoveError> {
    let target = parse_place(target).ok_or(MoveError::InvalidTarget)?;
    let destination = parse_place(destination).ok_or(MoveError::InvalidDestination)?;
    let mov = match (target, destination) {
        (Place::Waste, Place::AnyFoundation) => Move::WasteToFoundation(None),
        (Place::Waste, Place::Foundation(f)) => Move::WasteToFoundation(Some(f)),
        (Place::Waste, Place::Pile(p)) => Move::WasteToTableau(p),
        (Place::Pile(p), Place::AnyFoundation) => Move::TableauToFoundation(p, None),
        (Place::Pile(p), Place::Foundation(f)) => Move::TableauToFoundation(p, Some(f)),
        (Place::Pile(from), Place::Pile(to)) => {
            return Ok(PartialMove::NeedsCount { from, to });
        }
        (Place::Foundation(f), Place::Pile(p)) => Move::FoundationToTableau(f, p),
        (Place::AnyFoundation, _) => return Err(MoveError::InvalidTarget),
        _ => return Err(MoveError::InvalidDestination),
    };
    Ok(PartialMove::Complete(mov))
}
