//! Yutnori - terminal board keeper
//!
//! Players throw real sticks; this tool tracks pieces, stacks, captures and
//! turns, saving the game to a JSON snapshot after every command.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cli;
mod narrator;
mod render;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Parser;
use cli::{Cli, Command, Distance, Position};
use narrator::Narrator;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument};
use tracing_subscriber::EnvFilter;
use yutnori::{
    CenterExit, GameSession, GameState, JsonFileStore, PieceId, RosterConfig, Rules, TeamId,
    Throw, resolve_path_with,
};

type Session = GameSession<JsonFileStore>;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    debug!(state = %cli.state.display(), "Parsed command line");

    match cli.command {
        Command::New {
            roster,
            teams,
            pieces,
            bonus_throw,
        } => run_new(&cli.state, roster, teams, pieces, bonus_throw),
        Command::FirstTurn { team } => run_first_turn(&cli.state, &team),
        Command::Path { from, distance } => run_path(from, &distance),
        Command::Move { piece, distance } => run_move(&cli.state, &piece, &distance),
        Command::Place { at, piece, x, y } => run_place(&cli.state, &piece, at, x.zip(y)),
        Command::Next => run_next(&cli.state),
        Command::Show => run_show(&cli.state),
        Command::Log { tail } => run_log(&cli.state, tail),
        Command::Board => run_board(&cli.state),
        Command::Restart => run_restart(&cli.state),
        Command::Reset => run_reset(&cli.state),
        Command::Schema => run_schema(),
    }
}

/// Opens the snapshot at `path` with a narrator attached.
fn open(path: &Path) -> Result<Session> {
    let session = GameSession::open(JsonFileStore::new(path))
        .with_context(|| format!("Failed to open game at {}", path.display()))?;
    let narrator = Narrator::for_state(session.state());
    Ok(session.with_observer(Box::new(narrator)))
}

fn current(session: &Session) -> Result<&GameState> {
    match session.state() {
        Some(state) => Ok(state),
        None => bail!("No game in progress; run `yutnori new` first"),
    }
}

/// Prints log lines appended since `before`.
fn print_new_logs(state: &GameState, before: usize) {
    for line in state.logs().iter().skip(before) {
        println!("{}", line);
    }
}

fn exit_of(distance: &Distance) -> CenterExit {
    if distance.via_third_corner {
        CenterExit::TowardThirdCorner
    } else {
        CenterExit::TowardStart
    }
}

/// Start a new game from a roster file or presets.
#[instrument]
fn run_new(
    state_path: &Path,
    roster: Option<PathBuf>,
    teams: usize,
    pieces: u8,
    bonus_throw: bool,
) -> Result<()> {
    let mut config = match roster {
        Some(path) => RosterConfig::from_file(&path)?,
        None => RosterConfig::presets(teams, pieces),
    };
    if bonus_throw {
        config = config.with_rules(Rules { bonus_throw: true });
    }

    let mut session = open(state_path)?;
    let state = session.start_roster(&config)?;
    info!(teams = state.teams().len(), "New game");
    print_new_logs(state, 0);
    let ids: Vec<&str> = state.teams().iter().map(|t| t.id().as_str()).collect();
    println!("Choose who goes first: yutnori first-turn <{}>", ids.join("|"));
    Ok(())
}

/// Choose the first team.
#[instrument]
fn run_first_turn(state_path: &Path, team: &str) -> Result<()> {
    let mut session = open(state_path)?;
    let team = TeamId::new(team);
    let before = current(&session)?.logs().len();
    if current(&session)?.team(&team).is_none() {
        bail!("Unknown team '{}'", team);
    }
    let state = session.set_first_turn(&team)?;
    print_new_logs(state, before);
    Ok(())
}

/// Show the path for one throw, or for every throw.
#[instrument]
fn run_path(from: Position, distance: &Distance) -> Result<()> {
    let exit = exit_of(distance);
    match distance.steps() {
        Some(steps) => {
            let resolved = resolve_path_with(from.0, steps, exit);
            println!("{}", render::path_line(from.0, &resolved));
        }
        None => {
            for throw in Throw::iter() {
                let resolved = resolve_path_with(from.0, throw.steps(), exit);
                println!(
                    "{:>2} {:<8} {}",
                    throw.korean(),
                    throw.to_string(),
                    render::path_line(from.0, &resolved)
                );
            }
        }
    }
    Ok(())
}

/// Resolve a throw for a piece and apply it.
#[instrument]
fn run_move(state_path: &Path, piece: &str, distance: &Distance) -> Result<()> {
    let Some(steps) = distance.steps() else {
        bail!("Give --steps or --throw");
    };
    let mut session = open(state_path)?;
    let before = current(&session)?.logs().len();

    let piece = PieceId::new(piece);
    let from = current(&session)?.piece(&piece).and_then(|p| p.node());
    let resolved = session.move_by(&piece, steps, exit_of(distance))?;
    if resolved.is_noop() {
        println!("No movement possible for {}", piece);
    } else {
        println!("{}", render::path_line(from, &resolved));
    }
    print_new_logs(current(&session)?, before);
    Ok(())
}

/// Free placement by node id or by snapped coordinates.
#[instrument]
fn run_place(
    state_path: &Path,
    piece: &str,
    at: Option<Position>,
    coords: Option<(f64, f64)>,
) -> Result<()> {
    let mut session = open(state_path)?;
    let before = current(&session)?.clone();
    let piece = PieceId::new(piece);

    match (at, coords) {
        (Some(Position(target)), _) => {
            session.move_piece(&piece, target, false)?;
        }
        (None, Some((x, y))) => {
            if session.place_at(&piece, x, y)?.is_none() {
                println!("No node near ({}, {}); move cancelled", x, y);
                return Ok(());
            }
        }
        (None, None) => bail!("Give --at or --x/--y"),
    }

    let after = current(&session)?;
    if let Some(note) = render::unchanged_note(&before, after, &piece) {
        println!("{}", note);
    }
    print_new_logs(after, before.logs().len());
    Ok(())
}

/// Pass the turn.
#[instrument]
fn run_next(state_path: &Path) -> Result<()> {
    let mut session = open(state_path)?;
    let before = current(&session)?.logs().len();
    let state = session.advance_turn()?;
    print_new_logs(state, before);
    Ok(())
}

/// Print the status report.
#[instrument]
fn run_show(state_path: &Path) -> Result<()> {
    let session = open(state_path)?;
    print!("{}", render::status_report(current(&session)?, Utc::now()));
    Ok(())
}

/// Print the log.
#[instrument]
fn run_log(state_path: &Path, tail: Option<usize>) -> Result<()> {
    let session = open(state_path)?;
    let logs = current(&session)?.logs();
    let skip = tail.map_or(0, |n| logs.len().saturating_sub(n));
    for line in &logs[skip..] {
        println!("{}", line);
    }
    Ok(())
}

/// Draw the board.
#[instrument]
fn run_board(state_path: &Path) -> Result<()> {
    let session = open(state_path)?;
    print!("{}", render::board_grid(current(&session)?));
    Ok(())
}

/// Start over with the same teams.
#[instrument]
fn run_restart(state_path: &Path) -> Result<()> {
    let mut session = open(state_path)?;
    let state = session.restart()?;
    print_new_logs(state, 0);
    Ok(())
}

/// Discard the game.
#[instrument]
fn run_reset(state_path: &Path) -> Result<()> {
    let mut session = open(state_path)?;
    session.reset()?;
    println!("Game discarded");
    Ok(())
}

/// Print the snapshot JSON Schema.
#[instrument]
fn run_schema() -> Result<()> {
    let schema = schemars::schema_for!(GameState);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
