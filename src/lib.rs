pub mod card;
pub mod board;
pub mod deck;
pub mod rules;
pub mod moves;
pub mod history;
pub mod game;
pub mod assist;
pub mod search;
pub mod display;
pub mod layout;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod table;
pub mod error;

use anyhow::Context;
use clap::Parser;
use tracing::Level;

use crate::deck::DealCode;
use crate::display::{render_board, render_playing_edge};
use crate::game::{GameSession, format_elapsed};
use crate::search::{SearchLimits, autoplay};
use crate::settings::DrawMode;

/// Command-line surface of the `casino_solitaire` binary.
#[derive(Parser, Debug)]
#[command(name = "casino_solitaire", about = "Deal a game of Klondike and let the hints play it")]
pub struct Args {
    /// Deal the layout for this seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Replay a deal number printed by an earlier run.
    #[arg(long, conflicts_with = "seed")]
    pub deal: Option<String>,

    /// Cards per draw: 1 or 3.
    #[arg(long, default_value = "1", value_parser = parse_draw_mode)]
    pub draw: DrawMode,

    /// Play up to this many steps by following the hints.
    #[arg(long, default_value_t = 0)]
    pub autoplay: u32,

    /// Log every move.
    #[arg(long)]
    pub verbose: bool,
}

fn parse_draw_mode(raw: &str) -> Result<DrawMode, String> {
    let n: u8 = raw.parse().map_err(|_| format!("expected 1 or 3, got {raw:?}"))?;
    DrawMode::try_from(n)
}

/// Entry point for the `casino_solitaire` binary.
///
/// Deals one game (from `--deal`, `--seed`, or a fresh shuffle), prints it
/// with its deal number, then optionally autoplays it and prints the result.
///
/// Example:
///   casino_solitaire --seed 42 --draw 3 --autoplay 500
pub fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    let mut session = match (&args.deal, args.seed) {
        (Some(raw), _) => {
            let code: DealCode = raw
                .parse()
                .with_context(|| format!("invalid deal number {raw:?}"))?;
            GameSession::from_deal_code(&code, args.draw)?
        }
        (None, Some(seed)) => GameSession::from_seed(seed, args.draw),
        (None, None) => GameSession::new_game(args.draw),
    };

    if let Some(code) = session.deal_code() {
        println!("Deal number: {code}");
    }
    println!("Draw mode: {}", args.draw.count());
    println!();
    println!("{}", render_board(session.board()));
    println!("Piles (playing edge): {}", render_playing_edge(session.board()));

    if args.autoplay == 0 {
        return Ok(());
    }

    let limits = SearchLimits {
        max_steps: args.autoplay,
        ..SearchLimits::default()
    };
    let outcome = autoplay(&mut session, limits);

    println!();
    println!("{}", render_board(session.board()));
    println!("Steps played: {}", outcome.steps);
    println!("Positions seen: {}", outcome.positions_seen);
    println!("Termination reason: {:?}", outcome.termination);
    println!("Score: {}", session.score());
    println!("Moves: {}", session.move_count());
    println!("Time: {}", format_elapsed(session.elapsed()));
    println!("Win? {}", outcome.is_win());
    Ok(())
}
