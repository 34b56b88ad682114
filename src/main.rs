use std::io;
use std::process::ExitCode;

use clap::Parser;

use twentyone_helper::advice;
use twentyone_helper::console::ConsoleLoop;
use twentyone_helper::history::HistoryStore;
use twentyone_helper::round::RoundTracker;

/// Deck, odds, and HP tracker for the "21" card mini-game.
#[derive(Parser)]
#[command(name = "twentyone-helper", version)]
struct Args {
    /// Opponent to play against.
    #[arg(long, default_value = "Lucas")]
    opponent: String,

    /// Your starting HP.
    #[arg(long, default_value_t = 10)]
    player_hp: u32,

    /// Opponent starting HP.
    #[arg(long, default_value_t = 10)]
    opponent_hp: u32,

    /// Round history file. No file is kept when omitted.
    #[arg(long)]
    history_file: Option<String>,

    /// RNG seed for reproducible draws.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let opponent = match advice::find_opponent(&args.opponent) {
        Some(profile) => profile,
        None => {
            eprintln!(
                "Unknown opponent '{}'. Known opponents: {}.",
                args.opponent,
                advice::opponent_names().join(", ")
            );
            return ExitCode::FAILURE;
        }
    };

    let store = args.history_file.map(HistoryStore::new);
    let history = match &store {
        Some(store) => {
            let (history, warning) = store.load_or_empty();
            if let Some(err) = warning {
                eprintln!("Warning: {err}; starting with an empty history.");
            }
            history
        }
        None => Vec::new(),
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    let tracker = RoundTracker::new(args.player_hp, args.opponent_hp, opponent.stay_value, seed);
    let mut console = ConsoleLoop::new(tracker, opponent, store, history);

    let stdin = io::stdin();
    match console.run(stdin.lock(), io::stdout()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}
