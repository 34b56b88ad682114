use thiserror::Error;

/// Recoverable failures surfaced by the tracker and console loop.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("no cards left in the deck")]
    EmptyDeck,
    #[error("unknown trump card '{0}'")]
    UnknownModifier(String),
    #[error("could not parse command '{0}'")]
    Parse(String),
    #[error("no round in progress; use 'newround' first")]
    RoundNotStarted,
    #[error("the match is over; a side is at 0 HP")]
    MatchOver,
    #[error("history file error: {0}")]
    History(#[from] std::io::Error),
    #[error("history file is corrupt: {0}")]
    CorruptHistory(#[from] serde_json::Error),
}
