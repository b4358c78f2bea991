use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures while building a deal. Configuration variants come from bad
/// input; the rest mean the dealer broke one of its own invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DealError {
    #[error("unsupported player count (got={got}, expected={expected})")]
    PlayerCount { got: usize, expected: &'static str },
    #[error("wrong number of pairing definitions (got={got}, expected={expected})")]
    PairCount { got: usize, expected: usize },
    #[error("pairing definition key {0:?} appears more than once")]
    DuplicatePairId(String),
    #[error("difficulty tier {tier} targets cannot be dealt without forming extra pairs")]
    UnsatisfiableTargets { tier: u32 },
    #[error("invalid human pair target {0}")]
    InvalidPairTarget(usize),
    #[error("card pool exhausted while dealing {0}")]
    PoolExhausted(&'static str),
    #[error("seat {player} dealt {a} A cards and {b} B cards")]
    SideImbalance { player: usize, a: usize, b: usize },
    #[error("seat {player} holds {found} complete pairs, expected {expected}")]
    PairCountMismatch {
        player: usize,
        expected: usize,
        found: usize,
    },
}

/// Caller misuse of the turn operations. The game is left untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("game is over")]
    GameOver,
    #[error("no player at seat {0}")]
    NoSuchPlayer(usize),
    #[error("current player {0} is out")]
    CurrentPlayerOut(usize),
    #[error("player {0} has no cards to draw")]
    TargetUnavailable(usize),
    #[error("can only draw from upstream player {expected:?}, not {target}")]
    NotUpstream {
        expected: Option<usize>,
        target: usize,
    },
    #[error("player {0} already drew this turn")]
    AlreadyDrawn(usize),
    #[error("card index {index} out of range for hand of {len}")]
    InvalidCardIndex { index: usize, len: usize },
    #[error("joker has already been delivered")]
    NoPendingJoker,
    #[error("joker may not be delivered to the human seat {0}")]
    JokerAvoidsHuman(usize),
}

/// Why a discard attempt was turned down.
#[derive(Debug, Error, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DiscardRejection {
    #[error("game is over")]
    GameOver,
    #[error("no such player")]
    NoSuchPlayer,
    #[error("player is out")]
    PlayerOut,
    #[error("both ids name the same card")]
    SameCard,
    #[error("card not in hand")]
    NotFound,
    #[error("joker cannot be paired")]
    JokerOrInvalid,
    #[error("cards belong to different pairs")]
    Mismatch,
    #[error("cards are the same side")]
    SameSide,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    Json(#[from] serde_json::Error),
}
