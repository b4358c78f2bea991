pub mod ai;
pub mod card;
pub mod config;
pub mod dealer;
pub mod decks;
pub mod error;
pub mod game;
pub mod hand;
pub mod rng;

// Re-export the main types
pub use card::{build_deck, extract_joker, Card, CardKind, PairingDefinition, Side};
pub use config::{DealStrategy, GameConfig};
pub use dealer::{deal, Deal};
pub use error::{ConfigError, DealError, DiscardRejection, GameError};
pub use game::{DiscardResult, Event, EventType, OldMaidGame, Player, PlayerKind};
pub use rng::{GameRng, Mulberry32};
