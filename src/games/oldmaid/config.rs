use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use super::card::PairingDefinition;
use super::error::ConfigError;

pub const DEFAULT_PLAYER_COUNT: usize = 4;
pub const CONSTRAINED_PLAYER_COUNT: usize = 4;
pub const CONSTRAINED_PAIR_COUNT: usize = 22;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum DealStrategy {
    /// Round robin, then side balancing and a two pair minimum for the human
    #[default]
    Balanced,
    /// Explicit initial pair counts per seat picked by difficulty tier
    Tiered { tier: u32 },
    /// 4 seats and 22 pairs, exact 1:1 sides and a sampled human pair count
    Constrained,
}

impl DealStrategy {
    /// Constrained when the input has exactly the constrained shape,
    /// balanced otherwise.
    pub fn for_input(pair_count: usize, player_count: usize) -> Self {
        if player_count == CONSTRAINED_PLAYER_COUNT && pair_count == CONSTRAINED_PAIR_COUNT {
            DealStrategy::Constrained
        } else {
            DealStrategy::Balanced
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub pairs: Vec<PairingDefinition>,
    #[serde(default = "default_player_count")]
    pub player_count: usize,
    // Empty or missing seed deals from system entropy
    #[serde(default)]
    pub seed: Option<String>,
    // Missing strategy is picked from the input shape
    #[serde(default)]
    pub strategy: Option<DealStrategy>,
    // Missing means only the constrained deal keeps the joker away from the human
    #[serde(default)]
    pub joker_avoids_human: Option<bool>,
}

fn default_player_count() -> usize {
    DEFAULT_PLAYER_COUNT
}

impl GameConfig {
    pub fn new(pairs: Vec<PairingDefinition>, player_count: usize) -> Self {
        GameConfig {
            pairs,
            player_count,
            seed: None,
            strategy: None,
            joker_avoids_human: None,
        }
    }

    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    pub fn with_strategy(mut self, strategy: DealStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn with_joker_avoids_human(mut self, avoids: bool) -> Self {
        self.joker_avoids_human = Some(avoids);
        self
    }

    pub fn resolved_strategy(&self) -> DealStrategy {
        self.strategy
            .unwrap_or_else(|| DealStrategy::for_input(self.pairs.len(), self.player_count))
    }

    pub fn resolved_joker_avoids_human(&self) -> bool {
        self.joker_avoids_human
            .unwrap_or(self.resolved_strategy() == DealStrategy::Constrained)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(n: usize) -> Vec<PairingDefinition> {
        (0..n)
            .map(|i| PairingDefinition::new(format!("k{}", i), "a", "b"))
            .collect()
    }

    #[test]
    fn test_strategy_for_input() {
        assert_eq!(DealStrategy::for_input(22, 4), DealStrategy::Constrained);
        assert_eq!(DealStrategy::for_input(21, 4), DealStrategy::Balanced);
        assert_eq!(DealStrategy::for_input(22, 3), DealStrategy::Balanced);
    }

    #[test]
    fn test_joker_avoidance_defaults() {
        let constrained = GameConfig::new(pairs(22), 4);
        assert!(constrained.resolved_joker_avoids_human());
        let balanced = GameConfig::new(pairs(10), 4);
        assert!(!balanced.resolved_joker_avoids_human());
        let overridden = GameConfig::new(pairs(22), 4).with_joker_avoids_human(false);
        assert!(!overridden.resolved_joker_avoids_human());
    }

    #[test]
    fn test_parse_json() {
        let config = GameConfig::from_json_str(
            r#"{
                "pairs": [{"key": "2_1", "A": "a.png", "B": "b.png"}],
                "seed": "t1",
                "strategy": {"mode": "tiered", "tier": 2}
            }"#,
        )
        .unwrap();
        assert_eq!(config.player_count, DEFAULT_PLAYER_COUNT);
        assert_eq!(config.seed.as_deref(), Some("t1"));
        assert_eq!(config.resolved_strategy(), DealStrategy::Tiered { tier: 2 });
        assert_eq!(config.pairs[0].key, "2_1");
    }

    #[test]
    fn test_parse_json_rejects_garbage() {
        assert!(matches!(
            GameConfig::from_json_str("{\"pairs\": 3}"),
            Err(ConfigError::Json(_))
        ));
    }
}
