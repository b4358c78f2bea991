use once_cell::sync::Lazy;
use rand::RngCore;

use crate::utils::shuffle_in_place;

use super::card::PairingDefinition;

const ANIMAL_KEYS: [&str; 26] = [
    "2_1", "2_2", "3_1", "3_2", "4_1", "4_2", "5_1", "5_2", "6_1", "6_2", "7_1", "7_2", "8_1",
    "8_2", "9_1", "9_2", "10_1", "10_2", "A_1", "A_2", "J_1", "J_2", "Q_1", "Q_2", "K_1", "K_2",
];

/// Animal picture (A) to English word (B) pairs.
pub static ANIMAL_PAIRS: Lazy<Vec<PairingDefinition>> = Lazy::new(|| {
    ANIMAL_KEYS
        .iter()
        .map(|key| {
            PairingDefinition::new(
                *key,
                format!("./assets/animal_cards/{}_A.png", key),
                format!("./assets/word_cards/{}_B.png", key),
            )
        })
        .collect()
});

/// A random selection of `count` definitions, clamped to [1, len].
pub fn pick_pairs(
    definitions: &[PairingDefinition],
    count: usize,
    rng: &mut impl RngCore,
) -> Vec<PairingDefinition> {
    let mut picked = definitions.to_vec();
    shuffle_in_place(&mut picked, rng);
    picked.truncate(count.clamp(1, definitions.len().max(1)));
    picked
}
