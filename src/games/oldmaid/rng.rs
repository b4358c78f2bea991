/*
Random sources for dealing.

A game either runs off a seeded Mulberry32 stream, which hashes an arbitrary
seed string into 32 bits of state and is bit-for-bit reproducible, or off the
system entropy source.
*/

use rand::{rngs::StdRng, RngCore, SeedableRng};

const HASH_INIT: u32 = 1779033703;
const HASH_MULTIPLIER: u32 = 3432918353;
const STATE_INCREMENT: u32 = 0x6d2b79f5;

/// Mulberry32 generator seeded from a string hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn from_seed_str(seed: &str) -> Self {
        // Hash UTF-16 code units so non-ASCII seeds match the browser table.
        let units: Vec<u16> = seed.encode_utf16().collect();
        let mut h = HASH_INIT ^ units.len() as u32;
        for unit in units {
            h = (h ^ unit as u32).wrapping_mul(HASH_MULTIPLIER);
            h = h.rotate_left(13);
        }
        Mulberry32 {
            state: if h == 0 { 1 } else { h },
        }
    }

    #[inline]
    fn step(&mut self) -> u32 {
        self.state = self.state.wrapping_add(STATE_INCREMENT);
        let a = self.state;
        let mut t = (a ^ (a >> 15)).wrapping_mul(1 | a);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(61 | t)) ^ t;
        t ^ (t >> 14)
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        let low = self.step() as u64;
        let high = self.step() as u64;
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// The random source a game deals with.
#[derive(Debug, Clone)]
pub enum GameRng {
    Seeded(Mulberry32),
    Entropy(StdRng),
}

impl GameRng {
    /// A non-empty seed gives a reproducible stream, anything else falls
    /// back to system entropy.
    pub fn from_seed(seed: Option<&str>) -> Self {
        match seed {
            Some(seed) if !seed.is_empty() => GameRng::Seeded(Mulberry32::from_seed_str(seed)),
            _ => GameRng::Entropy(StdRng::from_entropy()),
        }
    }

    pub fn is_deterministic(&self) -> bool {
        matches!(self, GameRng::Seeded(_))
    }
}

impl RngCore for GameRng {
    fn next_u32(&mut self) -> u32 {
        match self {
            GameRng::Seeded(rng) => rng.next_u32(),
            GameRng::Entropy(rng) => rng.next_u32(),
        }
    }

    fn next_u64(&mut self) -> u64 {
        match self {
            GameRng::Seeded(rng) => rng.next_u64(),
            GameRng::Entropy(rng) => rng.next_u64(),
        }
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        match self {
            GameRng::Seeded(rng) => rng.fill_bytes(dest),
            GameRng::Entropy(rng) => rng.fill_bytes(dest),
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        match self {
            GameRng::Seeded(rng) => rng.try_fill_bytes(dest),
            GameRng::Entropy(rng) => rng.try_fill_bytes(dest),
        }
    }
}
