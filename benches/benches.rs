#![feature(test)]
extern crate test;

use oldmaid_rs::{
    games::oldmaid::{
        ai::{play_out, DEFAULT_MAX_TURNS},
        deal,
        decks::ANIMAL_PAIRS,
        DealStrategy, GameConfig, Mulberry32, OldMaidGame,
    },
    utils::shuffle_in_place,
};
use test::{black_box, Bencher};

fn self_play(pair_count: usize, seed: &str) {
    let config = GameConfig::new(ANIMAL_PAIRS[..pair_count].to_vec(), 4).with_seed(seed);
    let mut rng = Mulberry32::from_seed_str(seed);
    let mut game = OldMaidGame::new_with_rng(&config, &mut rng).unwrap();
    play_out(&mut game, &mut rng, DEFAULT_MAX_TURNS).unwrap();
}

#[bench]
fn bench_balanced_deal(b: &mut Bencher) {
    let mut rng = Mulberry32::from_seed_str("bench");
    b.iter(|| black_box(deal(DealStrategy::Balanced, &ANIMAL_PAIRS[..20], 4, &mut rng).unwrap()))
}

#[bench]
fn bench_tiered_deal(b: &mut Bencher) {
    let mut rng = Mulberry32::from_seed_str("bench");
    b.iter(|| {
        black_box(deal(DealStrategy::Tiered { tier: 1 }, &ANIMAL_PAIRS[..24], 4, &mut rng).unwrap())
    })
}

#[bench]
fn bench_constrained_deal(b: &mut Bencher) {
    let mut rng = Mulberry32::from_seed_str("bench");
    b.iter(|| {
        black_box(deal(DealStrategy::Constrained, &ANIMAL_PAIRS[..22], 4, &mut rng).unwrap())
    })
}

#[bench]
fn bench_self_play_constrained(b: &mut Bencher) {
    b.iter(|| {
        black_box(self_play(22, "bench"));
    })
}

#[bench]
fn bench_self_play_full_deck(b: &mut Bencher) {
    b.iter(|| {
        black_box(self_play(26, "bench"));
    })
}

#[bench]
fn bench_shuffle(b: &mut Bencher) {
    let mut rng = Mulberry32::from_seed_str("bench");
    let mut cards: Vec<usize> = (0..53).collect();
    b.iter(|| {
        shuffle_in_place(&mut cards, &mut rng);
        black_box(cards.first().copied())
    })
}
