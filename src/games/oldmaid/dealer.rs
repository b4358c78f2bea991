/*
Dealing for the Old Maid table.

Three strategies share one entry point:
  balanced     round robin, then best-effort swaps toward a 1:1 side split and
               a minimum number of immediately playable pairs for the human
  tiered       explicit initial pair counts per seat chosen by difficulty tier
  constrained  4 seats and 22 pairs, every seat dealt 1:1 by construction and
               the human's pair count sampled from a fixed distribution

The joker never enters a hand here; the game holds it until it is delivered.
*/

use std::collections::HashSet;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::utils::{random_index, random_matching_index, shuffle_in_place, unit_float};

use super::card::{build_deck, extract_joker, Card, PairingDefinition, Side};
use super::config::{DealStrategy, CONSTRAINED_PAIR_COUNT, CONSTRAINED_PLAYER_COUNT};
use super::error::DealError;
use super::hand::{complete_pair_ids, count_complete_pairs, count_sides, find_card_index};

pub const HUMAN_SEAT: usize = 0;
pub const MIN_PLAYERS: usize = 2;
// Cards per seat for the tiered and constrained deals
pub const HAND_SIZE: usize = 12;
pub const MIN_HUMAN_PAIRS: usize = 2;
const SIDE_BALANCE_ATTEMPTS: usize = 80;
const PAIR_ATTEMPTS: usize = 120;
// Preference penalties when picking a human card to give away
const COMPLETE_PAIR_PENALTY: i32 = -10;
const OFF_SIDE_PENALTY: i32 = -1;
// Non-joker cards per AI seat in the constrained deal, assigned to shuffled seats
const CONSTRAINED_AI_SIZES: [usize; 3] = [12, 10, 10];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TierTargets {
    pub human_pairs: usize,
    pub ai_pairs: usize,
}

/// Initial complete pairs per seat for a difficulty tier. Tiers past the
/// table use the hardest row.
pub fn tier_targets(tier: u32) -> TierTargets {
    let (human_pairs, ai_pairs) = match tier {
        0 => (4, 2),
        1 => (3, 2),
        2 => (2, 3),
        _ => (1, 3),
    };
    TierTargets {
        human_pairs,
        ai_pairs,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub hands: Vec<Vec<Card>>,
    pub joker: Card,
    // Set by the strategies that aim for an exact human pair count
    pub human_pair_target: Option<usize>,
}

pub fn deal(
    strategy: DealStrategy,
    pairs: &[PairingDefinition],
    player_count: usize,
    rng: &mut impl RngCore,
) -> Result<Deal, DealError> {
    if player_count < MIN_PLAYERS {
        return Err(DealError::PlayerCount {
            got: player_count,
            expected: "at least 2",
        });
    }
    let mut keys: HashSet<&str> = HashSet::new();
    for pair in pairs {
        if !keys.insert(pair.key.as_str()) {
            return Err(DealError::DuplicatePairId(pair.key.clone()));
        }
    }

    let extracted = extract_joker(build_deck(pairs));
    let (hands, human_pair_target) = match strategy {
        DealStrategy::Balanced => (balanced_deal(extracted.rest, player_count, rng), None),
        DealStrategy::Tiered { tier } => {
            let hands = tiered_deal(pairs, player_count, tier, rng)?;
            (hands, Some(tier_targets(tier).human_pairs))
        }
        DealStrategy::Constrained => {
            let (hands, target) = constrained_deal(pairs, player_count, rng)?;
            (hands, Some(target))
        }
    };
    Ok(Deal {
        hands,
        joker: extracted.joker,
        human_pair_target,
    })
}

/// Shuffle, deal round robin, then nudge the human hand toward balanced sides
/// and at least [`MIN_HUMAN_PAIRS`] complete pairs.
pub fn balanced_deal(
    mut cards: Vec<Card>,
    player_count: usize,
    rng: &mut impl RngCore,
) -> Vec<Vec<Card>> {
    let mut hands: Vec<Vec<Card>> = vec![vec![]; player_count];
    shuffle_in_place(&mut cards, rng);
    for (index, card) in cards.into_iter().enumerate() {
        hands[index % player_count].push(card);
    }
    let mut side_swaps = balance_hand_sides(&mut hands, rng);
    let pair_swaps = ensure_human_pairs(&mut hands, MIN_HUMAN_PAIRS, rng);
    // importing pairs can tip the sides again
    side_swaps += balance_hand_sides(&mut hands, rng);
    debug!(side_swaps, pair_swaps, "balanced deal");
    hands
}

#[inline]
fn swap_with_human(hands: &mut [Vec<Card>], player: usize, ai_index: usize, human_index: usize) {
    debug_assert!(player != HUMAN_SEAT);
    let (human, others) = hands.split_at_mut(HUMAN_SEAT + 1);
    std::mem::swap(
        &mut human[HUMAN_SEAT][human_index],
        &mut others[player - HUMAN_SEAT - 1][ai_index],
    );
}

fn random_index_of_side(hand: &[Card], side: Side, rng: &mut impl RngCore) -> Option<usize> {
    random_matching_index(hand, |c| !c.is_joker() && c.side == Some(side), rng)
}

/// A human card of `side`, taken from the singles when there are any.
fn pick_human_surplus_index(hand: &[Card], side: Side, rng: &mut impl RngCore) -> Option<usize> {
    let complete = complete_pair_ids(hand);
    random_matching_index(
        hand,
        |c| {
            !c.is_joker()
                && c.side == Some(side)
                && !c
                    .pair_id
                    .as_deref()
                    .is_some_and(|pair_id| complete.contains(pair_id))
        },
        rng,
    )
    .or_else(|| random_index_of_side(hand, side, rng))
}

/// Swap single cards between the human and AI seats until the human's A and
/// B counts are within one. Returns the number of swaps made.
pub fn balance_hand_sides(hands: &mut [Vec<Card>], rng: &mut impl RngCore) -> usize {
    if hands.len() <= HUMAN_SEAT + 1 {
        return 0;
    }
    let mut swaps = 0;
    for _ in 0..SIDE_BALANCE_ATTEMPTS {
        let human_counts = count_sides(&hands[HUMAN_SEAT]);
        let diff = human_counts.imbalance();
        if diff.abs() <= 1 {
            break;
        }
        let surplus = if diff > 0 { Side::A } else { Side::B };
        let needed = surplus.opposite();

        // Prefer the seat heaviest on the needed side, so the swap levels it too
        let mut best: Option<usize> = None;
        let mut best_score = (i64::MIN, 0);
        for player in (HUMAN_SEAT + 1)..hands.len() {
            let counts = count_sides(&hands[player]);
            if counts.get(needed) == 0 {
                continue;
            }
            let lean = counts.get(needed) as i64 - counts.get(surplus) as i64;
            let score = (lean, counts.get(needed));
            if score > best_score {
                best_score = score;
                best = Some(player);
            }
        }
        let Some(target) = best else {
            break;
        };

        let human_index = pick_human_surplus_index(&hands[HUMAN_SEAT], surplus, rng);
        let target_index = random_index_of_side(&hands[target], needed, rng);
        let (Some(human_index), Some(target_index)) = (human_index, target_index) else {
            break;
        };
        swap_with_human(hands, target, target_index, human_index);
        swaps += 1;
    }
    let final_diff = count_sides(&hands[HUMAN_SEAT]).imbalance();
    if final_diff.abs() > 1 {
        warn!(final_diff, "could not balance human sides");
    }
    swaps
}

fn find_elsewhere(hands: &[Vec<Card>], pair_id: &str, side: Side) -> Option<(usize, usize)> {
    ((HUMAN_SEAT + 1)..hands.len()).find_map(|player| {
        find_card_index(&hands[player], pair_id, side).map(|index| (player, index))
    })
}

/// A human card to hand over, never from `avoid`. Singles beat halves of
/// complete pairs, then cards on `incoming` side beat the other side so the
/// swap keeps the human's sides level.
fn choose_human_give_index(
    human: &[Card],
    avoid: Option<&str>,
    incoming: Side,
    rng: &mut impl RngCore,
) -> Option<usize> {
    let complete = complete_pair_ids(human);
    let candidates: Vec<(usize, i32)> = human
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.is_joker())
        .filter(|(_, c)| avoid.is_none() || c.pair_id.as_deref() != avoid)
        .map(|(index, c)| {
            let in_pair = c
                .pair_id
                .as_deref()
                .is_some_and(|pair_id| complete.contains(pair_id));
            let mut score = if in_pair { COMPLETE_PAIR_PENALTY } else { 0 };
            if c.side != Some(incoming) {
                score += OFF_SIDE_PENALTY;
            }
            (index, score)
        })
        .collect();
    let best_score = candidates.iter().map(|(_, score)| *score).max()?;
    let best: Vec<usize> = candidates
        .iter()
        .filter(|(_, score)| *score == best_score)
        .map(|(index, _)| *index)
        .collect();
    Some(best[random_index(best.len(), rng)])
}

/// Half-held pairs in the human hand as (pairId, missing side), in order of
/// first appearance.
fn partial_pairs(hand: &[Card]) -> Vec<(String, Side)> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut needs: Vec<(String, Side)> = vec![];
    for card in hand.iter().filter(|c| !c.is_joker()) {
        let (Some(pair_id), Some(side)) = (card.pair_id.as_deref(), card.side) else {
            continue;
        };
        if !seen.insert(pair_id) {
            continue;
        }
        if find_card_index(hand, pair_id, side.opposite()).is_none() {
            needs.push((pair_id.to_string(), side.opposite()));
        }
    }
    needs
}

/// Swap cards until the human holds at least `min_pairs` complete pairs.
/// First completes half-held pairs, then imports whole pairs from AI seats.
/// Best effort: stops early when no useful swap remains.
pub fn ensure_human_pairs(
    hands: &mut [Vec<Card>],
    min_pairs: usize,
    rng: &mut impl RngCore,
) -> usize {
    if min_pairs == 0 || hands.len() <= HUMAN_SEAT + 1 {
        return 0;
    }
    if hands[HUMAN_SEAT].len() < min_pairs * 2 {
        return 0;
    }
    let playable = hands[HUMAN_SEAT].iter().filter(|c| !c.is_joker()).count();
    if playable / 2 < min_pairs {
        return 0;
    }

    let mut swaps = 0;
    for _ in 0..PAIR_ATTEMPTS {
        if count_complete_pairs(&hands[HUMAN_SEAT]) >= min_pairs {
            return swaps;
        }
        let needs = partial_pairs(&hands[HUMAN_SEAT]);
        if needs.is_empty() {
            break;
        }
        let (pair_id, want) = &needs[random_index(needs.len(), rng)];
        let Some((player, ai_index)) = find_elsewhere(hands, pair_id, *want) else {
            continue;
        };
        let Some(give) =
            choose_human_give_index(&hands[HUMAN_SEAT], Some(pair_id.as_str()), *want, rng)
        else {
            break;
        };
        swap_with_human(hands, player, ai_index, give);
        swaps += 1;
    }

    for _ in 0..PAIR_ATTEMPTS {
        if count_complete_pairs(&hands[HUMAN_SEAT]) >= min_pairs {
            return swaps;
        }
        let mut chosen: Option<(String, (usize, usize), usize)> = None;
        'search: for player in (HUMAN_SEAT + 1)..hands.len() {
            for card in hands[player].iter().filter(|c| !c.is_joker()) {
                let Some(pair_id) = card.pair_id.as_deref() else {
                    continue;
                };
                let loc_a = find_elsewhere(hands, pair_id, Side::A);
                let loc_b = find_elsewhere(hands, pair_id, Side::B);
                if let (Some(loc_a), Some((b_player, _))) = (loc_a, loc_b) {
                    chosen = Some((pair_id.to_string(), loc_a, b_player));
                    break 'search;
                }
            }
        }
        let Some((pair_id, (a_player, a_index), b_player)) = chosen else {
            break;
        };

        let Some(give) =
            choose_human_give_index(&hands[HUMAN_SEAT], Some(pair_id.as_str()), Side::A, rng)
        else {
            break;
        };
        swap_with_human(hands, a_player, a_index, give);
        swaps += 1;

        let Some(give) =
            choose_human_give_index(&hands[HUMAN_SEAT], Some(pair_id.as_str()), Side::B, rng)
        else {
            break;
        };
        // the first swap may have changed seat b_player's hand
        let Some(b_index) = find_card_index(&hands[b_player], &pair_id, Side::B) else {
            continue;
        };
        swap_with_human(hands, b_player, b_index, give);
        swaps += 1;
    }
    let achieved = count_complete_pairs(&hands[HUMAN_SEAT]);
    if achieved < min_pairs {
        warn!(achieved, min_pairs, "human pair minimum not reached");
    }
    swaps
}

/// Deal [`HAND_SIZE`] cards to every seat with exactly the tier's number of
/// complete pairs each. The remaining cards are spread as singles so that no
/// seat ends up with both sides of a filler pair.
pub fn tiered_deal(
    pairs: &[PairingDefinition],
    player_count: usize,
    tier: u32,
    rng: &mut impl RngCore,
) -> Result<Vec<Vec<Card>>, DealError> {
    let expected = player_count * HAND_SIZE / 2;
    if pairs.len() != expected {
        return Err(DealError::PairCount {
            got: pairs.len(),
            expected,
        });
    }
    let targets = tier_targets(tier);
    let seat_targets: Vec<usize> = (0..player_count)
        .map(|player| {
            if player == HUMAN_SEAT {
                targets.human_pairs
            } else {
                targets.ai_pairs
            }
        })
        .collect();
    // singles needed per side for each seat
    let singles: Vec<usize> = seat_targets.iter().map(|t| HAND_SIZE / 2 - t).collect();
    let loose_pairs = pairs.len() - seat_targets.iter().sum::<usize>();
    let widest = singles.iter().copied().max().unwrap_or(0);
    // A seat needing more than half the loose A cards and B cards must receive both
    // halves of some pair
    if widest * 2 > loose_pairs {
        return Err(DealError::UnsatisfiableTargets { tier });
    }

    let mut pool: Vec<&PairingDefinition> = pairs.iter().collect();
    shuffle_in_place(&mut pool, rng);

    let mut hands: Vec<Vec<Card>> = vec![Vec::with_capacity(HAND_SIZE); player_count];
    for (player, target) in seat_targets.iter().enumerate() {
        for _ in 0..*target {
            let pair = pool.pop().ok_or(DealError::PoolExhausted("tiered pairs"))?;
            hands[player].push(pair.card(Side::A));
            hands[player].push(pair.card(Side::B));
        }
    }

    // Lay seats out in contiguous slot blocks and offset the B slots by the widest
    // block so each pair's halves always land in different blocks.
    let mut seat_order: Vec<usize> = (0..player_count).collect();
    shuffle_in_place(&mut seat_order, rng);
    let slots: Vec<usize> = seat_order
        .iter()
        .flat_map(|&player| std::iter::repeat(player).take(singles[player]))
        .collect();
    if slots.len() != pool.len() {
        return Err(DealError::PoolExhausted("tiered singles"));
    }
    for (k, pair) in pool.iter().enumerate() {
        hands[slots[k]].push(pair.card(Side::A));
        hands[slots[(k + widest) % slots.len()]].push(pair.card(Side::B));
    }

    for (player, hand) in hands.iter_mut().enumerate() {
        shuffle_in_place(hand, rng);
        verify_sides(player, hand)?;
        let found = count_complete_pairs(hand);
        if found != seat_targets[player] {
            return Err(DealError::PairCountMismatch {
                player,
                expected: seat_targets[player],
                found,
            });
        }
    }
    debug!(tier, human_pairs = targets.human_pairs, ai_pairs = targets.ai_pairs, "tiered deal");
    Ok(hands)
}

/// 5% six pairs, 15% two, 50% three, 30% four.
pub fn sample_human_pair_target(rng: &mut impl RngCore) -> usize {
    let roll = unit_float(rng);
    if roll < 0.05 {
        6
    } else if roll < 0.20 {
        2
    } else if roll < 0.70 {
        3
    } else {
        4
    }
}

fn verify_sides(player: usize, hand: &[Card]) -> Result<(), DealError> {
    let counts = count_sides(hand);
    if counts.a != counts.b {
        return Err(DealError::SideImbalance {
            player,
            a: counts.a,
            b: counts.b,
        });
    }
    Ok(())
}

/// The 22 pair, 4 seat deal. Returns the hands and the sampled human pair count.
pub fn constrained_deal(
    pairs: &[PairingDefinition],
    player_count: usize,
    rng: &mut impl RngCore,
) -> Result<(Vec<Vec<Card>>, usize), DealError> {
    if player_count != CONSTRAINED_PLAYER_COUNT {
        return Err(DealError::PlayerCount {
            got: player_count,
            expected: "exactly 4",
        });
    }
    if pairs.len() != CONSTRAINED_PAIR_COUNT {
        return Err(DealError::PairCount {
            got: pairs.len(),
            expected: CONSTRAINED_PAIR_COUNT,
        });
    }

    let mut ai_seats: Vec<usize> = (0..player_count).filter(|&p| p != HUMAN_SEAT).collect();
    shuffle_in_place(&mut ai_seats, rng);
    let mut seat_sizes = vec![0; player_count];
    seat_sizes[HUMAN_SEAT] = HAND_SIZE;
    for (seat, size) in ai_seats.iter().zip(CONSTRAINED_AI_SIZES) {
        seat_sizes[*seat] = size;
    }

    let mut pool: Vec<&PairingDefinition> = pairs.iter().collect();
    shuffle_in_place(&mut pool, rng);

    let target = sample_human_pair_target(rng);
    if target * 2 > HAND_SIZE || (HAND_SIZE - target * 2) % 2 != 0 {
        return Err(DealError::InvalidPairTarget(target));
    }
    let half_singles = (HAND_SIZE - target * 2) / 2;

    let mut hands: Vec<Vec<Card>> = vec![vec![]; player_count];
    for _ in 0..target {
        let pair = pool.pop().ok_or(DealError::PoolExhausted("human pairs"))?;
        hands[HUMAN_SEAT].push(pair.card(Side::A));
        hands[HUMAN_SEAT].push(pair.card(Side::B));
    }

    // Loose singles: the other half of each goes back to the AI pools
    let mut pool_a: Vec<Card> = vec![];
    let mut pool_b: Vec<Card> = vec![];
    for _ in 0..half_singles {
        let pair = pool.pop().ok_or(DealError::PoolExhausted("human singles"))?;
        hands[HUMAN_SEAT].push(pair.card(Side::A));
        pool_b.push(pair.card(Side::B));
    }
    for _ in 0..half_singles {
        let pair = pool.pop().ok_or(DealError::PoolExhausted("human singles"))?;
        hands[HUMAN_SEAT].push(pair.card(Side::B));
        pool_a.push(pair.card(Side::A));
    }
    for pair in pool {
        pool_a.push(pair.card(Side::A));
        pool_b.push(pair.card(Side::B));
    }
    shuffle_in_place(&mut pool_a, rng);
    shuffle_in_place(&mut pool_b, rng);

    for &seat in ai_seats.iter() {
        let half = seat_sizes[seat] / 2;
        for _ in 0..half {
            let card = pool_a.pop().ok_or(DealError::PoolExhausted("A pool"))?;
            hands[seat].push(card);
        }
        for _ in 0..half {
            let card = pool_b.pop().ok_or(DealError::PoolExhausted("B pool"))?;
            hands[seat].push(card);
        }
    }

    for (player, hand) in hands.iter_mut().enumerate() {
        shuffle_in_place(hand, rng);
        verify_sides(player, hand)?;
    }
    let found = count_complete_pairs(&hands[HUMAN_SEAT]);
    if found != target {
        return Err(DealError::PairCountMismatch {
            player: HUMAN_SEAT,
            expected: target,
            found,
        });
    }
    debug!(human_pairs = target, ?ai_seats, "constrained deal");
    Ok((hands, target))
}
