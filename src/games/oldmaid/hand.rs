use std::collections::{HashMap, HashSet};

use super::card::{Card, Side};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SideCounts {
    pub a: usize,
    pub b: usize,
}

impl SideCounts {
    pub fn get(&self, side: Side) -> usize {
        match side {
            Side::A => self.a,
            Side::B => self.b,
        }
    }

    /// Signed A minus B.
    pub fn imbalance(&self) -> i64 {
        self.a as i64 - self.b as i64
    }
}

/// Side totals, ignoring the joker.
pub fn count_sides(hand: &[Card]) -> SideCounts {
    let mut counts = SideCounts::default();
    for card in hand.iter().filter(|c| !c.is_joker()) {
        match card.side {
            Some(Side::A) => counts.a += 1,
            Some(Side::B) => counts.b += 1,
            None => {}
        }
    }
    counts
}

/// pairIds for which both sides are in the hand.
pub fn complete_pair_ids(hand: &[Card]) -> HashSet<&str> {
    let mut seen: HashMap<&str, (bool, bool)> = HashMap::new();
    for card in hand.iter().filter(|c| !c.is_joker()) {
        if let (Some(pair_id), Some(side)) = (card.pair_id.as_deref(), card.side) {
            let entry = seen.entry(pair_id).or_default();
            match side {
                Side::A => entry.0 = true,
                Side::B => entry.1 = true,
            }
        }
    }
    seen.into_iter()
        .filter(|(_, (a, b))| *a && *b)
        .map(|(pair_id, _)| pair_id)
        .collect()
}

pub fn count_complete_pairs(hand: &[Card]) -> usize {
    complete_pair_ids(hand).len()
}

/// The first complete pair in hand order, A side first.
pub fn find_any_pair(hand: &[Card]) -> Option<(&Card, &Card)> {
    for card in hand {
        if let Some(other) = hand.iter().find(|c| card.matches(c)) {
            return match card.side {
                Some(Side::A) => Some((card, other)),
                _ => Some((other, card)),
            };
        }
    }
    None
}

/// Position of the first card sharing `pair_id`.
pub fn find_match_index(hand: &[Card], pair_id: &str) -> Option<usize> {
    hand.iter().position(|c| c.pair_id.as_deref() == Some(pair_id))
}

/// Position of the card with this pairId and side.
pub fn find_card_index(hand: &[Card], pair_id: &str, side: Side) -> Option<usize> {
    hand.iter()
        .position(|c| c.pair_id.as_deref() == Some(pair_id) && c.side == Some(side))
}

/// Remove every complete pair from the hand and return the removed cards.
pub fn discard_all_pairs(hand: &mut Vec<Card>) -> Vec<Card> {
    let mut removed: Vec<Card> = vec![];
    while let Some((a, b)) = find_any_pair(hand.as_slice()) {
        let (a_id, b_id) = (a.id.clone(), b.id.clone());
        for id in [a_id, b_id] {
            if let Some(index) = hand.iter().position(|c| c.id == id) {
                removed.push(hand.remove(index));
            }
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::oldmaid::card::PairingDefinition;

    fn def(key: &str) -> PairingDefinition {
        PairingDefinition::new(key, format!("{}_a", key), format!("{}_b", key))
    }

    #[test]
    fn test_count_sides_ignores_joker() {
        let hand = vec![
            def("x").card(Side::A),
            def("y").card(Side::A),
            def("y").card(Side::B),
            Card::joker(),
        ];
        assert_eq!(count_sides(&hand), SideCounts { a: 2, b: 1 });
        assert_eq!(count_sides(&hand).imbalance(), 1);
    }

    #[test]
    fn test_count_complete_pairs() {
        let hand = vec![
            def("x").card(Side::A),
            def("y").card(Side::B),
            def("x").card(Side::B),
            def("z").card(Side::A),
            def("y").card(Side::A),
            Card::joker(),
        ];
        assert_eq!(count_complete_pairs(&hand), 2);
        assert!(complete_pair_ids(&hand).contains("x"));
        assert!(!complete_pair_ids(&hand).contains("z"));
    }

    #[test]
    fn test_find_any_pair_orders_a_first() {
        let hand = vec![
            def("z").card(Side::A),
            def("y").card(Side::B),
            def("y").card(Side::A),
        ];
        let (a, b) = find_any_pair(&hand).expect("y is complete");
        assert_eq!(a.id, "y_A");
        assert_eq!(b.id, "y_B");
        assert!(find_any_pair(&hand[..2]).is_none());
        assert!(find_any_pair(&[Card::joker()]).is_none());
    }

    #[test]
    fn test_find_match_index() {
        let hand = vec![def("x").card(Side::A), def("y").card(Side::B)];
        assert_eq!(find_match_index(&hand, "y"), Some(1));
        assert_eq!(find_match_index(&hand, "q"), None);
        assert_eq!(find_card_index(&hand, "y", Side::A), None);
        assert_eq!(find_card_index(&hand, "x", Side::A), Some(0));
    }

    #[test]
    fn test_discard_all_pairs() {
        let mut hand = vec![
            def("x").card(Side::A),
            Card::joker(),
            def("y").card(Side::B),
            def("x").card(Side::B),
            def("w").card(Side::B),
            def("y").card(Side::A),
        ];
        let removed = discard_all_pairs(&mut hand);
        assert_eq!(removed.len(), 4);
        let remaining: Vec<&str> = hand.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(remaining, vec!["joker", "w_B"]);
    }
}
