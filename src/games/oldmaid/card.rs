use enum_iterator::Sequence;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const JOKER_ID: &str = "joker";

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, Sequence, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CardKind {
    #[default]
    #[serde(rename = "img")]
    Image,
    #[serde(rename = "joker")]
    Joker,
}

/// One matchable unit: a key plus the display payload for each side.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PairingDefinition {
    pub key: String,
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
}

impl PairingDefinition {
    pub fn new(key: impl Into<String>, a: impl Into<String>, b: impl Into<String>) -> Self {
        PairingDefinition {
            key: key.into(),
            a: a.into(),
            b: b.into(),
        }
    }

    pub fn card(&self, side: Side) -> Card {
        let image = match side {
            Side::A => &self.a,
            Side::B => &self.b,
        };
        Card {
            id: format!("{}_{:?}", self.key, side),
            kind: CardKind::Image,
            pair_id: Some(self.key.clone()),
            side: Some(side),
            image: Some(image.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    #[serde(rename(serialize = "type", deserialize = "type"))]
    pub kind: CardKind,
    // None only for the joker
    pub pair_id: Option<String>,
    // None only for the joker
    pub side: Option<Side>,
    #[serde(rename(serialize = "imgSrc", deserialize = "imgSrc"))]
    pub image: Option<String>,
}

impl Card {
    pub fn joker() -> Self {
        Card {
            id: JOKER_ID.to_string(),
            kind: CardKind::Joker,
            pair_id: None,
            side: None,
            image: None,
        }
    }

    #[inline]
    pub fn is_joker(&self) -> bool {
        self.kind == CardKind::Joker
    }

    /// Same pairId on opposite sides.
    pub fn matches(&self, other: &Card) -> bool {
        match (&self.pair_id, &other.pair_id, self.side, other.side) {
            (Some(a), Some(b), Some(side_a), Some(side_b)) => a == b && side_a != side_b,
            _ => false,
        }
    }
}

/// Every pairing definition as an A card then a B card, followed by one joker.
/// Order follows the input; nothing is shuffled here.
pub fn build_deck(pairs: &[PairingDefinition]) -> Vec<Card> {
    let mut deck: Vec<Card> = Vec::with_capacity(pairs.len() * 2 + 1);
    for pair in pairs {
        deck.push(pair.card(Side::A));
        deck.push(pair.card(Side::B));
    }
    deck.push(Card::joker());
    deck
}

pub struct ExtractedDeck {
    pub joker: Card,
    pub rest: Vec<Card>,
}

/// Split the first joker off a deck. A deck without one gets a synthetic joker
/// so the one-joker-per-game invariant holds downstream.
pub fn extract_joker(deck: Vec<Card>) -> ExtractedDeck {
    let mut joker: Option<Card> = None;
    let mut rest: Vec<Card> = Vec::with_capacity(deck.len());
    for card in deck {
        if card.is_joker() && joker.is_none() {
            joker = Some(card);
        } else {
            rest.push(card);
        }
    }
    let joker = joker.unwrap_or_else(|| {
        warn!("deck had no joker, synthesizing one");
        Card::joker()
    });
    ExtractedDeck { joker, rest }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enum_iterator::all;

    fn pairs(n: usize) -> Vec<PairingDefinition> {
        (0..n)
            .map(|i| {
                PairingDefinition::new(
                    format!("k{}", i),
                    format!("a{}.png", i),
                    format!("b{}.png", i),
                )
            })
            .collect()
    }

    #[test]
    fn test_deck_composition() {
        let deck = build_deck(&pairs(5));
        assert_eq!(deck.len(), 11);
        assert_eq!(deck.iter().filter(|c| c.is_joker()).count(), 1);
        for side in all::<Side>() {
            assert_eq!(
                deck.iter().filter(|c| c.side == Some(side)).count(),
                5,
                "wrong count for {:?}",
                side
            );
        }
        assert_eq!(deck[0].id, "k0_A");
        assert_eq!(deck[1].id, "k0_B");
        assert_eq!(deck[1].image.as_deref(), Some("b0.png"));
        assert_eq!(deck[10].id, JOKER_ID);
    }

    #[test]
    fn test_extract_joker() {
        let extracted = extract_joker(build_deck(&pairs(3)));
        assert!(extracted.joker.is_joker());
        assert_eq!(extracted.rest.len(), 6);
        assert!(extracted.rest.iter().all(|c| !c.is_joker()));
    }

    #[test]
    fn test_extract_joker_synthesizes_missing_joker() {
        let mut deck = build_deck(&pairs(2));
        deck.retain(|c| !c.is_joker());
        let extracted = extract_joker(deck);
        assert_eq!(extracted.joker, Card::joker());
        assert_eq!(extracted.rest.len(), 4);
    }

    #[test]
    fn test_extract_joker_keeps_second_joker_in_rest() {
        let mut deck = build_deck(&pairs(1));
        deck.push(Card::joker());
        let extracted = extract_joker(deck);
        assert_eq!(extracted.rest.iter().filter(|c| c.is_joker()).count(), 1);
    }

    #[test]
    fn test_matches() {
        let def = PairingDefinition::new("x", "a", "b");
        let other = PairingDefinition::new("y", "a", "b");
        assert!(def.card(Side::A).matches(&def.card(Side::B)));
        assert!(!def.card(Side::A).matches(&def.card(Side::A)));
        assert!(!def.card(Side::A).matches(&other.card(Side::B)));
        assert!(!def.card(Side::A).matches(&Card::joker()));
    }

    #[test]
    fn test_pairing_definition_json() {
        let def: PairingDefinition =
            serde_json::from_str(r#"{"key":"2_1","A":"a.png","B":"b.png"}"#).unwrap();
        assert_eq!(def, PairingDefinition::new("2_1", "a.png", "b.png"));
        let card = serde_json::to_value(def.card(Side::B)).unwrap();
        assert_eq!(card["type"], "img");
        assert_eq!(card["pairId"], "2_1");
        assert_eq!(card["side"], "B");
    }
}
