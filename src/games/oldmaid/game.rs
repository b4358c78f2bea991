/*
Game: Old Maid (picture / word matching variant)
Four seats, one human and three AI. Each turn the current player draws one
card from the upstream seat and discards matching A/B pairs. When only the
joker is left in play, whoever holds it loses.
*/

use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::card::Card;
use super::config::{DealStrategy, GameConfig};
use super::dealer::{deal, HUMAN_SEAT};
use super::error::{DealError, DiscardRejection, GameError};
use super::hand::find_any_pair;
use super::rng::GameRng;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum PlayerKind {
    #[default]
    Human,
    Ai,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    pub kind: PlayerKind,
    // Order is cosmetic
    pub hand: Vec<Card>,
    // True iff the hand is empty, refreshed after every hand change
    pub out: bool,
}

impl Player {
    pub fn new(seat: usize) -> Self {
        let (name, kind) = if seat == HUMAN_SEAT {
            ("You".to_string(), PlayerKind::Human)
        } else {
            (format!("AI{}", seat), PlayerKind::Ai)
        };
        Player {
            id: format!("p{}", seat + 1),
            name,
            kind,
            hand: vec![],
            out: false,
        }
    }

    #[inline]
    pub fn refresh_out(&mut self) {
        self.out = self.hand.is_empty();
    }

    pub fn holds_joker(&self) -> bool {
        self.hand.iter().any(|c| c.is_joker())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum EventType {
    #[default]
    Draw,
    DiscardPair,
    MismatchAttempt,
    TurnAdvanced,
    JokerDelivered,
    GameOver,
}

/// What the last operation did, for the presentation layer to animate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename(serialize = "type", deserialize = "type"))]
    pub event_type: EventType,
    // Acting seat (drawer, discarder, new current player or joker recipient)
    pub player: usize,
    // Seat drawn from
    pub target: Option<usize>,
    pub card_ids: Vec<String>,
    pub pair_id: Option<String>,
    // Drawn card's pairId was already in the drawer's hand
    pub has_potential_match: bool,
    pub reason: Option<DiscardRejection>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DiscardResult {
    pub ok: bool,
    pub reason: Option<DiscardRejection>,
}

impl DiscardResult {
    fn accepted() -> Self {
        DiscardResult {
            ok: true,
            reason: None,
        }
    }

    fn rejected(reason: DiscardRejection) -> Self {
        DiscardResult {
            ok: false,
            reason: Some(reason),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OldMaidGame {
    // Seats in turn order, seat 0 is the human
    pub players: Vec<Player>,
    // Whose turn it is
    pub current_player: usize,
    // Reset at the start of every turn
    pub turn_has_drawn: bool,
    // Discarded pairs in discard order
    pub discard_pile: Vec<Card>,
    pub game_over: bool,
    // Seat left holding the joker
    pub loser: Option<usize>,
    pub winner_text: Option<String>,
    pub last_event: Option<Event>,
    // The joker until it is delivered to a seat
    pub joker_pending: Option<Card>,
    pub strategy: DealStrategy,
    // The joker may only be delivered to AI seats
    pub joker_avoids_human: bool,
    // Complete pairs the dealer aimed to give the human
    pub human_pair_target: Option<usize>,
}

impl OldMaidGame {
    pub fn new(config: &GameConfig) -> Result<Self, DealError> {
        let mut rng = GameRng::from_seed(config.seed.as_deref());
        Self::new_with_rng(config, &mut rng)
    }

    pub fn new_with_rng(config: &GameConfig, rng: &mut impl RngCore) -> Result<Self, DealError> {
        let strategy = config.resolved_strategy();
        let dealt = deal(strategy, &config.pairs, config.player_count, rng)?;
        let players: Vec<Player> = dealt
            .hands
            .into_iter()
            .enumerate()
            .map(|(seat, hand)| {
                let mut player = Player::new(seat);
                player.hand = hand;
                player.refresh_out();
                player
            })
            .collect();
        let current_player = players.iter().position(|p| !p.out).unwrap_or(0);
        debug!(?strategy, current_player, "created game");
        Ok(OldMaidGame {
            players,
            current_player,
            turn_has_drawn: false,
            discard_pile: vec![],
            game_over: false,
            loser: None,
            winner_text: None,
            last_event: None,
            joker_pending: Some(dealt.joker),
            strategy,
            joker_avoids_human: config.resolved_joker_avoids_human(),
            human_pair_target: dealt.human_pair_target,
        })
    }

    /// Next seat after `start` that still has cards, wrapping around.
    /// None when every other seat is out.
    pub fn next_active_player(players: &[Player], start: usize) -> Option<usize> {
        let n = players.len();
        (1..n)
            .map(|step| (start + step) % n)
            .find(|&index| !players[index].out)
    }

    /// Previous seat before `start` that still has cards, wrapping around.
    pub fn prev_active_player(players: &[Player], start: usize) -> Option<usize> {
        let n = players.len();
        (1..n)
            .map(|step| (start + n - step) % n)
            .find(|&index| !players[index].out)
    }

    pub fn count_non_joker_cards(players: &[Player]) -> usize {
        players
            .iter()
            .map(|p| p.hand.iter().filter(|c| !c.is_joker()).count())
            .sum()
    }

    pub fn find_joker_holder(players: &[Player]) -> Option<usize> {
        players.iter().position(|p| p.holds_joker())
    }

    pub fn next_player(&self) -> Option<usize> {
        Self::next_active_player(&self.players, self.current_player)
    }

    /// The only seat the current player may draw from.
    pub fn upstream_player(&self) -> Option<usize> {
        Self::prev_active_player(&self.players, self.current_player)
    }

    pub fn can_draw_from(&self, target: usize) -> bool {
        self.players
            .get(target)
            .is_some_and(|p| !p.out && !p.hand.is_empty())
    }

    /// Ending a turn needs a draw first, unless upstream has nothing to give.
    pub fn can_end_turn(&self) -> bool {
        if self.game_over {
            return false;
        }
        self.turn_has_drawn
            || self
                .upstream_player()
                .map_or(true, |upstream| !self.can_draw_from(upstream))
    }

    pub fn find_any_pair_in_hand(&self, player: usize) -> Option<(&Card, &Card)> {
        self.players.get(player).and_then(|p| find_any_pair(&p.hand))
    }

    pub fn is_human_turn(&self) -> bool {
        !self.game_over && self.players[self.current_player].kind == PlayerKind::Human
    }

    /// Ends the game once no matchable card is left in any hand.
    fn check_game_over(&mut self) -> bool {
        if self.game_over {
            return true;
        }
        if Self::count_non_joker_cards(&self.players) > 0 {
            return false;
        }
        self.finish();
        true
    }

    fn finish(&mut self) {
        self.game_over = true;
        self.loser = Self::find_joker_holder(&self.players);
        self.winner_text = Some(match self.loser {
            Some(loser) => format!(
                "Game over: {} is left holding the joker and loses!",
                self.players[loser].name
            ),
            None => "Game over".to_string(),
        });
        info!(loser = ?self.loser, "game over");
    }

    /// Move one card from `target`'s hand into the current player's hand.
    pub fn draw_card(&mut self, target: usize, card_index: usize) -> Result<(), GameError> {
        if self.check_game_over() {
            return Err(GameError::GameOver);
        }
        let current = self.current_player;
        if self.players[current].out {
            return Err(GameError::CurrentPlayerOut(current));
        }
        if target >= self.players.len() {
            return Err(GameError::NoSuchPlayer(target));
        }
        if !self.can_draw_from(target) {
            return Err(GameError::TargetUnavailable(target));
        }
        let upstream = self.upstream_player();
        if upstream != Some(target) {
            return Err(GameError::NotUpstream {
                expected: upstream,
                target,
            });
        }
        if self.turn_has_drawn {
            return Err(GameError::AlreadyDrawn(current));
        }
        let len = self.players[target].hand.len();
        if card_index >= len {
            return Err(GameError::InvalidCardIndex {
                index: card_index,
                len,
            });
        }

        let drawn = self.players[target].hand.remove(card_index);
        let has_potential_match = drawn.pair_id.as_ref().is_some_and(|pair_id| {
            self.players[current]
                .hand
                .iter()
                .any(|c| c.pair_id.as_ref() == Some(pair_id))
        });
        self.last_event = Some(Event {
            event_type: EventType::Draw,
            player: current,
            target: Some(target),
            card_ids: vec![drawn.id.clone()],
            pair_id: drawn.pair_id.clone(),
            has_potential_match,
            ..Default::default()
        });
        self.players[current].hand.push(drawn);
        self.turn_has_drawn = true;
        self.players[current].refresh_out();
        self.players[target].refresh_out();
        self.check_game_over();
        Ok(())
    }

    fn reject_discard(
        &mut self,
        player: usize,
        card_ids: [&str; 2],
        reason: DiscardRejection,
    ) -> DiscardResult {
        self.last_event = Some(Event {
            event_type: EventType::MismatchAttempt,
            player,
            card_ids: card_ids.iter().map(|id| id.to_string()).collect(),
            reason: Some(reason),
            ..Default::default()
        });
        DiscardResult::rejected(reason)
    }

    /// Discard two cards from `player`'s hand if they form an A/B pair.
    /// Rule violations come back as a rejected result and leave hands alone.
    pub fn try_discard_pair(
        &mut self,
        player: usize,
        card_id_a: &str,
        card_id_b: &str,
    ) -> DiscardResult {
        let ids = [card_id_a, card_id_b];
        if self.check_game_over() {
            return self.reject_discard(player, ids, DiscardRejection::GameOver);
        }
        let Some(seat) = self.players.get(player) else {
            return self.reject_discard(player, ids, DiscardRejection::NoSuchPlayer);
        };
        if seat.out {
            return self.reject_discard(player, ids, DiscardRejection::PlayerOut);
        }
        if card_id_a == card_id_b {
            return self.reject_discard(player, ids, DiscardRejection::SameCard);
        }
        let a = seat.hand.iter().find(|c| c.id == card_id_a);
        let b = seat.hand.iter().find(|c| c.id == card_id_b);
        let (Some(a), Some(b)) = (a, b) else {
            return self.reject_discard(player, ids, DiscardRejection::NotFound);
        };
        let reason = match (&a.pair_id, &b.pair_id) {
            (None, _) | (_, None) => Some(DiscardRejection::JokerOrInvalid),
            (Some(x), Some(y)) if x != y => Some(DiscardRejection::Mismatch),
            _ if a.side.is_none() || b.side.is_none() || a.side == b.side => {
                Some(DiscardRejection::SameSide)
            }
            _ => None,
        };
        if let Some(reason) = reason {
            return self.reject_discard(player, ids, reason);
        }
        let pair_id = a.pair_id.clone();

        let hand = &mut self.players[player].hand;
        let mut removed: Vec<Card> = Vec::with_capacity(2);
        for id in ids {
            if let Some(index) = hand.iter().position(|c| c.id == id) {
                removed.push(hand.remove(index));
            }
        }
        self.last_event = Some(Event {
            event_type: EventType::DiscardPair,
            player,
            card_ids: removed.iter().map(|c| c.id.clone()).collect(),
            pair_id,
            ..Default::default()
        });
        self.discard_pile.extend(removed);
        self.players[player].refresh_out();
        self.check_game_over();
        DiscardResult::accepted()
    }

    /// Hand the turn to the next seat with cards. A seat left alone with
    /// cards keeps the turn. Returns the new current player, or None when
    /// the game ended instead.
    pub fn advance_turn(&mut self) -> Option<usize> {
        if self.check_game_over() {
            return None;
        }
        let current = self.current_player;
        let next = self
            .next_player()
            .or_else(|| (!self.players[current].out).then_some(current));
        let Some(next) = next else {
            self.finish();
            self.last_event = Some(Event {
                event_type: EventType::GameOver,
                player: self.current_player,
                ..Default::default()
            });
            return None;
        };
        self.current_player = next;
        self.turn_has_drawn = false;
        self.last_event = Some(Event {
            event_type: EventType::TurnAdvanced,
            player: next,
            ..Default::default()
        });
        Some(next)
    }

    /// Put the pending joker into `player`'s hand.
    pub fn deliver_pending_joker(&mut self, player: usize) -> Result<(), GameError> {
        if self.check_game_over() {
            return Err(GameError::GameOver);
        }
        if player >= self.players.len() {
            return Err(GameError::NoSuchPlayer(player));
        }
        if self.joker_avoids_human && self.players[player].kind == PlayerKind::Human {
            return Err(GameError::JokerAvoidsHuman(player));
        }
        let joker = self.joker_pending.take().ok_or(GameError::NoPendingJoker)?;
        self.last_event = Some(Event {
            event_type: EventType::JokerDelivered,
            player,
            card_ids: vec![joker.id.clone()],
            ..Default::default()
        });
        self.players[player].hand.push(joker);
        self.players[player].refresh_out();
        Ok(())
    }

    /// Every card the game knows about: hands, discards and the pending joker.
    pub fn all_cards(&self) -> Vec<&Card> {
        self.players
            .iter()
            .flat_map(|p| p.hand.iter())
            .chain(self.discard_pile.iter())
            .chain(self.joker_pending.iter())
            .collect()
    }
}
