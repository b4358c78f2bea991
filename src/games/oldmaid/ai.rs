/*
Automated seat play: draw a random card from upstream, throw away every
complete pair, pass the turn. Pacing between actions is left to the caller.
*/

use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utils::random_index;

use super::error::GameError;
use super::game::{OldMaidGame, PlayerKind};

// Plenty for any deck; a game that runs longer is stuck
pub const DEFAULT_MAX_TURNS: usize = 10_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TurnSummary {
    pub player: usize,
    pub drawn: Option<String>,
    pub pairs_discarded: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlayOutSummary {
    pub turns: usize,
    pub loser: Option<usize>,
    pub finished: bool,
}

/// A uniformly random seat for the pending joker, AI seats only when the
/// game keeps it away from the human.
pub fn choose_joker_recipient(game: &OldMaidGame, rng: &mut impl RngCore) -> Option<usize> {
    let seats: Vec<usize> = (0..game.players.len())
        .filter(|&seat| !game.joker_avoids_human || game.players[seat].kind == PlayerKind::Ai)
        .collect();
    if seats.is_empty() {
        return None;
    }
    Some(seats[random_index(seats.len(), rng)])
}

/// Discard every complete pair in `player`'s hand, one pair per call into the game.
pub fn discard_all_pairs(game: &mut OldMaidGame, player: usize) -> usize {
    let mut discarded = 0;
    while !game.game_over {
        let Some((a, b)) = game.find_any_pair_in_hand(player) else {
            break;
        };
        let (a, b) = (a.id.clone(), b.id.clone());
        if !game.try_discard_pair(player, &a, &b).ok {
            break;
        }
        discarded += 1;
    }
    discarded
}

/// Play the current seat's whole turn.
pub fn play_turn(
    game: &mut OldMaidGame,
    rng: &mut impl RngCore,
) -> Result<TurnSummary, GameError> {
    if game.game_over {
        return Err(GameError::GameOver);
    }
    let player = game.current_player;
    let mut summary = TurnSummary {
        player,
        ..Default::default()
    };
    if game.players[player].out {
        game.advance_turn();
        return Ok(summary);
    }

    if let Some(target) = game.upstream_player() {
        if game.can_draw_from(target) && !game.turn_has_drawn {
            let index = random_index(game.players[target].hand.len(), rng);
            game.draw_card(target, index)?;
            summary.drawn = game
                .last_event
                .as_ref()
                .and_then(|event| event.card_ids.first().cloned());
        }
    }
    summary.pairs_discarded = discard_all_pairs(game, player);
    if !game.game_over {
        game.advance_turn();
    }
    Ok(summary)
}

/// Deliver the joker if it is still pending, then let every seat play
/// automatically until the game ends or `max_turns` runs out.
pub fn play_out(
    game: &mut OldMaidGame,
    rng: &mut impl RngCore,
    max_turns: usize,
) -> Result<PlayOutSummary, GameError> {
    if game.joker_pending.is_some() {
        if let Some(seat) = choose_joker_recipient(game, rng) {
            game.deliver_pending_joker(seat)?;
        }
    }
    let mut turns = 0;
    while !game.game_over && turns < max_turns {
        play_turn(game, rng)?;
        turns += 1;
    }
    debug!(turns, loser = ?game.loser, "played out");
    Ok(PlayOutSummary {
        turns,
        loser: game.loser,
        finished: game.game_over,
    })
}
