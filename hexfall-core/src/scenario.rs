//! Battle setup

use crate::board::{offset_to_hex, Board};
use crate::entity::Side;
use crate::hex::Hex;
use crate::roster::{Archetype, HEROES};
use crate::rules::Rules;
use crate::state::{BoardState, Potential};

/// Default enemy line-up
pub const ENEMIES: [Archetype; 4] = [
    Archetype::Grunt,
    Archetype::Grunt,
    Archetype::Archer,
    Archetype::Shaman,
];

/// Generate a battlefield and deploy both sides at opposite ends.
///
/// Heroes start on the west edge, enemies on the east. With
/// `scripted_heroes` the heroes are driven by their archetype script
/// instead of waiting for input. The first turn has already started.
pub fn skirmish(rules: &mut Rules, scripted_heroes: bool) -> BoardState {
    let config = rules.config().clone();
    let board = Board::generate(&config, rules.rng());
    let mut state = BoardState::new(
        board,
        Potential::new(config.starting_potential, config.potential_max),
    );

    let west = offset_to_hex(-config.map_half_width + 1, 0);
    let east = offset_to_hex(config.map_half_width - 1, 0);
    for archetype in HEROES {
        let Some(at) = deploy_hex(&state, west) else {
            break;
        };
        let entity = if scripted_heroes {
            archetype.build_scripted(at, Side::Hero)
        } else {
            archetype.build(at, Side::Hero)
        };
        state.add_entity(entity);
    }
    for archetype in ENEMIES {
        let Some(at) = deploy_hex(&state, east) else {
            break;
        };
        state.add_entity(archetype.build(at, Side::Enemy));
    }
    tracing::info!(
        seed = config.seed,
        units = state.entities().len(),
        "skirmish deployed"
    );

    rules.advance_turn(state)
}

/// Free, safe hex closest to `anchor`
fn deploy_hex(state: &BoardState, anchor: Hex) -> Option<Hex> {
    state
        .board()
        .coords()
        .iter()
        .copied()
        .filter(|&h| {
            state.is_landable(h)
                && state.tile_effect_at(h).is_none()
                && !state.board().tile(h).terrain.is_hard_stop()
        })
        .min_by_key(|&h| (h.distance_to(anchor), h))
}
