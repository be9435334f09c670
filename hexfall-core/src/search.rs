//! Spatial queries: range scans, movement reachability, pathfinding
//!
//! Every scan returns a map from reachable hex to accumulated cost. Costs
//! grow with search depth and a hex is only kept while the running total
//! stays within the caller's budget.

use crate::action::TargetCategory;
use crate::entity::{Entity, EntityId};
use crate::hex::{Hex, DIRECTIONS};
use crate::state::BoardState;
use rustc_hash::FxHashMap;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Incremental targeting cost by search depth; the last entry repeats
pub const RANGE_DEPTH_COST: [u32; 10] = [0, 0, 0, 0, 0, 1, 1, 2, 2, 3];

fn depth_cost(table: &[u32], depth: usize) -> u32 {
    table
        .get(depth)
        .or_else(|| table.last())
        .copied()
        .unwrap_or(0)
}

/// Hex -> accumulated cost
pub type CostMap = FxHashMap<Hex, u32>;

// ============================================================================
// RANGE SCANS
// ============================================================================

/// Flood-fill outward from `origin` up to `radius`.
///
/// Opaque tiles are excluded unless `pass_opaque`. Occupied hexes are
/// included but only expanded through when `pass_units`.
pub fn range_scan(
    state: &BoardState,
    origin: Hex,
    radius: u32,
    budget: u32,
    pass_units: bool,
    pass_opaque: bool,
) -> CostMap {
    let board = state.board();
    let mut costs = CostMap::default();
    costs.insert(origin, 0);
    let mut frontier = vec![origin];

    for depth in 1..=radius as usize {
        let mut next = Vec::new();
        for &hex in &frontier {
            if hex != origin && !pass_units && state.occupant_at(hex).is_some() {
                continue;
            }
            let base = costs[&hex];
            for neighbor in hex.neighbors() {
                if costs.contains_key(&neighbor) {
                    continue;
                }
                let Some(tile) = board.get(neighbor) else {
                    continue;
                };
                if tile.blocks_los && !pass_opaque {
                    continue;
                }
                let cost = base + depth_cost(&RANGE_DEPTH_COST, depth);
                if cost > budget {
                    continue;
                }
                costs.insert(neighbor, cost);
                next.push(neighbor);
            }
        }
        if next.is_empty() {
            break;
        }
        frontier = next;
    }

    costs
}

/// Walk the six cube axes from `origin`.
///
/// A ray ends at the map edge, at an opaque tile (exclusive) unless
/// `pass_opaque`, and at the first occupied hex (inclusive) unless
/// `pass_units`.
pub fn axis_scan(
    state: &BoardState,
    origin: Hex,
    radius: u32,
    budget: u32,
    pass_units: bool,
    pass_opaque: bool,
) -> CostMap {
    let board = state.board();
    let mut costs = CostMap::default();
    costs.insert(origin, 0);

    for dir in DIRECTIONS {
        let mut cost = 0;
        for k in 1..=radius as i32 {
            let hex = origin + dir * k;
            let Some(tile) = board.get(hex) else {
                break;
            };
            if tile.blocks_los && !pass_opaque {
                break;
            }
            cost += depth_cost(&RANGE_DEPTH_COST, k as usize);
            if cost > budget {
                break;
            }
            let entry = costs.entry(hex).or_insert(cost);
            *entry = (*entry).min(cost);
            if !pass_units && state.occupant_at(hex).is_some() {
                break;
            }
        }
    }

    costs
}

// ============================================================================
// MOVEMENT
// ============================================================================

/// Can `mover` step onto `hex` on its way somewhere
fn can_enter(state: &BoardState, mover: &Entity, hex: Hex) -> bool {
    let Some(character) = mover.as_character() else {
        return false;
    };
    let Some(tile) = state.board().get(hex) else {
        return false;
    };
    if !tile.walkable && !character.movement.ignores_terrain() {
        return false;
    }
    match state.occupant_at(hex) {
        Some(occupant) if occupant.id != mover.id => occupant
            .side()
            .map_or(false, |side| character.movement.can_pass(character.side, side)),
        _ => true,
    }
}

/// Movement must stop on this hex
fn halts_movement(state: &BoardState, mover: &Entity, hex: Hex) -> bool {
    let phases = mover
        .as_character()
        .is_some_and(|c| c.movement.ignores_terrain());
    !phases && state.board().tile(hex).terrain.is_hard_stop()
}

/// Weighted flood-fill of every hex `mover` can end its move on.
///
/// Each step costs the speed curve at that depth plus terrain cost plus
/// any tile-effect modifier. The start hex is not included.
pub fn reachable(state: &BoardState, mover_id: EntityId, budget: u32) -> CostMap {
    let Some(mover) = state.character(mover_id) else {
        return CostMap::default();
    };
    let Some(character) = mover.as_character() else {
        return CostMap::default();
    };
    let curve = character.speed.curve();
    let max_depth = curve.len() - 1;
    let start = mover.position;

    let mut best = CostMap::default();
    best.insert(start, 0);
    let mut heap = BinaryHeap::new();
    heap.push(Reverse((0u32, 0usize, start)));

    while let Some(Reverse((cost, depth, hex))) = heap.pop() {
        if best.get(&hex).is_some_and(|&c| cost > c) {
            continue;
        }
        if depth >= max_depth || (depth > 0 && halts_movement(state, mover, hex)) {
            continue;
        }
        for neighbor in hex.neighbors() {
            if !can_enter(state, mover, neighbor) {
                continue;
            }
            let next = cost + step_cost(state, curve, depth + 1, neighbor);
            if next > budget {
                continue;
            }
            if best.get(&neighbor).map_or(true, |&c| next < c) {
                best.insert(neighbor, next);
                heap.push(Reverse((next, depth + 1, neighbor)));
            }
        }
    }

    best.remove(&start);
    best.retain(|&hex, _| state.is_landable(hex));
    tracing::trace!(mover = %mover_id, count = best.len(), "movement scan");
    best
}

/// Best-first path search from the mover to `goal`, excluding the start.
///
/// Steps are costed exactly as in [`reachable`]; the queue is ordered by
/// accumulated cost plus cube distance, with fewer steps winning ties.
/// Water and lava are only usable as the final hex. Optimal on
/// uniform-cost maps.
pub fn find_path(state: &BoardState, mover_id: EntityId, goal: Hex) -> Option<Vec<Hex>> {
    let mover = state.character(mover_id)?;
    let curve = mover.as_character()?.speed.curve();
    let start = mover.position;
    if start == goal || !state.is_landable(goal) {
        return None;
    }

    // hex -> (cost, steps) of the best known route
    let mut best: FxHashMap<Hex, (u32, usize)> = FxHashMap::default();
    let mut came_from: FxHashMap<Hex, Hex> = FxHashMap::default();
    let mut open = BinaryHeap::new();
    best.insert(start, (0, 0));
    open.push(Reverse((start.distance_to(goal) as u32, 0u32, 0usize, start)));

    while let Some(Reverse((_, g, depth, hex))) = open.pop() {
        if hex == goal {
            let mut path = vec![goal];
            let mut current = goal;
            while let Some(&prev) = came_from.get(&current) {
                if prev == start {
                    break;
                }
                path.push(prev);
                current = prev;
            }
            path.reverse();
            return Some(path);
        }
        if best.get(&hex).is_some_and(|&known| (g, depth) > known) {
            continue;
        }
        if hex != start && halts_movement(state, mover, hex) {
            continue;
        }
        for neighbor in hex.neighbors() {
            if !can_enter(state, mover, neighbor) {
                continue;
            }
            let next = (g + step_cost(state, curve, depth + 1, neighbor), depth + 1);
            if best.get(&neighbor).map_or(true, |&known| next < known) {
                best.insert(neighbor, next);
                came_from.insert(neighbor, hex);
                let f = next.0 + neighbor.distance_to(goal) as u32;
                open.push(Reverse((f, next.0, next.1, neighbor)));
            }
        }
    }

    None
}

/// Cost of entering `hex` as the `depth`-th step of a move
fn step_cost(state: &BoardState, curve: &[u32], depth: usize, hex: Hex) -> u32 {
    depth_cost(curve, depth) + state.board().tile(hex).move_cost + state.effect_move_cost(hex)
}

// ============================================================================
// DIRECTION HELPERS
// ============================================================================

/// Neighbour of `of` closest to `from`.
///
/// Ties on cube distance fall back to squared distance in the 2D
/// projection, then to direction order.
pub fn nearest_neighbor(from: Hex, of: Hex) -> Hex {
    let mut best = of.neighbor(0);
    for candidate in of.neighbors().into_iter().skip(1) {
        let d_best = best.distance_to(from);
        let d_cand = candidate.distance_to(from);
        if d_cand < d_best
            || (d_cand == d_best && candidate.pixel_distance_sq(from) < best.pixel_distance_sq(from))
        {
            best = candidate;
        }
    }
    best
}

/// Unit direction that knocks `target` away from `source`
pub fn push_direction(source: Hex, target: Hex) -> Hex {
    target - nearest_neighbor(source, target)
}

/// Unit direction from `from` that heads towards `to`
pub fn heading(from: Hex, to: Hex) -> Hex {
    nearest_neighbor(to, from) - from
}

// ============================================================================
// TARGET LEGALITY
// ============================================================================

/// Every hex `actor` may target with an action of this category
pub fn valid_targets(
    state: &BoardState,
    actor_id: EntityId,
    category: TargetCategory,
    radius: u32,
    budget: u32,
) -> CostMap {
    let Some(actor) = state.character(actor_id) else {
        return CostMap::default();
    };
    let origin = actor.position;

    match category {
        TargetCategory::Free => range_scan(state, origin, radius, budget, false, false),
        TargetCategory::FreeIgnoreUnits => range_scan(state, origin, radius, budget, true, false),
        TargetCategory::FreeIgnoreLos => range_scan(state, origin, radius, budget, false, true),
        TargetCategory::Axis => axis_scan(state, origin, radius, budget, false, false),
        TargetCategory::AxisIgnoreUnits => axis_scan(state, origin, radius, budget, true, false),
        TargetCategory::AxisIgnoreLos => axis_scan(state, origin, radius, budget, false, true),
        TargetCategory::Move => reachable(state, actor_id, budget),
        TargetCategory::FixedMove => state
            .board()
            .coords()
            .iter()
            .copied()
            .filter(|&h| h.distance_to(origin) == radius as i32 && state.is_landable(h))
            .map(|h| (h, 0))
            .collect(),
        TargetCategory::AxisFixedMove => DIRECTIONS
            .iter()
            .map(|&d| origin + d * radius as i32)
            .filter(|&h| state.is_landable(h))
            .map(|h| (h, 0))
            .collect(),
    }
}
