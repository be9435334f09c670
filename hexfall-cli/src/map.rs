//! Map command - print a generated battlefield

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use hexfall_core::board::offset_to_hex;
use hexfall_core::{scenario, Board, BoardState, Potential, Rules, Side};

#[derive(Args)]
pub struct MapArgs {
    /// Rules config JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Deploy the default rosters before printing
    #[arg(long)]
    pub units: bool,
}

pub fn run(args: MapArgs, seed: Option<u64>) -> Result<()> {
    let config = crate::load_config(args.config.as_deref(), seed)?;
    let mut rules = Rules::new(config.clone());

    let state = if args.units {
        scenario::skirmish(&mut rules, true)
    } else {
        let board = Board::generate(&config, rules.rng());
        BoardState::new(board, Potential::new(config.starting_potential, config.potential_max))
    };

    println!("{}", render(&state));
    Ok(())
}

/// ASCII rendering, odd rows shifted half a hex right.
///
/// Terrain uses its glyph; heroes are upper-case initials, enemies
/// lower-case, tile effects `*`.
pub fn render(state: &BoardState) -> String {
    let board = state.board();
    let mut out = String::new();
    for row in -board.half_height()..=board.half_height() {
        if row & 1 == 1 {
            out.push(' ');
        }
        for col in -board.half_width()..=board.half_width() {
            let hex = offset_to_hex(col, row);
            out.push(glyph_at(state, hex));
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

fn glyph_at(state: &BoardState, hex: hexfall_core::Hex) -> char {
    if let Some(unit) = state.occupant_at(hex) {
        let initial = unit.name.chars().next().unwrap_or('?');
        return match unit.side() {
            Some(Side::Hero) => initial.to_ascii_uppercase(),
            _ => initial.to_ascii_lowercase(),
        };
    }
    if state.tile_effect_at(hex).is_some() {
        return '*';
    }
    state.board().get(hex).map_or(' ', |t| t.terrain.glyph())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexfall_core::{Archetype, Hex, Terrain};

    #[test]
    fn test_render_dimensions() {
        let mut state = BoardState::new(Board::uniform(2, 1, Terrain::Ground), Potential::new(0, 1));
        state.add_entity(Archetype::Knight.build(Hex::ORIGIN, Side::Hero));
        state.add_entity(Archetype::Grunt.build(Hex::axial(1, -1), Side::Enemy));
        let text = render(&state);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains('K'));
        assert!(lines[1].contains('g'));
        assert!(lines[0].starts_with(' '));
    }
}
