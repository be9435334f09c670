//! Simulate command - run a fully scripted skirmish
//!
//! ## Architecture
//!
//! - Level 1: run() - orchestration
//! - Level 2: play(), report()
//! - Level 3: formatting utilities

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use hexfall_core::{ai, scenario, BoardState, Event, Rules, RulesConfig, Side};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct SimulateArgs {
    /// Rules config JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Stop after this many turns even if nobody has won
    #[arg(long, default_value = "200")]
    pub turns: u32,

    /// Output the result (and event log) as JSON
    #[arg(long)]
    pub json: bool,

    /// Include every event in the output
    #[arg(long)]
    pub events: bool,
}

/// Outcome of one simulated battle
struct Battle {
    seed: u64,
    final_state: BoardState,
    events: Vec<Event>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run simulate command
///
/// 1. Load the rules config
/// 2. Deploy and play the skirmish
/// 3. Report the outcome
pub fn run(args: SimulateArgs, seed: Option<u64>) -> Result<()> {
    let config = crate::load_config(args.config.as_deref(), seed)?;

    tracing::info!(seed = config.seed, turns = args.turns, "starting skirmish");

    let battle = play(config, args.turns);
    report(&battle, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn play(config: RulesConfig, max_turns: u32) -> Battle {
    let seed = config.seed;
    let mut rules = Rules::new(config);
    let mut state = scenario::skirmish(&mut rules, true);
    let mut events = rules.take_events();

    while !state.is_over() && state.turn < max_turns {
        if state.active().is_none() {
            break;
        }
        state = ai::take_turn(&mut rules, state);
        let turn_events = rules.take_events();
        tracing::debug!(turn = state.turn, events = turn_events.len(), "turn resolved");
        events.extend(turn_events);
    }

    match state.winner() {
        Some(winner) => tracing::info!(?winner, turns = state.turn, "battle decided"),
        None => tracing::info!(turns = state.turn, "turn limit reached"),
    }

    Battle {
        seed,
        final_state: state,
        events,
    }
}

fn report(battle: &Battle, args: &SimulateArgs) -> Result<()> {
    if args.json {
        print_json(battle, args.events)
    } else {
        print_text(battle, args.events);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - UTILITIES
// ============================================================================

#[derive(Serialize)]
struct JsonSurvivor {
    name: String,
    side: Side,
    health: i32,
    max_health: i32,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    seed: u64,
    turns: u32,
    winner: Option<Side>,
    survivors: Vec<JsonSurvivor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    events: Option<&'a [Event]>,
}

fn survivors(state: &BoardState) -> Vec<JsonSurvivor> {
    state
        .characters()
        .map(|(e, c)| JsonSurvivor {
            name: e.name.clone(),
            side: c.side,
            health: e.health,
            max_health: e.max_health,
        })
        .collect()
}

fn print_json(battle: &Battle, with_events: bool) -> Result<()> {
    let output = JsonOutput {
        seed: battle.seed,
        turns: battle.final_state.turn,
        winner: battle.final_state.winner(),
        survivors: survivors(&battle.final_state),
        events: with_events.then_some(battle.events.as_slice()),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_text(battle: &Battle, with_events: bool) {
    if with_events {
        for line in battle.events.iter().filter_map(describe) {
            println!("{line}");
        }
        println!();
    }

    println!("{}", crate::map::render(&battle.final_state));
    println!("=== Skirmish (seed {}) ===", battle.seed);
    println!("Turns:  {}", battle.final_state.turn);
    match battle.final_state.winner() {
        Some(side) => println!("Winner: {:?}", side),
        None => println!("Winner: none (turn limit)"),
    }
    for survivor in survivors(&battle.final_state) {
        println!(
            "  {:<12} {:<6} {:>3}/{}",
            survivor.name,
            format!("{:?}", survivor.side),
            survivor.health,
            survivor.max_health
        );
    }
}

fn describe(event: &Event) -> Option<String> {
    let line = match event {
        Event::Moved { id, path } => format!("{id} moves {} hexes", path.len()),
        Event::Teleported { id, to, .. } => format!("{id} teleports to {to}"),
        Event::Swapped { first, second } => format!("{first} swaps with {second}"),
        Event::Damaged { id, amount, remaining } => format!("{id} takes {amount} ({remaining} left)"),
        Event::Healed { id, amount, .. } => format!("{id} heals {amount}"),
        Event::StatusApplied { id, status } => format!("{id} gains {status}"),
        Event::StatusRemoved { id, status } => format!("{id} loses {status}"),
        Event::Combo { target, element, stacks } => format!("{target} combo: {stacks}x {element:?}"),
        Event::Pushed { id, to, .. } => format!("{id} pushed to {to}"),
        Event::PotentialChanged { from, to } => format!("potential {from} -> {to}"),
        Event::Spawned { id, name, at } => format!("{name} {id} appears at {at}"),
        Event::Removed { id } => format!("{id} removed"),
        Event::TileEffectTriggered { effect, victim } => format!("{victim} triggers {effect}"),
        Event::TurnStarted { id } => format!("-- {id} turn --"),
        Event::TurnSkipped { id } => format!("{id} is frozen"),
        Event::TurnEnded { .. } => return None,
        Event::ActionCompleted { actor, action } => format!("{actor} used {action}"),
        Event::Message(text) => text.clone(),
        Event::GameOver { winner } => format!("{winner:?} side wins"),
    };
    Some(line)
}
