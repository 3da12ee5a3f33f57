//! Headless Squad Runner
//!
//! Plays enemy turns of a sandbox scenario and reports which squads moved.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use squad_approach::battle::ai::{SquadGatedBuilder, SquadTurnCycle};
use squad_approach::battle::{
    load_scenario, MoveResult, NearestTargetBuilder, SandboxAction, SandboxBattle, SquadEventType,
    UnitId,
};
use squad_approach::core::{load_config, Result, SquadConfig};

/// Safety net against a host cycle that never ends
const MAX_STEPS_PER_TURN: usize = 10_000;

/// Headless Squad Runner - watch enemy squads hold and advance
#[derive(Parser, Debug)]
#[command(name = "squad_runner")]
#[command(about = "Run enemy turns of a scenario and report squad activations")]
struct Args {
    /// Scenario file (.toml or .json)
    #[arg(long)]
    scenario: PathBuf,

    /// Squad config TOML (defaults if omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of enemy turns to play
    #[arg(long, default_value_t = 3)]
    turns: u32,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Serialize)]
struct UnitAction {
    unit: String,
    action: String,
}

#[derive(Serialize)]
struct TurnReport {
    turn: u32,
    steps: usize,
    activated: Vec<String>,
    held: Vec<String>,
    actions: Vec<UnitAction>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!("squad_approach={}", level))
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => SquadConfig::default(),
    };
    let scenario = load_scenario(&args.scenario)?;
    tracing::info!("Running scenario '{}' for {} turns", scenario.name, args.turns);

    let units = scenario.into_units()?;
    let builder = SquadGatedBuilder::new(NearestTargetBuilder, config.clone());
    let mut battle: GatedBattle = SandboxBattle::new(units, builder);
    let mut cycle = SquadTurnCycle::new(config);

    let mut reports = Vec::new();
    for turn in 1..=args.turns {
        cycle.begin_turn(&mut battle);

        let mut steps = 0;
        while cycle.move_turn_cycle(&mut battle) == MoveResult::Continue {
            steps += 1;
            if steps >= MAX_STEPS_PER_TURN {
                tracing::warn!("Turn {} hit the step limit", turn);
                break;
            }
        }

        reports.push(turn_report(turn, steps, &battle, &mut cycle));
        battle.advance_player_side();
    }

    match args.format.as_str() {
        "text" => print_text(&reports),
        _ => println!("{}", serde_json::to_string_pretty(&reports)?),
    }

    Ok(())
}

type GatedBattle = SandboxBattle<SquadGatedBuilder<NearestTargetBuilder>>;

fn turn_report(
    turn: u32,
    steps: usize,
    battle: &GatedBattle,
    cycle: &mut SquadTurnCycle,
) -> TurnReport {
    let name_of = |id: UnitId| {
        battle
            .units()
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.name.clone())
            .unwrap_or_else(|| format!("{:?}", id))
    };

    let events = cycle.take_events();
    let activated = events.activated_units().into_iter().map(name_of).collect();
    let held = events
        .events
        .iter()
        .filter_map(|e| match &e.event_type {
            SquadEventType::SquadHeld { squad, .. } => Some(squad.to_string()),
            _ => None,
        })
        .collect();

    let actions = battle
        .actions()
        .iter()
        .map(|record| UnitAction {
            unit: name_of(record.unit),
            action: match &record.action {
                SandboxAction::Wait => "wait".to_string(),
                SandboxAction::Attack { target } => format!("attack {}", name_of(*target)),
                SandboxAction::Approach { target, to } => {
                    format!("approach {} to ({}, {})", name_of(*target), to.q, to.r)
                }
            },
        })
        .collect();

    TurnReport {
        turn,
        steps,
        activated,
        held,
        actions,
    }
}

fn print_text(reports: &[TurnReport]) {
    for report in reports {
        println!("=== Enemy turn {} ({} steps) ===", report.turn, report.steps);
        if !report.activated.is_empty() {
            println!("  activated: {}", report.activated.join(", "));
        }
        if !report.held.is_empty() {
            println!("  holding:   {}", report.held.join(", "));
        }
        for action in &report.actions {
            println!("  {:<12} {}", action.unit, action.action);
        }
    }
}
