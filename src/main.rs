//! Survival Grid - Entry Point
//!
//! Loads the config and scenario, picks a decision source, and runs a
//! line-oriented loop where each command advances the simulation one turn.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;

use survival_grid::core::config::SimulationConfig;
use survival_grid::core::error::Result;
use survival_grid::core::types::Position;
use survival_grid::entity::EntityKind;
use survival_grid::llm::LlmBrain;
use survival_grid::simulation::decision::{DecisionSource, RandomWalker};
use survival_grid::simulation::turn::{DecisionOutcome, TurnProtocol, TurnReport};
use survival_grid::world::scenario::Scenario;

/// Turn-based grid survival driven by a language model
#[derive(Parser, Debug)]
#[command(name = "survival-grid")]
#[command(about = "Watch an LLM-driven agent try to survive a grid full of wolves")]
struct Args {
    /// Simulation config (TOML); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scenario layout (TOML); the built-in meadow is used when omitted
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Use the seeded random walker instead of the LLM
    #[arg(long)]
    offline: bool,

    /// Seed for the random walker
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "survival_grid=info".into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::meadow(),
    };

    let built = scenario.build(&config)?;
    let mut protocol = TurnProtocol::from_scenario(built, &config);
    let mut decider = pick_decider(&args, &scenario.agent.name, &config);

    println!("\n=== SURVIVAL GRID ===");
    println!("Scenario: {}", scenario.name);
    println!();
    println!("Commands:");
    println!("  think / t   - Let the agent decide and move");
    println!("  wait / w    - Skip the agent's move; pursuers still act");
    println!("  run <n>     - Take n thinking turns");
    println!("  status / s  - Show the board");
    println!("  quit / q    - Exit");
    println!();

    draw_board(&protocol);

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        match input {
            "" => continue,
            "quit" | "q" => break,
            "status" | "s" => draw_board(&protocol),
            "think" | "t" => {
                let report = protocol.take_turn(decider.as_mut());
                show_turn(&protocol, report);
            }
            "wait" | "w" => {
                let report = protocol.wait();
                show_turn(&protocol, report);
            }
            _ => {
                if let Some(n) = input.strip_prefix("run ") {
                    match n.trim().parse::<u32>() {
                        Ok(n) => {
                            for _ in 0..n {
                                if protocol.is_terminal() {
                                    break;
                                }
                                let report = protocol.take_turn(decider.as_mut());
                                print_report(report.as_ref());
                            }
                            draw_board(&protocol);
                        }
                        Err(_) => println!("Usage: run <number>"),
                    }
                } else {
                    println!("Unknown command. Available: think, wait, run <n>, status, quit");
                }
            }
        }
    }

    println!(
        "\nGoodbye! {} turns played, agent {}.",
        protocol.turn(),
        if protocol.agent_alive() { "alive" } else { "eliminated" }
    );
    Ok(())
}

fn pick_decider(
    args: &Args,
    agent_name: &str,
    config: &SimulationConfig,
) -> Box<dyn DecisionSource> {
    if !args.offline {
        match LlmBrain::from_env(agent_name, config) {
            Ok(brain) => {
                tracing::info!("LLM brain initialised");
                return Box::new(brain);
            }
            Err(e) => tracing::warn!(error = %e, "LLM unavailable - falling back to random walker"),
        }
    }
    Box::new(RandomWalker::new(args.seed))
}

fn show_turn(protocol: &TurnProtocol, report: Option<TurnReport>) {
    if report.is_none() {
        println!("The simulation has ended. Nothing happens.");
        return;
    }
    print_report(report.as_ref());
    draw_board(protocol);
}

fn print_report(report: Option<&TurnReport>) {
    let Some(report) = report else {
        return;
    };

    println!("--- Turn {} ---", report.turn);
    match &report.decision {
        DecisionOutcome::Decided(intent) => {
            if let Some(thought) = &intent.rationale {
                println!("  Thought: {}", thought);
            }
            if let Some(outcome) = &report.agent_move {
                println!("  Move ({}, {}): {}", intent.dx, intent.dy, outcome);
            }
        }
        DecisionOutcome::Unavailable(reason) => println!("  No decision: {}", reason),
        DecisionOutcome::NotRequested => println!("  Waiting..."),
        DecisionOutcome::AgentMissing => println!("  The agent is gone."),
    }
    if let Some(pursuit) = &report.pursuit {
        for _ in 0..pursuit.attacks() {
            println!("  CHOMP! A pursuer bit the agent.");
        }
    }
}

/// Plain character map plus a status line
fn draw_board(protocol: &TurnProtocol) {
    let board = protocol.board();
    println!();
    for y in 0..board.height() as i32 {
        let row: String = (0..board.width() as i32)
            .map(|x| match board.entity_at(Position::new(x, y)).map(|e| e.kind) {
                Some(EntityKind::ControlledAgent) => '@',
                Some(EntityKind::Obstacle) => '#',
                Some(EntityKind::Resource) => '*',
                Some(EntityKind::Pursuer) => 'W',
                None => '.',
            })
            .flat_map(|c| [c, ' '])
            .collect();
        println!("  {}", row.trim_end());
    }

    match board.agent() {
        Some(agent) if protocol.agent_alive() => {
            println!("\n  {} | Health: {} | Turn {}", agent.name, agent.health, protocol.turn());
        }
        _ => println!("\n  STATUS: DECEASED | Turn {}", protocol.turn()),
    }
    println!();
}
