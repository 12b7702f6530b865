//! Headless Skirmish Runner
//!
//! Drives train/evaluate episodes of the Q-learning targeting agent
//! against the built-in skirmish simulator and reports the learning
//! curve.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;

use skirmish_agent::agent::Learner;
use skirmish_agent::core::config::LearningConfig;
use skirmish_agent::core::error::Result;
use skirmish_agent::core::types::Side;
use skirmish_agent::engine::{SimConfig, SkirmishSim};

/// Headless Skirmish Runner - online Q-learning over simulated skirmishes
#[derive(Parser, Debug)]
#[command(name = "skirmish_runner")]
#[command(about = "Train and evaluate the targeting agent against the built-in simulator")]
struct Args {
    /// Learning-episode budget; the run halts once exceeded
    #[arg(long, default_value_t = 10)]
    episodes: u32,

    /// Load persisted weights instead of random initialization
    #[arg(long)]
    load_weights: bool,

    /// Optional TOML learning config (CLI flags override it)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Controlled units per episode
    #[arg(long, default_value_t = 5)]
    controlled: u32,

    /// Opposing units per episode
    #[arg(long, default_value_t = 5)]
    opposing: u32,

    /// Turn cap per episode
    #[arg(long, default_value_t = 400)]
    max_turns: u32,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Enable verbose per-turn logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct RunResult {
    episodes_completed: u32,
    wins: u32,
    losses: u32,
    learning_curve: Vec<(u32, f64)>,
    seed: u64,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(if args.verbose {
            "skirmish_agent=debug"
        } else {
            "skirmish_agent=info"
        })
        .init();

    match run(&args) {
        Ok(result) => {
            emit(&args, &result);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "run aborted");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<RunResult> {
    let seed = args.seed.unwrap_or_else(rand::random);

    let mut config = match &args.config {
        Some(path) => LearningConfig::from_file(path)?,
        None => LearningConfig::default(),
    };
    config.episode_budget = args.episodes;
    config.load_weights = args.load_weights || config.load_weights;

    tracing::info!(episodes = config.episode_budget, seed, "starting run");

    let mut learner = Learner::new(config, seed)?;

    let mut episode: u64 = 0;
    let mut wins = 0u32;
    let mut losses = 0u32;

    loop {
        episode += 1;
        let sim_config = SimConfig {
            controlled_units: args.controlled,
            opposing_units: args.opposing,
            max_turns: args.max_turns,
            ..Default::default()
        };
        // Distinct but reproducible seed per episode.
        let mut sim = SkirmishSim::new(sim_config, seed.wrapping_add(episode));

        let commands = learner.initial_step(&sim.snapshot())?;
        sim.apply_commands(&commands);
        sim.step();

        while !sim.is_over() {
            let snapshot = sim.snapshot();
            let commands = learner.middle_step(&snapshot, sim.last_turn())?;
            sim.apply_commands(&commands);
            sim.step();

            if args.verbose {
                tracing::debug!(
                    turn = sim.turn(),
                    controlled = sim.side_count(Side::Controlled),
                    opposing = sim.side_count(Side::Opposing),
                    commands = commands.len(),
                    "turn resolved"
                );
            }
        }

        if sim.controlled_won() {
            wins += 1;
        } else {
            losses += 1;
        }

        let outcome = learner.terminal_step(&sim.snapshot(), sim.last_turn())?;
        if outcome.halt {
            tracing::info!(episodes = episode, wins, losses, "budget exhausted");
            break;
        }
    }

    Ok(RunResult {
        episodes_completed: episode as u32,
        wins,
        losses,
        learning_curve: learner
            .phase()
            .curve()
            .iter()
            .map(|b| (b.episodes_played, b.average_reward))
            .collect(),
        seed,
    })
}

fn emit(args: &Args, result: &RunResult) {
    match args.format.as_str() {
        "json" => match serde_json::to_string_pretty(result) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("failed to serialize result: {}", e),
        },
        "text" => {
            println!("Run Result");
            println!("==========");
            println!("Episodes: {}", result.episodes_completed);
            println!("Wins: {} Losses: {}", result.wins, result.losses);
            for (episodes, reward) in &result.learning_curve {
                println!("  after {:>4} episodes: {:.2}", episodes, reward);
            }
            println!("Seed: {}", result.seed);
        }
        _ => {
            eprintln!("Unknown format '{}', defaulting to json", args.format);
            if let Ok(json) = serde_json::to_string_pretty(result) {
                println!("{}", json);
            }
        }
    }
}
