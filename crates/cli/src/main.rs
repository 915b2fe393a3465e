mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::{Config, SolverStrategy};
use icfpc2025_client::{AedificiumClient, AedificiumRemoteClient, Map};
use icfpc2025_common::ProblemName;
use icfpc2025_simulator::Simulator;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::io::{self, Read};

#[derive(Parser)]
#[command(name = "aedificium")]
#[command(about = "ICFPC 2025 Aedificium contest CLI tool")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Select a problem")]
    Select {
        #[arg(help = "Problem name, or read from stdin if not provided")]
        problem: Option<String>,
    },
    #[command(about = "Explore with plans")]
    Explore {
        #[arg(help = "Plans (comma-separated), or read from stdin if not provided")]
        plans: Option<String>,
    },
    #[command(about = "Submit a guess")]
    Guess {
        #[arg(help = "Map data as JSON string, or read from stdin if not provided")]
        map: Option<String>,
    },
    #[command(about = "Reconstruct a map from an explore result")]
    Reconstruct {
        #[arg(
            help = "JSON object {\"n\": <room count>, \"doors\": \"<plan>\", \"labels\": [...]}, or read from stdin if not provided. Ignored if --offline or --problem is given."
        )]
        input: Option<String>,
        #[arg(
            long,
            value_name = "ROOM_COUNT",
            help = "Skip input entirely: generate a random map and walk with the local simulator, no network"
        )]
        offline: Option<usize>,
        #[arg(
            long,
            conflicts_with = "offline",
            help = "Skip input entirely: select this problem against the remote oracle and drive a random walk"
        )]
        problem: Option<String>,
    },
}

#[derive(Deserialize)]
struct ReconstructInput {
    n: usize,
    doors: String,
    labels: Vec<u8>,
}

fn get_input_or_stdin(arg: Option<String>, field_name: &str) -> Result<String> {
    match arg {
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(anyhow::anyhow!("{} cannot be empty", field_name));
            }
            Ok(trimmed.to_string())
        }
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            let trimmed = buffer.trim();
            if trimmed.is_empty() {
                return Err(anyhow::anyhow!(
                    "{} cannot be empty. Provide via argument or stdin.",
                    field_name
                ));
            }
            Ok(trimmed.to_string())
        }
    }
}

/// A fully random plan of door digits, `18 * n` long, matching the source's
/// own rule of thumb for how long a walk needs to be to pin a map down.
fn random_plan(n: usize, rng: &mut StdRng) -> String {
    (0..18 * n)
        .map(|_| std::char::from_digit(rng.gen_range(0..6), 10).expect("0..6 is a valid digit"))
        .collect()
}

fn build_client(config: &Config) -> Result<AedificiumRemoteClient> {
    AedificiumRemoteClient::with_options(config.token()?, config.base_url(), config.request_timeout())
}

fn run_reconstruction(
    config: &Config,
    n: usize,
    doors: &str,
    labels: &[u8],
) -> Result<icfpc2025_reconstruct::MapData> {
    let map_data = match config.solver {
        SolverStrategy::Dfs => icfpc2025_reconstruct::solve(n, doors, labels),
        SolverStrategy::Anneal => icfpc2025_reconstruct::solve2(n, doors, labels),
        SolverStrategy::Auto => icfpc2025_reconstruct::reconstruct(n, doors, labels),
    }?;
    Ok(map_data)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Select { problem } => {
            let mut client = build_client(&config)?;
            let problem_input = get_input_or_stdin(problem, "Problem name")?;
            let response = client.select(problem_input).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Explore { plans } => {
            let mut client = build_client(&config)?;
            let plans_input = get_input_or_stdin(plans, "Plans")?;

            let plans_vec: Vec<String> = serde_json::from_str(&plans_input)
                .map_err(|e| anyhow::anyhow!("Invalid JSON format for plans: {}", e))?;

            if plans_vec.is_empty() {
                return Err(anyhow::anyhow!("No valid plans found after parsing"));
            }

            let response = client.explore(plans_vec).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Guess { map } => {
            let mut client = build_client(&config)?;
            let map_input = get_input_or_stdin(map, "Map JSON")?;
            let map_data: Map = serde_json::from_str(&map_input)
                .map_err(|e| anyhow::anyhow!("Invalid JSON format for map: {}", e))?;
            let response = client.guess(map_data).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Reconstruct {
            input,
            offline,
            problem,
        } => {
            let map_data = if let Some(n) = offline {
                // Entirely offline: the local simulator plays the oracle.
                let mut rng = StdRng::from_entropy();
                let mut simulator = Simulator::new(n, &mut rng)?;
                let plan = random_plan(n, &mut rng);
                let response = simulator.explore(vec![plan.clone()]).await?;
                run_reconstruction(&config, n, &plan, &response.results[0])?
            } else if let Some(problem_name) = problem {
                // Drive a walk against the remote oracle ourselves.
                let name = ProblemName::parse(&problem_name).ok_or_else(|| {
                    anyhow::anyhow!("unknown problem name: {}", problem_name)
                })?;
                let n = name.room_count();
                let mut client = build_client(&config)?;
                client.select(problem_name).await?;
                let mut rng = StdRng::from_entropy();
                let plan = random_plan(n, &mut rng);
                let response = client.explore(vec![plan.clone()]).await?;
                run_reconstruction(&config, n, &plan, &response.results[0])?
            } else {
                let input_str = get_input_or_stdin(input, "Reconstruct input")?;
                let parsed: ReconstructInput = serde_json::from_str(&input_str).map_err(|e| {
                    anyhow::anyhow!("Invalid JSON format for reconstruct input: {}", e)
                })?;
                run_reconstruction(&config, parsed.n, &parsed.doors, &parsed.labels)?
            };

            let map: Map = map_data.into();
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
    }

    Ok(())
}
