//! Fairseed CLI
//!
//! Offline tooling for the provably fair engine: hash a seed, commit a new pair,
//! derive an outcome, or verify a historical bet.

use clap::{Parser, Subcommand};
use fairseed::{
    games::{CrashParams, DiceParams, LimboParams, MinesParams, PlinkoParams, DEFAULT_GRID_SIZE},
    ConfigLoader, FairResult, FairnessError, GameParams, SeedPair, SeedTriple, ServerSeed, VerifyRequest,
};
use std::io::Read;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fairseed")]
#[command(about = "Provably fair outcome engine", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// SHA-256 of a hex server seed, to check a published commitment
    Hash {
        server_seed: String,
    },

    /// Commit a new seed pair and print its public commitment
    NewPair {
        #[arg(long)]
        client_seed: Option<String>,

        /// Also print the unrevealed server seed
        #[arg(long)]
        show_secret: bool,
    },

    /// Derive an outcome from a seed triple
    Roll {
        #[arg(long)]
        server_seed: String,

        #[arg(long)]
        client_seed: String,

        #[arg(long, default_value = "0")]
        nonce: u64,

        #[command(subcommand)]
        game: GameArgs,
    },

    /// Verify a bet from a JSON request file ("-" reads stdin)
    Verify {
        #[arg(default_value = "-")]
        request: String,
    },
}

#[derive(Subcommand, Debug)]
enum GameArgs {
    Dice {
        #[arg(long)]
        target: f64,
        /// Win when the roll is over the target (default: under)
        #[arg(long)]
        over: bool,
    },
    Crash {
        #[arg(long)]
        cashout_at: Option<f64>,
    },
    Mines {
        #[arg(long)]
        mines: u32,
        #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
        grid_size: u32,
    },
    Limbo {
        #[arg(long)]
        target: Option<f64>,
    },
    Plinko {
        #[arg(long, default_value = "16")]
        rows: u32,
    },
}

impl From<GameArgs> for GameParams {
    fn from(args: GameArgs) -> Self {
        match args {
            GameArgs::Dice { target, over } => GameParams::Dice(DiceParams {
                target,
                is_over: over,
            }),
            GameArgs::Crash { cashout_at } => GameParams::Crash(CrashParams { cashout_at }),
            GameArgs::Mines { mines, grid_size } => GameParams::Mines(MinesParams {
                mines_count: mines,
                grid_size,
            }),
            GameArgs::Limbo { target } => GameParams::Limbo(LimboParams { target }),
            GameArgs::Plinko { rows } => GameParams::Plinko(PlinkoParams { rows }),
        }
    }
}

fn read_request(source: &str) -> FairResult<VerifyRequest> {
    let raw = if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).map(|_| buf)
    } else {
        std::fs::read_to_string(source)
    }
    .map_err(|e| FairnessError::MalformedInput(format!("Failed to read {}: {}", source, e)))?;

    Ok(serde_json::from_str(&raw)?)
}

/// A fresh pair as JSON; the server seed is included only on request
fn render_new_pair(pair: &SeedPair, show_secret: bool) -> FairResult<String> {
    let rendered = if show_secret {
        serde_json::to_string_pretty(pair)?
    } else {
        serde_json::to_string_pretty(&pair.public_view())?
    };
    Ok(rendered)
}

fn run(args: Args) -> FairResult<()> {
    let mut loader = ConfigLoader::new();
    if let Some(ref path) = args.config {
        loader = loader.with_path(path);
    }
    let config = loader.load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Hash { server_seed } => {
            let seed = ServerSeed::from_hex(&server_seed)?;
            println!("{}", seed.hash_hex());
        }
        Command::NewPair {
            client_seed,
            show_secret,
        } => {
            let pair = SeedPair::generate(client_seed, config.seeds.client_seed_bytes)?;
            tracing::info!(server_seed_hash = pair.server_seed_hash(), "Generated seed pair");
            println!("{}", render_new_pair(&pair, show_secret)?);
        }
        Command::Roll {
            server_seed,
            client_seed,
            nonce,
            game,
        } => {
            let seed = ServerSeed::from_hex(&server_seed)?;
            let params = GameParams::from(game);
            let outcome = fairseed::generate_outcome(SeedTriple::new(seed.as_bytes(), &client_seed, nonce), &params)?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Command::Verify { request } => {
            let request = read_request(&request)?;
            let result = request.verify()?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.is_valid {
                std::process::exit(2);
            }
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pair_hides_secret_by_default() {
        let pair = SeedPair::generate(None, 16).unwrap();
        let mut revealed = pair.clone();
        revealed.reveal().unwrap();
        let secret = revealed.revealed_server_seed().unwrap();

        let public = render_new_pair(&pair, false).unwrap();
        assert!(public.contains(pair.server_seed_hash()));
        assert!(!public.contains(&secret));

        let full = render_new_pair(&pair, true).unwrap();
        assert!(full.contains(&secret));
    }

    #[test]
    fn test_new_pair_flag_parses() {
        let args = Args::try_parse_from(["fairseed", "new-pair", "--show-secret"]).unwrap();
        assert!(matches!(args.command, Command::NewPair { show_secret: true, .. }));
    }
}
