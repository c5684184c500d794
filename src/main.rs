use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;
use space_snake::events::EventBus;
use space_snake::game::{Direction, GameConfig};
use space_snake::greeter::{self, GreetOptions, Language};
use space_snake::modes::{AutoplayConfig, AutoplayMode, SimulateConfig, SimulateMode};
use space_snake::session::{GreedyPolicy, RandomPolicy};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "space_snake")]
#[command(version, about = "Deterministic Snake engine with a headless driver")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a scripted list of moves and print every outcome
    Simulate {
        /// Moves as letters or names, e.g. "RRUUL" or "UP,LEFT"
        #[arg(long)]
        moves: String,

        /// Start from a saved snapshot instead of a generated layout
        #[arg(long)]
        state: Option<PathBuf>,

        /// Save the final state to this file
        #[arg(long)]
        save: Option<PathBuf>,

        #[command(flatten)]
        game: GameArgs,
    },
    /// Let a policy play on a timer
    Autoplay {
        /// Number of games to play
        #[arg(long, default_value = "1")]
        games: u32,

        /// Move policy
        #[arg(long, default_value = "greedy")]
        policy: PolicyArg,

        /// Milliseconds between moves
        #[arg(long, default_value = "125")]
        tick_ms: u64,

        #[command(flatten)]
        game: GameArgs,
    },
    /// Print a greeting
    Greet {
        /// Name to greet
        #[arg(short, long, default_value = "World")]
        name: String,

        /// Language for the greeting
        #[arg(short, long, default_value = "en")]
        language: Language,

        /// Display greeting in uppercase
        #[arg(short, long)]
        uppercase: bool,
    },
}

#[derive(Args)]
struct GameArgs {
    /// JSON file with game settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Seed for food placement and random policies
    #[arg(long)]
    seed: Option<u64>,
}

impl GameArgs {
    fn resolve(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config
            .validate()
            .map_err(anyhow::Error::msg)
            .context("Invalid game settings")?;
        Ok(config)
    }
}

#[derive(Clone, ValueEnum)]
enum PolicyArg {
    /// Head for the nearest food
    Greedy,
    /// Random non-reversing moves
    Random,
}

fn rng_for(config: &GameConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // Dispatch to appropriate mode
    match cli.command {
        Command::Simulate {
            moves,
            state,
            save,
            game,
        } => {
            let game_config = game.resolve()?;
            let moves = Direction::parse_moves(&moves).context("Invalid --moves")?;
            let rng = rng_for(&game_config);

            let config = SimulateConfig {
                state_path: state,
                save_path: save,
                game_config,
                ..SimulateConfig::new(moves)
            };
            SimulateMode::new(config, rng)?.run()?;
        }
        Command::Autoplay {
            games,
            policy,
            tick_ms,
            game,
        } => {
            let game_config = game.resolve()?;
            let mut rng = rng_for(&game_config);
            let policy_rng = StdRng::from_rng(&mut rng).context("Failed to seed policy")?;

            let config = AutoplayConfig {
                tick_interval: Duration::from_millis(tick_ms),
                game_config,
                ..AutoplayConfig::new(games)
            };
            let events = EventBus::new();

            match policy {
                PolicyArg::Greedy => {
                    AutoplayMode::new(config, GreedyPolicy, rng, events)?
                        .run()
                        .await?
                }
                PolicyArg::Random => {
                    AutoplayMode::new(config, RandomPolicy::new(policy_rng), rng, events)?
                        .run()
                        .await?
                }
            }
        }
        Command::Greet {
            name,
            language,
            uppercase,
        } => {
            let options = GreetOptions {
                name,
                language,
                uppercase,
            };
            println!("{}", greeter::banner());
            println!();
            println!("{}", greeter::greet(&options));
        }
    }

    Ok(())
}
