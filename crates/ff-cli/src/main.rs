//! CLI frontend for the Fighting Fantasy adventure manager.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ffm",
    about = "Fighting Fantasy adventure manager — stats, luck, potions and combat",
    version,
    propagate_version = true
)]
struct Cli {
    /// Save file (default: the platform data directory)
    #[arg(long, global = true)]
    save: Option<PathBuf>,

    /// RNG seed for reproducible rolls
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a fresh adventure, discarding the current one
    New {
        /// Adventurer name
        name: Option<String>,
    },

    /// Play interactively
    Play,

    /// Show the character sheet and monsters
    Status,

    /// Roll initial stats, or re-roll a single stat
    Roll {
        /// skill, stamina or luck
        stat: Option<String>,
    },

    /// Test your luck
    Luck,

    /// Fight one combat round against the active monster
    Fight {
        /// Test luck to change the damage
        #[arg(short, long)]
        luck: bool,
    },

    /// Roll freeform dice (default 2d6)
    Dice {
        /// Dice expression such as 2d6 or d20
        expr: Option<String>,
    },

    /// Show recent log entries
    Log {
        /// luck, combat or dice (default: all)
        channel: Option<String>,
    },

    /// Export the save as pretty-printed JSON
    Export {
        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run any play-mode command once, e.g. `ffm do monster add Orc 7 6`
    Do {
        /// The command words
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let opts = commands::Options {
        save: cli.save,
        seed: cli.seed,
    };

    let result = match cli.command {
        Commands::New { name } => commands::new::run(&opts, name.as_deref().unwrap_or("")),
        Commands::Play => commands::play::run(&opts),
        Commands::Status => commands::status::run(&opts),
        Commands::Roll { stat } => match stat {
            Some(stat) => commands::line::run(&opts, &format!("roll {stat}")),
            None => commands::line::run(&opts, "roll"),
        },
        Commands::Luck => commands::line::run(&opts, "luck"),
        Commands::Fight { luck } => {
            commands::line::run(&opts, if luck { "fight luck" } else { "fight" })
        }
        Commands::Dice { expr } => {
            commands::line::run(&opts, &format!("dice {}", expr.unwrap_or_default()))
        }
        Commands::Log { channel } => {
            commands::line::run(&opts, &format!("log {}", channel.unwrap_or_default()))
        }
        Commands::Export { output } => commands::export::run(&opts, output.as_deref()),
        Commands::Do { words } => commands::line::run(&opts, &words.join(" ")),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
