//! CLI frontend for Chargen dice rolling and ability generation.

mod commands;

use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(
    name = "chargen",
    about = "Chargen: dice rolls and ability scores for tabletop characters",
    version,
    propagate_version = true
)]
struct Cli {
    /// Print roll audit events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Do not emit roll audit events
    #[arg(long, global = true)]
    no_audit: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll dice with optional modifiers
    Roll {
        /// Faces per die, or dice notation such as d20 or 4d6
        sides: String,

        /// Number of dice (default: 1, or the count from dice notation)
        times: Option<u32>,

        /// Modifier such as "drop lowest 1", "add 2", or "advantage"
        #[arg(short, long = "option")]
        options: Vec<String>,

        /// Correlation tag recorded with the roll
        #[arg(long, default_value = "cli")]
        ctx_ref: String,

        /// RNG seed for reproducible rolls
        #[arg(long)]
        seed: Option<u64>,

        /// Print the roll as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a set of ability scores
    Abilities {
        /// Rolling option (common, strict, standard, pointbuy_even, ...)
        #[arg(short, long, default_value = "common")]
        method: String,

        /// Abilities in priority order, e.g. dex,con,str,cha,wis,int
        #[arg(long)]
        order: Option<String>,

        /// Level increase as CODE=N (repeatable)
        #[arg(long)]
        level: Vec<String>,

        /// Additional bonus as CODE=N (repeatable)
        #[arg(long)]
        bonus: Vec<String>,

        /// Use the monster/god score ceiling of 30
        #[arg(long)]
        monster: bool,

        /// Correlation tag recorded with the rolls
        #[arg(long, default_value = "cli")]
        ctx_ref: String,

        /// RNG seed for reproducible rolls
        #[arg(long)]
        seed: Option<u64>,

        /// Print the ability array as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the modifier for an ability score
    Modifier {
        /// Ability score
        #[arg(allow_negative_numbers = true)]
        score: i32,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "cg_mechanics=info" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let audit = !cli.no_audit;

    let result = match cli.command {
        Commands::Roll {
            sides,
            times,
            options,
            ctx_ref,
            seed,
            json,
        } => commands::roll::run(&sides, times, &options, &ctx_ref, seed, audit, json),
        Commands::Abilities {
            method,
            order,
            level,
            bonus,
            monster,
            ctx_ref,
            seed,
            json,
        } => commands::abilities::run(
            &commands::abilities::AbilityArgs {
                method,
                order,
                level,
                bonus,
                monster,
                ctx_ref,
            },
            seed,
            audit,
            json,
        ),
        Commands::Modifier { score } => commands::modifier::run(score),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
