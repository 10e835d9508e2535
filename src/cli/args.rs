//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::domain::GenerationRecord;

/// Compensation plan simulator: team bonus, elite bonus and downline network
#[derive(Parser, Debug)]
#[command(name = "mlmsim")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory holding .mlmsim.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    /// Config file to use instead of the layered lookup
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Emit JSON instead of formatted text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List membership tiers and their parameters
    Tiers,

    /// Team bonus over the weaker leg
    Team {
        #[command(flatten)]
        legs: LegArgs,
        /// Membership tier (default: configured)
        #[arg(short, long)]
        tier: Option<String>,
        /// Daily payout cap (default: configured, none)
        #[arg(long)]
        cap: Option<f64>,
    },

    /// Elite bonus per eligible generation
    Elite {
        #[command(flatten)]
        downline: DownlineArgs,
        /// Membership tier (default: configured)
        #[arg(short, long)]
        tier: Option<String>,
    },

    /// Show the downline network
    Network {
        #[command(flatten)]
        downline: DownlineArgs,
        /// List parent -> child edges instead of a tree
        #[arg(long)]
        edges: bool,
    },

    /// Compute team bonus, elite bonus and network in one run
    Simulate {
        #[command(flatten)]
        legs: LegArgs,
        #[command(flatten)]
        downline: DownlineArgs,
        /// Membership tier (default: configured)
        #[arg(short, long)]
        tier: Option<String>,
        /// Daily payout cap (default: configured, none)
        #[arg(long)]
        cap: Option<f64>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Volumes of the two legs.
#[derive(Args, Debug, Clone)]
pub struct LegArgs {
    /// BV of the private leg
    #[arg(long = "private", default_value_t = 0.0, allow_negative_numbers = true)]
    pub bv_private: f64,
    /// BV of the public leg
    #[arg(long = "public", default_value_t = 0.0, allow_negative_numbers = true)]
    pub bv_public: f64,
}

/// Downline source: generated from defaults or given per generation.
#[derive(Args, Debug, Clone, Default)]
pub struct DownlineArgs {
    /// Generations to simulate (default: configured)
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    pub generations: Option<i64>,
    /// BV per affiliate for generated downlines (default: configured; not with -g)
    #[arg(long, allow_negative_numbers = true)]
    pub bv: Option<f64>,
    /// Explicit generation as COUNT:BV, repeat in generation order
    #[arg(short = 'g', long = "generation", value_name = "COUNT:BV", allow_hyphen_values = true)]
    pub custom: Vec<GenerationRecord>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
