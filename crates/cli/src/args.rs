//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use loterias_domain::LotteryId;
use std::path::PathBuf;

/// loterias: Brazilian lottery results retrieval and normalization
#[derive(Parser, Debug)]
#[command(name = "loterias")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the latest result of a lottery
    Latest(LatestArgs),

    /// Show a specific contest
    Contest(ContestArgs),

    /// Show the latest result of every lottery
    All(AllArgs),

    /// Normalize a raw upstream payload without network access
    Normalize(NormalizeArgs),

    /// Project upcoming contests from the latest result
    Future(FutureArgs),

    /// Generate sitemap.xml from the latest results
    Sitemap(SitemapArgs),

    /// Print robots.txt
    Robots,

    /// Configuration management
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct LatestArgs {
    /// Lottery slug (megasena, lotofacil, quina, ...)
    #[arg(long, short)]
    pub lottery: LotteryId,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Include schema.org JSON-LD (with --json)
    #[arg(long, requires = "json")]
    pub json_ld: bool,
}

#[derive(Args, Debug)]
pub struct ContestArgs {
    /// Lottery slug
    #[arg(long, short)]
    pub lottery: LotteryId,

    /// Contest number
    #[arg(long, short)]
    pub number: u32,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct AllArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Lottery the payload belongs to
    #[arg(long, short)]
    pub lottery: LotteryId,

    /// File containing the raw JSON payload (use - for stdin)
    #[arg(long)]
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct FutureArgs {
    /// Lottery slug
    #[arg(long, short)]
    pub lottery: LotteryId,

    /// Number of upcoming contests (defaults to site.future_pages)
    #[arg(long)]
    pub count: Option<u32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SitemapArgs {
    /// Write to a file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Init {
        /// Path to write config file
        #[arg(long, default_value = "./config.toml")]
        path: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}
