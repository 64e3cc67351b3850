pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "opening")]
#[command(about = "Opening CLI - trigger gate openings through the Gate Opening API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(
        long,
        global = true,
        env = "OPENING_API_URL",
        default_value = "http://localhost:3000",
        help = "Base URL of the Gate Opening API"
    )]
    pub url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Open a gate and record the access-control event")]
    Open(commands::open::OpenArgs),

    #[command(about = "Check server health status from API /health endpoint")]
    Health,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let base_url = cli.url.trim_end_matches('/').to_string();

    match cli.command {
        Commands::Open(args) => commands::open::handle(&base_url, args, output_format).await,
        Commands::Health => commands::health::handle(&base_url, output_format).await,
    }
}
