use crate::history::HistoryKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "translog")]
#[command(author, version, about = "Record and review translation history", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to config/$CONFIG_ENV, then APP__* variables)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a finished translation
    Translate {
        source: String,
        result: String,

        #[arg(short, long, default_value = "auto")]
        from: String,

        #[arg(short, long, default_value = "zh")]
        to: String,
    },

    /// Record a finished explanation
    Explain {
        source: String,
        result: String,

        /// Prompt template the explanation was produced with
        #[arg(short = 'T', long, default_value = "default")]
        template: String,
    },

    /// Print one day's records
    Show {
        kind: HistoryKind,

        /// Partition date, YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<chrono::NaiveDate>,

        /// Print the raw JSON array
        #[arg(long)]
        json: bool,
    },

    /// List the dates that have records
    Dates { kind: HistoryKind },
}
