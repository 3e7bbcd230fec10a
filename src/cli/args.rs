use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::utils::constants::DEFAULT_CHUNK_SIZE;

#[derive(Parser)]
#[command(name = "quake-dashboard")]
#[command(about = "Earthquake analytics dashboard over a USGS-style event CSV")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Only log warnings and errors; hide progress"
    )]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Configuration file (TOML)")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the dataset and serve the dashboard
    Serve {
        #[arg(short, long, help = "Event CSV (or zip archive holding one)")]
        data: Option<PathBuf>,

        #[arg(short, long, help = "Address to listen on [default: 127.0.0.1:8050]")]
        bind: Option<String>,

        #[arg(long, help = "Static assets directory [default: assets]")]
        assets: Option<PathBuf>,

        #[arg(long)]
        workers: Option<usize>,
    },

    /// Load and clean the dataset, then print the load report
    Validate {
        #[arg(short, long, help = "Event CSV (or zip archive holding one)")]
        data: Option<PathBuf>,
    },

    /// Print dataset summary statistics and sample records
    Info {
        #[arg(short, long, help = "Event CSV (or zip archive holding one)")]
        data: Option<PathBuf>,

        #[arg(short, long, default_value = "10")]
        sample: usize,
    },

    /// Print the dashboard layout as JSON
    Layout {
        #[arg(short, long, help = "Event CSV (or zip archive holding one)")]
        data: Option<PathBuf>,
    },

    /// Write the cleaned dataset to Parquet or CSV
    Export {
        #[arg(short, long, help = "Event CSV (or zip archive holding one)")]
        data: Option<PathBuf>,

        #[arg(
            short,
            long,
            help = "Output file path [default: output/quake-events-{YYMMDD}.{ext}]"
        )]
        output: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = ExportFormat::Parquet)]
        format: ExportFormat,

        #[arg(short, long, default_value = "snappy")]
        compression: String,

        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Parquet,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Parquet => "parquet",
            ExportFormat::Csv => "csv",
        }
    }
}
