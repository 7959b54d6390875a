use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stride")]
#[command(version)]
#[command(about = "Longitudinal performance tracking for graded student work")]
pub struct Cli {
    /// Data directory (defaults to $STRIDE_HOME or ~/.stride)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Storage backend for student documents
    #[arg(long, global = true, value_enum, default_value_t = Backend::Files)]
    pub backend: Backend,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// One JSON file per student
    Files,
    /// Single SQLite database
    Sqlite,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write default rubric and tracker config to the data directory
    Init {
        /// Overwrite existing config files
        #[arg(long)]
        force: bool,
    },

    /// Append graded records (JSON object, JSON array, or JSONL)
    Record {
        #[arg(short, long)]
        student: String,
        #[arg(short, long)]
        file: PathBuf,
    },

    /// View a student's retained assignments
    History {
        #[arg(short, long)]
        student: String,
        /// Show statistics summary
        #[arg(long)]
        stats: bool,
        /// Max assignments to list, newest first
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Show the student's baseline summary
    Baseline {
        #[arg(short, long)]
        student: String,
    },

    /// Compare a graded submission against the student's baseline
    Check {
        #[arg(short, long)]
        student: String,
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Print the prompt context summary for a student
    Context {
        #[arg(short, long)]
        student: String,
    },

    /// Print version information
    Version,
}
