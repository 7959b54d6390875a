mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let opts = commands::StoreOptions {
        data_dir: cli.data_dir,
        backend: cli.backend,
    };

    match cli.command {
        Commands::Init { force } => commands::init::run(&opts, force),
        Commands::Record { student, file } => commands::record::run(&opts, &student, &file),
        Commands::History {
            student,
            stats,
            limit,
        } => commands::history::run(&opts, &student, stats, limit),
        Commands::Baseline { student } => commands::baseline::run(&opts, &student),
        Commands::Check { student, file } => commands::check::run(&opts, &student, &file),
        Commands::Context { student } => commands::context::run(&opts, &student),
        Commands::Version => commands::version::run(),
    }
}
