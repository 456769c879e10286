use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use quadrant::cli::args::{Cli, Commands};
use quadrant::cli::commands;
use quadrant::config::Config;
use quadrant::error::QuadrantError;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), QuadrantError> {
    let cli = Cli::parse();
    let format = cli.output;

    let output = match cli.command {
        Commands::Add(args) => commands::add(args, format)?,
        Commands::Tasks(args) => commands::tasks(args, format)?,
        Commands::Queue(args) => commands::queue(args.command, format)?,
        Commands::Board => {
            let config = Config::load()?;
            quadrant::tui::run(&config)?;
            String::new()
        }
        Commands::Completions { shell } => {
            commands::completions(shell);
            String::new()
        }
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
