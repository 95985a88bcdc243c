mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    check, erase, insert, move_element, render, undo, CheckArgs, EraseArgs, InsertArgs, MoveArgs,
    RenderArgs, UndoArgs,
};
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Storykeep CLI - structural editing of story fragment panes
#[derive(Parser, Debug)]
#[command(name = "storykeep")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to storykeep.config.json in the current directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log engine decisions at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a markup file to HTML
    Render(RenderArgs),

    /// Verify every fragment of a fragments file
    Check(CheckArgs),

    /// Move an element next to another one
    Move(MoveArgs),

    /// Insert new content next to an element
    Insert(InsertArgs),

    /// Erase an element
    Erase(EraseArgs),

    /// Undo the last edit of a fragment
    Undo(UndoArgs),
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?.display().to_string();
    let config = Config::load(&cwd, cli.config.as_deref())?;

    let level = if cli.verbose { "debug" } else { config.log_level.as_str() };
    init_tracing(level);

    match cli.command {
        Command::Render(args) => render(args),
        Command::Check(args) => check(args, &config, &cwd),
        Command::Move(args) => move_element(args, &config, &cwd),
        Command::Insert(args) => insert(args, &config, &cwd),
        Command::Erase(args) => erase(args, &config, &cwd),
        Command::Undo(args) => undo(args, &config, &cwd),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
