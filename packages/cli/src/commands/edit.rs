use super::parse_coordinate;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};
use storykeep_editor::{
    Coordinate, EditorSignal, Engine, MemoryStore, Outcome, Placement, ToolAddMode,
};
use tracing::debug;

#[derive(Debug, Args)]
pub struct MoveArgs {
    /// Element to move (fragment:pane:outer[.idx])
    #[arg(value_parser = parse_coordinate)]
    pub source: Coordinate,

    /// Element to move next to (fragment:pane:outer[.idx])
    #[arg(value_parser = parse_coordinate)]
    pub target: Coordinate,

    /// Side of the target (before, after)
    #[arg(short, long, default_value = "after")]
    pub placement: Placement,

    /// Fragments file (defaults to the configured store)
    #[arg(short, long)]
    pub store: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct InsertArgs {
    /// Content kind (p, h2, h3, h4, img, signup, yt, bunny, belief, identify, toggle, aside)
    pub kind: ToolAddMode,

    /// Element to insert next to (fragment:pane:outer[.idx])
    #[arg(value_parser = parse_coordinate)]
    pub at: Coordinate,

    /// Side of the element (before, after)
    #[arg(short, long, default_value = "after")]
    pub placement: Placement,

    /// Fragments file (defaults to the configured store)
    #[arg(short, long)]
    pub store: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct EraseArgs {
    /// Element to erase (fragment:pane:outer[.idx])
    #[arg(value_parser = parse_coordinate)]
    pub at: Coordinate,

    /// Fragments file (defaults to the configured store)
    #[arg(short, long)]
    pub store: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct UndoArgs {
    /// Fragment to undo
    pub fragment: String,

    /// Pane whose unsaved flag is updated
    pub pane: String,

    /// Fragments file (defaults to the configured store)
    #[arg(short, long)]
    pub store: Option<PathBuf>,
}

pub fn move_element(args: MoveArgs, config: &Config, cwd: &str) -> Result<()> {
    with_store(config, cwd, args.store.as_deref(), |engine, store| {
        Ok(engine.move_element(store, &args.source, &args.target, args.placement)?)
    })
}

pub fn insert(args: InsertArgs, config: &Config, cwd: &str) -> Result<()> {
    let mut signals: Vec<EditorSignal> = Vec::new();
    with_store(config, cwd, args.store.as_deref(), |engine, store| {
        Ok(engine.insert_element(store, &mut signals, &args.at, args.kind, args.placement)?)
    })?;

    for signal in signals {
        match signal {
            EditorSignal::OpenSettings {
                pane_id,
                outer_idx,
                idx,
                global_nth,
                tag,
                ..
            } => println!(
                "  {} configure {} #{} in {} at [{}.{}]",
                "⚙".yellow(),
                tag,
                global_nth,
                pane_id,
                outer_idx,
                idx
            ),
        }
    }
    Ok(())
}

pub fn erase(args: EraseArgs, config: &Config, cwd: &str) -> Result<()> {
    with_store(config, cwd, args.store.as_deref(), |engine, store| {
        Ok(engine.erase_element(store, &args.at)?)
    })
}

pub fn undo(args: UndoArgs, config: &Config, cwd: &str) -> Result<()> {
    with_store(config, cwd, args.store.as_deref(), |engine, store| {
        Ok(engine.undo(store, &args.fragment, &args.pane)?)
    })
}

/// Load the fragments file, run one operation and write back what changed
fn with_store<F>(config: &Config, cwd: &str, explicit: Option<&Path>, operation: F) -> Result<()>
where
    F: FnOnce(&Engine, &mut MemoryStore) -> Result<Outcome>,
{
    let path = config.store_path(cwd, explicit);
    let mut store = MemoryStore::load(&path)?;
    let engine = Engine::new(config.editor.clone());

    match operation(&engine, &mut store)? {
        Outcome::Applied => {
            store.save(&path)?;
            debug!(path = %path.display(), "Store written");
            println!("{} {}", "✓".green(), "Applied".bold());
        }
        Outcome::Skipped(reason) => {
            println!("{} Skipped: {}", "⚠️".yellow(), reason);
        }
    }
    Ok(())
}
