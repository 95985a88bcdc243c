use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use storykeep_editor::MemoryStore;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Fragments file (defaults to the configured store)
    #[arg(short, long)]
    pub store: Option<PathBuf>,
}

pub fn check(args: CheckArgs, config: &Config, cwd: &str) -> Result<()> {
    let path = config.store_path(cwd, args.store.as_deref());
    let store = MemoryStore::load(&path)?;

    println!("{}", "🔍 Checking fragments...".bright_blue().bold());

    let mut broken = 0;
    for fragment_id in store.fragment_ids() {
        let Some(doc) = store.current(fragment_id) else {
            continue;
        };
        let violations = doc.check_invariants();
        if violations.is_empty() {
            println!("  {} {}", "✓".green(), fragment_id);
            continue;
        }

        broken += 1;
        println!("  {} {}", "✗".red(), fragment_id);
        for violation in violations {
            println!("      {}", violation);
        }
    }

    println!();
    if broken > 0 {
        return Err(anyhow!("{} fragment(s) violate document invariants", broken));
    }
    println!("{}", "✅ All fragments consistent".green().bold());
    Ok(())
}
