use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use storykeep_evaluator::{derive_render_tree, OrdinalLookup};
use storykeep_parser::{format_error, parse};

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Markup file to render
    pub file: PathBuf,

    /// Print the render tree as JSON instead of HTML
    #[arg(long)]
    pub json: bool,

    /// Print occurrence counts of every styleable tag
    #[arg(long)]
    pub counts: bool,
}

pub fn render(args: RenderArgs) -> Result<()> {
    let source = fs::read_to_string(&args.file)
        .map_err(|e| anyhow!("Cannot read {}: {}", args.file.display(), e))?;
    let filename = args.file.display().to_string();

    let root = match parse(&source) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("{}", format_error(&source, &filename, &e));
            return Err(anyhow!("Failed to parse {}", filename));
        }
    };
    let tree = derive_render_tree(&root)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        println!("{}", tree.to_html());
    }

    if args.counts {
        let lookup = OrdinalLookup::build(&tree);
        eprintln!();
        for (tag, count) in lookup.counts() {
            eprintln!("  {} {}", tag.bright_white(), count);
        }
    }

    Ok(())
}
