use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use detective_quest::config::GameConfig;
use detective_quest::controller::Investigation;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "detective-quest")]
#[command(about = "Explore the mansion, collect clues and name the most likely suspect", long_about = None)]
struct Args {
    /// JSON room layout to play instead of the built-in mansion
    #[arg(long)]
    map: Option<PathBuf>,

    /// JSON list of {pattern, suspect} rules, tried in order
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Suspect charged when no rule matches a clue
    #[arg(long)]
    fallback_suspect: Option<String>,

    /// Print the room layout as JSON and exit
    #[arg(long)]
    dump_map: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = GameConfig {
        map_path: args.map,
        rules_path: args.rules,
        fallback_suspect: args.fallback_suspect,
    };

    let map = config.load_map().context("failed to build the room map")?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.dump_map {
        writeln!(out, "{}", serde_json::to_string_pretty(&map.to_layout())?)?;
        return Ok(());
    }

    let rules = config.load_rules().context("failed to load clue rules")?;

    writeln!(out, "Detective Quest - A Mansão dos Mistérios")?;
    writeln!(out, "Explore a mansão, colete pistas e descubra o suspeito!")?;

    let mut investigation = Investigation::new(map, rules);
    investigation.run(io::stdin().lock(), &mut out)?;
    investigation.conclude(&mut out)?;

    Ok(())
}
