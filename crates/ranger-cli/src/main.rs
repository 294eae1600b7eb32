//! ranger - interactive shell over an editor session
//!
//! Reads one command per line from stdin. State lives in the store
//! directory and survives restarts.

mod shell;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ranger_core::EditorConfig;
use ranger_core::app::EditorSession;
use ranger_core::impls::FileStore;

use crate::shell::{Flow, Shell};

#[derive(Parser, Debug)]
#[command(name = "ranger")]
#[command(about = "Edit preflop decision sets from the terminal")]
struct Args {
    /// TOML config file (missing file means defaults)
    #[arg(long, default_value = "ranger.toml")]
    config: PathBuf,

    /// Overrides `store_dir` from the config
    #[arg(long)]
    store_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = EditorConfig::load(&args.config)?;
    if let Some(dir) = args.store_dir {
        config.store_dir = dir;
    }

    // RUST_LOG wins over the config file
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let store = FileStore::open(config.store_dir.clone())
        .with_context(|| format!("opening store at {}", config.store_dir.display()))?;
    let session = EditorSession::builder(store).config(config).open()?;

    let mut shell = Shell::new(session);
    shell.print_warnings();
    println!("ranger: type `help` for commands");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match shell.run(line) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => println!("error: {e:#}"),
        }
        shell.print_warnings();
    }

    shell.close();
    Ok(())
}
