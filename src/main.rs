use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use scoreboard::config::{create_default_config, ScoreboardConfig, DEFAULT_CONFIG_PATH};
use scoreboard::report::*;
use scoreboard::{JsonFileStore, MatchForm, Scoreboard, ScoreboardView, StoreError};

#[derive(Parser)]
#[command(name = "scoreboard", version, about = "League table, history and head-to-head records for a fixed roster")]
struct Cli {
    /// Config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Match store file (overrides store_path from the config)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Print the ranked league table
    Table {
        #[arg(long, conflicts_with = "csv")]
        json: bool,
        #[arg(long)]
        csv: bool,
    },
    /// Print all matches, newest first
    History {
        #[arg(long)]
        json: bool,
    },
    /// Print win/loss records between each pair of coaches
    HeadToHead {
        #[arg(long)]
        json: bool,
    },
    /// Record a match result
    Add {
        competitor_a: String,
        competitor_b: String,
        score_a: String,
        score_b: String,
        #[arg(long)]
        date: String,
        #[arg(long)]
        passphrase: Option<String>,
    },
    /// Delete a match by id
    Delete {
        id: String,
        #[arg(long)]
        passphrase: Option<String>,
    },
    /// Redraw every view whenever the store changes
    Watch,
    /// Write a default config file
    Init,
}

fn main() {
    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> scoreboard::Result<()> {
    let Cli { config: config_path, store: store_override, command } = cli;

    if let Commands::Init = command {
        create_default_config(&config_path)?;
        println!("Wrote {}", config_path.display());
        return Ok(());
    }

    let config = ScoreboardConfig::load(&config_path)?;
    config.logging.init();

    let store_path = store_override.unwrap_or_else(|| config.store_path.clone());
    let board = Scoreboard::new(Arc::new(JsonFileStore::open(store_path)?), config.gate());

    let result = execute(&board, &config, command);
    board.store().close();
    result
}

fn execute(board: &Scoreboard<JsonFileStore>, config: &ScoreboardConfig, command: Commands) -> scoreboard::Result<()> {
    match command {
        Commands::Table { json, csv } => {
            let view = board.view()?;
            if json {
                println!("{}", standings_json(&view.standings)?);
            } else if csv {
                print!("{}", standings_csv(&view.standings)?);
            } else {
                print!("{}", render_table(&view.standings));
            }
        }
        Commands::History { json } => {
            let view = board.view()?;
            if json {
                println!("{}", history_json(&view.history)?);
            } else {
                print!("{}", render_history(&view.history));
            }
        }
        Commands::HeadToHead { json } => {
            let view = board.view()?;
            if json {
                println!("{}", head_to_head_json(&view.head_to_head)?);
            } else {
                print!("{}", render_head_to_head(&view.head_to_head));
            }
        }
        Commands::Add { competitor_a, competitor_b, score_a, score_b, date, passphrase } => {
            let form = MatchForm { competitor_a, competitor_b, score_a, score_b, date };
            let passphrase = resolve_passphrase(board, passphrase)?;
            let id = board.record_match(&form, passphrase.as_deref())?;
            println!("Match saved ({id})");
        }
        Commands::Delete { id, passphrase } => {
            let passphrase = resolve_passphrase(board, passphrase)?;
            board.delete_match(&id, passphrase.as_deref())?;
            println!("Match deleted");
        }
        Commands::Watch => {
            let interval = Duration::from_millis(config.watch_interval_ms);
            let _subscription = board.watch(
                |view: &ScoreboardView| {
                    // Clear the terminal and redraw from the top
                    print!("\x1b[2J\x1b[H");
                    output_report(view);
                },
                |e: &StoreError| eprintln!("Error: {e}"),
            );

            loop {
                std::thread::sleep(interval);
                // Failures already went to the subscription's error callback
                let _ = board.store().refresh();
            }
        }
        // Handled in run before any store is opened
        Commands::Init => {}
    }

    Ok(())
}

// Asks for the passphrase interactively when the gate is on and none was given on the command line.
fn resolve_passphrase(board: &Scoreboard<JsonFileStore>, given: Option<String>) -> scoreboard::Result<Option<String>> {
    if given.is_some() || !board.gate().is_enabled() {
        return Ok(given);
    }

    let entered = dialoguer::Password::new()
        .with_prompt("Admin passphrase")
        .allow_empty_password(true)
        .interact()?;
    Ok(Some(entered))
}
