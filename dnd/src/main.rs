//! Command-line driver for a character's pending choices.
//!
//! Builds a new character (or loads a saved one) and reads `#` commands from
//! stdin:
//!
//! ```bash
//! cargo run -p dnd-choices-cli -- --name "Lyra" --race half-elf --class bard --background sage
//! cargo run -p dnd-choices-cli -- --load saves/lyra.json
//! ```
//!
//! Environment (also read from `.env`):
//! - `DND_CHOICES_SEED`: seed for hit point rolls
//! - `DND_CHOICES_SAVE_DIR`: directory for `#save` and `#saves` (default `saves`)
//! - `RUST_LOG`: log filter, logs go to stderr

mod command;
mod headless;

use dnd_choices::EngineConfig;
use headless::{parse_config_from_args, run_headless, HeadlessConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dnd_choices=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let mut config = HeadlessConfig::quick_start("Adventurer");
    config.engine = engine_config_from_env()?;
    if let Ok(dir) = std::env::var("DND_CHOICES_SAVE_DIR") {
        config.save_dir = PathBuf::from(dir);
    }
    let config = parse_config_from_args(&args, config);

    run_headless(config).await
}

fn engine_config_from_env() -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let mut config = EngineConfig::new();
    if let Ok(seed) = std::env::var("DND_CHOICES_SEED") {
        let seed: u64 = seed
            .parse()
            .map_err(|e| format!("DND_CHOICES_SEED must be an integer: {e}"))?;
        config = config.with_rng_seed(seed);
    }
    Ok(config)
}

fn print_help() {
    println!("choices - resolve a D&D character's pending choices");
    println!();
    println!("Usage: choices [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --load <path>          Load a saved character");
    println!("  --name <name>          Character name (default: Adventurer)");
    println!("  --race <slug>          Race or subrace (default: human)");
    println!("  --class <slug>         Starting class (default: fighter)");
    println!("  --background <slug>    Background (default: soldier)");
    println!("  -h, --help             Show this help");
}
