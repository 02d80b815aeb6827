//! Command line entry point for pos_list.
//!
//! ```bash
//! pos-list --config config/pos_list.toml --mode snake --z 40 -o Output.pos
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pos_list::cli::Cli;
use pos_list::config::Settings;
use pos_list::pos_file::{self, POS_EXTENSION};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .context("Failed to load settings")?;
    cli.overrides.apply(&mut settings);
    settings
        .validate()
        .context("Invalid settings after command line overrides")?;

    init_tracing(&settings.log_level);

    if cli.print_settings {
        let text = toml::to_string_pretty(&settings).context("Failed to serialize settings")?;
        print!("{}", text);
        return Ok(());
    }

    let generation = settings
        .generate()
        .context("Failed to generate position list")?;

    let document = pos_file::render_with_devices(&generation.positions, &settings.devices);

    if cli.stdout {
        println!("{}", document);
        return Ok(());
    }

    let output = &settings.output;
    if output.extension().and_then(|e| e.to_str()) != Some(POS_EXTENSION) {
        warn!(
            "Output file '{}' does not use the .{} extension Micro-Manager expects",
            output.display(),
            POS_EXTENSION
        );
    }
    std::fs::write(output, document)
        .with_context(|| format!("Failed to write position list to {:?}", output))?;
    info!(
        "Wrote {} positions to '{}'",
        generation.positions.len(),
        output.display()
    );

    Ok(())
}

/// `RUST_LOG` wins when set, otherwise the configured level applies to this crate.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pos_list={}", level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
