//! Runner for the GVM reference interpreter
//!
//! Usage: `test-runner [config.json]`. Without a config file the default
//! limits and gas schedule are used.

mod demo;
mod interpreter;
mod world;

use anyhow::Context;
use gvm_program_runtime::RuntimeConfig;
use std::path::Path;

fn main() -> anyhow::Result<()> {
    // Initialize simple logger with custom format
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "   {}", record.args())
        })
        .parse_default_env()
        .init();

    println!("=== GVM - Execution Context Runner ===\n");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let config = load_config(Path::new(&path))?;
            println!("Loaded configuration from {}\n", path);
            config
        }
        None => RuntimeConfig::default(),
    };

    demo::run(config)
}

/// Read a [`RuntimeConfig`] from a JSON file; missing keys keep their defaults
fn load_config(path: &Path) -> anyhow::Result<RuntimeConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid configuration in {}", path.display()))
}
