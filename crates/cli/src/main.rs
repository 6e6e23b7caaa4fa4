mod cli;
mod config;
mod passes;

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use libpass_core::{load_dotenv, PassLookup, PassRegistry, PassResult};
use libpass_manager::PassManager;
use tracing::{error, info};

use crate::cli::{command, CliArgs};
use crate::config::CliConfig;

fn main() -> Result<()> {
    load_dotenv();

    // Registry first: pass flags are generated from it
    let mut registry = PassRegistry::new();
    PassManager::register(&mut registry).context("failed to register pass manager")?;
    let ids = passes::register_all(&mut registry).context("failed to register passes")?;

    let matches = command(&registry).get_matches();
    let args = CliArgs::from_matches(&registry, &matches);

    // Initialize tracing
    let default_filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();

    // Load config
    let config = CliConfig::load(args.config.as_deref())
        .context("failed to load configuration")?;
    config.manager.log_summary();

    for arg in args.selected.iter().chain(config.select.iter()) {
        // a pass given both as flag and in the config is selected once
        registry
            .select_arg(arg)
            .with_context(|| format!("unknown pass '{}'", arg))?;
    }

    let registry = Arc::new(registry);
    let mut manager = PassManager::with_config(registry.clone(), config.manager.clone())?;
    for id in ids.all() {
        manager.add(id)?;
    }

    if let Some(default_pass) = &config.default_pass {
        let id = registry
            .find(default_pass)
            .with_context(|| format!("unknown default pass '{}'", default_pass))?;
        manager.set_default_pass(id);
    }

    if let Some(path) = &args.input {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input: {}", path.display()))?;
        info!("Loaded {} bytes from {}", text.len(), path.display());
        let mut seed = PassResult::new();
        seed.set(ids.read, text);
        manager.set_default_result(seed);
    }

    let ok = manager.run_with_flush(|| {
        std::io::stdout().flush().ok();
    })?;

    if args.metrics {
        let metrics = serde_json::to_string_pretty(&manager.metrics())
            .context("failed to serialize metrics")?;
        println!("{}", metrics);
    }

    if !ok {
        error!("pass manager run failed");
        std::process::exit(1);
    }

    Ok(())
}
