//! flcache: inspect and warm the directory listing cache from a terminal.
//!
//! `open` behaves like a file manager navigating into a folder: it paints the
//! cached listing straight away, then rescans and caches the fresh one.

mod cli;
mod render;

use std::path::{Path, PathBuf};

use anyhow::Context;
use flcache_core::config::default_config_path;
use flcache_core::{refresh, CacheController, CacheKey, Config};
use tracing_subscriber::EnvFilter;

use crate::cli::{parse_args, CliCommand, USAGE};
use crate::render::render_listing;

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config() -> Config {
    let Some(path) = default_config_path() else {
        return Config::default();
    };
    Config::load_or_default(&path).unwrap_or_else(|e| {
        eprintln!("warning: ignoring {}: {e}", path.display());
        Config::default()
    })
}

fn main() -> anyhow::Result<()> {
    let config = load_config();
    init_tracing(&config);

    let command = match parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(msg) => {
            eprintln!("error: {msg}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    let cache = CacheController::shared();
    let stats = cache.stats();
    if !stats.enabled {
        tracing::info!("listing cache is disabled by configuration");
    } else if !stats.persisting {
        tracing::warn!("listing cache is memory-only; nothing will be kept after exit");
    }

    match command {
        CliCommand::Help => println!("{USAGE}"),
        CliCommand::Open(dir) => {
            let dir = absolute(&dir)?;
            print!("{}", cached_listing(&cache, &dir));
            let fresh = refresh(&cache, &dir)
                .with_context(|| format!("failed to scan {}", dir.display()))?;
            print!("{}", render_listing(&fresh, "fresh"));
        }
        CliCommand::Scan(dir) => {
            let dir = absolute(&dir)?;
            let fresh = refresh(&cache, &dir)
                .with_context(|| format!("failed to scan {}", dir.display()))?;
            println!("cached {} item(s) for {}", fresh.len(), dir.display());
        }
        CliCommand::Show(dir) => {
            let dir = absolute(&dir)?;
            print!("{}", cached_listing(&cache, &dir));
        }
        CliCommand::Clear => {
            cache.clear();
            println!("listing cache cleared");
        }
    }

    // Background writes would be lost when the process exits.
    cache.flush();
    Ok(())
}

fn absolute(dir: &Path) -> anyhow::Result<PathBuf> {
    std::path::absolute(dir).with_context(|| format!("invalid path {}", dir.display()))
}

fn cached_listing(cache: &CacheController, dir: &Path) -> String {
    match cache.read_file_list_from_cache(&CacheKey::from_path(dir)) {
        Some(entry) => render_listing(&entry, "cached"),
        None => format!("{} [not cached]\n", dir.display()),
    }
}
