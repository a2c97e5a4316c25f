//! Shared library for the duck simulator.
//!
//! The crate exposes the duck catalog, the swappable behavior strategies, and
//! the dispatcher that executes and overrides them. Public functions here form
//! the contract the binaries depend on: catalog discovery, simulator
//! construction, and log setup.

use anyhow::{Result, bail};
use std::env;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub mod behavior;
pub mod catalog;
pub mod error;
mod schema_loader;
pub mod session;
pub mod simulator;

pub use behavior::{Behavior, BehaviorRegistry, BuiltinBehavior, ScriptedBehavior, SharedBehavior};
pub use catalog::{
    BehaviorCategory, CATALOG_SCHEMA_VERSION, CatalogDocument, CatalogKey, CatalogSnapshot, Duck,
    DuckCatalog, DuckSnapshot, ImplementationName,
};
pub use error::{IndexKind, SimError, SimResult};
pub use session::{NOTICE_DISMISS_DELAY, Notice, Session, TableSection, Tap};
pub use simulator::{Performance, SharedSimulator, Simulator};

/// Environment variable naming a catalog file to load instead of the bundled one.
pub const CATALOG_ENV: &str = "DUCKSIM_CATALOG";
/// Environment variable holding a `tracing` filter directive for the binaries.
pub const LOG_ENV: &str = "DUCKSIM_LOG";

const BUNDLED_CATALOG: &str = "data/ducks.json";
const DEFAULT_LOG_FILTER: &str = "warn";

/// Path of the catalog shipped in the source tree.
pub fn default_catalog_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(BUNDLED_CATALOG)
}

/// Decide which catalog file to load.
///
/// Search order: the explicit path, then `DUCKSIM_CATALOG`, then the bundled
/// `data/ducks.json`. An explicit or env-provided path that does not exist is
/// an error; a missing bundled file yields `None` so callers fall back to the
/// built-in roster.
pub fn resolve_catalog_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.is_file() {
            bail!("Catalog file not found: {}", path.display());
        }
        return Ok(Some(path.to_path_buf()));
    }

    if let Some(value) = env_non_empty(CATALOG_ENV) {
        let path = PathBuf::from(value);
        if !path.is_file() {
            bail!(
                "{CATALOG_ENV} points at {}, which is not a file",
                path.display()
            );
        }
        return Ok(Some(path));
    }

    let bundled = default_catalog_path();
    Ok(bundled.is_file().then_some(bundled))
}

/// Build a simulator from the resolved catalog, or the built-in roster.
pub fn load_simulator(explicit: Option<&Path>) -> Result<Simulator> {
    let catalog = match resolve_catalog_path(explicit)? {
        Some(path) => {
            let catalog = DuckCatalog::load(&path)?;
            info!(path = %path.display(), ducks = catalog.len(), "catalog loaded from file");
            catalog
        }
        None => {
            info!("no catalog file found; using built-in roster");
            DuckCatalog::standard()
        }
    };
    Ok(Simulator::new(catalog))
}

/// Install the stderr `tracing` subscriber used by the binaries.
///
/// The filter comes from `DUCKSIM_LOG` and defaults to `warn`. Calling this
/// twice is harmless.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn env_non_empty(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn explicit_catalog_must_exist() {
        let missing = Path::new("/nonexistent/ducks.json");
        let err = resolve_catalog_path(Some(missing)).unwrap_err();
        assert!(err.to_string().contains("Catalog file not found"));

        let file = NamedTempFile::new().unwrap();
        assert_eq!(
            resolve_catalog_path(Some(file.path())).unwrap(),
            Some(file.path().to_path_buf())
        );
    }

    #[test]
    fn bundled_catalog_matches_built_in_roster() {
        let loaded = DuckCatalog::load(&default_catalog_path()).unwrap();
        let standard = DuckCatalog::standard();
        assert_eq!(loaded.snapshot(), standard.snapshot());
    }
}
