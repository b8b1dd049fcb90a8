//! Dialect catalog.
//!
//! The [`DialectCatalog`] maps canonical engine identifiers to shared
//! [`Dialect`] instances. Callers that want full control construct their own
//! catalog and register dialects explicitly; everyone else goes through
//! [`DialectCatalog::global`], a process-wide instance that builds each
//! built-in dialect on first use and hands out the same `Arc` afterwards.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use tracing::debug;

use crate::drivers::{self, DialectImpl};
use crate::error::{ExportError, Result};

use super::traits::Dialect;

static GLOBAL: Lazy<DialectCatalog> = Lazy::new(DialectCatalog::with_builtins);

/// Registry of dialects keyed by canonical engine id.
///
/// Lookups accept any engine alias (`pg`, `mariadb`, `sqlserver`, ...); the
/// key is normalized before the map is consulted. Entries are immutable once
/// inserted, so readers only ever contend on the read lock.
///
/// # Example
///
/// ```rust,ignore
/// let catalog = DialectCatalog::new();
/// catalog.register("postgres", PostgresDialect::new());
/// let dialect = catalog.require("postgresql")?;
/// assert_eq!(dialect.name(), "postgres");
/// ```
#[derive(Default)]
pub struct DialectCatalog {
    dialects: RwLock<HashMap<String, Arc<dyn Dialect>>>,

    /// Build missing built-in dialects on lookup.
    lazy_builtins: bool,
}

impl DialectCatalog {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog that constructs the built-in dialects (MySQL,
    /// PostgreSQL, SQL Server) the first time each is requested.
    pub fn with_builtins() -> Self {
        Self {
            dialects: RwLock::new(HashMap::new()),
            lazy_builtins: true,
        }
    }

    /// The process-wide catalog.
    pub fn global() -> &'static DialectCatalog {
        &GLOBAL
    }

    /// Register a dialect under an engine id (or alias).
    ///
    /// Replaces any dialect previously registered for the same engine.
    pub fn register(&self, engine: &str, dialect: impl Dialect + 'static) {
        self.register_arc(engine, Arc::new(dialect));
    }

    /// Register a shared dialect instance.
    pub fn register_arc(&self, engine: &str, dialect: Arc<dyn Dialect>) {
        let key = canonical_key(engine);
        debug!("Registering dialect '{}' for engine '{}'", dialect.name(), key);
        let mut dialects = self
            .dialects
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        dialects.insert(key, dialect);
    }

    /// Get a dialect by engine id, building a built-in one if needed.
    pub fn get(&self, engine: &str) -> Option<Arc<dyn Dialect>> {
        let key = canonical_key(engine);
        {
            let dialects = self
                .dialects
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(dialect) = dialects.get(&key) {
                return Some(Arc::clone(dialect));
            }
        }

        if !self.lazy_builtins {
            return None;
        }

        let builtin = DialectImpl::from_db_type(&key).ok()?;
        let mut dialects = self
            .dialects
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // Another thread may have won the race between the two locks.
        let entry = dialects.entry(key).or_insert_with(|| {
            debug!("Constructed built-in dialect '{}'", builtin.name());
            Arc::new(builtin)
        });
        Some(Arc::clone(entry))
    }

    /// Get a dialect by engine id, returning an error if none is available.
    pub fn require(&self, engine: &str) -> Result<Arc<dyn Dialect>> {
        self.get(engine).ok_or_else(|| {
            ExportError::dialect(
                engine,
                format!(
                    "No dialect registered for engine '{}'. Supported engines: {}",
                    engine,
                    drivers::SUPPORTED_ENGINES.join(", ")
                ),
            )
        })
    }

    /// Check if a dialect has already been registered or constructed.
    pub fn contains(&self, engine: &str) -> bool {
        let key = canonical_key(engine);
        self.dialects
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains_key(&key)
    }

    /// Engine ids currently held by the catalog, sorted.
    pub fn engines(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .dialects
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

/// Known aliases collapse to their canonical id; anything else is kept as
/// given (lowercased) so custom dialects can use their own ids.
fn canonical_key(engine: &str) -> String {
    drivers::normalize_engine(engine)
        .map(str::to_string)
        .unwrap_or_else(|| engine.trim().to_lowercase())
}

impl std::fmt::Debug for DialectCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialectCatalog")
            .field("dialects", &self.engines())
            .field("lazy_builtins", &self.lazy_builtins)
            .finish()
    }
}
