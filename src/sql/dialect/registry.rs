//! Engine name to dialect lookup.
//!
//! The builder only ever sees `Arc<dyn SqlDialect>`; which concrete dialect
//! serves an engine name is decided here.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;

use super::{MySql, Postgres, Sqlite, SqlDialect, TSql};
use crate::sql::error::{CompileError, CompileResult};

/// Creates a dialect instance.
pub type DialectConstructor = Box<dyn Fn() -> Arc<dyn SqlDialect> + Send + Sync>;

static DEFAULT_REGISTRY: Lazy<DialectRegistry> = Lazy::new(DialectRegistry::with_builtins);

/// Registry of dialect constructors keyed by lowercase engine name.
pub struct DialectRegistry {
    constructors: HashMap<String, DialectConstructor>,
}

impl DialectRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Create a registry holding the built-in dialects and their aliases.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for name in ["mysql", "mariadb"] {
            registry.register(name, || Arc::new(MySql));
        }
        for name in ["pgsql", "postgres", "postgresql"] {
            registry.register(name, || Arc::new(Postgres));
        }
        for name in ["sqlite", "sqlite3"] {
            registry.register(name, || Arc::new(Sqlite));
        }
        for name in ["sqlsrv", "mssql", "tsql"] {
            registry.register(name, || Arc::new(TSql));
        }
        registry
    }

    /// Register a constructor, replacing any previous entry for the name.
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn() -> Arc<dyn SqlDialect> + Send + Sync + 'static,
    {
        self.constructors
            .insert(name.into().to_ascii_lowercase(), Box::new(constructor));
        self
    }

    /// Look up a dialect by engine name (case-insensitive).
    pub fn get(&self, name: &str) -> CompileResult<Arc<dyn SqlDialect>> {
        let key = name.trim().to_ascii_lowercase();
        let constructor = self
            .constructors
            .get(&key)
            .ok_or_else(|| CompileError::UnsupportedEngine(name.to_string()))?;
        let dialect = constructor();
        tracing::trace!(engine = %key, dialect = dialect.name(), "resolved dialect");
        Ok(dialect)
    }

    /// Whether a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.constructors
            .contains_key(&name.trim().to_ascii_lowercase())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for DialectRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for DialectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialectRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// The process-wide registry of built-in dialects.
pub fn default_registry() -> &'static DialectRegistry {
    &DEFAULT_REGISTRY
}

/// Look up a built-in dialect by engine name.
pub fn for_name(name: &str) -> CompileResult<Arc<dyn SqlDialect>> {
    DEFAULT_REGISTRY.get(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_aliases() {
        let registry = DialectRegistry::with_builtins();
        assert_eq!(registry.get("mariadb").unwrap().name(), "mysql");
        assert_eq!(registry.get("PostgreSQL").unwrap().name(), "postgres");
        assert_eq!(registry.get("pgsql").unwrap().name(), "postgres");
        assert_eq!(registry.get("sqlite3").unwrap().name(), "sqlite");
        assert_eq!(registry.get("sqlsrv").unwrap().name(), "tsql");
        assert_eq!(registry.get("mssql").unwrap().name(), "tsql");
        assert_eq!(registry.names().len(), 10);
    }

    #[test]
    fn test_unknown_engine() {
        let err = for_name("oracle").unwrap_err();
        assert_eq!(err, CompileError::UnsupportedEngine("oracle".into()));
    }

    #[derive(Debug)]
    struct Firebird;

    impl SqlDialect for Firebird {
        fn name(&self) -> &'static str {
            "firebird"
        }

        fn indexes_sql(&self, table: &str) -> String {
            format!("SELECT RDB$INDEX_NAME FROM RDB$INDICES WHERE RDB$RELATION_NAME = '{}'", table)
        }
    }

    #[test]
    fn test_register_custom_dialect() {
        let mut registry = DialectRegistry::new();
        assert!(!registry.contains("firebird"));

        registry.register("Firebird", || Arc::new(Firebird));

        let dialect = registry.get("firebird").unwrap();
        assert_eq!(dialect.name(), "firebird");
        assert_eq!(dialect.quote_identifier("t"), "\"t\"");
        assert!(registry.get("mysql").is_err());
    }
}
