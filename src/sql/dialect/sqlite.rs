//! SQLite dialect.
//!
//! SQLite differences from ANSI:
//! - No implicit LIKE escape character (`ESCAPE '\'` is appended)
//! - Storage classes instead of sized types
//! - AUTOINCREMENT follows PRIMARY KEY
//! - ALTER TABLE cannot change a column or its foreign keys
//! - Introspection through `sqlite_master` and PRAGMA functions

use super::helpers;
use super::SqlDialect;
use crate::sql::ddl::{ColumnDef, ForeignKey};
use crate::sql::error::{CompileError, CompileResult};
use crate::sql::types::DataType;

/// SQLite dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl Sqlite {
    /// Table-valued PRAGMA call; a schema qualifier prefixes the pragma name.
    fn pragma(&self, name: &str, table: &str) -> String {
        match table.rsplit_once('.') {
            Some((schema, table)) => format!(
                "PRAGMA {}.{}({})",
                self.quote_identifier(schema),
                name,
                self.quote_identifier(table)
            ),
            None => format!("PRAGMA {}({})", name, self.quote_identifier(table)),
        }
    }
}

impl SqlDialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn like_escape_clause(&self) -> &'static str {
        " ESCAPE '\\'"
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    fn emit_data_type(&self, dt: &DataType) -> String {
        helpers::emit_data_type_sqlite(dt)
    }

    fn emit_identity(&self) -> String {
        "AUTOINCREMENT".into()
    }

    fn identity_after_primary_key(&self) -> bool {
        true
    }

    fn list_tables_sql(&self) -> String {
        "SELECT name FROM sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' ORDER BY name"
            .into()
    }

    fn columns_sql(&self, table: &str) -> String {
        self.pragma("table_info", table)
    }

    fn foreign_keys_sql(&self, table: &str) -> String {
        self.pragma("foreign_key_list", table)
    }

    fn indexes_sql(&self, table: &str) -> String {
        self.pragma("index_list", table)
    }

    fn change_column(&self, _table: &str, _column: &ColumnDef) -> CompileResult<String> {
        Err(CompileError::unsupported(self.name(), "changing a column"))
    }

    fn add_foreign_key(&self, _table: &str, _foreign_key: &ForeignKey) -> CompileResult<String> {
        Err(CompileError::unsupported(self.name(), "adding a foreign key to an existing table"))
    }

    fn drop_foreign_key(&self, _table: &str, _name: &str) -> CompileResult<String> {
        Err(CompileError::unsupported(self.name(), "dropping a foreign key"))
    }
}
