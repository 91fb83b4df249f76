//! SQL Dialect definitions and formatting rules.
//!
//! This module provides a trait-based abstraction for SQL dialect differences.
//! Each dialect implements `SqlDialect` to handle its specific syntax:
//!
//! - Identifier quoting: `"` (ANSI/PG/SQLite), `` ` `` (MySQL), `[]` (T-SQL)
//! - Value escaping: backslash escapes (MySQL) vs doubled quotes
//! - LIKE pattern escaping: backslash vs bracket classes (T-SQL)
//! - Pagination: LIMIT/OFFSET vs OFFSET FETCH
//! - Type names, identity columns and DDL forms
//! - Schema introspection queries
//!
//! The statement compiler never names a concrete dialect. Dialects are looked
//! up by engine name through the [`DialectRegistry`].
//!
//! # Usage
//!
//! ```ignore
//! use sqlweave::dialect::{for_name, SqlDialect};
//!
//! let dialect = for_name("pgsql")?;
//! let quoted = dialect.quote_identifier("user");  // "user"
//! ```
//!
//! # Capability Matrix
//!
//! | Feature | MySQL | PostgreSQL | SQLite | SQL Server |
//! |---------|-------|------------|--------|------------|
//! | `&&` / `\|\|` conjunctions | ✓ | mapped | mapped | mapped |
//! | XOR | ✓ | ❌ | ❌ | ❌ |
//! | UPDATE/DELETE ORDER BY, LIMIT | ✓ | ❌ | ❌ | ❌ |
//! | UPDATE … JOIN | ✓ | ❌ | ❌ | ❌ |
//! | ALTER COLUMN type change | ✓ | ✓ | ❌ | ✓ |
//! | ADD/DROP FOREIGN KEY | ✓ | ✓ | ❌ | ✓ |
//!
//! Legend: ✓ = supported, ❌ = rejected with `UnsupportedOperation`

pub mod helpers;
mod mysql;
mod postgres;
mod registry;
mod sqlite;
mod tsql;

pub use mysql::MySql;
pub use postgres::Postgres;
pub use registry::{default_registry, for_name, DialectConstructor, DialectRegistry};
pub use sqlite::Sqlite;
pub use tsql::TSql;

use std::fmt;
use std::str::FromStr;

use super::condition::Conjunction;
use super::ddl::{self, ColumnDef, CreateTable, ForeignKey, IndexDef};
use super::error::{CompileError, CompileResult};
use super::token::TokenStream;
use super::types::{DataType, HostType};
use super::value::Value;

/// How [`SqlDialect::quote_value`] renders a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapeFormat {
    /// Escaped text without surrounding quotes.
    Plain,
    /// Escaped and wrapped in a string literal.
    #[default]
    Quoted,
    /// `'%value%'` with LIKE metacharacters escaped.
    Like,
    /// `'value%'` (starts with).
    LikeLeft,
    /// `'%value'` (ends with).
    LikeRight,
}

impl FromStr for EscapeFormat {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" | "value" => Ok(EscapeFormat::Plain),
            "quoted" => Ok(EscapeFormat::Quoted),
            "like" => Ok(EscapeFormat::Like),
            "like-left" | "left-like" => Ok(EscapeFormat::LikeLeft),
            "like-right" | "right-like" => Ok(EscapeFormat::LikeRight),
            _ => Err(CompileError::EscapeFormat(s.to_string())),
        }
    }
}

impl fmt::Display for EscapeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EscapeFormat::Plain => "plain",
            EscapeFormat::Quoted => "quoted",
            EscapeFormat::Like => "like",
            EscapeFormat::LikeLeft => "like-left",
            EscapeFormat::LikeRight => "like-right",
        };
        f.write_str(name)
    }
}

/// SQL dialect trait - defines how SQL constructs are rendered.
///
/// Implementations handle dialect-specific syntax differences.
/// The default implementations follow ANSI SQL where possible.
pub trait SqlDialect: fmt::Debug + Send + Sync {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    // =========================================================================
    // Identifier Quoting
    // =========================================================================

    /// Quote a single identifier (column, alias, constraint).
    ///
    /// - ANSI/PostgreSQL/SQLite: `"identifier"`
    /// - MySQL: `` `identifier` ``
    /// - T-SQL: `[identifier]`
    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    /// Quote a possibly schema-qualified table name (`schema.table`).
    fn quote_table(&self, name: &str) -> String {
        helpers::quote_dotted(self, name)
    }

    /// Quote a possibly table-qualified column name. `*` segments pass through.
    fn quote_column(&self, name: &str) -> String {
        helpers::quote_dotted(self, name)
    }

    // =========================================================================
    // Value Quoting
    // =========================================================================

    /// Escape a string for embedding inside a string literal.
    fn escape_string(&self, s: &str) -> String {
        helpers::escape_doubled_quotes(s)
    }

    /// Wrap already escaped text in a string literal.
    fn string_literal(&self, escaped: &str) -> String {
        format!("'{}'", escaped)
    }

    /// Escape LIKE metacharacters (`%`, `_`) so they match literally.
    fn escape_like(&self, s: &str) -> String {
        helpers::escape_like_backslash(s)
    }

    /// Clause appended after a LIKE literal to declare the escape character.
    fn like_escape_clause(&self) -> &'static str {
        ""
    }

    /// Format a boolean literal.
    ///
    /// - PostgreSQL: `true`/`false`
    /// - MySQL/SQLite/T-SQL: `1`/`0`
    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }

    /// Render a value as a SQL literal in the requested format.
    fn quote_value(&self, value: &Value, format: EscapeFormat) -> CompileResult<String> {
        helpers::quote_value(self, value, format)
    }

    /// [`quote_value`](Self::quote_value) with the format given by name.
    fn quote_value_as(&self, value: &Value, format: &str) -> CompileResult<String> {
        self.quote_value(value, format.parse()?)
    }

    // =========================================================================
    // Statement Rendering
    // =========================================================================

    /// Keyword joining the terms of a condition group.
    ///
    /// `&&` and `||` are MySQL spellings; other dialects map them to
    /// `AND`/`OR`. XOR has no ANSI counterpart.
    fn conjunction_keyword(&self, conjunction: Conjunction) -> CompileResult<&'static str> {
        match conjunction {
            Conjunction::And | Conjunction::AndAlias => Ok("AND"),
            Conjunction::Or | Conjunction::OrAlias => Ok("OR"),
            Conjunction::Xor => Err(CompileError::unsupported(self.name(), "XOR conjunction")),
        }
    }

    /// Emit LIMIT/OFFSET or equivalent pagination clause.
    ///
    /// - ANSI/PostgreSQL/MySQL/SQLite: `LIMIT n OFFSET m` (default)
    /// - T-SQL: `OFFSET m ROWS FETCH NEXT n ROWS ONLY` (override)
    fn emit_limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> TokenStream {
        helpers::emit_limit_offset_standard(limit, offset)
    }

    /// Whether this dialect requires ORDER BY for OFFSET/LIMIT.
    ///
    /// T-SQL requires ORDER BY when using OFFSET FETCH.
    fn requires_order_by_for_offset(&self) -> bool {
        false
    }

    /// Body of an INSERT with no columns.
    fn empty_insert_body(&self) -> &'static str {
        "DEFAULT VALUES"
    }

    /// Whether UPDATE and DELETE accept ORDER BY and LIMIT.
    fn supports_dml_order_limit(&self) -> bool {
        false
    }

    /// Whether UPDATE accepts JOIN clauses after the table.
    fn supports_update_join(&self) -> bool {
        false
    }

    // =========================================================================
    // Types
    // =========================================================================

    /// Emit a data type for this dialect.
    fn emit_data_type(&self, dt: &DataType) -> String {
        helpers::emit_data_type_ansi(dt)
    }

    /// Emit identity/auto-increment syntax.
    ///
    /// - PostgreSQL: GENERATED BY DEFAULT AS IDENTITY
    /// - T-SQL: IDENTITY(1, 1)
    /// - MySQL: AUTO_INCREMENT
    /// - SQLite: AUTOINCREMENT (after PRIMARY KEY)
    fn emit_identity(&self) -> String {
        "GENERATED BY DEFAULT AS IDENTITY".into()
    }

    /// Whether the identity keyword follows `PRIMARY KEY` instead of preceding it.
    fn identity_after_primary_key(&self) -> bool {
        false
    }

    /// Map an introspected type name to the host-side type.
    ///
    /// Unknown names map to [`HostType::String`].
    fn host_type(&self, sql_type: &str) -> HostType {
        DataType::parse(sql_type).map_or(HostType::String, |dt| dt.host_type())
    }

    // =========================================================================
    // Schema Metadata
    // =========================================================================

    /// Query listing the tables of the current schema (one `name` column).
    fn list_tables_sql(&self) -> String {
        "SELECT table_name AS name FROM information_schema.tables \
         WHERE table_schema = CURRENT_SCHEMA() AND table_type = 'BASE TABLE' \
         ORDER BY table_name"
            .into()
    }

    /// Query describing the columns of a table.
    fn columns_sql(&self, table: &str) -> String {
        format!(
            "SELECT column_name AS name, data_type AS type, is_nullable AS nullable, \
             column_default AS default_value FROM information_schema.columns \
             WHERE table_schema = CURRENT_SCHEMA() AND table_name = {} \
             ORDER BY ordinal_position",
            helpers::literal(self, table)
        )
    }

    /// Query listing the foreign keys declared on a table.
    fn foreign_keys_sql(&self, table: &str) -> String {
        format!(
            "SELECT tc.constraint_name AS name, kcu.column_name AS column_name, \
             ccu.table_name AS references_table, ccu.column_name AS references_column \
             FROM information_schema.table_constraints tc \
             JOIN information_schema.key_column_usage kcu \
             ON tc.constraint_name = kcu.constraint_name AND tc.table_schema = kcu.table_schema \
             JOIN information_schema.constraint_column_usage ccu \
             ON ccu.constraint_name = tc.constraint_name AND ccu.table_schema = tc.table_schema \
             WHERE tc.constraint_type = 'FOREIGN KEY' AND tc.table_name = {}",
            helpers::literal(self, table)
        )
    }

    /// Query listing the indexes of a table.
    fn indexes_sql(&self, table: &str) -> String;

    // =========================================================================
    // DDL
    // =========================================================================

    /// Render one column definition.
    fn column_definition(&self, column: &ColumnDef) -> CompileResult<String> {
        ddl::column_definition(self, column)
    }

    fn create_table(&self, table: &CreateTable) -> CompileResult<String> {
        ddl::create_table(self, table)
    }

    fn rename_table(&self, from: &str, to: &str) -> CompileResult<String> {
        Ok(ddl::rename_table(self, from, to))
    }

    fn drop_table(&self, name: &str, if_exists: bool) -> CompileResult<String> {
        Ok(ddl::drop_table(self, name, if_exists))
    }

    fn add_column(&self, table: &str, column: &ColumnDef) -> CompileResult<String> {
        ddl::add_column(self, table, column)
    }

    fn rename_column(&self, table: &str, from: &str, to: &str) -> CompileResult<String> {
        Ok(ddl::rename_column(self, table, from, to))
    }

    /// Change the type, nullability and default of an existing column.
    fn change_column(&self, table: &str, column: &ColumnDef) -> CompileResult<String> {
        ddl::alter_column(self, table, column)
    }

    fn drop_column(&self, table: &str, column: &str) -> CompileResult<String> {
        Ok(ddl::drop_column(self, table, column))
    }

    fn add_foreign_key(&self, table: &str, foreign_key: &ForeignKey) -> CompileResult<String> {
        Ok(ddl::add_foreign_key(self, table, foreign_key))
    }

    fn drop_foreign_key(&self, table: &str, name: &str) -> CompileResult<String> {
        Ok(ddl::drop_constraint(self, table, name))
    }

    fn create_index(&self, index: &IndexDef) -> CompileResult<String> {
        ddl::create_index(self, index)
    }

    fn drop_index(&self, _table: &str, name: &str) -> CompileResult<String> {
        Ok(ddl::drop_index(self, name))
    }
}
