//! PostgreSQL dialect.
//!
//! PostgreSQL is close to ANSI; most trait defaults apply:
//! - Double-quote identifier quoting
//! - Native boolean literals (true/false)
//! - Backslash is the implicit LIKE escape character
//! - GENERATED BY DEFAULT AS IDENTITY for auto-increment columns
//! - No XOR, no ORDER BY/LIMIT on UPDATE/DELETE

use super::helpers;
use super::SqlDialect;

/// PostgreSQL dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    // Uses default quote_identifier ("..."), format_bool (true/false),
    // emit_limit_offset and ALTER COLUMN ... TYPE

    fn list_tables_sql(&self) -> String {
        "SELECT tablename AS name FROM pg_catalog.pg_tables \
         WHERE schemaname = current_schema() ORDER BY tablename"
            .into()
    }

    fn indexes_sql(&self, table: &str) -> String {
        format!(
            "SELECT indexname AS name, indexdef AS definition FROM pg_catalog.pg_indexes \
             WHERE schemaname = current_schema() AND tablename = {} ORDER BY indexname",
            helpers::literal(self, table)
        )
    }
}
