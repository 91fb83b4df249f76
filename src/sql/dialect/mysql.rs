//! MySQL SQL dialect (also serves MariaDB).
//!
//! MySQL differences from ANSI:
//! - Backtick identifier quoting (`` `name` ``)
//! - Backslash escapes inside string literals
//! - Boolean is TINYINT(1), returns 1/0
//! - `&&`, `||` and XOR are logical operators
//! - UPDATE/DELETE accept ORDER BY and LIMIT; UPDATE accepts joins
//! - AUTO_INCREMENT identity, MODIFY COLUMN, DROP FOREIGN KEY

use super::helpers;
use super::SqlDialect;
use crate::sql::condition::Conjunction;
use crate::sql::ddl::{self, ColumnDef};
use crate::sql::error::CompileResult;
use crate::sql::types::{DataType, HostType};

/// MySQL SQL dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySql;

impl SqlDialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_backtick(ident)
    }

    fn escape_string(&self, s: &str) -> String {
        helpers::escape_backslash(s)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    fn conjunction_keyword(&self, conjunction: Conjunction) -> CompileResult<&'static str> {
        Ok(match conjunction {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
            Conjunction::Xor => "XOR",
            Conjunction::AndAlias => "&&",
            Conjunction::OrAlias => "||",
        })
    }

    // Uses default emit_limit_offset (LIMIT ... OFFSET ...)

    fn empty_insert_body(&self) -> &'static str {
        "() VALUES ()"
    }

    fn supports_dml_order_limit(&self) -> bool {
        true
    }

    fn supports_update_join(&self) -> bool {
        true
    }

    fn emit_data_type(&self, dt: &DataType) -> String {
        helpers::emit_data_type_mysql(dt)
    }

    fn emit_identity(&self) -> String {
        "AUTO_INCREMENT".into()
    }

    fn host_type(&self, sql_type: &str) -> HostType {
        // tinyint(1) is how MySQL reports BOOLEAN columns
        let normalized = sql_type.trim().to_ascii_lowercase();
        if normalized.split_whitespace().next() == Some("tinyint(1)") {
            return HostType::Bool;
        }
        DataType::parse(sql_type).map_or(HostType::String, |dt| dt.host_type())
    }

    fn list_tables_sql(&self) -> String {
        "SELECT table_name AS name FROM information_schema.tables \
         WHERE table_schema = DATABASE() AND table_type = 'BASE TABLE' \
         ORDER BY table_name"
            .into()
    }

    fn columns_sql(&self, table: &str) -> String {
        format!("SHOW FULL COLUMNS FROM {}", self.quote_table(table))
    }

    fn foreign_keys_sql(&self, table: &str) -> String {
        format!(
            "SELECT constraint_name AS name, column_name, \
             referenced_table_name AS references_table, \
             referenced_column_name AS references_column \
             FROM information_schema.key_column_usage \
             WHERE table_schema = DATABASE() AND table_name = {} \
             AND referenced_table_name IS NOT NULL",
            helpers::literal(self, table)
        )
    }

    fn indexes_sql(&self, table: &str) -> String {
        format!("SHOW INDEX FROM {}", self.quote_table(table))
    }

    fn rename_table(&self, from: &str, to: &str) -> CompileResult<String> {
        Ok(format!(
            "RENAME TABLE {} TO {}",
            self.quote_table(from),
            self.quote_table(to)
        ))
    }

    fn change_column(&self, table: &str, column: &ColumnDef) -> CompileResult<String> {
        let action = format!("MODIFY COLUMN {}", self.column_definition(column)?);
        Ok(ddl::alter_table(self, table, &action))
    }

    fn drop_foreign_key(&self, table: &str, name: &str) -> CompileResult<String> {
        let action = format!("DROP FOREIGN KEY {}", self.quote_identifier(name));
        Ok(ddl::alter_table(self, table, &action))
    }

    fn drop_index(&self, table: &str, name: &str) -> CompileResult<String> {
        Ok(ddl::drop_index_on(self, table, name))
    }
}
