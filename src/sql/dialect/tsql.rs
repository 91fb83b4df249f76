//! T-SQL (SQL Server / Azure SQL) dialect.
//!
//! T-SQL has significant differences from ANSI:
//! - Square bracket identifier quoting (`[name]`)
//! - N'...' prefix for Unicode strings
//! - LIKE metacharacters escaped as bracket classes (`[%]`)
//! - OFFSET FETCH for pagination (requires ORDER BY)
//! - IDENTITY(1, 1) columns
//! - Renames go through `sp_rename`
//! - ADD without the COLUMN keyword

use super::helpers;
use super::SqlDialect;
use crate::sql::ddl::{self, ColumnDef, CreateTable};
use crate::sql::error::{CompileError, CompileResult};
use crate::sql::token::TokenStream;
use crate::sql::types::DataType;

/// T-SQL (SQL Server) dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct TSql;

impl SqlDialect for TSql {
    fn name(&self) -> &'static str {
        "tsql"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_bracket(ident)
    }

    fn string_literal(&self, escaped: &str) -> String {
        // N prefix keeps non-ASCII text intact in non-Unicode collations
        if escaped.is_ascii() {
            format!("'{}'", escaped)
        } else {
            format!("N'{}'", escaped)
        }
    }

    fn escape_like(&self, s: &str) -> String {
        helpers::escape_like_bracket(s)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    fn emit_limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> TokenStream {
        helpers::emit_limit_offset_tsql(limit, offset)
    }

    fn requires_order_by_for_offset(&self) -> bool {
        true
    }

    fn emit_data_type(&self, dt: &DataType) -> String {
        helpers::emit_data_type_tsql(dt)
    }

    fn emit_identity(&self) -> String {
        "IDENTITY(1, 1)".into()
    }

    fn list_tables_sql(&self) -> String {
        "SELECT TABLE_NAME AS name FROM INFORMATION_SCHEMA.TABLES \
         WHERE TABLE_TYPE = 'BASE TABLE' AND TABLE_SCHEMA = SCHEMA_NAME() \
         ORDER BY TABLE_NAME"
            .into()
    }

    fn columns_sql(&self, table: &str) -> String {
        format!(
            "SELECT COLUMN_NAME AS name, DATA_TYPE AS type, IS_NULLABLE AS nullable, \
             COLUMN_DEFAULT AS default_value FROM INFORMATION_SCHEMA.COLUMNS \
             WHERE TABLE_SCHEMA = SCHEMA_NAME() AND TABLE_NAME = {} \
             ORDER BY ORDINAL_POSITION",
            helpers::literal(self, table)
        )
    }

    fn foreign_keys_sql(&self, table: &str) -> String {
        format!(
            "SELECT fk.name AS name, pc.name AS column_name, \
             rt.name AS references_table, rc.name AS references_column \
             FROM sys.foreign_keys fk \
             JOIN sys.foreign_key_columns fkc ON fkc.constraint_object_id = fk.object_id \
             JOIN sys.columns pc ON pc.object_id = fkc.parent_object_id AND pc.column_id = fkc.parent_column_id \
             JOIN sys.tables rt ON rt.object_id = fkc.referenced_object_id \
             JOIN sys.columns rc ON rc.object_id = fkc.referenced_object_id AND rc.column_id = fkc.referenced_column_id \
             WHERE fk.parent_object_id = OBJECT_ID({})",
            helpers::literal(self, table)
        )
    }

    fn indexes_sql(&self, table: &str) -> String {
        format!(
            "SELECT i.name AS name, i.is_unique AS is_unique, i.is_primary_key AS is_primary \
             FROM sys.indexes i WHERE i.object_id = OBJECT_ID({}) AND i.name IS NOT NULL",
            helpers::literal(self, table)
        )
    }

    fn create_table(&self, table: &CreateTable) -> CompileResult<String> {
        if table.if_not_exists {
            return Err(CompileError::unsupported(self.name(), "CREATE TABLE IF NOT EXISTS"));
        }
        ddl::create_table(self, table)
    }

    fn rename_table(&self, from: &str, to: &str) -> CompileResult<String> {
        Ok(format!(
            "EXEC sp_rename {}, {}",
            helpers::literal(self, from),
            helpers::literal(self, to)
        ))
    }

    fn add_column(&self, table: &str, column: &ColumnDef) -> CompileResult<String> {
        let action = format!("ADD {}", self.column_definition(column)?);
        Ok(ddl::alter_table(self, table, &action))
    }

    fn rename_column(&self, table: &str, from: &str, to: &str) -> CompileResult<String> {
        Ok(format!(
            "EXEC sp_rename {}, {}, 'COLUMN'",
            helpers::literal(self, &format!("{}.{}", table, from)),
            helpers::literal(self, to)
        ))
    }

    fn change_column(&self, table: &str, column: &ColumnDef) -> CompileResult<String> {
        if column.default.is_some() {
            return Err(CompileError::unsupported(
                self.name(),
                "changing a column default with ALTER COLUMN",
            ));
        }

        let mut action = format!(
            "ALTER COLUMN {} {}",
            self.quote_identifier(&column.name),
            self.emit_data_type(&column.data_type)
        );
        match column.nullable {
            Some(true) => action.push_str(" NULL"),
            Some(false) => action.push_str(" NOT NULL"),
            None => {}
        }
        Ok(ddl::alter_table(self, table, &action))
    }

    fn drop_index(&self, table: &str, name: &str) -> CompileResult<String> {
        Ok(ddl::drop_index_on(self, table, name))
    }
}
