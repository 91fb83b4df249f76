//! Shared helper functions for SQL dialect implementations.
//!
//! This module provides reusable building blocks that dialects can compose
//! to implement the `SqlDialect` trait with minimal duplication.

use super::super::error::{CompileError, CompileResult};
use super::super::token::{Token, TokenStream};
use super::super::types::DataType;
use super::super::value::{format_float, Value};
use super::{EscapeFormat, SqlDialect};

// =============================================================================
// Identifier Quoting
// =============================================================================

/// Quote identifier with double quotes (ANSI style).
/// Used by: Postgres, SQLite
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote identifier with backticks.
/// Used by: MySQL
pub fn quote_backtick(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

/// Quote identifier with square brackets.
/// Used by: T-SQL
pub fn quote_bracket(ident: &str) -> String {
    format!("[{}]", ident.replace(']', "]]"))
}

/// Quote each segment of a dotted name; `*` segments are left alone.
pub fn quote_dotted<D: SqlDialect + ?Sized>(dialect: &D, name: &str) -> String {
    name.split('.')
        .map(|segment| {
            if segment == "*" {
                segment.to_string()
            } else {
                dialect.quote_identifier(segment)
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

// =============================================================================
// String Escaping
// =============================================================================

/// Double single quotes (standard SQL).
/// Used by: Postgres, SQLite, T-SQL
pub fn escape_doubled_quotes(s: &str) -> String {
    s.replace('\'', "''")
}

/// Backslash escapes in the style of `mysql_real_escape_string`.
/// Used by: MySQL
pub fn escape_backslash(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x1a' => out.push_str("\\Z"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape `\`, `%` and `_` with a backslash.
/// Used by: MySQL, Postgres (implicit escape), SQLite (with `ESCAPE '\'`)
pub fn escape_like_backslash(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape `[`, `%` and `_` as single-character classes.
/// Used by: T-SQL
pub fn escape_like_bracket(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '[' => out.push_str("[[]"),
            '%' => out.push_str("[%]"),
            '_' => out.push_str("[_]"),
            _ => out.push(c),
        }
    }
    out
}

/// Escaped string literal for text embedded in introspection queries.
pub fn literal<D: SqlDialect + ?Sized>(dialect: &D, s: &str) -> String {
    dialect.string_literal(&dialect.escape_string(s))
}

// =============================================================================
// Boolean Formatting
// =============================================================================

/// Format boolean as literal true/false.
/// Used by: Postgres
pub fn format_bool_literal(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

/// Format boolean as numeric 1/0.
/// Used by: T-SQL, MySQL, SQLite
pub fn format_bool_numeric(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

// =============================================================================
// Value Quoting
// =============================================================================

/// Render a value as a literal.
///
/// NULL, booleans and numbers are never quoted in `Plain`/`Quoted` form.
/// LIKE forms treat every non-null value as text.
pub fn quote_value<D: SqlDialect + ?Sized>(
    dialect: &D,
    value: &Value,
    format: EscapeFormat,
) -> CompileResult<String> {
    let text = match value {
        Value::Null => return Ok("NULL".into()),
        Value::Bool(b) => return Ok(dialect.format_bool(*b).into()),
        Value::Int(n) => n.to_string(),
        Value::Float(f) => format_float(*f).ok_or_else(|| CompileError::NonFiniteFloat(f.to_string()))?,
        Value::Text(s) => s.clone(),
    };
    let is_text = matches!(value, Value::Text(_));

    let (prefix, suffix) = match format {
        EscapeFormat::Plain => {
            return Ok(if is_text { dialect.escape_string(&text) } else { text });
        }
        EscapeFormat::Quoted => {
            return Ok(if is_text { literal(dialect, &text) } else { text });
        }
        EscapeFormat::Like => ("%", "%"),
        EscapeFormat::LikeLeft => ("", "%"),
        EscapeFormat::LikeRight => ("%", ""),
    };

    let pattern = format!("{}{}{}", prefix, dialect.escape_like(&text), suffix);
    Ok(format!(
        "{}{}",
        literal(dialect, &pattern),
        dialect.like_escape_clause()
    ))
}

// =============================================================================
// Pagination
// =============================================================================

/// Emit LIMIT ... OFFSET ... (standard SQL).
/// Used by: Postgres, MySQL, SQLite
pub fn emit_limit_offset_standard(limit: Option<u64>, offset: Option<u64>) -> TokenStream {
    let mut ts = TokenStream::new();

    if let Some(lim) = limit {
        ts.push(Token::Limit)
            .space()
            .push(Token::LitInt(lim));
    }

    if let Some(off) = offset {
        if limit.is_some() {
            ts.space();
        }
        ts.push(Token::Offset)
            .space()
            .push(Token::LitInt(off));
    }

    ts
}

/// Emit OFFSET ... ROWS FETCH NEXT ... ROWS ONLY (T-SQL style).
/// Used by: T-SQL
/// Note: Requires ORDER BY clause in T-SQL
pub fn emit_limit_offset_tsql(limit: Option<u64>, offset: Option<u64>) -> TokenStream {
    let mut ts = TokenStream::new();

    let off = offset.unwrap_or(0);
    ts.push(Token::Offset)
        .space()
        .push(Token::LitInt(off))
        .space()
        .push(Token::Rows);

    if let Some(lim) = limit {
        ts.space()
            .push(Token::Fetch)
            .space()
            .push(Token::Next)
            .space()
            .push(Token::LitInt(lim))
            .space()
            .push(Token::Rows)
            .space()
            .push(Token::Only);
    }

    ts
}

// =============================================================================
// Data Type Emission
// =============================================================================

/// Emit data type for ANSI/Postgres style.
/// Used by: Postgres
pub fn emit_data_type_ansi(dt: &DataType) -> String {
    match dt {
        DataType::Bool => "BOOLEAN".into(),
        DataType::Int8 | DataType::Int16 => "SMALLINT".into(),
        DataType::Int32 => "INTEGER".into(),
        DataType::Int64 => "BIGINT".into(),
        DataType::Float32 => "REAL".into(),
        DataType::Float64 => "DOUBLE PRECISION".into(),
        DataType::Decimal(p, s) => format!("DECIMAL({}, {})", p, s),
        DataType::String => "TEXT".into(),
        DataType::Char(n) => format!("CHAR({})", n),
        DataType::Varchar(n) => format!("VARCHAR({})", n),
        DataType::Date => "DATE".into(),
        DataType::Time => "TIME".into(),
        DataType::Timestamp => "TIMESTAMP".into(),
        DataType::TimestampTz => "TIMESTAMP WITH TIME ZONE".into(),
        DataType::Binary => "BYTEA".into(),
        DataType::Json => "JSONB".into(),
        DataType::Uuid => "UUID".into(),
    }
}

/// Emit data type for MySQL.
pub fn emit_data_type_mysql(dt: &DataType) -> String {
    match dt {
        DataType::Bool => "TINYINT(1)".into(),
        DataType::Int8 => "TINYINT".into(),
        DataType::Int16 => "SMALLINT".into(),
        DataType::Int32 => "INT".into(),
        DataType::Int64 => "BIGINT".into(),
        DataType::Float32 => "FLOAT".into(),
        DataType::Float64 => "DOUBLE".into(),
        DataType::Decimal(p, s) => format!("DECIMAL({}, {})", p, s),
        DataType::String => "TEXT".into(),
        DataType::Char(n) => format!("CHAR({})", n),
        DataType::Varchar(n) => format!("VARCHAR({})", n),
        DataType::Date => "DATE".into(),
        DataType::Time => "TIME".into(),
        DataType::Timestamp | DataType::TimestampTz => "DATETIME".into(),
        DataType::Binary => "BLOB".into(),
        DataType::Json => "JSON".into(),
        DataType::Uuid => "CHAR(36)".into(),
    }
}

/// Emit data type for SQLite.
///
/// SQLite only knows storage classes; names are chosen so that type
/// affinity comes out right and `INTEGER PRIMARY KEY` aliases the rowid.
pub fn emit_data_type_sqlite(dt: &DataType) -> String {
    match dt {
        DataType::Bool
        | DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64 => "INTEGER".into(),
        DataType::Float32 | DataType::Float64 => "REAL".into(),
        DataType::Decimal(_, _) => "NUMERIC".into(),
        DataType::Binary => "BLOB".into(),
        DataType::String
        | DataType::Char(_)
        | DataType::Varchar(_)
        | DataType::Date
        | DataType::Time
        | DataType::Timestamp
        | DataType::TimestampTz
        | DataType::Json
        | DataType::Uuid => "TEXT".into(),
    }
}

/// Emit data type for T-SQL.
pub fn emit_data_type_tsql(dt: &DataType) -> String {
    let length = |n: u16| {
        if n == u16::MAX {
            "MAX".to_string()
        } else {
            n.to_string()
        }
    };

    match dt {
        DataType::Bool => "BIT".into(),
        DataType::Int8 => "TINYINT".into(),
        DataType::Int16 => "SMALLINT".into(),
        DataType::Int32 => "INT".into(),
        DataType::Int64 => "BIGINT".into(),
        DataType::Float32 => "REAL".into(),
        DataType::Float64 => "FLOAT".into(),
        DataType::Decimal(p, s) => format!("DECIMAL({}, {})", p, s),
        DataType::String | DataType::Json => "NVARCHAR(MAX)".into(),
        DataType::Char(n) => format!("NCHAR({})", length(*n)),
        DataType::Varchar(n) => format!("NVARCHAR({})", length(*n)),
        DataType::Date => "DATE".into(),
        DataType::Time => "TIME".into(),
        DataType::Timestamp => "DATETIME2".into(),
        DataType::TimestampTz => "DATETIMEOFFSET".into(),
        DataType::Binary => "VARBINARY(MAX)".into(),
        DataType::Uuid => "UNIQUEIDENTIFIER".into(),
    }
}
