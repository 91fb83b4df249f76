//! SQL-level data types.
//!
//! [`DataType`] is used in two directions:
//! - DDL templates render it with [`SqlDialect::emit_data_type`](super::dialect::SqlDialect::emit_data_type)
//! - type names returned by schema introspection are parsed back into it and
//!   mapped to a [`HostType`] by [`SqlDialect::host_type`](super::dialect::SqlDialect::host_type)

use std::fmt;

/// SQL-level data type.
///
/// # Examples
///
/// ```ignore
/// use sqlweave::sql::types::DataType;
///
/// let int_type = DataType::Int64;
/// let varchar_type = DataType::Varchar(255);
/// let decimal_type = DataType::Decimal(18, 2);
///
/// // Parse from strings
/// let parsed = DataType::parse("decimal(10,2)").unwrap();
/// assert_eq!(parsed, DataType::Decimal(10, 2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Boolean type.
    Bool,

    /// 8-bit signed integer (TINYINT in most databases).
    Int8,

    /// 16-bit signed integer (SMALLINT).
    Int16,

    /// 32-bit signed integer (INT/INTEGER).
    Int32,

    /// 64-bit signed integer (BIGINT).
    Int64,

    /// 32-bit floating point (REAL/FLOAT4).
    Float32,

    /// 64-bit floating point (DOUBLE PRECISION/FLOAT8).
    Float64,

    /// Fixed-precision decimal with precision and scale.
    /// - First parameter: precision (total digits)
    /// - Second parameter: scale (digits after decimal point)
    Decimal(u8, u8),

    /// Variable-length string (TEXT, VARCHAR without limit).
    String,

    /// Fixed-length character string.
    Char(u16),

    /// Variable-length character string with maximum length.
    Varchar(u16),

    /// Date without time.
    Date,

    /// Time without date or timezone.
    Time,

    /// Timestamp without timezone.
    Timestamp,

    /// Timestamp with timezone.
    TimestampTz,

    /// Binary data (BLOB, BYTEA, VARBINARY).
    Binary,

    /// JSON data type.
    Json,

    /// UUID/GUID type.
    Uuid,
}

impl DataType {
    /// Parse a SQL data type from a string.
    ///
    /// Supports common SQL type names and syntax:
    /// - `bool`, `boolean`
    /// - `tinyint`
    /// - `smallint`, `int16`
    /// - `int`, `integer`, `int32`
    /// - `bigint`, `int64`, `int8`
    /// - `real`, `float4`, `float32`
    /// - `double`, `float8`, `float64`, `double precision`
    /// - `decimal(p,s)`, `numeric(p,s)`
    /// - `text`, `string`
    /// - `char(n)`, `character(n)`
    /// - `varchar(n)`, `character varying(n)`
    /// - `date`
    /// - `time`
    /// - `timestamp`
    /// - `timestamptz`, `timestamp with time zone`
    /// - `binary`, `blob`, `bytea`, `varbinary`
    /// - `json`, `jsonb`
    /// - `uuid`, `guid`
    ///
    /// Integer display widths and `unsigned`/`zerofill` attributes (MySQL
    /// introspection output such as `int(11) unsigned`) are ignored.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// use sqlweave::sql::types::DataType;
    ///
    /// assert_eq!(DataType::parse("bigint"), Some(DataType::Int64));
    /// assert_eq!(DataType::parse("varchar(255)"), Some(DataType::Varchar(255)));
    /// assert_eq!(DataType::parse("decimal(18,2)"), Some(DataType::Decimal(18, 2)));
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let s = strip_attributes(&s.trim().to_lowercase());

        // Handle types with parameters first
        if let Some(inner) = extract_parens(&s, "decimal")
            .or_else(|| extract_parens(&s, "numeric"))
        {
            return parse_decimal_params(&inner);
        }

        if let Some(inner) = extract_parens(&s, "varchar")
            .or_else(|| extract_parens(&s, "character varying"))
            .or_else(|| extract_parens(&s, "nvarchar"))
        {
            return parse_length_param(&inner).map(DataType::Varchar);
        }

        if let Some(inner) = extract_parens(&s, "char")
            .or_else(|| extract_parens(&s, "character"))
            .or_else(|| extract_parens(&s, "nchar"))
        {
            return parse_length_param(&inner).map(DataType::Char);
        }

        // Integer display widths carry no type information
        let s = match s.find('(') {
            Some(idx) if is_integer_name(s[..idx].trim()) => s[..idx].trim().to_string(),
            _ => s,
        };

        // Handle simple type names
        match s.as_str() {
            // Boolean
            "bool" | "boolean" | "bit" => Some(DataType::Bool),

            // Integers
            "tinyint" => Some(DataType::Int8),
            "smallint" | "int16" | "int2" => Some(DataType::Int16),
            "int" | "integer" | "int32" | "int4" | "mediumint" => Some(DataType::Int32),
            "bigint" | "int64" | "int8" => Some(DataType::Int64),

            // Floating point
            "real" | "float4" | "float32" => Some(DataType::Float32),
            "double" | "float8" | "float64" | "double precision" | "float" => {
                Some(DataType::Float64)
            }

            // Decimal without parameters (use default precision)
            "decimal" | "numeric" | "number" => Some(DataType::Decimal(18, 2)),

            // String
            "text" | "string" | "clob" | "ntext" | "tinytext" | "mediumtext" | "longtext" => {
                Some(DataType::String)
            }
            "varchar" | "nvarchar" => Some(DataType::String), // Without length = unbounded

            // Date/Time
            "date" => Some(DataType::Date),
            "time" => Some(DataType::Time),
            "timestamp" | "datetime" | "datetime2" => Some(DataType::Timestamp),
            "timestamptz" | "timestamp with time zone" | "datetimeoffset" => {
                Some(DataType::TimestampTz)
            }

            // Binary
            "binary" | "blob" | "bytea" | "varbinary" | "image" | "longblob" | "mediumblob" => {
                Some(DataType::Binary)
            }

            // JSON
            "json" | "jsonb" => Some(DataType::Json),

            // UUID
            "uuid" | "guid" | "uniqueidentifier" => Some(DataType::Uuid),

            _ => None,
        }
    }

    /// Map to the host-side representation a driver should decode into.
    ///
    /// Decimals map to [`HostType::String`] so that precision survives.
    pub fn host_type(&self) -> HostType {
        match self {
            DataType::Bool => HostType::Bool,
            DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => HostType::Int,
            DataType::Float32 | DataType::Float64 => HostType::Float,
            DataType::Binary => HostType::Binary,
            DataType::Json => HostType::Json,
            DataType::Decimal(_, _)
            | DataType::String
            | DataType::Char(_)
            | DataType::Varchar(_)
            | DataType::Date
            | DataType::Time
            | DataType::Timestamp
            | DataType::TimestampTz
            | DataType::Uuid => HostType::String,
        }
    }
}

/// Host-side type of an introspected column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostType {
    Bool,
    Int,
    Float,
    String,
    Binary,
    Json,
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HostType::Bool => "bool",
            HostType::Int => "int",
            HostType::Float => "float",
            HostType::String => "string",
            HostType::Binary => "binary",
            HostType::Json => "json",
        };
        f.write_str(name)
    }
}

fn is_integer_name(name: &str) -> bool {
    matches!(
        name,
        "tinyint" | "smallint" | "mediumint" | "int" | "integer" | "bigint"
    )
}

/// Drop trailing column attributes that do not change the type.
fn strip_attributes(s: &str) -> String {
    s.split_whitespace()
        .filter(|word| !matches!(*word, "unsigned" | "signed" | "zerofill"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract content inside parentheses for a given type prefix.
/// e.g., extract_parens("decimal(10,2)", "decimal") returns Some("10,2")
fn extract_parens(s: &str, prefix: &str) -> Option<String> {
    let s = s.trim();
    if !s.starts_with(prefix) {
        return None;
    }

    let rest = s[prefix.len()..].trim();
    if !rest.starts_with('(') || !rest.ends_with(')') {
        return None;
    }

    Some(rest[1..rest.len() - 1].to_string())
}

/// Parse decimal parameters "precision,scale" or "precision, scale".
fn parse_decimal_params(inner: &str) -> Option<DataType> {
    let parts: Vec<&str> = inner.split(',').map(|s| s.trim()).collect();
    if parts.len() != 2 {
        return None;
    }

    let precision: u8 = parts[0].parse().ok()?;
    let scale: u8 = parts[1].parse().ok()?;

    Some(DataType::Decimal(precision, scale))
}

/// Parse a single length parameter.
fn parse_length_param(inner: &str) -> Option<u16> {
    let inner = inner.trim();
    // Handle "max" keyword used in T-SQL
    if inner.eq_ignore_ascii_case("max") {
        return Some(u16::MAX);
    }
    inner.parse().ok()
}
