//! Tests for identifier and value quoting across dialects.

use sqlweave::dialect::{for_name, EscapeFormat, MySql, Postgres, SqlDialect, Sqlite, TSql};
use sqlweave::types::HostType;
use sqlweave::{CompileError, Value};

// ============================================================================
// Identifiers
// ============================================================================

#[test]
fn test_dotted_names() {
    assert_eq!(MySql.quote_column("users.id"), "`users`.`id`");
    assert_eq!(Postgres.quote_table("public.users"), "\"public\".\"users\"");
    assert_eq!(TSql.quote_table("dbo.users"), "[dbo].[users]");
    assert_eq!(Sqlite.quote_column("u.*"), "\"u\".*");
}

#[test]
fn test_embedded_quote_characters() {
    assert_eq!(MySql.quote_identifier("we`ird"), "`we``ird`");
    assert_eq!(Postgres.quote_identifier("we\"ird"), "\"we\"\"ird\"");
    assert_eq!(TSql.quote_identifier("we]ird"), "[we]]ird]");
}

#[test]
fn test_registry_names_resolve_to_quoting_rules() {
    assert_eq!(for_name("mariadb").unwrap().quote_identifier("t"), "`t`");
    assert_eq!(for_name("sqlsrv").unwrap().quote_identifier("t"), "[t]");
    assert_eq!(for_name("sqlite3").unwrap().quote_identifier("t"), "\"t\"");
}

// ============================================================================
// Values
// ============================================================================

#[test]
fn test_quoted_text() {
    let value = Value::from("O'Brien");
    assert_eq!(
        MySql.quote_value(&value, EscapeFormat::Quoted).unwrap(),
        "'O\\'Brien'"
    );
    assert_eq!(
        Postgres.quote_value(&value, EscapeFormat::Quoted).unwrap(),
        "'O''Brien'"
    );
    assert_eq!(
        TSql.quote_value(&Value::from("Zoë"), EscapeFormat::Quoted).unwrap(),
        "N'Zoë'"
    );
}

#[test]
fn test_plain_text_is_escaped_but_not_wrapped() {
    assert_eq!(
        Postgres.quote_value(&Value::from("it's"), EscapeFormat::Plain).unwrap(),
        "it''s"
    );
}

#[test]
fn test_scalars_are_never_quoted() {
    for dialect in [&MySql as &dyn SqlDialect, &Postgres, &Sqlite, &TSql] {
        assert_eq!(dialect.quote_value(&Value::Null, EscapeFormat::Quoted).unwrap(), "NULL");
        assert_eq!(dialect.quote_value(&Value::Int(42), EscapeFormat::Quoted).unwrap(), "42");
        assert_eq!(dialect.quote_value(&Value::Float(1.5), EscapeFormat::Plain).unwrap(), "1.5");
    }
    assert_eq!(Postgres.quote_value(&Value::Bool(true), EscapeFormat::Quoted).unwrap(), "true");
    assert_eq!(MySql.quote_value(&Value::Bool(true), EscapeFormat::Quoted).unwrap(), "1");
}

#[test]
fn test_like_forms() {
    let value = Value::from("50%_off");
    assert_eq!(
        MySql.quote_value(&value, EscapeFormat::Like).unwrap(),
        "'%50\\\\%\\\\_off%'"
    );
    assert_eq!(
        Postgres.quote_value(&value, EscapeFormat::LikeLeft).unwrap(),
        "'50\\%\\_off%'"
    );
    assert_eq!(
        Sqlite.quote_value(&value, EscapeFormat::LikeRight).unwrap(),
        "'%50\\%\\_off' ESCAPE '\\'"
    );
    assert_eq!(
        TSql.quote_value(&value, EscapeFormat::Like).unwrap(),
        "'%50[%][_]off%'"
    );
}

#[test]
fn test_quote_value_by_format_name() {
    assert_eq!(
        Postgres.quote_value_as(&Value::from("ab"), "like-left").unwrap(),
        "'ab%'"
    );
    assert!(matches!(
        Postgres.quote_value_as(&Value::from("ab"), "fuzzy"),
        Err(CompileError::EscapeFormat(_))
    ));
}

#[test]
fn test_non_finite_float_rejected() {
    assert!(matches!(
        MySql.quote_value(&Value::Float(f64::INFINITY), EscapeFormat::Quoted),
        Err(CompileError::NonFiniteFloat(_))
    ));
}

// ============================================================================
// Type mapping and introspection
// ============================================================================

#[test]
fn test_host_type_mapping() {
    assert_eq!(MySql.host_type("tinyint(1)"), HostType::Bool);
    assert_eq!(MySql.host_type("int(11) unsigned"), HostType::Int);
    assert_eq!(Postgres.host_type("double precision"), HostType::Float);
    assert_eq!(Postgres.host_type("jsonb"), HostType::Json);
    assert_eq!(TSql.host_type("varbinary"), HostType::Binary);
    assert_eq!(Sqlite.host_type("something_custom"), HostType::String);
}

#[test]
fn test_introspection_queries_escape_table_names() {
    assert!(Postgres.columns_sql("o'neil").contains("'o''neil'"));
    assert_eq!(MySql.columns_sql("users"), "SHOW FULL COLUMNS FROM `users`");
    assert_eq!(Sqlite.indexes_sql("users"), "PRAGMA index_list(\"users\")");
    assert_eq!(
        Sqlite.columns_sql("main.users"),
        r#"PRAGMA "main".table_info("users")"#
    );
    assert_eq!(
        Sqlite.foreign_keys_sql("aux.posts"),
        r#"PRAGMA "aux".foreign_key_list("posts")"#
    );
    assert!(TSql.list_tables_sql().contains("INFORMATION_SCHEMA.TABLES"));
}
