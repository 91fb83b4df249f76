//! Test utilities for SQL emission validation.
//!
//! Parses emitted SQL with sqlparser-rs to check it is syntactically valid
//! for the target engine.

use sqlparser::dialect::{GenericDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect};
use sqlparser::parser::Parser;

use super::dialect::SqlDialect;

/// Validates that a SQL string is syntactically valid for the given dialect.
///
/// ```ignore
/// use crate::sql::test_utils::validate_sql;
/// use crate::sql::dialect::Postgres;
///
/// validate_sql("SELECT * FROM users", &Postgres).unwrap();
/// ```
pub fn validate_sql(sql: &str, dialect: &dyn SqlDialect) -> Result<(), String> {
    let parser_dialect: Box<dyn sqlparser::dialect::Dialect> = match dialect.name() {
        "mysql" => Box::new(MySqlDialect {}),
        "postgres" => Box::new(PostgreSqlDialect {}),
        "sqlite" => Box::new(SQLiteDialect {}),
        "tsql" => Box::new(MsSqlDialect {}),
        _ => Box::new(GenericDialect {}),
    };

    Parser::parse_sql(&*parser_dialect, sql)
        .map(|_| ())
        .map_err(|e| format!("Invalid SQL for {}: {}\nSQL: {}", dialect.name(), e, sql))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::builder::StatementBuilder;
    use crate::sql::condition::{between, cmp, eq, is_in, Condition};
    use crate::sql::dialect::{MySql, Postgres, Sqlite, TSql};
    use crate::sql::fragment::{Columns, InsertValues, Ordering};
    use crate::sql::params::ParamMode;
    use std::sync::Arc;

    #[test]
    fn test_validate_valid_sql() {
        validate_sql("SELECT * FROM users", &Postgres).unwrap();
        validate_sql("SELECT * FROM `users`", &MySql).unwrap();
        validate_sql("SELECT * FROM [users]", &TSql).unwrap();
    }

    #[test]
    fn test_validate_invalid_sql() {
        let result = validate_sql("SELEC * FORM users", &Postgres);
        assert!(result.is_err());
    }

    #[test]
    fn test_emitted_select_parses_for_every_dialect() {
        let dialects: Vec<Arc<dyn SqlDialect>> =
            vec![Arc::new(MySql), Arc::new(Postgres), Arc::new(Sqlite), Arc::new(TSql)];

        for dialect in dialects {
            // `$name` placeholders tokenize the same way for every parser dialect
            let mut b =
                StatementBuilder::new(dialect.clone(), ParamMode::Named).with_named_prefix('$');
            b.select("users", ["id", "name"])
                .where_(Condition::any([
                    cmp(">", "age", 18),
                    Condition::all([eq("active", 1), is_in("role", ["admin", "staff"])]),
                ]))
                .unwrap()
                .where_(between("score", 1, 10))
                .unwrap()
                .order([Ordering::desc("name")])
                .unwrap()
                .limit(10, Some(20))
                .unwrap();

            let sql = b.build().unwrap().sql;
            validate_sql(&sql, dialect.as_ref()).unwrap();
        }
    }

    #[test]
    fn test_emitted_insert_parses() {
        let mut b = StatementBuilder::new(Arc::new(MySql), ParamMode::Positional);
        b.insert("users", InsertValues::row([("name", "ann"), ("email", "a@x.io")]));
        validate_sql(&b.build().unwrap().sql, &MySql).unwrap();

        let mut b = StatementBuilder::new(Arc::new(Postgres), ParamMode::Positional);
        b.select("archive", Columns::all());
        let query = b.subquery().unwrap();
        b.insert("users", InsertValues::select(["name"], query));
        validate_sql(&b.build().unwrap().sql, &Postgres).unwrap();
    }
}
