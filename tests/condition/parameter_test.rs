//! Parameter binding: counts, ordering and serialized shape.

use std::sync::Arc;

use serde_json::json;
use sqlweave::condition::{
    between, cmp, eq, is, is_in, is_not_null, is_null, not_in, Condition, Operand,
};
use sqlweave::dialect::{MySql, Postgres, SqlDialect};
use sqlweave::fragment::{Columns, InsertValues};
use sqlweave::{raw, CompileError, Compiled, ParamMode, Params, StatementBuilder, Value};

fn compile(
    dialect: impl SqlDialect + 'static,
    mode: ParamMode,
    condition: Condition,
) -> Compiled {
    let mut b = StatementBuilder::new(Arc::new(dialect), mode);
    b.select("t", Columns::all()).where_(condition).unwrap();
    b.build().unwrap()
}

#[test]
fn test_placeholder_count_matches_params() {
    let condition = Condition::all([
        eq("a", 1),
        cmp("<>", "b", "x"),
        is_in("c", [1, 2, 3]),
        not_in("d", ["p", "q"]),
        between("e", 1.5, 2.5),
        is_null("f"),
        is_not_null("g"),
        Condition::raw("h > 0"),
    ]);
    let compiled = compile(MySql, ParamMode::Positional, condition);

    assert_eq!(compiled.sql.matches('?').count(), compiled.params.len());
    assert_eq!(compiled.params.len(), 9);
}

#[test]
fn test_is_operand_is_never_bound() {
    let compiled = compile(
        Postgres,
        ParamMode::Positional,
        Condition::all([is_null("a"), is("b", true), is_not_null("c")]),
    );
    assert_eq!(
        compiled.sql,
        r#"SELECT * FROM "t" WHERE ("a" IS NULL) AND ("b" IS TRUE) AND ("c" IS NOT NULL)"#
    );
    assert!(compiled.params.is_empty());
}

#[test]
fn test_named_placeholders_are_sequential() {
    let compiled = compile(
        Postgres,
        ParamMode::Named,
        Condition::all([eq("a", 1), is_in("b", ["x", "y"])]),
    );
    assert_eq!(
        compiled.sql,
        r#"SELECT * FROM "t" WHERE "a" = :p1 AND ("b" IN (:p2, :p3))"#
    );
    let named = compiled.params.as_named().unwrap();
    assert_eq!(named.keys().collect::<Vec<_>>(), vec!["p1", "p2", "p3"]);
}

#[test]
fn test_mixed_in_list_binds_values_only() {
    let compiled = compile(
        MySql,
        ParamMode::Positional,
        Condition::leaf("IN", "id", [Operand::from(1), Operand::Raw(raw("@last_id"))]),
    );
    assert_eq!(compiled.sql, "SELECT * FROM `t` WHERE (`id` IN (?, @last_id))");
    assert_eq!(compiled.params, Params::Positional(vec![Value::Int(1)]));
}

#[test]
fn test_empty_in_list_is_rejected() {
    let mut b = StatementBuilder::new(Arc::new(MySql), ParamMode::Positional);
    b.select("t", Columns::all())
        .where_(is_in("id", Vec::<i64>::new()))
        .unwrap();
    assert!(matches!(b.build(), Err(CompileError::InvalidOperator { .. })));
}

#[test]
fn test_unknown_operator_is_rejected() {
    let mut b = StatementBuilder::new(Arc::new(MySql), ParamMode::Positional);
    b.select("t", Columns::all())
        .where_(cmp("~=", "a", 1))
        .unwrap();
    assert!(matches!(b.build(), Err(CompileError::InvalidOperator { .. })));
}

#[test]
fn test_insert_padding_binds_repeated_values() {
    let mut b = StatementBuilder::new(Arc::new(Postgres), ParamMode::Named);
    b.insert(
        "events",
        InsertValues::columns([
            ("kind", vec![Operand::from("click")]),
            ("x", vec![Operand::from(1), Operand::from(2), Operand::from(3)]),
        ]),
    );
    let compiled = b.build().unwrap();
    assert_eq!(
        compiled.sql,
        r#"INSERT INTO "events" ("kind", "x") VALUES (:p1, :p2), (:p3, :p4), (:p5, :p6)"#
    );
    let named = compiled.params.as_named().unwrap();
    assert_eq!(named["p3"], Value::from("click"));
    assert_eq!(named["p6"], Value::Int(3));
}

#[test]
fn test_positional_params_serialize_as_array() {
    let compiled = compile(
        MySql,
        ParamMode::Positional,
        Condition::all([eq("a", 1), eq("b", "two"), eq("c", Value::Null), eq("d", true)]),
    );
    assert_eq!(
        serde_json::to_value(&compiled.params).unwrap(),
        json!([1, "two", null, true])
    );
}

#[test]
fn test_named_params_serialize_as_object() {
    let compiled = compile(
        Postgres,
        ParamMode::Named,
        Condition::all([eq("a", 2.5), eq("b", "x")]),
    );
    assert_eq!(
        serde_json::to_value(&compiled.params).unwrap(),
        json!({ "p1": 2.5, "p2": "x" })
    );
}

#[test]
fn test_build_into_overwrites_params() {
    let mut b = StatementBuilder::new(Arc::new(MySql), ParamMode::Positional);
    let mut params = Params::Positional(vec![Value::Int(99)]);

    b.delete("t").where_(eq("id", 7)).unwrap();
    let sql = b.build_into(&mut params).unwrap();

    assert_eq!(sql, "DELETE FROM `t` WHERE `id` = ?");
    assert_eq!(params, Params::Positional(vec![Value::Int(7)]));
}
