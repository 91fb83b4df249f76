//! Expression normalizers.
//!
//! Pure functions turning fragments into SQL text. Values are handed to the
//! binder in the order their placeholders appear in the output.

use super::condition::{Condition, Conjunction, Operand, Operator};
use super::dialect::SqlDialect;
use super::error::{CompileError, CompileResult};
use super::fragment::{Assignment, Columns, InsertValues, Item, Ordering, Selectable, SortDir, TableRef};
use super::params::Binder;
use super::statement::{ConditionFragment, Subquery};
use super::value::{format_float, Value};

/// How a bare name is quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Column,
    Table,
}

// ============================================================================
// Select and table lists
// ============================================================================

/// `(<sql>)` with parameters bound into the enclosing statement.
pub fn subquery(
    dialect: &dyn SqlDialect,
    binder: &mut dyn Binder,
    sub: &Subquery,
) -> CompileResult<String> {
    Ok(format!("({})", sub.statement().compile(dialect, binder)?))
}

pub fn item(
    dialect: &dyn SqlDialect,
    binder: &mut dyn Binder,
    item: &Item,
    kind: NameKind,
) -> CompileResult<String> {
    match item {
        Item::Name(name) => Ok(match kind {
            NameKind::Column => dialect.quote_column(name),
            NameKind::Table => dialect.quote_table(name),
        }),
        Item::Raw(raw) => Ok(raw.as_str().to_string()),
        Item::Sub(sub) => subquery(dialect, binder, sub),
    }
}

fn selectables(
    dialect: &dyn SqlDialect,
    binder: &mut dyn Binder,
    items: &[Selectable],
    kind: NameKind,
) -> CompileResult<String> {
    let mut parts = Vec::with_capacity(items.len());
    for entry in items {
        let part = match entry {
            Selectable::Expr(it) => item(dialect, binder, it, kind)?,
            Selectable::Aliased(it, alias) => format!(
                "{} AS {}",
                item(dialect, binder, it, kind)?,
                dialect.quote_identifier(alias)
            ),
        };
        parts.push(part);
    }
    Ok(parts.join(", "))
}

/// Select list; empty is `*`.
pub fn select_list(
    dialect: &dyn SqlDialect,
    binder: &mut dyn Binder,
    columns: &Columns,
) -> CompileResult<String> {
    if columns.is_empty() {
        return Ok("*".into());
    }
    selectables(dialect, binder, columns.items(), NameKind::Column)
}

/// Table list; empty is an error.
pub fn table_list(
    dialect: &dyn SqlDialect,
    binder: &mut dyn Binder,
    tables: &TableRef,
) -> CompileResult<String> {
    if tables.is_empty() {
        return Err(CompileError::EmptyFragment {
            fragment: "table".into(),
        });
    }
    selectables(dialect, binder, tables.items(), NameKind::Table)
}

/// Comma-separated GROUP BY items.
pub fn item_list(
    dialect: &dyn SqlDialect,
    binder: &mut dyn Binder,
    items: &[Item],
) -> CompileResult<String> {
    let mut parts = Vec::with_capacity(items.len());
    for it in items {
        parts.push(item(dialect, binder, it, NameKind::Column)?);
    }
    Ok(parts.join(", "))
}

/// Comma-separated ORDER BY entries.
pub fn order_list(dialect: &dyn SqlDialect, orders: &[Ordering]) -> String {
    orders
        .iter()
        .map(|order| match order {
            Ordering::Column { name, dir } => {
                let quoted = dialect.quote_column(name);
                match dir {
                    Some(SortDir::Asc) => format!("{} ASC", quoted),
                    Some(SortDir::Desc) => format!("{} DESC", quoted),
                    None => quoted,
                }
            }
            Ordering::Raw(raw) => raw.as_str().to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Operands
// ============================================================================

/// Placeholder, raw text, parenthesized subquery or quoted column.
pub fn operand(
    dialect: &dyn SqlDialect,
    binder: &mut dyn Binder,
    operand: &Operand,
) -> CompileResult<String> {
    match operand {
        Operand::Value(value) => Ok(binder.bind(value.clone())),
        Operand::Raw(raw) => Ok(raw.as_str().to_string()),
        Operand::Column(name) => Ok(dialect.quote_column(name)),
        Operand::Sub(sub) => subquery(dialect, binder, sub),
    }
}

// ============================================================================
// Insert list
// ============================================================================

/// Everything after `INSERT INTO <table> `.
pub fn insert_values(
    dialect: &dyn SqlDialect,
    binder: &mut dyn Binder,
    values: &InsertValues,
) -> CompileResult<String> {
    match values {
        InsertValues::Raw(raw) => Ok(format!("VALUES ({})", raw.as_str())),
        InsertValues::Row(row) => {
            if row.is_empty() {
                return Ok(dialect.empty_insert_body().to_string());
            }
            let columns = quoted_columns(dialect, row.keys());
            let mut cells = Vec::with_capacity(row.len());
            for value in row.values() {
                cells.push(operand(dialect, binder, value)?);
            }
            Ok(format!("({}) VALUES ({})", columns, cells.join(", ")))
        }
        InsertValues::Columns(columns) => {
            if columns.is_empty() {
                return Ok(dialect.empty_insert_body().to_string());
            }
            if let Some((name, _)) = columns.iter().find(|(_, values)| values.is_empty()) {
                return Err(CompileError::EmptyFragment {
                    fragment: format!("insert column {}", name),
                });
            }

            let row_count = columns.values().map(Vec::len).max().unwrap_or(0);
            let names = quoted_columns(dialect, columns.keys());
            let mut rows = Vec::with_capacity(row_count);
            for i in 0..row_count {
                let mut cells = Vec::with_capacity(columns.len());
                for values in columns.values() {
                    // Short lists repeat their last value
                    let cell = &values[i.min(values.len() - 1)];
                    cells.push(operand(dialect, binder, cell)?);
                }
                rows.push(format!("({})", cells.join(", ")));
            }
            Ok(format!("({}) VALUES {}", names, rows.join(", ")))
        }
        InsertValues::Select { columns, query } => {
            let sql = query.statement().compile(dialect, binder)?;
            if columns.is_empty() {
                Ok(sql)
            } else {
                Ok(format!("({}) {}", quoted_columns(dialect, columns.iter()), sql))
            }
        }
    }
}

fn quoted_columns<'a>(dialect: &dyn SqlDialect, names: impl Iterator<Item = &'a String>) -> String {
    names
        .map(|name| dialect.quote_column(name))
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Update list
// ============================================================================

/// Comma-separated SET entries.
pub fn assignments(
    dialect: &dyn SqlDialect,
    binder: &mut dyn Binder,
    entries: &[Assignment],
) -> CompileResult<String> {
    if entries.is_empty() {
        return Err(CompileError::EmptyFragment {
            fragment: "set".into(),
        });
    }

    let mut parts = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            Assignment::Raw(raw) => parts.push(raw.as_str().to_string()),
            Assignment::Set { column, value } => {
                let rhs = operand(dialect, binder, value)?;
                parts.push(format!("{} = {}", dialect.quote_column(column), rhs));
            }
        }
    }
    Ok(parts.join(", "))
}

// ============================================================================
// Where / having / on
// ============================================================================

/// A rendered condition and how many terms sit at its top level.
struct Rendered {
    sql: String,
    terms: usize,
}

/// Render the fragments of one WHERE or HAVING clause (without the keyword).
///
/// Returns `None` when every fragment is empty.
pub fn condition_fragments(
    dialect: &dyn SqlDialect,
    binder: &mut dyn Binder,
    fragments: &[ConditionFragment],
) -> CompileResult<Option<String>> {
    let mut rendered: Vec<(Conjunction, Rendered)> = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        if let Some(r) = top_level(dialect, binder, &fragment.condition)? {
            rendered.push((fragment.conjunction, r));
        }
    }

    let multiple = rendered.len() > 1;
    let mut out = String::new();
    for (i, (conjunction, r)) in rendered.into_iter().enumerate() {
        if i > 0 {
            out.push(' ');
            out.push_str(dialect.conjunction_keyword(conjunction)?);
            out.push(' ');
        }
        if multiple && r.terms > 1 {
            out.push('(');
            out.push_str(&r.sql);
            out.push(')');
        } else {
            out.push_str(&r.sql);
        }
    }

    Ok(if out.is_empty() { None } else { Some(out) })
}

/// Render a single condition (ON clauses).
pub fn condition(
    dialect: &dyn SqlDialect,
    binder: &mut dyn Binder,
    cond: &Condition,
) -> CompileResult<Option<String>> {
    Ok(top_level(dialect, binder, cond)?.map(|r| r.sql))
}

/// A top-level group is not parenthesized; its children follow the
/// precedence rule relative to its conjunction.
fn top_level(
    dialect: &dyn SqlDialect,
    binder: &mut dyn Binder,
    cond: &Condition,
) -> CompileResult<Option<Rendered>> {
    match cond {
        Condition::Group {
            conjunction,
            children,
        } => group_terms(dialect, binder, *conjunction, children),
        other => node(dialect, binder, other, Conjunction::And),
    }
}

/// A group with a single rendered child takes over that child's term count.
fn group_terms(
    dialect: &dyn SqlDialect,
    binder: &mut dyn Binder,
    conjunction: Conjunction,
    children: &[Condition],
) -> CompileResult<Option<Rendered>> {
    let mut terms = Vec::with_capacity(children.len());
    for child in children {
        if let Some(rendered) = node(dialect, binder, child, conjunction)? {
            terms.push(rendered);
        }
    }

    match terms.len() {
        0 => Ok(None),
        1 => Ok(terms.pop()),
        count => {
            let keyword = dialect.conjunction_keyword(conjunction)?;
            let sql = terms
                .into_iter()
                .map(|r| r.sql)
                .collect::<Vec<_>>()
                .join(&format!(" {} ", keyword));
            Ok(Some(Rendered { sql, terms: count }))
        }
    }
}

/// Render a node nested in a group joined by `parent`.
fn node(
    dialect: &dyn SqlDialect,
    binder: &mut dyn Binder,
    cond: &Condition,
    parent: Conjunction,
) -> CompileResult<Option<Rendered>> {
    let sql = match cond {
        Condition::Equals { column, value } => {
            let rhs = operand(dialect, binder, value)?;
            format!("{} = {}", dialect.quote_column(column), rhs)
        }
        Condition::Raw(raw) => raw.as_str().to_string(),
        Condition::Sub(sub) => subquery(dialect, binder, sub)?,
        Condition::Group {
            conjunction,
            children,
        } => {
            let Some(rendered) = group_terms(dialect, binder, *conjunction, children)? else {
                return Ok(None);
            };
            if rendered.terms > 1 && parent.needs_parens_around(*conjunction) {
                format!("({})", rendered.sql)
            } else {
                return Ok(Some(rendered));
            }
        }
        Condition::Leaf {
            op,
            column,
            operands,
        } => leaf(dialect, binder, op, column, operands)?,
    };
    Ok(Some(Rendered { sql, terms: 1 }))
}

fn leaf(
    dialect: &dyn SqlDialect,
    binder: &mut dyn Binder,
    op: &str,
    column: &str,
    operands: &[Operand],
) -> CompileResult<String> {
    let operator = Operator::parse(op)?;
    let col = dialect.quote_column(column);

    if operator.is_list() {
        return list_leaf(dialect, binder, op, operator, &col, operands);
    }

    if operator.is_range() {
        let [low, high] = operands else {
            return Err(CompileError::invalid_operator(
                op,
                format!("expects 2 operands, got {}", operands.len()),
            ));
        };
        let low = operand(dialect, binder, low)?;
        let high = operand(dialect, binder, high)?;
        return Ok(format!("({} {} {} AND {})", col, operator, low, high));
    }

    let [rhs] = operands else {
        return Err(CompileError::invalid_operator(
            op,
            format!("expects 1 operand, got {}", operands.len()),
        ));
    };

    let rhs = if operator == Operator::Is {
        is_operand(dialect, binder, rhs)?
    } else {
        operand(dialect, binder, rhs)?
    };
    Ok(format!("({} {} {})", col, operator, rhs))
}

/// `IN` / `NOT IN`. Plain value lists go to the binder as one batch.
fn list_leaf(
    dialect: &dyn SqlDialect,
    binder: &mut dyn Binder,
    op: &str,
    operator: Operator,
    col: &str,
    operands: &[Operand],
) -> CompileResult<String> {
    if operands.is_empty() {
        return Err(CompileError::invalid_operator(op, "expects at least 1 operand"));
    }

    let list = match operands {
        [Operand::Sub(sub)] => sub.statement().compile(dialect, binder)?,
        _ => {
            let values: Option<Vec<Value>> = operands
                .iter()
                .map(|o| o.as_value().cloned())
                .collect();
            let placeholders = match values {
                Some(values) => binder.bind_batch(values),
                None => {
                    let mut parts = Vec::with_capacity(operands.len());
                    for o in operands {
                        parts.push(operand(dialect, binder, o)?);
                    }
                    parts
                }
            };
            placeholders.join(", ")
        }
    };

    Ok(format!("({} {} ({}))", col, operator, list))
}

/// Right side of `IS`, never bound.
fn is_operand(
    dialect: &dyn SqlDialect,
    binder: &mut dyn Binder,
    rhs: &Operand,
) -> CompileResult<String> {
    match rhs {
        Operand::Value(Value::Float(f)) => float_text(*f),
        Operand::Value(value) => Ok(value.to_text().unwrap_or_default()),
        other => operand(dialect, binder, other),
    }
}

fn float_text(f: f64) -> CompileResult<String> {
    format_float(f).ok_or_else(|| CompileError::NonFiniteFloat(f.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::condition::{between, cmp, eq, is_in, is_null, Condition};
    use crate::sql::dialect::{MySql, Postgres};
    use crate::sql::params::{NamedBinder, Params, PositionalBinder};
    use crate::sql::raw::raw;
    use indexmap::IndexMap;

    fn positional() -> PositionalBinder {
        PositionalBinder::new()
    }

    fn where_sql(cond: Condition) -> String {
        let mut binder = positional();
        condition(&MySql, &mut binder, &cond).unwrap().unwrap()
    }

    #[test]
    fn test_select_list() {
        let mut b = positional();
        assert_eq!(select_list(&MySql, &mut b, &Columns::all()).unwrap(), "*");

        let mut map = IndexMap::new();
        map.insert("total", raw("COUNT(*)"));
        let cols = Columns::from(map);
        assert_eq!(
            select_list(&MySql, &mut b, &cols).unwrap(),
            "COUNT(*) AS `total`"
        );
    }

    #[test]
    fn test_table_list_requires_entries() {
        let mut b = positional();
        let err = table_list(&MySql, &mut b, &TableRef::default()).unwrap_err();
        assert!(matches!(err, CompileError::EmptyFragment { .. }));
        assert_eq!(
            table_list(&Postgres, &mut b, &TableRef::from("public.users")).unwrap(),
            "\"public\".\"users\""
        );
    }

    #[test]
    fn test_leaf_forms() {
        assert_eq!(where_sql(cmp(">", "age", 18)), "(`age` > ?)");
        assert_eq!(where_sql(eq("active", 1)), "`active` = ?");
        assert_eq!(where_sql(between("age", 1, 9)), "(`age` BETWEEN ? AND ?)");
        assert_eq!(where_sql(is_in("id", [1, 2])), "(`id` IN (?, ?))");
        assert_eq!(where_sql(is_null("deleted_at")), "(`deleted_at` IS NULL)");
    }

    #[test]
    fn test_is_operand_not_bound() {
        let mut binder = positional();
        condition(&MySql, &mut binder, &is_null("x")).unwrap();
        assert!(binder.is_empty());
    }

    #[test]
    fn test_arity_errors() {
        let mut b = positional();
        let empty_in = Condition::leaf("IN", "id", Vec::<i32>::new());
        assert!(matches!(
            condition(&MySql, &mut b, &empty_in),
            Err(CompileError::InvalidOperator { .. })
        ));
        let short_between = Condition::leaf("BETWEEN", "id", [1]);
        assert!(matches!(
            condition(&MySql, &mut b, &short_between),
            Err(CompileError::InvalidOperator { .. })
        ));
        assert!(matches!(
            condition(&MySql, &mut b, &cmp("SOUNDS LIKE", "name", "x")),
            Err(CompileError::InvalidOperator { .. })
        ));
    }

    #[test]
    fn test_named_in_list() {
        let mut binder = NamedBinder::new();
        let sql = condition(&MySql, &mut binder, &is_in("id", [7, 8])).unwrap().unwrap();
        assert_eq!(sql, "(`id` IN (:p1, :p2))");
        let params = Box::new(binder).finish();
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_insert_padding() {
        let mut binder = positional();
        let values = InsertValues::columns([
            ("a", vec![Operand::from(1), Operand::from(2), Operand::from(3)]),
            ("b", vec![Operand::from("x")]),
        ]);
        let sql = insert_values(&MySql, &mut binder, &values).unwrap();
        assert_eq!(sql, "(`a`, `b`) VALUES (?, ?), (?, ?), (?, ?)");
        assert_eq!(
            Box::new(binder).finish(),
            Params::Positional(vec![
                Value::Int(1),
                Value::from("x"),
                Value::Int(2),
                Value::from("x"),
                Value::Int(3),
                Value::from("x"),
            ])
        );
    }

    #[test]
    fn test_insert_raw_and_empty() {
        let mut b = positional();
        assert_eq!(
            insert_values(&MySql, &mut b, &InsertValues::from(raw("1, 'a'"))).unwrap(),
            "VALUES (1, 'a')"
        );
        assert_eq!(
            insert_values(&MySql, &mut b, &InsertValues::empty()).unwrap(),
            "() VALUES ()"
        );
        assert_eq!(
            insert_values(&Postgres, &mut b, &InsertValues::empty()).unwrap(),
            "DEFAULT VALUES"
        );
    }

    #[test]
    fn test_assignments_mixed() {
        let mut b = positional();
        let sql = assignments(
            &MySql,
            &mut b,
            &[
                Assignment::set("name", "Ann"),
                Assignment::raw("visits = visits + 1"),
                Assignment::set("updated_at", raw("NOW()")),
            ],
        )
        .unwrap();
        assert_eq!(sql, "`name` = ?, visits = visits + 1, `updated_at` = NOW()");
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_order_list() {
        let orders = [Ordering::desc("created_at"), Ordering::from("id")];
        assert_eq!(order_list(&MySql, &orders), "`created_at` DESC, `id`");
    }

    #[test]
    fn test_single_child_group_keeps_inner_terms() {
        let nested = Condition::any([Condition::any([Condition::raw("a"), Condition::raw("b")])]);
        let fragments = [
            ConditionFragment {
                condition: Condition::raw("x"),
                conjunction: Conjunction::And,
            },
            ConditionFragment {
                condition: nested,
                conjunction: Conjunction::And,
            },
        ];
        let mut b = positional();
        assert_eq!(
            condition_fragments(&MySql, &mut b, &fragments).unwrap().unwrap(),
            "x AND (a OR b)"
        );
    }
}
