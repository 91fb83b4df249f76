//! Boolean condition trees for WHERE, HAVING and ON clauses.
//!
//! A [`Condition`] is built from leaves (`column <op> operand`), implicit
//! equalities, raw fragments and subqueries, combined into groups joined by a
//! [`Conjunction`]. Operators are kept as text and resolved when the statement
//! is compiled, so an unknown operator surfaces as
//! [`CompileError::InvalidOperator`] from `build()`.
//!
//! # Example
//!
//! ```ignore
//! use sqlweave::condition::{cmp, eq, is_in, Condition};
//!
//! let cond = Condition::all([
//!     cmp(">", "age", 18),
//!     Condition::any([eq("role", "admin"), is_in("team", [1, 2, 3])]),
//! ]);
//! ```

use std::fmt;
use std::str::FromStr;

use super::error::{CompileError, CompileResult};
use super::raw::Raw;
use super::statement::Subquery;
use super::value::Value;

// ============================================================================
// Conjunctions
// ============================================================================

/// Keyword joining the terms of a condition group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Conjunction {
    #[default]
    And,
    Or,
    Xor,
    /// `&&`
    AndAlias,
    /// `||`
    OrAlias,
}

impl Conjunction {
    /// Groups that bind at least as tightly as AND.
    pub fn is_and_like(self) -> bool {
        matches!(self, Conjunction::And | Conjunction::Xor | Conjunction::AndAlias)
    }

    pub fn is_or_like(self) -> bool {
        matches!(self, Conjunction::Or | Conjunction::OrAlias)
    }

    /// Whether a child group joined by `child` must be parenthesized inside a
    /// group joined by `self`.
    pub fn needs_parens_around(self, child: Conjunction) -> bool {
        self.is_and_like() && child.is_or_like()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
            Conjunction::Xor => "XOR",
            Conjunction::AndAlias => "&&",
            Conjunction::OrAlias => "||",
        }
    }
}

impl FromStr for Conjunction {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(Conjunction::And),
            "OR" => Ok(Conjunction::Or),
            "XOR" => Ok(Conjunction::Xor),
            "&&" => Ok(Conjunction::AndAlias),
            "||" => Ok(Conjunction::OrAlias),
            _ => Err(CompileError::InvalidConjunction(s.to_string())),
        }
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Operators
// ============================================================================

/// Comparison operator of a condition leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Lt,
    Gt,
    Le,
    Ge,
    /// `<>`
    Ne,
    /// `!=`
    NotEq,
    Like,
    NotLike,
    In,
    NotIn,
    Between,
    NotBetween,
    Is,
}

impl Operator {
    /// Resolve an operator keyword (case and inner whitespace insensitive).
    pub fn parse(op: &str) -> CompileResult<Self> {
        let normalized = op
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();

        Ok(match normalized.as_str() {
            "=" => Operator::Eq,
            "<" => Operator::Lt,
            ">" => Operator::Gt,
            "<=" => Operator::Le,
            ">=" => Operator::Ge,
            "<>" => Operator::Ne,
            "!=" => Operator::NotEq,
            "LIKE" => Operator::Like,
            "NOT LIKE" => Operator::NotLike,
            "IN" => Operator::In,
            "NOT IN" => Operator::NotIn,
            "BETWEEN" => Operator::Between,
            "NOT BETWEEN" => Operator::NotBetween,
            "IS" => Operator::Is,
            _ => return Err(CompileError::invalid_operator(op, "unknown operator")),
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Ge => ">=",
            Operator::Ne => "<>",
            Operator::NotEq => "!=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Between => "BETWEEN",
            Operator::NotBetween => "NOT BETWEEN",
            Operator::Is => "IS",
        }
    }

    pub fn is_list(self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }

    pub fn is_range(self) -> bool {
        matches!(self, Operator::Between | Operator::NotBetween)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Operands
// ============================================================================

/// Right-hand side of a comparison, an insert cell or an assignment value.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Bound as a parameter.
    Value(Value),
    /// Embedded verbatim.
    Raw(Raw),
    /// Quoted as a column name (`t.id = u.team_id`).
    Column(String),
    /// Compiled inline and parenthesized.
    Sub(Subquery),
}

impl Operand {
    /// Column reference operand.
    pub fn column(name: impl Into<String>) -> Self {
        Operand::Column(name.into())
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Operand::Value(v) => Some(v),
            _ => None,
        }
    }
}

macro_rules! operand_from_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Operand {
                fn from(v: $t) -> Self {
                    Operand::Value(Value::from(v))
                }
            }
        )*
    };
}

operand_from_value!(bool, i8, i16, i32, i64, u8, u16, u32, f32, f64, String);

impl From<&str> for Operand {
    fn from(s: &str) -> Self {
        Operand::Value(Value::from(s))
    }
}

impl<T: Into<Value>> From<Option<T>> for Operand {
    fn from(opt: Option<T>) -> Self {
        Operand::Value(Value::from(opt))
    }
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Value(v)
    }
}

impl From<Raw> for Operand {
    fn from(raw: Raw) -> Self {
        Operand::Raw(raw)
    }
}

impl From<Subquery> for Operand {
    fn from(sub: Subquery) -> Self {
        Operand::Sub(sub)
    }
}

// ============================================================================
// Conditions
// ============================================================================

/// A node of a boolean condition tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `column <op> operands`; the operator is resolved at compile time.
    Leaf {
        op: String,
        column: String,
        operands: Vec<Operand>,
    },
    /// `column = value`, rendered without parentheses.
    Equals { column: String, value: Operand },
    Raw(Raw),
    /// A nested statement, parenthesized.
    Sub(Subquery),
    Group {
        conjunction: Conjunction,
        children: Vec<Condition>,
    },
}

impl Condition {
    /// Group joined by AND.
    pub fn all(children: impl IntoIterator<Item = Condition>) -> Self {
        Self::group(Conjunction::And, children)
    }

    /// Group joined by OR.
    pub fn any(children: impl IntoIterator<Item = Condition>) -> Self {
        Self::group(Conjunction::Or, children)
    }

    /// Group joined by XOR.
    pub fn xor(children: impl IntoIterator<Item = Condition>) -> Self {
        Self::group(Conjunction::Xor, children)
    }

    pub fn group(conjunction: Conjunction, children: impl IntoIterator<Item = Condition>) -> Self {
        Condition::Group {
            conjunction,
            children: children.into_iter().collect(),
        }
    }

    /// Leaf with an explicit operand list.
    pub fn leaf(
        op: impl Into<String>,
        column: impl Into<String>,
        operands: impl IntoIterator<Item = impl Into<Operand>>,
    ) -> Self {
        Condition::Leaf {
            op: op.into(),
            column: column.into(),
            operands: operands.into_iter().map(Into::into).collect(),
        }
    }

    pub fn raw(sql: impl Into<String>) -> Self {
        Condition::Raw(Raw::new(sql))
    }

    /// True for a group with no children, which renders nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Condition::Group { children, .. } => children.iter().all(Condition::is_empty),
            _ => false,
        }
    }
}

impl From<Raw> for Condition {
    fn from(raw: Raw) -> Self {
        Condition::Raw(raw)
    }
}

impl From<Subquery> for Condition {
    fn from(sub: Subquery) -> Self {
        Condition::Sub(sub)
    }
}

impl From<Vec<Condition>> for Condition {
    fn from(children: Vec<Condition>) -> Self {
        Condition::all(children)
    }
}

/// `column <op> operand`
pub fn cmp(op: impl Into<String>, column: impl Into<String>, operand: impl Into<Operand>) -> Condition {
    Condition::Leaf {
        op: op.into(),
        column: column.into(),
        operands: vec![operand.into()],
    }
}

/// Implicit equality: `column = value`.
pub fn eq(column: impl Into<String>, value: impl Into<Operand>) -> Condition {
    Condition::Equals {
        column: column.into(),
        value: value.into(),
    }
}

/// `column LIKE pattern`; the pattern is bound as given.
pub fn like(column: impl Into<String>, pattern: impl Into<Operand>) -> Condition {
    cmp("LIKE", column, pattern)
}

/// `column IN (values)`
pub fn is_in(
    column: impl Into<String>,
    values: impl IntoIterator<Item = impl Into<Operand>>,
) -> Condition {
    Condition::leaf("IN", column, values)
}

/// `column NOT IN (values)`
pub fn not_in(
    column: impl Into<String>,
    values: impl IntoIterator<Item = impl Into<Operand>>,
) -> Condition {
    Condition::leaf("NOT IN", column, values)
}

/// `column BETWEEN low AND high`
pub fn between(
    column: impl Into<String>,
    low: impl Into<Operand>,
    high: impl Into<Operand>,
) -> Condition {
    Condition::Leaf {
        op: "BETWEEN".into(),
        column: column.into(),
        operands: vec![low.into(), high.into()],
    }
}

/// `column NOT BETWEEN low AND high`
pub fn not_between(
    column: impl Into<String>,
    low: impl Into<Operand>,
    high: impl Into<Operand>,
) -> Condition {
    Condition::Leaf {
        op: "NOT BETWEEN".into(),
        column: column.into(),
        operands: vec![low.into(), high.into()],
    }
}

/// `column IS <rhs>`; the right side is rendered verbatim, never bound.
pub fn is(column: impl Into<String>, rhs: impl Into<Operand>) -> Condition {
    cmp("IS", column, rhs)
}

pub fn is_null(column: impl Into<String>) -> Condition {
    is(column, Value::Null)
}

pub fn is_not_null(column: impl Into<String>) -> Condition {
    is(column, Raw::new("NOT NULL"))
}
