//! Statement fragments.
//!
//! Each clause of a statement has its own tagged type; the `From`
//! conversions let callers pass plain strings, arrays, `Vec`s and `IndexMap`s.

use std::str::FromStr;

use indexmap::IndexMap;

use super::condition::{Condition, Operand};
use super::error::CompileError;
use super::raw::Raw;
use super::statement::Subquery;

// ============================================================================
// Select and table lists
// ============================================================================

/// A column, table or expression reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// Quoted name, possibly dotted (`u.name`, `public.users`, `u.*`).
    Name(String),
    Raw(Raw),
    Sub(Subquery),
}

impl From<&str> for Item {
    fn from(s: &str) -> Self {
        Item::Name(s.to_string())
    }
}

impl From<String> for Item {
    fn from(s: String) -> Self {
        Item::Name(s)
    }
}

impl From<Raw> for Item {
    fn from(raw: Raw) -> Self {
        Item::Raw(raw)
    }
}

impl From<Subquery> for Item {
    fn from(sub: Subquery) -> Self {
        Item::Sub(sub)
    }
}

/// One entry of a select or table list.
#[derive(Debug, Clone, PartialEq)]
pub enum Selectable {
    Expr(Item),
    /// `<expr> AS <alias>`
    Aliased(Item, String),
}

impl Selectable {
    pub fn aliased(item: impl Into<Item>, alias: impl Into<String>) -> Self {
        Selectable::Aliased(item.into(), alias.into())
    }
}

macro_rules! selectable_from_item {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Selectable {
                fn from(item: $t) -> Self {
                    Selectable::Expr(Item::from(item))
                }
            }
        )*
    };
}

selectable_from_item!(String, Raw, Subquery);

impl From<&str> for Selectable {
    fn from(s: &str) -> Self {
        Selectable::Expr(Item::from(s))
    }
}

impl From<Item> for Selectable {
    fn from(item: Item) -> Self {
        Selectable::Expr(item)
    }
}

/// Shorthand for [`Selectable::aliased`].
pub fn alias(item: impl Into<Item>, alias: impl Into<String>) -> Selectable {
    Selectable::aliased(item, alias)
}

macro_rules! selectable_list {
    ($name:ident) => {
        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(vec![Selectable::from(s)])
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(vec![Selectable::from(s)])
            }
        }

        impl From<Raw> for $name {
            fn from(raw: Raw) -> Self {
                $name(vec![Selectable::from(raw)])
            }
        }

        impl From<Subquery> for $name {
            fn from(sub: Subquery) -> Self {
                $name(vec![Selectable::from(sub)])
            }
        }

        impl From<Selectable> for $name {
            fn from(s: Selectable) -> Self {
                $name(vec![s])
            }
        }

        impl<T: Into<Selectable>, const N: usize> From<[T; N]> for $name {
            fn from(items: [T; N]) -> Self {
                $name(items.into_iter().map(Into::into).collect())
            }
        }

        impl<T: Into<Selectable>> From<Vec<T>> for $name {
            fn from(items: Vec<T>) -> Self {
                $name(items.into_iter().map(Into::into).collect())
            }
        }

        /// Alias → expression, in insertion order.
        impl<K: Into<String>, V: Into<Item>> From<IndexMap<K, V>> for $name {
            fn from(items: IndexMap<K, V>) -> Self {
                $name(
                    items
                        .into_iter()
                        .map(|(alias, item)| Selectable::Aliased(item.into(), alias.into()))
                        .collect(),
                )
            }
        }

        impl $name {
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn items(&self) -> &[Selectable] {
                &self.0
            }
        }
    };
}

/// Select list; empty renders `*`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Columns(pub Vec<Selectable>);

impl Columns {
    /// `*`
    pub fn all() -> Self {
        Columns(Vec::new())
    }
}

selectable_list!(Columns);

/// Table list (FROM / UPDATE / DELETE / JOIN target); must not be empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRef(pub Vec<Selectable>);

selectable_list!(TableRef);

// ============================================================================
// Insert values
// ============================================================================

/// Body of an INSERT.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertValues {
    /// `VALUES (<raw>)`
    Raw(Raw),
    /// One row; an empty map inserts a row of defaults.
    Row(IndexMap<String, Operand>),
    /// Column → values, one row per index. Short lists repeat their last value.
    Columns(IndexMap<String, Vec<Operand>>),
    /// `(<columns>) SELECT …`
    Select { columns: Vec<String>, query: Subquery },
}

impl InsertValues {
    pub fn row<K, V>(cells: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Operand>,
    {
        InsertValues::Row(
            cells
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn columns<K, I, V>(columns: impl IntoIterator<Item = (K, I)>) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<Operand>,
    {
        InsertValues::Columns(
            columns
                .into_iter()
                .map(|(k, values)| (k.into(), values.into_iter().map(Into::into).collect()))
                .collect(),
        )
    }

    pub fn select(columns: impl IntoIterator<Item = impl Into<String>>, query: Subquery) -> Self {
        InsertValues::Select {
            columns: columns.into_iter().map(Into::into).collect(),
            query,
        }
    }

    /// Row of defaults.
    pub fn empty() -> Self {
        InsertValues::Row(IndexMap::new())
    }
}

impl From<Raw> for InsertValues {
    fn from(raw: Raw) -> Self {
        InsertValues::Raw(raw)
    }
}

impl From<IndexMap<String, Operand>> for InsertValues {
    fn from(row: IndexMap<String, Operand>) -> Self {
        InsertValues::Row(row)
    }
}

impl From<IndexMap<String, Vec<Operand>>> for InsertValues {
    fn from(columns: IndexMap<String, Vec<Operand>>) -> Self {
        InsertValues::Columns(columns)
    }
}

// ============================================================================
// Update assignments
// ============================================================================

/// One entry of an UPDATE SET list.
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    /// `<column> = <value>`
    Set { column: String, value: Operand },
    /// Verbatim (`counter = counter + 1`).
    Raw(Raw),
}

impl Assignment {
    pub fn set(column: impl Into<String>, value: impl Into<Operand>) -> Self {
        Assignment::Set {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn raw(sql: impl Into<String>) -> Self {
        Assignment::Raw(Raw::new(sql))
    }
}

impl<K: Into<String>, V: Into<Operand>> From<(K, V)> for Assignment {
    fn from((column, value): (K, V)) -> Self {
        Assignment::set(column, value)
    }
}

impl From<Raw> for Assignment {
    fn from(raw: Raw) -> Self {
        Assignment::Raw(raw)
    }
}

// ============================================================================
// Ordering
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

/// One ORDER BY entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Ordering {
    Column { name: String, dir: Option<SortDir> },
    Raw(Raw),
}

impl Ordering {
    pub fn asc(name: impl Into<String>) -> Self {
        Ordering::Column {
            name: name.into(),
            dir: Some(SortDir::Asc),
        }
    }

    pub fn desc(name: impl Into<String>) -> Self {
        Ordering::Column {
            name: name.into(),
            dir: Some(SortDir::Desc),
        }
    }
}

impl From<&str> for Ordering {
    fn from(name: &str) -> Self {
        Ordering::Column {
            name: name.to_string(),
            dir: None,
        }
    }
}

impl From<String> for Ordering {
    fn from(name: String) -> Self {
        Ordering::Column { name, dir: None }
    }
}

impl<S: Into<String>> From<(S, SortDir)> for Ordering {
    fn from((name, dir): (S, SortDir)) -> Self {
        Ordering::Column {
            name: name.into(),
            dir: Some(dir),
        }
    }
}

impl From<Raw> for Ordering {
    fn from(raw: Raw) -> Self {
        Ordering::Raw(raw)
    }
}

// ============================================================================
// Joins
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl FromStr for JoinType {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_lowercase();
        match normalized.as_str() {
            "inner" => Ok(JoinType::Inner),
            "left" | "left outer" => Ok(JoinType::Left),
            "right" | "right outer" => Ok(JoinType::Right),
            "full" | "full outer" => Ok(JoinType::Full),
            "cross" => Ok(JoinType::Cross),
            _ => Err(CompileError::InvalidJoinType(s.to_string())),
        }
    }
}

/// `<type> JOIN <table> [ON <condition>]`
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub join_type: JoinType,
    pub table: TableRef,
    pub on: Option<Condition>,
}

// ============================================================================
// Limit and options
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    pub count: u64,
    pub offset: Option<u64>,
}

/// Modifiers placed right after the statement verb.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementOptions {
    /// `SELECT DISTINCT`; only valid on selects.
    pub distinct: bool,
    /// Verbatim keywords (`IGNORE`, `SQL_NO_CACHE`, `LOW_PRIORITY`).
    pub modifiers: Vec<String>,
}

impl StatementOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn modifier(mut self, keyword: impl Into<String>) -> Self {
        self.modifiers.push(keyword.into());
        self
    }
}
