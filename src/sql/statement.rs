//! Statement records and per-kind assembly.
//!
//! A [`Statement`] collects fragments while it sits on the builder's stack.
//! Compiling it walks the clauses in output order, so the binder sees values
//! in the same order as their placeholders.

use super::condition::{Condition, Conjunction};
use super::dialect::SqlDialect;
use super::error::{CompileError, CompileResult};
use super::fragment::{
    Assignment, Columns, InsertValues, Item, Join, JoinType, Limit, Ordering, StatementOptions,
    TableRef,
};
use super::normalize;
use super::params::Binder;
use super::token::{Token, TokenStream};

/// Statement kind, used in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Raw,
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Raw => "raw",
            StatementKind::Select => "select",
            StatementKind::Insert => "insert",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
        }
    }
}

/// Kind-specific part of a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Raw(String),
    Select {
        table: TableRef,
        columns: Columns,
        options: StatementOptions,
    },
    Insert {
        table: String,
        values: InsertValues,
        options: StatementOptions,
    },
    Update {
        table: TableRef,
        assignments: Vec<Assignment>,
        options: StatementOptions,
    },
    Delete {
        table: TableRef,
        options: StatementOptions,
    },
}

/// One `where`/`having` call: the condition and the conjunction joining it to
/// the previous fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionFragment {
    pub condition: Condition,
    pub conjunction: Conjunction,
}

/// Clause-level fragments a setter can add.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    Join,
    Where,
    Group,
    Having,
    Order,
    Limit,
}

impl Fragment {
    pub fn as_str(self) -> &'static str {
        match self {
            Fragment::Join => "join",
            Fragment::Where => "where",
            Fragment::Group => "group",
            Fragment::Having => "having",
            Fragment::Order => "order",
            Fragment::Limit => "limit",
        }
    }
}

/// A statement under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub body: Body,
    pub joins: Vec<Join>,
    pub wheres: Vec<ConditionFragment>,
    pub groups: Vec<Item>,
    pub havings: Vec<ConditionFragment>,
    pub orders: Vec<Ordering>,
    pub limit: Option<Limit>,
}

impl Statement {
    pub fn new(body: Body) -> Self {
        Self {
            body,
            joins: Vec::new(),
            wheres: Vec::new(),
            groups: Vec::new(),
            havings: Vec::new(),
            orders: Vec::new(),
            limit: None,
        }
    }

    pub fn kind(&self) -> StatementKind {
        match self.body {
            Body::Raw(_) => StatementKind::Raw,
            Body::Select { .. } => StatementKind::Select,
            Body::Insert { .. } => StatementKind::Insert,
            Body::Update { .. } => StatementKind::Update,
            Body::Delete { .. } => StatementKind::Delete,
        }
    }

    /// Check that `fragment` may be added to this statement under `dialect`.
    pub fn allow(&self, fragment: Fragment, dialect: &dyn SqlDialect) -> CompileResult<()> {
        let kind = self.kind();
        let not_allowed = || CompileError::FragmentNotAllowed {
            fragment: fragment.as_str(),
            kind: kind.as_str(),
        };

        match (kind, fragment) {
            (StatementKind::Select, _) => Ok(()),
            (StatementKind::Raw, _) | (StatementKind::Insert, _) => Err(not_allowed()),
            (StatementKind::Update | StatementKind::Delete, Fragment::Where) => Ok(()),
            (StatementKind::Update, Fragment::Join) => {
                if dialect.supports_update_join() {
                    Ok(())
                } else {
                    Err(CompileError::unsupported(dialect.name(), "UPDATE with JOIN"))
                }
            }
            (
                StatementKind::Update | StatementKind::Delete,
                Fragment::Order | Fragment::Limit,
            ) => {
                if dialect.supports_dml_order_limit() {
                    Ok(())
                } else {
                    Err(CompileError::unsupported(
                        dialect.name(),
                        "ORDER BY or LIMIT on UPDATE/DELETE",
                    ))
                }
            }
            (StatementKind::Update | StatementKind::Delete, _) => Err(not_allowed()),
        }
    }

    pub(crate) fn set_limit(&mut self, limit: Limit) -> CompileResult<()> {
        if self.limit.is_some() {
            return Err(CompileError::DuplicateFragment { fragment: "limit" });
        }
        self.limit = Some(limit);
        Ok(())
    }

    /// Compile to SQL, binding values into `binder`.
    pub fn compile(&self, dialect: &dyn SqlDialect, binder: &mut dyn Binder) -> CompileResult<String> {
        let ts = match &self.body {
            Body::Raw(sql) => return Ok(sql.clone()),
            Body::Select {
                table,
                columns,
                options,
            } => self.select_tokens(dialect, binder, table, columns, options)?,
            Body::Insert {
                table,
                values,
                options,
            } => self.insert_tokens(dialect, binder, table, values, options)?,
            Body::Update {
                table,
                assignments,
                options,
            } => self.update_tokens(dialect, binder, table, assignments, options)?,
            Body::Delete { table, options } => self.delete_tokens(dialect, binder, table, options)?,
        };
        Ok(ts.serialize(dialect))
    }

    fn select_tokens(
        &self,
        dialect: &dyn SqlDialect,
        binder: &mut dyn Binder,
        table: &TableRef,
        columns: &Columns,
        options: &StatementOptions,
    ) -> CompileResult<TokenStream> {
        let mut ts = TokenStream::new();

        ts.push(Token::Select);
        if options.distinct {
            ts.space().push(Token::Distinct);
        }
        modifiers(&mut ts, options);

        ts.space().raw(normalize::select_list(dialect, binder, columns)?);
        ts.space()
            .push(Token::From)
            .space()
            .raw(normalize::table_list(dialect, binder, table)?);

        self.join_tokens(&mut ts, dialect, binder)?;
        clause(&mut ts, Token::Where, normalize::condition_fragments(dialect, binder, &self.wheres)?);

        if !self.groups.is_empty() {
            ts.space()
                .push(Token::GroupBy)
                .space()
                .raw(normalize::item_list(dialect, binder, &self.groups)?);
        }

        clause(&mut ts, Token::Having, normalize::condition_fragments(dialect, binder, &self.havings)?);

        self.order_limit_tokens(&mut ts, dialect);
        Ok(ts)
    }

    fn insert_tokens(
        &self,
        dialect: &dyn SqlDialect,
        binder: &mut dyn Binder,
        table: &str,
        values: &InsertValues,
        options: &StatementOptions,
    ) -> CompileResult<TokenStream> {
        reject_distinct(options, StatementKind::Insert)?;

        let mut ts = TokenStream::new();
        ts.push(Token::Insert);
        modifiers(&mut ts, options);
        ts.space()
            .push(Token::Into)
            .space()
            .push(Token::TableName(table.to_string()))
            .space()
            .raw(normalize::insert_values(dialect, binder, values)?);
        Ok(ts)
    }

    fn update_tokens(
        &self,
        dialect: &dyn SqlDialect,
        binder: &mut dyn Binder,
        table: &TableRef,
        assignments: &[Assignment],
        options: &StatementOptions,
    ) -> CompileResult<TokenStream> {
        reject_distinct(options, StatementKind::Update)?;

        let mut ts = TokenStream::new();
        ts.push(Token::Update);
        modifiers(&mut ts, options);
        ts.space().raw(normalize::table_list(dialect, binder, table)?);

        self.join_tokens(&mut ts, dialect, binder)?;

        ts.space()
            .push(Token::Set)
            .space()
            .raw(normalize::assignments(dialect, binder, assignments)?);

        clause(&mut ts, Token::Where, normalize::condition_fragments(dialect, binder, &self.wheres)?);
        self.order_limit_tokens(&mut ts, dialect);
        Ok(ts)
    }

    fn delete_tokens(
        &self,
        dialect: &dyn SqlDialect,
        binder: &mut dyn Binder,
        table: &TableRef,
        options: &StatementOptions,
    ) -> CompileResult<TokenStream> {
        reject_distinct(options, StatementKind::Delete)?;

        let mut ts = TokenStream::new();
        ts.push(Token::Delete);
        modifiers(&mut ts, options);
        ts.space()
            .push(Token::From)
            .space()
            .raw(normalize::table_list(dialect, binder, table)?);

        clause(&mut ts, Token::Where, normalize::condition_fragments(dialect, binder, &self.wheres)?);
        self.order_limit_tokens(&mut ts, dialect);
        Ok(ts)
    }

    fn join_tokens(
        &self,
        ts: &mut TokenStream,
        dialect: &dyn SqlDialect,
        binder: &mut dyn Binder,
    ) -> CompileResult<()> {
        for join in &self.joins {
            ts.space();
            match join.join_type {
                JoinType::Inner => ts.push(Token::Inner),
                JoinType::Left => ts.push(Token::Left),
                JoinType::Right => ts.push(Token::Right),
                JoinType::Full => ts.push(Token::Full).space().push(Token::Outer),
                JoinType::Cross => ts.push(Token::Cross),
            };
            ts.space()
                .push(Token::Join)
                .space()
                .raw(normalize::table_list(dialect, binder, &join.table)?);

            if let Some(on) = &join.on {
                clause(ts, Token::On, normalize::condition(dialect, binder, on)?);
            }
        }
        Ok(())
    }

    fn order_limit_tokens(&self, ts: &mut TokenStream, dialect: &dyn SqlDialect) {
        // T-SQL needs an ORDER BY before OFFSET ... FETCH
        let needs_order_by_placeholder =
            dialect.requires_order_by_for_offset() && self.orders.is_empty() && self.limit.is_some();

        if !self.orders.is_empty() {
            ts.space()
                .push(Token::OrderBy)
                .space()
                .raw(normalize::order_list(dialect, &self.orders));
        } else if needs_order_by_placeholder {
            ts.space()
                .push(Token::OrderBy)
                .space()
                .lparen()
                .push(Token::Select)
                .space()
                .push(Token::Null)
                .rparen();
        }

        if let Some(limit) = &self.limit {
            ts.space()
                .append(&dialect.emit_limit_offset(Some(limit.count), limit.offset));
        }
    }
}

/// ` <keyword> <body>` when the body rendered anything.
fn clause(ts: &mut TokenStream, keyword: Token, body: Option<String>) {
    if let Some(body) = body {
        ts.space().push(keyword).space().raw(body);
    }
}

fn modifiers(ts: &mut TokenStream, options: &StatementOptions) {
    for modifier in &options.modifiers {
        ts.space().raw(modifier.as_str());
    }
}

fn reject_distinct(options: &StatementOptions, kind: StatementKind) -> CompileResult<()> {
    if options.distinct {
        return Err(CompileError::FragmentNotAllowed {
            fragment: "distinct",
            kind: kind.as_str(),
        });
    }
    Ok(())
}

/// A statement popped off the builder without being compiled.
///
/// It compiles inline wherever it is used, with the enclosing statement's
/// binder, so its parameters land in text order.
#[derive(Debug, Clone, PartialEq)]
pub struct Subquery(Box<Statement>);

impl Subquery {
    pub fn new(statement: Statement) -> Self {
        Subquery(Box::new(statement))
    }

    pub fn statement(&self) -> &Statement {
        &self.0
    }

    pub fn into_statement(self) -> Statement {
        *self.0
    }
}
