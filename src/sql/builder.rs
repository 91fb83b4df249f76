//! Fluent statement builder.
//!
//! A [`StatementBuilder`] keeps a stack of statements under construction.
//! Starting a statement pushes it; fragment setters mutate the top of the
//! stack; [`StatementBuilder::build`] and [`StatementBuilder::subquery`] pop
//! it. Earlier statements stay queued until the ones above them are popped.
//!
//! # Example
//!
//! ```
//! use sqlweave::condition::{cmp, Condition};
//! use sqlweave::dialect::MySql;
//! use sqlweave::params::ParamMode;
//! use sqlweave::StatementBuilder;
//! use std::sync::Arc;
//!
//! let mut builder = StatementBuilder::new(Arc::new(MySql), ParamMode::Positional);
//! builder
//!     .select("users", ["id", "name"])
//!     .where_(Condition::all([cmp(">", "age", 18), cmp("=", "active", 1)]))?
//!     .limit(10, None)?;
//!
//! let compiled = builder.build()?;
//! assert_eq!(
//!     compiled.sql,
//!     "SELECT `id`, `name` FROM `users` WHERE (`age` > ?) AND (`active` = ?) LIMIT 10"
//! );
//! assert_eq!(compiled.params.len(), 2);
//! # Ok::<(), sqlweave::CompileError>(())
//! ```

use std::sync::Arc;

use crate::config::{CompilerSettings, SettingsError};

use super::condition::{Condition, Conjunction};
use super::dialect::{self, SqlDialect};
use super::error::{CompileError, CompileResult};
use super::fragment::{
    Assignment, Columns, InsertValues, Item, Join, JoinType, Limit, Ordering, StatementOptions,
    TableRef,
};
use super::params::{ParamMode, Params};
use super::statement::{Body, ConditionFragment, Fragment, Statement, Subquery};

/// SQL text and the parameters bound while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    pub sql: String,
    pub params: Params,
}

/// Stack of statements under construction, bound to one dialect and one
/// placeholder mode.
#[derive(Debug)]
pub struct StatementBuilder {
    dialect: Arc<dyn SqlDialect>,
    mode: ParamMode,
    named_prefix: char,
    stack: Vec<Statement>,
}

impl StatementBuilder {
    pub fn new(dialect: Arc<dyn SqlDialect>, mode: ParamMode) -> Self {
        Self {
            dialect,
            mode,
            named_prefix: ':',
            stack: Vec::new(),
        }
    }

    /// Builder for a registered engine name (`mysql`, `pgsql`, `sqlite`, `sqlsrv`, ...).
    pub fn for_engine(name: &str, mode: ParamMode) -> CompileResult<Self> {
        Ok(Self::new(dialect::for_name(name)?, mode))
    }

    /// Builder configured from a settings file section.
    pub fn from_settings(settings: &CompilerSettings) -> CompileResult<Self> {
        let name = settings
            .resolved_dialect()
            .map_err(|e| match e {
                SettingsError::MissingEnvVar(var) => CompileError::MissingEnvVar(var),
                _ => CompileError::UnsupportedEngine(settings.dialect.clone()),
            })?;
        Ok(Self::for_engine(&name, settings.param_mode)?.with_named_prefix(settings.named_prefix))
    }

    /// Prefix used for generated named placeholders.
    pub fn with_named_prefix(mut self, prefix: char) -> Self {
        self.named_prefix = prefix;
        self
    }

    pub fn dialect(&self) -> &dyn SqlDialect {
        self.dialect.as_ref()
    }

    pub fn mode(&self) -> ParamMode {
        self.mode
    }

    /// Number of statements waiting to be built.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_idle(&self) -> bool {
        self.stack.is_empty()
    }

    // ========================================================================
    // Statement starts
    // ========================================================================

    /// Start an opaque statement. Structured setters on it fail.
    pub fn start_raw(&mut self, sql: impl Into<String>) -> &mut Self {
        self.push(Statement::new(Body::Raw(sql.into())))
    }

    pub fn select(&mut self, table: impl Into<TableRef>, columns: impl Into<Columns>) -> &mut Self {
        self.select_with(table, columns, StatementOptions::default())
    }

    pub fn select_with(
        &mut self,
        table: impl Into<TableRef>,
        columns: impl Into<Columns>,
        options: StatementOptions,
    ) -> &mut Self {
        self.push(Statement::new(Body::Select {
            table: table.into(),
            columns: columns.into(),
            options,
        }))
    }

    pub fn insert(&mut self, table: impl Into<String>, values: impl Into<InsertValues>) -> &mut Self {
        self.insert_with(table, values, StatementOptions::default())
    }

    pub fn insert_with(
        &mut self,
        table: impl Into<String>,
        values: impl Into<InsertValues>,
        options: StatementOptions,
    ) -> &mut Self {
        self.push(Statement::new(Body::Insert {
            table: table.into(),
            values: values.into(),
            options,
        }))
    }

    pub fn update(
        &mut self,
        table: impl Into<TableRef>,
        assignments: impl IntoIterator<Item = impl Into<Assignment>>,
    ) -> &mut Self {
        self.update_with(table, assignments, StatementOptions::default())
    }

    pub fn update_with(
        &mut self,
        table: impl Into<TableRef>,
        assignments: impl IntoIterator<Item = impl Into<Assignment>>,
        options: StatementOptions,
    ) -> &mut Self {
        self.push(Statement::new(Body::Update {
            table: table.into(),
            assignments: assignments.into_iter().map(Into::into).collect(),
            options,
        }))
    }

    pub fn delete(&mut self, table: impl Into<TableRef>) -> &mut Self {
        self.delete_with(table, StatementOptions::default())
    }

    pub fn delete_with(&mut self, table: impl Into<TableRef>, options: StatementOptions) -> &mut Self {
        self.push(Statement::new(Body::Delete {
            table: table.into(),
            options,
        }))
    }

    fn push(&mut self, statement: Statement) -> &mut Self {
        tracing::trace!(
            kind = statement.kind().as_str(),
            depth = self.stack.len() + 1,
            "start statement"
        );
        self.stack.push(statement);
        self
    }

    // ========================================================================
    // Fragment setters
    // ========================================================================

    /// `INNER JOIN <table> [ON <on>]`
    pub fn join(
        &mut self,
        table: impl Into<TableRef>,
        on: impl Into<Option<Condition>>,
    ) -> CompileResult<&mut Self> {
        self.join_as(JoinType::Inner, table, on)
    }

    pub fn join_as(
        &mut self,
        join_type: JoinType,
        table: impl Into<TableRef>,
        on: impl Into<Option<Condition>>,
    ) -> CompileResult<&mut Self> {
        let join = Join {
            join_type,
            table: table.into(),
            on: on.into(),
        };
        self.with_current(Fragment::Join, |stmt| {
            stmt.joins.push(join);
            Ok(())
        })
    }

    /// Add a WHERE fragment joined to the previous one by AND.
    pub fn where_(&mut self, condition: impl Into<Option<Condition>>) -> CompileResult<&mut Self> {
        self.where_with(condition, Conjunction::And)
    }

    pub fn where_with(
        &mut self,
        condition: impl Into<Option<Condition>>,
        conjunction: Conjunction,
    ) -> CompileResult<&mut Self> {
        let Some(condition) = condition.into() else {
            return self.require_statement();
        };
        self.with_current(Fragment::Where, |stmt| {
            stmt.wheres.push(ConditionFragment {
                condition,
                conjunction,
            });
            Ok(())
        })
    }

    pub fn group(
        &mut self,
        items: impl IntoIterator<Item = impl Into<Item>>,
    ) -> CompileResult<&mut Self> {
        let items: Vec<Item> = items.into_iter().map(Into::into).collect();
        if items.is_empty() {
            return self.require_statement();
        }
        self.with_current(Fragment::Group, |stmt| {
            stmt.groups.extend(items);
            Ok(())
        })
    }

    /// Add a HAVING fragment joined to the previous one by AND.
    pub fn having(&mut self, condition: impl Into<Option<Condition>>) -> CompileResult<&mut Self> {
        self.having_with(condition, Conjunction::And)
    }

    pub fn having_with(
        &mut self,
        condition: impl Into<Option<Condition>>,
        conjunction: Conjunction,
    ) -> CompileResult<&mut Self> {
        let Some(condition) = condition.into() else {
            return self.require_statement();
        };
        self.with_current(Fragment::Having, |stmt| {
            stmt.havings.push(ConditionFragment {
                condition,
                conjunction,
            });
            Ok(())
        })
    }

    pub fn order(
        &mut self,
        items: impl IntoIterator<Item = impl Into<Ordering>>,
    ) -> CompileResult<&mut Self> {
        let items: Vec<Ordering> = items.into_iter().map(Into::into).collect();
        if items.is_empty() {
            return self.require_statement();
        }
        self.with_current(Fragment::Order, |stmt| {
            stmt.orders.extend(items);
            Ok(())
        })
    }

    /// Set the row limit. A statement takes at most one.
    pub fn limit(&mut self, count: u64, offset: Option<u64>) -> CompileResult<&mut Self> {
        self.with_current(Fragment::Limit, |stmt| stmt.set_limit(Limit { count, offset }))
    }

    /// Like [`limit`](Self::limit); a missing count is a no-op.
    pub fn limit_opt(&mut self, count: Option<u64>, offset: Option<u64>) -> CompileResult<&mut Self> {
        match count {
            Some(count) => self.limit(count, offset),
            None => self.require_statement(),
        }
    }

    fn require_statement(&mut self) -> CompileResult<&mut Self> {
        if self.stack.is_empty() {
            return Err(CompileError::NoStatement);
        }
        Ok(self)
    }

    fn with_current<F>(&mut self, fragment: Fragment, f: F) -> CompileResult<&mut Self>
    where
        F: FnOnce(&mut Statement) -> CompileResult<()>,
    {
        let stmt = self.stack.last_mut().ok_or(CompileError::NoStatement)?;
        stmt.allow(fragment, self.dialect.as_ref())?;
        f(stmt)?;
        Ok(self)
    }

    // ========================================================================
    // Terminals
    // ========================================================================

    /// Pop the statement in progress without compiling it.
    pub fn subquery(&mut self) -> CompileResult<Subquery> {
        self.stack
            .pop()
            .map(Subquery::new)
            .ok_or(CompileError::NoStatement)
    }

    /// Pop and compile the statement in progress.
    ///
    /// The statement is consumed even when compiling it fails.
    pub fn build(&mut self) -> CompileResult<Compiled> {
        let mut params = Params::default();
        let sql = self.build_into(&mut params)?;
        Ok(Compiled { sql, params })
    }

    /// Pop and compile the statement in progress, writing its parameters to
    /// `params`.
    pub fn build_into(&mut self, params: &mut Params) -> CompileResult<String> {
        let statement = self.stack.pop().ok_or(CompileError::NoStatement)?;

        let mut binder = self.mode.binder(self.named_prefix);
        let sql = statement.compile(self.dialect.as_ref(), binder.as_mut())?;
        *params = binder.finish();

        tracing::debug!(
            kind = statement.kind().as_str(),
            dialect = self.dialect.name(),
            params = params.len(),
            "compiled statement"
        );
        Ok(sql)
    }
}
