//! DDL (Data Definition Language) support.
//!
//! The types here describe schema changes; the SQL text comes from the
//! dialect's DDL templates ([`SqlDialect::create_table`], [`SqlDialect::rename_column`], …).
//! The free functions at the bottom are the ANSI renderings that the
//! trait's default methods delegate to.
//!
//! # Examples
//!
//! ```ignore
//! use sqlweave::ddl::{ColumnDef, CreateTable, DdlStatement};
//! use sqlweave::dialect::MySql;
//! use sqlweave::types::DataType;
//!
//! let table = CreateTable::new("users")
//!     .column(ColumnDef::new("id", DataType::Int64).not_null().auto_increment().primary_key())
//!     .column(ColumnDef::new("email", DataType::Varchar(255)).not_null().unique());
//!
//! println!("{}", DdlStatement::CreateTable(table).to_sql(&MySql)?);
//! ```

use super::dialect::SqlDialect;
use super::error::{CompileError, CompileResult};
use super::raw::Raw;
use super::token::{Token, TokenStream};
use super::value::Value;
use super::dialect::EscapeFormat;

pub use super::types::DataType;

/// A schema change, rendered through the dialect's DDL templates.
#[derive(Debug, Clone)]
pub enum DdlStatement {
    CreateTable(CreateTable),
    RenameTable { from: String, to: String },
    DropTable { name: String, if_exists: bool },
    AddColumn { table: String, column: ColumnDef },
    RenameColumn { table: String, from: String, to: String },
    ChangeColumn { table: String, column: ColumnDef },
    DropColumn { table: String, column: String },
    AddForeignKey { table: String, foreign_key: ForeignKey },
    DropForeignKey { table: String, name: String },
    CreateIndex(IndexDef),
    DropIndex { table: String, name: String },
}

impl DdlStatement {
    /// Convert to SQL for the given dialect.
    pub fn to_sql(&self, dialect: &dyn SqlDialect) -> CompileResult<String> {
        match self {
            DdlStatement::CreateTable(table) => dialect.create_table(table),
            DdlStatement::RenameTable { from, to } => dialect.rename_table(from, to),
            DdlStatement::DropTable { name, if_exists } => dialect.drop_table(name, *if_exists),
            DdlStatement::AddColumn { table, column } => dialect.add_column(table, column),
            DdlStatement::RenameColumn { table, from, to } => {
                dialect.rename_column(table, from, to)
            }
            DdlStatement::ChangeColumn { table, column } => dialect.change_column(table, column),
            DdlStatement::DropColumn { table, column } => dialect.drop_column(table, column),
            DdlStatement::AddForeignKey { table, foreign_key } => {
                dialect.add_foreign_key(table, foreign_key)
            }
            DdlStatement::DropForeignKey { table, name } => dialect.drop_foreign_key(table, name),
            DdlStatement::CreateIndex(index) => dialect.create_index(index),
            DdlStatement::DropIndex { table, name } => dialect.drop_index(table, name),
        }
    }
}

// ============================================================================
// CREATE TABLE
// ============================================================================

/// CREATE TABLE description.
#[derive(Debug, Clone)]
#[must_use = "DDL statements have no effect until converted to SQL"]
pub struct CreateTable {
    pub name: String,
    pub if_not_exists: bool,
    pub columns: Vec<ColumnDef>,
    /// Composite primary key; single-column keys can use [`ColumnDef::primary_key`].
    pub primary_key: Vec<String>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl CreateTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            if_not_exists: false,
            columns: Vec::new(),
            primary_key: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    pub fn column(mut self, col: ColumnDef) -> Self {
        self.columns.push(col);
        self
    }

    pub fn primary_key(mut self, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.primary_key = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }
}

// ============================================================================
// Column Definition
// ============================================================================

/// Column definition for CREATE TABLE, ADD COLUMN and CHANGE COLUMN.
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
    pub nullable: Option<bool>,
    pub default: Option<ColumnDefault>,
    pub auto_increment: bool,
    pub primary_key: bool,
    pub unique: bool,
}

/// DEFAULT clause of a column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnDefault {
    /// Rendered with [`EscapeFormat::Quoted`].
    Value(Value),
    /// Rendered verbatim (`CURRENT_TIMESTAMP`).
    Raw(Raw),
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: None,
            default: None,
            auto_increment: false,
            primary_key: false,
            unique: false,
        }
    }

    /// Mark column as NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.nullable = Some(false);
        self
    }

    /// Mark column as NULL (explicitly nullable).
    pub fn null(mut self) -> Self {
        self.nullable = Some(true);
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(ColumnDefault::Value(value.into()));
        self
    }

    pub fn default_raw(mut self, raw: Raw) -> Self {
        self.default = Some(ColumnDefault::Raw(raw));
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

// ============================================================================
// Foreign Keys
// ============================================================================

/// Named FOREIGN KEY constraint.
#[derive(Debug, Clone)]
pub struct ForeignKey {
    pub name: String,
    pub columns: Vec<String>,
    pub references_table: String,
    pub references_columns: Vec<String>,
    pub on_delete: Option<ReferentialAction>,
    pub on_update: Option<ReferentialAction>,
}

impl ForeignKey {
    pub fn new(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = impl Into<String>>,
        references_table: impl Into<String>,
        references_columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            references_table: references_table.into(),
            references_columns: references_columns.into_iter().map(Into::into).collect(),
            on_delete: None,
            on_update: None,
        }
    }

    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = Some(action);
        self
    }

    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        self.on_update = Some(action);
        self
    }
}

/// Referential action for foreign key constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferentialAction {
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl ReferentialAction {
    fn token(self) -> Token {
        match self {
            ReferentialAction::NoAction => Token::NoAction,
            ReferentialAction::Restrict => Token::Restrict,
            ReferentialAction::Cascade => Token::Cascade,
            ReferentialAction::SetNull => Token::SetNull,
            ReferentialAction::SetDefault => Token::SetDefault,
        }
    }
}

// ============================================================================
// Indexes
// ============================================================================

/// CREATE INDEX description.
#[derive(Debug, Clone)]
pub struct IndexDef {
    pub name: String,
    pub table: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

impl IndexDef {
    pub fn new(
        name: impl Into<String>,
        table: impl Into<String>,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            unique: false,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

// ============================================================================
// ANSI renderings used by the SqlDialect defaults
// ============================================================================

/// `name TYPE [NULL | NOT NULL] [DEFAULT x] [identity] [PRIMARY KEY] [UNIQUE]`
pub fn column_definition<D: SqlDialect + ?Sized>(
    dialect: &D,
    col: &ColumnDef,
) -> CompileResult<String> {
    let mut ts = TokenStream::new();

    ts.push(Token::Ident(col.name.clone()))
        .space()
        .raw(dialect.emit_data_type(&col.data_type));

    match col.nullable {
        Some(true) => {
            ts.space().push(Token::Null);
        }
        Some(false) => {
            ts.space().push(Token::Not).space().push(Token::Null);
        }
        None => {}
    }

    if let Some(ref default) = col.default {
        ts.space().push(Token::Default).space();
        match default {
            ColumnDefault::Value(value) => {
                ts.raw(dialect.quote_value(value, EscapeFormat::Quoted)?);
            }
            ColumnDefault::Raw(raw) => {
                ts.raw(raw.as_str());
            }
        }
    }

    let identity_after_key = dialect.identity_after_primary_key();
    if col.auto_increment && !identity_after_key {
        ts.space().raw(dialect.emit_identity());
    }

    if col.primary_key {
        ts.space().push(Token::Primary).space().push(Token::Key);
    }

    if col.auto_increment && identity_after_key {
        if !col.primary_key {
            return Err(CompileError::unsupported(
                dialect.name(),
                "auto-increment on a non primary key column",
            ));
        }
        ts.space().raw(dialect.emit_identity());
    }

    if col.unique {
        ts.space().push(Token::Unique);
    }

    Ok(ts.serialize(dialect))
}

/// `CONSTRAINT name FOREIGN KEY (cols) REFERENCES table (cols) [ON DELETE ..] [ON UPDATE ..]`
pub fn foreign_key_clause<D: SqlDialect + ?Sized>(dialect: &D, fk: &ForeignKey) -> String {
    let mut ts = TokenStream::new();

    ts.push(Token::Constraint)
        .space()
        .push(Token::Ident(fk.name.clone()))
        .space()
        .push(Token::Foreign)
        .space()
        .push(Token::Key)
        .space()
        .column_list(&fk.columns)
        .space()
        .push(Token::References)
        .space()
        .push(Token::TableName(fk.references_table.clone()))
        .space()
        .column_list(&fk.references_columns);

    if let Some(action) = fk.on_delete {
        ts.space()
            .push(Token::On)
            .space()
            .push(Token::Delete)
            .space()
            .push(action.token());
    }
    if let Some(action) = fk.on_update {
        ts.space()
            .push(Token::On)
            .space()
            .push(Token::Update)
            .space()
            .push(action.token());
    }

    ts.serialize(dialect)
}

pub fn create_table<D: SqlDialect + ?Sized>(
    dialect: &D,
    table: &CreateTable,
) -> CompileResult<String> {
    if table.columns.is_empty() {
        return Err(CompileError::EmptyFragment {
            fragment: format!("columns of table {}", table.name),
        });
    }

    let mut ts = TokenStream::new();
    ts.push(Token::Create).space().push(Token::Table);

    if table.if_not_exists {
        ts.space()
            .push(Token::If)
            .space()
            .push(Token::Not)
            .space()
            .push(Token::Exists);
    }

    ts.space()
        .push(Token::TableName(table.name.clone()))
        .space()
        .lparen();

    for (i, col) in table.columns.iter().enumerate() {
        if i > 0 {
            ts.comma().space();
        }
        ts.raw(dialect.column_definition(col)?);
    }

    if !table.primary_key.is_empty() {
        ts.comma()
            .space()
            .push(Token::Primary)
            .space()
            .push(Token::Key)
            .space()
            .column_list(&table.primary_key);
    }

    for fk in &table.foreign_keys {
        ts.comma().space().raw(foreign_key_clause(dialect, fk));
    }

    ts.rparen();

    Ok(ts.serialize(dialect))
}

/// `ALTER TABLE t <action>`
pub fn alter_table<D: SqlDialect + ?Sized>(dialect: &D, table: &str, action: &str) -> String {
    let mut ts = TokenStream::new();
    ts.push(Token::Alter)
        .space()
        .push(Token::Table)
        .space()
        .push(Token::TableName(table.to_string()))
        .space()
        .raw(action);
    ts.serialize(dialect)
}

pub fn rename_table<D: SqlDialect + ?Sized>(dialect: &D, from: &str, to: &str) -> String {
    let mut ts = TokenStream::new();
    ts.push(Token::Rename)
        .space()
        .push(Token::To)
        .space()
        .push(Token::TableName(to.to_string()));
    alter_table(dialect, from, &ts.serialize(dialect))
}

pub fn drop_table<D: SqlDialect + ?Sized>(dialect: &D, name: &str, if_exists: bool) -> String {
    let mut ts = TokenStream::new();
    ts.push(Token::Drop).space().push(Token::Table).space();
    if if_exists {
        ts.push(Token::If).space().push(Token::Exists).space();
    }
    ts.push(Token::TableName(name.to_string()));
    ts.serialize(dialect)
}

pub fn add_column<D: SqlDialect + ?Sized>(
    dialect: &D,
    table: &str,
    col: &ColumnDef,
) -> CompileResult<String> {
    let action = format!("ADD COLUMN {}", dialect.column_definition(col)?);
    Ok(alter_table(dialect, table, &action))
}

pub fn rename_column<D: SqlDialect + ?Sized>(
    dialect: &D,
    table: &str,
    from: &str,
    to: &str,
) -> String {
    let mut ts = TokenStream::new();
    ts.push(Token::Rename)
        .space()
        .push(Token::Column)
        .space()
        .push(Token::Ident(from.to_string()))
        .space()
        .push(Token::To)
        .space()
        .push(Token::Ident(to.to_string()));
    alter_table(dialect, table, &ts.serialize(dialect))
}

/// `ALTER TABLE t ALTER COLUMN c TYPE x[, ALTER COLUMN c SET NOT NULL][, ALTER COLUMN c SET DEFAULT v]`
pub fn alter_column<D: SqlDialect + ?Sized>(
    dialect: &D,
    table: &str,
    col: &ColumnDef,
) -> CompileResult<String> {
    let column = Token::Ident(col.name.clone());
    let alter = |ts: &mut TokenStream| {
        ts.push(Token::Alter)
            .space()
            .push(Token::Column)
            .space()
            .push(column.clone())
            .space();
    };

    let mut ts = TokenStream::new();
    alter(&mut ts);
    ts.raw("TYPE ").raw(dialect.emit_data_type(&col.data_type));

    match col.nullable {
        Some(false) => {
            ts.comma().space();
            alter(&mut ts);
            ts.push(Token::Set).space().push(Token::Not).space().push(Token::Null);
        }
        Some(true) => {
            ts.comma().space();
            alter(&mut ts);
            ts.push(Token::Drop).space().push(Token::Not).space().push(Token::Null);
        }
        None => {}
    }

    if let Some(ref default) = col.default {
        ts.comma().space();
        alter(&mut ts);
        ts.push(Token::SetDefault).space();
        match default {
            ColumnDefault::Value(value) => {
                ts.raw(dialect.quote_value(value, EscapeFormat::Quoted)?);
            }
            ColumnDefault::Raw(raw) => {
                ts.raw(raw.as_str());
            }
        }
    }

    Ok(alter_table(dialect, table, &ts.serialize(dialect)))
}

pub fn drop_column<D: SqlDialect + ?Sized>(dialect: &D, table: &str, column: &str) -> String {
    let mut ts = TokenStream::new();
    ts.push(Token::Drop)
        .space()
        .push(Token::Column)
        .space()
        .push(Token::Ident(column.to_string()));
    alter_table(dialect, table, &ts.serialize(dialect))
}

pub fn add_foreign_key<D: SqlDialect + ?Sized>(dialect: &D, table: &str, fk: &ForeignKey) -> String {
    let action = format!("ADD {}", foreign_key_clause(dialect, fk));
    alter_table(dialect, table, &action)
}

pub fn drop_constraint<D: SqlDialect + ?Sized>(dialect: &D, table: &str, name: &str) -> String {
    let mut ts = TokenStream::new();
    ts.push(Token::Drop)
        .space()
        .push(Token::Constraint)
        .space()
        .push(Token::Ident(name.to_string()));
    alter_table(dialect, table, &ts.serialize(dialect))
}

pub fn create_index<D: SqlDialect + ?Sized>(dialect: &D, index: &IndexDef) -> CompileResult<String> {
    if index.columns.is_empty() {
        return Err(CompileError::EmptyFragment {
            fragment: format!("columns of index {}", index.name),
        });
    }

    let mut ts = TokenStream::new();
    ts.push(Token::Create).space();
    if index.unique {
        ts.push(Token::Unique).space();
    }
    ts.push(Token::Index)
        .space()
        .push(Token::Ident(index.name.clone()))
        .space()
        .push(Token::On)
        .space()
        .push(Token::TableName(index.table.clone()))
        .space()
        .column_list(&index.columns);

    Ok(ts.serialize(dialect))
}

/// `DROP INDEX name` (index names are schema-global)
pub fn drop_index<D: SqlDialect + ?Sized>(dialect: &D, name: &str) -> String {
    let mut ts = TokenStream::new();
    ts.push(Token::Drop)
        .space()
        .push(Token::Index)
        .space()
        .push(Token::Ident(name.to_string()));
    ts.serialize(dialect)
}

/// `DROP INDEX name ON table` (index names are per table)
pub fn drop_index_on<D: SqlDialect + ?Sized>(dialect: &D, table: &str, name: &str) -> String {
    let mut ts = TokenStream::new();
    ts.push(Token::Drop)
        .space()
        .push(Token::Index)
        .space()
        .push(Token::Ident(name.to_string()))
        .space()
        .push(Token::On)
        .space()
        .push(Token::TableName(table.to_string()));
    ts.serialize(dialect)
}
