//! SQL statement compilation.
//!
//! - [`builder`] - fluent statement stack and the `build()` terminal
//! - [`statement`] - statement records and per-kind clause assembly
//! - [`fragment`] / [`condition`] - tagged fragment types and condition trees
//! - [`normalize`] - fragment to SQL text conversion
//! - [`params`] - positional and named parameter binders
//! - [`dialect`] - SQL dialect implementations and the engine registry
//! - [`ddl`] - schema change statements
//! - [`token`] - token types for SQL generation

pub mod builder;
pub mod condition;
pub mod ddl;
pub mod dialect;
pub mod error;
pub mod fragment;
pub mod normalize;
pub mod params;
pub mod raw;
pub mod statement;
pub mod token;
pub mod types;
pub mod value;

#[cfg(test)]
pub mod test_utils;

pub use builder::{Compiled, StatementBuilder};
pub use condition::{Condition, Conjunction, Operand, Operator};
pub use dialect::{EscapeFormat, SqlDialect};
pub use error::{CompileError, CompileResult};
pub use fragment::{
    alias, Assignment, Columns, InsertValues, Item, JoinType, Ordering, Selectable, SortDir,
    StatementOptions, TableRef,
};
pub use params::{Binder, ParamMode, Params};
pub use raw::{raw, Raw};
pub use statement::{Statement, StatementKind, Subquery};
pub use token::{Token, TokenStream};
pub use types::DataType as SqlDataType;
pub use value::Value;
