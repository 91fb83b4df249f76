//! # sqlweave
//!
//! A SQL statement compiler that turns nested query descriptions into
//! dialect-correct, parameterized SQL.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │         StatementBuilder (stack of statements)           │
//! │   select / insert / update / delete / raw + fragments    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [build]
//! ┌─────────────────────────────────────────────────────────┐
//! │      Statement assembly + expression normalizers         │
//! │   (select lists, insert rows, SET lists, conditions)     │
//! └─────────────────────────────────────────────────────────┘
//!              │                              │
//!              ▼                              ▼
//! ┌──────────────────────────┐  ┌──────────────────────────┐
//! │  SqlDialect              │  │  Binder                  │
//! │  quoting, LIMIT, types,  │  │  ? or :pN placeholders   │
//! │  metadata, DDL           │  │                          │
//! └──────────────────────────┘  └──────────────────────────┘
//!                          │
//!                          ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │                Compiled { sql, params }                  │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod sql;

// Re-export SQL submodules at crate level
pub use sql::builder;
pub use sql::condition;
pub use sql::ddl;
pub use sql::dialect;
pub use sql::fragment;
pub use sql::params;
pub use sql::token;
pub use sql::types;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::condition::{
        between, cmp, eq, is, is_in, is_not_null, is_null, like, not_between, not_in, Condition,
        Conjunction, Operand,
    };
    pub use crate::dialect::{MySql, Postgres, SqlDialect, Sqlite, TSql};
    pub use crate::fragment::{
        alias, Assignment, Columns, InsertValues, JoinType, Ordering, SortDir, StatementOptions,
        TableRef,
    };
    pub use crate::params::{ParamMode, Params};
    pub use crate::sql::raw::raw;
    pub use crate::sql::value::Value;
    pub use crate::builder::{Compiled, StatementBuilder};
}

// Also export at crate root for convenience
pub use builder::{Compiled, StatementBuilder};
pub use config::CompilerSettings;
pub use sql::error::{CompileError, CompileResult};
pub use sql::params::{ParamMode, Params};
pub use sql::raw::{raw, Raw};
pub use sql::value::Value;
