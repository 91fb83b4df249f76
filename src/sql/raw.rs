//! Literal SQL that bypasses quoting and parameter binding.

use std::fmt;

/// A literal SQL fragment.
///
/// Normalizers embed a `Raw` verbatim wherever they meet one: no identifier
/// quoting, no value escaping, no placeholder.
///
/// # Security Warning
///
/// **Never wrap user input in a `Raw`.** Use [`Value`](super::value::Value)
/// operands for anything that did not come from the program itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Raw(String);

impl Raw {
    pub fn new(sql: impl Into<String>) -> Self {
        Raw(sql.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Raw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shorthand for [`Raw::new`].
pub fn raw(sql: impl Into<String>) -> Raw {
    Raw::new(sql)
}
