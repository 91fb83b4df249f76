//! Parameter accumulation.
//!
//! A [`Binder`] turns a value into the placeholder token spliced into the SQL
//! text and records the value. The strategy is picked once per builder
//! ([`ParamMode`]) and a fresh binder is created for every compile, so a
//! single statement never mixes modes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::value::Value;

/// Placeholder strategy for a builder instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamMode {
    /// `?` placeholders, values in order.
    #[default]
    Positional,
    /// Generated `:p1`, `:p2`, … placeholders, values keyed by name.
    Named,
}

impl ParamMode {
    /// Create a fresh binder for one compile pass.
    pub fn binder(self, named_prefix: char) -> Box<dyn Binder> {
        match self {
            ParamMode::Positional => Box::new(PositionalBinder::new()),
            ParamMode::Named => Box::new(NamedBinder::with_prefix(named_prefix)),
        }
    }
}

/// Parameters produced by one compile pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Params {
    Positional(Vec<Value>),
    Named(IndexMap<String, Value>),
}

impl Params {
    pub fn len(&self) -> usize {
        match self {
            Params::Positional(values) => values.len(),
            Params::Named(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn mode(&self) -> ParamMode {
        match self {
            Params::Positional(_) => ParamMode::Positional,
            Params::Named(_) => ParamMode::Named,
        }
    }

    /// Positional values, if this set was built in positional mode.
    pub fn as_positional(&self) -> Option<&[Value]> {
        match self {
            Params::Positional(values) => Some(values),
            Params::Named(_) => None,
        }
    }

    /// Named values, if this set was built in named mode.
    pub fn as_named(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Params::Named(values) => Some(values),
            Params::Positional(_) => None,
        }
    }
}

impl Default for Params {
    fn default() -> Self {
        Params::Positional(Vec::new())
    }
}

/// Records bound values and hands back placeholder tokens.
pub trait Binder {
    /// Bind one value, returning the placeholder to splice into the SQL.
    fn bind(&mut self, value: Value) -> String;

    /// Bind a list of values (the operand of `IN`).
    fn bind_batch(&mut self, values: Vec<Value>) -> Vec<String> {
        values.into_iter().map(|v| self.bind(v)).collect()
    }

    /// Number of values bound so far.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consume the binder and return the accumulated parameters.
    fn finish(self: Box<Self>) -> Params;
}

/// `?` placeholders over an ordered list.
#[derive(Debug, Default)]
pub struct PositionalBinder {
    values: Vec<Value>,
}

impl PositionalBinder {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }
}

impl Binder for PositionalBinder {
    fn bind(&mut self, value: Value) -> String {
        self.values.push(value);
        "?".into()
    }

    fn bind_batch(&mut self, values: Vec<Value>) -> Vec<String> {
        let count = values.len();
        self.values.extend(values);
        vec!["?".to_string(); count]
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn finish(self: Box<Self>) -> Params {
        Params::Positional(self.values)
    }
}

/// Generated names `p1, p2, …` with a placeholder prefix (`:` by default).
#[derive(Debug)]
pub struct NamedBinder {
    prefix: char,
    values: IndexMap<String, Value>,
}

impl NamedBinder {
    pub fn new() -> Self {
        Self::with_prefix(':')
    }

    pub fn with_prefix(prefix: char) -> Self {
        Self {
            prefix,
            values: IndexMap::new(),
        }
    }
}

impl Default for NamedBinder {
    fn default() -> Self {
        Self::new()
    }
}

impl Binder for NamedBinder {
    fn bind(&mut self, value: Value) -> String {
        let name = format!("p{}", self.values.len() + 1);
        let placeholder = format!("{}{}", self.prefix, name);
        self.values.insert(name, value);
        placeholder
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn finish(self: Box<Self>) -> Params {
        Params::Named(self.values)
    }
}
