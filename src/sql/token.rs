//! SQL Tokens - the atomic units of SQL output.
//!
//! Tokens are dialect-agnostic representations that serialize
//! to dialect-specific strings.

use super::dialect::SqlDialect;

/// SQL Token - every element the assemblers and DDL templates emit.
///
/// Adding a new variant here will cause compile errors everywhere
/// it needs to be handled (exhaustive matching).
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Keywords ===
    Select,
    Distinct,
    From,
    Where,
    Having,
    GroupBy,
    OrderBy,
    On,
    Join,
    Inner,
    Left,
    Right,
    Full,
    Outer,
    Cross,
    Limit,
    Offset,
    Fetch,
    Next,
    Rows,
    Only,
    Not,
    Null,

    // === DML Keywords ===
    Insert,
    Into,
    Update,
    Set,
    Delete,

    // === DDL Keywords ===
    Create,
    Alter,
    Drop,
    Table,
    Column,
    Index,
    Constraint,
    Primary,
    Key,
    Foreign,
    References,
    Unique,
    Default,
    Cascade,
    Restrict,
    NoAction,
    SetNull,
    SetDefault,
    If,
    Exists,
    Rename,
    To,

    // === Punctuation ===
    Comma,
    LParen,
    RParen,

    // === Whitespace ===
    Space,

    // === Dynamic Content ===
    /// Single identifier quoted as-is (alias, constraint or index name).
    Ident(String),
    /// Table name, possibly schema-qualified (`schema.table`).
    TableName(String),
    /// Column name, possibly table-qualified (`table.column`, `table.*`).
    ColumnName(String),
    /// Unsigned integer literal (row counts and offsets).
    LitInt(u64),

    // === Escape Hatch ===
    /// Text passed directly to output without escaping.
    ///
    /// Normalizer output (already quoted fragments and placeholders) travels
    /// through this variant. **Never pass user input to it.**
    Raw(String),
}

impl Token {
    /// Serialize this token to a string for the given dialect.
    pub fn serialize<D: SqlDialect + ?Sized>(&self, dialect: &D) -> String {
        match self {
            // Keywords
            Token::Select => "SELECT".into(),
            Token::Distinct => "DISTINCT".into(),
            Token::From => "FROM".into(),
            Token::Where => "WHERE".into(),
            Token::Having => "HAVING".into(),
            Token::GroupBy => "GROUP BY".into(),
            Token::OrderBy => "ORDER BY".into(),
            Token::On => "ON".into(),
            Token::Join => "JOIN".into(),
            Token::Inner => "INNER".into(),
            Token::Left => "LEFT".into(),
            Token::Right => "RIGHT".into(),
            Token::Full => "FULL".into(),
            Token::Outer => "OUTER".into(),
            Token::Cross => "CROSS".into(),
            Token::Limit => "LIMIT".into(),
            Token::Offset => "OFFSET".into(),
            Token::Fetch => "FETCH".into(),
            Token::Next => "NEXT".into(),
            Token::Rows => "ROWS".into(),
            Token::Only => "ONLY".into(),
            Token::Not => "NOT".into(),
            Token::Null => "NULL".into(),

            // DML keywords
            Token::Insert => "INSERT".into(),
            Token::Into => "INTO".into(),
            Token::Update => "UPDATE".into(),
            Token::Set => "SET".into(),
            Token::Delete => "DELETE".into(),

            // DDL keywords
            Token::Create => "CREATE".into(),
            Token::Alter => "ALTER".into(),
            Token::Drop => "DROP".into(),
            Token::Table => "TABLE".into(),
            Token::Column => "COLUMN".into(),
            Token::Index => "INDEX".into(),
            Token::Constraint => "CONSTRAINT".into(),
            Token::Primary => "PRIMARY".into(),
            Token::Key => "KEY".into(),
            Token::Foreign => "FOREIGN".into(),
            Token::References => "REFERENCES".into(),
            Token::Unique => "UNIQUE".into(),
            Token::Default => "DEFAULT".into(),
            Token::Cascade => "CASCADE".into(),
            Token::Restrict => "RESTRICT".into(),
            Token::NoAction => "NO ACTION".into(),
            Token::SetNull => "SET NULL".into(),
            Token::SetDefault => "SET DEFAULT".into(),
            Token::If => "IF".into(),
            Token::Exists => "EXISTS".into(),
            Token::Rename => "RENAME".into(),
            Token::To => "TO".into(),

            // Punctuation
            Token::Comma => ",".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),

            Token::Space => " ".into(),

            // Dynamic - dialect-specific formatting
            Token::Ident(name) => dialect.quote_identifier(name),
            Token::TableName(name) => dialect.quote_table(name),
            Token::ColumnName(name) => dialect.quote_column(name),
            Token::LitInt(n) => n.to_string(),

            // Escape hatch
            Token::Raw(s) => s.clone(),
        }
    }
}

/// A stream of tokens that can be serialized to SQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Create an empty token stream.
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    /// Push a single token.
    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    /// Append another token stream.
    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens.iter().cloned());
        self
    }

    /// Push a pre-rendered fragment.
    pub fn raw(&mut self, sql: impl Into<String>) -> &mut Self {
        self.push(Token::Raw(sql.into()))
    }

    /// Push `(a, b, c)` with each name rendered as a column.
    pub fn column_list<S: AsRef<str>>(&mut self, columns: &[S]) -> &mut Self {
        self.lparen();
        for (i, col) in columns.iter().enumerate() {
            if i > 0 {
                self.comma().space();
            }
            self.push(Token::ColumnName(col.as_ref().to_string()));
        }
        self.rparen()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Serialize all tokens to a SQL string.
    pub fn serialize<D: SqlDialect + ?Sized>(&self, dialect: &D) -> String {
        self.tokens.iter().map(|t| t.serialize(dialect)).collect()
    }

    // Convenience methods for common tokens
    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }
    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }
    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }
    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::dialect::{MySql, Postgres, TSql};

    #[test]
    fn test_keyword_serialize() {
        assert_eq!(Token::Select.serialize(&MySql), "SELECT");
        assert_eq!(Token::GroupBy.serialize(&TSql), "GROUP BY");
    }

    #[test]
    fn test_name_serialize() {
        let tok = Token::TableName("users".into());
        assert_eq!(tok.serialize(&Postgres), "\"users\"");
        assert_eq!(tok.serialize(&TSql), "[users]");
        assert_eq!(tok.serialize(&MySql), "`users`");
    }

    #[test]
    fn test_qualified_names() {
        assert_eq!(
            Token::TableName("dbo.users".into()).serialize(&TSql),
            "[dbo].[users]"
        );
        assert_eq!(
            Token::ColumnName("u.*".into()).serialize(&MySql),
            "`u`.*"
        );
    }

    #[test]
    fn test_token_stream() {
        let mut ts = TokenStream::new();
        ts.push(Token::Select)
            .space()
            .push(Token::ColumnName("name".into()))
            .space()
            .push(Token::From)
            .space()
            .push(Token::TableName("users".into()));

        assert_eq!(ts.serialize(&Postgres), "SELECT \"name\" FROM \"users\"");
    }

    #[test]
    fn test_column_list() {
        let mut ts = TokenStream::new();
        ts.column_list(&["a", "b"]);
        assert_eq!(ts.serialize(&MySql), "(`a`, `b`)");
    }

    #[test]
    fn test_int_literal_is_unsigned() {
        assert_eq!(Token::LitInt(u64::MAX).serialize(&MySql), "18446744073709551615");
    }
}
