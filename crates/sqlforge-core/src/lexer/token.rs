//! Token types for the SQL lexer.

use super::Span;

/// SQL keywords recognized by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    // Queries
    Select,
    From,
    Where,
    Order,
    By,
    Group,
    Having,
    Limit,
    Offset,
    Distinct,
    All,

    // Joins
    Join,
    Inner,
    Left,
    Right,
    Full,
    Outer,
    Cross,
    On,
    Using,

    // Set operations
    Union,
    Intersect,
    Except,

    // Data manipulation
    Insert,
    Into,
    Values,
    Update,
    Set,
    Delete,
    Default,

    // Predicates
    And,
    Or,
    Not,
    In,
    Between,
    Like,
    Is,
    Null,
    True,
    False,
    Exists,

    // Ordering
    Asc,
    Desc,

    // Expressions
    As,
    Case,
    When,
    Then,
    Else,
    End,
    Cast,

    // Type names (non-reserved, usable as column names)
    Int,
    Integer,
    Smallint,
    Bigint,
    Real,
    Double,
    Float,
    Decimal,
    Numeric,
    Char,
    Varchar,
    Text,
    Blob,
    Boolean,
    Date,
    Time,
    Timestamp,
    Datetime,
}

const KEYWORDS: &[(&str, Keyword)] = &[
    ("SELECT", Keyword::Select),
    ("FROM", Keyword::From),
    ("WHERE", Keyword::Where),
    ("ORDER", Keyword::Order),
    ("BY", Keyword::By),
    ("GROUP", Keyword::Group),
    ("HAVING", Keyword::Having),
    ("LIMIT", Keyword::Limit),
    ("OFFSET", Keyword::Offset),
    ("DISTINCT", Keyword::Distinct),
    ("ALL", Keyword::All),
    ("JOIN", Keyword::Join),
    ("INNER", Keyword::Inner),
    ("LEFT", Keyword::Left),
    ("RIGHT", Keyword::Right),
    ("FULL", Keyword::Full),
    ("OUTER", Keyword::Outer),
    ("CROSS", Keyword::Cross),
    ("ON", Keyword::On),
    ("USING", Keyword::Using),
    ("UNION", Keyword::Union),
    ("INTERSECT", Keyword::Intersect),
    ("EXCEPT", Keyword::Except),
    ("INSERT", Keyword::Insert),
    ("INTO", Keyword::Into),
    ("VALUES", Keyword::Values),
    ("UPDATE", Keyword::Update),
    ("SET", Keyword::Set),
    ("DELETE", Keyword::Delete),
    ("DEFAULT", Keyword::Default),
    ("AND", Keyword::And),
    ("OR", Keyword::Or),
    ("NOT", Keyword::Not),
    ("IN", Keyword::In),
    ("BETWEEN", Keyword::Between),
    ("LIKE", Keyword::Like),
    ("IS", Keyword::Is),
    ("NULL", Keyword::Null),
    ("TRUE", Keyword::True),
    ("FALSE", Keyword::False),
    ("EXISTS", Keyword::Exists),
    ("ASC", Keyword::Asc),
    ("DESC", Keyword::Desc),
    ("AS", Keyword::As),
    ("CASE", Keyword::Case),
    ("WHEN", Keyword::When),
    ("THEN", Keyword::Then),
    ("ELSE", Keyword::Else),
    ("END", Keyword::End),
    ("CAST", Keyword::Cast),
    ("INT", Keyword::Int),
    ("INTEGER", Keyword::Integer),
    ("SMALLINT", Keyword::Smallint),
    ("BIGINT", Keyword::Bigint),
    ("REAL", Keyword::Real),
    ("DOUBLE", Keyword::Double),
    ("FLOAT", Keyword::Float),
    ("DECIMAL", Keyword::Decimal),
    ("NUMERIC", Keyword::Numeric),
    ("CHAR", Keyword::Char),
    ("VARCHAR", Keyword::Varchar),
    ("TEXT", Keyword::Text),
    ("BLOB", Keyword::Blob),
    ("BOOLEAN", Keyword::Boolean),
    ("DATE", Keyword::Date),
    ("TIME", Keyword::Time),
    ("TIMESTAMP", Keyword::Timestamp),
    ("DATETIME", Keyword::Datetime),
];

impl Keyword {
    /// Attempts to parse a keyword from a string (case-insensitive).
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        KEYWORDS
            .iter()
            .find(|(text, _)| text.eq_ignore_ascii_case(s))
            .map(|(_, kw)| *kw)
    }

    /// Returns the keyword as an upper-case string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        KEYWORDS
            .iter()
            .find(|(_, kw)| kw == self)
            .map_or("", |(text, _)| text)
    }

    /// Reserved keywords can never be used as bare identifiers.
    ///
    /// Type names are non-reserved so that columns such as `date` or `text`
    /// parse as column references.
    #[must_use]
    pub const fn is_reserved(&self) -> bool {
        !matches!(
            self,
            Self::Int
                | Self::Integer
                | Self::Smallint
                | Self::Bigint
                | Self::Real
                | Self::Double
                | Self::Float
                | Self::Decimal
                | Self::Numeric
                | Self::Char
                | Self::Varchar
                | Self::Text
                | Self::Blob
                | Self::Boolean
                | Self::Date
                | Self::Time
                | Self::Timestamp
                | Self::Datetime
        )
    }
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Integer literal (e.g., 42)
    Integer(i64),
    /// Float literal (e.g., 3.14)
    Float(f64),
    /// String literal with quotes removed and `''` unescaped
    String(String),
    /// Blob literal (e.g., X'1234')
    Blob(Vec<u8>),

    /// Identifier, unquoted or quoted
    Identifier(String),
    /// SQL keyword
    Keyword(Keyword),

    /// Positional placeholder `?`
    Question,
    /// Named placeholder `:name`, name without the colon
    NamedParameter(String),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Eq,
    /// != or <>
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    /// ||
    Concat,
    BitAnd,
    BitOr,
    BitNot,
    LeftShift,
    RightShift,

    // Delimiters
    LeftParen,
    RightParen,
    Comma,
    Semicolon,
    Dot,

    /// End of input
    Eof,
    /// Invalid/unknown token
    Error(String),
}

/// A token with its span in the source code.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The location in the source code.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_from_str() {
        assert_eq!(Keyword::from_str("SELECT"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("select"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("SeLeCt"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("not_a_keyword"), None);
    }

    #[test]
    fn test_keyword_as_str_round_trips() {
        for (text, kw) in KEYWORDS {
            assert_eq!(kw.as_str(), *text);
        }
    }

    #[test]
    fn test_type_names_are_not_reserved() {
        assert!(!Keyword::Date.is_reserved());
        assert!(!Keyword::Text.is_reserved());
        assert!(Keyword::Where.is_reserved());
        assert!(Keyword::Select.is_reserved());
    }

    #[test]
    fn test_token_as_keyword() {
        let select = Token::new(TokenKind::Keyword(Keyword::Select), Span::new(0, 6));
        let plus = Token::new(TokenKind::Plus, Span::new(0, 1));
        assert_eq!(select.as_keyword(), Some(Keyword::Select));
        assert_eq!(plus.as_keyword(), None);
        assert!(!select.is_eof());
    }
}
