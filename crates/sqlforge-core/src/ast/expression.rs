//! Expression AST types.

use crate::lexer::Span;

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Integer literal.
    Integer(i64),
    /// Float literal.
    Float(f64),
    /// String literal.
    String(String),
    /// Blob literal.
    Blob(Vec<u8>),
    /// Boolean literal.
    Boolean(bool),
    /// NULL literal.
    Null,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,
    NotLike,

    // Logical
    And,
    Or,

    // String
    Concat,

    // Bitwise
    BitAnd,
    BitOr,
    LeftShift,
    RightShift,
}

impl BinaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Concat => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
        }
    }

    /// Returns true for operators that compare two values.
    #[must_use]
    pub const fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Eq
                | Self::NotEq
                | Self::Lt
                | Self::LtEq
                | Self::Gt
                | Self::GtEq
                | Self::Like
                | Self::NotLike
        )
    }

    /// Returns true for AND and OR.
    #[must_use]
    pub const fn is_logical(&self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    /// The operator to use when the operands are swapped.
    ///
    /// `1 < a` is `a > 1`. Symmetric operators return themselves; LIKE has
    /// no mirror and also returns itself.
    #[must_use]
    pub const fn mirrored(&self) -> Self {
        match self {
            Self::Lt => Self::Gt,
            Self::LtEq => Self::GtEq,
            Self::Gt => Self::Lt,
            Self::GtEq => Self::LtEq,
            other => *other,
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Negation (-)
    Neg,
    /// Logical NOT
    Not,
    /// Bitwise NOT (~)
    BitNot,
}

impl UnaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "NOT",
            Self::BitNot => "~",
        }
    }
}

/// A function call expression.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    /// The function name as written.
    pub name: String,
    /// The arguments.
    pub args: Vec<Expr>,
    /// Whether DISTINCT was specified.
    pub distinct: bool,
    /// Source span, name through closing parenthesis.
    pub span: Span,
}

/// An SQL expression.
///
/// Every node records the byte span it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Literal {
        /// The value.
        value: Literal,
        /// Source span.
        span: Span,
    },

    /// A column reference (optionally qualified with table name).
    Column {
        /// Table name or alias (optional).
        table: Option<String>,
        /// Column name.
        name: String,
        /// Source span, covering the qualifier when present.
        span: Span,
    },

    /// A binary expression.
    Binary {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expr>,
        /// Source span.
        span: Span,
    },

    /// A unary expression.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
        /// Source span.
        span: Span,
    },

    /// A function call.
    Function(FunctionCall),

    /// A scalar subquery.
    Subquery {
        /// The query.
        query: Box<super::SelectStatement>,
        /// Source span, parentheses included.
        span: Span,
    },

    /// `EXISTS (SELECT ...)`. `NOT EXISTS` is a unary NOT around it.
    Exists {
        /// The query.
        query: Box<super::SelectStatement>,
        /// Source span.
        span: Span,
    },

    /// IS NULL expression.
    IsNull {
        /// The expression to check.
        expr: Box<Expr>,
        /// Whether this is IS NOT NULL.
        negated: bool,
        /// Source span.
        span: Span,
    },

    /// IN expression with a value list.
    In {
        /// The expression to check.
        expr: Box<Expr>,
        /// The list of values.
        list: Vec<Expr>,
        /// Whether this is NOT IN.
        negated: bool,
        /// Source span.
        span: Span,
    },

    /// IN expression with a subquery.
    InSubquery {
        /// The expression to check.
        expr: Box<Expr>,
        /// The subquery.
        query: Box<super::SelectStatement>,
        /// Whether this is NOT IN.
        negated: bool,
        /// Source span.
        span: Span,
    },

    /// BETWEEN expression.
    Between {
        /// The expression to check.
        expr: Box<Expr>,
        /// Lower bound.
        low: Box<Expr>,
        /// Upper bound.
        high: Box<Expr>,
        /// Whether this is NOT BETWEEN.
        negated: bool,
        /// Source span.
        span: Span,
    },

    /// CASE expression.
    Case {
        /// The operand (if any).
        operand: Option<Box<Expr>>,
        /// WHEN/THEN clauses.
        when_clauses: Vec<(Expr, Expr)>,
        /// ELSE clause.
        else_clause: Option<Box<Expr>>,
        /// Source span.
        span: Span,
    },

    /// CAST expression.
    Cast {
        /// Expression to cast.
        expr: Box<Expr>,
        /// Target type as written, e.g. `VARCHAR(20)`.
        data_type: String,
        /// Source span.
        span: Span,
    },

    /// Parenthesized expression.
    Paren {
        /// The inner expression.
        expr: Box<Expr>,
        /// Source span, parentheses included.
        span: Span,
    },

    /// A parameter placeholder (`?` or `:name`).
    Parameter {
        /// The name for `:name` placeholders.
        name: Option<String>,
        /// 1-based position among `?` placeholders, 0 for named ones.
        position: usize,
        /// Source span, colon included.
        span: Span,
    },

    /// Wildcard (*) in SELECT.
    Wildcard {
        /// Table qualifier (optional).
        table: Option<String>,
        /// Source span.
        span: Span,
    },
}

impl Expr {
    /// Returns the source span of this expression.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Function(call) => call.span,
            Self::Literal { span, .. }
            | Self::Column { span, .. }
            | Self::Binary { span, .. }
            | Self::Unary { span, .. }
            | Self::Subquery { span, .. }
            | Self::Exists { span, .. }
            | Self::IsNull { span, .. }
            | Self::In { span, .. }
            | Self::InSubquery { span, .. }
            | Self::Between { span, .. }
            | Self::Case { span, .. }
            | Self::Cast { span, .. }
            | Self::Paren { span, .. }
            | Self::Parameter { span, .. }
            | Self::Wildcard { span, .. } => *span,
        }
    }

    /// Returns true for a literal or a negated numeric literal such as `-1`.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        match self {
            Self::Literal { .. } => true,
            Self::Unary {
                op: UnaryOp::Neg,
                operand,
                ..
            } => matches!(
                operand.as_ref(),
                Self::Literal {
                    value: Literal::Integer(_) | Literal::Float(_),
                    ..
                }
            ),
            _ => false,
        }
    }

    /// Returns the string value if this is a string literal.
    #[must_use]
    pub fn as_str_literal(&self) -> Option<&str> {
        match self {
            Self::Literal {
                value: Literal::String(s),
                ..
            } => Some(s),
            _ => None,
        }
    }
}
