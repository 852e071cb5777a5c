//! SQL parser implementation.

use super::error::ParseError;
use super::pratt::{
    infix_binding_power, prefix_binding_power, token_to_binary_op, token_to_unary_op,
};
use crate::ast::{
    BinaryOp, DeleteStatement, Expr, FunctionCall, InsertSource, InsertStatement, JoinClause,
    JoinType, Literal, OrderBy, OrderDirection, SelectColumn, SelectStatement, Statement, TableRef,
    UpdateAssignment, UpdateStatement,
};
use crate::lexer::{Keyword, Lexer, Span, Token, TokenKind};

/// SQL parser.
pub struct Parser<'a> {
    input: &'a str,
    lexer: Lexer<'a>,
    current: Token,
    previous: Token,
    /// Parameter counter for ? placeholders.
    param_counter: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Self {
            input,
            lexer,
            current,
            previous: Token::new(TokenKind::Eof, Span::new(0, 0)),
            param_counter: 0,
        }
    }

    /// Parses exactly one SQL statement, optionally followed by `;`.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not a single valid statement.
    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let statement = match &self.current.kind {
            TokenKind::Keyword(Keyword::Select) => Statement::Select(self.parse_select_statement()?),
            TokenKind::Keyword(Keyword::Insert) => Statement::Insert(self.parse_insert_statement()?),
            TokenKind::Keyword(Keyword::Update) => Statement::Update(self.parse_update_statement()?),
            TokenKind::Keyword(Keyword::Delete) => Statement::Delete(self.parse_delete_statement()?),
            _ => return Err(self.unexpected("SELECT, INSERT, UPDATE, or DELETE")),
        };

        if self.check(&TokenKind::Semicolon) {
            self.advance();
        }
        if !self.current.is_eof() {
            return Err(self.unexpected("end of statement"));
        }
        Ok(statement)
    }

    fn parse_select_statement(&mut self) -> Result<SelectStatement, ParseError> {
        self.expect_keyword(Keyword::Select)?;

        let distinct = if self.check_keyword(Keyword::Distinct) {
            self.advance();
            true
        } else {
            if self.check_keyword(Keyword::All) {
                self.advance();
            }
            false
        };

        let columns = self.parse_select_columns()?;

        let from = if self.eat_keyword(Keyword::From) {
            Some(self.parse_table_ref()?)
        } else {
            None
        };

        let where_clause = self.parse_optional_clause(Keyword::Where)?;

        let group_by = if self.eat_keyword(Keyword::Group) {
            self.expect_keyword(Keyword::By)?;
            self.parse_expression_list()?
        } else {
            vec![]
        };

        let having = self.parse_optional_clause(Keyword::Having)?;

        let order_by = if self.eat_keyword(Keyword::Order) {
            self.expect_keyword(Keyword::By)?;
            self.parse_order_by_list()?
        } else {
            vec![]
        };

        let limit = self.parse_optional_clause(Keyword::Limit)?;
        let offset = self.parse_optional_clause(Keyword::Offset)?;

        Ok(SelectStatement {
            distinct,
            columns,
            from,
            where_clause,
            group_by,
            having,
            order_by,
            limit,
            offset,
        })
    }

    /// Parses `<keyword> <expr>` if the keyword is next.
    fn parse_optional_clause(&mut self, keyword: Keyword) -> Result<Option<Expr>, ParseError> {
        if self.eat_keyword(keyword) {
            Ok(Some(self.parse_expression(0)?))
        } else {
            Ok(None)
        }
    }

    fn parse_select_columns(&mut self) -> Result<Vec<SelectColumn>, ParseError> {
        let mut columns = vec![];
        loop {
            let expr = self.parse_expression(0)?;
            let alias = if self.eat_keyword(Keyword::As) {
                Some(self.expect_identifier()?)
            } else if matches!(&self.current.kind, TokenKind::Identifier(_)) {
                Some(self.expect_identifier()?)
            } else {
                None
            };
            columns.push(SelectColumn { expr, alias });

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(columns)
    }

    fn parse_table_ref(&mut self) -> Result<TableRef, ParseError> {
        let mut table_ref = self.parse_table_factor()?;

        while self.is_join_keyword() {
            let join_type = self.parse_join_type()?;
            let right = self.parse_table_factor()?;

            let (on, using) = if join_type == JoinType::Cross {
                (None, vec![])
            } else if self.eat_keyword(Keyword::On) {
                (Some(self.parse_expression(0)?), vec![])
            } else if self.eat_keyword(Keyword::Using) {
                self.expect(&TokenKind::LeftParen)?;
                let cols = self.parse_identifier_list()?;
                self.expect(&TokenKind::RightParen)?;
                (None, cols)
            } else {
                return Err(ParseError::new(
                    "Expected ON or USING clause",
                    self.current.span,
                ));
            };

            table_ref = TableRef::Join {
                left: Box::new(table_ref),
                join: Box::new(JoinClause {
                    join_type,
                    table: right,
                    on,
                    using,
                }),
            };
        }

        Ok(table_ref)
    }

    /// A table name, a derived table, or a parenthesized join.
    fn parse_table_factor(&mut self) -> Result<TableRef, ParseError> {
        if self.eat(&TokenKind::LeftParen) {
            if self.check_keyword(Keyword::Select) {
                let query = self.parse_select_statement()?;
                self.expect(&TokenKind::RightParen)?;
                let alias = self.parse_optional_alias()?;
                return Ok(TableRef::Subquery {
                    query: Box::new(query),
                    alias,
                });
            }
            let inner = self.parse_table_ref()?;
            self.expect(&TokenKind::RightParen)?;
            return Ok(inner);
        }

        let (schema, name) = self.parse_qualified_name()?;
        let alias = self.parse_optional_alias()?;
        Ok(TableRef::Table {
            schema,
            name,
            alias,
        })
    }

    /// Parses `name` or `schema.name`.
    fn parse_qualified_name(&mut self) -> Result<(Option<String>, String), ParseError> {
        let first = self.expect_identifier()?;
        if self.eat(&TokenKind::Dot) {
            let name = self.expect_identifier()?;
            Ok((Some(first), name))
        } else {
            Ok((None, first))
        }
    }

    fn is_join_keyword(&self) -> bool {
        matches!(
            &self.current.kind,
            TokenKind::Keyword(
                Keyword::Join
                    | Keyword::Inner
                    | Keyword::Left
                    | Keyword::Right
                    | Keyword::Full
                    | Keyword::Cross
            )
        )
    }

    fn parse_join_type(&mut self) -> Result<JoinType, ParseError> {
        let join_type = match &self.current.kind {
            TokenKind::Keyword(Keyword::Join) => return self.advance_then(JoinType::Inner),
            TokenKind::Keyword(Keyword::Inner) => JoinType::Inner,
            TokenKind::Keyword(Keyword::Left) => JoinType::Left,
            TokenKind::Keyword(Keyword::Right) => JoinType::Right,
            TokenKind::Keyword(Keyword::Full) => JoinType::Full,
            TokenKind::Keyword(Keyword::Cross) => JoinType::Cross,
            _ => return Err(self.unexpected("JOIN keyword")),
        };
        self.advance();
        if matches!(join_type, JoinType::Left | JoinType::Right | JoinType::Full) {
            self.eat_keyword(Keyword::Outer);
        }
        self.expect_keyword(Keyword::Join)?;
        Ok(join_type)
    }

    fn advance_then<T>(&mut self, value: T) -> Result<T, ParseError> {
        self.advance();
        Ok(value)
    }

    fn parse_optional_alias(&mut self) -> Result<Option<String>, ParseError> {
        if self.eat_keyword(Keyword::As) {
            Ok(Some(self.expect_identifier()?))
        } else if matches!(&self.current.kind, TokenKind::Identifier(_)) {
            Ok(Some(self.expect_identifier()?))
        } else {
            Ok(None)
        }
    }

    fn parse_insert_statement(&mut self) -> Result<InsertStatement, ParseError> {
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;

        let (schema, table) = self.parse_qualified_name()?;

        let columns = if self.eat(&TokenKind::LeftParen) {
            let cols = self.parse_identifier_list()?;
            self.expect(&TokenKind::RightParen)?;
            cols
        } else {
            vec![]
        };

        let values = if self.eat_keyword(Keyword::Values) {
            let mut rows = vec![];
            loop {
                self.expect(&TokenKind::LeftParen)?;
                let row = self.parse_expression_list()?;
                self.expect(&TokenKind::RightParen)?;
                rows.push(row);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            InsertSource::Values(rows)
        } else if self.check_keyword(Keyword::Select) {
            InsertSource::Query(Box::new(self.parse_select_statement()?))
        } else if self.eat_keyword(Keyword::Default) {
            self.expect_keyword(Keyword::Values)?;
            InsertSource::DefaultValues
        } else {
            return Err(self.unexpected("VALUES, SELECT, or DEFAULT VALUES"));
        };

        Ok(InsertStatement {
            schema,
            table,
            columns,
            values,
        })
    }

    fn parse_update_statement(&mut self) -> Result<UpdateStatement, ParseError> {
        self.expect_keyword(Keyword::Update)?;

        let (schema, table) = self.parse_qualified_name()?;
        let alias = self.parse_optional_alias()?;

        self.expect_keyword(Keyword::Set)?;

        let mut assignments = vec![];
        loop {
            let mut column = self.expect_identifier()?;
            // SET t.col = ... names the target table's column.
            if self.eat(&TokenKind::Dot) {
                column = self.expect_identifier()?;
            }
            self.expect(&TokenKind::Eq)?;
            let value = self.parse_expression(0)?;
            assignments.push(UpdateAssignment { column, value });

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        let from = if self.eat_keyword(Keyword::From) {
            Some(self.parse_table_ref()?)
        } else {
            None
        };

        let where_clause = self.parse_optional_clause(Keyword::Where)?;

        Ok(UpdateStatement {
            schema,
            table,
            alias,
            assignments,
            from,
            where_clause,
        })
    }

    fn parse_delete_statement(&mut self) -> Result<DeleteStatement, ParseError> {
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;

        let (schema, table) = self.parse_qualified_name()?;
        let alias = self.parse_optional_alias()?;
        let where_clause = self.parse_optional_clause(Keyword::Where)?;

        Ok(DeleteStatement {
            schema,
            table,
            alias,
            where_clause,
        })
    }

    fn parse_order_by_list(&mut self) -> Result<Vec<OrderBy>, ParseError> {
        let mut items = vec![];
        loop {
            let expr = self.parse_expression(0)?;
            let direction = if self.eat_keyword(Keyword::Desc) {
                OrderDirection::Desc
            } else {
                self.eat_keyword(Keyword::Asc);
                OrderDirection::Asc
            };
            items.push(OrderBy { expr, direction });

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(items)
    }

    /// Parses an expression using Pratt parsing.
    fn parse_expression(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let start = self.current.span.start;
        let mut lhs = self.parse_prefix()?;

        while let Some((l_bp, r_bp)) = infix_binding_power(&self.current.kind) {
            if l_bp < min_bp {
                break;
            }

            let negated = self.eat_keyword(Keyword::Not);
            if negated
                && !matches!(
                    self.current.kind,
                    TokenKind::Keyword(Keyword::In | Keyword::Between | Keyword::Like)
                )
            {
                return Err(self.unexpected("IN, BETWEEN, or LIKE after NOT"));
            }

            lhs = match &self.current.kind {
                TokenKind::Keyword(Keyword::Is) => {
                    self.advance();
                    let negated = self.eat_keyword(Keyword::Not);
                    self.expect_keyword(Keyword::Null)?;
                    Expr::IsNull {
                        expr: Box::new(lhs),
                        negated,
                        span: self.span_from(start),
                    }
                }
                TokenKind::Keyword(Keyword::In) => {
                    self.advance();
                    self.expect(&TokenKind::LeftParen)?;
                    if self.check_keyword(Keyword::Select) {
                        let query = self.parse_select_statement()?;
                        self.expect(&TokenKind::RightParen)?;
                        Expr::InSubquery {
                            expr: Box::new(lhs),
                            query: Box::new(query),
                            negated,
                            span: self.span_from(start),
                        }
                    } else {
                        let list = self.parse_expression_list()?;
                        self.expect(&TokenKind::RightParen)?;
                        Expr::In {
                            expr: Box::new(lhs),
                            list,
                            negated,
                            span: self.span_from(start),
                        }
                    }
                }
                TokenKind::Keyword(Keyword::Between) => {
                    self.advance();
                    let low = self.parse_expression(r_bp)?;
                    self.expect_keyword(Keyword::And)?;
                    let high = self.parse_expression(r_bp)?;
                    Expr::Between {
                        expr: Box::new(lhs),
                        low: Box::new(low),
                        high: Box::new(high),
                        negated,
                        span: self.span_from(start),
                    }
                }
                kind => {
                    let Some(mut op) = token_to_binary_op(kind) else {
                        break;
                    };
                    if negated {
                        op = BinaryOp::NotLike;
                    }
                    self.advance();
                    let rhs = self.parse_expression(r_bp)?;
                    Expr::Binary {
                        left: Box::new(lhs),
                        op,
                        right: Box::new(rhs),
                        span: self.span_from(start),
                    }
                }
            };
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span.start;
        if let Some(op) = token_to_unary_op(&self.current.kind) {
            let bp = prefix_binding_power(&self.current.kind).unwrap_or(17);
            self.advance();
            let operand = self.parse_expression(bp)?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
                span: self.span_from(start),
            });
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.current.clone();
        let span = token.span;

        let literal = match token.kind {
            TokenKind::Integer(n) => Some(Literal::Integer(n)),
            TokenKind::Float(f) => Some(Literal::Float(f)),
            TokenKind::String(s) => Some(Literal::String(s)),
            TokenKind::Blob(b) => Some(Literal::Blob(b)),
            TokenKind::Keyword(Keyword::True) => Some(Literal::Boolean(true)),
            TokenKind::Keyword(Keyword::False) => Some(Literal::Boolean(false)),
            TokenKind::Keyword(Keyword::Null) => Some(Literal::Null),
            _ => None,
        };
        if let Some(value) = literal {
            self.advance();
            return Ok(Expr::Literal { value, span });
        }

        match &self.current.kind {
            TokenKind::Question => {
                self.param_counter += 1;
                let position = self.param_counter;
                self.advance();
                Ok(Expr::Parameter {
                    name: None,
                    position,
                    span,
                })
            }
            TokenKind::NamedParameter(name) => {
                let name = name.clone();
                self.advance();
                Ok(Expr::Parameter {
                    name: Some(name),
                    position: 0,
                    span,
                })
            }
            TokenKind::Star => {
                self.advance();
                Ok(Expr::Wildcard { table: None, span })
            }
            TokenKind::LeftParen => {
                self.advance();
                if self.check_keyword(Keyword::Select) {
                    let query = self.parse_select_statement()?;
                    self.expect(&TokenKind::RightParen)?;
                    Ok(Expr::Subquery {
                        query: Box::new(query),
                        span: self.span_from(span.start),
                    })
                } else {
                    let expr = self.parse_expression(0)?;
                    self.expect(&TokenKind::RightParen)?;
                    Ok(Expr::Paren {
                        expr: Box::new(expr),
                        span: self.span_from(span.start),
                    })
                }
            }
            TokenKind::Keyword(Keyword::Case) => self.parse_case_expression(),
            TokenKind::Keyword(Keyword::Cast) => self.parse_cast_expression(),
            TokenKind::Keyword(Keyword::Exists) => {
                self.advance();
                self.expect(&TokenKind::LeftParen)?;
                let query = self.parse_select_statement()?;
                self.expect(&TokenKind::RightParen)?;
                Ok(Expr::Exists {
                    query: Box::new(query),
                    span: self.span_from(span.start),
                })
            }
            _ if self.at_identifier() => self.parse_column_or_call(),
            _ => Err(self.unexpected("expression")),
        }
    }

    /// Parses `name`, `name(...)`, `table.column` or `table.*`.
    fn parse_column_or_call(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span.start;
        let name = self.expect_identifier()?;

        if self.check(&TokenKind::LeftParen) {
            return self.parse_function_call(name, start);
        }

        if self.eat(&TokenKind::Dot) {
            if self.eat(&TokenKind::Star) {
                return Ok(Expr::Wildcard {
                    table: Some(name),
                    span: self.span_from(start),
                });
            }
            let column = self.expect_identifier()?;
            return Ok(Expr::Column {
                table: Some(name),
                name: column,
                span: self.span_from(start),
            });
        }

        Ok(Expr::Column {
            table: None,
            name,
            span: self.span_from(start),
        })
    }

    fn parse_function_call(&mut self, name: String, start: usize) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftParen)?;

        let distinct = self.eat_keyword(Keyword::Distinct);

        let args = if self.check(&TokenKind::RightParen) {
            vec![]
        } else if self.check(&TokenKind::Star) {
            let span = self.current.span;
            self.advance();
            vec![Expr::Wildcard { table: None, span }]
        } else {
            self.parse_expression_list()?
        };

        self.expect(&TokenKind::RightParen)?;

        Ok(Expr::Function(FunctionCall {
            name,
            args,
            distinct,
            span: self.span_from(start),
        }))
    }

    fn parse_cast_expression(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Cast)?;
        self.expect(&TokenKind::LeftParen)?;
        let expr = self.parse_expression(0)?;
        self.expect_keyword(Keyword::As)?;
        let data_type = self.parse_type_name()?;
        self.expect(&TokenKind::RightParen)?;

        Ok(Expr::Cast {
            expr: Box::new(expr),
            data_type,
            span: self.span_from(start),
        })
    }

    /// Reads a type name such as `DOUBLE PRECISION` or `DECIMAL(10, 2)` and
    /// returns its source text.
    fn parse_type_name(&mut self) -> Result<String, ParseError> {
        let start = self.current.span.start;
        if !matches!(
            self.current.kind,
            TokenKind::Identifier(_) | TokenKind::Keyword(_)
        ) {
            return Err(self.unexpected("data type"));
        }
        while matches!(
            self.current.kind,
            TokenKind::Identifier(_) | TokenKind::Keyword(_)
        ) {
            self.advance();
        }
        if self.eat(&TokenKind::LeftParen) {
            loop {
                match self.current.kind {
                    TokenKind::Integer(_) | TokenKind::Comma => self.advance(),
                    _ => break,
                }
            }
            self.expect(&TokenKind::RightParen)?;
        }
        Ok(self.span_from(start).text(self.input).to_string())
    }

    fn parse_case_expression(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Case)?;

        let operand = if self.check_keyword(Keyword::When) {
            None
        } else {
            Some(Box::new(self.parse_expression(0)?))
        };

        let mut when_clauses = vec![];
        while self.eat_keyword(Keyword::When) {
            let when_expr = self.parse_expression(0)?;
            self.expect_keyword(Keyword::Then)?;
            let then_expr = self.parse_expression(0)?;
            when_clauses.push((when_expr, then_expr));
        }
        if when_clauses.is_empty() {
            return Err(self.unexpected("WHEN"));
        }

        let else_clause = if self.eat_keyword(Keyword::Else) {
            Some(Box::new(self.parse_expression(0)?))
        } else {
            None
        };

        self.expect_keyword(Keyword::End)?;

        Ok(Expr::Case {
            operand,
            when_clauses,
            else_clause,
            span: self.span_from(start),
        })
    }

    fn parse_expression_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut exprs = vec![];
        loop {
            exprs.push(self.parse_expression(0)?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(exprs)
    }

    fn parse_identifier_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut idents = vec![];
        loop {
            idents.push(self.expect_identifier()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(idents)
    }

    // --- Helper methods ---

    fn advance(&mut self) {
        self.previous = std::mem::replace(&mut self.current, self.lexer.next_token());
    }

    /// Span from `start` to the end of the last consumed token.
    const fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.previous.span.end)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        matches!(&self.current.kind, TokenKind::Keyword(kw) if *kw == keyword)
    }

    /// Consumes the current token if it matches the given kind.
    fn eat(&mut self, kind: &TokenKind) -> bool {
        let matched = self.check(kind);
        if matched {
            self.advance();
        }
        matched
    }

    /// Consumes the current token if it is the given keyword.
    fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        let matched = self.check_keyword(keyword);
        if matched {
            self.advance();
        }
        matched
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.unexpected(format!("{kind:?}")))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(keyword.as_str()))
        }
    }

    /// True for identifiers and non-reserved keywords.
    fn at_identifier(&self) -> bool {
        match &self.current.kind {
            TokenKind::Identifier(_) => true,
            TokenKind::Keyword(kw) => !kw.is_reserved(),
            _ => false,
        }
    }

    /// Expects and returns an identifier.
    ///
    /// Non-reserved keywords are returned with their source spelling.
    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        let name = match &self.current.kind {
            TokenKind::Identifier(name) => name.clone(),
            TokenKind::Keyword(kw) if !kw.is_reserved() => {
                self.current.span.text(self.input).to_string()
            }
            _ => return Err(self.unexpected("identifier")),
        };
        self.advance();
        Ok(name)
    }

    fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        ParseError::unexpected(expected, self.current.kind.clone(), self.current.span)
    }
}
