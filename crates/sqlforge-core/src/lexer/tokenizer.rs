//! SQL tokenizer.

use super::{Keyword, Span, Token, TokenKind};

/// A lexer that tokenizes SQL input.
///
/// The lexer never fails: malformed input produces [`TokenKind::Error`]
/// tokens that the parser turns into a [`ParseError`](crate::parser::ParseError).
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            self.advance_while(char::is_whitespace);
            match (self.peek(), self.peek_next()) {
                (Some('-'), Some('-')) => self.advance_while(|c| c != '\n'),
                (Some('/'), Some('*')) => {
                    self.pos += 2;
                    match self.input[self.pos..].find("*/") {
                        Some(offset) => self.pos += offset + 2,
                        None => self.pos = self.input.len(),
                    }
                }
                _ => break,
            }
        }
    }

    fn token(&self, kind: TokenKind) -> Token {
        Token::new(kind, Span::new(self.start, self.pos))
    }

    fn error(&self, message: impl Into<String>) -> Token {
        self.token(TokenKind::Error(message.into()))
    }

    /// Consumes `second` if it is next and returns `matched`, else `single`.
    fn either(&mut self, second: char, matched: TokenKind, single: TokenKind) -> Token {
        if self.peek() == Some(second) {
            self.advance();
            self.token(matched)
        } else {
            self.token(single)
        }
    }

    fn word(&mut self) -> &'a str {
        self.advance_while(|c| c.is_alphanumeric() || c == '_');
        &self.input[self.start..self.pos]
    }

    fn scan_word(&mut self) -> Token {
        let text = self.word();
        match Keyword::from_str(text) {
            Some(keyword) => self.token(TokenKind::Keyword(keyword)),
            None => self.token(TokenKind::Identifier(text.to_string())),
        }
    }

    fn scan_named_parameter(&mut self) -> Token {
        let name_start = self.pos;
        if !self.peek().is_some_and(|c| c.is_alphabetic() || c == '_') {
            return self.error("Expected parameter name after ':'");
        }
        self.advance_while(|c| c.is_alphanumeric() || c == '_');
        let name = self.input[name_start..self.pos].to_string();
        self.token(TokenKind::NamedParameter(name))
    }

    /// Reads a quoted run with doubled-quote escaping, the opening quote
    /// already consumed.
    fn scan_quoted(&mut self, quote: char) -> Option<String> {
        let mut value = String::new();
        loop {
            match self.advance()? {
                c if c == quote && self.peek() == Some(quote) => {
                    self.advance();
                    value.push(quote);
                }
                c if c == quote => return Some(value),
                c => value.push(c),
            }
        }
    }

    fn scan_number(&mut self) -> Token {
        let mut is_float = false;
        self.advance_while(|c| c.is_ascii_digit());

        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.advance();
            self.advance_while(|c| c.is_ascii_digit());
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            self.advance_while(|c| c.is_ascii_digit());
        }

        let text = &self.input[self.start..self.pos];
        if is_float {
            match text.parse::<f64>() {
                Ok(f) => self.token(TokenKind::Float(f)),
                Err(e) => self.error(format!("Invalid float: {e}")),
            }
        } else {
            match text.parse::<i64>() {
                Ok(i) => self.token(TokenKind::Integer(i)),
                Err(e) => self.error(format!("Invalid integer: {e}")),
            }
        }
    }

    fn scan_blob(&mut self) -> Token {
        self.advance(); // opening quote
        let Some(hex) = self.scan_quoted('\'') else {
            return self.error("Unterminated blob literal");
        };
        let digits: Vec<char> = hex.chars().filter(|c| !c.is_whitespace()).collect();
        if digits.len() % 2 != 0 {
            return self.error("Odd number of hex digits in blob literal");
        }
        let bytes: Option<Vec<u8>> = digits
            .chunks(2)
            .map(|pair| {
                let text: String = pair.iter().collect();
                u8::from_str_radix(&text, 16).ok()
            })
            .collect();
        match bytes {
            Some(bytes) => self.token(TokenKind::Blob(bytes)),
            None => self.error("Invalid character in blob literal"),
        }
    }

    /// Scans the next token.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();
        self.start = self.pos;

        let Some(c) = self.advance() else {
            return self.token(TokenKind::Eof);
        };

        match c {
            '(' => self.token(TokenKind::LeftParen),
            ')' => self.token(TokenKind::RightParen),
            ',' => self.token(TokenKind::Comma),
            ';' => self.token(TokenKind::Semicolon),
            '.' => self.token(TokenKind::Dot),
            '+' => self.token(TokenKind::Plus),
            '-' => self.token(TokenKind::Minus),
            '*' => self.token(TokenKind::Star),
            '/' => self.token(TokenKind::Slash),
            '%' => self.token(TokenKind::Percent),
            '~' => self.token(TokenKind::BitNot),
            '&' => self.token(TokenKind::BitAnd),
            '=' => self.token(TokenKind::Eq),
            '?' => self.token(TokenKind::Question),
            ':' => self.scan_named_parameter(),
            '|' => self.either('|', TokenKind::Concat, TokenKind::BitOr),
            '<' => match self.peek() {
                Some('=') => self.either('=', TokenKind::LtEq, TokenKind::Lt),
                Some('>') => self.either('>', TokenKind::NotEq, TokenKind::Lt),
                _ => self.either('<', TokenKind::LeftShift, TokenKind::Lt),
            },
            '>' => match self.peek() {
                Some('=') => self.either('=', TokenKind::GtEq, TokenKind::Gt),
                _ => self.either('>', TokenKind::RightShift, TokenKind::Gt),
            },
            '!' if self.peek() == Some('=') => {
                self.advance();
                self.token(TokenKind::NotEq)
            }
            '\'' => match self.scan_quoted('\'') {
                Some(value) => self.token(TokenKind::String(value)),
                None => self.error("Unterminated string literal"),
            },
            '"' | '`' => match self.scan_quoted(c) {
                Some(name) => self.token(TokenKind::Identifier(name)),
                None => self.error("Unterminated quoted identifier"),
            },
            'X' | 'x' if self.peek() == Some('\'') => self.scan_blob(),
            c if c.is_ascii_digit() => self.scan_number(),
            c if c.is_alphabetic() || c == '_' => self.scan_word(),
            c => self.error(format!("Unexpected character: {c}")),
        }
    }

    /// Tokenizes the entire input, including the trailing EOF token.
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .tokenize()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(token_kinds("   \n\t  "), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            token_kinds("SELECT -- comment\n/* block */ FROM"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(
            token_kinds("select FROM wHeRe"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Keyword(Keyword::Where),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_quoted_identifiers() {
        assert_eq!(
            token_kinds("\"column name\" `another`"),
            vec![
                TokenKind::Identifier(String::from("column name")),
                TokenKind::Identifier(String::from("another")),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            token_kinds("42 3.5 1e3"),
            vec![
                TokenKind::Integer(42),
                TokenKind::Float(3.5),
                TokenKind::Float(1e3),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_with_escaped_quote() {
        assert_eq!(
            token_kinds("'it''s'"),
            vec![TokenKind::String(String::from("it's")), TokenKind::Eof]
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert!(matches!(token_kinds("'abc")[0], TokenKind::Error(_)));
    }

    #[test]
    fn test_blob() {
        assert_eq!(
            token_kinds("X'4849'"),
            vec![TokenKind::Blob(vec![0x48, 0x49]), TokenKind::Eof]
        );
        assert!(matches!(token_kinds("X'123'")[0], TokenKind::Error(_)));
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            token_kinds("= != <> < <= > >= || << >>"),
            vec![
                TokenKind::Eq,
                TokenKind::NotEq,
                TokenKind::NotEq,
                TokenKind::Lt,
                TokenKind::LtEq,
                TokenKind::Gt,
                TokenKind::GtEq,
                TokenKind::Concat,
                TokenKind::LeftShift,
                TokenKind::RightShift,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(
            token_kinds("? :orderId"),
            vec![
                TokenKind::Question,
                TokenKind::NamedParameter(String::from("orderId")),
                TokenKind::Eof,
            ]
        );
        assert!(matches!(token_kinds(": x")[0], TokenKind::Error(_)));
    }

    #[test]
    fn test_span_tracking() {
        let tokens = Lexer::new("SELECT id WHERE a = :p").tokenize();
        assert_eq!(tokens[0].span, Span::new(0, 6));
        assert_eq!(tokens[1].span, Span::new(7, 9));
        assert_eq!(tokens[5].span, Span::new(20, 22));
    }
}
