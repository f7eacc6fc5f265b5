//! ECSQL tokenizer implementation.

use super::{Keyword, KeywordClassifier, Span, SqlKeywords, Token, TokenKind, WordClass};

/// How the lexer classifies what it scans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LexicalMode {
    /// General ECSQL.
    #[default]
    Sql,
    /// A quoted value following `DATE`, `TIME` or `TIMESTAMP`. The quoted
    /// text is kept verbatim as a [`TokenKind::DateTime`].
    DateTime,
    /// Criteria text: bare non-keyword words scan as string literals.
    String,
}

/// A lexer that tokenizes ECSQL input.
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
    /// The mode used for every token unless a one-shot mode is pending.
    mode: LexicalMode,
    /// Mode for the next token only.
    one_shot: Option<LexicalMode>,
    classifier: &'a dyn KeywordClassifier,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer in [`LexicalMode::Sql`] using the built-in keyword table.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self::with_classifier(input, &SqlKeywords)
    }

    #[must_use]
    pub fn with_classifier(input: &'a str, classifier: &'a dyn KeywordClassifier) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
            mode: LexicalMode::Sql,
            one_shot: None,
            classifier,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> LexicalMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: LexicalMode) {
        self.mode = mode;
    }

    /// Repositions the lexer at `offset` and scans the next token in `mode`.
    /// Later tokens return to the regular mode.
    pub fn rescan_from(&mut self, offset: usize, mode: LexicalMode) {
        self.pos = offset.min(self.input.len());
        self.one_shot = Some(mode);
    }

    /// Returns the source text covered by `span`.
    #[must_use]
    pub fn slice(&self, span: Span) -> &'a str {
        span.slice(self.input)
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skips whitespace plus `--`, `//` and `/* */` comments. Returns the
    /// start of a block comment that runs to the end of input.
    fn skip_whitespace_and_comments(&mut self) -> Option<usize> {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.advance();
            }

            let line_comment = matches!(
                (self.peek(), self.peek_next()),
                (Some('-'), Some('-')) | (Some('/'), Some('/'))
            );
            if line_comment {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                let comment_start = self.pos;
                self.advance();
                self.advance();
                loop {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            break;
                        }
                        None => return Some(comment_start),
                        _ => {}
                    }
                }
                continue;
            }

            return None;
        }
    }

    /// Creates a span from start to current position.
    const fn make_span(&self) -> Span {
        Span::new(self.start, self.pos)
    }

    /// Creates a token with the current span.
    const fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.make_span())
    }

    fn error(&self, message: impl Into<String>) -> Token {
        self.make_token(TokenKind::Error(message.into()))
    }

    /// Scans a bare word and classifies it.
    fn scan_word(&mut self, mode: LexicalMode) -> Token {
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.advance();
        }

        let text = &self.input[self.start..self.pos];
        match self.classifier.classify(text) {
            WordClass::Keyword(keyword) => self.make_token(TokenKind::Keyword(keyword)),
            WordClass::Name if mode == LexicalMode::String => {
                self.make_token(TokenKind::String(text.to_string()))
            }
            WordClass::Name => self.make_token(TokenKind::Name(text.to_string())),
        }
    }

    /// Scans text up to `close`, with a doubled `close` standing for itself.
    fn scan_delimited(&mut self, close: char) -> Option<String> {
        self.advance();
        let mut value = String::new();
        loop {
            match self.advance()? {
                c if c == close => {
                    if self.peek() == Some(close) {
                        self.advance();
                        value.push(close);
                    } else {
                        return Some(value);
                    }
                }
                c => value.push(c),
            }
        }
    }

    fn scan_string(&mut self) -> Token {
        match self.scan_delimited('\'') {
            Some(value) => self.make_token(TokenKind::String(value)),
            None => self.error("Unterminated string literal"),
        }
    }

    /// Scans a quoted value in date/time mode: everything between the
    /// quotes, verbatim.
    fn scan_datetime(&mut self) -> Token {
        self.advance();
        let content_start = self.pos;
        while self.peek().is_some_and(|c| c != '\'') {
            self.advance();
        }
        if self.peek().is_none() {
            return self.error("Unterminated date/time literal");
        }
        let content = self.input[content_start..self.pos].to_string();
        self.advance();
        self.make_token(TokenKind::DateTime(content))
    }

    fn scan_quoted_name(&mut self) -> Token {
        match self.scan_delimited('"') {
            Some(name) => self.make_token(TokenKind::QuotedName(name)),
            None => self.error("Unterminated quoted identifier"),
        }
    }

    /// Scans `[...]`: an array index when the content is empty or all
    /// digits, an escaped name otherwise.
    fn scan_bracket(&mut self) -> Token {
        self.advance();
        let content_start = self.pos;
        while self.peek().is_some_and(|c| c != ']') {
            self.advance();
        }
        if self.peek().is_none() {
            return self.error("Unterminated bracket");
        }
        let content = &self.input[content_start..self.pos];
        self.advance();

        if content.is_empty() {
            return self.make_token(TokenKind::ArrayIndex(None));
        }
        if content.chars().all(|c| c.is_ascii_digit()) {
            return match content.parse::<u32>() {
                Ok(index) => self.make_token(TokenKind::ArrayIndex(Some(index))),
                Err(e) => self.error(format!("Invalid array index: {e}")),
            };
        }
        self.make_token(TokenKind::QuotedName(content.to_string()))
    }

    /// True if an exponent (`e`, optional sign, digit) starts `skip`
    /// characters past the current position.
    fn exponent_at(&self, skip: usize) -> bool {
        let mut chars = self.input[self.pos..].chars().skip(skip);
        if !matches!(chars.next(), Some('e' | 'E')) {
            return false;
        }
        match chars.next() {
            Some('+' | '-') => chars.next().is_some_and(|c| c.is_ascii_digit()),
            Some(c) => c.is_ascii_digit(),
            None => false,
        }
    }

    /// Scans a number: integer, hexadecimal integer, decimal, or
    /// approximate (with exponent). Tokens keep their spelling; values are
    /// not range-checked here.
    fn scan_number(&mut self) -> Token {
        if self.peek() == Some('0') && matches!(self.peek_next(), Some('x' | 'X')) {
            self.advance();
            self.advance();
            let digits_start = self.pos;
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.advance();
            }
            if self.pos == digits_start {
                return self.error("Invalid hexadecimal integer: no digits after 0x");
            }
            return self.make_token(TokenKind::Integer(self.lexeme().to_string()));
        }

        let mut is_decimal = false;

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        // `1.` is a decimal unless a name follows the period
        if self.peek() == Some('.') {
            let name_follows = self
                .peek_next()
                .is_some_and(|c| c.is_alphabetic() || c == '_');
            if !name_follows || self.exponent_at(1) {
                is_decimal = true;
                self.advance();
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        let is_approx = self.exponent_at(0);
        if is_approx {
            self.advance();
            if self.peek().is_some_and(|c| c == '+' || c == '-') {
                self.advance();
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let text = self.lexeme().to_string();
        let kind = if is_approx {
            TokenKind::ApproxNum(text)
        } else if is_decimal {
            TokenKind::Real(text)
        } else {
            TokenKind::Integer(text)
        };
        self.make_token(kind)
    }

    /// Text scanned so far for the current token.
    fn lexeme(&self) -> &'a str {
        &self.input[self.start..self.pos]
    }

    /// Scans the next token.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        let mode = self.one_shot.take().unwrap_or(self.mode);
        if let Some(comment_start) = self.skip_whitespace_and_comments() {
            self.start = comment_start;
            return self.error("Unterminated block comment");
        }
        self.start = self.pos;

        let Some(c) = self.peek() else {
            return self.make_token(TokenKind::Eof);
        };

        match c {
            '\'' if mode == LexicalMode::DateTime => return self.scan_datetime(),
            '\'' => return self.scan_string(),
            '"' => return self.scan_quoted_name(),
            '[' => return self.scan_bracket(),
            c if c.is_ascii_digit() => return self.scan_number(),
            '.' if self.peek_next().is_some_and(|c| c.is_ascii_digit()) => {
                return self.scan_number();
            }
            c if c.is_alphabetic() || c == '_' => return self.scan_word(mode),
            _ => {}
        }

        self.advance();
        let kind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '.' => TokenKind::Dot,
            ':' => TokenKind::Colon,
            '?' => TokenKind::Question,
            '$' => TokenKind::Dollar,
            '+' => TokenKind::Plus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '~' => TokenKind::BitNot,
            '&' => TokenKind::BitAnd,
            '=' => TokenKind::Eq,
            '-' => {
                if self.peek() == Some('>') {
                    self.advance();
                    TokenKind::Arrow
                } else {
                    TokenKind::Minus
                }
            }
            '<' => match self.peek() {
                Some('=') => {
                    self.advance();
                    TokenKind::LtEq
                }
                Some('>') => {
                    self.advance();
                    TokenKind::NotEq
                }
                Some('<') => {
                    self.advance();
                    TokenKind::LeftShift
                }
                _ => TokenKind::Lt,
            },
            '>' => match self.peek() {
                Some('=') => {
                    self.advance();
                    TokenKind::GtEq
                }
                Some('>') => {
                    self.advance();
                    TokenKind::RightShift
                }
                _ => TokenKind::Gt,
            },
            '!' if self.peek() == Some('=') => {
                self.advance();
                TokenKind::NotEq
            }
            '|' => {
                if self.peek() == Some('|') {
                    self.advance();
                    TokenKind::Concat
                } else {
                    TokenKind::BitOr
                }
            }
            _ => TokenKind::Error(format!("Unexpected character: {c}")),
        };
        self.make_token(kind)
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

impl Keyword {
    /// Keywords after which a quoted value is re-lexed in
    /// [`LexicalMode::DateTime`].
    #[must_use]
    pub const fn starts_datetime_literal(&self) -> bool {
        matches!(self, Self::Date | Self::Time | Self::Timestamp)
    }
}
