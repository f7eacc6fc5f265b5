//! ECSQL parser driver.
//!
//! Token handling, the statement entry points, and the data-manipulation
//! statements. Queries, conditions, scalar expressions and window
//! functions live in the sibling modules, each adding methods to
//! [`Parser`].

use std::mem;

use tracing::{debug, trace};

use super::actions::Actions;
use super::{ParseContext, ParseError};
use crate::lexer::{Keyword, Lexer, LexicalMode, Token, TokenKind};
use crate::tree::{Arena, LiteralKind, NodeId, ParseTree, RuleTag};

/// ECSQL Parser.
///
/// One parser handles one statement. Every node it creates lives in its
/// arena; on failure the arena is dropped with the parser.
pub struct Parser<'a> {
    pub(super) lexer: Lexer<'a>,
    pub(super) input: &'a str,
    pub(super) current: Token,
    /// One token of extra lookahead, filled on demand.
    pub(super) peeked: Option<Token>,
    pub(super) arena: Arena,
    pub(super) ctx: &'a ParseContext,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input.
    #[must_use]
    pub fn new(input: &'a str, ctx: &'a ParseContext) -> Self {
        let mut lexer = Lexer::with_classifier(input, ctx.classifier());
        lexer.set_mode(ctx.lexical_mode);
        let current = lexer.next_token();
        Self {
            lexer,
            input,
            current,
            peeked: None,
            arena: Arena::new(),
            ctx,
            depth: 0,
        }
    }

    /// Parses a single ECSQL statement, optionally terminated by `;`.
    ///
    /// In shorthand mode a search condition or predicate is accepted in
    /// place of a statement.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not a valid statement.
    pub fn parse_statement(mut self) -> Result<ParseTree, ParseError> {
        debug!(
            len = self.input.len(),
            shorthand = self.ctx.shorthand_predicate_allowed,
            mode = ?self.ctx.lexical_mode,
            "parsing ECSQL"
        );
        let root = match self.parse_root() {
            Ok(root) => root,
            Err(error) => {
                trace!(nodes = self.arena.len(), "releasing arena after failed parse");
                return Err(error);
            }
        };
        let allocated = self.arena.len();
        let tree = self.arena.into_tree(root);
        debug!(
            root = %tree.root().tag().map_or("", |t| t.as_str()),
            nodes = tree.len(),
            dropped = allocated - tree.len(),
            "parsed ECSQL"
        );
        Ok(tree)
    }

    fn parse_root(&mut self) -> Result<NodeId, ParseError> {
        let root = self.parse_top()?;
        if self.check(&TokenKind::Semicolon) {
            self.advance();
        }
        if !self.current.is_eof() {
            return Err(self.error_here("end of statement"));
        }
        Ok(root)
    }

    fn parse_top(&mut self) -> Result<NodeId, ParseError> {
        if self.check(&TokenKind::LeftParen) && self.peek_starts_statement() {
            self.advance();
            let inner = self.parse_top()?;
            self.expect(&TokenKind::RightParen, "')'")?;
            return Ok(inner);
        }

        match self.current.as_keyword() {
            Some(Keyword::Select | Keyword::With | Keyword::Values) => {
                return self.parse_select_statement();
            }
            Some(Keyword::Insert) => return self.parse_insert_statement(),
            Some(Keyword::Update) => return self.parse_update_statement(),
            Some(Keyword::Delete) => return self.parse_delete_statement(),
            Some(Keyword::Pragma) => return self.parse_pragma(),
            _ => {}
        }

        if self.ctx.shorthand_predicate_allowed {
            let condition = self.parse_search_condition()?;
            return Ok(self.actions().parenthesize_shorthand_root(condition));
        }
        if self.at_shorthand_start() {
            let (at, lexeme) = (self.current.span, self.lexeme());
            self.actions().shorthand_column_ref(at, lexeme)?;
        }
        Err(self.error_here("SELECT, INSERT, UPDATE, DELETE or PRAGMA"))
    }

    fn peek_starts_statement(&mut self) -> bool {
        matches!(
            self.peek().as_keyword(),
            Some(
                Keyword::Select
                    | Keyword::With
                    | Keyword::Values
                    | Keyword::Insert
                    | Keyword::Update
                    | Keyword::Delete
                    | Keyword::Pragma
            )
        )
    }

    /// Parses an INSERT statement.
    fn parse_insert_statement(&mut self) -> Result<NodeId, ParseError> {
        let insert = self.expect_keyword(Keyword::Insert)?;
        let into = self.expect_keyword(Keyword::Into)?;
        let only = self.opt_keyword(Keyword::Only, RuleTag::OptOnly);
        let table = self.parse_table_node()?;

        let columns = if self.check(&TokenKind::LeftParen) {
            let open = self.punct("(");
            let list =
                self.parse_comma_list(RuleTag::ColumnRefCommalist, false, Self::parse_column_ref)?;
            let close = self.expect(&TokenKind::RightParen, "')'")?;
            self.arena
                .rule(RuleTag::ColumnRefCommalistClause, [open, list, close])
        } else {
            self.arena.empty(RuleTag::OptColumnRefCommalist)
        };

        let source = if self.check_keyword(Keyword::Values) {
            self.parse_values()?
        } else if self.check_keyword(Keyword::Select) || self.check_keyword(Keyword::With) {
            self.parse_select_statement()?
        } else {
            return Err(self.error_here("VALUES or SELECT"));
        };

        let options = self.parse_opt_options()?;
        Ok(self.arena.rule(
            RuleTag::InsertStatement,
            [insert, into, only, table, columns, source, options],
        ))
    }

    /// Parses `VALUES (v, ...)`.
    pub(super) fn parse_values(&mut self) -> Result<NodeId, ParseError> {
        let values = self.expect_keyword(Keyword::Values)?;
        let open = self.expect(&TokenKind::LeftParen, "'('")?;
        let list = self.parse_comma_list(
            RuleTag::RowValueConstructorCommalist,
            true,
            Self::parse_value_exp,
        )?;
        let close = self.expect(&TokenKind::RightParen, "')'")?;
        Ok(self
            .arena
            .rule(RuleTag::ValuesOrQuerySpec, [values, open, list, close]))
    }

    /// Parses an UPDATE statement.
    fn parse_update_statement(&mut self) -> Result<NodeId, ParseError> {
        let update = self.expect_keyword(Keyword::Update)?;
        let table = self.parse_class_ref()?;
        let set = self.expect_keyword(Keyword::Set)?;
        let assignments =
            self.parse_comma_list(RuleTag::AssignmentCommalist, false, Self::parse_assignment)?;
        let where_clause = self.parse_opt_where()?;
        let options = self.parse_opt_options()?;
        Ok(self.arena.rule(
            RuleTag::UpdateStatementSearched,
            [update, table, set, assignments, where_clause, options],
        ))
    }

    fn parse_assignment(&mut self) -> Result<NodeId, ParseError> {
        let column = self.parse_column_ref()?;
        let eq = self.expect(&TokenKind::Eq, "'='")?;
        let value = match self.eat_keyword(Keyword::Default) {
            Some(default) => default,
            None => self.parse_value_exp()?,
        };
        Ok(self.arena.rule(RuleTag::Assignment, [column, eq, value]))
    }

    /// Parses a DELETE statement.
    fn parse_delete_statement(&mut self) -> Result<NodeId, ParseError> {
        let delete = self.expect_keyword(Keyword::Delete)?;
        let from = self.expect_keyword(Keyword::From)?;
        let table = self.parse_class_ref()?;
        let where_clause = self.parse_opt_where()?;
        let options = self.parse_opt_options()?;
        Ok(self.arena.rule(
            RuleTag::DeleteStatementSearched,
            [delete, from, table, where_clause, options],
        ))
    }

    /// Parses `PRAGMA name [= value | (value)] [FOR path] [ECSQLOPTIONS ...]`.
    fn parse_pragma(&mut self) -> Result<NodeId, ParseError> {
        let pragma = self.expect_keyword(Keyword::Pragma)?;
        let name = self.expect_name()?;

        let set = if self.check(&TokenKind::Eq) {
            let eq = self.punct("=");
            let value = self.parse_pragma_value()?;
            self.arena.rule(RuleTag::PragmaSet, [eq, value])
        } else if self.check(&TokenKind::LeftParen) {
            let open = self.punct("(");
            let value = self.parse_pragma_value()?;
            let close = self.expect(&TokenKind::RightParen, "')'")?;
            self.arena.rule(RuleTag::PragmaSet, [open, value, close])
        } else {
            self.arena.empty(RuleTag::OptPragmaSet)
        };

        let target = match self.eat_keyword(Keyword::For) {
            Some(for_kw) => {
                let path = self.parse_property_path()?;
                self.arena.rule(RuleTag::PragmaFor, [for_kw, path])
            }
            None => self.arena.empty(RuleTag::OptPragmaFor),
        };

        let options = self.parse_opt_options()?;
        Ok(self
            .arena
            .rule(RuleTag::Pragma, [pragma, name, set, target, options]))
    }

    fn parse_pragma_value(&mut self) -> Result<NodeId, ParseError> {
        if self.current.kind.is_literal() {
            return Ok(self.literal());
        }
        if let Some(kw @ (Keyword::True | Keyword::False | Keyword::Null)) =
            self.current.as_keyword()
        {
            return Ok(self.keyword_leaf(kw));
        }
        if self.is_name() {
            return self.expect_name();
        }
        Err(self.error_here("pragma value"))
    }

    /// Parses an optional `ECSQLOPTIONS name[=value] ...` clause.
    pub(super) fn parse_opt_options(&mut self) -> Result<NodeId, ParseError> {
        let Some(keyword) = self.eat_keyword(Keyword::Ecsqloptions) else {
            return Ok(self.arena.empty(RuleTag::OptEcsqloptionsClause));
        };
        let list = self.arena.list(RuleTag::EcsqloptionsList);
        loop {
            let name = self.expect_name()?;
            let option = if self.check(&TokenKind::Eq) {
                let eq = self.punct("=");
                let value = self.parse_option_value()?;
                self.arena.rule(RuleTag::Ecsqloption, [name, eq, value])
            } else {
                self.arena.rule(RuleTag::Ecsqloption, [name])
            };
            self.arena.append(list, option);
            if !self.is_name() {
                break;
            }
        }
        Ok(self.arena.rule(RuleTag::EcsqloptionsClause, [keyword, list]))
    }

    fn parse_option_value(&mut self) -> Result<NodeId, ParseError> {
        match &self.current.kind {
            TokenKind::Integer(_) | TokenKind::Real(_) | TokenKind::ApproxNum(_) => {
                Ok(self.literal())
            }
            TokenKind::Keyword(kw @ (Keyword::True | Keyword::False)) => {
                let kw = *kw;
                Ok(self.keyword_leaf(kw))
            }
            TokenKind::Name(_) | TokenKind::QuotedName(_) => self.expect_name(),
            _ => Err(self.error_here("option value")),
        }
    }

    // Token handling

    pub(super) fn actions(&mut self) -> Actions<'_> {
        Actions {
            arena: &mut self.arena,
            ctx: self.ctx,
        }
    }

    /// Advances to the next token and returns the previous one.
    pub(super) fn advance(&mut self) -> Token {
        let next = self
            .peeked
            .take()
            .unwrap_or_else(|| self.lexer.next_token());
        mem::replace(&mut self.current, next)
    }

    /// The token after the current one.
    pub(super) fn peek(&mut self) -> &Token {
        let lexer = &mut self.lexer;
        self.peeked.get_or_insert_with(|| lexer.next_token())
    }

    /// Re-reads the token after the current one in `mode`.
    pub(super) fn rescan_next(&mut self, mode: LexicalMode) {
        trace!(?mode, offset = self.current.span.end, "switching lexical mode");
        self.peeked = None;
        self.lexer.rescan_from(self.current.span.end, mode);
    }

    /// Checks if the current token is of the given kind.
    pub(super) fn check(&self, kind: &TokenKind) -> bool {
        mem::discriminant(&self.current.kind) == mem::discriminant(kind)
    }

    /// Checks if the current token is the given keyword. Contextual
    /// keywords match unescaped names with the same spelling.
    pub(super) fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current.is_word(keyword)
    }

    /// The keyword the current token spells, reserved or contextual.
    pub(super) fn current_word(&self) -> Option<Keyword> {
        match &self.current.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            TokenKind::Name(name) => Keyword::from_str(name),
            _ => None,
        }
    }

    pub(super) fn is_name(&self) -> bool {
        matches!(
            self.current.kind,
            TokenKind::Name(_) | TokenKind::QuotedName(_)
        )
    }

    /// The source text of the current token.
    pub(super) fn lexeme(&self) -> &'a str {
        self.current.span.slice(self.input)
    }

    /// Builds the error for an unexpected current token.
    pub(super) fn error_here(&self, expected: &str) -> ParseError {
        match &self.current.kind {
            TokenKind::Error(message) => {
                ParseError::lexical(message.as_str(), self.current.span, self.lexeme())
            }
            TokenKind::Eof => ParseError::unexpected_eof(expected, self.current.span),
            _ => ParseError::unexpected(expected, self.lexeme(), self.current.span),
        }
    }

    /// Expects the current token to be the given kind and returns it as a
    /// punctuation leaf.
    pub(super) fn expect(
        &mut self,
        kind: &TokenKind,
        expected: &str,
    ) -> Result<NodeId, ParseError> {
        if self.check(kind) {
            let text = self.lexeme();
            self.advance();
            Ok(self.arena.punct(text))
        } else {
            Err(self.error_here(expected))
        }
    }

    /// Consumes the current token as a punctuation leaf spelled `text`.
    pub(super) fn punct(&mut self, text: &str) -> NodeId {
        self.advance();
        self.arena.punct(text)
    }

    /// Expects the current token to be the given keyword.
    pub(super) fn expect_keyword(&mut self, keyword: Keyword) -> Result<NodeId, ParseError> {
        if self.check_keyword(keyword) {
            Ok(self.keyword_leaf(keyword))
        } else {
            Err(self.error_here(keyword.as_str()))
        }
    }

    pub(super) fn eat_keyword(&mut self, keyword: Keyword) -> Option<NodeId> {
        self.check_keyword(keyword)
            .then(|| self.keyword_leaf(keyword))
    }

    /// The keyword leaf when present, an empty `absent` node otherwise.
    pub(super) fn opt_keyword(&mut self, keyword: Keyword, absent: RuleTag) -> NodeId {
        match self.eat_keyword(keyword) {
            Some(leaf) => leaf,
            None => self.arena.empty(absent),
        }
    }

    /// `NOT` leaf or an empty `sql_not`.
    pub(super) fn opt_not(&mut self) -> NodeId {
        self.opt_keyword(Keyword::Not, RuleTag::SqlNot)
    }

    pub(super) fn keyword_leaf(&mut self, keyword: Keyword) -> NodeId {
        self.advance();
        self.arena.keyword(keyword)
    }

    /// Expects and returns a name leaf.
    pub(super) fn expect_name(&mut self) -> Result<NodeId, ParseError> {
        match &self.current.kind {
            TokenKind::Name(name) | TokenKind::QuotedName(name) => {
                let name = name.clone();
                self.advance();
                Ok(self.arena.name(name))
            }
            _ => Err(self.error_here("name")),
        }
    }

    /// Consumes the current literal token as a leaf.
    pub(super) fn literal(&mut self) -> NodeId {
        let (kind, text) = self.literal_parts();
        self.advance();
        self.arena.literal(kind, text)
    }

    /// Kind and leaf text of the current literal token. Numbers keep their
    /// source spelling.
    pub(super) fn literal_parts(&self) -> (LiteralKind, String) {
        match &self.current.kind {
            TokenKind::String(value) => (LiteralKind::String, value.clone()),
            TokenKind::DateTime(value) => (LiteralKind::DateTime, value.clone()),
            TokenKind::Real(text) => (LiteralKind::Real, text.clone()),
            TokenKind::ApproxNum(text) => (LiteralKind::ApproxNum, text.clone()),
            TokenKind::Integer(text) => (LiteralKind::Integer, text.clone()),
            _ => (LiteralKind::String, self.lexeme().to_string()),
        }
    }

    /// Parses `item (',' item)*` into a comma list tagged `tag`. With
    /// `semicolons`, shorthand mode also accepts `;` between items.
    pub(super) fn parse_comma_list(
        &mut self,
        tag: RuleTag,
        semicolons: bool,
        mut item: impl FnMut(&mut Self) -> Result<NodeId, ParseError>,
    ) -> Result<NodeId, ParseError> {
        let list = self.arena.comma_list(tag);
        loop {
            let node = item(self)?;
            self.arena.append(list, node);
            let separator = self.check(&TokenKind::Comma)
                || (semicolons
                    && self.ctx.shorthand_predicate_allowed
                    && self.check(&TokenKind::Semicolon));
            if !separator {
                break;
            }
            self.advance();
        }
        Ok(list)
    }

    /// Runs `f` one nesting level deeper.
    pub(super) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= self.ctx.max_depth {
            return Err(ParseError::syntax(
                "statement is nested too deeply",
                self.current.span,
                self.lexeme(),
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}

/// Parses one statement with `ctx`.
///
/// On failure the diagnostic is also reported to the context's sink.
///
/// # Errors
///
/// Returns a `ParseError` if the input is not a valid statement.
pub fn parse(text: &str, ctx: &mut ParseContext) -> Result<ParseTree, ParseError> {
    let result = Parser::new(text, ctx).parse_statement();
    if let Err(error) = &result {
        debug!(error = %error, "ECSQL parse failed");
        ctx.report(error);
    }
    result
}
