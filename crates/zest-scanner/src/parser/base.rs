//! Token-level parser helpers: consuming tokens, the context stack, type
//! contexts, scopes and speculation.

use super::Parser;
use crate::keywords::ContextualKeyword;
use crate::token::{ContextFrame, ContextKind, IdentifierRole, Scope, Token};
use crate::token_type::TokenType;
use zest_common::{Result, TransformError};

/// The token after the current one, read without consuming anything.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Lookahead {
    pub token_type: TokenType,
    pub contextual_keyword: ContextualKeyword,
    pub start: u32,
}

impl<'a> Parser<'a> {
    // ===== Consuming tokens =====

    /// Append the current token to the token array, pairing brackets on the
    /// way through.
    pub(crate) fn push_token(&mut self) -> Result<()> {
        let state = &self.state;
        let mut token = Token::new(
            state.token_type,
            state.contextual_keyword,
            state.start,
            state.end,
            state.scope_depth,
            state.is_type,
        );
        let index = self.state.tokens.len();
        if token.token_type.is_opener() {
            let id = self.state.next_context_id;
            self.state.next_context_id += 1;
            let kind = match token.token_type {
                TokenType::PAREN_L => ContextKind::Paren,
                TokenType::BRACKET_L => ContextKind::Bracket,
                TokenType::DOLLAR_BRACE_L => ContextKind::Template,
                _ => ContextKind::Brace,
            };
            self.state.context_stack.push(ContextFrame {
                kind,
                token_index: index,
                id,
            });
            token.context_id = Some(id);
        } else if token.token_type.is_closer() {
            let Some(frame) = self.state.context_stack.pop() else {
                return Err(self.unexpected());
            };
            let opener = self.state.tokens[frame.token_index].token_type;
            let pairs = matches!(
                (opener, token.token_type),
                (TokenType::PAREN_L, TokenType::PAREN_R)
                    | (TokenType::BRACKET_L, TokenType::BRACKET_R)
                    | (TokenType::BRACE_L, TokenType::BRACE_R)
                    | (TokenType::DOLLAR_BRACE_L, TokenType::BRACE_R)
                    | (TokenType::BRACE_BAR_L, TokenType::BRACE_BAR_R)
            );
            if !pairs {
                return Err(TransformError::unexpected_token(
                    self.input,
                    token.start,
                    format!("Mismatched '{}' closing '{}'", token.token_type, opener),
                ));
            }
            token.context_id = Some(frame.id);
        }
        self.state.tokens.push(token);
        Ok(())
    }

    /// Consume the current token and read the next one.
    pub(crate) fn next(&mut self) -> Result<()> {
        self.push_token()?;
        self.next_token()
    }

    /// Consume the current token, then read a template chunk.
    pub(crate) fn next_template_token(&mut self) -> Result<()> {
        self.push_token()?;
        self.read_template_token()
    }

    #[inline]
    pub(crate) fn is(&self, token_type: TokenType) -> bool {
        self.state.token_type == token_type
    }

    pub(crate) fn eat(&mut self, token_type: TokenType) -> Result<bool> {
        if self.is(token_type) {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn expect(&mut self, token_type: TokenType) -> Result<()> {
        if self.eat(token_type)? {
            Ok(())
        } else {
            Err(self.unexpected_expected(token_type))
        }
    }

    pub(crate) fn is_contextual(&self, keyword: ContextualKeyword) -> bool {
        self.state.token_type == TokenType::NAME && self.state.contextual_keyword == keyword
    }

    pub(crate) fn eat_contextual(&mut self, keyword: ContextualKeyword) -> Result<bool> {
        if self.is_contextual(keyword) {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn expect_contextual(&mut self, keyword: ContextualKeyword) -> Result<()> {
        if self.eat_contextual(keyword)? {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    /// Consume a `>` closing a type argument or parameter list.
    pub(crate) fn expect_gt(&mut self) -> Result<()> {
        self.rescan_gt();
        self.expect(TokenType::GREATER_THAN)
    }

    // ===== Line breaks and semicolons =====

    fn prev_token_end(&self) -> u32 {
        self.state.tokens.last().map_or(0, |t| t.end)
    }

    pub(crate) fn has_preceding_line_break(&self) -> bool {
        let from = self.prev_token_end() as usize;
        let to = self.state.start as usize;
        self.bytes
            .get(from..to.max(from))
            .is_some_and(|gap| gap.iter().any(|&b| b == b'\n' || b == b'\r'))
    }

    pub(crate) fn has_following_line_break(&mut self) -> Result<bool> {
        let next_start = self.lookahead()?.start as usize;
        let from = self.state.end as usize;
        Ok(self
            .bytes
            .get(from..next_start.max(from))
            .is_some_and(|gap| gap.iter().any(|&b| b == b'\n' || b == b'\r')))
    }

    pub(crate) fn can_insert_semicolon(&self) -> bool {
        self.is(TokenType::EOF) || self.is(TokenType::BRACE_R) || self.has_preceding_line_break()
    }

    pub(crate) fn is_line_terminator(&mut self) -> Result<bool> {
        Ok(self.eat(TokenType::SEMI)? || self.can_insert_semicolon())
    }

    pub(crate) fn semicolon(&mut self) -> Result<()> {
        if self.is_line_terminator()? {
            Ok(())
        } else {
            Err(self.unexpected_expected(TokenType::SEMI))
        }
    }

    // ===== Lookahead =====

    pub(crate) fn lookahead(&mut self) -> Result<Lookahead> {
        let saved = (
            self.state.pos,
            self.state.start,
            self.state.end,
            self.state.token_type,
            self.state.contextual_keyword,
        );
        self.state.pos = self.state.end;
        let result = self.next_token().map(|()| Lookahead {
            token_type: self.state.token_type,
            contextual_keyword: self.state.contextual_keyword,
            start: self.state.start,
        });
        self.state.pos = saved.0;
        self.state.start = saved.1;
        self.state.end = saved.2;
        self.state.token_type = saved.3;
        self.state.contextual_keyword = saved.4;
        result
    }

    pub(crate) fn lookahead_type(&mut self) -> Result<TokenType> {
        Ok(self.lookahead()?.token_type)
    }

    pub(crate) fn is_lookahead_contextual(&mut self, keyword: ContextualKeyword) -> Result<bool> {
        let next = self.lookahead()?;
        Ok(next.token_type == TokenType::NAME && next.contextual_keyword == keyword)
    }

    // ===== Errors =====

    pub(crate) fn unexpected(&self) -> TransformError {
        if self.is(TokenType::EOF) {
            return TransformError::unexpected_token(self.input, self.state.start, "Unexpected end of input");
        }
        TransformError::unexpected_token(
            self.input,
            self.state.start,
            format!("Unexpected token '{}'", self.current_text()),
        )
    }

    pub(crate) fn unexpected_expected(&self, expected: TokenType) -> TransformError {
        TransformError::unexpected_token(
            self.input,
            self.state.start,
            format!("Expected '{}' but found '{}'", expected, self.current_text()),
        )
    }

    /// Error for an unreadable character at the lexer position.
    pub(crate) fn unexpected_here(&self) -> TransformError {
        TransformError::unexpected_token(self.input, self.state.pos, "Unexpected character in JSX tag")
    }

    fn current_text(&self) -> &str {
        if self.is(TokenType::EOF) {
            return "end of input";
        }
        self.input
            .get(self.state.start as usize..self.state.end as usize)
            .unwrap_or("")
    }

    // ===== Annotations =====

    pub(crate) fn last_token_mut(&mut self) -> Option<&mut Token> {
        self.state.tokens.last_mut()
    }

    pub(crate) fn set_last_role(&mut self, role: IdentifierRole) {
        if let Some(token) = self.last_token_mut() {
            token.identifier_role = Some(role);
        }
    }

    /// Give the last token a more specific type. A retyped word is no
    /// longer an identifier.
    pub(crate) fn retype_last(&mut self, token_type: TokenType) {
        if let Some(token) = self.last_token_mut() {
            token.token_type = token_type;
            token.identifier_role = None;
        }
    }

    /// Classify the innermost open bracket.
    pub(crate) fn set_context_kind(&mut self, kind: ContextKind) {
        if let Some(frame) = self.state.context_stack.last_mut() {
            frame.kind = kind;
        }
    }

    /// Mark the last `existing` tokens and everything read until the matching
    /// `pop_type_context` as type-only. Returns the previous flag.
    pub(crate) fn push_type_context(&mut self, existing: usize) -> bool {
        let len = self.state.tokens.len();
        for token in &mut self.state.tokens[len.saturating_sub(existing)..] {
            token.is_type = true;
        }
        let old = self.state.is_type;
        self.state.is_type = true;
        old
    }

    pub(crate) fn pop_type_context(&mut self, old: bool) {
        self.state.is_type = old;
    }

    pub(crate) fn push_scope(&mut self, start_token_index: usize, is_function_scope: bool) {
        self.state.scopes.push(Scope {
            start_token_index,
            end_token_index: self.state.tokens.len(),
            is_function_scope,
        });
    }

    /// Mark the previous identifier as a binding in the current scope.
    pub(crate) fn mark_prior_binding_identifier(&mut self, is_block_scope: bool) {
        let role = if self.state.scope_depth == 0 {
            IdentifierRole::TopLevelDeclaration
        } else if is_block_scope {
            IdentifierRole::BlockScopedDeclaration
        } else {
            IdentifierRole::FunctionScopedDeclaration
        };
        self.set_last_role(role);
    }

    // ===== Speculation =====

    /// Run `attempt`; if it fails or reports `false`, rewind as if it never
    /// ran.
    pub(crate) fn try_parse<F>(&mut self, attempt: F) -> Result<bool>
    where
        F: FnOnce(&mut Self) -> Result<bool>,
    {
        let snapshot = self.state.snapshot();
        match attempt(self) {
            Ok(true) => Ok(true),
            Ok(false) | Err(_) => {
                self.state.restore(snapshot);
                Ok(false)
            }
        }
    }

    /// Consume a name, treating keywords as plain names.
    pub(crate) fn parse_identifier(&mut self) -> Result<()> {
        if !self.is(TokenType::NAME) && !self.state.token_type.is_keyword() && !self.is_retyped_word() {
            return Err(self.unexpected());
        }
        self.state.token_type = TokenType::NAME;
        self.next()
    }

    /// Contextual words the parser may have retyped on the current token.
    pub(crate) fn is_retyped_word(&self) -> bool {
        self.state.token_type.index() >= TokenType::ASYNC.index()
    }

    pub(crate) fn parse_binding_identifier(&mut self, is_block_scope: bool) -> Result<()> {
        self.parse_identifier()?;
        self.mark_prior_binding_identifier(is_block_scope);
        Ok(())
    }
}
