//! Statements, declarations, classes and module syntax.

use super::Parser;
use crate::keywords::ContextualKeyword;
use crate::token::{ContextKind, IdentifierRole};
use crate::token_type::TokenType;
use zest_common::{Result, TransformError};

impl<'a> Parser<'a> {
    pub(crate) fn parse_top_level(&mut self) -> Result<()> {
        self.next_token()?;
        while !self.is(TokenType::EOF) {
            self.parse_statement(true)?;
        }
        if let Some(frame) = self.state.context_stack.last() {
            let start = self.state.tokens[frame.token_index].start;
            return Err(TransformError::unexpected_token(
                self.input,
                start,
                "Unterminated bracket at end of input",
            ));
        }
        self.push_scope(0, true);
        Ok(())
    }

    pub(crate) fn parse_statement(&mut self, declaration: bool) -> Result<()> {
        if self.is(TokenType::AT) {
            self.parse_decorators()?;
        }
        self.parse_statement_content(declaration)
    }

    fn parse_statement_content(&mut self, declaration: bool) -> Result<()> {
        if self.is_typescript() {
            if self.ts_try_parse_statement_content()? {
                return Ok(());
            }
        } else if self.is_flow() && self.flow_try_parse_statement()? {
            return Ok(());
        }

        let start_type = self.state.token_type;
        match start_type {
            TokenType::BREAK | TokenType::CONTINUE => return self.parse_break_continue_statement(),
            TokenType::DEBUGGER => {
                self.next()?;
                return self.semicolon();
            }
            TokenType::DO => return self.parse_do_statement(),
            TokenType::FOR => return self.parse_for_statement(),
            TokenType::FUNCTION => {
                if self.lookahead_type()? != TokenType::DOT {
                    if !declaration {
                        return Err(self.unexpected());
                    }
                    let function_start = self.state.start;
                    self.next()?;
                    return self.parse_function(function_start, true, false);
                }
            }
            TokenType::CLASS => {
                if !declaration {
                    return Err(self.unexpected());
                }
                return self.parse_class(true, false);
            }
            TokenType::IF => return self.parse_if_statement(),
            TokenType::RETURN => {
                self.next()?;
                if !self.is_line_terminator()? {
                    self.parse_expression(false)?;
                    self.semicolon()?;
                }
                return Ok(());
            }
            TokenType::SWITCH => return self.parse_switch_statement(),
            TokenType::THROW => {
                self.next()?;
                self.parse_expression(false)?;
                return self.semicolon();
            }
            TokenType::TRY => return self.parse_try_statement(),
            TokenType::LET | TokenType::CONST | TokenType::VAR => {
                if start_type != TokenType::VAR && !declaration {
                    return Err(self.unexpected());
                }
                return self.parse_var_statement(start_type != TokenType::VAR);
            }
            TokenType::WHILE | TokenType::WITH => {
                self.next()?;
                self.parse_paren_expression()?;
                return self.parse_statement(false);
            }
            TokenType::BRACE_L => return self.parse_block(false),
            TokenType::SEMI => return self.next(),
            TokenType::EXPORT | TokenType::IMPORT => {
                let next_type = self.lookahead_type()?;
                if next_type != TokenType::PAREN_L && next_type != TokenType::DOT {
                    self.next()?;
                    return if start_type == TokenType::IMPORT {
                        self.parse_import()
                    } else {
                        self.parse_export()
                    };
                }
            }
            TokenType::NAME => {
                if self.parse_contextual_statement()? {
                    return Ok(());
                }
            }
            _ => {}
        }

        // Expression statement or label.
        let initial_len = self.state.tokens.len();
        self.parse_expression(false)?;
        let simple_name = if self.state.tokens.len() == initial_len + 1 {
            self.state
                .tokens
                .last()
                .filter(|t| t.token_type == TokenType::NAME)
                .map(|t| t.contextual_keyword)
        } else {
            None
        };
        let Some(keyword) = simple_name else {
            return self.semicolon();
        };
        if self.eat(TokenType::COLON)? {
            return self.parse_statement(true);
        }
        self.parse_identifier_statement(keyword)
    }

    /// `async function`, `using x`, `await using x`.
    fn parse_contextual_statement(&mut self) -> Result<bool> {
        match self.state.contextual_keyword {
            ContextualKeyword::Async => {
                let function_start = self.state.start;
                let matched = self.try_parse(|p| {
                    p.next()?;
                    if p.is(TokenType::FUNCTION) && !p.can_insert_semicolon() {
                        p.retype_last(TokenType::ASYNC);
                        p.next()?;
                        p.parse_function(function_start, true, false)?;
                        return Ok(true);
                    }
                    Ok(false)
                })?;
                Ok(matched)
            }
            ContextualKeyword::Using => {
                if !self.has_following_line_break()? && self.lookahead_type()? == TokenType::NAME {
                    self.parse_var_statement(true)?;
                    return Ok(true);
                }
                Ok(false)
            }
            ContextualKeyword::Await => {
                if self.starts_await_using()? {
                    self.next()?;
                    self.parse_var_statement(true)?;
                    return Ok(true);
                }
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    fn starts_await_using(&mut self) -> Result<bool> {
        if !self.is_contextual(ContextualKeyword::Await) {
            return Ok(false);
        }
        let snapshot = self.state.snapshot();
        let result = (|| -> Result<bool> {
            self.next()?;
            if !self.is_contextual(ContextualKeyword::Using) || self.has_preceding_line_break() {
                return Ok(false);
            }
            self.next()?;
            Ok(self.is(TokenType::NAME) && !self.has_preceding_line_break())
        })();
        self.state.restore(snapshot);
        Ok(result.unwrap_or(false))
    }

    fn parse_identifier_statement(&mut self, keyword: ContextualKeyword) -> Result<()> {
        if self.is_typescript() {
            if self.ts_parse_expression_statement(keyword)? {
                return Ok(());
            }
        } else if self.is_flow() && self.flow_parse_identifier_statement(keyword)? {
            return Ok(());
        }
        self.semicolon()
    }

    fn parse_break_continue_statement(&mut self) -> Result<()> {
        self.next()?;
        if !self.is_line_terminator()? {
            self.parse_identifier()?;
            self.semicolon()?;
        }
        Ok(())
    }

    fn parse_do_statement(&mut self) -> Result<()> {
        self.next()?;
        self.parse_statement(false)?;
        self.expect(TokenType::WHILE)?;
        self.parse_paren_expression()?;
        self.eat(TokenType::SEMI)?;
        Ok(())
    }

    fn parse_if_statement(&mut self) -> Result<()> {
        self.next()?;
        self.parse_paren_expression()?;
        self.parse_statement(false)?;
        if self.eat(TokenType::ELSE)? {
            self.parse_statement(false)?;
        }
        Ok(())
    }

    pub(crate) fn parse_paren_expression(&mut self) -> Result<()> {
        self.expect(TokenType::PAREN_L)?;
        self.parse_expression(false)?;
        self.expect(TokenType::PAREN_R)
    }

    fn parse_for_statement(&mut self) -> Result<()> {
        self.state.scope_depth += 1;
        let start_token_index = self.state.tokens.len();
        self.parse_ambiguous_for_statement()?;
        self.push_scope(start_token_index, false);
        self.state.scope_depth -= 1;
        Ok(())
    }

    fn parse_ambiguous_for_statement(&mut self) -> Result<()> {
        self.next()?;
        let mut for_await = false;
        if self.is_contextual(ContextualKeyword::Await) {
            for_await = true;
            self.next()?;
        }
        self.expect(TokenType::PAREN_L)?;
        if self.is(TokenType::SEMI) {
            if for_await {
                return Err(self.unexpected());
            }
            return self.parse_for();
        }
        let is_await_using = self.starts_await_using()?;
        let is_using = self.is_contextual(ContextualKeyword::Using)
            && self.lookahead_type()? == TokenType::NAME
            && !self.is_lookahead_contextual(ContextualKeyword::Of)?;
        if is_await_using
            || is_using
            || self.is(TokenType::VAR)
            || self.is(TokenType::LET)
            || self.is(TokenType::CONST)
        {
            if is_await_using {
                self.next()?;
            }
            let is_block_scope = !self.is(TokenType::VAR);
            self.next()?;
            self.parse_var(true, is_block_scope)?;
        } else {
            self.parse_expression(true)?;
        }
        if self.is(TokenType::IN) || self.is_contextual(ContextualKeyword::Of) {
            self.next()?;
            self.parse_expression(false)?;
            self.expect(TokenType::PAREN_R)?;
            return self.parse_statement(false);
        }
        self.parse_for()
    }

    fn parse_for(&mut self) -> Result<()> {
        self.expect(TokenType::SEMI)?;
        if !self.is(TokenType::SEMI) {
            self.parse_expression(false)?;
        }
        self.expect(TokenType::SEMI)?;
        if !self.is(TokenType::PAREN_R) {
            self.parse_expression(false)?;
        }
        self.expect(TokenType::PAREN_R)?;
        self.parse_statement(false)
    }

    fn parse_switch_statement(&mut self) -> Result<()> {
        self.next()?;
        self.parse_paren_expression()?;
        let start_token_index = self.state.tokens.len();
        self.expect(TokenType::BRACE_L)?;
        self.set_context_kind(ContextKind::Block);
        self.state.scope_depth += 1;
        while !self.is(TokenType::BRACE_R) {
            if self.is(TokenType::EOF) {
                return Err(self.unexpected());
            }
            if self.is(TokenType::CASE) || self.is(TokenType::DEFAULT) {
                let is_case = self.is(TokenType::CASE);
                self.next()?;
                if is_case {
                    self.parse_expression(false)?;
                }
                self.expect(TokenType::COLON)?;
            } else {
                self.parse_statement(true)?;
            }
        }
        self.next()?;
        self.push_scope(start_token_index, false);
        self.state.scope_depth -= 1;
        Ok(())
    }

    fn parse_try_statement(&mut self) -> Result<()> {
        self.next()?;
        self.parse_block(false)?;
        if self.is(TokenType::CATCH) {
            self.next()?;
            let mut binding_start = None;
            if self.is(TokenType::PAREN_L) {
                self.state.scope_depth += 1;
                binding_start = Some(self.state.tokens.len());
                self.expect(TokenType::PAREN_L)?;
                self.parse_binding_atom(true)?;
                if self.is_typescript() {
                    self.ts_try_parse_type_annotation()?;
                } else if self.is_flow() && self.is(TokenType::COLON) {
                    self.flow_parse_type_annotation()?;
                }
                self.expect(TokenType::PAREN_R)?;
            }
            self.parse_block(false)?;
            if let Some(start) = binding_start {
                self.push_scope(start, false);
                self.state.scope_depth -= 1;
            }
        }
        if self.eat(TokenType::FINALLY)? {
            self.parse_block(false)?;
        }
        Ok(())
    }

    pub(crate) fn parse_var_statement(&mut self, is_block_scope: bool) -> Result<()> {
        self.next()?;
        self.parse_var(false, is_block_scope)?;
        self.semicolon()
    }

    pub(crate) fn parse_var(&mut self, is_for: bool, is_block_scope: bool) -> Result<()> {
        loop {
            self.parse_binding_atom(is_block_scope)?;
            if self.is_typescript() {
                self.ts_after_parse_var_head()?;
            } else if self.is_flow() && self.is(TokenType::COLON) {
                self.flow_parse_type_annotation()?;
            }
            if self.eat(TokenType::EQ)? {
                let eq_index = self.state.tokens.len() - 1;
                self.parse_maybe_assign(is_for)?;
                self.state.tokens[eq_index].rhs_end_index = Some(self.state.tokens.len());
            }
            if !self.eat(TokenType::COMMA)? {
                return Ok(());
            }
        }
    }

    pub(crate) fn parse_block(&mut self, is_function_scope: bool) -> Result<()> {
        let start_token_index = self.state.tokens.len();
        self.state.scope_depth += 1;
        self.expect(TokenType::BRACE_L)?;
        self.set_context_kind(ContextKind::Block);
        self.parse_block_body(TokenType::BRACE_R)?;
        self.push_scope(start_token_index, is_function_scope);
        self.state.scope_depth -= 1;
        Ok(())
    }

    pub(crate) fn parse_block_body(&mut self, end: TokenType) -> Result<()> {
        while !self.is(end) {
            if self.is(TokenType::EOF) {
                return Err(self.unexpected());
            }
            self.parse_statement(true)?;
        }
        self.next()
    }

    // ===== Functions =====

    pub(crate) fn parse_function(
        &mut self,
        function_start: u32,
        is_statement: bool,
        optional_id: bool,
    ) -> Result<()> {
        if self.is(TokenType::STAR) {
            self.next()?;
        }
        let has_name = self.is(TokenType::NAME) || self.is(TokenType::YIELD);
        if is_statement && !optional_id && !has_name {
            return Err(self.unexpected());
        }
        let mut name_scope_start = None;
        if has_name {
            if !is_statement {
                name_scope_start = Some(self.state.tokens.len());
                self.state.scope_depth += 1;
            }
            self.parse_binding_identifier(false)?;
        }
        let start_token_index = self.state.tokens.len();
        self.state.scope_depth += 1;
        self.parse_function_params(false)?;
        self.parse_function_body_and_finish(function_start)?;
        self.push_scope(start_token_index, true);
        self.state.scope_depth -= 1;
        if let Some(start) = name_scope_start {
            self.push_scope(start, true);
            self.state.scope_depth -= 1;
        }
        Ok(())
    }

    pub(crate) fn parse_function_params(&mut self, allow_modifiers: bool) -> Result<()> {
        if self.is_typescript() {
            self.ts_try_parse_type_parameters()?;
        } else if self.is_flow() && self.is(TokenType::LESS_THAN) {
            self.flow_parse_type_parameter_declaration()?;
        }
        self.expect(TokenType::PAREN_L)?;
        self.parse_binding_list(TokenType::PAREN_R, false, false, allow_modifiers)
    }

    pub(crate) fn parse_function_body_and_finish(&mut self, function_start: u32) -> Result<()> {
        if self.is_typescript() {
            return self.ts_parse_function_body_and_finish(function_start);
        }
        if self.is_flow() && self.is(TokenType::COLON) {
            self.flow_parse_type_and_predicate_annotation()?;
        }
        self.parse_function_body(false)
    }

    pub(crate) fn parse_function_body(&mut self, is_arrow: bool) -> Result<()> {
        if is_arrow && !self.is(TokenType::BRACE_L) {
            self.parse_maybe_assign(false)
        } else {
            self.parse_block(true)
        }
    }

    // ===== Decorators =====

    pub(crate) fn parse_decorators(&mut self) -> Result<()> {
        while self.is(TokenType::AT) {
            self.parse_decorator()?;
        }
        Ok(())
    }

    fn parse_decorator(&mut self) -> Result<()> {
        self.next()?;
        if self.eat(TokenType::PAREN_L)? {
            self.parse_expression(false)?;
            return self.expect(TokenType::PAREN_R);
        }
        self.parse_identifier()?;
        self.set_last_role(IdentifierRole::Access);
        while self.eat(TokenType::DOT)? {
            self.parse_identifier()?;
        }
        if self.is_typescript() && self.is(TokenType::LESS_THAN) {
            self.ts_parse_type_arguments()?;
        }
        if self.eat(TokenType::PAREN_L)? {
            self.parse_call_expression_arguments()?;
        }
        Ok(())
    }

    // ===== Classes =====

    pub(crate) fn parse_class(&mut self, is_statement: bool, optional_id: bool) -> Result<()> {
        let class_index = self.state.tokens.len();
        self.next()?;
        self.state.tokens[class_index].is_expression = !is_statement;

        let mut name_scope_start = None;
        if !is_statement {
            name_scope_start = Some(self.state.tokens.len());
            self.state.scope_depth += 1;
        }
        self.parse_class_id(is_statement, optional_id)?;
        self.parse_class_super()?;
        let body_index = self.state.tokens.len();
        self.parse_class_body()?;
        // The class keyword carries its body's id so the class can be
        // navigated without re-scanning the header.
        self.state.tokens[class_index].context_id = self.state.tokens[body_index].context_id;
        if let Some(start) = name_scope_start {
            self.push_scope(start, false);
            self.state.scope_depth -= 1;
        }
        Ok(())
    }

    fn parse_class_id(&mut self, is_statement: bool, optional_id: bool) -> Result<()> {
        if self.is_typescript()
            && (!is_statement || optional_id)
            && self.is_contextual(ContextualKeyword::Implements)
        {
            return Ok(());
        }
        if self.is(TokenType::NAME) {
            self.parse_binding_identifier(true)?;
        }
        if self.is_typescript() {
            self.ts_try_parse_type_parameters()?;
        } else if self.is_flow() && self.is(TokenType::LESS_THAN) {
            self.flow_parse_type_parameter_declaration()?;
        }
        Ok(())
    }

    fn parse_class_super(&mut self) -> Result<()> {
        let has_super = self.eat(TokenType::EXTENDS)?;
        if has_super {
            self.parse_expr_subscripts()?;
        }
        if self.is_typescript() {
            self.ts_after_parse_class_super(has_super)
        } else if self.is_flow() {
            self.flow_after_parse_class_super(has_super)
        } else {
            Ok(())
        }
    }

    fn parse_class_body(&mut self) -> Result<()> {
        self.expect(TokenType::BRACE_L)?;
        self.set_context_kind(ContextKind::ClassBody);
        loop {
            if self.eat(TokenType::BRACE_R)? {
                return Ok(());
            }
            if self.is(TokenType::EOF) {
                return Err(self.unexpected());
            }
            if self.eat(TokenType::SEMI)? {
                continue;
            }
            if self.is(TokenType::AT) {
                self.parse_decorator()?;
                continue;
            }
            let member_start = self.state.start;
            self.parse_class_member(member_start)?;
        }
    }

    fn parse_class_member(&mut self, member_start: u32) -> Result<()> {
        if self.is_typescript() {
            self.ts_parse_modifiers(&[
                ContextualKeyword::Declare,
                ContextualKeyword::Public,
                ContextualKeyword::Protected,
                ContextualKeyword::Private,
                ContextualKeyword::Override,
            ])?;
        }
        let mut is_static = false;
        if self.is_contextual(ContextualKeyword::Static) {
            self.parse_identifier()?;
            if self.is_class_method() {
                return self.parse_class_method(member_start, false);
            }
            if self.is_class_property() {
                return self.parse_class_property();
            }
            self.retype_last(TokenType::STATIC);
            is_static = true;
            if self.is(TokenType::BRACE_L) {
                return self.parse_block(false);
            }
        }
        self.parse_class_member_with_is_static(member_start, is_static)
    }

    fn parse_class_member_with_is_static(&mut self, member_start: u32, is_static: bool) -> Result<()> {
        if self.is_typescript() && self.ts_try_parse_class_member_with_is_static(is_static)? {
            return Ok(());
        }
        if self.eat(TokenType::STAR)? {
            self.parse_property_name()?;
            return self.parse_class_method(member_start, false);
        }
        self.parse_property_name()?;
        let Some(name_token) = self.state.tokens.last().copied() else {
            return Err(self.unexpected());
        };
        let keyword = if name_token.token_type == TokenType::NAME {
            name_token.contextual_keyword
        } else {
            ContextualKeyword::None
        };
        let is_constructor = keyword == ContextualKeyword::Constructor
            || (name_token.token_type == TokenType::STRING
                && name_token.text(self.input).get(1..name_token.text(self.input).len().saturating_sub(1))
                    == Some("constructor"));
        self.parse_post_member_name_modifiers()?;

        if self.is_class_method() {
            return self.parse_class_method(member_start, is_constructor);
        }
        if self.is_class_property() {
            return self.parse_class_property();
        }
        match keyword {
            ContextualKeyword::Async if !self.is_line_terminator()? => {
                self.retype_last(TokenType::ASYNC);
                self.eat(TokenType::STAR)?;
                self.parse_property_name()?;
                self.parse_post_member_name_modifiers()?;
                self.parse_class_method(member_start, false)
            }
            ContextualKeyword::Get | ContextualKeyword::Set
                if !(self.has_preceding_line_break() && self.is(TokenType::STAR)) =>
            {
                self.retype_last(if keyword == ContextualKeyword::Get {
                    TokenType::GET
                } else {
                    TokenType::SET
                });
                self.parse_property_name()?;
                self.parse_class_method(member_start, false)
            }
            ContextualKeyword::Accessor if !self.has_preceding_line_break() => {
                self.retype_last(TokenType::ACCESSOR);
                self.parse_property_name()?;
                self.parse_class_property()
            }
            _ if self.can_insert_semicolon() => self.parse_class_property(),
            _ => Err(self.unexpected()),
        }
    }

    fn is_class_method(&self) -> bool {
        self.is(TokenType::PAREN_L) || self.is(TokenType::LESS_THAN)
    }

    fn is_class_property(&self) -> bool {
        self.is(TokenType::EQ)
            || self.is(TokenType::SEMI)
            || self.is(TokenType::BRACE_R)
            || self.is(TokenType::BANG)
            || self.is(TokenType::COLON)
    }

    fn parse_post_member_name_modifiers(&mut self) -> Result<()> {
        if self.is_typescript() || self.is_flow() {
            let old = self.push_type_context(0);
            self.eat(TokenType::QUESTION)?;
            self.pop_type_context(old);
        }
        Ok(())
    }

    fn parse_class_method(&mut self, function_start: u32, is_constructor: bool) -> Result<()> {
        self.parse_method(function_start, is_constructor)
    }

    /// Parameters and body of a method, object method or accessor.
    pub(crate) fn parse_method(&mut self, function_start: u32, is_constructor: bool) -> Result<()> {
        self.state.scope_depth += 1;
        let start_token_index = self.state.tokens.len();
        self.parse_function_params(is_constructor)?;
        self.parse_function_body_and_finish(function_start)?;
        self.push_scope(start_token_index, true);
        self.state.scope_depth -= 1;
        Ok(())
    }

    fn parse_class_property(&mut self) -> Result<()> {
        if self.is_typescript() {
            let old = self.push_type_context(0);
            self.eat(TokenType::BANG)?;
            self.pop_type_context(old);
            self.ts_try_parse_type_annotation()?;
        } else if self.is_flow() && self.is(TokenType::COLON) {
            self.flow_parse_type_annotation()?;
        }
        if self.is(TokenType::EQ) {
            let eq_index = self.state.tokens.len();
            self.next()?;
            self.parse_maybe_assign(false)?;
            self.state.tokens[eq_index].rhs_end_index = Some(self.state.tokens.len());
        }
        self.semicolon()
    }

    // ===== Imports =====

    pub(crate) fn parse_import(&mut self) -> Result<()> {
        if self.is_typescript() && self.is(TokenType::NAME) && self.lookahead_type()? == TokenType::EQ {
            return self.ts_parse_import_equals_declaration();
        }
        let type_word = self.is_contextual(ContextualKeyword::Type)
            || (self.is_flow() && self.is(TokenType::TYPEOF));
        if (self.is_typescript() || self.is_flow()) && type_word {
            let next = self.lookahead()?;
            let is_type_import = match next.token_type {
                TokenType::NAME => next.contextual_keyword != ContextualKeyword::From,
                TokenType::STAR | TokenType::BRACE_L => true,
                _ => false,
            };
            if is_type_import {
                // The whole statement is erased, `import` included.
                let old = self.push_type_context(1);
                self.next()?;
                let result = if self.is_typescript() && self.lookahead_type()? == TokenType::EQ {
                    self.ts_parse_import_equals_declaration()
                } else {
                    self.parse_import_rest()
                };
                self.pop_type_context(old);
                return result;
            }
        }
        self.parse_import_rest()
    }

    fn parse_import_rest(&mut self) -> Result<()> {
        if self.is(TokenType::STRING) {
            self.next()?;
        } else {
            self.parse_import_specifiers()?;
            self.expect_contextual(ContextualKeyword::From)?;
            self.expect(TokenType::STRING)?;
        }
        self.maybe_parse_import_attributes()?;
        self.semicolon()
    }

    /// `with { type: "json" }` or the older `assert { ... }`.
    pub(crate) fn maybe_parse_import_attributes(&mut self) -> Result<()> {
        if self.is(TokenType::WITH)
            || (self.is_contextual(ContextualKeyword::Assert) && !self.has_preceding_line_break())
        {
            self.next()?;
            self.parse_obj(false, false)?;
        }
        Ok(())
    }

    fn parse_import_specifiers(&mut self) -> Result<()> {
        if self.is(TokenType::NAME) {
            self.parse_identifier()?;
            self.set_last_role(IdentifierRole::ImportDeclaration);
            if !self.eat(TokenType::COMMA)? {
                return Ok(());
            }
        }
        if self.is(TokenType::STAR) {
            self.next()?;
            self.expect_contextual(ContextualKeyword::As)?;
            self.parse_identifier()?;
            self.set_last_role(IdentifierRole::ImportDeclaration);
            return Ok(());
        }
        self.expect(TokenType::BRACE_L)?;
        let mut first = true;
        while !self.eat(TokenType::BRACE_R)? {
            if first {
                first = false;
            } else {
                self.expect(TokenType::COMMA)?;
                if self.eat(TokenType::BRACE_R)? {
                    break;
                }
            }
            self.parse_module_specifier(true)?;
        }
        Ok(())
    }

    /// One `{...}` entry of an import or export: `a`, `a as b`, `"a" as b`
    /// and, in typed dialects, `type a` / `type a as b` (and Flow's
    /// `typeof a`). The entry is told apart by how many words it has; the
    /// type-only forms are marked as types.
    fn parse_module_specifier(&mut self, is_import: bool) -> Result<()> {
        let (local_role, remote_role) = if is_import {
            (IdentifierRole::ImportDeclaration, IdentifierRole::ImportAccess)
        } else {
            (IdentifierRole::ExportAccess, IdentifierRole::ExportAccess)
        };
        let first = self.state.tokens.len();
        self.parse_module_export_name()?;
        if self.is_specifier_end() {
            // {a}
            self.set_name_role(first, local_role);
            return Ok(());
        }
        self.parse_module_export_name()?;
        if self.is_specifier_end() {
            // {type a}
            if !self.is_type_word(first) {
                return Err(self.unexpected());
            }
            self.mark_types_from(first);
            return Ok(());
        }
        self.parse_module_export_name()?;
        if self.is_specifier_end() {
            // {a as b}
            if is_import {
                self.set_name_role(first, remote_role);
                self.set_name_role(first + 2, local_role);
            } else {
                self.set_name_role(first, local_role);
            }
            return Ok(());
        }
        // {type a as b}
        self.parse_module_export_name()?;
        if !self.is_type_word(first) {
            return Err(self.unexpected());
        }
        self.mark_types_from(first);
        Ok(())
    }

    fn is_specifier_end(&self) -> bool {
        self.is(TokenType::COMMA) || self.is(TokenType::BRACE_R)
    }

    fn is_type_word(&self, index: usize) -> bool {
        let token = &self.state.tokens[index];
        (self.is_typescript() || self.is_flow())
            && token.token_type == TokenType::NAME
            && (token.contextual_keyword == ContextualKeyword::Type
                || (self.is_flow() && token.text(self.input) == "typeof"))
    }

    fn set_name_role(&mut self, index: usize, role: IdentifierRole) {
        let token = &mut self.state.tokens[index];
        if token.token_type == TokenType::NAME {
            token.identifier_role = Some(role);
        }
    }

    fn mark_types_from(&mut self, index: usize) {
        for token in &mut self.state.tokens[index..] {
            token.is_type = true;
            token.identifier_role = None;
        }
    }

    fn parse_module_export_name(&mut self) -> Result<()> {
        if self.is(TokenType::STRING) {
            self.next()
        } else {
            self.parse_identifier()
        }
    }

    // ===== Exports =====

    pub(crate) fn parse_export(&mut self) -> Result<()> {
        if self.is_typescript() && self.ts_try_parse_export()? {
            return Ok(());
        }
        if self.is(TokenType::STAR) {
            self.next()?;
            if self.eat_contextual(ContextualKeyword::As)? {
                self.parse_module_export_name()?;
            }
            return self.parse_export_from();
        }
        if self.eat(TokenType::DEFAULT)? {
            return self.parse_export_default_expression();
        }
        if self.should_parse_export_declaration()? {
            return self.parse_export_declaration();
        }
        self.parse_export_specifiers()?;
        self.parse_export_from()
    }

    pub(crate) fn parse_export_specifiers(&mut self) -> Result<()> {
        self.expect(TokenType::BRACE_L)?;
        let mut first = true;
        while !self.eat(TokenType::BRACE_R)? {
            if first {
                first = false;
            } else {
                self.expect(TokenType::COMMA)?;
                if self.eat(TokenType::BRACE_R)? {
                    break;
                }
            }
            self.parse_module_specifier(false)?;
        }
        Ok(())
    }

    pub(crate) fn parse_export_from(&mut self) -> Result<()> {
        if self.eat_contextual(ContextualKeyword::From)? {
            self.expect(TokenType::STRING)?;
            self.maybe_parse_import_attributes()?;
        }
        self.semicolon()
    }

    fn parse_export_default_expression(&mut self) -> Result<()> {
        if self.is_typescript() && self.ts_try_parse_export_default_expression()? {
            return Ok(());
        }
        let function_start = self.state.start;
        if self.eat(TokenType::FUNCTION)? {
            return self.parse_function(function_start, true, true);
        }
        if self.is_contextual(ContextualKeyword::Async) && self.lookahead_type()? == TokenType::FUNCTION {
            self.next()?;
            self.retype_last(TokenType::ASYNC);
            self.next()?;
            return self.parse_function(function_start, true, true);
        }
        if self.is(TokenType::CLASS) {
            return self.parse_class(true, true);
        }
        if self.is(TokenType::AT) {
            self.parse_decorators()?;
            return self.parse_class(true, true);
        }
        // `export default <expr>;` records its extent on the `export` token.
        let export_index = self.state.tokens.len().saturating_sub(2);
        self.parse_maybe_assign(false)?;
        self.semicolon()?;
        let rhs_end = self.state.tokens.len();
        if let Some(token) = self.state.tokens.get_mut(export_index)
            && token.token_type == TokenType::EXPORT
        {
            token.rhs_end_index = Some(rhs_end);
        }
        Ok(())
    }

    fn should_parse_export_declaration(&mut self) -> Result<bool> {
        if self.is_typescript() && self.ts_is_declaration_start() {
            return Ok(true);
        }
        if self.is_flow() && self.flow_should_parse_export_declaration() {
            return Ok(true);
        }
        Ok(self.is(TokenType::VAR)
            || self.is(TokenType::CONST)
            || self.is(TokenType::LET)
            || self.is(TokenType::FUNCTION)
            || self.is(TokenType::CLASS)
            || self.is_contextual(ContextualKeyword::Async)
            || self.is(TokenType::AT)
            || (self.is_contextual(ContextualKeyword::Using)
                && self.lookahead_type()? == TokenType::NAME))
    }

    fn parse_export_declaration(&mut self) -> Result<()> {
        if self.is_typescript() {
            return self.ts_parse_export_declaration();
        }
        if self.is_flow() {
            return self.flow_parse_export_declaration();
        }
        self.parse_statement(true)
    }
}
