//! TypeScript: the type grammar and the statement-level hooks.
//!
//! Everything read while a type context is active is marked `is_type`, so
//! erasure downstream is a matter of dropping marked runs. Declarations that
//! vanish entirely (interfaces, aliases, `declare`, overload signatures,
//! type-only namespaces) are marked from their first token, `export`
//! included.

use super::Parser;
use crate::keywords::ContextualKeyword;
use crate::token::{ContextKind, IdentifierRole};
use crate::token_type::TokenType;
use zest_common::{Location, Result, TransformError};

fn modifier_token_type(keyword: ContextualKeyword) -> TokenType {
    match keyword {
        ContextualKeyword::Readonly => TokenType::READONLY,
        ContextualKeyword::Abstract => TokenType::ABSTRACT,
        ContextualKeyword::Declare => TokenType::DECLARE,
        ContextualKeyword::Static => TokenType::STATIC,
        ContextualKeyword::Public => TokenType::PUBLIC,
        ContextualKeyword::Private => TokenType::PRIVATE,
        ContextualKeyword::Protected => TokenType::PROTECTED,
        ContextualKeyword::Override => TokenType::OVERRIDE,
        ContextualKeyword::Accessor => TokenType::ACCESSOR,
        _ => TokenType::NAME,
    }
}

impl<'a> Parser<'a> {
    // ===== Types =====

    pub(crate) fn ts_parse_type(&mut self) -> Result<()> {
        self.ts_parse_non_conditional_type()?;
        if self.state.in_disallow_conditional_types_context
            || self.has_preceding_line_break()
            || !self.eat(TokenType::EXTENDS)?
        {
            return Ok(());
        }
        let old = self.state.in_disallow_conditional_types_context;
        self.state.in_disallow_conditional_types_context = true;
        let check = self.ts_parse_non_conditional_type();
        self.state.in_disallow_conditional_types_context = old;
        check?;
        self.expect(TokenType::QUESTION)?;
        self.ts_parse_type()?;
        self.expect(TokenType::COLON)?;
        self.ts_parse_type()
    }

    fn ts_parse_non_conditional_type(&mut self) -> Result<()> {
        if self.ts_is_start_of_function_type()? {
            return self.ts_parse_function_or_constructor_type(false, false);
        }
        if self.is(TokenType::NEW) {
            return self.ts_parse_function_or_constructor_type(true, false);
        }
        if self.is_contextual(ContextualKeyword::Abstract) && self.lookahead_type()? == TokenType::NEW {
            return self.ts_parse_function_or_constructor_type(true, true);
        }
        self.ts_parse_union_type_or_higher()
    }

    fn ts_parse_function_or_constructor_type(&mut self, is_constructor: bool, is_abstract: bool) -> Result<()> {
        if is_abstract {
            self.next()?;
        }
        if is_constructor {
            self.expect(TokenType::NEW)?;
        }
        let old = self.state.in_disallow_conditional_types_context;
        self.state.in_disallow_conditional_types_context = false;
        let result = self.ts_fill_signature(TokenType::ARROW);
        self.state.in_disallow_conditional_types_context = old;
        result
    }

    /// Type parameters, parameters and return type of a signature. The
    /// return type is mandatory for function types (`=>`).
    fn ts_fill_signature(&mut self, return_token: TokenType) -> Result<()> {
        self.ts_try_parse_type_parameters()?;
        self.expect(TokenType::PAREN_L)?;
        self.parse_binding_list(TokenType::PAREN_R, false, false, false)?;
        if return_token == TokenType::ARROW || self.is(return_token) {
            self.ts_parse_type_or_type_predicate_annotation(return_token)?;
        }
        Ok(())
    }

    fn ts_is_start_of_function_type(&mut self) -> Result<bool> {
        if self.is(TokenType::LESS_THAN) {
            return Ok(true);
        }
        if !self.is(TokenType::PAREN_L) {
            return Ok(false);
        }
        let snapshot = self.state.snapshot();
        let result = self.ts_is_unambiguously_start_of_function_type();
        self.state.restore(snapshot);
        Ok(result.unwrap_or(false))
    }

    fn ts_is_unambiguously_start_of_function_type(&mut self) -> Result<bool> {
        self.next()?;
        if self.is(TokenType::PAREN_R) || self.is(TokenType::ELLIPSIS) {
            // ( ) or ( ...
            return Ok(true);
        }
        if self.ts_skip_parameter_start()? {
            if self.is(TokenType::COLON)
                || self.is(TokenType::COMMA)
                || self.is(TokenType::QUESTION)
                || self.is(TokenType::EQ)
            {
                return Ok(true);
            }
            if self.is(TokenType::PAREN_R) {
                self.next()?;
                return Ok(self.is(TokenType::ARROW));
            }
        }
        Ok(false)
    }

    fn ts_skip_parameter_start(&mut self) -> Result<bool> {
        if self.is(TokenType::NAME) || self.is(TokenType::THIS) {
            self.next()?;
            return Ok(true);
        }
        if self.is(TokenType::BRACE_L) || self.is(TokenType::BRACKET_L) {
            let mut depth = 1;
            self.next()?;
            while depth > 0 {
                if self.is(TokenType::EOF) {
                    return Err(self.unexpected());
                }
                if self.is(TokenType::BRACE_L) || self.is(TokenType::BRACKET_L) {
                    depth += 1;
                } else if self.is(TokenType::BRACE_R) || self.is(TokenType::BRACKET_R) {
                    depth -= 1;
                }
                self.next()?;
            }
            return Ok(true);
        }
        Ok(false)
    }

    fn ts_parse_union_type_or_higher(&mut self) -> Result<()> {
        self.eat(TokenType::BITWISE_OR)?;
        self.ts_parse_intersection_type_or_higher()?;
        while self.eat(TokenType::BITWISE_OR)? {
            self.ts_parse_intersection_type_or_higher()?;
        }
        Ok(())
    }

    fn ts_parse_intersection_type_or_higher(&mut self) -> Result<()> {
        self.eat(TokenType::BITWISE_AND)?;
        self.ts_parse_type_operator_or_higher()?;
        while self.eat(TokenType::BITWISE_AND)? {
            self.ts_parse_type_operator_or_higher()?;
        }
        Ok(())
    }

    fn ts_parse_type_operator_or_higher(&mut self) -> Result<()> {
        let is_operator = self.is(TokenType::NAME)
            && matches!(
                self.state.contextual_keyword,
                ContextualKeyword::Keyof | ContextualKeyword::Unique | ContextualKeyword::Readonly
            )
            && !self.has_following_line_break()?;
        if is_operator {
            self.next()?;
            return self.ts_parse_type_operator_or_higher();
        }
        if self.is_contextual(ContextualKeyword::Infer) {
            return self.ts_parse_infer_type();
        }
        let old = self.state.in_disallow_conditional_types_context;
        self.state.in_disallow_conditional_types_context = false;
        let result = self.ts_parse_array_type_or_higher();
        self.state.in_disallow_conditional_types_context = old;
        result
    }

    fn ts_parse_infer_type(&mut self) -> Result<()> {
        self.next()?;
        self.parse_identifier()?;
        if self.is(TokenType::EXTENDS) {
            // `infer U extends X ? A : B` is a conditional on `infer U`, not a
            // constraint on `U`.
            let disallowed_outside = self.state.in_disallow_conditional_types_context;
            self.try_parse(|p| {
                p.next()?;
                let old = p.state.in_disallow_conditional_types_context;
                p.state.in_disallow_conditional_types_context = true;
                let constraint = p.ts_parse_type();
                p.state.in_disallow_conditional_types_context = old;
                constraint?;
                Ok(disallowed_outside || !p.is(TokenType::QUESTION))
            })?;
        }
        Ok(())
    }

    fn ts_parse_array_type_or_higher(&mut self) -> Result<()> {
        self.ts_parse_non_array_type()?;
        while !self.has_preceding_line_break() && self.eat(TokenType::BRACKET_L)? {
            if !self.eat(TokenType::BRACKET_R)? {
                // Indexed access.
                self.ts_parse_type()?;
                self.expect(TokenType::BRACKET_R)?;
            }
        }
        Ok(())
    }

    fn ts_parse_non_array_type(&mut self) -> Result<()> {
        match self.state.token_type {
            TokenType::NAME | TokenType::VOID | TokenType::NULL => self.ts_parse_type_reference(),
            TokenType::STRING | TokenType::NUM | TokenType::BIGINT | TokenType::TRUE | TokenType::FALSE => {
                self.next()
            }
            TokenType::MINUS => {
                self.next()?;
                if !self.is(TokenType::NUM) && !self.is(TokenType::BIGINT) {
                    return Err(self.unexpected());
                }
                self.next()
            }
            TokenType::THIS => {
                self.next()?;
                if self.is_contextual(ContextualKeyword::Is) && !self.has_preceding_line_break() {
                    self.next()?;
                    self.ts_parse_type()?;
                }
                Ok(())
            }
            TokenType::TYPEOF => self.ts_parse_type_query(),
            TokenType::IMPORT => self.ts_parse_import_type(),
            TokenType::BRACE_L => {
                if self.ts_lookahead_is_start_of_mapped_type()? {
                    self.ts_parse_mapped_type()
                } else {
                    self.ts_parse_object_type_members()
                }
            }
            TokenType::BRACKET_L => self.ts_parse_tuple_type(),
            TokenType::PAREN_L => {
                self.next()?;
                self.ts_parse_type()?;
                self.expect(TokenType::PAREN_R)
            }
            TokenType::BACK_QUOTE => self.parse_template(),
            tt if tt.is_keyword() => {
                // `undefined`-like keywords, and `const` in `as const`.
                self.state.token_type = TokenType::NAME;
                self.next()
            }
            _ => Err(self.unexpected()),
        }
    }

    fn ts_parse_type_reference(&mut self) -> Result<()> {
        self.ts_parse_entity_name()?;
        if !self.has_preceding_line_break() && self.is(TokenType::LESS_THAN) {
            self.ts_parse_type_arguments()?;
        }
        Ok(())
    }

    fn ts_parse_entity_name(&mut self) -> Result<()> {
        self.parse_identifier()?;
        while self.eat(TokenType::DOT)? {
            self.parse_maybe_private_name_in_type()?;
        }
        Ok(())
    }

    fn parse_maybe_private_name_in_type(&mut self) -> Result<()> {
        self.eat(TokenType::HASH)?;
        self.parse_identifier()
    }

    fn ts_parse_type_query(&mut self) -> Result<()> {
        self.expect(TokenType::TYPEOF)?;
        if self.is(TokenType::IMPORT) {
            self.ts_parse_import_type()?;
        } else {
            self.ts_parse_entity_name()?;
        }
        if !self.has_preceding_line_break() && self.is(TokenType::LESS_THAN) {
            self.ts_parse_type_arguments()?;
        }
        Ok(())
    }

    fn ts_parse_import_type(&mut self) -> Result<()> {
        self.expect(TokenType::IMPORT)?;
        self.expect(TokenType::PAREN_L)?;
        self.expect(TokenType::STRING)?;
        if self.eat(TokenType::COMMA)? && !self.is(TokenType::PAREN_R) {
            self.parse_obj(false, false)?;
            self.eat(TokenType::COMMA)?;
        }
        self.expect(TokenType::PAREN_R)?;
        if self.eat(TokenType::DOT)? {
            self.ts_parse_entity_name()?;
        }
        if self.is(TokenType::LESS_THAN) {
            self.ts_parse_type_arguments()?;
        }
        Ok(())
    }

    fn ts_lookahead_is_start_of_mapped_type(&mut self) -> Result<bool> {
        let snapshot = self.state.snapshot();
        let result = (|| -> Result<bool> {
            self.next()?;
            if self.eat(TokenType::PLUS)? || self.eat(TokenType::MINUS)? {
                return Ok(self.is_contextual(ContextualKeyword::Readonly));
            }
            if self.is_contextual(ContextualKeyword::Readonly) {
                self.next()?;
            }
            if !self.is(TokenType::BRACKET_L) {
                return Ok(false);
            }
            self.next()?;
            if !self.is(TokenType::NAME) {
                return Ok(false);
            }
            self.next()?;
            Ok(self.is(TokenType::IN))
        })();
        self.state.restore(snapshot);
        Ok(result.unwrap_or(false))
    }

    fn ts_parse_mapped_type(&mut self) -> Result<()> {
        self.expect(TokenType::BRACE_L)?;
        self.set_context_kind(ContextKind::TypeLiteral);
        if self.is(TokenType::PLUS) || self.is(TokenType::MINUS) {
            self.next()?;
            self.expect_contextual(ContextualKeyword::Readonly)?;
        } else {
            self.eat_contextual(ContextualKeyword::Readonly)?;
        }
        self.expect(TokenType::BRACKET_L)?;
        self.parse_identifier()?;
        self.expect(TokenType::IN)?;
        self.ts_parse_type()?;
        if self.eat_contextual(ContextualKeyword::As)? {
            self.ts_parse_type()?;
        }
        self.expect(TokenType::BRACKET_R)?;
        if self.is(TokenType::PLUS) || self.is(TokenType::MINUS) {
            self.next()?;
            self.expect(TokenType::QUESTION)?;
        } else {
            self.eat(TokenType::QUESTION)?;
        }
        self.ts_try_parse_type_annotation()?;
        self.is_line_terminator()?;
        self.expect(TokenType::BRACE_R)
    }

    fn ts_parse_tuple_type(&mut self) -> Result<()> {
        self.expect(TokenType::BRACKET_L)?;
        while !self.eat(TokenType::BRACKET_R)? {
            if self.is(TokenType::EOF) {
                return Err(self.unexpected());
            }
            if self.eat(TokenType::ELLIPSIS)? {
                self.ts_parse_type()?;
            } else {
                self.ts_parse_type()?;
                self.eat(TokenType::QUESTION)?;
            }
            // What was parsed was a label.
            if self.eat(TokenType::COLON)? {
                self.ts_parse_type()?;
            }
            self.eat(TokenType::COMMA)?;
        }
        Ok(())
    }

    // ===== Object type members =====

    pub(crate) fn ts_parse_object_type_members(&mut self) -> Result<()> {
        self.expect(TokenType::BRACE_L)?;
        self.set_context_kind(ContextKind::TypeLiteral);
        while !self.eat(TokenType::BRACE_R)? {
            if self.is(TokenType::EOF) {
                return Err(self.unexpected());
            }
            self.ts_parse_type_member()?;
        }
        Ok(())
    }

    fn ts_parse_type_member(&mut self) -> Result<()> {
        if self.is(TokenType::PAREN_L) || self.is(TokenType::LESS_THAN) {
            // Call signature.
            self.ts_fill_signature(TokenType::COLON)?;
            return self.ts_parse_type_member_semicolon();
        }
        if self.is(TokenType::NEW) {
            let next = self.lookahead_type()?;
            if next == TokenType::PAREN_L || next == TokenType::LESS_THAN {
                self.next()?;
                self.ts_fill_signature(TokenType::COLON)?;
                return self.ts_parse_type_member_semicolon();
            }
        }
        let is_readonly = self.ts_parse_modifier(&[ContextualKeyword::Readonly])?;
        if self.ts_try_parse_index_signature()? {
            return Ok(());
        }
        if self.is_contextual(ContextualKeyword::Get) || self.is_contextual(ContextualKeyword::Set) {
            self.try_parse(|p| {
                p.next()?;
                Ok(p.ts_token_can_follow_modifier() && !p.is(TokenType::STAR))
            })?;
        }
        self.parse_property_name()?;
        self.ts_parse_property_or_method_signature(is_readonly)
    }

    fn ts_parse_property_or_method_signature(&mut self, is_readonly: bool) -> Result<()> {
        self.eat(TokenType::QUESTION)?;
        if !is_readonly && (self.is(TokenType::PAREN_L) || self.is(TokenType::LESS_THAN)) {
            self.ts_fill_signature(TokenType::COLON)?;
        } else {
            self.ts_try_parse_type_annotation()?;
        }
        self.ts_parse_type_member_semicolon()
    }

    fn ts_parse_type_member_semicolon(&mut self) -> Result<()> {
        if !self.eat(TokenType::COMMA)? && !self.is_line_terminator()? {
            return Err(self.unexpected_expected(TokenType::SEMI));
        }
        Ok(())
    }

    /// `[key: string]: T` in a type literal, interface or class body.
    fn ts_try_parse_index_signature(&mut self) -> Result<bool> {
        if !self.is(TokenType::BRACKET_L) {
            return Ok(false);
        }
        let snapshot = self.state.snapshot();
        let unambiguous = (|| -> Result<bool> {
            self.next()?;
            if !self.is(TokenType::NAME) {
                return Ok(false);
            }
            self.next()?;
            Ok(self.is(TokenType::COLON))
        })();
        self.state.restore(snapshot);
        if !unambiguous.unwrap_or(false) {
            return Ok(false);
        }
        let old = self.push_type_context(0);
        let result = (|| -> Result<()> {
            self.expect(TokenType::BRACKET_L)?;
            self.parse_identifier()?;
            self.ts_parse_type_annotation()?;
            self.expect(TokenType::BRACKET_R)?;
            self.ts_try_parse_type_annotation()?;
            self.ts_parse_type_member_semicolon()
        })();
        self.pop_type_context(old);
        result.map(|()| true)
    }

    // ===== Annotations, parameters and arguments =====

    pub(crate) fn ts_try_parse_type_annotation(&mut self) -> Result<()> {
        if self.is(TokenType::COLON) {
            self.ts_parse_type_annotation()?;
        }
        Ok(())
    }

    fn ts_parse_type_annotation(&mut self) -> Result<()> {
        let old = self.push_type_context(0);
        let result = self.expect(TokenType::COLON).and_then(|()| self.ts_parse_type());
        self.pop_type_context(old);
        result
    }

    /// `: T`, `: x is T`, `: asserts x` or `: asserts x is T`.
    pub(crate) fn ts_parse_return_type_annotation(&mut self) -> Result<()> {
        self.ts_parse_type_or_type_predicate_annotation(TokenType::COLON)
    }

    fn ts_parse_type_or_type_predicate_annotation(&mut self, return_token: TokenType) -> Result<()> {
        let old = self.push_type_context(0);
        let result = (|| -> Result<()> {
            self.expect(return_token)?;
            if !self.ts_parse_type_predicate_or_asserts_prefix()? {
                self.ts_parse_type()?;
            }
            Ok(())
        })();
        self.pop_type_context(old);
        result
    }

    /// Returns whether a predicate was consumed; otherwise nothing was.
    fn ts_parse_type_predicate_or_asserts_prefix(&mut self) -> Result<bool> {
        if self.is_contextual(ContextualKeyword::Asserts) {
            return self.try_parse(|p| {
                p.next()?;
                if p.eat_contextual(ContextualKeyword::Is)? {
                    // A predicate function named `asserts`.
                    p.ts_parse_type()?;
                    return Ok(true);
                }
                if p.is(TokenType::NAME) || p.is(TokenType::THIS) {
                    p.next()?;
                    if p.eat_contextual(ContextualKeyword::Is)? {
                        p.ts_parse_type()?;
                    }
                    return Ok(true);
                }
                Ok(false)
            });
        }
        if self.is(TokenType::NAME) || self.is(TokenType::THIS) {
            return self.try_parse(|p| {
                p.next()?;
                if p.is_contextual(ContextualKeyword::Is) && !p.has_preceding_line_break() {
                    p.next()?;
                    p.ts_parse_type()?;
                    return Ok(true);
                }
                Ok(false)
            });
        }
        Ok(false)
    }

    pub(crate) fn ts_try_parse_type_parameters(&mut self) -> Result<()> {
        if self.is(TokenType::LESS_THAN) {
            self.ts_parse_type_parameters()?;
        }
        Ok(())
    }

    /// `<T extends U = V, const W>`.
    pub(crate) fn ts_parse_type_parameters(&mut self) -> Result<()> {
        let old = self.push_type_context(0);
        let result = (|| -> Result<()> {
            if !self.is(TokenType::LESS_THAN) {
                return Err(self.unexpected_expected(TokenType::LESS_THAN));
            }
            self.next()?;
            while !self.eat(TokenType::GREATER_THAN)? {
                if self.is(TokenType::EOF) {
                    return Err(self.unexpected());
                }
                self.ts_parse_type_parameter()?;
                self.eat(TokenType::COMMA)?;
            }
            Ok(())
        })();
        self.pop_type_context(old);
        result
    }

    fn ts_parse_type_parameter(&mut self) -> Result<()> {
        loop {
            let is_modifier = self.is(TokenType::CONST)
                || self.is(TokenType::IN)
                || self.is_contextual(ContextualKeyword::Out);
            if !is_modifier || self.lookahead_type()? != TokenType::NAME {
                break;
            }
            self.next()?;
        }
        self.parse_identifier()?;
        if self.eat(TokenType::EXTENDS)? {
            self.ts_parse_type()?;
        }
        if self.eat(TokenType::EQ)? {
            self.ts_parse_type()?;
        }
        Ok(())
    }

    /// `<A, B>` after a callee, type reference or `new` target.
    pub(crate) fn ts_parse_type_arguments(&mut self) -> Result<()> {
        let old = self.push_type_context(0);
        let result = (|| -> Result<()> {
            self.rescan_lt();
            self.expect(TokenType::LESS_THAN)?;
            while !self.is(TokenType::GREATER_THAN) {
                if self.is(TokenType::EOF) {
                    return Err(self.unexpected());
                }
                self.ts_parse_type()?;
                self.eat(TokenType::COMMA)?;
            }
            Ok(())
        })();
        self.pop_type_context(old);
        result?;
        if old {
            return self.expect(TokenType::GREATER_THAN);
        }
        // In value position the closing `>` is read as a value token, so
        // `f(a < b, c >= d)` fails here and falls back to comparisons. It is
        // still erased with the arguments.
        self.relex_gt();
        self.expect(TokenType::GREATER_THAN)?;
        if let Some(token) = self.last_token_mut() {
            token.is_type = true;
        }
        Ok(())
    }

    pub(crate) fn ts_after_parse_var_head(&mut self) -> Result<()> {
        let old = self.push_type_context(0);
        let result = (|| -> Result<()> {
            if !self.has_preceding_line_break() {
                // Definite assignment `let x!: T`.
                self.eat(TokenType::BANG)?;
            }
            self.ts_try_parse_type_annotation()
        })();
        self.pop_type_context(old);
        result
    }

    /// Return type and body. A signature with no body is an overload or an
    /// abstract member and is erased back to `function_start`, together with
    /// any `export`/`default` in front of it.
    pub(crate) fn ts_parse_function_body_and_finish(&mut self, function_start: u32) -> Result<()> {
        if self.is(TokenType::COLON) {
            self.ts_parse_type_or_type_predicate_annotation(TokenType::COLON)?;
        }
        if !self.is(TokenType::BRACE_L) && self.is_line_terminator()? {
            let tokens = &mut self.state.tokens;
            for token in tokens.iter_mut().rev() {
                let header = token.token_type == TokenType::EXPORT || token.token_type == TokenType::DEFAULT;
                if token.start < function_start && !header {
                    break;
                }
                token.is_type = true;
                token.identifier_role = None;
            }
            return Ok(());
        }
        self.parse_function_body(false)
    }

    // ===== Modifiers =====

    pub(crate) fn ts_parse_modifiers(&mut self, allowed: &[ContextualKeyword]) -> Result<()> {
        while self.ts_parse_modifier(allowed)? {}
        Ok(())
    }

    /// Consume one modifier from `allowed`, retyping it. A word followed by
    /// something that cannot be a member name is a name, not a modifier.
    fn ts_parse_modifier(&mut self, allowed: &[ContextualKeyword]) -> Result<bool> {
        if !self.is(TokenType::NAME) {
            return Ok(false);
        }
        let keyword = self.state.contextual_keyword;
        if keyword == ContextualKeyword::None || !allowed.contains(&keyword) {
            return Ok(false);
        }
        let accepted = self.try_parse(|p| {
            p.next()?;
            Ok(p.ts_token_can_follow_modifier())
        })?;
        if accepted {
            self.retype_last(modifier_token_type(keyword));
        }
        Ok(accepted)
    }

    fn ts_token_can_follow_modifier(&self) -> bool {
        let tt = self.state.token_type;
        let follows = tt == TokenType::BRACKET_L
            || tt == TokenType::BRACE_L
            || tt == TokenType::STAR
            || tt == TokenType::ELLIPSIS
            || tt == TokenType::HASH
            || tt == TokenType::NAME
            || tt == TokenType::STRING
            || tt == TokenType::NUM
            || tt == TokenType::BIGINT
            || tt.is_keyword();
        follows && !self.has_preceding_line_break()
    }

    // ===== Classes =====

    pub(crate) fn ts_after_parse_class_super(&mut self, has_super: bool) -> Result<()> {
        if has_super && (self.is(TokenType::LESS_THAN) || self.is(TokenType::BIT_SHIFT_L)) {
            self.ts_parse_type_arguments()?;
        }
        if self.is_contextual(ContextualKeyword::Implements) {
            let old = self.push_type_context(0);
            let result = (|| -> Result<()> {
                self.next()?;
                self.retype_last(TokenType::IMPLEMENTS);
                self.ts_parse_heritage_clause()
            })();
            self.pop_type_context(old);
            result?;
        }
        Ok(())
    }

    fn ts_parse_heritage_clause(&mut self) -> Result<()> {
        loop {
            self.ts_parse_entity_name()?;
            if self.is(TokenType::LESS_THAN) {
                self.ts_parse_type_arguments()?;
            }
            if !self.eat(TokenType::COMMA)? {
                return Ok(());
            }
        }
    }

    /// Modifiers after `static` and index signatures. Returns whether the
    /// member was fully consumed.
    pub(crate) fn ts_try_parse_class_member_with_is_static(&mut self, is_static: bool) -> Result<bool> {
        let after_static = self.state.tokens.len();
        self.ts_parse_modifiers(&[
            ContextualKeyword::Abstract,
            ContextualKeyword::Readonly,
            ContextualKeyword::Declare,
            ContextualKeyword::Static,
            ContextualKeyword::Override,
        ])?;
        let modifiers_end = self.state.tokens.len();
        if !self.ts_try_parse_index_signature()? {
            return Ok(false);
        }
        let from = if is_static { after_static.saturating_sub(1) } else { after_static };
        for token in &mut self.state.tokens[from..modifiers_end] {
            token.is_type = true;
        }
        Ok(true)
    }

    // ===== Statements and declarations =====

    /// `const enum`.
    pub(crate) fn ts_try_parse_statement_content(&mut self) -> Result<bool> {
        if self.is(TokenType::CONST) && self.is_lookahead_contextual(ContextualKeyword::Enum)? {
            self.next()?;
            self.next()?;
            self.retype_last(TokenType::ENUM);
            self.ts_parse_enum_declaration()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Called after an expression statement consisting of one word, which
    /// may really start a declaration.
    pub(crate) fn ts_parse_expression_statement(&mut self, keyword: ContextualKeyword) -> Result<bool> {
        let word_index = self.state.tokens.len() - 1;
        match keyword {
            ContextualKeyword::Declare => {
                if self.ts_try_parse_declare(word_index)? {
                    return Ok(true);
                }
                Ok(false)
            }
            ContextualKeyword::Global if self.is(TokenType::BRACE_L) => {
                let old = self.push_type_context(1);
                let result = self.ts_parse_module_block(true);
                self.pop_type_context(old);
                result.map(|()| true)
            }
            _ => self.ts_parse_declaration(keyword, false, word_index, false),
        }
    }

    fn ts_at_declaration_end(&self) -> bool {
        self.is(TokenType::SEMI) || self.can_insert_semicolon()
    }

    /// `declare ...`: the whole statement is type-only.
    fn ts_try_parse_declare(&mut self, declare_index: usize) -> Result<bool> {
        if self.ts_at_declaration_end() {
            return Ok(false);
        }
        let starts_declaration = match self.state.token_type {
            TokenType::FUNCTION | TokenType::CLASS | TokenType::CONST | TokenType::VAR | TokenType::LET => true,
            TokenType::NAME => self.ts_is_declaration_start() || self.is_contextual(ContextualKeyword::Global),
            _ => false,
        };
        if !starts_declaration {
            return Ok(false);
        }
        self.retype_last(TokenType::DECLARE);
        let old = self.push_type_context(self.state.tokens.len() - declare_index);
        let result = self.ts_parse_declare_body(declare_index);
        self.pop_type_context(old);
        result
    }

    fn ts_parse_declare_body(&mut self, declare_index: usize) -> Result<bool> {
        let const_enum = self.is(TokenType::CONST) && self.is_lookahead_contextual(ContextualKeyword::Enum)?;
        match self.state.token_type {
            TokenType::FUNCTION => {
                let function_start = self.state.start;
                self.next()?;
                self.parse_function(function_start, true, false)?;
                Ok(true)
            }
            TokenType::CLASS => {
                self.parse_class(true, false)?;
                Ok(true)
            }
            TokenType::CONST if const_enum => {
                self.next()?;
                self.next()?;
                self.retype_last(TokenType::ENUM);
                self.ts_parse_enum_declaration()?;
                Ok(true)
            }
            TokenType::CONST | TokenType::VAR | TokenType::LET => {
                let is_block_scope = !self.is(TokenType::VAR);
                self.parse_var_statement(is_block_scope)?;
                Ok(true)
            }
            TokenType::NAME if self.is_contextual(ContextualKeyword::Global) => {
                self.next()?;
                if self.is(TokenType::BRACE_L) {
                    self.ts_parse_module_block(true)?;
                } else {
                    self.semicolon()?;
                }
                Ok(true)
            }
            TokenType::NAME => {
                let keyword = self.state.contextual_keyword;
                self.ts_parse_declaration(keyword, true, declare_index, true)
            }
            _ => Ok(false),
        }
    }

    /// `abstract class`, `enum`, `interface`, `module`, `namespace` and
    /// `type`. With `is_before_token` the keyword is the current token;
    /// otherwise it was already consumed. Erased declarations are marked
    /// from `erase_from`.
    fn ts_parse_declaration(
        &mut self,
        keyword: ContextualKeyword,
        is_before_token: bool,
        erase_from: usize,
        ambient: bool,
    ) -> Result<bool> {
        let next_is = |p: &mut Self, tt: TokenType| -> Result<bool> {
            if is_before_token {
                Ok(p.lookahead_type()? == tt && !p.has_following_line_break()?)
            } else {
                Ok(p.is(tt) && !p.ts_at_declaration_end())
            }
        };
        match keyword {
            ContextualKeyword::Abstract if next_is(self, TokenType::CLASS)? => {
                if is_before_token {
                    self.next()?;
                }
                self.retype_last(TokenType::ABSTRACT);
                self.parse_class(true, false)?;
                Ok(true)
            }
            ContextualKeyword::Enum if next_is(self, TokenType::NAME)? => {
                if is_before_token {
                    self.next()?;
                }
                self.retype_last(TokenType::ENUM);
                self.ts_parse_enum_declaration()?;
                Ok(true)
            }
            ContextualKeyword::Interface if next_is(self, TokenType::NAME)? => {
                self.ts_erased_declaration(is_before_token, erase_from, |p| p.ts_parse_interface_declaration())
            }
            ContextualKeyword::Type if next_is(self, TokenType::NAME)? => {
                self.ts_erased_declaration(is_before_token, erase_from, |p| p.ts_parse_type_alias_declaration())
            }
            ContextualKeyword::Namespace if next_is(self, TokenType::NAME)? => {
                self.ts_erased_declaration(is_before_token, erase_from, |p| {
                    p.ts_parse_module_or_namespace_declaration(ambient)
                })
            }
            ContextualKeyword::Module if next_is(self, TokenType::STRING)? => {
                self.ts_erased_declaration(is_before_token, erase_from, |p| {
                    p.ts_parse_ambient_external_module_declaration()
                })
            }
            ContextualKeyword::Module if next_is(self, TokenType::NAME)? => {
                self.ts_erased_declaration(is_before_token, erase_from, |p| {
                    p.ts_parse_module_or_namespace_declaration(ambient)
                })
            }
            _ => Ok(false),
        }
    }

    fn ts_erased_declaration<F>(&mut self, is_before_token: bool, erase_from: usize, body: F) -> Result<bool>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        for token in &mut self.state.tokens[erase_from..] {
            token.identifier_role = None;
        }
        let old = self.push_type_context(self.state.tokens.len() - erase_from);
        let result = (|| -> Result<()> {
            if is_before_token {
                self.next()?;
            }
            body(self)
        })();
        self.pop_type_context(old);
        result.map(|()| true)
    }

    fn ts_parse_interface_declaration(&mut self) -> Result<()> {
        self.parse_binding_identifier(false)?;
        self.ts_try_parse_type_parameters()?;
        if self.eat(TokenType::EXTENDS)? {
            self.ts_parse_heritage_clause()?;
        }
        self.ts_parse_object_type_members()
    }

    fn ts_parse_type_alias_declaration(&mut self) -> Result<()> {
        self.parse_binding_identifier(false)?;
        self.ts_try_parse_type_parameters()?;
        self.expect(TokenType::EQ)?;
        self.ts_parse_type()?;
        self.semicolon()
    }

    fn ts_parse_enum_declaration(&mut self) -> Result<()> {
        self.parse_binding_identifier(false)?;
        self.expect(TokenType::BRACE_L)?;
        while !self.eat(TokenType::BRACE_R)? {
            if self.is(TokenType::EOF) {
                return Err(self.unexpected());
            }
            self.ts_parse_enum_member()?;
            self.eat(TokenType::COMMA)?;
        }
        Ok(())
    }

    fn ts_parse_enum_member(&mut self) -> Result<()> {
        if self.is(TokenType::STRING) {
            self.next()?;
        } else {
            self.parse_identifier()?;
        }
        self.set_last_role(IdentifierRole::ObjectKey);
        if self.is(TokenType::EQ) {
            let eq_index = self.state.tokens.len();
            self.next()?;
            self.parse_maybe_assign(false)?;
            self.state.tokens[eq_index].rhs_end_index = Some(self.state.tokens.len());
        }
        Ok(())
    }

    fn ts_parse_module_or_namespace_declaration(&mut self, ambient: bool) -> Result<()> {
        self.parse_binding_identifier(false)?;
        if self.eat(TokenType::DOT)? {
            return self.ts_parse_module_or_namespace_declaration(ambient);
        }
        self.ts_parse_module_block(ambient)
    }

    fn ts_parse_ambient_external_module_declaration(&mut self) -> Result<()> {
        if self.is_contextual(ContextualKeyword::Global) {
            self.parse_identifier()?;
        } else {
            self.expect(TokenType::STRING)?;
        }
        if self.is(TokenType::BRACE_L) {
            self.ts_parse_module_block(true)
        } else {
            self.semicolon()
        }
    }

    /// Body of a namespace. Outside an ambient context only type
    /// declarations may appear: a namespace that would produce a runtime
    /// object is not supported.
    fn ts_parse_module_block(&mut self, ambient: bool) -> Result<()> {
        self.expect(TokenType::BRACE_L)?;
        self.set_context_kind(ContextKind::Block);
        while !self.eat(TokenType::BRACE_R)? {
            if self.is(TokenType::EOF) {
                return Err(self.unexpected());
            }
            if !ambient && !self.ts_at_type_only_statement()? {
                return Err(TransformError::unsupported(format!(
                    "Namespaces with runtime values are not supported ({})",
                    Location::from_offset(self.input, self.state.start)
                )));
            }
            self.parse_statement(true)?;
        }
        Ok(())
    }

    fn ts_at_type_only_statement(&mut self) -> Result<bool> {
        let is_type_keyword = |keyword: ContextualKeyword| {
            matches!(
                keyword,
                ContextualKeyword::Interface
                    | ContextualKeyword::Type
                    | ContextualKeyword::Declare
                    | ContextualKeyword::Namespace
                    | ContextualKeyword::Module
            )
        };
        match self.state.token_type {
            TokenType::SEMI => Ok(true),
            TokenType::NAME => Ok(is_type_keyword(self.state.contextual_keyword)),
            TokenType::IMPORT => self.is_lookahead_contextual(ContextualKeyword::Type),
            TokenType::EXPORT => {
                let next = self.lookahead()?;
                Ok(next.token_type == TokenType::NAME && is_type_keyword(next.contextual_keyword))
            }
            _ => Ok(false),
        }
    }

    // ===== Modules =====

    /// `import a = require("a")` or `import a = B.c`, entered at the name.
    pub(crate) fn ts_parse_import_equals_declaration(&mut self) -> Result<()> {
        self.parse_identifier()?;
        self.set_last_role(IdentifierRole::ImportDeclaration);
        self.expect(TokenType::EQ)?;
        if self.is_contextual(ContextualKeyword::Require) && self.lookahead_type()? == TokenType::PAREN_L {
            self.next()?;
            self.expect(TokenType::PAREN_L)?;
            self.expect(TokenType::STRING)?;
            self.expect(TokenType::PAREN_R)?;
        } else {
            self.parse_identifier()?;
            self.set_last_role(IdentifierRole::Access);
            while self.eat(TokenType::DOT)? {
                self.parse_identifier()?;
            }
        }
        self.semicolon()
    }

    /// `export import`, `export =`, `export as namespace` and the type-only
    /// `export type {...}` / `export type *` forms.
    pub(crate) fn ts_try_parse_export(&mut self) -> Result<bool> {
        let export_index = self.state.tokens.len() - 1;
        if self.is(TokenType::IMPORT) {
            self.next()?;
            if self.is_contextual(ContextualKeyword::Type) && self.lookahead_type()? != TokenType::EQ {
                let old = self.push_type_context(self.state.tokens.len() - export_index);
                let result = self.next().and_then(|()| self.ts_parse_import_equals_declaration());
                self.pop_type_context(old);
                result?;
            } else {
                self.ts_parse_import_equals_declaration()?;
            }
            return Ok(true);
        }
        if self.eat(TokenType::EQ)? {
            self.parse_expression(false)?;
            self.semicolon()?;
            return Ok(true);
        }
        if self.is_contextual(ContextualKeyword::As) {
            // export as namespace A;
            let old = self.push_type_context(1);
            let result = (|| -> Result<()> {
                self.next()?;
                self.expect_contextual(ContextualKeyword::Namespace)?;
                self.parse_identifier()?;
                self.semicolon()
            })();
            self.pop_type_context(old);
            result?;
            return Ok(true);
        }
        if self.is_contextual(ContextualKeyword::Type) {
            let next = self.lookahead_type()?;
            if next == TokenType::BRACE_L || next == TokenType::STAR {
                let old = self.push_type_context(1);
                let result = (|| -> Result<()> {
                    self.next()?;
                    if self.eat(TokenType::STAR)? {
                        if self.eat_contextual(ContextualKeyword::As)? {
                            self.parse_identifier()?;
                        }
                    } else {
                        self.parse_export_specifiers()?;
                    }
                    self.parse_export_from()
                })();
                self.pop_type_context(old);
                for token in &mut self.state.tokens[export_index..] {
                    token.identifier_role = None;
                }
                result?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub(crate) fn ts_try_parse_export_default_expression(&mut self) -> Result<bool> {
        if self.is_contextual(ContextualKeyword::Abstract) && self.lookahead_type()? == TokenType::CLASS {
            self.next()?;
            self.retype_last(TokenType::ABSTRACT);
            self.parse_class(true, true)?;
            return Ok(true);
        }
        if self.is_contextual(ContextualKeyword::Interface) {
            let erase_from = self.state.tokens.len().saturating_sub(2);
            return self.ts_erased_declaration(true, erase_from, |p| p.ts_parse_interface_declaration());
        }
        Ok(false)
    }

    pub(crate) fn ts_is_declaration_start(&self) -> bool {
        self.is(TokenType::NAME)
            && matches!(
                self.state.contextual_keyword,
                ContextualKeyword::Abstract
                    | ContextualKeyword::Declare
                    | ContextualKeyword::Enum
                    | ContextualKeyword::Interface
                    | ContextualKeyword::Module
                    | ContextualKeyword::Namespace
                    | ContextualKeyword::Type
            )
    }

    /// The declaration after `export`. `export declare ...` is erased whole.
    pub(crate) fn ts_parse_export_declaration(&mut self) -> Result<()> {
        let export_index = self.state.tokens.len() - 1;
        if self.is_contextual(ContextualKeyword::Declare) && !self.has_following_line_break()? {
            self.next()?;
            self.retype_last(TokenType::DECLARE);
            let old = self.push_type_context(self.state.tokens.len() - export_index);
            let result = (|| -> Result<()> {
                if self.is(TokenType::NAME) {
                    let keyword = self.state.contextual_keyword;
                    if self.ts_parse_declaration(keyword, true, export_index, true)? {
                        return Ok(());
                    }
                }
                self.parse_statement(true)
            })();
            self.pop_type_context(old);
            return result;
        }
        if self.is(TokenType::NAME) {
            let keyword = self.state.contextual_keyword;
            if self.ts_parse_declaration(keyword, true, export_index, false)? {
                return Ok(());
            }
        }
        self.parse_statement(true)
    }
}
