//! Flow: the type grammar and the statement-level hooks.

use super::Parser;
use crate::keywords::ContextualKeyword;
use crate::token::ContextKind;
use crate::token_type::TokenType;
use zest_common::Result;

impl<'a> Parser<'a> {
    // ===== Hooks =====

    /// `interface Foo {}` at statement start.
    pub(crate) fn flow_try_parse_statement(&mut self) -> Result<bool> {
        if self.is_contextual(ContextualKeyword::Interface) && self.lookahead_type()? == TokenType::NAME {
            let old = self.push_type_context(0);
            let result = self.next().and_then(|()| self.flow_parse_interfaceish(false));
            self.pop_type_context(old);
            result?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Called after an expression statement consisting of one word:
    /// `declare ...`, `interface`, `type` and `opaque type`.
    pub(crate) fn flow_parse_identifier_statement(&mut self, keyword: ContextualKeyword) -> Result<bool> {
        if keyword == ContextualKeyword::Declare {
            let declarable = matches!(
                self.state.token_type,
                TokenType::CLASS
                    | TokenType::NAME
                    | TokenType::FUNCTION
                    | TokenType::VAR
                    | TokenType::LET
                    | TokenType::CONST
                    | TokenType::EXPORT
            );
            if !declarable || self.has_preceding_line_break() {
                return Ok(false);
            }
            return self.flow_erase_statement(|p| p.flow_parse_declare());
        }
        if !self.is(TokenType::NAME) || self.has_preceding_line_break() {
            return Ok(false);
        }
        match keyword {
            ContextualKeyword::Interface => self.flow_erase_statement(|p| p.flow_parse_interfaceish(false)),
            ContextualKeyword::Type => self.flow_erase_statement(|p| p.flow_parse_type_alias()),
            ContextualKeyword::Opaque if self.is_contextual(ContextualKeyword::Type) => {
                self.flow_erase_statement(|p| p.flow_parse_opaque_type(false))
            }
            _ => Ok(false),
        }
    }

    /// Run `body` with the already-consumed keyword and everything it reads
    /// marked as type.
    fn flow_erase_statement<F>(&mut self, body: F) -> Result<bool>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        if let Some(token) = self.last_token_mut() {
            token.identifier_role = None;
        }
        let old = self.push_type_context(1);
        let result = body(self);
        self.pop_type_context(old);
        result.map(|()| true)
    }

    pub(crate) fn flow_should_parse_export_declaration(&self) -> bool {
        self.is_contextual(ContextualKeyword::Type)
            || self.is_contextual(ContextualKeyword::Interface)
            || self.is_contextual(ContextualKeyword::Opaque)
    }

    /// After `export`: type-only declarations are erased with their
    /// `export`.
    pub(crate) fn flow_parse_export_declaration(&mut self) -> Result<()> {
        if self.is_contextual(ContextualKeyword::Type) {
            let old = self.push_type_context(1);
            let result = (|| -> Result<()> {
                self.next()?;
                if self.is(TokenType::BRACE_L) {
                    // export type {A, B} from "x";
                    self.parse_export_specifiers()?;
                    self.parse_export_from()
                } else {
                    self.flow_parse_type_alias()
                }
            })();
            self.pop_type_context(old);
            return result;
        }
        if self.is_contextual(ContextualKeyword::Opaque) {
            let old = self.push_type_context(1);
            let result = self.next().and_then(|()| self.flow_parse_opaque_type(false));
            self.pop_type_context(old);
            return result;
        }
        if self.is_contextual(ContextualKeyword::Interface) {
            let old = self.push_type_context(1);
            let result = self.next().and_then(|()| self.flow_parse_interfaceish(false));
            self.pop_type_context(old);
            return result;
        }
        self.parse_statement(true)
    }

    pub(crate) fn flow_after_parse_class_super(&mut self, has_super: bool) -> Result<()> {
        if has_super && self.is(TokenType::LESS_THAN) {
            self.flow_parse_type_parameter_instantiation()?;
        }
        if self.is_contextual(ContextualKeyword::Implements) {
            let old = self.push_type_context(0);
            let result = (|| -> Result<()> {
                self.next()?;
                self.retype_last(TokenType::IMPLEMENTS);
                loop {
                    self.flow_parse_qualified_type_identifier()?;
                    if self.is(TokenType::LESS_THAN) {
                        self.flow_parse_type_parameter_instantiation()?;
                    }
                    if !self.eat(TokenType::COMMA)? {
                        return Ok(());
                    }
                }
            })();
            self.pop_type_context(old);
            result?;
        }
        Ok(())
    }

    /// `+x` / `-x` on a property.
    pub(crate) fn flow_parse_variance(&mut self) -> Result<()> {
        if self.is(TokenType::PLUS) || self.is(TokenType::MINUS) {
            let old = self.push_type_context(0);
            let result = self.next();
            self.pop_type_context(old);
            result?;
        }
        Ok(())
    }

    // ===== Annotations and parameters =====

    pub(crate) fn flow_parse_type_annotation(&mut self) -> Result<()> {
        let old = self.push_type_context(0);
        let result = self.flow_parse_type_initialiser(TokenType::COLON);
        self.pop_type_context(old);
        result
    }

    fn flow_parse_type_initialiser(&mut self, token: TokenType) -> Result<()> {
        self.expect(token)?;
        self.flow_parse_type()
    }

    /// Return type that may carry a `%checks` predicate.
    pub(crate) fn flow_parse_type_and_predicate_annotation(&mut self) -> Result<()> {
        let old = self.push_type_context(0);
        let result = self.flow_parse_type_and_predicate_initialiser();
        self.pop_type_context(old);
        result
    }

    fn flow_parse_type_and_predicate_initialiser(&mut self) -> Result<()> {
        self.expect(TokenType::COLON)?;
        if self.is(TokenType::MODULO) {
            return self.flow_parse_predicate();
        }
        self.flow_parse_type()?;
        if self.is(TokenType::MODULO) {
            self.flow_parse_predicate()?;
        }
        Ok(())
    }

    fn flow_parse_predicate(&mut self) -> Result<()> {
        self.expect(TokenType::MODULO)?;
        self.expect_contextual(ContextualKeyword::Checks)?;
        if self.eat(TokenType::PAREN_L)? {
            self.parse_expression(false)?;
            self.expect(TokenType::PAREN_R)?;
        }
        Ok(())
    }

    /// `<+T: Bound = Default, ...>`.
    pub(crate) fn flow_parse_type_parameter_declaration(&mut self) -> Result<()> {
        let old = self.push_type_context(0);
        let result = (|| -> Result<()> {
            self.rescan_lt();
            self.expect(TokenType::LESS_THAN)?;
            while !self.is(TokenType::GREATER_THAN) {
                if self.is(TokenType::EOF) {
                    return Err(self.unexpected());
                }
                self.flow_parse_variance()?;
                self.flow_parse_type_annotatable_identifier()?;
                if self.eat(TokenType::EQ)? {
                    self.flow_parse_type()?;
                }
                if !self.is(TokenType::GREATER_THAN) {
                    self.expect(TokenType::COMMA)?;
                }
            }
            self.expect(TokenType::GREATER_THAN)
        })();
        self.pop_type_context(old);
        result
    }

    /// `<A, B>` after a callee, `new` target or generic type name.
    pub(crate) fn flow_parse_type_parameter_instantiation(&mut self) -> Result<()> {
        let old = self.push_type_context(0);
        let result = (|| -> Result<()> {
            self.rescan_lt();
            self.expect(TokenType::LESS_THAN)?;
            let no_anon = self.state.no_anon_function_type;
            self.state.no_anon_function_type = false;
            let args = (|| -> Result<()> {
                while !self.is(TokenType::GREATER_THAN) {
                    if self.is(TokenType::EOF) {
                        return Err(self.unexpected());
                    }
                    self.flow_parse_type()?;
                    if !self.is(TokenType::GREATER_THAN) {
                        self.expect(TokenType::COMMA)?;
                    }
                }
                Ok(())
            })();
            self.state.no_anon_function_type = no_anon;
            args
        })();
        self.pop_type_context(old);
        result?;
        if old {
            return self.expect(TokenType::GREATER_THAN);
        }
        self.relex_gt();
        self.expect(TokenType::GREATER_THAN)?;
        if let Some(token) = self.last_token_mut() {
            token.is_type = true;
        }
        Ok(())
    }

    fn flow_parse_type_annotatable_identifier(&mut self) -> Result<()> {
        self.parse_identifier()?;
        if self.is(TokenType::COLON) {
            self.flow_parse_type_annotation()?;
        }
        Ok(())
    }

    // ===== Declarations =====

    /// Everything after `declare`. The caller has set up the type context.
    fn flow_parse_declare(&mut self) -> Result<()> {
        match self.state.token_type {
            TokenType::CLASS => {
                self.next()?;
                self.flow_parse_interfaceish(true)
            }
            TokenType::FUNCTION => self.flow_parse_declare_function(),
            TokenType::VAR | TokenType::LET | TokenType::CONST => {
                self.next()?;
                self.flow_parse_type_annotatable_identifier()?;
                self.semicolon()
            }
            TokenType::EXPORT => self.flow_parse_declare_export_declaration(),
            TokenType::NAME => match self.state.contextual_keyword {
                ContextualKeyword::Module => {
                    self.next()?;
                    if self.eat(TokenType::DOT)? {
                        // declare module.exports: T
                        self.expect_contextual(ContextualKeyword::Exports)?;
                        self.flow_parse_type_annotation()?;
                        return self.semicolon();
                    }
                    self.flow_parse_declare_module()
                }
                ContextualKeyword::Type => {
                    self.next()?;
                    self.flow_parse_type_alias()
                }
                ContextualKeyword::Opaque => {
                    self.next()?;
                    self.flow_parse_opaque_type(true)
                }
                ContextualKeyword::Interface => {
                    self.next()?;
                    self.flow_parse_interfaceish(false)
                }
                _ => Err(self.unexpected()),
            },
            _ => Err(self.unexpected()),
        }
    }

    fn flow_parse_declare_function(&mut self) -> Result<()> {
        self.expect(TokenType::FUNCTION)?;
        self.parse_identifier()?;
        if self.is(TokenType::LESS_THAN) {
            self.flow_parse_type_parameter_declaration()?;
        }
        self.expect(TokenType::PAREN_L)?;
        self.flow_parse_function_type_params()?;
        self.expect(TokenType::PAREN_R)?;
        self.flow_parse_type_and_predicate_initialiser()?;
        self.semicolon()
    }

    fn flow_parse_declare_module(&mut self) -> Result<()> {
        if self.is(TokenType::STRING) {
            self.next()?;
        } else {
            self.parse_identifier()?;
        }
        self.expect(TokenType::BRACE_L)?;
        self.set_context_kind(ContextKind::Block);
        while !self.eat(TokenType::BRACE_R)? {
            if self.is(TokenType::EOF) {
                return Err(self.unexpected());
            }
            self.parse_statement(true)?;
        }
        Ok(())
    }

    fn flow_parse_declare_export_declaration(&mut self) -> Result<()> {
        self.expect(TokenType::EXPORT)?;
        if self.eat(TokenType::DEFAULT)? {
            if self.is(TokenType::FUNCTION) || self.is(TokenType::CLASS) {
                return self.flow_parse_declare();
            }
            self.flow_parse_type()?;
            return self.semicolon();
        }
        let declares = self.is(TokenType::VAR)
            || self.is(TokenType::LET)
            || self.is(TokenType::CONST)
            || self.is(TokenType::FUNCTION)
            || self.is(TokenType::CLASS)
            || self.is_contextual(ContextualKeyword::Opaque);
        if declares {
            return self.flow_parse_declare();
        }
        if self.is(TokenType::STAR)
            || self.is(TokenType::BRACE_L)
            || self.is_contextual(ContextualKeyword::Interface)
            || self.is_contextual(ContextualKeyword::Type)
        {
            return self.parse_export();
        }
        Err(self.unexpected())
    }

    /// Interface or `declare class` body: name, type parameters, heritage
    /// and an object type.
    fn flow_parse_interfaceish(&mut self, is_class: bool) -> Result<()> {
        self.parse_binding_identifier(false)?;
        if self.is(TokenType::LESS_THAN) {
            self.flow_parse_type_parameter_declaration()?;
        }
        if self.eat(TokenType::EXTENDS)? {
            loop {
                self.flow_parse_interface_extends()?;
                if is_class || !self.eat(TokenType::COMMA)? {
                    break;
                }
            }
        }
        for keyword in [ContextualKeyword::Mixins, ContextualKeyword::Implements] {
            if self.eat_contextual(keyword)? {
                loop {
                    self.flow_parse_interface_extends()?;
                    if !self.eat(TokenType::COMMA)? {
                        break;
                    }
                }
            }
        }
        self.flow_parse_object_type(is_class, false, is_class)
    }

    fn flow_parse_interface_extends(&mut self) -> Result<()> {
        self.flow_parse_qualified_type_identifier()?;
        if self.is(TokenType::LESS_THAN) {
            self.flow_parse_type_parameter_instantiation()?;
        }
        Ok(())
    }

    fn flow_parse_qualified_type_identifier(&mut self) -> Result<()> {
        self.parse_identifier()?;
        while self.eat(TokenType::DOT)? {
            self.parse_identifier()?;
        }
        Ok(())
    }

    fn flow_parse_type_alias(&mut self) -> Result<()> {
        self.parse_binding_identifier(false)?;
        if self.is(TokenType::LESS_THAN) {
            self.flow_parse_type_parameter_declaration()?;
        }
        self.flow_parse_type_initialiser(TokenType::EQ)?;
        self.semicolon()
    }

    /// `opaque type T: Super = Impl`; the implementation is absent when
    /// declared.
    fn flow_parse_opaque_type(&mut self, declare: bool) -> Result<()> {
        self.expect_contextual(ContextualKeyword::Type)?;
        self.parse_binding_identifier(false)?;
        if self.is(TokenType::LESS_THAN) {
            self.flow_parse_type_parameter_declaration()?;
        }
        if self.is(TokenType::COLON) {
            self.flow_parse_type_initialiser(TokenType::COLON)?;
        }
        if !declare {
            self.flow_parse_type_initialiser(TokenType::EQ)?;
        }
        self.semicolon()
    }

    // ===== Types =====

    pub(crate) fn flow_parse_type(&mut self) -> Result<()> {
        self.eat(TokenType::BITWISE_OR)?;
        self.flow_parse_intersection_type()?;
        while self.eat(TokenType::BITWISE_OR)? {
            self.flow_parse_intersection_type()?;
        }
        Ok(())
    }

    fn flow_parse_intersection_type(&mut self) -> Result<()> {
        self.eat(TokenType::BITWISE_AND)?;
        self.flow_parse_anon_function_without_parens()?;
        while self.eat(TokenType::BITWISE_AND)? {
            self.flow_parse_anon_function_without_parens()?;
        }
        Ok(())
    }

    /// `T => U`, unless anonymous function types are disallowed here (in an
    /// arrow's return type, where `=>` starts the body).
    fn flow_parse_anon_function_without_parens(&mut self) -> Result<()> {
        self.flow_parse_prefix_type()?;
        if !self.state.no_anon_function_type && self.eat(TokenType::ARROW)? {
            self.flow_parse_type()?;
        }
        Ok(())
    }

    fn flow_parse_prefix_type(&mut self) -> Result<()> {
        if self.eat(TokenType::QUESTION)? {
            return self.flow_parse_prefix_type();
        }
        self.flow_parse_postfix_type()
    }

    /// `T[]`, `T[K]` and `T?.[K]`.
    fn flow_parse_postfix_type(&mut self) -> Result<()> {
        self.flow_parse_primary_type()?;
        while !self.can_insert_semicolon() && (self.is(TokenType::BRACKET_L) || self.is(TokenType::QUESTION_DOT)) {
            self.eat(TokenType::QUESTION_DOT)?;
            self.expect(TokenType::BRACKET_L)?;
            if !self.eat(TokenType::BRACKET_R)? {
                self.flow_parse_type()?;
                self.expect(TokenType::BRACKET_R)?;
            }
        }
        Ok(())
    }

    fn flow_parse_primary_type(&mut self) -> Result<()> {
        match self.state.token_type {
            TokenType::NAME => {
                if self.is_contextual(ContextualKeyword::Interface) {
                    return self.flow_parse_interface_type();
                }
                self.flow_parse_qualified_type_identifier()?;
                if self.is(TokenType::LESS_THAN) {
                    self.flow_parse_type_parameter_instantiation()?;
                }
                Ok(())
            }
            TokenType::BRACE_L => self.flow_parse_object_type(false, false, false),
            TokenType::BRACE_BAR_L => self.flow_parse_object_type(false, true, false),
            TokenType::BRACKET_L => self.flow_parse_tuple_type(),
            TokenType::LESS_THAN => {
                self.flow_parse_type_parameter_declaration()?;
                self.expect(TokenType::PAREN_L)?;
                self.flow_parse_function_type_params()?;
                self.expect(TokenType::PAREN_R)?;
                self.expect(TokenType::ARROW)?;
                self.flow_parse_type()
            }
            TokenType::PAREN_L => self.flow_parse_paren_type(),
            TokenType::MINUS => {
                self.next()?;
                if !self.is(TokenType::NUM) && !self.is(TokenType::BIGINT) {
                    return Err(self.unexpected());
                }
                self.next()
            }
            TokenType::TYPEOF => {
                self.next()?;
                self.flow_parse_primary_type()
            }
            TokenType::BACK_QUOTE => self.parse_template(),
            TokenType::STRING
            | TokenType::NUM
            | TokenType::BIGINT
            | TokenType::TRUE
            | TokenType::FALSE
            | TokenType::NULL
            | TokenType::THIS
            | TokenType::VOID
            | TokenType::STAR => self.next(),
            tt if tt.is_keyword() => {
                self.state.token_type = TokenType::NAME;
                self.next()
            }
            _ => Err(self.unexpected()),
        }
    }

    /// A parenthesized type or the parameter list of a function type.
    fn flow_parse_paren_type(&mut self) -> Result<()> {
        self.expect(TokenType::PAREN_L)?;
        let mut is_grouped_type = false;
        if !self.is(TokenType::PAREN_R) && !self.is(TokenType::ELLIPSIS) {
            if self.is(TokenType::NAME) || self.is(TokenType::THIS) {
                let next = self.lookahead_type()?;
                is_grouped_type = next != TokenType::QUESTION && next != TokenType::COLON;
            } else {
                is_grouped_type = true;
            }
        }
        if is_grouped_type {
            let no_anon = self.state.no_anon_function_type;
            self.state.no_anon_function_type = false;
            let inner = self.flow_parse_type();
            self.state.no_anon_function_type = no_anon;
            inner?;
            let is_params = self.is(TokenType::COMMA)
                || (self.is(TokenType::PAREN_R) && self.lookahead_type()? == TokenType::ARROW);
            if self.state.no_anon_function_type || !is_params {
                return self.expect(TokenType::PAREN_R);
            }
            self.eat(TokenType::COMMA)?;
        }
        self.flow_parse_function_type_params()?;
        self.expect(TokenType::PAREN_R)?;
        self.expect(TokenType::ARROW)?;
        self.flow_parse_type()
    }

    fn flow_parse_function_type_params(&mut self) -> Result<()> {
        while !self.is(TokenType::PAREN_R) && !self.is(TokenType::ELLIPSIS) {
            if self.is(TokenType::EOF) {
                return Err(self.unexpected());
            }
            self.flow_parse_function_type_param()?;
            if !self.is(TokenType::PAREN_R) {
                self.expect(TokenType::COMMA)?;
            }
        }
        if self.eat(TokenType::ELLIPSIS)? {
            self.flow_parse_function_type_param()?;
        }
        Ok(())
    }

    /// `name: T`, `name?: T` or a bare type.
    fn flow_parse_function_type_param(&mut self) -> Result<()> {
        let next = self.lookahead_type()?;
        if next == TokenType::COLON || next == TokenType::QUESTION {
            self.parse_identifier()?;
            self.eat(TokenType::QUESTION)?;
            self.flow_parse_type_initialiser(TokenType::COLON)
        } else {
            self.flow_parse_type()
        }
    }

    fn flow_parse_interface_type(&mut self) -> Result<()> {
        self.expect_contextual(ContextualKeyword::Interface)?;
        if self.eat(TokenType::EXTENDS)? {
            loop {
                self.flow_parse_interface_extends()?;
                if !self.eat(TokenType::COMMA)? {
                    break;
                }
            }
        }
        self.flow_parse_object_type(false, false, false)
    }

    fn flow_parse_tuple_type(&mut self) -> Result<()> {
        self.expect(TokenType::BRACKET_L)?;
        while !self.is(TokenType::BRACKET_R) {
            if self.is(TokenType::EOF) {
                return Err(self.unexpected());
            }
            self.flow_parse_type()?;
            if self.is(TokenType::BRACKET_R) {
                break;
            }
            self.expect(TokenType::COMMA)?;
        }
        self.expect(TokenType::BRACKET_R)
    }

    /// `{ ... }` or the exact `{| ... |}`.
    fn flow_parse_object_type(&mut self, allow_static: bool, allow_exact: bool, allow_proto: bool) -> Result<()> {
        let end = if allow_exact {
            self.expect(TokenType::BRACE_BAR_L)?;
            TokenType::BRACE_BAR_R
        } else {
            self.expect(TokenType::BRACE_L)?;
            TokenType::BRACE_R
        };
        self.set_context_kind(ContextKind::TypeLiteral);
        while !self.is(end) {
            if self.is(TokenType::EOF) {
                return Err(self.unexpected());
            }
            self.flow_parse_object_type_member(allow_static, allow_proto)?;
            self.flow_object_type_semicolon()?;
        }
        self.expect(end)
    }

    fn flow_parse_object_type_member(&mut self, allow_static: bool, allow_proto: bool) -> Result<()> {
        for (allowed, keyword) in [
            (allow_proto, ContextualKeyword::Proto),
            (allow_static, ContextualKeyword::Static),
        ] {
            if allowed && self.is_contextual(keyword) {
                let next = self.lookahead_type()?;
                if next != TokenType::COLON && next != TokenType::QUESTION {
                    self.next()?;
                }
            }
        }
        self.flow_parse_variance()?;
        if self.eat(TokenType::BRACKET_L)? {
            if self.eat(TokenType::BRACKET_L)? {
                return self.flow_parse_object_type_internal_slot();
            }
            return self.flow_parse_object_type_indexer();
        }
        if self.is(TokenType::PAREN_L) || self.is(TokenType::LESS_THAN) {
            return self.flow_parse_object_type_methodish();
        }
        if self.is_contextual(ContextualKeyword::Get) || self.is_contextual(ContextualKeyword::Set) {
            let next = self.lookahead_type()?;
            if next == TokenType::NAME || next == TokenType::STRING || next == TokenType::NUM {
                self.next()?;
            }
        }
        self.flow_parse_object_type_property()
    }

    fn flow_parse_object_type_property(&mut self) -> Result<()> {
        if self.eat(TokenType::ELLIPSIS)? {
            // Inexact marker `...` or a spread `...T`.
            if self.is(TokenType::COMMA)
                || self.is(TokenType::SEMI)
                || self.is(TokenType::BRACE_R)
                || self.is(TokenType::BRACE_BAR_R)
            {
                return Ok(());
            }
            return self.flow_parse_type();
        }
        self.flow_parse_object_property_key()?;
        if self.is(TokenType::LESS_THAN) || self.is(TokenType::PAREN_L) {
            return self.flow_parse_object_type_methodish();
        }
        self.eat(TokenType::QUESTION)?;
        self.flow_parse_type_initialiser(TokenType::COLON)
    }

    fn flow_parse_object_property_key(&mut self) -> Result<()> {
        if self.is(TokenType::STRING) || self.is(TokenType::NUM) {
            self.next()
        } else {
            self.parse_identifier()
        }
    }

    fn flow_parse_object_type_methodish(&mut self) -> Result<()> {
        if self.is(TokenType::LESS_THAN) {
            self.flow_parse_type_parameter_declaration()?;
        }
        self.expect(TokenType::PAREN_L)?;
        self.flow_parse_function_type_params()?;
        self.expect(TokenType::PAREN_R)?;
        self.flow_parse_type_initialiser(TokenType::COLON)
    }

    /// `[K]: V` or `[name: K]: V`; the `[` is consumed.
    fn flow_parse_object_type_indexer(&mut self) -> Result<()> {
        if self.lookahead_type()? == TokenType::COLON {
            self.flow_parse_object_property_key()?;
            self.flow_parse_type_initialiser(TokenType::COLON)?;
        } else {
            self.flow_parse_type()?;
        }
        self.expect(TokenType::BRACKET_R)?;
        self.flow_parse_type_initialiser(TokenType::COLON)
    }

    /// `[[name]]: T`; both `[` are consumed.
    fn flow_parse_object_type_internal_slot(&mut self) -> Result<()> {
        self.flow_parse_object_property_key()?;
        self.expect(TokenType::BRACKET_R)?;
        self.expect(TokenType::BRACKET_R)?;
        if self.is(TokenType::LESS_THAN) || self.is(TokenType::PAREN_L) {
            return self.flow_parse_object_type_methodish();
        }
        self.eat(TokenType::QUESTION)?;
        self.flow_parse_type_initialiser(TokenType::COLON)
    }

    fn flow_object_type_semicolon(&mut self) -> Result<()> {
        if !self.eat(TokenType::SEMI)?
            && !self.eat(TokenType::COMMA)?
            && !self.is(TokenType::BRACE_R)
            && !self.is(TokenType::BRACE_BAR_R)
        {
            return Err(self.unexpected());
        }
        Ok(())
    }
}
