//! Binding patterns: parameters, declarations and destructuring.

use super::Parser;
use crate::keywords::ContextualKeyword;
use crate::token_type::TokenType;
use zest_common::Result;

impl<'a> Parser<'a> {
    /// `...rest` in a parameter list or pattern.
    pub(crate) fn parse_rest(&mut self, is_block_scope: bool) -> Result<()> {
        self.next()?;
        self.parse_binding_atom(is_block_scope)
    }

    /// A single binding target: a name, an array pattern or an object
    /// pattern.
    pub(crate) fn parse_binding_atom(&mut self, is_block_scope: bool) -> Result<()> {
        match self.state.token_type {
            TokenType::THIS => {
                // A TypeScript `this` parameter.
                let old = self.push_type_context(0);
                self.next()?;
                self.pop_type_context(old);
                Ok(())
            }
            TokenType::YIELD | TokenType::NAME => {
                self.state.token_type = TokenType::NAME;
                self.parse_binding_identifier(is_block_scope)
            }
            TokenType::BRACKET_L => {
                self.next()?;
                self.parse_binding_list(TokenType::BRACKET_R, is_block_scope, true, false)
            }
            TokenType::BRACE_L => self.parse_obj(true, is_block_scope),
            _ if self.is_retyped_word() => {
                self.state.token_type = TokenType::NAME;
                self.parse_binding_identifier(is_block_scope)
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Items up to and including `close`; the opener is already consumed.
    pub(crate) fn parse_binding_list(
        &mut self,
        close: TokenType,
        is_block_scope: bool,
        allow_empty: bool,
        allow_modifiers: bool,
    ) -> Result<()> {
        let first_item_index = self.state.tokens.len();
        let mut first = true;
        let mut erased_this_comma = false;
        while !self.eat(close)? {
            if first {
                first = false;
            } else {
                self.expect(TokenType::COMMA)?;
                // The comma after a `this` parameter goes away with it.
                if !erased_this_comma && self.state.tokens[first_item_index].is_type {
                    let index = self.state.tokens.len() - 1;
                    self.state.tokens[index].is_type = true;
                    erased_this_comma = true;
                }
            }
            if allow_empty && self.is(TokenType::COMMA) {
                continue;
            }
            if self.eat(close)? {
                break;
            }
            if self.is(TokenType::ELLIPSIS) {
                self.parse_rest(is_block_scope)?;
                self.parse_assignable_list_item_types()?;
                self.eat(TokenType::COMMA)?;
                self.expect(close)?;
                break;
            }
            self.parse_assignable_list_item(allow_modifiers, is_block_scope)?;
        }
        Ok(())
    }

    fn parse_assignable_list_item(&mut self, allow_modifiers: bool, is_block_scope: bool) -> Result<()> {
        if self.is(TokenType::AT) {
            self.parse_decorators()?;
        }
        if allow_modifiers && self.is_typescript() {
            self.ts_parse_modifiers(&[
                ContextualKeyword::Public,
                ContextualKeyword::Protected,
                ContextualKeyword::Private,
                ContextualKeyword::Readonly,
                ContextualKeyword::Override,
            ])?;
        }
        self.parse_maybe_default(is_block_scope, false)?;
        self.parse_assignable_list_item_types()?;
        self.parse_maybe_default(is_block_scope, true)
    }

    /// `?` and `: T` after a parameter.
    fn parse_assignable_list_item_types(&mut self) -> Result<()> {
        if !self.is_typescript() && !self.is_flow() {
            return Ok(());
        }
        let old = self.push_type_context(0);
        let result = (|| {
            self.eat(TokenType::QUESTION)?;
            if self.is_typescript() {
                self.ts_try_parse_type_annotation()
            } else if self.is(TokenType::COLON) {
                self.flow_parse_type_annotation()
            } else {
                Ok(())
            }
        })();
        self.pop_type_context(old);
        result
    }

    /// A binding with an optional `= default`. The `=` records where its
    /// default value ends.
    pub(crate) fn parse_maybe_default(&mut self, is_block_scope: bool, left_already_parsed: bool) -> Result<()> {
        if !left_already_parsed {
            self.parse_binding_atom(is_block_scope)?;
        }
        if !self.is(TokenType::EQ) {
            return Ok(());
        }
        let eq_index = self.state.tokens.len();
        self.next()?;
        self.parse_maybe_assign(false)?;
        self.state.tokens[eq_index].rhs_end_index = Some(self.state.tokens.len());
        Ok(())
    }
}
