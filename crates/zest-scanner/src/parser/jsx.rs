//! JSX elements.
//!
//! Tag contents and child text are read by dedicated lexer modes; `{...}`
//! containers switch back to the normal expression grammar. Each element's
//! tag-start token records its child shape in `jsx_role`.

use super::Parser;
use crate::token::{ContextKind, IdentifierRole, JsxRole};
use crate::token_type::TokenType;
use zest_common::Result;

impl<'a> Parser<'a> {
    /// Consume the current token and read the next one inside a tag.
    fn next_jsx_tag_token(&mut self) -> Result<()> {
        self.push_token()?;
        self.jsx_read_tag_token()
    }

    /// Consume the current token and read child content.
    fn next_jsx_expr_token(&mut self) -> Result<()> {
        self.push_token()?;
        self.jsx_read_token()
    }

    /// Parse an element or fragment whose `<` is the current token (already
    /// typed `JSX_TAG_START`). Stops on the final `>` without consuming it.
    pub(crate) fn jsx_parse_element(&mut self) -> Result<()> {
        self.next_jsx_tag_token()?;
        self.jsx_parse_element_at()
    }

    fn jsx_parse_element_at(&mut self) -> Result<()> {
        let tag_start_index = self.state.tokens.len() - 1;
        self.state.tokens[tag_start_index].jsx_role = Some(JsxRole::NoChildren);
        if self.jsx_parse_opening_element(tag_start_index)? {
            return Ok(());
        }
        let mut explicit_children = 0usize;
        self.next_jsx_expr_token()?;
        loop {
            match self.state.token_type {
                TokenType::JSX_TAG_START => {
                    self.next_jsx_tag_token()?;
                    if self.is(TokenType::SLASH) {
                        self.next_jsx_tag_token()?;
                        self.jsx_parse_closing_element()?;
                        let token = &mut self.state.tokens[tag_start_index];
                        if token.jsx_role != Some(JsxRole::KeyAfterPropSpread) {
                            if explicit_children == 1 {
                                token.jsx_role = Some(JsxRole::OneChild);
                            } else if explicit_children > 1 {
                                token.jsx_role = Some(JsxRole::StaticChildren);
                            }
                        }
                        return Ok(());
                    }
                    explicit_children += 1;
                    self.jsx_parse_element_at()?;
                    self.next_jsx_expr_token()?;
                }
                TokenType::JSX_TEXT => {
                    explicit_children += 1;
                    self.next_jsx_expr_token()?;
                }
                TokenType::JSX_EMPTY_TEXT => self.next_jsx_expr_token()?,
                TokenType::BRACE_L => {
                    self.next()?;
                    self.set_context_kind(ContextKind::JsxExpression);
                    if self.is(TokenType::ELLIPSIS) {
                        // A spread child marks the children as static.
                        self.next()?;
                        self.parse_expression(false)?;
                        explicit_children += 2;
                    } else {
                        // `{}` and `{/* comment */}` are not children.
                        if !self.is(TokenType::BRACE_R) {
                            explicit_children += 1;
                            self.parse_expression(false)?;
                        }
                    }
                    if !self.is(TokenType::BRACE_R) {
                        return Err(self.unexpected_expected(TokenType::BRACE_R));
                    }
                    self.next_jsx_expr_token()?;
                }
                _ => return Err(self.unexpected()),
            }
        }
    }

    /// Name and attributes. Returns whether the element is self-closing.
    fn jsx_parse_opening_element(&mut self, tag_start_index: usize) -> Result<bool> {
        if self.is(TokenType::JSX_TAG_END) {
            // Fragment.
            return Ok(false);
        }
        self.jsx_parse_element_name()?;
        let mut seen_prop_spread = false;
        while !self.is(TokenType::SLASH) && !self.is(TokenType::JSX_TAG_END) {
            if self.is(TokenType::BRACE_L) {
                seen_prop_spread = true;
                self.next()?;
                self.set_context_kind(ContextKind::JsxExpression);
                self.expect(TokenType::ELLIPSIS)?;
                self.parse_maybe_assign(false)?;
                if !self.is(TokenType::BRACE_R) {
                    return Err(self.unexpected_expected(TokenType::BRACE_R));
                }
                self.next_jsx_tag_token()?;
                continue;
            }
            if seen_prop_spread && self.input.get(self.state.start as usize..self.state.end as usize) == Some("key") {
                self.state.tokens[tag_start_index].jsx_role = Some(JsxRole::KeyAfterPropSpread);
            }
            self.jsx_parse_namespaced_name(IdentifierRole::ObjectKey)?;
            if self.is(TokenType::EQ) {
                self.next_jsx_tag_token()?;
                self.jsx_parse_attribute_value()?;
            }
        }
        let self_closing = self.is(TokenType::SLASH);
        if self_closing {
            self.next_jsx_tag_token()?;
        }
        Ok(self_closing)
    }

    fn jsx_parse_closing_element(&mut self) -> Result<()> {
        if self.is(TokenType::JSX_TAG_END) {
            return Ok(());
        }
        self.jsx_parse_element_name()?;
        if !self.is(TokenType::JSX_TAG_END) {
            return Err(self.unexpected_expected(TokenType::JSX_TAG_END));
        }
        Ok(())
    }

    /// `Foo`, `foo`, `a.b.c` or `ns:name`. A lowercase name without dots is
    /// an intrinsic tag, not a reference.
    fn jsx_parse_element_name(&mut self) -> Result<()> {
        let first_index = self.state.tokens.len();
        self.jsx_parse_namespaced_name(IdentifierRole::Access)?;
        let mut had_dot = false;
        while self.is(TokenType::DOT) {
            had_dot = true;
            self.next_jsx_tag_token()?;
            self.jsx_parse_identifier()?;
        }
        if !had_dot {
            let first = &mut self.state.tokens[first_index];
            if self.bytes.get(first.start as usize).is_some_and(u8::is_ascii_lowercase) {
                first.identifier_role = None;
            }
        }
        Ok(())
    }

    fn jsx_parse_namespaced_name(&mut self, role: IdentifierRole) -> Result<()> {
        self.jsx_parse_identifier()?;
        if !self.is(TokenType::COLON) {
            self.set_last_role(role);
            return Ok(());
        }
        self.next_jsx_tag_token()?;
        self.jsx_parse_identifier()
    }

    fn jsx_parse_identifier(&mut self) -> Result<()> {
        if !self.is(TokenType::JSX_NAME) {
            return Err(self.unexpected());
        }
        self.next_jsx_tag_token()
    }

    fn jsx_parse_attribute_value(&mut self) -> Result<()> {
        match self.state.token_type {
            TokenType::BRACE_L => {
                self.next()?;
                self.set_context_kind(ContextKind::JsxExpression);
                if !self.is(TokenType::BRACE_R) {
                    self.parse_expression(false)?;
                }
                if !self.is(TokenType::BRACE_R) {
                    return Err(self.unexpected_expected(TokenType::BRACE_R));
                }
                self.next_jsx_tag_token()
            }
            TokenType::JSX_TAG_START => {
                self.jsx_parse_element()?;
                self.next_jsx_tag_token()
            }
            TokenType::STRING => self.next_jsx_tag_token(),
            _ => Err(self.unexpected()),
        }
    }
}
