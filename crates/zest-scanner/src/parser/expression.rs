//! Expressions.
//!
//! Besides consuming tokens, the expression grammar records the boundaries
//! the rewrite units work from: where an assignment's right-hand side ends,
//! which tokens open and close optional chains and `??` operands, and which
//! logical assignments can be lowered.

use super::Parser;
use crate::keywords::ContextualKeyword;
use crate::token::{ContextKind, IdentifierRole, LogicalAssignRole};
use crate::token_type::TokenType;
use zest_common::Result;

impl<'a> Parser<'a> {
    /// A comma-separated expression.
    pub(crate) fn parse_expression(&mut self, no_in: bool) -> Result<()> {
        self.parse_maybe_assign(no_in)?;
        while self.eat(TokenType::COMMA)? {
            self.parse_maybe_assign(no_in)?;
        }
        Ok(())
    }

    pub(crate) fn parse_maybe_assign(&mut self, no_in: bool) -> Result<()> {
        self.parse_maybe_assign_in(no_in, false).map(|_| ())
    }

    /// Returns whether the expression was an arrow function.
    pub(crate) fn parse_maybe_assign_in(&mut self, no_in: bool, within_parens: bool) -> Result<bool> {
        if (self.is_typescript() || self.is_flow()) && self.is(TokenType::LESS_THAN) {
            return self.typed_parse_maybe_assign(no_in, within_parens);
        }
        self.base_parse_maybe_assign(no_in, within_parens)
    }

    /// `<` at the start of an assignment expression in a typed dialect is a
    /// JSX element, a generic arrow function or a type assertion.
    fn typed_parse_maybe_assign(&mut self, no_in: bool, within_parens: bool) -> Result<bool> {
        let mut was_arrow = false;
        if self.is_jsx() {
            let parsed = self.try_parse(|p| {
                was_arrow = p.base_parse_maybe_assign(no_in, within_parens)?;
                Ok(true)
            })?;
            if parsed {
                return Ok(was_arrow);
            }
        }
        let parsed = self.try_parse(|p| {
            if p.is_typescript() {
                p.ts_parse_type_parameters()?;
            } else {
                p.flow_parse_type_parameter_declaration()?;
            }
            was_arrow = p.base_parse_maybe_assign(no_in, within_parens)?;
            Ok(was_arrow)
        })?;
        if parsed {
            return Ok(true);
        }
        if self.is_jsx() {
            return Err(self.unexpected());
        }
        // A type assertion, picked up by `parse_maybe_unary`.
        self.base_parse_maybe_assign(no_in, within_parens)
    }

    fn base_parse_maybe_assign(&mut self, no_in: bool, within_parens: bool) -> Result<bool> {
        if self.is(TokenType::YIELD) {
            self.parse_yield()?;
            return Ok(false);
        }
        if self.is(TokenType::PAREN_L) || self.is(TokenType::NAME) {
            self.state.potential_arrow_at = Some(self.state.start);
        }
        let start_index = self.state.tokens.len();
        let was_arrow = self.parse_maybe_conditional(no_in)?;
        if within_parens {
            self.parse_paren_item()?;
        }
        if self.state.token_type.is_assign() {
            let operator_index = self.state.tokens.len();
            self.next()?;
            self.mark_logical_assignment(start_index, operator_index);
            self.parse_maybe_assign(no_in)?;
            self.state.tokens[operator_index].rhs_end_index = Some(self.state.tokens.len());
            return Ok(false);
        }
        Ok(was_arrow)
    }

    /// Annotate `a ??= b` style assignments whose left-hand side is a plain
    /// name or a member access. Other targets are left alone.
    fn mark_logical_assignment(&mut self, start_index: usize, operator_index: usize) {
        let operator = self.state.tokens[operator_index].text(self.input);
        if !matches!(operator, "&&=" | "||=" | "??=") || operator_index <= start_index {
            return;
        }
        let tokens = &mut self.state.tokens;
        let first = tokens[start_index];
        if first.is_type || first.token_type == TokenType::SUPER {
            return;
        }
        if operator_index == start_index + 1 {
            if first.token_type == TokenType::NAME {
                tokens[start_index].logical_assign = Some(LogicalAssignRole::Target { operator_index });
            }
            return;
        }
        let last = operator_index - 1;
        let access = match tokens[last].token_type {
            TokenType::NAME if last >= 2 && last - 1 > start_index && tokens[last - 1].token_type == TokenType::DOT => {
                Some(last - 1)
            }
            TokenType::BRACKET_R => {
                let id = tokens[last].context_id;
                (start_index + 1..last)
                    .rev()
                    .find(|&i| tokens[i].token_type == TokenType::BRACKET_L && tokens[i].context_id == id)
            }
            _ => None,
        };
        if let Some(access) = access {
            tokens[start_index].logical_assign = Some(LogicalAssignRole::MemberStart);
            tokens[access].logical_assign = Some(LogicalAssignRole::MemberAccess { operator_index });
        }
    }

    fn parse_yield(&mut self) -> Result<()> {
        self.next()?;
        let ends = self.is(TokenType::SEMI)
            || self.is(TokenType::PAREN_R)
            || self.is(TokenType::BRACKET_R)
            || self.is(TokenType::BRACE_R)
            || self.is(TokenType::COMMA)
            || self.is(TokenType::COLON)
            || self.can_insert_semicolon();
        if !ends {
            self.eat(TokenType::STAR)?;
            self.parse_maybe_assign(false)?;
        }
        Ok(())
    }

    /// Optional parameter marker and type annotation inside a parenthesized
    /// expression that may turn out to be arrow parameters, or a Flow cast.
    fn parse_paren_item(&mut self) -> Result<()> {
        if !self.is_typescript() && !self.is_flow() {
            return Ok(());
        }
        if self.is(TokenType::QUESTION) {
            let old = self.push_type_context(0);
            self.next()?;
            self.pop_type_context(old);
        }
        if self.is(TokenType::COLON) {
            if self.is_typescript() {
                self.ts_try_parse_type_annotation()?;
            } else {
                self.flow_parse_type_annotation()?;
            }
        }
        Ok(())
    }

    // ===== Conditional and binary operators =====

    fn parse_maybe_conditional(&mut self, no_in: bool) -> Result<bool> {
        if self.parse_expr_ops(no_in)? {
            return Ok(true);
        }
        if self.is(TokenType::QUESTION) {
            if self.is_typescript() || self.is_flow() {
                // `(a?: T) =>` and `(a?, b)` are optional parameters.
                let next = self.lookahead_type()?;
                if next == TokenType::COLON || next == TokenType::COMMA || next == TokenType::PAREN_R {
                    return Ok(false);
                }
            }
            self.next()?;
            self.parse_maybe_assign(false)?;
            self.expect(TokenType::COLON)?;
            self.parse_maybe_assign(no_in)?;
        }
        Ok(false)
    }

    fn parse_expr_ops(&mut self, no_in: bool) -> Result<bool> {
        let start_index = self.state.tokens.len();
        if self.parse_maybe_unary()? {
            return Ok(true);
        }
        self.parse_expr_op(start_index, 0, no_in)?;
        Ok(false)
    }

    /// Precedence climbing. `min_prec` is exclusive; 0 accepts everything.
    fn parse_expr_op(&mut self, start_index: usize, min_prec: u32, no_in: bool) -> Result<()> {
        if self.is_typescript()
            && TokenType::IN.binop() > min_prec
            && !self.has_preceding_line_break()
            && (self.is_contextual(ContextualKeyword::As) || self.is_contextual(ContextualKeyword::Satisfies))
        {
            let old = self.push_type_context(0);
            self.next()?;
            self.retype_last(TokenType::AS);
            self.ts_parse_type()?;
            self.pop_type_context(old);
            self.relex_gt();
            return self.parse_expr_op(start_index, min_prec, no_in);
        }
        let prec = self.state.token_type.binop();
        if prec == 0 || prec <= min_prec || (no_in && self.is(TokenType::IN)) {
            return Ok(());
        }
        let operator = self.state.token_type;
        self.next()?;
        if operator == TokenType::NULLISH_COALESCING {
            let index = self.state.tokens.len() - 1;
            self.state.tokens[index].nullish_start_index = Some(start_index);
        }
        let rhs_start = self.state.tokens.len();
        self.parse_maybe_unary()?;
        let rhs_prec = if operator.is_right_associative() { prec - 1 } else { prec };
        self.parse_expr_op(rhs_start, rhs_prec, no_in)?;
        if operator == TokenType::NULLISH_COALESCING {
            let end = self.state.tokens.len() - 1;
            self.state.tokens[start_index].num_nullish_coalesce_starts += 1;
            self.state.tokens[end].num_nullish_coalesce_ends += 1;
        }
        self.parse_expr_op(start_index, min_prec, no_in)
    }

    // ===== Unary and postfix =====

    fn parse_maybe_unary(&mut self) -> Result<bool> {
        if self.is_typescript() && !self.is_jsx() && self.is(TokenType::LESS_THAN) {
            return self.ts_parse_type_assertion().map(|()| false);
        }
        if self.state.token_type.is_prefix() {
            self.next()?;
            self.parse_maybe_unary()?;
            return Ok(false);
        }
        if self.parse_expr_subscripts_inner()? {
            return Ok(true);
        }
        while self.state.token_type.is_postfix() && !self.can_insert_semicolon() {
            if self.is(TokenType::PRE_INC_DEC) {
                self.state.token_type = TokenType::POST_INC_DEC;
            }
            self.next()?;
        }
        Ok(false)
    }

    /// `<T>expr` in a `.ts` file.
    fn ts_parse_type_assertion(&mut self) -> Result<()> {
        let old = self.push_type_context(0);
        self.next()?;
        self.ts_parse_type()?;
        self.expect_gt()?;
        self.pop_type_context(old);
        self.parse_maybe_unary().map(|_| ())
    }

    // ===== Subscripts =====

    pub(crate) fn parse_expr_subscripts(&mut self) -> Result<()> {
        self.parse_expr_subscripts_inner().map(|_| ())
    }

    fn parse_expr_subscripts_inner(&mut self) -> Result<bool> {
        let start_index = self.state.tokens.len();
        if self.parse_expr_atom()? {
            return Ok(true);
        }
        self.parse_subscripts(start_index, false)?;
        let len = self.state.tokens.len();
        if len > start_index && self.state.tokens[start_index].is_optional_chain_start {
            self.state.tokens[len - 1].is_optional_chain_end = true;
        }
        Ok(false)
    }

    fn parse_subscripts(&mut self, start_index: usize, no_calls: bool) -> Result<()> {
        while !self.parse_subscript(start_index, no_calls)? {}
        Ok(())
    }

    /// Parse one subscript. Returns `true` when there are no more.
    fn parse_subscript(&mut self, start_index: usize, no_calls: bool) -> Result<bool> {
        if self.is_typescript() || self.is_flow() {
            if let Some(stop) = self.typed_parse_subscript(start_index, no_calls)? {
                return Ok(stop);
            }
        }
        if self.is(TokenType::QUESTION_DOT) {
            self.state.tokens[start_index].is_optional_chain_start = true;
            if no_calls && self.lookahead_type()? == TokenType::PAREN_L {
                return Ok(true);
            }
            self.next()?;
            self.mark_subscript(start_index);
            if self.eat(TokenType::BRACKET_L)? {
                self.parse_expression(false)?;
                self.expect(TokenType::BRACKET_R)?;
            } else if self.eat(TokenType::PAREN_L)? {
                self.parse_call_expression_arguments()?;
            } else {
                self.parse_maybe_private_name()?;
            }
        } else if self.eat(TokenType::DOT)? {
            self.mark_subscript(start_index);
            self.parse_maybe_private_name()?;
        } else if self.eat(TokenType::BRACKET_L)? {
            self.mark_subscript(start_index);
            self.parse_expression(false)?;
            self.expect(TokenType::BRACKET_R)?;
        } else if !no_calls && self.is(TokenType::PAREN_L) {
            if self.at_possible_async() {
                return self.parse_call_or_async_arrow(start_index);
            }
            self.next()?;
            self.mark_subscript(start_index);
            self.parse_call_expression_arguments()?;
        } else if self.is(TokenType::BACK_QUOTE) {
            self.parse_template()?;
        } else {
            return Ok(true);
        }
        Ok(false)
    }

    fn mark_subscript(&mut self, start_index: usize) {
        if let Some(token) = self.last_token_mut() {
            token.subscript_start_index = Some(start_index);
        }
    }

    fn at_possible_async(&self) -> bool {
        self.state
            .tokens
            .last()
            .is_some_and(|t| t.token_type == TokenType::NAME && t.contextual_keyword == ContextualKeyword::Async)
            && !self.can_insert_semicolon()
    }

    /// `async(...)` is a call unless an arrow follows, in which case the
    /// arguments are parsed again as parameters.
    fn parse_call_or_async_arrow(&mut self, start_index: usize) -> Result<bool> {
        let snapshot = self.state.snapshot();
        let arrow_start = self.state.tokens.len();
        self.next()?;
        self.mark_subscript(start_index);
        self.parse_call_expression_arguments()?;
        if !self.is(TokenType::COLON) && !self.is(TokenType::ARROW) {
            return Ok(false);
        }
        self.state.restore(snapshot);
        self.retype_last(TokenType::ASYNC);
        self.state.scope_depth += 1;
        self.parse_function_params(false)?;
        self.parse_arrow_return_type()?;
        self.expect(TokenType::ARROW)?;
        self.parse_arrow_expression(arrow_start)?;
        Ok(true)
    }

    /// Type arguments, non-null assertions and `?.<T>()` calls. Returns
    /// `None` when the plain subscript rules apply.
    fn typed_parse_subscript(&mut self, start_index: usize, no_calls: bool) -> Result<Option<bool>> {
        if self.is_typescript() && self.is(TokenType::BANG) && !self.has_preceding_line_break() {
            self.state.token_type = TokenType::NON_NULL_ASSERTION;
            self.next()?;
            return Ok(Some(false));
        }
        if self.is(TokenType::LESS_THAN) || self.is(TokenType::BIT_SHIFT_L) {
            if !no_calls && self.is_typescript() && self.at_possible_async() {
                let arrow = self.try_parse(|p| p.ts_parse_generic_async_arrow())?;
                if arrow {
                    return Ok(Some(true));
                }
            }
            let parsed = self.try_parse(|p| {
                p.rescan_lt();
                p.parse_call_type_arguments()?;
                if !no_calls && p.eat(TokenType::PAREN_L)? {
                    p.mark_subscript(start_index);
                    p.parse_call_expression_arguments()?;
                    return Ok(true);
                }
                if p.is(TokenType::BACK_QUOTE) {
                    p.parse_template()?;
                    return Ok(true);
                }
                if !p.is_typescript() {
                    return Ok(false);
                }
                // An instantiation expression like `Array<number>` must not
                // run straight into another operand.
                let bail = p.is(TokenType::GREATER_THAN)
                    || (!p.is(TokenType::PAREN_L)
                        && p.state.token_type.starts_expr()
                        && !p.has_preceding_line_break());
                Ok(!bail)
            })?;
            if parsed {
                return Ok(Some(false));
            }
            return Ok(None);
        }
        if self.is(TokenType::QUESTION_DOT) && self.lookahead_type()? == TokenType::LESS_THAN {
            if no_calls {
                return Ok(Some(true));
            }
            self.next()?;
            self.state.tokens[start_index].is_optional_chain_start = true;
            self.mark_subscript(start_index);
            self.parse_call_type_arguments()?;
            self.expect(TokenType::PAREN_L)?;
            self.parse_call_expression_arguments()?;
            return Ok(Some(false));
        }
        Ok(None)
    }

    fn parse_call_type_arguments(&mut self) -> Result<()> {
        if self.is_typescript() {
            self.ts_parse_type_arguments()
        } else {
            self.flow_parse_type_parameter_instantiation()
        }
    }

    /// `async <T>(x: T) => ...`, entered with `async` consumed and `<` current.
    fn ts_parse_generic_async_arrow(&mut self) -> Result<bool> {
        let Some(async_index) = self.state.tokens.len().checked_sub(1) else {
            return Ok(false);
        };
        let arrow_start = self.state.tokens.len();
        self.state.scope_depth += 1;
        self.parse_function_params(false)?;
        self.parse_arrow_return_type()?;
        if !self.is(TokenType::ARROW) {
            return Ok(false);
        }
        self.state.tokens[async_index].token_type = TokenType::ASYNC;
        self.state.tokens[async_index].identifier_role = None;
        self.next()?;
        self.parse_arrow_expression(arrow_start)?;
        Ok(true)
    }

    /// Arguments of a call, entered just after `(`.
    pub(crate) fn parse_call_expression_arguments(&mut self) -> Result<()> {
        let mut first = true;
        while !self.eat(TokenType::PAREN_R)? {
            if first {
                first = false;
            } else {
                self.expect(TokenType::COMMA)?;
                if self.eat(TokenType::PAREN_R)? {
                    break;
                }
            }
            self.parse_expr_list_item(false)?;
        }
        Ok(())
    }

    fn parse_maybe_private_name(&mut self) -> Result<()> {
        self.eat(TokenType::HASH)?;
        self.parse_identifier()
    }

    // ===== Atoms =====

    /// Returns whether the atom was an arrow function.
    fn parse_expr_atom(&mut self) -> Result<bool> {
        let start_index = self.state.tokens.len();
        if self.is(TokenType::JSX_TEXT) || self.is(TokenType::JSX_EMPTY_TEXT) {
            self.next()?;
            return Ok(false);
        }
        if self.is(TokenType::LESS_THAN) && self.is_jsx() {
            self.state.token_type = TokenType::JSX_TAG_START;
            self.jsx_parse_element()?;
            self.next()?;
            return Ok(false);
        }
        let can_be_arrow = self.state.potential_arrow_at == Some(self.state.start);
        match self.state.token_type {
            TokenType::SLASH | TokenType::ASSIGN if self.byte_at(self.state.start) == b'/' => {
                self.read_regexp()?;
                self.next()?;
            }
            TokenType::SUPER
            | TokenType::THIS
            | TokenType::REGEXP
            | TokenType::NUM
            | TokenType::BIGINT
            | TokenType::STRING
            | TokenType::NULL
            | TokenType::TRUE
            | TokenType::FALSE => self.next()?,
            TokenType::IMPORT => {
                self.next()?;
                if self.is(TokenType::DOT) {
                    // import.meta
                    self.retype_last(TokenType::NAME);
                    self.next()?;
                    self.parse_identifier()?;
                }
            }
            TokenType::NAME => return self.parse_name_atom(start_index, can_be_arrow),
            TokenType::PAREN_L => return self.parse_paren_and_distinguish_expression(can_be_arrow),
            TokenType::BRACKET_L => {
                self.next()?;
                self.parse_expr_list(TokenType::BRACKET_R, true)?;
            }
            TokenType::BRACE_L => self.parse_obj(false, false)?,
            TokenType::FUNCTION => {
                let function_start = self.state.start;
                self.next()?;
                if self.eat(TokenType::DOT)? {
                    // function.sent
                    self.parse_identifier()?;
                } else {
                    self.parse_function(function_start, false, false)?;
                }
            }
            TokenType::AT => {
                self.parse_decorators()?;
                self.parse_class(false, false)?;
            }
            TokenType::CLASS => self.parse_class(false, false)?,
            TokenType::NEW => self.parse_new()?,
            TokenType::BACK_QUOTE => self.parse_template()?,
            TokenType::HASH => {
                // `#x in obj`
                self.next()?;
                self.parse_identifier()?;
            }
            _ => return Err(self.unexpected()),
        }
        Ok(false)
    }

    fn parse_name_atom(&mut self, start_index: usize, can_be_arrow: bool) -> Result<bool> {
        let function_start = self.state.start;
        let keyword = self.state.contextual_keyword;
        self.parse_identifier()?;
        match keyword {
            ContextualKeyword::Await if self.starts_await_operand() => {
                self.parse_maybe_unary()?;
                return Ok(false);
            }
            ContextualKeyword::Async if !self.can_insert_semicolon() => {
                if self.is(TokenType::FUNCTION) {
                    self.retype_last(TokenType::ASYNC);
                    self.next()?;
                    self.parse_function(function_start, false, false)?;
                    return Ok(false);
                }
                if can_be_arrow && self.is(TokenType::NAME) {
                    // async x => ...
                    self.retype_last(TokenType::ASYNC);
                    let arrow_start = self.state.tokens.len();
                    self.state.scope_depth += 1;
                    self.parse_binding_identifier(false)?;
                    self.expect(TokenType::ARROW)?;
                    self.parse_arrow_expression(arrow_start)?;
                    return Ok(true);
                }
            }
            _ => {}
        }
        if can_be_arrow && !self.can_insert_semicolon() && self.is(TokenType::ARROW) {
            self.state.scope_depth += 1;
            self.mark_prior_binding_identifier(false);
            self.expect(TokenType::ARROW)?;
            self.parse_arrow_expression(start_index)?;
            return Ok(true);
        }
        self.set_last_role(IdentifierRole::Access);
        Ok(false)
    }

    /// Whether the token after `await` can begin its operand. Otherwise
    /// `await` is an ordinary name.
    fn starts_await_operand(&self) -> bool {
        let tt = self.state.token_type;
        tt.starts_expr() || tt.is_prefix() || tt == TokenType::LESS_THAN || tt == TokenType::HASH
    }

    fn parse_new(&mut self) -> Result<()> {
        self.expect(TokenType::NEW)?;
        if self.eat(TokenType::DOT)? {
            // new.target
            return self.parse_identifier();
        }
        let start_index = self.state.tokens.len();
        self.parse_expr_atom()?;
        self.parse_subscripts(start_index, true)?;
        self.eat(TokenType::QUESTION_DOT)?;
        if self.is_flow() && self.is(TokenType::LESS_THAN) {
            self.try_parse(|p| {
                p.flow_parse_type_parameter_instantiation()?;
                Ok(p.is(TokenType::PAREN_L))
            })?;
        }
        if self.eat(TokenType::PAREN_L)? {
            self.parse_expr_list(TokenType::PAREN_R, false)?;
        }
        Ok(())
    }

    /// Parse a template literal starting at its opening backquote. Chunks
    /// and delimiters alternate, so each `${` is preceded by a chunk token.
    pub(crate) fn parse_template(&mut self) -> Result<()> {
        self.next_template_token()?;
        self.next_template_token()?;
        while !self.is(TokenType::BACK_QUOTE) {
            self.expect(TokenType::DOLLAR_BRACE_L)?;
            if self.state.is_type && self.is_typescript() {
                self.ts_parse_type()?;
            } else {
                self.parse_expression(false)?;
            }
            if !self.is(TokenType::BRACE_R) {
                return Err(self.unexpected_expected(TokenType::BRACE_R));
            }
            self.next_template_token()?;
            self.next_template_token()?;
        }
        self.next()
    }

    /// `(...)` that may be a parenthesized expression or arrow parameters.
    /// It is parsed as an expression first; if an arrow follows, it is
    /// re-parsed as a parameter list so bindings get declaration roles.
    fn parse_paren_and_distinguish_expression(&mut self, can_be_arrow: bool) -> Result<bool> {
        let snapshot = self.state.snapshot();
        let start_index = self.state.tokens.len();
        self.expect(TokenType::PAREN_L)?;
        let mut first = true;
        while !self.is(TokenType::PAREN_R) {
            if first {
                first = false;
            } else {
                self.expect(TokenType::COMMA)?;
                if self.is(TokenType::PAREN_R) {
                    break;
                }
            }
            if self.is(TokenType::ELLIPSIS) {
                self.parse_rest(false)?;
                self.parse_paren_item()?;
                break;
            }
            self.parse_maybe_assign_in(false, true)?;
        }
        self.expect(TokenType::PAREN_R)?;

        let arrow_follows = self.is(TokenType::COLON) || !self.can_insert_semicolon();
        if !can_be_arrow || !arrow_follows || !self.parse_arrow()? {
            return Ok(false);
        }
        self.state.restore(snapshot);
        let reparsed = self.try_parse(|p| {
            p.state.scope_depth += 1;
            p.parse_function_params(false)?;
            if !p.parse_arrow()? {
                return Ok(false);
            }
            p.parse_arrow_expression(start_index)?;
            Ok(true)
        })?;
        if reparsed {
            return Ok(true);
        }
        self.parse_paren_and_distinguish_expression(false)
    }

    /// Consume an optional return type and then `=>`, if present.
    fn parse_arrow(&mut self) -> Result<bool> {
        if self.is(TokenType::COLON) && (self.is_typescript() || self.is_flow()) {
            self.try_parse(|p| {
                p.parse_arrow_return_type()?;
                Ok(!p.can_insert_semicolon() && p.is(TokenType::ARROW))
            })?;
        }
        self.eat(TokenType::ARROW)
    }

    fn parse_arrow_return_type(&mut self) -> Result<()> {
        if !self.is(TokenType::COLON) {
            return Ok(());
        }
        if self.is_typescript() {
            self.ts_parse_return_type_annotation()
        } else if self.is_flow() {
            let old_no_anon = self.state.no_anon_function_type;
            self.state.no_anon_function_type = true;
            let result = self.flow_parse_type_and_predicate_annotation();
            self.state.no_anon_function_type = old_no_anon;
            result
        } else {
            Err(self.unexpected())
        }
    }

    /// Body of an arrow function whose parameters started at `start_index`.
    /// The caller has already entered the function's scope depth.
    pub(crate) fn parse_arrow_expression(&mut self, start_index: usize) -> Result<()> {
        self.parse_function_body(true)?;
        self.push_scope(start_index, true);
        self.state.scope_depth -= 1;
        Ok(())
    }

    fn parse_expr_list(&mut self, close: TokenType, allow_empty: bool) -> Result<()> {
        let mut first = true;
        while !self.eat(close)? {
            if first {
                first = false;
            } else {
                self.expect(TokenType::COMMA)?;
                if self.eat(close)? {
                    break;
                }
            }
            self.parse_expr_list_item(allow_empty)?;
        }
        Ok(())
    }

    fn parse_expr_list_item(&mut self, allow_empty: bool) -> Result<()> {
        if allow_empty && self.is(TokenType::COMMA) {
            return Ok(());
        }
        if self.is(TokenType::ELLIPSIS) {
            self.parse_spread()?;
            return self.parse_paren_item();
        }
        self.parse_maybe_assign_in(false, true).map(|_| ())
    }

    pub(crate) fn parse_spread(&mut self) -> Result<()> {
        self.next()?;
        self.parse_maybe_assign(false)
    }

    // ===== Objects =====

    /// An object literal, or an object pattern when `is_pattern` is set.
    pub(crate) fn parse_obj(&mut self, is_pattern: bool, is_block_scope: bool) -> Result<()> {
        self.expect(TokenType::BRACE_L)?;
        self.set_context_kind(ContextKind::Object);
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

            if self.is(TokenType::ELLIPSIS) {
                let previous_len = self.state.tokens.len();
                self.parse_spread()?;
                if is_pattern && self.state.tokens.len() == previous_len + 2 {
                    self.mark_prior_binding_identifier(is_block_scope);
                }
                continue;
            }

            let mut is_generator = false;
            if !is_pattern {
                is_generator = self.eat(TokenType::STAR)?;
            }
            if !is_pattern && !is_generator && self.is_contextual(ContextualKeyword::Async) {
                self.parse_identifier()?;
                let is_key = self.is(TokenType::COLON)
                    || self.is(TokenType::PAREN_L)
                    || self.is(TokenType::BRACE_R)
                    || self.is(TokenType::EQ)
                    || self.is(TokenType::COMMA);
                if is_key {
                    self.set_last_role(IdentifierRole::ObjectKey);
                } else {
                    self.retype_last(TokenType::ASYNC);
                    self.eat(TokenType::STAR)?;
                    self.parse_property_name()?;
                }
            } else {
                self.parse_property_name()?;
            }
            self.parse_obj_prop_value(is_pattern, is_block_scope)?;
        }
        Ok(())
    }

    /// A member name: identifier, string, number, private name or
    /// computed `[key]`.
    pub(crate) fn parse_property_name(&mut self) -> Result<()> {
        if self.is_flow() {
            self.flow_parse_variance()?;
        }
        if self.eat(TokenType::BRACKET_L)? {
            self.parse_maybe_assign(false)?;
            return self.expect(TokenType::BRACKET_R);
        }
        if self.is(TokenType::NUM) || self.is(TokenType::STRING) || self.is(TokenType::BIGINT) {
            self.next()?;
        } else {
            self.parse_maybe_private_name()?;
        }
        self.set_last_role(IdentifierRole::ObjectKey);
        Ok(())
    }

    fn parse_obj_prop_value(&mut self, is_pattern: bool, is_block_scope: bool) -> Result<()> {
        if self.parse_object_method(is_pattern)? {
            return Ok(());
        }
        self.parse_object_property(is_pattern, is_block_scope)
    }

    fn parse_object_method(&mut self, is_pattern: bool) -> Result<bool> {
        let function_start = self.state.start;
        if self.is(TokenType::PAREN_L) || self.is(TokenType::LESS_THAN) {
            if is_pattern {
                return Err(self.unexpected());
            }
            self.parse_method(function_start, false)?;
            return Ok(true);
        }
        let accessor_name = !is_pattern
            && (self.is(TokenType::STRING)
                || self.is(TokenType::NUM)
                || self.is(TokenType::BRACKET_L)
                || self.is(TokenType::NAME)
                || self.is(TokenType::HASH)
                || self.state.token_type.is_keyword());
        if !accessor_name {
            return Ok(false);
        }
        match self.state.tokens.last().map(|t| t.contextual_keyword) {
            Some(ContextualKeyword::Get) => self.retype_last(TokenType::GET),
            Some(ContextualKeyword::Set) => self.retype_last(TokenType::SET),
            _ => {}
        }
        self.parse_property_name()?;
        self.parse_method(function_start, false)?;
        Ok(true)
    }

    fn parse_object_property(&mut self, is_pattern: bool, is_block_scope: bool) -> Result<()> {
        if self.eat(TokenType::COLON)? {
            return if is_pattern {
                self.parse_maybe_default(is_block_scope, false)
            } else {
                self.parse_maybe_assign(false)
            };
        }
        // No colon: a shorthand property, which in a pattern declares the name.
        let role = if !is_pattern {
            IdentifierRole::ObjectShorthand
        } else if self.state.scope_depth == 0 {
            IdentifierRole::ObjectShorthandTopLevelDeclaration
        } else if is_block_scope {
            IdentifierRole::ObjectShorthandBlockScopedDeclaration
        } else {
            IdentifierRole::ObjectShorthandFunctionScopedDeclaration
        };
        self.set_last_role(role);
        self.parse_maybe_default(is_block_scope, true)
    }
}
