//! `a?.b` and `a ?? b` lowered to helper calls.
//!
//! The helper call openers and closers around each chain are token affixes
//! computed up front; this unit only rewrites the operators between them:
//!
//! ```text
//! a?.b.c()   ->  _optionalChain([a, 'optionalAccess', _ => _.b, 'access', _2 => _2.c, 'call', _3 => _3()])
//! a ?? b     ->  _nullishCoalesce(a, () => (b))
//! ```

use super::Transformer;
use crate::context::TransformContext;
use crate::driver::Driver;
use zest_common::Result;
use zest_scanner::TokenType;

#[derive(Debug, Default)]
pub struct OptionalChainingNullishTransformer;

impl OptionalChainingNullishTransformer {
    pub fn new() -> Self {
        OptionalChainingNullishTransformer
    }

    /// Whether the subscript at the cursor is the last one of its chain.
    fn is_last_subscript_in_chain(cx: &TransformContext<'_>) -> Result<bool> {
        let tokens = cx.tokens.tokens();
        let mut depth = 0i64;
        let mut index = cx.tokens.current_index() + 1;
        loop {
            let Some(token) = tokens.get(index) else {
                return Err(cx.tokens.error("Reached the end of the code while finding the end of the access chain"));
            };
            if token.is_optional_chain_start {
                depth += 1;
            } else if token.is_optional_chain_end {
                depth -= 1;
            }
            if depth < 0 {
                return Ok(true);
            }
            if depth == 0 && token.subscript_start_index.is_some() {
                return Ok(false);
            }
            index += 1;
        }
    }

    /// Whether the subscript before the cursor was applied to `super`.
    fn just_skipped_super(cx: &TransformContext<'_>) -> Result<bool> {
        let tokens = cx.tokens.tokens();
        let mut depth = 0i64;
        let mut index = cx.tokens.current_index();
        loop {
            let Some(previous) = index.checked_sub(1) else {
                return Err(cx.tokens.error("Reached the start of the code while finding the start of the access chain"));
            };
            index = previous;
            let token = &tokens[index];
            if token.is_optional_chain_start {
                depth -= 1;
            } else if token.is_optional_chain_end {
                depth += 1;
            }
            if depth < 0 {
                return Ok(false);
            }
            if depth == 0 && token.subscript_start_index.is_some() {
                return Ok(index > 0 && tokens[index - 1].token_type == TokenType::SUPER);
            }
        }
    }
}

impl Transformer for OptionalChainingNullishTransformer {
    fn name(&self) -> &'static str {
        "optional-chaining-nullish"
    }

    fn process(&self, cx: &mut TransformContext<'_>, _driver: &Driver) -> Result<bool> {
        if cx.tokens.matches1(TokenType::NULLISH_COALESCING) {
            let token = cx.tokens.current_token();
            let is_async = token
                .nullish_start_index
                .is_some_and(|start| cx.tokens.is_async_operation(start));
            let replacement = if is_async { ", async () => (" } else { ", () => (" };
            cx.tokens.replace_token_trimming_left_whitespace(replacement);
            return Ok(true);
        }
        if cx.tokens.matches1(TokenType::DELETE) && cx.tokens.token_at_relative_index(1).is_optional_chain_start {
            // Re-inserted at the last subscript.
            cx.tokens.remove_initial_token();
            return Ok(true);
        }

        let Some(chain_start) = cx.tokens.current_token().subscript_start_index else {
            return Ok(false);
        };
        if !cx.tokens.token_at(chain_start).is_optional_chain_start
            || cx.tokens.token_at_relative_index(-1).token_type == TokenType::SUPER
        {
            return Ok(false);
        }

        let param = cx.names.claim_free_name("_");
        let is_delete = chain_start > 0
            && cx.tokens.matches1_at_index(chain_start - 1, TokenType::DELETE)
            && Self::is_last_subscript_in_chain(cx)?;
        let mut arrow_start = if is_delete {
            format!("{param} => delete {param}")
        } else {
            format!("{param} => {param}")
        };
        if cx.tokens.is_async_operation(chain_start) {
            arrow_start = format!("async {arrow_start}");
        }

        let replacement = if cx.tokens.matches2(TokenType::QUESTION_DOT, TokenType::PAREN_L)
            || cx.tokens.matches2(TokenType::QUESTION_DOT, TokenType::LESS_THAN)
        {
            if Self::just_skipped_super(cx)? {
                cx.tokens.append_code(".bind(this)");
            }
            format!(", 'optionalCall', {arrow_start}")
        } else if cx.tokens.matches2(TokenType::QUESTION_DOT, TokenType::BRACKET_L) {
            format!(", 'optionalAccess', {arrow_start}")
        } else if cx.tokens.matches1(TokenType::QUESTION_DOT) {
            format!(", 'optionalAccess', {arrow_start}.")
        } else if cx.tokens.matches1(TokenType::DOT) {
            format!(", 'access', {arrow_start}.")
        } else if cx.tokens.matches1(TokenType::BRACKET_L) {
            format!(", 'access', {arrow_start}[")
        } else if cx.tokens.matches1(TokenType::PAREN_L) {
            if Self::just_skipped_super(cx)? {
                cx.tokens.append_code(".bind(this)");
            }
            format!(", 'call', {arrow_start}(")
        } else {
            return Err(cx.tokens.error(format!(
                "Unexpected subscript operator in optional chain: {}",
                cx.tokens.current_token().token_type.label()
            )));
        };
        cx.tokens.replace_token_trimming_left_whitespace(&replacement);
        Ok(true)
    }
}
