//! `&&=`, `||=` and `??=`.
//!
//! ```text
//! a ??= b      ->  _nullishCoalesce(a, () => (a = b))
//! a ||= b      ->  a || (a = b)
//! obj.a ??= b  ->  _logicalAssign(obj, 'a', '??=', () => (b))
//! ```
//!
//! The `_logicalAssign(` opener for member targets is a token affix on the
//! target's first token.

use super::Transformer;
use crate::context::TransformContext;
use crate::driver::Driver;
use crate::helpers::Helper;
use zest_common::{Result, TransformError};
use zest_scanner::{ContextualKeyword, LogicalAssignRole, TokenType};

#[derive(Debug, Default)]
pub struct LogicalAssignmentTransformer;

impl LogicalAssignmentTransformer {
    pub fn new() -> Self {
        LogicalAssignmentTransformer
    }

    fn operator_at(cx: &TransformContext<'_>, operator_index: usize) -> Result<(&'static str, usize)> {
        let operator = match cx.tokens.identifier_name_at_index(operator_index) {
            "&&=" => "&&=",
            "||=" => "||=",
            "??=" => "??=",
            _ => return Err(cx.tokens.error("Expected a logical assignment operator")),
        };
        let Some(rhs_end) = cx.tokens.token_at(operator_index).rhs_end_index else {
            return Err(cx.tokens.error("Expected rhsEndIndex on logical assignment"));
        };
        Ok((operator, rhs_end))
    }

    /// Whether the right-hand side awaits at the operator's own level.
    fn rhs_awaits(cx: &TransformContext<'_>, operator_index: usize, rhs_end: usize) -> bool {
        let depth = cx.tokens.token_at(operator_index).scope_depth;
        (operator_index + 1..rhs_end).any(|index| {
            let token = cx.tokens.token_at(index);
            token.token_type == TokenType::NAME
                && token.contextual_keyword == ContextualKeyword::Await
                && token.identifier_role.is_none()
                && token.scope_depth == depth
        })
    }

    fn process_variable_target(
        &self,
        cx: &mut TransformContext<'_>,
        driver: &Driver,
        operator_index: usize,
    ) -> Result<()> {
        let (operator, rhs_end) = Self::operator_at(cx, operator_index)?;
        let name = cx.tokens.identifier_name().to_string();
        let export_binding = if cx.current_is_shadowed() {
            None
        } else {
            cx.export_binding(&name)
        };
        let closer = match operator {
            "??=" => {
                let is_async = Self::rhs_awaits(cx, operator_index, rhs_end);
                let helper = if is_async {
                    Helper::AsyncNullishCoalesce
                } else {
                    Helper::NullishCoalesce
                };
                let helper_name = cx.helpers.get_helper_name(&mut cx.names, helper);
                let opener = if is_async {
                    format!("await {helper_name}({name}, async () => ({name}")
                } else {
                    format!("{helper_name}({name}, () => ({name}")
                };
                cx.tokens.replace_token(&opener);
                "))"
            }
            _ => {
                let short_circuit = &operator[..2];
                cx.tokens.replace_token(&format!("{name} {short_circuit} ({name}"));
                ")"
            }
        };
        driver.process_until(cx, operator_index)?;
        match export_binding {
            Some(binding) => cx.tokens.replace_token(&format!("= {binding} =")),
            None => cx.tokens.replace_token("="),
        }
        driver.process_until(cx, rhs_end)?;
        cx.tokens.append_code(closer);
        Ok(())
    }

    fn process_member_access(
        &self,
        cx: &mut TransformContext<'_>,
        driver: &Driver,
        operator_index: usize,
    ) -> Result<()> {
        let (operator, rhs_end) = Self::operator_at(cx, operator_index)?;
        if Self::rhs_awaits(cx, operator_index, rhs_end) {
            return Err(TransformError::unsupported(
                "`await` in the right-hand side of a logical assignment to a member is not supported",
            ));
        }
        if cx.tokens.matches2(TokenType::DOT, TokenType::NAME) {
            let property = cx.tokens.identifier_name_at_index(cx.tokens.current_index() + 1);
            cx.tokens
                .replace_token_trimming_left_whitespace(&format!(", '{property}'"));
            cx.tokens.remove_token();
        } else if cx.tokens.matches1(TokenType::BRACKET_L) {
            let Some(close_index) = cx.tokens.matching_closer_index(cx.tokens.current_index()) else {
                return Err(cx.tokens.error("Unterminated computed member"));
            };
            cx.tokens.replace_token_trimming_left_whitespace(", ");
            driver.process_until(cx, close_index)?;
            cx.tokens.remove_token();
        } else {
            return Err(cx.tokens.error("Expected member access in logical assignment target"));
        }
        driver.process_until(cx, operator_index)?;
        cx.tokens
            .replace_token_trimming_left_whitespace(&format!(", '{operator}', () => ("));
        driver.process_until(cx, rhs_end)?;
        cx.tokens.append_code("))");
        Ok(())
    }
}

impl Transformer for LogicalAssignmentTransformer {
    fn name(&self) -> &'static str {
        "logical-assignment"
    }

    fn process(&self, cx: &mut TransformContext<'_>, driver: &Driver) -> Result<bool> {
        match cx.tokens.current_token().logical_assign {
            Some(LogicalAssignRole::Target { operator_index }) => {
                self.process_variable_target(cx, driver, operator_index)?;
                Ok(true)
            }
            Some(LogicalAssignRole::MemberAccess { operator_index }) => {
                self.process_member_access(cx, driver, operator_index)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
