//! `catch {` -> `catch (e) {`.

use super::Transformer;
use crate::context::TransformContext;
use crate::driver::Driver;
use zest_common::Result;
use zest_scanner::TokenType;

#[derive(Debug, Default)]
pub struct OptionalCatchBindingTransformer;

impl OptionalCatchBindingTransformer {
    pub fn new() -> Self {
        OptionalCatchBindingTransformer
    }
}

impl Transformer for OptionalCatchBindingTransformer {
    fn name(&self) -> &'static str {
        "optional-catch-binding"
    }

    fn process(&self, cx: &mut TransformContext<'_>, _driver: &Driver) -> Result<bool> {
        if !cx.tokens.matches2(TokenType::CATCH, TokenType::BRACE_L) {
            return Ok(false);
        }
        cx.tokens.copy_token();
        let binding = cx.names.claim_free_name("e");
        cx.tokens.append_code(&format!(" ({binding})"));
        Ok(true)
    }
}
