//! `1_000_000` -> `1000000`.

use super::Transformer;
use crate::context::TransformContext;
use crate::driver::Driver;
use zest_common::Result;
use zest_scanner::TokenType;

#[derive(Debug, Default)]
pub struct NumericSeparatorTransformer;

impl NumericSeparatorTransformer {
    pub fn new() -> Self {
        NumericSeparatorTransformer
    }
}

impl Transformer for NumericSeparatorTransformer {
    fn name(&self) -> &'static str {
        "numeric-separator"
    }

    fn process(&self, cx: &mut TransformContext<'_>, _driver: &Driver) -> Result<bool> {
        if !(cx.tokens.matches1(TokenType::NUM) || cx.tokens.matches1(TokenType::BIGINT)) {
            return Ok(false);
        }
        let code = cx.tokens.current_token_code();
        if !code.contains('_') {
            return Ok(false);
        }
        cx.tokens.replace_token(&code.replace('_', ""));
        Ok(true)
    }
}
