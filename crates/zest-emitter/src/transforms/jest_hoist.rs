//! Move `jest.mock(...)` and friends above the module's imports.
//!
//! Each hoisted call is wrapped in a function declaration left where the
//! call was, so its lines don't move; JS function hoisting plus a call in
//! the prefix makes it run before the first `require`.

use super::Transformer;
use crate::context::TransformContext;
use crate::driver::Driver;
use std::cell::RefCell;
use zest_common::Result;
use zest_scanner::TokenType;

const JEST_GLOBAL_NAME: &str = "jest";
const HOISTED_METHODS: &[&str] = &["mock", "unmock", "enableAutomock", "disableAutomock", "deepUnmock"];

#[derive(Debug, Default)]
pub struct JestHoistTransformer {
    hoisted_function_names: RefCell<Vec<String>>,
}

impl JestHoistTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    fn extract_hoisted_calls(&self, cx: &mut TransformContext<'_>, driver: &Driver) -> Result<()> {
        // `jest`; re-inserted in front of each call below
        cx.tokens.remove_token();
        let mut follows_non_hoisted_call = false;
        while cx.tokens.matches3(TokenType::DOT, TokenType::NAME, TokenType::PAREN_L) {
            let method_name = cx.tokens.identifier_name_at_index(cx.tokens.current_index() + 1);
            if HOISTED_METHODS.contains(&method_name) {
                let function_name = cx.names.claim_free_name("__jestHoist");
                cx.tokens
                    .replace_token(&format!("function {function_name}(){{{JEST_GLOBAL_NAME}."));
                self.hoisted_function_names.borrow_mut().push(function_name);
                cx.tokens.copy_token();
                cx.tokens.copy_token();
                driver.process_balanced_code(cx)?;
                cx.tokens.copy_expected_token(TokenType::PAREN_R)?;
                cx.tokens.append_code(";}");
                follows_non_hoisted_call = false;
            } else {
                if follows_non_hoisted_call {
                    cx.tokens.copy_token();
                } else {
                    // A hoisted call returned `jest`, so restart the chain.
                    cx.tokens.replace_token(&format!("{JEST_GLOBAL_NAME}."));
                }
                cx.tokens.copy_token();
                cx.tokens.copy_token();
                driver.process_balanced_code(cx)?;
                cx.tokens.copy_expected_token(TokenType::PAREN_R)?;
                follows_non_hoisted_call = true;
            }
        }
        Ok(())
    }
}

impl Transformer for JestHoistTransformer {
    fn name(&self) -> &'static str {
        "jest-hoist"
    }

    fn process(&self, cx: &mut TransformContext<'_>, driver: &Driver) -> Result<bool> {
        let is_jest_call = cx.tokens.current_token().scope_depth == 0
            && cx
                .tokens
                .matches4(TokenType::NAME, TokenType::DOT, TokenType::NAME, TokenType::PAREN_L)
            && cx.tokens.identifier_name() == JEST_GLOBAL_NAME;
        if !is_jest_call || cx.current_is_shadowed() {
            return Ok(false);
        }
        let is_module_binding = cx
            .imports
            .as_ref()
            .is_some_and(|imports| imports.get_global_names().contains(JEST_GLOBAL_NAME));
        if is_module_binding {
            return Ok(false);
        }
        self.extract_hoisted_calls(cx, driver)?;
        Ok(true)
    }

    fn hoisted_code(&self, _cx: &TransformContext<'_>) -> String {
        self.hoisted_function_names
            .borrow()
            .iter()
            .map(|name| format!("{name}();"))
            .collect()
    }
}
