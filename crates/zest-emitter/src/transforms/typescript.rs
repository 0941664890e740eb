//! TypeScript erasure and enum lowering.
//!
//! Type-only regions were already marked by the parser, so most of the work
//! is removing `is_type` runs and the member modifiers that have no runtime
//! meaning. Enums become an IIFE over a plain object:
//!
//! ```text
//! enum E {A, B = 5, C}
//! var E; (function (E) { const A = 0; E[E["A"] = A] = "A"; ... })(E || (E = {}));
//! ```

use super::Transformer;
use crate::context::TransformContext;
use crate::driver::Driver;
use crate::util::is_identifier;
use zest_common::{Result, Transform, TransformOptions};
use zest_scanner::TokenType;

#[derive(Debug)]
pub struct TypeScriptTransformer {
    is_imports_transform_enabled: bool,
}

/// How an enum member's key is written back out.
struct EnumKeyInfo {
    /// `"A"` or the original string literal.
    name_string_code: String,
    /// Set when the key is usable as a local binding.
    variable_name: Option<String>,
}

impl TypeScriptTransformer {
    pub fn new(options: &TransformOptions) -> Self {
        TypeScriptTransformer {
            is_imports_transform_enabled: options.has(Transform::Imports),
        }
    }

    fn process_enum(&self, cx: &mut TransformContext<'_>, driver: &Driver, is_export: bool) -> Result<()> {
        // `export`, `const` or `enum`.
        cx.tokens.remove_initial_token();
        while cx.tokens.matches1(TokenType::CONST) || cx.tokens.matches1(TokenType::ENUM) {
            cx.tokens.remove_token();
        }
        if !cx.tokens.matches1(TokenType::NAME) {
            return Err(cx.tokens.error("Expected enum name"));
        }
        let enum_name = cx.tokens.identifier_name().to_string();
        cx.tokens.remove_token();
        if is_export && !self.is_imports_transform_enabled {
            cx.tokens.append_code("export ");
        }
        cx.tokens
            .append_code(&format!("var {enum_name}; (function ({enum_name})"));
        cx.tokens.copy_expected_token(TokenType::BRACE_L)?;
        self.process_enum_body(cx, driver, &enum_name)?;
        cx.tokens.copy_expected_token(TokenType::BRACE_R)?;
        if is_export && self.is_imports_transform_enabled {
            cx.tokens.append_code(&format!(
                ")({enum_name} || (exports.{enum_name} = {enum_name} = {{}}));"
            ));
        } else {
            cx.tokens
                .append_code(&format!(")({enum_name} || ({enum_name} = {{}}));"));
        }
        tracing::trace!(enum_name = %enum_name, exported = is_export, "lowered enum");
        Ok(())
    }

    fn process_enum_body(&self, cx: &mut TransformContext<'_>, driver: &Driver, enum_name: &str) -> Result<()> {
        let mut previous_value_code: Option<String> = None;
        while !cx.tokens.matches1(TokenType::BRACE_R) {
            if cx.tokens.is_at_end() {
                return Err(cx.tokens.error("Unterminated enum body"));
            }
            let key = Self::extract_enum_key_info(cx)?;
            cx.tokens.remove_initial_token();

            let is_string_member = cx.tokens.matches3(TokenType::EQ, TokenType::STRING, TokenType::COMMA)
                || cx.tokens.matches3(TokenType::EQ, TokenType::STRING, TokenType::BRACE_R);
            if is_string_member {
                Self::process_string_literal_member(cx, enum_name, &key);
            } else if cx.tokens.matches1(TokenType::EQ) {
                Self::process_explicit_value_member(cx, driver, enum_name, &key)?;
            } else {
                Self::process_implicit_value_member(cx, enum_name, &key, previous_value_code.as_deref());
            }
            if cx.tokens.matches1(TokenType::COMMA) {
                cx.tokens.remove_token();
            }

            previous_value_code = Some(match key.variable_name {
                Some(variable_name) => variable_name,
                None => format!("{enum_name}[{}]", key.name_string_code),
            });
        }
        Ok(())
    }

    fn extract_enum_key_info(cx: &TransformContext<'_>) -> Result<EnumKeyInfo> {
        let token = *cx.tokens.current_token();
        match token.token_type {
            TokenType::NAME => {
                let name = cx.tokens.identifier_name();
                Ok(EnumKeyInfo {
                    name_string_code: format!("\"{name}\""),
                    variable_name: is_identifier(name).then(|| name.to_string()),
                })
            }
            TokenType::STRING => {
                let name = cx.tokens.string_value();
                Ok(EnumKeyInfo {
                    name_string_code: cx.tokens.raw_code_for_token(&token).to_string(),
                    variable_name: is_identifier(name).then(|| name.to_string()),
                })
            }
            _ => Err(cx.tokens.error("Expected name or string at beginning of enum element")),
        }
    }

    /// `A = "a"`: string members get no reverse mapping.
    fn process_string_literal_member(cx: &mut TransformContext<'_>, enum_name: &str, key: &EnumKeyInfo) {
        let name_string_code = &key.name_string_code;
        match &key.variable_name {
            Some(variable_name) => {
                cx.tokens.append_code(&format!("const {variable_name}"));
                // = "value"
                cx.tokens.copy_token();
                cx.tokens.copy_token();
                cx.tokens
                    .append_code(&format!("; {enum_name}[{name_string_code}] = {variable_name};"));
            }
            None => {
                cx.tokens
                    .append_code(&format!("{enum_name}[{name_string_code}]"));
                cx.tokens.copy_token();
                cx.tokens.copy_token();
                cx.tokens.append_code(";");
            }
        }
    }

    /// `A = expr`: the initializer goes through the whole pipeline.
    fn process_explicit_value_member(
        cx: &mut TransformContext<'_>,
        driver: &Driver,
        enum_name: &str,
        key: &EnumKeyInfo,
    ) -> Result<()> {
        let Some(rhs_end) = cx.tokens.current_token().rhs_end_index else {
            return Err(cx.tokens.error("Expected rhsEndIndex on enum assign"));
        };
        let name_string_code = &key.name_string_code;
        match &key.variable_name {
            Some(variable_name) => {
                cx.tokens.append_code(&format!("const {variable_name}"));
                cx.tokens.copy_token();
                driver.process_until(cx, rhs_end)?;
                cx.tokens.append_code(&format!(
                    "; {enum_name}[{enum_name}[{name_string_code}] = {variable_name}] = {name_string_code};"
                ));
            }
            None => {
                cx.tokens
                    .append_code(&format!("{enum_name}[{enum_name}[{name_string_code}]"));
                cx.tokens.copy_token();
                driver.process_until(cx, rhs_end)?;
                cx.tokens.append_code(&format!("] = {name_string_code};"));
            }
        }
        Ok(())
    }

    /// `A`: one more than the previous member, or 0 for the first.
    fn process_implicit_value_member(
        cx: &mut TransformContext<'_>,
        enum_name: &str,
        key: &EnumKeyInfo,
        previous_value_code: Option<&str>,
    ) {
        let mut value_code = match previous_value_code {
            Some(previous) => format!("{previous} + 1"),
            None => "0".to_string(),
        };
        if let Some(variable_name) = &key.variable_name {
            cx.tokens
                .append_code(&format!("const {variable_name} = {value_code}; "));
            value_code = variable_name.clone();
        }
        let name_string_code = &key.name_string_code;
        cx.tokens.append_code(&format!(
            "{enum_name}[{enum_name}[{name_string_code}] = {value_code}] = {name_string_code};"
        ));
    }
}

impl Transformer for TypeScriptTransformer {
    fn name(&self) -> &'static str {
        "typescript"
    }

    fn process(&self, cx: &mut TransformContext<'_>, driver: &Driver) -> Result<bool> {
        if driver.process_possible_arrow_param_end(cx)?
            || driver.process_possible_async_arrow_with_type_params(cx)?
            || driver.process_possible_type_range(cx)?
        {
            return Ok(true);
        }
        if matches!(
            cx.tokens.current_token().token_type,
            TokenType::PUBLIC
                | TokenType::PROTECTED
                | TokenType::PRIVATE
                | TokenType::ABSTRACT
                | TokenType::READONLY
                | TokenType::OVERRIDE
                | TokenType::NON_NULL_ASSERTION
        ) {
            cx.tokens.remove_initial_token();
            return Ok(true);
        }
        if cx.tokens.matches1(TokenType::ENUM) || cx.tokens.matches2(TokenType::CONST, TokenType::ENUM) {
            self.process_enum(cx, driver, false)?;
            return Ok(true);
        }
        if cx.tokens.matches2(TokenType::EXPORT, TokenType::ENUM)
            || cx.tokens.matches3(TokenType::EXPORT, TokenType::CONST, TokenType::ENUM)
        {
            self.process_enum(cx, driver, true)?;
            return Ok(true);
        }
        Ok(false)
    }
}
