//! Import/export cleanup when the output stays an ES module.
//!
//! Statements are left in place; only type-only bindings (and, under
//! TypeScript, bindings never read as values) are dropped. An import whose
//! bindings were all dropped is removed entirely so the module is not loaded.

use super::Transformer;
use crate::context::TransformContext;
use crate::driver::Driver;
use crate::helpers::Helper;
use crate::util::{
    elide_import_equals, get_specifier_info, is_export_from, remove_maybe_import_attributes,
    should_elide_default_export,
};
use zest_common::{Result, Transform, TransformOptions};
use zest_scanner::{ContextualKeyword, TokenType};

#[derive(Debug)]
pub struct EsmImportTransformer {
    is_typescript: bool,
    is_flow: bool,
    keep_unused_imports: bool,
    inject_create_require: bool,
    react_hot_loader: bool,
}

impl EsmImportTransformer {
    pub fn new(options: &TransformOptions) -> Self {
        EsmImportTransformer {
            is_typescript: options.has(Transform::Typescript),
            is_flow: options.has(Transform::Flow),
            keep_unused_imports: options.keep_unused_imports,
            inject_create_require: options.inject_create_require_for_import_require,
            react_hot_loader: options.has(Transform::ReactHotLoader),
        }
    }

    /// `import a = require('a')` becomes a plain `const`.
    fn process_import_equals(&self, cx: &mut TransformContext<'_>) {
        let import_name = cx.tokens.identifier_name_at_index(cx.tokens.current_index() + 1);
        if cx.should_elide_imported_name(import_name) {
            elide_import_equals(&mut cx.tokens);
        } else if self.inject_create_require && cx.tokens.matches_contextual_at_index(cx.tokens.current_index() + 3, ContextualKeyword::Require) {
            // `require` is not a global in an ES module.
            cx.tokens.replace_token("const");
            cx.tokens.copy_token();
            cx.tokens.copy_token();
            let require_name = cx.helpers.get_helper_name(&mut cx.names, Helper::Require);
            cx.tokens.replace_token(&require_name);
        } else {
            cx.tokens.replace_token("const");
        }
    }

    fn process_import(&self, cx: &mut TransformContext<'_>) -> Result<bool> {
        if cx.tokens.matches2(TokenType::IMPORT, TokenType::PAREN_L)
            || cx.tokens.matches2(TokenType::IMPORT, TokenType::DOT)
        {
            return Ok(false);
        }
        let snapshot = cx.tokens.snapshot();
        if self.remove_import_type_bindings(cx)? {
            cx.tokens.restore_to_snapshot(snapshot);
            cx.tokens.remove_initial_token();
            while !cx.tokens.matches1(TokenType::STRING) {
                if cx.tokens.is_at_end() {
                    return Err(cx.tokens.error("Expected module path in import"));
                }
                cx.tokens.remove_token();
            }
            cx.tokens.remove_token();
            remove_maybe_import_attributes(&mut cx.tokens);
            if cx.tokens.matches1(TokenType::SEMI) {
                cx.tokens.remove_token();
            }
        }
        Ok(true)
    }

    /// Drop the type bindings of the import at the cursor, copying the rest.
    /// Returns whether nothing but types was imported, in which case the
    /// caller rolls back and removes the statement.
    fn remove_import_type_bindings(&self, cx: &mut TransformContext<'_>) -> Result<bool> {
        cx.tokens.copy_expected_token(TokenType::IMPORT)?;
        if cx.tokens.matches1(TokenType::STRING) {
            // Bare import, kept for its side effects.
            cx.tokens.copy_token();
            return Ok(false);
        }

        let mut found_non_type_import = false;
        let mut found_any_named_import = false;
        let mut needs_comma = false;

        if cx.tokens.matches1(TokenType::NAME) {
            if cx.should_elide_imported_name(cx.tokens.identifier_name()) {
                cx.tokens.remove_token();
                if cx.tokens.matches1(TokenType::COMMA) {
                    cx.tokens.remove_token();
                }
            } else {
                found_non_type_import = true;
                cx.tokens.copy_token();
                if cx.tokens.matches1(TokenType::COMMA) {
                    // Put back below if anything follows.
                    needs_comma = true;
                    cx.tokens.remove_token();
                }
            }
        }

        if cx.tokens.matches1(TokenType::STAR) {
            let namespace_name = cx.tokens.identifier_name_at_index(cx.tokens.current_index() + 2);
            if cx.should_elide_imported_name(namespace_name) {
                cx.tokens.remove_token();
                cx.tokens.remove_token();
                cx.tokens.remove_token();
            } else {
                if needs_comma {
                    cx.tokens.append_code(",");
                }
                found_non_type_import = true;
                cx.tokens.copy_expected_token(TokenType::STAR)?;
                cx.tokens.copy_token();
                cx.tokens.copy_expected_token(TokenType::NAME)?;
            }
        } else if cx.tokens.matches1(TokenType::BRACE_L) {
            if needs_comma {
                cx.tokens.append_code(",");
            }
            cx.tokens.copy_token();
            while !cx.tokens.matches1(TokenType::BRACE_R) {
                found_any_named_import = true;
                let specifier = get_specifier_info(&cx.tokens, cx.tokens.current_index())?;
                if specifier.is_type || cx.should_elide_imported_name(&specifier.right_name) {
                    while cx.tokens.current_index() < specifier.end_index {
                        cx.tokens.remove_token();
                    }
                    if cx.tokens.matches1(TokenType::COMMA) {
                        cx.tokens.remove_token();
                    }
                } else {
                    found_non_type_import = true;
                    while cx.tokens.current_index() < specifier.end_index {
                        cx.tokens.copy_token();
                    }
                    if cx.tokens.matches1(TokenType::COMMA) {
                        cx.tokens.copy_token();
                    }
                }
            }
            cx.tokens.copy_expected_token(TokenType::BRACE_R)?;
        }

        if self.keep_unused_imports {
            return Ok(false);
        }
        if self.is_typescript {
            Ok(!found_non_type_import)
        } else if self.is_flow {
            // `import {} from 'a'` still loads `a` under Flow.
            Ok(found_any_named_import && !found_non_type_import)
        } else {
            Ok(false)
        }
    }

    fn process_export_default(&self, cx: &mut TransformContext<'_>, driver: &Driver) -> Result<bool> {
        if should_elide_default_export(
            self.is_typescript,
            self.keep_unused_imports,
            &cx.tokens,
            &cx.declaration_info,
        ) {
            // export default T;
            cx.tokens.remove_initial_token();
            cx.tokens.remove_token();
            cx.tokens.remove_token();
            return Ok(true);
        }
        if !self.react_hot_loader || has_declared_default_name(cx) {
            return Ok(false);
        }
        // `export default E;` -> `let _default = E; export default _default;`
        let Some(rhs_end) = cx.tokens.current_token().rhs_end_index else {
            return Ok(false);
        };
        let default_name = cx.names.claim_free_name("_default");
        cx.tokens.replace_token(&format!("let {default_name} ="));
        cx.tokens.remove_token();
        driver.process_until(cx, rhs_end)?;
        let terminator = if cx.tokens.matches1_at_index(rhs_end - 1, TokenType::SEMI) { "" } else { ";" };
        cx.tokens
            .append_code(&format!("{terminator} export default {default_name};"));
        cx.extracted_default_export_name = Some(default_name);
        Ok(true)
    }

    /// `export {a, b}` with type-only names dropped.
    fn process_named_exports(&self, cx: &mut TransformContext<'_>) -> Result<bool> {
        if !self.is_typescript {
            return Ok(false);
        }
        cx.tokens.copy_expected_token(TokenType::EXPORT)?;
        cx.tokens.copy_expected_token(TokenType::BRACE_L)?;
        let is_reexport = is_export_from(&cx.tokens);
        let mut found_non_type_export = false;
        while !cx.tokens.matches1(TokenType::BRACE_R) {
            if cx.tokens.is_at_end() {
                return Err(cx.tokens.error("Unterminated export list"));
            }
            let specifier = get_specifier_info(&cx.tokens, cx.tokens.current_index())?;
            if specifier.is_type || (!is_reexport && cx.should_elide_exported_name(&specifier.left_name)) {
                while cx.tokens.current_index() < specifier.end_index {
                    cx.tokens.remove_token();
                }
                if cx.tokens.matches1(TokenType::COMMA) {
                    cx.tokens.remove_token();
                }
            } else {
                found_non_type_export = true;
                while cx.tokens.current_index() < specifier.end_index {
                    cx.tokens.copy_token();
                }
                if cx.tokens.matches1(TokenType::COMMA) {
                    cx.tokens.copy_token();
                }
            }
        }
        cx.tokens.copy_expected_token(TokenType::BRACE_R)?;
        if !self.keep_unused_imports && is_reexport && !found_non_type_export {
            // `export {} from 'a'` would still load `a`.
            cx.tokens.remove_token();
            cx.tokens.remove_token();
            remove_maybe_import_attributes(&mut cx.tokens);
        }
        Ok(true)
    }
}

/// `export default function f`, `export default class C` and friends
/// already bind a name.
fn has_declared_default_name(cx: &TransformContext<'_>) -> bool {
    let tokens = &cx.tokens;
    tokens.matches4(TokenType::EXPORT, TokenType::DEFAULT, TokenType::FUNCTION, TokenType::NAME)
        || tokens.matches5(TokenType::EXPORT, TokenType::DEFAULT, TokenType::ASYNC, TokenType::FUNCTION, TokenType::NAME)
        || tokens.matches4(TokenType::EXPORT, TokenType::DEFAULT, TokenType::CLASS, TokenType::NAME)
        || tokens.matches5(TokenType::EXPORT, TokenType::DEFAULT, TokenType::ABSTRACT, TokenType::CLASS, TokenType::NAME)
}

impl Transformer for EsmImportTransformer {
    fn name(&self) -> &'static str {
        "esm-imports"
    }

    fn process(&self, cx: &mut TransformContext<'_>, driver: &Driver) -> Result<bool> {
        if cx.tokens.current_token().is_type {
            return Ok(false);
        }
        if cx.tokens.matches3(TokenType::IMPORT, TokenType::NAME, TokenType::EQ) {
            self.process_import_equals(cx);
            return Ok(true);
        }
        if cx.tokens.matches3(TokenType::EXPORT, TokenType::IMPORT, TokenType::NAME) {
            // export import A = B.C;
            cx.tokens.copy_token();
            cx.tokens.replace_token("const");
            return Ok(true);
        }
        if cx.tokens.matches2(TokenType::EXPORT, TokenType::EQ) {
            cx.tokens.replace_token("module.exports");
            return Ok(true);
        }
        if cx.tokens.matches1(TokenType::IMPORT) {
            return self.process_import(cx);
        }
        if cx.tokens.matches2(TokenType::EXPORT, TokenType::DEFAULT) {
            return self.process_export_default(cx, driver);
        }
        if cx.tokens.matches2(TokenType::EXPORT, TokenType::BRACE_L) {
            return self.process_named_exports(cx);
        }
        Ok(false)
    }
}
