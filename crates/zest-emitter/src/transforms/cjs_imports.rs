//! ES module syntax rewritten to CommonJS.
//!
//! The load statements and the name substitutions were decided up front by
//! [`crate::cjs_imports::CjsImportProcessor`]; this unit places them. The
//! first import of each path is replaced by that path's load statement and
//! every later one by nothing. Reads of imported names become member reads
//! on the module handle, and writes to exported locals also write `exports`.

use super::Transformer;
use crate::class_info::skip_decorator;
use crate::context::TransformContext;
use crate::driver::Driver;
use crate::helpers::Helper;
use crate::util::{
    elide_import_equals, get_specifier_info, is_export_from, is_identifier, is_simple_export_var,
    remove_maybe_import_attributes, should_elide_default_export,
};
use std::cell::Cell;
use zest_common::{Result, Transform, TransformError, TransformOptions};
use zest_scanner::{ContextualKeyword, IdentifierRole, TokenType};

#[derive(Debug)]
pub struct CjsImportTransformer {
    is_typescript: bool,
    is_flow: bool,
    keep_unused_imports: bool,
    preserve_dynamic_import: bool,
    legacy_typescript_interop: bool,
    legacy_babel5_interop: bool,
    react_hot_loader: bool,
    had_export: Cell<bool>,
    had_named_export: Cell<bool>,
    had_default_export: Cell<bool>,
}

impl CjsImportTransformer {
    pub fn new(options: &TransformOptions) -> Self {
        CjsImportTransformer {
            is_typescript: options.has(Transform::Typescript),
            is_flow: options.has(Transform::Flow),
            keep_unused_imports: options.keep_unused_imports,
            preserve_dynamic_import: options.preserve_dynamic_import,
            legacy_typescript_interop: options.enable_legacy_typescript_module_interop,
            legacy_babel5_interop: options.enable_legacy_babel5_module_interop,
            react_hot_loader: options.has(Transform::ReactHotLoader),
            had_export: Cell::new(false),
            had_named_export: Cell::new(false),
            had_default_export: Cell::new(false),
        }
    }

    fn process_import_equals(&self, cx: &mut TransformContext<'_>) {
        let import_name = cx.tokens.identifier_name_at_index(cx.tokens.current_index() + 1);
        if cx.should_elide_imported_name(import_name) {
            elide_import_equals(&mut cx.tokens);
        } else {
            cx.tokens.replace_token("const");
        }
    }

    /// `export import A = B.C;` -> `const A = B.C; exports.A = A;`
    fn process_export_import_equals(&self, cx: &mut TransformContext<'_>, driver: &Driver) -> Result<()> {
        self.had_named_export.set(true);
        cx.tokens.remove_initial_token();
        cx.tokens.replace_token("const");
        let name = cx.tokens.identifier_name().to_string();
        cx.tokens.copy_expected_token(TokenType::NAME)?;
        cx.tokens.copy_expected_token(TokenType::EQ)?;
        let start = cx.tokens.current_index();
        let end = if cx.tokens.matches4(TokenType::NAME, TokenType::PAREN_L, TokenType::STRING, TokenType::PAREN_R)
            && cx.tokens.matches_contextual(ContextualKeyword::Require)
        {
            start + 4
        } else {
            let mut end = start + 1;
            while cx.tokens.matches2_at_index(end, TokenType::DOT, TokenType::NAME) {
                end += 2;
            }
            end
        };
        driver.process_until(cx, end)?;
        cx.tokens.append_code(&format!("; exports.{name} = {name}"));
        Ok(())
    }

    fn process_import(&self, cx: &mut TransformContext<'_>, driver: &Driver) -> Result<()> {
        if cx.tokens.matches2(TokenType::IMPORT, TokenType::PAREN_L) {
            return self.process_dynamic_import(cx, driver);
        }
        let should_elide = self.remove_import_and_detect_if_should_elide(cx)?;
        if should_elide {
            cx.tokens.remove_token();
        } else {
            let path = cx.tokens.string_value().to_string();
            let Some(imports) = cx.imports.as_mut() else {
                return Err(TransformError::unsupported("CommonJS imports require the import pre-pass"));
            };
            let code = imports.claim_import_code(&path);
            tracing::trace!(path = %path, claimed = !code.is_empty(), "replaced import");
            cx.tokens.replace_token_trimming_left_whitespace(&code);
        }
        remove_maybe_import_attributes(&mut cx.tokens);
        if cx.tokens.matches1(TokenType::SEMI) {
            cx.tokens.remove_token();
        }
        Ok(())
    }

    /// `import('a')` -> `Promise.resolve().then(() => _interopRequireWildcard(require('a')))`
    fn process_dynamic_import(&self, cx: &mut TransformContext<'_>, driver: &Driver) -> Result<()> {
        if self.preserve_dynamic_import {
            cx.tokens.copy_token();
            return Ok(());
        }
        let require_wrapper = if self.legacy_typescript_interop {
            String::new()
        } else {
            let helper = cx.helpers.get_helper_name(&mut cx.names, Helper::InteropRequireWildcard);
            format!("{helper}(")
        };
        cx.tokens
            .replace_token(&format!("Promise.resolve().then(() => {require_wrapper}require"));
        let Some(context_id) = cx.tokens.current_token().context_id else {
            return Err(cx.tokens.error("Expected context ID on dynamic import invocation"));
        };
        cx.tokens.copy_token();
        while !cx.tokens.matches_context_id_and_label(TokenType::PAREN_R, Some(context_id)) {
            if cx.tokens.is_at_end() {
                return Err(cx.tokens.error("Unterminated dynamic import"));
            }
            driver.process_token(cx)?;
        }
        cx.tokens
            .replace_token(if require_wrapper.is_empty() { "))" } else { ")))" });
        Ok(())
    }

    /// Erase the import up to its path string. Returns whether the import
    /// loads nothing but types and must not be emitted at all.
    fn remove_import_and_detect_if_should_elide(&self, cx: &mut TransformContext<'_>) -> Result<bool> {
        cx.tokens.remove_initial_token();
        if cx.tokens.matches1(TokenType::STRING) {
            // Bare import.
            return Ok(false);
        }
        let has_default_or_namespace = cx.tokens.matches1(TokenType::NAME) || cx.tokens.matches1(TokenType::STAR);
        let mut found_non_type_import = false;
        let mut found_any_named_import = false;
        let mut in_braces = false;
        // Specifier names may be strings too.
        while in_braces || !cx.tokens.matches1(TokenType::STRING) {
            if cx.tokens.is_at_end() {
                return Err(cx.tokens.error("Expected module path in import"));
            }
            let token = cx.tokens.current_token();
            match token.token_type {
                TokenType::BRACE_L => in_braces = true,
                TokenType::BRACE_R => in_braces = false,
                TokenType::NAME | TokenType::STRING if in_braces => {
                    found_any_named_import = true;
                    if !token.is_type {
                        found_non_type_import = true;
                    }
                }
                _ => {}
            }
            cx.tokens.remove_token();
        }
        if has_default_or_namespace || self.keep_unused_imports {
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

    fn process_identifier(&self, cx: &mut TransformContext<'_>) -> Result<bool> {
        if cx.current_is_shadowed() {
            return Ok(false);
        }
        let token = *cx.tokens.current_token();
        match token.identifier_role {
            Some(IdentifierRole::ObjectShorthand) => {
                let name = cx.tokens.identifier_name();
                let Some(replacement) = cx.identifier_replacement(name) else {
                    return Ok(false);
                };
                cx.tokens.replace_token(&format!("{name}: {replacement}"));
                Ok(true)
            }
            Some(IdentifierRole::Access) => {
                let Some(replacement) = cx.identifier_replacement(cx.tokens.identifier_name()) else {
                    return Ok(false);
                };
                if token.token_type == TokenType::JSX_NAME {
                    cx.tokens.replace_token(&replacement);
                    return Ok(true);
                }
                // `(f)(x)` is a call too.
                let mut possible_open_paren = cx.tokens.current_index() + 1;
                while cx.tokens.matches1_at_index(possible_open_paren, TokenType::PAREN_R) {
                    possible_open_paren += 1;
                }
                if cx.tokens.matches1_at_index(possible_open_paren, TokenType::PAREN_L) {
                    // Called without the module object as `this`.
                    cx.tokens.replace_token(&format!("(0, {replacement})"));
                } else {
                    cx.tokens.replace_token(&replacement);
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Export binding chain for the identifier at `target_index`, when it is
    /// a plain read of an exported local.
    fn exported_target_binding(&self, cx: &TransformContext<'_>, target_index: usize) -> Option<String> {
        let target = cx.tokens.token_at(target_index);
        if target.token_type != TokenType::NAME
            || target.is_type
            || target.identifier_role != Some(IdentifierRole::Access)
            || cx.is_shadowed(target_index)
        {
            return None;
        }
        if target_index >= 1 && cx.tokens.matches1_at_index(target_index - 1, TokenType::DOT) {
            return None;
        }
        cx.export_binding(cx.tokens.identifier_name_at_index(target_index))
    }

    /// `a = 1` -> `a = exports.a = 1`
    fn process_assignment(&self, cx: &mut TransformContext<'_>) -> bool {
        let index = cx.tokens.current_index();
        let Some(target_index) = index.checked_sub(1) else {
            return false;
        };
        let Some(binding) = self.exported_target_binding(cx, target_index) else {
            return false;
        };
        cx.tokens.copy_token();
        cx.tokens.append_code(&format!(" {binding} ="));
        true
    }

    /// `a += 1` -> `a = exports.a += 1`
    fn process_complex_assignment(&self, cx: &mut TransformContext<'_>) -> bool {
        let index = cx.tokens.current_index();
        let Some(target_index) = index.checked_sub(1) else {
            return false;
        };
        let Some(binding) = self.exported_target_binding(cx, target_index) else {
            return false;
        };
        cx.tokens.append_code(&format!(" = {binding}"));
        cx.tokens.copy_token();
        true
    }

    /// `++a` -> `exports.a = ++a`
    fn process_pre_inc_dec(&self, cx: &mut TransformContext<'_>) -> bool {
        let target_index = cx.tokens.current_index() + 1;
        let after = target_index + 1;
        if cx.tokens.matches1_at_index(after, TokenType::DOT)
            || cx.tokens.matches1_at_index(after, TokenType::BRACKET_L)
            || cx.tokens.matches1_at_index(after, TokenType::PAREN_L)
        {
            return false;
        }
        let Some(binding) = self.exported_target_binding(cx, target_index) else {
            return false;
        };
        cx.tokens.append_code(&format!("{binding} = "));
        cx.tokens.copy_token();
        true
    }

    /// `a++` -> `(a = exports.a = a + 1, a - 1)`, entered at `a`.
    fn process_post_inc_dec(&self, cx: &mut TransformContext<'_>) -> Result<bool> {
        let index = cx.tokens.current_index();
        let Some(binding) = self.exported_target_binding(cx, index) else {
            return Ok(false);
        };
        let name = cx.tokens.identifier_name();
        let base = cx.identifier_replacement(name).unwrap_or_else(|| name.to_string());
        let replacement = match cx.tokens.raw_code_for_token(cx.tokens.token_at(index + 1)) {
            "++" => format!("({base} = {binding} = {base} + 1, {base} - 1)"),
            "--" => format!("({base} = {binding} = {base} - 1, {base} + 1)"),
            _ => return Err(cx.tokens.error("Unexpected postfix operator")),
        };
        cx.tokens.replace_token(&replacement);
        cx.tokens.remove_token();
        Ok(true)
    }

    fn process_export(&self, cx: &mut TransformContext<'_>, driver: &Driver) -> Result<bool> {
        if cx.tokens.matches2(TokenType::EXPORT, TokenType::ENUM)
            || cx.tokens.matches3(TokenType::EXPORT, TokenType::CONST, TokenType::ENUM)
        {
            // Lowered by the TypeScript unit.
            self.had_named_export.set(true);
            return Ok(false);
        }
        if cx.tokens.matches2(TokenType::EXPORT, TokenType::IMPORT) {
            self.process_export_import_equals(cx, driver)?;
            return Ok(true);
        }
        if cx.tokens.matches2(TokenType::EXPORT, TokenType::DEFAULT) {
            self.process_export_default(cx, driver)?;
            return Ok(true);
        }
        if cx.tokens.matches2(TokenType::EXPORT, TokenType::BRACE_L) {
            self.process_export_bindings(cx)?;
            return Ok(true);
        }
        self.had_named_export.set(true);
        let next = cx.tokens.token_at_relative_index(1).token_type;
        match next {
            TokenType::VAR | TokenType::LET | TokenType::CONST => {
                if is_simple_export_var(&cx.tokens, cx.tokens.current_index()) {
                    self.process_simple_export_var(cx, driver)?;
                } else {
                    self.process_complex_export_var(cx, driver)?;
                }
            }
            TokenType::FUNCTION | TokenType::ASYNC => {
                cx.tokens.remove_initial_token();
                let name = self.process_named_function(cx, driver)?;
                let binding = cx.export_binding(&name).unwrap_or_else(|| format!("exports.{name}"));
                cx.tokens.append_code(&format!(" {binding} = {name};"));
            }
            TokenType::CLASS | TokenType::ABSTRACT | TokenType::AT => {
                cx.tokens.remove_initial_token();
                driver.copy_decorators(cx)?;
                if cx.tokens.matches1(TokenType::ABSTRACT) {
                    cx.tokens.remove_token();
                }
                let name = driver.process_named_class(cx)?;
                let binding = cx.export_binding(&name).unwrap_or_else(|| format!("exports.{name}"));
                cx.tokens.append_code(&format!(" {binding} = {name};"));
            }
            TokenType::STAR => self.process_export_star(cx)?,
            _ => return Err(cx.tokens.error("Unrecognized export syntax")),
        }
        Ok(true)
    }

    fn process_export_default(&self, cx: &mut TransformContext<'_>, driver: &Driver) -> Result<()> {
        let mut exported_runtime_value = true;
        let is_named_function = cx.tokens.matches4(TokenType::EXPORT, TokenType::DEFAULT, TokenType::FUNCTION, TokenType::NAME)
            || cx.tokens.matches5(TokenType::EXPORT, TokenType::DEFAULT, TokenType::ASYNC, TokenType::FUNCTION, TokenType::NAME)
            || cx.tokens.matches5(TokenType::EXPORT, TokenType::DEFAULT, TokenType::FUNCTION, TokenType::STAR, TokenType::NAME);
        let is_named_class = cx.tokens.matches4(TokenType::EXPORT, TokenType::DEFAULT, TokenType::CLASS, TokenType::NAME)
            || cx.tokens.matches5(TokenType::EXPORT, TokenType::DEFAULT, TokenType::ABSTRACT, TokenType::CLASS, TokenType::NAME)
            || self.is_decorated_named_class(cx)?;
        if is_named_function {
            cx.tokens.remove_initial_token();
            cx.tokens.remove_token();
            let name = self.process_named_function(cx, driver)?;
            cx.tokens.append_code(&format!(" exports.default = {name};"));
        } else if is_named_class {
            cx.tokens.remove_initial_token();
            cx.tokens.remove_token();
            driver.copy_decorators(cx)?;
            if cx.tokens.matches1(TokenType::ABSTRACT) {
                cx.tokens.remove_token();
            }
            let name = driver.process_named_class(cx)?;
            cx.tokens.append_code(&format!(" exports.default = {name};"));
        } else if should_elide_default_export(
            self.is_typescript,
            self.keep_unused_imports,
            &cx.tokens,
            &cx.declaration_info,
        ) {
            // export default T;
            exported_runtime_value = false;
            cx.tokens.remove_initial_token();
            cx.tokens.remove_token();
            cx.tokens.remove_token();
        } else if let Some(rhs_end) = cx.tokens.current_token().rhs_end_index
            && self.react_hot_loader
        {
            // `export default E;` -> `let _default = E; exports.default = _default;`
            let default_name = cx.names.claim_free_name("_default");
            cx.tokens.replace_token(&format!("let {default_name} ="));
            cx.tokens.remove_token();
            driver.process_until(cx, rhs_end)?;
            let terminator = if cx.tokens.matches1_at_index(rhs_end - 1, TokenType::SEMI) { "" } else { ";" };
            cx.tokens
                .append_code(&format!("{terminator} exports.default = {default_name};"));
            cx.extracted_default_export_name = Some(default_name);
        } else {
            // export default E -> exports.default = E
            cx.tokens.replace_token("exports.");
            cx.tokens.copy_token();
            cx.tokens.append_code(" =");
        }
        if exported_runtime_value {
            self.had_default_export.set(true);
        }
        Ok(())
    }

    /// `export default @dec class C {}`.
    fn is_decorated_named_class(&self, cx: &TransformContext<'_>) -> Result<bool> {
        let mut index = cx.tokens.current_index() + 2;
        if !cx.tokens.matches1_at_index(index, TokenType::AT) {
            return Ok(false);
        }
        while cx.tokens.matches1_at_index(index, TokenType::AT) {
            index = skip_decorator(&cx.tokens, index)?;
        }
        Ok(cx.tokens.matches2_at_index(index, TokenType::CLASS, TokenType::NAME)
            || (cx.tokens.matches1_at_index(index, TokenType::ABSTRACT)
                && cx.tokens.matches2_at_index(index + 1, TokenType::CLASS, TokenType::NAME)))
    }

    /// Copy `function f(...) {...}` (possibly `async` or a generator) and
    /// return its name.
    fn process_named_function(&self, cx: &mut TransformContext<'_>, driver: &Driver) -> Result<String> {
        if cx.tokens.matches1(TokenType::ASYNC) {
            cx.tokens.copy_token();
        }
        cx.tokens.copy_expected_token(TokenType::FUNCTION)?;
        if cx.tokens.matches1(TokenType::STAR) {
            cx.tokens.copy_token();
        }
        if !cx.tokens.matches1(TokenType::NAME) {
            return Err(cx.tokens.error("Expected identifier for exported function name"));
        }
        let name = cx.tokens.identifier_name().to_string();
        cx.tokens.copy_token();
        // Type parameters.
        driver.process_possible_type_range(cx)?;
        cx.tokens.copy_expected_token(TokenType::PAREN_L)?;
        driver.process_balanced_code(cx)?;
        cx.tokens.copy_expected_token(TokenType::PAREN_R)?;
        // Return type.
        driver.process_possible_type_range(cx)?;
        cx.tokens.copy_expected_token(TokenType::BRACE_L)?;
        driver.process_balanced_code(cx)?;
        cx.tokens.copy_expected_token(TokenType::BRACE_R)?;
        Ok(name)
    }

    /// `export const a = 1;` -> `const a = exports.a = 1;`
    fn process_simple_export_var(&self, cx: &mut TransformContext<'_>, driver: &Driver) -> Result<()> {
        cx.tokens.remove_initial_token();
        // var, let or const
        cx.tokens.copy_token();
        let name = cx.tokens.identifier_name().to_string();
        cx.tokens.copy_expected_token(TokenType::NAME)?;
        while !cx.tokens.matches1(TokenType::EQ) {
            if cx.tokens.is_at_end() {
                return Err(cx.tokens.error("Expected = in exported declaration"));
            }
            driver.process_token(cx)?;
        }
        let Some(rhs_end) = cx.tokens.current_token().rhs_end_index else {
            return Err(cx.tokens.error("Expected = token with an end index"));
        };
        let binding = cx.export_binding(&name).unwrap_or_else(|| format!("exports.{name}"));
        cx.tokens.copy_token();
        cx.tokens.append_code(&format!(" {binding} ="));
        driver.process_until(cx, rhs_end)
    }

    /// `export let {a, b: [c]} = d, e = 1;` -> `({a: exports.a, b: [exports.c]} = d), exports.e = 1;`
    ///
    /// Every declared name was given the `exports.x` substitution up front,
    /// so later reads and writes go through `exports` too.
    fn process_complex_export_var(&self, cx: &mut TransformContext<'_>, driver: &Driver) -> Result<()> {
        cx.tokens.remove_initial_token();
        cx.tokens.remove_token();
        let mut needs_close_paren = cx.tokens.matches1(TokenType::BRACE_L);
        if needs_close_paren {
            cx.tokens.append_code("(");
        }
        let mut depth = 0usize;
        while !cx.tokens.is_at_end() {
            let token = *cx.tokens.current_token();
            match token.token_type {
                TokenType::BRACE_L | TokenType::DOLLAR_BRACE_L | TokenType::BRACKET_L => {
                    depth += 1;
                    cx.tokens.copy_token();
                }
                TokenType::BRACE_R | TokenType::BRACKET_R => {
                    depth = depth.saturating_sub(1);
                    cx.tokens.copy_token();
                }
                TokenType::EQ => {
                    let Some(rhs_end) = token.rhs_end_index else {
                        return Err(cx.tokens.error("Expected = token with an end index"));
                    };
                    driver.process_until(cx, rhs_end)?;
                    if needs_close_paren && depth == 0 {
                        cx.tokens.append_code(")");
                        needs_close_paren = false;
                    }
                }
                tt if depth == 0 && tt != TokenType::NAME && tt != TokenType::COMMA && !token.is_type => break,
                TokenType::NAME if token.identifier_role.is_some_and(IdentifierRole::is_declaration) => {
                    let name = cx.tokens.identifier_name();
                    let Some(replacement) = cx.identifier_replacement(name) else {
                        return Err(cx.tokens.error(format!("Expected a replacement for {name} in `export var` syntax")));
                    };
                    let replacement = if token.identifier_role.is_some_and(IdentifierRole::is_object_shorthand_declaration) {
                        format!("{name}: {replacement}")
                    } else {
                        replacement
                    };
                    cx.tokens.replace_token(&replacement);
                }
                _ => driver.process_token(cx)?,
            }
        }
        Ok(())
    }

    fn process_export_bindings(&self, cx: &mut TransformContext<'_>) -> Result<()> {
        cx.tokens.remove_initial_token();
        cx.tokens.remove_token();
        let is_reexport = is_export_from(&cx.tokens);
        let mut export_statements = Vec::new();
        loop {
            if cx.tokens.matches1(TokenType::BRACE_R) {
                cx.tokens.remove_token();
                break;
            }
            let specifier = get_specifier_info(&cx.tokens, cx.tokens.current_index())?;
            while cx.tokens.current_index() < specifier.end_index {
                cx.tokens.remove_token();
            }
            let should_remove = specifier.is_type
                || (!is_reexport && cx.should_elide_exported_name(&specifier.left_name));
            if !should_remove {
                let exported_name = &specifier.right_name;
                if exported_name == "default" {
                    self.had_default_export.set(true);
                } else {
                    self.had_named_export.set(true);
                }
                let local = cx
                    .identifier_replacement(&specifier.left_name)
                    .unwrap_or_else(|| specifier.left_name.clone());
                export_statements.push(format!("{} = {local};", export_target(exported_name)));
            }
            if cx.tokens.matches1(TokenType::BRACE_R) {
                cx.tokens.remove_token();
                break;
            }
            if cx.tokens.matches2(TokenType::COMMA, TokenType::BRACE_R) {
                cx.tokens.remove_token();
                cx.tokens.remove_token();
                break;
            } else if cx.tokens.matches1(TokenType::COMMA) {
                cx.tokens.remove_token();
            } else {
                return Err(cx.tokens.error("Unexpected token in export list"));
            }
        }
        if cx.tokens.matches_contextual(ContextualKeyword::From) {
            // The re-export code was generated with the path's load statement.
            cx.tokens.remove_token();
            self.replace_path_with_import_code(cx)?;
        } else {
            cx.tokens.append_code(&export_statements.join(" "));
        }
        if cx.tokens.matches1(TokenType::SEMI) {
            cx.tokens.remove_token();
        }
        Ok(())
    }

    fn process_export_star(&self, cx: &mut TransformContext<'_>) -> Result<()> {
        cx.tokens.remove_initial_token();
        while !cx.tokens.matches1(TokenType::STRING) {
            if cx.tokens.is_at_end() {
                return Err(cx.tokens.error("Expected module path in export"));
            }
            cx.tokens.remove_token();
        }
        self.replace_path_with_import_code(cx)?;
        if cx.tokens.matches1(TokenType::SEMI) {
            cx.tokens.remove_token();
        }
        Ok(())
    }

    fn replace_path_with_import_code(&self, cx: &mut TransformContext<'_>) -> Result<()> {
        let path = cx.tokens.string_value().to_string();
        let Some(imports) = cx.imports.as_mut() else {
            return Err(TransformError::unsupported("CommonJS exports require the import pre-pass"));
        };
        let code = imports.claim_import_code(&path);
        cx.tokens.replace_token_trimming_left_whitespace(&code);
        remove_maybe_import_attributes(&mut cx.tokens);
        Ok(())
    }
}

/// `exports.a`, or `exports["a-b"]` for names that are not identifiers.
fn export_target(exported_name: &str) -> String {
    if is_identifier(exported_name) || exported_name == "default" {
        format!("exports.{exported_name}")
    } else {
        format!("exports[{exported_name:?}]")
    }
}

impl Transformer for CjsImportTransformer {
    fn name(&self) -> &'static str {
        "cjs-imports"
    }

    fn process(&self, cx: &mut TransformContext<'_>, driver: &Driver) -> Result<bool> {
        let token = *cx.tokens.current_token();
        if token.is_type {
            return Ok(false);
        }
        match token.token_type {
            TokenType::IMPORT => {
                if cx.tokens.matches3(TokenType::IMPORT, TokenType::NAME, TokenType::EQ) {
                    self.process_import_equals(cx);
                    return Ok(true);
                }
                if cx.tokens.matches2(TokenType::IMPORT, TokenType::DOT) {
                    // import.meta
                    return Ok(false);
                }
                self.process_import(cx, driver)?;
                Ok(true)
            }
            TokenType::EXPORT => {
                if cx.tokens.matches2(TokenType::EXPORT, TokenType::EQ) {
                    cx.tokens.replace_token("module.exports");
                    return Ok(true);
                }
                self.had_export.set(true);
                self.process_export(cx, driver)
            }
            TokenType::AT => {
                if driver.decorators_precede_export(cx)? {
                    return Err(TransformError::unsupported(
                        "Decorators before `export` are not supported when rewriting to CommonJS; put them after `export`",
                    ));
                }
                Ok(false)
            }
            TokenType::NAME if cx.tokens.matches2(TokenType::NAME, TokenType::POST_INC_DEC) => {
                if self.process_post_inc_dec(cx)? {
                    return Ok(true);
                }
                self.process_identifier(cx)
            }
            TokenType::NAME | TokenType::JSX_NAME => self.process_identifier(cx),
            TokenType::EQ => Ok(self.process_assignment(cx)),
            TokenType::ASSIGN => Ok(self.process_complex_assignment(cx)),
            TokenType::PRE_INC_DEC => Ok(self.process_pre_inc_dec(cx)),
            _ => Ok(false),
        }
    }

    fn prefix_code(&self, _cx: &TransformContext<'_>) -> String {
        if self.had_export.get() {
            "Object.defineProperty(exports, \"__esModule\", {value: true});".to_string()
        } else {
            String::new()
        }
    }

    fn suffix_code(&self, _cx: &TransformContext<'_>) -> String {
        if self.legacy_babel5_interop && self.had_default_export.get() && !self.had_named_export.get() {
            "\nmodule.exports = exports.default;\n".to_string()
        } else {
            String::new()
        }
    }
}
