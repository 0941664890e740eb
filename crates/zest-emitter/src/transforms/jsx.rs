//! JSX elements to factory calls.
//!
//! Classic runtime: `<A b="c">{d}</A>` becomes
//! `React.createElement(A, { b: "c",}, d)`. Automatic runtime uses
//! `_jsx`/`_jsxs`/`_jsxDEV` from `<importSource>/jsx-runtime` and moves
//! children into a `children` prop. Every newline inside an element is kept,
//! so line numbers after the element don't shift.

use super::Transformer;
use crate::cjs_imports::CjsImportProcessor;
use crate::context::TransformContext;
use crate::driver::Driver;
use crate::util::{lookup_entity, pragma_base};
use indexmap::IndexMap;
use std::cell::{Cell, RefCell};
use zest_common::{JsxRuntime, Result, TransformOptions};
use zest_scanner::{JsxRole, TokenType};

/// A pragma such as `React.createElement`, split into the binding it reads
/// and the member path after it.
#[derive(Debug)]
struct PragmaInfo {
    base: String,
    suffix: String,
    fragment_base: String,
    fragment_suffix: String,
}

impl PragmaInfo {
    fn new(pragma: &str, fragment_pragma: &str) -> Self {
        let base = pragma_base(pragma);
        let fragment_base = pragma_base(fragment_pragma);
        PragmaInfo {
            base: base.to_string(),
            suffix: pragma[base.len()..].to_string(),
            fragment_base: fragment_base.to_string(),
            fragment_suffix: fragment_pragma[fragment_base.len()..].to_string(),
        }
    }
}

#[derive(Debug)]
pub struct JsxTransformer {
    production: bool,
    is_automatic_runtime: bool,
    pragma: PragmaInfo,
    jsx_import_source: String,
    file_path: Option<String>,
    last_line_number: Cell<usize>,
    last_index: Cell<usize>,
    filename_var_name: RefCell<Option<String>>,
    /// Runtime function name to local name, for the ES module prefix import.
    esm_automatic_import_names: RefCell<IndexMap<String, String>>,
    /// Runtime module path to module handle, for the CommonJS prefix require.
    cjs_automatic_module_names: RefCell<IndexMap<String, String>>,
}

impl JsxTransformer {
    pub fn new(options: &TransformOptions) -> Self {
        JsxTransformer {
            production: options.production,
            is_automatic_runtime: options.jsx_runtime == JsxRuntime::Automatic,
            pragma: PragmaInfo::new(options.jsx_pragma(), options.jsx_fragment_pragma()),
            jsx_import_source: options.jsx_import_source().to_string(),
            file_path: options.file_path.clone(),
            last_line_number: Cell::new(1),
            last_index: Cell::new(0),
            filename_var_name: RefCell::new(None),
            esm_automatic_import_names: RefCell::new(IndexMap::new()),
            cjs_automatic_module_names: RefCell::new(IndexMap::new()),
        }
    }

    fn process_jsx_tag(&self, cx: &mut TransformContext<'_>, driver: &Driver) -> Result<()> {
        let token = *cx.tokens.current_token();
        // Line numbers are computed here so they are queried in token order.
        let element_location = (!self.production)
            .then(|| self.element_location_code(cx.tokens.code(), token.start as usize));
        if self.is_automatic_runtime && token.jsx_role != Some(JsxRole::KeyAfterPropSpread) {
            self.transform_tag_to_jsx_func(cx, driver, element_location, token.jsx_role)
        } else {
            self.transform_tag_to_create_element(cx, driver, element_location)
        }
    }

    fn element_location_code(&self, code: &str, first_token_start: usize) -> String {
        format!("lineNumber: {}", self.line_number_for_index(code, first_token_start))
    }

    fn line_number_for_index(&self, code: &str, index: usize) -> usize {
        let from = self.last_index.get();
        let to = index.min(code.len());
        if from < to {
            let newlines = memchr::memchr_iter(b'\n', &code.as_bytes()[from..to]).count();
            self.last_line_number.set(self.last_line_number.get() + newlines);
            self.last_index.set(to);
        }
        self.last_line_number.get()
    }

    fn transform_tag_to_jsx_func(
        &self,
        cx: &mut TransformContext<'_>,
        driver: &Driver,
        element_location: Option<String>,
        jsx_role: Option<JsxRole>,
    ) -> Result<()> {
        let is_static = jsx_role == Some(JsxRole::StaticChildren);
        let invocation = self.jsx_func_invocation_code(cx, is_static);
        cx.tokens.replace_token(&invocation);

        let mut key_code = None;
        if cx.tokens.matches1(TokenType::JSX_TAG_END) {
            // <>...</>
            let fragment = self.fragment_code(cx);
            cx.tokens.replace_token(&format!("{fragment}, {{"));
            self.process_automatic_children_and_end_props(cx, driver, jsx_role)?;
        } else {
            self.process_tag_intro(cx, driver)?;
            cx.tokens.append_code(", {");
            key_code = self.process_props(cx, driver, true)?;
            if cx.tokens.matches2(TokenType::SLASH, TokenType::JSX_TAG_END) {
                cx.tokens.append_code("}");
            } else if cx.tokens.matches1(TokenType::JSX_TAG_END) {
                cx.tokens.remove_token();
                self.process_automatic_children_and_end_props(cx, driver, jsx_role)?;
            } else {
                return Err(cx.tokens.error("Expected either /> or > at the end of the tag."));
            }
            // The key moves to its own argument. A multi-line key shifts
            // lines inside this element only.
            if let Some(key_code) = &key_code {
                cx.tokens.append_code(&format!(", {key_code}"));
            }
        }
        if let Some(element_location) = element_location {
            if key_code.is_none() {
                cx.tokens.append_code(", void 0");
            }
            let dev_source = self.dev_source(cx, &element_location);
            cx.tokens
                .append_code(&format!(", {is_static}, {dev_source}, this"));
        }
        self.close_tag(cx)
    }

    fn transform_tag_to_create_element(
        &self,
        cx: &mut TransformContext<'_>,
        driver: &Driver,
        element_location: Option<String>,
    ) -> Result<()> {
        let invocation = self.create_element_invocation_code(cx);
        cx.tokens.replace_token(&invocation);

        if cx.tokens.matches1(TokenType::JSX_TAG_END) {
            let fragment = self.fragment_code(cx);
            cx.tokens.replace_token(&format!("{fragment}, null"));
            self.process_children(cx, driver, true)?;
        } else {
            self.process_tag_intro(cx, driver)?;
            self.process_props_object_with_dev_info(cx, driver, element_location.as_deref())?;
            if cx.tokens.matches2(TokenType::SLASH, TokenType::JSX_TAG_END) {
                // Self-closing.
            } else if cx.tokens.matches1(TokenType::JSX_TAG_END) {
                cx.tokens.remove_token();
                self.process_children(cx, driver, true)?;
            } else {
                return Err(cx.tokens.error("Expected either /> or > at the end of the tag."));
            }
        }
        self.close_tag(cx)
    }

    /// Remove the close tag (or the `/` of a self-closing tag) and end the
    /// call on its `>`.
    fn close_tag(&self, cx: &mut TransformContext<'_>) -> Result<()> {
        cx.tokens.remove_initial_token();
        while !cx.tokens.matches1(TokenType::JSX_TAG_END) {
            if cx.tokens.is_at_end() {
                return Err(cx.tokens.error("Unterminated JSX element"));
            }
            cx.tokens.remove_token();
        }
        cx.tokens.replace_token(")");
        Ok(())
    }

    fn jsx_func_invocation_code(&self, cx: &mut TransformContext<'_>, is_static: bool) -> String {
        if !self.production {
            self.claim_auto_imported_func_invocation(cx, "jsxDEV", "/jsx-dev-runtime")
        } else if is_static {
            self.claim_auto_imported_func_invocation(cx, "jsxs", "/jsx-runtime")
        } else {
            self.claim_auto_imported_func_invocation(cx, "jsx", "/jsx-runtime")
        }
    }

    fn create_element_invocation_code(&self, cx: &mut TransformContext<'_>) -> String {
        if self.is_automatic_runtime {
            return self.claim_auto_imported_func_invocation(cx, "createElement", "");
        }
        let base = cx
            .identifier_replacement(&self.pragma.base)
            .unwrap_or_else(|| self.pragma.base.clone());
        format!("{base}{}(", self.pragma.suffix)
    }

    fn fragment_code(&self, cx: &mut TransformContext<'_>) -> String {
        if self.is_automatic_runtime {
            let runtime = if self.production { "/jsx-runtime" } else { "/jsx-dev-runtime" };
            return self.claim_auto_imported_name(cx, "Fragment", runtime);
        }
        let base = cx
            .identifier_replacement(&self.pragma.fragment_base)
            .unwrap_or_else(|| self.pragma.fragment_base.clone());
        format!("{base}{}", self.pragma.fragment_suffix)
    }

    fn claim_auto_imported_func_invocation(
        &self,
        cx: &mut TransformContext<'_>,
        func_name: &str,
        import_path_suffix: &str,
    ) -> String {
        let func_code = self.claim_auto_imported_name(cx, func_name, import_path_suffix);
        if cx.imports.is_some() {
            format!("{func_code}.call(void 0, ")
        } else {
            format!("{func_code}(")
        }
    }

    fn claim_auto_imported_name(
        &self,
        cx: &mut TransformContext<'_>,
        func_name: &str,
        import_path_suffix: &str,
    ) -> String {
        if cx.imports.is_some() {
            let path = format!("{}{import_path_suffix}", self.jsx_import_source);
            let mut modules = self.cjs_automatic_module_names.borrow_mut();
            let module_name = modules
                .entry(path)
                .or_insert_with_key(|path| CjsImportProcessor::get_free_identifier_for_path(&mut cx.names, path));
            format!("{module_name}.{func_name}")
        } else {
            let mut imported = self.esm_automatic_import_names.borrow_mut();
            imported
                .entry(func_name.to_string())
                .or_insert_with(|| cx.names.claim_free_name(&format!("_{func_name}")))
                .clone()
        }
    }

    /// Copy the tag name. Lowercase and dashed names are intrinsic elements
    /// and become strings; anything else is a reference that later units
    /// may rewrite.
    fn process_tag_intro(&self, cx: &mut TransformContext<'_>, driver: &Driver) -> Result<()> {
        let start = cx.tokens.current_index();
        let token_count = cx.tokens.tokens().len();
        let mut intro_end = start + 1;
        while intro_end < token_count && !is_intro_end(cx, intro_end) {
            intro_end += 1;
        }

        if intro_end == start + 1 {
            let tag_name = cx.tokens.identifier_name();
            if is_intrinsic_tag_name(tag_name) {
                cx.tokens.replace_token(&format!("'{tag_name}'"));
            }
        } else if intro_end == start + 3
            && cx.tokens.matches3(TokenType::JSX_NAME, TokenType::COLON, TokenType::JSX_NAME)
        {
            // <svg:rect>
            let namespace = cx.tokens.identifier_name();
            let name = cx.tokens.identifier_name_at_index(start + 2);
            cx.tokens.replace_token(&format!("'{namespace}:{name}'"));
            cx.tokens.remove_token();
            cx.tokens.remove_token();
        }
        driver.process_until(cx, intro_end)
    }

    /// Props after `{` has been written. Without dev info, `null` stands in
    /// for an empty props object.
    fn process_props_object_with_dev_info(
        &self,
        cx: &mut TransformContext<'_>,
        driver: &Driver,
        element_location: Option<&str>,
    ) -> Result<()> {
        let dev_props = match element_location {
            Some(element_location) => {
                format!("__self: this, __source: {}", self.dev_source(cx, element_location))
            }
            None => String::new(),
        };
        if !cx.tokens.matches1(TokenType::JSX_NAME) && !cx.tokens.matches1(TokenType::BRACE_L) {
            if dev_props.is_empty() {
                cx.tokens.append_code(", null");
            } else {
                cx.tokens.append_code(&format!(", {{{dev_props}}}"));
            }
            return Ok(());
        }
        cx.tokens.append_code(", {");
        self.process_props(cx, driver, false)?;
        if dev_props.is_empty() {
            cx.tokens.append_code("}");
        } else {
            cx.tokens.append_code(&format!(" {dev_props}}}"));
        }
        Ok(())
    }

    /// Rewrite attributes into object members, each followed by `,`.
    ///
    /// With `extract_key_code`, a `key` prop is cut out and its code
    /// returned. When several keys appear the last one wins; the newlines of
    /// the dropped ones are kept.
    fn process_props(
        &self,
        cx: &mut TransformContext<'_>,
        driver: &Driver,
        extract_key_code: bool,
    ) -> Result<Option<String>> {
        let mut key_code: Option<String> = None;
        loop {
            if cx.tokens.matches3(TokenType::JSX_NAME, TokenType::COLON, TokenType::JSX_NAME) {
                // xlink:href="..."
                let namespace = cx.tokens.identifier_name();
                let name = cx.tokens.identifier_name_at_index(cx.tokens.current_index() + 2);
                cx.tokens.replace_token(&format!("'{namespace}:{name}'"));
                cx.tokens.remove_token();
                cx.tokens.remove_token();
                if cx.tokens.matches1(TokenType::EQ) {
                    cx.tokens.replace_token(": ");
                    self.process_prop_value(cx, driver)?;
                } else {
                    cx.tokens.append_code(": true");
                }
            } else if cx.tokens.matches2(TokenType::JSX_NAME, TokenType::EQ) {
                let prop_name = cx.tokens.identifier_name();
                if extract_key_code && prop_name == "key" {
                    if let Some(previous) = &key_code {
                        let newlines: String = previous.chars().filter(|&c| c == '\n').collect();
                        cx.tokens.append_code(&newlines);
                    }
                    // key=
                    cx.tokens.remove_token();
                    cx.tokens.remove_token();
                    let snapshot = cx.tokens.snapshot();
                    self.process_prop_value(cx, driver)?;
                    key_code = Some(cx.tokens.dangerously_get_and_remove_code_since_snapshot(snapshot));
                    continue;
                }
                Self::process_prop_name(cx, prop_name);
                cx.tokens.replace_token(": ");
                self.process_prop_value(cx, driver)?;
            } else if cx.tokens.matches1(TokenType::JSX_NAME) {
                // <input disabled />
                let prop_name = cx.tokens.identifier_name();
                Self::process_prop_name(cx, prop_name);
                cx.tokens.append_code(": true");
            } else if cx.tokens.matches1(TokenType::BRACE_L) {
                // {...props} becomes an object spread.
                cx.tokens.replace_token("");
                driver.process_balanced_code(cx)?;
                cx.tokens.replace_token("");
            } else {
                break;
            }
            cx.tokens.append_code(",");
        }
        Ok(key_code)
    }

    fn process_prop_name(cx: &mut TransformContext<'_>, prop_name: &str) {
        if prop_name.contains('-') {
            cx.tokens.replace_token(&format!("'{prop_name}'"));
        } else {
            cx.tokens.copy_token();
        }
    }

    fn process_prop_value(&self, cx: &mut TransformContext<'_>, driver: &Driver) -> Result<()> {
        if cx.tokens.matches1(TokenType::BRACE_L) {
            cx.tokens.replace_token("");
            driver.process_balanced_code(cx)?;
            cx.tokens.replace_token("");
            Ok(())
        } else if cx.tokens.matches1(TokenType::JSX_TAG_START) {
            self.process_jsx_tag(cx, driver)
        } else {
            let token = *cx.tokens.current_token();
            let raw = cx.tokens.raw_code_for_token(&token);
            let value = raw.get(1..raw.len().saturating_sub(1)).unwrap_or("");
            let replacement = format!(
                "{}{}",
                format_jsx_string_value_literal(value),
                format_jsx_text_replacement(value)
            );
            cx.tokens.replace_token(&replacement);
            Ok(())
        }
    }

    /// Children as a `children` prop, then close the props object.
    fn process_automatic_children_and_end_props(
        &self,
        cx: &mut TransformContext<'_>,
        driver: &Driver,
        jsx_role: Option<JsxRole>,
    ) -> Result<()> {
        if jsx_role == Some(JsxRole::StaticChildren) {
            cx.tokens.append_code(" children: [");
            self.process_children(cx, driver, false)?;
            cx.tokens.append_code("]}");
        } else {
            // Children that all turn out empty still have to be consumed.
            if jsx_role == Some(JsxRole::OneChild) {
                cx.tokens.append_code(" children: ");
            }
            self.process_children(cx, driver, false)?;
            cx.tokens.append_code("}");
        }
        Ok(())
    }

    /// Children as a comma-separated list, stopping at the close tag.
    fn process_children(
        &self,
        cx: &mut TransformContext<'_>,
        driver: &Driver,
        needs_initial_comma: bool,
    ) -> Result<()> {
        let mut needs_comma = needs_initial_comma;
        loop {
            if cx.tokens.matches2(TokenType::JSX_TAG_START, TokenType::SLASH) {
                return Ok(());
            }
            let comma = if needs_comma { ", " } else { "" };
            let did_emit_element = match cx.tokens.current_token().token_type {
                TokenType::BRACE_L if cx.tokens.matches2(TokenType::BRACE_L, TokenType::BRACE_R) => {
                    // {} and {/* comment */}
                    cx.tokens.replace_token("");
                    cx.tokens.replace_token("");
                    false
                }
                TokenType::BRACE_L => {
                    cx.tokens.replace_token(comma);
                    driver.process_balanced_code(cx)?;
                    cx.tokens.replace_token("");
                    true
                }
                TokenType::JSX_TAG_START => {
                    cx.tokens.append_code(comma);
                    self.process_jsx_tag(cx, driver)?;
                    true
                }
                TokenType::JSX_TEXT | TokenType::JSX_EMPTY_TEXT => {
                    Self::process_child_text_element(cx, comma)
                }
                _ => return Err(cx.tokens.error("Unexpected token when processing JSX children.")),
            };
            if did_emit_element {
                needs_comma = true;
            }
        }
    }

    /// Text child as a string literal, or nothing if it is only layout.
    fn process_child_text_element(cx: &mut TransformContext<'_>, comma: &str) -> bool {
        let token = *cx.tokens.current_token();
        let value = cx.tokens.raw_code_for_token(&token);
        let replacement = format_jsx_text_replacement(value);
        let literal = format_jsx_text_literal(value);
        if literal == "\"\"" {
            cx.tokens.replace_token(&replacement);
            false
        } else {
            cx.tokens
                .replace_token(&format!("{comma}{literal}{replacement}"));
            true
        }
    }

    fn dev_source(&self, cx: &mut TransformContext<'_>, element_location: &str) -> String {
        let mut filename_var_name = self.filename_var_name.borrow_mut();
        let name = filename_var_name.get_or_insert_with(|| cx.names.claim_free_name("_jsxFileName"));
        format!("{{fileName: {name}, {element_location}}}")
    }
}

/// Where the tag name ends: at the first attribute, `{...spread}`, `>` or
/// `/>`.
fn is_intro_end(cx: &TransformContext<'_>, index: usize) -> bool {
    let tokens = &cx.tokens;
    if tokens.token_at(index).is_type {
        return false;
    }
    tokens.matches2_at_index(index - 1, TokenType::JSX_NAME, TokenType::JSX_NAME)
        || tokens.matches2_at_index(index - 1, TokenType::GREATER_THAN, TokenType::JSX_NAME)
        || tokens.matches1_at_index(index, TokenType::BRACE_L)
        || tokens.matches1_at_index(index, TokenType::JSX_TAG_END)
        || tokens.matches2_at_index(index, TokenType::SLASH, TokenType::JSX_TAG_END)
}

/// `div` and `my-element`, but not `Foo`, `_foo` or `$foo`.
fn is_intrinsic_tag_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_lowercase()) || name.contains('-')
}

fn json_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Child text as a string literal. Leading and trailing whitespace on each
/// line is dropped except right after the open tag and right before the
/// close tag; blank lines vanish and the remaining lines are joined with a
/// single space.
fn format_jsx_text_literal(text: &str) -> String {
    let mut result = String::new();
    let mut whitespace = String::new();
    let mut is_in_initial_line_whitespace = false;
    let mut seen_non_whitespace = false;
    let mut index = 0;
    while let Some(c) = text[index..].chars().next() {
        let mut next = index + c.len_utf8();
        match c {
            ' ' | '\t' | '\r' => {
                if !is_in_initial_line_whitespace {
                    whitespace.push(c);
                }
            }
            '\n' => {
                whitespace.clear();
                is_in_initial_line_whitespace = true;
            }
            _ => {
                if seen_non_whitespace && is_in_initial_line_whitespace {
                    result.push(' ');
                }
                result.push_str(&whitespace);
                whitespace.clear();
                if c == '&' {
                    let (entity, after) = process_entity(text, next);
                    result.push_str(&entity);
                    next = after;
                } else {
                    result.push(c);
                }
                seen_non_whitespace = true;
                is_in_initial_line_whitespace = false;
            }
        }
        index = next;
    }
    if !is_in_initial_line_whitespace {
        result.push_str(&whitespace);
    }
    json_string(&result)
}

/// What stays in the output after a text literal: its newlines, plus the
/// spaces on its last line.
fn format_jsx_text_replacement(text: &str) -> String {
    let mut newlines = 0;
    let mut spaces = 0;
    for c in text.chars() {
        match c {
            '\n' => {
                newlines += 1;
                spaces = 0;
            }
            ' ' => spaces += 1,
            _ => {}
        }
    }
    format!("{}{}", "\n".repeat(newlines), " ".repeat(spaces))
}

/// A quoted attribute value. A line break followed by indentation collapses
/// to one space.
fn format_jsx_string_value_literal(text: &str) -> String {
    let mut result = String::new();
    let mut index = 0;
    while let Some(c) = text[index..].chars().next() {
        let mut next = index + c.len_utf8();
        match c {
            '\n' => {
                let rest = &text[next..];
                if rest.starts_with(char::is_whitespace) {
                    result.push(' ');
                    next += rest.len() - rest.trim_start().len();
                } else {
                    result.push('\n');
                }
            }
            '&' => {
                let (entity, after) = process_entity(text, next);
                result.push_str(&entity);
                next = after;
            }
            _ => result.push(c),
        }
        index = next;
    }
    json_string(&result)
}

/// Decode `&name;`, `&#123;` or `&#x7B;` starting right after the `&`.
/// Returns the text to emit and the index to resume at; an unrecognized
/// entity yields a literal `&`.
fn process_entity(text: &str, after_ampersand: usize) -> (String, usize) {
    let bytes = text.as_bytes();
    let mut index = after_ampersand;
    let mut entity = None;
    if bytes.get(index) == Some(&b'#') {
        index += 1;
        let radix = if bytes.get(index) == Some(&b'x') {
            index += 1;
            16
        } else {
            10
        };
        let digits_start = index;
        while bytes.get(index).is_some_and(|&b| (b as char).is_digit(radix)) {
            index += 1;
        }
        if bytes.get(index) == Some(&b';') && index > digits_start {
            entity = u32::from_str_radix(&text[digits_start..index], radix)
                .ok()
                .and_then(char::from_u32);
            index += 1;
        }
    } else {
        let name_start = index;
        let mut count = 0;
        while index < bytes.len() && count < 10 {
            count += 1;
            let byte = bytes[index];
            index += 1;
            if byte == b';' {
                entity = text.get(name_start..index - 1).and_then(lookup_entity);
                break;
            }
        }
    }
    match entity {
        Some(c) => (c.to_string(), index),
        None => ("&".to_string(), after_ampersand),
    }
}

impl Transformer for JsxTransformer {
    fn name(&self) -> &'static str {
        "jsx"
    }

    fn process(&self, cx: &mut TransformContext<'_>, driver: &Driver) -> Result<bool> {
        if !cx.tokens.matches1(TokenType::JSX_TAG_START) {
            return Ok(false);
        }
        self.process_jsx_tag(cx, driver)?;
        Ok(true)
    }

    fn prefix_code(&self, cx: &TransformContext<'_>) -> String {
        let mut prefix = String::new();
        if let Some(name) = self.filename_var_name.borrow().as_ref() {
            let file_path = json_string(self.file_path.as_deref().unwrap_or(""));
            prefix.push_str(&format!("const {name} = {file_path};"));
        }
        if !self.is_automatic_runtime {
            return prefix;
        }
        if cx.imports.is_some() {
            for (path, module_name) in self.cjs_automatic_module_names.borrow().iter() {
                prefix.push_str(&format!("var {module_name} = require(\"{path}\");"));
            }
            return prefix;
        }
        let imported = self.esm_automatic_import_names.borrow();
        if let Some(create_element) = imported.get("createElement") {
            prefix.push_str(&format!(
                "import {{createElement as {create_element}}} from \"{}\";",
                self.jsx_import_source
            ));
        }
        let specifiers: Vec<String> = imported
            .iter()
            .filter(|(name, _)| name.as_str() != "createElement")
            .map(|(name, local)| format!("{name} as {local}"))
            .collect();
        if !specifiers.is_empty() {
            let runtime = if self.production { "/jsx-runtime" } else { "/jsx-dev-runtime" };
            prefix.push_str(&format!(
                "import {{{}}} from \"{}{runtime}\";",
                specifiers.join(", "),
                self.jsx_import_source
            ));
        }
        prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_literal_joins_lines_with_one_space() {
        assert_eq!(format_jsx_text_literal("\n  Hello\n    world\n"), "\"Hello world\"");
    }

    #[test]
    fn test_text_literal_keeps_edge_spaces_on_single_line() {
        assert_eq!(format_jsx_text_literal(" a b "), "\" a b \"");
    }

    #[test]
    fn test_text_literal_drops_blank_lines() {
        assert_eq!(format_jsx_text_literal("\n\n   \n"), "\"\"");
    }

    #[test]
    fn test_text_literal_decodes_entities() {
        assert_eq!(format_jsx_text_literal("a &amp; b &#65;&#x42; &bogus; &"), "\"a & b AB &bogus; &\"");
    }

    #[test]
    fn test_text_literal_escapes_quotes() {
        assert_eq!(format_jsx_text_literal("say \"hi\""), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn test_replacement_keeps_newlines_and_trailing_spaces() {
        assert_eq!(format_jsx_text_replacement("a\n  b\n  "), "\n\n  ");
        assert_eq!(format_jsx_text_replacement("abc"), "");
    }

    #[test]
    fn test_string_value_collapses_indented_line_breaks() {
        assert_eq!(format_jsx_string_value_literal("a\n    b"), "\"a b\"");
        assert_eq!(format_jsx_string_value_literal("a\nb"), "\"a\\nb\"");
    }

    #[test]
    fn test_intrinsic_tag_names() {
        assert!(is_intrinsic_tag_name("div"));
        assert!(is_intrinsic_tag_name("my-element"));
        assert!(!is_intrinsic_tag_name("Foo"));
        assert!(!is_intrinsic_tag_name("_foo"));
    }

    #[test]
    fn test_pragma_split() {
        let pragma = PragmaInfo::new("h", "preact.Fragment");
        assert_eq!((pragma.base.as_str(), pragma.suffix.as_str()), ("h", ""));
        assert_eq!(
            (pragma.fragment_base.as_str(), pragma.fragment_suffix.as_str()),
            ("preact", ".Fragment")
        );
    }
}
