//! The root loop and the recursion capability handed to units.
//!
//! A unit that needs the tokens inside a region rewritten by the whole
//! pipeline (a call's arguments, an initializer, a JSX expression) calls
//! back into the [`Driver`] rather than copying tokens itself.

use crate::class_info::{ClassInfo, get_class_info, skip_decorator};
use crate::context::TransformContext;
use crate::transforms::Transformer;
use zest_common::{Result, TransformError};
use zest_scanner::{ContextualKeyword, TokenType};

pub struct Driver {
    units: Vec<Box<dyn Transformer>>,
    disable_es_transforms: bool,
    react_hot_loader: bool,
}

impl Driver {
    pub fn new(units: Vec<Box<dyn Transformer>>, disable_es_transforms: bool, react_hot_loader: bool) -> Self {
        Driver {
            units,
            disable_es_transforms,
            react_hot_loader,
        }
    }

    pub fn units(&self) -> &[Box<dyn Transformer>] {
        &self.units
    }

    /// Offer the current token to every unit in order; copy it if nobody
    /// claims it.
    pub fn process_token(&self, cx: &mut TransformContext<'_>) -> Result<()> {
        if cx.tokens.matches1(TokenType::CLASS) && !cx.tokens.current_token().is_type {
            return self.process_class(cx);
        }
        for unit in &self.units {
            if unit.process(cx, self)? {
                return Ok(());
            }
        }
        cx.tokens.copy_token();
        Ok(())
    }

    /// Process tokens up to the `}` or `)` that closes the current region,
    /// leaving that closer unprocessed.
    pub fn process_balanced_code(&self, cx: &mut TransformContext<'_>) -> Result<()> {
        let region_start = cx.tokens.current_token().start;
        let mut brace_depth = 0usize;
        let mut paren_depth = 0usize;
        while !cx.tokens.is_at_end() {
            let token = cx.tokens.current_token();
            if !token.is_type {
                match token.token_type {
                    TokenType::BRACE_L | TokenType::DOLLAR_BRACE_L => brace_depth += 1,
                    TokenType::BRACE_R => {
                        if brace_depth == 0 {
                            return Ok(());
                        }
                        brace_depth -= 1;
                    }
                    TokenType::PAREN_L => paren_depth += 1,
                    TokenType::PAREN_R => {
                        if paren_depth == 0 {
                            return Ok(());
                        }
                        paren_depth -= 1;
                    }
                    _ => {}
                }
            }
            self.process_token(cx)?;
        }
        Err(TransformError::unbalanced_region(
            cx.tokens.code(),
            region_start,
            "Reached the end of input inside an unclosed region",
        ))
    }

    /// Process tokens until the cursor reaches `end_index`.
    pub fn process_until(&self, cx: &mut TransformContext<'_>, end_index: usize) -> Result<()> {
        while cx.tokens.current_index() < end_index {
            if cx.tokens.is_at_end() {
                return Err(TransformError::unbalanced_region(
                    cx.tokens.code(),
                    cx.tokens.current_token().start,
                    "Reached the end of input inside an unclosed region",
                ));
            }
            self.process_token(cx)?;
        }
        Ok(())
    }

    /// `class A ... {}` with field initializers moved into `__init` methods.
    pub fn process_class(&self, cx: &mut TransformContext<'_>) -> Result<()> {
        let class_index = cx.tokens.current_index();
        let info = get_class_info(&cx.tokens, &mut cx.names, class_index, self.disable_es_transforms)?;

        let has_initializers =
            !info.static_initializer_names.is_empty() || !info.instance_initializer_names.is_empty();
        let needs_comma_expression =
            (info.header.is_expression || info.header.class_name.is_none()) && has_initializers;
        let mut class_name = info.header.class_name.clone();
        if needs_comma_expression {
            let name = cx.names.claim_free_name("_class");
            cx.generated_variables.push(name.clone());
            cx.tokens.append_code(&format!(" ({name} ="));
            class_name = Some(name);
        }
        let class_name = class_name.unwrap_or_default();

        cx.tokens.copy_expected_token(TokenType::CLASS)?;
        self.process_until(cx, info.body_open_index)?;
        self.process_class_body(cx, &info, &class_name)?;

        let static_statements: Vec<String> = info
            .static_initializer_names
            .iter()
            .map(|name| format!("{class_name}.{name}()"))
            .collect();
        if needs_comma_expression {
            cx.tokens.append_code(&format!(
                ", {}{class_name})",
                static_statements
                    .iter()
                    .map(|statement| format!("{statement}, "))
                    .collect::<String>()
            ));
        } else if !static_statements.is_empty() {
            cx.tokens.append_code(&format!(
                " {}",
                static_statements
                    .iter()
                    .map(|statement| format!("{statement};"))
                    .collect::<Vec<_>>()
                    .join(" ")
            ));
        }
        tracing::trace!(
            class_name = %class_name,
            fields = info.fields.len(),
            comma_expression = needs_comma_expression,
            "processed class"
        );
        Ok(())
    }

    /// Process a class declaration that must have a name and return it.
    pub fn process_named_class(&self, cx: &mut TransformContext<'_>) -> Result<String> {
        if !cx.tokens.matches2(TokenType::CLASS, TokenType::NAME) {
            return Err(cx.tokens.error("Expected identifier for exported class name"));
        }
        let name = cx
            .tokens
            .identifier_name_at_index(cx.tokens.current_index() + 1)
            .to_string();
        self.process_class(cx)?;
        Ok(name)
    }

    fn process_class_body(&self, cx: &mut TransformContext<'_>, info: &ClassInfo, class_name: &str) -> Result<()> {
        let needs_constructor_init = !info.constructor_initializer_statements.is_empty()
            || !info.instance_initializer_names.is_empty();
        let mut initializer_statements = info.constructor_initializer_statements.clone();
        initializer_statements.extend(
            info.instance_initializer_names
                .iter()
                .map(|name| format!("{class_name}.prototype.{name}.call(this)")),
        );
        let constructor_init_code = initializer_statements.join(";");

        cx.tokens.copy_expected_token(TokenType::BRACE_L)?;
        if self.react_hot_loader {
            cx.tokens
                .append_code("__reactstandin__regenerateByEval(key, code) {this[key] = eval(code);}");
        }
        if needs_constructor_init && info.constructor_insert_pos.is_none() {
            if info.header.has_superclass {
                cx.tokens.append_code(&format!(
                    "constructor(...args) {{ super(...args); {constructor_init_code}; }}"
                ));
            } else {
                cx.tokens
                    .append_code(&format!("constructor() {{ {constructor_init_code}; }}"));
            }
        }

        let mut field_index = 0;
        let mut range_index = 0;
        while cx.tokens.current_index() < info.body_close_index {
            let current = cx.tokens.current_index();
            if let Some(field) = info.fields.get(field_index)
                && current == field.start
            {
                let mut needs_close_bracket = false;
                let prefix = format!("{}() {{this", field.initializer_name);
                if cx.tokens.matches1(TokenType::BRACKET_L) {
                    cx.tokens.copy_token_with_prefix(&prefix);
                } else if cx.tokens.matches1(TokenType::STRING) || cx.tokens.matches1(TokenType::NUM) {
                    cx.tokens.copy_token_with_prefix(&format!("{prefix}["));
                    needs_close_bracket = true;
                } else {
                    cx.tokens.copy_token_with_prefix(&format!("{prefix}."));
                }
                while cx.tokens.current_index() < field.end {
                    if needs_close_bracket && cx.tokens.current_index() == field.equals_index {
                        cx.tokens.append_code("]");
                    }
                    self.process_token(cx)?;
                }
                cx.tokens.append_code("}");
                field_index += 1;
            } else if let Some(range) = info.ranges_to_remove.get(range_index)
                && current >= range.start
            {
                if current < range.end {
                    cx.tokens.remove_initial_token();
                    while cx.tokens.current_index() < range.end {
                        cx.tokens.remove_token();
                    }
                }
                range_index += 1;
            } else if Some(current) == info.constructor_insert_pos {
                cx.tokens.copy_token();
                if needs_constructor_init {
                    cx.tokens.append_code(&format!(";{constructor_init_code};"));
                }
            } else {
                self.process_token(cx)?;
            }
        }
        cx.tokens.copy_expected_token(TokenType::BRACE_R)
    }

    /// Copy `@dec`, `@a.b(...)` and `@(expr)` decorators.
    pub fn copy_decorators(&self, cx: &mut TransformContext<'_>) -> Result<()> {
        while cx.tokens.matches1(TokenType::AT) {
            cx.tokens.copy_token();
            if cx.tokens.matches1(TokenType::PAREN_L) {
                cx.tokens.copy_expected_token(TokenType::PAREN_L)?;
                self.process_balanced_code(cx)?;
                cx.tokens.copy_expected_token(TokenType::PAREN_R)?;
            } else {
                cx.tokens.copy_expected_token(TokenType::NAME)?;
                while cx.tokens.matches1(TokenType::DOT) {
                    cx.tokens.copy_expected_token(TokenType::DOT)?;
                    cx.tokens.copy_expected_token(TokenType::NAME)?;
                }
                if cx.tokens.matches1(TokenType::PAREN_L) {
                    cx.tokens.copy_expected_token(TokenType::PAREN_L)?;
                    self.process_balanced_code(cx)?;
                    cx.tokens.copy_expected_token(TokenType::PAREN_R)?;
                }
            }
        }
        Ok(())
    }

    /// Whether the decorator list at the cursor is followed by `export`.
    pub fn decorators_precede_export(&self, cx: &TransformContext<'_>) -> Result<bool> {
        let mut index = cx.tokens.current_index();
        while cx.tokens.matches1_at_index(index, TokenType::AT) {
            index = skip_decorator(&cx.tokens, index)?;
        }
        Ok(cx.tokens.matches1_at_index(index, TokenType::EXPORT))
    }

    /// `(a): T => ...`: drop the return type, keeping `)` next to `=>`.
    pub fn process_possible_arrow_param_end(&self, cx: &mut TransformContext<'_>) -> Result<bool> {
        if !(cx.tokens.matches2(TokenType::PAREN_R, TokenType::COLON) && cx.tokens.token_at_relative_index(1).is_type) {
            return Ok(false);
        }
        let mut next_non_type = cx.tokens.current_index() + 1;
        while next_non_type < cx.tokens.tokens().len() && cx.tokens.token_at(next_non_type).is_type {
            next_non_type += 1;
        }
        if !cx.tokens.matches1_at_index(next_non_type, TokenType::ARROW) {
            return Ok(false);
        }
        cx.tokens.remove_initial_token();
        while cx.tokens.current_index() < next_non_type {
            cx.tokens.remove_token();
        }
        cx.tokens.replace_token_trimming_left_whitespace(") =>");
        Ok(true)
    }

    /// `async <T>(x) => ...`: drop the type parameters.
    pub fn process_possible_async_arrow_with_type_params(&self, cx: &mut TransformContext<'_>) -> Result<bool> {
        if !(cx.tokens.matches_contextual(ContextualKeyword::Async) || cx.tokens.matches1(TokenType::ASYNC)) {
            return Ok(false);
        }
        let next = cx.tokens.token_at_relative_index(1);
        if next.token_type != TokenType::LESS_THAN || !next.is_type {
            return Ok(false);
        }
        let mut next_non_type = cx.tokens.current_index() + 1;
        while next_non_type < cx.tokens.tokens().len() && cx.tokens.token_at(next_non_type).is_type {
            next_non_type += 1;
        }
        if !cx.tokens.matches1_at_index(next_non_type, TokenType::PAREN_L) {
            return Ok(false);
        }
        cx.tokens.replace_token("async (");
        cx.tokens.remove_initial_token();
        while cx.tokens.current_index() < next_non_type {
            cx.tokens.remove_token();
        }
        // The `(` is already written, so play out the params and their `)`.
        cx.tokens.remove_token();
        self.process_balanced_code(cx)?;
        self.process_token(cx)?;
        Ok(true)
    }

    /// Remove a maximal run of type tokens.
    pub fn process_possible_type_range(&self, cx: &mut TransformContext<'_>) -> Result<bool> {
        if !cx.tokens.current_token().is_type {
            return Ok(false);
        }
        cx.tokens.remove_initial_token();
        while !cx.tokens.is_at_end() && cx.tokens.current_token().is_type {
            cx.tokens.remove_token();
        }
        Ok(true)
    }
}
