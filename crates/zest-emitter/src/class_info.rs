//! Class body scan for field desugaring.
//!
//! Runs over the token indices of one class without emitting anything. The
//! result tells the driver which member ranges to drop, which initializers
//! to wrap into `__init`/`__initStatic` methods, and where in the
//! constructor the initializer calls go.

use crate::name_manager::NameManager;
use crate::token_processor::TokenProcessor;
use std::ops::Range;
use zest_common::Result;
use zest_scanner::{ContextualKeyword, Token, TokenType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassHeaderInfo {
    pub is_expression: bool,
    pub class_name: Option<String>,
    pub has_superclass: bool,
}

/// An initialized field, moved into its own initializer method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassField {
    pub initializer_name: String,
    pub equals_index: usize,
    /// Field name start; modifiers before it stay in place.
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    pub header: ClassHeaderInfo,
    pub body_open_index: usize,
    pub body_close_index: usize,
    /// `this.x = x` for each parameter property.
    pub constructor_initializer_statements: Vec<String>,
    /// Token after which initializer calls go: the constructor body's `{`,
    /// or the `)` closing its `super(...)` call.
    pub constructor_insert_pos: Option<usize>,
    pub fields: Vec<ClassField>,
    pub instance_initializer_names: Vec<String>,
    pub static_initializer_names: Vec<String>,
    pub ranges_to_remove: Vec<Range<usize>>,
}

fn is_member_modifier(token: &Token) -> bool {
    matches!(
        token.token_type,
        TokenType::ASYNC
            | TokenType::GET
            | TokenType::SET
            | TokenType::PLUS
            | TokenType::MINUS
            | TokenType::READONLY
            | TokenType::STATIC
            | TokenType::PUBLIC
            | TokenType::PRIVATE
            | TokenType::PROTECTED
            | TokenType::OVERRIDE
            | TokenType::ABSTRACT
            | TokenType::STAR
            | TokenType::DECLARE
            | TokenType::HASH
            | TokenType::ACCESSOR
    )
}

fn is_parameter_modifier(token: &Token) -> bool {
    matches!(
        token.token_type,
        TokenType::PUBLIC
            | TokenType::PRIVATE
            | TokenType::PROTECTED
            | TokenType::READONLY
            | TokenType::OVERRIDE
    )
}

/// Scan the class whose `class` keyword is at `class_index`.
///
/// With `disable_es_transforms` only parameter properties and
/// `declare`/`abstract` fields are reported.
pub fn get_class_info(
    tokens: &TokenProcessor<'_>,
    names: &mut NameManager,
    class_index: usize,
    disable_es_transforms: bool,
) -> Result<ClassInfo> {
    let (header, body_open_index) = process_class_header(tokens, class_index)?;
    let body_close_index = closer(tokens, body_open_index, "class body")?;

    let mut constructor_initializer_statements = Vec::new();
    let mut constructor_insert_pos = None;
    let mut fields = Vec::new();
    let mut instance_initializer_names = Vec::new();
    let mut static_initializer_names = Vec::new();
    let mut ranges_to_remove = Vec::new();

    let mut index = body_open_index + 1;
    while index < body_close_index {
        if is_constructor_at(tokens, index) {
            let constructor = process_constructor(tokens, index)?;
            constructor_initializer_statements = constructor.initializer_statements;
            constructor_insert_pos = Some(constructor.insert_pos);
            index = constructor.end;
            continue;
        }
        if tokens.matches1_at_index(index, TokenType::SEMI) {
            if !disable_es_transforms {
                ranges_to_remove.push(index..index + 1);
            }
            index += 1;
            continue;
        }
        if tokens.token_at(index).is_type {
            index += 1;
            continue;
        }
        if tokens.matches1_at_index(index, TokenType::AT) {
            index = skip_decorator(tokens, index)?;
            continue;
        }

        let statement_start = index;
        let mut is_static = false;
        let mut is_es_private = false;
        let mut is_auto_accessor = false;
        let mut is_declare_or_abstract = false;
        while is_member_modifier(tokens.token_at(index)) {
            match tokens.token_at(index).token_type {
                TokenType::STATIC => is_static = true,
                TokenType::HASH => is_es_private = true,
                TokenType::ACCESSOR => is_auto_accessor = true,
                TokenType::DECLARE | TokenType::ABSTRACT => is_declare_or_abstract = true,
                _ => {}
            }
            index += 1;
        }

        if is_static && tokens.matches1_at_index(index, TokenType::BRACE_L) {
            // static block
            index = closer(tokens, index, "static block")? + 1;
            continue;
        }
        if is_es_private || is_auto_accessor {
            index = skip_member(tokens, index)?;
            continue;
        }
        if is_constructor_at(tokens, index) {
            let constructor = process_constructor(tokens, index)?;
            constructor_initializer_statements = constructor.initializer_statements;
            constructor_insert_pos = Some(constructor.insert_pos);
            index = constructor.end;
            continue;
        }

        let name_start = index;
        index = skip_field_name(tokens, index)?;
        if tokens.matches1_at_index(index, TokenType::LESS_THAN)
            || tokens.matches1_at_index(index, TokenType::PAREN_L)
        {
            index = skip_method_rest(tokens, index)?;
            continue;
        }
        while index < body_close_index && tokens.token_at(index).is_type {
            index += 1;
        }
        if tokens.matches1_at_index(index, TokenType::EQ) {
            let equals_index = index;
            let Some(value_end) = tokens.token_at(index).rhs_end_index else {
                return Err(error_at(tokens, index, "Expected rhsEndIndex on class field assignment"));
            };
            index = value_end;
            if disable_es_transforms {
                continue;
            }
            let initializer_name = if is_static {
                let name = names.claim_free_name("__initStatic");
                static_initializer_names.push(name.clone());
                name
            } else {
                let name = names.claim_free_name("__init");
                instance_initializer_names.push(name.clone());
                name
            };
            fields.push(ClassField {
                initializer_name,
                equals_index,
                start: name_start,
                end: index,
            });
        } else if !disable_es_transforms || is_declare_or_abstract {
            ranges_to_remove.push(statement_start..index);
        }
    }

    tracing::trace!(
        class_index,
        fields = fields.len(),
        removed = ranges_to_remove.len(),
        has_constructor = constructor_insert_pos.is_some(),
        "scanned class body"
    );

    Ok(ClassInfo {
        header,
        body_open_index,
        body_close_index,
        constructor_initializer_statements,
        constructor_insert_pos,
        fields,
        instance_initializer_names,
        static_initializer_names,
        ranges_to_remove,
    })
}

fn process_class_header(
    tokens: &TokenProcessor<'_>,
    class_index: usize,
) -> Result<(ClassHeaderInfo, usize)> {
    let class_token = tokens.token_at(class_index);
    let Some(context_id) = class_token.context_id else {
        return Err(error_at(tokens, class_index, "Expected context ID on class token"));
    };
    let mut index = class_index + 1;
    let class_name = if tokens.matches1_at_index(index, TokenType::NAME) && !tokens.token_at(index).is_type {
        Some(tokens.identifier_name_at_index(index).to_string())
    } else {
        None
    };
    let mut has_superclass = false;
    let len = tokens.tokens().len();
    loop {
        if index >= len {
            return Err(error_at(tokens, class_index, "Expected class body"));
        }
        let token = tokens.token_at(index);
        if token.token_type == TokenType::BRACE_L && token.context_id == Some(context_id) {
            break;
        }
        // Type parameters and `implements` clauses are all type tokens, so
        // `class A<B extends C> {` has no superclass.
        if token.token_type == TokenType::EXTENDS && !token.is_type {
            has_superclass = true;
        }
        index += 1;
    }
    Ok((
        ClassHeaderInfo {
            is_expression: class_token.is_expression,
            class_name,
            has_superclass,
        },
        index,
    ))
}

struct ConstructorInfo {
    initializer_statements: Vec<String>,
    insert_pos: usize,
    end: usize,
}

fn is_constructor_at(tokens: &TokenProcessor<'_>, index: usize) -> bool {
    let token = tokens.token_at(index);
    let is_name = (token.token_type == TokenType::NAME
        && token.contextual_keyword == ContextualKeyword::Constructor)
        || (token.token_type == TokenType::STRING
            && tokens.string_value_at_index(index) == "constructor");
    is_name && !token.is_type && tokens.matches1_at_index(index + 1, TokenType::PAREN_L)
}

fn process_constructor(tokens: &TokenProcessor<'_>, name_index: usize) -> Result<ConstructorInfo> {
    let params_open = name_index + 1;
    let params_close = closer(tokens, params_open, "constructor params")?;

    let mut initializer_statements = Vec::new();
    let mut depth = 0usize;
    for index in params_open..params_close {
        let token = tokens.token_at(index);
        let at_param_start = index == params_open || (depth == 1 && token.token_type == TokenType::COMMA);
        if token.token_type.is_opener() {
            depth += 1;
        } else if token.token_type.is_closer() {
            depth = depth.saturating_sub(1);
        }
        if !at_param_start || !is_parameter_modifier(tokens.token_at(index + 1)) {
            continue;
        }
        let mut name_index = index + 1;
        while is_parameter_modifier(tokens.token_at(name_index)) {
            name_index += 1;
        }
        if !tokens.matches1_at_index(name_index, TokenType::NAME) {
            return Err(error_at(
                tokens,
                name_index,
                "Expected identifier after access modifiers in constructor arg",
            ));
        }
        let name = tokens.identifier_name_at_index(name_index);
        initializer_statements.push(format!("this.{name} = {name}"));
    }

    let mut index = params_close + 1;
    while tokens.token_at(index).is_type && index < tokens.tokens().len() {
        index += 1;
    }
    if !tokens.matches1_at_index(index, TokenType::BRACE_L) {
        return Err(error_at(tokens, index, "Expected constructor body"));
    }
    let body_open = index;
    let body_close = closer(tokens, body_open, "constructor body")?;
    let mut insert_pos = body_open;
    for index in body_open + 1..body_close {
        if tokens.matches2_at_index(index, TokenType::SUPER, TokenType::PAREN_L) {
            insert_pos = closer(tokens, index + 1, "super call")?;
            break;
        }
    }
    Ok(ConstructorInfo {
        initializer_statements,
        insert_pos,
        end: body_close + 1,
    })
}

fn skip_field_name(tokens: &TokenProcessor<'_>, index: usize) -> Result<usize> {
    if tokens.matches1_at_index(index, TokenType::BRACKET_L) {
        Ok(closer(tokens, index, "computed member name")? + 1)
    } else {
        Ok(index + 1)
    }
}

/// From just after a method name to just after its body.
fn skip_method_rest(tokens: &TokenProcessor<'_>, mut index: usize) -> Result<usize> {
    while tokens.token_at(index).is_type && index < tokens.tokens().len() {
        index += 1;
    }
    if tokens.matches1_at_index(index, TokenType::PAREN_L) {
        index = closer(tokens, index, "method params")? + 1;
    }
    while tokens.token_at(index).is_type && index < tokens.tokens().len() {
        index += 1;
    }
    if tokens.matches1_at_index(index, TokenType::BRACE_L) {
        index = closer(tokens, index, "method body")? + 1;
    }
    Ok(index)
}

/// Skip a member that is copied through untouched, starting at its name.
fn skip_member(tokens: &TokenProcessor<'_>, index: usize) -> Result<usize> {
    let mut index = skip_field_name(tokens, index)?;
    if tokens.matches1_at_index(index, TokenType::LESS_THAN)
        || tokens.matches1_at_index(index, TokenType::PAREN_L)
    {
        return skip_method_rest(tokens, index);
    }
    while tokens.token_at(index).is_type && index < tokens.tokens().len() {
        index += 1;
    }
    if tokens.matches1_at_index(index, TokenType::EQ)
        && let Some(value_end) = tokens.token_at(index).rhs_end_index
    {
        index = value_end;
    }
    if tokens.matches1_at_index(index, TokenType::SEMI) {
        index += 1;
    }
    Ok(index)
}

/// Index just past the decorator starting at the `@` at `index`.
pub(crate) fn skip_decorator(tokens: &TokenProcessor<'_>, index: usize) -> Result<usize> {
    let mut index = index + 1;
    if tokens.matches1_at_index(index, TokenType::PAREN_L) {
        return Ok(closer(tokens, index, "decorator")? + 1);
    }
    index += 1;
    while tokens.matches2_at_index(index, TokenType::DOT, TokenType::NAME) {
        index += 2;
    }
    if tokens.matches1_at_index(index, TokenType::PAREN_L) {
        index = closer(tokens, index, "decorator arguments")? + 1;
    }
    Ok(index)
}

fn closer(tokens: &TokenProcessor<'_>, open_index: usize, what: &str) -> Result<usize> {
    tokens
        .matching_closer_index(open_index)
        .ok_or_else(|| error_at(tokens, open_index, format!("Unterminated {what}")))
}

fn error_at(tokens: &TokenProcessor<'_>, index: usize, message: impl Into<String>) -> zest_common::TransformError {
    zest_common::TransformError::unexpected_token(tokens.code(), tokens.token_at(index).start, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zest_common::Dialect;

    fn class_info(code: &str, disable_es_transforms: bool) -> ClassInfo {
        let dialect = Dialect {
            typescript: true,
            ..Dialect::default()
        };
        let parsed = zest_scanner::tokenize(code, dialect).expect("tokenize");
        let tokens = TokenProcessor::new(code, parsed.tokens, false);
        let mut names = NameManager::new(code, tokens.tokens());
        let class_index = tokens
            .tokens()
            .iter()
            .position(|token| token.token_type == TokenType::CLASS)
            .expect("class token");
        get_class_info(&tokens, &mut names, class_index, disable_es_transforms).expect("class info")
    }

    #[test]
    fn test_header_name_and_superclass() {
        let info = class_info("class A extends B { }", false);
        assert_eq!(info.header.class_name.as_deref(), Some("A"));
        assert!(info.header.has_superclass);
        assert!(!info.header.is_expression);
    }

    #[test]
    fn test_type_parameter_extends_is_not_a_superclass() {
        let info = class_info("class A<T extends B> implements I { }", false);
        assert!(!info.header.has_superclass);
    }

    #[test]
    fn test_fields_get_initializer_names() {
        let info = class_info("class A { x = 1; static y = 2; z: number; }", false);
        assert_eq!(info.instance_initializer_names, vec!["__init"]);
        assert_eq!(info.static_initializer_names, vec!["__initStatic"]);
        assert_eq!(info.fields.len(), 2);
        // `x = 1`'s `;`, `z: number` and its `;`, `y`'s `;`
        assert_eq!(info.ranges_to_remove.len(), 4);
    }

    #[test]
    fn test_insert_after_super_call() {
        let code = "class A extends B { x = 1; constructor(a) { foo(); super(a); bar(); } }";
        let info = class_info(code, false);
        let pos = info.constructor_insert_pos.expect("insert pos");
        assert_eq!(info.fields.len(), 1);
        let tokens = zest_scanner::tokenize(code, Dialect { typescript: true, ..Dialect::default() })
            .expect("tokenize")
            .tokens;
        assert_eq!(tokens[pos].token_type, TokenType::PAREN_R);
        assert_eq!(tokens[pos - 1].text(code), "a");
    }

    #[test]
    fn test_parameter_properties() {
        let info = class_info(
            "class A { constructor(public a: number, private readonly b, c) {} }",
            false,
        );
        assert_eq!(
            info.constructor_initializer_statements,
            vec!["this.a = a".to_string(), "this.b = b".to_string()]
        );
    }

    #[test]
    fn test_methods_private_and_static_blocks_are_skipped() {
        let info = class_info(
            "class A { #p = 1; static { init(); } get v() { return 1; } m<T>(x: T) { return x; } }",
            false,
        );
        assert!(info.fields.is_empty());
        assert!(info.ranges_to_remove.is_empty());
    }

    #[test]
    fn test_decorated_members_keep_their_decorators() {
        let info = class_info("class A { @dec() m() {} @a.b x = 1; }", false);
        assert_eq!(info.fields.len(), 1);
        assert!(info.ranges_to_remove.iter().all(|range| range.len() == 1));
    }

    #[test]
    fn test_disable_es_transforms_keeps_plain_fields() {
        let info = class_info("class A { x = 1; y; declare z: string; }", true);
        assert!(info.fields.is_empty());
        assert!(info.instance_initializer_names.is_empty());
        // only the `declare` field goes
        assert_eq!(info.ranges_to_remove.len(), 1);
    }
}
