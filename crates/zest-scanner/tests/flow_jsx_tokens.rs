//! Tests for Flow type marking and JSX tokenizing.

use zest_common::Dialect;
use zest_scanner::{IdentifierRole, JsxRole, ParsedFile, Token, TokenType, tokenize};

const FLOW: Dialect = Dialect {
    jsx: false,
    typescript: false,
    flow: true,
};

const JSX: Dialect = Dialect {
    jsx: true,
    typescript: false,
    flow: false,
};

const TSX: Dialect = Dialect {
    jsx: true,
    typescript: true,
    flow: false,
};

fn parse(code: &str, dialect: Dialect) -> ParsedFile {
    match tokenize(code, dialect) {
        Ok(parsed) => parsed,
        Err(err) => panic!("failed to tokenize {code:?}: {err}"),
    }
}

fn type_texts<'a>(code: &'a str, tokens: &[Token]) -> Vec<&'a str> {
    tokens
        .iter()
        .filter(|token| token.is_type)
        .map(|token| token.text(code))
        .collect()
}

fn value_texts<'a>(code: &'a str, tokens: &[Token]) -> Vec<&'a str> {
    tokens
        .iter()
        .filter(|token| !token.is_type)
        .map(|token| token.text(code))
        .collect()
}

// ===== Flow =====

#[test]
fn test_flow_function_annotations() {
    let code = "function f(x: number): string { return \"\"; }";
    let parsed = parse(code, FLOW);
    assert_eq!(
        type_texts(code, &parsed.tokens),
        vec![":", "number", ":", "string"]
    );
}

#[test]
fn test_flow_exact_object_alias() {
    let code = "type A = {| a: number |};\nlet b;";
    let parsed = parse(code, FLOW);
    let tokens = &parsed.tokens;
    assert!(tokens.iter().any(|token| token.token_type == TokenType::BRACE_BAR_L));
    assert!(tokens.iter().any(|token| token.token_type == TokenType::BRACE_BAR_R));
    assert_eq!(value_texts(code, tokens), vec!["let", "b", ";"]);
}

#[test]
fn test_flow_maybe_type() {
    let code = "let x: ?string = null;";
    let parsed = parse(code, FLOW);
    assert_eq!(type_texts(code, &parsed.tokens), vec![":", "?", "string"]);
}

#[test]
fn test_flow_type_cast_keeps_parens() {
    let code = "const y = (x: any);";
    let parsed = parse(code, FLOW);
    assert_eq!(type_texts(code, &parsed.tokens), vec![":", "any"]);
    assert_eq!(
        value_texts(code, &parsed.tokens),
        vec!["const", "y", "=", "(", "x", ")", ";"]
    );
}

#[test]
fn test_flow_declare_function_is_type() {
    let code = "declare function foo(x: number): string;\nfoo(1);";
    let parsed = parse(code, FLOW);
    assert_eq!(
        value_texts(code, &parsed.tokens),
        vec!["foo", "(", "1", ")", ";"]
    );
}

#[test]
fn test_flow_import_type_and_typeof() {
    let code = "import type { T } from \"./t\";\nimport typeof U from \"./u\";";
    let parsed = parse(code, FLOW);
    assert!(parsed.tokens.iter().all(|token| token.is_type));
}

#[test]
fn test_flow_class_generics() {
    let code = "class Box<T> extends Base<T> implements I {}";
    let parsed = parse(code, FLOW);
    assert_eq!(
        value_texts(code, &parsed.tokens),
        vec!["class", "Box", "extends", "Base", "{", "}"]
    );
}

#[test]
fn test_flow_opaque_type_is_type() {
    let code = "opaque type ID = string;\nlet id;";
    let parsed = parse(code, FLOW);
    assert_eq!(value_texts(code, &parsed.tokens), vec!["let", "id", ";"]);
}

// ===== JSX =====

#[test]
fn test_jsx_element_tokens() {
    let code = "const el = <div className=\"a\">{x}</div>;";
    let parsed = parse(code, JSX);
    let tokens = &parsed.tokens;
    assert_eq!(
        tokens.iter().map(|token| token.token_type).collect::<Vec<_>>(),
        vec![
            TokenType::CONST,
            TokenType::NAME,
            TokenType::EQ,
            TokenType::JSX_TAG_START,
            TokenType::JSX_NAME,
            TokenType::JSX_NAME,
            TokenType::EQ,
            TokenType::STRING,
            TokenType::JSX_TAG_END,
            TokenType::BRACE_L,
            TokenType::NAME,
            TokenType::BRACE_R,
            TokenType::JSX_TAG_START,
            TokenType::SLASH,
            TokenType::JSX_NAME,
            TokenType::JSX_TAG_END,
            TokenType::SEMI
        ]
    );
    assert_eq!(tokens[3].jsx_role, Some(JsxRole::OneChild));
    assert_eq!(tokens[4].identifier_role, None);
    assert_eq!(tokens[5].identifier_role, Some(IdentifierRole::ObjectKey));
    assert_eq!(tokens[10].identifier_role, Some(IdentifierRole::Access));
    assert_eq!(tokens[9].context_id, tokens[11].context_id);
}

#[test]
fn test_jsx_component_name_is_access() {
    let code = "<A />;";
    let parsed = parse(code, JSX);
    assert_eq!(parsed.tokens[1].identifier_role, Some(IdentifierRole::Access));
    assert_eq!(parsed.tokens[0].jsx_role, Some(JsxRole::NoChildren));
}

#[test]
fn test_jsx_member_name_is_access() {
    let code = "<a.b />;";
    let parsed = parse(code, JSX);
    assert_eq!(parsed.tokens[1].identifier_role, Some(IdentifierRole::Access));
}

#[test]
fn test_jsx_key_after_spread() {
    let code = "<A {...p} key=\"k\" />;";
    let parsed = parse(code, JSX);
    assert_eq!(parsed.tokens[0].jsx_role, Some(JsxRole::KeyAfterPropSpread));
}

#[test]
fn test_jsx_fragment_with_static_children() {
    let code = "<>hello {a} world</>;";
    let parsed = parse(code, JSX);
    let tokens = &parsed.tokens;
    assert_eq!(tokens[0].jsx_role, Some(JsxRole::StaticChildren));
    assert_eq!(tokens[2].token_type, TokenType::JSX_TEXT);
    assert_eq!(tokens[2].text(code), "hello ");
}

#[test]
fn test_jsx_empty_container_is_not_a_child() {
    let code = "<div>{/* c */}</div>;";
    let parsed = parse(code, JSX);
    assert_eq!(parsed.tokens[0].jsx_role, Some(JsxRole::NoChildren));
}

#[test]
fn test_jsx_whitespace_with_newline_is_empty_text() {
    let code = "<div>\n  <span />\n</div>;";
    let parsed = parse(code, JSX);
    let tokens = &parsed.tokens;
    assert_eq!(tokens[3].token_type, TokenType::JSX_EMPTY_TEXT);
    assert_eq!(tokens[0].jsx_role, Some(JsxRole::OneChild));
}

#[test]
fn test_tsx_generic_arrow_is_not_jsx() {
    let code = "const f = <T,>(x: T) => x;";
    let parsed = parse(code, TSX);
    let tokens = &parsed.tokens;
    assert!(tokens.iter().all(|token| token.token_type != TokenType::JSX_TAG_START));
    assert_eq!(tokens[3].token_type, TokenType::LESS_THAN);
    assert!(tokens[3].is_type);
}
