//! Tests for TypeScript tokenizing: which tokens are marked as types, how
//! modifiers are retyped and where the type grammar hands back to values.

use zest_common::{Dialect, TransformError};
use zest_scanner::{IdentifierRole, ParsedFile, Token, TokenType, tokenize};

const TS: Dialect = Dialect {
    jsx: false,
    typescript: true,
    flow: false,
};

fn parse_ts(code: &str) -> ParsedFile {
    match tokenize(code, TS) {
        Ok(parsed) => parsed,
        Err(err) => panic!("failed to tokenize {code:?}: {err}"),
    }
}

/// Texts of the tokens marked as types, in order.
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

fn token_named<'a>(code: &str, tokens: &'a [Token], text: &str) -> &'a Token {
    tokens
        .iter()
        .find(|token| token.text(code) == text)
        .unwrap_or_else(|| panic!("no token {text:?}"))
}

#[test]
fn test_variable_annotation_is_type() {
    let code = "let x: number = 1;";
    let parsed = parse_ts(code);
    assert_eq!(type_texts(code, &parsed.tokens), vec![":", "number"]);
    assert_eq!(value_texts(code, &parsed.tokens), vec!["let", "x", "=", "1", ";"]);
}

#[test]
fn test_interface_is_entirely_type() {
    let code = "interface A { x: string }\nlet b;";
    let parsed = parse_ts(code);
    assert_eq!(
        type_texts(code, &parsed.tokens),
        vec!["interface", "A", "{", "x", ":", "string", "}"]
    );
    assert_eq!(value_texts(code, &parsed.tokens), vec!["let", "b", ";"]);
}

#[test]
fn test_type_alias_is_entirely_type() {
    let code = "type Pair<T> = [T, T];\nf();";
    let parsed = parse_ts(code);
    assert_eq!(value_texts(code, &parsed.tokens), vec!["f", "(", ")", ";"]);
}

#[test]
fn test_as_chain_is_type() {
    let code = "const y = x as unknown as string;";
    let parsed = parse_ts(code);
    assert_eq!(
        type_texts(code, &parsed.tokens),
        vec!["as", "unknown", "as", "string"]
    );
    assert_eq!(token_named(code, &parsed.tokens, "as").token_type, TokenType::AS);
}

#[test]
fn test_satisfies_is_type() {
    let code = "const c = {} satisfies Config;";
    let parsed = parse_ts(code);
    assert_eq!(type_texts(code, &parsed.tokens), vec!["satisfies", "Config"]);
}

#[test]
fn test_generic_call_arguments_are_type() {
    let code = "f<T>(x);";
    let parsed = parse_ts(code);
    assert_eq!(type_texts(code, &parsed.tokens), vec!["<", "T", ">"]);
    assert_eq!(value_texts(code, &parsed.tokens), vec!["f", "(", "x", ")", ";"]);
}

#[test]
fn test_comparison_chain_is_not_type_arguments() {
    let code = "const r = a < b > c;";
    let parsed = parse_ts(code);
    assert!(parsed.tokens.iter().all(|token| !token.is_type));
}

#[test]
fn test_comparisons_in_call_arguments() {
    let code = "f(a < b, c >= d);";
    let parsed = parse_ts(code);
    assert!(parsed.tokens.iter().all(|token| !token.is_type));
    assert_eq!(
        token_named(code, &parsed.tokens, ">=").token_type,
        TokenType::RELATIONAL_OR_EQUAL
    );
}

#[test]
fn test_nested_generic_closes_split() {
    let code = "let m: Map<string, Array<number>> = new Map();";
    let parsed = parse_ts(code);
    let closers = parsed
        .tokens
        .iter()
        .filter(|token| token.token_type == TokenType::GREATER_THAN)
        .count();
    assert_eq!(closers, 2);
    assert_eq!(
        value_texts(code, &parsed.tokens),
        vec!["let", "m", "=", "new", "Map", "(", ")", ";"]
    );
}

#[test]
fn test_enum_keeps_values() {
    let code = "enum Color { Red, Green = 5 }";
    let parsed = parse_ts(code);
    let tokens = &parsed.tokens;
    assert_eq!(tokens[0].token_type, TokenType::ENUM);
    assert!(tokens.iter().all(|token| !token.is_type));
    assert_eq!(tokens[1].identifier_role, Some(IdentifierRole::TopLevelDeclaration));
    assert_eq!(tokens[6].token_type, TokenType::EQ);
    assert_eq!(tokens[6].rhs_end_index, Some(8));
}

#[test]
fn test_const_enum_retypes_enum_keyword() {
    let code = "const enum E { A }";
    let parsed = parse_ts(code);
    assert_eq!(parsed.tokens[0].token_type, TokenType::CONST);
    assert_eq!(parsed.tokens[1].token_type, TokenType::ENUM);
}

#[test]
fn test_declare_statement_is_type() {
    let code = "declare const x: number;\nlet y;";
    let parsed = parse_ts(code);
    assert_eq!(parsed.tokens[0].token_type, TokenType::DECLARE);
    assert_eq!(
        type_texts(code, &parsed.tokens),
        vec!["declare", "const", "x", ":", "number", ";"]
    );
    assert_eq!(value_texts(code, &parsed.tokens), vec!["let", "y", ";"]);
}

#[test]
fn test_declare_const_enum_is_type() {
    let code = "declare const enum E { A }\nlet y;";
    let parsed = parse_ts(code);
    assert_eq!(parsed.tokens[1].token_type, TokenType::CONST);
    assert_eq!(parsed.tokens[2].token_type, TokenType::ENUM);
    assert_eq!(value_texts(code, &parsed.tokens), vec!["let", "y", ";"]);
}

#[test]
fn test_function_overload_signature_is_type() {
    let code = "function f(a: string): void;\nfunction f(a) {}";
    let parsed = parse_ts(code);
    assert_eq!(
        value_texts(code, &parsed.tokens),
        vec!["function", "f", "(", "a", ")", "{", "}"]
    );
}

#[test]
fn test_exported_overload_includes_export() {
    let code = "export function g(): void;\nexport function g() {}";
    let parsed = parse_ts(code);
    assert!(parsed.tokens[0].is_type);
    assert_eq!(
        value_texts(code, &parsed.tokens),
        vec!["export", "function", "g", "(", ")", "{", "}"]
    );
}

#[test]
fn test_abstract_method_is_type() {
    let code = "abstract class A {\n  abstract m(): void;\n  n() {}\n}";
    let parsed = parse_ts(code);
    let tokens = &parsed.tokens;
    assert_eq!(tokens[0].token_type, TokenType::ABSTRACT);
    assert_eq!(
        type_texts(code, tokens),
        vec!["abstract", "m", "(", ")", ":", "void", ";"]
    );
    assert!(!tokens[0].is_type);
    assert!(!token_named(code, tokens, "n").is_type);
}

#[test]
fn test_type_only_import_is_type() {
    let code = "import type { A } from \"./a\";";
    let parsed = parse_ts(code);
    assert!(parsed.tokens.iter().all(|token| token.is_type));
}

#[test]
fn test_inline_type_specifier_is_type() {
    let code = "import { type A, B } from \"./a\";";
    let parsed = parse_ts(code);
    let tokens = &parsed.tokens;
    assert_eq!(type_texts(code, tokens), vec!["type", "A"]);
    assert_eq!(
        token_named(code, tokens, "B").identifier_role,
        Some(IdentifierRole::ImportDeclaration)
    );
}

#[test]
fn test_parameter_property_modifiers() {
    let code = "class P { constructor(private readonly x: number) {} }";
    let parsed = parse_ts(code);
    let tokens = &parsed.tokens;
    assert_eq!(token_named(code, tokens, "private").token_type, TokenType::PRIVATE);
    assert_eq!(token_named(code, tokens, "readonly").token_type, TokenType::READONLY);
    assert!(!token_named(code, tokens, "private").is_type);
}

#[test]
fn test_arrow_with_annotations() {
    let code = "const f = (a: number): string => \"\";";
    let parsed = parse_ts(code);
    let tokens = &parsed.tokens;
    assert_eq!(type_texts(code, tokens), vec![":", "number", ":", "string"]);
    assert_eq!(
        token_named(code, tokens, "a").identifier_role,
        Some(IdentifierRole::FunctionScopedDeclaration)
    );
}

#[test]
fn test_generic_arrow_type_parameters() {
    let code = "const id = <T,>(x: T) => x;";
    let parsed = parse_ts(code);
    assert_eq!(
        type_texts(code, &parsed.tokens),
        vec!["<", "T", ",", ">", ":", "T"]
    );
}

#[test]
fn test_non_null_assertion() {
    let code = "a!.b;";
    let parsed = parse_ts(code);
    assert_eq!(parsed.tokens[1].token_type, TokenType::NON_NULL_ASSERTION);
}

#[test]
fn test_class_implements_is_type() {
    let code = "class C implements I, J {}";
    let parsed = parse_ts(code);
    let tokens = &parsed.tokens;
    assert_eq!(type_texts(code, tokens), vec!["implements", "I", ",", "J"]);
    assert_eq!(token_named(code, tokens, "implements").token_type, TokenType::IMPLEMENTS);
}

#[test]
fn test_declared_and_definite_class_fields() {
    let code = "class D { declare x: number; y!: string; }";
    let parsed = parse_ts(code);
    let tokens = &parsed.tokens;
    assert_eq!(token_named(code, tokens, "declare").token_type, TokenType::DECLARE);
    assert!(token_named(code, tokens, "!").is_type);
}

#[test]
fn test_type_predicate_return() {
    let code = "function isS(x: unknown): x is string { return true; }";
    let parsed = parse_ts(code);
    assert!(token_named(code, &parsed.tokens, "is").is_type);
    assert!(!token_named(code, &parsed.tokens, "return").is_type);
}

#[test]
fn test_type_only_namespace_is_type() {
    let code = "namespace N { export interface I {} }\nlet z;";
    let parsed = parse_ts(code);
    assert_eq!(value_texts(code, &parsed.tokens), vec!["let", "z", ";"]);
}

#[test]
fn test_namespace_with_values_is_rejected() {
    let err = tokenize("namespace N { export const x = 1; }", TS).err();
    assert!(matches!(err, Some(TransformError::UnsupportedCombination { .. })));
}

#[test]
fn test_import_equals_declaration() {
    let code = "import fs = require(\"fs\");";
    let parsed = parse_ts(code);
    let tokens = &parsed.tokens;
    assert!(tokens.iter().all(|token| !token.is_type));
    assert_eq!(
        token_named(code, tokens, "fs").identifier_role,
        Some(IdentifierRole::ImportDeclaration)
    );
}
