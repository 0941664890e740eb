//! Tests for tokenizing plain JavaScript: token kinds, bracket pairing,
//! identifier roles, scopes and the annotations used by the ES rewrites.

use zest_common::{Dialect, TransformError};
use zest_scanner::{IdentifierRole, LogicalAssignRole, ParsedFile, Token, TokenType, tokenize};

fn parse_js(code: &str) -> ParsedFile {
    match tokenize(code, Dialect::default()) {
        Ok(parsed) => parsed,
        Err(err) => panic!("failed to tokenize {code:?}: {err}"),
    }
}

fn kinds(tokens: &[Token]) -> Vec<TokenType> {
    tokens.iter().map(|token| token.token_type).collect()
}

fn texts<'a>(code: &'a str, tokens: &[Token]) -> Vec<&'a str> {
    tokens.iter().map(|token| token.text(code)).collect()
}

#[test]
fn test_simple_declaration_kinds() {
    let code = "let a = 1;";
    let parsed = parse_js(code);
    assert_eq!(
        kinds(&parsed.tokens),
        vec![
            TokenType::LET,
            TokenType::NAME,
            TokenType::EQ,
            TokenType::NUM,
            TokenType::SEMI
        ]
    );
    assert_eq!(texts(code, &parsed.tokens), vec!["let", "a", "=", "1", ";"]);
}

#[test]
fn test_top_level_binding_role_and_rhs_extent() {
    let parsed = parse_js("let a = 1;");
    assert_eq!(
        parsed.tokens[1].identifier_role,
        Some(IdentifierRole::TopLevelDeclaration)
    );
    assert_eq!(parsed.tokens[2].rhs_end_index, Some(4));
}

#[test]
fn test_export_default_expression_extent() {
    let code = "export default a + b;\nx;";
    let parsed = parse_js(code);
    assert_eq!(parsed.tokens[0].token_type, TokenType::EXPORT);
    assert_eq!(parsed.tokens[5].text(code), ";");
    assert_eq!(parsed.tokens[0].rhs_end_index, Some(6));
}

#[test]
fn test_brackets_share_context_ids() {
    let code = "f(a[0], {b: 1});";
    let parsed = parse_js(code);
    let tokens = &parsed.tokens;
    let find = |text: &str| {
        tokens
            .iter()
            .find(|token| token.text(code) == text)
            .unwrap_or_else(|| panic!("no token {text:?}"))
    };
    let paren = find("(").context_id;
    let bracket = find("[").context_id;
    let brace = find("{").context_id;
    assert!(paren.is_some());
    assert_eq!(paren, find(")").context_id);
    assert_eq!(bracket, find("]").context_id);
    assert_eq!(brace, find("}").context_id);
    assert_ne!(paren, bracket);
    assert_ne!(bracket, brace);
    assert_eq!(find("f").context_id, None);
}

#[test]
fn test_slash_is_division_after_operand() {
    let parsed = parse_js("x = a / b / c;");
    let slashes = parsed
        .tokens
        .iter()
        .filter(|token| token.token_type == TokenType::SLASH)
        .count();
    assert_eq!(slashes, 2);
}

#[test]
fn test_slash_is_regexp_in_operand_position() {
    let code = "x = /ab+c/g.test(s);";
    let parsed = parse_js(code);
    let regexp = &parsed.tokens[2];
    assert_eq!(regexp.token_type, TokenType::REGEXP);
    assert_eq!(regexp.text(code), "/ab+c/g");
}

#[test]
fn test_template_chunks_between_delimiters() {
    let code = "`a${b}c`;";
    let parsed = parse_js(code);
    assert_eq!(
        kinds(&parsed.tokens),
        vec![
            TokenType::BACK_QUOTE,
            TokenType::TEMPLATE,
            TokenType::DOLLAR_BRACE_L,
            TokenType::NAME,
            TokenType::BRACE_R,
            TokenType::TEMPLATE,
            TokenType::BACK_QUOTE,
            TokenType::SEMI
        ]
    );
    assert_eq!(parsed.tokens[1].text(code), "a");
    assert_eq!(parsed.tokens[5].text(code), "c");
}

#[test]
fn test_empty_template_has_empty_chunk() {
    let code = "``;";
    let parsed = parse_js(code);
    assert_eq!(
        kinds(&parsed.tokens),
        vec![
            TokenType::BACK_QUOTE,
            TokenType::TEMPLATE,
            TokenType::BACK_QUOTE,
            TokenType::SEMI
        ]
    );
    assert_eq!(parsed.tokens[1].text(code), "");
}

#[test]
fn test_shebang_is_skipped() {
    let parsed = parse_js("#!/usr/bin/env node\nlet a;");
    assert_eq!(parsed.tokens[0].token_type, TokenType::LET);
}

#[test]
fn test_keyword_after_dot_is_name() {
    let code = "a.default.class;";
    let parsed = parse_js(code);
    assert_eq!(parsed.tokens[2].token_type, TokenType::NAME);
    assert_eq!(parsed.tokens[4].token_type, TokenType::NAME);
}

#[test]
fn test_optional_chain_annotations() {
    let code = "a?.b.c;";
    let parsed = parse_js(code);
    let tokens = &parsed.tokens;
    assert_eq!(tokens[1].token_type, TokenType::QUESTION_DOT);
    assert!(tokens[0].is_optional_chain_start);
    assert_eq!(tokens[1].subscript_start_index, Some(0));
    assert_eq!(tokens[3].subscript_start_index, Some(0));
    assert!(tokens[4].is_optional_chain_end);
    assert!(!tokens[2].is_optional_chain_end);
}

#[test]
fn test_question_dot_before_digit_is_conditional() {
    let parsed = parse_js("x = a?.5:1;");
    assert!(
        parsed
            .tokens
            .iter()
            .all(|token| token.token_type != TokenType::QUESTION_DOT)
    );
    assert!(
        parsed
            .tokens
            .iter()
            .any(|token| token.token_type == TokenType::QUESTION)
    );
}

#[test]
fn test_nullish_coalescing_annotations() {
    let parsed = parse_js("a ?? b;");
    let tokens = &parsed.tokens;
    assert_eq!(tokens[1].token_type, TokenType::NULLISH_COALESCING);
    assert_eq!(tokens[1].nullish_start_index, Some(0));
    assert_eq!(tokens[0].num_nullish_coalesce_starts, 1);
    assert_eq!(tokens[2].num_nullish_coalesce_ends, 1);
}

#[test]
fn test_logical_assignment_to_identifier() {
    let code = "a ||= b;";
    let parsed = parse_js(code);
    let tokens = &parsed.tokens;
    assert_eq!(tokens[1].token_type, TokenType::ASSIGN);
    assert_eq!(tokens[1].text(code), "||=");
    assert_eq!(
        tokens[0].logical_assign,
        Some(LogicalAssignRole::Target { operator_index: 1 })
    );
}

#[test]
fn test_logical_assignment_to_member() {
    let code = "obj.x ??= 1;";
    let parsed = parse_js(code);
    let tokens = &parsed.tokens;
    assert_eq!(tokens[3].text(code), "??=");
    assert_eq!(tokens[0].logical_assign, Some(LogicalAssignRole::MemberStart));
    assert_eq!(
        tokens[1].logical_assign,
        Some(LogicalAssignRole::MemberAccess { operator_index: 3 })
    );
}

#[test]
fn test_arrow_params_are_function_scoped() {
    let code = "const f = (a, b) => a + b;";
    let parsed = parse_js(code);
    let tokens = &parsed.tokens;
    assert_eq!(tokens[1].identifier_role, Some(IdentifierRole::TopLevelDeclaration));
    assert_eq!(tokens[4].text(code), "a");
    assert_eq!(
        tokens[4].identifier_role,
        Some(IdentifierRole::FunctionScopedDeclaration)
    );
    assert_eq!(
        tokens[6].identifier_role,
        Some(IdentifierRole::FunctionScopedDeclaration)
    );
    assert_eq!(tokens[8].text(code), "=>");
    assert_eq!(tokens[9].text(code), "a");
    assert_eq!(tokens[9].identifier_role, Some(IdentifierRole::Access));
}

#[test]
fn test_top_level_scope_is_recorded_last() {
    let parsed = parse_js("function f() { let x; }\nf();");
    let last = parsed.scopes.last().copied();
    let Some(top) = last else {
        panic!("no scopes recorded");
    };
    assert_eq!(top.start_token_index, 0);
    assert_eq!(top.end_token_index, parsed.tokens.len());
    assert!(top.is_function_scope);
    assert!(parsed.scopes.len() >= 2);
}

#[test]
fn test_block_scoped_binding_inside_function() {
    let code = "function f() { let x; var y; }";
    let parsed = parse_js(code);
    let tokens = &parsed.tokens;
    assert_eq!(tokens[1].identifier_role, Some(IdentifierRole::TopLevelDeclaration));
    let x = tokens
        .iter()
        .find(|token| token.text(code) == "x")
        .copied();
    let y = tokens
        .iter()
        .find(|token| token.text(code) == "y")
        .copied();
    let (Some(x), Some(y)) = (x, y) else {
        panic!("missing bindings");
    };
    assert_eq!(x.identifier_role, Some(IdentifierRole::BlockScopedDeclaration));
    assert_eq!(y.identifier_role, Some(IdentifierRole::FunctionScopedDeclaration));
    assert!(x.scope_depth > tokens[1].scope_depth);
}

#[test]
fn test_class_members() {
    let code = "class A extends B { x = 1; static y; m() {} }";
    let parsed = parse_js(code);
    let tokens = &parsed.tokens;
    let index_of = |text: &str| {
        tokens
            .iter()
            .position(|token| token.text(code) == text)
            .unwrap_or_else(|| panic!("no token {text:?}"))
    };
    assert_eq!(tokens[index_of("static")].token_type, TokenType::STATIC);
    let eq = index_of("=");
    assert_eq!(tokens[eq].rhs_end_index, Some(eq + 2));
    assert_eq!(tokens[index_of("x")].identifier_role, Some(IdentifierRole::ObjectKey));
}

#[test]
fn test_object_shorthand_role() {
    let code = "x = {a, b: c};";
    let parsed = parse_js(code);
    let tokens = &parsed.tokens;
    assert_eq!(tokens[3].text(code), "a");
    assert_eq!(tokens[3].identifier_role, Some(IdentifierRole::ObjectShorthand));
    assert_eq!(tokens[5].identifier_role, Some(IdentifierRole::ObjectKey));
    assert_eq!(tokens[7].identifier_role, Some(IdentifierRole::Access));
}

#[test]
fn test_import_and_export_roles() {
    let code = "import {a as b} from \"m\";\nexport {b};";
    let parsed = parse_js(code);
    let tokens = &parsed.tokens;
    assert_eq!(tokens[2].identifier_role, Some(IdentifierRole::ImportAccess));
    assert_eq!(tokens[4].identifier_role, Some(IdentifierRole::ImportDeclaration));
    let exported = tokens
        .iter()
        .rev()
        .find(|token| token.text(code) == "b")
        .map(|token| token.identifier_role);
    assert_eq!(exported, Some(Some(IdentifierRole::ExportAccess)));
}

#[test]
fn test_unexpected_token_reports_location() {
    let err = tokenize("let a = 1;\nlet b = ;", Dialect::default()).err();
    let Some(err) = err else {
        panic!("expected a parse error");
    };
    assert!(matches!(err, TransformError::UnexpectedToken { .. }));
    let location = err.location();
    assert_eq!(location.map(|loc| (loc.line, loc.column)), Some((2, 9)));
}

#[test]
fn test_unterminated_string_is_lex_error() {
    let err = tokenize("x = \"abc", Dialect::default()).err();
    assert!(matches!(err, Some(TransformError::Lex { .. })));
}

#[test]
fn test_unclosed_call_is_error() {
    let err = tokenize("foo(", Dialect::default()).err();
    assert!(matches!(err, Some(TransformError::UnexpectedToken { .. })));
}

#[test]
fn test_token_dump_uses_labels() {
    let parsed = parse_js("a => a;");
    let value = serde_json::to_value(&parsed.tokens[1]).unwrap_or_default();
    assert_eq!(value["token_type"], "=>");
    assert_eq!(value["is_type"], false);
}
