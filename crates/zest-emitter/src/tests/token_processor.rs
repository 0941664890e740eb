use super::*;
use zest_common::Dialect;

fn processor_for(code: &str) -> TokenProcessor<'_> {
    let parsed = match zest_scanner::tokenize(code, Dialect::default()) {
        Ok(parsed) => parsed,
        Err(err) => panic!("tokenize failed: {err}"),
    };
    TokenProcessor::new(code, parsed.tokens, false)
}

fn copy_all(tokens: &mut TokenProcessor<'_>) {
    while !tokens.is_at_end() {
        tokens.copy_token();
    }
}

#[test]
fn test_copy_all_reproduces_input() {
    let code = "let a = 1; // trailing\n/* block */ f(a);\n";
    let mut tokens = processor_for(code);
    copy_all(&mut tokens);
    assert_eq!(tokens.finish().expect("finish"), code);
}

#[test]
fn test_replace_keeps_leading_whitespace() {
    let mut tokens = processor_for("a  +  b");
    tokens.copy_token();
    tokens.replace_token("-");
    copy_all(&mut tokens);
    assert_eq!(tokens.finish().expect("finish"), "a  -  b");
}

#[test]
fn test_remove_token_keeps_only_newlines() {
    let mut tokens = processor_for("a;\n  b; c");
    tokens.copy_token();
    tokens.copy_token();
    tokens.remove_token();
    copy_all(&mut tokens);
    assert_eq!(tokens.finish().expect("finish"), "a;\n; c");
}

#[test]
fn test_remove_initial_token_keeps_whitespace() {
    let mut tokens = processor_for("a;  b");
    tokens.copy_token();
    tokens.copy_token();
    tokens.remove_initial_token();
    assert_eq!(tokens.finish().expect("finish"), "a;  ");
}

#[test]
fn test_snapshot_restore_discards_output() {
    let mut tokens = processor_for("a + b");
    tokens.copy_token();
    let snapshot = tokens.snapshot();
    tokens.copy_token();
    tokens.append_code("/*x*/");
    tokens.restore_to_snapshot(snapshot);
    assert_eq!(tokens.result(), "a");
    assert_eq!(tokens.current_index(), 1);
    copy_all(&mut tokens);
    assert_eq!(tokens.finish().expect("finish"), "a + b");
}

#[test]
fn test_code_since_snapshot_is_cut_out() {
    let mut tokens = processor_for("f(x, y)");
    tokens.copy_token();
    tokens.copy_token();
    let snapshot = tokens.snapshot();
    tokens.copy_token();
    let cut = tokens.dangerously_get_and_remove_code_since_snapshot(snapshot);
    assert_eq!(cut, "x");
    assert_eq!(tokens.result(), "f(");
    assert_eq!(tokens.current_index(), 3);
}

#[test]
fn test_matches_and_reads_past_end() {
    let tokens = processor_for("a.b");
    assert!(tokens.matches3(TokenType::NAME, TokenType::DOT, TokenType::NAME));
    assert!(!tokens.matches2(TokenType::NAME, TokenType::NAME));
    assert_eq!(tokens.token_at(100).token_type, TokenType::EOF);
    assert_eq!(tokens.identifier_name_at_index(2), "b");
}

#[test]
fn test_matching_closer_index() {
    let tokens = processor_for("f((a), [b]);");
    // f ( ( a ) , [ b ] ) ;
    assert_eq!(tokens.matching_closer_index(1), Some(9));
    assert_eq!(tokens.matching_closer_index(2), Some(4));
    assert_eq!(tokens.matching_closer_index(6), Some(8));
}

#[test]
fn test_string_value_strips_quotes() {
    let tokens = processor_for("import a from './a.js';");
    assert_eq!(tokens.string_value_at_index(3), "./a.js");
}

#[test]
fn test_copy_expected_token_rejects_other_types() {
    let mut tokens = processor_for("a;");
    assert!(tokens.copy_expected_token(TokenType::SEMI).is_err());
    assert!(tokens.copy_expected_token(TokenType::NAME).is_ok());
}

#[test]
fn test_finish_before_end_is_an_error() {
    let tokens = processor_for("a + b");
    assert!(tokens.finish().is_err());
}

#[test]
fn test_affixes_wrap_optional_chain() {
    let code = "a?.b;";
    let parsed = match zest_scanner::tokenize(code, Dialect::default()) {
        Ok(parsed) => parsed,
        Err(err) => panic!("tokenize failed: {err}"),
    };
    let mut tokens = TokenProcessor::new(code, parsed.tokens, false);
    let mut names = NameManager::new(code, tokens.tokens());
    let mut helpers = HelperManager::new();
    tokens.compute_affixes(&mut names, &mut helpers, true);
    tokens.copy_token();
    assert_eq!(tokens.result(), "_optionalChain([a");
    assert!(helpers.is_requested(Helper::OptionalChain));
}

#[test]
fn test_flow_pragma_removed_from_comments() {
    let code = "// @flow\nlet a;";
    let parsed = match zest_scanner::tokenize(code, Dialect { flow: true, ..Dialect::default() }) {
        Ok(parsed) => parsed,
        Err(err) => panic!("tokenize failed: {err}"),
    };
    let mut tokens = TokenProcessor::new(code, parsed.tokens, true);
    copy_all(&mut tokens);
    assert_eq!(tokens.finish().expect("finish"), "// \nlet a;");
}
