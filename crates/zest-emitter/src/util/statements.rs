//! Small statement-level shapes shared by the import units.

use crate::token_processor::TokenProcessor;
use crate::util::identifiers::DeclarationInfo;
use zest_scanner::{ContextualKeyword, TokenType};

/// Remove `import A = require('a');` or `import A = B.C;` (without the `;`).
pub fn elide_import_equals(tokens: &mut TokenProcessor<'_>) {
    // import
    tokens.remove_initial_token();
    // name
    tokens.remove_token();
    // =
    tokens.remove_token();
    // name or require
    tokens.remove_token();
    if tokens.matches1(TokenType::PAREN_L) {
        // ( 'path' )
        tokens.remove_token();
        tokens.remove_token();
        tokens.remove_token();
    } else {
        while tokens.matches1(TokenType::DOT) {
            tokens.remove_token();
            tokens.remove_token();
        }
    }
}

/// Remove a trailing `with {...}` or `assert {...}` clause.
pub fn remove_maybe_import_attributes(tokens: &mut TokenProcessor<'_>) {
    let has_attributes = tokens.matches2(TokenType::WITH, TokenType::BRACE_L)
        || (tokens.matches2(TokenType::NAME, TokenType::BRACE_L)
            && tokens.matches_contextual(ContextualKeyword::Assert));
    if has_attributes {
        tokens.remove_token();
        tokens.remove_token();
        tokens.remove_balanced_code();
        tokens.remove_token();
    }
}

/// Called inside `export {`: whether the list is followed by `from '...'`.
pub fn is_export_from(tokens: &TokenProcessor<'_>) -> bool {
    let len = tokens.tokens().len();
    let mut close_brace_index = tokens.current_index();
    while close_brace_index < len && !tokens.matches1_at_index(close_brace_index, TokenType::BRACE_R) {
        close_brace_index += 1;
    }
    tokens.matches_contextual_at_index(close_brace_index + 1, ContextualKeyword::From)
        && tokens.matches1_at_index(close_brace_index + 2, TokenType::STRING)
}

/// At `export default x;`: whether `x` is a name declared only as a type, in
/// which case the statement has no runtime meaning.
pub fn should_elide_default_export(
    is_typescript: bool,
    keep_unused_imports: bool,
    tokens: &TokenProcessor<'_>,
    declaration_info: &DeclarationInfo,
) -> bool {
    if !is_typescript || keep_unused_imports {
        return false;
    }
    let Some(rhs_end) = tokens.current_token().rhs_end_index else {
        return false;
    };
    let num_tokens = rhs_end.saturating_sub(tokens.current_index());
    let is_single_name = num_tokens == 3
        || (num_tokens == 4 && tokens.matches1_at_index(rhs_end - 1, TokenType::SEMI));
    if !is_single_name {
        return false;
    }
    let identifier = tokens.token_at_relative_index(2);
    if identifier.token_type != TokenType::NAME {
        return false;
    }
    declaration_info.is_type_only(tokens.raw_code_for_token(identifier))
}

/// `export const x = ...;` with a single plain-name declarator, which can be
/// rewritten as `const x = exports.x = ...;` so function name inference
/// still applies.
pub fn is_simple_export_var(tokens: &TokenProcessor<'_>, export_index: usize) -> bool {
    let mut index = export_index + 2;
    if !tokens.matches1_at_index(index, TokenType::NAME) {
        return false;
    }
    index += 1;
    while index < tokens.tokens().len() && tokens.token_at(index).is_type {
        index += 1;
    }
    if !tokens.matches1_at_index(index, TokenType::EQ) {
        return false;
    }
    match tokens.token_at(index).rhs_end_index {
        Some(rhs_end) => !tokens.matches1_at_index(rhs_end, TokenType::COMMA),
        None => false,
    }
}
