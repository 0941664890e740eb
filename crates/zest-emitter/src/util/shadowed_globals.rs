//! Marks identifier tokens that refer to a nested redeclaration of an
//! imported or exported name rather than to the module-level binding.

use fixedbitset::FixedBitSet;
use rustc_hash::FxHashSet;
use zest_scanner::{Scope, Token, TokenType};

/// Compute per-token shadow marks for `global_names`.
///
/// Returns an empty set (all clear) when no nested declaration uses any of
/// the names, which is the common case.
pub fn identify_shadowed_globals(
    code: &str,
    tokens: &[Token],
    scopes: &[Scope],
    global_names: &FxHashSet<String>,
) -> FixedBitSet {
    let mut shadowed = FixedBitSet::with_capacity(tokens.len());
    if global_names.is_empty() || !has_shadowed_globals(code, tokens, global_names) {
        return shadowed;
    }
    mark_shadowed_globals(code, tokens, scopes, global_names, &mut shadowed);
    tracing::debug!(shadowed = shadowed.count_ones(..), "marked shadowed globals");
    shadowed
}

fn has_shadowed_globals(code: &str, tokens: &[Token], global_names: &FxHashSet<String>) -> bool {
    tokens.iter().any(|token| {
        token.token_type == TokenType::NAME
            && !token.is_type
            && token.identifier_role.is_some_and(|role| role.is_non_top_level_declaration())
            && global_names.contains(token.text(code))
    })
}

fn mark_shadowed_globals(
    code: &str,
    tokens: &[Token],
    scopes: &[Scope],
    global_names: &FxHashSet<String>,
    shadowed: &mut FixedBitSet,
) {
    // Scopes are recorded at completion, so they are ordered by end index and
    // a backwards walk can maintain the enclosing-scope stack.
    let mut scope_stack: Vec<&Scope> = Vec::new();
    let mut remaining = scopes.iter().rev().peekable();
    for index in (0..tokens.len()).rev() {
        while scope_stack
            .last()
            .is_some_and(|scope| scope.start_token_index > index)
        {
            scope_stack.pop();
        }
        while let Some(scope) = remaining.next_if(|scope| scope.end_token_index > index) {
            if scope.start_token_index <= index {
                scope_stack.push(scope);
            }
        }
        let token = &tokens[index];
        if scope_stack.len() < 2 || token.is_type || token.token_type != TokenType::NAME {
            continue;
        }
        let name = token.text(code);
        if !global_names.contains(name) {
            continue;
        }
        let Some(role) = token.identifier_role else {
            continue;
        };
        let target = if role.is_block_scoped_declaration() {
            scope_stack.last().copied()
        } else if role.is_function_scoped_declaration() {
            scope_stack
                .iter()
                .skip(1)
                .rev()
                .find(|scope| scope.is_function_scope)
                .or_else(|| scope_stack.first())
                .copied()
        } else {
            None
        };
        if let Some(scope) = target {
            mark_shadowed_for_scope(code, tokens, scope, name, shadowed);
        }
    }
}

fn mark_shadowed_for_scope(
    code: &str,
    tokens: &[Token],
    scope: &Scope,
    name: &str,
    shadowed: &mut FixedBitSet,
) {
    let end = scope.end_token_index.min(tokens.len());
    for index in scope.start_token_index..end {
        let token = &tokens[index];
        if matches!(token.token_type, TokenType::NAME | TokenType::JSX_NAME) && token.text(code) == name {
            shadowed.insert(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zest_common::Dialect;

    fn shadow_marks(code: &str, global: &str) -> Vec<(String, bool)> {
        let parsed = match zest_scanner::tokenize(code, Dialect::default()) {
            Ok(parsed) => parsed,
            Err(err) => panic!("tokenize failed: {err}"),
        };
        let names: FxHashSet<String> = [global.to_string()].into_iter().collect();
        let shadowed = identify_shadowed_globals(code, &parsed.tokens, &parsed.scopes, &names);
        parsed
            .tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| token.token_type == TokenType::NAME && token.text(code) == global)
            .map(|(index, token)| (token.text(code).to_string(), shadowed.contains(index)))
            .collect()
    }

    #[test]
    fn test_no_shadowing_leaves_marks_clear() {
        let marks = shadow_marks("import {a} from 'm'; a(); function f() { return a; }", "a");
        assert!(marks.iter().all(|(_, shadowed)| !shadowed));
    }

    #[test]
    fn test_function_parameter_shadows_inside_function_only() {
        let marks = shadow_marks("import {a} from 'm'; a(); function f(a) { return a; } a;", "a");
        let flags: Vec<bool> = marks.iter().map(|(_, shadowed)| *shadowed).collect();
        assert_eq!(flags, vec![false, false, true, true, false]);
    }

    #[test]
    fn test_block_declaration_shadows_its_block() {
        let marks = shadow_marks("import {a} from 'm'; { let a = 1; a; } a;", "a");
        let flags: Vec<bool> = marks.iter().map(|(_, shadowed)| *shadowed).collect();
        assert_eq!(flags, vec![false, true, true, false]);
    }
}
