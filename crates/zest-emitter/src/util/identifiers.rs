//! Identifier classification used by import elision and enum lowering.

use crate::token_processor::TokenProcessor;
use crate::util::specifiers::get_specifier_info;
use fixedbitset::FixedBitSet;
use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;
use zest_common::{JsxRuntime, TransformOptions};
use zest_scanner::{IdentifierRole, TokenType};

static RESERVED_WORDS: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        "break",
        "case",
        "catch",
        "class",
        "const",
        "continue",
        "debugger",
        "default",
        "delete",
        "do",
        "else",
        "export",
        "extends",
        "finally",
        "for",
        "function",
        "if",
        "import",
        "in",
        "instanceof",
        "new",
        "return",
        "super",
        "switch",
        "this",
        "throw",
        "try",
        "typeof",
        "var",
        "void",
        "while",
        "with",
        "yield",
        "enum",
        "implements",
        "interface",
        "let",
        "package",
        "private",
        "protected",
        "public",
        "static",
        "await",
        "false",
        "null",
        "true",
    ]
    .into_iter()
    .collect()
});

/// Whether `name` can be written as a binding identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first == '_' || first == '$' || first.is_alphabetic()) {
        return false;
    }
    if !chars.all(|c| c == '_' || c == '$' || c.is_alphanumeric() || c == '\u{200c}' || c == '\u{200d}') {
        return false;
    }
    !RESERVED_WORDS.contains(name)
}

/// Names declared at the top level, split by whether the declaration is
/// type-only.
#[derive(Debug, Clone, Default)]
pub struct DeclarationInfo {
    pub type_declarations: FxHashSet<String>,
    pub value_declarations: FxHashSet<String>,
}

impl DeclarationInfo {
    /// A name known only as a type.
    pub fn is_type_only(&self, name: &str) -> bool {
        self.type_declarations.contains(name) && !self.value_declarations.contains(name)
    }
}

pub fn get_declaration_info(tokens: &TokenProcessor<'_>) -> DeclarationInfo {
    let mut info = DeclarationInfo::default();
    for (index, token) in tokens.tokens().iter().enumerate() {
        if token.token_type == TokenType::IMPORT && token.scope_depth == 0 {
            collect_type_import_names(tokens, index, &mut info.type_declarations);
            continue;
        }
        if token.token_type != TokenType::NAME {
            continue;
        }
        let Some(role) = token.identifier_role else {
            continue;
        };
        if !(role.is_top_level_declaration() || role == IdentifierRole::ImportDeclaration) {
            continue;
        }
        let name = tokens.raw_code_for_token(token).to_string();
        if token.is_type {
            info.type_declarations.insert(name);
        } else {
            info.value_declarations.insert(name);
        }
    }
    info
}

/// Type-only specifiers lose their binding role in the scanner, so pick
/// their local names up from the specifier list.
fn collect_type_import_names(
    tokens: &TokenProcessor<'_>,
    import_index: usize,
    type_names: &mut FxHashSet<String>,
) {
    let mut index = import_index + 1;
    while index < tokens.tokens().len() && !tokens.matches1_at_index(index, TokenType::BRACE_L) {
        if tokens.matches1_at_index(index, TokenType::STRING)
            || tokens.matches1_at_index(index, TokenType::SEMI)
            || tokens.matches1_at_index(index, TokenType::PAREN_L)
        {
            return;
        }
        index += 1;
    }
    index += 1;
    while index < tokens.tokens().len() && !tokens.matches1_at_index(index, TokenType::BRACE_R) {
        let Ok(info) = get_specifier_info(tokens, index) else {
            return;
        };
        if info.is_type {
            type_names.insert(info.right_name);
        }
        index = info.end_index;
        if tokens.matches1_at_index(index, TokenType::COMMA) {
            index += 1;
        }
    }
}

/// Every name read in a value position. An import binding missing from this
/// set is only ever used as a type.
pub fn get_non_type_identifiers(
    tokens: &TokenProcessor<'_>,
    shadowed: &FixedBitSet,
    options: &TransformOptions,
) -> FxHashSet<String> {
    let classic_jsx = options.jsx_runtime == JsxRuntime::Classic;
    let jsx_base = pragma_base(options.jsx_pragma());
    let fragment_base = pragma_base(options.jsx_fragment_pragma());
    let all = tokens.tokens();
    let mut names = FxHashSet::default();
    for (index, token) in all.iter().enumerate() {
        match token.token_type {
            TokenType::NAME
                if !token.is_type
                    && !shadowed.contains(index)
                    && matches!(
                        token.identifier_role,
                        Some(
                            IdentifierRole::Access
                                | IdentifierRole::ObjectShorthand
                                | IdentifierRole::ExportAccess
                        )
                    ) =>
            {
                names.insert(tokens.raw_code_for_token(token).to_string());
            }
            TokenType::JSX_TAG_START if classic_jsx => {
                names.insert(jsx_base.to_string());
                if tokens.matches1_at_index(index + 1, TokenType::JSX_TAG_END) {
                    names.insert(fragment_base.to_string());
                }
            }
            TokenType::JSX_NAME if token.identifier_role == Some(IdentifierRole::Access) => {
                let name = tokens.raw_code_for_token(token);
                // A lowercase single-part tag like `div` is not a reference.
                let lowercase = name.starts_with(|c: char| c.is_ascii_lowercase());
                if !lowercase || tokens.matches1_at_index(index + 1, TokenType::DOT) {
                    names.insert(name.to_string());
                }
            }
            _ => {}
        }
    }
    names
}

/// `React` for `React.createElement`.
pub fn pragma_base(pragma: &str) -> &str {
    pragma.split('.').next().unwrap_or(pragma)
}

/// Local names bound by value imports, used to scope the shadowing scan
/// when no module rewriting happens.
pub fn get_ts_imported_names(tokens: &TokenProcessor<'_>) -> FxHashSet<String> {
    tokens
        .tokens()
        .iter()
        .filter(|token| {
            token.token_type == TokenType::NAME
                && !token.is_type
                && token.identifier_role == Some(IdentifierRole::ImportDeclaration)
        })
        .map(|token| tokens.raw_code_for_token(token).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("foo"));
        assert!(is_identifier("_private$"));
        assert!(is_identifier("ünïcode"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier("hello world"));
        assert!(!is_identifier("a-b"));
    }

    #[test]
    fn test_reserved_words_are_not_identifiers() {
        assert!(!is_identifier("break"));
        assert!(!is_identifier("await"));
        assert!(!is_identifier("null"));
        assert!(is_identifier("undefined"));
    }

    #[test]
    fn test_pragma_base() {
        assert_eq!(pragma_base("React.createElement"), "React");
        assert_eq!(pragma_base("h"), "h");
    }
}
