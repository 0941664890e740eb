//! Import/export specifier shapes.

use crate::token_processor::TokenProcessor;
use zest_common::Result;
use zest_scanner::TokenType;

/// One entry of an `import {...}` or `export {...}` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecifierInfo {
    pub is_type: bool,
    /// Imported name for imports, local name for exports.
    pub left_name: String,
    /// Local name for imports, exported name for exports.
    pub right_name: String,
    /// Index of the `,` or `}` that ends the specifier.
    pub end_index: usize,
}

fn is_specifier_end(tokens: &TokenProcessor<'_>, index: usize) -> bool {
    matches!(
        tokens.token_at(index).token_type,
        TokenType::BRACE_R | TokenType::COMMA
    )
}

/// Read the specifier starting at `index`: `a`, `a as b`, `type a` or
/// `type a as b`.
pub fn get_specifier_info(tokens: &TokenProcessor<'_>, index: usize) -> Result<SpecifierInfo> {
    let is_type = tokens.token_at(index).is_type;
    let end_index = (index + 1..=index + 4)
        .find(|&end| is_specifier_end(tokens, end))
        .ok_or_else(|| tokens.error("Unexpected import/export specifier"))?;
    // Skip a leading `type` modifier.
    let first = if is_type && end_index - index > 1 && end_index - index != 3 {
        index + 1
    } else {
        index
    };
    let left_name = specifier_name(tokens, first);
    let right_name = if end_index - first >= 3 {
        specifier_name(tokens, end_index - 1)
    } else {
        left_name.clone()
    };
    Ok(SpecifierInfo {
        is_type,
        left_name,
        right_name,
        end_index,
    })
}

/// Names may be written as string literals (`import {"a-b" as c}`).
fn specifier_name(tokens: &TokenProcessor<'_>, index: usize) -> String {
    if tokens.matches1_at_index(index, TokenType::STRING) {
        tokens.string_value_at_index(index).to_string()
    } else {
        tokens.identifier_name_at_index(index).to_string()
    }
}
