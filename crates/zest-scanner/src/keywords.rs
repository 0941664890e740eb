//! Contextual keywords: identifiers that only mean something in certain
//! positions (`async`, `type`, `as`, `from`, ...).
//!
//! The lexer tags every `name` token with its contextual keyword so the parser
//! and the rewrite units can test for them without slicing the source again.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ContextualKeyword {
    #[default]
    None,
    Abstract,
    Accessor,
    As,
    Assert,
    Asserts,
    Async,
    Await,
    Checks,
    Constructor,
    Declare,
    Enum,
    Exports,
    From,
    Get,
    Global,
    Implements,
    Infer,
    Interface,
    Is,
    Keyof,
    Mixins,
    Module,
    Namespace,
    Of,
    Opaque,
    Out,
    Override,
    Private,
    Protected,
    Proto,
    Public,
    Readonly,
    Require,
    Satisfies,
    Set,
    Static,
    Symbol,
    Type,
    Unique,
    Using,
}

static CONTEXTUAL_KEYWORDS: Lazy<FxHashMap<&'static str, ContextualKeyword>> = Lazy::new(|| {
    use ContextualKeyword::*;
    [
        ("abstract", Abstract),
        ("accessor", Accessor),
        ("as", As),
        ("assert", Assert),
        ("asserts", Asserts),
        ("async", Async),
        ("await", Await),
        ("checks", Checks),
        ("constructor", Constructor),
        ("declare", Declare),
        ("enum", Enum),
        ("exports", Exports),
        ("from", From),
        ("get", Get),
        ("global", Global),
        ("implements", Implements),
        ("infer", Infer),
        ("interface", Interface),
        ("is", Is),
        ("keyof", Keyof),
        ("mixins", Mixins),
        ("module", Module),
        ("namespace", Namespace),
        ("of", Of),
        ("opaque", Opaque),
        ("out", Out),
        ("override", Override),
        ("private", Private),
        ("protected", Protected),
        ("proto", Proto),
        ("public", Public),
        ("readonly", Readonly),
        ("require", Require),
        ("satisfies", Satisfies),
        ("set", Set),
        ("static", Static),
        ("symbol", Symbol),
        ("type", Type),
        ("unique", Unique),
        ("using", Using),
    ]
    .into_iter()
    .collect()
});

impl ContextualKeyword {
    pub fn lookup(word: &str) -> ContextualKeyword {
        CONTEXTUAL_KEYWORDS
            .get(word)
            .copied()
            .unwrap_or(ContextualKeyword::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(ContextualKeyword::lookup("satisfies"), ContextualKeyword::Satisfies);
        assert_eq!(ContextualKeyword::lookup("from"), ContextualKeyword::From);
        assert_eq!(ContextualKeyword::lookup("fromage"), ContextualKeyword::None);
    }
}
