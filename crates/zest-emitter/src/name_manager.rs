//! Fresh identifier allocation.
//!
//! Generated code (import handles, helper functions, temporaries) must never
//! collide with a name the file already uses. The set is seeded with every
//! identifier that appears in the source and grows with each claim.

use rustc_hash::FxHashSet;
use zest_scanner::{Token, TokenType};

#[derive(Debug, Clone, Default)]
pub struct NameManager {
    used_names: FxHashSet<String>,
}

impl NameManager {
    pub fn new(code: &str, tokens: &[Token]) -> Self {
        let used_names = tokens
            .iter()
            .filter(|token| matches!(token.token_type, TokenType::NAME | TokenType::JSX_NAME))
            .map(|token| token.text(code).to_string())
            .collect();
        NameManager { used_names }
    }

    /// Reserve and return `base`, or `base2`, `base3`, ... when taken.
    pub fn claim_free_name(&mut self, base: &str) -> String {
        let name = self.find_free_name(base);
        self.used_names.insert(name.clone());
        name
    }

    pub fn find_free_name(&self, base: &str) -> String {
        if !self.used_names.contains(base) {
            return base.to_string();
        }
        let mut suffix = 2u32;
        loop {
            let candidate = format!("{base}{suffix}");
            if !self.used_names.contains(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }

    pub fn is_used(&self, name: &str) -> bool {
        self.used_names.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zest_common::Dialect;

    fn manager_for(code: &str) -> NameManager {
        let parsed = match zest_scanner::tokenize(code, Dialect::default()) {
            Ok(parsed) => parsed,
            Err(err) => panic!("tokenize failed: {err}"),
        };
        NameManager::new(code, &parsed.tokens)
    }

    #[test]
    fn test_claim_unused_name_as_is() {
        let mut names = manager_for("let a = 1;");
        assert_eq!(names.claim_free_name("_m"), "_m");
    }

    #[test]
    fn test_claim_skips_names_in_source() {
        let mut names = manager_for("let _m = 1, _m2 = 2;");
        assert_eq!(names.claim_free_name("_m"), "_m3");
    }

    #[test]
    fn test_claims_are_unique() {
        let mut names = manager_for("");
        let first = names.claim_free_name("e");
        let second = names.claim_free_name("e");
        let third = names.claim_free_name("e");
        assert_eq!((first.as_str(), second.as_str(), third.as_str()), ("e", "e2", "e3"));
    }

    #[test]
    fn test_find_does_not_claim() {
        let mut names = manager_for("");
        assert_eq!(names.find_free_name("x"), "x");
        assert_eq!(names.claim_free_name("x"), "x");
        assert_eq!(names.find_free_name("x"), "x2");
    }
}
