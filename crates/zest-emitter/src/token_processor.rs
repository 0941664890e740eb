//! Token cursor and output buffer.
//!
//! Every rewrite unit reads tokens through a `TokenProcessor` and writes its
//! output through it. The whitespace and comments between two tokens are
//! always carried over before the later token is emitted, so a unit only
//! decides what to do with each token's own text. Removing a token keeps the
//! newlines in front of it, which is what keeps the output on the same lines
//! as the input.

use crate::helpers::{Helper, HelperManager};
use crate::name_manager::NameManager;
use rustc_hash::FxHashMap;
use zest_common::{Result, TransformError};
use zest_scanner::{ContextualKeyword, LogicalAssignRole, Token, TokenType};

/// A restorable checkpoint for speculative emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenProcessorSnapshot {
    pub result_len: usize,
    pub token_index: usize,
}

/// Helper calls wrapped around a token's own text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct TokenAffix {
    prefix: String,
    suffix: String,
}

pub struct TokenProcessor<'a> {
    code: &'a str,
    tokens: Vec<Token>,
    is_flow_enabled: bool,
    /// Returned for reads past the last token.
    eof: Token,
    affixes: FxHashMap<usize, TokenAffix>,
    /// Chain and `??` starts whose operands contain an `await`.
    async_starts: Vec<usize>,
    result: String,
    index: usize,
}

impl<'a> TokenProcessor<'a> {
    pub fn new(code: &'a str, tokens: Vec<Token>, is_flow_enabled: bool) -> Self {
        let len = code.len() as u32;
        TokenProcessor {
            code,
            tokens,
            is_flow_enabled,
            eof: Token::new(TokenType::EOF, ContextualKeyword::None, len, len, 0, false),
            affixes: FxHashMap::default(),
            async_starts: Vec::new(),
            result: String::with_capacity(code.len() + code.len() / 4),
            index: 0,
        }
    }

    pub fn code(&self) -> &'a str {
        self.code
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Precompute the helper calls that wrap optional chains, nullish
    /// coalescing operands and member targets of logical assignments.
    ///
    /// When `es_transforms` is false only the async classification runs.
    pub fn compute_affixes(
        &mut self,
        names: &mut NameManager,
        helpers: &mut HelperManager,
        es_transforms: bool,
    ) {
        for index in 0..self.tokens.len() {
            let token = self.tokens[index];
            if (token.num_nullish_coalesce_starts > 0 || token.is_optional_chain_start)
                && self.scan_is_async_operation(index)
            {
                self.async_starts.push(index);
            }
            if !es_transforms {
                continue;
            }
            let is_async = self.async_starts.last() == Some(&index);
            let mut affix = TokenAffix::default();
            if token.logical_assign == Some(LogicalAssignRole::MemberStart) {
                affix.prefix.push_str(&helpers.get_helper_name(names, Helper::LogicalAssign));
                affix.prefix.push('(');
            }
            for _ in 0..token.num_nullish_coalesce_starts {
                let helper = if is_async {
                    affix.prefix.push_str("await ");
                    Helper::AsyncNullishCoalesce
                } else {
                    Helper::NullishCoalesce
                };
                affix.prefix.push_str(&helpers.get_helper_name(names, helper));
                affix.prefix.push('(');
            }
            if token.is_optional_chain_start {
                if is_async {
                    affix.prefix.push_str("await ");
                }
                let after_delete =
                    index > 0 && self.tokens[index - 1].token_type == TokenType::DELETE;
                let helper = match (after_delete, is_async) {
                    (true, true) => Helper::AsyncOptionalChainDelete,
                    (true, false) => Helper::OptionalChainDelete,
                    (false, true) => Helper::AsyncOptionalChain,
                    (false, false) => Helper::OptionalChain,
                };
                affix.prefix.push_str(&helpers.get_helper_name(names, helper));
                affix.prefix.push_str("([");
            }
            if token.is_optional_chain_end {
                affix.suffix.push_str("])");
            }
            for _ in 0..token.num_nullish_coalesce_ends {
                affix.suffix.push_str("))");
            }
            if affix != TokenAffix::default() {
                self.affixes.insert(index, affix);
            }
        }
        tracing::trace!(
            affixed = self.affixes.len(),
            async_starts = self.async_starts.len(),
            "computed token affixes"
        );
    }

    /// An optional chain or `??` operand is async when it contains an
    /// `await` at its own nesting level.
    fn scan_is_async_operation(&self, start: usize) -> bool {
        let start_depth = self.tokens[start].scope_depth;
        let mut depth: i64 = 0;
        let mut index = start;
        loop {
            let token = &self.tokens[index];
            if token.is_optional_chain_start {
                depth += 1;
            }
            if token.is_optional_chain_end {
                depth -= 1;
            }
            depth += i64::from(token.num_nullish_coalesce_starts);
            depth -= i64::from(token.num_nullish_coalesce_ends);
            if token.contextual_keyword == ContextualKeyword::Await
                && token.identifier_role.is_none()
                && token.scope_depth == start_depth
            {
                return true;
            }
            index += 1;
            if depth <= 0 || index >= self.tokens.len() {
                return false;
            }
        }
    }

    /// Whether the chain or `??` operand starting at `index` awaits.
    pub fn is_async_operation(&self, index: usize) -> bool {
        self.async_starts.binary_search(&index).is_ok()
    }

    // =========================================================================
    // Cursor
    // =========================================================================

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn is_at_end(&self) -> bool {
        self.index >= self.tokens.len()
    }

    pub fn current_token(&self) -> &Token {
        self.token_at(self.index)
    }

    pub fn token_at(&self, index: usize) -> &Token {
        self.tokens.get(index).unwrap_or(&self.eof)
    }

    /// Token at `current + offset`. Negative offsets before the start read
    /// as end of input.
    pub fn token_at_relative_index(&self, offset: isize) -> &Token {
        match self.index.checked_add_signed(offset) {
            Some(index) => self.token_at(index),
            None => &self.eof,
        }
    }

    /// Advance without emitting anything.
    pub fn next_token(&mut self) -> Result<()> {
        if self.is_at_end() {
            return Err(self.error("Unexpectedly reached end of input"));
        }
        self.index += 1;
        Ok(())
    }

    pub fn previous_token(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn snapshot(&self) -> TokenProcessorSnapshot {
        TokenProcessorSnapshot {
            result_len: self.result.len(),
            token_index: self.index,
        }
    }

    pub fn restore_to_snapshot(&mut self, snapshot: TokenProcessorSnapshot) {
        self.result.truncate(snapshot.result_len);
        self.index = snapshot.token_index;
    }

    /// Cut the code written since `snapshot` out of the output and return it.
    /// The cursor stays where it is.
    pub fn dangerously_get_and_remove_code_since_snapshot(
        &mut self,
        snapshot: TokenProcessorSnapshot,
    ) -> String {
        self.result.split_off(snapshot.result_len.min(self.result.len()))
    }

    // =========================================================================
    // Matching
    // =========================================================================

    pub fn matches_at_index(&self, index: usize, types: &[TokenType]) -> bool {
        types
            .iter()
            .enumerate()
            .all(|(offset, tt)| self.token_at(index + offset).token_type == *tt)
    }

    pub fn matches1_at_index(&self, index: usize, t1: TokenType) -> bool {
        self.token_at(index).token_type == t1
    }

    pub fn matches2_at_index(&self, index: usize, t1: TokenType, t2: TokenType) -> bool {
        self.matches_at_index(index, &[t1, t2])
    }

    pub fn matches1(&self, t1: TokenType) -> bool {
        self.matches1_at_index(self.index, t1)
    }

    pub fn matches2(&self, t1: TokenType, t2: TokenType) -> bool {
        self.matches_at_index(self.index, &[t1, t2])
    }

    pub fn matches3(&self, t1: TokenType, t2: TokenType, t3: TokenType) -> bool {
        self.matches_at_index(self.index, &[t1, t2, t3])
    }

    pub fn matches4(&self, t1: TokenType, t2: TokenType, t3: TokenType, t4: TokenType) -> bool {
        self.matches_at_index(self.index, &[t1, t2, t3, t4])
    }

    pub fn matches5(
        &self,
        t1: TokenType,
        t2: TokenType,
        t3: TokenType,
        t4: TokenType,
        t5: TokenType,
    ) -> bool {
        self.matches_at_index(self.index, &[t1, t2, t3, t4, t5])
    }

    pub fn matches_contextual_at_index(&self, index: usize, keyword: ContextualKeyword) -> bool {
        let token = self.token_at(index);
        token.token_type == TokenType::NAME && token.contextual_keyword == keyword
    }

    pub fn matches_contextual(&self, keyword: ContextualKeyword) -> bool {
        self.matches_contextual_at_index(self.index, keyword)
    }

    pub fn matches_context_id_and_label(&self, tt: TokenType, context_id: Option<u32>) -> bool {
        self.matches1(tt) && self.current_token().context_id == context_id
    }

    /// Index of the closer paired with the opener at `open_index`.
    pub fn matching_closer_index(&self, open_index: usize) -> Option<usize> {
        let context_id = self.token_at(open_index).context_id?;
        (open_index + 1..self.tokens.len()).find(|&index| {
            let token = &self.tokens[index];
            token.context_id == Some(context_id) && token.token_type.is_closer()
        })
    }

    // =========================================================================
    // Token text
    // =========================================================================

    pub fn raw_code_for_token(&self, token: &Token) -> &'a str {
        token.text(self.code)
    }

    pub fn identifier_name_at_index(&self, index: usize) -> &'a str {
        self.token_at(index).text(self.code)
    }

    pub fn identifier_name(&self) -> &'a str {
        self.identifier_name_at_index(self.index)
    }

    pub fn current_token_code(&self) -> &'a str {
        self.identifier_name()
    }

    /// Contents of a string literal without its quotes. Escapes are kept as
    /// written, which is enough to compare module paths and enum keys.
    pub fn string_value_at_index(&self, index: usize) -> &'a str {
        let token = self.token_at(index);
        let start = (token.start as usize + 1).min(token.end as usize);
        let end = (token.end as usize).saturating_sub(1).max(start);
        self.code.get(start..end).unwrap_or("")
    }

    pub fn string_value(&self) -> &'a str {
        self.string_value_at_index(self.index)
    }

    /// Source between the previous token and the current one.
    pub fn previous_whitespace_and_comments(&self) -> String {
        let start = match self.index.checked_sub(1) {
            Some(previous) => self.token_at(previous).end as usize,
            None => 0,
        };
        let end = if self.is_at_end() {
            self.code.len()
        } else {
            self.current_token().start as usize
        };
        let text = self.code.get(start..end.max(start)).unwrap_or("");
        if self.is_flow_enabled && text.contains("@flow") {
            text.replace("@flow", "")
        } else {
            text.to_string()
        }
    }

    // =========================================================================
    // Emission
    // =========================================================================

    pub fn copy_token(&mut self) {
        let text = self.current_token().text(self.code);
        self.emit_current(text, false);
    }

    pub fn copy_expected_token(&mut self, tt: TokenType) -> Result<()> {
        if self.current_token().token_type != tt {
            return Err(self.error(format!("Expected token {}", tt.label())));
        }
        self.copy_token();
        Ok(())
    }

    /// Copy the current token with `prefix` written right before its text.
    pub fn copy_token_with_prefix(&mut self, prefix: &str) {
        let text = format!("{prefix}{}", self.current_token().text(self.code));
        self.emit_current(&text, false);
    }

    pub fn replace_token(&mut self, new_code: &str) {
        self.emit_current(new_code, false);
    }

    /// Replace the current token, keeping only the newlines of the
    /// whitespace before it.
    pub fn replace_token_trimming_left_whitespace(&mut self, new_code: &str) {
        self.emit_current(new_code, true);
    }

    /// Remove the first token of a construct. Its leading whitespace is kept
    /// so the surrounding code stays separated.
    pub fn remove_initial_token(&mut self) {
        self.replace_token("");
    }

    pub fn remove_token(&mut self) {
        self.replace_token_trimming_left_whitespace("");
    }

    /// Remove tokens up to (not including) the `}` that closes the current
    /// brace level.
    pub fn remove_balanced_code(&mut self) {
        let mut brace_depth = 0usize;
        while !self.is_at_end() {
            if self.matches1(TokenType::BRACE_L) {
                brace_depth += 1;
            } else if self.matches1(TokenType::BRACE_R) {
                if brace_depth == 0 {
                    return;
                }
                brace_depth -= 1;
            }
            self.remove_token();
        }
    }

    pub fn append_code(&mut self, code: &str) {
        self.result.push_str(code);
    }

    fn emit_current(&mut self, text: &str, trim_left: bool) {
        let whitespace = self.previous_whitespace_and_comments();
        if trim_left {
            self.result
                .extend(whitespace.chars().filter(|c| matches!(c, '\n' | '\r')));
        } else {
            self.result.push_str(&whitespace);
        }
        let affix = self.affixes.get(&self.index);
        if let Some(affix) = affix {
            self.result.push_str(&affix.prefix);
        }
        self.result.push_str(text);
        if let Some(affix) = affix {
            self.result.push_str(&affix.suffix);
        }
        self.index += 1;
    }

    /// Output written so far.
    pub fn result(&self) -> &str {
        &self.result
    }

    /// Flush the trailing whitespace and hand back the output.
    pub fn finish(mut self) -> Result<String> {
        if !self.is_at_end() {
            return Err(self.error("Tried to finish processing tokens before reaching the end"));
        }
        let trailing = self.previous_whitespace_and_comments();
        self.result.push_str(&trailing);
        Ok(self.result)
    }

    /// An `UnexpectedToken` error located at the current token.
    pub fn error(&self, message: impl Into<String>) -> TransformError {
        TransformError::unexpected_token(self.code, self.current_token().start, message)
    }
}

#[cfg(test)]
#[path = "tests/token_processor.rs"]
mod tests;
