//! Mutable tokenizer/parser state and its cheap checkpoint.

use crate::keywords::ContextualKeyword;
use crate::token::{ContextFrame, Scope, Token};
use crate::token_type::TokenType;

#[derive(Debug, Clone)]
pub struct State {
    // ===== Current token =====
    pub token_type: TokenType,
    pub contextual_keyword: ContextualKeyword,
    pub start: u32,
    pub end: u32,

    /// Lexer position.
    pub pos: u32,

    /// Tokens read while this is set are part of a type-only construct.
    pub is_type: bool,
    pub scope_depth: u32,

    /// Start offset of an expression that may turn out to be arrow params.
    pub potential_arrow_at: Option<u32>,
    pub no_anon_function_type: bool,
    pub in_disallow_conditional_types_context: bool,

    pub tokens: Vec<Token>,
    pub scopes: Vec<Scope>,
    pub context_stack: Vec<ContextFrame>,
    pub next_context_id: u32,
}

/// Everything needed to undo a speculative parse. Tokens and scopes are only
/// ever appended during speculation, so lengths suffice for them.
#[derive(Debug, Clone)]
pub struct StateSnapshot {
    token_type: TokenType,
    contextual_keyword: ContextualKeyword,
    start: u32,
    end: u32,
    pos: u32,
    is_type: bool,
    scope_depth: u32,
    potential_arrow_at: Option<u32>,
    no_anon_function_type: bool,
    in_disallow_conditional_types_context: bool,
    tokens_len: usize,
    scopes_len: usize,
    context_stack: Vec<ContextFrame>,
    next_context_id: u32,
}

impl State {
    pub fn new() -> Self {
        State {
            token_type: TokenType::EOF,
            contextual_keyword: ContextualKeyword::None,
            start: 0,
            end: 0,
            pos: 0,
            is_type: false,
            scope_depth: 0,
            potential_arrow_at: None,
            no_anon_function_type: false,
            in_disallow_conditional_types_context: false,
            tokens: Vec::new(),
            scopes: Vec::new(),
            context_stack: Vec::new(),
            next_context_id: 1,
        }
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            token_type: self.token_type,
            contextual_keyword: self.contextual_keyword,
            start: self.start,
            end: self.end,
            pos: self.pos,
            is_type: self.is_type,
            scope_depth: self.scope_depth,
            potential_arrow_at: self.potential_arrow_at,
            no_anon_function_type: self.no_anon_function_type,
            in_disallow_conditional_types_context: self.in_disallow_conditional_types_context,
            tokens_len: self.tokens.len(),
            scopes_len: self.scopes.len(),
            context_stack: self.context_stack.clone(),
            next_context_id: self.next_context_id,
        }
    }

    pub fn restore(&mut self, snapshot: StateSnapshot) {
        self.token_type = snapshot.token_type;
        self.contextual_keyword = snapshot.contextual_keyword;
        self.start = snapshot.start;
        self.end = snapshot.end;
        self.pos = snapshot.pos;
        self.is_type = snapshot.is_type;
        self.scope_depth = snapshot.scope_depth;
        self.potential_arrow_at = snapshot.potential_arrow_at;
        self.no_anon_function_type = snapshot.no_anon_function_type;
        self.in_disallow_conditional_types_context = snapshot.in_disallow_conditional_types_context;
        self.tokens.truncate(snapshot.tokens_len);
        self.scopes.truncate(snapshot.scopes_len);
        self.context_stack = snapshot.context_stack;
        self.next_context_id = snapshot.next_context_id;
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
