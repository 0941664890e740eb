//! Annotating parser.
//!
//! A recursive-descent walk over the token stream that never builds a syntax
//! tree. Its only output is the token array itself, annotated with everything
//! the rewrite units need: `is_type` spans, identifier roles, paired context
//! ids, scope depth, assignment right-hand-side extents, optional-chain and
//! nullish boundaries, and JSX child shapes.
//!
//! The grammar is split across files as `impl Parser` blocks:
//! - `base`: token-level helpers, context stack, speculation
//! - `statement`: statements, declarations, classes, modules
//! - `expression`: expressions
//! - `lval`: binding patterns
//! - `typescript`, `flow`: type grammars and dialect hooks
//! - `jsx`: JSX elements

mod base;
mod expression;
mod flow;
mod jsx;
mod lval;
mod statement;
mod typescript;

use crate::state::State;
use crate::token::{Scope, Token};
use serde::Serialize;
use zest_common::{Dialect, Result};

/// Result of tokenizing a file.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedFile {
    pub tokens: Vec<Token>,
    pub scopes: Vec<Scope>,
}

pub struct Parser<'a> {
    pub(crate) input: &'a str,
    pub(crate) bytes: &'a [u8],
    pub(crate) dialect: Dialect,
    pub(crate) state: State,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, dialect: Dialect) -> Self {
        Parser {
            input,
            bytes: input.as_bytes(),
            dialect,
            state: State::new(),
        }
    }

    pub(crate) fn is_typescript(&self) -> bool {
        self.dialect.typescript
    }

    pub(crate) fn is_flow(&self) -> bool {
        self.dialect.flow
    }

    pub(crate) fn is_jsx(&self) -> bool {
        self.dialect.jsx
    }

    /// Parse the whole file and hand back the annotated tokens.
    pub fn parse(mut self) -> Result<ParsedFile> {
        self.parse_top_level()?;
        Ok(ParsedFile {
            tokens: self.state.tokens,
            scopes: self.state.scopes,
        })
    }
}

/// Tokenize and annotate `code` for the given dialect.
pub fn tokenize(code: &str, dialect: Dialect) -> Result<ParsedFile> {
    let parsed = Parser::new(code, dialect).parse()?;
    tracing::debug!(
        tokens = parsed.tokens.len(),
        scopes = parsed.scopes.len(),
        typescript = dialect.typescript,
        flow = dialect.flow,
        jsx = dialect.jsx,
        "tokenized"
    );
    Ok(parsed)
}
