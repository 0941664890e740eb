//! Annotating tokenizer for the zest compiler.
//!
//! This crate turns source text into the annotated token stream the rewrite
//! units work from:
//! - `TokenType` - Token kinds packed with their parser flags
//! - `Token` - A token plus everything the parser learned about it
//! - `tokenize` - Lexer and annotating parser for JS, TypeScript, Flow and JSX
//!
//! No syntax tree is built. Type-only regions are marked with `is_type`,
//! brackets are paired through `context_id`, and identifier roles, scopes and
//! assignment extents are recorded on the tokens themselves.

pub mod keywords;
pub use keywords::ContextualKeyword;

pub mod token_type;
pub use token_type::{TokenFlags, TokenType};

pub mod token;
pub use token::{ContextFrame, ContextKind, IdentifierRole, JsxRole, LogicalAssignRole, Scope, Token};

pub mod state;

mod lexer;

pub mod parser;
pub use parser::{ParsedFile, Parser, tokenize};
