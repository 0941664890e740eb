//! Annotated tokens.
//!
//! The parser never builds nodes; everything the rewrite units need to know
//! about a token's syntactic role is recorded on the token itself.

use crate::keywords::ContextualKeyword;
use crate::token_type::TokenType;
use serde::Serialize;

/// How an identifier token is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IdentifierRole {
    Access,
    /// `a` in `export {a}`.
    ExportAccess,
    TopLevelDeclaration,
    FunctionScopedDeclaration,
    BlockScopedDeclaration,
    ObjectShorthandTopLevelDeclaration,
    ObjectShorthandFunctionScopedDeclaration,
    ObjectShorthandBlockScopedDeclaration,
    /// `a` in the object literal `{a}`.
    ObjectShorthand,
    /// Local binding introduced by an import specifier.
    ImportDeclaration,
    /// Imported (remote) name in `import {a as b}`.
    ImportAccess,
    ObjectKey,
}

impl IdentifierRole {
    pub fn is_declaration(self) -> bool {
        matches!(
            self,
            IdentifierRole::TopLevelDeclaration
                | IdentifierRole::FunctionScopedDeclaration
                | IdentifierRole::BlockScopedDeclaration
                | IdentifierRole::ObjectShorthandTopLevelDeclaration
                | IdentifierRole::ObjectShorthandFunctionScopedDeclaration
                | IdentifierRole::ObjectShorthandBlockScopedDeclaration
        )
    }

    pub fn is_non_top_level_declaration(self) -> bool {
        matches!(
            self,
            IdentifierRole::FunctionScopedDeclaration
                | IdentifierRole::BlockScopedDeclaration
                | IdentifierRole::ObjectShorthandFunctionScopedDeclaration
                | IdentifierRole::ObjectShorthandBlockScopedDeclaration
        )
    }

    pub fn is_top_level_declaration(self) -> bool {
        matches!(
            self,
            IdentifierRole::TopLevelDeclaration | IdentifierRole::ObjectShorthandTopLevelDeclaration
        )
    }

    pub fn is_block_scoped_declaration(self) -> bool {
        matches!(
            self,
            IdentifierRole::BlockScopedDeclaration
                | IdentifierRole::ObjectShorthandBlockScopedDeclaration
        )
    }

    pub fn is_function_scoped_declaration(self) -> bool {
        matches!(
            self,
            IdentifierRole::FunctionScopedDeclaration
                | IdentifierRole::ObjectShorthandFunctionScopedDeclaration
        )
    }

    pub fn is_object_shorthand_declaration(self) -> bool {
        matches!(
            self,
            IdentifierRole::ObjectShorthandTopLevelDeclaration
                | IdentifierRole::ObjectShorthandFunctionScopedDeclaration
                | IdentifierRole::ObjectShorthandBlockScopedDeclaration
        )
    }
}

/// Child shape of a JSX element, recorded on its `jsxTagStart` token for the
/// automatic runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum JsxRole {
    NoChildren,
    OneChild,
    StaticChildren,
    /// A `key` prop follows a spread, so the element must go through
    /// `createElement`.
    KeyAfterPropSpread,
}

/// Marks the pieces of a `&&=`/`||=`/`??=` expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LogicalAssignRole {
    /// The identifier in `a ??= b`.
    Target { operator_index: usize },
    /// First token of a member target such as `obj.a` in `obj.a ??= b`.
    MemberStart,
    /// The final `.` or `[` of a member target.
    MemberAccess { operator_index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Token {
    pub token_type: TokenType,
    pub contextual_keyword: ContextualKeyword,
    pub start: u32,
    pub end: u32,
    pub scope_depth: u32,
    pub is_type: bool,
    pub identifier_role: Option<IdentifierRole>,
    pub jsx_role: Option<JsxRole>,
    /// Shared by exactly one opener and its closer.
    pub context_id: Option<u32>,
    /// One past the end of the right-hand side this assignment governs.
    pub rhs_end_index: Option<usize>,
    /// Set on `class` tokens in expression position.
    pub is_expression: bool,
    pub is_optional_chain_start: bool,
    pub is_optional_chain_end: bool,
    /// On `?.`, `.`, `[` and `(` inside an optional chain: where the
    /// subscripted expression starts.
    pub subscript_start_index: Option<usize>,
    /// On `??`: the first token of the left operand.
    pub nullish_start_index: Option<usize>,
    pub num_nullish_coalesce_starts: u16,
    pub num_nullish_coalesce_ends: u16,
    pub logical_assign: Option<LogicalAssignRole>,
}

impl Token {
    pub fn new(
        token_type: TokenType,
        contextual_keyword: ContextualKeyword,
        start: u32,
        end: u32,
        scope_depth: u32,
        is_type: bool,
    ) -> Self {
        Token {
            token_type,
            contextual_keyword,
            start,
            end,
            scope_depth,
            is_type,
            identifier_role: None,
            jsx_role: None,
            context_id: None,
            rhs_end_index: None,
            is_expression: false,
            is_optional_chain_start: false,
            is_optional_chain_end: false,
            subscript_start_index: None,
            nullish_start_index: None,
            num_nullish_coalesce_starts: 0,
            num_nullish_coalesce_ends: 0,
            logical_assign: None,
        }
    }

    pub fn text<'a>(&self, code: &'a str) -> &'a str {
        code.get(self.start as usize..self.end as usize).unwrap_or("")
    }
}

/// A lexical scope, recorded when the parser finishes it. Scopes are
/// therefore ordered by `end_token_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scope {
    pub start_token_index: usize,
    pub end_token_index: usize,
    pub is_function_scope: bool,
}

/// Syntactic kind of a bracketed region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    Paren,
    Bracket,
    Block,
    Object,
    ClassBody,
    JsxExpression,
    TypeLiteral,
    Template,
    /// A `{` whose role the parser did not need to classify.
    Brace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextFrame {
    pub kind: ContextKind,
    pub token_index: usize,
    pub id: u32,
}
