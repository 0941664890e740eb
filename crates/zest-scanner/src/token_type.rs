//! Token types.
//!
//! A `TokenType` packs an index together with the flags the parser consults on
//! every token: binary-operator precedence in the low four bits, then one bit
//! each for keyword, assignment, right-associativity, prefix, postfix and
//! "can start an expression".
//!
//! ```text
//! 31 ........ 10 | 9           8        7       6          5       4        3..0
//!    index       | STARTS_EXPR POSTFIX  PREFIX  RIGHT_ASSOC ASSIGN  KEYWORD  precedence
//! ```

use bitflags::bitflags;
use serde::{Serialize, Serializer};
use std::fmt;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TokenFlags: u32 {
        const PRECEDENCE_MASK = 0xF;
        const KEYWORD = 1 << 4;
        const ASSIGN = 1 << 5;
        const RIGHT_ASSOCIATIVE = 1 << 6;
        const PREFIX = 1 << 7;
        const POSTFIX = 1 << 8;
        const STARTS_EXPR = 1 << 9;
    }
}

const INDEX_SHIFT: u32 = 10;
const FLAG_MASK: u32 = (1 << INDEX_SHIFT) - 1;

const KW: u32 = TokenFlags::KEYWORD.bits();
const AS: u32 = TokenFlags::ASSIGN.bits();
const RA: u32 = TokenFlags::RIGHT_ASSOCIATIVE.bits();
const PRE: u32 = TokenFlags::PREFIX.bits();
const POST: u32 = TokenFlags::POSTFIX.bits();
const SE: u32 = TokenFlags::STARTS_EXPR.bits();

const fn tt(index: u32, flags: u32) -> TokenType {
    TokenType((index << INDEX_SHIFT) | flags)
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenType(u32);

impl TokenType {
    // ===== Literals and names =====
    pub const NUM: TokenType = tt(0, SE);
    pub const BIGINT: TokenType = tt(1, SE);
    pub const REGEXP: TokenType = tt(2, SE);
    pub const STRING: TokenType = tt(3, SE);
    pub const NAME: TokenType = tt(4, SE);
    pub const EOF: TokenType = tt(5, 0);

    // ===== Punctuation =====
    pub const BRACKET_L: TokenType = tt(6, SE);
    pub const BRACKET_R: TokenType = tt(7, 0);
    pub const BRACE_L: TokenType = tt(8, SE);
    pub const BRACE_BAR_L: TokenType = tt(9, SE);
    pub const BRACE_R: TokenType = tt(10, 0);
    pub const BRACE_BAR_R: TokenType = tt(11, 0);
    pub const PAREN_L: TokenType = tt(12, SE);
    pub const PAREN_R: TokenType = tt(13, 0);
    pub const COMMA: TokenType = tt(14, 0);
    pub const SEMI: TokenType = tt(15, 0);
    pub const COLON: TokenType = tt(16, 0);
    pub const DOUBLE_COLON: TokenType = tt(17, 0);
    pub const DOT: TokenType = tt(18, 0);
    pub const QUESTION: TokenType = tt(19, 0);
    pub const QUESTION_DOT: TokenType = tt(20, 0);
    pub const ARROW: TokenType = tt(21, 0);
    pub const TEMPLATE: TokenType = tt(22, 0);
    pub const ELLIPSIS: TokenType = tt(23, 0);
    pub const BACK_QUOTE: TokenType = tt(24, SE);
    pub const DOLLAR_BRACE_L: TokenType = tt(25, SE);
    pub const AT: TokenType = tt(26, 0);
    pub const HASH: TokenType = tt(27, SE);

    // ===== Operators =====
    pub const EQ: TokenType = tt(28, AS);
    pub const ASSIGN: TokenType = tt(29, AS);
    pub const PRE_INC_DEC: TokenType = tt(30, PRE | POST | SE);
    pub const POST_INC_DEC: TokenType = tt(31, POST);
    pub const BANG: TokenType = tt(32, PRE | SE);
    pub const TILDE: TokenType = tt(33, PRE | SE);
    pub const NULLISH_COALESCING: TokenType = tt(34, 1);
    pub const LOGICAL_OR: TokenType = tt(35, 1);
    pub const LOGICAL_AND: TokenType = tt(36, 2);
    pub const BITWISE_OR: TokenType = tt(37, 3);
    pub const BITWISE_XOR: TokenType = tt(38, 4);
    pub const BITWISE_AND: TokenType = tt(39, 5);
    pub const EQUALITY: TokenType = tt(40, 6);
    pub const LESS_THAN: TokenType = tt(41, 7);
    pub const GREATER_THAN: TokenType = tt(42, 7);
    pub const RELATIONAL_OR_EQUAL: TokenType = tt(43, 7);
    pub const BIT_SHIFT_L: TokenType = tt(44, 8);
    pub const BIT_SHIFT_R: TokenType = tt(45, 8);
    pub const PLUS: TokenType = tt(46, 9 | PRE | SE);
    pub const MINUS: TokenType = tt(47, 9 | PRE | SE);
    pub const MODULO: TokenType = tt(48, 10 | SE);
    pub const STAR: TokenType = tt(49, 10);
    pub const SLASH: TokenType = tt(50, 10);
    pub const EXPONENT: TokenType = tt(51, 11 | RA);

    // ===== JSX =====
    pub const JSX_NAME: TokenType = tt(52, 0);
    pub const JSX_TEXT: TokenType = tt(53, SE);
    pub const JSX_EMPTY_TEXT: TokenType = tt(54, SE);
    pub const JSX_TAG_START: TokenType = tt(55, SE);
    pub const JSX_TAG_END: TokenType = tt(56, 0);

    // ===== Retyped by the parser =====
    pub const NON_NULL_ASSERTION: TokenType = tt(57, 0);

    // ===== Keywords =====
    pub const BREAK: TokenType = tt(58, KW);
    pub const CASE: TokenType = tt(59, KW);
    pub const CATCH: TokenType = tt(60, KW);
    pub const CONTINUE: TokenType = tt(61, KW);
    pub const DEBUGGER: TokenType = tt(62, KW);
    pub const DEFAULT: TokenType = tt(63, KW);
    pub const DO: TokenType = tt(64, KW);
    pub const ELSE: TokenType = tt(65, KW);
    pub const FINALLY: TokenType = tt(66, KW);
    pub const FOR: TokenType = tt(67, KW);
    pub const FUNCTION: TokenType = tt(68, KW | SE);
    pub const IF: TokenType = tt(69, KW);
    pub const RETURN: TokenType = tt(70, KW);
    pub const SWITCH: TokenType = tt(71, KW);
    pub const THROW: TokenType = tt(72, KW | PRE | SE);
    pub const TRY: TokenType = tt(73, KW);
    pub const VAR: TokenType = tt(74, KW);
    pub const LET: TokenType = tt(75, KW);
    pub const CONST: TokenType = tt(76, KW);
    pub const WHILE: TokenType = tt(77, KW);
    pub const WITH: TokenType = tt(78, KW);
    pub const NEW: TokenType = tt(79, KW | SE);
    pub const THIS: TokenType = tt(80, KW | SE);
    pub const SUPER: TokenType = tt(81, KW | SE);
    pub const CLASS: TokenType = tt(82, KW | SE);
    pub const EXTENDS: TokenType = tt(83, KW);
    pub const EXPORT: TokenType = tt(84, KW);
    pub const IMPORT: TokenType = tt(85, KW | SE);
    pub const YIELD: TokenType = tt(86, KW | SE);
    pub const NULL: TokenType = tt(87, KW | SE);
    pub const TRUE: TokenType = tt(88, KW | SE);
    pub const FALSE: TokenType = tt(89, KW | SE);
    pub const IN: TokenType = tt(90, KW | 7);
    pub const INSTANCEOF: TokenType = tt(91, KW | 7);
    pub const TYPEOF: TokenType = tt(92, KW | PRE | SE);
    pub const VOID: TokenType = tt(93, KW | PRE | SE);
    pub const DELETE: TokenType = tt(94, KW | PRE | SE);

    // ===== Contextual words retyped by the parser =====
    pub const ASYNC: TokenType = tt(95, SE);
    pub const GET: TokenType = tt(96, SE);
    pub const SET: TokenType = tt(97, SE);
    pub const DECLARE: TokenType = tt(98, SE);
    pub const READONLY: TokenType = tt(99, SE);
    pub const ABSTRACT: TokenType = tt(100, SE);
    pub const STATIC: TokenType = tt(101, SE);
    pub const PUBLIC: TokenType = tt(102, 0);
    pub const PRIVATE: TokenType = tt(103, 0);
    pub const PROTECTED: TokenType = tt(104, 0);
    pub const OVERRIDE: TokenType = tt(105, 0);
    pub const AS: TokenType = tt(106, 7);
    pub const ENUM: TokenType = tt(107, SE);
    pub const TYPE: TokenType = tt(108, SE);
    pub const IMPLEMENTS: TokenType = tt(109, SE);
    pub const ACCESSOR: TokenType = tt(110, 0);

    pub fn flags(self) -> TokenFlags {
        TokenFlags::from_bits_truncate(self.0 & FLAG_MASK)
    }

    pub fn index(self) -> u32 {
        self.0 >> INDEX_SHIFT
    }

    /// Binary operator precedence, 0 when the token is not a binary operator.
    pub fn binop(self) -> u32 {
        self.0 & TokenFlags::PRECEDENCE_MASK.bits()
    }

    pub fn is_keyword(self) -> bool {
        self.flags().contains(TokenFlags::KEYWORD)
    }

    pub fn is_assign(self) -> bool {
        self.flags().contains(TokenFlags::ASSIGN)
    }

    pub fn is_right_associative(self) -> bool {
        self.flags().contains(TokenFlags::RIGHT_ASSOCIATIVE)
    }

    pub fn is_prefix(self) -> bool {
        self.flags().contains(TokenFlags::PREFIX)
    }

    pub fn is_postfix(self) -> bool {
        self.flags().contains(TokenFlags::POSTFIX)
    }

    pub fn starts_expr(self) -> bool {
        self.flags().contains(TokenFlags::STARTS_EXPR)
    }

    /// True for `(`, `[`, `{`, `{|` and `${`.
    pub fn is_opener(self) -> bool {
        matches!(
            self,
            TokenType::PAREN_L
                | TokenType::BRACKET_L
                | TokenType::BRACE_L
                | TokenType::BRACE_BAR_L
                | TokenType::DOLLAR_BRACE_L
        )
    }

    /// True for `)`, `]`, `}` and `|}`.
    pub fn is_closer(self) -> bool {
        matches!(
            self,
            TokenType::PAREN_R | TokenType::BRACKET_R | TokenType::BRACE_R | TokenType::BRACE_BAR_R
        )
    }

    pub fn label(self) -> &'static str {
        LABELS.get(self.index() as usize).copied().unwrap_or("?")
    }

    /// Keyword token for a reserved word, if `word` is one.
    pub fn keyword(word: &str) -> Option<TokenType> {
        let tt = match word {
            "break" => TokenType::BREAK,
            "case" => TokenType::CASE,
            "catch" => TokenType::CATCH,
            "continue" => TokenType::CONTINUE,
            "debugger" => TokenType::DEBUGGER,
            "default" => TokenType::DEFAULT,
            "do" => TokenType::DO,
            "else" => TokenType::ELSE,
            "finally" => TokenType::FINALLY,
            "for" => TokenType::FOR,
            "function" => TokenType::FUNCTION,
            "if" => TokenType::IF,
            "return" => TokenType::RETURN,
            "switch" => TokenType::SWITCH,
            "throw" => TokenType::THROW,
            "try" => TokenType::TRY,
            "var" => TokenType::VAR,
            "let" => TokenType::LET,
            "const" => TokenType::CONST,
            "while" => TokenType::WHILE,
            "with" => TokenType::WITH,
            "new" => TokenType::NEW,
            "this" => TokenType::THIS,
            "super" => TokenType::SUPER,
            "class" => TokenType::CLASS,
            "extends" => TokenType::EXTENDS,
            "export" => TokenType::EXPORT,
            "import" => TokenType::IMPORT,
            "yield" => TokenType::YIELD,
            "null" => TokenType::NULL,
            "true" => TokenType::TRUE,
            "false" => TokenType::FALSE,
            "in" => TokenType::IN,
            "instanceof" => TokenType::INSTANCEOF,
            "typeof" => TokenType::TYPEOF,
            "void" => TokenType::VOID,
            "delete" => TokenType::DELETE,
            _ => return None,
        };
        Some(tt)
    }
}

const LABELS: &[&str] = &[
    "num", "bigint", "regexp", "string", "name", "eof", "[", "]", "{", "{|", "}", "|}", "(", ")",
    ",", ";", ":", "::", ".", "?", "?.", "=>", "template", "...", "`", "${", "@", "#", "=", "_=",
    "++/--", "++/--", "!", "~", "??", "||", "&&", "|", "^", "&", "==/!=/===/!==", "<", ">",
    "<=/>=", "<</>>", "<</>>", "+", "-", "%", "*", "/", "**", "jsxName", "jsxText",
    "jsxEmptyText", "jsxTagStart", "jsxTagEnd", "!", "break", "case", "catch", "continue",
    "debugger", "default", "do", "else", "finally", "for", "function", "if", "return", "switch",
    "throw", "try", "var", "let", "const", "while", "with", "new", "this", "super", "class",
    "extends", "export", "import", "yield", "null", "true", "false", "in", "instanceof",
    "typeof", "void", "delete", "async", "get", "set", "declare", "readonly", "abstract",
    "static", "public", "private", "protected", "override", "as", "enum", "type", "implements",
    "accessor",
];

impl fmt::Debug for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for TokenType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_decode() {
        assert_eq!(TokenType::LOGICAL_AND.binop(), 2);
        assert_eq!(TokenType::EXPONENT.binop(), 11);
        assert!(TokenType::EXPONENT.is_right_associative());
        assert!(TokenType::PLUS.is_prefix());
        assert!(TokenType::PRE_INC_DEC.is_postfix());
        assert!(TokenType::EQ.is_assign());
        assert!(TokenType::TYPEOF.is_keyword());
        assert!(!TokenType::NAME.is_keyword());
        assert!(TokenType::NAME.starts_expr());
        assert_eq!(TokenType::IN.binop(), 7);
    }

    #[test]
    fn test_labels_line_up() {
        assert_eq!(LABELS.len() as u32, TokenType::ACCESSOR.index() + 1);
        assert_eq!(TokenType::FUNCTION.label(), "function");
        assert_eq!(TokenType::ACCESSOR.label(), "accessor");
        assert_eq!(TokenType::JSX_TAG_END.label(), "jsxTagEnd");
    }

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(TokenType::keyword("class"), Some(TokenType::CLASS));
        assert_eq!(TokenType::keyword("async"), None);
    }
}
