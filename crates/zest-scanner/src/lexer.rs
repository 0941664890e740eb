//! Character-level lexing.
//!
//! The lexer is driven by the parser: `next_token` reads one token at
//! `state.pos` into the current-token fields of [`State`](crate::state::State).
//! Which reading applies to an ambiguous character (`/` as division or regex,
//! `>` inside a type argument list, JSX text) is decided by the parser, which
//! calls the specialised readers below.

use crate::keywords::ContextualKeyword;
use crate::parser::Parser;
use crate::token_type::TokenType;
use zest_common::{Result, TransformError};

pub(crate) fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '$' || c == '_' || (!c.is_ascii() && c.is_alphabetic())
}

pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '$'
        || c == '_'
        || c == '\u{200c}'
        || c == '\u{200d}'
        || (!c.is_ascii() && c.is_alphanumeric())
}

fn is_whitespace_char(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

impl<'a> Parser<'a> {
    // ===== Primitive access =====

    #[inline]
    pub(crate) fn byte_at(&self, pos: u32) -> u8 {
        self.bytes.get(pos as usize).copied().unwrap_or(0)
    }

    #[inline]
    fn cur_byte(&self) -> u8 {
        self.byte_at(self.state.pos)
    }

    fn char_at(&self, pos: u32) -> Option<char> {
        self.input.get(pos as usize..).and_then(|rest| rest.chars().next())
    }

    fn at_end(&self) -> bool {
        self.state.pos as usize >= self.bytes.len()
    }

    pub(crate) fn lex_error(&self, pos: u32, message: impl Into<String>) -> TransformError {
        TransformError::lex(self.input, pos, message)
    }

    fn finish_token(&mut self, token_type: TokenType) {
        self.state.end = self.state.pos;
        self.state.token_type = token_type;
        self.state.contextual_keyword = ContextualKeyword::None;
    }

    fn finish_op(&mut self, token_type: TokenType, size: u32) {
        self.state.pos += size;
        self.finish_token(token_type);
    }

    // ===== Entry points =====

    /// Read the next token starting at `state.pos`.
    pub(crate) fn next_token(&mut self) -> Result<()> {
        self.skip_space()?;
        self.state.start = self.state.pos;
        if self.at_end() {
            self.finish_token(TokenType::EOF);
            return Ok(());
        }
        self.read_token()
    }

    fn read_token(&mut self) -> Result<()> {
        let byte = self.cur_byte();
        if byte.is_ascii_alphabetic() || byte == b'$' || byte == b'_' || byte == b'\\' {
            return self.read_word();
        }
        if byte >= 0x80 {
            if let Some(c) = self.char_at(self.state.pos) {
                if is_identifier_start(c) {
                    return self.read_word();
                }
                return Err(self.lex_error(self.state.pos, format!("Unexpected character '{c}'")));
            }
        }
        self.read_token_from_code(byte)
    }

    pub(crate) fn skip_space(&mut self) -> Result<()> {
        loop {
            match self.cur_byte() {
                b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c => self.state.pos += 1,
                b'/' => match self.byte_at(self.state.pos + 1) {
                    b'/' => self.skip_line_comment(2),
                    b'*' => self.skip_block_comment()?,
                    _ => return Ok(()),
                },
                b'#' if self.state.pos == 0 && self.byte_at(1) == b'!' => self.skip_line_comment(2),
                byte if byte >= 0x80 => match self.char_at(self.state.pos) {
                    Some(c) if is_whitespace_char(c) => self.state.pos += c.len_utf8() as u32,
                    _ => return Ok(()),
                },
                _ => return Ok(()),
            }
        }
    }

    fn skip_line_comment(&mut self, start_skip: u32) {
        self.state.pos += start_skip;
        let rest = &self.bytes[(self.state.pos as usize).min(self.bytes.len())..];
        let len = rest.iter().position(|&b| b == b'\n' || b == b'\r').unwrap_or(rest.len());
        self.state.pos += len as u32;
    }

    fn skip_block_comment(&mut self) -> Result<()> {
        let start = self.state.pos;
        let from = start as usize + 2;
        match self.input.get(from..).and_then(|rest| rest.find("*/")) {
            Some(offset) => {
                self.state.pos = (from + offset + 2) as u32;
                Ok(())
            }
            None => Err(self.lex_error(start, "Unterminated comment")),
        }
    }

    // ===== Words =====

    fn read_word_end(&mut self) -> Result<()> {
        loop {
            let byte = self.cur_byte();
            if byte.is_ascii_alphanumeric() || byte == b'$' || byte == b'_' {
                self.state.pos += 1;
            } else if byte == b'\\' {
                self.read_identifier_escape()?;
            } else if byte >= 0x80 {
                match self.char_at(self.state.pos) {
                    Some(c) if is_identifier_char(c) => self.state.pos += c.len_utf8() as u32,
                    _ => return Ok(()),
                }
            } else {
                return Ok(());
            }
        }
    }

    fn read_identifier_escape(&mut self) -> Result<()> {
        let start = self.state.pos;
        if self.byte_at(start + 1) != b'u' {
            return Err(self.lex_error(start, "Expecting Unicode escape sequence \\uXXXX"));
        }
        self.state.pos += 2;
        self.read_unicode_escape_body(start)
    }

    /// Reads `XXXX` or `{X...}` after `\u`.
    fn read_unicode_escape_body(&mut self, escape_start: u32) -> Result<()> {
        if self.cur_byte() == b'{' {
            self.state.pos += 1;
            let digits = self.skip_hex_digits();
            if digits == 0 || self.cur_byte() != b'}' {
                return Err(self.lex_error(escape_start, "Bad character escape sequence"));
            }
            self.state.pos += 1;
            return Ok(());
        }
        for _ in 0..4 {
            if !self.cur_byte().is_ascii_hexdigit() {
                return Err(self.lex_error(escape_start, "Bad character escape sequence"));
            }
            self.state.pos += 1;
        }
        Ok(())
    }

    fn skip_hex_digits(&mut self) -> u32 {
        let mut count = 0;
        while self.cur_byte().is_ascii_hexdigit() {
            self.state.pos += 1;
            count += 1;
        }
        count
    }

    fn read_word(&mut self) -> Result<()> {
        self.read_word_end()?;
        let word = &self.input[self.state.start as usize..self.state.pos as usize];
        if let Some(keyword) = TokenType::keyword(word) {
            // Keywords after `.` are plain property names.
            let after_dot = self
                .state
                .tokens
                .last()
                .is_some_and(|t| t.token_type == TokenType::DOT || t.token_type == TokenType::QUESTION_DOT);
            self.finish_token(if after_dot { TokenType::NAME } else { keyword });
            return Ok(());
        }
        let contextual = ContextualKeyword::lookup(word);
        self.finish_token(TokenType::NAME);
        self.state.contextual_keyword = contextual;
        Ok(())
    }

    // ===== Punctuation =====

    fn read_token_from_code(&mut self, byte: u8) -> Result<()> {
        let next = self.byte_at(self.state.pos + 1);
        let after = self.byte_at(self.state.pos + 2);
        match byte {
            b'#' => self.finish_op(TokenType::HASH, 1),
            b'.' => {
                if next.is_ascii_digit() {
                    return self.read_number(true);
                }
                if next == b'.' && after == b'.' {
                    self.finish_op(TokenType::ELLIPSIS, 3);
                } else {
                    self.finish_op(TokenType::DOT, 1);
                }
            }
            b'(' => self.finish_op(TokenType::PAREN_L, 1),
            b')' => self.finish_op(TokenType::PAREN_R, 1),
            b';' => self.finish_op(TokenType::SEMI, 1),
            b',' => self.finish_op(TokenType::COMMA, 1),
            b'[' => self.finish_op(TokenType::BRACKET_L, 1),
            b']' => self.finish_op(TokenType::BRACKET_R, 1),
            b'{' => {
                if self.dialect.flow && next == b'|' {
                    self.finish_op(TokenType::BRACE_BAR_L, 2);
                } else {
                    self.finish_op(TokenType::BRACE_L, 1);
                }
            }
            b'}' => self.finish_op(TokenType::BRACE_R, 1),
            b':' => {
                if next == b':' {
                    self.finish_op(TokenType::DOUBLE_COLON, 2);
                } else {
                    self.finish_op(TokenType::COLON, 1);
                }
            }
            b'?' => self.read_question(next, after),
            b'@' => self.finish_op(TokenType::AT, 1),
            b'`' => self.finish_op(TokenType::BACK_QUOTE, 1),
            b'0' if matches!(next, b'x' | b'X' | b'o' | b'O' | b'b' | b'B') => {
                return self.read_radix_number();
            }
            b'0'..=b'9' => return self.read_number(false),
            b'"' | b'\'' => return self.read_string(byte),
            b'/' => {
                if next == b'=' {
                    self.finish_op(TokenType::ASSIGN, 2);
                } else {
                    self.finish_op(TokenType::SLASH, 1);
                }
            }
            b'%' => {
                if next == b'=' {
                    self.finish_op(TokenType::ASSIGN, 2);
                } else {
                    self.finish_op(TokenType::MODULO, 1);
                }
            }
            b'*' => {
                if next == b'*' {
                    if after == b'=' {
                        self.finish_op(TokenType::ASSIGN, 3);
                    } else {
                        self.finish_op(TokenType::EXPONENT, 2);
                    }
                } else if next == b'=' {
                    self.finish_op(TokenType::ASSIGN, 2);
                } else {
                    self.finish_op(TokenType::STAR, 1);
                }
            }
            b'|' | b'&' => self.read_pipe_amp(byte, next, after),
            b'^' => {
                if next == b'=' {
                    self.finish_op(TokenType::ASSIGN, 2);
                } else {
                    self.finish_op(TokenType::BITWISE_XOR, 1);
                }
            }
            b'+' | b'-' => {
                if next == byte {
                    self.finish_op(TokenType::PRE_INC_DEC, 2);
                } else if next == b'=' {
                    self.finish_op(TokenType::ASSIGN, 2);
                } else if byte == b'+' {
                    self.finish_op(TokenType::PLUS, 1);
                } else {
                    self.finish_op(TokenType::MINUS, 1);
                }
            }
            b'<' => self.read_less_than(next, after),
            b'>' => self.read_greater_than(),
            b'=' => {
                if next == b'>' {
                    self.finish_op(TokenType::ARROW, 2);
                } else if next == b'=' {
                    self.finish_op(TokenType::EQUALITY, if after == b'=' { 3 } else { 2 });
                } else {
                    self.finish_op(TokenType::EQ, 1);
                }
            }
            b'!' => {
                if next == b'=' {
                    self.finish_op(TokenType::EQUALITY, if after == b'=' { 3 } else { 2 });
                } else {
                    self.finish_op(TokenType::BANG, 1);
                }
            }
            b'~' => self.finish_op(TokenType::TILDE, 1),
            _ => {
                let shown = self.char_at(self.state.pos).unwrap_or('?');
                return Err(self.lex_error(self.state.pos, format!("Unexpected character '{shown}'")));
            }
        }
        Ok(())
    }

    fn read_question(&mut self, next: u8, after: u8) {
        if next == b'?' {
            if after == b'=' {
                self.finish_op(TokenType::ASSIGN, 3);
            } else {
                self.finish_op(TokenType::NULLISH_COALESCING, 2);
            }
        } else if next == b'.' && !after.is_ascii_digit() {
            self.finish_op(TokenType::QUESTION_DOT, 2);
        } else {
            self.finish_op(TokenType::QUESTION, 1);
        }
    }

    fn read_pipe_amp(&mut self, byte: u8, next: u8, after: u8) {
        if self.dialect.flow && byte == b'|' && next == b'}' {
            self.finish_op(TokenType::BRACE_BAR_R, 2);
            return;
        }
        if next == byte {
            if after == b'=' {
                self.finish_op(TokenType::ASSIGN, 3);
            } else if byte == b'|' {
                self.finish_op(TokenType::LOGICAL_OR, 2);
            } else {
                self.finish_op(TokenType::LOGICAL_AND, 2);
            }
        } else if next == b'=' {
            self.finish_op(TokenType::ASSIGN, 2);
        } else if byte == b'|' {
            self.finish_op(TokenType::BITWISE_OR, 1);
        } else {
            self.finish_op(TokenType::BITWISE_AND, 1);
        }
    }

    fn read_less_than(&mut self, next: u8, after: u8) {
        if self.state.is_type {
            self.finish_op(TokenType::LESS_THAN, 1);
        } else if next == b'<' {
            if after == b'=' {
                self.finish_op(TokenType::ASSIGN, 3);
            } else {
                self.finish_op(TokenType::BIT_SHIFT_L, 2);
            }
        } else if next == b'=' {
            self.finish_op(TokenType::RELATIONAL_OR_EQUAL, 2);
        } else {
            self.finish_op(TokenType::LESS_THAN, 1);
        }
    }

    fn read_greater_than(&mut self) {
        // Inside types `>>` always closes two argument lists.
        if self.state.is_type {
            self.finish_op(TokenType::GREATER_THAN, 1);
            return;
        }
        let pos = self.state.pos;
        let mut size = 1;
        if self.byte_at(pos + 1) == b'>' {
            size = if self.byte_at(pos + 2) == b'>' { 3 } else { 2 };
            if self.byte_at(pos + size) == b'=' {
                self.finish_op(TokenType::ASSIGN, size + 1);
            } else {
                self.finish_op(TokenType::BIT_SHIFT_R, size);
            }
            return;
        }
        if self.byte_at(pos + 1) == b'=' {
            size = 2;
            self.finish_op(TokenType::RELATIONAL_OR_EQUAL, size);
            return;
        }
        self.finish_op(TokenType::GREATER_THAN, size);
    }

    /// Re-read the current token as a single `>` if it was lexed as `>>`,
    /// `>=` and so on before a type context began.
    pub(crate) fn rescan_gt(&mut self) {
        if self.byte_at(self.state.start) == b'>' && self.state.end - self.state.start > 1 {
            self.state.pos = self.state.start + 1;
            self.finish_token(TokenType::GREATER_THAN);
        }
    }

    /// Re-read a `>` that was lexed inside a type context now that the type
    /// context has ended, so `>=` and `>>` come back as single tokens.
    pub(crate) fn relex_gt(&mut self) {
        if self.state.token_type == TokenType::GREATER_THAN && !self.state.is_type {
            self.state.pos = self.state.start;
            self.read_greater_than();
        }
    }

    /// Re-read the current token as a single `<` if it was lexed as `<<` or
    /// `<=`.
    pub(crate) fn rescan_lt(&mut self) {
        if self.byte_at(self.state.start) == b'<' && self.state.end - self.state.start > 1 {
            self.state.pos = self.state.start + 1;
            self.finish_token(TokenType::LESS_THAN);
        }
    }

    // ===== Numbers =====

    fn skip_digits(&mut self, radix: u32) -> u32 {
        let mut count = 0;
        loop {
            let byte = self.cur_byte();
            if byte == b'_' || (byte as char).is_digit(radix) {
                self.state.pos += 1;
                count += 1;
            } else {
                return count;
            }
        }
    }

    fn read_radix_number(&mut self) -> Result<()> {
        let start = self.state.pos;
        let radix = match self.byte_at(start + 1) {
            b'x' | b'X' => 16,
            b'o' | b'O' => 8,
            _ => 2,
        };
        self.state.pos += 2;
        if self.skip_digits(radix) == 0 {
            return Err(self.lex_error(start, "Expected number in radix"));
        }
        if self.cur_byte() == b'n' {
            self.state.pos += 1;
            self.finish_after_number(TokenType::BIGINT)
        } else {
            self.finish_after_number(TokenType::NUM)
        }
    }

    fn read_number(&mut self, starts_with_dot: bool) -> Result<()> {
        let start = self.state.pos;
        if starts_with_dot {
            self.state.pos += 1;
            self.skip_digits(10);
        } else {
            self.skip_digits(10);
            if self.cur_byte() == b'n' {
                self.state.pos += 1;
                return self.finish_after_number(TokenType::BIGINT);
            }
            if self.cur_byte() == b'.' {
                self.state.pos += 1;
                self.skip_digits(10);
            }
        }
        if matches!(self.cur_byte(), b'e' | b'E') {
            self.state.pos += 1;
            if matches!(self.cur_byte(), b'+' | b'-') {
                self.state.pos += 1;
            }
            if self.skip_digits(10) == 0 {
                return Err(self.lex_error(start, "Invalid number"));
            }
        }
        self.finish_after_number(TokenType::NUM)
    }

    fn finish_after_number(&mut self, token_type: TokenType) -> Result<()> {
        if let Some(c) = self.char_at(self.state.pos) {
            if is_identifier_start(c) || c.is_ascii_digit() {
                return Err(self.lex_error(self.state.pos, "Identifier directly after number"));
            }
        }
        self.finish_token(token_type);
        Ok(())
    }

    // ===== Strings, templates, regexes =====

    fn read_string(&mut self, quote: u8) -> Result<()> {
        let start = self.state.pos;
        self.state.pos += 1;
        loop {
            match self.cur_byte() {
                _ if self.at_end() => {
                    return Err(self.lex_error(start, "Unterminated string constant"));
                }
                b'\n' | b'\r' => {
                    return Err(self.lex_error(start, "Unterminated string constant"));
                }
                b'\\' => self.read_escape()?,
                byte if byte == quote => {
                    self.state.pos += 1;
                    break;
                }
                _ => self.state.pos += 1,
            }
        }
        self.finish_token(TokenType::STRING);
        Ok(())
    }

    /// Skips one escape sequence; `state.pos` is at the backslash.
    fn read_escape(&mut self) -> Result<()> {
        let escape_start = self.state.pos;
        self.state.pos += 1;
        match self.cur_byte() {
            b'x' => {
                self.state.pos += 1;
                for _ in 0..2 {
                    if !self.cur_byte().is_ascii_hexdigit() {
                        return Err(self.lex_error(escape_start, "Bad character escape sequence"));
                    }
                    self.state.pos += 1;
                }
                Ok(())
            }
            b'u' => {
                self.state.pos += 1;
                self.read_unicode_escape_body(escape_start)
            }
            b'\r' if self.byte_at(self.state.pos + 1) == b'\n' => {
                self.state.pos += 2;
                Ok(())
            }
            _ if self.at_end() => Err(self.lex_error(escape_start, "Unterminated string constant")),
            byte if byte >= 0x80 => {
                let len = self.char_at(self.state.pos).map_or(1, |c| c.len_utf8() as u32);
                self.state.pos += len;
                Ok(())
            }
            _ => {
                self.state.pos += 1;
                Ok(())
            }
        }
    }

    /// Read a template chunk, `${` or the closing backquote. A chunk is
    /// always read between two delimiters, even when it is empty, so the
    /// delimiter is only produced right after a chunk. Invalid escapes are
    /// tolerated since tagged templates may carry them.
    pub(crate) fn read_template_token(&mut self) -> Result<()> {
        self.state.start = self.state.pos;
        let after_chunk = self.state.token_type == TokenType::TEMPLATE;
        loop {
            if self.at_end() {
                return Err(self.lex_error(self.state.start, "Unterminated template"));
            }
            let byte = self.cur_byte();
            let at_delimiter = byte == b'`' || (byte == b'$' && self.byte_at(self.state.pos + 1) == b'{');
            if at_delimiter {
                if self.state.pos == self.state.start && after_chunk {
                    if byte == b'$' {
                        self.finish_op(TokenType::DOLLAR_BRACE_L, 2);
                    } else {
                        self.finish_op(TokenType::BACK_QUOTE, 1);
                    }
                } else {
                    self.finish_token(TokenType::TEMPLATE);
                }
                return Ok(());
            }
            self.state.pos += if byte == b'\\' { 2 } else { 1 };
        }
    }

    /// Re-read the current `/` or `/=` token as a regular expression.
    pub(crate) fn read_regexp(&mut self) -> Result<()> {
        let start = self.state.start;
        self.state.pos = start + 1;
        let mut in_class = false;
        loop {
            if self.at_end() {
                return Err(self.lex_error(start, "Unterminated regular expression"));
            }
            match self.cur_byte() {
                b'\n' | b'\r' => {
                    return Err(self.lex_error(start, "Unterminated regular expression"));
                }
                b'\\' => self.state.pos += 2,
                b'[' => {
                    in_class = true;
                    self.state.pos += 1;
                }
                b']' if in_class => {
                    in_class = false;
                    self.state.pos += 1;
                }
                b'/' if !in_class => {
                    self.state.pos += 1;
                    break;
                }
                _ => self.state.pos += 1,
            }
        }
        self.read_word_end()?;
        self.finish_token(TokenType::REGEXP);
        Ok(())
    }

    // ===== JSX =====

    /// Read JSX child content: text, `<` or `{`.
    pub(crate) fn jsx_read_token(&mut self) -> Result<()> {
        self.state.start = self.state.pos;
        let mut only_whitespace = true;
        let mut saw_newline = false;
        loop {
            if self.at_end() {
                return Err(self.lex_error(self.state.start, "Unterminated JSX contents"));
            }
            match self.cur_byte() {
                b'<' | b'{' => {
                    if self.state.pos == self.state.start {
                        let token_type = if self.cur_byte() == b'<' {
                            TokenType::JSX_TAG_START
                        } else {
                            TokenType::BRACE_L
                        };
                        self.finish_op(token_type, 1);
                    } else if only_whitespace && saw_newline {
                        self.finish_token(TokenType::JSX_EMPTY_TEXT);
                    } else {
                        self.finish_token(TokenType::JSX_TEXT);
                    }
                    return Ok(());
                }
                b'\n' => {
                    saw_newline = true;
                    self.state.pos += 1;
                }
                b' ' | b'\t' | b'\r' => self.state.pos += 1,
                _ => {
                    only_whitespace = false;
                    self.state.pos += 1;
                }
            }
        }
    }

    /// Read one token inside a JSX tag.
    pub(crate) fn jsx_read_tag_token(&mut self) -> Result<()> {
        self.skip_space()?;
        self.state.start = self.state.pos;
        if self.at_end() {
            return Err(self.lex_error(self.state.start, "Unterminated JSX tag"));
        }
        let byte = self.cur_byte();
        let starts_word = byte.is_ascii_alphabetic()
            || byte == b'$'
            || byte == b'_'
            || (byte >= 0x80 && self.char_at(self.state.pos).is_some_and(is_identifier_start));
        if starts_word {
            return self.jsx_read_word();
        }
        match byte {
            b'"' | b'\'' => self.jsx_read_string(byte),
            b'>' => {
                self.finish_op(TokenType::JSX_TAG_END, 1);
                Ok(())
            }
            b'<' => {
                self.finish_op(TokenType::JSX_TAG_START, 1);
                Ok(())
            }
            b'/' => {
                self.finish_op(TokenType::SLASH, 1);
                Ok(())
            }
            b'=' => {
                self.finish_op(TokenType::EQ, 1);
                Ok(())
            }
            b'{' => {
                self.finish_op(TokenType::BRACE_L, 1);
                Ok(())
            }
            b'.' => {
                self.finish_op(TokenType::DOT, 1);
                Ok(())
            }
            b':' => {
                self.finish_op(TokenType::COLON, 1);
                Ok(())
            }
            _ => Err(self.unexpected_here()),
        }
    }

    fn jsx_read_word(&mut self) -> Result<()> {
        loop {
            let byte = self.cur_byte();
            if byte.is_ascii_alphanumeric() || byte == b'$' || byte == b'_' || byte == b'-' {
                self.state.pos += 1;
            } else if byte >= 0x80 {
                match self.char_at(self.state.pos) {
                    Some(c) if is_identifier_char(c) => self.state.pos += c.len_utf8() as u32,
                    _ => break,
                }
            } else {
                break;
            }
        }
        self.finish_token(TokenType::JSX_NAME);
        Ok(())
    }

    /// JSX attribute strings have no escapes and may span lines.
    fn jsx_read_string(&mut self, quote: u8) -> Result<()> {
        let start = self.state.pos;
        self.state.pos += 1;
        loop {
            if self.at_end() {
                return Err(self.lex_error(start, "Unterminated string constant"));
            }
            let byte = self.cur_byte();
            self.state.pos += 1;
            if byte == quote {
                break;
            }
        }
        self.finish_token(TokenType::STRING);
        Ok(())
    }
}
