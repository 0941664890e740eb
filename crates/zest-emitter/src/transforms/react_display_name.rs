//! `displayName` for `React.createClass({...})` and `createReactClass({...})`.
//!
//! The name comes from what the call is assigned to: `const Foo = ...`,
//! `x.Foo = ...`, an object key `Foo: ...`, or the file name for
//! `export default`. An object that already has a `displayName` key is left
//! alone.

use super::Transformer;
use crate::context::TransformContext;
use crate::driver::Driver;
use std::path::Path;
use zest_common::{Result, TransformOptions};
use zest_scanner::{IdentifierRole, TokenType};

#[derive(Debug)]
pub struct ReactDisplayNameTransformer {
    file_path: Option<String>,
}

impl ReactDisplayNameTransformer {
    pub fn new(options: &TransformOptions) -> Self {
        ReactDisplayNameTransformer {
            file_path: options.file_path.clone(),
        }
    }

    fn try_process_create_class_call(
        &self,
        cx: &mut TransformContext<'_>,
        driver: &Driver,
        start_index: usize,
    ) -> Result<()> {
        let Some(display_name) = self.find_display_name(cx, start_index) else {
            return Ok(());
        };
        if !class_needs_display_name(cx)? {
            return Ok(());
        }
        cx.tokens.copy_expected_token(TokenType::PAREN_L)?;
        cx.tokens.copy_expected_token(TokenType::BRACE_L)?;
        cx.tokens
            .append_code(&format!("displayName: '{display_name}',"));
        driver.process_balanced_code(cx)?;
        cx.tokens.copy_expected_token(TokenType::BRACE_R)?;
        cx.tokens.copy_expected_token(TokenType::PAREN_R)?;
        tracing::trace!(display_name = %display_name, "added displayName");
        Ok(())
    }

    fn find_display_name(&self, cx: &TransformContext<'_>, start_index: usize) -> Option<String> {
        let name_index = start_index.checked_sub(2)?;
        let tokens = &cx.tokens;
        if tokens.matches2_at_index(name_index, TokenType::NAME, TokenType::EQ)
            || tokens.token_at(name_index).identifier_role == Some(IdentifierRole::ObjectKey)
        {
            return Some(tokens.identifier_name_at_index(name_index).to_string());
        }
        if tokens.matches2_at_index(name_index, TokenType::EXPORT, TokenType::DEFAULT) {
            return Some(self.display_name_from_file_path());
        }
        None
    }

    /// `Button` for `src/Button.js`; the directory name for an `index` file.
    fn display_name_from_file_path(&self) -> String {
        let path = Path::new(self.file_path.as_deref().unwrap_or("unknown"));
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        if stem != "index" {
            return stem;
        }
        path.parent()
            .and_then(Path::file_name)
            .map(|dir| dir.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Only a call whose sole argument is an object literal without its own
/// `displayName` key gets one.
fn class_needs_display_name(cx: &TransformContext<'_>) -> Result<bool> {
    let tokens = &cx.tokens;
    if !tokens.matches2(TokenType::PAREN_L, TokenType::BRACE_L) {
        return Ok(false);
    }
    let object_start = tokens.current_index() + 1;
    let Some(object_end) = tokens.matching_closer_index(object_start) else {
        return Err(tokens.error("Unexpected end of input when processing React class."));
    };
    // Keys of nested objects don't count.
    let mut depth = 0usize;
    for index in object_start + 1..object_end {
        let token = tokens.token_at(index);
        if token.token_type.is_opener() {
            depth += 1;
        } else if token.token_type.is_closer() {
            depth = depth.saturating_sub(1);
        } else if depth == 0
            && token.identifier_role == Some(IdentifierRole::ObjectKey)
            && tokens.identifier_name_at_index(index) == "displayName"
        {
            return Ok(false);
        }
    }
    Ok(tokens.matches1_at_index(object_end + 1, TokenType::PAREN_R)
        || tokens.matches2_at_index(object_end + 1, TokenType::COMMA, TokenType::PAREN_R))
}

impl Transformer for ReactDisplayNameTransformer {
    fn name(&self) -> &'static str {
        "react-display-name"
    }

    fn process(&self, cx: &mut TransformContext<'_>, driver: &Driver) -> Result<bool> {
        if !cx.tokens.matches1(TokenType::NAME) {
            return Ok(false);
        }
        let start_index = cx.tokens.current_index();
        if cx.tokens.identifier_name() == "createReactClass" {
            match cx.identifier_replacement("createReactClass") {
                Some(replacement) => cx.tokens.replace_token(&format!("(0, {replacement})")),
                None => cx.tokens.copy_token(),
            }
            self.try_process_create_class_call(cx, driver, start_index)?;
            return Ok(true);
        }
        if cx.tokens.matches3(TokenType::NAME, TokenType::DOT, TokenType::NAME)
            && cx.tokens.identifier_name() == "React"
            && cx.tokens.identifier_name_at_index(start_index + 2) == "createClass"
        {
            let react = cx
                .identifier_replacement("React")
                .unwrap_or_else(|| "React".to_string());
            cx.tokens.replace_token(&react);
            cx.tokens.copy_token();
            cx.tokens.copy_token();
            self.try_process_create_class_call(cx, driver, start_index)?;
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn display_name_for(file_path: &str) -> String {
        let mut options = TransformOptions::default();
        options.file_path = Some(file_path.to_string());
        ReactDisplayNameTransformer::new(&options).display_name_from_file_path()
    }

    #[test]
    fn test_display_name_from_file_stem() {
        assert_eq!(display_name_for("src/components/Button.js"), "Button");
    }

    #[test]
    fn test_display_name_from_index_directory() {
        assert_eq!(display_name_for("src/Menu/index.tsx"), "Menu");
    }

    #[test]
    fn test_display_name_without_file_path() {
        let transformer = ReactDisplayNameTransformer::new(&TransformOptions::default());
        assert_eq!(transformer.display_name_from_file_path(), "unknown");
    }
}
