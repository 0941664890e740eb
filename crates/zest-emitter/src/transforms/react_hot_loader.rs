//! react-hot-loader registration.
//!
//! The prefix enters the module and the suffix registers every top-level
//! binding (plus the `_default` alias of an anonymous `export default`) with
//! the runtime. No token is ever claimed.

use super::Transformer;
use crate::context::TransformContext;
use crate::driver::Driver;
use indexmap::IndexSet;
use zest_common::{Result, TransformOptions};
use zest_scanner::IdentifierRole;

const PREFIX_CODE: &str = "(function () { var enterModule = require('react-hot-loader').enterModule; enterModule && enterModule(module); })();";

#[derive(Debug)]
pub struct ReactHotLoaderTransformer {
    file_path: String,
}

impl ReactHotLoaderTransformer {
    pub fn new(options: &TransformOptions) -> Self {
        ReactHotLoaderTransformer {
            file_path: options.file_path.clone().unwrap_or_default(),
        }
    }
}

impl Transformer for ReactHotLoaderTransformer {
    fn name(&self) -> &'static str {
        "react-hot-loader"
    }

    fn process(&self, _cx: &mut TransformContext<'_>, _driver: &Driver) -> Result<bool> {
        Ok(false)
    }

    fn prefix_code(&self, _cx: &TransformContext<'_>) -> String {
        PREFIX_CODE.to_string()
    }

    fn suffix_code(&self, cx: &TransformContext<'_>) -> String {
        let tokens = &cx.tokens;
        let mut names: IndexSet<(String, String)> = tokens
            .tokens()
            .iter()
            .filter(|token| {
                !token.is_type
                    && token.identifier_role != Some(IdentifierRole::ImportDeclaration)
                    && token
                        .identifier_role
                        .is_some_and(IdentifierRole::is_top_level_declaration)
            })
            .map(|token| {
                let name = tokens.raw_code_for_token(token).to_string();
                (name.clone(), name)
            })
            .collect();
        if let Some(default_name) = &cx.extracted_default_export_name {
            names.insert((default_name.clone(), "default".to_string()));
        }

        let file_path = serde_json::Value::String(self.file_path.clone()).to_string();
        let registrations: Vec<String> = names
            .iter()
            .map(|(variable_name, unique_local_name)| {
                format!("  reactHotLoader.register({variable_name}, \"{unique_local_name}\", {file_path});")
            })
            .collect();
        format!(
            "\n;(function () {{\n  var reactHotLoader = require('react-hot-loader').default;\n  var leaveModule = require('react-hot-loader').leaveModule;\n  if (!reactHotLoader) {{\n    return;\n  }}\n{}\n  leaveModule(module);\n}})();",
            registrations.join("\n")
        )
    }
}
