//! Transform configuration.
//!
//! Options deserialize from the camelCase JSON shape build tools already pass
//! around, e.g.
//!
//! ```json
//! { "transforms": ["typescript", "imports"], "production": true }
//! ```

use crate::errors::{Result, TransformError};
use serde::{Deserialize, Serialize};

/// A transform that can be enabled for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transform {
    Jsx,
    Typescript,
    Flow,
    /// ESM -> CommonJS module substitution.
    Imports,
    ReactHotLoader,
    Jest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsxRuntime {
    /// `React.createElement(...)` calls (or a custom pragma).
    #[default]
    Classic,
    /// `jsx`/`jsxs`/`jsxDEV` calls imported from `<importSource>/jsx-runtime`.
    Automatic,
    /// Leave JSX untouched.
    Preserve,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMapOptions {
    /// Value of the map's `file` field.
    pub compiled_filename: String,
}

/// Syntax extensions the tokenizer must understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dialect {
    pub jsx: bool,
    pub typescript: bool,
    pub flow: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct TransformOptions {
    pub transforms: Vec<Transform>,
    /// Leave modern syntax (optional chaining, class fields, ...) alone and
    /// only strip types, JSX and imports.
    #[serde(rename = "disableESTransforms")]
    pub disable_es_transforms: bool,
    pub jsx_runtime: JsxRuntime,
    /// Suppress development-only output (JSX source info, `jsxDEV`).
    pub production: bool,
    pub jsx_import_source: Option<String>,
    pub jsx_pragma: Option<String>,
    pub jsx_fragment_pragma: Option<String>,
    pub keep_unused_imports: bool,
    pub preserve_dynamic_import: bool,
    pub inject_create_require_for_import_require: bool,
    #[serde(rename = "enableLegacyTypeScriptModuleInterop")]
    pub enable_legacy_typescript_module_interop: bool,
    pub enable_legacy_babel5_module_interop: bool,
    pub source_map_options: Option<SourceMapOptions>,
    pub file_path: Option<String>,
}

impl TransformOptions {
    pub fn new(transforms: &[Transform]) -> Self {
        TransformOptions {
            transforms: transforms.to_vec(),
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| TransformError::invalid_options(err.to_string()))
    }

    pub fn has(&self, transform: Transform) -> bool {
        self.transforms.contains(&transform)
    }

    pub fn dialect(&self) -> Dialect {
        Dialect {
            jsx: self.has(Transform::Jsx),
            typescript: self.has(Transform::Typescript),
            flow: self.has(Transform::Flow),
        }
    }

    pub fn jsx_pragma(&self) -> &str {
        self.jsx_pragma.as_deref().unwrap_or("React.createElement")
    }

    pub fn jsx_fragment_pragma(&self) -> &str {
        self.jsx_fragment_pragma.as_deref().unwrap_or("React.Fragment")
    }

    pub fn jsx_import_source(&self) -> &str {
        self.jsx_import_source.as_deref().unwrap_or("react")
    }

    /// Reject option sets that cannot produce correct output.
    pub fn validate(&self) -> Result<()> {
        if self.has(Transform::Flow) && self.has(Transform::Typescript) {
            return Err(TransformError::invalid_options(
                "the flow and typescript transforms cannot be enabled together",
            ));
        }
        if self.has(Transform::ReactHotLoader) && self.file_path.is_none() {
            return Err(TransformError::invalid_options(
                "filePath is required when using the react-hot-loader transform",
            ));
        }
        if self.jsx_runtime == JsxRuntime::Automatic
            && (self.jsx_pragma.is_some() || self.jsx_fragment_pragma.is_some())
        {
            return Err(TransformError::unsupported(
                "jsxPragma and jsxFragmentPragma only apply to the classic JSX runtime",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_camel_case() {
        let options = TransformOptions::from_json(
            r#"{
                "transforms": ["typescript", "imports", "react-hot-loader"],
                "disableESTransforms": true,
                "enableLegacyTypeScriptModuleInterop": true,
                "jsxRuntime": "automatic",
                "filePath": "src/App.tsx",
                "sourceMapOptions": { "compiledFilename": "App.js" }
            }"#,
        )
        .unwrap();
        assert!(options.has(Transform::Typescript));
        assert!(options.has(Transform::ReactHotLoader));
        assert!(options.disable_es_transforms);
        assert!(options.enable_legacy_typescript_module_interop);
        assert_eq!(options.jsx_runtime, JsxRuntime::Automatic);
        assert_eq!(options.file_path.as_deref(), Some("src/App.tsx"));
        assert_eq!(
            options.source_map_options.unwrap().compiled_filename,
            "App.js"
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = TransformOptions::from_json(r#"{"transfroms": []}"#).unwrap_err();
        assert!(matches!(err, TransformError::InvalidOptions { .. }));
    }

    #[test]
    fn test_validate_flow_and_typescript() {
        let options = TransformOptions::new(&[Transform::Flow, Transform::Typescript]);
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_validate_hot_loader_needs_file_path() {
        let mut options = TransformOptions::new(&[Transform::ReactHotLoader]);
        assert!(options.validate().is_err());
        options.file_path = Some("a.js".to_string());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_pragma_defaults() {
        let options = TransformOptions::default();
        assert_eq!(options.jsx_pragma(), "React.createElement");
        assert_eq!(options.jsx_fragment_pragma(), "React.Fragment");
        assert_eq!(options.jsx_import_source(), "react");
        assert_eq!(options.dialect(), Dialect::default());
    }
}
