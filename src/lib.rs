//! zest: a token-rewriting compiler for modern JavaScript.
//!
//! Source with TypeScript or Flow types, JSX, ES module syntax and recent
//! ES features goes in; plain JavaScript comes out with every input line on
//! the same output line. No syntax tree is built: the scanner annotates a
//! token stream and the emitter rewrites it token by token.
//!
//! ```ignore
//! let options = zest::TransformOptions::new(&[zest::Transform::Typescript, zest::Transform::Imports]);
//! let result = zest::transform("import a from 'a';\nconst x: number = a;", &options)?;
//! ```

use rayon::prelude::*;
use std::fmt::Write as _;

pub use zest_common::{
    JsxRuntime, LineMap, Location, Result, SourceMapOptions, Transform, TransformError, TransformOptions,
};

pub mod source_map;
pub use source_map::RawSourceMap;

pub mod tracing_config;

/// Output of one [`transform`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformResult {
    pub code: String,
    pub source_map: Option<RawSourceMap>,
}

/// One input of [`transform_batch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub code: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, code: impl Into<String>) -> Self {
        SourceFile {
            path: path.into(),
            code: code.into(),
        }
    }
}

/// Rewrite `code` according to `options`.
///
/// Errors carry a 1-based location and, when `options.file_path` is set,
/// the file they occurred in.
pub fn transform(code: &str, options: &TransformOptions) -> Result<TransformResult> {
    let _span = tracing::debug_span!("transform", file = options.file_path.as_deref().unwrap_or("")).entered();
    let output = zest_emitter::RootTransformer::transform(code, options)
        .map_err(|err| err.with_file_path(options.file_path.as_deref()))?;
    let source_map = options.source_map_options.as_ref().map(|map_options| {
        source_map::compute_source_map(
            &output.code,
            output.body_line_count,
            &map_options.compiled_filename,
            options.file_path.as_deref(),
        )
    });
    tracing::debug!(
        input_bytes = code.len(),
        output_bytes = output.code.len(),
        source_map = source_map.is_some(),
        "transformed"
    );
    Ok(TransformResult {
        code: output.code,
        source_map,
    })
}

/// Transform many files in parallel.
///
/// Each file gets its own copy of `options` with `file_path` set to its
/// path; results come back in input order.
pub fn transform_batch(files: &[SourceFile], options: &TransformOptions) -> Vec<Result<TransformResult>> {
    tracing::debug!(files = files.len(), "transforming batch");
    files
        .par_iter()
        .map(|file| {
            let mut file_options = options.clone();
            file_options.file_path = Some(file.path.clone());
            transform(&file.code, &file_options)
        })
        .collect()
}

/// Render the annotated token stream as a table, one token per line.
///
/// Columns are the `line:column-line:column` range, the token label, the
/// raw source text and whatever the parser recorded about the token.
pub fn get_formatted_tokens(code: &str, options: &TransformOptions) -> Result<String> {
    let parsed = zest_scanner::tokenize(code, options.dialect())?;
    let line_map = LineMap::build(code);
    let mut rows: Vec<[String; 4]> = Vec::with_capacity(parsed.tokens.len());
    for token in &parsed.tokens {
        let start = line_map.location(token.start, code);
        let end = line_map.location(token.end, code);
        let raw = code.get(token.start as usize..token.end as usize).unwrap_or("");
        let mut details = Vec::new();
        if token.is_type {
            details.push("isType".to_string());
        }
        if token.contextual_keyword != zest_scanner::ContextualKeyword::None {
            details.push(format!("contextualKeyword={:?}", token.contextual_keyword));
        }
        if let Some(role) = token.identifier_role {
            details.push(format!("identifierRole={role:?}"));
        }
        if let Some(role) = token.jsx_role {
            details.push(format!("jsxRole={role:?}"));
        }
        if let Some(context_id) = token.context_id {
            details.push(format!("contextId={context_id}"));
        }
        if let Some(rhs_end) = token.rhs_end_index {
            details.push(format!("rhsEndIndex={rhs_end}"));
        }
        if token.is_optional_chain_start {
            details.push("isOptionalChainStart".to_string());
        }
        if token.is_optional_chain_end {
            details.push("isOptionalChainEnd".to_string());
        }
        rows.push([
            format!("{}:{}-{}:{}", start.line, start.column, end.line, end.column),
            token.token_type.label().to_string(),
            serde_json::Value::String(raw.to_string()).to_string(),
            details.join(" "),
        ]);
    }

    let location_width = rows.iter().map(|row| row[0].len()).max().unwrap_or(0);
    let label_width = rows.iter().map(|row| row[1].len()).max().unwrap_or(0);
    let raw_width = rows.iter().map(|row| row[2].len()).max().unwrap_or(0);
    let mut out = String::new();
    for [location, label, raw, details] in &rows {
        let line = format!("{location:<location_width$}  {label:<label_width$}  {raw:<raw_width$}  {details}");
        let _ = writeln!(out, "{}", line.trim_end());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatted_tokens_one_row_per_token() {
        let table = get_formatted_tokens("let x = 1;", &TransformOptions::default()).unwrap();
        let rows: Vec<&str> = table.lines().collect();
        assert_eq!(rows.len(), 5, "{table}");
        assert!(rows[0].starts_with("1:1-1:4"), "{table}");
        assert!(rows[1].contains("\"x\""), "{table}");
    }

    #[test]
    fn test_formatted_tokens_mark_types() {
        let options = TransformOptions::new(&[Transform::Typescript]);
        let table = get_formatted_tokens("let x: number = 1;", &options).unwrap();
        let number_row = table.lines().find(|row| row.contains("\"number\"")).unwrap();
        assert!(number_row.contains("isType"), "{table}");
    }
}
