//! Builds the unit pipeline for one file and assembles the output.

use crate::cjs_imports::CjsImportProcessor;
use crate::context::TransformContext;
use crate::driver::Driver;
use crate::helpers::HelperManager;
use crate::name_manager::NameManager;
use crate::token_processor::TokenProcessor;
use crate::transforms::{
    CjsImportTransformer, EsmImportTransformer, FlowTransformer, JestHoistTransformer, JsxTransformer,
    LogicalAssignmentTransformer, NumericSeparatorTransformer, OptionalCatchBindingTransformer,
    OptionalChainingNullishTransformer, ReactDisplayNameTransformer, ReactHotLoaderTransformer,
    Transformer, TypeScriptTransformer,
};
use crate::util::{get_declaration_info, get_non_type_identifiers, get_ts_imported_names, identify_shadowed_globals};
use fixedbitset::FixedBitSet;
use rustc_hash::FxHashSet;
use std::borrow::Cow;
use zest_common::{JsxRuntime, Result, Transform, TransformOptions};

/// Rewritten code for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOutput {
    pub code: String,
    /// Lines of input the body covers; lines after them come from suffixes.
    pub body_line_count: usize,
}

pub struct RootTransformer;

impl RootTransformer {
    /// Names of the units that would run for `options`, in the order they
    /// are offered each token.
    pub fn unit_names(options: &TransformOptions) -> Vec<&'static str> {
        build_units(options).iter().map(|unit| unit.name()).collect()
    }

    pub fn transform(code: &str, options: &TransformOptions) -> Result<EmitOutput> {
        options.validate()?;
        let options = apply_comment_pragmas(code, options);
        let options: &TransformOptions = &options;

        let parsed = zest_scanner::tokenize(code, options.dialect())?;
        let mut tokens = TokenProcessor::new(code, parsed.tokens, options.has(Transform::Flow));
        let mut names = NameManager::new(code, tokens.tokens());
        let mut helpers = HelperManager::new();
        tokens.compute_affixes(&mut names, &mut helpers, !options.disable_es_transforms);

        let is_typescript = options.has(Transform::Typescript);
        let elides_unused = is_typescript && !options.keep_unused_imports;
        let mut imports = None;
        let mut shadowed = FixedBitSet::with_capacity(tokens.tokens().len());
        let mut non_type_identifiers = FxHashSet::default();
        if options.has(Transform::Imports) {
            let mut processor = CjsImportProcessor::new(options);
            processor.preprocess_tokens(&tokens)?;
            shadowed = identify_shadowed_globals(code, tokens.tokens(), &parsed.scopes, &processor.get_global_names());
            if elides_unused {
                non_type_identifiers = get_non_type_identifiers(&tokens, &shadowed, options);
                processor.prune_type_only_imports(&non_type_identifiers);
            }
            processor.generate_import_replacements(&mut names, &mut helpers);
            imports = Some(processor);
        } else if is_typescript {
            shadowed = identify_shadowed_globals(code, tokens.tokens(), &parsed.scopes, &get_ts_imported_names(&tokens));
            if elides_unused {
                non_type_identifiers = get_non_type_identifiers(&tokens, &shadowed, options);
            }
        }
        let declaration_info = if is_typescript {
            get_declaration_info(&tokens)
        } else {
            Default::default()
        };

        let driver = Driver::new(
            build_units(options),
            options.disable_es_transforms,
            options.has(Transform::ReactHotLoader),
        );
        tracing::debug!(
            tokens = tokens.tokens().len(),
            units = ?driver.units().iter().map(|unit| unit.name()).collect::<Vec<_>>(),
            "transforming"
        );

        let mut cx = TransformContext {
            options,
            tokens,
            names,
            helpers,
            imports,
            shadowed,
            declaration_info,
            non_type_identifiers,
            generated_variables: Vec::new(),
            extracted_default_export_name: None,
        };
        while !cx.tokens.is_at_end() {
            driver.process_token(&mut cx)?;
        }

        let mut prefix = String::new();
        if options.has(Transform::Imports) {
            prefix.push_str("\"use strict\";");
        }
        for unit in driver.units() {
            prefix.push_str(&unit.prefix_code(&cx));
        }
        for variable in &cx.generated_variables {
            prefix.push_str(&format!(" var {variable};"));
        }
        prefix.push_str(&cx.helpers.emit_helpers(&mut cx.names));
        for unit in driver.units() {
            prefix.push_str(&unit.hoisted_code(&cx));
        }
        let mut suffix = String::new();
        for unit in driver.units() {
            suffix.push_str(&unit.suffix_code(&cx));
        }

        let body = cx.tokens.finish()?;
        let body_line_count = zest_common::count_newlines(&body) + 1;
        let code = if body.starts_with("#!") {
            // The shebang line stays first.
            let (first_line, rest) = match body.find('\n') {
                Some(newline) => body.split_at(newline + 1),
                None => (body.as_str(), ""),
            };
            let newline = if first_line.ends_with('\n') { "" } else { "\n" };
            format!("{first_line}{newline}{prefix}{rest}{suffix}")
        } else {
            format!("{prefix}{body}{suffix}")
        };
        Ok(EmitOutput { code, body_line_count })
    }
}

fn build_units(options: &TransformOptions) -> Vec<Box<dyn Transformer>> {
    let mut units: Vec<Box<dyn Transformer>> = Vec::new();
    if !options.disable_es_transforms {
        units.push(Box::new(OptionalChainingNullishTransformer::new()));
        units.push(Box::new(LogicalAssignmentTransformer::new()));
        units.push(Box::new(NumericSeparatorTransformer::new()));
        units.push(Box::new(OptionalCatchBindingTransformer::new()));
    }
    if options.has(Transform::Jsx) {
        if options.jsx_runtime != JsxRuntime::Preserve {
            units.push(Box::new(JsxTransformer::new(options)));
        }
        units.push(Box::new(ReactDisplayNameTransformer::new(options)));
    }
    if options.has(Transform::ReactHotLoader) {
        units.push(Box::new(ReactHotLoaderTransformer::new(options)));
    }
    if options.has(Transform::Imports) {
        units.push(Box::new(CjsImportTransformer::new(options)));
    } else {
        units.push(Box::new(EsmImportTransformer::new(options)));
    }
    if options.has(Transform::Flow) {
        units.push(Box::new(FlowTransformer::new()));
    }
    if options.has(Transform::Typescript) {
        units.push(Box::new(TypeScriptTransformer::new(options)));
    }
    if options.has(Transform::Jest) {
        units.push(Box::new(JestHoistTransformer::new()));
    }
    units
}

/// `@jsx`, `@jsxFrag`, `@jsxImportSource` and `@jsxRuntime` in the comments
/// before the first token override the corresponding options.
fn apply_comment_pragmas<'a>(code: &str, options: &'a TransformOptions) -> Cow<'a, TransformOptions> {
    if !options.has(Transform::Jsx) {
        return Cow::Borrowed(options);
    }
    let header_end = leading_comments_end(code);
    let header = &code[..header_end];
    if !header.contains("@jsx") {
        return Cow::Borrowed(options);
    }
    let mut options = options.clone();
    let mut words = header.split_whitespace();
    while let Some(word) = words.next() {
        match word {
            "@jsx" => options.jsx_pragma = words.next().map(str::to_string),
            "@jsxFrag" => options.jsx_fragment_pragma = words.next().map(str::to_string),
            "@jsxImportSource" => options.jsx_import_source = words.next().map(str::to_string),
            "@jsxRuntime" => match words.next() {
                Some("classic") => options.jsx_runtime = JsxRuntime::Classic,
                Some("automatic") => options.jsx_runtime = JsxRuntime::Automatic,
                _ => {}
            },
            _ => {}
        }
    }
    tracing::debug!(
        pragma = options.jsx_pragma(),
        fragment = options.jsx_fragment_pragma(),
        "applied jsx comment pragmas"
    );
    Cow::Owned(options)
}

/// Byte offset just past the comments and whitespace at the top of the file.
fn leading_comments_end(code: &str) -> usize {
    let bytes = code.as_bytes();
    let mut pos = 0;
    if code.starts_with("#!") {
        pos = code.find('\n').unwrap_or(code.len());
    }
    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if code[pos..].starts_with("//") {
            pos = code[pos..].find('\n').map_or(code.len(), |offset| pos + offset);
        } else if code[pos..].starts_with("/*") {
            pos = code[pos + 2..].find("*/").map_or(code.len(), |offset| pos + 2 + offset + 2);
        } else {
            return pos;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_order_for_every_transform() {
        let options = TransformOptions::new(&[
            Transform::Jsx,
            Transform::Typescript,
            Transform::Imports,
            Transform::ReactHotLoader,
            Transform::Jest,
        ]);
        assert_eq!(
            RootTransformer::unit_names(&options),
            vec![
                "optional-chaining-nullish",
                "logical-assignment",
                "numeric-separator",
                "optional-catch-binding",
                "jsx",
                "react-display-name",
                "react-hot-loader",
                "cjs-imports",
                "typescript",
                "jest-hoist",
            ]
        );
    }

    #[test]
    fn test_unit_order_without_es_transforms() {
        let mut options = TransformOptions::new(&[Transform::Flow, Transform::Jsx]);
        options.disable_es_transforms = true;
        options.jsx_runtime = JsxRuntime::Preserve;
        assert_eq!(
            RootTransformer::unit_names(&options),
            vec!["react-display-name", "esm-imports", "flow"]
        );
    }

    #[test]
    fn test_comment_pragmas_override_options() {
        let options = TransformOptions::new(&[Transform::Jsx]);
        let code = "/** @jsx h */\n// @jsxFrag Fragment\nconst a = <div />;";
        let effective = apply_comment_pragmas(code, &options);
        assert_eq!(effective.jsx_pragma(), "h");
        assert_eq!(effective.jsx_fragment_pragma(), "Fragment");
    }

    #[test]
    fn test_pragmas_after_code_are_ignored() {
        let options = TransformOptions::new(&[Transform::Jsx]);
        let code = "const a = 1; /* @jsx h */";
        assert_eq!(apply_comment_pragmas(code, &options).jsx_pragma(), "React.createElement");
    }

    #[test]
    fn test_shebang_stays_first() {
        let options = TransformOptions::new(&[Transform::Imports]);
        let output = RootTransformer::transform("#!/usr/bin/env node\nexport const a = 1;", &options)
            .expect("transform");
        assert!(output.code.starts_with("#!/usr/bin/env node\n\"use strict\";"));
    }
}
