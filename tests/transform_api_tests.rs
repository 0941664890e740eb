//! Tests for the public transform API: the documented end-to-end examples,
//! source maps, error reporting, option handling and batch transforms.

use zest::{
    JsxRuntime, SourceFile, SourceMapOptions, Transform, TransformError, TransformOptions, transform,
    transform_batch,
};

fn options(transforms: &[Transform]) -> TransformOptions {
    TransformOptions::new(transforms)
}

fn transform_ok(code: &str, options: &TransformOptions) -> String {
    match transform(code, options) {
        Ok(result) => result.code,
        Err(err) => panic!("transform failed for {code:?}: {err}"),
    }
}

fn position(haystack: &str, needle: &str) -> usize {
    match haystack.find(needle) {
        Some(index) => index,
        None => panic!("{needle:?} not found in {haystack:?}"),
    }
}

// =============================================================================
// End-to-end examples
// =============================================================================

#[test]
fn test_export_const_under_commonjs() {
    let output = transform_ok("export const x = 1;", &options(&[Transform::Imports]));
    assert!(output.starts_with("\"use strict\";"), "{output}");
    assert!(
        output.contains("Object.defineProperty(exports, \"__esModule\", {value: true});"),
        "{output}"
    );
    assert!(output.contains("const x = exports.x = 1;"), "{output}");
}

#[test]
fn test_jsx_element_with_prop_and_child() {
    let output = transform_ok("<Foo a=\"b\">{c}</Foo>", &options(&[Transform::Jsx]));
    assert!(output.contains("React.createElement(Foo, {"), "{output}");
    assert!(output.contains("a: \"b\""), "{output}");
    assert!(output.contains("}, c)"), "{output}");
    assert!(!output.contains('<'), "{output}");
}

#[test]
fn test_type_only_import_is_erased() {
    let output = transform_ok(
        "import type {T} from \"m\"; const x: T = y;",
        &options(&[Transform::Typescript]),
    );
    assert!(output.contains("const x = y;"), "{output}");
    assert!(!output.contains("\"m\""), "{output}");
    assert!(!output.contains('T'), "{output}");
}

#[test]
fn test_nullish_assignment_evaluates_target_once() {
    let output = transform_ok("a ??= b;", &TransformOptions::default());
    assert!(output.ends_with("_nullishCoalesce(a, () => (a = b));"), "{output}");
    assert!(output.starts_with(" function _nullishCoalesce("), "{output}");
}

#[test]
fn test_field_initializers_follow_super_call() {
    let code = "class A extends B {\n  x = 1;\n  constructor() {\n    before();\n    super();\n    after();\n  }\n}";
    let output = transform_ok(code, &TransformOptions::default());
    let init = position(&output, "__init.call(this)");
    assert!(position(&output, "before()") < position(&output, "super()"), "{output}");
    assert!(position(&output, "super()") < init, "{output}");
    assert!(init < position(&output, "after()"), "{output}");
    assert_eq!(output.lines().count(), code.lines().count(), "{output}");
}

// =============================================================================
// Source maps
// =============================================================================

#[test]
fn test_no_source_map_unless_requested() {
    let result = transform("let a = 1;", &TransformOptions::default()).unwrap();
    assert!(result.source_map.is_none());
}

#[test]
fn test_source_map_maps_each_line_start() {
    let mut options = options(&[Transform::Typescript, Transform::Imports]);
    options.file_path = Some("src/input.ts".to_string());
    options.source_map_options = Some(SourceMapOptions {
        compiled_filename: "input.js".to_string(),
    });
    let result = transform("import a from 'a';\nconst x: number = a;\nx;", &options).unwrap();
    let map = result.source_map.unwrap();
    assert_eq!(map.version, 3);
    assert_eq!(map.file, "input.js");
    assert_eq!(map.sources, vec!["src/input.ts".to_string()]);
    assert!(map.names.is_empty());
    assert_eq!(map.mappings, "AAAA;AACA;AACA");
}

#[test]
fn test_source_map_leaves_suffix_lines_unmapped() {
    let mut options = options(&[Transform::Jsx, Transform::ReactHotLoader]);
    options.file_path = Some("App.js".to_string());
    options.source_map_options = Some(SourceMapOptions {
        compiled_filename: "App.out.js".to_string(),
    });
    let result = transform("const App = 1;\nexport default App;", &options).unwrap();
    let map = result.source_map.unwrap();
    let segments: Vec<&str> = map.mappings.split(';').collect();
    assert_eq!(segments.len(), result.code.lines().count(), "{}", result.code);
    assert_eq!(&segments[..2], &["AAAA", "AACA"]);
    assert!(segments[2..].iter().all(|segment| segment.is_empty()), "{}", map.mappings);
}

// =============================================================================
// Errors and options
// =============================================================================

#[test]
fn test_syntax_error_reports_location() {
    let err = transform("let a = 1;\nlet b = (2;", &TransformOptions::default()).unwrap_err();
    let location = err.location().unwrap();
    assert_eq!(location.line, 2, "{err}");
}

#[test]
fn test_error_names_file_path() {
    let mut options = TransformOptions::default();
    options.file_path = Some("src/broken.js".to_string());
    let err = transform("let b = (2;", &options).unwrap_err();
    assert!(matches!(err, TransformError::InFile { .. }), "{err:?}");
    assert!(err.to_string().contains("src/broken.js"), "{err}");
    assert!(err.location().is_some());
}

#[test]
fn test_flow_and_typescript_rejected() {
    let err = transform("x;", &options(&[Transform::Flow, Transform::Typescript])).unwrap_err();
    assert!(matches!(err, TransformError::InvalidOptions { .. }), "{err:?}");
}

#[test]
fn test_hot_loader_requires_file_path() {
    let err = transform("x;", &options(&[Transform::ReactHotLoader])).unwrap_err();
    assert!(matches!(err, TransformError::InvalidOptions { .. }), "{err:?}");
}

#[test]
fn test_pragma_with_automatic_runtime_rejected() {
    let mut options = options(&[Transform::Jsx]);
    options.jsx_runtime = JsxRuntime::Automatic;
    options.jsx_pragma = Some("h".to_string());
    let err = transform("<a/>;", &options).unwrap_err();
    assert!(matches!(err, TransformError::UnsupportedCombination { .. }), "{err:?}");
}

#[test]
fn test_options_from_json() {
    let options = TransformOptions::from_json(
        r#"{"transforms": ["typescript", "imports"], "jsxRuntime": "automatic", "production": true}"#,
    )
    .unwrap();
    assert_eq!(options.transforms, vec![Transform::Typescript, Transform::Imports]);
    assert_eq!(options.jsx_runtime, JsxRuntime::Automatic);
    assert!(options.production);
    let output = transform_ok("export const n: number = 1;", &options);
    assert!(output.contains("const n = exports.n = 1;"), "{output}");
}

#[test]
fn test_options_from_json_rejects_unknown_fields() {
    assert!(TransformOptions::from_json(r#"{"transforms": [], "minify": true}"#).is_err());
}

#[test]
fn test_shebang_stays_first() {
    let output = transform_ok("#!/usr/bin/env node\nimport a from 'a';\na();", &options(&[Transform::Imports]));
    assert!(output.starts_with("#!/usr/bin/env node\n\"use strict\";"), "{output}");
}

// =============================================================================
// Batch
// =============================================================================

#[test]
fn test_batch_preserves_order_and_paths() {
    let files: Vec<SourceFile> = (0..32)
        .map(|i| SourceFile::new(format!("src/file{i}.ts"), format!("export const v{i}: number = {i};")))
        .collect();
    let results = transform_batch(&files, &options(&[Transform::Typescript, Transform::Imports]));
    assert_eq!(results.len(), files.len());
    for (i, result) in results.iter().enumerate() {
        let code = &result.as_ref().unwrap().code;
        assert!(code.contains(&format!("const v{i} = exports.v{i} = {i};")), "{code}");
    }
}

#[test]
fn test_batch_errors_carry_their_file() {
    let files = vec![
        SourceFile::new("ok.js", "let a = 1;"),
        SourceFile::new("bad.js", "let a = (1;"),
    ];
    let results = transform_batch(&files, &TransformOptions::default());
    assert!(results[0].is_ok());
    let err = results[1].as_ref().unwrap_err();
    assert!(err.to_string().contains("bad.js"), "{err}");
}
