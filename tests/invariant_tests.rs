//! Tests for the properties every transform must hold: line layout,
//! passthrough of plain code, load-statement claiming and fresh-name
//! uniqueness.

use rustc_hash::FxHashSet;
use zest::{JsxRuntime, Transform, TransformOptions, transform};
use zest_common::count_newlines;
use zest_emitter::RootTransformer;

const FEATURE_SETS: &[&[Transform]] = &[
    &[],
    &[Transform::Imports],
    &[Transform::Typescript],
    &[Transform::Typescript, Transform::Imports],
    &[Transform::Jsx],
    &[Transform::Jsx, Transform::Imports],
    &[Transform::Jsx, Transform::Typescript, Transform::Imports],
    &[Transform::Flow, Transform::Imports],
    &[Transform::Jest, Transform::Imports],
];

/// Inputs that every feature set above can parse.
const PORTABLE_INPUTS: &[&str] = &[
    "import a from 'a';\nimport {b,\n  c} from 'b';\n\nexport const d = a(b,\n  c);\n",
    "a ??= b;\nx?.y\n  ?.z(1,\n    2);\nconst n = 1_000_000;\ntry {\n  f();\n} catch {\n}\n",
    "class A extends B {\n  x = 1;\n  static y =\n    2;\n  constructor() {\n    super();\n  }\n}\n",
    "export default function () {\n  return `a\n${b}\nc`;\n}\n/* multi\n   line */\nexport {e as f};\n",
    "const r = /a\\/b/g;\nconst s = 'x' + \"y\";\nlet o = {a, b: c, [d]: e,\n  ...f};\n",
];

const TYPESCRIPT_INPUTS: &[&str] = &[
    "import type {T} from 't';\nimport {U} from 'u';\ninterface I {\n  a: T;\n  b: U;\n}\nlet v: I;\n",
    "enum E {\n  A,\n  B = 2,\n  C\n}\nexport enum F {\n  X = 'x'\n}\n",
    "class P {\n  constructor(\n    private a: number,\n    public b = 2,\n  ) {}\n  declare c: string;\n}\n",
    "function f<T>(\n  a: T,\n  b?: string,\n): T {\n  return a!;\n}\ntype Q = {\n  a: 1\n};\nconst q = {} as Q;\n",
];

const JSX_INPUTS: &[&str] = &[
    "const el = (\n  <div className=\"a\"\n    id={b}>\n    text\n    {c}\n    <span {...d} />\n  </div>\n);\n",
    "const f = <>\n  <A.B c=\"d\" />\n  &amp; more\n</>;\n",
];

fn options(transforms: &[Transform]) -> TransformOptions {
    TransformOptions::new(transforms)
}

fn body_line_count(code: &str, options: &TransformOptions) -> usize {
    match RootTransformer::transform(code, options) {
        Ok(output) => output.body_line_count,
        Err(err) => panic!("transform failed for {code:?} with {:?}: {err}", options.transforms),
    }
}

fn transform_ok(code: &str, options: &TransformOptions) -> String {
    match transform(code, options) {
        Ok(result) => result.code,
        Err(err) => panic!("transform failed for {code:?}: {err}"),
    }
}

fn identifiers(code: &str) -> FxHashSet<String> {
    code.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '$'))
        .filter(|word| word.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_' || c == '$'))
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Line layout
// =============================================================================

#[test]
fn test_body_keeps_line_count_for_portable_inputs() {
    for transforms in FEATURE_SETS {
        for code in PORTABLE_INPUTS {
            let expected = count_newlines(code) + 1;
            assert_eq!(body_line_count(code, &options(transforms)), expected, "{code:?} {transforms:?}");
        }
    }
}

#[test]
fn test_body_keeps_line_count_for_typescript() {
    for transforms in [&[Transform::Typescript][..], &[Transform::Typescript, Transform::Imports]] {
        for code in TYPESCRIPT_INPUTS {
            let expected = count_newlines(code) + 1;
            assert_eq!(body_line_count(code, &options(transforms)), expected, "{code:?} {transforms:?}");
        }
    }
}

#[test]
fn test_body_keeps_line_count_for_jsx_runtimes() {
    for runtime in [JsxRuntime::Classic, JsxRuntime::Automatic, JsxRuntime::Preserve] {
        for production in [false, true] {
            let mut options = options(&[Transform::Jsx, Transform::Imports]);
            options.jsx_runtime = runtime;
            options.production = production;
            for code in JSX_INPUTS {
                let expected = count_newlines(code) + 1;
                assert_eq!(body_line_count(code, &options), expected, "{code:?} {runtime:?}");
            }
        }
    }
}

#[test]
fn test_whole_output_keeps_line_count_without_suffixes() {
    let options = options(&[Transform::Typescript, Transform::Imports]);
    for code in PORTABLE_INPUTS.iter().chain(TYPESCRIPT_INPUTS) {
        let output = transform_ok(code, &options);
        assert_eq!(count_newlines(&output), count_newlines(code), "{code:?}\n{output}");
    }
}

// =============================================================================
// Passthrough
// =============================================================================

#[test]
fn test_plain_code_passes_through_unchanged() {
    let mut options = TransformOptions::default();
    options.disable_es_transforms = true;
    let inputs = [
        "",
        "\n\n",
        "// just a comment\n",
        "function add(a, b) {\n  return a + b; // sum\n}\n",
        "const o = {a: 1, 'b': [2, 3], c() { return this.a; }};\nlabel: for (const k in o) {\n  if (!k) continue label;\n}\n",
        "class A extends B {\n  static m() {}\n  get x() { return 1; }\n}\nnew A();\n",
        "import a, {b as c} from 'a';\nexport {c};\nexport default a;\n",
        "const t = `x${y}z`;\nconst r = a / b / /re/i.test(c);\n",
        "async function* g() {\n  yield* await h();\n}\n",
    ];
    for code in inputs {
        assert_eq!(transform_ok(code, &options), code);
    }
}

#[test]
fn test_unrecognized_modern_syntax_passes_through_with_es_transforms_disabled() {
    let mut options = TransformOptions::default();
    options.disable_es_transforms = true;
    let code = "a ??= b;\nx?.y;\nconst n = 1_000;\ntry {} catch {}\nclass A { x = 1; }\n";
    assert_eq!(transform_ok(code, &options), code);
}

// =============================================================================
// Load statements
// =============================================================================

#[test]
fn test_load_statements_exactly_for_value_uses() {
    let code = "import a from 'used';\nimport {T} from 'types-only';\nimport {unused} from 'unused';\nimport 'side-effect';\nexport {r} from 'reexported';\nexport * from 'star';\nconst x: T = a();\n";
    let output = transform_ok(code, &options(&[Transform::Typescript, Transform::Imports]));
    for path in ["used", "side-effect", "reexported", "star"] {
        assert_eq!(output.matches(&format!("require('{path}')")).count(), 1, "{path}\n{output}");
    }
    for path in ["types-only", "unused"] {
        assert!(!output.contains(path), "{path}\n{output}");
    }
}

#[test]
fn test_repeated_path_loaded_once() {
    let code = "import {a} from 'm';\nimport {b} from 'm';\nimport c from 'm';\na(b, c);\n";
    let output = transform_ok(code, &options(&[Transform::Imports]));
    assert_eq!(output.matches("require('m')").count(), 1, "{output}");
}

#[test]
fn test_keep_unused_imports_loads_everything() {
    let mut options = options(&[Transform::Typescript, Transform::Imports]);
    options.keep_unused_imports = true;
    let output = transform_ok("import {unused} from 'unused';\n", &options);
    assert_eq!(output.matches("require('unused')").count(), 1, "{output}");
}

// =============================================================================
// Fresh names
// =============================================================================

#[test]
fn test_generated_names_avoid_existing_identifiers() {
    let code = "import a from 'a';\nconst _a = 1, _a2 = 2;\na(_a, _a2);\n";
    let output = transform_ok(code, &options(&[Transform::Imports]));
    assert!(output.contains("var _a3 = require('a'); var _a4 = _interopRequireDefault(_a3);"), "{output}");
    assert!(output.contains("(0, _a4.default)(_a, _a2);"), "{output}");
}

#[test]
fn test_helper_names_avoid_existing_identifiers() {
    let code = "const _nullishCoalesce = 1;\nx ?? y;\n";
    let output = transform_ok(code, &TransformOptions::default());
    assert!(output.contains("function _nullishCoalesce2("), "{output}");
    assert!(output.contains("_nullishCoalesce2(x, () => ( y))"), "{output}");
}

#[test]
fn test_generated_declarations_are_distinct_and_fresh() {
    let code = "import a from 'a';\nimport * as b from 'b';\nimport {c} from 'c';\nconst _b = 0;\nexport const v = a?.x ?? b[c];\n";
    let input_names = identifiers(code);
    let output = transform_ok(code, &options(&[Transform::Imports]));
    let mut declared = Vec::new();
    for piece in output.split("var ").skip(1).chain(output.split("function ").skip(1)) {
        let name: String = piece
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '$')
            .collect();
        // Fresh names all start with `_`; the rest are bindings from the input.
        if name.starts_with('_') {
            declared.push(name);
        }
    }
    let unique: FxHashSet<&String> = declared.iter().collect();
    assert_eq!(unique.len(), declared.len(), "{declared:?}\n{output}");
    for name in &declared {
        assert!(!input_names.contains(name), "{name} already exists in the input\n{output}");
    }
}
