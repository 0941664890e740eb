//! Tests for the CommonJS module rewrite: load statements, binding
//! substitution, export forms and dynamic import.

use zest_common::{Transform, TransformError, TransformOptions};
use zest_emitter::RootTransformer;

fn transform_with(code: &str, options: &TransformOptions) -> String {
    match RootTransformer::transform(code, options) {
        Ok(output) => output.code,
        Err(err) => panic!("transform failed for {code:?}: {err}"),
    }
}

fn transform(code: &str) -> String {
    transform_with(code, &TransformOptions::new(&[Transform::Imports]))
}

const ES_MODULE_MARKER: &str = "Object.defineProperty(exports, \"__esModule\", {value: true});";

#[test]
fn test_default_import_uses_interop_and_call_form() {
    let output = transform("import a from 'a';\na();");
    assert!(output.starts_with("\"use strict\";"), "{output}");
    assert!(
        output.contains("var _a = require('a'); var _a2 = _interopRequireDefault(_a);"),
        "{output}"
    );
    assert!(output.contains("(0, _a2.default)();"), "{output}");
}

#[test]
fn test_named_import_member_access() {
    let output = transform("import {b} from 'm';\nconst c = b.d;");
    assert!(output.contains("var _m = require('m');"), "{output}");
    assert!(output.contains("const c = _m.b.d;"), "{output}");
}

#[test]
fn test_namespace_import() {
    let output = transform("import * as ns from 'm';\nns.f;");
    assert!(output.contains("var ns = _interopRequireWildcard(_m);"), "{output}");
}

#[test]
fn test_each_module_is_loaded_once() {
    let output = transform("import {a} from 'm';\nimport {b} from 'm';\na(b);");
    assert_eq!(output.matches("require('m')").count(), 1, "{output}");
}

#[test]
fn test_side_effect_import() {
    let output = transform("import 'polyfill';");
    assert!(output.contains("require('polyfill');"), "{output}");
}

#[test]
fn test_shadowed_binding_is_not_replaced() {
    let output = transform("import {a} from 'm';\nfunction f(a) { return a; }\na;");
    assert!(output.contains("function f(a) { return a; }"), "{output}");
    assert!(output.contains("_m.a;"), "{output}");
}

fn assert_shadowed(code: &str, kept: &str) {
    let output = transform(code);
    assert!(output.contains(kept), "{output}");
    assert!(output.ends_with("\n_m.a;"), "{output}");
}

#[test]
fn test_arrow_param_shadows_import() {
    assert_shadowed("import {a} from 'm';\nconst g = (a) => a;\na;", "const g = (a) => a;");
}

#[test]
fn test_loop_binding_shadows_import() {
    assert_shadowed("import {a} from 'm';\nfor (let a of b) a;\na;", "for (let a of b) a;");
}

#[test]
fn test_block_const_shadows_import() {
    assert_shadowed(
        "import {a} from 'm';\nfor (const x of b) {\n  const a = x;\n  a;\n}\na;",
        "  const a = x;\n  a;\n}",
    );
}

#[test]
fn test_catch_param_shadows_import() {
    assert_shadowed("import {a} from 'm';\ntry {} catch (a) { a; }\na;", "catch (a) { a; }");
}

#[test]
fn test_nested_class_shadows_import() {
    assert_shadowed(
        "import {a} from 'm';\nfunction h() { class a {} return a; }\na;",
        "class a {} return a; }",
    );
}

#[test]
fn test_nested_function_shadows_import() {
    assert_shadowed(
        "import {a} from 'm';\nfunction h() { function a() {} return a; }\na;",
        "function a() {} return a; }",
    );
}

#[test]
fn test_default_and_namespace_imports_are_shadowed_too() {
    let output = transform("import d, * as ns from 'm';\nfunction f(d, ns) { return d(ns); }\nd(ns);");
    assert!(output.contains("function f(d, ns) { return d(ns); }"), "{output}");
    assert!(!output.ends_with("\nd(ns);"), "{output}");
}

#[test]
fn test_object_shorthand_is_expanded() {
    let output = transform("import {a} from 'm';\nconst o = {a};");
    assert!(output.contains("const o = {a: _m.a};"), "{output}");
}

#[test]
fn test_export_const() {
    let output = transform("export const x = 1;");
    assert!(output.starts_with(&format!("\"use strict\";{ES_MODULE_MARKER}")), "{output}");
    assert!(output.contains("const x = exports.x = 1;"), "{output}");
}

#[test]
fn test_export_function_and_class() {
    let output = transform("export function f() {}\nexport class C {}");
    assert!(output.contains("function f() {} exports.f = f;"), "{output}");
    assert!(output.contains("class C {} exports.C = C;"), "{output}");
}

#[test]
fn test_export_default_expression() {
    let output = transform("export default 5;");
    assert!(output.contains("exports. default = 5;"), "{output}");
}

#[test]
fn test_export_default_named_function() {
    let output = transform("export default function f() {}");
    assert!(output.contains("function f() {} exports.default = f;"), "{output}");
}

#[test]
fn test_export_list() {
    let output = transform("const a = 1, b = 2;\nexport {a, b as c};");
    assert!(output.contains("exports.a = a"), "{output}");
    assert!(output.contains("exports.c = b"), "{output}");
}

#[test]
fn test_reassigned_export_updates_binding() {
    let output = transform("export let x = 1;\nx = 2;\nx += 3;");
    assert!(output.contains("x = exports.x = 2;"), "{output}");
    assert!(output.contains("x = exports.x += 3;"), "{output}");
}

#[test]
fn test_postfix_update_of_export() {
    let output = transform("export let x = 1;\nx++;");
    assert!(output.contains("(x = exports.x = x + 1, x - 1)"), "{output}");
}

#[test]
fn test_export_star() {
    let output = transform("export * from 'm';");
    assert!(output.contains("_createStarExport(_m);"), "{output}");
}

#[test]
fn test_dynamic_import() {
    let output = transform("const m = import('m');");
    assert!(
        output.contains("Promise.resolve().then(() => _interopRequireWildcard(require('m')))"),
        "{output}"
    );
}

#[test]
fn test_preserved_dynamic_import() {
    let mut options = TransformOptions::new(&[Transform::Imports]);
    options.preserve_dynamic_import = true;
    let output = transform_with("const m = import('m');", &options);
    assert!(output.contains("const m = import('m');"), "{output}");
}

#[test]
fn test_babel5_interop_suffix() {
    let mut options = TransformOptions::new(&[Transform::Imports]);
    options.enable_legacy_babel5_module_interop = true;
    let output = transform_with("export default 1;", &options);
    assert!(output.ends_with("\nmodule.exports = exports.default;\n"), "{output}");
}

#[test]
fn test_type_only_imports_are_elided_under_typescript() {
    let options = TransformOptions::new(&[Transform::Imports, Transform::Typescript]);
    let output = transform_with("import {T} from 'types';\nlet x: T;", &options);
    assert!(!output.contains("require('types')"), "{output}");
}

#[test]
fn test_decorator_before_export_is_rejected() {
    let options = TransformOptions::new(&[Transform::Imports, Transform::Typescript]);
    let result = RootTransformer::transform("@dec\nexport class A {}", &options);
    assert!(
        matches!(result, Err(TransformError::UnsupportedCombination { .. })),
        "{result:?}"
    );
}

#[test]
fn test_line_count_is_preserved() {
    let code = "import a from 'a';\nimport {b,\n  c} from 'b';\nexport const d = a(b, c);\nexport default d;\n";
    let output = transform(code);
    assert_eq!(output.lines().count(), code.lines().count(), "{output}");
}
