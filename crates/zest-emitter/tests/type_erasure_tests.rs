//! Tests for TypeScript and Flow type erasure and enum lowering.

use zest_common::{Transform, TransformError, TransformOptions};
use zest_emitter::RootTransformer;

fn transform(code: &str, transforms: &[Transform]) -> String {
    match RootTransformer::transform(code, &TransformOptions::new(transforms)) {
        Ok(output) => output.code,
        Err(err) => panic!("transform failed for {code:?}: {err}"),
    }
}

fn ts(code: &str) -> String {
    transform(code, &[Transform::Typescript])
}

fn flow(code: &str) -> String {
    transform(code, &[Transform::Flow])
}

#[test]
fn test_variable_annotation() {
    assert_eq!(ts("const x: number = 1;"), "const x = 1;");
}

#[test]
fn test_parameter_and_return_annotations() {
    assert_eq!(ts("function f(a?: number): void {}"), "function f(a) {}");
}

#[test]
fn test_arrow_return_type() {
    assert_eq!(ts("const f = (a: string): number => 1;"), "const f = (a) => 1;");
}

#[test]
fn test_interface_keeps_lines() {
    assert_eq!(ts("interface A {\n  a: string;\n}\nconst b = 1;"), "\n\n\nconst b = 1;");
}

#[test]
fn test_type_only_import_is_removed() {
    let output = ts("import type {T} from \"m\"; const x: T = y;");
    assert_eq!(output.trim(), "const x = y;");
    assert!(!output.contains("\"m\""));
}

#[test]
fn test_unused_import_binding_is_elided() {
    let output = ts("import {A, b} from \"m\"; b(); let x: A;");
    assert!(output.contains("import { b} from \"m\";"), "{output}");
}

#[test]
fn test_jsx_pragma_imports_count_as_used() {
    let mut options = TransformOptions::new(&[Transform::Typescript, Transform::Jsx]);
    options.jsx_pragma = Some("h".to_string());
    options.jsx_fragment_pragma = Some("Frag".to_string());
    options.production = true;
    let output = match RootTransformer::transform("import {h, Frag} from 'p';\nconst el = <><div /></>;", &options) {
        Ok(output) => output.code,
        Err(err) => panic!("transform failed: {err}"),
    };
    assert!(output.contains("import {h, Frag} from 'p';"), "{output}");
    assert!(output.contains("h(Frag, null"), "{output}");
}

#[test]
fn test_keep_unused_imports() {
    let mut options = TransformOptions::new(&[Transform::Typescript]);
    options.keep_unused_imports = true;
    let output = match RootTransformer::transform("import {A} from \"m\"; let x: A;", &options) {
        Ok(output) => output.code,
        Err(err) => panic!("transform failed: {err}"),
    };
    assert!(output.contains("import {A} from \"m\";"), "{output}");
}

#[test]
fn test_non_null_assertion() {
    assert_eq!(ts("let a = b!;"), "let a = b;");
}

#[test]
fn test_as_expression() {
    assert_eq!(ts("const a = b as string;"), "const a = b ;");
}

#[test]
fn test_declare_and_type_exports_are_removed() {
    let output = ts("declare const x: number;\nexport type {A};\nexport type B = string;\nlet y;");
    assert_eq!(output.trim(), "let y;");
}

#[test]
fn test_enum_lowering() {
    assert_eq!(
        ts("enum E {A, B = 5, C}"),
        "var E; (function (E) {const A = 0; E[E[\"A\"] = A] = \"A\"; const B = 5; E[E[\"B\"] = B] = \"B\"; const C = B + 1; E[E[\"C\"] = C] = \"C\";})(E || (E = {}));"
    );
}

#[test]
fn test_string_enum_members_are_not_reverse_mapped() {
    let output = ts("enum S {A = \"a\"}");
    assert!(output.contains("const A = \"a\"; S[\"A\"] = A;"), "{output}");
    assert!(!output.contains("S[S["), "{output}");
}

#[test]
fn test_non_identifier_enum_member_is_inlined() {
    let output = ts("enum E {\"a-b\", C}");
    assert!(output.contains("E[E[\"a-b\"] = 0] = \"a-b\";"), "{output}");
    assert!(output.contains("const C = E[\"a-b\"] + 1;"), "{output}");
}

#[test]
fn test_exported_enum_under_commonjs() {
    let output = transform("export enum E {A}", &[Transform::Typescript, Transform::Imports]);
    assert!(output.contains("})(E || (exports.E = E = {}));"), "{output}");
}

#[test]
fn test_access_modifiers_are_removed() {
    let output = ts("class A { private a() {} public static b() {} protected readonly c = 1; }");
    assert!(!output.contains("private"), "{output}");
    assert!(!output.contains("public"), "{output}");
    assert!(!output.contains("protected"), "{output}");
    assert!(!output.contains("readonly"), "{output}");
}

#[test]
fn test_implements_clause_is_removed() {
    let output = ts("class A implements B, C {}");
    assert!(!output.contains("implements"), "{output}");
    assert!(output.contains("class A"), "{output}");
}

#[test]
fn test_instantiated_namespace_is_rejected() {
    let result = RootTransformer::transform(
        "namespace N { export const a = 1; }",
        &TransformOptions::new(&[Transform::Typescript]),
    );
    assert!(
        matches!(result, Err(TransformError::UnsupportedCombination { .. })),
        "{result:?}"
    );
}

#[test]
fn test_type_only_namespace_is_erased() {
    assert_eq!(ts("namespace N { export type A = string; }\nlet a;").trim(), "let a;");
}

#[test]
fn test_flow_annotations() {
    assert_eq!(flow("function f(a: number): string {}"), "function f(a) {}");
}

#[test]
fn test_flow_pragma_comment_is_stripped() {
    assert_eq!(flow("// @flow\nlet a;"), "// \nlet a;");
}

#[test]
fn test_flow_type_import_is_removed() {
    let output = flow("import type {T} from 'types';\nlet a;");
    assert!(!output.contains("types"), "{output}");
}
