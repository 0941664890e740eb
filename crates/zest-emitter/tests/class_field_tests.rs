//! Tests for class-field desugaring and TypeScript parameter properties.

use zest_common::{Transform, TransformOptions};
use zest_emitter::RootTransformer;

fn transform(code: &str, transforms: &[Transform]) -> String {
    match RootTransformer::transform(code, &TransformOptions::new(transforms)) {
        Ok(output) => output.code,
        Err(err) => panic!("transform failed for {code:?}: {err}"),
    }
}

fn position(output: &str, needle: &str) -> usize {
    match output.find(needle) {
        Some(position) => position,
        None => panic!("{needle:?} not found in {output:?}"),
    }
}

#[test]
fn test_initializer_runs_right_after_super_call() {
    let code = "class A extends B { x = 1; constructor() { foo(); super(); bar(); } }";
    let output = transform(code, &[]);
    let super_call = position(&output, "super()");
    let init_call = position(&output, "A.prototype.__init.call(this)");
    assert!(position(&output, "foo()") < super_call, "{output}");
    assert!(super_call < init_call, "{output}");
    assert!(init_call < position(&output, "bar()"), "{output}");
}

#[test]
fn test_initializer_becomes_method() {
    let output = transform("class A { x = 1; }", &[]);
    assert!(output.contains("__init() {this.x = 1"), "{output}");
    assert!(output.contains("constructor() { A.prototype.__init.call(this); }"), "{output}");
}

#[test]
fn test_constructor_without_super_gets_initializers_first() {
    let output = transform("class A { x = 1; constructor() { foo(); } }", &[]);
    let init_call = position(&output, "A.prototype.__init.call(this)");
    assert!(init_call < position(&output, "foo()"), "{output}");
}

#[test]
fn test_subclass_gets_forwarding_constructor() {
    let output = transform("class A extends B { x = 1; }", &[]);
    assert!(
        output.contains("constructor(...args) { super(...args); A.prototype.__init.call(this); }"),
        "{output}"
    );
}

#[test]
fn test_static_initializer_follows_class() {
    let output = transform("class A { static s = 2; }", &[]);
    assert!(output.contains("__initStatic() {this.s = 2"), "{output}");
    assert!(output.ends_with("} A.__initStatic();"), "{output}");
}

#[test]
fn test_class_expression_with_fields_uses_comma_expression() {
    let output = transform("const C = class { x = 1; };", &[]);
    assert!(output.contains("var _class;"), "{output}");
    assert!(output.contains("(_class = class {"), "{output}");
}

#[test]
fn test_declared_only_fields_are_erased() {
    let output = transform("class A { x: number; y = 2; }", &[Transform::Typescript]);
    assert!(!output.contains("x:"), "{output}");
    assert!(!output.contains("this.x"), "{output}");
    assert!(output.contains("this.y = 2"), "{output}");
}

#[test]
fn test_parameter_properties_assign_fields() {
    let output = transform(
        "class A { constructor(private x: number, readonly y) {} }",
        &[Transform::Typescript],
    );
    assert!(output.contains("this.x = x"), "{output}");
    assert!(output.contains("this.y = y"), "{output}");
    assert!(!output.contains("private"), "{output}");
}

#[test]
fn test_field_lines_are_preserved() {
    let code = "class A {\n  x = 1;\n  y =\n    2;\n  m() {}\n}\n";
    let output = transform(code, &[]);
    assert_eq!(output.lines().count(), code.lines().count(), "{output}");
}
