//! Tests for JSX lowering in the classic and automatic runtimes.

use zest_common::{JsxRuntime, Transform, TransformOptions};
use zest_emitter::RootTransformer;

fn transform_with(code: &str, options: &TransformOptions) -> String {
    match RootTransformer::transform(code, options) {
        Ok(output) => output.code,
        Err(err) => panic!("transform failed for {code:?}: {err}"),
    }
}

fn production_options(runtime: JsxRuntime) -> TransformOptions {
    let mut options = TransformOptions::new(&[Transform::Jsx]);
    options.jsx_runtime = runtime;
    options.production = true;
    options
}

fn classic(code: &str) -> String {
    transform_with(code, &production_options(JsxRuntime::Classic))
}

fn automatic(code: &str) -> String {
    transform_with(code, &production_options(JsxRuntime::Automatic))
}

#[test]
fn test_element_with_prop_and_child() {
    assert_eq!(
        classic("const el = <Foo a=\"b\">{c}</Foo>;"),
        "const el = React.createElement(Foo, { a: \"b\",}, c);"
    );
}

#[test]
fn test_fragment_with_text() {
    assert_eq!(
        classic("const el = <>a</>;"),
        "const el = React.createElement(React.Fragment, null, \"a\");"
    );
}

#[test]
fn test_intrinsic_and_dashed_names_become_strings() {
    let output = classic("const el = <my-el data-x=\"1\" />;");
    assert!(output.contains("React.createElement('my-el', { 'data-x': \"1\",}"), "{output}");
}

#[test]
fn test_spread_and_boolean_props() {
    let output = classic("const el = <A {...p} b />;");
    assert!(output.contains("React.createElement(A, { ...p, b: true,}"), "{output}");
}

#[test]
fn test_member_tag_name() {
    let output = classic("const el = <a.B />;");
    assert!(output.contains("React.createElement(a.B, null"), "{output}");
}

#[test]
fn test_entities_are_decoded() {
    let output = classic("const el = <b>&lt;&amp;&#65;</b>;");
    assert!(output.contains("\"<&A\""), "{output}");
}

#[test]
fn test_multiline_text_keeps_lines() {
    let code = "const el = (\n  <div>\n    hello\n    world\n  </div>\n);\n";
    let output = classic(code);
    assert!(output.contains("\"hello world\""), "{output}");
    assert_eq!(output.lines().count(), code.lines().count(), "{output}");
}

#[test]
fn test_pragma_options() {
    let mut options = production_options(JsxRuntime::Classic);
    options.jsx_pragma = Some("h".to_string());
    options.jsx_fragment_pragma = Some("Frag".to_string());
    let output = transform_with("const el = <><div /></>;", &options);
    assert!(output.contains("h(Frag, null, h('div', null"), "{output}");
}

#[test]
fn test_comment_pragma() {
    let output = classic("/** @jsx h */\nconst el = <div />;");
    assert!(output.contains("h('div', null"), "{output}");
}

#[test]
fn test_development_source_info() {
    let mut options = TransformOptions::new(&[Transform::Jsx]);
    options.file_path = Some("a.js".to_string());
    let output = transform_with("\nconst el = <div />;", &options);
    assert!(output.starts_with("const _jsxFileName = \"a.js\";"), "{output}");
    assert!(
        output.contains("__self: this, __source: {fileName: _jsxFileName, lineNumber: 2}"),
        "{output}"
    );
}

#[test]
fn test_automatic_runtime_static_children() {
    assert_eq!(
        automatic("const el = <div>{a}{b}</div>;"),
        "import {jsxs as _jsxs} from \"react/jsx-runtime\";const el = _jsxs('div', { children: [a, b]});"
    );
}

#[test]
fn test_automatic_runtime_single_child() {
    let output = automatic("const el = <p>hi</p>;");
    assert!(output.contains("_jsx('p', { children: \"hi\"})"), "{output}");
}

#[test]
fn test_automatic_runtime_moves_key() {
    let output = automatic("const el = <div key=\"k\" a={1} />;");
    assert!(output.contains("_jsx('div', { a: 1,}, \"k\""), "{output}");
}

#[test]
fn test_automatic_runtime_with_commonjs() {
    let mut options = production_options(JsxRuntime::Automatic);
    options.transforms.push(Transform::Imports);
    let output = transform_with("export const el = <div />;", &options);
    assert!(output.contains("var _jsxruntime = require(\"react/jsx-runtime\");"), "{output}");
    assert!(output.contains("_jsxruntime.jsx.call(void 0, 'div'"), "{output}");
}

#[test]
fn test_classic_runtime_with_commonjs_react_import() {
    let mut options = production_options(JsxRuntime::Classic);
    options.transforms.push(Transform::Imports);
    let output = transform_with("import React from 'react';\nconst el = <div />;", &options);
    assert!(output.contains(".default.createElement('div'"), "{output}");
}

#[test]
fn test_display_name_is_inferred() {
    let output = classic("const Foo = React.createClass({render() {}});");
    assert!(output.contains("React.createClass({displayName: 'Foo',"), "{output}");
}

#[test]
fn test_existing_display_name_is_kept() {
    let code = "const Foo = createReactClass({displayName: 'Bar'});";
    assert_eq!(classic(code), code);
}
