//! Tests for the ES syntax rewrites: optional chaining, nullish coalescing,
//! logical assignment, numeric separators and optional catch bindings.

use zest_common::{Transform, TransformOptions};
use zest_emitter::RootTransformer;

fn transform_with(code: &str, options: &TransformOptions) -> String {
    match RootTransformer::transform(code, options) {
        Ok(output) => output.code,
        Err(err) => panic!("transform failed for {code:?}: {err}"),
    }
}

fn transform(code: &str) -> String {
    transform_with(code, &TransformOptions::new(&[]))
}

#[test]
fn test_nullish_assign_on_variable() {
    let output = transform("a ??= b;");
    assert!(output.ends_with("_nullishCoalesce(a, () => (a = b));"), "{output}");
    assert!(output.contains("function _nullishCoalesce("));
}

#[test]
fn test_or_and_assign_on_variable() {
    assert_eq!(transform("a ||= b;"), "a || (a = b);");
    assert_eq!(transform("a &&= b;"), "a && (a = b);");
}

#[test]
fn test_logical_assign_on_member_uses_helper() {
    let output = transform("obj.a ||= b;");
    assert!(output.contains("_logicalAssign(obj, 'a', '||=', () => ("), "{output}");
    assert!(output.contains("function _logicalAssign("));
}

#[test]
fn test_optional_member_access() {
    let output = transform("a?.b;");
    assert!(
        output.ends_with("_optionalChain([a, 'optionalAccess', _ => _.b]);"),
        "{output}"
    );
}

#[test]
fn test_optional_chain_with_call() {
    let output = transform("a?.b();");
    assert!(
        output.contains("_optionalChain([a, 'optionalAccess', _ => _.b, 'call', _2 => _2()])"),
        "{output}"
    );
}

#[test]
fn test_nullish_coalescing() {
    let output = transform("const c = a ?? b;");
    assert!(output.ends_with("const c = _nullishCoalesce(a, () => ( b));"), "{output}");
}

#[test]
fn test_nullish_with_await_uses_async_helper() {
    let output = transform("async function f() { return a ?? await b; }");
    assert!(output.contains("await _asyncNullishCoalesce(a, async () => ("), "{output}");
}

#[test]
fn test_numeric_separators_are_removed() {
    assert_eq!(transform("const n = 1_000_000;"), "const n = 1000000;");
}

#[test]
fn test_optional_catch_binding_gets_a_name() {
    assert_eq!(
        transform("try { f(); } catch { g(); }"),
        "try { f(); } catch (e) { g(); }"
    );
}

#[test]
fn test_optional_catch_binding_avoids_used_names() {
    let output = transform("const e = 1; try {} catch {}");
    assert!(output.contains("catch (e2)"), "{output}");
}

#[test]
fn test_disabled_es_transforms_pass_through() {
    let mut options = TransformOptions::new(&[]);
    options.disable_es_transforms = true;
    let code = "const x = a?.b ?? c; y ||= 1; const n = 1_000; try {} catch {}";
    assert_eq!(transform_with(code, &options), code);
}

#[test]
fn test_line_count_is_preserved() {
    let code = "const a = x?.y\n  ?.z;\nconst b = c\n  ?? d;\n";
    let output = transform_with(code, &TransformOptions::new(&[Transform::Typescript]));
    assert_eq!(output.lines().count(), code.lines().count(), "{output}");
}
