// File: tests/language.rs
//
// End-to-end tests driving the public API: source text in, printed
// value out, the way the CLI uses the library.

use std::path::Path;

use rix::interpreter::AttrMap;
use rix::{eval_str, Value};

fn eval(src: &str) -> Value {
    eval_str(src, Path::new(".")).unwrap_or_else(|e| panic!("eval of {:?} failed: {}", src, e))
}

fn prints(src: &str, expected: &str) {
    assert_eq!(eval(src).to_string(), expected, "input: {:?}", src);
}

fn fails(src: &str) {
    assert!(
        eval_str(src, Path::new(".")).is_err(),
        "expected {:?} to fail",
        src
    );
}

fn attrs_of(value: Value) -> AttrMap {
    match value {
        Value::Attrs(map) => (*map).clone(),
        other => panic!("expected an attribute set, got {}", other),
    }
}

#[test]
fn arithmetic_with_precedence() {
    prints("1 + 2 * 3", "7");
    prints("(1 + 2) * 3", "9");
    prints("10 - 2 - 3", "5");
    prints("1 / 2", "0.5");
}

#[test]
fn let_bindings() {
    prints("let x = 5; y = 10; in x + y", "15");
    prints("let x = 2; y = x * x; in y", "4");
}

#[test]
fn curried_user_functions() {
    prints("(x: y: x + y) 10 20", "30");
    prints("let add = x: y: x + y; inc = add 1; in inc 41", "42");
}

#[test]
fn recursive_attribute_sets() {
    prints("rec { x = 1; y = x + 1; }", "{ x = 1; y = 2; }");
    prints("rec { a = 1; b = a + 1; c = b + 1; }.c", "3");
}

#[test]
fn attribute_update() {
    prints(
        "{ a = 1; b = 2; } // { b = 3; c = 4; }",
        "{ a = 1; b = 3; c = 4; }",
    );
}

#[test]
fn conditional_strings() {
    prints(r#"if 1 < 2 then "yes" else "no""#, r#""yes""#);
}

#[test]
fn derivation_produces_a_store_path() {
    let result = attrs_of(eval(r#"derivation { name = "hello"; builder = "/bin/sh"; }"#));

    for key in ["name", "builder", "system", "args", "drvPath", "outputs", "out"] {
        assert!(result.contains_key(key), "missing key {}", key);
    }

    match result.get("drvPath") {
        Some(Value::Str(path)) => assert!(path.ends_with(".drv")),
        other => panic!("drvPath should be a string, got {:?}", other),
    }

    match result.get("out") {
        Some(Value::Str(out)) => {
            let rest = out
                .strip_prefix("/nix/store/")
                .unwrap_or_else(|| panic!("out {:?} missing store prefix", out));
            let (hash, name) = rest.split_once('-').expect("hash-name separator");
            assert_eq!(hash.len(), 32);
            assert!(hash
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
            assert!(name.starts_with("hello"));
        }
        other => panic!("out should be a string, got {:?}", other),
    }
}

#[test]
fn derivation_keeps_its_inputs_and_is_deterministic() {
    let src = r#"derivation { name = "hello"; builder = "/bin/sh"; GREETING = "hi"; }"#;
    let first = attrs_of(eval(src));
    let second = attrs_of(eval(src));

    assert_eq!(first.get("GREETING"), Some(&Value::string("hi")));
    assert_eq!(first.get("drvPath"), second.get("drvPath"));
    assert_eq!(first.get("out"), second.get("out"));
    assert_eq!(first.get("system"), Some(&Value::string("x86_64-linux")));
}

#[test]
fn printed_values_reparse_to_equal_values() {
    // Holds for every value except functions and built-ins
    let samples = [
        "null",
        "true",
        "false",
        "42",
        "-7",
        "3.14",
        "2.0",
        r#""hello""#,
        r#""he\"llo \n tab\t""#,
        "/bin/sh",
        "[ 1 2 3 ]",
        "[ ]",
        "{ }",
        r#"{ a = 1; b = "x"; c = [ true null ]; }"#,
        "{ a = { b = { c = 7; }; }; }",
    ];
    for src in samples {
        let value = eval(src);
        let reparsed = eval(&value.to_string());
        assert_eq!(value, reparsed, "round trip failed for {:?}", src);
    }
}

#[test]
fn whitespace_comments_and_parens_do_not_change_results() {
    let plain = eval("1 + 2 * 3");
    assert_eq!(plain, eval("  1\n  + (2 * 3)  # trailing comment"));
    assert_eq!(plain, eval("/* leading */ (1) + ((2) * (3))"));

    let set = eval("{ a = 1; }");
    assert_eq!(set, eval("{ /* inside */ a = (1); }"));
}

#[test]
fn let_is_equivalent_to_nested_application() {
    // let x = E1; y = E2; in B  ==  (x: (y: B) E2) E1  when E1 ignores y
    assert_eq!(
        eval("let x = 5; y = x + 1; in x * y"),
        eval("(x: (y: x * y) (x + 1)) 5")
    );
}

#[test]
fn update_merges_keys() {
    assert_eq!(
        eval("{ a = 1; } // { b = 2; }"),
        eval("{ a = 1; b = 2; }")
    );
    assert_eq!(
        eval("{ a = 1; b = 2; } // { b = 9; }"),
        eval("{ a = 1; b = 9; }")
    );
}

#[test]
fn elem_finds_appended_elements() {
    prints("elem 3 ([ 1 2 ] ++ [ 3 ])", "true");
    prints("elem 9 ([ 1 2 ] ++ [ 3 ])", "false");
}

#[test]
fn length_counts_string_bytes() {
    prints(r#"length "hello""#, "5");
    prints(r#"length """#, "0");
    prints("length [ 1 2 3 ]", "3");
    prints("length { a = 1; b = 2; }", "2");
}

#[test]
fn builtins_curry() {
    prints(r#"hasAttr "x""#, "<BUILTIN hasAttr>");
    prints(r#"(hasAttr "x") { x = 1; }"#, "true");
    prints(
        r#"let f = hasAttr "x"; in [ (f { x = 1; }) (f { y = 1; }) ]"#,
        "[ true false ]",
    );
    prints("let add2 = add 2; in add2 40", "42");
}

#[test]
fn builtin_surface() {
    prints("isNull null", "true");
    prints("isFunction (x: x)", "true");
    prints("isFunction isNull", "true");
    prints("isFunction 3", "false");
    prints(r#"toString 42"#, r#""42""#);
    prints("head [ 1 2 3 ]", "1");
    prints("tail [ 1 2 3 ]", "[ 2 3 ]");
    prints("attrNames { b = 1; a = 2; }", r#"[ "a" "b" ]"#);
    prints("attrValues { b = 1; a = 2; }", "[ 2 1 ]");
    prints(r#"getAttr "a" { a = 42; }"#, "42");
    prints(r#"hasAttr "a" { a = 42; }"#, "true");
    prints("add 1 2", "3");
    prints("sub 5 2", "3");
    prints("mul 6 7", "42");
    prints("div 1 2", "0.5");
}

#[test]
fn function_values_print_opaquely() {
    prints("x: x", "<LAMBDA x>");
    prints("{ a, b }: a", "<LAMBDA { a, b }>");
    prints("isNull", "<BUILTIN isNull>");
}

#[test]
fn functions_never_compare_equal() {
    prints("let f = x: x; in f == f", "false");
    prints("(x: x) == (x: x)", "false");
}

#[test]
fn with_assert_and_inherit() {
    prints("with { a = 2; }; a * 21", "42");
    prints("assert 1 < 2; \"ok\"", r#""ok""#);
    prints("let x = 1; in { inherit x; y = 2; }", "{ x = 1; y = 2; }");
    prints(
        "let s = { a = 5; }; in with { inherit (s) a; }; a",
        "5",
    );
}

#[test]
fn pattern_functions_end_to_end() {
    prints("({ a, b }: a + b) { a = 20; b = 22; }", "42");
    prints("({ a, ... } @ all: a + all.b) { a = 1; b = 2; }", "3");
}

#[test]
fn select_with_defaults() {
    prints("{ a = 1; }.a or 99", "1");
    prints("{ a = 1; }.b or 99", "99");
    prints("{ a = { b = 2; }; } ? a.b", "true");
}

#[test]
fn error_cases_reject_the_program() {
    fails("let x = ; in x");            // parse error
    fails("missing");                   // undefined variable
    fails("1 + true");                  // type mismatch
    fails("1 / 0");                     // division by zero
    fails("{ a = 1; }.b");              // missing attribute
    fails("{ a = 1; a.b = 2; }");       // attribute path conflict
    fails("assert false; 1");           // assertion failure
    fails("1 2");                       // applying a non-function
    fails(r#"derivation { name = "x"; }"#); // missing builder
    fails("head 5");                    // wrong builtin argument type
}
