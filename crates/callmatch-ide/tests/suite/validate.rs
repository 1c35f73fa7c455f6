use callmatch_core::Severity;
use callmatch_ide::{
    validate, validate_source, CALLMATCHER_NO_EXACT_INSTANCE_METHOD,
    CALLMATCHER_NO_INSTANCE_METHOD, CALLMATCHER_NO_STATIC_METHOD,
};
use callmatch_symbols::{Snapshot, SymbolTable};
use callmatch_syntax::{matcher_declarations, parse_java};
use callmatch_test_utils::extract_error_markers;
use pretty_assertions::assert_eq;

use super::table_with_sources;

fn check(table: &SymbolTable, fixture: &str) {
    let (source, expected) = extract_error_markers(fixture);
    let snapshot = Snapshot::new(table);
    let actual: Vec<_> = validate_source(&snapshot, &source)
        .expect("parse")
        .into_iter()
        .map(|diag| {
            assert_eq!(diag.severity, Severity::Error);
            (diag.range, diag.message)
        })
        .collect();
    assert_eq!(actual, expected);
}

#[test]
fn nonexistent_methods_are_reported_per_kind() {
    let table = SymbolTable::with_builtin_jdk();
    check(
        &table,
        r#"import com.siyeh.ig.callMatcher.CallMatcher;

public class CallMatcherNonexistentMethod {
   CallMatcher callMatcherInstance1 = CallMatcher.instanceCall("java.util.List", "add");
   CallMatcher callMatcherInstance2 = CallMatcher.instanceCall("java.util.List", "clear");
   CallMatcher callMatcherInstance3 = CallMatcher.instanceCall("java.lang.Integer", <error descr="No instance method exists with this name in the referenced class or any of its super classes.">"toUnsignedString"</error>);
   CallMatcher callMatcherInstance4 = CallMatcher.instanceCall("java.util.List", <error descr="No instance method exists with this name in the referenced class or any of its super classes.">"asdasd"</error>);

   CallMatcher callMatcherStatic1 = CallMatcher.staticCall("java.text.MessageFormat", "format");
   CallMatcher callMatcherStatic2 = CallMatcher.staticCall("java.lang.String", <error descr="No static method exists with this name in the referenced class or any of its super classes.">"chars"</error>);
   CallMatcher callMatcherStatic3 = CallMatcher.staticCall("java.lang.String", <error descr="No static method exists with this name in the referenced class or any of its super classes.">"asdasd"</error>);

   CallMatcher callMatcherExactInstance1 = CallMatcher.exactInstanceCall("java.util.List", "add");
   CallMatcher callMatcherExactInstance2 = CallMatcher.exactInstanceCall("java.util.List", "clear");
   CallMatcher callMatcherExactInstance3 = CallMatcher.exactInstanceCall("java.util.List", "isEmpty");
   CallMatcher callMatcherExactInstance4 = CallMatcher.exactInstanceCall("java.util.List", <error descr="No instance method exists with this name in the referenced class.">"removeIf"</error>);
   CallMatcher callMatcherExactInstance5 = CallMatcher.exactInstanceCall("java.util.List", <error descr="No instance method exists with this name in the referenced class.">"asdasd"</error>);
}"#,
    );
}

#[test]
fn each_missing_sibling_is_reported_independently() {
    let table = SymbolTable::with_builtin_jdk();
    check(
        &table,
        r#"class A {
    Object m = CallMatcher.instanceCall("java.util.List", "size", <error descr="No instance method exists with this name in the referenced class or any of its super classes.">"nope"</error>, "isEmpty", <error descr="No instance method exists with this name in the referenced class or any of its super classes.">"alsoNope"</error>);
}"#,
    );
}

#[test]
fn unresolved_owners_and_unsafe_literals_are_silent() {
    let table = SymbolTable::with_builtin_jdk();
    check(
        &table,
        r#"class A {
    Object a = CallMatcher.instanceCall("com.example.Missing", "anything");
    Object b = CallMatcher.instanceCall("java.util\u002EList", "nope");
    Object c = CallMatcher.instanceCall("java.util.List", "no\tpe");
    Object d = CallMatcher.instanceCall(owner(), "nope");
    Object e = CallMatcher.instanceCall("java.util.List");
}"#,
    );
}

#[test]
fn constant_owners_are_followed_one_level() {
    let source = r#"package c;
import com.siyeh.ig.callMatcher.CallMatcher;
class Matchers {
    static final String LIST = "java.util.List";
    static final String ALIAS = LIST;
    CallMatcher a = CallMatcher.instanceCall(LIST, <error descr="No instance method exists with this name in the referenced class or any of its super classes.">"nope"</error>);
    CallMatcher b = CallMatcher.instanceCall(ALIAS, "nope");
}"#;
    let (plain, _) = extract_error_markers(source);
    let table = table_with_sources(&[("Matchers.java", plain.as_str())]);
    check(&table, source);
}

#[test]
fn enum_and_record_members_are_found() {
    let table = table_with_sources(&[(
        "Shapes.java",
        "package p;\npublic enum Color { RED; }\nrecord Point(int x) {}\n",
    )]);
    check(
        &table,
        r#"class A {
    Object a = CallMatcher.staticCall("p.Color", "values", "valueOf");
    Object b = CallMatcher.instanceCall("p.Color", "ordinal", "name", "hashCode");
    Object c = CallMatcher.exactInstanceCall("p.Point", "x");
    Object d = CallMatcher.instanceCall("p.Point", "x", "toString");
    Object e = CallMatcher.exactInstanceCall("p.Color", <error descr="No instance method exists with this name in the referenced class.">"ordinal"</error>);
    Object f = CallMatcher.staticCall("p.Point", <error descr="No static method exists with this name in the referenced class or any of its super classes.">"x"</error>);
}"#,
    );
}

#[test]
fn diagnostics_carry_codes_per_kind() {
    let table = SymbolTable::with_builtin_jdk();
    let snapshot = Snapshot::new(&table);
    let source = r#"class A {
    Object a = CallMatcher.exactInstanceCall("java.util.List", "x");
    Object b = CallMatcher.staticCall("java.util.List", "x");
    Object c = CallMatcher.instanceCall("java.util.List", "x");
}"#;
    let tree = parse_java(source).unwrap();
    let codes: Vec<_> = matcher_declarations(source, &tree)
        .iter()
        .flat_map(|decl| validate(&snapshot, decl))
        .map(|diag| diag.code)
        .collect();
    assert_eq!(
        codes,
        vec![
            CALLMATCHER_NO_EXACT_INSTANCE_METHOD,
            CALLMATCHER_NO_STATIC_METHOD,
            CALLMATCHER_NO_INSTANCE_METHOD,
        ]
    );
}

#[test]
fn validation_is_idempotent() {
    let table = SymbolTable::with_builtin_jdk();
    let snapshot = Snapshot::new(&table);
    let source = r#"class A { Object a = CallMatcher.staticCall("java.lang.String", "chars", "valueOf"); }"#;
    let first = validate_source(&snapshot, source).unwrap();
    let second = validate_source(&snapshot, source).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
}
