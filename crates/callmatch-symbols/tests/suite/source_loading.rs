use callmatch_symbols::{SourceLoader, SymbolProvider, SymbolTable};
use callmatch_test_utils::FixtureDir;
use pretty_assertions::assert_eq;

fn load(files: &[(&str, &str)]) -> SymbolTable {
    let mut table = SymbolTable::with_builtin_jdk();
    let mut loader = SourceLoader::new();
    for (path, text) in files {
        loader.add_text(*path, *text);
    }
    loader.load_into(&mut table).expect("load sources");
    table
}

fn params_of(table: &SymbolTable, class: &str, method: &str) -> Vec<String> {
    let class = table.find_class(class).expect("class");
    let found = table.methods_named(class, method, false);
    assert_eq!(found.len(), 1, "expected a single `{method}`");
    table.parameter_types(found[0]).to_vec()
}

#[test]
fn canonical_parameter_types() {
    let table = load(&[(
        "Signatures.java",
        r#"package generate.call.matcher;

import java.util.List;

public class Signatures<T> {
    public void plain(String s, int i, List raw) {}
    public void varargs(int i, String... rest) {}
    public void generic(T value) {}
    public void listOfT(List<T> values) {}
    public void exact(List<Integer> values) {}
    public void bounded(Class<? extends Throwable> type) {}
    public void wildcard(List<?> values) {}
    public void array(String[] values) {}
    public void cStyleArray(String values[]) {}
    public <K> void methodVar(K key, java.util.Map<K, String> map) {}
    public static void noParams() {}
}
"#,
    )]);

    let class = "generate.call.matcher.Signatures";
    assert_eq!(
        params_of(&table, class, "plain"),
        vec!["java.lang.String", "int", "java.util.List"]
    );
    assert_eq!(
        params_of(&table, class, "varargs"),
        vec!["int", "java.lang.String..."]
    );
    assert_eq!(params_of(&table, class, "generic"), vec!["T"]);
    assert_eq!(params_of(&table, class, "listOfT"), vec!["java.util.List<T>"]);
    assert_eq!(
        params_of(&table, class, "exact"),
        vec!["java.util.List<java.lang.Integer>"]
    );
    assert_eq!(
        params_of(&table, class, "bounded"),
        vec!["java.lang.Class<? extends java.lang.Throwable>"]
    );
    assert_eq!(params_of(&table, class, "wildcard"), vec!["java.util.List<?>"]);
    assert_eq!(params_of(&table, class, "array"), vec!["java.lang.String[]"]);
    assert_eq!(
        params_of(&table, class, "cStyleArray"),
        vec!["java.lang.String[]"]
    );
    assert_eq!(
        params_of(&table, class, "methodVar"),
        vec!["K", "java.util.Map<K,java.lang.String>"]
    );
    assert!(params_of(&table, class, "noParams").is_empty());

    let id = table.find_class(class).unwrap();
    let no_params = table.methods_named(id, "noParams", false)[0];
    assert!(table.is_static(no_params));
}

#[test]
fn nested_classes_use_dotted_names() {
    let table = load(&[(
        "Outer.java",
        r#"package a;
public class Outer {
    public static class Inner {
        public void run() {}
        interface Deep { void go(); }
    }
    void anonymous() {
        Runnable r = new Runnable() { public void run() {} };
    }
}
"#,
    )]);

    let inner = table.find_class("a.Outer.Inner").expect("nested class");
    assert_eq!(table.methods_named(inner, "run", false).len(), 1);
    assert!(table.find_class("a.Outer.Inner.Deep").is_some());
    let outer = table.find_class("a.Outer").unwrap();
    assert!(table.methods_named(outer, "run", false).is_empty());
}

#[test]
fn supertypes_resolve_across_files_and_imports() {
    let table = load(&[
        (
            "Child.java",
            r#"package b;
import a.Base;
public class Child extends Base implements Marker {
    public void own() {}
}
"#,
        ),
        (
            "Base.java",
            "package a;\npublic class Base { public void inherited() {} public static void util() {} }",
        ),
        (
            "Marker.java",
            "package b;\npublic interface Marker extends java.util.List<String> { default void mark() {} }",
        ),
    ]);

    let child = table.find_class("b.Child").unwrap();
    let names: Vec<_> = table
        .ancestry(child)
        .into_iter()
        .map(|id| table.class_fqn(id).to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "b.Child",
            "a.Base",
            "b.Marker",
            "java.util.List",
            "java.util.Collection",
            "java.lang.Iterable",
            "java.lang.Object",
        ]
    );

    assert_eq!(table.methods_named(child, "inherited", true).len(), 1);
    assert_eq!(table.methods_named(child, "clear", true).len(), 2);
    assert!(table.methods_named(child, "inherited", false).is_empty());
}

#[test]
fn enum_and_interface_members() {
    let table = load(&[(
        "Kinds.java",
        r#"package k;
public enum Kinds {
    A, B;
    public static Kinds parse(String s) { return A; }
    public boolean isA() { return this == A; }
}
"#,
    )]);
    let kinds = table.find_class("k.Kinds").unwrap();
    let parse = table.methods_named(kinds, "parse", false);
    assert_eq!(parse.len(), 1);
    assert!(table.is_static(parse[0]));
    assert_eq!(table.methods_named(kinds, "isA", false).len(), 1);
}

#[test]
fn enums_and_records_get_generated_members() {
    let table = load(&[(
        "Shapes.java",
        r#"package p;
public enum Color { RED; }
record Point(int x, java.util.List<String> tags) {
    public int x() { return x; }
}
"#,
    )]);
    let color = table.find_class("p.Color").unwrap();
    let values = table.methods_named(color, "values", false);
    assert_eq!(values.len(), 1);
    assert!(table.is_static(values[0]));
    assert_eq!(params_of(&table, "p.Color", "valueOf"), vec!["java.lang.String"]);
    let ancestry: Vec<_> = table
        .ancestry(color)
        .into_iter()
        .map(|class| table.class_fqn(class).to_string())
        .collect();
    assert_eq!(
        ancestry,
        vec!["p.Color", "java.lang.Enum", "java.lang.Object", "java.lang.Comparable"]
    );

    let point = table.find_class("p.Point").unwrap();
    assert_eq!(table.methods_named(point, "x", false).len(), 1);
    let tags = table.methods_named(point, "tags", false);
    assert_eq!(tags.len(), 1);
    assert!(!table.is_static(tags[0]));
    assert_eq!(table.methods_named(point, "hashCode", true).len(), 2);
}

#[test]
fn load_from_disk_and_report_missing_files() {
    let dir = FixtureDir::new(&[("src/p/A.java", "package p; class A { void m() {} }")]);
    let mut table = SymbolTable::new();
    let mut loader = SourceLoader::new();
    loader.add_path(&dir.path("src/p/A.java")).unwrap();
    assert_eq!(loader.load_into(&mut table).unwrap(), 1);
    assert!(table.find_class("p.A").is_some());

    let mut loader = SourceLoader::new();
    let err = loader.add_path(&dir.path("missing.java")).err().unwrap();
    assert!(err.to_string().starts_with("failed to read"));
}
