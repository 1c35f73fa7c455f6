use callmatch_core::TextRange;
use callmatch_symbols::{SourceLoader, SymbolProvider, SymbolTable};
use callmatch_syntax::ConstantRef;

fn constant(qualifier: Option<&str>, name: &str) -> ConstantRef {
    ConstantRef {
        qualifier: qualifier.map(str::to_string),
        name: name.to_string(),
        range: TextRange::default(),
    }
}

fn table() -> SymbolTable {
    let mut table = SymbolTable::with_builtin_jdk();
    let mut loader = SourceLoader::new();
    loader
        .add_text(
            "Names.java",
            r#"package c;
public class Names {
    public static final String LIST = "java.util.List";
    public static final String INDIRECT = LIST;
    public static final String ESCAPED = "java\u002Eutil.List";
    public final String INSTANCE = "java.util.Set";
    public static final Object NOT_A_STRING = "java.util.Map";

    static class Nested {
        static final String OWN = "java.util.Map";
    }
}
"#,
        )
        .add_text(
            "Sub.java",
            r#"package c;
import java.util.List;
public class Sub extends Names {
}
"#,
        )
        .add_text(
            "Holder.java",
            "package d;\npublic interface Holder { String SET = \"java.util.Set\"; }",
        );
    loader.load_into(&mut table).unwrap();
    table
}

#[test]
fn unqualified_constants_resolve_in_context() {
    let table = table();
    assert_eq!(
        table.evaluate_constant_string(&constant(None, "LIST"), Some("c.Names")),
        Some("java.util.List".to_string())
    );
    assert_eq!(
        table.evaluate_constant_string(&constant(None, "LIST"), Some("c.Names.Nested")),
        Some("java.util.List".to_string())
    );
    assert_eq!(
        table.evaluate_constant_string(&constant(None, "LIST"), Some("c.Sub")),
        Some("java.util.List".to_string())
    );
    assert_eq!(
        table.evaluate_constant_string(&constant(None, "LIST"), None),
        None
    );
}

#[test]
fn qualified_constants_resolve_relative_to_context() {
    let table = table();
    assert_eq!(
        table.evaluate_constant_string(&constant(Some("Names"), "LIST"), Some("c.Sub")),
        Some("java.util.List".to_string())
    );
    assert_eq!(
        table.evaluate_constant_string(&constant(Some("Nested"), "OWN"), Some("c.Names")),
        Some("java.util.Map".to_string())
    );
    assert_eq!(
        table.evaluate_constant_string(&constant(Some("d.Holder"), "SET"), None),
        Some("java.util.Set".to_string())
    );
}

#[test]
fn only_one_level_of_plain_literal_constants() {
    let table = table();
    for name in ["INDIRECT", "ESCAPED", "INSTANCE", "NOT_A_STRING", "MISSING"] {
        assert_eq!(
            table.evaluate_constant_string(&constant(Some("c.Names"), name), None),
            None,
            "{name} should not evaluate"
        );
    }
}
