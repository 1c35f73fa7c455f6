//! A small built-in JDK symbol set (no disk IO, no system JDK required).

use crate::table::{ClassKind, ClassStub, MethodStub};
use crate::SymbolTable;

struct BuiltinClass {
    fqn: &'static str,
    kind: ClassKind,
    super_class: Option<&'static str>,
    interfaces: &'static [&'static str],
    /// `(name, static, parameter types)`
    methods: &'static [(&'static str, bool, &'static [&'static str])],
}

const STRING: &str = "java.lang.String";

const BUILTIN: &[BuiltinClass] = &[
    BuiltinClass {
        fqn: "java.lang.Object",
        kind: ClassKind::Class,
        super_class: None,
        interfaces: &[],
        methods: &[
            ("equals", false, &["java.lang.Object"]),
            ("hashCode", false, &[]),
            ("toString", false, &[]),
            ("getClass", false, &[]),
        ],
    },
    BuiltinClass {
        fqn: "java.lang.CharSequence",
        kind: ClassKind::Interface,
        super_class: None,
        interfaces: &[],
        methods: &[
            ("length", false, &[]),
            ("charAt", false, &["int"]),
            ("chars", false, &[]),
            ("isEmpty", false, &[]),
            ("compare", true, &["java.lang.CharSequence", "java.lang.CharSequence"]),
        ],
    },
    BuiltinClass {
        fqn: "java.lang.Comparable",
        kind: ClassKind::Interface,
        super_class: None,
        interfaces: &[],
        methods: &[("compareTo", false, &["T"])],
    },
    BuiltinClass {
        fqn: "java.lang.String",
        kind: ClassKind::Class,
        super_class: Some("java.lang.Object"),
        interfaces: &["java.lang.CharSequence", "java.lang.Comparable"],
        methods: &[
            ("length", false, &[]),
            ("isEmpty", false, &[]),
            ("isBlank", false, &[]),
            ("charAt", false, &["int"]),
            ("chars", false, &[]),
            ("trim", false, &[]),
            ("strip", false, &[]),
            ("substring", false, &["int"]),
            ("substring", false, &["int", "int"]),
            ("startsWith", false, &[STRING]),
            ("endsWith", false, &[STRING]),
            ("equalsIgnoreCase", false, &[STRING]),
            ("format", true, &[STRING, "java.lang.Object..."]),
            ("valueOf", true, &["java.lang.Object"]),
            ("valueOf", true, &["int"]),
            ("join", true, &["java.lang.CharSequence", "java.lang.CharSequence..."]),
        ],
    },
    BuiltinClass {
        fqn: "java.lang.Enum",
        kind: ClassKind::Class,
        super_class: Some("java.lang.Object"),
        interfaces: &["java.lang.Comparable"],
        methods: &[
            ("name", false, &[]),
            ("ordinal", false, &[]),
            ("compareTo", false, &["E"]),
            ("getDeclaringClass", false, &[]),
            ("equals", false, &["java.lang.Object"]),
            ("hashCode", false, &[]),
            ("toString", false, &[]),
            ("valueOf", true, &["java.lang.Class<T>", STRING]),
        ],
    },
    BuiltinClass {
        fqn: "java.lang.Record",
        kind: ClassKind::Class,
        super_class: Some("java.lang.Object"),
        interfaces: &[],
        methods: &[
            ("equals", false, &["java.lang.Object"]),
            ("hashCode", false, &[]),
            ("toString", false, &[]),
        ],
    },
    BuiltinClass {
        fqn: "java.lang.Number",
        kind: ClassKind::Class,
        super_class: Some("java.lang.Object"),
        interfaces: &[],
        methods: &[
            ("intValue", false, &[]),
            ("longValue", false, &[]),
            ("doubleValue", false, &[]),
        ],
    },
    BuiltinClass {
        fqn: "java.lang.Integer",
        kind: ClassKind::Class,
        super_class: Some("java.lang.Number"),
        interfaces: &["java.lang.Comparable"],
        methods: &[
            ("intValue", false, &[]),
            ("compareTo", false, &["java.lang.Integer"]),
            ("parseInt", true, &[STRING]),
            ("valueOf", true, &["int"]),
            ("valueOf", true, &[STRING]),
            ("toString", true, &["int"]),
            ("toUnsignedString", true, &["int"]),
            ("toUnsignedString", true, &["int", "int"]),
            ("compare", true, &["int", "int"]),
        ],
    },
    BuiltinClass {
        fqn: "java.lang.Iterable",
        kind: ClassKind::Interface,
        super_class: None,
        interfaces: &[],
        methods: &[
            ("iterator", false, &[]),
            ("forEach", false, &["java.util.function.Consumer<? super T>"]),
        ],
    },
    BuiltinClass {
        fqn: "java.util.Collection",
        kind: ClassKind::Interface,
        super_class: None,
        interfaces: &["java.lang.Iterable"],
        methods: &[
            ("size", false, &[]),
            ("isEmpty", false, &[]),
            ("contains", false, &["java.lang.Object"]),
            ("add", false, &["E"]),
            ("remove", false, &["java.lang.Object"]),
            ("addAll", false, &["java.util.Collection<? extends E>"]),
            ("removeIf", false, &["java.util.function.Predicate<? super E>"]),
            ("clear", false, &[]),
            ("stream", false, &[]),
        ],
    },
    BuiltinClass {
        fqn: "java.util.List",
        kind: ClassKind::Interface,
        super_class: None,
        interfaces: &["java.util.Collection"],
        methods: &[
            ("size", false, &[]),
            ("isEmpty", false, &[]),
            ("contains", false, &["java.lang.Object"]),
            ("add", false, &["E"]),
            ("add", false, &["int", "E"]),
            ("get", false, &["int"]),
            ("set", false, &["int", "E"]),
            ("remove", false, &["int"]),
            ("indexOf", false, &["java.lang.Object"]),
            ("clear", false, &[]),
            ("subList", false, &["int", "int"]),
            ("of", true, &[]),
            ("of", true, &["E"]),
            ("of", true, &["E..."]),
            ("copyOf", true, &["java.util.Collection<? extends E>"]),
        ],
    },
    BuiltinClass {
        fqn: "java.util.Set",
        kind: ClassKind::Interface,
        super_class: None,
        interfaces: &["java.util.Collection"],
        methods: &[
            ("size", false, &[]),
            ("isEmpty", false, &[]),
            ("add", false, &["E"]),
            ("clear", false, &[]),
            ("of", true, &[]),
            ("of", true, &["E..."]),
        ],
    },
    BuiltinClass {
        fqn: "java.util.ArrayList",
        kind: ClassKind::Class,
        super_class: Some("java.lang.Object"),
        interfaces: &["java.util.List"],
        methods: &[
            ("add", false, &["E"]),
            ("size", false, &[]),
            ("ensureCapacity", false, &["int"]),
            ("trimToSize", false, &[]),
        ],
    },
    BuiltinClass {
        fqn: "java.util.Map",
        kind: ClassKind::Interface,
        super_class: None,
        interfaces: &[],
        methods: &[
            ("size", false, &[]),
            ("isEmpty", false, &[]),
            ("get", false, &["java.lang.Object"]),
            ("put", false, &["K", "V"]),
            ("containsKey", false, &["java.lang.Object"]),
            ("clear", false, &[]),
            ("of", true, &[]),
            ("of", true, &["K", "V"]),
            ("entry", true, &["K", "V"]),
        ],
    },
    BuiltinClass {
        fqn: "java.util.Objects",
        kind: ClassKind::Class,
        super_class: Some("java.lang.Object"),
        interfaces: &[],
        methods: &[
            ("equals", true, &["java.lang.Object", "java.lang.Object"]),
            ("hash", true, &["java.lang.Object..."]),
            ("requireNonNull", true, &["T"]),
            ("requireNonNull", true, &["T", STRING]),
            ("isNull", true, &["java.lang.Object"]),
        ],
    },
    BuiltinClass {
        fqn: "java.text.Format",
        kind: ClassKind::Class,
        super_class: Some("java.lang.Object"),
        interfaces: &[],
        methods: &[("format", false, &["java.lang.Object"])],
    },
    BuiltinClass {
        fqn: "java.text.MessageFormat",
        kind: ClassKind::Class,
        super_class: Some("java.text.Format"),
        interfaces: &[],
        methods: &[
            ("format", true, &[STRING, "java.lang.Object..."]),
            (
                "format",
                false,
                &[
                    "java.lang.Object[]",
                    "java.lang.StringBuffer",
                    "java.text.FieldPosition",
                ],
            ),
            ("applyPattern", false, &[STRING]),
            ("toPattern", false, &[]),
        ],
    },
];

/// Add the built-in JDK classes to `table`.
pub fn install_builtin_jdk(table: &mut SymbolTable) {
    for class in BUILTIN {
        let mut stub = ClassStub::new(class.fqn, class.kind);
        if let Some(super_class) = class.super_class {
            stub = stub.extends(super_class);
        }
        for interface in class.interfaces {
            stub = stub.implements(interface);
        }

        let id = table.add_class(stub);
        for (name, is_static, params) in class.methods {
            table.add_method(id, MethodStub::new(*name, *is_static, params));
        }
    }
    tracing::debug!(classes = BUILTIN.len(), "installed builtin JDK stubs");
}
