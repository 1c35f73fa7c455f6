//! Class and method symbols read from Java source files.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use callmatch_syntax::java::{
    compact, declaration_name, enclosing_type_declaration, find_named_child, has_modifier,
    is_type_declaration, named_children_no_comments, node_text, package_name,
    type_declaration_fqn, type_body, visit_nodes,
};
use callmatch_syntax::{field_declarations, parse_java, FieldInitializer, ParseError};
use thiserror::Error;
use tracing::debug;
use tree_sitter::{Node, Tree};

use crate::table::{ClassKind, ClassStub, MethodStub};
use crate::{SymbolProvider, SymbolTable};

/// Types of `java.lang` that are implicitly imported and commonly used in signatures.
pub const JAVA_LANG_TYPES: &[&str] = &[
    "AutoCloseable",
    "Boolean",
    "Byte",
    "CharSequence",
    "Character",
    "Class",
    "ClassLoader",
    "Cloneable",
    "Comparable",
    "Double",
    "Enum",
    "Error",
    "Exception",
    "Float",
    "IllegalArgumentException",
    "IllegalStateException",
    "Integer",
    "Iterable",
    "Long",
    "Math",
    "Number",
    "NullPointerException",
    "Object",
    "Record",
    "Runnable",
    "RuntimeException",
    "Short",
    "String",
    "StringBuffer",
    "StringBuilder",
    "System",
    "Thread",
    "Throwable",
    "UnsupportedOperationException",
    "Void",
];

#[derive(Debug, Error)]
pub enum SourceLoadError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// How simple type names written in one file map to fully-qualified names.
pub struct TypeScope<K> {
    package: Option<String>,
    single_imports: HashMap<String, String>,
    on_demand_imports: Vec<String>,
    known: K,
}

impl<K: Fn(&str) -> bool> TypeScope<K> {
    /// Build the scope of a compilation unit. `known` reports whether a
    /// fully-qualified class name exists.
    pub fn from_file(source: &str, root: Node<'_>, known: K) -> Self {
        let mut single_imports = HashMap::new();
        let mut on_demand_imports = Vec::new();

        let mut cursor = root.walk();
        for import in root.named_children(&mut cursor) {
            if import.kind() != "import_declaration" {
                continue;
            }
            let mut import_cursor = import.walk();
            let children: Vec<_> = import.children(&mut import_cursor).collect();
            if children.iter().any(|child| child.kind() == "static") {
                continue;
            }
            let Some(name) = children
                .iter()
                .find(|child| matches!(child.kind(), "scoped_identifier" | "identifier"))
            else {
                continue;
            };
            let name = compact(node_text(source, *name));
            if children.iter().any(|child| child.kind() == "asterisk") {
                on_demand_imports.push(name);
            } else if let Some((_, simple)) = name.rsplit_once('.') {
                single_imports.insert(simple.to_string(), name.clone());
            }
        }

        Self {
            package: package_name(source, root),
            single_imports,
            on_demand_imports,
            known,
        }
    }

    /// Candidate fully-qualified names for `written` as seen from inside `context`
    /// (the fqn of the enclosing type), most specific first.
    pub fn candidates(&self, written: &str, context: Option<&str>) -> Vec<String> {
        let (head, tail) = match written.split_once('.') {
            Some((head, tail)) => (head, Some(tail)),
            None => (written, None),
        };
        let with_tail = |base: String| match tail {
            Some(tail) => format!("{base}.{tail}"),
            None => base,
        };

        let mut out = Vec::new();
        if tail.is_some() {
            out.push(written.to_string());
        }
        if let Some(imported) = self.single_imports.get(head) {
            out.push(with_tail(imported.clone()));
        }
        let mut prefix = context;
        while let Some(scope) = prefix {
            out.push(with_tail(format!("{scope}.{head}")));
            prefix = scope.rsplit_once('.').map(|(parent, _)| parent);
        }
        if context.is_none() {
            if let Some(package) = &self.package {
                out.push(with_tail(format!("{package}.{head}")));
            }
        }
        for package in &self.on_demand_imports {
            out.push(with_tail(format!("{package}.{head}")));
        }
        out.push(with_tail(format!("java.lang.{head}")));
        if tail.is_none() {
            out.push(written.to_string());
        }

        let mut seen = HashSet::new();
        out.retain(|candidate| seen.insert(candidate.clone()));
        out
    }

    /// The fully-qualified spelling of a written class name.
    ///
    /// Unknown names keep an explicit import or the implicit `java.lang` import when
    /// one applies, and are otherwise kept as written.
    pub fn qualify(&self, written: &str, context: Option<&str>) -> String {
        let candidates = self.candidates(written, context);
        if let Some(found) = candidates.iter().find(|candidate| (self.known)(candidate)) {
            return found.clone();
        }
        let (head, tail) = match written.split_once('.') {
            Some((head, tail)) => (head, Some(tail)),
            None => (written, None),
        };
        if let Some(imported) = self.single_imports.get(head) {
            return match tail {
                Some(tail) => format!("{imported}.{tail}"),
                None => imported.clone(),
            };
        }
        if JAVA_LANG_TYPES.contains(&written) {
            return format!("java.lang.{written}");
        }
        written.to_string()
    }

    /// Canonical text of a type node: class names fully qualified, type variables
    /// kept, generic arguments joined with `,`.
    pub fn render_type(
        &self,
        source: &str,
        node: Node<'_>,
        context: Option<&str>,
        type_vars: &HashSet<String>,
    ) -> String {
        match node.kind() {
            "type_identifier" | "scoped_type_identifier" => {
                let written = compact(node_text(source, node));
                if type_vars.contains(&written) {
                    written
                } else {
                    self.qualify(&written, context)
                }
            }
            "generic_type" => {
                let children = named_children_no_comments(node);
                let mut out = String::new();
                for child in children {
                    if child.kind() == "type_arguments" {
                        let args: Vec<_> = named_children_no_comments(child)
                            .into_iter()
                            .map(|arg| self.render_type(source, arg, context, type_vars))
                            .collect();
                        out.push('<');
                        out.push_str(&args.join(","));
                        out.push('>');
                    } else {
                        out.push_str(&self.render_type(source, child, context, type_vars));
                    }
                }
                out
            }
            "wildcard" => {
                let mut out = String::from("?");
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    match child.kind() {
                        "extends" => out.push_str(" extends "),
                        "super" => out.push_str(" super "),
                        "?" => {}
                        kind if kind.ends_with("annotation") => {}
                        _ if child.is_named() => {
                            out.push_str(&self.render_type(source, child, context, type_vars))
                        }
                        _ => {}
                    }
                }
                out
            }
            "array_type" => {
                let element = node
                    .child_by_field_name("element")
                    .map(|element| self.render_type(source, element, context, type_vars))
                    .unwrap_or_default();
                let dims = node
                    .child_by_field_name("dimensions")
                    .map(|dims| compact(node_text(source, dims)))
                    .unwrap_or_default();
                format!("{element}{dims}")
            }
            "annotated_type" => named_children_no_comments(node)
                .into_iter()
                .filter(|child| !child.kind().ends_with("annotation"))
                .last()
                .map(|ty| self.render_type(source, ty, context, type_vars))
                .unwrap_or_default(),
            _ => compact(node_text(source, node)),
        }
    }
}

fn type_parameter_names(source: &str, node: Node<'_>, out: &mut HashSet<String>) {
    let Some(params) = node
        .child_by_field_name("type_parameters")
        .or_else(|| find_named_child(node, "type_parameters"))
    else {
        return;
    };
    for param in named_children_no_comments(params) {
        if param.kind() != "type_parameter" {
            continue;
        }
        let name = find_named_child(param, "type_identifier")
            .or_else(|| find_named_child(param, "identifier"));
        if let Some(name) = name {
            out.insert(node_text(source, name).to_string());
        }
    }
}

/// Type variables visible at `node`: its own and those of every enclosing type up
/// to the first one that does not see its outer scope.
fn visible_type_vars(source: &str, node: Node<'_>) -> HashSet<String> {
    let mut vars = HashSet::new();
    type_parameter_names(source, node, &mut vars);
    let mut current = enclosing_type_declaration(node);
    while let Some(decl) = current {
        type_parameter_names(source, decl, &mut vars);
        if has_modifier(decl, "static") || decl.kind() != "class_declaration" {
            break;
        }
        current = enclosing_type_declaration(decl);
    }
    vars
}

/// Canonical parameter types of a `method_declaration` or `constructor_declaration`.
pub fn canonical_parameter_types<K: Fn(&str) -> bool>(
    scope: &TypeScope<K>,
    source: &str,
    root: Node<'_>,
    method: Node<'_>,
) -> Vec<String> {
    let Some(params) = method.child_by_field_name("parameters") else {
        return Vec::new();
    };
    let context = enclosing_type_declaration(method)
        .and_then(|decl| type_declaration_fqn(source, root, decl));
    let context = context.as_deref();
    let type_vars = visible_type_vars(source, method);

    let mut out = Vec::new();
    for param in named_children_no_comments(params) {
        match param.kind() {
            "formal_parameter" => {
                let Some(ty) = param.child_by_field_name("type") else {
                    continue;
                };
                let mut text = scope.render_type(source, ty, context, &type_vars);
                if let Some(dims) = param.child_by_field_name("dimensions") {
                    text.push_str(&compact(node_text(source, dims)));
                }
                out.push(text);
            }
            "spread_parameter" => {
                let ty = named_children_no_comments(param)
                    .into_iter()
                    .find(|child| !matches!(child.kind(), "modifiers" | "variable_declarator"));
                if let Some(ty) = ty {
                    let text = scope.render_type(source, ty, context, &type_vars);
                    out.push(format!("{text}..."));
                }
            }
            _ => {}
        }
    }
    out
}

fn class_kind(kind: &str) -> Option<ClassKind> {
    Some(match kind {
        "class_declaration" => ClassKind::Class,
        "interface_declaration" => ClassKind::Interface,
        "enum_declaration" => ClassKind::Enum,
        "record_declaration" => ClassKind::Record,
        "annotation_type_declaration" => ClassKind::Annotation,
        _ => return None,
    })
}

/// Type nodes listed in a `superclass`, `super_interfaces` or `extends_interfaces` clause.
fn supertype_nodes(clause: Node<'_>) -> Vec<Node<'_>> {
    match find_named_child(clause, "type_list") {
        Some(list) => named_children_no_comments(list),
        None => named_children_no_comments(clause),
    }
}

/// The class name of a supertype reference, without type arguments.
fn raw_type_name(source: &str, ty: Node<'_>) -> String {
    match ty.kind() {
        "generic_type" => named_children_no_comments(ty)
            .into_iter()
            .find(|child| child.kind() != "type_arguments")
            .map(|base| compact(node_text(source, base)))
            .unwrap_or_default(),
        _ => compact(node_text(source, ty)),
    }
}

struct SourceFile {
    path: PathBuf,
    text: String,
}

struct ParsedFile {
    path: PathBuf,
    text: String,
    tree: Tree,
}

/// Collects Java sources and loads their declarations into a [`SymbolTable`].
///
/// Loading happens in two passes so a supertype declared in a later file still
/// resolves.
#[derive(Default)]
pub struct SourceLoader {
    files: Vec<SourceFile>,
}

impl SourceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_text(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> &mut Self {
        self.files.push(SourceFile {
            path: path.into(),
            text: text.into(),
        });
        self
    }

    pub fn add_path(&mut self, path: &Path) -> Result<&mut Self, SourceLoadError> {
        let text = fs::read_to_string(path).map_err(|source| SourceLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.add_text(path, text))
    }

    /// Parse every collected file and add its classes, methods and string
    /// constants to `table`. Returns the number of classes added.
    pub fn load_into(self, table: &mut SymbolTable) -> Result<usize, SourceLoadError> {
        let mut parsed = Vec::with_capacity(self.files.len());
        let mut declared = HashSet::new();
        for file in self.files {
            let tree = parse_java(&file.text).map_err(|source| SourceLoadError::Parse {
                path: file.path.clone(),
                source,
            })?;
            let root = tree.root_node();
            visit_nodes(root, &mut |node| {
                if is_type_declaration(node.kind()) {
                    if let Some(fqn) = type_declaration_fqn(&file.text, root, node) {
                        declared.insert(fqn);
                    }
                }
            });
            parsed.push(ParsedFile {
                path: file.path,
                text: file.text,
                tree,
            });
        }

        let mut added = 0;
        for file in &parsed {
            added += load_file(table, &declared, file);
        }
        Ok(added)
    }
}

fn load_file(table: &mut SymbolTable, declared: &HashSet<String>, file: &ParsedFile) -> usize {
    let source = file.text.as_str();
    let root = file.tree.root_node();

    // Resolution only needs to know which names exist; collect them before mutating.
    let mut type_decls = Vec::new();
    visit_nodes(root, &mut |node| {
        if is_type_declaration(node.kind()) {
            type_decls.push(node);
        }
    });

    let mut added = 0;
    let mut pending = Vec::new();
    {
        let known = |fqn: &str| declared.contains(fqn) || table.find_class(fqn).is_some();
        let scope = TypeScope::from_file(source, root, known);

        for decl in type_decls {
            let (Some(kind), Some(fqn)) = (
                class_kind(decl.kind()),
                type_declaration_fqn(source, root, decl),
            ) else {
                continue;
            };
            let outer = enclosing_type_declaration(decl)
                .and_then(|outer| type_declaration_fqn(source, root, outer));

            let mut stub = ClassStub::new(fqn.clone(), kind);
            stub.imports = scope
                .single_imports
                .iter()
                .map(|(simple, fqn)| (simple.clone(), fqn.clone()))
                .collect();
            stub.imports.sort();

            let mut cursor = decl.walk();
            for clause in decl.named_children(&mut cursor) {
                let names: Vec<Vec<String>> = supertype_nodes(clause)
                    .into_iter()
                    .map(|ty| scope.candidates(&raw_type_name(source, ty), outer.as_deref()))
                    .collect();
                match clause.kind() {
                    "superclass" => stub.super_class = names.into_iter().next(),
                    "super_interfaces" | "extends_interfaces" => stub.interfaces.extend(names),
                    _ => {}
                }
            }
            if let Some(implicit) = implicit_super_class(kind) {
                stub.super_class = Some(vec![implicit.to_string()]);
            }

            let mut methods = member_methods(decl)
                .into_iter()
                .filter_map(|method| {
                    let name = declaration_name(source, method)?;
                    let is_static = has_modifier(method, "static");
                    let params = canonical_parameter_types(&scope, source, root, method);
                    Some(MethodStub {
                        name: name.to_string(),
                        is_static,
                        parameter_types: params,
                    })
                })
                .collect::<Vec<_>>();
            for method in implicit_methods(source, decl, kind) {
                let declared = methods.iter().any(|existing| {
                    existing.name == method.name
                        && existing.parameter_types == method.parameter_types
                });
                if !declared {
                    methods.push(method);
                }
            }

            pending.push((stub, methods));
        }
    }

    for (stub, methods) in pending {
        debug!(path = %file.path.display(), class = %stub.fqn, methods = methods.len(), "loaded class");
        let id = table.add_class(stub);
        for method in methods {
            table.add_method(id, method);
        }
        added += 1;
    }

    for field in field_declarations(source, &file.tree) {
        if !(field.is_static && field.is_final) {
            continue;
        }
        if !matches!(field.ty.as_str(), "String" | "java.lang.String") {
            continue;
        }
        let Some(class) = field
            .declaring_type
            .as_deref()
            .and_then(|fqn| table.find_class(fqn))
        else {
            continue;
        };
        let value = match field.initializer {
            Some(FieldInitializer::String(lit)) if lit.safe => Some(lit.value),
            _ => None,
        };
        table.add_constant(class, field.name, value);
    }

    added
}

/// Enums and records extend a fixed class and may not name another.
fn implicit_super_class(kind: ClassKind) -> Option<&'static str> {
    match kind {
        ClassKind::Enum => Some("java.lang.Enum"),
        ClassKind::Record => Some("java.lang.Record"),
        _ => None,
    }
}

/// Members the compiler generates: `values`/`valueOf` for enums, one accessor
/// per record component.
fn implicit_methods(source: &str, decl: Node<'_>, kind: ClassKind) -> Vec<MethodStub> {
    match kind {
        ClassKind::Enum => vec![
            MethodStub::new("values", true, &[]),
            MethodStub::new("valueOf", true, &["java.lang.String"]),
        ],
        ClassKind::Record => {
            let Some(components) = decl
                .child_by_field_name("parameters")
                .or_else(|| find_named_child(decl, "formal_parameters"))
            else {
                return Vec::new();
            };
            named_children_no_comments(components)
                .into_iter()
                .filter(|param| param.kind() == "formal_parameter")
                .filter_map(|param| param.child_by_field_name("name"))
                .map(|name| MethodStub::new(node_text(source, name), false, &[]))
                .collect()
        }
        _ => Vec::new(),
    }
}

/// Methods declared directly in a type's body (constructors excluded).
fn member_methods(decl: Node<'_>) -> Vec<Node<'_>> {
    let Some(body) = type_body(decl) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for member in named_children_no_comments(body) {
        match member.kind() {
            "method_declaration" => out.push(member),
            "enum_body_declarations" => out.extend(
                named_children_no_comments(member)
                    .into_iter()
                    .filter(|inner| inner.kind() == "method_declaration"),
            ),
            _ => {}
        }
    }
    out
}
