//! Thin helpers over `tree-sitter-java`.

use std::cell::RefCell;

use callmatch_core::TextRange;
use thiserror::Error;
use tree_sitter::{Node, Parser, Tree};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("tree-sitter-java language load failed")]
    LanguageLoad,
    #[error("tree-sitter parser is already in use")]
    Reentrant,
    #[error("tree-sitter failed to produce a syntax tree")]
    NoTree,
}

thread_local! {
    static JAVA_PARSER: RefCell<Result<Parser, ParseError>> = RefCell::new({
        let mut parser = Parser::new();
        match parser.set_language(tree_sitter_java::language()) {
            Ok(()) => Ok(parser),
            Err(_) => Err(ParseError::LanguageLoad),
        }
    });
}

/// Parse Java source text with `tree-sitter-java`.
///
/// The tree is error tolerant: sources with syntax errors still produce a tree,
/// and matchers in the well-formed parts of the file are still recognized.
pub fn parse_java(source: &str) -> Result<Tree, ParseError> {
    JAVA_PARSER.with(|parser_cell| {
        let mut parser = parser_cell
            .try_borrow_mut()
            .map_err(|_| ParseError::Reentrant)?;
        let parser = match parser.as_mut() {
            Ok(parser) => parser,
            Err(err) => return Err(err.clone()),
        };

        parser.parse(source, None).ok_or(ParseError::NoTree)
    })
}

/// Visit a node and all its descendants in pre-order.
pub fn visit_nodes<'a, F: FnMut(Node<'a>)>(node: Node<'a>, f: &mut F) {
    f(node);
    if node.child_count() == 0 {
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit_nodes(child, f);
    }
}

/// Find the first named child with the given kind.
pub fn find_named_child<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    let result = node
        .named_children(&mut cursor)
        .find(|child| child.kind() == kind);
    result
}

/// Named children, skipping comments.
pub fn named_children_no_comments(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    let children = node
        .named_children(&mut cursor)
        .filter(|child| !is_comment(*child))
        .collect();
    children
}

pub fn is_comment(node: Node<'_>) -> bool {
    node.kind().ends_with("comment")
}

/// Return the byte slice for `node` within `source`.
pub fn node_text<'a>(source: &'a str, node: Node<'_>) -> &'a str {
    &source[node.byte_range()]
}

pub fn node_range(node: Node<'_>) -> TextRange {
    callmatch_core::range(node.start_byte(), node.end_byte())
}

/// Whether a `modifiers` child of `node` contains the given keyword.
pub fn has_modifier(node: Node<'_>, keyword: &str) -> bool {
    let Some(modifiers) = find_named_child(node, "modifiers") else {
        return false;
    };
    let mut cursor = modifiers.walk();
    let found = modifiers
        .children(&mut cursor)
        .any(|child| child.kind() == keyword);
    found
}

/// Node kinds that declare a named Java type.
pub fn is_type_declaration(kind: &str) -> bool {
    matches!(
        kind,
        "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "record_declaration"
            | "annotation_type_declaration"
    )
}

/// The body node of a type declaration (`class_body`, `interface_body`, ...).
pub fn type_body(decl: Node<'_>) -> Option<Node<'_>> {
    decl.child_by_field_name("body").or_else(|| {
        let mut cursor = decl.walk();
        let body = decl
            .named_children(&mut cursor)
            .find(|child| child.kind().ends_with("_body"));
        body
    })
}

pub fn declaration_name<'a>(source: &'a str, decl: Node<'_>) -> Option<&'a str> {
    let name = decl
        .child_by_field_name("name")
        .or_else(|| find_named_child(decl, "identifier"))?;
    Some(node_text(source, name))
}

/// Dotted package name of the compilation unit, if declared.
pub fn package_name(source: &str, root: Node<'_>) -> Option<String> {
    let package = find_named_child(root, "package_declaration")?;
    let mut cursor = package.walk();
    let name = package
        .named_children(&mut cursor)
        .find(|child| matches!(child.kind(), "scoped_identifier" | "identifier"))?;
    Some(compact(node_text(source, name)))
}

/// Fully-qualified name of the type declared by `decl`, joining enclosing types with `.`.
///
/// Returns `None` for declarations nested inside method bodies or anonymous classes;
/// those have no name that could be written in a matcher literal.
pub fn type_declaration_fqn(source: &str, root: Node<'_>, decl: Node<'_>) -> Option<String> {
    let mut names = vec![declaration_name(source, decl)?.to_string()];
    let mut current = decl.parent();
    while let Some(node) = current {
        let kind = node.kind();
        if is_type_declaration(kind) {
            names.push(declaration_name(source, node)?.to_string());
        } else if matches!(
            kind,
            "block" | "constructor_body" | "object_creation_expression" | "lambda_expression"
        ) {
            return None;
        }
        current = node.parent();
    }
    names.reverse();

    let simple = names.join(".");
    Some(match package_name(source, root) {
        Some(package) => format!("{package}.{simple}"),
        None => simple,
    })
}

/// Nearest enclosing named type declaration of `node` (exclusive).
pub fn enclosing_type_declaration(node: Node<'_>) -> Option<Node<'_>> {
    let mut current = node.parent();
    while let Some(parent) = current {
        if is_type_declaration(parent.kind()) {
            return Some(parent);
        }
        current = parent.parent();
    }
    None
}

/// Strip all whitespace, e.g. from a dotted name split over several lines.
pub fn compact(raw: &str) -> String {
    raw.split_whitespace().collect()
}
