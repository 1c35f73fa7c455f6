//! Recognition of `CallMatcher` factory calls.

use std::collections::HashSet;

use callmatch_core::TextSize;
use tracing::trace;
use tree_sitter::{Node, Tree};

use crate::java::{
    compact, enclosing_type_declaration, find_named_child, named_children_no_comments, node_range,
    node_text, type_declaration_fqn, visit_nodes,
};
use crate::model::{
    ConstantRef, LiteralPosition, MatcherDeclaration, MatcherKind, OwnerRef, StringLiteral,
};

pub const DEFAULT_MATCHER_CLASS: &str = "com.siyeh.ig.callMatcher.CallMatcher";

const PARAMETER_TYPES: &str = "parameterTypes";

/// Names the matcher class whose factories are recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherSyntax {
    class_fqn: String,
}

impl Default for MatcherSyntax {
    fn default() -> Self {
        Self::new(DEFAULT_MATCHER_CLASS)
    }
}

/// A literal located inside a matcher declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLiteral {
    pub declaration: MatcherDeclaration,
    pub position: LiteralPosition,
    pub literal: StringLiteral,
}

/// Members of the matcher class reachable without qualification.
#[derive(Debug, Default)]
pub(crate) struct StaticImports {
    wildcard: bool,
    members: HashSet<String>,
}

impl StaticImports {
    fn allows(&self, member: &str) -> bool {
        self.wildcard || self.members.contains(member)
    }
}

impl MatcherSyntax {
    pub fn new(class_fqn: impl Into<String>) -> Self {
        Self {
            class_fqn: class_fqn.into(),
        }
    }

    pub fn class_fqn(&self) -> &str {
        &self.class_fqn
    }

    pub fn simple_name(&self) -> &str {
        self.class_fqn
            .rsplit('.')
            .next()
            .unwrap_or(self.class_fqn.as_str())
    }

    /// Whether a (whitespace-free) name spells the matcher class.
    pub fn names_matcher_class(&self, name: &str) -> bool {
        let simple = self.simple_name();
        name == simple
            || name == self.class_fqn
            || name
                .strip_suffix(simple)
                .is_some_and(|prefix| prefix.ends_with('.'))
    }

    pub(crate) fn static_imports(&self, source: &str, root: Node<'_>) -> StaticImports {
        let mut imports = StaticImports::default();
        let mut cursor = root.walk();
        for import in root.named_children(&mut cursor) {
            if import.kind() != "import_declaration" {
                continue;
            }
            let mut import_cursor = import.walk();
            let children: Vec<_> = import.children(&mut import_cursor).collect();
            if !children.iter().any(|child| child.kind() == "static") {
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
                if self.names_matcher_class(&name) {
                    imports.wildcard = true;
                }
                continue;
            }
            if let Some((class, member)) = name.rsplit_once('.') {
                if self.names_matcher_class(class) {
                    imports.members.insert(member.to_string());
                }
            }
        }
        imports
    }

    /// Whether `invocation` calls a member of the matcher class, either qualified
    /// or through a static import.
    fn calls_matcher_class(
        &self,
        source: &str,
        invocation: Node<'_>,
        imports: &StaticImports,
    ) -> bool {
        match invocation.child_by_field_name("object") {
            Some(object) => {
                matches!(
                    object.kind(),
                    "identifier" | "field_access" | "scoped_identifier"
                ) && self.names_matcher_class(&compact(node_text(source, object)))
            }
            None => invocation
                .child_by_field_name("name")
                .is_some_and(|name| imports.allows(node_text(source, name))),
        }
    }

    fn factory_kind(
        &self,
        source: &str,
        invocation: Node<'_>,
        imports: &StaticImports,
    ) -> Option<MatcherKind> {
        if invocation.kind() != "method_invocation" {
            return None;
        }
        let name = invocation.child_by_field_name("name")?;
        let kind = MatcherKind::from_factory_name(node_text(source, name))?;
        self.calls_matcher_class(source, invocation, imports)
            .then_some(kind)
    }

    /// All matcher declarations in the file, in source order.
    pub fn declarations(&self, source: &str, tree: &Tree) -> Vec<MatcherDeclaration> {
        let root = tree.root_node();
        let imports = self.static_imports(source, root);
        let mut out = Vec::new();
        visit_nodes(root, &mut |node| {
            if self.factory_kind(source, node, &imports).is_some() {
                if let Some(decl) = self.build_declaration(source, root, node, &imports) {
                    out.push(decl);
                }
            }
        });
        trace!(count = out.len(), "matcher declarations");
        out
    }

    /// The declaration rooted at `node`: either the factory call itself or the
    /// `.parameterTypes(...)` call chained onto it.
    pub fn declaration_at(
        &self,
        source: &str,
        tree: &Tree,
        node: Node<'_>,
    ) -> Option<MatcherDeclaration> {
        let root = tree.root_node();
        let imports = self.static_imports(source, root);
        let factory = self.factory_node(source, node, &imports)?;
        self.build_declaration(source, root, factory, &imports)
    }

    fn factory_node<'t>(
        &self,
        source: &str,
        node: Node<'t>,
        imports: &StaticImports,
    ) -> Option<Node<'t>> {
        if self.factory_kind(source, node, imports).is_some() {
            return Some(node);
        }
        if node.kind() != "method_invocation" {
            return None;
        }
        let name = node.child_by_field_name("name")?;
        if node_text(source, name) != PARAMETER_TYPES {
            return None;
        }
        let object = node.child_by_field_name("object")?;
        self.factory_kind(source, object, imports)
            .is_some()
            .then_some(object)
    }

    fn build_declaration(
        &self,
        source: &str,
        root: Node<'_>,
        factory: Node<'_>,
        imports: &StaticImports,
    ) -> Option<MatcherDeclaration> {
        let kind = self.factory_kind(source, factory, imports)?;
        let arguments = factory.child_by_field_name("arguments")?;
        let args = named_children_no_comments(arguments);
        let (first, rest) = args.split_first()?;

        let owner = owner_ref(source, *first);
        let method_names = rest
            .iter()
            .filter_map(|arg| string_literal(source, *arg))
            .collect();

        let mut range = node_range(factory);
        let mut parameter_types = None;
        if let Some(chained) = parameter_types_call(source, factory) {
            range = node_range(chained);
            parameter_types = chained.child_by_field_name("arguments").map(|args| {
                named_children_no_comments(args)
                    .into_iter()
                    .filter_map(|arg| string_literal(source, arg))
                    .collect()
            });
        }

        let enclosing_class = enclosing_type_declaration(factory)
            .and_then(|decl| type_declaration_fqn(source, root, decl));

        Some(MatcherDeclaration {
            kind,
            owner,
            method_names,
            parameter_types,
            range,
            enclosing_class,
        })
    }

    /// Whether `node` is a matcher-valued expression: a call on the matcher class,
    /// or a method chain rooted in one (`CallMatcher.instanceCall(..).parameterCount(0)`).
    pub fn is_matcher_expression(&self, source: &str, tree: &Tree, node: Node<'_>) -> bool {
        let imports = self.static_imports(source, tree.root_node());
        self.is_matcher_expression_with(source, node, &imports)
    }

    pub(crate) fn is_matcher_expression_with(
        &self,
        source: &str,
        node: Node<'_>,
        imports: &StaticImports,
    ) -> bool {
        let mut current = node;
        loop {
            if current.kind() == "parenthesized_expression" {
                match named_children_no_comments(current).first() {
                    Some(inner) => {
                        current = *inner;
                        continue;
                    }
                    None => return false,
                }
            }
            if current.kind() != "method_invocation" {
                return false;
            }
            if self.calls_matcher_class(source, current, imports) {
                return true;
            }
            match current.child_by_field_name("object") {
                Some(object) => current = object,
                None => return false,
            }
        }
    }

    /// Locate the matcher literal covering `offset`, if any.
    pub fn classify_literal(
        &self,
        source: &str,
        tree: &Tree,
        offset: TextSize,
    ) -> Option<ClassifiedLiteral> {
        let root = tree.root_node();
        let offset = u32::from(offset) as usize;
        let mut node = root.descendant_for_byte_range(offset, offset)?;
        while node.kind() != "string_literal" {
            node = node.parent()?;
            if node.kind() == "argument_list" {
                return None;
            }
        }
        let literal_node = node;
        let arguments = literal_node.parent()?;
        if arguments.kind() != "argument_list" {
            return None;
        }
        let invocation = arguments.parent()?;

        let imports = self.static_imports(source, root);
        let factory = self.factory_node(source, invocation, &imports)?;
        let declaration = self.build_declaration(source, root, factory, &imports)?;
        let literal = string_literal(source, literal_node)?;

        let args = named_children_no_comments(arguments);
        let literals_before = |skip: usize| {
            args.iter()
                .skip(skip)
                .take_while(|arg| arg.id() != literal_node.id())
                .filter(|arg| arg.kind() == "string_literal")
                .count()
        };

        let position = if invocation.id() == factory.id() {
            if args.first().map(|arg| arg.id()) == Some(literal_node.id()) {
                LiteralPosition::Owner
            } else {
                LiteralPosition::MethodName {
                    index: literals_before(1),
                }
            }
        } else {
            LiteralPosition::ParameterType {
                index: literals_before(0),
            }
        };

        Some(ClassifiedLiteral {
            declaration,
            position,
            literal,
        })
    }
}

fn parameter_types_call<'t>(source: &str, factory: Node<'t>) -> Option<Node<'t>> {
    let parent = factory.parent()?;
    if parent.kind() != "method_invocation" {
        return None;
    }
    if parent.child_by_field_name("object")?.id() != factory.id() {
        return None;
    }
    let name = parent.child_by_field_name("name")?;
    (node_text(source, name) == PARAMETER_TYPES).then_some(parent)
}

pub(crate) fn string_literal(source: &str, node: Node<'_>) -> Option<StringLiteral> {
    if node.kind() != "string_literal" {
        return None;
    }
    StringLiteral::from_source(node_text(source, node), node_range(node))
}

fn owner_ref(source: &str, node: Node<'_>) -> OwnerRef {
    match node.kind() {
        "string_literal" => match string_literal(source, node) {
            Some(lit) => OwnerRef::Literal(lit),
            None => OwnerRef::Unsupported(node_range(node)),
        },
        "identifier" => OwnerRef::Constant(ConstantRef {
            qualifier: None,
            name: node_text(source, node).to_string(),
            range: node_range(node),
        }),
        "field_access" => {
            let object = node.child_by_field_name("object");
            let field = node
                .child_by_field_name("field")
                .or_else(|| find_named_child(node, "identifier"));
            match (object, field) {
                (Some(object), Some(field))
                    if matches!(object.kind(), "identifier" | "field_access") =>
                {
                    OwnerRef::Constant(ConstantRef {
                        qualifier: Some(compact(node_text(source, object))),
                        name: node_text(source, field).to_string(),
                        range: node_range(node),
                    })
                }
                _ => OwnerRef::Unsupported(node_range(node)),
            }
        }
        _ => OwnerRef::Unsupported(node_range(node)),
    }
}

/// All matcher declarations in `source`, recognizing the default matcher class.
pub fn matcher_declarations(source: &str, tree: &Tree) -> Vec<MatcherDeclaration> {
    MatcherSyntax::default().declarations(source, tree)
}

pub fn matcher_declaration_at(
    source: &str,
    tree: &Tree,
    node: Node<'_>,
) -> Option<MatcherDeclaration> {
    MatcherSyntax::default().declaration_at(source, tree, node)
}

pub fn classify_literal(source: &str, tree: &Tree, offset: TextSize) -> Option<ClassifiedLiteral> {
    MatcherSyntax::default().classify_literal(source, tree, offset)
}
