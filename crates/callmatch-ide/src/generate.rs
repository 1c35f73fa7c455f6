//! Matcher declarations synthesized from method symbols.

use callmatch_core::TextSize;
use callmatch_symbols::{
    canonical_parameter_types, ClassId, MethodId, Snapshot, SymbolProvider, TypeScope,
};
use callmatch_syntax::java::{
    enclosing_type_declaration, named_children_no_comments, node_text, type_declaration_fqn,
};
use callmatch_syntax::{MatcherKind, MatcherSyntax};
use tracing::debug;
use tree_sitter::{Node, Tree};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedMatcher {
    Static(String),
    /// Instance methods can be matched with or without ancestors; the caller picks.
    Instance {
        instance: String,
        exact_instance: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceChoice {
    Instance,
    ExactInstance,
}

impl GeneratedMatcher {
    /// The declaration text for `choice`. Static matchers ignore the choice.
    pub fn choose(&self, choice: InstanceChoice) -> &str {
        match (self, choice) {
            (GeneratedMatcher::Static(text), _) => text,
            (GeneratedMatcher::Instance { instance, .. }, InstanceChoice::Instance) => instance,
            (
                GeneratedMatcher::Instance { exact_instance, .. },
                InstanceChoice::ExactInstance,
            ) => exact_instance,
        }
    }

    pub fn is_static(&self) -> bool {
        matches!(self, GeneratedMatcher::Static(_))
    }
}

/// Build the matcher declaration text for `method` using the default matcher class.
pub fn generate(snapshot: &Snapshot<'_>, method: MethodId) -> GeneratedMatcher {
    generate_with(snapshot, &MatcherSyntax::default(), method)
}

pub fn generate_with(
    snapshot: &Snapshot<'_>,
    syntax: &MatcherSyntax,
    method: MethodId,
) -> GeneratedMatcher {
    let provider = snapshot.provider;
    let render = |kind: MatcherKind| {
        let mut text = format!(
            "{}.{}(\"{}\", \"{}\")",
            syntax.simple_name(),
            kind.factory_name(),
            provider.declaring_class_fqn(method),
            provider.method_name(method),
        );
        let params = provider.parameter_types(method);
        if !params.is_empty() {
            let quoted: Vec<_> = params.iter().map(|ty| format!("\"{ty}\"")).collect();
            text.push_str(".parameterTypes(");
            text.push_str(&quoted.join(", "));
            text.push(')');
        }
        text.push(';');
        text
    };

    if provider.is_static(method) {
        GeneratedMatcher::Static(render(MatcherKind::Static))
    } else {
        GeneratedMatcher::Instance {
            instance: render(MatcherKind::Instance),
            exact_instance: render(MatcherKind::ExactInstance),
        }
    }
}

/// The method named by the identifier under `offset`: either a method declaration,
/// or a call whose receiver is absent, `this`, a `new` expression or a class name.
pub fn method_at_offset(
    snapshot: &Snapshot<'_>,
    source: &str,
    tree: &Tree,
    offset: TextSize,
) -> Option<MethodId> {
    let root = tree.root_node();
    let offset = u32::from(offset) as usize;
    let name = identifier_at(root, offset)?;
    let parent = name.parent()?;
    if parent.child_by_field_name("name").map(|n| n.id()) != Some(name.id()) {
        return None;
    }

    let provider = snapshot.provider;
    let scope = TypeScope::from_file(source, root, |fqn: &str| {
        provider.find_class(fqn).is_some()
    });
    let method_name = node_text(source, name);
    let context = enclosing_type_declaration(parent)
        .and_then(|decl| type_declaration_fqn(source, root, decl));

    let found = match parent.kind() {
        "method_declaration" => {
            let class = provider.find_class(context.as_deref()?)?;
            let params = canonical_parameter_types(&scope, source, root, parent);
            provider
                .methods_named(class, method_name, false)
                .into_iter()
                .find(|method| provider.parameter_types(*method) == params.as_slice())
        }
        "method_invocation" => {
            let arg_count = parent
                .child_by_field_name("arguments")
                .map(|args| named_children_no_comments(args).len())
                .unwrap_or(0);
            receiver_classes(snapshot, &scope, source, root, parent, context.as_deref())
                .into_iter()
                .find_map(|class| {
                    provider
                        .methods_named(class, method_name, true)
                        .into_iter()
                        .find(|method| accepts_arity(provider.parameter_types(*method), arg_count))
                })
        }
        _ => None,
    };

    if found.is_none() {
        debug!(name = method_name, "no method symbol under offset");
    }
    found
}

fn identifier_at(root: Node<'_>, offset: usize) -> Option<Node<'_>> {
    let node = root.descendant_for_byte_range(offset, offset)?;
    if node.kind() == "identifier" {
        return Some(node);
    }
    // A caret right after the name lands on the following token.
    let before = root.descendant_for_byte_range(offset.checked_sub(1)?, offset.checked_sub(1)?)?;
    (before.kind() == "identifier" && before.end_byte() == offset).then_some(before)
}

fn accepts_arity(params: &[String], arg_count: usize) -> bool {
    match params.last() {
        Some(last) if last.ends_with("...") => arg_count + 1 >= params.len(),
        _ => params.len() == arg_count,
    }
}

/// Classes to search for the invoked method, nearest first.
fn receiver_classes<K: Fn(&str) -> bool>(
    snapshot: &Snapshot<'_>,
    scope: &TypeScope<K>,
    source: &str,
    root: Node<'_>,
    invocation: Node<'_>,
    context: Option<&str>,
) -> Vec<ClassId> {
    let provider = snapshot.provider;
    let find = |written: &str| provider.find_class(&scope.qualify(written, context));

    match invocation.child_by_field_name("object") {
        None => {
            // Unqualified: the enclosing class, then each outer class.
            let mut out = Vec::new();
            let mut current = enclosing_type_declaration(invocation);
            while let Some(decl) = current {
                if let Some(class) = type_declaration_fqn(source, root, decl)
                    .and_then(|fqn| provider.find_class(&fqn))
                {
                    out.push(class);
                }
                current = enclosing_type_declaration(decl);
            }
            out
        }
        Some(object) => match object.kind() {
            "this" => context.and_then(|fqn| provider.find_class(fqn)).into_iter().collect(),
            "object_creation_expression" => object
                .child_by_field_name("type")
                .and_then(|ty| {
                    let written = match ty.kind() {
                        "generic_type" => named_children_no_comments(ty)
                            .into_iter()
                            .next()
                            .map(|base| node_text(source, base))?,
                        _ => node_text(source, ty),
                    };
                    find(written)
                })
                .into_iter()
                .collect(),
            "identifier" | "field_access" | "scoped_identifier" => {
                find(node_text(source, object)).into_iter().collect()
            }
            _ => Vec::new(),
        },
    }
}
