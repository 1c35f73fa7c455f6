//! `MATCHER.matches(expr)` style uses of matcher references.

use tree_sitter::{Node, Tree};

use crate::java::{compact, named_children_no_comments, node_range, node_text, visit_nodes};
use crate::model::{PredicateCall, PredicateMethod};

/// Recognize a predicate call on a matcher reference.
///
/// The receiver must be a plain name or a field access; the call must take exactly
/// one argument.
pub fn predicate_call(source: &str, node: Node<'_>) -> Option<PredicateCall> {
    if node.kind() != "method_invocation" {
        return None;
    }
    let name = node.child_by_field_name("name")?;
    let method = PredicateMethod::from_name(node_text(source, name))?;

    let receiver = node.child_by_field_name("object")?;
    let receiver_name = match receiver.kind() {
        "identifier" => node_text(source, receiver).to_string(),
        "field_access" => {
            let field = receiver.child_by_field_name("field")?;
            node_text(source, field).to_string()
        }
        _ => return None,
    };

    let arguments = node.child_by_field_name("arguments")?;
    let args = named_children_no_comments(arguments);
    let [tested] = args.as_slice() else {
        return None;
    };

    Some(PredicateCall {
        receiver: compact(node_text(source, receiver)),
        receiver_name,
        method,
        tested: node_text(source, *tested).to_string(),
        range: node_range(node),
    })
}

pub fn predicate_calls(source: &str, tree: &Tree) -> Vec<PredicateCall> {
    let mut out = Vec::new();
    visit_nodes(tree.root_node(), &mut |node| {
        if let Some(call) = predicate_call(source, node) {
            out.push(call);
        }
    });
    out
}
