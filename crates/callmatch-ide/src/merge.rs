//! Merge `A.matches(x) || B.matches(x)` into a single `CallMatcher.anyOf(A, B)` field.

use callmatch_core::{
    apply_text_edits, byte_range, normalize_text_edits, EditError, TextEdit, TextRange, TextSize,
};
use callmatch_syntax::java::{
    declaration_name, enclosing_type_declaration, named_children_no_comments, node_range,
    type_body, type_declaration_fqn,
};
use callmatch_syntax::{
    parse_java, predicate_call, FieldInitializer, LocalDeclaration, MatcherSyntax, ParseError,
    PredicateMethod,
};
use thiserror::Error;
use tracing::debug;
use tree_sitter::Node;

pub const DEFAULT_FIELD_NAME: &str = "CALL_MATCHER";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeUnavailable {
    #[error("the selection is empty")]
    EmptySelection,
    #[error("the selection extends past the end of the file")]
    SelectionOutOfBounds,
    #[error("the source could not be parsed")]
    Parse(#[from] ParseError),
    #[error("the selection does not cover a single expression")]
    NoExpression,
    #[error("the selected expression is not an `||` chain")]
    NotAnOrChain,
    #[error("operand {index} is not a matcher predicate call")]
    NotAPredicateCall { index: usize },
    #[error("the operands call different predicate methods")]
    MixedPredicateMethods,
    #[error("the operands test different expressions")]
    DifferentTestedExpressions,
    #[error("`{name}` is not a matcher field or local declared in this file")]
    UndeclaredMatcher { name: String },
    #[error("the expression is not inside a type that can declare a field")]
    NoEnclosingType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Class,
    Interface,
    Enum,
    Record,
    /// A statement list; the merged matcher becomes a local variable.
    Local,
}

impl ScopeKind {
    fn from_node_kind(kind: &str) -> Option<Self> {
        Some(match kind {
            "class_declaration" => ScopeKind::Class,
            "interface_declaration" => ScopeKind::Interface,
            "enum_declaration" => ScopeKind::Enum,
            "record_declaration" => ScopeKind::Record,
            _ => return None,
        })
    }
}

/// A type the merged field can be declared in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionScope {
    /// Fully-qualified name of the type, or `Type#method` for a local scope.
    pub name: String,
    pub kind: ScopeKind,
    /// Where the new field goes: after the last field, or at the top of the body.
    pub offset: TextSize,
    pub indent: String,
    /// Enum bodies without a `;` need one before any field.
    pub needs_enum_separator: bool,
    /// Fields already declared directly in the type, or the locals in scope.
    pub field_names: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeChoice<'a> {
    Single(&'a InsertionScope),
    /// Several enclosing types qualify; innermost first. The caller must pick one.
    Ambiguous(&'a [InsertionScope]),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnyOfCandidate {
    /// The `||` chain, without surrounding parentheses.
    pub expression: TextRange,
    /// Receiver text of each operand, in order.
    pub matchers: Vec<String>,
    pub method: PredicateMethod,
    pub tested: String,
    scopes: Vec<InsertionScope>,
}

impl AnyOfCandidate {
    /// Enclosing types, innermost first. Never empty.
    pub fn scopes(&self) -> &[InsertionScope] {
        &self.scopes
    }

    pub fn scope_choice(&self) -> ScopeChoice<'_> {
        match self.scopes.as_slice() {
            [single] => ScopeChoice::Single(single),
            scopes => ScopeChoice::Ambiguous(scopes),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeEdit {
    pub field_name: String,
    /// Field insertion and expression replacement, sorted by offset (coalesced when adjacent).
    pub edits: Vec<TextEdit>,
    /// The source with both edits applied.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertToAnyOf {
    pub selection: TextRange,
    pub field_name: String,
    pub syntax: MatcherSyntax,
}

impl ConvertToAnyOf {
    pub fn new(selection: TextRange) -> Self {
        Self {
            selection,
            field_name: DEFAULT_FIELD_NAME.to_string(),
            syntax: MatcherSyntax::default(),
        }
    }

    pub fn analyze(&self, source: &str) -> Result<AnyOfCandidate, MergeUnavailable> {
        let result = self.analyze_inner(source);
        if let Err(reason) = &result {
            debug!(%reason, "any-of merge unavailable");
        }
        result
    }

    fn analyze_inner(&self, source: &str) -> Result<AnyOfCandidate, MergeUnavailable> {
        if usize::from(self.selection.end()) > source.len() {
            return Err(MergeUnavailable::SelectionOutOfBounds);
        }
        let selection = trim_range(source, self.selection);
        if selection.is_empty() {
            return Err(MergeUnavailable::EmptySelection);
        }

        let tree = parse_java(source)?;
        let root = tree.root_node();
        let selected = expression_covering(root, selection)?;
        let chain = strip_parens(selected);
        if !is_or(chain) {
            return Err(MergeUnavailable::NotAnOrChain);
        }

        let mut operands = Vec::new();
        flatten_or(chain, &mut operands);

        let mut calls = Vec::with_capacity(operands.len());
        for (index, operand) in operands.into_iter().enumerate() {
            let call = predicate_call(source, operand)
                .ok_or(MergeUnavailable::NotAPredicateCall { index })?;
            calls.push(call);
        }
        let first = &calls[0];
        if calls.iter().any(|call| call.method != first.method) {
            return Err(MergeUnavailable::MixedPredicateMethods);
        }
        if calls.iter().any(|call| call.tested != first.tested) {
            return Err(MergeUnavailable::DifferentTestedExpressions);
        }

        let statement = enclosing_statement(chain);
        let locals = statement
            .map(|statement| self.syntax.visible_locals(source, &tree, statement))
            .unwrap_or_default();
        let fields = self.syntax.field_declarations(source, &tree);
        let mut uses_locals = false;
        for call in &calls {
            // The innermost declaration of a bare name shadows any field.
            let local = (call.receiver == call.receiver_name)
                .then(|| locals.iter().find(|local| local.name == call.receiver_name))
                .flatten();
            let declared = match local {
                Some(local) => {
                    uses_locals = true;
                    local.is_matcher
                }
                None => fields.iter().any(|field| {
                    field.name == call.receiver_name
                        && (self.syntax.names_matcher_class(&field.ty)
                            || field.initializer == Some(FieldInitializer::Matcher))
                }),
            };
            if !declared {
                return Err(MergeUnavailable::UndeclaredMatcher {
                    name: call.receiver.clone(),
                });
            }
        }

        let scopes = match statement.filter(|_| uses_locals) {
            Some(statement) => local_scope(source, root, statement, &locals)
                .into_iter()
                .collect(),
            None => insertion_scopes(source, root, chain),
        };
        if scopes.is_empty() {
            return Err(MergeUnavailable::NoEnclosingType);
        }

        Ok(AnyOfCandidate {
            expression: node_range(chain),
            matchers: calls.iter().map(|call| call.receiver.clone()).collect(),
            method: first.method,
            tested: first.tested.clone(),
            scopes,
        })
    }

    /// Insert the merged field into `scope` and replace the `||` chain with a single
    /// predicate call on it. Either both edits apply or neither does.
    ///
    /// # Panics
    ///
    /// If `scope` is not one of `candidate.scopes()`.
    pub fn apply(
        &self,
        source: &str,
        candidate: &AnyOfCandidate,
        scope: &InsertionScope,
    ) -> Result<MergeEdit, EditError> {
        assert!(
            candidate.scopes.contains(scope),
            "`{}` is not an insertion scope of this candidate",
            scope.name
        );

        let field_name = unique_name(&self.field_name, &scope.field_names);
        let matcher_type = self.syntax.simple_name();
        let declaration = format!(
            "{matcher_type} {field_name} = {matcher_type}.anyOf({});",
            candidate.matchers.join(", ")
        );

        let mut field = String::new();
        match scope.kind {
            ScopeKind::Local => {
                field.push_str(&declaration);
                field.push('\n');
                field.push_str(&scope.indent);
            }
            kind => {
                if scope.needs_enum_separator {
                    field.push(';');
                }
                field.push('\n');
                field.push_str(&scope.indent);
                if kind != ScopeKind::Interface {
                    field.push_str("private static final ");
                }
                field.push_str(&declaration);
            }
        }

        let replacement = format!(
            "{field_name}.{}({})",
            candidate.method.as_str(),
            candidate.tested
        );

        let mut edits = vec![
            TextEdit::insert(scope.offset, field),
            TextEdit::new(candidate.expression, replacement),
        ];
        normalize_text_edits(source, &mut edits)?;
        let text = apply_text_edits(source, &edits)?;
        Ok(MergeEdit {
            field_name,
            edits,
            text,
        })
    }
}

fn trim_range(source: &str, range: TextRange) -> TextRange {
    let bytes = source.as_bytes();
    let (mut start, mut end) = (usize::from(range.start()), usize::from(range.end()));
    while start < end && bytes[start].is_ascii_whitespace() {
        start += 1;
    }
    while start < end && bytes[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    callmatch_core::range(start, end)
}

/// The outermost expression whose range is exactly `selection`.
fn expression_covering(root: Node<'_>, selection: TextRange) -> Result<Node<'_>, MergeUnavailable> {
    let span = byte_range(selection);
    let mut node = root
        .descendant_for_byte_range(span.start, span.end)
        .filter(|node| node.byte_range() == span)
        .ok_or(MergeUnavailable::NoExpression)?;

    let mut best = None;
    loop {
        if matches!(node.kind(), "binary_expression" | "parenthesized_expression") {
            best = Some(node);
        }
        match node.parent() {
            Some(parent) if parent.byte_range() == span => node = parent,
            _ => break,
        }
    }
    best.ok_or(MergeUnavailable::NotAnOrChain)
}

fn strip_parens(mut node: Node<'_>) -> Node<'_> {
    while node.kind() == "parenthesized_expression" {
        match named_children_no_comments(node).first() {
            Some(inner) => node = *inner,
            None => break,
        }
    }
    node
}

fn is_or(node: Node<'_>) -> bool {
    node.kind() == "binary_expression"
        && node
            .child_by_field_name("operator")
            .is_some_and(|op| op.kind() == "||")
}

/// Operands of a left-nested `||` chain. Parenthesized sub-chains stay single operands.
fn flatten_or<'t>(node: Node<'t>, out: &mut Vec<Node<'t>>) {
    if !is_or(node) {
        out.push(node);
        return;
    }
    for field in ["left", "right"] {
        if let Some(operand) = node.child_by_field_name(field) {
            flatten_or(operand, out);
        }
    }
}

/// The statement containing `expression` that sits directly in a statement list.
fn enclosing_statement(expression: Node<'_>) -> Option<Node<'_>> {
    let mut node = expression;
    loop {
        let parent = node.parent()?;
        match parent.kind() {
            "block" | "constructor_body" | "switch_block_statement_group" => return Some(node),
            "class_body" | "interface_body" | "enum_body" | "lambda_expression" => return None,
            _ => node = parent,
        }
    }
}

/// Declare the merged matcher as a local right before `statement`.
fn local_scope(
    source: &str,
    root: Node<'_>,
    statement: Node<'_>,
    locals: &[LocalDeclaration],
) -> Option<InsertionScope> {
    let owner = enclosing_type_declaration(statement)?;
    let type_name = type_declaration_fqn(source, root, owner)?;
    let mut method = statement.parent();
    while let Some(node) = method {
        if matches!(node.kind(), "method_declaration" | "constructor_declaration") {
            break;
        }
        method = node.parent();
    }
    let name = match method.and_then(|method| declaration_name(source, method)) {
        Some(method) => format!("{type_name}#{method}"),
        None => type_name,
    };
    debug!(scope = %name, offset = statement.start_byte(), "any-of local scope");

    Some(InsertionScope {
        name,
        kind: ScopeKind::Local,
        offset: TextSize::from(statement.start_byte() as u32),
        indent: indentation_at(source, statement.start_byte()),
        needs_enum_separator: false,
        field_names: locals.iter().map(|local| local.name.clone()).collect(),
    })
}

fn insertion_scopes(source: &str, root: Node<'_>, expression: Node<'_>) -> Vec<InsertionScope> {
    let mut out = Vec::new();
    let mut current = expression.parent();
    while let Some(node) = current {
        current = node.parent();
        let Some(kind) = ScopeKind::from_node_kind(node.kind()) else {
            continue;
        };
        let (Some(name), Some(body)) = (type_declaration_fqn(source, root, node), type_body(node))
        else {
            continue;
        };
        out.push(insertion_scope(source, node, body, name, kind));
    }
    out
}

fn insertion_scope(
    source: &str,
    decl: Node<'_>,
    body: Node<'_>,
    name: String,
    kind: ScopeKind,
) -> InsertionScope {
    let mut members = named_children_no_comments(body);
    let declarations = members
        .iter()
        .position(|member| member.kind() == "enum_body_declarations");
    if let Some(idx) = declarations {
        let nested = named_children_no_comments(members[idx]);
        members.extend(nested);
    }

    let fields: Vec<Node<'_>> = members
        .iter()
        .copied()
        .filter(|member| matches!(member.kind(), "field_declaration" | "constant_declaration"))
        .collect();
    let field_names = fields
        .iter()
        .flat_map(|field| {
            let mut cursor = field.walk();
            let names: Vec<String> = field
                .children_by_field_name("declarator", &mut cursor)
                .filter_map(|declarator| declarator.child_by_field_name("name"))
                .map(|name| source[name.byte_range()].to_string())
                .collect();
            names
        })
        .collect();

    let indent = match members.first() {
        Some(member) => indentation_at(source, member.start_byte()),
        None => format!("{}    ", indentation_at(source, decl.start_byte())),
    };

    let mut needs_enum_separator = false;
    let offset = match (fields.last(), declarations) {
        (Some(last), _) => last.end_byte(),
        (None, Some(idx)) => members[idx].start_byte() + 1,
        (None, None) if kind == ScopeKind::Enum => {
            needs_enum_separator = true;
            let close = body.end_byte().saturating_sub(1);
            source[..close].trim_end().len()
        }
        (None, None) => body.start_byte() + 1,
    };

    debug!(
        scope = %name,
        decl = declaration_name(source, decl).unwrap_or_default(),
        offset,
        "any-of insertion scope"
    );

    InsertionScope {
        name,
        kind,
        offset: TextSize::from(offset as u32),
        indent,
        needs_enum_separator,
        field_names,
    }
}

fn unique_name(base: &str, taken: &[String]) -> String {
    if !taken.iter().any(|name| name == base) {
        return base.to_string();
    }
    (2..)
        .map(|suffix| format!("{base}{suffix}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}

fn line_start_offset(source: &str, offset: usize) -> usize {
    source[..offset].rfind('\n').map(|p| p + 1).unwrap_or(0)
}

fn indentation_at(source: &str, offset: usize) -> String {
    let start = line_start_offset(source, offset);
    source[start..offset]
        .chars()
        .take_while(|c| c.is_whitespace() && *c != '\n' && *c != '\r')
        .collect()
}
