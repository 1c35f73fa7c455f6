//! Field and local declarations, used for constant lookup and matcher detection.

use tree_sitter::{Node, Tree};

use crate::java::{
    compact, enclosing_type_declaration, has_modifier, is_type_declaration,
    named_children_no_comments, node_range, node_text, type_declaration_fqn, visit_nodes,
};
use crate::matcher::{string_literal, MatcherSyntax, StaticImports};
use crate::model::{FieldDeclaration, FieldInitializer, LocalDeclaration};

impl MatcherSyntax {
    /// Every field declared in the file, one entry per declarator.
    ///
    /// Interface constants are reported as `static final`.
    pub fn field_declarations(&self, source: &str, tree: &Tree) -> Vec<FieldDeclaration> {
        let root = tree.root_node();
        let imports = self.static_imports(source, root);
        let mut out = Vec::new();
        visit_nodes(root, &mut |node| {
            if matches!(node.kind(), "field_declaration" | "constant_declaration") {
                self.collect_fields(source, root, node, &imports, &mut out);
            }
        });
        out
    }

    fn collect_fields(
        &self,
        source: &str,
        root: Node<'_>,
        decl: Node<'_>,
        imports: &StaticImports,
        out: &mut Vec<FieldDeclaration>,
    ) {
        let Some(ty) = decl.child_by_field_name("type") else {
            return;
        };
        let ty = compact(node_text(source, ty));

        let implicit_constant = decl.kind() == "constant_declaration"
            || decl
                .parent()
                .is_some_and(|parent| parent.kind() == "interface_body");
        let is_static = implicit_constant || has_modifier(decl, "static");
        let is_final = implicit_constant || has_modifier(decl, "final");

        let declaring_type = enclosing_type_declaration(decl)
            .and_then(|owner| type_declaration_fqn(source, root, owner));

        let mut cursor = decl.walk();
        for declarator in decl.children_by_field_name("declarator", &mut cursor) {
            let Some(name) = declarator.child_by_field_name("name") else {
                continue;
            };
            let initializer = declarator.child_by_field_name("value").map(|value| {
                if let Some(lit) = string_literal(source, value) {
                    FieldInitializer::String(lit)
                } else if self.is_matcher_expression_with(source, value, imports) {
                    FieldInitializer::Matcher
                } else {
                    FieldInitializer::Other
                }
            });

            out.push(FieldDeclaration {
                name: node_text(source, name).to_string(),
                ty: ty.clone(),
                is_static,
                is_final,
                initializer,
                range: node_range(decl),
                name_range: node_range(name),
                declaring_type: declaring_type.clone(),
            });
        }
    }
}

impl MatcherSyntax {
    /// Locals declared before `statement` in its enclosing blocks, then the
    /// parameters of the enclosing method or constructor. Innermost first.
    ///
    /// The walk stops at the nearest type body, so locals of an outer method are
    /// not visible through an anonymous class.
    pub fn visible_locals(
        &self,
        source: &str,
        tree: &Tree,
        statement: Node<'_>,
    ) -> Vec<LocalDeclaration> {
        let imports = self.static_imports(source, tree.root_node());
        let before = statement.start_byte();
        let mut out = Vec::new();
        let mut current = statement.parent();
        while let Some(scope) = current {
            if is_type_declaration(scope.kind()) || scope.kind() == "class_body" {
                break;
            }
            let mut locals = Vec::new();
            for child in named_children_no_comments(scope) {
                if child.kind() == "local_variable_declaration" && child.end_byte() <= before {
                    self.collect_locals(source, child, &imports, &mut locals);
                }
            }
            out.extend(locals.into_iter().rev());

            if matches!(scope.kind(), "method_declaration" | "constructor_declaration") {
                if let Some(params) = scope.child_by_field_name("parameters") {
                    for param in named_children_no_comments(params) {
                        let (Some(ty), Some(name)) = (
                            param.child_by_field_name("type"),
                            param.child_by_field_name("name"),
                        ) else {
                            continue;
                        };
                        out.push(LocalDeclaration {
                            name: node_text(source, name).to_string(),
                            is_matcher: param.kind() == "formal_parameter"
                                && self.names_matcher_class(&compact(node_text(source, ty))),
                            name_range: node_range(name),
                        });
                    }
                }
                break;
            }
            current = scope.parent();
        }
        out
    }

    fn collect_locals(
        &self,
        source: &str,
        decl: Node<'_>,
        imports: &StaticImports,
        out: &mut Vec<LocalDeclaration>,
    ) {
        let typed_as_matcher = decl
            .child_by_field_name("type")
            .is_some_and(|ty| self.names_matcher_class(&compact(node_text(source, ty))));
        let mut cursor = decl.walk();
        for declarator in decl.children_by_field_name("declarator", &mut cursor) {
            let Some(name) = declarator.child_by_field_name("name") else {
                continue;
            };
            let initialized_as_matcher = declarator
                .child_by_field_name("value")
                .is_some_and(|value| self.is_matcher_expression_with(source, value, imports));
            out.push(LocalDeclaration {
                name: node_text(source, name).to_string(),
                is_matcher: typed_as_matcher || initialized_as_matcher,
                name_range: node_range(name),
            });
        }
    }
}

pub fn field_declarations(source: &str, tree: &Tree) -> Vec<FieldDeclaration> {
    MatcherSyntax::default().field_declarations(source, tree)
}
