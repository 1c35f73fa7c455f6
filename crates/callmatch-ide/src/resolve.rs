//! Resolution of matcher string literals to class and method symbols.

use std::collections::HashSet;

use callmatch_core::TextSize;
use callmatch_symbols::{ClassId, MethodId, Snapshot, SymbolProvider};
use callmatch_syntax::{
    ClassifiedLiteral, LiteralPosition, MatcherDeclaration, MatcherKind, MethodNameLiteral,
    MatcherSyntax, OwnerRef,
};
use tracing::{debug, trace};
use tree_sitter::Tree;

/// Ordered, duplicate-free methods a method-name literal refers to.
pub type ResolvedCandidateSet = Vec<MethodId>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralResolution {
    Class(ClassId),
    Methods(ResolvedCandidateSet),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedTarget {
    Class(ClassId),
    Method(MethodId),
}

impl LiteralResolution {
    /// The unique target, if there is exactly one.
    pub fn single(&self) -> Option<ResolvedTarget> {
        match self {
            LiteralResolution::Class(class) => Some(ResolvedTarget::Class(*class)),
            LiteralResolution::Methods(methods) => match methods.as_slice() {
                [method] => Some(ResolvedTarget::Method(*method)),
                _ => None,
            },
        }
    }
}

/// Resolve the owner argument of a declaration to a class.
///
/// Constant owners are evaluated exactly one level deep, in the class the
/// declaration is written in.
pub fn resolve_owner(snapshot: &Snapshot<'_>, decl: &MatcherDeclaration) -> Option<ClassId> {
    let fqn = match &decl.owner {
        OwnerRef::Literal(lit) if lit.safe => lit.value.clone(),
        OwnerRef::Literal(_) | OwnerRef::Unsupported(_) => return None,
        OwnerRef::Constant(constant) => snapshot
            .provider
            .evaluate_constant_string(constant, decl.enclosing_class.as_deref())?,
    };

    let class = snapshot.provider.find_class(&fqn);
    if class.is_none() {
        debug!(owner = %fqn, "matcher owner does not resolve");
    }
    class
}

/// Methods on `class` (and, unless `kind` is `ExactInstance`, its ancestors) that a
/// method-name literal refers to. Parameter types are not considered.
pub fn resolve_method(
    snapshot: &Snapshot<'_>,
    literal: &MethodNameLiteral,
    class: ClassId,
    kind: MatcherKind,
) -> ResolvedCandidateSet {
    if !literal.safe {
        return Vec::new();
    }

    let provider = snapshot.provider;
    let mut seen = HashSet::new();
    let out: ResolvedCandidateSet = provider
        .methods_named(class, &literal.value, kind.searches_ancestors())
        .into_iter()
        .filter(|method| provider.is_static(*method) == kind.wants_static())
        .filter(|method| seen.insert(*method))
        .collect();
    trace!(
        class = provider.class_fqn(class),
        name = %literal.value,
        ?kind,
        candidates = out.len(),
        "resolved method literal"
    );
    out
}

/// Resolve a literal already located inside a declaration.
pub fn resolve_classified(
    snapshot: &Snapshot<'_>,
    classified: &ClassifiedLiteral,
) -> Option<LiteralResolution> {
    if !classified.literal.safe {
        return None;
    }
    match classified.position {
        LiteralPosition::Owner => {
            resolve_owner(snapshot, &classified.declaration).map(LiteralResolution::Class)
        }
        LiteralPosition::MethodName { .. } => {
            let class = resolve_owner(snapshot, &classified.declaration)?;
            Some(LiteralResolution::Methods(resolve_method(
                snapshot,
                &classified.literal,
                class,
                classified.declaration.kind,
            )))
        }
        LiteralPosition::ParameterType { .. } => {
            let raw = raw_class_name(&classified.literal.value);
            snapshot.provider.find_class(raw).map(LiteralResolution::Class)
        }
    }
}

/// Resolve the matcher literal under `offset`, recognizing the default matcher class.
pub fn resolve_literal_at(
    snapshot: &Snapshot<'_>,
    source: &str,
    tree: &Tree,
    offset: TextSize,
) -> Option<LiteralResolution> {
    let classified = MatcherSyntax::default().classify_literal(source, tree, offset)?;
    resolve_classified(snapshot, &classified)
}

/// `java.util.List<?>[]...` -> `java.util.List`
fn raw_class_name(ty: &str) -> &str {
    let ty = ty.strip_suffix("...").unwrap_or(ty);
    let end = ty.find(['<', '[']).unwrap_or(ty.len());
    &ty[..end]
}
