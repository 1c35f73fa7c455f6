//! Diagnostics for matcher method names that name nothing.

use callmatch_core::Diagnostic;
use callmatch_symbols::{Snapshot, SymbolProvider};
use callmatch_syntax::{parse_java, MatcherDeclaration, MatcherKind, MatcherSyntax, ParseError};
use tracing::debug;

use crate::resolve::{resolve_method, resolve_owner};

pub const CALLMATCHER_NO_EXACT_INSTANCE_METHOD: &str = "CALLMATCHER_NO_EXACT_INSTANCE_METHOD";
pub const CALLMATCHER_NO_STATIC_METHOD: &str = "CALLMATCHER_NO_STATIC_METHOD";
pub const CALLMATCHER_NO_INSTANCE_METHOD: &str = "CALLMATCHER_NO_INSTANCE_METHOD";

fn missing_method(kind: MatcherKind) -> (&'static str, &'static str) {
    match kind {
        MatcherKind::ExactInstance => (
            CALLMATCHER_NO_EXACT_INSTANCE_METHOD,
            "No instance method exists with this name in the referenced class.",
        ),
        MatcherKind::Static => (
            CALLMATCHER_NO_STATIC_METHOD,
            "No static method exists with this name in the referenced class or any of its super classes.",
        ),
        MatcherKind::Instance => (
            CALLMATCHER_NO_INSTANCE_METHOD,
            "No instance method exists with this name in the referenced class or any of its super classes.",
        ),
    }
}

/// Report every method-name literal of `decl` that resolves to no method.
///
/// Nothing is reported when the owner does not resolve, for unsafe literals, or
/// for names that match several methods.
pub fn validate(snapshot: &Snapshot<'_>, decl: &MatcherDeclaration) -> Vec<Diagnostic> {
    let Some(class) = resolve_owner(snapshot, decl) else {
        return Vec::new();
    };

    let (code, message) = missing_method(decl.kind);
    decl.method_names
        .iter()
        .filter(|literal| literal.safe)
        .filter(|literal| resolve_method(snapshot, literal, class, decl.kind).is_empty())
        .map(|literal| {
            debug!(
                class = snapshot.provider.class_fqn(class),
                name = %literal.value,
                code,
                "matcher names a missing method"
            );
            Diagnostic::error(code, message, literal.range)
        })
        .collect()
}

/// Validate every declaration in `source`, recognizing the default matcher class.
pub fn validate_source(snapshot: &Snapshot<'_>, source: &str) -> Result<Vec<Diagnostic>, ParseError> {
    validate_source_with(snapshot, &MatcherSyntax::default(), source)
}

pub fn validate_source_with(
    snapshot: &Snapshot<'_>,
    syntax: &MatcherSyntax,
    source: &str,
) -> Result<Vec<Diagnostic>, ParseError> {
    let tree = parse_java(source)?;
    Ok(syntax
        .declarations(source, &tree)
        .iter()
        .flat_map(|decl| validate(snapshot, decl))
        .collect())
}
