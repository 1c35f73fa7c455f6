//! Matcher-aware analyses over Java sources: reference resolution, validation,
//! matcher generation and the any-of merge rewrite.

pub mod generate;
pub mod merge;
pub mod resolve;
pub mod validate;

pub use generate::{generate, generate_with, method_at_offset, GeneratedMatcher, InstanceChoice};
pub use merge::{
    AnyOfCandidate, ConvertToAnyOf, InsertionScope, MergeEdit, MergeUnavailable, ScopeChoice,
    ScopeKind, DEFAULT_FIELD_NAME,
};
pub use resolve::{
    resolve_classified, resolve_literal_at, resolve_method, resolve_owner, LiteralResolution,
    ResolvedCandidateSet, ResolvedTarget,
};
pub use validate::{
    validate, validate_source, validate_source_with, CALLMATCHER_NO_EXACT_INSTANCE_METHOD,
    CALLMATCHER_NO_INSTANCE_METHOD, CALLMATCHER_NO_STATIC_METHOD,
};
