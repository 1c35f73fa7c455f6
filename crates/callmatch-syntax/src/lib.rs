//! Java syntax support for call matchers: tree-sitter parsing, matcher
//! declarations, predicate calls, field and local declarations.

pub mod fields;
pub mod java;
pub mod matcher;
pub mod model;
pub mod predicate;

pub use fields::field_declarations;
pub use java::{parse_java, ParseError};
pub use matcher::{
    classify_literal, matcher_declaration_at, matcher_declarations, ClassifiedLiteral,
    MatcherSyntax, DEFAULT_MATCHER_CLASS,
};
pub use model::{
    ConstantRef, FieldDeclaration, FieldInitializer, LiteralPosition, LocalDeclaration, MatcherDeclaration,
    MatcherKind, MethodNameLiteral, OwnerRef, PredicateCall, PredicateMethod, StringLiteral,
    TypeLiteral,
};
pub use predicate::{predicate_call, predicate_calls};
