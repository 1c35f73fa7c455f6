//! Matcher declarations as written in Java source.

use callmatch_core::TextRange;

/// Which factory built a matcher, and therefore how its method names are looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatcherKind {
    Static,
    Instance,
    ExactInstance,
}

impl MatcherKind {
    pub const ALL: [MatcherKind; 3] = [
        MatcherKind::Static,
        MatcherKind::Instance,
        MatcherKind::ExactInstance,
    ];

    pub fn factory_name(self) -> &'static str {
        match self {
            MatcherKind::Static => "staticCall",
            MatcherKind::Instance => "instanceCall",
            MatcherKind::ExactInstance => "exactInstanceCall",
        }
    }

    pub fn from_factory_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.factory_name() == name)
    }

    /// `ExactInstance` only looks at the owner class itself.
    pub fn searches_ancestors(self) -> bool {
        !matches!(self, MatcherKind::ExactInstance)
    }

    pub fn wants_static(self) -> bool {
        matches!(self, MatcherKind::Static)
    }
}

/// A Java string literal with its quotes stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLiteral {
    pub value: String,
    /// Range of the literal including its quotes.
    pub range: TextRange,
    /// `false` for literals with escapes, text blocks and unterminated literals.
    /// Unsafe literals are never resolved.
    pub safe: bool,
}

impl StringLiteral {
    /// Build a literal from its raw source text (quotes included).
    ///
    /// Returns `None` when `raw` does not start with a quote.
    pub fn from_source(raw: &str, range: TextRange) -> Option<StringLiteral> {
        if let Some(rest) = raw.strip_prefix("\"\"\"") {
            let value = rest.strip_suffix("\"\"\"").unwrap_or(rest);
            return Some(StringLiteral {
                value: value.trim().to_string(),
                range,
                safe: false,
            });
        }

        let inner = raw.strip_prefix('"')?;
        match inner.strip_suffix('"') {
            Some(value) if !ends_with_escape(value) => Some(StringLiteral {
                value: value.to_string(),
                range,
                safe: !value.contains('\\'),
            }),
            _ => Some(StringLiteral {
                value: inner.to_string(),
                range,
                safe: false,
            }),
        }
    }

    /// Range of the literal's content, between the quotes.
    pub fn value_range(&self) -> TextRange {
        if !self.safe {
            return self.range;
        }
        let start = u32::from(self.range.start()) as usize + 1;
        callmatch_core::range(start, start + self.value.len())
    }
}

fn ends_with_escape(value: &str) -> bool {
    let trailing = value.bytes().rev().take_while(|b| *b == b'\\').count();
    trailing % 2 == 1
}

pub type MethodNameLiteral = StringLiteral;
pub type TypeLiteral = StringLiteral;

/// A reference to a constant used as a matcher owner, e.g. `NAME` or `Holder.NAME`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantRef {
    pub qualifier: Option<String>,
    pub name: String,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerRef {
    Literal(StringLiteral),
    Constant(ConstantRef),
    /// Any other expression; never resolves.
    Unsupported(TextRange),
}

impl OwnerRef {
    pub fn range(&self) -> TextRange {
        match self {
            OwnerRef::Literal(lit) => lit.range,
            OwnerRef::Constant(constant) => constant.range,
            OwnerRef::Unsupported(range) => *range,
        }
    }
}

/// One `CallMatcher.<factory>(owner, names...)` call, optionally followed by
/// `.parameterTypes(...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherDeclaration {
    pub kind: MatcherKind,
    pub owner: OwnerRef,
    /// Non-literal name arguments are dropped.
    pub method_names: Vec<MethodNameLiteral>,
    /// Constrains the last entry of `method_names`.
    pub parameter_types: Option<Vec<TypeLiteral>>,
    /// The factory call, or the whole chain when `.parameterTypes(...)` follows.
    pub range: TextRange,
    /// Fully-qualified name of the type the declaration is written in.
    /// Unqualified constant owners are looked up there.
    pub enclosing_class: Option<String>,
}

/// Where a string literal sits within a matcher declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralPosition {
    Owner,
    MethodName { index: usize },
    ParameterType { index: usize },
}

/// The methods on a matcher reference that test a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateMethod {
    Matches,
    MethodMatches,
    MethodReferenceMatches,
    UCallMatches,
    Test,
}

impl PredicateMethod {
    pub const ALL: [PredicateMethod; 5] = [
        PredicateMethod::Matches,
        PredicateMethod::MethodMatches,
        PredicateMethod::MethodReferenceMatches,
        PredicateMethod::UCallMatches,
        PredicateMethod::Test,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PredicateMethod::Matches => "matches",
            PredicateMethod::MethodMatches => "methodMatches",
            PredicateMethod::MethodReferenceMatches => "methodReferenceMatches",
            PredicateMethod::UCallMatches => "uCallMatches",
            PredicateMethod::Test => "test",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.as_str() == name)
    }
}

/// `receiver.method(tested)` where `receiver` names a matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateCall {
    /// Receiver text as written, e.g. `LIST_OF` or `Matchers.LIST_OF`.
    pub receiver: String,
    /// Last segment of the receiver.
    pub receiver_name: String,
    pub method: PredicateMethod,
    /// Tested expression text as written.
    pub tested: String,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDeclaration {
    pub name: String,
    /// Declared type text with whitespace removed.
    pub ty: String,
    pub is_static: bool,
    pub is_final: bool,
    pub initializer: Option<FieldInitializer>,
    /// Range of the whole `field_declaration` statement.
    pub range: TextRange,
    pub name_range: TextRange,
    /// Fully-qualified name of the declaring type.
    pub declaring_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInitializer {
    String(StringLiteral),
    /// A matcher factory call or a chain rooted in one.
    Matcher,
    Other,
}

/// A local variable or method parameter in scope at some statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalDeclaration {
    pub name: String,
    /// Declared with the matcher type, or initialized with a matcher expression.
    pub is_matcher: bool,
    pub name_range: TextRange,
}
