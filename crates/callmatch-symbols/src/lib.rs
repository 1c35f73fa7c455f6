//! Class and method symbols consumed by the matcher resolver.
//!
//! [`SymbolTable`] is the only provider implementation. It is seeded with a small
//! built-in JDK stub set ([`SymbolTable::with_builtin_jdk`]) and extended with
//! symbols read from Java sources ([`SourceLoader`]).

mod jdk;
mod source;
mod table;

pub use jdk::install_builtin_jdk;
pub use source::{
    canonical_parameter_types, SourceLoadError, SourceLoader, TypeScope, JAVA_LANG_TYPES,
};
pub use table::{ClassKind, ClassStub, MethodStub, SymbolTable};

use callmatch_syntax::ConstantRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u32);

impl ClassId {
    pub(crate) fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(u32);

impl MethodId {
    pub(crate) fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Bumped on every mutation of a provider; ids are only meaningful within one revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Revision(pub u64);

/// Read-only view of the classes and methods a matcher can refer to.
pub trait SymbolProvider {
    fn revision(&self) -> Revision;

    /// Look up a class by fully-qualified name, nested classes joined with `.`.
    fn find_class(&self, fqn: &str) -> Option<ClassId>;

    fn class_fqn(&self, class: ClassId) -> &str;

    /// Methods called `name` on `class`, optionally followed by those of its ancestors.
    ///
    /// Ancestors are visited breadth-first (superclass before interfaces, each in
    /// declaration order) with `java.lang.Object` implicitly last. Overriding methods
    /// are not collapsed.
    fn methods_named(&self, class: ClassId, name: &str, include_ancestors: bool) -> Vec<MethodId>;

    fn method_name(&self, method: MethodId) -> &str;

    fn is_static(&self, method: MethodId) -> bool;

    fn declaring_class_fqn(&self, method: MethodId) -> &str;

    /// Canonical parameter type texts, e.g. `java.lang.String...` or `java.util.List<?>`.
    fn parameter_types(&self, method: MethodId) -> &[String];

    /// Value of a `static final String` constant initialized with a plain literal.
    ///
    /// `context` is the class the reference is written in; unqualified names are
    /// looked up there and in its ancestors. Only one level of indirection is
    /// followed: a constant initialized from another constant does not evaluate.
    fn evaluate_constant_string(&self, constant: &ConstantRef, context: Option<&str>)
        -> Option<String>;
}

/// A provider pinned at one revision for the duration of a single pass.
#[derive(Clone, Copy)]
pub struct Snapshot<'a> {
    pub provider: &'a dyn SymbolProvider,
    pub revision: Revision,
}

impl<'a> Snapshot<'a> {
    pub fn new(provider: &'a dyn SymbolProvider) -> Self {
        Self {
            provider,
            revision: provider.revision(),
        }
    }
}

impl std::fmt::Debug for Snapshot<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}
