use std::collections::{HashMap, HashSet, VecDeque};

use callmatch_syntax::ConstantRef;
use tracing::trace;

use crate::{ClassId, MethodId, Revision, SymbolProvider};

pub(crate) const JAVA_LANG_OBJECT: &str = "java.lang.Object";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

/// A class to be added to a [`SymbolTable`].
///
/// Supertypes are written as candidate name lists: the first candidate that names
/// a known class wins. Sources cannot always tell `pkg.Base` from `java.lang.Base`
/// before every file is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassStub {
    pub fqn: String,
    pub kind: ClassKind,
    pub super_class: Option<Vec<String>>,
    pub interfaces: Vec<Vec<String>>,
    /// Single-type imports visible in the declaring file, as `(simple name, fqn)`.
    pub imports: Vec<(String, String)>,
}

impl ClassStub {
    pub fn new(fqn: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            fqn: fqn.into(),
            kind,
            super_class: None,
            interfaces: Vec::new(),
            imports: Vec::new(),
        }
    }

    pub fn extends(mut self, fqn: &str) -> Self {
        self.super_class = Some(vec![fqn.to_string()]);
        self
    }

    pub fn implements(mut self, fqn: &str) -> Self {
        self.interfaces.push(vec![fqn.to_string()]);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodStub {
    pub name: String,
    pub is_static: bool,
    pub parameter_types: Vec<String>,
}

impl MethodStub {
    pub fn new(name: impl Into<String>, is_static: bool, parameter_types: &[&str]) -> Self {
        Self {
            name: name.into(),
            is_static,
            parameter_types: parameter_types.iter().map(|ty| ty.to_string()).collect(),
        }
    }
}

#[derive(Debug)]
struct ClassData {
    stub: ClassStub,
    methods: Vec<MethodId>,
    /// `static final String` fields; `None` when the initializer is not a plain literal.
    constants: HashMap<String, Option<String>>,
}

#[derive(Debug)]
struct MethodData {
    class: ClassId,
    stub: MethodStub,
}

/// In-memory class and method table.
#[derive(Debug, Default)]
pub struct SymbolTable {
    revision: Revision,
    classes: Vec<ClassData>,
    methods: Vec<MethodData>,
    by_fqn: HashMap<String, ClassId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table pre-populated with the built-in JDK stubs.
    pub fn with_builtin_jdk() -> Self {
        let mut table = Self::new();
        crate::install_builtin_jdk(&mut table);
        table
    }

    fn bump(&mut self) {
        self.revision = Revision(self.revision.0 + 1);
    }

    /// Add a class, or return the existing id when `stub.fqn` is already known.
    ///
    /// A later declaration of the same class replaces its supertypes but keeps its
    /// members, so stubs can be refined by sources.
    pub fn add_class(&mut self, stub: ClassStub) -> ClassId {
        self.bump();
        if let Some(&id) = self.by_fqn.get(&stub.fqn) {
            self.classes[id.idx()].stub = stub;
            return id;
        }

        let id = ClassId::new(self.classes.len() as u32);
        self.by_fqn.insert(stub.fqn.clone(), id);
        self.classes.push(ClassData {
            stub,
            methods: Vec::new(),
            constants: HashMap::new(),
        });
        id
    }

    pub fn add_method(&mut self, class: ClassId, stub: MethodStub) -> MethodId {
        self.bump();
        let id = MethodId::new(self.methods.len() as u32);
        self.methods.push(MethodData { class, stub });
        self.classes[class.idx()].methods.push(id);
        id
    }

    /// Record a `static final String` field. `value` is `None` when the initializer
    /// is anything but a plain string literal.
    pub fn add_constant(&mut self, class: ClassId, name: impl Into<String>, value: Option<String>) {
        self.bump();
        self.classes[class.idx()]
            .constants
            .insert(name.into(), value);
    }

    pub fn class_kind(&self, class: ClassId) -> ClassKind {
        self.classes[class.idx()].stub.kind
    }

    pub fn class_methods(&self, class: ClassId) -> &[MethodId] {
        &self.classes[class.idx()].methods
    }

    pub fn method_class(&self, method: MethodId) -> ClassId {
        self.methods[method.idx()].class
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    fn resolve_candidates(&self, candidates: &[String]) -> Option<ClassId> {
        candidates.iter().find_map(|name| self.find_class(name))
    }

    fn direct_supertypes(&self, class: ClassId) -> impl Iterator<Item = ClassId> + '_ {
        let stub = &self.classes[class.idx()].stub;
        stub.super_class
            .iter()
            .chain(stub.interfaces.iter())
            .filter_map(|candidates| self.resolve_candidates(candidates))
    }

    /// `class` followed by all of its ancestors, breadth-first; `java.lang.Object` last.
    pub fn ancestry(&self, class: ClassId) -> Vec<ClassId> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(class);

        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            out.push(current);
            for supertype in self.direct_supertypes(current) {
                if !seen.contains(&supertype) {
                    queue.push_back(supertype);
                }
            }
        }

        if let Some(object) = self.find_class(JAVA_LANG_OBJECT) {
            if seen.insert(object) {
                out.push(object);
            }
        }
        out
    }

    fn constant_in_hierarchy(&self, class: ClassId, name: &str) -> Option<Option<&String>> {
        self.ancestry(class).into_iter().find_map(|current| {
            self.classes[current.idx()]
                .constants
                .get(name)
                .map(|value| value.as_ref())
        })
    }

    /// Resolve a class name as written inside `context`: fully qualified, through a
    /// single-type import, or relative to an enclosing class or package.
    fn resolve_written_class(&self, written: &str, context: Option<&str>) -> Option<ClassId> {
        if let Some(id) = self.find_class(written) {
            return Some(id);
        }
        let context = context?;

        let (head, tail) = match written.split_once('.') {
            Some((head, tail)) => (head, Some(tail)),
            None => (written, None),
        };
        if let Some(ctx) = self.find_class(context) {
            let imported = self.classes[ctx.idx()]
                .stub
                .imports
                .iter()
                .find(|(simple, _)| simple == head)
                .map(|(_, fqn)| match tail {
                    Some(tail) => format!("{fqn}.{tail}"),
                    None => fqn.clone(),
                });
            if let Some(id) = imported.and_then(|fqn| self.find_class(&fqn)) {
                return Some(id);
            }
        }

        let mut prefix = context;
        loop {
            if let Some(id) = self.find_class(&format!("{prefix}.{written}")) {
                return Some(id);
            }
            prefix = prefix.rsplit_once('.')?.0;
        }
    }
}

impl SymbolProvider for SymbolTable {
    fn revision(&self) -> Revision {
        self.revision
    }

    fn find_class(&self, fqn: &str) -> Option<ClassId> {
        if let Some(id) = self.by_fqn.get(fqn) {
            return Some(*id);
        }
        if fqn.contains('$') {
            return self.by_fqn.get(&fqn.replace('$', ".")).copied();
        }
        None
    }

    fn class_fqn(&self, class: ClassId) -> &str {
        &self.classes[class.idx()].stub.fqn
    }

    fn methods_named(&self, class: ClassId, name: &str, include_ancestors: bool) -> Vec<MethodId> {
        let classes = if include_ancestors {
            self.ancestry(class)
        } else {
            vec![class]
        };

        let out: Vec<MethodId> = classes
            .into_iter()
            .flat_map(|current| self.classes[current.idx()].methods.iter().copied())
            .filter(|method| self.methods[method.idx()].stub.name == name)
            .collect();
        trace!(class = self.class_fqn(class), name, count = out.len(), "methods_named");
        out
    }

    fn method_name(&self, method: MethodId) -> &str {
        &self.methods[method.idx()].stub.name
    }

    fn is_static(&self, method: MethodId) -> bool {
        self.methods[method.idx()].stub.is_static
    }

    fn declaring_class_fqn(&self, method: MethodId) -> &str {
        self.class_fqn(self.method_class(method))
    }

    fn parameter_types(&self, method: MethodId) -> &[String] {
        &self.methods[method.idx()].stub.parameter_types
    }

    fn evaluate_constant_string(
        &self,
        constant: &ConstantRef,
        context: Option<&str>,
    ) -> Option<String> {
        if let Some(qualifier) = &constant.qualifier {
            let class = self.resolve_written_class(qualifier, context)?;
            return self
                .constant_in_hierarchy(class, &constant.name)
                .flatten()
                .cloned();
        }

        // Unqualified: the context class and its ancestors, then each enclosing class.
        let mut scope = context?;
        loop {
            if let Some(class) = self.find_class(scope) {
                if let Some(value) = self.constant_in_hierarchy(class, &constant.name) {
                    return value.cloned();
                }
            }
            scope = scope.rsplit_once('.')?.0;
        }
    }
}
