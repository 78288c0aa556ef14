//! Class environment, method environment, and scoped symbol table.

use rustc_hash::FxHashMap;

use crate::ty::Type;

/// The parameter types and return type of a method or constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub params: Vec<Type>,
    pub return_type: Type,
}

/// Maps class name to its declared superclass, if any.
///
/// Built in a single pass over `ClassDef`s (forward references to
/// not-yet-registered superclasses are allowed during that pass); read-only
/// afterwards.
#[derive(Debug, Default)]
pub struct ClassEnv {
    superclasses: FxHashMap<String, Option<String>>,
}

impl ClassEnv {
    pub fn register(&mut self, name: impl Into<String>, superclass: Option<String>) {
        self.superclasses.insert(name.into(), superclass);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.superclasses.contains_key(name)
    }

    pub fn superclass_of(&self, name: &str) -> Option<&str> {
        self.superclasses.get(name)?.as_deref()
    }

    /// Whether `sub` is `sup` itself or a descendant of it, by walking the
    /// superclass chain. Reflexive and transitive.
    pub fn is_class_subtype(&self, sub: &str, sup: &str) -> bool {
        let mut current = sub.to_string();
        loop {
            if current == sup {
                return true;
            }
            match self.superclass_of(&current) {
                Some(parent) => current = parent.to_string(),
                None => return false,
            }
        }
    }

    /// `Class(S) <: Class(T)` per [`Self::is_class_subtype`]; primitives are
    /// subtypes only of themselves.
    pub fn is_subtype(&self, sub: &Type, sup: &Type) -> bool {
        match (sub, sup) {
            (Type::Class(s), Type::Class(t)) => self.is_class_subtype(s, t),
            (a, b) => a == b,
        }
    }
}

/// Maps `(class, method name)` to a signature, plus one constructor
/// signature per class.
#[derive(Debug, Default)]
pub struct MethodEnv {
    ctors: FxHashMap<String, Signature>,
    methods: FxHashMap<(String, String), Signature>,
}

impl MethodEnv {
    pub fn register_ctor(&mut self, class: impl Into<String>, sig: Signature) {
        self.ctors.insert(class.into(), sig);
    }

    pub fn register_method(&mut self, class: impl Into<String>, name: impl Into<String>, sig: Signature) {
        self.methods.insert((class.into(), name.into()), sig);
    }

    pub fn ctor(&self, class: &str) -> Option<&Signature> {
        self.ctors.get(class)
    }

    pub fn method_on(&self, class: &str, name: &str) -> Option<&Signature> {
        self.methods.get(&(class.to_string(), name.to_string()))
    }

    /// Walk the superclass chain starting at `class`, returning the first
    /// declaration of `name` found.
    pub fn resolve_method(&self, classes: &ClassEnv, class: &str, name: &str) -> Option<&Signature> {
        let mut current = Some(class.to_string());
        while let Some(c) = current {
            if let Some(sig) = self.method_on(&c, name) {
                return Some(sig);
            }
            current = classes.superclass_of(&c).map(str::to_string);
        }
        None
    }
}

/// A mapping from identifier to [`Type`] for a single method or constructor
/// body. `this`, fields, and parameters all live in the same frame, matching
/// the flat environment `If`/`While` bodies share with their enclosing scope.
#[derive(Debug, Default)]
pub struct SymbolTable {
    frame: FxHashMap<String, Type>,
}

impl SymbolTable {
    /// Create a table with an empty frame.
    pub fn new() -> Self {
        Self {
            frame: FxHashMap::default(),
        }
    }

    /// Declare `name`. Returns `false` without modifying the table if `name`
    /// is already declared.
    pub fn declare(&mut self, name: impl Into<String>, ty: Type) -> bool {
        let name = name.into();
        if self.frame.contains_key(&name) {
            false
        } else {
            self.frame.insert(name, ty);
            true
        }
    }

    /// Look up `name`.
    pub fn lookup(&self, name: &str) -> Option<&Type> {
        self.frame.get(name)
    }
}
