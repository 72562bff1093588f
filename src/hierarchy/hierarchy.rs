use std::collections::HashMap;

use crate::ast::ast::{ClassDef, Method};
use crate::ast::types::Ty;
use crate::errors::errors::{Diagnostics, SemantErrorKind};
use crate::intern::intern::{Interner, Symbol};
use crate::Position;

/// The callable shape of a method: its ordered formals (name and declared
/// type) and the declared return type.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSig {
    pub name: Symbol,
    pub formals: Vec<(Symbol, Symbol)>,
    pub return_type: Symbol,
}

impl MethodSig {
    pub fn of(method: &Method) -> Self {
        MethodSig {
            name: method.name,
            formals: method
                .formals
                .iter()
                .map(|formal| (formal.name, formal.declared_type))
                .collect(),
            return_type: method.return_type,
        }
    }

    pub fn arity(&self) -> usize {
        self.formals.len()
    }
}

/// Everything the analyzer keeps per installed class: the declared parent,
/// the derived children list, the connectivity mark, and the feature tables
/// built from the class's own feature list.
#[derive(Debug)]
pub struct ClassInfo {
    pub name: Symbol,
    pub parent: Option<Symbol>,
    pub position: Position,
    pub children: Vec<Symbol>,
    pub marked: bool,
    pub attributes: HashMap<Symbol, Symbol>,
    pub methods: HashMap<Symbol, MethodSig>,
}

/// The registry of all classes of one compilation, keyed by name, with the
/// operators derived from the inheritance tree.
///
/// Installation order is preserved so every later walk is deterministic.
#[derive(Debug)]
pub struct ClassHierarchy {
    root: Symbol,
    classes: HashMap<Symbol, ClassInfo>,
    order: Vec<Symbol>,
}

impl ClassHierarchy {
    pub fn new(root: Symbol) -> Self {
        ClassHierarchy {
            root,
            classes: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn root(&self) -> Symbol {
        self.root
    }

    pub fn contains(&self, name: Symbol) -> bool {
        self.classes.contains_key(&name)
    }

    pub fn get(&self, name: Symbol) -> Option<&ClassInfo> {
        self.classes.get(&name)
    }

    pub fn get_mut(&mut self, name: Symbol) -> Option<&mut ClassInfo> {
        self.classes.get_mut(&name)
    }

    /// Registers `class`. A name collision reports `DuplicateClass` against
    /// the offending definition and keeps the first one.
    pub fn install(&mut self, class: &ClassDef, interner: &Interner, diagnostics: &mut Diagnostics) {
        if self.classes.contains_key(&class.name) {
            diagnostics.report(
                SemantErrorKind::DuplicateClass {
                    class: interner.resolve(class.name).to_string(),
                },
                class.position.clone(),
            );
            return;
        }
        self.classes.insert(
            class.name,
            ClassInfo {
                name: class.name,
                parent: class.parent,
                position: class.position.clone(),
                children: Vec::new(),
                marked: false,
                attributes: HashMap::new(),
                methods: HashMap::new(),
            },
        );
        self.order.push(class.name);
    }

    /// Builds the children adjacency from the declared parent links.
    ///
    /// Every class with a parent that was never installed reports
    /// `UnknownParent`; the remaining links are still built.
    pub fn link(&mut self, interner: &Interner, diagnostics: &mut Diagnostics) {
        for name in self.order.clone() {
            let info = &self.classes[&name];
            let Some(parent) = info.parent else {
                continue;
            };
            let position = info.position.clone();
            match self.classes.get_mut(&parent) {
                Some(parent_info) => parent_info.children.push(name),
                None => diagnostics.report(
                    SemantErrorKind::UnknownParent {
                        class: interner.resolve(name).to_string(),
                        parent: interner.resolve(parent).to_string(),
                    },
                    position,
                ),
            }
        }
    }

    /// Walks the tree from the root, marking every reachable class.
    ///
    /// A marked class seen again is an inheritance cycle; so is any class
    /// the walk never reached (a cycle disconnected from the root). Both
    /// are reported against the offending class, and the check stops at the
    /// first failure.
    pub fn check_connectivity(&mut self, interner: &Interner, diagnostics: &mut Diagnostics) {
        let mut stack = vec![self.root];
        while let Some(name) = stack.pop() {
            let Some(info) = self.classes.get_mut(&name) else {
                continue;
            };
            if info.marked {
                diagnostics.report(
                    SemantErrorKind::InheritanceCycle {
                        class: interner.resolve(name).to_string(),
                    },
                    info.position.clone(),
                );
                return;
            }
            info.marked = true;
            stack.extend(info.children.iter().copied());
        }

        for name in &self.order {
            let info = &self.classes[name];
            if !info.marked {
                diagnostics.report(
                    SemantErrorKind::InheritanceCycle {
                        class: interner.resolve(*name).to_string(),
                    },
                    info.position.clone(),
                );
                return;
            }
        }
    }

    fn parent_of(&self, name: Symbol) -> Option<Symbol> {
        self.classes.get(&name).and_then(|info| info.parent)
    }

    /// Whether `a` conforms to `b`.
    ///
    /// Reflexive; the error-recovery type conforms both ways; the no-type
    /// sentinel conforms to everything. Otherwise `a`'s parent chain is
    /// walked until `b` is found or the chain ends. A name with no installed
    /// class simply ends the walk, since unknown names enter legally through
    /// unchecked instantiation.
    pub fn is_subtype(&self, a: Ty, b: Ty) -> bool {
        if a == b || a.is_err() || b.is_err() {
            return true;
        }
        if a == Ty::NoType {
            return true;
        }
        let (Some(a_name), Some(b_name)) = (a.as_named(), b.as_named()) else {
            return false;
        };
        let mut current = a_name;
        loop {
            if current == b_name {
                return true;
            }
            match self.parent_of(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// The most specific common ancestor of `a` and `b`.
    ///
    /// Climbs `a`'s parent chain until an ancestor of `b` is found; the root
    /// is the fallback once the chain is exhausted. Terminates because the
    /// connectivity check has already proven the chain acyclic.
    pub fn least_upper_bound(&self, a: Ty, b: Ty) -> Ty {
        if self.is_subtype(a, b) {
            return b;
        }
        if self.is_subtype(b, a) {
            return a;
        }
        let Some(a_name) = a.as_named() else {
            return Ty::Named(self.root);
        };
        match self.parent_of(a_name) {
            Some(parent) => self.least_upper_bound(Ty::Named(parent), b),
            None => Ty::Named(self.root),
        }
    }

    /// Looks up an attribute in `class`'s own table, then up the parent
    /// chain. Inherited visibility is a query, never a merged table.
    pub fn resolve_attribute(&self, class: Symbol, name: Symbol) -> Option<Symbol> {
        let mut current = class;
        loop {
            let info = self.classes.get(&current)?;
            if let Some(&declared_type) = info.attributes.get(&name) {
                return Some(declared_type);
            }
            current = info.parent?;
        }
    }

    /// Looks up a method in `class`'s own table, then up the parent chain.
    pub fn resolve_method(&self, class: Symbol, name: Symbol) -> Option<&MethodSig> {
        let mut current = class;
        loop {
            let info = self.classes.get(&current)?;
            if let Some(signature) = info.methods.get(&name) {
                return Some(signature);
            }
            current = info.parent?;
        }
    }
}
