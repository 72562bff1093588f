use crate::intern::intern::{Interner, Symbol};

/// The statically determined type of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ty {
    /// A class name.
    Named(Symbol),
    /// The absence of a value, e.g. an omitted attribute initializer. It
    /// conforms to every type.
    NoType,
    /// Error recovery: an absorbing element for well-formedness checks, so
    /// one failure is never reported again on an enclosing node.
    Err,
}

impl Ty {
    pub fn is_err(self) -> bool {
        self == Ty::Err
    }

    pub fn as_named(self) -> Option<Symbol> {
        match self {
            Ty::Named(name) => Some(name),
            Ty::NoType | Ty::Err => None,
        }
    }

    /// The display text used in diagnostics.
    pub fn describe(self, interner: &Interner) -> &str {
        match self {
            Ty::Named(name) => interner.resolve(name),
            Ty::NoType => "_no_type",
            Ty::Err => "_error",
        }
    }
}
