use std::fmt::Display;
use std::slice::Iter;

use thiserror::Error;

use crate::Position;

/// A single semantic diagnostic with the source position it was reported
/// against.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    internal_error: SemantErrorKind,
    position: Position,
}

impl Diagnostic {
    pub fn new(error_kind: SemantErrorKind, position: Position) -> Self {
        Diagnostic {
            internal_error: error_kind,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_kind(&self) -> &SemantErrorKind {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            SemantErrorKind::DuplicateClass { .. } => "DuplicateClass",
            SemantErrorKind::UnknownParent { .. } => "UnknownParent",
            SemantErrorKind::InheritanceCycle { .. } => "InheritanceCycle",
            SemantErrorKind::DuplicateAttribute { .. } => "DuplicateAttribute",
            SemantErrorKind::DuplicateMethod { .. } => "DuplicateMethod",
            SemantErrorKind::TypeMismatch { .. } => "TypeMismatch",
            SemantErrorKind::IncomparableTypes { .. } => "IncomparableTypes",
            SemantErrorKind::UnboundIdentifier { .. } => "UnboundIdentifier",
            SemantErrorKind::UndeclaredIdentifier { .. } => "UndeclaredIdentifier",
            SemantErrorKind::UnresolvedMethod { .. } => "UnresolvedMethod",
            SemantErrorKind::ArityMismatch { .. } => "ArityMismatch",
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.position, self.internal_error)
    }
}

/// Every kind of semantic error the analyzer reports.
///
/// Name fields carry resolved display text, not interner handles, so a
/// rendered message never needs the interner.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemantErrorKind {
    #[error("class {class:?} already exists")]
    DuplicateClass { class: String },
    #[error("no parent class {parent:?} found for class {class:?}")]
    UnknownParent { class: String, parent: String },
    #[error("class inheritance cycle has been detected for class {class:?}")]
    InheritanceCycle { class: String },
    #[error("class {class:?} has duplicate attribute {attribute:?}")]
    DuplicateAttribute { class: String, attribute: String },
    #[error("class {class:?} has duplicate method {method:?}")]
    DuplicateMethod { class: String, method: String },
    #[error("types do not match: expected {expected:?}, received {received:?}")]
    TypeMismatch { expected: String, received: String },
    #[error("illegal comparison between {left:?} and {right:?}")]
    IncomparableTypes { left: String, right: String },
    #[error("assignment to unbound identifier {identifier:?}")]
    UnboundIdentifier { identifier: String },
    #[error("undeclared identifier {identifier:?}")]
    UndeclaredIdentifier { identifier: String },
    #[error("no method {method:?} found for type {receiver:?}")]
    UnresolvedMethod { method: String, receiver: String },
    #[error("method {method:?} expects {expected:?} arguments, received {received:?}")]
    ArityMismatch {
        method: String,
        expected: usize,
        received: usize,
    },
}

/// Accumulates diagnostics across all stages of one compilation run.
///
/// Diagnostics are kept in production order; rendering emits one line per
/// diagnostic and a final summary line when the count is nonzero. A fresh
/// accumulator is created per run, never shared across runs.
#[derive(Debug, Default)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn report(&mut self, error_kind: SemantErrorKind, position: Position) {
        self.diagnostics.push(Diagnostic::new(error_kind, position));
    }

    pub fn count(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }
}

impl Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for diagnostic in &self.diagnostics {
            writeln!(f, "{}", diagnostic)?;
        }
        if !self.diagnostics.is_empty() {
            writeln!(f, "Compilation halted due to static semantic errors.")?;
        }
        Ok(())
    }
}
