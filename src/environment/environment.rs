use std::collections::HashMap;

use crate::ast::types::Ty;
use crate::intern::intern::Symbol;

/// The stack of lexical frames for the class currently being checked.
///
/// A fresh stack is built per traversal; the class's attribute chain sits
/// conceptually beneath it and is consulted only when every frame misses.
#[derive(Debug, Default)]
pub struct ScopeStack {
    frames: Vec<HashMap<Symbol, Ty>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack::default()
    }

    pub fn push_frame(&mut self) {
        self.frames.push(HashMap::new());
    }

    pub fn pop_frame(&mut self) {
        self.frames.pop();
    }

    /// Binds `name` in the innermost frame, shadowing any outer binding.
    pub fn bind(&mut self, name: Symbol, ty: Ty) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name, ty);
        }
    }

    /// Looks `name` up innermost-first.
    pub fn lookup(&self, name: Symbol) -> Option<Ty> {
        for frame in self.frames.iter().rev() {
            if let Some(&ty) = frame.get(&name) {
                return Some(ty);
            }
        }
        None
    }
}
