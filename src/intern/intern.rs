use std::collections::HashMap;

/// A stable handle for one piece of interned name text.
///
/// Two symbols from the same interner compare equal exactly when their
/// text is identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

/// Owns the name text behind every [`Symbol`] handed out in one run.
#[derive(Debug, Default)]
pub struct Interner {
    names: Vec<String>,
    indices: HashMap<String, Symbol>,
}

impl Interner {
    pub fn new() -> Self {
        Interner::default()
    }

    /// Returns the handle for `name`, interning it on first sight.
    pub fn intern(&mut self, name: &str) -> Symbol {
        if let Some(&symbol) = self.indices.get(name) {
            return symbol;
        }
        let symbol = Symbol(self.names.len() as u32);
        self.names.push(String::from(name));
        self.indices.insert(String::from(name), symbol);
        symbol
    }

    /// Returns the display text behind `symbol`.
    pub fn resolve(&self, symbol: Symbol) -> &str {
        &self.names[symbol.0 as usize]
    }
}
