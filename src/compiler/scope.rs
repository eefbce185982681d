//! Lexical scopes.
//!
//! A stack of name tables. Lookups walk from the innermost scope outwards,
//! so inner declarations shadow outer ones.

use std::collections::HashMap;

use inkwell::{types::BasicTypeEnum, values::PointerValue};

/// Storage behind a declared name: its address and the type stored there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Variable<'ctx> {
    pub pointer: PointerValue<'ctx>,
    pub value_type: BasicTypeEnum<'ctx>,
}

#[derive(Debug)]
pub struct Scope<S> {
    pub label: String,
    symbols: HashMap<String, S>,
}

impl<S> Scope<S> {
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[derive(Debug)]
pub struct ScopeStack<S> {
    scopes: Vec<Scope<S>>,
}

impl<S: Copy> Default for ScopeStack<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Copy> ScopeStack<S> {
    pub fn new() -> Self {
        ScopeStack { scopes: vec![] }
    }

    pub fn push(&mut self, label: &str) {
        log::trace!("push scope `{}` (depth {})", label, self.scopes.len() + 1);
        self.scopes.push(Scope {
            label: String::from(label),
            symbols: HashMap::new(),
        });
    }

    pub fn pop(&mut self) -> Option<Scope<S>> {
        let scope = self.scopes.pop();
        if let Some(scope) = &scope {
            log::trace!(
                "pop scope `{}` with {} symbol(s) (depth {})",
                scope.label,
                scope.len(),
                self.scopes.len()
            );
        }
        scope
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Inserts into the innermost scope.
    ///
    /// Returns `false` when the name is already declared there, or when no
    /// scope is open.
    pub fn declare(&mut self, name: &str, storage: S) -> bool {
        let Some(scope) = self.scopes.last_mut() else {
            return false;
        };

        if scope.symbols.contains_key(name) {
            return false;
        }

        scope.symbols.insert(String::from(name), storage);
        true
    }

    pub fn lookup(&self, name: &str) -> Option<S> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.symbols.get(name).copied())
    }

    pub fn is_declared_innermost(&self, name: &str) -> bool {
        self.scopes
            .last()
            .map(|scope| scope.symbols.contains_key(name))
            .unwrap_or(false)
    }
}
