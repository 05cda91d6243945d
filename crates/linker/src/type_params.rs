//! Lexical type-parameter scopes
//!
//! Type parameters are not addressed by FQN. A bare name such as `T` resolves
//! to the declaration visible at the current nesting point, innermost scope
//! first. The stack is emptied at every project boundary.

use std::collections::HashMap;
use tsgraph_core::DeclId;

#[derive(Debug, Default)]
pub struct TypeParameterScopes {
    scopes: Vec<HashMap<String, DeclId>>,
}

impl TypeParameterScopes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters a construct that may introduce type parameters
    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Registers a parameter in the innermost scope
    ///
    /// Returns `false` when no scope is open and the parameter was ignored.
    pub fn register_parameter(&mut self, name: &str, declaration: DeclId) -> bool {
        match self.scopes.last_mut() {
            Some(scope) => {
                scope.insert(name.to_string(), declaration);
                true
            }
            None => false,
        }
    }

    pub fn resolve_parameter(&self, name: &str) -> Option<DeclId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn reset(&mut self) {
        self.scopes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_scope_shadows_outer() {
        let mut scopes = TypeParameterScopes::new();
        scopes.push_scope();
        scopes.register_parameter("T", DeclId(1));

        scopes.push_scope();
        scopes.register_parameter("T", DeclId(2));
        assert_eq!(scopes.resolve_parameter("T"), Some(DeclId(2)));
        scopes.pop_scope();

        assert_eq!(scopes.resolve_parameter("T"), Some(DeclId(1)));
    }

    #[test]
    fn test_outer_parameter_visible_in_nested_scope() {
        let mut scopes = TypeParameterScopes::new();
        scopes.push_scope();
        scopes.register_parameter("K", DeclId(3));
        scopes.push_scope();
        scopes.register_parameter("V", DeclId(4));

        assert_eq!(scopes.resolve_parameter("K"), Some(DeclId(3)));
        assert_eq!(scopes.resolve_parameter("V"), Some(DeclId(4)));
        assert_eq!(scopes.resolve_parameter("X"), None);
        assert_eq!(scopes.depth(), 2);
    }

    #[test]
    fn test_register_without_scope_is_ignored() {
        let mut scopes = TypeParameterScopes::new();
        assert!(!scopes.register_parameter("T", DeclId(0)));
        assert_eq!(scopes.resolve_parameter("T"), None);
    }

    #[test]
    fn test_reset_clears_every_scope() {
        let mut scopes = TypeParameterScopes::new();
        scopes.push_scope();
        scopes.push_scope();
        scopes.register_parameter("T", DeclId(0));
        scopes.reset();
        assert_eq!(scopes.depth(), 0);
        assert_eq!(scopes.resolve_parameter("T"), None);
    }
}
