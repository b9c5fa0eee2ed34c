use std::collections::BTreeMap;
use std::fmt;

use super::skeleton::Emitter;
use super::target::Target;
use super::targets::{CSharpDialect, GoDialect, JavaDialect, NodeDialect, PythonDialect};
use super::GenerateError;

/// Maps each [`Target`] to the emitter that produces it.
///
/// Immutable once built; lookups of an unknown selector fail with
/// [`GenerateError::UnsupportedTarget`] instead of yielding an empty project.
pub struct EmitterRegistry {
    emitters: BTreeMap<Target, Box<dyn Emitter>>,
}

impl EmitterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        EmitterRegistry {
            emitters: BTreeMap::new(),
        }
    }

    /// Registry with all five shipped dialects.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(NodeDialect));
        registry.register(Box::new(PythonDialect));
        registry.register(Box::new(GoDialect));
        registry.register(Box::new(JavaDialect));
        registry.register(Box::new(CSharpDialect));
        registry
    }

    /// Add an emitter under its own target, returning the one it replaces.
    pub fn register(&mut self, emitter: Box<dyn Emitter>) -> Option<Box<dyn Emitter>> {
        self.emitters.insert(emitter.target(), emitter)
    }

    pub fn get(&self, target: Target) -> Option<&dyn Emitter> {
        self.emitters.get(&target).map(|e| e.as_ref())
    }

    /// Resolve a target selector such as `"python"`.
    pub fn resolve(&self, selector: &str) -> Result<&dyn Emitter, GenerateError> {
        let target: Target = selector.parse()?;
        self.get(target)
            .ok_or(GenerateError::NotRegistered(target))
    }

    /// Registered targets in declaration order.
    pub fn targets(&self) -> Vec<Target> {
        self.emitters.keys().copied().collect()
    }
}

impl Default for EmitterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for EmitterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmitterRegistry")
            .field("targets", &self.targets())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::tree::FileTree;
    use crate::graph::Graph;

    #[test]
    fn test_defaults_cover_every_target() {
        let registry = EmitterRegistry::with_defaults();
        assert_eq!(registry.targets(), Target::ALL.to_vec());
        for target in Target::ALL {
            let emitter = registry.resolve(target.as_str()).unwrap();
            assert_eq!(emitter.target(), target);
        }
    }

    #[test]
    fn test_unknown_selector_is_rejected() {
        let registry = EmitterRegistry::with_defaults();
        let err = registry.resolve("cobol").err().unwrap();
        assert_eq!(err.to_string(), "unsupported target 'cobol'");
    }

    #[test]
    fn test_known_but_unregistered_target() {
        let mut registry = EmitterRegistry::new();
        registry.register(Box::new(GoDialect));
        assert!(matches!(
            registry.resolve("java"),
            Err(GenerateError::NotRegistered(Target::Java))
        ));
        let mut tree = FileTree::new("p");
        registry
            .resolve("go")
            .unwrap()
            .emit(&mut tree, &Graph::default())
            .unwrap();
        assert!(tree.file("go.mod").is_some());
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = EmitterRegistry::with_defaults();
        let previous = registry.register(Box::new(NodeDialect));
        assert!(previous.is_some());
        assert_eq!(registry.targets().len(), 5);
    }
}
