use std::collections::hash_map::{Entry, HashMap};

use crate::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Resolving,
    Resolved,
}

/// Bindings indexed by key, in registration order
#[derive(Debug, Default)]
pub(crate) struct Registry {
    bindings: HashMap<Key, Binding>,
    order: Vec<Key>,
}

impl Registry {
    /// Store a binding, returning the one it replaced if the policy allows replacement.
    pub fn insert(
        &mut self,
        key: Key,
        binding: Binding,
        policy: DuplicatePolicy,
    ) -> Result<Option<Binding>, WiringError> {
        binding.check()?;
        if binding.provides().type_id() != key.type_id() {
            return Err(WiringError::TypeMismatch {
                key,
                expected: binding.provides().type_name(),
            });
        }
        match self.bindings.entry(key) {
            Entry::Vacant(v) => {
                self.order.push(v.key().clone());
                v.insert(binding);
                Ok(None)
            }
            Entry::Occupied(o) if policy == DuplicatePolicy::Reject => {
                Err(WiringError::DuplicateBinding {
                    key: o.key().clone(),
                })
            }
            Entry::Occupied(mut o) => Ok(Some(o.insert(binding))),
        }
    }

    pub fn get(&self, key: &Key) -> Option<&Binding> {
        self.bindings.get(key)
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.bindings.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.order.iter()
    }

    /// Topological order of the subgraph reachable from the root: dependencies first, each key once.
    pub fn construction_order(&self, root: &Key) -> Result<Vec<Key>, WiringError> {
        let mut marks = HashMap::new();
        let mut order = Vec::new();
        self.visit(root, None, &mut marks, &mut Vec::new(), &mut order)?;
        Ok(order)
    }

    /// Check every binding, in registration order
    pub fn validate(&self) -> Result<Vec<Key>, WiringError> {
        let mut marks = HashMap::new();
        let mut order = Vec::new();
        for key in &self.order {
            self.visit(key, None, &mut marks, &mut Vec::new(), &mut order)?;
        }
        Ok(order)
    }

    fn visit(
        &self,
        key: &Key,
        required_by: Option<&Key>,
        marks: &mut HashMap<Key, Mark>,
        path: &mut Vec<Key>,
        order: &mut Vec<Key>,
    ) -> Result<(), WiringError> {
        match marks.get(key) {
            Some(Mark::Resolved) => return Ok(()),
            Some(Mark::Resolving) => {
                // The key is on the current path: report the loop closed on itself
                let start = path.iter().position(|k| k == key).unwrap_or(0);
                let mut cycle = path[start..].to_vec();
                cycle.push(key.clone());
                return Err(WiringError::CyclicDependency { path: cycle });
            }
            None => (),
        }

        let binding = self
            .get(key)
            .ok_or_else(|| WiringError::UnresolvedDependency {
                key: key.clone(),
                required_by: required_by.cloned(),
            })?;

        marks.insert(key.clone(), Mark::Resolving);
        path.push(key.clone());
        for dependency in binding.dependencies() {
            self.visit(dependency, Some(key), marks, path, order)?;
        }
        path.pop();
        marks.insert(key.clone(), Mark::Resolved);
        order.push(key.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    struct Leaf;
    struct Branch;

    fn leaf() -> Binding {
        Binding::singleton(|| Arc::new(Leaf))
    }

    fn branch() -> Binding {
        Binding::singleton(|_: Arc<Leaf>| Arc::new(Branch))
    }

    #[test]
    fn rejects_mismatched_key() {
        let mut registry = Registry::default();
        let err = registry
            .insert(Key::of::<Arc<Branch>>(), leaf(), DuplicatePolicy::Reject)
            .unwrap_err();
        assert!(matches!(err, WiringError::TypeMismatch { .. }));
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn replace_keeps_registration_order() -> Result<(), WiringError> {
        let mut registry = Registry::default();
        registry.insert(Key::of::<Arc<Leaf>>(), leaf(), DuplicatePolicy::Replace)?;
        registry.insert(Key::of::<Arc<Branch>>(), branch(), DuplicatePolicy::Replace)?;
        let old = registry.insert(Key::of::<Arc<Leaf>>(), leaf(), DuplicatePolicy::Replace)?;

        assert!(old.is_some());
        assert_eq!(
            registry.keys().cloned().collect::<Vec<_>>(),
            vec![Key::of::<Arc<Leaf>>(), Key::of::<Arc<Branch>>()]
        );
        Ok(())
    }

    #[test]
    fn order_puts_dependencies_first() -> Result<(), WiringError> {
        let mut registry = Registry::default();
        registry.insert(Key::of::<Arc<Branch>>(), branch(), DuplicatePolicy::Reject)?;
        registry.insert(Key::of::<Arc<Leaf>>(), leaf(), DuplicatePolicy::Reject)?;

        assert_eq!(
            registry.construction_order(&Key::of::<Arc<Branch>>())?,
            vec![Key::of::<Arc<Leaf>>(), Key::of::<Arc<Branch>>()]
        );
        assert_eq!(registry.validate()?.len(), 2);
        Ok(())
    }
}
