use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use crate::cache::InstanceCache;
use crate::registry::Registry;
use crate::resolve::Instance;
use crate::*;

/// Dependency injection registry.
///
/// Bindings are registered through a mutable reference, then instances are resolved
/// through shared references, possibly from several threads.
/// Singleton instances are cached until [GraphResolver::teardown] or drop.
pub struct GraphResolver {
    config: Config,
    registry: Registry,
    cache: InstanceCache,
    // Keys whose dependency subgraph is known to be complete and acyclic
    verified: Mutex<HashSet<Key>>,
}

impl Default for GraphResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphResolver {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            registry: Registry::default(),
            cache: InstanceCache::default(),
            verified: Mutex::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Associate a binding to a key.
    ///
    /// Return an error if the key is already bound (unless the config allows replacement)
    /// or if the binding provides another type than the key.
    pub fn register(&mut self, key: Key, binding: Binding) -> Result<(), WiringError> {
        let scope = binding.scope();
        let replaced = self
            .registry
            .insert(key.clone(), binding, self.config.duplicates)?;
        if replaced.is_some() {
            tracing::warn!(key = %key, "Replaced an existing binding");
            self.cache.remove(&key);
        }
        self.verified
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        tracing::debug!(key = %key, ?scope, "Registered binding");
        Ok(())
    }

    /// Register a list of bindings, stopping at the first failure
    pub fn register_all(
        &mut self,
        rules: impl IntoIterator<Item = (Key, Binding)>,
    ) -> Result<(), WiringError> {
        rules
            .into_iter()
            .try_for_each(|(key, binding)| self.register(key, binding))
    }

    /// Register a binding under the unqualified key of the type it provides
    pub fn bind(&mut self, binding: Binding) -> Result<(), WiringError> {
        let key = binding.provides().clone();
        self.register(key, binding)
    }

    /// Register a binding under a qualified key of the type it provides
    pub fn bind_named(
        &mut self,
        tag: impl Into<Cow<'static, str>>,
        binding: Binding,
    ) -> Result<(), WiringError> {
        let key = binding.provides().clone().with_qualifier(tag);
        self.register(key, binding)
    }

    /// Apply the bindings of a module
    pub fn install(&mut self, module: &impl Module) -> Result<(), WiringError> {
        module.configure(self)
    }

    /// Obtain an instance for the key, constructing its dependencies as needed.
    pub fn resolve(&self, key: &Key) -> Result<Instance, WiringError> {
        let binding = self
            .registry
            .get(key)
            .ok_or_else(|| WiringError::UnresolvedDependency {
                key: key.clone(),
                required_by: None,
            })?;

        if binding.scope() == Scope::Singleton {
            if let Some(instance) = self.cache.get(key) {
                tracing::trace!(key = %key, "Reusing cached instance");
                return Ok(instance);
            }
        }

        self.verify(key)?;
        self.instantiate(key, binding)
    }

    /// Check that every binding can be constructed, without constructing anything.
    pub fn validate(&self) -> Result<(), WiringError> {
        let order = self.registry.validate()?;
        self.verified
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(order);
        Ok(())
    }

    /// Order in which the key and its transitive dependencies get constructed,
    /// dependencies first and each key listed once.
    pub fn construction_order(&self, key: &Key) -> Result<Vec<Key>, WiringError> {
        self.registry.construction_order(key)
    }

    /// Discard all cached singletons: the next resolutions construct new ones.
    pub fn teardown(&self) {
        let discarded = self.cache.clear();
        tracing::debug!(discarded, "Cleared instance cache");
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.registry.contains(key)
    }

    /// Number of registered bindings
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered keys, in registration order
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.registry.keys()
    }

    /// Number of singleton instances currently cached
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    fn verify(&self, key: &Key) -> Result<(), WiringError> {
        if self
            .verified
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
        {
            return Ok(());
        }
        let order = self.registry.construction_order(key)?;
        self.verified
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(order);
        Ok(())
    }

    fn instantiate(&self, key: &Key, binding: &Binding) -> Result<Instance, WiringError> {
        match binding.scope() {
            Scope::Singleton => self
                .cache
                .get_or_try_init(key, || self.construct(key, binding)),
            Scope::Unscoped => self.construct(key, binding),
        }
    }

    fn construct(&self, key: &Key, binding: &Binding) -> Result<Instance, WiringError> {
        let instances = binding
            .dependencies()
            .iter()
            .map(|dependency| {
                let inner = self.registry.get(dependency).ok_or_else(|| {
                    WiringError::UnresolvedDependency {
                        key: dependency.clone(),
                        required_by: Some(key.clone()),
                    }
                })?;
                self.instantiate(dependency, inner)
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(key = %key, scope = ?binding.scope(), "Constructing instance");
        binding.construct(key, &instances)
    }
}

impl fmt::Debug for GraphResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphResolver")
            .field("config", &self.config)
            .field("bindings", &self.registry.len())
            .field("cached", &self.cache.len())
            .finish()
    }
}
