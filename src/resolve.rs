//! Bindings and the resolution vocabulary
//!
//! A [Binding] is the recipe to build one value of the dependency graph: it records the type
//! it provides, the ordered list of [Key]s it depends on, a [Scope] and a type-erased factory.
//!
//! * Instances travel through the resolver as [Instance], a shared [std::any::Any] holding the
//!   provided handle type (usually an `Arc` to a concrete type or to a trait object).
//!   Typed resolution clones the handle, so cached singletons stay pointer-equal.
//! * A factory receives its resolved dependencies as a [Dependencies] view, in declared order.
//!   Bindings built from plain functions extract their arguments from this view automatically.

use std::any::{type_name, Any};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::inject::{Callable, Injectable};
use crate::Key;

/// Type-erased shared value produced by a binding
pub type Instance = Arc<dyn Any + Send + Sync>;

type Factory = Arc<dyn Fn(&Dependencies<'_>) -> Result<Instance, WiringError> + Send + Sync>;

/// Lifecycle policy of the values produced by a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// A new value for every resolution
    #[default]
    Unscoped,
    /// Built once on first demand, then shared until teardown
    Singleton,
}

/// Errors triggered during the autowiring process
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WiringError {
    #[error("Unresolved dependency: no binding for {key}{}", required_by_suffix(.required_by))]
    UnresolvedDependency { key: Key, required_by: Option<Key> },
    /// The path starts at the first key met twice and ends on it again.
    ///
    /// Keys visited before entering the loop are not part of it.
    #[error("Cyclic dependencies: {}", cycle_path(.path))]
    CyclicDependency { path: Vec<Key> },
    #[error("Consistency error: a binding for {key} is already registered")]
    DuplicateBinding { key: Key },
    #[error("Type mismatch: {key} can not provide a value of type {expected}")]
    TypeMismatch { key: Key, expected: &'static str },
    #[error("Invalid binding for {key}: no dependency at position {position}")]
    UndeclaredDependency { key: Key, position: usize },
}

fn required_by_suffix(owner: &Option<Key>) -> String {
    match owner {
        Some(owner) => format!(" (required by {owner})"),
        None => String::new(),
    }
}

fn cycle_path(path: &[Key]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Resolved dependencies handed to a factory, in the order they were declared
pub struct Dependencies<'a> {
    owner: &'a Key,
    keys: &'a [Key],
    instances: &'a [Instance],
}

impl<'a> Dependencies<'a> {
    pub(crate) fn new(owner: &'a Key, keys: &'a [Key], instances: &'a [Instance]) -> Self {
        debug_assert_eq!(keys.len(), instances.len());
        Self {
            owner,
            keys,
            instances,
        }
    }

    /// Obtain a copy of the handle at the given position.
    ///
    /// Fails if the position was not declared or if it holds another type.
    pub fn get<T: Clone + 'static>(&self, position: usize) -> Result<T, WiringError> {
        let (Some(key), Some(instance)) = (self.keys.get(position), self.instances.get(position))
        else {
            return Err(WiringError::UnresolvedDependency {
                key: Key::of::<T>(),
                required_by: Some(self.owner.clone()),
            });
        };
        instance
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| WiringError::TypeMismatch {
                key: key.clone(),
                expected: type_name::<T>(),
            })
    }

    /// The key of the binding being constructed
    pub fn owner(&self) -> &Key {
        self.owner
    }

    pub fn keys(&self) -> &[Key] {
        self.keys
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// Recipe to construct the value associated to a key
#[derive(Clone)]
pub struct Binding {
    scope: Scope,
    provides: Key,
    dependencies: Vec<Key>,
    factory: Factory,
    // Builder misuse, reported on registration
    invalid: Option<WiringError>,
}

impl Binding {
    /// Build a binding from a constructor function.
    ///
    /// The arguments of the constructor become the dependencies of the binding, in order.
    /// Each argument type is looked up with its unqualified key, use [Binding::qualify_dependency]
    /// to select a tagged binding instead.
    pub fn new<Args, T, F>(scope: Scope, constructor: F) -> Self
    where
        Args: Injectable,
        T: Send + Sync + 'static,
        F: Callable<Args, T> + Send + Sync + 'static,
    {
        let factory = move |deps: &Dependencies<'_>| -> Result<Instance, WiringError> {
            let args = Args::extract(deps)?;
            Ok(Arc::new(constructor.call(args)))
        };
        Self {
            scope,
            provides: Key::of::<T>(),
            dependencies: Args::dependency_keys(),
            factory: Arc::new(factory),
            invalid: None,
        }
    }

    /// Shared value built on first demand
    pub fn singleton<Args, T, F>(constructor: F) -> Self
    where
        Args: Injectable,
        T: Send + Sync + 'static,
        F: Callable<Args, T> + Send + Sync + 'static,
    {
        Self::new(Scope::Singleton, constructor)
    }

    /// New value on every resolution
    pub fn unscoped<Args, T, F>(constructor: F) -> Self
    where
        Args: Injectable,
        T: Send + Sync + 'static,
        F: Callable<Args, T> + Send + Sync + 'static,
    {
        Self::new(Scope::Unscoped, constructor)
    }

    /// Build a binding from explicit dependency keys and a factory reading them by position
    ///
    /// ```
    /// # use wiregraph::*;
    /// let mut resolver = GraphResolver::new();
    /// resolver.bind_named("host", Binding::instance(String::from("localhost")))?;
    /// resolver.bind(Binding::from_factory(
    ///     Scope::Singleton,
    ///     vec![Key::named::<String>("host")],
    ///     |deps| {
    ///         assert_eq!(deps.owner(), &Key::of::<Vec<String>>());
    ///         let host: String = deps.get(0)?;
    ///         let tag = deps.keys()[0].qualifier().unwrap_or_default();
    ///         Ok(vec![format!("{tag}={host}")])
    ///     },
    /// ))?;
    ///
    /// let settings: Vec<String> = resolver.inject()?;
    /// assert_eq!(settings, ["host=localhost"]);
    /// # Ok::<(), WiringError>(())
    /// ```
    pub fn from_factory<T, F>(scope: Scope, dependencies: Vec<Key>, factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Dependencies<'_>) -> Result<T, WiringError> + Send + Sync + 'static,
    {
        let factory = move |deps: &Dependencies<'_>| -> Result<Instance, WiringError> {
            Ok(Arc::new(factory(deps)?))
        };
        Self {
            scope,
            provides: Key::of::<T>(),
            dependencies,
            factory: Arc::new(factory),
            invalid: None,
        }
    }

    /// Bind an already constructed value
    pub fn instance<T: Clone + Send + Sync + 'static>(value: T) -> Self {
        Self::from_factory(Scope::Singleton, Vec::new(), move |_| Ok(value.clone()))
    }

    /// Replace the dependency at the given position with its tagged variant.
    ///
    /// An undeclared position makes the registration of this binding fail.
    pub fn qualify_dependency(mut self, position: usize, tag: impl Into<Cow<'static, str>>) -> Self {
        match self.dependencies.get_mut(position) {
            Some(key) => *key = key.clone().with_qualifier(tag),
            None if self.invalid.is_none() => {
                self.invalid = Some(WiringError::UndeclaredDependency {
                    key: self.provides.clone(),
                    position,
                });
            }
            None => (),
        }
        self
    }

    /// Error recorded while building the binding, if any
    pub(crate) fn check(&self) -> Result<(), WiringError> {
        match &self.invalid {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Unqualified key of the provided type
    pub fn provides(&self) -> &Key {
        &self.provides
    }

    pub fn dependencies(&self) -> &[Key] {
        &self.dependencies
    }

    pub(crate) fn construct(&self, owner: &Key, instances: &[Instance]) -> Result<Instance, WiringError> {
        (self.factory)(&Dependencies::new(owner, &self.dependencies, instances))
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("scope", &self.scope)
            .field("provides", &self.provides)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}
