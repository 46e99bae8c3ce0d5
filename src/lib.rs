//! Dependency graph resolver with explicit bindings, singleton caching and cycle detection.
//!
//! # Simple use case
//!
//! ```
//! # use std::sync::Arc;
//! # use wiregraph::*;
//! // Define traits and implementors
//! trait MyTrait: Send + Sync {
//!     fn cheers(&self);
//! }
//!
//! #[derive(Default)]
//! struct MyImpl;
//!
//! impl MyTrait for MyImpl {
//!   fn cheers(&self) {
//!     println!("Hello world");
//!   }
//! }
//!
//! # fn main() -> Result<(), WiringError> {
//! // Register a resolution rule for the trait object
//! let mut resolver = GraphResolver::new();
//! resolver.bind(Binding::singleton(|| -> Arc<dyn MyTrait> { Arc::new(MyImpl) }))?;
//!
//! // Inject it anywhere the resolver is available
//! let a: Arc<dyn MyTrait> = resolver.inject()?;
//! a.cheers();
//! # Ok(())
//! # }
//! ```
//!
//! # Mechanism
//!
//! The resolver combines a registry of [Binding]s indexed by [Key] with a cache of singleton
//! instances stored as [std::any::Any] values. A key is the type of the handle handed out on
//! resolution (usually an ```Arc``` to a concrete type or to a trait object), optionally
//! qualified by a tag to distinguish several bindings of the same type.
//!
//! * A [Binding] records the dependency keys of a value, its [Scope] and a factory.
//!   Bindings built from plain functions declare their argument types as dependencies.
//! * [GraphResolver::resolve] first walks the declared dependencies to reject missing bindings
//!   and cycles, then constructs the dependencies depth-first in declaration order.
//!   Singletons are built at most once, even under concurrent first access, and reused until
//!   [GraphResolver::teardown].
//! * The [Inject] trait adds typed access on top of the type-erased instances.
//!
//! The registry is an explicitly owned value: there is no global container.
//! Registration needs a mutable reference, resolution only a shared one.

mod cache;
mod config;
mod graph;
mod helpers;
mod inject;
mod key;
mod module;
mod registry;
mod resolve;

pub use config::{Config, DuplicatePolicy};
pub use graph::GraphResolver;
pub use inject::{Callable, Inject, Injectable};
pub use key::Key;
pub use module::Module;
pub use resolve::{Binding, Dependencies, Instance, Scope, WiringError};
