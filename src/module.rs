use crate::{GraphResolver, WiringError};

/// Group of related bindings, applied with [GraphResolver::install].
///
/// A module may install other modules from its own `configure`.
/// Closures taking the resolver are modules too.
pub trait Module {
    fn configure(&self, resolver: &mut GraphResolver) -> Result<(), WiringError>;
}

impl<F> Module for F
where
    F: Fn(&mut GraphResolver) -> Result<(), WiringError>,
{
    fn configure(&self, resolver: &mut GraphResolver) -> Result<(), WiringError> {
        self(resolver)
    }
}
