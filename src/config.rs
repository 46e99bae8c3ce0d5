/// Config for a resolver
/// ## Fields
/// - `duplicates`:
///   What happens when a key is registered twice.
///
///   The default rejects the second registration with
///   [WiringError::DuplicateBinding](crate::WiringError::DuplicateBinding).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    pub duplicates: DuplicatePolicy,
}

impl Config {
    pub fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }
}

/// Handling of a registration for an already bound key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Fail the registration
    #[default]
    Reject,
    /// Overwrite the previous binding and drop its cached instance
    Replace,
}
