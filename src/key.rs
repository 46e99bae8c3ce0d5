use std::any::{type_name, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifies a binding in the registry: a provided type, optionally qualified by a tag.
///
/// The type is the handle handed out on resolution (typically `Arc<Concrete>` or
/// `Arc<dyn Trait>`), not the concrete struct behind it.
#[derive(Clone)]
pub struct Key {
    id: TypeId,
    name: &'static str,
    qualifier: Option<Cow<'static, str>>,
}

impl Key {
    /// Unqualified key for the type `T`
    pub fn of<T: 'static + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            qualifier: None,
        }
    }

    /// Key for the type `T` qualified by a symbolic tag
    pub fn named<T: 'static + ?Sized>(tag: impl Into<Cow<'static, str>>) -> Self {
        Self::of::<T>().with_qualifier(tag)
    }

    pub fn with_qualifier(mut self, tag: impl Into<Cow<'static, str>>) -> Self {
        self.qualifier = Some(tag.into());
        self
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    pub fn type_name(&self) -> &'static str {
        self.name
    }

    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }
}

// The type name is only for display: equality goes through the TypeId
impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.qualifier == other.qualifier
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.qualifier.hash(state);
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            None => f.write_str(self.name),
            Some(tag) => write!(f, "{}@{:?}", self.name, tag),
        }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({self})")
    }
}
