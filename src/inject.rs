use std::any::type_name;
use std::borrow::Cow;

use crate::resolve::Dependencies;
use crate::*;

/// Application-level dependency injection
pub trait Inject<T> {
    /// Obtain an instance of the target type.
    ///
    /// Return an error if the type could not be resolved
    fn inject(&self) -> Result<T, WiringError>;

    /// Obtain an instance of the target type bound under a qualifier.
    fn inject_named(&self, tag: impl Into<Cow<'static, str>>) -> Result<T, WiringError>;
}

/// Provide an Inject impl for all shareable handle types
impl<T: Clone + Send + Sync + 'static> Inject<T> for GraphResolver {
    fn inject(&self) -> Result<T, WiringError> {
        downcast_handle(self, Key::of::<T>())
    }

    fn inject_named(&self, tag: impl Into<Cow<'static, str>>) -> Result<T, WiringError> {
        downcast_handle(self, Key::named::<T>(tag))
    }
}

fn downcast_handle<T: Clone + 'static>(resolver: &GraphResolver, key: Key) -> Result<T, WiringError> {
    let instance = resolver.resolve(&key)?;
    instance
        .downcast_ref::<T>()
        .cloned()
        .ok_or(WiringError::TypeMismatch {
            key,
            expected: type_name::<T>(),
        })
}

impl GraphResolver {
    /// Call a function after injecting its parameter(s).
    pub fn inject_and_call<I, O, F>(&self, f: F) -> Result<O, WiringError>
    where
        I: Injectable + 'static,
        F: Callable<I, O>,
    {
        let owner = Key::of::<I>();
        let keys = I::dependency_keys();
        let instances = keys
            .iter()
            .map(|key| self.resolve(key))
            .collect::<Result<Vec<_>, _>>()?;
        let args = I::extract(&Dependencies::new(&owner, &keys, &instances))?;
        Ok(f.call(args))
    }
}

/*
 * The following is used to inject up to 10 parameters into any function
 * inspired by https://nickbryan.co.uk/software/using-a-type-map-for-dependency-injection-in-rust/
 */

/// A Callable has a ```call``` function with a single argument and a single return type.
///
/// This trait is implemented for all functions with up to 10 arguments, using a tuple to
/// wrap them all in a single type.
pub trait Callable<Args, Ret> {
    fn call(&self, args: Args) -> Ret;
}

/// Tuple of resolvable parameter types
///
/// Each element is looked up with its unqualified key and cloned out of the resolved instance.
pub trait Injectable: Sized {
    /// Keys of the elements, in order
    fn dependency_keys() -> Vec<Key>;

    /// Rebuild the tuple from resolved dependencies
    fn extract(deps: &Dependencies<'_>) -> Result<Self, WiringError>;
}

macro_rules! callable_tuple ({ $($param:ident)* } => {
    impl<Func, Ret, $($param,)*> Callable<($($param,)*), Ret> for Func
    where
        Func: Fn($($param),*) -> Ret,
    {
        #[inline]
        #[allow(non_snake_case)]
        fn call(&self, ($($param,)*): ($($param,)*)) -> Ret {
            (self)($($param,)*)
        }
    }

    // Extract such tuples from a list of resolved instances
    #[allow(clippy::unused_unit, unused_variables, unused_mut, unused_assignments)]
    impl<$($param: Clone + Send + Sync + 'static,)*> Injectable for ($($param,)*) {
        #[inline]
        fn dependency_keys() -> Vec<Key> {
            vec![$(Key::of::<$param>(),)*]
        }

        #[inline]
        fn extract(deps: &Dependencies<'_>) -> Result<Self, WiringError> {
            let mut position = 0;
            Ok(($({
                let value = deps.get::<$param>(position)?;
                position += 1;
                value
            },)*))
        }
    }
});

callable_tuple! {}
callable_tuple! { A }
callable_tuple! { A B }
callable_tuple! { A B C }
callable_tuple! { A B C D }
callable_tuple! { A B C D E }
callable_tuple! { A B C D E F }
callable_tuple! { A B C D E F G }
callable_tuple! { A B C D E F G H }
callable_tuple! { A B C D E F G H I }
callable_tuple! { A B C D E F G H I J }
