/// Register shared singletons for the selected types.
///
/// Each rule associates a type (the handle handed out on resolution, e.g. ```Arc<dyn Trait>```),
/// optionally followed by a qualifier in brackets, to a constructor function.
/// All parameters of the constructor must be resolvable by the same resolver.
///
/// The macro evaluates to ```Result<(), WiringError>``` and stops at the first failed registration.
///
/// ```
/// # use std::sync::Arc;
/// # use wiregraph::*;
/// struct Pool(String);
///
/// let mut resolver = GraphResolver::new();
/// resolve_singleton!(resolver,
///     String => || String::from("postgres://localhost"),
///     u16 ["port"] => || 5432u16,
///     Arc<Pool> => |url: String| Arc::new(Pool(url)),
/// )?;
///
/// let pool: Arc<Pool> = resolver.inject()?;
/// let port: u16 = resolver.inject_named("port")?;
/// assert_eq!(pool.0, "postgres://localhost");
/// assert_eq!(port, 5432);
/// # Ok::<(), WiringError>(())
/// ```
#[macro_export]
macro_rules! resolve_singleton {
    ($resolver:expr $(, $Type:ty $([$tag:expr])? => $constructor:expr)+ $(,)?) => {
        $crate::__register_rules!($resolver, singleton $(, $Type $([$tag])? => $constructor)+)
    };
}

/// Register on-demand instances for the selected types.
///
/// Same rule syntax as [resolve_singleton]: every resolution calls the constructor again.
#[macro_export]
macro_rules! resolve_instance {
    ($resolver:expr $(, $Type:ty $([$tag:expr])? => $constructor:expr)+ $(,)?) => {
        $crate::__register_rules!($resolver, unscoped $(, $Type $([$tag])? => $constructor)+)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __register_rules {
    ($resolver:expr, $scope:ident $(, $Type:ty $([$tag:expr])? => $constructor:expr)+) => {
        $resolver.register_all(::std::vec![$((
            $crate::Key::of::<$Type>() $(.with_qualifier($tag))?,
            $crate::Binding::$scope($constructor),
        )),+])
    };
}

