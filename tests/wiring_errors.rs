//! Error reporting for misconfigured graphs.

use std::sync::Arc;

use rstest::rstest;
use wiregraph::{
    Binding, Config, DuplicatePolicy, GraphResolver, Inject, Key, Scope, WiringError,
};

struct Database;
struct UserService;
struct Mailer;

fn database() -> Binding {
    Binding::singleton(|| Arc::new(Database))
}

fn user_service() -> Binding {
    Binding::singleton(|_: Arc<Database>, _: Arc<Mailer>| Arc::new(UserService))
}

fn mailer_needing_users() -> Binding {
    Binding::unscoped(|_: Arc<UserService>| Arc::new(Mailer))
}

#[rstest]
#[case::missing_root(vec![], Key::of::<Arc<UserService>>(), "no binding for")]
#[case::missing_leaf(vec![user_service()], Key::of::<Arc<Database>>(), "required by")]
#[case::cycle(vec![database(), user_service(), mailer_needing_users()], Key::of::<Arc<UserService>>(), " -> ")]
fn resolve_reports(
    #[case] bindings: Vec<Binding>,
    #[case] culprit: Key,
    #[case] message: &str,
) -> Result<(), WiringError> {
    let mut resolver = GraphResolver::new();
    for binding in bindings {
        resolver.bind(binding)?;
    }

    let err = resolver
        .resolve(&Key::of::<Arc<UserService>>())
        .unwrap_err();
    let names_culprit = match &err {
        WiringError::UnresolvedDependency { key, .. } => key == &culprit,
        WiringError::CyclicDependency { path } => path.first() == Some(&culprit),
        _ => false,
    };
    assert!(names_culprit, "{err:?} does not name {culprit}");
    assert!(err.to_string().contains(message), "{err}");
    Ok(())
}

#[test]
fn cycle_path_goes_through_every_member() -> Result<(), WiringError> {
    let mut resolver = GraphResolver::new();
    resolver.bind(database())?;
    resolver.bind(user_service())?;
    resolver.bind(mailer_needing_users())?;

    let users = Key::of::<Arc<UserService>>();
    let mailer = Key::of::<Arc<Mailer>>();
    assert_eq!(
        resolver.resolve(&users).unwrap_err(),
        WiringError::CyclicDependency {
            path: vec![users.clone(), mailer.clone(), users.clone()],
        }
    );
    assert_eq!(
        resolver.construction_order(&mailer).unwrap_err(),
        WiringError::CyclicDependency {
            path: vec![mailer.clone(), users, mailer],
        }
    );
    // the database is fine on its own
    let _: Arc<Database> = resolver.inject()?;
    Ok(())
}

#[rstest]
#[case::reject(DuplicatePolicy::Reject, false)]
#[case::replace(DuplicatePolicy::Replace, true)]
fn duplicate_policy(#[case] policy: DuplicatePolicy, #[case] accepted: bool) {
    let mut resolver = GraphResolver::with_config(Config::default().with_duplicates(policy));
    resolver.bind(database()).unwrap();

    let outcome = resolver.bind(database());
    assert_eq!(outcome.is_ok(), accepted);
    if let Err(err) = outcome {
        assert_eq!(
            err,
            WiringError::DuplicateBinding {
                key: Key::of::<Arc<Database>>()
            }
        );
    }
    assert_eq!(resolver.len(), 1);
}

#[rstest]
#[case::unqualified(Key::of::<u8>(), Key::of::<u16>())]
#[case::qualified(Key::named::<u8>("a"), Key::named::<u16>("a"))]
fn mismatched_registration(#[case] key: Key, #[case] other: Key) {
    let mut resolver = GraphResolver::new();
    let err = resolver
        .register(
            other.clone(),
            Binding::from_factory(Scope::Unscoped, vec![], |_| Ok(0u8)),
        )
        .unwrap_err();
    assert_eq!(
        err,
        WiringError::TypeMismatch {
            key: other,
            expected: "u8",
        }
    );
    assert!(!resolver.contains(&key));
}
