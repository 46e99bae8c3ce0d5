use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;
use wiregraph::*;

// Storage port and an in-memory adapter

trait Database: Send + Sync {
    fn save(&self, name: &str) -> u64;
    fn find(&self, id: u64) -> Option<String>;
}

#[derive(Default)]
struct MemoryDatabase {
    rows: Mutex<HashMap<u64, String>>,
}

impl Database for MemoryDatabase {
    fn save(&self, name: &str) -> u64 {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.len() as u64 + 1;
        rows.insert(id, name.to_owned());
        id
    }

    fn find(&self, id: u64) -> Option<String> {
        self.rows.lock().unwrap().get(&id).cloned()
    }
}

struct UserService {
    db: Arc<dyn Database>,
    greeting: String,
}

impl UserService {
    fn welcome(&self, name: &str) -> String {
        let id = self.db.save(name);
        let stored = self.db.find(id).unwrap_or_default();
        format!("{} {stored} (#{id})", self.greeting)
    }
}

// Storage rules live in their own module, services are bound by the application

struct StorageModule;

impl Module for StorageModule {
    fn configure(&self, resolver: &mut GraphResolver) -> Result<(), WiringError> {
        resolve_singleton!(resolver,
            Arc<dyn Database> => || -> Arc<dyn Database> { Arc::new(MemoryDatabase::default()) },
        )
    }
}

fn main() -> Result<(), WiringError> {
    // RUST_LOG=wiregraph=debug shows registration and construction events
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut resolver = GraphResolver::new();
    resolver.install(&StorageModule)?;
    resolver.bind_named("greeting", Binding::instance(String::from("Welcome")))?;
    resolver.bind(
        Binding::singleton(|db: Arc<dyn Database>, greeting: String| {
            Arc::new(UserService { db, greeting })
        })
        .qualify_dependency(1, "greeting"),
    )?;
    resolver.validate()?;

    for key in resolver.construction_order(&Key::of::<Arc<UserService>>())? {
        println!("build {key}");
    }

    let users: Arc<UserService> = resolver.inject()?;
    println!("{}", users.welcome("ada"));
    println!("{}", users.welcome("grace"));

    resolver.teardown();
    Ok(())
}
