//! Basic usage of singleton-locator.
//!
//! Demonstrates:
//! - Declaring how a type is built
//! - Registering a pre-built instance at bootstrap
//! - Resolving directly and through lazy bindings
//!
//! Run with: `RUST_LOG=debug cargo run --example basic_usage`

use singleton_locator::{add_instance, bind, get_instance, provide_default, set_trace_callback, Inject};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct AppConfig {
    greeting: String,
}

#[derive(Debug, Default)]
struct FooService;

impl FooService {
    fn foo(&self, config: &AppConfig) -> String {
        format!("{} from FooService", config.greeting)
    }
}

struct BarService {
    foo: Inject<FooService>,
    config: Inject<AppConfig>,
}

impl BarService {
    fn new() -> Self {
        Self {
            foo: bind(),
            config: bind(),
        }
    }

    fn do_foo(&self) -> Result<String, singleton_locator::LocatorError> {
        let config = self.config.get()?;
        Ok(self.foo.get()?.foo(&config))
    }
}

fn main() -> Result<(), singleton_locator::LocatorError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Singleton Locator: Basic Usage ===\n");

    set_trace_callback(|event| println!("  [trace] {}", event));

    // Bootstrap: factories and pre-built instances
    provide_default::<FooService>();
    add_instance(AppConfig {
        greeting: "Hello".to_string(),
    })?;

    // Bindings resolve on first use
    let bar = BarService::new();
    println!("\n1. {}", bar.do_foo()?);

    // Direct lookups return the very same instance
    let foo: Arc<FooService> = get_instance()?;
    println!(
        "2. Same FooService through binding and lookup: {}",
        Arc::ptr_eq(&foo, &bar.foo.get()?)
    );

    // Stored instances are never replaced
    let second = add_instance(AppConfig {
        greeting: "Hi".to_string(),
    });
    println!("3. Registering AppConfig again: {:?}", second.map_err(|e| e.to_string()));

    println!("\n=== Done ===");
    Ok(())
}
