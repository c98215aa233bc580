//! Test doubles with singleton-locator.
//!
//! Demonstrates the two ways tests control dependencies:
//! - Register a fake before anything resolves the real type
//! - Activate test mode and hand fakes straight to the object under test,
//!   so any accidental use of the shared locator fails loudly
//!
//! Run with: `cargo run --example test_doubles`

use singleton_locator::{define_locator, LocatorError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

define_locator!(app);

#[derive(Debug, Default)]
struct FooService {
    calls: AtomicUsize,
}

impl FooService {
    fn foo(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

struct BarService {
    foo: singleton_locator::Inject<FooService, app::Api>,
}

impl BarService {
    fn new() -> Self {
        Self { foo: app::bind() }
    }

    fn do_foo(&self) -> Result<(), LocatorError> {
        self.foo.get()?.foo();
        Ok(())
    }
}

fn main() -> Result<(), LocatorError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Singleton Locator: Test Doubles ===\n");
    app::provide_default::<FooService>();

    // 1. Pre-registration: the fake wins over the factory
    let fake = Arc::new(FooService::default());
    app::add_instance_arc(fake.clone())?;
    BarService::new().do_foo()?;
    println!("1. Fake received {} call(s)", fake.calls.load(Ordering::SeqCst));

    // 2. Test mode: the locator refuses all access
    app::reset();
    app::activate_test_mode();

    let unwired = BarService::new();
    match unwired.do_foo() {
        Err(err) => println!("2. Unwired dependency: {}", err),
        Ok(()) => println!("2. Unexpected success"),
    }

    let mut wired = BarService::new();
    let mock = Arc::new(FooService::default());
    wired.foo.set(mock.clone());
    wired.do_foo()?;
    println!("3. Mock set on the binding received {} call(s)", mock.calls.load(Ordering::SeqCst));

    app::reset();
    println!("\n=== Done ===");
    Ok(())
}
