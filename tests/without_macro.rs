//! Integration tests demonstrating how to use the locator WITHOUT the macro.
//!
//! This shows the manual implementation approach, which gives you full control
//! over the locator setup, e.g. to keep the statics in a specific module.
//!
//! NOTE: All tests use #[serial] because they share the same static locator (MY_LOCATOR).

use serial_test::serial;
use singleton_locator::{Inject, LocatorApi, LocatorError, LocatorState, LocatorStorage, TraceStorage};
use std::sync::{Arc, LazyLock, Mutex};

// ============================================================================
// Manual Locator Implementation (Without Macro)
// ============================================================================

static MY_STORAGE: LocatorStorage = LazyLock::new(|| Mutex::new(LocatorState::new()));

static MY_TRACE: TraceStorage = LazyLock::new(|| Mutex::new(None));

#[derive(Debug, Clone, Copy, Default)]
struct MyLocator;

impl LocatorApi for MyLocator {
    fn storage() -> &'static LocatorStorage {
        &MY_STORAGE
    }

    fn trace() -> &'static TraceStorage {
        &MY_TRACE
    }
}

const MY_LOCATOR: MyLocator = MyLocator;

// ============================================================================
// Tests Using Manual Implementation
// ============================================================================

#[derive(Debug, Default)]
struct Config {
    retries: u8,
}

struct Client {
    config: Inject<Config, MyLocator>,
}

#[test]
#[serial]
fn test_basic_register_and_get() {
    MY_LOCATOR.reset();

    MY_LOCATOR.add_instance(Config { retries: 3 }).unwrap();

    let config: Arc<Config> = MY_LOCATOR.get_instance().unwrap();
    assert_eq!(config.retries, 3);
}

#[test]
#[serial]
fn test_binding_field_on_manual_locator() {
    MY_LOCATOR.reset();
    MY_LOCATOR.provide_default::<Config>();

    let client = Client {
        config: Inject::default(),
    };
    assert_eq!(client.config.get().unwrap().retries, 0);
}

#[test]
#[serial]
fn test_provide_arc_binds_interface() {
    MY_LOCATOR.reset();

    trait Transport: Send + Sync {
        fn name(&self) -> &'static str;
    }

    struct Tcp;

    impl Transport for Tcp {
        fn name(&self) -> &'static str {
            "tcp"
        }
    }

    MY_LOCATOR.provide_arc::<dyn Transport, _>(|| Arc::new(Tcp));

    let transport = MY_LOCATOR.bind::<dyn Transport>();
    assert_eq!(transport.get().unwrap().name(), "tcp");
}

#[test]
#[serial]
fn test_test_mode_on_manual_locator() -> Result<(), LocatorError> {
    MY_LOCATOR.reset();
    MY_LOCATOR.activate_test_mode();

    assert!(MY_LOCATOR.get_instance::<Config>().is_err());

    MY_LOCATOR.reset();
    MY_LOCATOR.add_instance(Config { retries: 1 })?;
    assert!(MY_LOCATOR.contains::<Config>()?);

    Ok(())
}
