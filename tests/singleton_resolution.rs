//! Integration tests for fetch-or-create resolution.
//!
//! NOTE: All tests use #[serial] because they share the same locator (resolution).
//! Running them in parallel would cause interference.

use serial_test::serial;
use singleton_locator::{define_locator, LocatorError};
use std::error::Error as _;
use std::fmt;
use std::sync::Arc;

define_locator!(resolution);

#[derive(Debug, Default)]
struct FooService;

impl FooService {
    fn foo(&self) -> &'static str {
        "foo"
    }
}

#[derive(Debug)]
struct NeedsArguments {
    _port: u16,
}

#[derive(Debug)]
struct DiskFull;

impl fmt::Display for DiskFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "disk full")
    }
}

impl std::error::Error for DiskFull {}

#[derive(Debug)]
struct Storage;

#[test]
#[serial]
fn test_get_returns_same_instance() {
    resolution::reset();
    resolution::provide_default::<FooService>();

    let first: Arc<FooService> = resolution::get_instance().unwrap();
    let second: Arc<FooService> = resolution::get_instance().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.foo(), "foo");
}

#[test]
#[serial]
fn test_get_and_bind_return_same_instance() {
    resolution::reset();
    resolution::provide_default::<FooService>();

    let direct: Arc<FooService> = resolution::get_instance().unwrap();
    let bound = resolution::bind::<FooService>().get().unwrap();

    assert!(Arc::ptr_eq(&direct, &bound));
}

#[test]
#[serial]
fn test_type_without_factory_fails() {
    resolution::reset();

    let err = resolution::get_instance::<NeedsArguments>().unwrap_err();
    assert!(matches!(err, LocatorError::NoDefaultConstructor { .. }));
    assert_eq!(err.type_name(), std::any::type_name::<NeedsArguments>());
}

#[test]
#[serial]
fn test_failing_factory_propagates_source() {
    resolution::reset();
    resolution::try_provide::<Storage, _, _>(|| Err(DiskFull));

    let err = resolution::get_instance::<Storage>().unwrap_err();
    assert!(matches!(err, LocatorError::ConstructorFailed { .. }));
    let source = err.source().unwrap();
    assert!(source.downcast_ref::<DiskFull>().is_some());
    assert!(!resolution::contains::<Storage>().unwrap());

    // A corrected factory is used on the next resolution.
    resolution::try_provide::<Storage, DiskFull, _>(|| Ok(Storage));
    assert!(resolution::get_instance::<Storage>().is_ok());
}

#[test]
#[serial]
fn test_reset_allows_fresh_construction() {
    resolution::reset();
    resolution::provide_default::<FooService>();

    let before: Arc<FooService> = resolution::get_instance().unwrap();
    resolution::reset();
    let after: Arc<FooService> = resolution::get_instance().unwrap();

    assert!(!Arc::ptr_eq(&before, &after));
}

#[test]
#[serial]
fn test_reset_allows_fresh_registration() {
    resolution::reset();
    resolution::provide_default::<FooService>();
    let _: Arc<FooService> = resolution::get_instance().unwrap();

    resolution::reset();
    let registered = Arc::new(FooService);
    resolution::add_instance_arc(registered.clone()).unwrap();

    let resolved: Arc<FooService> = resolution::get_instance().unwrap();
    assert!(Arc::ptr_eq(&registered, &resolved));
}

#[test]
#[serial]
fn test_provide_after_creation_keeps_instance() {
    resolution::reset();
    resolution::provide(|| 1u64);
    let first: Arc<u64> = resolution::get_instance().unwrap();

    resolution::provide(|| 2u64);
    let second: Arc<u64> = resolution::get_instance().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(*second, 1);
}
