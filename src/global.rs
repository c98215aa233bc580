//! The process-wide default locator.
//!
//! Most applications need one locator only. It is exposed both as the [`Global`] type,
//! for use with [`Inject`] and the [`LocatorApi`] trait, and as free functions re-exported
//! at the crate root.
//!
//! # Examples
//!
//! ```
//! use singleton_locator::{add_instance, get_instance};
//! use std::sync::Arc;
//!
//! struct FooService {
//!     name: &'static str,
//! }
//!
//! add_instance(FooService { name: "foo" }).unwrap();
//!
//! let foo: Arc<FooService> = get_instance().unwrap();
//! assert_eq!(foo.name, "foo");
//! ```

use std::any::Any;
use std::sync::{Arc, LazyLock, Mutex};

use crate::{BoxError, Inject, LocatorApi, LocatorError, LocatorEvent, LocatorState, LocatorStorage, TraceStorage};

/// Table of the global locator.
static GLOBAL_STATE: LocatorStorage = LazyLock::new(|| Mutex::new(LocatorState::new()));

/// Holds the global locator's optional tracing callback.
static GLOBAL_TRACE: TraceStorage = LazyLock::new(|| Mutex::new(None));

/// Zero-sized handle on the global locator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Global;

impl LocatorApi for Global {
    fn storage() -> &'static LocatorStorage {
        &GLOBAL_STATE
    }

    fn trace() -> &'static TraceStorage {
        &GLOBAL_TRACE
    }
}

/// Fetch the singleton instance of `T`, creating it on first use.
///
/// See [`LocatorApi::get_instance`].
pub fn get_instance<T: ?Sized + Send + Sync + 'static>() -> Result<Arc<T>, LocatorError> {
    Global.get_instance()
}

/// Register a pre-built instance under its own type.
///
/// Typically called by bootstrap code before anything resolves `T`. An instance that is
/// already wrapped in an `Arc` goes through [`add_instance_arc`] instead; passed here it
/// would be keyed as `Arc<T>`.
///
/// ```
/// use singleton_locator::{add_instance, LocatorError};
///
/// struct Settings;
///
/// add_instance(Settings).unwrap();
/// assert!(matches!(
///     add_instance(Settings),
///     Err(LocatorError::AlreadyRegistered { .. })
/// ));
/// ```
pub fn add_instance<T: Send + Sync + 'static>(value: T) -> Result<(), LocatorError> {
    Global.add_instance(value)
}

/// Register an `Arc`-wrapped instance under the explicit type `T`.
pub fn add_instance_arc<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Result<(), LocatorError> {
    Global.add_instance_arc(value)
}

/// Register a boxed `T` or `Arc<T>` under the explicit type `T`.
pub fn add_instance_any<T: Send + Sync + 'static>(
    value: Box<dyn Any + Send + Sync>,
) -> Result<(), LocatorError> {
    Global.add_instance_any::<T>(value)
}

/// Provide the zero-argument factory for `T`.
pub fn provide<T, F>(factory: F)
where
    T: Send + Sync + 'static,
    F: Fn() -> T + Send + Sync + 'static,
{
    Global.provide(factory)
}

/// Provide `T::default` as the factory for `T`.
pub fn provide_default<T: Default + Send + Sync + 'static>() {
    Global.provide_default::<T>()
}

/// Provide a fallible factory for `T`.
pub fn try_provide<T, E, F>(factory: F)
where
    T: Send + Sync + 'static,
    E: Into<BoxError>,
    F: Fn() -> Result<T, E> + Send + Sync + 'static,
{
    Global.try_provide(factory)
}

/// Provide a factory producing an `Arc<T>`; `T` may be a trait object.
pub fn provide_arc<T, F>(factory: F)
where
    T: ?Sized + Send + Sync + 'static,
    F: Fn() -> Arc<T> + Send + Sync + 'static,
{
    Global.provide_arc(factory)
}

/// Check if an instance of `T` is stored.
pub fn contains<T: ?Sized + Send + Sync + 'static>() -> Result<bool, LocatorError> {
    Global.contains::<T>()
}

/// Create a lazy binding for `T` on the global locator.
pub fn bind<T: ?Sized + Send + Sync + 'static>() -> Inject<T> {
    Global.bind()
}

/// Lock the global locator for the rest of the test. See [`LocatorApi::activate_test_mode`].
pub fn activate_test_mode() {
    Global.activate_test_mode()
}

/// Whether the global locator is in test mode.
pub fn is_test_mode() -> bool {
    Global.is_test_mode()
}

/// Drop every instance of the global locator and leave test mode.
#[doc(hidden)]
pub fn reset() {
    Global.reset()
}

/// Sets a tracing callback that will be invoked on every global locator interaction.
///
/// # Example
/// ```rust
/// use singleton_locator::set_trace_callback;
///
/// set_trace_callback(|event| println!("[locator-trace] {}", event));
/// ```
pub fn set_trace_callback(callback: impl Fn(&LocatorEvent) + Send + Sync + 'static) {
    Global.set_trace_callback(callback)
}

/// Clears the tracing callback (disables global locator tracing).
pub fn clear_trace_callback() {
    Global.clear_trace_callback()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[derive(Debug, Default)]
    struct FooService;

    #[test]
    #[serial]
    fn test_free_functions_share_global_table() {
        reset();
        provide_default::<FooService>();

        let direct: Arc<FooService> = get_instance().unwrap();
        let bound = bind::<FooService>().get().unwrap();
        assert!(Arc::ptr_eq(&direct, &bound));
        assert!(Global.contains::<FooService>().unwrap());
    }

    #[test]
    #[serial]
    fn test_reset_clears_test_mode() {
        reset();
        activate_test_mode();
        assert!(is_test_mode());

        reset();
        assert!(!is_test_mode());
        assert!(!contains::<FooService>().unwrap());
    }
}
