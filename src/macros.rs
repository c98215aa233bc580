//! Macros for creating isolated locators.
//!
//! Each generated locator owns its own table, test-mode flag and trace callback, so
//! libraries and test binaries can keep their singletons apart from the global locator.

/// Creates a complete, isolated locator with a single macro invocation.
///
/// The macro generates a module containing:
/// - Storage static (hidden)
/// - Trace callback static (hidden)
/// - An `Api` struct that implements `LocatorApi`, and an `API` constant
/// - Free functions mirroring the crate-root functions of the global locator
///
/// # Examples
///
/// ```rust
/// use singleton_locator::define_locator;
/// use std::sync::Arc;
///
/// define_locator!(services);
///
/// #[derive(Default)]
/// struct FooService;
///
/// services::provide_default::<FooService>();
///
/// let first: Arc<FooService> = services::get_instance().unwrap();
/// let second: Arc<FooService> = services::get_instance().unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
/// ```
///
/// # Multiple Locators
///
/// ```rust
/// use singleton_locator::define_locator;
///
/// define_locator!(database);
/// define_locator!(cache);
///
/// database::add_instance("db_connection".to_string()).unwrap();
///
/// // No interference between locators
/// assert!(database::contains::<String>().unwrap());
/// assert!(!cache::contains::<String>().unwrap());
/// ```
///
/// # Trait-Based Usage
///
/// ```rust
/// use singleton_locator::{define_locator, LocatorApi};
/// use std::sync::Arc;
///
/// define_locator!(app);
///
/// app::API.add_instance(100i32).unwrap();
/// let value: Arc<i32> = app::API.get_instance().unwrap();
/// assert_eq!(*value, 100);
/// ```
#[macro_export]
macro_rules! define_locator {
    ($name:ident) => {
        pub mod $name {
            #![allow(dead_code)]

            use std::any::Any;
            use std::sync::{Arc, LazyLock, Mutex};

            // Table of this locator (module-private)
            static STORAGE: $crate::LocatorStorage =
                LazyLock::new(|| Mutex::new($crate::LocatorState::new()));

            // Trace callback storage (module-private)
            static TRACE: $crate::TraceStorage = LazyLock::new(|| Mutex::new(None));

            /// Zero-sized handle on this locator.
            ///
            /// All operations are provided by the `LocatorApi` trait's default
            /// implementations. This struct only provides access to the statics.
            #[derive(Debug, Clone, Copy, Default)]
            pub struct Api;

            impl $crate::LocatorApi for Api {
                fn storage() -> &'static $crate::LocatorStorage {
                    &STORAGE
                }

                fn trace() -> &'static $crate::TraceStorage {
                    &TRACE
                }
            }

            /// Convenient constant for accessing the locator API.
            pub const API: Api = Api;

            // Free functions for ergonomic usage - they delegate to API

            /// Fetch the singleton instance of `T`, creating it on first use.
            pub fn get_instance<T: ?Sized + Send + Sync + 'static>() -> Result<Arc<T>, $crate::LocatorError> {
                use $crate::LocatorApi;
                API.get_instance()
            }

            /// Register a pre-built instance under its own type.
            pub fn add_instance<T: Send + Sync + 'static>(value: T) -> Result<(), $crate::LocatorError> {
                use $crate::LocatorApi;
                API.add_instance(value)
            }

            /// Register an `Arc`-wrapped instance under the explicit type `T`.
            pub fn add_instance_arc<T: ?Sized + Send + Sync + 'static>(
                value: Arc<T>,
            ) -> Result<(), $crate::LocatorError> {
                use $crate::LocatorApi;
                API.add_instance_arc(value)
            }

            /// Register a boxed `T` or `Arc<T>` under the explicit type `T`.
            pub fn add_instance_any<T: Send + Sync + 'static>(
                value: Box<dyn Any + Send + Sync>,
            ) -> Result<(), $crate::LocatorError> {
                use $crate::LocatorApi;
                API.add_instance_any::<T>(value)
            }

            /// Provide the zero-argument factory for `T`.
            pub fn provide<T, F>(factory: F)
            where
                T: Send + Sync + 'static,
                F: Fn() -> T + Send + Sync + 'static,
            {
                use $crate::LocatorApi;
                API.provide(factory)
            }

            /// Provide `T::default` as the factory for `T`.
            pub fn provide_default<T: Default + Send + Sync + 'static>() {
                use $crate::LocatorApi;
                API.provide_default::<T>()
            }

            /// Provide a fallible factory for `T`.
            pub fn try_provide<T, E, F>(factory: F)
            where
                T: Send + Sync + 'static,
                E: Into<$crate::BoxError>,
                F: Fn() -> Result<T, E> + Send + Sync + 'static,
            {
                use $crate::LocatorApi;
                API.try_provide(factory)
            }

            /// Provide a factory producing an `Arc<T>`; `T` may be a trait object.
            pub fn provide_arc<T, F>(factory: F)
            where
                T: ?Sized + Send + Sync + 'static,
                F: Fn() -> Arc<T> + Send + Sync + 'static,
            {
                use $crate::LocatorApi;
                API.provide_arc(factory)
            }

            /// Check if an instance of `T` is stored.
            pub fn contains<T: ?Sized + Send + Sync + 'static>() -> Result<bool, $crate::LocatorError> {
                use $crate::LocatorApi;
                API.contains::<T>()
            }

            /// Create a lazy binding for `T` on this locator.
            pub fn bind<T: ?Sized + Send + Sync + 'static>() -> $crate::Inject<T, Api> {
                use $crate::LocatorApi;
                API.bind()
            }

            /// Lock this locator until the next `reset`.
            pub fn activate_test_mode() {
                use $crate::LocatorApi;
                API.activate_test_mode()
            }

            /// Whether this locator is in test mode.
            pub fn is_test_mode() -> bool {
                use $crate::LocatorApi;
                API.is_test_mode()
            }

            /// Drop every instance and leave test mode.
            #[doc(hidden)]
            pub fn reset() {
                use $crate::LocatorApi;
                API.reset()
            }

            /// Set a tracing callback for locator operations.
            pub fn set_trace_callback(callback: impl Fn(&$crate::LocatorEvent) + Send + Sync + 'static) {
                use $crate::LocatorApi;
                API.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                use $crate::LocatorApi;
                API.clear_trace_callback()
            }
        }
    };
}
