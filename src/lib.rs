//! # Singleton Locator
//!
//! A process-wide, single-instance service locator with lazy bindings and a test-mode
//! lockout.
//!
//! Code declares a dependency on a type and receives the one shared instance of that type:
//! created on first use by the factory provided for it, or registered up front by
//! bootstrap or test setup code. Stored instances are never replaced.
//!
//! ## Quick Start
//!
//! ```rust
//! use singleton_locator::{bind, get_instance, provide_default};
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct FooService;
//!
//! // Declare how to build the type
//! provide_default::<FooService>();
//!
//! // Resolve it directly, or lazily through a binding
//! let direct: Arc<FooService> = get_instance().unwrap();
//! let binding = bind::<FooService>();
//! assert!(Arc::ptr_eq(&direct, &binding.get().unwrap()));
//! ```
//!
//! ## Features
//!
//! - **Thread-safe**: lookup, creation and registration share one lock per locator, so a
//!   type is never constructed twice
//! - **Type-safe**: instances are keyed by `TypeId`; trait objects can be keys too
//! - **Lazy**: [`Inject`] resolves on first read and caches the result
//! - **Test mode**: [`activate_test_mode`] makes every locator access fail loudly
//! - **Tracing support**: structured `tracing` logs and an optional event callback
//!
//! ## Main Functions
//!
//! - [`get_instance`] - Fetch or create the singleton of a type
//! - [`add_instance`] / [`add_instance_arc`] / [`add_instance_any`] - Register a pre-built instance
//! - [`provide`] / [`provide_default`] / [`try_provide`] / [`provide_arc`] - Declare how a type is built
//! - [`bind`] - Create a lazy binding
//! - [`activate_test_mode`] - Lock the locator for unit tests
//! - [`set_trace_callback`] - Set up tracing for locator operations
//! - [`define_locator!`] - Create further isolated locators

mod global;
mod inject;
mod locator_error;
mod locator_event;
mod locator_trait;
mod macros;
mod state;

pub use global::{
    activate_test_mode, add_instance, add_instance_any, add_instance_arc, bind, clear_trace_callback,
    contains, get_instance, is_test_mode, provide, provide_arc, provide_default, reset,
    set_trace_callback, try_provide, Global,
};
pub use inject::Inject;
pub use locator_error::{Access, BoxError, LocatorError};
pub use locator_event::LocatorEvent;
pub use locator_trait::LocatorApi;
pub use state::{LocatorState, LocatorStorage, TraceCallback, TraceStorage};
