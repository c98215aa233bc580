//! Core trait defining locator behavior.
//!
//! This module provides the `LocatorApi` trait with default implementations for
//! fetch-or-create resolution, registration, test-mode lockout and tracing of singleton
//! instances.
//!
//! The locator is type-based: each type (`TypeId`) can have exactly one instance stored,
//! and a stored instance is never replaced. Instances are created on first use by the
//! factory provided for their type, or registered up front by bootstrap or test code.

use std::any::{type_name, Any};
use std::sync::{Arc, MutexGuard, PoisonError};

use tracing::{debug, trace, warn};

use crate::{Access, BoxError, Inject, LocatorError, LocatorEvent, LocatorState, LocatorStorage, TraceStorage};

/// Core trait defining locator behavior.
///
/// Provides default implementations for all locator operations, requiring only
/// two accessor methods (`storage` and `trace`) to be implemented by the implementor.
///
/// # Deadlocks
///
/// Factories run while the locator's table lock is held, so a factory must NOT call any
/// method of the same locator. Factories build a value out of nothing; resolving other
/// dependencies belongs to the code that uses them, typically through [`Inject`].
pub trait LocatorApi {
    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Access the trace callback static.
    fn trace() -> &'static TraceStorage;

    /// Set a tracing callback for locator operations.
    ///
    /// The callback will be invoked for every locator operation, including rejected ones.
    /// It runs after both the table lock and the trace lock have been released, so it may
    /// call back into the same locator, including replacing or clearing itself. A callback
    /// that triggers an event from inside itself is invoked again for that event; guard
    /// against unbounded recursion.
    fn set_trace_callback(&self, callback: impl Fn(&LocatorEvent) + Send + Sync + 'static) {
        let mut guard = Self::trace().lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(Arc::new(callback));
    }

    /// Clear the tracing callback.
    ///
    /// Does not affect stored instances, factories or test mode.
    fn clear_trace_callback(&self) {
        let mut guard = Self::trace().lock().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }

    /// Invoke the current trace callback, if any, with `event`.
    fn emit_event(&self, event: &LocatorEvent) {
        let callback = Self::trace()
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Table access
    // -------------------------------------------------------------------------------------------------

    /// Access the storage static.
    fn storage() -> &'static LocatorStorage;

    /// Lock the table.
    ///
    /// A poisoned lock is recovered: the table is only written after a factory has
    /// returned, so a panicking factory never leaves a half-written entry behind.
    #[doc(hidden)]
    fn state(&self) -> MutexGuard<'static, LocatorState> {
        Self::storage().lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Log and trace a failed operation.
    #[doc(hidden)]
    fn report(&self, err: &LocatorError) {
        match err {
            LocatorError::TestModeViolation { access, type_name } => {
                warn!(%access, type_name = *type_name, "locator access while test mode is active");
                self.emit_event(&LocatorEvent::Rejected {
                    access: *access,
                    type_name: *type_name,
                });
            }
            other => debug!(error = %other, "locator operation failed"),
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Factories
    // -------------------------------------------------------------------------------------------------

    /// Provide the zero-argument factory used to create `T` on first resolution.
    ///
    /// Providing again for the same type replaces the factory. An instance that is
    /// already stored is kept; the factory only matters for types not yet resolved.
    fn provide<T, F>(&self, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.provide_arc::<T, _>(move || Arc::new(factory()));
    }

    /// Provide `T::default` as the factory for `T`.
    fn provide_default<T>(&self)
    where
        T: Default + Send + Sync + 'static,
    {
        self.provide::<T, _>(T::default);
    }

    /// Provide a fallible factory for `T`.
    ///
    /// An error returned by the factory surfaces as [`LocatorError::ConstructorFailed`]
    /// with the original error as its source, and nothing is stored.
    fn try_provide<T, E, F>(&self, factory: F)
    where
        T: Send + Sync + 'static,
        E: Into<BoxError>,
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        let replaced = self
            .state()
            .set_factory::<T, _>(move || factory().map(Arc::new).map_err(Into::into));
        debug!(type_name = type_name::<T>(), replaced, "factory provided");
    }

    /// Provide a factory producing an `Arc<T>`.
    ///
    /// `T` may be unsized, which is how an implementation is bound to an interface:
    ///
    /// ```rust
    /// use singleton_locator::define_locator;
    /// use std::sync::Arc;
    ///
    /// trait Clock: Send + Sync {
    ///     fn now(&self) -> u64;
    /// }
    ///
    /// struct FixedClock;
    ///
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> u64 {
    ///         42
    ///     }
    /// }
    ///
    /// define_locator!(services);
    ///
    /// services::provide_arc::<dyn Clock, _>(|| Arc::new(FixedClock));
    /// let clock = services::get_instance::<dyn Clock>().unwrap();
    /// assert_eq!(clock.now(), 42);
    /// ```
    fn provide_arc<T, F>(&self, factory: F)
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        let replaced = self.state().set_factory::<T, _>(move || Ok(factory()));
        debug!(type_name = type_name::<T>(), replaced, "factory provided");
    }

    // -------------------------------------------------------------------------------------------------
    // Locator
    // -------------------------------------------------------------------------------------------------

    /// Fetch the singleton instance of `T`, creating it on first use.
    ///
    /// Lookup, creation and store happen under one lock, so concurrent first callers
    /// trigger exactly one factory call and all receive the same `Arc`.
    ///
    /// # Errors
    ///
    /// - [`LocatorError::TestModeViolation`] if test mode is active
    /// - [`LocatorError::NoDefaultConstructor`] if nothing is stored and no factory was provided
    /// - [`LocatorError::ConstructorFailed`] if the factory returned an error
    fn get_instance<T>(&self) -> Result<Arc<T>, LocatorError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let type_name = type_name::<T>();
        let outcome = self.state().resolve::<T>();

        match &outcome {
            Ok((_, created)) => {
                if *created {
                    debug!(type_name, "instance created");
                    self.emit_event(&LocatorEvent::Create { type_name });
                } else {
                    trace!(type_name, "instance resolved");
                }
                self.emit_event(&LocatorEvent::Resolve {
                    type_name,
                    found: !*created,
                });
            }
            Err(err) => self.report(err),
        }

        outcome.map(|(instance, _)| instance)
    }

    /// Register a pre-built instance under its own type.
    ///
    /// The key is exactly `T`: passing an `Arc<Foo>` here stores it under `Arc<Foo>`, and a
    /// later `get_instance::<Foo>()` will not find it. Use
    /// [`add_instance_arc`](LocatorApi::add_instance_arc) when the instance is already
    /// wrapped in an `Arc`.
    ///
    /// # Errors
    ///
    /// - [`LocatorError::AlreadyRegistered`] if an instance of `T` is already stored,
    ///   whether registered earlier or created by a previous resolution
    /// - [`LocatorError::TestModeViolation`] if test mode is active
    fn add_instance<T>(&self, value: T) -> Result<(), LocatorError>
    where
        T: Send + Sync + 'static,
    {
        self.add_instance_arc(Arc::new(value))
    }

    /// Register an `Arc`-wrapped instance under the explicit type `T`.
    ///
    /// `T` may be a trait object, so `Arc<dyn Trait>` registers an implementation under
    /// its interface. Errors are the same as for [`add_instance`](LocatorApi::add_instance).
    fn add_instance_arc<T>(&self, value: Arc<T>) -> Result<(), LocatorError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let type_name = type_name::<T>();
        let outcome = self.state().insert(value);

        match &outcome {
            Ok(()) => {
                debug!(type_name, "instance registered");
                self.emit_event(&LocatorEvent::Register { type_name });
            }
            Err(err) => self.report(err),
        }

        outcome
    }

    /// Register a dynamically typed value under the explicit type `T`.
    ///
    /// The box may hold either a `T` or an `Arc<T>`.
    ///
    /// # Errors
    ///
    /// - [`LocatorError::TestModeViolation`] if test mode is active
    /// - [`LocatorError::TypeMismatch`] if the value is neither a `T` nor an `Arc<T>`
    /// - [`LocatorError::AlreadyRegistered`] if an instance of `T` is already stored
    fn add_instance_any<T>(&self, value: Box<dyn Any + Send + Sync>) -> Result<(), LocatorError>
    where
        T: Send + Sync + 'static,
    {
        let Some(instance) = downcast_instance::<T>(value) else {
            let type_name = type_name::<T>();
            let err = match self.state().guard(Access::Register, type_name) {
                Err(err) => err,
                Ok(()) => LocatorError::TypeMismatch {
                    expected: type_name,
                },
            };
            self.report(&err);
            return Err(err);
        };

        self.add_instance_arc(instance)
    }

    /// Check if an instance of `T` is stored. Does not create one.
    ///
    /// # Errors
    ///
    /// - [`LocatorError::TestModeViolation`] if test mode is active
    fn contains<T>(&self) -> Result<bool, LocatorError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let type_name = type_name::<T>();
        let outcome = self.state().contains::<T>();

        match &outcome {
            Ok(found) => self.emit_event(&LocatorEvent::Contains {
                type_name,
                found: *found,
            }),
            Err(err) => self.report(err),
        }

        outcome
    }

    /// Create a lazy binding for `T` on this locator.
    fn bind<T>(&self) -> Inject<T, Self>
    where
        T: ?Sized + Send + Sync + 'static,
        Self: Copy,
    {
        Inject::new(*self)
    }

    // -------------------------------------------------------------------------------------------------
    // Test support
    // -------------------------------------------------------------------------------------------------

    /// Lock the locator: every later resolution, registration or check fails with
    /// [`LocatorError::TestModeViolation`] until [`reset`](LocatorApi::reset).
    ///
    /// Meant for unit tests that hand dependencies directly to the object under test; any
    /// accidental use of the shared locator then fails loudly instead of succeeding.
    fn activate_test_mode(&self) {
        self.state().activate_test_mode();
        debug!("test mode activated");
        self.emit_event(&LocatorEvent::TestModeActivated {});
    }

    /// Whether test mode is active.
    fn is_test_mode(&self) -> bool {
        self.state().is_test_mode()
    }

    /// Drop every stored instance and leave test mode.
    ///
    /// This method is intended for test harnesses, to run between tests. It does NOT affect:
    /// - Already-retrieved `Arc<T>` references or resolved bindings (they stay valid)
    /// - Provided factories
    /// - The tracing callback (use `clear_trace_callback()` to clear that)
    #[doc(hidden)]
    fn reset(&self) {
        let cleared = self.state().reset();
        debug!(dropped = cleared.len(), "locator reset");
        // Instances are dropped here, outside the table lock.
        drop(cleared);
        self.emit_event(&LocatorEvent::Reset {});
    }
}

/// Unpack a boxed `T` or `Arc<T>`.
fn downcast_instance<T>(value: Box<dyn Any + Send + Sync>) -> Option<Arc<T>>
where
    T: Send + Sync + 'static,
{
    match value.downcast::<Arc<T>>() {
        Ok(instance) => Some(*instance),
        Err(value) => value.downcast::<T>().ok().map(Arc::from),
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
