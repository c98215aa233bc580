//! Instance table shared by every locator implementation.
//!
//! A `LocatorState` lives behind one `Mutex` per locator. Every operation that reads or
//! mutates the table runs while that mutex is held, which is what makes creation atomic:
//! the lookup, the factory call and the store happen in one critical section.
//!
//! Instances are stored as `Arc<T>` erased into `Box<dyn Any + Send + Sync>`. Storing the
//! `Arc<T>` rather than `T` itself lets `T` be unsized, so a `dyn Trait` can be used as the
//! key type.

use std::any::{type_name, Any, TypeId};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock, Mutex};

use crate::{Access, BoxError, LocatorError, LocatorEvent};

/// Type-erased zero-argument factory. The produced box always holds an `Arc<T>`.
type Factory = Box<dyn Fn() -> Result<Box<dyn Any + Send + Sync>, BoxError> + Send + Sync>;

/// Static storage for a locator's table.
pub type LocatorStorage = LazyLock<Mutex<LocatorState>>;

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives a reference to a `LocatorEvent` every time the locator is
/// interacted with. It must be thread-safe because locators are globally shared.
pub type TraceCallback = dyn Fn(&LocatorEvent) + Send + Sync + 'static;

/// Static storage for a locator's optional tracing callback.
pub type TraceStorage = LazyLock<Mutex<Option<Arc<TraceCallback>>>>;

pub(crate) struct Slot {
    type_name: &'static str,
    value: Box<dyn Any + Send + Sync>,
}

/// The instance table, factory table and test-mode flag of one locator.
#[derive(Default)]
pub struct LocatorState {
    instances: HashMap<TypeId, Slot>,
    factories: HashMap<TypeId, Factory>,
    test_mode: bool,
}

impl LocatorState {
    /// Create an empty table with test mode off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails with `TestModeViolation` while test mode is active.
    pub(crate) fn guard(&self, access: Access, type_name: &'static str) -> Result<(), LocatorError> {
        if self.test_mode {
            return Err(LocatorError::TestModeViolation { access, type_name });
        }
        Ok(())
    }

    pub(crate) fn is_test_mode(&self) -> bool {
        self.test_mode
    }

    pub(crate) fn activate_test_mode(&mut self) {
        self.test_mode = true;
    }

    /// Empties the instance table and leaves test mode.
    ///
    /// The removed instances are handed back so the caller can drop them after the lock
    /// is released. Factories are kept.
    pub(crate) fn reset(&mut self) -> HashMap<TypeId, Slot> {
        self.test_mode = false;
        std::mem::take(&mut self.instances)
    }

    /// Installs the factory for `T`. Returns `true` when a previous factory was replaced.
    pub(crate) fn set_factory<T, F>(&mut self, factory: F) -> bool
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Result<Arc<T>, BoxError> + Send + Sync + 'static,
    {
        let erased: Factory =
            Box::new(move || factory().map(|instance| Box::new(instance) as Box<dyn Any + Send + Sync>));
        self.factories.insert(TypeId::of::<T>(), erased).is_some()
    }

    pub(crate) fn contains<T: ?Sized + 'static>(&self) -> Result<bool, LocatorError> {
        self.guard(Access::Inspect, type_name::<T>())?;
        Ok(self.instances.contains_key(&TypeId::of::<T>()))
    }

    /// Returns the stored instance of `T`, creating it through its factory if absent.
    ///
    /// The flag is `true` when the instance was created by this call.
    pub(crate) fn resolve<T>(&mut self) -> Result<(Arc<T>, bool), LocatorError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let type_name = type_name::<T>();
        self.guard(Access::Resolve, type_name)?;

        let type_id = TypeId::of::<T>();
        if let Some(slot) = self.instances.get(&type_id) {
            let instance = downcast_slot::<T>(&*slot.value)?;
            return Ok((instance, false));
        }

        let factory = self
            .factories
            .get(&type_id)
            .ok_or(LocatorError::NoDefaultConstructor { type_name })?;
        let value = factory().map_err(|source| LocatorError::ConstructorFailed { type_name, source })?;
        let instance = downcast_slot::<T>(&*value)?;

        self.instances.insert(type_id, Slot { type_name, value });
        Ok((instance, true))
    }

    /// Stores `instance` under `T`. Never replaces an existing entry.
    pub(crate) fn insert<T>(&mut self, instance: Arc<T>) -> Result<(), LocatorError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let type_name = type_name::<T>();
        self.guard(Access::Register, type_name)?;

        match self.instances.entry(TypeId::of::<T>()) {
            Entry::Occupied(_) => Err(LocatorError::AlreadyRegistered { type_name }),
            Entry::Vacant(entry) => {
                entry.insert(Slot {
                    type_name,
                    value: Box::new(instance),
                });
                Ok(())
            }
        }
    }
}

fn downcast_slot<T>(value: &(dyn Any + Send + Sync)) -> Result<Arc<T>, LocatorError>
where
    T: ?Sized + Send + Sync + 'static,
{
    value
        .downcast_ref::<Arc<T>>()
        .cloned()
        .ok_or(LocatorError::TypeMismatch {
            expected: type_name::<T>(),
        })
}

impl fmt::Debug for LocatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut instances: Vec<&str> = self.instances.values().map(|slot| slot.type_name).collect();
        instances.sort_unstable();

        f.debug_struct("LocatorState")
            .field("instances", &instances)
            .field("factories", &self.factories.len())
            .field("test_mode", &self.test_mode)
            .finish()
    }
}
