//! Lazy bindings.
//!
//! An [`Inject<T>`] is a field-level handle on a dependency. Nothing is looked up when the
//! binding is created; the first [`get`](Inject::get) asks the locator for `T` and keeps
//! the result for the lifetime of the binding.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::{Global, LocatorApi, LocatorError};

/// Deferred, cached resolution of `T` from locator `L`.
///
/// # Examples
///
/// ```rust
/// use singleton_locator::define_locator;
///
/// define_locator!(app);
///
/// #[derive(Default)]
/// struct FooService;
///
/// impl FooService {
///     fn foo(&self) -> &'static str {
///         "foo"
///     }
/// }
///
/// struct BarService {
///     foo: singleton_locator::Inject<FooService, app::Api>,
/// }
///
/// app::provide_default::<FooService>();
///
/// let bar = BarService { foo: app::bind() };
/// assert_eq!(bar.foo.get().unwrap().foo(), "foo");
/// ```
pub struct Inject<T, L = Global>
where
    T: ?Sized + Send + Sync + 'static,
    L: LocatorApi,
{
    locator: L,
    cached: OnceLock<Arc<T>>,
}

impl<T, L> Inject<T, L>
where
    T: ?Sized + Send + Sync + 'static,
    L: LocatorApi,
{
    /// Create an unresolved binding on `locator`.
    pub fn new(locator: L) -> Self {
        Self {
            locator,
            cached: OnceLock::new(),
        }
    }

    /// Return the bound instance, resolving it through the locator on first call.
    ///
    /// Once a value is cached the locator is never consulted again, even if it has been
    /// reset since. A failed resolution leaves the binding unresolved, so a later call
    /// asks the locator again.
    ///
    /// # Errors
    ///
    /// Any error of [`LocatorApi::get_instance`], unchanged.
    pub fn get(&self) -> Result<Arc<T>, LocatorError> {
        if let Some(cached) = self.cached.get() {
            return Ok(Arc::clone(cached));
        }

        let instance = self.locator.get_instance::<T>()?;
        Ok(Arc::clone(self.cached.get_or_init(|| instance)))
    }

    /// Overwrite the bound value.
    ///
    /// Only this binding sees `value`; the locator keeps whatever it had for `T`.
    pub fn set(&mut self, value: Arc<T>) {
        self.cached = OnceLock::from(value);
    }

    /// Whether a value is cached.
    pub fn is_resolved(&self) -> bool {
        self.cached.get().is_some()
    }
}

impl<T, L> Default for Inject<T, L>
where
    T: ?Sized + Send + Sync + 'static,
    L: LocatorApi + Default,
{
    fn default() -> Self {
        Self::new(L::default())
    }
}

impl<T, L> fmt::Debug for Inject<T, L>
where
    T: ?Sized + Send + Sync + 'static,
    L: LocatorApi,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inject")
            .field("type_name", &std::any::type_name::<T>())
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
