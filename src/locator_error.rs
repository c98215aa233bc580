use std::fmt;

use thiserror::Error;

/// Boxed error produced by a fallible factory.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Kind of registry access that was attempted.
///
/// Carried by [`LocatorError::TestModeViolation`] and
/// [`LocatorEvent::Rejected`](crate::LocatorEvent::Rejected).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Fetch-or-create through `get_instance` (or a binding's first read).
    Resolve,
    /// Any `add_instance*` form.
    Register,
    /// A `contains` check.
    Inspect,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Resolve => write!(f, "resolve"),
            Access::Register => write!(f, "register"),
            Access::Inspect => write!(f, "inspect"),
        }
    }
}

/// Errors returned by locator operations.
///
/// Every variant describes a programming error in the wiring of the
/// application. None of them is retried internally.
#[derive(Debug, Error)]
pub enum LocatorError {
    /// No factory was provided for the type, so it cannot be built on demand.
    #[error("no factory provided for type {type_name}")]
    NoDefaultConstructor { type_name: &'static str },

    /// The factory for the type returned an error.
    #[error("factory for type {type_name} failed: {source}")]
    ConstructorFailed {
        type_name: &'static str,
        #[source]
        source: BoxError,
    },

    /// An instance for the type is already stored (registered or created).
    #[error("an instance of type {type_name} is already registered")]
    AlreadyRegistered { type_name: &'static str },

    /// The value does not match the type it was supposed to be stored or read as.
    #[error("value is not an instance of type {expected}")]
    TypeMismatch { expected: &'static str },

    /// The locator is in test mode and refuses all access.
    #[error("test mode is active: cannot {access} instance of type {type_name}")]
    TestModeViolation {
        access: Access,
        type_name: &'static str,
    },
}

impl LocatorError {
    /// Name of the type the failed operation was about.
    pub fn type_name(&self) -> &'static str {
        match self {
            LocatorError::NoDefaultConstructor { type_name }
            | LocatorError::ConstructorFailed { type_name, .. }
            | LocatorError::AlreadyRegistered { type_name }
            | LocatorError::TestModeViolation { type_name, .. } => type_name,
            LocatorError::TypeMismatch { expected } => expected,
        }
    }
}
