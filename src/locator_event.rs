use crate::Access;

/// Events emitted by a locator during operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`.
/// The `Clone` derive allows callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use singleton_locator::LocatorEvent;
///
/// let event = LocatorEvent::Register { type_name: "i32" };
/// assert_eq!(event.to_string(), "register { type_name: i32 }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocatorEvent {
    /// A factory ran and its instance was stored.
    Create {
        /// The type name of the created instance (e.g. "alloc::string::String")
        type_name: &'static str,
    },

    /// An instance was requested through `get_instance`.
    Resolve {
        /// The type name that was requested
        type_name: &'static str,
        /// Whether an instance was already stored (false means it was just created)
        found: bool,
    },

    /// A pre-built instance was registered.
    Register {
        /// The type name the instance was registered under
        type_name: &'static str,
    },

    /// A `contains` check was performed.
    Contains {
        /// The type name that was checked
        type_name: &'static str,
        /// Whether an instance is stored
        found: bool,
    },

    /// An operation was refused because test mode is active.
    Rejected {
        /// The kind of access that was refused
        access: Access,
        /// The type name the access was about
        type_name: &'static str,
    },

    /// Test mode was switched on.
    TestModeActivated {},

    /// The locator was reset.
    Reset {},
}

impl std::fmt::Display for LocatorEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocatorEvent::Create { type_name } => {
                write!(f, "create {{ type_name: {} }}", type_name)
            }
            LocatorEvent::Resolve { type_name, found } => {
                write!(f, "resolve {{ type_name: {}, found: {} }}", type_name, found)
            }
            LocatorEvent::Register { type_name } => {
                write!(f, "register {{ type_name: {} }}", type_name)
            }
            LocatorEvent::Contains { type_name, found } => {
                write!(
                    f,
                    "contains {{ type_name: {}, found: {} }}",
                    type_name, found
                )
            }
            LocatorEvent::Rejected { access, type_name } => {
                write!(
                    f,
                    "rejected {{ access: {}, type_name: {} }}",
                    access, type_name
                )
            }
            LocatorEvent::TestModeActivated {} => write!(f, "Test mode activated"),
            LocatorEvent::Reset {} => write!(f, "Resetting the Locator"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_event_display() {
        let event = LocatorEvent::Create { type_name: "i32" };
        assert_eq!(event.to_string(), "create { type_name: i32 }");

        let event = LocatorEvent::Resolve {
            type_name: "String",
            found: true,
        };
        assert_eq!(event.to_string(), "resolve { type_name: String, found: true }");

        let event = LocatorEvent::Contains {
            type_name: "u8",
            found: false,
        };
        assert_eq!(
            event.to_string(),
            "contains { type_name: u8, found: false }"
        );

        let event = LocatorEvent::Rejected {
            access: Access::Resolve,
            type_name: "u8",
        };
        assert_eq!(event.to_string(), "rejected { access: resolve, type_name: u8 }");

        assert_eq!(LocatorEvent::TestModeActivated {}.to_string(), "Test mode activated");
        assert_eq!(LocatorEvent::Reset {}.to_string(), "Resetting the Locator");
    }

    #[test]
    fn test_locator_event_clone() {
        let event = LocatorEvent::Register { type_name: "i32" };
        let cloned = event.clone();
        assert_eq!(event, cloned);
    }
}
