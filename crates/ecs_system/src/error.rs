//! System registry error types.

/// Misuse of the system registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SystemError {
    /// A system type may only be registered once.
    #[error("system '{0}' is already registered")]
    SystemAlreadyRegistered(&'static str),

    /// The system type was used before registration.
    #[error("system '{0}' was not registered before use")]
    SystemNotRegistered(&'static str),
}
