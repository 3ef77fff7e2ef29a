//! Access-class checks, enforced before any catalog call.

use thiserror::Error;

use crate::context::Caller;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("admin role required")]
    AdminRequired,
}

/// Gate for the mutating product endpoints.
pub fn require_admin(caller: &Caller) -> Result<(), AuthzError> {
    if caller.is_admin() {
        Ok(())
    } else {
        Err(AuthzError::AdminRequired)
    }
}
