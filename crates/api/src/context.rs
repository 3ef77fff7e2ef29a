use storefront_auth::Role;
use storefront_core::UserId;

/// Authenticated caller for a request, resolved from the bearer token.
///
/// Immutable; present on every request that passed the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    user_id: UserId,
    name: String,
    roles: Vec<Role>,
}

impl Caller {
    pub fn new(user_id: UserId, name: String, roles: Vec<Role>) -> Self {
        Self {
            user_id,
            name,
            roles,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Display name, captured into reviews at submission time.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(Role::is_admin)
    }
}
