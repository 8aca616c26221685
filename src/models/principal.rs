//! Caller identity as supplied by the surrounding system

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated caller of an operation.
///
/// The engine never authenticates; it only authorizes against this context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    #[serde(default)]
    pub is_admin: bool,
}

impl Principal {
    /// A regular (non-admin) caller
    pub fn user(id: Uuid) -> Self {
        Self {
            id,
            is_admin: false,
        }
    }

    /// A caller holding the admin capability
    pub fn admin(id: Uuid) -> Self {
        Self { id, is_admin: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_flag_defaults_to_false() {
        let principal: Principal =
            serde_json::from_str(r#"{"id":"7f1c1f1e-6a4e-4d5c-9a39-0f0b1d7e9c11"}"#).unwrap();
        assert!(!principal.is_admin);
        assert!(Principal::admin(principal.id).is_admin);
    }
}
