//! Role and ownership checks applied after a token is verified.

use charity_database::UserRole;
use tracing::warn;

use crate::jwt::Claims;
use crate::AuthError;

/// Reject callers whose role is not in `allowed`.
pub fn require_role(claims: &Claims, allowed: &[UserRole]) -> Result<(), AuthError> {
    if allowed.contains(&claims.role) {
        return Ok(());
    }

    warn!(user_id = %claims.user_id, role = %claims.role, "role not permitted");
    Err(AuthError::Forbidden)
}

/// The resource creator or an administrator.
pub fn require_owner_or_admin(claims: &Claims, owner_user_id: &str) -> Result<(), AuthError> {
    if claims.role == UserRole::Admin || claims.user_id == owner_user_id {
        return Ok(());
    }

    warn!(user_id = %claims.user_id, "caller does not own the resource");
    Err(AuthError::Forbidden)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: UserRole) -> Claims {
        Claims {
            user_id: "caller".into(),
            email: "caller@example.org".into(),
            role,
            organization_id: None,
            iat: 0,
            exp: 0,
        }
    }

    #[test]
    fn test_role_allow_list() {
        let allowed = [UserRole::Admin, UserRole::Organization];

        assert!(require_role(&claims(UserRole::Admin), &allowed).is_ok());
        assert!(require_role(&claims(UserRole::Organization), &allowed).is_ok());
        assert!(matches!(
            require_role(&claims(UserRole::Donor), &allowed),
            Err(AuthError::Forbidden)
        ));
    }

    #[test]
    fn test_owner_or_admin() {
        assert!(require_owner_or_admin(&claims(UserRole::Organization), "caller").is_ok());
        assert!(require_owner_or_admin(&claims(UserRole::Admin), "someone-else").is_ok());
        assert!(require_owner_or_admin(&claims(UserRole::Organization), "someone-else").is_err());
    }
}
