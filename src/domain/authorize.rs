// ============================================================================
// Authorization checks
// ============================================================================
//
// Called at the top of every restricted operation, before any data access
// that the caller is not entitled to.
//
// ============================================================================

use crate::domain::order::{Order, OrderError};
use crate::domain::user::Principal;

/// Fails unless the caller holds the administrator role.
pub fn require_admin(principal: &Principal) -> Result<(), OrderError> {
    if principal.is_admin() {
        return Ok(());
    }

    tracing::warn!(username = %principal.username, "Administrator role required");
    Err(OrderError::PermissionDenied(format!(
        "{} is not an administrator",
        principal.username
    )))
}

/// Fails unless the caller owns `order` or is an administrator.
pub fn require_owner_or_admin(principal: &Principal, order: &Order) -> Result<(), OrderError> {
    if order.is_owned_by(&principal.username) || principal.is_admin() {
        return Ok(());
    }

    tracing::warn!(
        username = %principal.username,
        order_id = order.id,
        "Caller is neither owner nor administrator"
    );
    Err(OrderError::PermissionDenied(format!(
        "{} may not modify order {}",
        principal.username, order.id
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::ADMIN_ROLE;

    fn order_of(owner: &str) -> Order {
        Order {
            id: 5,
            user: owner.into(),
            items: vec![],
            is_waiting: true,
            validation_date: None,
        }
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&Principal::new("root", vec![ADMIN_ROLE.into()])).is_ok());
        assert!(matches!(
            require_admin(&Principal::new("bob", vec![])),
            Err(OrderError::PermissionDenied(_))
        ));
    }

    #[test]
    fn test_owner_may_modify() {
        let owner = Principal::new("alice", vec![]);
        assert!(require_owner_or_admin(&owner, &order_of("alice")).is_ok());
    }

    #[test]
    fn test_admin_may_modify_any_order() {
        let admin = Principal::new("root", vec![ADMIN_ROLE.into()]);
        assert!(require_owner_or_admin(&admin, &order_of("alice")).is_ok());
    }

    #[test]
    fn test_stranger_is_denied() {
        let bob = Principal::new("bob", vec!["ROLE_USER".into()]);
        assert!(matches!(
            require_owner_or_admin(&bob, &order_of("alice")),
            Err(OrderError::PermissionDenied(_))
        ));
    }
}
