use crate::domain::coffee::CoffeeId;
use crate::store::StoreError;

use super::aggregate::OrderId;

// ============================================================================
// Order Operation Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Coffee not found: {0}")]
    CoffeeNotFound(CoffeeId),

    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl OrderError {
    /// Stable, low-cardinality name used in error bodies and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            OrderError::UserNotFound(_)
            | OrderError::CoffeeNotFound(_)
            | OrderError::OrderNotFound(_) => "not_found",
            OrderError::PermissionDenied(_) => "permission_denied",
            OrderError::Validation(_) => "validation",
            OrderError::Store(_) => "store",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_variants_share_kind() {
        assert_eq!(OrderError::UserNotFound("alice".into()).kind(), "not_found");
        assert_eq!(OrderError::CoffeeNotFound(1).kind(), "not_found");
        assert_eq!(OrderError::OrderNotFound(5).kind(), "not_found");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(OrderError::CoffeeNotFound(42).to_string(), "Coffee not found: 42");
        assert_eq!(
            OrderError::PermissionDenied("not the owner".into()).to_string(),
            "Permission denied: not the owner"
        );
    }
}
