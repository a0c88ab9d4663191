// ============================================================================
// Domain Layer - Ordering Logic
// ============================================================================
//
// Entities owned by this service (orders and their items) live in `order`.
// Users and coffees are read-only lookup targets managed elsewhere; only the
// shape this service needs is modelled here.
//
// ============================================================================

pub mod authorize;
pub mod coffee;
pub mod order;
pub mod user;

pub use coffee::{Coffee, CoffeeId};
pub use user::{Principal, User, UserId, ADMIN_ROLE};
