// ============================================================================
// Order Domain - Placing, Listing, Deleting and Validating Orders
// ============================================================================
//
// This module contains ALL Order-specific code:
// - Value objects (OrderedCoffee)
// - Aggregate (Order, NewOrder)
// - Commands (CreateOrderRequest)
// - Errors (OrderError enum)
// - Service (Order -> OrderDto mapping)
// - Command Handler (OrdersHandler, the five request operations)
//
// ============================================================================

pub mod value_objects;
pub mod commands;
pub mod errors;
pub mod aggregate;
pub mod service;
pub mod command_handler;

pub use value_objects::*;
pub use commands::*;
pub use errors::*;
pub use aggregate::*;
pub use service::*;
pub use command_handler::*;
