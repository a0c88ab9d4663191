// ============================================================================
// HTTP Layer - actix-web wiring for the order endpoints
// ============================================================================
//
// - auth: trusted-header principal extractor
// - error: error-to-response mapping
// - routes: the five order endpoints plus body/path binding rules
// - server: app assembly and server startup
//
// ============================================================================

mod auth;
mod error;
mod routes;
mod server;

pub use server::run_server;
