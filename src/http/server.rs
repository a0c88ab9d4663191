use actix_web::{web, App, HttpServer};

use crate::config::HttpConfig;
use crate::domain::order::OrdersHandler;
use crate::metrics::{self as metrics_routes, Metrics};

use super::routes;

/// Serve the order API, `/metrics` and `/health` until shutdown.
pub async fn run_server(
    config: &HttpConfig,
    handler: web::Data<OrdersHandler>,
    metrics: web::Data<Metrics>,
) -> std::io::Result<()> {
    tracing::info!("☕ Starting order API on http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(handler.clone())
            .app_data(metrics.clone())
            .configure(routes::configure)
            .configure(metrics_routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
