use actix_web::{web, HttpResponse};

use crate::domain::order::{CreateOrderRequest, OrderError, OrderId, OrdersHandler};
use crate::metrics::Metrics;

use super::auth::Authenticated;
use super::error::ApiError;

/// Mount the order endpoints on an app carrying `web::Data<OrdersHandler>`
/// and `web::Data<Metrics>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::from(OrderError::Validation(err.to_string())).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| ApiError::from(OrderError::Validation(err.to_string())).into()),
    )
    .route("/api/order", web::post().to(create_order))
    .route("/api/orders/waiting", web::get().to(waiting_orders))
    .route("/api/orders/waiting-all", web::get().to(all_waiting_orders))
    .route(
        "/api/orders/waiting-all/validate",
        web::post().to(validate_all_waiting_orders),
    )
    .route(r"/api/orders/{id:\d+}", web::delete().to(delete_order));
}

async fn create_order(
    handler: web::Data<OrdersHandler>,
    metrics: web::Data<Metrics>,
    Authenticated(principal): Authenticated,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, ApiError> {
    let _timer = metrics.start_timer("create_order");
    let order = metrics.track(
        "create_order",
        handler.create_order(&principal, body.into_inner()).await,
    )?;

    metrics.orders_created.inc();
    Ok(HttpResponse::Ok().json(order))
}

async fn waiting_orders(
    handler: web::Data<OrdersHandler>,
    metrics: web::Data<Metrics>,
    Authenticated(principal): Authenticated,
) -> Result<HttpResponse, ApiError> {
    let _timer = metrics.start_timer("waiting_orders");
    let orders = metrics.track("waiting_orders", handler.waiting_orders(&principal).await)?;
    Ok(HttpResponse::Ok().json(orders))
}

async fn all_waiting_orders(
    handler: web::Data<OrdersHandler>,
    metrics: web::Data<Metrics>,
    Authenticated(principal): Authenticated,
) -> Result<HttpResponse, ApiError> {
    let _timer = metrics.start_timer("all_waiting_orders");
    let orders = metrics.track(
        "all_waiting_orders",
        handler.all_waiting_orders(&principal).await,
    )?;
    Ok(HttpResponse::Ok().json(orders))
}

async fn delete_order(
    handler: web::Data<OrdersHandler>,
    metrics: web::Data<Metrics>,
    Authenticated(principal): Authenticated,
    path: web::Path<OrderId>,
) -> Result<HttpResponse, ApiError> {
    let _timer = metrics.start_timer("delete_order");
    let order = metrics.track(
        "delete_order",
        handler.delete_order(&principal, path.into_inner()).await,
    )?;

    metrics.orders_deleted.inc();
    Ok(HttpResponse::Ok().json(order))
}

async fn validate_all_waiting_orders(
    handler: web::Data<OrdersHandler>,
    metrics: web::Data<Metrics>,
    Authenticated(principal): Authenticated,
) -> Result<HttpResponse, ApiError> {
    let _timer = metrics.start_timer("validate_all_waiting_orders");
    let orders = metrics.track(
        "validate_all_waiting_orders",
        handler.validate_all_waiting_orders(&principal).await,
    )?;

    metrics.orders_validated.inc_by(orders.len() as u64);
    Ok(HttpResponse::Ok().json(orders))
}

// ============================================================================
// Unit Tests
// ============================================================================
