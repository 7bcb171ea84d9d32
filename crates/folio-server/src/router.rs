use axum::routing::{get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

/// Build the axum router with all Folio endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .route("/v1/numbers/:scheme", post(handler::allocate_number))
        .route("/v1/transactions", post(handler::create_transaction))
        .route("/v1/receipts", post(handler::create_receipt))
        .route(
            "/v1/payments",
            post(handler::create_payment).get(handler::list_payments),
        )
        .route(
            "/v1/documents/:id",
            get(handler::get_document)
                .patch(handler::update_document)
                .delete(handler::delete_document),
        )
        .route("/v1/documents/:id/status", put(handler::set_status))
        .route(
            "/v1/documents/:id/actions/:action",
            post(handler::apply_action),
        )
        .route("/v1/ledger", get(handler::list_ledger))
        .route("/v1/summary", get(handler::summary))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
