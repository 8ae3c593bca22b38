use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};

/// Build the axum router with every Roster endpoint.
pub fn build_router(state: AppState, trace_requests: bool) -> Router {
    let api = Router::new()
        .route("/get_all_data", get(handler::get_all_data))
        .route("/domain_list", get(handler::domain_list))
        .route("/company_list", get(handler::company_list))
        .route("/employee_list", get(handler::employee_list))
        .route("/employee_details_by_id/:id", get(handler::employee_details))
        .route("/history/:id", get(handler::employee_history))
        .route("/delete_employee_by_id/:id/:domain_name", post(handler::delete_employee))
        .route("/disable_domain_by_id/:id/:domain_name", post(handler::disable_domain))
        .route("/disable_company_by_id/:id/:company_name", post(handler::disable_company))
        .route("/add_domain", post(handler::add_domain))
        .route("/add_company", post(handler::add_company))
        .route("/add_employee", post(handler::add_employee))
        .route("/change_employee_domain", post(handler::change_employee_domain))
        .route("/change_employee_company", post(handler::change_employee_company));

    let router = Router::new()
        .route("/", get(handler::root_handler))
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .route("/v1/invoke", post(handler::invoke_handler))
        .nest("/api", api)
        .with_state(state);

    if trace_requests {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}
