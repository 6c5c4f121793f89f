use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, put},
    Extension, Json, Router,
};
use utoipa::OpenApi;

use crate::api::rest::handlers::{self, RequestTimeout};
use crate::api::rest::openapi::ApiDoc;
use crate::domain::service::Service;

/// Mount the REST surface on `router`.
///
/// Handlers resolve the service and the per-request store deadline from
/// router extensions installed here.
pub fn register_routes(router: Router, service: Arc<Service>, request_timeout: Duration) -> Router {
    let api = Router::new()
        // Departments
        .route(
            "/departments",
            get(handlers::list_departments).post(handlers::create_department),
        )
        .route(
            "/departments/{id}",
            get(handlers::get_department)
                .put(handlers::update_department)
                .delete(handlers::delete_department),
        )
        .route(
            "/departments/{id}/employees",
            get(handlers::department_employees),
        )
        // Employees
        .route(
            "/employees",
            get(handlers::list_employees).post(handlers::create_employee),
        )
        .route(
            "/employees/{id}",
            get(handlers::get_employee)
                .put(handlers::update_employee)
                .delete(handlers::delete_employee),
        )
        .route("/employees/{id}/projects", get(handlers::employee_projects))
        // Projects
        .route(
            "/projects",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route(
            "/projects/{id}",
            get(handlers::get_project)
                .put(handlers::update_project)
                .delete(handlers::delete_project),
        )
        .route(
            "/projects/{id}/members/{employee_id}",
            put(handlers::add_team_member).delete(handlers::remove_team_member),
        )
        .route(
            "/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        );

    router
        .route("/health", get(handlers::health))
        .nest("/api/v1", api)
        .layer(Extension(service))
        .layer(Extension(RequestTimeout(request_timeout)))
}
