// src/lib.rs

use axum::{
    routing::{get, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
pub mod common;
pub mod config;
pub mod docs;
pub mod handlers;
pub mod models;
pub mod services;
pub mod store;

use crate::config::AppState;

// Monta o router completo sobre um AppState já construído. O binário e
// os testes de integração usam a mesma função.
pub fn app(app_state: AppState) -> Router {
    let work_order_routes = Router::new()
        .route(
            "/",
            post(handlers::work_orders::create_work_order)
                .get(handlers::work_orders::list_work_orders),
        )
        .route(
            "/{id}",
            get(handlers::work_orders::get_work_order)
                .put(handlers::work_orders::update_work_order)
                .delete(handlers::work_orders::delete_work_order),
        )
        .route("/{id}/status", post(handlers::work_orders::update_status))
        .route(
            "/{id}/priority",
            post(handlers::work_orders::update_priority),
        )
        .route("/{id}/summary", get(handlers::work_orders::get_summary))
        .route("/{id}/activity", get(handlers::work_orders::get_activity))
        .route("/{id}/remarks", post(handlers::work_orders::add_remark))
        .route(
            "/{id}/remarks/{remark_id}",
            put(handlers::work_orders::update_remark)
                .delete(handlers::work_orders::delete_remark),
        )
        .route("/{id}/tasks", post(handlers::work_orders::add_task))
        .route(
            "/{id}/tasks/{task_id}",
            put(handlers::work_orders::update_task).delete(handlers::work_orders::delete_task),
        )
        .route(
            "/{id}/materials",
            post(handlers::work_orders::assign_material),
        )
        .route(
            "/{id}/materials/{assignment_id}",
            put(handlers::work_orders::update_material_assignment)
                .delete(handlers::work_orders::remove_material_assignment),
        );

    let material_routes = Router::new()
        .route(
            "/",
            post(handlers::materials::create_material).get(handlers::materials::list_materials),
        )
        // Rotas estáticas antes das capturas {id}
        .route("/alerts", get(handlers::materials::list_alerts))
        .route("/movements", get(handlers::materials::list_movements))
        .route("/adjustments", get(handlers::materials::list_adjustments))
        .route(
            "/{id}",
            get(handlers::materials::get_material)
                .put(handlers::materials::update_material)
                .delete(handlers::materials::delete_material),
        )
        .route(
            "/{id}/adjust-stock",
            post(handlers::materials::adjust_stock),
        );

    let requisition_routes = Router::new()
        .route(
            "/",
            post(handlers::requisitions::submit_requisition)
                .get(handlers::requisitions::list_requisitions),
        )
        .route("/{id}", get(handlers::requisitions::get_requisition))
        .route(
            "/{id}/approve",
            post(handlers::requisitions::approve_requisition),
        )
        .route(
            "/{id}/reject",
            post(handlers::requisitions::reject_requisition),
        )
        .route(
            "/{id}/fulfill",
            post(handlers::requisitions::fulfill_requisition),
        )
        .route(
            "/{id}/cancel",
            post(handlers::requisitions::cancel_requisition),
        );

    let dashboard_routes =
        Router::new().route("/summary", get(handlers::dashboard::get_summary));

    // Combina tudo no router principal
    Router::new()
        .merge(
            SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()),
        )
        .route("/api/health", get(|| async { "OK" }))
        .route(
            "/api/work-order-statuses",
            get(handlers::work_orders::list_statuses),
        )
        .nest("/api/work-orders", work_order_routes)
        .nest("/api/materials", material_routes)
        .nest("/api/requisitions", requisition_routes)
        .nest("/api/dashboard", dashboard_routes)
        .with_state(app_state)
}
