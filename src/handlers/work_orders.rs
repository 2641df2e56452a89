// src/handlers/work_orders.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    models::work_order::{
        ActionItem, ExpenseBreakdown, RemarkKind, TaskStatus, WorkOrderAction, WorkOrderExpense,
        WorkOrderForm, WorkOrderInvoice, WorkOrderIssue, WorkOrderItem, WorkOrderPhoto,
        WorkOrderPriority, WorkOrderStatus,
    },
};

// ---
// Validação customizada
// ---
fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payload: CreateWorkOrder
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkOrderPayload {
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    #[schema(example = "Renovação do 3º andar")]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    #[schema(example = "Saudi Electricity Company")]
    pub client: String,

    #[serde(default)]
    #[schema(example = "Ras Tanura")]
    pub location: String,

    #[serde(default)]
    #[schema(example = "Renovation")]
    pub category: String,

    // Se o JSON não mandar, assume pendente.
    pub status: Option<WorkOrderStatus>,

    // Se o JSON não mandar, assume média.
    pub priority: Option<WorkOrderPriority>,

    #[validate(range(min = 0, max = 100, message = "O percentual deve estar entre 0 e 100."))]
    pub completion_percentage: Option<i32>,

    pub received_date: Option<DateTime<Utc>>,
    pub start_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub target_end_date: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
}

// POST /api/work-orders
#[utoipa::path(
    post,
    path = "/api/work-orders",
    tag = "Work Orders",
    request_body = CreateWorkOrderPayload,
    responses(
        (status = 201, description = "Ordem de serviço criada", body = crate::models::work_order::WorkOrder)
    )
)]
pub async fn create_work_order(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateWorkOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let order = app_state.work_order_service.create(payload);
    Ok((StatusCode::CREATED, Json(order)))
}

// GET /api/work-orders
#[utoipa::path(
    get,
    path = "/api/work-orders",
    tag = "Work Orders",
    responses(
        (status = 200, description = "Todas as ordens (cópia defensiva)", body = [crate::models::work_order::WorkOrder])
    )
)]
pub async fn list_work_orders(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.work_order_service.list()))
}

// GET /api/work-orders/{id}
#[utoipa::path(
    get,
    path = "/api/work-orders/{id}",
    tag = "Work Orders",
    params(("id" = Uuid, Path, description = "ID da ordem")),
    responses(
        (status = 200, body = crate::models::work_order::WorkOrder),
        (status = 404, description = "Ordem não encontrada")
    )
)]
pub async fn get_work_order(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.work_order_service.get(id)?))
}

// ---
// Payload: UpdateWorkOrder (merge raso + merge profundo em details)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderDetailsPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub client: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub priority: Option<WorkOrderPriority>,
    #[validate(range(min = 0, max = 100, message = "O percentual deve estar entre 0 e 100."))]
    pub completion_percentage: Option<i32>,
    pub received_date: Option<DateTime<Utc>>,
    pub start_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub target_end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkOrderPayload {
    #[validate(nested)]
    pub details: Option<WorkOrderDetailsPatch>,
    pub items: Option<Vec<WorkOrderItem>>,
    pub issues: Option<Vec<WorkOrderIssue>>,
    pub actions: Option<Vec<WorkOrderAction>>,
    pub actions_needed: Option<Vec<ActionItem>>,
    pub photos: Option<Vec<WorkOrderPhoto>>,
    pub forms: Option<Vec<WorkOrderForm>>,
    pub expenses: Option<Vec<WorkOrderExpense>>,
    pub invoices: Option<Vec<WorkOrderInvoice>>,
    pub expense_breakdown: Option<ExpenseBreakdown>,
}

// PUT /api/work-orders/{id}
// O status NÃO passa por aqui: mudança de status só pela transição
// validada em /status.
#[utoipa::path(
    put,
    path = "/api/work-orders/{id}",
    tag = "Work Orders",
    request_body = UpdateWorkOrderPayload,
    params(("id" = Uuid, Path, description = "ID da ordem")),
    responses(
        (status = 200, body = crate::models::work_order::WorkOrder),
        (status = 404, description = "Ordem não encontrada")
    )
)]
pub async fn update_work_order(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateWorkOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    Ok(Json(app_state.work_order_service.update(id, payload)?))
}

// DELETE /api/work-orders/{id}
#[utoipa::path(
    delete,
    path = "/api/work-orders/{id}",
    tag = "Work Orders",
    params(("id" = Uuid, Path, description = "ID da ordem")),
    responses(
        (status = 200, description = "Removida", body = bool),
        (status = 404, description = "Ordem não encontrada")
    )
)]
pub async fn delete_work_order(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.work_order_service.delete(id)?))
}

// ---
// Transição de status
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusPayload {
    #[schema(example = "in-progress")]
    pub status: WorkOrderStatus,
    #[schema(example = "Equipe alocada")]
    pub reason: Option<String>,
}

// POST /api/work-orders/{id}/status
#[utoipa::path(
    post,
    path = "/api/work-orders/{id}/status",
    tag = "Work Orders",
    request_body = UpdateStatusPayload,
    params(("id" = Uuid, Path, description = "ID da ordem")),
    responses(
        (status = 200, description = "Status atualizado", body = crate::models::work_order::WorkOrder),
        (status = 404, description = "Ordem não encontrada"),
        (status = 409, description = "Transição não permitida pela tabela")
    )
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state.work_order_service.update_status(
        id,
        payload.status,
        payload.reason.as_deref(),
    )?;
    Ok(Json(order))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePriorityPayload {
    pub priority: WorkOrderPriority,
}

// POST /api/work-orders/{id}/priority
#[utoipa::path(
    post,
    path = "/api/work-orders/{id}/priority",
    tag = "Work Orders",
    request_body = UpdatePriorityPayload,
    params(("id" = Uuid, Path, description = "ID da ordem")),
    responses(
        (status = 200, body = crate::models::work_order::WorkOrder),
        (status = 404, description = "Ordem não encontrada")
    )
)]
pub async fn update_priority(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePriorityPayload>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(
        app_state
            .work_order_service
            .update_priority(id, payload.priority)?,
    ))
}

// GET /api/work-orders/{id}/summary
#[utoipa::path(
    get,
    path = "/api/work-orders/{id}/summary",
    tag = "Work Orders",
    params(("id" = Uuid, Path, description = "ID da ordem")),
    responses(
        (status = 200, description = "Rollups calculados", body = crate::models::work_order::WorkOrderSummary),
        (status = 404, description = "Ordem não encontrada")
    )
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.work_order_service.summary(id)?))
}

// GET /api/work-orders/{id}/activity
#[utoipa::path(
    get,
    path = "/api/work-orders/{id}/activity",
    tag = "Work Orders",
    params(("id" = Uuid, Path, description = "ID da ordem")),
    responses(
        (status = 200, description = "Trilha de auditoria da ordem", body = [crate::models::activity::ActivityLogEntry]),
        (status = 404, description = "Ordem não encontrada")
    )
)]
pub async fn get_activity(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.work_order_service.activity(id)?))
}

// ---
// Catálogo de status
// ---
#[derive(Debug, serde::Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCatalogEntry {
    #[schema(example = "in-progress")]
    pub code: &'static str,
    #[schema(example = "In Progress")]
    pub name: String,
    pub allowed_transitions: Vec<&'static str>,
}

// GET /api/work-order-statuses
#[utoipa::path(
    get,
    path = "/api/work-order-statuses",
    tag = "Work Orders",
    responses(
        (status = 200, description = "Conjunto canônico de status e suas transições", body = [StatusCatalogEntry])
    )
)]
pub async fn list_statuses() -> impl IntoResponse {
    let catalog: Vec<StatusCatalogEntry> = WorkOrderStatus::ALL
        .iter()
        .map(|status| StatusCatalogEntry {
            code: status.code(),
            name: status.display_name(),
            allowed_transitions: status
                .allowed_transitions()
                .iter()
                .map(|next| next.code())
                .collect(),
        })
        .collect();
    Json(catalog)
}

// ---
// Observações
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddRemarkPayload {
    #[validate(length(min = 1, message = "O conteúdo é obrigatório."))]
    pub content: String,
    #[serde(rename = "type")]
    pub kind: Option<RemarkKind>,
    pub created_by: Option<String>,
    pub people_involved: Option<Vec<String>>,
}

// POST /api/work-orders/{id}/remarks
#[utoipa::path(
    post,
    path = "/api/work-orders/{id}/remarks",
    tag = "Work Orders",
    request_body = AddRemarkPayload,
    params(("id" = Uuid, Path, description = "ID da ordem")),
    responses(
        (status = 201, body = crate::models::work_order::WorkOrder),
        (status = 404, description = "Ordem não encontrada")
    )
)]
pub async fn add_remark(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddRemarkPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let order = app_state.work_order_service.add_remark(id, payload)?;
    Ok((StatusCode::CREATED, Json(order)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRemarkPayload {
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<RemarkKind>,
    pub people_involved: Option<Vec<String>>,
}

// PUT /api/work-orders/{id}/remarks/{remark_id}
#[utoipa::path(
    put,
    path = "/api/work-orders/{id}/remarks/{remark_id}",
    tag = "Work Orders",
    request_body = UpdateRemarkPayload,
    params(
        ("id" = Uuid, Path, description = "ID da ordem"),
        ("remark_id" = Uuid, Path, description = "ID da observação")
    ),
    responses(
        (status = 200, body = crate::models::work_order::WorkOrder),
        (status = 404, description = "Ordem ou observação não encontrada")
    )
)]
pub async fn update_remark(
    State(app_state): State<AppState>,
    Path((id, remark_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateRemarkPayload>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(
        app_state
            .work_order_service
            .update_remark(id, remark_id, payload)?,
    ))
}

// DELETE /api/work-orders/{id}/remarks/{remark_id}
#[utoipa::path(
    delete,
    path = "/api/work-orders/{id}/remarks/{remark_id}",
    tag = "Work Orders",
    params(
        ("id" = Uuid, Path, description = "ID da ordem"),
        ("remark_id" = Uuid, Path, description = "ID da observação")
    ),
    responses(
        (status = 200, body = crate::models::work_order::WorkOrder),
        (status = 404, description = "Ordem ou observação não encontrada")
    )
)]
pub async fn delete_remark(
    State(app_state): State<AppState>,
    Path((id, remark_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(
        app_state.work_order_service.delete_remark(id, remark_id)?,
    ))
}

// ---
// Tarefas (endereçadas por id, nunca por índice)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddTaskPayload {
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<WorkOrderPriority>,
    pub status: Option<TaskStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
}

// POST /api/work-orders/{id}/tasks
#[utoipa::path(
    post,
    path = "/api/work-orders/{id}/tasks",
    tag = "Work Orders",
    request_body = AddTaskPayload,
    params(("id" = Uuid, Path, description = "ID da ordem")),
    responses(
        (status = 201, body = crate::models::work_order::WorkOrder),
        (status = 404, description = "Ordem não encontrada")
    )
)]
pub async fn add_task(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddTaskPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let order = app_state.work_order_service.add_task(id, payload)?;
    Ok((StatusCode::CREATED, Json(order)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<WorkOrderPriority>,
    pub completed: Option<bool>,
    pub start_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
}

// PUT /api/work-orders/{id}/tasks/{task_id}
#[utoipa::path(
    put,
    path = "/api/work-orders/{id}/tasks/{task_id}",
    tag = "Work Orders",
    request_body = UpdateTaskPayload,
    params(
        ("id" = Uuid, Path, description = "ID da ordem"),
        ("task_id" = Uuid, Path, description = "ID da tarefa")
    ),
    responses(
        (status = 200, body = crate::models::work_order::WorkOrder),
        (status = 404, description = "Ordem ou tarefa não encontrada")
    )
)]
pub async fn update_task(
    State(app_state): State<AppState>,
    Path((id, task_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateTaskPayload>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(
        app_state
            .work_order_service
            .update_task(id, task_id, payload)?,
    ))
}

// DELETE /api/work-orders/{id}/tasks/{task_id}
#[utoipa::path(
    delete,
    path = "/api/work-orders/{id}/tasks/{task_id}",
    tag = "Work Orders",
    params(
        ("id" = Uuid, Path, description = "ID da ordem"),
        ("task_id" = Uuid, Path, description = "ID da tarefa")
    ),
    responses(
        (status = 200, body = crate::models::work_order::WorkOrder),
        (status = 404, description = "Ordem ou tarefa não encontrada")
    )
)]
pub async fn delete_task(
    State(app_state): State<AppState>,
    Path((id, task_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.work_order_service.delete_task(id, task_id)?))
}

// ---
// Materiais vinculados
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignMaterialPayload {
    pub material_id: Uuid,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "5.0")]
    pub quantity: Decimal,

    pub notes: Option<String>,
}

// POST /api/work-orders/{id}/materials
#[utoipa::path(
    post,
    path = "/api/work-orders/{id}/materials",
    tag = "Work Orders",
    request_body = AssignMaterialPayload,
    params(("id" = Uuid, Path, description = "ID da ordem")),
    responses(
        (status = 201, body = crate::models::work_order::WorkOrder),
        (status = 404, description = "Ordem ou material não encontrado")
    )
)]
pub async fn assign_material(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignMaterialPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let order = app_state.work_order_service.assign_material(id, payload)?;
    Ok((StatusCode::CREATED, Json(order)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssignmentPayload {
    #[validate(custom(function = "validate_not_negative"))]
    pub quantity: Option<Decimal>,
    pub notes: Option<String>,
}

// PUT /api/work-orders/{id}/materials/{assignment_id}
#[utoipa::path(
    put,
    path = "/api/work-orders/{id}/materials/{assignment_id}",
    tag = "Work Orders",
    request_body = UpdateAssignmentPayload,
    params(
        ("id" = Uuid, Path, description = "ID da ordem"),
        ("assignment_id" = Uuid, Path, description = "ID do vínculo")
    ),
    responses(
        (status = 200, body = crate::models::work_order::WorkOrder),
        (status = 404, description = "Ordem ou vínculo não encontrado")
    )
)]
pub async fn update_material_assignment(
    State(app_state): State<AppState>,
    Path((id, assignment_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateAssignmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    Ok(Json(app_state.work_order_service.update_material_assignment(
        id,
        assignment_id,
        payload,
    )?))
}

// DELETE /api/work-orders/{id}/materials/{assignment_id}
#[utoipa::path(
    delete,
    path = "/api/work-orders/{id}/materials/{assignment_id}",
    tag = "Work Orders",
    params(
        ("id" = Uuid, Path, description = "ID da ordem"),
        ("assignment_id" = Uuid, Path, description = "ID do vínculo")
    ),
    responses(
        (status = 200, body = crate::models::work_order::WorkOrder),
        (status = 404, description = "Ordem ou vínculo não encontrado")
    )
)]
pub async fn remove_material_assignment(
    State(app_state): State<AppState>,
    Path((id, assignment_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(
        app_state
            .work_order_service
            .remove_material_assignment(id, assignment_id)?,
    ))
}
