// src/handlers/requisitions.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::requisition::{RequisitionType, RequisitionUrgency},
};

// ---
// Payload: SubmitRequisition
// ---
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequisitionItemPayload {
    pub material_id: Uuid,

    #[schema(example = "20.0")]
    pub requested_quantity: Decimal,

    pub urgency: Option<RequisitionUrgency>,
    pub notes: Option<String>,
    pub estimated_cost: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequisitionPayload {
    pub request_type: Option<RequisitionType>,

    // Vínculo opcional com uma ordem de serviço.
    pub work_order_id: Option<Uuid>,

    #[validate(length(min = 1, message = "O solicitante é obrigatório."))]
    #[schema(example = "eng.silva")]
    pub requested_by: String,

    pub required_by: Option<DateTime<Utc>>,

    #[validate(length(min = 1, message = "A requisição precisa de ao menos um item."))]
    pub items: Vec<RequisitionItemPayload>,

    #[schema(example = "Material para a fase de fundação")]
    pub justification: Option<String>,

    pub urgency: Option<RequisitionUrgency>,

    // Sem o campo, a requisição exige aprovação.
    pub approval_required: Option<bool>,
}

// POST /api/requisitions
#[utoipa::path(
    post,
    path = "/api/requisitions",
    tag = "Requisitions",
    request_body = SubmitRequisitionPayload,
    responses(
        (status = 201, description = "Requisição criada (aprovada de imediato quando não exige aprovação)", body = crate::models::requisition::MaterialRequisition),
        (status = 400, description = "Itens ausentes ou quantidades inválidas"),
        (status = 404, description = "Material ou ordem vinculada não encontrada")
    )
)]
pub async fn submit_requisition(
    State(app_state): State<AppState>,
    Json(payload): Json<SubmitRequisitionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let requisition = app_state.requisition_service.submit(payload)?;
    Ok((StatusCode::CREATED, Json(requisition)))
}

// GET /api/requisitions
#[utoipa::path(
    get,
    path = "/api/requisitions",
    tag = "Requisitions",
    responses(
        (status = 200, body = [crate::models::requisition::MaterialRequisition])
    )
)]
pub async fn list_requisitions(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.requisition_service.list()))
}

// GET /api/requisitions/{id}
#[utoipa::path(
    get,
    path = "/api/requisitions/{id}",
    tag = "Requisitions",
    params(("id" = Uuid, Path, description = "ID da requisição")),
    responses(
        (status = 200, body = crate::models::requisition::MaterialRequisition),
        (status = 404, description = "Requisição não encontrada")
    )
)]
pub async fn get_requisition(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.requisition_service.get(id)?))
}

// ---
// Aprovação / Rejeição
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequisitionPayload {
    #[validate(length(min = 1, message = "O aprovador é obrigatório."))]
    #[schema(example = "coord.almeida")]
    pub approved_by: String,
    pub notes: Option<String>,
}

// POST /api/requisitions/{id}/approve
#[utoipa::path(
    post,
    path = "/api/requisitions/{id}/approve",
    tag = "Requisitions",
    request_body = ApproveRequisitionPayload,
    responses(
        (status = 200, description = "Aprovada (re-aprovação é idempotente)", body = crate::models::requisition::MaterialRequisition),
        (status = 404, description = "Requisição não encontrada"),
        (status = 409, description = "Estado atual não permite aprovação")
    ),
    params(("id" = Uuid, Path, description = "ID da requisição"))
)]
pub async fn approve_requisition(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApproveRequisitionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    Ok(Json(app_state.requisition_service.approve(id, payload)?))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectRequisitionPayload {
    #[validate(length(min = 1, message = "O responsável é obrigatório."))]
    pub rejected_by: String,
    pub reason: Option<String>,
}

// POST /api/requisitions/{id}/reject
#[utoipa::path(
    post,
    path = "/api/requisitions/{id}/reject",
    tag = "Requisitions",
    request_body = RejectRequisitionPayload,
    responses(
        (status = 200, body = crate::models::requisition::MaterialRequisition),
        (status = 404, description = "Requisição não encontrada"),
        (status = 409, description = "Estado atual não permite rejeição")
    ),
    params(("id" = Uuid, Path, description = "ID da requisição"))
)]
pub async fn reject_requisition(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectRequisitionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    Ok(Json(app_state.requisition_service.reject(id, payload)?))
}

// ---
// Atendimento / Cancelamento
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FulfillItemPayload {
    pub item_id: Uuid,
    #[schema(example = "10.0")]
    pub quantity: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FulfillRequisitionPayload {
    pub performed_by: Option<String>,
    // Sem a lista, atende tudo o que resta de cada item.
    pub items: Option<Vec<FulfillItemPayload>>,
}

// POST /api/requisitions/{id}/fulfill
#[utoipa::path(
    post,
    path = "/api/requisitions/{id}/fulfill",
    tag = "Requisitions",
    request_body = FulfillRequisitionPayload,
    responses(
        (status = 200, description = "Estoque baixado e quantidades reconciliadas", body = crate::models::requisition::MaterialRequisition),
        (status = 404, description = "Requisição não encontrada"),
        (status = 409, description = "Estado atual não permite atendimento")
    ),
    params(("id" = Uuid, Path, description = "ID da requisição"))
)]
pub async fn fulfill_requisition(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FulfillRequisitionPayload>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.requisition_service.fulfill(id, payload)?))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequisitionPayload {
    pub cancelled_by: Option<String>,
    pub reason: Option<String>,
}

// POST /api/requisitions/{id}/cancel
#[utoipa::path(
    post,
    path = "/api/requisitions/{id}/cancel",
    tag = "Requisitions",
    request_body = CancelRequisitionPayload,
    responses(
        (status = 200, body = crate::models::requisition::MaterialRequisition),
        (status = 404, description = "Requisição não encontrada"),
        (status = 409, description = "Estado atual não permite cancelamento")
    ),
    params(("id" = Uuid, Path, description = "ID da requisição"))
)]
pub async fn cancel_requisition(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelRequisitionPayload>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.requisition_service.cancel(id, payload)?))
}
