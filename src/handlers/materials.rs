// src/handlers/materials.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    models::material::{AdjustmentKind, ClientType, MaterialType},
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
// Payload: CreateMaterial
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaterialPayload {
    #[validate(length(min = 1, message = "O código é obrigatório."))]
    #[schema(example = "CEM-001")]
    pub code: String,

    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    #[schema(example = "Cimento Portland Tipo I")]
    pub description: String,

    #[validate(length(min = 1, message = "A unidade é obrigatória."))]
    #[schema(example = "bag")]
    pub unit: String,

    pub material_type: MaterialType,
    pub client_type: Option<ClientType>,
    #[schema(value_type = Option<Object>)]
    pub attributes: Option<serde_json::Value>,

    #[validate(custom(function = "validate_not_negative"))]
    pub total_stock: Option<Decimal>,

    #[validate(custom(function = "validate_not_negative"))]
    pub reserved_stock: Option<Decimal>,

    #[validate(custom(function = "validate_not_negative"))]
    pub minimum_stock: Option<Decimal>,

    #[validate(custom(function = "validate_not_negative"))]
    pub maximum_stock: Option<Decimal>,

    #[validate(custom(function = "validate_not_negative"))]
    pub reorder_point: Option<Decimal>,

    #[validate(custom(function = "validate_not_negative"))]
    pub average_cost: Option<Decimal>,
}

// POST /api/materials
#[utoipa::path(
    post,
    path = "/api/materials",
    tag = "Materials",
    request_body = CreateMaterialPayload,
    responses(
        (status = 201, description = "Material criado", body = crate::models::material::Material)
    )
)]
pub async fn create_material(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateMaterialPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let material = app_state.inventory_service.create_material(payload);
    Ok((StatusCode::CREATED, Json(material)))
}

// GET /api/materials
#[utoipa::path(
    get,
    path = "/api/materials",
    tag = "Materials",
    responses(
        (status = 200, body = [crate::models::material::Material])
    )
)]
pub async fn list_materials(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.inventory_service.list_materials()))
}

// GET /api/materials/{id}
#[utoipa::path(
    get,
    path = "/api/materials/{id}",
    tag = "Materials",
    params(("id" = Uuid, Path, description = "ID do material")),
    responses(
        (status = 200, body = crate::models::material::Material),
        (status = 404, description = "Material não encontrado")
    )
)]
pub async fn get_material(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.inventory_service.get_material(id)?))
}

// ---
// Payload: UpdateMaterial
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaterialPayload {
    pub description: Option<String>,
    pub unit: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub attributes: Option<serde_json::Value>,

    #[validate(custom(function = "validate_not_negative"))]
    pub minimum_stock: Option<Decimal>,

    #[validate(custom(function = "validate_not_negative"))]
    pub maximum_stock: Option<Decimal>,

    #[validate(custom(function = "validate_not_negative"))]
    pub reorder_point: Option<Decimal>,

    #[validate(custom(function = "validate_not_negative"))]
    pub average_cost: Option<Decimal>,
}

// PUT /api/materials/{id}
#[utoipa::path(
    put,
    path = "/api/materials/{id}",
    tag = "Materials",
    request_body = UpdateMaterialPayload,
    params(("id" = Uuid, Path, description = "ID do material")),
    responses(
        (status = 200, body = crate::models::material::Material),
        (status = 404, description = "Material não encontrado")
    )
)]
pub async fn update_material(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMaterialPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    Ok(Json(app_state.inventory_service.update_material(id, payload)?))
}

// DELETE /api/materials/{id}
#[utoipa::path(
    delete,
    path = "/api/materials/{id}",
    tag = "Materials",
    params(("id" = Uuid, Path, description = "ID do material")),
    responses(
        (status = 200, description = "Removido", body = bool),
        (status = 404, description = "Material não encontrado")
    )
)]
pub async fn delete_material(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.inventory_service.delete_material(id)?))
}

// ---
// Ajuste de estoque
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdjustStockPayload {
    #[schema(example = "decrease")]
    pub adjustment_type: AdjustmentKind,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "10.0")]
    pub quantity: Decimal,

    #[validate(length(min = 1, message = "O motivo é obrigatório."))]
    #[schema(example = "Contagem física")]
    pub reason: String,

    pub notes: Option<String>,
    pub performed_by: Option<String>,
}

// POST /api/materials/{id}/adjust-stock
// Retorna o material atualizado e a movimentação gerada, para o
// frontend atualizar a tela sem nova consulta.
#[utoipa::path(
    post,
    path = "/api/materials/{id}/adjust-stock",
    tag = "Materials",
    request_body = AdjustStockPayload,
    params(("id" = Uuid, Path, description = "ID do material")),
    responses(
        (status = 200, description = "Ajuste aplicado (redução limitada em zero)"),
        (status = 404, description = "Material não encontrado")
    )
)]
pub async fn adjust_stock(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdjustStockPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (material, movement) = app_state.inventory_service.adjust_stock(id, payload)?;
    Ok(Json(serde_json::json!({
        "material": material,
        "movement": movement,
    })))
}

// GET /api/materials/alerts
#[utoipa::path(
    get,
    path = "/api/materials/alerts",
    tag = "Materials",
    responses(
        (status = 200, description = "Alertas derivados do estoque corrente (um por material)", body = [crate::models::material::StockAlert])
    )
)]
pub async fn list_alerts(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.inventory_service.generate_alerts()))
}

// GET /api/materials/movements
#[utoipa::path(
    get,
    path = "/api/materials/movements",
    tag = "Materials",
    responses(
        (status = 200, description = "Movimentações, mais recentes primeiro", body = [crate::models::material::MaterialMovement])
    )
)]
pub async fn list_movements(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.inventory_service.movements()))
}

// GET /api/materials/adjustments
#[utoipa::path(
    get,
    path = "/api/materials/adjustments",
    tag = "Materials",
    responses(
        (status = 200, description = "Ajustes aplicados, mais recentes primeiro", body = [crate::models::material::StockAdjustment])
    )
)]
pub async fn list_adjustments(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.inventory_service.adjustments()))
}
