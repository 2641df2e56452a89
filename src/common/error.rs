use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::models::requisition::RequisitionStatus;
use crate::models::work_order::WorkOrderStatus;

// Nosso tipo de erro de domínio, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Pedido malformado fora do alcance do validator (ex.: lista vazia)
    #[error("Pedido inválido: {0}")]
    InvalidPayload(String),

    #[error("Ordem de serviço não encontrada: {0}")]
    WorkOrderNotFound(Uuid),

    #[error("Observação não encontrada: {0}")]
    RemarkNotFound(Uuid),

    #[error("Tarefa não encontrada: {0}")]
    TaskNotFound(Uuid),

    #[error("Vínculo de material não encontrado: {0}")]
    MaterialAssignmentNotFound(Uuid),

    #[error("Material não encontrado: {0}")]
    MaterialNotFound(Uuid),

    #[error("Requisição não encontrada: {0}")]
    RequisitionNotFound(Uuid),

    #[error("Transição de status inválida")]
    InvalidStatusTransition {
        from: WorkOrderStatus,
        to: WorkOrderStatus,
    },

    #[error("Transição de requisição inválida")]
    InvalidRequisitionTransition {
        from: RequisitionStatus,
        to: RequisitionStatus,
    },

    // Variante genérica para qualquer outro erro inesperado.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::InvalidPayload(message) => {
                let body = Json(json!({ "error": message }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            // A transição carrega origem e destino para exibição.
            AppError::InvalidStatusTransition { from, to } => {
                let body = Json(json!({
                    "error": format!(
                        "Transição de status inválida de {} para {}",
                        from.display_name(),
                        to.display_name()
                    ),
                    "fromStatus": from,
                    "toStatus": to,
                }));
                return (StatusCode::CONFLICT, body).into_response();
            }

            AppError::InvalidRequisitionTransition { from, to } => {
                let body = Json(json!({
                    "error": "Transição de requisição inválida",
                    "fromStatus": from,
                    "toStatus": to,
                }));
                return (StatusCode::CONFLICT, body).into_response();
            }

            AppError::WorkOrderNotFound(_) => {
                (StatusCode::NOT_FOUND, "Ordem de serviço não encontrada.")
            }
            AppError::RemarkNotFound(_) => (StatusCode::NOT_FOUND, "Observação não encontrada."),
            AppError::TaskNotFound(_) => (StatusCode::NOT_FOUND, "Tarefa não encontrada."),
            AppError::MaterialAssignmentNotFound(_) => {
                (StatusCode::NOT_FOUND, "Vínculo de material não encontrado.")
            }
            AppError::MaterialNotFound(_) => (StatusCode::NOT_FOUND, "Material não encontrado."),
            AppError::RequisitionNotFound(_) => {
                (StatusCode::NOT_FOUND, "Requisição não encontrada.")
            }

            // Todos os outros erros viram 500. O `tracing` loga a mensagem
            // detalhada que o `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
