// src/models/activity.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// Trilha de auditoria das mutações de negócio (mudança de status,
// prioridade, vínculo de materiais). Apenas acrescentada, nunca editada.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    pub id: Uuid,
    #[schema(example = "workOrder")]
    pub entity_type: String,
    pub entity_id: Uuid,
    #[schema(example = "update")]
    pub action: String,
    #[schema(example = "Status changed from Pending to In Progress")]
    pub description: String,
    #[schema(example = "system")]
    pub performed_by: String,
    pub performed_date: DateTime<Utc>,
    pub system_generated: bool,
}
