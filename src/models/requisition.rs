// src/models/requisition.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum RequisitionStatus {
    Pending,
    Approved,
    Rejected,
    PartiallyFulfilled,
    Fulfilled,
    Cancelled,
}

impl RequisitionStatus {
    // Máquina de estados da requisição. A re-aprovação de uma requisição
    // já aprovada é permitida (sem guarda, efeito idempotente).
    pub fn allowed_transitions(self) -> &'static [RequisitionStatus] {
        use RequisitionStatus::*;
        match self {
            Pending => &[Approved, Rejected],
            Approved => &[Approved, PartiallyFulfilled, Fulfilled, Cancelled],
            PartiallyFulfilled => &[PartiallyFulfilled, Fulfilled, Cancelled],
            Rejected | Fulfilled | Cancelled => &[],
        }
    }

    pub fn can_transition_to(self, next: RequisitionStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum RequisitionItemStatus {
    Pending,
    Approved,
    Rejected,
    PartiallyFulfilled,
    Fulfilled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum RequisitionUrgency {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum RequisitionType {
    WorkOrder,
    Maintenance,
    General,
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequisitionItem {
    pub id: Uuid,
    pub material_id: Uuid,
    pub material_code: String,
    pub material_description: String,
    #[schema(example = "20.0")]
    pub requested_quantity: Decimal,
    pub approved_quantity: Option<Decimal>,
    pub fulfilled_quantity: Option<Decimal>,
    pub remaining_quantity: Option<Decimal>,
    pub urgency: RequisitionUrgency,
    pub status: RequisitionItemStatus,
    pub notes: Option<String>,
    pub estimated_cost: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRequisition {
    pub id: Uuid,
    #[schema(example = "REQ-202608-0001")]
    pub request_number: String,
    pub request_type: RequisitionType,
    pub work_order_id: Option<Uuid>,
    #[schema(example = "WO-2026-001")]
    pub work_order_number: Option<String>,
    pub requested_by: String,
    pub request_date: DateTime<Utc>,
    pub required_by: DateTime<Utc>,
    pub status: RequisitionStatus,
    pub items: Vec<RequisitionItem>,
    #[schema(example = "Material para a fase de fundação")]
    pub justification: String,
    #[schema(example = "1700.00")]
    pub total_estimated_cost: Decimal,
    pub urgency: RequisitionUrgency,
    pub approval_required: bool,
    pub approved_by: Option<String>,
    pub approved_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}
