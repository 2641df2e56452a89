// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::material::{MaterialMovement, StockAlert};

// Resumo gerencial calculado na hora a partir dos stores (nada de
// números fictícios).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    #[schema(example = 42)]
    pub total_materials: usize,
    #[schema(example = "2456789.50")]
    pub total_stock_value: Decimal,
    #[schema(example = 3)]
    pub low_stock_items: usize,
    #[schema(example = 1)]
    pub out_of_stock_items: usize,
    pub total_work_orders: usize,
    pub pending_work_orders: usize,
    pub pending_requisitions: usize,
    pub pending_adjustments: usize,
    pub recent_movements: Vec<MaterialMovement>,
    pub stock_alerts: Vec<StockAlert>,
}
