// src/models/material.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum MaterialType {
    Purchasable,
    Receivable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ClientType {
    Sec,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
    Overstocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StockAlertType {
    LowStock,
    OutOfStock,
    Overstocked,
    Expiring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

// Tipo pedido pelo usuário no ajuste. `set-absolute` é resolvido para
// aumento ou redução antes de gravar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AdjustmentKind {
    Increase,
    Decrease,
    SetAbsolute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum MovementType {
    Receipt,
    Issue,
    Transfer,
    Return,
    WriteOff,
}

// --- Catálogo + Estoque ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: Uuid,
    #[schema(example = "CEM-001")]
    pub code: String,
    #[schema(example = "Cimento Portland Tipo I")]
    pub description: String,
    #[schema(example = "bag")]
    pub unit: String,
    pub material_type: MaterialType,
    pub client_type: ClientType,
    // Atributos dinâmicos por cliente (ex.: groupCode da SEC)
    #[schema(value_type = Option<Object>)]
    pub attributes: Option<serde_json::Value>,

    // --- Extensão de inventário ---
    #[schema(example = "150.0")]
    pub total_stock: Decimal,
    pub available_stock: Option<Decimal>,
    pub reserved_stock: Decimal,
    pub minimum_stock: Option<Decimal>,
    pub maximum_stock: Option<Decimal>,
    pub reorder_point: Option<Decimal>,
    #[schema(example = "35.00")]
    pub average_cost: Option<Decimal>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Material {
    // Classifica o estoque na precedência: esgotado, depois baixo,
    // depois excedente. No máximo uma classificação por material.
    pub fn stock_status(&self) -> StockStatus {
        let available = self.available_stock.unwrap_or(self.total_stock);

        if available <= Decimal::ZERO {
            return StockStatus::OutOfStock;
        }

        let low_threshold = self.minimum_stock.or(self.reorder_point);
        if let Some(threshold) = low_threshold {
            if available <= threshold {
                return StockStatus::LowStock;
            }
        }

        if let Some(maximum) = self.maximum_stock {
            if available > maximum {
                return StockStatus::Overstocked;
            }
        }

        StockStatus::InStock
    }

    pub fn effective_stock(&self) -> Decimal {
        self.available_stock.unwrap_or(self.total_stock)
    }
}

// --- Ajustes e Movimentações ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustment {
    pub id: Uuid,
    #[schema(example = "ADJ-202608-0001")]
    pub adjustment_number: String,
    pub material_id: Uuid,
    // Direção efetivamente aplicada (set-absolute já resolvido)
    pub adjustment_type: AdjustmentKind,
    // Delta REAL aplicado, não o pedido (reduções são limitadas em zero)
    #[schema(example = "10.0")]
    pub quantity: Decimal,
    #[schema(example = "Contagem física")]
    pub reason: String,
    pub notes: Option<String>,
    pub performed_by: String,
    pub performed_date: DateTime<Utc>,
    #[schema(example = "approved")]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementLocation {
    #[schema(example = "warehouse")]
    pub kind: String,
    #[schema(example = "main-warehouse")]
    pub id: String,
    #[schema(example = "Main Warehouse")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelatedEntity {
    #[schema(example = "adjustment")]
    pub kind: String,
    pub id: Uuid,
    #[schema(example = "ADJ-202608-0001")]
    pub reference: String,
}

// Registro imutável de auditoria. Nunca editado depois de gravado.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialMovement {
    pub id: Uuid,
    #[schema(example = "MOV-202608-0001")]
    pub movement_number: String,
    pub material_id: Uuid,
    pub material_code: String,
    pub material_description: String,
    pub movement_type: MovementType,
    #[schema(example = "10.0")]
    pub quantity: Decimal,
    pub unit: String,
    pub from_location: MovementLocation,
    pub to_location: MovementLocation,
    pub related_entity: Option<RelatedEntity>,
    pub performed_by: String,
    pub performed_date: DateTime<Utc>,
    pub cost: Option<Decimal>,
    pub notes: Option<String>,
}

// --- Alertas (derivados, nunca persistidos) ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockAlert {
    pub id: String,
    #[serde(rename = "type")]
    pub alert_type: StockAlertType,
    pub severity: AlertSeverity,
    pub material_id: Uuid,
    pub material_code: String,
    pub material_description: String,
    #[schema(example = "5.0")]
    pub current_stock: Decimal,
    #[schema(example = "10.0")]
    pub threshold_value: Decimal,
    #[schema(example = "Low stock: 5 bag remaining")]
    pub message: String,
    #[schema(example = "Reorder required")]
    pub action_required: String,
    pub date_detected: DateTime<Utc>,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material_with_stock(
        total: &str,
        minimum: Option<&str>,
        maximum: Option<&str>,
    ) -> Material {
        let now = Utc::now();
        Material {
            id: Uuid::new_v4(),
            code: "TST-001".into(),
            description: "Material de teste".into(),
            unit: "un".into(),
            material_type: MaterialType::Purchasable,
            client_type: ClientType::Other,
            attributes: None,
            total_stock: total.parse().unwrap(),
            available_stock: None,
            reserved_stock: Decimal::ZERO,
            minimum_stock: minimum.map(|m| m.parse().unwrap()),
            maximum_stock: maximum.map(|m| m.parse().unwrap()),
            reorder_point: None,
            average_cost: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn classificacao_segue_os_limites() {
        let low = material_with_stock("5", Some("10"), Some("100"));
        assert_eq!(low.stock_status(), StockStatus::LowStock);

        let over = material_with_stock("150", Some("10"), Some("100"));
        assert_eq!(over.stock_status(), StockStatus::Overstocked);

        let out = material_with_stock("0", Some("10"), Some("100"));
        assert_eq!(out.stock_status(), StockStatus::OutOfStock);

        let ok = material_with_stock("50", Some("10"), Some("100"));
        assert_eq!(ok.stock_status(), StockStatus::InStock);
    }

    #[test]
    fn esgotado_tem_precedencia_sobre_baixo() {
        // Zero está abaixo do mínimo, mas classifica como esgotado.
        let material = material_with_stock("0", Some("10"), None);
        assert_eq!(material.stock_status(), StockStatus::OutOfStock);
    }

    #[test]
    fn available_stock_prevalece_sobre_o_total() {
        let mut material = material_with_stock("100", Some("10"), None);
        material.available_stock = Some("4".parse().unwrap());
        assert_eq!(material.stock_status(), StockStatus::LowStock);
    }

    #[test]
    fn reorder_point_cobre_a_falta_de_minimo() {
        let mut material = material_with_stock("8", None, None);
        material.reorder_point = Some("15".parse().unwrap());
        assert_eq!(material.stock_status(), StockStatus::LowStock);
    }

    #[test]
    fn sem_limites_configurados_fica_em_estoque() {
        let material = material_with_stock("3", None, None);
        assert_eq!(material.stock_status(), StockStatus::InStock);
    }
}
