// src/services/dashboard_service.rs

use rust_decimal::Decimal;

use crate::{
    models::dashboard::DashboardSummary,
    models::material::StockStatus,
    models::requisition::RequisitionStatus,
    models::work_order::WorkOrderStatus,
    services::inventory_service::InventoryService,
    store::{MaterialRepository, RequisitionRepository, WorkOrderRepository},
};

const RECENT_MOVEMENTS: usize = 10;

#[derive(Clone)]
pub struct DashboardService {
    work_order_repo: WorkOrderRepository,
    material_repo: MaterialRepository,
    requisition_repo: RequisitionRepository,
    inventory_service: InventoryService,
}

impl DashboardService {
    pub fn new(
        work_order_repo: WorkOrderRepository,
        material_repo: MaterialRepository,
        requisition_repo: RequisitionRepository,
        inventory_service: InventoryService,
    ) -> Self {
        Self {
            work_order_repo,
            material_repo,
            requisition_repo,
            inventory_service,
        }
    }

    // Tudo calculado dos stores no momento da chamada.
    pub fn summary(&self) -> DashboardSummary {
        let materials = self.material_repo.get_all();

        let total_stock_value = materials
            .iter()
            .filter_map(|material| {
                material
                    .average_cost
                    .map(|cost| cost * material.total_stock)
            })
            .sum::<Decimal>();
        let low_stock_items = materials
            .iter()
            .filter(|material| material.stock_status() == StockStatus::LowStock)
            .count();
        let out_of_stock_items = materials
            .iter()
            .filter(|material| material.stock_status() == StockStatus::OutOfStock)
            .count();

        let work_orders = self.work_order_repo.get_all();
        let pending_work_orders = work_orders
            .iter()
            .filter(|order| order.details.status == WorkOrderStatus::Pending)
            .count();

        DashboardSummary {
            total_materials: materials.len(),
            total_stock_value,
            low_stock_items,
            out_of_stock_items,
            total_work_orders: work_orders.len(),
            pending_work_orders,
            pending_requisitions: self
                .requisition_repo
                .count_with_status(RequisitionStatus::Pending),
            pending_adjustments: self.material_repo.pending_adjustments(),
            recent_movements: self.material_repo.recent_movements(RECENT_MOVEMENTS),
            stock_alerts: self.inventory_service.alerts_for(&materials),
        }
    }
}
