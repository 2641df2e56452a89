pub mod work_order_service;
pub use work_order_service::WorkOrderService;
pub mod inventory_service;
pub use inventory_service::InventoryService;
pub mod requisition_service;
pub use requisition_service::RequisitionService;
pub mod dashboard_service;
pub use dashboard_service::DashboardService;
