// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Work Orders ---
        handlers::work_orders::create_work_order,
        handlers::work_orders::list_work_orders,
        handlers::work_orders::get_work_order,
        handlers::work_orders::update_work_order,
        handlers::work_orders::delete_work_order,
        handlers::work_orders::update_status,
        handlers::work_orders::update_priority,
        handlers::work_orders::get_summary,
        handlers::work_orders::get_activity,
        handlers::work_orders::list_statuses,
        handlers::work_orders::add_remark,
        handlers::work_orders::update_remark,
        handlers::work_orders::delete_remark,
        handlers::work_orders::add_task,
        handlers::work_orders::update_task,
        handlers::work_orders::delete_task,
        handlers::work_orders::assign_material,
        handlers::work_orders::update_material_assignment,
        handlers::work_orders::remove_material_assignment,

        // --- Materials ---
        handlers::materials::create_material,
        handlers::materials::list_materials,
        handlers::materials::get_material,
        handlers::materials::update_material,
        handlers::materials::delete_material,
        handlers::materials::adjust_stock,
        handlers::materials::list_alerts,
        handlers::materials::list_movements,
        handlers::materials::list_adjustments,

        // --- Requisitions ---
        handlers::requisitions::submit_requisition,
        handlers::requisitions::list_requisitions,
        handlers::requisitions::get_requisition,
        handlers::requisitions::approve_requisition,
        handlers::requisitions::reject_requisition,
        handlers::requisitions::fulfill_requisition,
        handlers::requisitions::cancel_requisition,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
    ),
    components(
        schemas(
            // --- Work Orders ---
            models::work_order::WorkOrder,
            models::work_order::WorkOrderDetails,
            models::work_order::WorkOrderStatus,
            models::work_order::WorkOrderPriority,
            models::work_order::ProgressBucket,
            models::work_order::WorkOrderSummary,
            models::work_order::WorkOrderItem,
            models::work_order::MaterialAssignment,
            models::work_order::WorkOrderRemark,
            models::work_order::RemarkKind,
            models::work_order::WorkOrderTask,
            models::work_order::TaskStatus,
            models::work_order::WorkOrderIssue,
            models::work_order::IssueStatus,
            models::work_order::WorkOrderAction,
            models::work_order::ActionItem,
            models::work_order::WorkOrderPhoto,
            models::work_order::WorkOrderForm,
            models::work_order::WorkOrderExpense,
            models::work_order::ExpenseStatus,
            models::work_order::WorkOrderInvoice,
            models::work_order::InvoiceStatus,
            models::work_order::ExpenseBreakdown,
            models::activity::ActivityLogEntry,

            // --- Materials ---
            models::material::Material,
            models::material::MaterialType,
            models::material::ClientType,
            models::material::StockStatus,
            models::material::StockAlert,
            models::material::StockAlertType,
            models::material::AlertSeverity,
            models::material::StockAdjustment,
            models::material::AdjustmentKind,
            models::material::MaterialMovement,
            models::material::MovementType,
            models::material::MovementLocation,
            models::material::RelatedEntity,

            // --- Requisitions ---
            models::requisition::MaterialRequisition,
            models::requisition::RequisitionItem,
            models::requisition::RequisitionStatus,
            models::requisition::RequisitionItemStatus,
            models::requisition::RequisitionUrgency,
            models::requisition::RequisitionType,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,

            // --- Payloads ---
            handlers::work_orders::CreateWorkOrderPayload,
            handlers::work_orders::UpdateWorkOrderPayload,
            handlers::work_orders::WorkOrderDetailsPatch,
            handlers::work_orders::UpdateStatusPayload,
            handlers::work_orders::UpdatePriorityPayload,
            handlers::work_orders::StatusCatalogEntry,
            handlers::work_orders::AddRemarkPayload,
            handlers::work_orders::UpdateRemarkPayload,
            handlers::work_orders::AddTaskPayload,
            handlers::work_orders::UpdateTaskPayload,
            handlers::work_orders::AssignMaterialPayload,
            handlers::work_orders::UpdateAssignmentPayload,
            handlers::materials::CreateMaterialPayload,
            handlers::materials::UpdateMaterialPayload,
            handlers::materials::AdjustStockPayload,
            handlers::requisitions::SubmitRequisitionPayload,
            handlers::requisitions::RequisitionItemPayload,
            handlers::requisitions::ApproveRequisitionPayload,
            handlers::requisitions::RejectRequisitionPayload,
            handlers::requisitions::FulfillRequisitionPayload,
            handlers::requisitions::FulfillItemPayload,
            handlers::requisitions::CancelRequisitionPayload,
        )
    ),
    tags(
        (name = "Work Orders", description = "Ciclo de vida das Ordens de Serviço"),
        (name = "Materials", description = "Catálogo de Materiais, Estoque e Alertas"),
        (name = "Requisitions", description = "Requisições de Material e Aprovação"),
        (name = "Dashboard", description = "Indicadores Gerenciais")
    )
)]
pub struct ApiDoc;
