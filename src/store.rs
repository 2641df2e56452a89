pub mod events;
pub mod sequence;
pub use sequence::DocumentSequences;
pub mod work_order_repo;
pub use work_order_repo::WorkOrderRepository;
pub mod material_repo;
pub use material_repo::MaterialRepository;
pub mod requisition_repo;
pub use requisition_repo::RequisitionRepository;
pub mod activity_log_repo;
pub use activity_log_repo::ActivityLogRepository;
