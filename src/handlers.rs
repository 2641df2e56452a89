pub mod dashboard;
pub mod materials;
pub mod requisitions;
pub mod work_orders;
