// src/config.rs

use std::env;

use crate::{
    models::work_order::ProgressThresholds,
    services::{DashboardService, InventoryService, RequisitionService, WorkOrderService},
    store::{
        ActivityLogRepository, DocumentSequences, MaterialRepository, RequisitionRepository,
        WorkOrderRepository,
    },
};

// O estado compartilhado que será acessível em toda a aplicação.
// Os stores são criados UMA vez aqui e passados por handle aos
// serviços; os testes constroem um AppState próprio e descartam tudo
// junto (nada de singleton global).
#[derive(Clone)]
pub struct AppState {
    pub work_order_repo: WorkOrderRepository,
    pub material_repo: MaterialRepository,
    pub requisition_repo: RequisitionRepository,
    pub activity_log: ActivityLogRepository,

    pub work_order_service: WorkOrderService,
    pub inventory_service: InventoryService,
    pub requisition_service: RequisitionService,
    pub dashboard_service: DashboardService,

    pub bind_addr: String,
}

impl AppState {
    pub fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        // Faixas de progresso configuráveis (alerta / atenção).
        let thresholds = ProgressThresholds {
            alert_below: env_i32("PROGRESS_ALERT_BELOW", 30)?,
            caution_below: env_i32("PROGRESS_CAUTION_BELOW", 70)?,
        };

        // --- Monta o gráfico de dependências ---
        let sequences = DocumentSequences::new();
        let work_order_repo = WorkOrderRepository::new();
        let material_repo = MaterialRepository::new();
        let requisition_repo = RequisitionRepository::new();
        let activity_log = ActivityLogRepository::new();

        let inventory_service = InventoryService::new(material_repo.clone(), sequences.clone());
        let work_order_service = WorkOrderService::new(
            work_order_repo.clone(),
            material_repo.clone(),
            activity_log.clone(),
            sequences.clone(),
            thresholds,
        );
        let requisition_service = RequisitionService::new(
            requisition_repo.clone(),
            inventory_service.clone(),
            work_order_repo.clone(),
            sequences,
        );
        let dashboard_service = DashboardService::new(
            work_order_repo.clone(),
            material_repo.clone(),
            requisition_repo.clone(),
            inventory_service.clone(),
        );

        Ok(Self {
            work_order_repo,
            material_repo,
            requisition_repo,
            activity_log,
            work_order_service,
            inventory_service,
            requisition_service,
            dashboard_service,
            bind_addr,
        })
    }
}

fn env_i32(name: &str, default: i32) -> anyhow::Result<i32> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| anyhow::anyhow!("{} deve ser um inteiro, recebeu '{}'", name, value)),
        Err(_) => Ok(default),
    }
}
