// src/store/work_order_repo.rs

use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::work_order::WorkOrder,
    store::events::{ChangeKind, StoreEvent, Subscribers},
};

// Dono da coleção canônica de ordens de serviço. Uma instância por
// aplicação, criada em AppState::new() e passada por handle aos
// serviços (nada de singleton ambiente).
#[derive(Clone, Default)]
pub struct WorkOrderRepository {
    orders: Arc<RwLock<Vec<WorkOrder>>>,
    subscribers: Subscribers,
}

impl WorkOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl Fn(&StoreEvent) + Send + Sync + 'static) {
        self.subscribers.subscribe(listener);
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, Vec<WorkOrder>> {
        self.orders.write().unwrap_or_else(PoisonError::into_inner)
    }

    // --- Leitura ---

    // Retorna uma cópia defensiva, nunca referências ao estado interno.
    pub fn get_all(&self) -> Vec<WorkOrder> {
        self.orders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get_by_id(&self, id: Uuid) -> Result<WorkOrder, AppError> {
        self.orders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|order| order.id == id)
            .cloned()
            .ok_or(AppError::WorkOrderNotFound(id))
    }

    pub fn count(&self) -> usize {
        self.orders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    // --- Escrita ---

    pub fn insert(&self, order: WorkOrder) -> WorkOrder {
        let event = StoreEvent {
            kind: ChangeKind::Created,
            entity_type: "workOrder",
            entity_id: order.id,
        };
        {
            let mut orders = self.write_guard();
            orders.push(order.clone());
        }
        self.subscribers.notify(&event);
        order
    }

    // Helper transacional: a mutação roda numa cópia e só é trocada no
    // lugar se a closure retornar Ok. Um Err no meio do caminho não
    // deixa a coleção inconsistente.
    pub fn try_update_with<F>(&self, id: Uuid, mutate: F) -> Result<WorkOrder, AppError>
    where
        F: FnOnce(&mut WorkOrder) -> Result<(), AppError>,
    {
        let updated = {
            let mut orders = self.write_guard();
            let slot = orders
                .iter_mut()
                .find(|order| order.id == id)
                .ok_or(AppError::WorkOrderNotFound(id))?;

            let mut draft = slot.clone();
            mutate(&mut draft)?;
            draft.details.last_updated = Some(Utc::now());
            *slot = draft.clone();
            draft
        };

        self.subscribers.notify(&StoreEvent {
            kind: ChangeKind::Updated,
            entity_type: "workOrder",
            entity_id: id,
        });
        Ok(updated)
    }

    pub fn update_with<F>(&self, id: Uuid, mutate: F) -> Result<WorkOrder, AppError>
    where
        F: FnOnce(&mut WorkOrder),
    {
        self.try_update_with(id, |order| {
            mutate(order);
            Ok(())
        })
    }

    pub fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        {
            let mut orders = self.write_guard();
            let index = orders
                .iter()
                .position(|order| order.id == id)
                .ok_or(AppError::WorkOrderNotFound(id))?;
            orders.remove(index);
        }
        self.subscribers.notify(&StoreEvent {
            kind: ChangeKind::Deleted,
            entity_type: "workOrder",
            entity_id: id,
        });
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::work_order::{
        ExpenseBreakdown, WorkOrderDetails, WorkOrderPriority, WorkOrderStatus,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sample_order() -> WorkOrder {
        let now = Utc::now();
        WorkOrder {
            id: Uuid::new_v4(),
            details: WorkOrderDetails {
                work_order_number: "WO-2026-001".into(),
                internal_order_number: "INT-2026-001".into(),
                title: "Teste".into(),
                description: String::new(),
                client: String::new(),
                location: String::new(),
                status: WorkOrderStatus::Pending,
                priority: WorkOrderPriority::Medium,
                category: String::new(),
                completion_percentage: 0,
                received_date: now,
                start_date: now,
                due_date: now,
                target_end_date: None,
                created_date: now,
                created_by: "tests".into(),
                last_updated: None,
            },
            items: vec![],
            remarks: vec![],
            issues: vec![],
            materials: vec![],
            tasks: vec![],
            actions: vec![],
            actions_needed: None,
            photos: vec![],
            forms: vec![],
            expenses: vec![],
            invoices: vec![],
            expense_breakdown: ExpenseBreakdown::default(),
        }
    }

    #[test]
    fn get_all_devolve_copia_defensiva() {
        let repo = WorkOrderRepository::new();
        let order = repo.insert(sample_order());

        let mut copy = repo.get_all();
        copy[0].details.title = "alterado fora do store".into();

        assert_eq!(repo.get_by_id(order.id).unwrap().details.title, "Teste");
    }

    #[test]
    fn inscritos_sao_notificados_de_forma_sincrona() {
        let repo = WorkOrderRepository::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_by_listener = seen.clone();
        repo.subscribe(move |event| {
            if event.kind == ChangeKind::Created {
                seen_by_listener.fetch_add(1, Ordering::SeqCst);
            }
        });

        repo.insert(sample_order());
        // A notificação acontece antes do insert retornar.
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn erro_na_mutacao_nao_deixa_estado_parcial() {
        let repo = WorkOrderRepository::new();
        let order = repo.insert(sample_order());

        let result = repo.try_update_with(order.id, |draft| {
            draft.details.title = "meio caminho".into();
            Err(AppError::InvalidPayload("falha simulada".into()))
        });

        assert!(result.is_err());
        assert_eq!(repo.get_by_id(order.id).unwrap().details.title, "Teste");
    }

    #[test]
    fn delete_remove_e_falha_para_id_desconhecido() {
        let repo = WorkOrderRepository::new();
        let order = repo.insert(sample_order());

        assert!(repo.delete(order.id).unwrap());
        assert!(matches!(
            repo.delete(order.id),
            Err(AppError::WorkOrderNotFound(_))
        ));
    }
}
