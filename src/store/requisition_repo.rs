// src/store/requisition_repo.rs

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::requisition::{MaterialRequisition, RequisitionStatus},
    store::events::{ChangeKind, StoreEvent, Subscribers},
};

#[derive(Clone, Default)]
pub struct RequisitionRepository {
    requisitions: Arc<RwLock<Vec<MaterialRequisition>>>,
    subscribers: Subscribers,
}

impl RequisitionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl Fn(&StoreEvent) + Send + Sync + 'static) {
        self.subscribers.subscribe(listener);
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, Vec<MaterialRequisition>> {
        self.requisitions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, Vec<MaterialRequisition>> {
        self.requisitions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get_all(&self) -> Vec<MaterialRequisition> {
        self.read_guard().clone()
    }

    pub fn get_by_id(&self, id: Uuid) -> Result<MaterialRequisition, AppError> {
        self.read_guard()
            .iter()
            .find(|requisition| requisition.id == id)
            .cloned()
            .ok_or(AppError::RequisitionNotFound(id))
    }

    pub fn count_with_status(&self, status: RequisitionStatus) -> usize {
        self.read_guard()
            .iter()
            .filter(|requisition| requisition.status == status)
            .count()
    }

    // Mais recentes primeiro, como a origem fazia.
    pub fn insert(&self, requisition: MaterialRequisition) -> MaterialRequisition {
        let event = StoreEvent {
            kind: ChangeKind::Created,
            entity_type: "requisition",
            entity_id: requisition.id,
        };
        {
            let mut requisitions = self.write_guard();
            requisitions.insert(0, requisition.clone());
        }
        self.subscribers.notify(&event);
        requisition
    }

    pub fn try_update_with<F>(&self, id: Uuid, mutate: F) -> Result<MaterialRequisition, AppError>
    where
        F: FnOnce(&mut MaterialRequisition) -> Result<(), AppError>,
    {
        let updated = {
            let mut requisitions = self.write_guard();
            let slot = requisitions
                .iter_mut()
                .find(|requisition| requisition.id == id)
                .ok_or(AppError::RequisitionNotFound(id))?;

            let mut draft = slot.clone();
            mutate(&mut draft)?;
            *slot = draft.clone();
            draft
        };
        self.subscribers.notify(&StoreEvent {
            kind: ChangeKind::Updated,
            entity_type: "requisition",
            entity_id: id,
        });
        Ok(updated)
    }
}
