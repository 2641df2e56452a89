// src/store/material_repo.rs

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::material::{Material, MaterialMovement, StockAdjustment},
    store::events::{ChangeKind, StoreEvent, Subscribers},
};

// Catálogo, ajustes e movimentações vivem atrás de UM lock só: toda
// escrita que afeta estoque confirma material + ajuste + movimentação
// na mesma seção crítica.
#[derive(Default)]
struct MaterialState {
    materials: Vec<Material>,
    adjustments: Vec<StockAdjustment>,
    movements: Vec<MaterialMovement>,
}

#[derive(Clone, Default)]
pub struct MaterialRepository {
    state: Arc<RwLock<MaterialState>>,
    subscribers: Subscribers,
}

impl MaterialRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl Fn(&StoreEvent) + Send + Sync + 'static) {
        self.subscribers.subscribe(listener);
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, MaterialState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, MaterialState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // --- Catálogo ---

    pub fn get_all(&self) -> Vec<Material> {
        self.read_guard().materials.clone()
    }

    pub fn get_by_id(&self, id: Uuid) -> Result<Material, AppError> {
        self.read_guard()
            .materials
            .iter()
            .find(|material| material.id == id)
            .cloned()
            .ok_or(AppError::MaterialNotFound(id))
    }

    pub fn insert(&self, material: Material) -> Material {
        let event = StoreEvent {
            kind: ChangeKind::Created,
            entity_type: "material",
            entity_id: material.id,
        };
        {
            let mut state = self.write_guard();
            state.materials.push(material.clone());
        }
        self.subscribers.notify(&event);
        material
    }

    pub fn try_update_with<F>(&self, id: Uuid, mutate: F) -> Result<Material, AppError>
    where
        F: FnOnce(&mut Material) -> Result<(), AppError>,
    {
        let updated = {
            let mut state = self.write_guard();
            let slot = state
                .materials
                .iter_mut()
                .find(|material| material.id == id)
                .ok_or(AppError::MaterialNotFound(id))?;

            // Copy-on-write: a cópia só substitui o original se der certo.
            let mut draft = slot.clone();
            mutate(&mut draft)?;
            draft.updated_at = Utc::now();
            *slot = draft.clone();
            draft
        };
        self.subscribers.notify(&StoreEvent {
            kind: ChangeKind::Updated,
            entity_type: "material",
            entity_id: id,
        });
        Ok(updated)
    }

    pub fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        {
            let mut state = self.write_guard();
            let index = state
                .materials
                .iter()
                .position(|material| material.id == id)
                .ok_or(AppError::MaterialNotFound(id))?;
            state.materials.remove(index);
        }
        self.subscribers.notify(&StoreEvent {
            kind: ChangeKind::Deleted,
            entity_type: "material",
            entity_id: id,
        });
        Ok(true)
    }

    // --- Estoque ---

    // Commit atômico de uma mudança de estoque: a closure lê o material
    // corrente e devolve o novo saldo total mais os registros de
    // auditoria; saldo, available_stock, ajuste e movimentação são
    // gravados sob o mesmo write lock. Um Err não altera nada.
    pub fn commit_stock_change<F>(
        &self,
        material_id: Uuid,
        change: F,
    ) -> Result<(Material, MaterialMovement), AppError>
    where
        F: FnOnce(
            &Material,
        ) -> Result<(Decimal, Option<StockAdjustment>, MaterialMovement), AppError>,
    {
        let (material, movement) = {
            let mut state = self.write_guard();
            let index = state
                .materials
                .iter()
                .position(|material| material.id == material_id)
                .ok_or(AppError::MaterialNotFound(material_id))?;

            let (new_total, adjustment, movement) = change(&state.materials[index])?;

            let slot = &mut state.materials[index];
            slot.total_stock = new_total;
            slot.available_stock = Some(new_total - slot.reserved_stock);
            slot.updated_at = Utc::now();
            let material = slot.clone();

            // Mais recentes primeiro, como a listagem espera.
            if let Some(adjustment) = adjustment {
                state.adjustments.insert(0, adjustment);
            }
            state.movements.insert(0, movement.clone());

            (material, movement)
        };

        self.subscribers.notify(&StoreEvent {
            kind: ChangeKind::Updated,
            entity_type: "material",
            entity_id: material_id,
        });
        Ok((material, movement))
    }

    // --- Auditoria ---

    pub fn movements(&self) -> Vec<MaterialMovement> {
        self.read_guard().movements.clone()
    }

    pub fn recent_movements(&self, limit: usize) -> Vec<MaterialMovement> {
        self.read_guard()
            .movements
            .iter()
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn adjustments(&self) -> Vec<StockAdjustment> {
        self.read_guard().adjustments.clone()
    }

    pub fn pending_adjustments(&self) -> usize {
        self.read_guard()
            .adjustments
            .iter()
            .filter(|adjustment| adjustment.status == "pending")
            .count()
    }
}
