// src/store/activity_log_repo.rs

use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use uuid::Uuid;

use crate::models::activity::ActivityLogEntry;

// Trilha de auditoria em memória: só acrescenta, nunca edita.
#[derive(Clone, Default)]
pub struct ActivityLogRepository {
    entries: Arc<RwLock<Vec<ActivityLogEntry>>>,
}

impl ActivityLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(
        &self,
        entity_type: &str,
        entity_id: Uuid,
        action: &str,
        description: String,
        performed_by: &str,
    ) -> ActivityLogEntry {
        let entry = ActivityLogEntry {
            id: Uuid::new_v4(),
            entity_type: entity_type.to_string(),
            entity_id,
            action: action.to_string(),
            description,
            performed_by: performed_by.to_string(),
            performed_date: Utc::now(),
            system_generated: true,
        };
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.clone());
        entry
    }

    pub fn for_entity(&self, entity_id: Uuid) -> Vec<ActivityLogEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|entry| entry.entity_id == entity_id)
            .cloned()
            .collect()
    }
}
