// src/store/events.rs

use std::sync::{Arc, PoisonError, RwLock};

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

// Evento publicado pelos stores depois que cada mutação é confirmada.
#[derive(Debug, Clone)]
pub struct StoreEvent {
    pub kind: ChangeKind,
    pub entity_type: &'static str,
    pub entity_id: Uuid,
}

type Listener = Box<dyn Fn(&StoreEvent) + Send + Sync>;

// Registro explícito de callbacks no lugar dos observables da UI.
// Os inscritos são notificados de forma síncrona, após a mutação e fora
// do lock de dados.
#[derive(Clone, Default)]
pub struct Subscribers {
    listeners: Arc<RwLock<Vec<Listener>>>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl Fn(&StoreEvent) + Send + Sync + 'static) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(listener));
    }

    pub fn notify(&self, event: &StoreEvent) {
        let listeners = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        for listener in listeners.iter() {
            listener(event);
        }
    }
}
