//! Shared application state

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use yojana_agent::{DialogueController, InMemoryStateStore};
use yojana_agent_config::Settings;
use yojana_agent_core::{Scheme, StateStore};

/// State shared across all HTTP handlers.
///
/// The controller requires turns within one thread to be serialized; the
/// per-thread mutex map enforces that at the transport boundary while leaving
/// distinct threads free to run concurrently.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub controller: Arc<DialogueController>,
    pub store: Arc<InMemoryStateStore>,
    turn_locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl AppState {
    pub fn new(config: Settings, catalog: Vec<Scheme>) -> Self {
        Self {
            config: Arc::new(config),
            controller: Arc::new(DialogueController::new(Arc::new(catalog))),
            store: Arc::new(InMemoryStateStore::new()),
            turn_locks: Arc::new(DashMap::new()),
        }
    }

    /// Lock guarding turn processing for one thread id
    pub fn turn_lock(&self, thread_id: &str) -> Arc<Mutex<()>> {
        self.turn_locks
            .entry(thread_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop a thread's conversation state and its turn lock. Without the
    /// lock removal the map grows by one entry per thread id ever seen.
    pub fn remove_thread(&self, thread_id: &str) {
        self.store.remove(thread_id);
        self.turn_locks.remove(thread_id);
    }
}
