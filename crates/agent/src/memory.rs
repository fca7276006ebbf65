//! In-memory checkpoint store

use dashmap::DashMap;
use yojana_agent_core::{ConversationState, StateStore};

/// Process-local state store keyed by thread id. Individual get/put calls are
/// safe from multiple threads; serializing turns per thread stays the host's
/// job.
#[derive(Default)]
pub struct InMemoryStateStore {
    states: DashMap<String, ConversationState>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl StateStore for InMemoryStateStore {
    fn get(&self, thread_id: &str) -> Option<ConversationState> {
        self.states.get(thread_id).map(|entry| entry.value().clone())
    }

    fn put(&self, thread_id: &str, state: ConversationState) {
        self.states.insert(thread_id.to_string(), state);
    }

    fn remove(&self, thread_id: &str) {
        self.states.remove(thread_id);
    }
}
