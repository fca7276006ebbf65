//! Checkpoint store trait
//!
//! Cross-turn persistence of conversation state is delegated to the host via
//! an opaque get/put dependency keyed by thread id. The core never assumes a
//! particular persistence technology; the agent crate ships an in-memory
//! implementation.

use crate::conversation::ConversationState;

/// Host-provided key/value store for conversation state.
///
/// The host must serialize turns per thread id; implementations only need to
/// make individual get/put calls safe to issue from multiple threads.
pub trait StateStore: Send + Sync {
    /// Load the state for a thread, if one exists
    fn get(&self, thread_id: &str) -> Option<ConversationState>;

    /// Persist the state for a thread, replacing any previous snapshot
    fn put(&self, thread_id: &str, state: ConversationState);

    /// Drop the state for a thread (conversation reset)
    fn remove(&self, thread_id: &str);
}
