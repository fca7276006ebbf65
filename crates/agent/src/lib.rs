//! Dialogue controller for the scheme assistant
//!
//! One entry point: [`DialogueController::process_turn`] takes a thread id,
//! one user utterance and the thread's prior conversation state, runs one
//! linear pass through the plan/execute/evaluate/respond pipeline and returns
//! the reply, the updated state and structured turn metadata. The host owns
//! persistence between turns ([`InMemoryStateStore`] is the bundled
//! implementation) and must serialize turns per thread.

pub mod contradiction;
pub mod controller;
pub mod memory;
pub mod responder;

pub use controller::{DialogueController, TurnMetadata, TurnOutcome};
pub use memory::InMemoryStateStore;
