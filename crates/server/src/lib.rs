//! HTTP host around the dialogue controller
//!
//! Thin transport layer: loads the scheme catalog, keeps conversation state
//! in an in-memory store keyed by thread id, and serializes turns per thread
//! so the controller sees one turn at a time.

pub mod http;
pub mod state;

pub use http::create_router;
pub use state::AppState;
