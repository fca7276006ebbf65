//! Tools for the scheme assistant
//!
//! Two tools back the dialogue controller, plus catalog loading:
//! - [`EligibilityEngine`]: pure partition of the scheme table against a
//!   profile
//! - [`ApplicationSubmitter`]: mock application portal with an in-memory
//!   status lookup
//! - [`catalog`]: JSON catalog loading with a built-in default table

pub mod application;
pub mod catalog;
pub mod eligibility;

pub use application::ApplicationSubmitter;
pub use catalog::{default_catalog, load_catalog, load_catalog_or_default};
pub use eligibility::EligibilityEngine;

use thiserror::Error;

/// Tool-level failures. The dialogue controller catches these at the
/// execute stage and converts them into conversational text; they never
/// escape `process_turn`.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("unknown scheme id: {0}")]
    UnknownScheme(String),

    #[error("already applied to scheme: {0}")]
    AlreadyApplied(String),

    #[error("no scheme selected for application")]
    NoSchemeSelected,

    #[error("failed to read scheme catalog {path}: {source}")]
    CatalogIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scheme catalog {path}: {source}")]
    CatalogParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
