//! Dashboard-owned terminal sessions backed by tmux.
//!
//! - `naming`: prefix ownership boundary and identifier generation
//! - `multiplexer`: async transport trait plus the tmux CLI implementation
//! - `parse`: list-output parsing and stderr classification
//! - `workdir`: lazy working-directory fallback chain
//! - `registry`: idempotent list / create / kill

mod multiplexer;
mod naming;
mod parse;
mod registry;
mod workdir;

pub use multiplexer::{Multiplexer, TmuxCli};
pub use naming::{generate_identifier, SessionNamespace, GENERATED_IDENTIFIER_LEN};
pub use registry::{CreatedSession, KillOutcome, SessionRegistry};
pub use workdir::WorkingDirResolver;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One live dashboard-owned multiplexer session.
///
/// Serialized with the field names the dashboard UI reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    #[serde(rename = "name")]
    pub full_name: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "created")]
    pub created_at: Option<DateTime<Utc>>,
    pub attached: bool,
}

impl Session {
    /// Session known to exist but missing from the latest listing.
    pub(crate) fn unlisted(namespace: &SessionNamespace, full_name: &str) -> Self {
        Self {
            full_name: full_name.to_string(),
            display_name: namespace.display_name(full_name).to_string(),
            created_at: None,
            attached: false,
        }
    }
}
