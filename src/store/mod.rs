pub mod sqlite;

pub use sqlite::SqliteStore;

use serde::{Deserialize, Serialize};

/// Urgency filter applied after deadline classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Urgent,
    Overdue,
}

/// Optional filters for the notice list.
///
/// keyword, department, nature and visite_obligatoire translate directly to
/// SQL clauses; urgency depends on the computed deadline flags and is applied
/// by the dashboard layer once classification has run.
#[derive(Debug, Clone, Default)]
pub struct NoticeFilters {
    pub keyword: Option<String>,
    pub department: Option<String>,
    pub nature: Option<String>,
    pub visite_obligatoire: Option<String>,
    pub urgency: Option<Urgency>,
}
