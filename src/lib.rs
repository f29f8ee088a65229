pub mod config;
pub mod dashboard;
pub mod deadline;
pub mod fields;
pub mod models;
pub mod store;

pub use config::Config;
pub use dashboard::{
    compute_stats, Dashboard, DashboardStats, EnrichedNotice, FilterOptions, NoticeDetail,
    NoticeSummary,
};
pub use deadline::classify;
pub use models::*;
pub use store::{NoticeFilters, SqliteStore, Urgency};
