use std::collections::HashSet;

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::deadline;
use crate::fields;
use crate::models::{DeadlineClass, DeadlineInfo, Notice};
use crate::store::{NoticeFilters, SqliteStore, Urgency};

/// A notice joined with its derived deadline record and formatted lists
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedNotice {
    #[serde(flatten)]
    pub notice: Notice,
    #[serde(flatten)]
    pub deadline: DeadlineInfo,
    pub keywords_list: Vec<String>,
    pub lots_list: Vec<String>,
    pub departments_list: Vec<String>,
}

impl EnrichedNotice {
    pub fn build(notice: Notice, today: NaiveDate) -> Self {
        let deadline = deadline::classify(&notice, today);
        let keywords_list = fields::split_keywords(notice.keywords_used.as_deref());
        let lots_list = fields::split_lots(notice.lot_numbers.as_deref());
        let departments_list = fields::split_departments(notice.code_departement.as_deref());

        Self {
            notice,
            deadline,
            keywords_list,
            lots_list,
            departments_list,
        }
    }
}

/// Detail view: an enriched notice plus its decoded JSON columns
#[derive(Debug, Clone, Serialize)]
pub struct NoticeDetail {
    #[serde(flatten)]
    pub notice: EnrichedNotice,
    pub gestion_parsed: Option<serde_json::Value>,
    pub donnees_parsed: Option<serde_json::Value>,
}

/// The reduced projection served by the JSON API
#[derive(Debug, Clone, Serialize)]
pub struct NoticeSummary {
    pub idweb: Option<String>,
    pub objet: Option<String>,
    pub nomacheteur: Option<String>,
    pub dateparution: Option<String>,
    pub deadline_date: Option<NaiveDate>,
    pub deadline_text: String,
    pub deadline_class: DeadlineClass,
    pub keywords: Vec<String>,
    pub lots: Vec<String>,
    pub visite_obligatoire: Option<String>,
    pub dce_link: Option<String>,
    pub is_urgent: bool,
    pub is_overdue: bool,
}

impl From<&EnrichedNotice> for NoticeSummary {
    fn from(enriched: &EnrichedNotice) -> Self {
        Self {
            idweb: enriched.notice.idweb.clone(),
            objet: enriched.notice.objet.clone(),
            nomacheteur: enriched.notice.nomacheteur.clone(),
            dateparution: enriched.notice.dateparution.clone(),
            deadline_date: enriched.deadline.deadline_date,
            deadline_text: enriched.deadline.deadline_text.clone(),
            deadline_class: enriched.deadline.deadline_class,
            keywords: enriched.keywords_list.clone(),
            lots: enriched.lots_list.clone(),
            visite_obligatoire: enriched.notice.visite_obligatoire.clone(),
            dce_link: enriched.notice.dce_link.clone(),
            is_urgent: enriched.deadline.is_urgent,
            is_overdue: enriched.deadline.is_overdue,
        }
    }
}

/// Aggregate counters for the dashboard header
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_notices: usize,
    pub urgent_deadlines: usize,
    pub overdue_deadlines: usize,
    pub with_dce_link: usize,
    pub with_visite_obligatoire: usize,
    pub unique_keywords: usize,
    pub today: String,
}

/// Distinct values available for the dropdown filters
#[derive(Debug, Clone, Serialize)]
pub struct FilterOptions {
    pub departments: Vec<String>,
    pub natures: Vec<String>,
}

/// Compute the dashboard counters over an enriched notice set.
///
/// A dce_link counts only when present and not the literal "none";
/// visite_obligatoire counts on a case-insensitive "yes".
pub fn compute_stats(notices: &[EnrichedNotice], today: NaiveDate) -> DashboardStats {
    let with_dce_link = notices
        .iter()
        .filter(|n| {
            n.notice
                .dce_link
                .as_deref()
                .is_some_and(|link| !link.eq_ignore_ascii_case("none"))
        })
        .count();

    let with_visite_obligatoire = notices
        .iter()
        .filter(|n| {
            n.notice
                .visite_obligatoire
                .as_deref()
                .is_some_and(|v| v.eq_ignore_ascii_case("yes"))
        })
        .count();

    let keywords: HashSet<&str> = notices
        .iter()
        .flat_map(|n| n.keywords_list.iter().map(String::as_str))
        .collect();

    DashboardStats {
        total_notices: notices.len(),
        urgent_deadlines: notices.iter().filter(|n| n.deadline.is_urgent).count(),
        overdue_deadlines: notices.iter().filter(|n| n.deadline.is_overdue).count(),
        with_dce_link,
        with_visite_obligatoire,
        unique_keywords: keywords.len(),
        today: today.format("%d/%m/%Y").to_string(),
    }
}

/// Read-only facade tying the store to deadline classification.
///
/// `today` is always an explicit parameter so every derived record is
/// deterministic and testable; only the binary reads the clock.
pub struct Dashboard {
    store: SqliteStore,
}

impl Dashboard {
    pub fn new(store: SqliteStore) -> Self {
        Self { store }
    }

    /// List notices with all filters applied. Urgency filtering runs here,
    /// on the computed deadline flags, after classification.
    pub async fn list_notices(
        &self,
        filters: &NoticeFilters,
        today: NaiveDate,
    ) -> Result<Vec<EnrichedNotice>> {
        let rows = self.store.fetch_all(filters).await?;

        let mut notices: Vec<EnrichedNotice> = rows
            .into_iter()
            .map(|notice| EnrichedNotice::build(notice, today))
            .collect();

        if let Some(urgency) = filters.urgency {
            notices.retain(|n| match urgency {
                Urgency::Urgent => n.deadline.is_urgent,
                Urgency::Overdue => n.deadline.is_overdue,
            });
        }

        info!(count = notices.len(), "Listed notices");

        Ok(notices)
    }

    /// Load one notice by idweb or id, with its decoded JSON columns
    pub async fn get_notice(
        &self,
        notice_id: &str,
        today: NaiveDate,
    ) -> Result<Option<NoticeDetail>> {
        let Some(notice) = self.store.fetch_by_id(notice_id).await? else {
            return Ok(None);
        };

        let gestion_parsed = fields::parse_json_field(notice.gestion.as_deref());
        let donnees_parsed = fields::parse_json_field(notice.donnees.as_deref());

        Ok(Some(NoticeDetail {
            notice: EnrichedNotice::build(notice, today),
            gestion_parsed,
            donnees_parsed,
        }))
    }

    /// Dashboard counters over the unfiltered notice set
    pub async fn stats(&self, today: NaiveDate) -> Result<DashboardStats> {
        let notices = self
            .list_notices(&NoticeFilters::default(), today)
            .await?;
        Ok(compute_stats(&notices, today))
    }

    /// Distinct department and nature values for the dropdowns
    pub async fn filter_options(&self, limit: usize) -> Result<FilterOptions> {
        Ok(FilterOptions {
            departments: self.store.distinct_departments(limit).await?,
            natures: self.store.distinct_natures(limit).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DeadlineField;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn notice(idweb: &str) -> Notice {
        Notice {
            idweb: Some(idweb.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_enrich_populates_lists_and_deadline() {
        let today = day(2024, 1, 10);
        let raw = Notice {
            datelimitereponse: Some("2024-01-17T00:00:00".to_string()),
            keywords_used: Some("toiture;zinc".to_string()),
            lot_numbers: Some("1,2".to_string()),
            code_departement: Some("[\"75\",\"92\"]".to_string()),
            ..notice("A1")
        };

        let enriched = EnrichedNotice::build(raw, today);
        assert_eq!(enriched.deadline.days_remaining, Some(7));
        assert_eq!(
            enriched.deadline.deadline_field,
            Some(DeadlineField::DateLimiteReponse)
        );
        assert_eq!(enriched.keywords_list, vec!["toiture", "zinc"]);
        assert_eq!(enriched.lots_list, vec!["1", "2"]);
        assert_eq!(enriched.departments_list, vec!["75", "92"]);
    }

    #[test]
    fn test_summary_projection() {
        let today = day(2024, 1, 10);
        let raw = Notice {
            objet: Some("Refection toiture".to_string()),
            datelimitereponse: Some("2024-01-01".to_string()),
            keywords_used: Some("toiture".to_string()),
            ..notice("A1")
        };

        let summary = NoticeSummary::from(&EnrichedNotice::build(raw, today));
        assert_eq!(summary.idweb.as_deref(), Some("A1"));
        assert_eq!(summary.deadline_text, "-9j");
        assert_eq!(summary.deadline_class, DeadlineClass::Overdue);
        assert!(summary.is_overdue);
        assert_eq!(summary.keywords, vec!["toiture"]);
    }

    #[test]
    fn test_compute_stats() {
        let today = day(2024, 1, 10);
        let notices: Vec<EnrichedNotice> = [
            Notice {
                datelimitereponse: Some("2024-01-12".to_string()),
                keywords_used: Some("toiture;zinc".to_string()),
                dce_link: Some("https://example.org/dce".to_string()),
                visite_obligatoire: Some("Yes".to_string()),
                ..notice("A1")
            },
            Notice {
                datelimitereponse: Some("2024-01-01".to_string()),
                keywords_used: Some("toiture".to_string()),
                dce_link: Some("None".to_string()),
                ..notice("A2")
            },
            notice("A3"),
        ]
        .into_iter()
        .map(|n| EnrichedNotice::build(n, today))
        .collect();

        let stats = compute_stats(&notices, today);
        assert_eq!(stats.total_notices, 3);
        assert_eq!(stats.urgent_deadlines, 1);
        assert_eq!(stats.overdue_deadlines, 1);
        assert_eq!(stats.with_dce_link, 1);
        assert_eq!(stats.with_visite_obligatoire, 1);
        assert_eq!(stats.unique_keywords, 2);
        assert_eq!(stats.today, "10/01/2024");
    }

    #[test]
    fn test_empty_stats() {
        let stats = compute_stats(&[], day(2024, 1, 10));
        assert_eq!(stats.total_notices, 0);
        assert_eq!(stats.unique_keywords, 0);
    }

    #[tokio::test]
    async fn test_urgency_filter_uses_computed_flags() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());

        let pool = sqlx::SqlitePool::connect(&url).await.unwrap();
        sqlx::query(
            "CREATE TABLE boamp_notices (
                idweb TEXT, id TEXT, objet TEXT, nomacheteur TEXT,
                dateparution TEXT, datelimitereponse TEXT, datefindiffusion TEXT,
                famille TEXT, code_departement TEXT, type_procedure TEXT,
                nature TEXT, keywords_used TEXT, visite_obligatoire TEXT,
                dce_link TEXT, lot_numbers TEXT, gestion TEXT, donnees TEXT
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        for (idweb, deadline) in [("OLD", "2024-01-01"), ("SOON", "2024-01-12"), ("FAR", "2024-06-01")] {
            sqlx::query("INSERT INTO boamp_notices (idweb, datelimitereponse) VALUES (?, ?)")
                .bind(idweb)
                .bind(deadline)
                .execute(&pool)
                .await
                .unwrap();
        }
        pool.close().await;

        let store = SqliteStore::connect(&url).await.unwrap();
        let dashboard = Dashboard::new(store);
        let today = day(2024, 1, 10);

        let overdue = dashboard
            .list_notices(
                &NoticeFilters {
                    urgency: Some(Urgency::Overdue),
                    ..Default::default()
                },
                today,
            )
            .await
            .unwrap();
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].notice.idweb.as_deref(), Some("OLD"));

        let urgent = dashboard
            .list_notices(
                &NoticeFilters {
                    urgency: Some(Urgency::Urgent),
                    ..Default::default()
                },
                today,
            )
            .await
            .unwrap();
        assert_eq!(urgent.len(), 1);
        assert_eq!(urgent[0].notice.idweb.as_deref(), Some("SOON"));

        let stats = dashboard.stats(today).await.unwrap();
        assert_eq!(stats.total_notices, 3);
        assert_eq!(stats.urgent_deadlines, 1);
        assert_eq!(stats.overdue_deadlines, 1);
    }
}
