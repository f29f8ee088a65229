use anyhow::{Context, Result};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use super::NoticeFilters;
use crate::models::Notice;

const LIST_COLUMNS: &str = "idweb, id, objet, nomacheteur, dateparution, \
    datelimitereponse, datefindiffusion, famille, \
    code_departement, type_procedure, nature, \
    keywords_used, visite_obligatoire, dce_link, lot_numbers";

/// Read-only access to the `boamp_notices` table
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open a connection pool for the given SQLite URL
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .with_context(|| format!("Failed to open database: {database_url}"))?;

        info!(url = %database_url, "Connected to SQLite");

        Ok(Self { pool })
    }

    /// Fetch notices matching the SQL-expressible filters, newest first
    pub async fn fetch_all(&self, filters: &NoticeFilters) -> Result<Vec<Notice>> {
        let mut query = format!("SELECT {LIST_COLUMNS} FROM boamp_notices WHERE 1=1");
        let mut params: Vec<String> = Vec::new();

        if let Some(keyword) = &filters.keyword {
            query.push_str(" AND (objet LIKE ? OR keywords_used LIKE ?)");
            let term = format!("%{keyword}%");
            params.push(term.clone());
            params.push(term);
        }

        if let Some(department) = &filters.department {
            query.push_str(" AND code_departement LIKE ?");
            params.push(format!("%{department}%"));
        }

        if let Some(nature) = &filters.nature {
            query.push_str(" AND nature LIKE ?");
            params.push(format!("%{nature}%"));
        }

        if let Some(visite) = &filters.visite_obligatoire {
            query.push_str(" AND visite_obligatoire = ?");
            params.push(visite.clone());
        }

        query.push_str(" ORDER BY dateparution DESC");

        let mut q = sqlx::query(&query);
        for param in &params {
            q = q.bind(param);
        }

        let rows = q
            .fetch_all(&self.pool)
            .await
            .context("Failed to query notices")?;

        let notices: Vec<Notice> = rows.iter().map(notice_from_row).collect();

        debug!(count = notices.len(), "Fetched notices");

        Ok(notices)
    }

    /// Fetch a single notice by idweb or id, with the full column set
    pub async fn fetch_by_id(&self, notice_id: &str) -> Result<Option<Notice>> {
        let row = sqlx::query("SELECT * FROM boamp_notices WHERE idweb = ? OR id = ? LIMIT 1")
            .bind(notice_id)
            .bind(notice_id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to query notice")?;

        Ok(row.as_ref().map(notice_from_row))
    }

    /// Distinct department codes for the filter dropdown
    pub async fn distinct_departments(&self, limit: usize) -> Result<Vec<String>> {
        let rows = sqlx::query(
            "SELECT DISTINCT code_departement FROM boamp_notices \
             WHERE code_departement IS NOT NULL AND code_departement != 'None'",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to query departments")?;

        Ok(rows
            .iter()
            .filter_map(|row| text(row, "code_departement"))
            .take(limit)
            .collect())
    }

    /// Distinct procedure natures for the filter dropdown
    pub async fn distinct_natures(&self, limit: usize) -> Result<Vec<String>> {
        let rows =
            sqlx::query("SELECT DISTINCT nature FROM boamp_notices WHERE nature IS NOT NULL")
                .fetch_all(&self.pool)
                .await
                .context("Failed to query natures")?;

        Ok(rows
            .iter()
            .filter_map(|row| text(row, "nature"))
            .take(limit)
            .collect())
    }
}

fn notice_from_row(row: &SqliteRow) -> Notice {
    Notice {
        idweb: text(row, "idweb"),
        id: text(row, "id"),
        objet: text(row, "objet"),
        nomacheteur: text(row, "nomacheteur"),
        dateparution: text(row, "dateparution"),
        datelimitereponse: text(row, "datelimitereponse"),
        datefindiffusion: text(row, "datefindiffusion"),
        famille: text(row, "famille"),
        code_departement: text(row, "code_departement"),
        type_procedure: text(row, "type_procedure"),
        nature: text(row, "nature"),
        keywords_used: text(row, "keywords_used"),
        visite_obligatoire: text(row, "visite_obligatoire"),
        dce_link: text(row, "dce_link"),
        lot_numbers: text(row, "lot_numbers"),
        // Only present in the detail projection
        gestion: text(row, "gestion"),
        donnees: text(row, "donnees"),
    }
}

fn text(row: &SqliteRow, column: &str) -> Option<String> {
    row.try_get::<Option<String>, _>(column).ok().flatten()
}
