//! Patient repository: CRUD, search, paging and the two uniqueness
//! dimensions (name and contact info).

use crate::models::Patient;
use crate::repositories::{normalize_term, page_bounds};
use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

const COLUMNS: &str = "id, name, contact_info, date_of_birth, visit_count, last_visit_date, \
                       has_outstanding_balance, is_active, created_at, updated_at";

const SEARCH_FILTER: &str = "(?1 = '' \
     OR LOWER(name) LIKE '%' || ?1 || '%' \
     OR LOWER(contact_info) LIKE '%' || ?1 || '%')";

fn map_patient(row: SqliteRow) -> Result<Patient, sqlx::Error> {
    Ok(Patient {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        contact_info: row.try_get("contact_info")?,
        date_of_birth: row.try_get("date_of_birth")?,
        visit_count: row.try_get("visit_count")?,
        last_visit_date: row.try_get("last_visit_date")?,
        has_outstanding_balance: row.try_get("has_outstanding_balance")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Sort keys accepted by [`PatientRepository::get_paged`]. Unknown keys fall
/// back to name ascending.
fn order_clause(sort_order: Option<&str>) -> &'static str {
    match sort_order.unwrap_or_default() {
        "name_desc" => "name COLLATE NOCASE DESC",
        "Date" => "date_of_birth ASC",
        "date_desc" => "date_of_birth DESC",
        // Nulls sort last ascending, first descending.
        "VisitDate" => "(last_visit_date IS NULL) ASC, last_visit_date ASC",
        "visitdate_desc" => "(last_visit_date IS NOT NULL) ASC, last_visit_date DESC",
        _ => "name COLLATE NOCASE ASC",
    }
}

#[derive(Clone, Debug)]
pub struct PatientRepository {
    pool: SqlitePool,
}

impl PatientRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_all(&self) -> Result<Vec<Patient>, sqlx::Error> {
        sqlx::query(&format!(
            "SELECT {COLUMNS} FROM patients ORDER BY name COLLATE NOCASE ASC"
        ))
        .try_map(map_patient)
        .fetch_all(&self.pool)
        .await
    }

    /// Case-insensitive substring search over name and contact info.
    pub async fn search(&self, search_term: &str) -> Result<Vec<Patient>, sqlx::Error> {
        let term = normalize_term(Some(search_term));
        sqlx::query(&format!(
            "SELECT {COLUMNS} FROM patients WHERE {SEARCH_FILTER} \
             ORDER BY name COLLATE NOCASE ASC"
        ))
        .bind(term)
        .try_map(map_patient)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Patient>, sqlx::Error> {
        sqlx::query(&format!("SELECT {COLUMNS} FROM patients WHERE id = ?1"))
            .bind(id)
            .try_map(map_patient)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn exists(&self, id: i64) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM patients WHERE id = ?1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
    }

    /// Inserts a new patient, assigning the id and audit timestamps.
    pub async fn add(&self, mut patient: Patient) -> Result<Patient, sqlx::Error> {
        let now = Utc::now();
        patient.created_at = now;
        patient.updated_at = now;

        let result = sqlx::query(
            "INSERT INTO patients (name, contact_info, date_of_birth, visit_count, \
             last_visit_date, has_outstanding_balance, is_active, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(&patient.name)
        .bind(&patient.contact_info)
        .bind(patient.date_of_birth)
        .bind(patient.visit_count)
        .bind(patient.last_visit_date)
        .bind(patient.has_outstanding_balance)
        .bind(patient.is_active)
        .bind(patient.created_at)
        .bind(patient.updated_at)
        .execute(&self.pool)
        .await?;

        patient.id = result.last_insert_rowid();
        Ok(patient)
    }

    /// Updates an existing patient, refreshing `updated_at`. Returns false
    /// if no row matched the id.
    pub async fn update(&self, patient: &Patient) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE patients SET name = ?1, contact_info = ?2, date_of_birth = ?3, \
             visit_count = ?4, last_visit_date = ?5, has_outstanding_balance = ?6, \
             is_active = ?7, updated_at = ?8 WHERE id = ?9",
        )
        .bind(&patient.name)
        .bind(&patient.contact_info)
        .bind(patient.date_of_birth)
        .bind(patient.visit_count)
        .bind(patient.last_visit_date)
        .bind(patient.has_outstanding_balance)
        .bind(patient.is_active)
        .bind(Utc::now())
        .bind(patient.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM patients WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// True if no other patient has this name (trimmed, case-insensitive).
    /// Blank names are considered unique; required-field validation is the
    /// service's job.
    pub async fn is_name_unique(
        &self,
        name: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        let normalized = name.trim().to_lowercase();
        if normalized.is_empty() {
            return Ok(true);
        }

        sqlx::query_scalar(
            "SELECT NOT EXISTS(SELECT 1 FROM patients \
             WHERE LOWER(TRIM(name)) = ?1 AND (?2 IS NULL OR id <> ?2))",
        )
        .bind(normalized)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
    }

    /// True if no other patient has this contact info (trimmed,
    /// case-insensitive).
    pub async fn is_contact_info_unique(
        &self,
        contact_info: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        let normalized = contact_info.trim().to_lowercase();
        if normalized.is_empty() {
            return Ok(true);
        }

        sqlx::query_scalar(
            "SELECT NOT EXISTS(SELECT 1 FROM patients \
             WHERE LOWER(TRIM(contact_info)) = ?1 AND (?2 IS NULL OR id <> ?2))",
        )
        .bind(normalized)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Returns one page of patients (1-based page number).
    pub async fn get_paged(
        &self,
        page_number: i64,
        page_size: i64,
        search_term: Option<&str>,
        sort_order: Option<&str>,
    ) -> Result<Vec<Patient>, sqlx::Error> {
        let term = normalize_term(search_term);
        let (limit, offset) = page_bounds(page_number, page_size);
        let order = order_clause(sort_order);

        sqlx::query(&format!(
            "SELECT {COLUMNS} FROM patients WHERE {SEARCH_FILTER} \
             ORDER BY {order} LIMIT ?2 OFFSET ?3"
        ))
        .bind(term)
        .bind(limit)
        .bind(offset)
        .try_map(map_patient)
        .fetch_all(&self.pool)
        .await
    }

    /// Total number of patients matching the optional search term.
    pub async fn get_count(&self, search_term: Option<&str>) -> Result<i64, sqlx::Error> {
        let term = normalize_term(search_term);
        sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM patients WHERE {SEARCH_FILTER}"
        ))
        .bind(term)
        .fetch_one(&self.pool)
        .await
    }
}
