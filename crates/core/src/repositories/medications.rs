//! Medication catalog repository. Same shape as the patient repository but
//! with a single uniqueness dimension (name) and name-only sorting.

use crate::models::Medication;
use crate::repositories::{normalize_term, page_bounds};
use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

const COLUMNS: &str = "id, name, dosage, form, manufacturer, created_at, updated_at";

const SEARCH_FILTER: &str = "(?1 = '' OR LOWER(name) LIKE '%' || ?1 || '%')";

fn map_medication(row: SqliteRow) -> Result<Medication, sqlx::Error> {
    Ok(Medication {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        dosage: row.try_get("dosage")?,
        form: row.try_get("form")?,
        manufacturer: row.try_get("manufacturer")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Only name sorting is meaningful for the catalog; anything else falls back
/// to name ascending.
fn order_clause(sort_order: Option<&str>) -> &'static str {
    match sort_order.unwrap_or_default() {
        "name_desc" => "name COLLATE NOCASE DESC",
        _ => "name COLLATE NOCASE ASC",
    }
}

#[derive(Clone, Debug)]
pub struct MedicationRepository {
    pool: SqlitePool,
}

impl MedicationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_all(&self) -> Result<Vec<Medication>, sqlx::Error> {
        sqlx::query(&format!(
            "SELECT {COLUMNS} FROM medications ORDER BY name COLLATE NOCASE ASC"
        ))
        .try_map(map_medication)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn search(&self, search_term: &str) -> Result<Vec<Medication>, sqlx::Error> {
        let term = normalize_term(Some(search_term));
        sqlx::query(&format!(
            "SELECT {COLUMNS} FROM medications WHERE {SEARCH_FILTER} \
             ORDER BY name COLLATE NOCASE ASC"
        ))
        .bind(term)
        .try_map(map_medication)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Medication>, sqlx::Error> {
        sqlx::query(&format!("SELECT {COLUMNS} FROM medications WHERE id = ?1"))
            .bind(id)
            .try_map(map_medication)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn exists(&self, id: i64) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM medications WHERE id = ?1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn add(&self, mut medication: Medication) -> Result<Medication, sqlx::Error> {
        let now = Utc::now();
        medication.created_at = now;
        medication.updated_at = now;

        let result = sqlx::query(
            "INSERT INTO medications (name, dosage, form, manufacturer, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&medication.name)
        .bind(&medication.dosage)
        .bind(&medication.form)
        .bind(&medication.manufacturer)
        .bind(medication.created_at)
        .bind(medication.updated_at)
        .execute(&self.pool)
        .await?;

        medication.id = result.last_insert_rowid();
        Ok(medication)
    }

    pub async fn update(&self, medication: &Medication) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE medications SET name = ?1, dosage = ?2, form = ?3, manufacturer = ?4, \
             updated_at = ?5 WHERE id = ?6",
        )
        .bind(&medication.name)
        .bind(&medication.dosage)
        .bind(&medication.form)
        .bind(&medication.manufacturer)
        .bind(Utc::now())
        .bind(medication.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM medications WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

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
            "SELECT NOT EXISTS(SELECT 1 FROM medications \
             WHERE LOWER(TRIM(name)) = ?1 AND (?2 IS NULL OR id <> ?2))",
        )
        .bind(normalized)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn get_paged(
        &self,
        page_number: i64,
        page_size: i64,
        search_term: Option<&str>,
        sort_order: Option<&str>,
    ) -> Result<Vec<Medication>, sqlx::Error> {
        let term = normalize_term(search_term);
        let (limit, offset) = page_bounds(page_number, page_size);
        let order = order_clause(sort_order);

        sqlx::query(&format!(
            "SELECT {COLUMNS} FROM medications WHERE {SEARCH_FILTER} \
             ORDER BY {order} LIMIT ?2 OFFSET ?3"
        ))
        .bind(term)
        .bind(limit)
        .bind(offset)
        .try_map(map_medication)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get_count(&self, search_term: Option<&str>) -> Result<i64, sqlx::Error> {
        let term = normalize_term(search_term);
        sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM medications WHERE {SEARCH_FILTER}"
        ))
        .bind(term)
        .fetch_one(&self.pool)
        .await
    }
}
