//! Prescription repository.
//!
//! List queries join the patient so callers can display and search by
//! patient name; the detail query additionally loads the doctor name and
//! the line items with their medication names. Prescriptions are never
//! deleted; the only mutation after insert is a status change.

use crate::models::{Prescription, PrescriptionItem, PrescriptionStatus};
use crate::repositories::{normalize_term, page_bounds};
use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use std::str::FromStr;

const LIST_COLUMNS: &str = "p.id, p.patient_id, p.doctor_id, p.date_issued, p.expiry_date, \
     p.next_appointment_date, p.status, p.created_at, p.updated_at, pa.name AS patient_name";

const SEARCH_FILTER: &str = "(?1 = '' OR LOWER(pa.name) LIKE '%' || ?1 || '%')";

fn map_status(row: &SqliteRow) -> Result<PrescriptionStatus, sqlx::Error> {
    let text: String = row.try_get("status")?;
    PrescriptionStatus::from_str(&text).map_err(|e| sqlx::Error::ColumnDecode {
        index: "status".into(),
        source: e.into(),
    })
}

fn map_prescription(row: SqliteRow) -> Result<Prescription, sqlx::Error> {
    let status = map_status(&row)?;
    Ok(Prescription {
        id: row.try_get("id")?,
        patient_id: row.try_get("patient_id")?,
        doctor_id: row.try_get("doctor_id")?,
        date_issued: row.try_get("date_issued")?,
        expiry_date: row.try_get("expiry_date")?,
        next_appointment_date: row.try_get("next_appointment_date")?,
        status,
        patient_name: row.try_get("patient_name")?,
        doctor_name: row.try_get("doctor_name").unwrap_or(None),
        items: Vec::new(),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn map_item(row: SqliteRow) -> Result<PrescriptionItem, sqlx::Error> {
    Ok(PrescriptionItem {
        id: row.try_get("id")?,
        prescription_id: row.try_get("prescription_id")?,
        medication_id: row.try_get("medication_id")?,
        dosage: row.try_get("dosage")?,
        frequency: row.try_get("frequency")?,
        duration: row.try_get("duration")?,
        quantity: row.try_get("quantity")?,
        instructions: row.try_get("instructions")?,
        refills: row.try_get("refills")?,
        notes: row.try_get("notes")?,
        medication_name: row.try_get("medication_name")?,
    })
}

/// Sort keys accepted by [`PrescriptionRepository::get_paged`]. The default
/// is newest first.
fn order_clause(sort_order: Option<&str>) -> &'static str {
    match sort_order.unwrap_or_default() {
        "Name" => "pa.name COLLATE NOCASE ASC",
        "name_desc" => "pa.name COLLATE NOCASE DESC",
        "Date" => "p.date_issued ASC",
        "date_desc" => "p.date_issued DESC",
        _ => "p.date_issued DESC",
    }
}

#[derive(Clone, Debug)]
pub struct PrescriptionRepository {
    pool: SqlitePool,
}

impl PrescriptionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_all(&self) -> Result<Vec<Prescription>, sqlx::Error> {
        sqlx::query(&format!(
            "SELECT {LIST_COLUMNS} FROM prescriptions p \
             JOIN patients pa ON pa.id = p.patient_id \
             ORDER BY p.date_issued DESC"
        ))
        .try_map(map_prescription)
        .fetch_all(&self.pool)
        .await
    }

    /// Searches by patient name substring, newest first.
    pub async fn search(&self, search_term: &str) -> Result<Vec<Prescription>, sqlx::Error> {
        let term = normalize_term(Some(search_term));
        sqlx::query(&format!(
            "SELECT {LIST_COLUMNS} FROM prescriptions p \
             JOIN patients pa ON pa.id = p.patient_id \
             WHERE {SEARCH_FILTER} \
             ORDER BY p.date_issued DESC"
        ))
        .bind(term)
        .try_map(map_prescription)
        .fetch_all(&self.pool)
        .await
    }

    /// Loads a prescription with patient/doctor names and its line items.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Prescription>, sqlx::Error> {
        let prescription = sqlx::query(&format!(
            "SELECT {LIST_COLUMNS}, d.name AS doctor_name FROM prescriptions p \
             JOIN patients pa ON pa.id = p.patient_id \
             LEFT JOIN doctors d ON d.id = p.doctor_id \
             WHERE p.id = ?1"
        ))
        .bind(id)
        .try_map(map_prescription)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut prescription) = prescription else {
            return Ok(None);
        };

        prescription.items = sqlx::query(
            "SELECT i.id, i.prescription_id, i.medication_id, i.dosage, i.frequency, \
             i.duration, i.quantity, i.instructions, i.refills, i.notes, \
             m.name AS medication_name \
             FROM prescription_items i \
             LEFT JOIN medications m ON m.id = i.medication_id \
             WHERE i.prescription_id = ?1 \
             ORDER BY i.id ASC",
        )
        .bind(id)
        .try_map(map_item)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(prescription))
    }

    /// Inserts a prescription and its items in one transaction, assigning
    /// ids and audit timestamps.
    pub async fn add(&self, mut prescription: Prescription) -> Result<Prescription, sqlx::Error> {
        let now = Utc::now();
        prescription.created_at = now;
        prescription.updated_at = now;

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO prescriptions (patient_id, doctor_id, date_issued, expiry_date, \
             next_appointment_date, status, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(prescription.patient_id)
        .bind(prescription.doctor_id)
        .bind(prescription.date_issued)
        .bind(prescription.expiry_date)
        .bind(prescription.next_appointment_date)
        .bind(prescription.status.as_str())
        .bind(prescription.created_at)
        .bind(prescription.updated_at)
        .execute(&mut *tx)
        .await?;

        prescription.id = result.last_insert_rowid();

        for item in &mut prescription.items {
            item.prescription_id = prescription.id;

            let result = sqlx::query(
                "INSERT INTO prescription_items (prescription_id, medication_id, dosage, \
                 frequency, duration, quantity, instructions, refills, notes) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )
            .bind(item.prescription_id)
            .bind(item.medication_id)
            .bind(&item.dosage)
            .bind(&item.frequency)
            .bind(&item.duration)
            .bind(&item.quantity)
            .bind(&item.instructions)
            .bind(item.refills)
            .bind(&item.notes)
            .execute(&mut *tx)
            .await?;

            item.id = result.last_insert_rowid();
        }

        tx.commit().await?;
        Ok(prescription)
    }

    /// Sets the status of a prescription, refreshing `updated_at`. Returns
    /// false if no row matched the id.
    pub async fn set_status(
        &self,
        id: i64,
        status: PrescriptionStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE prescriptions SET status = ?1, updated_at = ?2 WHERE id = ?3",
        )
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn get_paged(
        &self,
        page_number: i64,
        page_size: i64,
        search_term: Option<&str>,
        sort_order: Option<&str>,
    ) -> Result<Vec<Prescription>, sqlx::Error> {
        let term = normalize_term(search_term);
        let (limit, offset) = page_bounds(page_number, page_size);
        let order = order_clause(sort_order);

        sqlx::query(&format!(
            "SELECT {LIST_COLUMNS} FROM prescriptions p \
             JOIN patients pa ON pa.id = p.patient_id \
             WHERE {SEARCH_FILTER} \
             ORDER BY {order} LIMIT ?2 OFFSET ?3"
        ))
        .bind(term)
        .bind(limit)
        .bind(offset)
        .try_map(map_prescription)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get_count(&self, search_term: Option<&str>) -> Result<i64, sqlx::Error> {
        let term = normalize_term(search_term);
        sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM prescriptions p \
             JOIN patients pa ON pa.id = p.patient_id \
             WHERE {SEARCH_FILTER}"
        ))
        .bind(term)
        .fetch_one(&self.pool)
        .await
    }
}
