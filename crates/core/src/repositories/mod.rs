//! SQLite persistence layer.
//!
//! Repositories own all SQL and all audit timestamps. They return plain
//! `sqlx::Error` values; the service layer wraps those into
//! [`crate::DomainError::Infrastructure`] with a context message.
//!
//! Search is case-insensitive substring matching, paging is 1-based
//! skip/take, and uniqueness queries compare trimmed lower-cased values.

pub mod doctors;
pub mod medications;
pub mod patients;
pub mod prescriptions;

pub use doctors::DoctorRepository;
pub use medications::MedicationRepository;
pub use patients::PatientRepository;
pub use prescriptions::PrescriptionRepository;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;

/// Opens (creating if missing) the SQLite database at `path` with foreign
/// keys enforced.
pub async fn connect(path: &Path) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new().connect_with(options).await
}

/// Creates all tables if they do not exist yet. Safe to run on every start.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS doctors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            specialization TEXT NOT NULL,
            license_number TEXT,
            contact_phone TEXT,
            contact_email TEXT,
            is_subscribed INTEGER NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS patients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            contact_info TEXT NOT NULL,
            date_of_birth TEXT,
            visit_count INTEGER NOT NULL DEFAULT 0,
            last_visit_date TEXT,
            has_outstanding_balance INTEGER NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS medications (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            dosage TEXT,
            form TEXT,
            manufacturer TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS prescriptions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            patient_id INTEGER NOT NULL,
            doctor_id INTEGER NOT NULL,
            date_issued TEXT NOT NULL,
            expiry_date TEXT,
            next_appointment_date TEXT,
            status TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (patient_id) REFERENCES patients(id),
            FOREIGN KEY (doctor_id) REFERENCES doctors(id)
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS prescription_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            prescription_id INTEGER NOT NULL,
            medication_id INTEGER NOT NULL,
            dosage TEXT,
            frequency TEXT,
            duration TEXT,
            quantity TEXT NOT NULL,
            instructions TEXT NOT NULL,
            refills INTEGER,
            notes TEXT,
            FOREIGN KEY (prescription_id) REFERENCES prescriptions(id),
            FOREIGN KEY (medication_id) REFERENCES medications(id)
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Normalises a search term for LIKE matching: trimmed and lower-cased.
/// `None` or whitespace-only input becomes the empty string, which the
/// queries treat as "no filter".
pub(crate) fn normalize_term(term: Option<&str>) -> String {
    term.map(|t| t.trim().to_lowercase()).unwrap_or_default()
}

/// Converts a 1-based page request into LIMIT/OFFSET values. Page numbers
/// and sizes below 1 are clamped rather than rejected.
pub(crate) fn page_bounds(page_number: i64, page_size: i64) -> (i64, i64) {
    let page = page_number.max(1);
    let size = page_size.max(1);
    (size, (page - 1) * size)
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    // In-memory SQLite gives each connection its own database, so tests pin
    // the pool to a single connection.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");

    init_schema(&pool).await.expect("failed to create schema");
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_bounds_clamp_to_one() {
        assert_eq!(page_bounds(0, 10), (10, 0));
        assert_eq!(page_bounds(-3, 0), (1, 0));
        assert_eq!(page_bounds(3, 10), (10, 20));
    }

    #[test]
    fn normalize_term_trims_and_lowercases() {
        assert_eq!(normalize_term(Some("  Kulthum ")), "kulthum");
        assert_eq!(normalize_term(Some("   ")), "");
        assert_eq!(normalize_term(None), "");
    }

    #[tokio::test]
    async fn init_schema_is_idempotent() {
        let pool = test_pool().await;
        init_schema(&pool).await.unwrap();
    }
}
