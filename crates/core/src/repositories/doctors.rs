//! Doctor repository.
//!
//! The application is single-tenant: [`DoctorRepository::get_profile`]
//! resolves "the" doctor as the first stored record, which is the key the
//! profile upsert in the service layer works against.

use crate::models::Doctor;
use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

const COLUMNS: &str = "id, name, specialization, license_number, contact_phone, \
                       contact_email, is_subscribed, is_active, created_at, updated_at";

fn map_doctor(row: SqliteRow) -> Result<Doctor, sqlx::Error> {
    Ok(Doctor {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        specialization: row.try_get("specialization")?,
        license_number: row.try_get("license_number")?,
        contact_phone: row.try_get("contact_phone")?,
        contact_email: row.try_get("contact_email")?,
        is_subscribed: row.try_get("is_subscribed")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[derive(Clone, Debug)]
pub struct DoctorRepository {
    pool: SqlitePool,
}

impl DoctorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Returns the installation's doctor profile: the first stored record.
    pub async fn get_profile(&self) -> Result<Option<Doctor>, sqlx::Error> {
        sqlx::query(&format!(
            "SELECT {COLUMNS} FROM doctors ORDER BY id ASC LIMIT 1"
        ))
        .try_map(map_doctor)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Doctor>, sqlx::Error> {
        sqlx::query(&format!("SELECT {COLUMNS} FROM doctors WHERE id = ?1"))
            .bind(id)
            .try_map(map_doctor)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn add(&self, mut doctor: Doctor) -> Result<Doctor, sqlx::Error> {
        let now = Utc::now();
        doctor.created_at = now;
        doctor.updated_at = now;

        let result = sqlx::query(
            "INSERT INTO doctors (name, specialization, license_number, contact_phone, \
             contact_email, is_subscribed, is_active, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(&doctor.name)
        .bind(&doctor.specialization)
        .bind(&doctor.license_number)
        .bind(&doctor.contact_phone)
        .bind(&doctor.contact_email)
        .bind(doctor.is_subscribed)
        .bind(doctor.is_active)
        .bind(doctor.created_at)
        .bind(doctor.updated_at)
        .execute(&self.pool)
        .await?;

        doctor.id = result.last_insert_rowid();
        Ok(doctor)
    }

    pub async fn update(&self, doctor: &Doctor) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE doctors SET name = ?1, specialization = ?2, license_number = ?3, \
             contact_phone = ?4, contact_email = ?5, is_subscribed = ?6, is_active = ?7, \
             updated_at = ?8 WHERE id = ?9",
        )
        .bind(&doctor.name)
        .bind(&doctor.specialization)
        .bind(&doctor.license_number)
        .bind(&doctor.contact_phone)
        .bind(&doctor.contact_email)
        .bind(doctor.is_subscribed)
        .bind(doctor.is_active)
        .bind(Utc::now())
        .bind(doctor.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
