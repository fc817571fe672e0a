//! SQLite-Implementierung des RaumRepository
//!
//! Zeitstempel werden als RFC3339-Strings gespeichert; die Gueltigkeits-
//! Pruefung (aktiv + unabgelaufen) laeuft in SQL, damit `finden_aktiv`
//! genau die Beitritts-Frage beantwortet.

use chrono::{DateTime, Duration, Utc};
use luftpost_core::RaumId;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::models::RaumRecord;
use crate::repository::RaumRepository;
use crate::sqlite::pool::SqliteDb;

impl RaumRepository for SqliteDb {
    async fn erstellen(&self, lebensdauer: Duration) -> DbResult<RaumRecord> {
        let id = RaumId::new();
        let now = Utc::now();
        let expires_at = now + lebensdauer;

        sqlx::query(
            "INSERT INTO raeume (id, created_at, expires_at, is_active)
             VALUES (?, ?, ?, 1)",
        )
        .bind(id.inner().to_string())
        .bind(now.to_rfc3339())
        .bind(expires_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        tracing::debug!(raum = %id, expires_at = %expires_at, "Raum angelegt");

        Ok(RaumRecord {
            id,
            created_at: now,
            expires_at,
            is_active: true,
        })
    }

    async fn finden_aktiv(&self, id: RaumId) -> DbResult<Option<RaumRecord>> {
        let row = sqlx::query(
            "SELECT id, created_at, expires_at, is_active
             FROM raeume
             WHERE id = ? AND is_active = 1 AND expires_at > ?",
        )
        .bind(id.inner().to_string())
        .bind(Utc::now().to_rfc3339())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_raum(&r)).transpose()
    }

    async fn deaktivieren(&self, id: RaumId) -> DbResult<bool> {
        let result = sqlx::query("UPDATE raeume SET is_active = 0 WHERE id = ?")
            .bind(id.inner().to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Konvertiert eine Datenbankzeile in einen RaumRecord
fn row_to_raum(row: &SqliteRow) -> DbResult<RaumRecord> {
    let id_str: String = row.try_get("id")?;
    let id = Uuid::parse_str(&id_str)
        .map_err(|e| DbError::ungueltige_daten(format!("Raum-ID '{}': {}", id_str, e)))?;

    let created_at: String = row.try_get("created_at")?;
    let expires_at: String = row.try_get("expires_at")?;
    let is_active: i64 = row.try_get("is_active")?;

    Ok(RaumRecord {
        id: RaumId(id),
        created_at: parse_zeitstempel(&created_at)?,
        expires_at: parse_zeitstempel(&expires_at)?,
        is_active: is_active != 0,
    })
}

fn parse_zeitstempel(s: &str) -> DbResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::ungueltige_daten(format!("Zeitstempel '{}': {}", s, e)))
}
