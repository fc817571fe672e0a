//! Repository-Trait-Definitionen
//!
//! Das Repository-Pattern entkoppelt das Signaling vom konkreten
//! Datenbank-Backend. Das Signaling konsumiert ausschliesslich diesen
//! Trait; Tests koennen ihn mit einem In-Memory-Fake erfuellen.

use chrono::Duration;
use luftpost_core::RaumId;

use crate::error::DbResult;
use crate::models::RaumRecord;

/// Konfiguration fuer die Datenbankverbindung
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Verbindungs-URL (z.B. "sqlite://luftpost.db")
    pub url: String,
    /// Maximale Anzahl gleichzeitiger Verbindungen im Pool
    pub max_verbindungen: u32,
    /// Ob WAL-Modus bei SQLite aktiviert werden soll
    pub sqlite_wal: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://luftpost.db".into(),
            max_verbindungen: 5,
            sqlite_wal: true,
        }
    }
}

/// Repository fuer Raum-Datenzugriffe
///
/// Die Schnittstelle des Raum-Stores aus Sicht des Relays:
/// `finden_aktiv` beantwortet die Beitritts-Frage, `deaktivieren` wird
/// beim letzten Disconnect best-effort aufgerufen. Beide Operationen
/// sind idempotent.
#[allow(async_fn_in_trait)]
pub trait RaumRepository: Send + Sync {
    /// Legt einen neuen Raum mit der gegebenen Lebensdauer an
    async fn erstellen(&self, lebensdauer: Duration) -> DbResult<RaumRecord>;

    /// Laedt einen Raum, sofern er aktiv und unabgelaufen ist
    ///
    /// Gibt `None` zurueck wenn der Raum nicht existiert, deaktiviert
    /// wurde oder seine Ablaufzeit ueberschritten ist.
    async fn finden_aktiv(&self, id: RaumId) -> DbResult<Option<RaumRecord>>;

    /// Markiert einen Raum als inaktiv
    ///
    /// Idempotent. Gibt `false` zurueck wenn kein Raum mit dieser ID
    /// existiert.
    async fn deaktivieren(&self, id: RaumId) -> DbResult<bool>;
}
