//! Datenbankmodelle fuer Luftpost
//!
//! Reine Datenuebertragungsobjekte zwischen Datenbank und Anwendungslogik.

use chrono::{DateTime, Utc};
use luftpost_core::RaumId;
use serde::{Deserialize, Serialize};

/// Raum-Datensatz aus der Datenbank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaumRecord {
    pub id: RaumId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
}

impl RaumRecord {
    /// Prueft ob der Raum zum gegebenen Zeitpunkt beitretbar ist
    pub fn ist_gueltig(&self, jetzt: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at > jetzt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn abgelaufener_raum_ist_ungueltig() {
        let jetzt = Utc::now();
        let raum = RaumRecord {
            id: RaumId::new(),
            created_at: jetzt - Duration::hours(25),
            expires_at: jetzt - Duration::hours(1),
            is_active: true,
        };
        assert!(!raum.ist_gueltig(jetzt));
    }

    #[test]
    fn deaktivierter_raum_ist_ungueltig() {
        let jetzt = Utc::now();
        let raum = RaumRecord {
            id: RaumId::new(),
            created_at: jetzt,
            expires_at: jetzt + Duration::hours(24),
            is_active: false,
        };
        assert!(!raum.ist_gueltig(jetzt));
    }
}
