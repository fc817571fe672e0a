//! Handler fuer die drei Signaling-Operationen
//!
//! - `beitritt`: join-room (Oracle-Pruefung, Registry-Mutation, Events)
//! - `relay`: offer / answer / ice-candidate (Punkt-zu-Punkt-Weiterleitung)
//! - `trennung`: Disconnect-Aufraeumen (Registry, Raum-Deaktivierung)

pub mod beitritt;
pub mod relay;
pub mod trennung;

#[cfg(test)]
pub(crate) mod testhilfe {
    //! In-Memory Raum-Store fuer Handler-Tests

    use chrono::{Duration, Utc};
    use dashmap::DashMap;
    use luftpost_core::RaumId;
    use luftpost_db::{DbError, DbResult, RaumRecord, RaumRepository};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// Raum-Store-Fake: haelt Raeume in einer Map und protokolliert
    /// alle Deaktivierungs-Aufrufe.
    pub struct TestRaumStore {
        raeume: DashMap<RaumId, RaumRecord>,
        pub deaktivierungen: Mutex<Vec<RaumId>>,
        pub oracle_kaputt: AtomicBool,
    }

    impl TestRaumStore {
        pub fn neu() -> Self {
            Self {
                raeume: DashMap::new(),
                deaktivierungen: Mutex::new(Vec::new()),
                oracle_kaputt: AtomicBool::new(false),
            }
        }

        /// Legt einen aktiven, unabgelaufenen Raum an
        pub fn raum_anlegen(&self) -> RaumId {
            let jetzt = Utc::now();
            let id = RaumId::new();
            self.raeume.insert(
                id,
                RaumRecord {
                    id,
                    created_at: jetzt,
                    expires_at: jetzt + Duration::hours(24),
                    is_active: true,
                },
            );
            id
        }

        /// Legt einen bereits abgelaufenen Raum an
        pub fn abgelaufenen_raum_anlegen(&self) -> RaumId {
            let jetzt = Utc::now();
            let id = RaumId::new();
            self.raeume.insert(
                id,
                RaumRecord {
                    id,
                    created_at: jetzt - Duration::hours(25),
                    expires_at: jetzt - Duration::hours(1),
                    is_active: true,
                },
            );
            id
        }

        pub fn deaktivierungs_aufrufe(&self) -> Vec<RaumId> {
            self.deaktivierungen.lock().unwrap().clone()
        }
    }

    impl RaumRepository for TestRaumStore {
        async fn erstellen(&self, lebensdauer: Duration) -> DbResult<RaumRecord> {
            let jetzt = Utc::now();
            let id = RaumId::new();
            let record = RaumRecord {
                id,
                created_at: jetzt,
                expires_at: jetzt + lebensdauer,
                is_active: true,
            };
            self.raeume.insert(id, record.clone());
            Ok(record)
        }

        async fn finden_aktiv(&self, id: RaumId) -> DbResult<Option<RaumRecord>> {
            if self.oracle_kaputt.load(Ordering::SeqCst) {
                return Err(DbError::Intern("Oracle nicht erreichbar".into()));
            }
            Ok(self
                .raeume
                .get(&id)
                .filter(|r| r.ist_gueltig(Utc::now()))
                .map(|r| r.clone()))
        }

        async fn deaktivieren(&self, id: RaumId) -> DbResult<bool> {
            self.deaktivierungen.lock().unwrap().push(id);
            if self.oracle_kaputt.load(Ordering::SeqCst) {
                return Err(DbError::Intern("Oracle nicht erreichbar".into()));
            }
            match self.raeume.get_mut(&id) {
                Some(mut r) => {
                    r.is_active = false;
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }
}
