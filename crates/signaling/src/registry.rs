//! Raum-Registry – In-Memory Zustand aller belegten Raeume
//!
//! Einzige Quelle der Wahrheit dafuer, wer gerade in welchem Raum ist.
//! Pro Raum: hoechstens ein Sender, beliebig viele Empfaenger.
//!
//! ## Invarianten
//! - Eine Sitzung existiert genau dann in der Registry, wenn sie einen
//!   Sender oder mindestens einen Empfaenger hat (leere Sitzungen werden
//!   sofort geloescht).
//! - Die Empfaenger-Menge enthaelt nie die Verbindungs-ID des Senders.
//!
//! Thread-safe via Arc + DashMap; jede mutierende Operation fasst genau
//! einen Raum-Eintrag an, unabhaengige Raeume blockieren sich nicht.

use dashmap::DashMap;
use luftpost_core::{RaumId, Rolle, VerbindungsId};
use std::collections::HashSet;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// RaumSitzung
// ---------------------------------------------------------------------------

/// In-Memory Belegung eines Raums
#[derive(Debug, Default)]
pub struct RaumSitzung {
    /// Verbindungs-ID des Senders (hoechstens einer)
    sender: Option<VerbindungsId>,
    /// Verbindungs-IDs aller Empfaenger (eindeutig, ungeordnet)
    empfaenger: HashSet<VerbindungsId>,
}

impl RaumSitzung {
    fn ist_leer(&self) -> bool {
        self.sender.is_none() && self.empfaenger.is_empty()
    }
}

// ---------------------------------------------------------------------------
// RaumRegistry
// ---------------------------------------------------------------------------

/// Prozessweite Registry aller belegten Raeume
///
/// Clone teilt den inneren Zustand.
#[derive(Clone)]
pub struct RaumRegistry {
    inner: Arc<DashMap<RaumId, RaumSitzung>>,
}

impl RaumRegistry {
    /// Erstellt eine neue, leere Registry
    pub fn neu() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
        }
    }

    /// Stellt sicher, dass fuer den Raum eine Sitzung existiert
    pub fn sitzung_sicherstellen(&self, raum: RaumId) {
        self.inner.entry(raum).or_default();
    }

    /// Setzt den Sender des Raums und gibt den verdraengten Vorgaenger zurueck
    ///
    /// Ein bereits registrierter Sender wird stillschweigend ueberschrieben;
    /// der Rueckgabewert dient nur dem Logging. Die Verbindung wird aus der
    /// Empfaenger-Menge entfernt, falls sie dort stand.
    pub fn sender_setzen(&self, raum: RaumId, verbindung: VerbindungsId) -> Option<VerbindungsId> {
        let mut sitzung = self.inner.entry(raum).or_default();
        sitzung.empfaenger.remove(&verbindung);
        let vorgaenger = sitzung.sender.replace(verbindung);
        vorgaenger.filter(|v| *v != verbindung)
    }

    /// Fuegt die Verbindung der Empfaenger-Menge hinzu (idempotent)
    ///
    /// Die Verbindungs-ID des aktuellen Senders wird nie aufgenommen.
    pub fn empfaenger_hinzufuegen(&self, raum: RaumId, verbindung: VerbindungsId) {
        let mut sitzung = self.inner.entry(raum).or_default();
        if sitzung.sender == Some(verbindung) {
            return;
        }
        sitzung.empfaenger.insert(verbindung);
    }

    /// Gibt den aktuellen Sender des Raums zurueck
    pub fn sender(&self, raum: &RaumId) -> Option<VerbindungsId> {
        self.inner.get(raum).and_then(|s| s.sender)
    }

    /// Gibt alle Empfaenger des Raums zurueck (leere Liste wenn unbekannt)
    pub fn empfaenger(&self, raum: &RaumId) -> Vec<VerbindungsId> {
        self.inner
            .get(raum)
            .map(|s| s.empfaenger.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Entfernt die Verbindung entsprechend ihrer Rolle aus der Sitzung
    ///
    /// Als Sender wird nur entfernt, wenn die ID noch uebereinstimmt (ein
    /// verdraengter Sender darf seinen Nachfolger nicht loeschen).
    pub fn verbindung_entfernen(&self, raum: &RaumId, verbindung: VerbindungsId, rolle: Rolle) {
        if let Some(mut sitzung) = self.inner.get_mut(raum) {
            match rolle {
                Rolle::Sender => {
                    if sitzung.sender == Some(verbindung) {
                        sitzung.sender = None;
                    }
                }
                Rolle::Empfaenger => {
                    sitzung.empfaenger.remove(&verbindung);
                }
            }
        }
    }

    /// Prueft ob der Raum keine Teilnehmer mehr hat
    ///
    /// Ein unbekannter Raum gilt als leer.
    pub fn ist_leer(&self, raum: &RaumId) -> bool {
        self.inner.get(raum).map(|s| s.ist_leer()).unwrap_or(true)
    }

    /// Entfernt die Raum-Sitzung vollstaendig
    ///
    /// Loescht nur tatsaechlich leere Sitzungen; ein Beitritt, der der
    /// Leerheits-Pruefung zuvorkommt, bleibt dadurch erhalten. Gibt `true`
    /// zurueck wenn dieser Aufruf die Sitzung entfernt hat – der Reaper
    /// deaktiviert den Raum nur in diesem Fall, damit die Deaktivierung
    /// genau einmal ausgeloest wird.
    pub fn loeschen(&self, raum: &RaumId) -> bool {
        self.inner
            .remove_if(raum, |_, sitzung| sitzung.ist_leer())
            .is_some()
    }

    /// Prueft ob der Raum eine Sitzung in der Registry hat
    pub fn enthaelt(&self, raum: &RaumId) -> bool {
        self.inner.contains_key(raum)
    }
}

impl Default for RaumRegistry {
    fn default() -> Self {
        Self::neu()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hoechstens_ein_sender() {
        let registry = RaumRegistry::neu();
        let raum = RaumId::new();
        let a = VerbindungsId::new();
        let b = VerbindungsId::new();

        assert_eq!(registry.sender_setzen(raum, a), None);
        // Zweiter Sender verdraengt den ersten stillschweigend
        assert_eq!(registry.sender_setzen(raum, b), Some(a));
        assert_eq!(registry.sender(&raum), Some(b));
    }

    #[test]
    fn sender_setzen_mit_gleicher_id_meldet_keine_verdraengung() {
        let registry = RaumRegistry::neu();
        let raum = RaumId::new();
        let a = VerbindungsId::new();

        registry.sender_setzen(raum, a);
        assert_eq!(registry.sender_setzen(raum, a), None);
    }

    #[test]
    fn empfaenger_menge_ohne_duplikate() {
        let registry = RaumRegistry::neu();
        let raum = RaumId::new();
        let e = VerbindungsId::new();

        registry.empfaenger_hinzufuegen(raum, e);
        registry.empfaenger_hinzufuegen(raum, e);
        assert_eq!(registry.empfaenger(&raum).len(), 1);
    }

    #[test]
    fn empfaenger_menge_enthaelt_nie_den_sender() {
        let registry = RaumRegistry::neu();
        let raum = RaumId::new();
        let s = VerbindungsId::new();

        registry.sender_setzen(raum, s);
        registry.empfaenger_hinzufuegen(raum, s);
        assert!(registry.empfaenger(&raum).is_empty());

        // Umgekehrt: wird ein Empfaenger zum Sender, verschwindet er aus der Menge
        let e = VerbindungsId::new();
        registry.empfaenger_hinzufuegen(raum, e);
        registry.sender_setzen(raum, e);
        assert!(registry.empfaenger(&raum).is_empty());
        assert_eq!(registry.sender(&raum), Some(e));
    }

    #[test]
    fn verdraengter_sender_loescht_nachfolger_nicht() {
        let registry = RaumRegistry::neu();
        let raum = RaumId::new();
        let alt = VerbindungsId::new();
        let neu = VerbindungsId::new();

        registry.sender_setzen(raum, alt);
        registry.sender_setzen(raum, neu);

        // Disconnect des verdraengten Senders
        registry.verbindung_entfernen(&raum, alt, Rolle::Sender);
        assert_eq!(registry.sender(&raum), Some(neu));
    }

    #[test]
    fn leerer_raum_wird_geloescht() {
        let registry = RaumRegistry::neu();
        let raum = RaumId::new();
        let s = VerbindungsId::new();
        let e = VerbindungsId::new();

        registry.sender_setzen(raum, s);
        registry.empfaenger_hinzufuegen(raum, e);

        registry.verbindung_entfernen(&raum, s, Rolle::Sender);
        assert!(!registry.ist_leer(&raum), "Empfaenger ist noch da");

        registry.verbindung_entfernen(&raum, e, Rolle::Empfaenger);
        assert!(registry.ist_leer(&raum));

        assert!(registry.loeschen(&raum));
        assert!(!registry.enthaelt(&raum));
        // Zweiter Aufruf findet nichts mehr
        assert!(!registry.loeschen(&raum));
    }

    #[test]
    fn loeschen_verschont_nicht_leere_sitzung() {
        let registry = RaumRegistry::neu();
        let raum = RaumId::new();

        registry.sender_setzen(raum, VerbindungsId::new());
        assert!(!registry.loeschen(&raum));
        assert!(registry.enthaelt(&raum), "Belegte Sitzung darf nicht geloescht werden");
    }

    #[test]
    fn unbekannter_raum_gilt_als_leer() {
        let registry = RaumRegistry::neu();
        let raum = RaumId::new();

        assert!(registry.ist_leer(&raum));
        assert_eq!(registry.sender(&raum), None);
        assert!(registry.empfaenger(&raum).is_empty());
    }
}
