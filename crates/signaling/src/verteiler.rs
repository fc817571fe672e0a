//! Event-Verteiler – Zustellung an benannte Verbindungen
//!
//! Der Verteiler verwaltet die Send-Queues aller lebenden Verbindungen,
//! indiziert nach Verbindungs-ID. Er ist das Punkt-zu-Punkt-Primitiv, auf
//! das sich das Relay verlaesst: Zustellung an eine existierende Verbindung
//! oder stillschweigendes No-op ("deliver-or-no-op"), nie ein Fehler an den
//! Absender.

use dashmap::DashMap;
use luftpost_core::VerbindungsId;
use luftpost_protocol::SignalNachricht;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Groesse der Send-Queue pro Verbindung
const SEND_QUEUE_GROESSE: usize = 64;

// ---------------------------------------------------------------------------
// VerbindungsSender
// ---------------------------------------------------------------------------

/// Handle auf die Send-Queue einer lebenden Verbindung
#[derive(Clone, Debug)]
struct VerbindungsSender {
    tx: mpsc::Sender<SignalNachricht>,
}

impl VerbindungsSender {
    /// Reiht eine Nachricht nicht-blockierend ein
    ///
    /// Gibt `false` zurueck wenn die Queue voll oder geschlossen ist.
    fn senden(&self, verbindung: &VerbindungsId, nachricht: SignalNachricht) -> bool {
        match self.tx.try_send(nachricht) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(verbindung = %verbindung, "Send-Queue voll – Nachricht verworfen");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(verbindung = %verbindung, "Send-Queue geschlossen (Verbindung getrennt)");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// EventVerteiler
// ---------------------------------------------------------------------------

/// Zentraler Verteiler fuer alle lebenden Verbindungen
///
/// Thread-safe via Arc + DashMap. Clone teilt den inneren Zustand.
#[derive(Clone)]
pub struct EventVerteiler {
    inner: Arc<DashMap<VerbindungsId, VerbindungsSender>>,
}

impl EventVerteiler {
    /// Erstellt einen neuen EventVerteiler
    pub fn neu() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
        }
    }

    /// Registriert eine Verbindung und gibt ihre Empfangs-Queue zurueck
    ///
    /// Die `ClientConnection` liest aus dieser Queue und sendet via TCP.
    /// Registrierung passiert beim Accept, nicht erst beim Raum-Beitritt:
    /// das Relay adressiert jede lebende Verbindung.
    pub fn registrieren(&self, verbindung: VerbindungsId) -> mpsc::Receiver<SignalNachricht> {
        let (tx, rx) = mpsc::channel(SEND_QUEUE_GROESSE);
        self.inner.insert(verbindung, VerbindungsSender { tx });
        tracing::debug!(verbindung = %verbindung, "Verbindung im Verteiler registriert");
        rx
    }

    /// Entfernt eine Verbindung aus dem Verteiler
    pub fn entfernen(&self, verbindung: &VerbindungsId) {
        self.inner.remove(verbindung);
        tracing::debug!(verbindung = %verbindung, "Verbindung aus Verteiler entfernt");
    }

    /// Stellt eine Nachricht an genau eine Verbindung zu
    ///
    /// Gibt `true` zurueck wenn die Verbindung lebt und die Nachricht
    /// eingereiht wurde. Eine unbekannte Verbindungs-ID ist ein No-op.
    pub fn an_verbindung_senden(
        &self,
        verbindung: &VerbindungsId,
        nachricht: SignalNachricht,
    ) -> bool {
        match self.inner.get(verbindung) {
            Some(sender) => sender.senden(verbindung, nachricht),
            None => {
                tracing::debug!(verbindung = %verbindung, "Zustellung an unbekannte Verbindung – verworfen");
                false
            }
        }
    }

    /// Prueft ob eine Verbindung registriert ist
    pub fn ist_registriert(&self, verbindung: &VerbindungsId) -> bool {
        self.inner.contains_key(verbindung)
    }

    /// Gibt die Anzahl der registrierten Verbindungen zurueck
    pub fn anzahl(&self) -> usize {
        self.inner.len()
    }
}

impl Default for EventVerteiler {
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
    use luftpost_core::Rolle;

    fn test_nachricht() -> SignalNachricht {
        SignalNachricht::raum_beigetreten(Rolle::Empfaenger)
    }

    #[tokio::test]
    async fn registrieren_und_zustellen() {
        let verteiler = EventVerteiler::neu();
        let id = VerbindungsId::new();

        let mut rx = verteiler.registrieren(id);
        assert!(verteiler.ist_registriert(&id));

        assert!(verteiler.an_verbindung_senden(&id, test_nachricht()));
        let empfangen = rx.try_recv().expect("Nachricht muss vorhanden sein");
        assert_eq!(empfangen.event_name(), "room-joined");
    }

    #[tokio::test]
    async fn unbekannte_verbindung_ist_no_op() {
        let verteiler = EventVerteiler::neu();
        let fremd = VerbindungsId::new();

        assert!(!verteiler.an_verbindung_senden(&fremd, test_nachricht()));
    }

    #[tokio::test]
    async fn zustellung_nur_an_die_benannte_verbindung() {
        let verteiler = EventVerteiler::neu();
        let a = VerbindungsId::new();
        let b = VerbindungsId::new();

        let mut rx_a = verteiler.registrieren(a);
        let mut rx_b = verteiler.registrieren(b);

        verteiler.an_verbindung_senden(&a, test_nachricht());

        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_err(), "b darf nichts empfangen");
    }

    #[tokio::test]
    async fn entfernte_verbindung_empfaengt_nichts_mehr() {
        let verteiler = EventVerteiler::neu();
        let id = VerbindungsId::new();

        let _rx = verteiler.registrieren(id);
        verteiler.entfernen(&id);

        assert!(!verteiler.ist_registriert(&id));
        assert!(!verteiler.an_verbindung_senden(&id, test_nachricht()));
    }
}
