//! Trennungs-Handler – Aufraeumen beim Verbindungsende
//!
//! Laeuft genau einmal pro Verbindung, wenn der Transport sie als beendet
//! meldet (regulaerer Close, Fehler und Timeout sind hier ununterscheidbar).
//! Eine nie beigetretene Verbindung ist ein No-op. Sonst wird die
//! Verbindung aus ihrer Raum-Sitzung entfernt; wird die Sitzung dadurch
//! leer, verschwindet sie aus der Registry und der persistierte Raum wird
//! best-effort deaktiviert. Verbleibende Teilnehmer werden nicht
//! benachrichtigt.

use luftpost_core::{RaumId, Rolle, VerbindungsId};
use luftpost_db::RaumRepository;
use std::sync::Arc;

use crate::dispatcher::VerbindungsSession;
use crate::server_state::SignalState;

/// Verarbeitet das Verbindungsende
pub async fn handle_disconnect<R>(sitzung: &VerbindungsSession, state: &Arc<SignalState<R>>)
where
    R: RaumRepository + 'static,
{
    let (raum, rolle) = match (sitzung.raum, sitzung.rolle) {
        (Some(raum), Some(rolle)) => (raum, rolle),
        _ => {
            tracing::debug!(verbindung = %sitzung.verbindung, "Unbeigetretene Verbindung beendet");
            return;
        }
    };

    aus_raum_entfernen(state, raum, sitzung.verbindung, rolle).await;
}

/// Loest eine Verbindung aus ihrer Raum-Sitzung
///
/// Wird ausser vom Disconnect auch beim Raum-Wechsel einer Verbindung
/// verwendet. Die In-Memory-Loeschung ist autoritativ und wartet nicht
/// auf das Ergebnis der Deaktivierung; ein Fehlschlag wird geloggt, nicht
/// wiederholt (der TTL-Ablauf des Stores faengt ihn auf).
pub(crate) async fn aus_raum_entfernen<R>(
    state: &Arc<SignalState<R>>,
    raum: RaumId,
    verbindung: VerbindungsId,
    rolle: Rolle,
) where
    R: RaumRepository + 'static,
{
    state.registry.verbindung_entfernen(&raum, verbindung, rolle);
    tracing::info!(raum = %raum, verbindung = %verbindung, rolle = %rolle, "Verbindung aus Raum entfernt");

    if state.registry.ist_leer(&raum) && state.registry.loeschen(&raum) {
        tracing::info!(raum = %raum, "Raum leer – Sitzung geloescht");

        match state.raeume.deaktivieren(raum).await {
            Ok(_) => tracing::debug!(raum = %raum, "Raum im Store deaktiviert"),
            Err(e) => {
                tracing::warn!(raum = %raum, fehler = %e, "Raum-Deaktivierung fehlgeschlagen – kein Retry");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::beitritt;
    use crate::handlers::testhilfe::TestRaumStore;
    use crate::server_state::SignalConfig;
    use luftpost_protocol::JoinRoomDaten;
    use std::sync::atomic::Ordering;

    fn aufbau() -> (Arc<SignalState<TestRaumStore>>, Arc<TestRaumStore>) {
        let store = Arc::new(TestRaumStore::neu());
        let state = SignalState::neu(SignalConfig::default(), Arc::clone(&store));
        (state, store)
    }

    async fn beigetretene_sitzung(
        state: &Arc<SignalState<TestRaumStore>>,
        raum: RaumId,
        rolle: Rolle,
    ) -> VerbindungsSession {
        let id = VerbindungsId::new();
        let _rx = state.verteiler.registrieren(id);
        let mut sitzung = VerbindungsSession::neu(id);
        beitritt::handle_join_room(
            JoinRoomDaten {
                room_id: raum.inner().to_string(),
                role: rolle,
            },
            &mut sitzung,
            state,
        )
        .await;
        assert!(sitzung.ist_beigetreten());
        sitzung
    }

    #[tokio::test]
    async fn unbeigetretene_verbindung_ist_no_op() {
        let (state, store) = aufbau();
        let raum = store.raum_anlegen();
        let sitzung = VerbindungsSession::neu(VerbindungsId::new());

        handle_disconnect(&sitzung, &state).await;

        assert!(!state.registry.enthaelt(&raum));
        assert!(store.deaktivierungs_aufrufe().is_empty(), "Kein Oracle-Aufruf");
    }

    #[tokio::test]
    async fn letzter_teilnehmer_loescht_und_deaktiviert_genau_einmal() {
        let (state, store) = aufbau();
        let raum = store.raum_anlegen();

        let sender = beigetretene_sitzung(&state, raum, Rolle::Sender).await;
        let empfaenger = beigetretene_sitzung(&state, raum, Rolle::Empfaenger).await;

        handle_disconnect(&sender, &state).await;
        assert!(state.registry.enthaelt(&raum), "Empfaenger haelt den Raum offen");
        assert!(store.deaktivierungs_aufrufe().is_empty());

        handle_disconnect(&empfaenger, &state).await;
        assert!(!state.registry.enthaelt(&raum));
        assert_eq!(store.deaktivierungs_aufrufe(), vec![raum]);
    }

    #[tokio::test]
    async fn fehlgeschlagene_deaktivierung_blockiert_das_aufraeumen_nicht() {
        let (state, store) = aufbau();
        let raum = store.raum_anlegen();
        let sender = beigetretene_sitzung(&state, raum, Rolle::Sender).await;

        store.oracle_kaputt.store(true, Ordering::SeqCst);
        handle_disconnect(&sender, &state).await;

        // In-Memory-Loeschung ist trotz Oracle-Ausfall passiert
        assert!(!state.registry.enthaelt(&raum));
        assert_eq!(store.deaktivierungs_aufrufe(), vec![raum]);
    }

    #[tokio::test]
    async fn verdraengter_sender_deaktiviert_den_raum_nicht() {
        let (state, store) = aufbau();
        let raum = store.raum_anlegen();

        let erster = beigetretene_sitzung(&state, raum, Rolle::Sender).await;
        let zweiter = beigetretene_sitzung(&state, raum, Rolle::Sender).await;

        // Der verdraengte Sender trennt: der aktive Nachfolger bleibt
        handle_disconnect(&erster, &state).await;
        assert_eq!(state.registry.sender(&raum), Some(zweiter.verbindung));
        assert!(store.deaktivierungs_aufrufe().is_empty());
    }
}
