//! Relay-Handler – offer, answer, ice-candidate
//!
//! Reine Punkt-zu-Punkt-Weiterleitung: der Verhandlungs-Payload bleibt
//! unveraendert, die Absender-ID wird angehaengt, die Zieladresse entfernt.
//! Es findet keine Raum-Mitgliedschafts-Pruefung statt; der Vertrag ist
//! ausdruecklich "deliver-or-no-op" – eine unbekannte Zieladresse erzeugt
//! weder ein Event am Ziel noch einen Fehler an den Absender. Diese
//! Handler suspendieren nie.

use luftpost_core::VerbindungsId;
use luftpost_db::RaumRepository;
use luftpost_protocol::{AnswerDaten, IceCandidateDaten, OfferDaten, SignalNachricht};
use std::sync::Arc;

use crate::error::{SignalingError, SignalingResult};
use crate::server_state::SignalState;

/// Leitet ein SDP-Offer an die Zielverbindung weiter
pub fn handle_offer<R>(
    daten: OfferDaten,
    absender: VerbindungsId,
    state: &Arc<SignalState<R>>,
) -> SignalingResult<()>
where
    R: RaumRepository + 'static,
{
    let ziel = daten
        .target_id
        .ok_or_else(|| SignalingError::protokoll("offer ohne targetId"))?;

    let ausgehend = SignalNachricht::Offer(OfferDaten {
        offer: daten.offer,
        target_id: None,
        sender_id: Some(absender),
    });
    zustellen(state, &ziel, absender, ausgehend);
    Ok(())
}

/// Leitet eine SDP-Answer an die Zielverbindung weiter
pub fn handle_answer<R>(
    daten: AnswerDaten,
    absender: VerbindungsId,
    state: &Arc<SignalState<R>>,
) -> SignalingResult<()>
where
    R: RaumRepository + 'static,
{
    let ziel = daten
        .target_id
        .ok_or_else(|| SignalingError::protokoll("answer ohne targetId"))?;

    let ausgehend = SignalNachricht::Answer(AnswerDaten {
        answer: daten.answer,
        target_id: None,
        sender_id: Some(absender),
    });
    zustellen(state, &ziel, absender, ausgehend);
    Ok(())
}

/// Leitet einen ICE-Kandidaten an die Zielverbindung weiter
pub fn handle_ice_candidate<R>(
    daten: IceCandidateDaten,
    absender: VerbindungsId,
    state: &Arc<SignalState<R>>,
) -> SignalingResult<()>
where
    R: RaumRepository + 'static,
{
    let ziel = daten
        .target_id
        .ok_or_else(|| SignalingError::protokoll("ice-candidate ohne targetId"))?;

    let ausgehend = SignalNachricht::IceCandidate(IceCandidateDaten {
        candidate: daten.candidate,
        target_id: None,
        sender_id: Some(absender),
    });
    zustellen(state, &ziel, absender, ausgehend);
    Ok(())
}

/// Gemeinsame Zustellung mit Trace-Logging
fn zustellen<R>(
    state: &Arc<SignalState<R>>,
    ziel: &VerbindungsId,
    absender: VerbindungsId,
    nachricht: SignalNachricht,
) where
    R: RaumRepository + 'static,
{
    let event = nachricht.event_name();
    if state.verteiler.an_verbindung_senden(ziel, nachricht) {
        tracing::trace!(event, von = %absender, an = %ziel, "Weitergeleitet");
    } else {
        // Zieladresse lebt nicht (mehr): stilles No-op laut Vertrag
        tracing::debug!(event, von = %absender, an = %ziel, "Ziel unbekannt – verworfen");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testhilfe::TestRaumStore;
    use crate::server_state::SignalConfig;
    use serde_json::json;

    fn aufbau() -> Arc<SignalState<TestRaumStore>> {
        SignalState::neu(SignalConfig::default(), Arc::new(TestRaumStore::neu()))
    }

    #[tokio::test]
    async fn answer_traegt_absender_statt_ziel() {
        let state = aufbau();
        let absender = VerbindungsId::new();
        let ziel = VerbindungsId::new();
        let mut rx = state.verteiler.registrieren(ziel);

        let daten = AnswerDaten {
            answer: json!({"type": "answer", "sdp": "v=0"}),
            target_id: Some(ziel),
            sender_id: None,
        };
        handle_answer(daten, absender, &state).unwrap();

        match rx.try_recv().unwrap() {
            SignalNachricht::Answer(d) => {
                assert_eq!(d.sender_id, Some(absender));
                assert!(d.target_id.is_none());
                assert_eq!(d.answer["type"], json!("answer"));
            }
            other => panic!("answer erwartet, war {}", other.event_name()),
        }
    }

    #[tokio::test]
    async fn unbekanntes_ziel_erzeugt_keinerlei_events() {
        let state = aufbau();
        let absender = VerbindungsId::new();
        let mut rx_absender = state.verteiler.registrieren(absender);

        let daten = IceCandidateDaten {
            candidate: json!({"candidate": "candidate:0"}),
            target_id: Some(VerbindungsId::new()),
            sender_id: None,
        };
        handle_ice_candidate(daten, absender, &state).unwrap();

        // Kein Fehler-Event an den Absender, nirgendwo ein Event
        assert!(rx_absender.try_recv().is_err());
    }

    #[tokio::test]
    async fn relay_funktioniert_ohne_raum_beitritt() {
        // Der Handler prueft keine Mitgliedschaft: auch eine unbeigetretene
        // Verbindung kann an eine lebende Verbindung weiterleiten
        let state = aufbau();
        let fremder = VerbindungsId::new();
        let ziel = VerbindungsId::new();
        let mut rx = state.verteiler.registrieren(ziel);

        let daten = OfferDaten {
            offer: json!({"sdp": "v=0"}),
            target_id: Some(ziel),
            sender_id: None,
        };
        handle_offer(daten, fremder, &state).unwrap();

        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn fehlendes_ziel_ist_protokollfehler() {
        let state = aufbau();
        let daten = OfferDaten {
            offer: json!({}),
            target_id: None,
            sender_id: None,
        };
        let err = handle_offer(daten, VerbindungsId::new(), &state).unwrap_err();
        assert!(matches!(err, SignalingError::Protokoll(_)));
    }
}
