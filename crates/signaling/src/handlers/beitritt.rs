//! Beitritts-Handler – join-room
//!
//! Bindet eine Verbindung an Raum und Rolle. Ablauf:
//! 1. Raum-Store befragen; kein aktiver, unabgelaufener Raum -> `error`
//!    nur an den Anfragenden, keine Registry-Mutation.
//! 2. Verbindungs-Session auf (Raum, Rolle) setzen.
//! 3. Registry-Sitzung sicherstellen und rollenabhaengig mutieren.
//! 4. `room-joined` nur an den Anfragenden; bei Empfaenger-Beitritt
//!    zusaetzlich `receiver-joined` nur an den registrierten Sender.
//!
//! Kein anderer Teilnehmer wird ueber einen Beitritt informiert. Ein
//! zweiter Sender-Beitritt verdraengt den ersten stillschweigend (Draht-
//! kompatibel zum Client-Protokoll); der Vorgaenger erfaehrt davon nichts.

use luftpost_core::{RaumId, Rolle};
use luftpost_db::RaumRepository;
use luftpost_protocol::{JoinRoomDaten, SignalNachricht};
use std::sync::Arc;

use crate::dispatcher::VerbindungsSession;
use crate::handlers::trennung;
use crate::server_state::SignalState;

/// Einheitlicher Ablehnungsgrund fuer alle Beitritts-Fehlschlaege
///
/// Auch ein nicht erreichbarer Raum-Store wird so gemeldet; der Client
/// kann und soll die Faelle nicht unterscheiden.
const BEITRITT_ABGELEHNT: &str = "Raum nicht gefunden oder abgelaufen";

/// Verarbeitet eine join-room-Anfrage
pub async fn handle_join_room<R>(
    daten: JoinRoomDaten,
    sitzung: &mut VerbindungsSession,
    state: &Arc<SignalState<R>>,
) where
    R: RaumRepository + 'static,
{
    let verbindung = sitzung.verbindung;

    // Raum-ID parsen; eine unlesbare ID ist gleichbedeutend mit einem
    // unbekannten Raum
    let raum: RaumId = match daten.room_id.parse() {
        Ok(id) => id,
        Err(_) => {
            tracing::debug!(verbindung = %verbindung, room_id = %daten.room_id, "Beitritt mit unlesbarer Raum-ID");
            state
                .verteiler
                .an_verbindung_senden(&verbindung, SignalNachricht::fehler(BEITRITT_ABGELEHNT));
            return;
        }
    };

    // Raum-Store befragen (aktiv + unabgelaufen)
    match state.raeume.finden_aktiv(raum).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            tracing::debug!(verbindung = %verbindung, raum = %raum, "Beitritt abgelehnt: Raum ungueltig");
            state
                .verteiler
                .an_verbindung_senden(&verbindung, SignalNachricht::fehler(BEITRITT_ABGELEHNT));
            return;
        }
        Err(e) => {
            tracing::warn!(verbindung = %verbindung, raum = %raum, fehler = %e, "Raum-Store nicht erreichbar – Beitritt abgelehnt");
            state
                .verteiler
                .an_verbindung_senden(&verbindung, SignalNachricht::fehler(BEITRITT_ABGELEHNT));
            return;
        }
    }

    // Wechselt die Verbindung den Raum, wird sie vorher sauber aus der
    // alten Sitzung geloest
    if let (Some(alter_raum), Some(alte_rolle)) = (sitzung.raum, sitzung.rolle) {
        if alter_raum != raum {
            tracing::debug!(verbindung = %verbindung, von = %alter_raum, zu = %raum, "Raum-Wechsel");
            trennung::aus_raum_entfernen(state, alter_raum, verbindung, alte_rolle).await;
        }
    }

    // Verbindung an (Raum, Rolle) binden
    sitzung.raum = Some(raum);
    sitzung.rolle = Some(daten.role);

    state.registry.sitzung_sicherstellen(raum);

    match daten.role {
        Rolle::Sender => {
            if let Some(verdraengt) = state.registry.sender_setzen(raum, verbindung) {
                tracing::warn!(
                    raum = %raum,
                    verdraengt = %verdraengt,
                    neuer_sender = %verbindung,
                    "Sender verdraengt – Vorgaenger wird nicht benachrichtigt"
                );
            }
            tracing::info!(raum = %raum, verbindung = %verbindung, "Sender beigetreten");
            state
                .verteiler
                .an_verbindung_senden(&verbindung, SignalNachricht::raum_beigetreten(Rolle::Sender));
        }
        Rolle::Empfaenger => {
            state.registry.empfaenger_hinzufuegen(raum, verbindung);
            tracing::info!(raum = %raum, verbindung = %verbindung, "Empfaenger beigetreten");
            state.verteiler.an_verbindung_senden(
                &verbindung,
                SignalNachricht::raum_beigetreten(Rolle::Empfaenger),
            );

            // Den Sender informieren, sofern einer registriert ist –
            // gezielt, kein Raum-Broadcast
            if let Some(sender) = state.registry.sender(&raum) {
                state
                    .verteiler
                    .an_verbindung_senden(&sender, SignalNachricht::empfaenger_beigetreten(verbindung));
            }
        }
    }
}
