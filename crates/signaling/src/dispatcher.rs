//! Message-Dispatcher – Routet SignalNachrichten an die richtigen Handler
//!
//! Der Dispatcher empfaengt Nachrichten von einer ClientConnection und
//! ruft den passenden Handler auf. Alle ausgehenden Events laufen ueber
//! den EventVerteiler; der Dispatcher selbst gibt keine Antworten zurueck.

use luftpost_core::{RaumId, Rolle, VerbindungsId};
use luftpost_db::RaumRepository;
use luftpost_protocol::SignalNachricht;
use std::sync::Arc;

use crate::error::SignalingResult;
use crate::handlers::{beitritt, relay};
use crate::server_state::SignalState;

/// Verbindungs-lokale Session
///
/// Der explizite Zustand einer Transport-Verbindung: ihre ID sowie, nach
/// erfolgreichem Beitritt, Raum und Rolle. Wird hoechstens einmal pro
/// Beitritt geschrieben und beim Disconnect vom Reaper konsumiert.
#[derive(Debug, Clone)]
pub struct VerbindungsSession {
    /// Stabile ID der Transport-Verbindung
    pub verbindung: VerbindungsId,
    /// Beigetretener Raum (None solange unbeigetreten)
    pub raum: Option<RaumId>,
    /// Rolle im Raum (None solange unbeigetreten)
    pub rolle: Option<Rolle>,
}

impl VerbindungsSession {
    /// Erstellt eine frische, unbeigetretene Session
    pub fn neu(verbindung: VerbindungsId) -> Self {
        Self {
            verbindung,
            raum: None,
            rolle: None,
        }
    }

    /// Prueft ob die Verbindung einem Raum beigetreten ist
    pub fn ist_beigetreten(&self) -> bool {
        self.raum.is_some()
    }
}

/// Zentraler Message-Dispatcher
pub struct MessageDispatcher<R>
where
    R: RaumRepository + 'static,
{
    state: Arc<SignalState<R>>,
}

impl<R> MessageDispatcher<R>
where
    R: RaumRepository + 'static,
{
    /// Erstellt einen neuen Dispatcher
    pub fn neu(state: Arc<SignalState<R>>) -> Self {
        Self { state }
    }

    /// Verarbeitet eine eingehende Nachricht
    ///
    /// Fehler betreffen nur die einzelne Nachricht; die Verbindung bleibt
    /// nutzbar (der Aufrufer loggt und macht weiter).
    pub async fn dispatch(
        &self,
        nachricht: SignalNachricht,
        sitzung: &mut VerbindungsSession,
    ) -> SignalingResult<()> {
        match nachricht {
            SignalNachricht::JoinRoom(daten) => {
                beitritt::handle_join_room(daten, sitzung, &self.state).await;
                Ok(())
            }

            // Relay-Nachrichten: reine synchrone Weiterleitung, keine
            // Raum-Mitgliedschafts-Pruefung
            SignalNachricht::Offer(daten) => {
                relay::handle_offer(daten, sitzung.verbindung, &self.state)
            }
            SignalNachricht::Answer(daten) => {
                relay::handle_answer(daten, sitzung.verbindung, &self.state)
            }
            SignalNachricht::IceCandidate(daten) => {
                relay::handle_ice_candidate(daten, sitzung.verbindung, &self.state)
            }

            // Server -> Client Events die ein Client nie schicken darf
            nachricht @ (SignalNachricht::RoomJoined(_)
            | SignalNachricht::Error(_)
            | SignalNachricht::ReceiverJoined(_)) => {
                tracing::warn!(
                    verbindung = %sitzung.verbindung,
                    event = nachricht.event_name(),
                    "Unerwartetes Server-Event vom Client empfangen – ignoriert"
                );
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
