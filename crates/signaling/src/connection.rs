//! Client-Connection – Verwaltet eine einzelne TCP-Verbindung
//!
//! Jede Verbindung bekommt eine `ClientConnection` in einem eigenen
//! tokio-Task (LocalSet). Der Task liest Frames via `FrameCodec`,
//! dispatcht sie und leert parallel die eigene Empfangs-Queue aus dem
//! Verteiler. Nachrichten einer Verbindung werden strikt in Empfangs-
//! reihenfolge verarbeitet: ein Handler laeuft zu Ende, bevor das
//! naechste Frame dispatcht wird.
//!
//! Beim Verbindungsende – gleich ob regulaerer Close, Lesefehler oder
//! Shutdown – laeuft genau einmal das Aufraeumen: Austragen aus dem
//! Verteiler, dann der Trennungs-Handler.

use futures_util::{SinkExt, StreamExt};
use luftpost_core::VerbindungsId;
use luftpost_db::RaumRepository;
use luftpost_protocol::FrameCodec;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_util::codec::Framed;

use crate::dispatcher::{MessageDispatcher, VerbindungsSession};
use crate::handlers::trennung;
use crate::server_state::SignalState;

/// Verarbeitet eine einzelne TCP-Verbindung
pub struct ClientConnection<R>
where
    R: RaumRepository + 'static,
{
    state: Arc<SignalState<R>>,
    peer_addr: SocketAddr,
}

impl<R> ClientConnection<R>
where
    R: RaumRepository + 'static,
{
    /// Erstellt eine neue ClientConnection
    pub fn neu(state: Arc<SignalState<R>>, peer_addr: SocketAddr) -> Self {
        Self { state, peer_addr }
    }

    /// Startet die Verbindungs-Verarbeitungsschleife
    ///
    /// Laeuft bis die Verbindung getrennt wird oder ein Shutdown-Signal
    /// eingeht.
    pub async fn verarbeiten(
        self,
        stream: TcpStream,
        mut shutdown_rx: tokio::sync::watch::Receiver<bool>,
    ) {
        let peer_addr = self.peer_addr;
        let verbindung = VerbindungsId::new();

        tracing::info!(peer = %peer_addr, verbindung = %verbindung, "Neue Verbindung");

        let mut framed = Framed::new(stream, FrameCodec::new());

        // Ab jetzt ist die Verbindung fuer das Relay adressierbar
        let mut empfangs_queue = self.state.verteiler.registrieren(verbindung);

        let mut sitzung = VerbindungsSession::neu(verbindung);
        let dispatcher = MessageDispatcher::neu(Arc::clone(&self.state));

        loop {
            tokio::select! {
                // Eingehende Nachricht vom Client
                frame = framed.next() => {
                    match frame {
                        Some(Ok(nachricht)) => {
                            tracing::trace!(
                                verbindung = %verbindung,
                                event = nachricht.event_name(),
                                "Nachricht empfangen"
                            );
                            if let Err(e) = dispatcher.dispatch(nachricht, &mut sitzung).await {
                                // Fehlerhafte Einzelnachricht: loggen, Verbindung behalten
                                tracing::warn!(
                                    verbindung = %verbindung,
                                    fehler = %e,
                                    "Nachricht verworfen"
                                );
                            }
                        }
                        Some(Err(e)) => {
                            tracing::warn!(peer = %peer_addr, fehler = %e, "Frame-Lesefehler");
                            break;
                        }
                        None => {
                            tracing::info!(peer = %peer_addr, verbindung = %verbindung, "Verbindung vom Client getrennt");
                            break;
                        }
                    }
                }

                // Ausgehende Nachricht aus dem Verteiler
                Some(ausgehend) = empfangs_queue.recv() => {
                    if let Err(e) = framed.send(ausgehend).await {
                        tracing::warn!(peer = %peer_addr, fehler = %e, "Senden fehlgeschlagen");
                        break;
                    }
                }

                // Shutdown-Signal
                Ok(()) = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        tracing::info!(peer = %peer_addr, "Shutdown-Signal – Verbindung wird getrennt");
                        break;
                    }
                }
            }
        }

        // Cleanup beim Verbindungsende: erst die Adressierbarkeit beenden,
        // dann Registry und Raum-Store aufraeumen
        self.state.verteiler.entfernen(&verbindung);
        trennung::handle_disconnect(&sitzung, &self.state).await;

        tracing::info!(peer = %peer_addr, verbindung = %verbindung, "Verbindungs-Task beendet");
    }
}
