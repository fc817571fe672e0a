//! TCP-Server – Nimmt Signaling-Verbindungen an
//!
//! Der Server lauscht auf dem konfigurierten Port und startet pro
//! akzeptierter Verbindung einen eigenen Task. Die Tasks laufen in
//! einem `LocalSet`, damit der Raum-Store kein Send-Future liefern
//! muss.

use luftpost_db::RaumRepository;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::LocalSet;

use crate::connection::ClientConnection;
use crate::error::SignalingResult;
use crate::server_state::SignalState;

/// TCP-Server fuer das Signaling-Protokoll
pub struct SignalingServer<R>
where
    R: RaumRepository + 'static,
{
    state: Arc<SignalState<R>>,
    bind_addr: String,
}

impl<R> SignalingServer<R>
where
    R: RaumRepository + 'static,
{
    /// Erstellt einen neuen SignalingServer
    pub fn neu(state: Arc<SignalState<R>>, bind_addr: String) -> Self {
        Self { state, bind_addr }
    }

    /// Startet den Server und laeuft bis zum Shutdown-Signal
    pub async fn starten(self, shutdown_rx: watch::Receiver<bool>) -> SignalingResult<()> {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        tracing::info!(adresse = %self.bind_addr, "Signaling-Server lauscht");

        let local = LocalSet::new();
        let mut accept_shutdown = shutdown_rx.clone();

        local
            .run_until(async move {
                loop {
                    tokio::select! {
                        eingehend = listener.accept() => {
                            match eingehend {
                                Ok((stream, peer_addr)) => {
                                    if self.state.verteiler.anzahl()
                                        >= self.state.config.max_verbindungen as usize
                                    {
                                        tracing::warn!(
                                            peer = %peer_addr,
                                            limit = self.state.config.max_verbindungen,
                                            "Verbindungslimit erreicht – Verbindung abgewiesen"
                                        );
                                        drop(stream);
                                        continue;
                                    }

                                    let connection = ClientConnection::neu(
                                        Arc::clone(&self.state),
                                        peer_addr,
                                    );
                                    let conn_shutdown = shutdown_rx.clone();
                                    tokio::task::spawn_local(async move {
                                        connection.verarbeiten(stream, conn_shutdown).await;
                                    });
                                }
                                Err(e) => {
                                    tracing::warn!(fehler = %e, "Accept fehlgeschlagen");
                                }
                            }
                        }

                        Ok(()) = accept_shutdown.changed() => {
                            if *accept_shutdown.borrow() {
                                tracing::info!("Shutdown-Signal – Accept-Schleife wird beendet");
                                break;
                            }
                        }
                    }
                }
            })
            .await;

        tracing::info!("Signaling-Server beendet");
        Ok(())
    }
}
