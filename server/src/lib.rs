//! luftpost-server – Bibliotheks-Root
//!
//! Deklariert alle Server-Module und verdrahtet Datenbank, HTTP-API und
//! Signaling-Relay zu einem lauffaehigen Server.

pub mod config;
pub mod http;

use std::sync::Arc;

use anyhow::Result;
use chrono::Duration;
use tokio::sync::watch;

use luftpost_db::{DatabaseConfig, SqliteDb};
use luftpost_signaling::{SignalConfig, SignalState, SignalingServer};

use config::ServerConfig;
use http::HttpState;

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet alle Server-Subsysteme und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Datenbankverbindung herstellen und Migrationen ausfuehren
    /// 2. HTTP-API starten (Raum-Verwaltung)
    /// 3. Signaling-TCP-Server starten und bis Ctrl-C laufen lassen
    pub async fn starten(self) -> Result<()> {
        tracing::info!(
            server_name = %self.config.server.name,
            signal = %self.config.signal_bind_adresse(),
            http = %self.config.http_bind_adresse(),
            "Server startet"
        );

        let db_config = DatabaseConfig {
            url: self.config.datenbank.url.clone(),
            max_verbindungen: self.config.datenbank.max_verbindungen,
            sqlite_wal: self.config.datenbank.wal,
        };
        let db = Arc::new(SqliteDb::oeffnen(&db_config).await?);

        let http_state = HttpState {
            db: Arc::clone(&db),
            public_base_url: self.config.server.public_base_url.clone(),
            raum_lebensdauer: Duration::hours(self.config.server.raum_lebensdauer_stunden),
        };
        let http_addr = self.config.http_bind_adresse();
        tokio::spawn(async move {
            if let Err(e) = http::starten(http_state, http_addr).await {
                tracing::error!(fehler = %e, "HTTP-API beendet");
            }
        });

        // Ctrl-C uebersetzt sich in ein Shutdown-Signal fuer alle
        // Verbindungs-Tasks und die Accept-Schleife
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown-Signal empfangen, Server wird beendet");
                let _ = shutdown_tx.send(true);
            }
        });

        let signal_config = SignalConfig {
            max_verbindungen: self.config.server.max_verbindungen,
        };
        let state = SignalState::neu(signal_config, db);
        let signaling = SignalingServer::neu(state, self.config.signal_bind_adresse());

        // Laeuft auf dem Haupt-Task, da der Raum-Store kein Send-Future
        // liefern muss (LocalSet)
        signaling.starten(shutdown_rx).await?;

        Ok(())
    }
}
