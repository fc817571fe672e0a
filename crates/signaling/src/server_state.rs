//! Gemeinsamer Server-Zustand fuer das Signaling-Relay
//!
//! Haelt alle geteilten Bausteine als Arc-Referenzen, die sicher zwischen
//! tokio-Tasks geteilt werden koennen. Generisch ueber das RaumRepository,
//! damit Tests einen In-Memory-Store einsetzen koennen.

use luftpost_db::RaumRepository;
use std::sync::Arc;

use crate::registry::RaumRegistry;
use crate::verteiler::EventVerteiler;

/// Konfiguration fuer das Signaling-Relay
#[derive(Debug, Clone)]
pub struct SignalConfig {
    /// Maximale gleichzeitige Verbindungen
    pub max_verbindungen: u32,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            max_verbindungen: 1024,
        }
    }
}

/// Gemeinsamer Zustand des Signaling-Relays (thread-safe, Arc-geteilt)
pub struct SignalState<R>
where
    R: RaumRepository + 'static,
{
    /// Relay-Konfiguration
    pub config: Arc<SignalConfig>,
    /// Raum-Store (Existenz, Ablauf, Aktiv-Flag)
    pub raeume: Arc<R>,
    /// In-Memory Raum-Belegung
    pub registry: RaumRegistry,
    /// Zustellung an lebende Verbindungen
    pub verteiler: EventVerteiler,
}

impl<R> SignalState<R>
where
    R: RaumRepository + 'static,
{
    /// Erstellt einen neuen SignalState
    pub fn neu(config: SignalConfig, raeume: Arc<R>) -> Arc<Self> {
        Arc::new(Self {
            config: Arc::new(config),
            raeume,
            registry: RaumRegistry::neu(),
            verteiler: EventVerteiler::neu(),
        })
    }
}
