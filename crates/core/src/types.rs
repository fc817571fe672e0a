//! Gemeinsame Identifikationstypen fuer Luftpost
//!
//! Alle IDs verwenden das Newtype-Pattern um Verwechslungen zwischen
//! verschiedenen ID-Arten zur Compilezeit auszuschliessen. Auf dem Draht
//! werden sie als UUID-Strings serialisiert.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Eindeutige Raum-ID
///
/// Identifiziert einen persistierten Transfer-Raum. Wird beim Anlegen
/// im Raum-Store vergeben und ist global eindeutig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RaumId(pub Uuid);

impl RaumId {
    /// Erstellt eine neue zufaellige RaumId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Gibt die innere UUID zurueck
    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for RaumId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RaumId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "raum:{}", self.0)
    }
}

impl std::str::FromStr for RaumId {
    type Err = uuid::Error;

    /// Parst eine RaumId aus ihrer Draht-Darstellung (UUID-String)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Eindeutige Verbindungs-ID
///
/// Identifiziert eine lebende Transport-Verbindung. Wird beim Accept
/// vergeben und bleibt fuer die Lebensdauer der Verbindung stabil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerbindungsId(pub Uuid);

impl VerbindungsId {
    /// Erstellt eine neue zufaellige VerbindungsId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Gibt die innere UUID zurueck
    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for VerbindungsId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for VerbindungsId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "verbindung:{}", self.0)
    }
}

/// Rolle einer Verbindung innerhalb eines Raums
///
/// Ein Sender bietet die Uebertragung an, Empfaenger nehmen sie an.
/// Pro Raum gibt es hoechstens einen Sender, aber beliebig viele Empfaenger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rolle {
    Sender,
    #[serde(rename = "receiver")]
    Empfaenger,
}

impl std::fmt::Display for Rolle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sender => write!(f, "sender"),
            Self::Empfaenger => write!(f, "receiver"),
        }
    }
}
