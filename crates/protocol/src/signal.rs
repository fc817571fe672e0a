//! Signaling-Nachrichten
//!
//! Alle Nachrichten die ueber die Verbindung zwischen Client und Relay
//! laufen. Das Protokoll ist symmetrisch benannt: `offer`, `answer` und
//! `ice-candidate` tragen eingehend eine `targetId` (Zieladresse) und
//! ausgehend eine `senderId` (Absenderkennung); der Verhandlungs-Payload
//! selbst bleibt unveraendert.

use luftpost_core::{Rolle, VerbindungsId};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Nachrichten-Daten
// ---------------------------------------------------------------------------

/// Beitritts-Anfrage vom Client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomDaten {
    /// Ziel-Raum (muss aktiv und unabgelaufen sein)
    pub room_id: String,
    /// Gewuenschte Rolle im Raum
    pub role: Rolle,
}

/// Beitritts-Bestaetigung an den Anfragenden
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomJoinedDaten {
    /// Zugewiesene Rolle
    pub role: Rolle,
}

/// Benachrichtigung an den Sender: ein Empfaenger ist beigetreten
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiverJoinedDaten {
    /// Verbindungs-ID des neuen Empfaengers (Relay-Zieladresse)
    pub receiver_id: VerbindungsId,
}

/// SDP-Offer (opak fuer das Relay)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferDaten {
    /// Unveraenderter SDP-Payload
    pub offer: serde_json::Value,
    /// Zieladresse (nur eingehend gesetzt)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<VerbindungsId>,
    /// Absenderkennung (nur ausgehend gesetzt)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<VerbindungsId>,
}

/// SDP-Answer (opak fuer das Relay)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDaten {
    /// Unveraenderter SDP-Payload
    pub answer: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<VerbindungsId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<VerbindungsId>,
}

/// ICE-Kandidat (opak fuer das Relay)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidateDaten {
    /// Unveraenderter ICE-Payload
    pub candidate: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<VerbindungsId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<VerbindungsId>,
}

// ---------------------------------------------------------------------------
// SignalNachricht
// ---------------------------------------------------------------------------

/// Alle Signaling-Nachrichten (beide Richtungen)
///
/// Auf dem Draht: `{"event": "...", "data": {...}}`. Die Event-Namen
/// entsprechen dem Client-Protokoll (kebab-case).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum SignalNachricht {
    /// Client -> Relay: Raum beitreten
    JoinRoom(JoinRoomDaten),
    /// Relay -> Client: Beitritt bestaetigt
    RoomJoined(RoomJoinedDaten),
    /// Relay -> Client: Beitritt fehlgeschlagen (menschenlesbarer Grund)
    Error(String),
    /// Relay -> Sender: neuer Empfaenger im Raum
    ReceiverJoined(ReceiverJoinedDaten),
    /// Beide Richtungen: SDP-Offer
    Offer(OfferDaten),
    /// Beide Richtungen: SDP-Answer
    Answer(AnswerDaten),
    /// Beide Richtungen: ICE-Kandidat
    IceCandidate(IceCandidateDaten),
}

impl SignalNachricht {
    /// Erstellt eine Fehler-Nachricht
    pub fn fehler(grund: impl Into<String>) -> Self {
        Self::Error(grund.into())
    }

    /// Erstellt eine Beitritts-Bestaetigung
    pub fn raum_beigetreten(role: Rolle) -> Self {
        Self::RoomJoined(RoomJoinedDaten { role })
    }

    /// Erstellt eine Empfaenger-Benachrichtigung fuer den Sender
    pub fn empfaenger_beigetreten(receiver_id: VerbindungsId) -> Self {
        Self::ReceiverJoined(ReceiverJoinedDaten { receiver_id })
    }

    /// Event-Name fuer Logging
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::JoinRoom(_) => "join-room",
            Self::RoomJoined(_) => "room-joined",
            Self::Error(_) => "error",
            Self::ReceiverJoined(_) => "receiver-joined",
            Self::Offer(_) => "offer",
            Self::Answer(_) => "answer",
            Self::IceCandidate(_) => "ice-candidate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn join_room_wire_format() {
        let json = r#"{"event":"join-room","data":{"roomId":"b9c7f1c0-0000-4000-8000-000000000001","role":"sender"}}"#;
        let msg: SignalNachricht = serde_json::from_str(json).unwrap();
        match msg {
            SignalNachricht::JoinRoom(daten) => {
                assert_eq!(daten.role, Rolle::Sender);
                assert!(daten.room_id.starts_with("b9c7f1c0"));
            }
            other => panic!("Unerwartete Nachricht: {}", other.event_name()),
        }
    }

    #[test]
    fn offer_eingehend_traegt_target_id() {
        let ziel = VerbindungsId::new();
        let json = format!(
            r#"{{"event":"offer","data":{{"offer":{{"type":"offer","sdp":"v=0"}},"targetId":"{}"}}}}"#,
            ziel.inner()
        );
        let msg: SignalNachricht = serde_json::from_str(&json).unwrap();
        match msg {
            SignalNachricht::Offer(daten) => {
                assert_eq!(daten.target_id, Some(ziel));
                assert!(daten.sender_id.is_none());
                assert_eq!(daten.offer["sdp"], json!("v=0"));
            }
            other => panic!("Unerwartete Nachricht: {}", other.event_name()),
        }
    }

    #[test]
    fn offer_ausgehend_ohne_target_id() {
        let absender = VerbindungsId::new();
        let msg = SignalNachricht::Offer(OfferDaten {
            offer: json!({"type": "offer"}),
            target_id: None,
            sender_id: Some(absender),
        });
        let wire = serde_json::to_string(&msg).unwrap();
        assert!(wire.contains("senderId"));
        assert!(!wire.contains("targetId"), "targetId darf ausgehend fehlen");
    }

    #[test]
    fn error_ist_reiner_string() {
        let msg = SignalNachricht::fehler("Raum nicht gefunden oder abgelaufen");
        let wire = serde_json::to_string(&msg).unwrap();
        assert_eq!(
            wire,
            r#"{"event":"error","data":"Raum nicht gefunden oder abgelaufen"}"#
        );
    }
}
