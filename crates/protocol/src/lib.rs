//! luftpost-protocol – Signaling-Protokoll
//!
//! Definiert die Nachrichten, die zwischen Client und Relay ausgetauscht
//! werden (Raum-Beitritt, WebRTC-Verhandlungs-Payloads), sowie das
//! Frame-basierte Wire-Format fuer TCP-Verbindungen.
//!
//! ## Design
//! - Event-basiertes Protokoll: jede Nachricht traegt einen `event`-Namen
//!   und ein `data`-Objekt (Tagged Enum via serde)
//! - Verhandlungs-Payloads (SDP, ICE) sind fuer das Relay opak und werden
//!   als `serde_json::Value` unveraendert durchgereicht

pub mod signal;
pub mod wire;

pub use signal::{
    AnswerDaten, IceCandidateDaten, JoinRoomDaten, OfferDaten, ReceiverJoinedDaten,
    RoomJoinedDaten, SignalNachricht,
};
pub use wire::FrameCodec;
