//! luftpost-signaling – Signaling-Relay
//!
//! Dieser Crate implementiert das Herzstueck von Luftpost: ein Relay fuer
//! WebRTC-Verhandlungsnachrichten (Offer, Answer, ICE-Kandidaten) zwischen
//! genau einem Sender und beliebig vielen Empfaengern innerhalb eines
//! kurzlebigen Raums. Medien fliessen nie ueber das Relay.
//!
//! ## Architektur
//!
//! ```text
//! TCP Listener (SignalingServer)
//!     |
//!     v
//! ClientConnection (pro Verbindung ein Task, LocalSet)
//!     |  verbindungs-lokale Session: id, raum, rolle
//!     |
//!     v
//! MessageDispatcher
//!     |
//!     +-- beitritt   (join-room: Oracle-Pruefung, Registry-Mutation)
//!     +-- relay      (offer/answer/ice-candidate: Punkt-zu-Punkt)
//!     +-- trennung   (Disconnect: Registry-Aufraeumen, Raum-Deaktivierung)
//!
//! RaumRegistry   – wer ist in welchem Raum (ein Sender, viele Empfaenger)
//! EventVerteiler – Zustellung an benannte Verbindungen (deliver-or-no-op)
//! ```
//!
//! Der persistierte Raum-Zustand (Existenz, Ablauf, Aktiv-Flag) liegt im
//! `RaumRepository` aus `luftpost-db`; das Relay konsumiert ihn nur.

pub mod connection;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod server_state;
pub mod tcp;
pub mod verteiler;

// Bequeme Re-Exporte
pub use connection::ClientConnection;
pub use dispatcher::{MessageDispatcher, VerbindungsSession};
pub use error::{SignalingError, SignalingResult};
pub use registry::RaumRegistry;
pub use server_state::{SignalConfig, SignalState};
pub use tcp::SignalingServer;
pub use verteiler::EventVerteiler;
