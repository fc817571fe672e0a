//! luftpost-core – Gemeinsame Typen
//!
//! Dieses Crate stellt die fundamentalen Bausteine bereit, die von allen
//! anderen Luftpost-Crates gemeinsam genutzt werden: Identifikationstypen
//! und die Rollen-Definition fuer Raum-Teilnehmer.

pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use types::{RaumId, Rolle, VerbindungsId};
