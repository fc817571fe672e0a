//! luftpost-db – Raum-Store
//!
//! Dieses Crate haelt den persistierten Raum-Zustand: Existenz, Ablaufzeit
//! und Aktiv-Flag. Es ist die einzige Autoritaet dafuer, ob ein Beitritt
//! zulaessig ist; das Relay selbst haelt keine Raum-Persistenz.
//!
//! Das Repository-Pattern entkoppelt das Signaling von der konkreten
//! Datenbank: `RaumRepository` ist die Schnittstelle, `SqliteDb` die
//! Standard-Implementierung (WAL-Modus, eingebettete Migrationen).

pub mod error;
pub mod models;
pub mod repository;
pub mod sqlite;

pub use error::{DbError, DbResult};
pub use models::RaumRecord;
pub use repository::{DatabaseConfig, RaumRepository};
pub use sqlite::SqliteDb;
