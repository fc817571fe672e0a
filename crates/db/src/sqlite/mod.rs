//! SQLite-Backend-Implementierung des RaumRepository

pub mod pool;
pub mod raeume;

pub use pool::SqliteDb;
