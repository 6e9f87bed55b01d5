//! Registro de eventos de una ejecución del harness (append-only).
pub mod store;
pub mod types;

pub use store::{EventLog, InMemoryEventLog};
pub use types::{HarnessEvent, HarnessEventKind};
