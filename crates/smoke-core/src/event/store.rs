use chrono::Utc;
use std::collections::HashMap;
use uuid::Uuid;

use super::{HarnessEvent, HarnessEventKind};

/// Almacenamiento de eventos append-only, indexado por `run_id`.
pub trait EventLog {
    /// Agrega un evento a partir de su kind y devuelve el evento completo (con seq y ts).
    fn append_kind(&mut self, run_id: Uuid, kind: HarnessEventKind) -> HarnessEvent;
    /// Lista eventos de una ejecución (orden ascendente por seq).
    fn list(&self, run_id: Uuid) -> Vec<HarnessEvent>;
}

#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    pub inner: HashMap<Uuid, Vec<HarnessEvent>>,
}

impl EventLog for InMemoryEventLog {
    fn append_kind(&mut self, run_id: Uuid, kind: HarnessEventKind) -> HarnessEvent {
        let events = self.inner.entry(run_id).or_default();
        let ev = HarnessEvent { seq: events.len() as u64,
                                run_id,
                                kind,
                                ts: Utc::now() };
        events.push(ev.clone());
        ev
    }

    fn list(&self, run_id: Uuid) -> Vec<HarnessEvent> { self.inner.get(&run_id).cloned().unwrap_or_default() }
}
