//! Tipos de evento de una ejecución y estructura `HarnessEvent`.
//!
//! El driver emite un evento por cada transición y por cada hecho relevante
//! (intentos fallidos, aprovisionamiento, fases del probe, diagnóstico). La
//! salida de consola del binario se deriva exclusivamente de estos eventos.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::classify::Category;
use crate::driver::HarnessState;
use crate::errors::Fault;
use crate::locator::ArtifactKind;
use crate::model::OutputDescriptor;
use crate::outcome::Status;
use crate::probe::ProbePhase;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HarnessEventKind {
    /// Primer evento de toda ejecución.
    RunStarted { harness_version: String },
    StateEntered { state: HarnessState },
    /// Una estrategia no encontró el artifact (no fatal).
    AttemptFailed {
        kind: ArtifactKind,
        strategy: String,
        error: String,
    },
    ArtifactResolved {
        kind: ArtifactKind,
        strategy: String,
        detail: String,
    },
    /// Todas las estrategias fallaron para `kind`.
    ResolutionFailed { kind: ArtifactKind, attempts: usize },
    Provisioned {
        path: PathBuf,
        fetched: bool,
        bytes: usize,
    },
    ProvisioningFailed { error: String },
    ProbePhase { phase: ProbePhase },
    ProbeSucceeded { output: OutputDescriptor },
    ProbeFailed { fault: Fault },
    Diagnosed {
        category: Category,
        matched_signature: Option<String>,
        line: String,
    },
    /// Evento de cierre; siempre el último.
    RunFinished { status: Status, category: Category },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarnessEvent {
    pub seq: u64, // asignado por el EventLog (orden append)
    pub run_id: Uuid,
    pub kind: HarnessEventKind,
    pub ts: DateTime<Utc>,
}
