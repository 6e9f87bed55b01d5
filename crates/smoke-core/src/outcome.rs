//! Resultado único de una ejecución (`DiagnosticOutcome`).
//!
//! Determina el código de salida del proceso y se serializa como un único
//! registro JSON cuando se pide salida estructurada.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

use crate::classify::Category;
use crate::constants::HARNESS_VERSION;
use crate::errors::FaultOrigin;
use crate::model::OutputDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Fail,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Pass => f.write_str("pass"),
            Status::Fail => f.write_str("fail"),
        }
    }
}

/// Qué pasó con el `.cfg` cuando no estaba en disco.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum ProvisioningStatus {
    NotNeeded,
    AlreadyPresent,
    Fetched { bytes: usize },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticOutcome {
    pub run_id: Uuid,
    pub harness_version: &'static str,
    pub status: Status,
    pub category: Category,
    /// Mensaje del fallo original (ausente si la ejecución pasó).
    pub message: Option<String>,
    pub failed_stage: Option<FaultOrigin>,
    pub fault_class: Option<String>,
    pub model_strategy: Option<String>,
    pub config_strategy: Option<String>,
    pub config_path: Option<PathBuf>,
    pub provisioning: ProvisioningStatus,
    pub matched_signature: Option<String>,
    pub output: Option<OutputDescriptor>,
}

impl DiagnosticOutcome {
    /// Resultado en curso; el driver lo completa antes de cerrarlo.
    pub fn pending(run_id: Uuid) -> Self {
        Self { run_id,
               harness_version: HARNESS_VERSION,
               status: Status::Fail,
               category: Category::Unknown,
               message: None,
               failed_stage: None,
               fault_class: None,
               model_strategy: None,
               config_strategy: None,
               config_path: None,
               provisioning: ProvisioningStatus::NotNeeded,
               matched_signature: None,
               output: None }
    }

    pub fn passed(&self) -> bool { self.status == Status::Pass }

    /// `0` si pasó; `1` para cualquier categoría de fallo, incluida la
    /// incompatibilidad diagnosticada.
    pub fn exit_code(&self) -> i32 {
        if self.passed() { 0 } else { 1 }
    }

    pub fn to_json(&self) -> serde_json::Result<String> { serde_json::to_string(self) }
}
