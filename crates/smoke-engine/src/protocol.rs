//! Mensajes intercambiados con `python/darknet_probe.py`.
//!
//! Petición: un objeto JSON con `op`. Respuesta: un objeto JSON en una línea;
//! en modo subproceso es la última línea no vacía de stdout (lo que el modelo
//! imprima antes se ignora).

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use smoke_core::{FaultOrigin, InputSpec, ModelFault, OutputDescriptor};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum BridgeRequest {
    /// Importa `module` y comprueba que expone `symbol`.
    Resolve { module: String, symbol: String },
    /// Construye `symbol(config_path, img_size=..)`, lo mueve a `device` y
    /// ejecuta una inferencia bajo `no_grad`.
    Probe {
        module: String,
        symbol: String,
        config_path: PathBuf,
        img_size: u32,
        device: String,
        input: InputSpec,
    },
}

impl BridgeRequest {
    /// JSON de la petición con el directorio de trabajo añadido (se antepone
    /// a `sys.path` en el lado Python).
    pub fn payload(&self, workdir: &Path) -> serde_json::Result<String> {
        let mut value = serde_json::to_value(self)?;
        if let Some(obj) = value.as_object_mut() {
            obj.insert("workdir".into(), serde_json::Value::String(workdir.display().to_string()));
        }
        serde_json::to_string(&value)
    }
}

/// Etapa en la que el lado Python produjo la respuesta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStage {
    Resolve,
    Construct,
    Infer,
}

impl ReplyStage {
    pub fn origin(self) -> FaultOrigin {
        match self {
            ReplyStage::Resolve | ReplyStage::Construct => FaultOrigin::Construction,
            ReplyStage::Infer => FaultOrigin::Inference,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BridgeReply {
    pub ok: bool,
    pub stage: ReplyStage,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub output: Option<OutputDescriptor>,
}

impl BridgeReply {
    /// Clase y mensaje de la excepción Python, con la etapa como pista.
    pub fn fault(&self) -> ModelFault {
        ModelFault::new(self.class.clone().unwrap_or_else(|| "Exception".to_string()),
                        self.message.clone().unwrap_or_default()).at_stage(self.stage.origin())
    }

    pub fn into_output(self) -> Result<OutputDescriptor, ModelFault> {
        if !self.ok {
            return Err(self.fault());
        }
        self.output
            .ok_or_else(|| ModelFault::new(BRIDGE_FAULT_CLASS, "probe reply without output").at_stage(FaultOrigin::Inference))
    }
}

/// Clase usada para fallos del propio puente (no del modelo).
pub const BRIDGE_FAULT_CLASS: &str = "BridgeError";

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("could not start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("interpreter exited without a reply ({status}): {stderr}")]
    NoReply { status: String, stderr: String },
    #[error("malformed bridge message: {0}")]
    Protocol(#[from] serde_json::Error),
    #[cfg(feature = "embedded-python")]
    #[error("embedded python error: {0}")]
    Python(#[from] pyo3::PyErr),
}

impl From<BridgeError> for ModelFault {
    fn from(e: BridgeError) -> Self { ModelFault::new(BRIDGE_FAULT_CLASS, e.to_string()) }
}

/// Última línea no vacía de `stdout`, o `None`.
pub fn reply_line(stdout: &str) -> Option<&str> { stdout.lines().rev().map(str::trim).find(|l| !l.is_empty()) }

pub fn parse_reply(line: &str) -> Result<BridgeReply, BridgeError> { Ok(serde_json::from_str(line)?) }
