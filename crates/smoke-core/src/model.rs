//! Contrato con el colaborador que define el modelo.
//!
//! El harness no conoce la arquitectura interna del detector: sólo necesita
//! un constructor `(config_path, input_size) -> instancia` y una instancia que
//! pueda moverse a CPU e invocarse una vez sin gradientes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

use crate::errors::{Fault, FaultOrigin};
use crate::locator::ResolutionStrategy;

/// Forma (y semilla) de la entrada sintética `[batch, channels, height, width]`.
///
/// El contenido es ruido sin distribución requerida; sólo se valida que el
/// modelo acepte la forma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSpec {
    pub batch: usize,
    pub channels: usize,
    pub height: usize,
    pub width: usize,
    pub seed: u64,
}

impl InputSpec {
    /// Entrada `1 x 3 x size x size`.
    pub fn square(size: u32, seed: u64) -> Self {
        Self { batch: 1,
               channels: 3,
               height: size as usize,
               width: size as usize,
               seed }
    }

    pub fn shape(&self) -> [usize; 4] { [self.batch, self.channels, self.height, self.width] }

    pub fn numel(&self) -> usize { self.shape().iter().product() }
}

/// Descriptor grueso (tipo + formas) de la salida de la inferencia.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDescriptor {
    pub type_name: String,
    #[serde(default)]
    pub shapes: Vec<Vec<usize>>,
}

impl fmt::Display for OutputDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_name)?;
        match self.shapes.as_slice() {
            [] => Ok(()),
            [single] => write!(f, " {single:?}"),
            many => write!(f, " {many:?}"),
        }
    }
}

/// Fallo tal y como lo eleva el colaborador (clase + mensaje sin tocar).
///
/// `stage` es una pista opcional del propio colaborador cuando la etapa real
/// no coincide con la llamada que lo devolvió (construcción diferida).
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{class}: {message}")]
pub struct ModelFault {
    pub class: String,
    pub message: String,
    #[serde(default)]
    pub stage: Option<FaultOrigin>,
}

impl ModelFault {
    pub fn new(class: impl Into<String>, message: impl Into<String>) -> Self {
        Self { class: class.into(),
               message: message.into(),
               stage: None }
    }

    pub fn at_stage(mut self, stage: FaultOrigin) -> Self {
        self.stage = Some(stage);
        self
    }

    /// Convierte a `Fault`, usando `default_origin` si no hay pista de etapa.
    pub fn into_fault(self, default_origin: FaultOrigin) -> Fault {
        Fault::new(self.stage.unwrap_or(default_origin), self.class, self.message)
    }
}

/// Punto de entrada del modelo (el "símbolo" resuelto).
pub trait ModelConstructor {
    fn construct(&self, config: &Path, input_size: u32) -> Result<Box<dyn ModelInstance>, ModelFault>;
}

/// Instancia construida del modelo.
pub trait ModelInstance {
    fn to_cpu(&mut self) -> Result<(), ModelFault>;

    /// Una única llamada de inferencia con el seguimiento de gradientes desactivado.
    fn infer_no_grad(&mut self, input: &InputSpec) -> Result<OutputDescriptor, ModelFault>;
}

/// Estrategia que resuelve el constructor del modelo.
pub type ModelStrategy = Box<dyn ResolutionStrategy<Box<dyn ModelConstructor>>>;
