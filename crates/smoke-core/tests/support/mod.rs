//! Fakes compartidos por los tests de integración de smoke-core.
#![allow(dead_code)]

use smoke_core::{FetchError, Fetcher, FnStrategy, InputSpec, ModelConstructor, ModelFault, ModelInstance, ModelStrategy,
                 OutputDescriptor, StrategyMiss};
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

pub const NUMPY_INT_MESSAGE: &str = "module 'numpy' has no attribute 'int'.\n`np.int` was a deprecated alias for the builtin `int`.";

/// Fetcher en memoria que cuenta las llamadas.
pub struct FakeFetcher {
    body: Result<Vec<u8>, String>,
    pub calls: Rc<Cell<usize>>,
}

impl FakeFetcher {
    pub fn serving(body: &str) -> Self {
        Self { body: Ok(body.as_bytes().to_vec()),
               calls: Rc::new(Cell::new(0)) }
    }

    pub fn failing(detail: &str) -> Self {
        Self { body: Err(detail.to_string()),
               calls: Rc::new(Cell::new(0)) }
    }
}

impl Fetcher for FakeFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.calls.set(self.calls.get() + 1);
        match &self.body {
            Ok(b) => Ok(b.clone()),
            Err(detail) => Err(FetchError::Transport { url: url.to_string(),
                                                       detail: detail.clone() }),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Behavior {
    Pass,
    FailConstruct { class: &'static str, message: &'static str },
    FailInfer { class: &'static str, message: &'static str },
    /// Como Darknet: falla con FileNotFoundError si el .cfg no existe.
    NeedsConfigFile,
}

/// Constructor falso; `probes` cuenta cuántas veces se intentó construir.
#[derive(Debug, Clone)]
pub struct FakeModel {
    pub behavior: Behavior,
    pub probes: Rc<Cell<usize>>,
}

impl FakeModel {
    pub fn new(behavior: Behavior) -> Self {
        Self { behavior,
               probes: Rc::new(Cell::new(0)) }
    }
}

struct FakeInstance {
    behavior: Behavior,
}

impl ModelConstructor for FakeModel {
    fn construct(&self, config: &Path, _input_size: u32) -> Result<Box<dyn ModelInstance>, ModelFault> {
        self.probes.set(self.probes.get() + 1);
        match &self.behavior {
            Behavior::FailConstruct { class, message } => Err(ModelFault::new(*class, *message)),
            Behavior::NeedsConfigFile if !config.is_file() => {
                Err(ModelFault::new("FileNotFoundError",
                                    format!("[Errno 2] No such file or directory: '{}'", config.display())))
            }
            other => Ok(Box::new(FakeInstance { behavior: other.clone() })),
        }
    }
}

impl ModelInstance for FakeInstance {
    fn to_cpu(&mut self) -> Result<(), ModelFault> { Ok(()) }

    fn infer_no_grad(&mut self, input: &InputSpec) -> Result<OutputDescriptor, ModelFault> {
        if let Behavior::FailInfer { class, message } = &self.behavior {
            return Err(ModelFault::new(*class, *message));
        }
        let boxes = 3 * ((input.height / 32).pow(2) + (input.height / 16).pow(2) + (input.height / 8).pow(2));
        Ok(OutputDescriptor { type_name: "Tensor".into(),
                              shapes: vec![vec![input.batch, boxes, 85]] })
    }
}

/// Estrategia de símbolo que cuenta sus intentos; `model = None` ⇒ miss.
pub fn model_strategy(id: &'static str, model: Option<FakeModel>, attempts: Rc<Cell<usize>>) -> ModelStrategy {
    Box::new(FnStrategy::new(id, move || -> Result<Box<dyn ModelConstructor>, StrategyMiss> {
                 attempts.set(attempts.get() + 1);
                 match &model {
                     Some(m) => Ok(Box::new(m.clone())),
                     None => Err(StrategyMiss::new(format!("ModuleNotFoundError: no module for {id}"))),
                 }
             }))
}
