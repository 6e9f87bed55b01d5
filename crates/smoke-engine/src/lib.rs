//! smokeengine: acceso al detector Darknet implementado en Python.
//!
//! Dos backends implementan `Interpreter`: un subproceso `python3` (por
//! defecto) y, con la feature `embedded-python`, un intérprete embebido vía
//! pyo3. Ambos ejecutan el mismo wrapper `python/darknet_probe.py`.
#[cfg(feature = "embedded-python")]
pub mod embedded;
pub mod interpreter;
pub mod layout;
pub mod model;
pub mod protocol;

use std::path::PathBuf;
use std::rc::Rc;

use smoke_core::ModelStrategy;

#[cfg(feature = "embedded-python")]
pub use embedded::EmbeddedInterpreter;
pub use interpreter::{Interpreter, SubprocessInterpreter, PROBE_SCRIPT};
pub use layout::{model_symbol_strategies, PythonLayoutStrategy, PACKAGED_LAYOUT_ID, ROOT_LAYOUT_ID};
pub use model::{PythonModel, PythonModelInstance};
pub use protocol::{BridgeError, BridgeReply, BridgeRequest, ReplyStage};

/// Punto de entrada: un intérprete compartido por todas las estrategias.
#[derive(Clone)]
pub struct ProbeEngine {
    interp: Rc<dyn Interpreter>,
}

impl ProbeEngine {
    pub fn subprocess(program: impl Into<String>, workdir: impl Into<PathBuf>) -> Self {
        Self { interp: Rc::new(SubprocessInterpreter::new(program, workdir)) }
    }

    #[cfg(feature = "embedded-python")]
    pub fn embedded(workdir: impl Into<PathBuf>) -> Result<Self, BridgeError> {
        Ok(Self { interp: Rc::new(EmbeddedInterpreter::init(workdir)?) })
    }

    pub fn with_interpreter(interp: Rc<dyn Interpreter>) -> Self { Self { interp } }

    pub fn interpreter(&self) -> Rc<dyn Interpreter> { Rc::clone(&self.interp) }

    pub fn model_strategies(&self, package: &str, root_module: &str, symbol: &str) -> Vec<ModelStrategy> {
        model_symbol_strategies(self.interpreter(), package, root_module, symbol)
    }
}
