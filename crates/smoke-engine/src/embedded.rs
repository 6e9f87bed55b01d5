//! Intérprete embebido (feature `embedded-python`).
//!
//! Carga `darknet_probe.py` una única vez como módulo y llama a su
//! `dispatch` en el mismo proceso.

use pyo3::ffi::c_str;
use pyo3::prelude::*;
use pyo3::types::PyModule;
use std::ffi::CString;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::interpreter::{Interpreter, PROBE_SCRIPT};
use crate::protocol::{parse_reply, BridgeError, BridgeReply, BridgeRequest};

static PROBE_MODULE: OnceLock<Py<PyModule>> = OnceLock::new();

fn init_module() -> PyResult<()> {
    if PROBE_MODULE.get().is_some() {
        return Ok(());
    }
    Python::attach(|py| {
        let code = CString::new(PROBE_SCRIPT)?;
        let module = PyModule::from_code(py, code.as_c_str(), c_str!("darknet_probe.py"), c_str!("darknet_probe"))?;
        PROBE_MODULE.set(module.unbind()).ok();
        Ok(())
    })
}

fn get_module(py: Python<'_>) -> PyResult<Py<PyModule>> {
    PROBE_MODULE.get()
                .map(|module| module.clone_ref(py))
                .ok_or_else(|| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>("darknet_probe no inicializado"))
}

#[derive(Debug, Clone)]
pub struct EmbeddedInterpreter {
    workdir: PathBuf,
}

impl EmbeddedInterpreter {
    pub fn init(workdir: impl Into<PathBuf>) -> Result<Self, BridgeError> {
        init_module()?;
        Ok(Self { workdir: workdir.into() })
    }

    pub fn workdir(&self) -> &Path { &self.workdir }
}

impl Interpreter for EmbeddedInterpreter {
    fn call(&self, request: &BridgeRequest) -> Result<BridgeReply, BridgeError> {
        let payload = request.payload(&self.workdir)?;
        let line: String = Python::attach(|py| -> PyResult<String> {
                               let module = get_module(py)?;
                               module.bind(py).getattr("dispatch")?.call1((payload,))?.extract()
                           })?;
        parse_reply(&line)
    }
}
