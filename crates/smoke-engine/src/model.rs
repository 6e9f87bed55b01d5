//! `ModelConstructor` respaldado por el puente Python.
//!
//! La construcción es diferida: el intérprete por subproceso no conserva
//! estado entre llamadas, así que `construct` sólo fija la configuración y la
//! construcción real ocurre junto con la inferencia en una única petición
//! `probe`. La etapa real del fallo viaja en la respuesta (`stage`).

use log::debug;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use smoke_core::{InputSpec, ModelConstructor, ModelFault, ModelInstance, OutputDescriptor};

use crate::interpreter::Interpreter;
use crate::protocol::BridgeRequest;

pub struct PythonModel {
    interp: Rc<dyn Interpreter>,
    module: String,
    symbol: String,
}

impl PythonModel {
    pub fn new(interp: Rc<dyn Interpreter>, module: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self { interp,
               module: module.into(),
               symbol: symbol.into() }
    }

    /// `módulo.Símbolo`, p.ej. `pytorchyolo.models.Darknet`.
    pub fn qualified_name(&self) -> String { format!("{}.{}", self.module, self.symbol) }
}

impl ModelConstructor for PythonModel {
    fn construct(&self, config: &Path, input_size: u32) -> Result<Box<dyn ModelInstance>, ModelFault> {
        let config_path = std::path::absolute(config).unwrap_or_else(|_| config.to_path_buf());
        debug!("python model: {} config={}", self.qualified_name(), config_path.display());
        Ok(Box::new(PythonModelInstance { interp: Rc::clone(&self.interp),
                                          module: self.module.clone(),
                                          symbol: self.symbol.clone(),
                                          config_path,
                                          img_size: input_size,
                                          device: None }))
    }
}

pub struct PythonModelInstance {
    interp: Rc<dyn Interpreter>,
    module: String,
    symbol: String,
    config_path: PathBuf,
    img_size: u32,
    device: Option<String>,
}

impl PythonModelInstance {
    pub fn device(&self) -> Option<&str> { self.device.as_deref() }
}

impl ModelInstance for PythonModelInstance {
    fn to_cpu(&mut self) -> Result<(), ModelFault> {
        self.device = Some("cpu".to_string());
        Ok(())
    }

    fn infer_no_grad(&mut self, input: &InputSpec) -> Result<OutputDescriptor, ModelFault> {
        let request = BridgeRequest::Probe { module: self.module.clone(),
                                             symbol: self.symbol.clone(),
                                             config_path: self.config_path.clone(),
                                             img_size: self.img_size,
                                             device: self.device.clone().unwrap_or_else(|| "cpu".to_string()),
                                             input: *input };
        self.interp.call(&request)?.into_output()
    }
}
