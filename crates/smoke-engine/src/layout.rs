//! Estrategias para localizar el símbolo del modelo según la disposición del
//! código fuente: checkout del repositorio (`models.Darknet`) o paquete
//! instalado (`pytorchyolo.models.Darknet`).

use log::debug;
use std::rc::Rc;

use smoke_core::{ModelConstructor, ModelStrategy, ResolutionStrategy, StrategyMiss};

use crate::interpreter::Interpreter;
use crate::model::PythonModel;
use crate::protocol::BridgeRequest;

pub const ROOT_LAYOUT_ID: &str = "root-layout";
pub const PACKAGED_LAYOUT_ID: &str = "packaged-layout";

pub struct PythonLayoutStrategy {
    id: &'static str,
    interp: Rc<dyn Interpreter>,
    module: String,
    symbol: String,
}

impl PythonLayoutStrategy {
    /// Módulo de primer nivel importable desde el directorio de trabajo.
    pub fn root(interp: Rc<dyn Interpreter>, root_module: &str, symbol: &str) -> Self {
        Self { id: ROOT_LAYOUT_ID,
               interp,
               module: root_module.to_string(),
               symbol: symbol.to_string() }
    }

    /// Mismo módulo dentro del paquete instalado.
    pub fn packaged(interp: Rc<dyn Interpreter>, package: &str, root_module: &str, symbol: &str) -> Self {
        Self { id: PACKAGED_LAYOUT_ID,
               interp,
               module: format!("{package}.{root_module}"),
               symbol: symbol.to_string() }
    }

    pub fn module(&self) -> &str { &self.module }
}

impl ResolutionStrategy<Box<dyn ModelConstructor>> for PythonLayoutStrategy {
    fn id(&self) -> &str { self.id }

    fn attempt(&self) -> Result<Box<dyn ModelConstructor>, StrategyMiss> {
        let request = BridgeRequest::Resolve { module: self.module.clone(),
                                               symbol: self.symbol.clone() };
        let reply = self.interp.call(&request).map_err(|e| StrategyMiss::new(e.to_string()))?;
        if !reply.ok {
            let fault = reply.fault();
            return Err(StrategyMiss::new(format!("{}: {}", fault.class, fault.message)).with_class(fault.class));
        }
        debug!("layout {}: resolved {}.{}", self.id, self.module, self.symbol);
        Ok(Box::new(PythonModel::new(Rc::clone(&self.interp), self.module.clone(), self.symbol.clone())))
    }
}

/// Estrategias en orden de prioridad: raíz del repositorio, luego paquete.
pub fn model_symbol_strategies(interp: Rc<dyn Interpreter>, package: &str, root_module: &str, symbol: &str) -> Vec<ModelStrategy> {
    vec![Box::new(PythonLayoutStrategy::root(Rc::clone(&interp), root_module, symbol)),
         Box::new(PythonLayoutStrategy::packaged(interp, package, root_module, symbol)),]
}
