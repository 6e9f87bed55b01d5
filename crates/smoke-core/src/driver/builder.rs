//! Builder para `HarnessDriver`.
//!
//! ```ignore
//! let driver = HarnessDriver::builder()
//!     .model_strategies(python_layouts)
//!     .config_strategies(config_path_strategies(root, "pytorchyolo", "yolov3"))
//!     .provisioner(provisioner)
//!     .probe(ConstructionProbe::new(416))
//!     .build();
//! let run = driver.run();
//! ```

use std::path::PathBuf;
use uuid::Uuid;

use crate::classify::FailureClassifier;
use crate::constants::DEFAULT_CONFIG_NAME;
use crate::driver::{HarnessDriver, HarnessState};
use crate::event::EventLog;
use crate::locator::{canonical_config_path, ResolutionStrategy};
use crate::model::{ModelConstructor, ModelStrategy};
use crate::probe::ConstructionProbe;
use crate::provision::Provisioner;

pub struct HarnessDriverBuilder<L: EventLog> {
    log: L,
    run_id: Option<Uuid>,
    model_strategies: Vec<ModelStrategy>,
    config_strategies: Vec<Box<dyn ResolutionStrategy<PathBuf>>>,
    canonical_config: Option<PathBuf>,
    provisioner: Option<Provisioner>,
    probe: ConstructionProbe,
    classifier: FailureClassifier,
}

impl<L: EventLog> HarnessDriverBuilder<L> {
    pub(crate) fn new(log: L) -> Self {
        Self { log,
               run_id: None,
               model_strategies: Vec::new(),
               config_strategies: Vec::new(),
               canonical_config: None,
               provisioner: None,
               probe: ConstructionProbe::default(),
               classifier: FailureClassifier::default() }
    }

    /// Fija el id de ejecución (por defecto uno aleatorio v4).
    pub fn run_id(mut self, run_id: Uuid) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Añade una estrategia de símbolo al final de la lista de prioridad.
    pub fn model_strategy<S>(mut self, strategy: S) -> Self
        where S: ResolutionStrategy<Box<dyn ModelConstructor>> + 'static
    {
        self.model_strategies.push(Box::new(strategy));
        self
    }

    pub fn model_strategies(mut self, strategies: Vec<ModelStrategy>) -> Self {
        self.model_strategies.extend(strategies);
        self
    }

    pub fn config_strategy<S>(mut self, strategy: S) -> Self
        where S: ResolutionStrategy<PathBuf> + 'static
    {
        self.config_strategies.push(Box::new(strategy));
        self
    }

    pub fn config_strategies(mut self, strategies: Vec<Box<dyn ResolutionStrategy<PathBuf>>>) -> Self {
        self.config_strategies.extend(strategies);
        self
    }

    /// Ruta usada por el probe cuando no se resolvió ningún `.cfg`.
    pub fn canonical_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.canonical_config = Some(path.into());
        self
    }

    pub fn provisioner(mut self, provisioner: Provisioner) -> Self {
        self.provisioner = Some(provisioner);
        self
    }

    pub fn probe(mut self, probe: ConstructionProbe) -> Self {
        self.probe = probe;
        self
    }

    pub fn classifier(mut self, classifier: FailureClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// La ruta canónica cae, en orden, en: la explícita, el destino del
    /// provisioner, `config/<DEFAULT_CONFIG_NAME>.cfg`.
    pub fn build(self) -> HarnessDriver<L> {
        let canonical_config =
            self.canonical_config
                .or_else(|| self.provisioner.as_ref().map(|p| p.target().to_path_buf()))
                .unwrap_or_else(|| canonical_config_path(std::path::Path::new("."), DEFAULT_CONFIG_NAME));
        HarnessDriver { log: self.log,
                        run_id: self.run_id.unwrap_or_else(Uuid::new_v4),
                        state: HarnessState::Start,
                        trace: vec![HarnessState::Start],
                        model_strategies: self.model_strategies,
                        config_strategies: self.config_strategies,
                        canonical_config,
                        provisioner: self.provisioner,
                        probe: self.probe,
                        classifier: self.classifier }
    }
}
