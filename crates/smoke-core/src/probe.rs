//! Model Construction Probe.
//!
//! Construye el modelo, lo mueve a CPU y ejecuta exactamente una inferencia
//! sobre una entrada sintética. No interpreta fallos: los devuelve con la
//! clase y el mensaje originales y sólo les añade la etapa.

use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::DEFAULT_INPUT_SIZE;
use crate::errors::{Fault, FaultOrigin};
use crate::model::{InputSpec, ModelConstructor, OutputDescriptor};

/// Fase del probe, notificada al observador antes de ejecutarse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProbePhase {
    Constructing,
    MovingToCpu,
    Inferring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstructionProbe {
    pub input_size: u32,
    pub seed: u64,
}

impl Default for ConstructionProbe {
    fn default() -> Self { Self { input_size: DEFAULT_INPUT_SIZE, seed: 0 } }
}

impl ConstructionProbe {
    pub fn new(input_size: u32) -> Self { Self { input_size, ..Self::default() } }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn input_spec(&self) -> InputSpec { InputSpec::square(self.input_size, self.seed) }

    pub fn run(&self, ctor: &dyn ModelConstructor, config: &Path) -> Result<OutputDescriptor, Fault> {
        self.run_observed(ctor, config, &mut |_| {})
    }

    /// Igual que `run`, notificando cada fase a `on_phase`.
    pub fn run_observed(&self,
                        ctor: &dyn ModelConstructor,
                        config: &Path,
                        on_phase: &mut dyn FnMut(ProbePhase))
                        -> Result<OutputDescriptor, Fault> {
        debug!("probe:construct config={} size={}", config.display(), self.input_size);
        on_phase(ProbePhase::Constructing);
        let mut instance = ctor.construct(config, self.input_size)
                               .map_err(|f| f.into_fault(FaultOrigin::Construction))?;

        on_phase(ProbePhase::MovingToCpu);
        instance.to_cpu().map_err(|f| f.into_fault(FaultOrigin::Construction))?;

        let input = self.input_spec();
        debug!("probe:infer shape={:?}", input.shape());
        on_phase(ProbePhase::Inferring);
        instance.infer_no_grad(&input).map_err(|f| f.into_fault(FaultOrigin::Inference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelFault, ModelInstance};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        calls: Rc<RefCell<Vec<String>>>,
        fail_on: Option<&'static str>,
    }

    struct RecorderInstance {
        calls: Rc<RefCell<Vec<String>>>,
        fail_on: Option<&'static str>,
    }

    impl ModelConstructor for Recorder {
        fn construct(&self, config: &Path, input_size: u32) -> Result<Box<dyn ModelInstance>, ModelFault> {
            self.calls.borrow_mut().push(format!("construct {} {input_size}", config.display()));
            if self.fail_on == Some("construct") {
                return Err(ModelFault::new("AttributeError", "module 'numpy' has no attribute 'int'"));
            }
            Ok(Box::new(RecorderInstance { calls: Rc::clone(&self.calls),
                                           fail_on: self.fail_on }))
        }
    }

    impl ModelInstance for RecorderInstance {
        fn to_cpu(&mut self) -> Result<(), ModelFault> {
            self.calls.borrow_mut().push("to_cpu".into());
            Ok(())
        }

        fn infer_no_grad(&mut self, input: &InputSpec) -> Result<OutputDescriptor, ModelFault> {
            self.calls.borrow_mut().push(format!("infer {:?}", input.shape()));
            if self.fail_on == Some("infer") {
                return Err(ModelFault::new("RuntimeError", "shape mismatch"));
            }
            Ok(OutputDescriptor { type_name: "Tensor".into(),
                                  shapes: vec![vec![1, 10647, 85]] })
        }
    }

    #[test]
    fn runs_construct_cpu_and_a_single_inference() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let ctor = Recorder { calls: Rc::clone(&calls),
                              fail_on: None };
        let mut phases = Vec::new();
        let out = ConstructionProbe::new(320).run_observed(&ctor, Path::new("config/yolov3.cfg"), &mut |p| phases.push(p))
                                             .unwrap();
        assert_eq!(out.type_name, "Tensor");
        assert_eq!(*calls.borrow(),
                   vec!["construct config/yolov3.cfg 320".to_string(),
                        "to_cpu".to_string(),
                        "infer [1, 3, 320, 320]".to_string()]);
        assert_eq!(phases, vec![ProbePhase::Constructing, ProbePhase::MovingToCpu, ProbePhase::Inferring]);
    }

    #[test]
    fn construction_fault_is_passed_through_unchanged() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let ctor = Recorder { calls: Rc::clone(&calls),
                              fail_on: Some("construct") };
        let fault = ConstructionProbe::default().run(&ctor, Path::new("x.cfg")).unwrap_err();
        assert_eq!(fault.origin, FaultOrigin::Construction);
        assert_eq!(fault.class, "AttributeError");
        assert_eq!(fault.message, "module 'numpy' has no attribute 'int'");
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn inference_fault_is_tagged_with_inference_origin() {
        let ctor = Recorder { calls: Rc::new(RefCell::new(Vec::new())),
                              fail_on: Some("infer") };
        let fault = ConstructionProbe::default().run(&ctor, Path::new("x.cfg")).unwrap_err();
        assert_eq!(fault.origin, FaultOrigin::Inference);
        assert_eq!(fault.class, "RuntimeError");
    }
}
