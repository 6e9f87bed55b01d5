//! Implementación del `HarnessDriver`.

use log::{debug, warn};
use std::path::PathBuf;
use uuid::Uuid;

use crate::classify::{Category, ClassifierContext, Diagnosis, FailureClassifier};
use crate::constants::HARNESS_VERSION;
use crate::driver::{HarnessDriverBuilder, HarnessState};
use crate::errors::Fault;
use crate::event::{EventLog, HarnessEvent, HarnessEventKind, InMemoryEventLog};
use crate::locator::{ArtifactKind, Locator, ResolutionFailure, ResolutionStrategy};
use crate::model::ModelStrategy;
use crate::outcome::{DiagnosticOutcome, ProvisioningStatus, Status};
use crate::probe::ConstructionProbe;
use crate::provision::{ProvisionReport, Provisioner};

/// Orquesta una ejecución completa: símbolo → `.cfg` → (aprovisionamiento)
/// → probe → (clasificación) → resultado.
///
/// Es de un solo uso: `run` consume el driver y devuelve un `HarnessRun`.
/// Ningún fallo escapa de `run`; todos terminan en un `DiagnosticOutcome`.
pub struct HarnessDriver<L: EventLog> {
    pub(crate) log: L,
    pub(crate) run_id: Uuid,
    pub(crate) state: HarnessState,
    pub(crate) trace: Vec<HarnessState>,
    pub(crate) model_strategies: Vec<ModelStrategy>,
    pub(crate) config_strategies: Vec<Box<dyn ResolutionStrategy<PathBuf>>>,
    pub(crate) canonical_config: PathBuf,
    pub(crate) provisioner: Option<Provisioner>,
    pub(crate) probe: ConstructionProbe,
    pub(crate) classifier: FailureClassifier,
}

/// Resultado de `HarnessDriver::run`.
pub struct HarnessRun<L: EventLog> {
    pub outcome: DiagnosticOutcome,
    /// Estados visitados, en orden (`START` ... `DONE`).
    pub states: Vec<HarnessState>,
    pub log: L,
}

impl<L: EventLog> HarnessRun<L> {
    pub fn events(&self) -> Vec<HarnessEvent> { self.log.list(self.outcome.run_id) }
}

impl HarnessDriver<InMemoryEventLog> {
    /// Builder con registro de eventos en memoria.
    pub fn builder() -> HarnessDriverBuilder<InMemoryEventLog> { HarnessDriverBuilder::new(InMemoryEventLog::default()) }
}

impl<L: EventLog> HarnessDriver<L> {
    pub fn builder_with_log(log: L) -> HarnessDriverBuilder<L> { HarnessDriverBuilder::new(log) }

    pub fn run_id(&self) -> Uuid { self.run_id }

    pub fn run(mut self) -> HarnessRun<L> {
        let run_id = self.run_id;
        self.emit(HarnessEventKind::RunStarted { harness_version: HARNESS_VERSION.to_string() });
        let mut outcome = DiagnosticOutcome::pending(run_id);

        // LOCATING_MODEL
        self.enter(HarnessState::LocatingModel);
        let mut model_locator = Locator::new(ArtifactKind::ModelSymbol);
        let resolved_model = model_locator.resolve(&self.model_strategies);
        self.record_misses(&model_locator);
        let model = match resolved_model {
            Ok(model) => model,
            Err(failure) => {
                self.emit(HarnessEventKind::ResolutionFailed { kind: failure.kind,
                                                               attempts: failure.attempts.len() });
                let (fault, diagnosis) = self.diagnose_unresolved_model(&failure);
                self.record_diagnosis(&mut outcome, fault, diagnosis);
                return self.finish(outcome);
            }
        };
        self.emit(HarnessEventKind::ArtifactResolved { kind: ArtifactKind::ModelSymbol,
                                                       strategy: model.strategy.clone(),
                                                       detail: model.strategy.clone() });
        outcome.model_strategy = Some(model.strategy.clone());

        // LOCATING_CONFIG (+ PROVISIONING_CONFIG)
        self.enter(HarnessState::LocatingConfig);
        let mut ctx = ClassifierContext::default();
        let mut config_locator = Locator::new(ArtifactKind::ConfigPath);
        let resolved_config = config_locator.resolve(&self.config_strategies);
        self.record_misses(&config_locator);
        let config_path = match resolved_config {
            Ok(config) => {
                ctx.config_resolved = true;
                self.emit(HarnessEventKind::ArtifactResolved { kind: ArtifactKind::ConfigPath,
                                                               strategy: config.strategy.clone(),
                                                               detail: config.value.display().to_string() });
                outcome.config_strategy = Some(config.strategy);
                config.value
            }
            Err(failure) => {
                self.emit(HarnessEventKind::ResolutionFailed { kind: failure.kind,
                                                               attempts: failure.attempts.len() });
                self.enter(HarnessState::ProvisioningConfig);
                let (path, status) = self.provision_config();
                ctx.provisioning_failed = matches!(status, ProvisioningStatus::Failed { .. });
                outcome.provisioning = status;
                path
            }
        };
        outcome.config_path = Some(config_path.clone());

        // PROBING
        self.enter(HarnessState::Probing);
        let probe = self.probe;
        let log = &mut self.log;
        let probed = probe.run_observed(&*model.value, &config_path, &mut |phase| {
                              log.append_kind(run_id, HarnessEventKind::ProbePhase { phase });
                          });
        match probed {
            Ok(output) => {
                self.emit(HarnessEventKind::ProbeSucceeded { output: output.clone() });
                outcome.status = Status::Pass;
                outcome.category = Category::None;
                outcome.output = Some(output);
            }
            Err(fault) => {
                self.emit(HarnessEventKind::ProbeFailed { fault: fault.clone() });
                self.enter(HarnessState::Classifying);
                let diagnosis = self.classifier.classify(&fault, &ctx);
                self.record_diagnosis(&mut outcome, fault, diagnosis);
            }
        }
        self.finish(outcome)
    }

    /// Aprovisiona el `.cfg`; nunca falla: devuelve la ruta a usar por el
    /// probe y el estado del aprovisionamiento.
    fn provision_config(&mut self) -> (PathBuf, ProvisioningStatus) {
        let attempt = self.provisioner.as_ref().map(|p| p.provision());
        match attempt {
            Some(Ok(report)) => {
                let path = report.path().to_path_buf();
                let (fetched, bytes, status) = match report {
                    ProvisionReport::AlreadyPresent { .. } => (false, 0, ProvisioningStatus::AlreadyPresent),
                    ProvisionReport::Fetched { bytes, .. } => (true, bytes, ProvisioningStatus::Fetched { bytes }),
                };
                self.emit(HarnessEventKind::Provisioned { path: path.clone(),
                                                          fetched,
                                                          bytes });
                (path, status)
            }
            Some(Err(e)) => {
                warn!("provision failed, continuing to probe: {e}");
                let reason = e.to_string();
                self.emit(HarnessEventKind::ProvisioningFailed { error: reason.clone() });
                (self.canonical_config.clone(), ProvisioningStatus::Failed { reason })
            }
            None => {
                let reason = "no provisioner configured".to_string();
                self.emit(HarnessEventKind::ProvisioningFailed { error: reason.clone() });
                (self.canonical_config.clone(), ProvisioningStatus::Failed { reason })
            }
        }
    }

    /// Sin símbolo no hay probe, pero un intento pudo fallar con la firma de
    /// la incompatibilidad al importar el módulo: ese intento gana. Si no, el
    /// fallo agregado del Locator (`resolution-failure`).
    fn diagnose_unresolved_model(&self, failure: &ResolutionFailure) -> (Fault, Diagnosis) {
        let ctx = ClassifierContext::default();
        failure.attempt_faults()
               .into_iter()
               .map(|fault| {
                   let diagnosis = self.classifier.classify(&fault, &ctx);
                   (fault, diagnosis)
               })
               .find(|(_, d)| d.is_known_incompatibility())
               .unwrap_or_else(|| {
                   let fault = failure.to_fault();
                   let diagnosis = self.classifier.classify(&fault, &ctx);
                   (fault, diagnosis)
               })
    }

    fn record_diagnosis(&mut self, outcome: &mut DiagnosticOutcome, fault: Fault, diagnosis: Diagnosis) {
        self.emit(HarnessEventKind::Diagnosed { category: diagnosis.category,
                                                matched_signature: diagnosis.matched_signature.clone(),
                                                line: diagnosis.line() });
        outcome.category = diagnosis.category;
        outcome.failed_stage = Some(fault.origin);
        outcome.fault_class = Some(fault.class);
        outcome.message = Some(fault.message);
        outcome.matched_signature = diagnosis.matched_signature;
    }

    fn record_misses(&mut self, locator: &Locator) {
        for attempt in locator.history().iter().filter(|a| !a.is_success()) {
            self.emit(HarnessEventKind::AttemptFailed { kind: locator.kind(),
                                                        strategy: attempt.strategy.clone(),
                                                        error: attempt.error.clone().unwrap_or_default() });
        }
    }

    fn enter(&mut self, next: HarnessState) {
        debug_assert!(self.state.can_transition_to(next), "transición inválida {} -> {}", self.state, next);
        debug!("driver: {} -> {}", self.state, next);
        self.state = next;
        self.trace.push(next);
        self.emit(HarnessEventKind::StateEntered { state: next });
    }

    fn emit(&mut self, kind: HarnessEventKind) { self.log.append_kind(self.run_id, kind); }

    fn finish(mut self, outcome: DiagnosticOutcome) -> HarnessRun<L> {
        self.enter(HarnessState::Done);
        self.emit(HarnessEventKind::RunFinished { status: outcome.status,
                                                  category: outcome.category });
        HarnessRun { outcome,
                     states: self.trace,
                     log: self.log }
    }
}
