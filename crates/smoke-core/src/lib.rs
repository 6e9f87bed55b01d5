//! smoke-core: pipeline de resolución y diagnóstico del smoke test.
//!
//! Componentes (de hoja a raíz):
//! - `locator`: cadena ordenada de estrategias para localizar artifacts.
//! - `provision`: descarga idempotente del `.cfg` detrás de un `Fetcher`.
//! - `probe`: construcción + una inferencia sobre entrada sintética.
//! - `classify`: reglas ordenadas que asignan la categoría de diagnóstico.
//! - `driver`: orquestación, eventos y `DiagnosticOutcome`.
//!
//! El modelo y la red son colaboradores externos, detrás de `model` y de
//! `provision::Fetcher`.
pub mod classify;
pub mod constants;
pub mod driver;
pub mod errors;
pub mod event;
pub mod locator;
pub mod model;
pub mod outcome;
pub mod probe;
pub mod provision;

pub use classify::{Category, ClassifierContext, Diagnosis, FailureClassifier};
pub use driver::{HarnessDriver, HarnessDriverBuilder, HarnessRun, HarnessState};
pub use errors::{Fault, FaultOrigin};
pub use event::{EventLog, HarnessEvent, HarnessEventKind, InMemoryEventLog};
pub use locator::{ArtifactKind, ConfigPathStrategy, FnStrategy, Locator, ResolutionAttempt, ResolutionFailure,
                  ResolutionStrategy, ResolvedArtifact, StrategyMiss};
pub use model::{InputSpec, ModelConstructor, ModelFault, ModelInstance, ModelStrategy, OutputDescriptor};
pub use outcome::{DiagnosticOutcome, ProvisioningStatus, Status};
pub use probe::{ConstructionProbe, ProbePhase};
pub use provision::{FetchError, Fetcher, ProvisionReport, Provisioner, ProvisioningFailure};
