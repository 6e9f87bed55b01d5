//! Artifact Locator.
//!
//! Resuelve un artifact (símbolo del modelo o ruta del `.cfg`) probando una
//! lista ordenada de estrategias. Reglas:
//! - La primera estrategia con éxito gana; las siguientes no se evalúan.
//! - Un fallo de una estrategia se registra (id + causa) y se continúa.
//! - Si todas fallan se devuelve `ResolutionFailure` con el historial completo.

pub mod config_path;
mod strategy;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::errors::{Fault, FaultOrigin};

pub use config_path::{canonical_config_path, config_path_strategies, packaged_config_path, ConfigPathStrategy};
pub use strategy::{FnStrategy, ResolutionStrategy, StrategyMiss};

/// Tipo de artifact requerido.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    ModelSymbol,
    ConfigPath,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::ModelSymbol => f.write_str("model-symbol"),
            ArtifactKind::ConfigPath => f.write_str("config-path"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttemptOutcome {
    Success,
    Failure,
}

/// Un intento de una estrategia concreta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionAttempt {
    pub strategy: String,
    pub outcome: AttemptOutcome,
    pub error: Option<String>,
    #[serde(default)]
    pub error_class: Option<String>,
}

impl ResolutionAttempt {
    fn succeeded(strategy: &str) -> Self {
        Self { strategy: strategy.to_string(),
               outcome: AttemptOutcome::Success,
               error: None,
               error_class: None }
    }

    fn failed(strategy: &str, miss: StrategyMiss) -> Self {
        Self { strategy: strategy.to_string(),
               outcome: AttemptOutcome::Failure,
               error: Some(miss.reason),
               error_class: miss.class }
    }

    pub fn is_success(&self) -> bool { self.outcome == AttemptOutcome::Success }
}

/// Artifact resuelto junto con la estrategia que lo encontró.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact<T> {
    pub kind: ArtifactKind,
    pub value: T,
    pub strategy: String,
}

/// Ninguna estrategia resolvió el artifact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no strategy resolved {kind} ({})", render_attempts(.attempts))]
pub struct ResolutionFailure {
    pub kind: ArtifactKind,
    pub attempts: Vec<ResolutionAttempt>,
}

impl ResolutionFailure {
    /// Un `Fault` del Locator por cada intento fallido, con la clase del
    /// error original si la estrategia la conocía.
    pub fn attempt_faults(&self) -> Vec<Fault> {
        self.attempts
            .iter()
            .filter(|a| !a.is_success())
            .map(|a| {
                Fault::new(FaultOrigin::Locator,
                           a.error_class.as_deref().unwrap_or(RESOLUTION_FAILURE_CLASS),
                           a.error.as_deref().unwrap_or_default())
            })
            .collect()
    }

    /// El fallo agregado (todas las estrategias) como `Fault` del Locator.
    pub fn to_fault(&self) -> Fault { Fault::new(FaultOrigin::Locator, RESOLUTION_FAILURE_CLASS, self.to_string()) }
}

/// Clase usada para los fallos de resolución sin error subyacente.
pub const RESOLUTION_FAILURE_CLASS: &str = "ResolutionFailure";

fn render_attempts(attempts: &[ResolutionAttempt]) -> String {
    if attempts.is_empty() {
        return "no strategies configured".to_string();
    }
    let tried: Vec<String> = attempts.iter()
                                     .map(|a| format!("{}: {}", a.strategy, a.error.as_deref().unwrap_or("ok")))
                                     .collect();
    format!("tried: {}", tried.join("; "))
}

/// Recorre estrategias en orden de prioridad y conserva el historial del
/// último `resolve`.
#[derive(Debug, Clone)]
pub struct Locator {
    kind: ArtifactKind,
    history: Vec<ResolutionAttempt>,
}

impl Locator {
    pub fn new(kind: ArtifactKind) -> Self { Self { kind, history: Vec::new() } }

    pub fn kind(&self) -> ArtifactKind { self.kind }

    /// Intentos del último `resolve`, incluido el exitoso si lo hubo.
    pub fn history(&self) -> &[ResolutionAttempt] { &self.history }

    pub fn resolve<T>(&mut self, strategies: &[Box<dyn ResolutionStrategy<T>>]) -> Result<ResolvedArtifact<T>, ResolutionFailure> {
        self.history.clear();
        for strategy in strategies {
            match strategy.attempt() {
                Ok(value) => {
                    info!("locate:{} resolved via {}", self.kind, strategy.id());
                    self.history.push(ResolutionAttempt::succeeded(strategy.id()));
                    return Ok(ResolvedArtifact { kind: self.kind,
                                                 value,
                                                 strategy: strategy.id().to_string() });
                }
                Err(miss) => {
                    warn!("locate:{} strategy {} missed: {}", self.kind, strategy.id(), miss);
                    self.history.push(ResolutionAttempt::failed(strategy.id(), miss));
                }
            }
        }
        Err(ResolutionFailure { kind: self.kind,
                                attempts: self.history.clone() })
    }
}
