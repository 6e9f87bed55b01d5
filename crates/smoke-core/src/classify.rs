//! Failure Classifier.
//!
//! Convierte un `Fault` en una categoría de diagnóstico aplicando reglas en
//! orden fijo; la primera que aplica decide:
//! 1. `AttributeError` cuyo mensaje contiene una firma del alias entero
//!    eliminado ⇒ `environment-incompatibility` (sin importar la etapa).
//! 2. Fallo originado en el Locator ⇒ `resolution-failure`.
//! 3. Fichero inexistente durante construcción/inferencia cuando el `.cfg` no
//!    se resolvió y el aprovisionamiento falló ⇒ `resolution-failure`.
//! 4. Cualquier otro fallo de construcción/inferencia ⇒ `construction-failure`.
//! 5. Resto ⇒ `unknown`.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{ATTRIBUTE_ERROR_CLASS, FILE_NOT_FOUND_CLASS, LEGACY_INT_ALIAS_SIGNATURES, MISSING_FILE_MESSAGE};
use crate::errors::{Fault, FaultOrigin};

/// Categoría de diagnóstico de una ejecución.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    None,
    EnvironmentIncompatibility,
    ResolutionFailure,
    ConstructionFailure,
    Unknown,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::None => "none",
            Category::EnvironmentIncompatibility => "environment-incompatibility",
            Category::ResolutionFailure => "resolution-failure",
            Category::ConstructionFailure => "construction-failure",
            Category::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Estado de los artifacts en el momento del fallo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifierContext {
    pub config_resolved: bool,
    pub provisioning_failed: bool,
}

/// Resultado de clasificar un fallo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnosis {
    pub category: Category,
    pub origin: FaultOrigin,
    pub matched_signature: Option<String>,
}

impl Diagnosis {
    /// ¿Se reprodujo exactamente la incompatibilidad que se busca?
    pub fn is_known_incompatibility(&self) -> bool { self.category == Category::EnvironmentIncompatibility }

    /// Línea de diagnóstico legible para consola.
    pub fn line(&self) -> String {
        match &self.matched_signature {
            Some(sig) => format!("DIAGNOSIS: SUCCESS! Caught the known numeric-library incompatibility (signature `{sig}`)."),
            None => format!("DIAGNOSIS: {} during {}; known incompatibility signature not matched.",
                            self.category, self.origin),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    LegacyAlias,
    LocatorFault,
    MissingConfig,
    ConstructionFault,
}

const RULES: [Rule; 4] = [Rule::LegacyAlias, Rule::LocatorFault, Rule::MissingConfig, Rule::ConstructionFault];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureClassifier {
    signatures: Vec<String>,
}

impl Default for FailureClassifier {
    fn default() -> Self { Self::new(LEGACY_INT_ALIAS_SIGNATURES.iter().copied()) }
}

impl FailureClassifier {
    pub fn new<I, S>(signatures: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        Self { signatures: signatures.into_iter().map(Into::into).filter(|s: &String| !s.is_empty()).collect() }
    }

    /// Añade firmas extra conservando las existentes (sin duplicados).
    pub fn with_extra_signatures<I, S>(mut self, extra: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        for s in extra.into_iter().map(Into::into) {
            if !s.is_empty() && !self.signatures.contains(&s) {
                self.signatures.push(s);
            }
        }
        self
    }

    pub fn signatures(&self) -> &[String] { &self.signatures }

    /// Primera firma contenida en `message`.
    pub fn matched_signature(&self, message: &str) -> Option<&str> {
        self.signatures.iter().map(String::as_str).find(|sig| contains_signature(message, sig))
    }

    pub fn classify(&self, fault: &Fault, ctx: &ClassifierContext) -> Diagnosis {
        let diagnosis = RULES.iter()
                             .find_map(|rule| self.apply(*rule, fault, ctx))
                             .unwrap_or(Diagnosis { category: Category::Unknown,
                                                    origin: fault.origin,
                                                    matched_signature: None });
        debug!("classify: {} -> {}", fault, diagnosis.category);
        diagnosis
    }

    fn apply(&self, rule: Rule, fault: &Fault, ctx: &ClassifierContext) -> Option<Diagnosis> {
        let verdict = |category| Diagnosis { category,
                                             origin: fault.origin,
                                             matched_signature: None };
        let probing = matches!(fault.origin, FaultOrigin::Construction | FaultOrigin::Inference);
        match rule {
            Rule::LegacyAlias => {
                if !fault.is_class(ATTRIBUTE_ERROR_CLASS) {
                    return None;
                }
                self.matched_signature(&fault.message).map(|sig| Diagnosis { category: Category::EnvironmentIncompatibility,
                                                                             origin: fault.origin,
                                                                             matched_signature: Some(sig.to_string()) })
            }
            Rule::LocatorFault => (fault.origin == FaultOrigin::Locator).then(|| verdict(Category::ResolutionFailure)),
            Rule::MissingConfig => {
                (probing && !ctx.config_resolved && ctx.provisioning_failed && is_missing_file(fault)).then(|| verdict(Category::ResolutionFailure))
            }
            Rule::ConstructionFault => probing.then(|| verdict(Category::ConstructionFailure)),
        }
    }
}

/// ¿El fallo indica un fichero inexistente?
pub fn is_missing_file(fault: &Fault) -> bool {
    fault.is_class(FILE_NOT_FOUND_CLASS) || fault.message.contains(MISSING_FILE_MESSAGE)
}

/// Busca `needle` en `haystack` exigiendo que no continúe como identificador
/// (`np.int` no debe coincidir con `np.int64` ni con `np.int_`).
fn contains_signature(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(idx, _)| {
                                      haystack[idx + needle.len()..].chars()
                                                                    .next()
                                                                    .map_or(true, |c| !(c.is_alphanumeric() || c == '_'))
                                  })
}
