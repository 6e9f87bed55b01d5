//! Fallos observables del harness.
//!
//! `Fault` es la forma neutral de cualquier error por debajo del driver: la
//! clase y el mensaje se conservan tal cual los produjo el colaborador y sólo
//! se añade la etapa de origen. El clasificador trabaja exclusivamente sobre
//! este tipo.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Etapa donde se originó un fallo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FaultOrigin {
    Locator,
    Provisioner,
    Construction,
    Inference,
}

impl fmt::Display for FaultOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FaultOrigin::Locator => "locator",
            FaultOrigin::Provisioner => "provisioner",
            FaultOrigin::Construction => "construction",
            FaultOrigin::Inference => "inference",
        };
        f.write_str(s)
    }
}

/// Fallo con su etapa de origen, clase (p.ej. `AttributeError`) y mensaje.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("[{origin}] {class}: {message}")]
pub struct Fault {
    pub origin: FaultOrigin,
    pub class: String,
    pub message: String,
}

impl Fault {
    pub fn new(origin: FaultOrigin, class: impl Into<String>, message: impl Into<String>) -> Self {
        Self { origin,
               class: class.into(),
               message: message.into() }
    }

    pub fn is_class(&self, class: &str) -> bool { self.class == class }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_display_includes_origin_class_and_message() {
        let f = Fault::new(FaultOrigin::Construction, "AttributeError", "module 'numpy' has no attribute 'int'");
        assert_eq!(f.to_string(), "[construction] AttributeError: module 'numpy' has no attribute 'int'");
        assert!(f.is_class("AttributeError"));
    }

    #[test]
    fn fault_origin_serializes_kebab_case() {
        let v = serde_json::to_value(FaultOrigin::Inference).unwrap();
        assert_eq!(v, serde_json::json!("inference"));
    }
}
