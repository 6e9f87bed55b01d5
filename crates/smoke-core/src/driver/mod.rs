//! Harness Driver: máquina de estados lineal de una ejecución.
//!
//! `START → LOCATING_MODEL → LOCATING_CONFIG → (PROVISIONING_CONFIG)? →
//! PROBING → (CLASSIFYING)? → DONE`. Una única pasada, sin reintentos.

pub mod builder;
pub mod core;
mod state;

pub use builder::HarnessDriverBuilder;
pub use self::core::{HarnessDriver, HarnessRun};
pub use state::HarnessState;
