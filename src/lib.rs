//! darknet-smoke: configuración, salida de consola y cableado del harness.
//!
//! La lógica de resolución y diagnóstico vive en `smoke-core`; el acceso al
//! modelo Python en `smokeengine`; la descarga del `.cfg` en `smoke-adapters`.
pub mod cli;
pub mod config;
pub mod errors;
pub mod report;
pub mod wiring;

pub use cli::{CliArgs, USAGE};
pub use config::HarnessConfig;
pub use errors::{BootstrapError, CliError, ConfigError};
pub use report::{render_event, ConsoleEventLog};
