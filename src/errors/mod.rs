pub mod cli_error;
pub mod config_error;

pub use cli_error::CliError;
pub use config_error::ConfigError;

use smokeengine::BridgeError;
use std::path::PathBuf;
use thiserror::Error;

/// Fallos previos a la ejecución del harness (o al escribir su resultado).
/// El binario los convierte en código de salida 2.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Cli(#[from] CliError),
    #[error("Error de configuración: {0}")]
    Config(#[from] ConfigError),
    #[error("Error inicializando el intérprete Python: {0}")]
    Engine(#[from] BridgeError),
    #[error("Error serializando el resultado: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("No se pudo escribir {path}: {source}")]
    ResultFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
