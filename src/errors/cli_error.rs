use thiserror::Error;

/// Errores al interpretar los argumentos de línea de comandos.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("Falta el valor de {0}")]
    MissingValue(String),
    #[error("Valor inválido para {flag}: '{value}'")]
    InvalidValue { flag: String, value: String },
    #[error("Argumento desconocido: {0}")]
    UnknownFlag(String),
}
