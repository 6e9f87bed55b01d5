use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Valor inválido para {key}: '{value}' ({reason})")]
    Invalid { key: String, value: String, reason: String },
    #[error("{key} no puede estar vacío")]
    Empty { key: String },
    #[error("Tamaño de imagen inválido: {0} (debe ser un múltiplo positivo de 32)")]
    ImgSize(u32),
}
