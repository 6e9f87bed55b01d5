//! Artifact Provisioner.
//!
//! Descarga el `.cfg` versionado desde una fuente remota hacia la ruta
//! canónica cuando ninguna estrategia lo encontró en disco.
//!
//! Garantías:
//! - Idempotente: si el destino ya es un fichero no se descarga nada.
//! - Atómico: se escribe `<destino>.part` y luego se renombra; un fallo nunca
//!   deja un `.cfg` parcial o vacío en la ruta canónica.
//! - Opcionalmente verifica el SHA-256 del cuerpo descargado.
//!
//! Un fallo aquí no es fatal: el driver continúa hacia el probe.

use log::{info, warn};
use sha2::{Digest, Sha256};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("timeout fetching {url}")]
    Timeout { url: String },
    #[error("HTTP {status} fetching {url}")]
    Status { url: String, status: u16 },
    #[error("transport error fetching {url}: {detail}")]
    Transport { url: String, detail: String },
    #[error("body of {url} exceeds {limit} bytes")]
    TooLarge { url: String, limit: u64 },
    #[error("unsupported url scheme: {0}")]
    UnsupportedUrl(String),
    #[error("IO error reading {url}: {source}")]
    Io {
        url: String,
        #[source]
        source: io::Error,
    },
}

/// Obtiene el cuerpo de un documento remoto. Sustituible por fakes en tests.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionReport {
    AlreadyPresent { path: PathBuf },
    Fetched { path: PathBuf, bytes: usize },
}

impl ProvisionReport {
    pub fn path(&self) -> &Path {
        match self {
            ProvisionReport::AlreadyPresent { path } | ProvisionReport::Fetched { path, .. } => path,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProvisioningFailure {
    #[error("could not create directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("empty body from {url}")]
    EmptyBody { url: String },
    #[error("checksum mismatch for {url}: expected {expected}, got {actual}")]
    ChecksumMismatch { url: String, expected: String, actual: String },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub struct Provisioner {
    fetcher: Box<dyn Fetcher>,
    url: String,
    target: PathBuf,
    expected_sha256: Option<String>,
}

impl Provisioner {
    pub fn new(fetcher: Box<dyn Fetcher>, url: impl Into<String>, target: impl Into<PathBuf>) -> Self {
        Self { fetcher,
               url: url.into(),
               target: target.into(),
               expected_sha256: None }
    }

    /// Exige que el cuerpo descargado tenga este SHA-256 (hex).
    pub fn with_checksum(mut self, sha256_hex: impl Into<String>) -> Self {
        self.expected_sha256 = Some(sha256_hex.into().to_ascii_lowercase());
        self
    }

    pub fn url(&self) -> &str { &self.url }

    pub fn target(&self) -> &Path { &self.target }

    pub fn provision(&self) -> Result<ProvisionReport, ProvisioningFailure> {
        if self.target.is_file() {
            info!("provision: {} already present, skipping fetch", self.target.display());
            return Ok(ProvisionReport::AlreadyPresent { path: self.target.clone() });
        }
        if let Some(dir) = self.target.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| ProvisioningFailure::Directory { path: dir.to_path_buf(), source })?;
        }

        let body = self.fetcher.fetch(&self.url).inspect_err(|e| warn!("provision: fetch failed: {e}"))?;
        if body.is_empty() {
            return Err(ProvisioningFailure::EmptyBody { url: self.url.clone() });
        }
        if let Some(expected) = &self.expected_sha256 {
            let actual = sha256_hex(&body);
            if &actual != expected {
                return Err(ProvisioningFailure::ChecksumMismatch { url: self.url.clone(),
                                                                   expected: expected.clone(),
                                                                   actual });
            }
        }

        let part = part_path(&self.target);
        let written = fs::write(&part, &body).and_then(|_| fs::rename(&part, &self.target));
        if let Err(source) = written {
            let _ = fs::remove_file(&part);
            return Err(ProvisioningFailure::Write { path: self.target.clone(), source });
        }
        info!("provision: fetched {} bytes from {} into {}", body.len(), self.url, self.target.display());
        Ok(ProvisionReport::Fetched { path: self.target.clone(),
                                      bytes: body.len() })
    }
}

/// SHA-256 en hex minúsculas.
pub fn sha256_hex(bytes: &[u8]) -> String { format!("{:x}", Sha256::digest(bytes)) }

fn part_path(target: &Path) -> PathBuf {
    let mut name = OsString::from(target.as_os_str());
    name.push(".part");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_of_known_input() {
        assert_eq!(sha256_hex(b"abc"), "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
    }

    #[test]
    fn part_file_sits_next_to_target() {
        assert_eq!(part_path(Path::new("config/yolov3.cfg")), PathBuf::from("config/yolov3.cfg.part"));
    }
}
