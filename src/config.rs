//! Configuración del harness.
//! Carga `.env` una sola vez y lee variables `SMOKE_*`; los flags de línea de
//! comandos tienen prioridad sobre el entorno.
use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use smoke_core::constants::{DEFAULT_CONFIG_NAME, DEFAULT_CONFIG_URL, DEFAULT_INPUT_SIZE, DEFAULT_MODEL_SYMBOL, DEFAULT_PACKAGE,
                            DEFAULT_ROOT_MODULE};
use smoke_core::locator::canonical_config_path;

use crate::cli::CliArgs;
use crate::errors::ConfigError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PYTHON: &str = "python3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Raíz del checkout; directorio de trabajo del intérprete Python.
    pub root: PathBuf,
    pub config_name: String,
    pub package: String,
    pub root_module: String,
    pub model_symbol: String,
    pub config_url: String,
    pub config_sha256: Option<String>,
    pub img_size: u32,
    pub seed: u64,
    pub fetch_timeout: Duration,
    pub python: String,
    /// Firmas adicionales de la incompatibilidad (`SMOKE_SIGNATURES`, separadas por `;`).
    pub extra_signatures: Vec<String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self { root: PathBuf::from("."),
               config_name: DEFAULT_CONFIG_NAME.to_string(),
               package: DEFAULT_PACKAGE.to_string(),
               root_module: DEFAULT_ROOT_MODULE.to_string(),
               model_symbol: DEFAULT_MODEL_SYMBOL.to_string(),
               config_url: DEFAULT_CONFIG_URL.to_string(),
               config_sha256: None,
               img_size: DEFAULT_INPUT_SIZE,
               seed: 0,
               fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
               python: DEFAULT_PYTHON.to_string(),
               extra_signatures: Vec::new() }
    }
}

impl HarnessConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        // asegura que .env se haya cargado
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables arbitraria.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
        where F: Fn(&str) -> Option<String>
    {
        let mut cfg = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string());

        if let Some(v) = get("SMOKE_ROOT") {
            cfg.root = PathBuf::from(non_empty("SMOKE_ROOT", v)?);
        }
        for (key, slot) in [("SMOKE_CONFIG_NAME", &mut cfg.config_name),
                            ("SMOKE_PACKAGE", &mut cfg.package),
                            ("SMOKE_ROOT_MODULE", &mut cfg.root_module),
                            ("SMOKE_MODEL_SYMBOL", &mut cfg.model_symbol),
                            ("SMOKE_CONFIG_URL", &mut cfg.config_url),
                            ("SMOKE_PYTHON", &mut cfg.python)]
        {
            if let Some(v) = get(key) {
                *slot = non_empty(key, v)?;
            }
        }
        cfg.config_sha256 = get("SMOKE_CONFIG_SHA256").filter(|v| !v.is_empty());
        if let Some(v) = get("SMOKE_IMG_SIZE") {
            cfg.img_size = parse_num("SMOKE_IMG_SIZE", &v)?;
        }
        if let Some(v) = get("SMOKE_SEED") {
            cfg.seed = parse_num("SMOKE_SEED", &v)?;
        }
        if let Some(v) = get("SMOKE_FETCH_TIMEOUT_SECS") {
            let secs: u64 = parse_num("SMOKE_FETCH_TIMEOUT_SECS", &v)?;
            if secs == 0 {
                return Err(ConfigError::Invalid { key: "SMOKE_FETCH_TIMEOUT_SECS".into(),
                                                  value: v,
                                                  reason: "must be greater than zero".into() });
            }
            cfg.fetch_timeout = Duration::from_secs(secs);
        }
        if let Some(v) = get("SMOKE_SIGNATURES") {
            cfg.extra_signatures = v.split(';').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect();
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Aplica los flags de línea de comandos y vuelve a validar.
    pub fn apply_cli(mut self, args: &CliArgs) -> Result<Self, ConfigError> {
        if let Some(root) = &args.root {
            self.root = root.clone();
        }
        if let Some(size) = args.img_size {
            self.img_size = size;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.img_size == 0 || self.img_size % 32 != 0 {
            return Err(ConfigError::ImgSize(self.img_size));
        }
        Ok(())
    }

    /// `<root>/config/<config_name>.cfg`: destino del aprovisionamiento.
    pub fn canonical_config_path(&self) -> PathBuf { canonical_config_path(&self.root, &self.config_name) }
}

fn non_empty(key: &str, value: String) -> Result<String, ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Empty { key: key.to_string() });
    }
    Ok(value)
}

fn parse_num<T>(key: &str, raw: &str) -> Result<T, ConfigError>
    where T: FromStr,
          T::Err: std::fmt::Display
{
    raw.parse::<T>().map_err(|e| ConfigError::Invalid { key: key.to_string(),
                                                        value: raw.to_string(),
                                                        reason: e.to_string() })
}

/// Forzar carga temprana de .env desde el binario.
pub fn init_dotenv() { Lazy::force(&DOTENV_LOADED); }

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<HarnessConfig, ConfigError> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        HarnessConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = from_pairs(&[]).unwrap();
        assert_eq!(cfg, HarnessConfig::default());
        assert_eq!(cfg.img_size, 416);
        assert_eq!(cfg.canonical_config_path(), PathBuf::from("./config/yolov3.cfg"));
    }

    #[test]
    fn reads_overrides() {
        let cfg = from_pairs(&[("SMOKE_ROOT", "/opt/yolo"),
                               ("SMOKE_IMG_SIZE", "608"),
                               ("SMOKE_SEED", "7"),
                               ("SMOKE_FETCH_TIMEOUT_SECS", "5"),
                               ("SMOKE_CONFIG_SHA256", ""),
                               ("SMOKE_SIGNATURES", "np.float; ;np.bool")]).unwrap();
        assert_eq!(cfg.root, PathBuf::from("/opt/yolo"));
        assert_eq!(cfg.img_size, 608);
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.fetch_timeout, Duration::from_secs(5));
        assert_eq!(cfg.config_sha256, None);
        assert_eq!(cfg.extra_signatures, vec!["np.float".to_string(), "np.bool".to_string()]);
        assert_eq!(cfg.canonical_config_path(), PathBuf::from("/opt/yolo/config/yolov3.cfg"));
    }

    #[test]
    fn invalid_numbers_are_errors_not_defaults() {
        assert!(matches!(from_pairs(&[("SMOKE_IMG_SIZE", "big")]), Err(ConfigError::Invalid { .. })));
        assert_eq!(from_pairs(&[("SMOKE_IMG_SIZE", "400")]), Err(ConfigError::ImgSize(400)));
        assert!(matches!(from_pairs(&[("SMOKE_FETCH_TIMEOUT_SECS", "0")]), Err(ConfigError::Invalid { .. })));
        assert_eq!(from_pairs(&[("SMOKE_PACKAGE", " ")]), Err(ConfigError::Empty { key: "SMOKE_PACKAGE".into() }));
    }

    #[test]
    fn cli_flags_override_environment() {
        let cfg = from_pairs(&[("SMOKE_ROOT", "/env")]).unwrap();
        let args = CliArgs { root: Some(PathBuf::from("/cli")),
                             img_size: Some(320),
                             ..CliArgs::default() };
        let cfg = cfg.apply_cli(&args).unwrap();
        assert_eq!(cfg.root, PathBuf::from("/cli"));
        assert_eq!(cfg.img_size, 320);

        let bad = CliArgs { img_size: Some(33),
                            ..CliArgs::default() };
        assert_eq!(HarnessConfig::default().apply_cli(&bad), Err(ConfigError::ImgSize(33)));
    }
}
