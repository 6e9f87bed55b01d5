//! Estrategias de resolución del `.cfg` del modelo.
//!
//! Sólo comprueban existencia en disco; cargar el fichero es trabajo del
//! colaborador del modelo durante la construcción.

use std::fs;
use std::path::{Path, PathBuf};

use super::{ResolutionStrategy, StrategyMiss};

/// Ruta canónica (layout plano): `<root>/config/<name>.cfg`.
pub fn canonical_config_path(root: &Path, name: &str) -> PathBuf {
    root.join("config").join(format!("{name}.cfg"))
}

/// Ruta del layout empaquetado: `<root>/<package>/config/<name>.cfg`.
pub fn packaged_config_path(root: &Path, package: &str, name: &str) -> PathBuf {
    root.join(package).join("config").join(format!("{name}.cfg"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPathStrategy {
    id: &'static str,
    path: PathBuf,
}

impl ConfigPathStrategy {
    pub const ROOT_ID: &'static str = "root-config";
    pub const PACKAGED_ID: &'static str = "packaged-config";

    pub fn root(root: &Path, name: &str) -> Self {
        Self { id: Self::ROOT_ID,
               path: canonical_config_path(root, name) }
    }

    pub fn packaged(root: &Path, package: &str, name: &str) -> Self {
        Self { id: Self::PACKAGED_ID,
               path: packaged_config_path(root, package, name) }
    }

    pub fn path(&self) -> &Path { &self.path }
}

impl ResolutionStrategy<PathBuf> for ConfigPathStrategy {
    fn id(&self) -> &str { self.id }

    fn attempt(&self) -> Result<PathBuf, StrategyMiss> {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.is_file() => Ok(self.path.clone()),
            Ok(_) => Err(StrategyMiss::new(format!("{} exists but is not a file", self.path.display()))),
            Err(e) => Err(StrategyMiss::new(format!("{}: {e}", self.path.display()))),
        }
    }
}

/// Orden fijo: ruta canónica y luego la del paquete.
pub fn config_path_strategies(root: &Path, package: &str, name: &str) -> Vec<Box<dyn ResolutionStrategy<PathBuf>>> {
    vec![Box::new(ConfigPathStrategy::root(root, name)),
         Box::new(ConfigPathStrategy::packaged(root, package, name)),]
}
