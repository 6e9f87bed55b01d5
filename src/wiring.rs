//! Cableado de producción: intérprete Python, estrategias, fetcher y probe a
//! partir de un `HarnessConfig`.

use log::info;

use smoke_adapters::SchemeFetcher;
use smoke_core::locator::config_path_strategies;
use smoke_core::{ConstructionProbe, EventLog, FailureClassifier, HarnessDriver, Provisioner};
use smokeengine::{BridgeError, ProbeEngine};

use crate::config::HarnessConfig;

/// Intérprete según la feature activa; el directorio de trabajo es la raíz.
pub fn probe_engine(cfg: &HarnessConfig) -> Result<ProbeEngine, BridgeError> {
    #[cfg(feature = "embedded-python")]
    {
        info!("engine: embedded python, workdir={}", cfg.root.display());
        ProbeEngine::embedded(&cfg.root)
    }
    #[cfg(not(feature = "embedded-python"))]
    {
        info!("engine: {} subprocess, workdir={}", cfg.python, cfg.root.display());
        Ok(ProbeEngine::subprocess(cfg.python.clone(), &cfg.root))
    }
}

pub fn provisioner(cfg: &HarnessConfig) -> Provisioner {
    let p = Provisioner::new(Box::new(SchemeFetcher::new(cfg.fetch_timeout)),
                             cfg.config_url.clone(),
                             cfg.canonical_config_path());
    match &cfg.config_sha256 {
        Some(sum) => p.with_checksum(sum.clone()),
        None => p,
    }
}

pub fn build_driver<L: EventLog>(cfg: &HarnessConfig, engine: &ProbeEngine, log: L) -> HarnessDriver<L> {
    HarnessDriver::builder_with_log(log).model_strategies(engine.model_strategies(&cfg.package, &cfg.root_module, &cfg.model_symbol))
                                        .config_strategies(config_path_strategies(&cfg.root, &cfg.package, &cfg.config_name))
                                        .canonical_config(cfg.canonical_config_path())
                                        .provisioner(provisioner(cfg))
                                        .probe(ConstructionProbe::new(cfg.img_size).with_seed(cfg.seed))
                                        .classifier(FailureClassifier::default().with_extra_signatures(cfg.extra_signatures.clone()))
                                        .build()
}
