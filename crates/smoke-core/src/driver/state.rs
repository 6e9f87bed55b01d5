use serde::{Deserialize, Serialize};
use std::fmt;

/// Estado del driver.
///
/// Las transiciones válidas son:
/// - `Start` -> `LocatingModel`
/// - `LocatingModel` -> `LocatingConfig` | `Done`
/// - `LocatingConfig` -> `ProvisioningConfig` | `Probing`
/// - `ProvisioningConfig` -> `Probing`
/// - `Probing` -> `Classifying` | `Done`
/// - `Classifying` -> `Done`
///
/// Sin ciclos ni reintentos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarnessState {
    Start,
    LocatingModel,
    LocatingConfig,
    ProvisioningConfig,
    Probing,
    Classifying,
    Done,
}

impl HarnessState {
    pub fn can_transition_to(self, next: HarnessState) -> bool {
        use HarnessState::*;
        matches!((self, next),
                 (Start, LocatingModel)
                 | (LocatingModel, LocatingConfig)
                 | (LocatingModel, Done)
                 | (LocatingConfig, ProvisioningConfig)
                 | (LocatingConfig, Probing)
                 | (ProvisioningConfig, Probing)
                 | (Probing, Classifying)
                 | (Probing, Done)
                 | (Classifying, Done))
    }

    pub fn is_terminal(self) -> bool { self == HarnessState::Done }
}

impl fmt::Display for HarnessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HarnessState::Start => "START",
            HarnessState::LocatingModel => "LOCATING_MODEL",
            HarnessState::LocatingConfig => "LOCATING_CONFIG",
            HarnessState::ProvisioningConfig => "PROVISIONING_CONFIG",
            HarnessState::Probing => "PROBING",
            HarnessState::Classifying => "CLASSIFYING",
            HarnessState::Done => "DONE",
        };
        f.write_str(s)
    }
}
