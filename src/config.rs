use std::path::PathBuf;

use crate::data::model::MalaysianState;

pub const DATASET_ENV: &str = "HIES_DATASET";
pub const STATE_ENV: &str = "HIES_STATE";
pub const DEFAULT_DATASET: &str = "hies_district.csv";

/// Start-up settings read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// District table loaded at start-up.
    pub dataset_path: PathBuf,
    /// Initial value of the state dropdown.
    pub initial_state: MalaysianState,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET),
            initial_state: MalaysianState::Johor,
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = get(DATASET_ENV) {
            config.dataset_path = PathBuf::from(path);
        }
        if let Some(state) = get(STATE_ENV) {
            match state.parse() {
                Ok(st) => config.initial_state = st,
                Err(e) => log::warn!("{STATE_ENV}: {e}; using {}", config.initial_state),
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(
            DashboardConfig::from_lookup(lookup(&[])),
            DashboardConfig::default()
        );
    }

    #[test]
    fn reads_path_and_state() {
        let config = DashboardConfig::from_lookup(lookup(&[
            (DATASET_ENV, "/data/hies_2019.parquet"),
            (STATE_ENV, "Sarawak"),
        ]));
        assert_eq!(config.dataset_path, PathBuf::from("/data/hies_2019.parquet"));
        assert_eq!(config.initial_state, MalaysianState::Sarawak);
    }

    #[test]
    fn unknown_state_falls_back_to_johor() {
        let config =
            DashboardConfig::from_lookup(lookup(&[(STATE_ENV, "Narnia"), (DATASET_ENV, " ")]));
        assert_eq!(config.initial_state, MalaysianState::Johor);
        assert_eq!(config.dataset_path, PathBuf::from(DEFAULT_DATASET));
    }
}
