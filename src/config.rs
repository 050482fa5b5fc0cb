//! Planner configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration for the evacuation planner.
///
/// Controls where the scenario file lives and a couple of reporting knobs.
/// All fields have sensible defaults so a missing or partial file works.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Path of the scenario file commands load and save.
    #[serde(default = "default_scenario")]
    pub scenario: PathBuf,

    /// How many zones the critical-zones report shows.
    #[serde(default = "default_top_critical")]
    pub top_critical: usize,

    /// Whether the queue is re-scored automatically after every planning
    /// command.
    #[serde(default = "default_auto_reprioritize")]
    pub auto_reprioritize: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scenario: default_scenario(),
            top_critical: default_top_critical(),
            auto_reprioritize: default_auto_reprioritize(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Loads the configuration from the given path, falling back to the
    /// defaults when the file is absent or unreadable.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(error) => {
                tracing::debug!(%error, "using default configuration");
                Self::default()
            }
        }
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or
    /// if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }
}

fn default_scenario() -> PathBuf {
    PathBuf::from("scenario.json")
}

const fn default_top_critical() -> usize {
    5
}

const fn default_auto_reprioritize() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"scenario = \"plans/city.json\"\ntop_critical = 3\nauto_reprioritize = false\n")
            .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.scenario, PathBuf::from("plans/city.json"));
        assert_eq!(config.top_critical, 3);
        assert!(!config.auto_reprioritize);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config: Config = toml::from_str("top_critical = 10").unwrap();
        assert_eq!(config.top_critical, 10);
        assert_eq!(config.scenario, PathBuf::from("scenario.json"));
        assert!(config.auto_reprioritize);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        assert!(Config::load(&missing).is_err());
        assert_eq!(Config::load_or_default(&missing), Config::default());
    }

    #[test]
    fn round_trips_through_save() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("planner.toml");

        let mut config = Config::default();
        config.top_critical = 7;
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
