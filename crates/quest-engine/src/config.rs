//! Engine configuration.
//!
//! Holds the run parameters of the headless driver and the embedded `[sim]`
//! tunables. Configuration can be loaded from and saved to a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use quest_gameplay::{SimConfig, BUILTIN_LEVELS};

/// Configuration file name.
const CONFIG_FILE: &str = "quest.toml";

/// Environment variable that overrides the config file path.
pub const CONFIG_ENV: &str = "QUEST_CONFIG";

/// How the run report is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// One JSON object
    Json,
}

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Run Settings ===
    /// Level the run starts on
    pub start_level: u32,
    /// RNG seed (None = derived from the clock)
    pub seed: Option<u64>,
    /// Tick limit per level attempt
    pub max_ticks_per_level: u64,
    /// Frame delta passed to every tick
    pub fixed_dt: f32,
    /// Game overs tolerated before the run stops
    pub max_retries: u32,

    // === Content ===
    /// Directory searched for `levelN.ron` overrides
    pub level_dir: Option<PathBuf>,

    // === Output ===
    /// Report format
    pub report_format: ReportFormat,

    // === Simulation ===
    /// Gameplay tunables
    pub sim: SimConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // Run
            start_level: 1,
            seed: None,
            max_ticks_per_level: 60 * 60 * 5, // 5 minutes
            fixed_dt: 1.0,
            max_retries: 3,

            // Content
            level_dir: None,

            // Output
            report_format: ReportFormat::Text,

            // Simulation
            sim: SimConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read config file: {e}");
                    return Self::default();
                }

                match toml::from_str(&contents) {
                    Ok(config) => {
                        info!("Loaded config from {}", path.display());
                        config
                    },
                    Err(e) => {
                        warn!("Failed to parse config file: {e}");
                        Self::default()
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// The config file path: `$QUEST_CONFIG`, or `quest.toml` in the working directory.
    pub fn config_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV).map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from)
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.start_level = self.start_level.clamp(1, BUILTIN_LEVELS);
        self.max_ticks_per_level = self.max_ticks_per_level.clamp(60, 60 * 60 * 60);
        if !self.fixed_dt.is_finite() {
            warn!("fixed_dt is not finite, using 1.0");
            self.fixed_dt = 1.0;
        }
        self.fixed_dt = self.fixed_dt.clamp(0.1, 3.0);
        self.max_retries = self.max_retries.min(100);
        self.sim.validate();
    }

    /// The configured seed, or one derived from the clock.
    #[must_use]
    pub fn resolved_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map_or(0, |d| d.as_nanos() as u64)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.start_level, 1);
        assert_eq!(config.fixed_dt, 1.0);
        assert_eq!(config.report_format, ReportFormat::Text);
        assert_eq!(config.sim, SimConfig::default());
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig::default();

        config.start_level = 40;
        config.fixed_dt = f32::NAN;
        config.max_ticks_per_level = 0;
        config.sim.coin_chance = 3.0;

        config.validate();

        assert_eq!(config.start_level, BUILTIN_LEVELS);
        assert_eq!(config.fixed_dt, 1.0);
        assert_eq!(config.max_ticks_per_level, 60);
        assert_eq!(config.sim.coin_chance, 1.0);
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("quest.toml");

        let mut config = EngineConfig::default();
        config.start_level = 4;
        config.seed = Some(12345);
        config.report_format = ReportFormat::Json;
        config.sim.gravity = 1.5;

        config.save_to(&config_path).expect("Failed to save config");

        let loaded = EngineConfig::load_from(&config_path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = EngineConfig::load_from("/nonexistent/path/quest.toml");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_config_load_invalid_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("quest.toml");
        fs::write(&config_path, "start_level = \"first\"").expect("write");

        let config = EngineConfig::load_from(&config_path);
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            start_level = 2
            report_format = "json"

            [sim]
            coin_chance = 0.5
            "#,
        )
        .expect("Failed to parse");

        assert_eq!(config.start_level, 2);
        assert_eq!(config.report_format, ReportFormat::Json);
        assert_eq!(config.sim.coin_chance, 0.5);
        assert_eq!(config.sim.gravity, SimConfig::default().gravity);
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_fixed_seed_is_used() {
        let config = EngineConfig {
            seed: Some(9),
            ..EngineConfig::default()
        };
        assert_eq!(config.resolved_seed(), 9);
    }
}
