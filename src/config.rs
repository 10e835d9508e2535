//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/mlmsim/mlmsim.toml`
//! 3. Local config: `<project_dir>/.mlmsim.toml`
//! 4. Environment variables: `MLMSIM_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{lookup_tier, DEFAULT_FIRST_GEN_COUNT, DEFAULT_OTHER_GEN_COUNT};

/// Simulation defaults used when the caller leaves an input out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Tier used when none is given
    pub default_tier: String,
    /// BV per affiliate for generated downlines
    pub bv_per_affiliate: f64,
    /// Generations simulated when none is given
    pub generations: u32,
    /// Affiliates in generation one of a generated downline
    pub first_gen_count: u32,
    /// Affiliates in every later generation of a generated downline
    pub other_gen_count: u32,
    /// Upper bound on simulated generations
    pub max_generations: u32,
    /// Team bonus payout ceiling, off unless set
    pub daily_cap: Option<f64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_tier: "Pre-Junior".into(),
            bv_per_affiliate: 200.0,
            generations: 3,
            first_gen_count: DEFAULT_FIRST_GEN_COUNT,
            other_gen_count: DEFAULT_OTHER_GEN_COUNT,
            max_generations: 6,
            daily_cap: None,
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub default_tier: Option<String>,
    pub bv_per_affiliate: Option<f64>,
    pub generations: Option<u32>,
    pub first_gen_count: Option<u32>,
    pub other_gen_count: Option<u32>,
    pub max_generations: Option<u32>,
    pub daily_cap: Option<f64>,
}

/// Get the XDG config directory for mlmsim.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "mlmsim").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("mlmsim.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".mlmsim.toml")
}

/// Expand `~`, `$VAR` and `${VAR}` in a path.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            default_tier: overlay
                .default_tier
                .clone()
                .unwrap_or_else(|| self.default_tier.clone()),
            bv_per_affiliate: overlay.bv_per_affiliate.unwrap_or(self.bv_per_affiliate),
            generations: overlay.generations.unwrap_or(self.generations),
            first_gen_count: overlay.first_gen_count.unwrap_or(self.first_gen_count),
            other_gen_count: overlay.other_gen_count.unwrap_or(self.other_gen_count),
            max_generations: overlay.max_generations.unwrap_or(self.max_generations),
            daily_cap: overlay.daily_cap.or(self.daily_cap),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional directory holding a local `.mlmsim.toml`
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = project_dir {
            let local_path = local_config_path(&expand_path(dir));
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;
        Ok(current)
    }

    /// Load settings from one explicit file on top of the defaults.
    pub fn load_file(path: &Path) -> Result<Self, ApplicationError> {
        let raw = load_raw_settings(&expand_path(path))?;
        let settings = Self::default().merge_with(&raw);
        settings.validate()?;
        Ok(settings)
    }

    /// Apply MLMSIM_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("MLMSIM")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;
        Self::apply_overrides_from(settings, &config)
    }

    fn apply_overrides_from(mut settings: Self, config: &Config) -> Result<Self, ApplicationError> {
        if let Ok(val) = config.get_string("default_tier") {
            settings.default_tier = val;
        }
        if let Some(val) = get_opt(config, "bv_per_affiliate", Config::get_float)? {
            settings.bv_per_affiliate = val;
        }
        if let Some(val) = get_opt(config, "generations", get_u32)? {
            settings.generations = val;
        }
        if let Some(val) = get_opt(config, "first_gen_count", get_u32)? {
            settings.first_gen_count = val;
        }
        if let Some(val) = get_opt(config, "other_gen_count", get_u32)? {
            settings.other_gen_count = val;
        }
        if let Some(val) = get_opt(config, "max_generations", get_u32)? {
            settings.max_generations = val;
        }
        if let Some(val) = get_opt(config, "daily_cap", Config::get_float)? {
            settings.daily_cap = Some(val);
        }
        Ok(settings)
    }

    /// Reject settings the engine would refuse later anyway.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        lookup_tier(&self.default_tier).map_err(|e| ApplicationError::Config {
            message: format!("default_tier: {e}"),
        })?;
        if !self.bv_per_affiliate.is_finite() || self.bv_per_affiliate < 0.0 {
            return Err(ApplicationError::Config {
                message: format!(
                    "bv_per_affiliate must be non-negative, got {}",
                    self.bv_per_affiliate
                ),
            });
        }
        if let Some(cap) = self.daily_cap {
            if !cap.is_finite() || cap < 0.0 {
                return Err(ApplicationError::Config {
                    message: format!("daily_cap must be non-negative, got {cap}"),
                });
            }
        }
        if self.generations > self.max_generations {
            return Err(ApplicationError::Config {
                message: format!(
                    "generations ({}) exceeds max_generations ({})",
                    self.generations, self.max_generations
                ),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# mlmsim configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/mlmsim/mlmsim.toml
#   Local:  <project_dir>/.mlmsim.toml
#   Env:    MLMSIM_* environment variables (e.g. MLMSIM_DEFAULT_TIER=Master)

# Tier used when --tier is not given (Pre-Junior, Junior, Senior, Master)
# default_tier = "Pre-Junior"

# BV per affiliate for generated downlines
# bv_per_affiliate = 200.0

# Generations simulated when --generations is not given
# generations = 3

# Affiliates in the first and in every later generation
# first_gen_count = 5
# other_gen_count = 3

# Upper bound on simulated generations
# max_generations = 6

# Team bonus payout ceiling (unset: no cap)
# daily_cap = 500.0
"#
        .to_string()
    }
}

fn get_u32(config: &Config, key: &str) -> Result<u32, ConfigError> {
    let val = config.get_int(key)?;
    u32::try_from(val).map_err(|_| ConfigError::Message(format!("{key}: out of range: {val}")))
}

/// Missing keys are `None`; present but malformed keys are errors.
fn get_opt<T>(
    config: &Config,
    key: &str,
    get: impl Fn(&Config, &str) -> Result<T, ConfigError>,
) -> Result<Option<T>, ApplicationError> {
    match get(config, key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_validated_then_ok() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.generations, 3);
        assert_eq!(settings.max_generations, 6);
        assert_eq!(settings.daily_cap, None);
    }

    #[test]
    fn given_overlay_when_merging_then_overlay_wins_where_set() {
        let overlay = RawSettings {
            default_tier: Some("Senior".into()),
            daily_cap: Some(50.0),
            ..RawSettings::default()
        };
        let merged = Settings::default().merge_with(&overlay);
        assert_eq!(merged.default_tier, "Senior");
        assert_eq!(merged.daily_cap, Some(50.0));
        assert_eq!(merged.bv_per_affiliate, 200.0);
        assert_eq!(merged.first_gen_count, 5);
    }

    #[test]
    fn given_config_source_when_overriding_then_values_replace() {
        let config = Config::builder()
            .set_override("default_tier", "Master")
            .unwrap()
            .set_override("generations", "5")
            .unwrap()
            .set_override("daily_cap", "75.5")
            .unwrap()
            .build()
            .unwrap();

        let settings = Settings::apply_overrides_from(Settings::default(), &config).unwrap();
        assert_eq!(settings.default_tier, "Master");
        assert_eq!(settings.generations, 5);
        assert_eq!(settings.daily_cap, Some(75.5));
        assert_eq!(settings.other_gen_count, 3);
    }

    #[test]
    fn given_malformed_override_when_applying_then_config_error() {
        let config = Config::builder()
            .set_override("generations", "many")
            .unwrap()
            .build()
            .unwrap();

        let result = Settings::apply_overrides_from(Settings::default(), &config);
        assert!(matches!(result, Err(ApplicationError::Config { .. })));
    }

    #[test]
    fn given_unknown_default_tier_when_validated_then_config_error() {
        let settings = Settings {
            default_tier: "Diamond".into(),
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ApplicationError::Config { .. })
        ));
    }

    #[test]
    fn given_generations_above_max_when_validated_then_config_error() {
        let settings = Settings {
            generations: 7,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn given_template_when_parsed_then_all_defaults() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert_eq!(Settings::default().merge_with(&raw), Settings::default());
    }

    #[test]
    fn given_settings_when_serialized_then_round_trips_through_raw() {
        let settings = Settings {
            default_tier: "Junior".into(),
            daily_cap: Some(20.0),
            ..Settings::default()
        };
        let text = settings.to_toml().unwrap();
        let raw: RawSettings = toml::from_str(&text).unwrap();
        assert_eq!(Settings::default().merge_with(&raw), settings);
    }
}
