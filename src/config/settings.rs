//! Settings schema, loading and validation.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{AppResult, PosListError};
use crate::pos_file::StageDevices;
use crate::sequence::{AxisSpec, Generation, PositionSequencer, SequenceOptions, ZSpec};

/// Settings file looked up in the working directory when none is given.
pub const DEFAULT_SETTINGS_FILE: &str = "pos_list.toml";

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "POSLIST_";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Where the `.pos` file is written
    pub output: PathBuf,
    /// Optional Z: a single value or a list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<ZSpec>,
    /// XY grid
    pub axes: AxesConfig,
    /// Ordering and Z handling
    pub sequence: SequenceOptions,
    /// Device labels written to the file
    pub devices: StageDevices,
}

/// The two XY axes
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    /// X axis, outer loop in standard and snake order
    pub x: AxisSpec,
    /// Y axis
    pub y: AxisSpec,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            output: PathBuf::from("Output.pos"),
            z: None,
            axes: AxesConfig::default(),
            sequence: SequenceOptions::default(),
            devices: StageDevices::default(),
        }
    }
}

impl Settings {
    /// Load from `pos_list.toml` (if present) and the environment.
    pub fn load() -> AppResult<Self> {
        Self::extract(Self::figment(Path::new(DEFAULT_SETTINGS_FILE)))
    }

    /// Load from an explicit settings file and the environment.
    ///
    /// # Errors
    ///
    /// Unlike [`Settings::load`], a missing file is an error here.
    pub fn load_from<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(PosListError::Configuration(format!(
                "Settings file not found: {}",
                path.display()
            )));
        }
        Self::extract(Self::figment(path))
    }

    /// Defaults, then the TOML file, then `POSLIST_` environment variables.
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn extract(figment: Figment) -> AppResult<Self> {
        let settings: Self = figment.extract()?;
        settings.validate()?;
        debug!(?settings, "Loaded settings");
        Ok(settings)
    }

    /// Validate settings after loading
    ///
    /// Checks:
    /// - Log level is valid (trace, debug, info, warn, error)
    /// - Axes and Z contain only finite values, linspaces have points
    /// - Noise width is finite and non-negative
    pub fn validate(&self) -> AppResult<()> {
        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(PosListError::Configuration(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }

        self.axes.x.validate("x")?;
        self.axes.y.validate("y")?;
        if let Some(z) = &self.z {
            z.validate()?;
        }
        self.sequence.validate()?;

        if self.devices.xy_stage.is_empty() || self.devices.z_stage.is_empty() {
            return Err(PosListError::Configuration(
                "Device labels cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Run the sequencer over the configured axes and Z.
    pub fn generate(&self) -> AppResult<Generation> {
        let x_axis = self.axes.x.values();
        let y_axis = self.axes.y.values();
        PositionSequencer::new(self.sequence.clone()).generate(&x_axis, &y_axis, self.z.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::TraversalMode;

    #[test]
    fn test_defaults_validate() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.sequence.mode, TraversalMode::Snake);
        assert!(settings.sequence.compatibility_mda);
        assert_eq!(settings.devices.xy_stage, "XY Stage");
    }

    #[test]
    fn test_invalid_log_level() {
        let settings = Settings {
            log_level: "verbose".to_string(),
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid log_level 'verbose'"));
    }

    #[test]
    fn test_default_generation_is_three_by_three() {
        let mut settings = Settings::default();
        settings.sequence.seed = Some(5);
        let generation = settings.generate().unwrap();
        assert_eq!(generation.positions.len(), 9);
        assert_eq!(generation.positions[0].x, -100.0);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = Settings::load_from("/nonexistent/pos_list.toml").unwrap_err();
        assert!(matches!(err, PosListError::Configuration(_)));
    }
}
