use crate::error::AppError;
use serde::Deserialize;
use std::path::Path;

const ENV_PREFIX: &str = "HYPHENSCAN";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub throttle_interval_ms: u64,
    pub roi_width_ratio: f32,
    pub roi_height_ratio: f32,
    pub min_token_len: usize,
    pub group_size: usize,
    pub group_separator: char,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            throttle_interval_ms: 1000,
            roi_width_ratio: 0.8,
            roi_height_ratio: 0.2,
            min_token_len: 3,
            group_size: 3,
            group_separator: '-',
        }
    }
}

impl Configuration {
    /// Loads defaults, then the optional file, then `HYPHENSCAN_*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let configuration: Configuration = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;
        configuration.validate()?;
        Ok(configuration)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), AppError> {
        if self.throttle_interval_ms == 0 {
            return Err(AppError::InvalidConfiguration(
                "Throttle interval must be greater than 0".to_string(),
            ));
        }

        for (name, ratio) in [
            ("width", self.roi_width_ratio),
            ("height", self.roi_height_ratio),
        ] {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(AppError::InvalidConfiguration(format!(
                    "Region of interest {} ratio must be in (0, 1], got {}",
                    name, ratio
                )));
            }
        }

        if self.min_token_len == 0 {
            return Err(AppError::InvalidConfiguration(
                "Minimum token length must be greater than 0".to_string(),
            ));
        }

        if self.group_size == 0 {
            return Err(AppError::InvalidConfiguration(
                "Group size must be greater than 0".to_string(),
            ));
        }

        if self.group_separator.is_ascii_alphanumeric() {
            return Err(AppError::InvalidConfiguration(format!(
                "Group separator '{}' collides with token characters",
                self.group_separator
            )));
        }

        Ok(())
    }
}
