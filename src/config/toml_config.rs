use crate::core::intake::IntakeSettings;
use crate::utils::error::{BookingError, Result};
use crate::utils::validation::{validate_path, validate_positive_number, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub intake: IntakeConfig,
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
    pub tutors_file: String,
    pub requests_file: String,
    pub bookings_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: ".".to_string(),
            tutors_file: "teachers.json".to_string(),
            requests_file: "request.json".to_string(),
            bookings_file: "booking.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    pub write_timeout_ms: u64,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            write_timeout_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// How many tutors the landing page shows.
    pub landing_sample_size: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            landing_sample_size: 6,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: bool,
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| BookingError::ConfigError {
            message: format!("Failed to read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BookingError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.intake.write_timeout_ms)
    }

    pub fn intake_settings(&self) -> IntakeSettings {
        IntakeSettings {
            requests_path: self.storage.requests_file.clone(),
            bookings_path: self.storage.bookings_file.clone(),
            write_timeout: self.write_timeout(),
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_path("storage.data_dir", &self.storage.data_dir)?;
        validate_path("storage.tutors_file", &self.storage.tutors_file)?;
        validate_path("storage.requests_file", &self.storage.requests_file)?;
        validate_path("storage.bookings_file", &self.storage.bookings_file)?;

        if self.storage.requests_file == self.storage.bookings_file {
            return Err(BookingError::InvalidConfigValueError {
                field: "storage.bookings_file".to_string(),
                value: self.storage.bookings_file.clone(),
                reason: "Requests and bookings must use separate files".to_string(),
            });
        }

        validate_positive_number("intake.write_timeout_ms", self.intake.write_timeout_ms, 1)?;
        validate_positive_number(
            "catalog.landing_sample_size",
            self.catalog.landing_sample_size as u64,
            1,
        )?;
        Ok(())
    }
}
