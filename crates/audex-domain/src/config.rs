//! Process configuration.
//!
//! Read once at startup; a missing or malformed value is a
//! `ConfigurationError`, which is fatal to initialization — there is no
//! partial startup with defaults silently substituted for bad input.

use audex_core::DomainError;
use audex_store::StoreConfig;

/// Deployment configuration for the Audex core.
#[derive(Debug, Clone)]
pub struct AudexConfig {
    /// Frameworks engagements may select.
    pub available_frameworks: Vec<String>,
    /// Maximum participants per engagement.
    pub max_engagement_participants: usize,
}

impl Default for AudexConfig {
    fn default() -> Self {
        Self {
            available_frameworks: vec![
                "soc2".to_string(),
                "iso27001".to_string(),
                "hipaa".to_string(),
                "pcidss".to_string(),
            ],
            max_engagement_participants: 25,
        }
    }
}

impl AudexConfig {
    /// Load from the environment, falling back to defaults for unset
    /// variables. Set-but-invalid values are configuration errors.
    ///
    /// - `AUDEX_FRAMEWORKS` — comma-separated availability list.
    /// - `AUDEX_MAX_PARTICIPANTS` — positive integer.
    pub fn from_env() -> Result<Self, DomainError> {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("AUDEX_FRAMEWORKS") {
            let frameworks: Vec<String> = raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if frameworks.is_empty() {
                return Err(DomainError::Configuration(
                    "AUDEX_FRAMEWORKS must name at least one framework".into(),
                ));
            }
            config.available_frameworks = frameworks;
        }

        if let Ok(raw) = std::env::var("AUDEX_MAX_PARTICIPANTS") {
            let max: usize = raw.parse().map_err(|_| {
                DomainError::Configuration(format!(
                    "AUDEX_MAX_PARTICIPANTS must be a positive integer, got {raw:?}"
                ))
            })?;
            if max == 0 {
                return Err(DomainError::Configuration(
                    "AUDEX_MAX_PARTICIPANTS must be positive".into(),
                ));
            }
            config.max_engagement_participants = max;
        }

        Ok(config)
    }

    /// The store-facing slice of this configuration.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            available_frameworks: self.available_frameworks.clone(),
            max_engagement_participants: self.max_engagement_participants,
        }
    }
}
