use crate::adapters::telegram::DEFAULT_API_BASE_URL;
use crate::config::toml_config::{ADMIN_BASE_URL_ENV, DEFAULT_TIMEOUT_SECONDS};
use crate::core::notifier::DEFAULT_GROUP_METADATA_KEY;
use crate::domain::model::ParseMode;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{NotifyError, Result};
use crate::utils::validation::{self, Validate};
use std::env;
use std::time::Duration;

/// Configuration read purely from environment variables, used by the Lambda entry point.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub admin_base_url: String,
    pub medusa_api_url: String,
    pub medusa_api_token: String,
    pub telegram_bot_token: String,
    pub telegram_api_base_url: String,
    pub group_metadata_key: String,
    pub parse_mode: ParseMode,
    pub timeout_seconds: u64,
}

impl EnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 以自訂來源讀取變數，未設定或空字串視為缺少
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let required = |name: &str| {
            var(name).ok_or_else(|| NotifyError::MissingConfigError {
                field: name.to_string(),
            })
        };

        let parse_mode = match var("TELEGRAM_PARSE_MODE") {
            Some(mode) => mode
                .parse::<ParseMode>()
                .map_err(|reason| NotifyError::InvalidConfigValueError {
                    field: "TELEGRAM_PARSE_MODE".to_string(),
                    value: mode.clone(),
                    reason,
                })?,
            None => ParseMode::default(),
        };

        let timeout_seconds = match var("REQUEST_TIMEOUT_SECONDS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| NotifyError::InvalidConfigValueError {
                    field: "REQUEST_TIMEOUT_SECONDS".to_string(),
                    value: raw.clone(),
                    reason: "Expected a whole number of seconds".to_string(),
                })?,
            None => DEFAULT_TIMEOUT_SECONDS,
        };

        Ok(Self {
            admin_base_url: required(ADMIN_BASE_URL_ENV)?,
            medusa_api_url: required("MEDUSA_API_URL")?,
            medusa_api_token: required("MEDUSA_API_TOKEN")?,
            telegram_bot_token: required("TELEGRAM_BOT_TOKEN")?,
            telegram_api_base_url: var("TELEGRAM_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            group_metadata_key: var("GROUP_METADATA_KEY")
                .unwrap_or_else(|| DEFAULT_GROUP_METADATA_KEY.to_string()),
            parse_mode,
            timeout_seconds,
        })
    }
}

impl ConfigProvider for EnvConfig {
    fn admin_base_url(&self) -> &str {
        &self.admin_base_url
    }

    fn medusa_api_url(&self) -> &str {
        &self.medusa_api_url
    }

    fn medusa_api_token(&self) -> &str {
        &self.medusa_api_token
    }

    fn telegram_api_base_url(&self) -> &str {
        &self.telegram_api_base_url
    }

    fn telegram_bot_token(&self) -> &str {
        &self.telegram_bot_token
    }

    fn group_metadata_key(&self) -> &str {
        &self.group_metadata_key
    }

    fn parse_mode(&self) -> ParseMode {
        self.parse_mode
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Validate for EnvConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url(ADMIN_BASE_URL_ENV, &self.admin_base_url)?;
        validation::validate_url("MEDUSA_API_URL", &self.medusa_api_url)?;
        validation::validate_non_empty_string("MEDUSA_API_TOKEN", &self.medusa_api_token)?;
        validation::validate_bot_token("TELEGRAM_BOT_TOKEN", &self.telegram_bot_token)?;
        validation::validate_url("TELEGRAM_API_BASE_URL", &self.telegram_api_base_url)?;
        validation::validate_non_empty_string("GROUP_METADATA_KEY", &self.group_metadata_key)?;
        validation::validate_range("REQUEST_TIMEOUT_SECONDS", self.timeout_seconds, 1, 300)?;

        tracing::info!("✅ Environment configuration validation passed");
        Ok(())
    }
}
