use crate::adapters::telegram::DEFAULT_API_BASE_URL;
use crate::core::notifier::DEFAULT_GROUP_METADATA_KEY;
use crate::domain::model::ParseMode;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{NotifyError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

pub const ADMIN_BASE_URL_ENV: &str = "MEDUSA_ADMIN_BASE_URL";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub admin: AdminConfig,
    pub medusa: MedusaConfig,
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub notification: NotificationConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Falls back to `MEDUSA_ADMIN_BASE_URL` when unset.
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedusaConfig {
    pub api_url: String,
    pub api_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub api_base_url: Option<String>,
    pub parse_mode: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_group_metadata_key")]
    pub group_metadata_key: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            group_metadata_key: default_group_metadata_key(),
        }
    }
}

/// Shared by the Medusa and Telegram clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_group_metadata_key() -> String {
    DEFAULT_GROUP_METADATA_KEY.to_string()
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(NotifyError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        let mut config: TomlConfig =
            toml::from_str(&processed_content).map_err(|e| NotifyError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;

        if config.admin.base_url.is_none() {
            config.admin.base_url = std::env::var(ADMIN_BASE_URL_ENV).ok();
        }

        Ok(config)
    }

    /// 替換環境變數 (例如 ${TELEGRAM_BOT_TOKEN})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static regex is valid")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    fn parsed_parse_mode(&self) -> Result<ParseMode> {
        match &self.telegram.parse_mode {
            None => Ok(ParseMode::default()),
            Some(mode) => {
                mode.parse::<ParseMode>()
                    .map_err(|reason| NotifyError::InvalidConfigValueError {
                        field: "telegram.parse_mode".to_string(),
                        value: mode.clone(),
                        reason,
                    })
            }
        }
    }
}

impl ConfigProvider for TomlConfig {
    fn admin_base_url(&self) -> &str {
        self.admin.base_url.as_deref().unwrap_or("")
    }

    fn medusa_api_url(&self) -> &str {
        &self.medusa.api_url
    }

    fn medusa_api_token(&self) -> &str {
        &self.medusa.api_token
    }

    fn telegram_api_base_url(&self) -> &str {
        self.telegram
            .api_base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE_URL)
    }

    fn telegram_bot_token(&self) -> &str {
        &self.telegram.bot_token
    }

    fn group_metadata_key(&self) -> &str {
        &self.notification.group_metadata_key
    }

    fn parse_mode(&self) -> ParseMode {
        self.parsed_parse_mode().unwrap_or_default()
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        let admin_base_url =
            validation::validate_required_field(ADMIN_BASE_URL_ENV, &self.admin.base_url)?;
        validation::validate_url("admin.base_url", admin_base_url)?;

        validation::validate_url("medusa.api_url", &self.medusa.api_url)?;
        validation::validate_non_empty_string("medusa.api_token", &self.medusa.api_token)?;

        validation::validate_bot_token("telegram.bot_token", &self.telegram.bot_token)?;
        validation::validate_url("telegram.api_base_url", self.telegram_api_base_url())?;
        self.parsed_parse_mode()?;

        validation::validate_non_empty_string(
            "notification.group_metadata_key",
            &self.notification.group_metadata_key,
        )?;
        validation::validate_range("http.timeout_seconds", self.http.timeout_seconds, 1, 300)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[admin]
base_url = "https://admin.example.com"

[medusa]
api_url = "http://localhost:9000"
api_token = "secret-admin-token"

[telegram]
bot_token = "123456:ABC-DEF"
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.admin_base_url(), "https://admin.example.com");
        assert_eq!(config.medusa_api_url(), "http://localhost:9000");
        assert_eq!(config.telegram_api_base_url(), "https://api.telegram.org");
        assert_eq!(config.group_metadata_key(), "telegram_group_id");
        assert_eq!(config.parse_mode(), ParseMode::Markdown);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("ORDER_NOTIFIER_TEST_BOT_TOKEN", "987654:XYZ");

        let toml_content = r#"
[admin]
base_url = "https://admin.example.com"

[medusa]
api_url = "http://localhost:9000"
api_token = "token"

[telegram]
bot_token = "${ORDER_NOTIFIER_TEST_BOT_TOKEN}"
parse_mode = "HTML"

[notification]
group_metadata_key = "ops_chat_id"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.telegram_bot_token(), "987654:XYZ");
        assert_eq!(config.parse_mode(), ParseMode::Html);
        assert_eq!(config.group_metadata_key(), "ops_chat_id");

        std::env::remove_var("ORDER_NOTIFIER_TEST_BOT_TOKEN");
    }

    #[test]
    fn test_unresolved_variable_fails_validation() {
        let toml_content = r#"
[admin]
base_url = "https://admin.example.com"

[medusa]
api_url = "http://localhost:9000"
api_token = "token"

[telegram]
bot_token = "${ORDER_NOTIFIER_TEST_UNSET_VARIABLE}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.telegram_bot_token(),
            "${ORDER_NOTIFIER_TEST_UNSET_VARIABLE}"
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[admin]
base_url = "https://admin.example.com"

[medusa]
api_url = "invalid-url"
api_token = "token"

[telegram]
bot_token = "123456:ABC"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let bad_mode = BASIC.replace(
            "bot_token = \"123456:ABC-DEF\"",
            "bot_token = \"123456:ABC-DEF\"\nparse_mode = \"plain\"",
        );
        let config = TomlConfig::from_toml_str(&bad_mode).unwrap();
        assert!(matches!(
            config.validate(),
            Err(NotifyError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_http_timeout_section() {
        let with_timeout = format!("{}\n[http]\ntimeout_seconds = 12\n", BASIC);
        let config = TomlConfig::from_toml_str(&with_timeout).unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(12));
        assert!(config.validate().is_ok());

        let too_long = format!("{}\n[http]\ntimeout_seconds = 900\n", BASIC);
        let config = TomlConfig::from_toml_str(&too_long).unwrap();
        assert!(matches!(
            config.validate(),
            Err(NotifyError::InvalidConfigValueError { ref field, .. }) if field == "http.timeout_seconds"
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.medusa_api_token(), "secret-admin-token");
    }
}
