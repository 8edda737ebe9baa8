use crate::domain::constants::{
    API_KEY_ENV_VAR, DEFAULT_SEARCH_URL, DEFAULT_SORT_FIELD, DEFAULT_TOOL_NAME,
    MAX_RESULTS_PER_PAGE,
};
use crate::utils::error::{PatentError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub tool_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            tool_name: DEFAULT_TOOL_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub search_url: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub retry_attempts: u32,
    pub retry_delay_seconds: u64,
    /// Upper bound on a server-requested `Retry-After` wait.
    pub max_retry_wait_seconds: u64,
    /// 未設定 api_key 時改讀的環境變數
    pub api_key_env: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            api_key: None,
            timeout_seconds: 30,
            retry_attempts: 3,
            retry_delay_seconds: 2,
            max_retry_wait_seconds: 60,
            api_key_env: API_KEY_ENV_VAR.to_string(),
        }
    }
}

impl ApiConfig {
    /// 取得 API key：設定檔優先，其次為環境變數
    ///
    /// Unresolved `${VAR}` placeholders count as missing.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !key.starts_with("${"))
            .map(str::to_string)
            .or_else(|| {
                std::env::var(&self.api_key_env)
                    .ok()
                    .filter(|key| !key.trim().is_empty())
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_results_per_page: u32,
    pub default_sort_field: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results_per_page: MAX_RESULTS_PER_PAGE,
            default_sort_field: DEFAULT_SORT_FIELD.to_string(),
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PatentError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${USPTO_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| {
            PatentError::ConfigValidationError {
                field: "env_substitution".to_string(),
                message: e.to_string(),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("server.host", &self.server.host)?;
        validation::validate_positive_number("server.port", self.server.port as usize, 1)?;
        validation::validate_non_empty_string("server.tool_name", &self.server.tool_name)?;

        validation::validate_url("api.search_url", &self.api.search_url)?;
        validation::validate_range("api.timeout_seconds", self.api.timeout_seconds, 1, 300)?;
        validation::validate_range("api.retry_attempts", self.api.retry_attempts, 1, 10)?;
        validation::validate_range(
            "api.retry_delay_seconds",
            self.api.retry_delay_seconds,
            0,
            60,
        )?;
        validation::validate_range(
            "api.max_retry_wait_seconds",
            self.api.max_retry_wait_seconds,
            0,
            3600,
        )?;

        validation::validate_range(
            "search.max_results_per_page",
            self.search.max_results_per_page,
            1,
            MAX_RESULTS_PER_PAGE,
        )?;
        validation::validate_non_empty_string(
            "search.default_sort_field",
            &self.search.default_sort_field,
        )?;

        if self.api.resolved_api_key().is_none() {
            tracing::warn!(
                "⚠️ No API key configured; set [api].api_key or {} before searching",
                self.api.api_key_env
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.tool_name, "Patent Search Tool");
        assert_eq!(config.api.search_url, DEFAULT_SEARCH_URL);
        assert_eq!(config.api.retry_attempts, 3);
        assert_eq!(config.search.max_results_per_page, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[server]
host = "0.0.0.0"
port = 8080
tool_name = "Prior Art Finder"

[api]
search_url = "https://example.com/search"
api_key = "abc123"
timeout_seconds = 10
retry_attempts = 5
retry_delay_seconds = 1

[search]
max_results_per_page = 50
default_sort_field = "applicationNumberText"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.tool_name, "Prior Art Finder");
        assert_eq!(config.api.resolved_api_key().as_deref(), Some("abc123"));
        assert_eq!(config.api.retry_attempts, 5);
        assert_eq!(config.search.max_results_per_page, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PATENT_SEARCH_TEST_KEY", "from-env");

        let toml_content = r#"
[api]
api_key = "${PATENT_SEARCH_TEST_KEY}"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api.api_key.as_deref(), Some("from-env"));

        std::env::remove_var("PATENT_SEARCH_TEST_KEY");
    }

    #[test]
    fn test_unresolved_placeholder_is_not_an_api_key() {
        let api = ApiConfig {
            api_key: Some("${PATENT_SEARCH_UNSET_VAR}".to_string()),
            api_key_env: "PATENT_SEARCH_UNSET_KEY_ENV".to_string(),
            ..ApiConfig::default()
        };
        assert_eq!(api.resolved_api_key(), None);
    }

    #[test]
    fn test_api_key_env_fallback_is_configurable() {
        std::env::set_var("PATENT_SEARCH_TEST_FALLBACK_KEY", "fallback-key");

        let api = AppConfig::from_toml_str(
            r#"
[api]
api_key_env = "PATENT_SEARCH_TEST_FALLBACK_KEY"
"#,
        )
        .unwrap()
        .api;
        assert_eq!(api.resolved_api_key().as_deref(), Some("fallback-key"));
        assert_eq!(api.max_retry_wait_seconds, 60);

        std::env::remove_var("PATENT_SEARCH_TEST_FALLBACK_KEY");
    }

    #[test]
    fn test_config_validation() {
        let config = AppConfig::from_toml_str(
            r#"
[api]
search_url = "invalid-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::from_toml_str(
            r#"
[search]
max_results_per_page = 500
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml_str("[server\nport = ").unwrap_err();
        assert!(matches!(err, PatentError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\ntool_name = \"File Test\"\n")
            .unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.server.tool_name, "File Test");
    }
}
