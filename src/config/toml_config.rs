use crate::adapters::viacep::DEFAULT_BASE_URL;
use crate::domain::model::SequencePolicy;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{CepError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub lookup: LookupConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub sequence_policy: SequencePolicy,
    pub user_agent: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            sequence_policy: SequencePolicy::default(),
            user_agent: None,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CepError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CepError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${VIACEP_URL})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CepError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 命令列參數優先於檔案設定
    pub fn apply_overrides(&mut self, base_url: Option<&str>, policy: Option<SequencePolicy>) {
        if let Some(base_url) = base_url {
            tracing::debug!("🔧 lookup.base_url overridden to: {}", base_url);
            self.lookup.base_url = base_url.to_string();
        }
        if let Some(policy) = policy {
            tracing::debug!("🔧 lookup.sequence_policy overridden to: {:?}", policy);
            self.lookup.sequence_policy = policy;
        }
    }
}

impl ConfigProvider for TomlConfig {
    fn lookup_base_url(&self) -> &str {
        &self.lookup.base_url
    }

    fn sequence_policy(&self) -> SequencePolicy {
        self.lookup.sequence_policy
    }

    fn user_agent(&self) -> Option<&str> {
        self.lookup.user_agent.as_deref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("lookup.base_url", &self.lookup.base_url)?;
        if let Some(user_agent) = &self.lookup.user_agent {
            validate_non_empty_string("lookup.user_agent", user_agent)?;
        }
        Ok(())
    }
}
