//! 简化的配置管理器
//!
//! 提供统一的配置接口，支持文件配置、环境变量和默认值

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use super::constants;
use crate::parsers::html::Selector;
use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::languages;

/// 翻译提供者类型，构造时一次性选定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// 远程 HTTP 翻译接口
    Remote,
    /// 无需网络的静态占位翻译
    #[default]
    Static,
}

/// 页面翻译配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslatorConfig {
    // 提供者配置
    pub provider: ProviderKind,
    pub api_url: String,
    pub api_key: Option<String>,
    pub request_timeout_secs: u64,

    // 语言与偏好
    pub default_language: String,
    pub storage_path: Option<String>,
    pub storage_key: String,

    // 内容
    pub bundle_path: Option<String>,
    pub selectors: Vec<String>,

    // 通知
    pub event_capacity: usize,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Static,
            api_url: constants::DEFAULT_API_URL.to_string(),
            api_key: None,
            request_timeout_secs: constants::DEFAULT_REQUEST_TIMEOUT.as_secs(),

            default_language: languages::DEFAULT_LANGUAGE.to_string(),
            storage_path: None,
            storage_key: constants::DEFAULT_STORAGE_KEY.to_string(),

            bundle_path: None,
            selectors: constants::TRANSLATABLE_SELECTORS
                .iter()
                .map(|s| s.to_string())
                .collect(),

            event_capacity: constants::DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl TranslatorConfig {
    /// 创建使用远程接口的配置
    pub fn remote(api_key: &str, api_url: Option<&str>) -> Self {
        let mut config = Self {
            provider: ProviderKind::Remote,
            api_key: Some(api_key.to_string()),
            ..Self::default()
        };
        if let Some(url) = api_url {
            config.api_url = url.to_string();
        }
        config
    }

    /// 验证配置
    pub fn validate(&self) -> TranslationResult<()> {
        if self.provider == ProviderKind::Remote
            && self.api_key.as_deref().map_or(true, |key| key.trim().is_empty())
        {
            return Err(TranslationError::ConfigError(
                "远程翻译需要配置 api_key".to_string(),
            ));
        }

        Url::parse(&self.api_url)?;

        if self.request_timeout_secs == 0 {
            return Err(TranslationError::ConfigError("请求超时必须大于0".to_string()));
        }

        if !languages::is_supported(&self.default_language) {
            return Err(TranslationError::ConfigError(format!(
                "默认语言不受支持: {}",
                self.default_language
            )));
        }

        if self.storage_key.trim().is_empty() {
            return Err(TranslationError::ConfigError("存储键不能为空".to_string()));
        }

        if self.selectors.is_empty() {
            return Err(TranslationError::ConfigError("选择器列表不能为空".to_string()));
        }
        for selector in &self.selectors {
            Selector::parse(selector)
                .map_err(|e| TranslationError::ConfigError(e.to_string()))?;
        }

        if self.event_capacity == 0 {
            return Err(TranslationError::ConfigError("事件通道容量不能为0".to_string()));
        }

        Ok(())
    }

    /// 应用环境变量覆盖
    pub fn apply_env_overrides(&mut self) -> TranslationResult<()> {
        use crate::env::{storage, translation, EnvVar};

        if let Some(provider) = translation::Provider::get_set()? {
            self.provider = provider;
        }

        if let Some(api_url) = translation::ApiUrl::get_set()? {
            tracing::info!("环境变量覆盖 API URL: {}", api_url);
            self.api_url = api_url;
        }

        if let Some(api_key) = translation::ApiKey::get_set()? {
            self.api_key = Some(api_key);
        }

        if let Some(timeout) = translation::RequestTimeout::get_set()? {
            self.request_timeout_secs = timeout.as_secs();
        }

        if let Some(lang) = translation::DefaultLang::get_set()? {
            self.default_language = lang;
        }

        if let Some(path) = translation::BundlePath::get_set()? {
            self.bundle_path = Some(path);
        }

        if let Some(path) = storage::Path::get_set()? {
            self.storage_path = Some(path);
        }

        if let Some(key) = storage::Key::get_set()? {
            self.storage_key = key;
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// 偏好文件位置：显式配置优先，其次是平台数据目录
    pub fn preference_file(&self) -> TranslationResult<PathBuf> {
        if let Some(path) = &self.storage_path {
            return Ok(PathBuf::from(shellexpand::tilde(path).into_owned()));
        }

        ProjectDirs::from("", "", "page-translator")
            .map(|dirs| dirs.data_dir().join(constants::PREFERENCE_FILE_NAME))
            .ok_or_else(|| TranslationError::ConfigError("无法确定数据目录".to_string()))
    }
}

/// 简化的配置管理器
pub struct ConfigManager {
    config: TranslatorConfig,
}

impl ConfigManager {
    /// 创建新的配置管理器：文件、环境变量、校验
    pub fn new() -> TranslationResult<Self> {
        Self::load_dotenv();
        let config = Self::search_config()?;
        Self::finish(config)
    }

    /// 从指定文件创建配置管理器
    pub fn from_path<P: AsRef<Path>>(path: P) -> TranslationResult<Self> {
        Self::load_dotenv();
        let config = Self::load_from_file(path.as_ref())?;
        Self::finish(config)
    }

    fn finish(mut config: TranslatorConfig) -> TranslationResult<Self> {
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(Self { config })
    }

    /// 获取配置
    pub fn get_config(&self) -> &TranslatorConfig {
        &self.config
    }

    pub fn into_config(self) -> TranslatorConfig {
        self.config
    }

    fn search_config() -> TranslationResult<TranslatorConfig> {
        for path in constants::CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            let candidate = Path::new(&*expanded_path);
            if candidate.exists() {
                tracing::info!("加载配置文件: {}", expanded_path);
                return Self::load_from_file(candidate);
            }
        }

        tracing::info!("未找到配置文件，使用默认配置");
        Ok(TranslatorConfig::default())
    }

    /// 从指定文件加载配置
    fn load_from_file(path: &Path) -> TranslationResult<TranslatorConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TranslationError::ConfigError(format!("读取配置文件失败: {}", e))
                .with_context(path.display())
        })?;

        if path.extension().map_or(false, |ext| ext == "json") {
            serde_json::from_str(&content)
                .map_err(|e| TranslationError::ConfigError(format!("解析JSON配置失败: {}", e)))
        } else {
            toml::from_str(&content)
                .map_err(|e| TranslationError::ConfigError(format!("解析TOML配置失败: {}", e)))
        }
    }

    /// 加载 .env 文件
    fn load_dotenv() {
        let env_files = [".env.local", ".env"];

        for env_file in &env_files {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::info!("已加载环境变量文件: {}", env_file);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TranslatorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.provider, ProviderKind::Static);
        assert_eq!(config.default_language, "en");
        assert_eq!(config.selectors.len(), 15);
    }

    #[test]
    fn test_remote_requires_key() {
        let mut config = TranslatorConfig::remote("secret", None);
        assert!(config.validate().is_ok());

        config.api_key = Some("  ".to_string());
        assert!(matches!(
            config.validate(),
            Err(TranslationError::ConfigError(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_default_language() {
        let config = TranslatorConfig {
            default_language: "fr".to_string(),
            ..TranslatorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_selector() {
        let config = TranslatorConfig {
            selectors: vec!["p".to_string(), "div[".to_string()],
            ..TranslatorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_partial_config_uses_defaults() {
        let config: TranslatorConfig = toml::from_str(
            r#"
            provider = "remote"
            api_key = "abc"
            request_timeout_secs = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.provider, ProviderKind::Remote);
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
        assert_eq!(config.storage_key, constants::DEFAULT_STORAGE_KEY);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_preference_file() {
        let config = TranslatorConfig {
            storage_path: Some("/tmp/prefs/lang.json".to_string()),
            ..TranslatorConfig::default()
        };
        assert_eq!(
            config.preference_file().unwrap(),
            PathBuf::from("/tmp/prefs/lang.json")
        );
    }
}
