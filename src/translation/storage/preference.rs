//! 语言偏好存储
//!
//! 偏好是固定键下的一个语言代码。文件存储使用 JSON 对象保存键值对，
//! 文件缺失或损坏都按“没有偏好”处理。

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::translation::config::TranslatorConfig;
use crate::translation::error::{helpers, TranslationResult};
use crate::translation::languages;

/// 键值存储接口
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> TranslationResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> TranslationResult<()>;
}

/// 基于 JSON 文件的存储
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> TranslationResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!("偏好文件 {} 已损坏，忽略: {}", self.path.display(), e);
                Ok(BTreeMap::new())
            }
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> TranslationResult<Option<String>> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> TranslationResult<()> {
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                helpers::storage_error(format!("创建目录失败: {}", e)).with_context(parent.display())
            })?;
        }

        let content = serde_json::to_string_pretty(&entries)?;
        std::fs::write(&self.path, content).map_err(|e| {
            helpers::storage_error(format!("写入偏好失败: {}", e)).with_context(self.path.display())
        })?;

        tracing::debug!("偏好已写入 {}: {} = {}", self.path.display(), key, value);
        Ok(())
    }
}

/// 内存存储，进程结束即丢失
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> TranslationResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| helpers::storage_error("内存存储锁已损坏"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> TranslationResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| helpers::storage_error("内存存储锁已损坏"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// 当前语言偏好
#[derive(Clone)]
pub struct LanguagePreference {
    store: Arc<dyn PreferenceStore>,
    key: String,
    fallback: String,
}

impl LanguagePreference {
    pub fn new(store: Arc<dyn PreferenceStore>, key: &str, fallback: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
            fallback: fallback.to_string(),
        }
    }

    /// 按配置使用文件存储
    pub fn from_config(config: &TranslatorConfig) -> TranslationResult<Self> {
        let store = FilePreferenceStore::new(config.preference_file()?);
        Ok(Self::new(
            Arc::new(store),
            &config.storage_key,
            &config.default_language,
        ))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// 读取已保存的语言代码；缺失、无法读取或不受支持时返回默认值
    pub fn load(&self) -> String {
        match self.store.get(&self.key) {
            Ok(Some(code)) if languages::is_supported(&code) => code,
            Ok(Some(code)) => {
                tracing::warn!("忽略不受支持的已保存语言: {}", code);
                self.fallback.clone()
            }
            Ok(None) => self.fallback.clone(),
            Err(e) => {
                helpers::log_error(&e);
                self.fallback.clone()
            }
        }
    }

    pub fn save(&self, code: &str) -> TranslationResult<()> {
        self.store.set(&self.key, code)
    }
}

impl std::fmt::Debug for LanguagePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguagePreference")
            .field("key", &self.key)
            .field("fallback", &self.fallback)
            .finish()
    }
}
