//! 资源包
//!
//! 按源文本和语言代码索引的静态译文数据，与翻译逻辑解耦，可整体替换。

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::languages::DEFAULT_LANGUAGE;

const BUILTIN_BUNDLE: &str = include_str!("../../resources/storefront.toml");

/// 源文本（或键） -> 语言代码 -> 译文
pub type PhraseTable = BTreeMap<String, BTreeMap<String, String>>;

/// 资源包分区
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleSection {
    Title,
    Description,
    Placeholder,
    Alt,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslationBundle {
    pub title: PhraseTable,
    pub description: PhraseTable,
    pub placeholder: PhraseTable,
    pub alt: PhraseTable,
    pub custom: PhraseTable,
}

impl TranslationBundle {
    /// 内置的店面资源包
    pub fn builtin() -> TranslationResult<Self> {
        Self::from_toml_str(BUILTIN_BUNDLE)
    }

    pub fn from_toml_str(content: &str) -> TranslationResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> TranslationResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            TranslationError::ConfigError(format!("读取资源包失败: {}", e)).with_context(path.display())
        })?;
        Self::from_toml_str(&content).map_err(|e| e.with_context(path.display()))
    }

    /// 指定路径时从文件加载，否则使用内置资源包
    pub fn load(path: Option<&str>) -> TranslationResult<Self> {
        match path {
            Some(path) => {
                tracing::info!("加载资源包: {}", path);
                Self::from_file(shellexpand::tilde(path).into_owned())
            }
            None => Self::builtin(),
        }
    }

    fn table(&self, section: BundleSection) -> &PhraseTable {
        match section {
            BundleSection::Title => &self.title,
            BundleSection::Description => &self.description,
            BundleSection::Placeholder => &self.placeholder,
            BundleSection::Alt => &self.alt,
        }
    }

    /// 源文本是否在分区中
    pub fn knows(&self, section: BundleSection, source: &str) -> bool {
        self.table(section).contains_key(source)
    }

    /// 精确查找 `section[source][target]`
    pub fn phrase(&self, section: BundleSection, source: &str, target: &str) -> Option<&str> {
        self.table(section)
            .get(source)
            .and_then(|by_lang| by_lang.get(target))
            .map(String::as_str)
    }

    /// 自定义键的译文，目标语言缺失时回退到英文条目
    pub fn custom_text(&self, key: &str, target: &str) -> Option<&str> {
        let entry = self.custom.get(key)?;
        entry
            .get(target)
            .or_else(|| entry.get(DEFAULT_LANGUAGE))
            .map(String::as_str)
    }
}
