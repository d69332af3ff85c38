//! 翻译配置管理模块
//!
//! 提供简化的配置管理，支持环境变量、配置文件和默认值

pub mod manager;

// 重新导出主要类型
pub use manager::{ConfigManager, ProviderKind, TranslatorConfig};

/// 配置常量
pub mod constants {
    use std::time::Duration;

    // 默认API设置
    pub const DEFAULT_API_URL: &str = "https://translation.googleapis.com/language/translate/v2";
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
    pub const DEFAULT_EVENT_CAPACITY: usize = 16;

    // 偏好存储
    pub const DEFAULT_STORAGE_KEY: &str = "swadesi-language";
    pub const PREFERENCE_FILE_NAME: &str = "preferences.json";

    // 可翻译元素选择器，按顺序遍历
    pub const TRANSLATABLE_SELECTORS: &[&str] = &[
        "h1", "h2", "h3", "h4", "h5", "h6",
        "p", "span", "a", "button", "label",
        "div[data-translate]", "li", "td", "th",
    ];

    // 跳过的元素
    pub const SKIP_ELEMENTS: &[&str] = &["code", "pre", "script"];

    // 标记
    pub const NO_TRANSLATE_CLASS: &str = "no-translate";
    pub const NO_TRANSLATE_ATTR: &str = "data-no-translate";
    pub const ORIGINAL_TEXT_ATTR: &str = "data-original-text";
    pub const ORIGINAL_SEGMENTS_ATTR: &str = "data-original-segments";
    pub const TRANSLATED_ATTR: &str = "data-translated";
    pub const CUSTOM_KEY_ATTR: &str = "data-custom-translate";

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "page-translator.toml",
        ".page-translator.toml",
        "page-translator.json",
        "~/.config/page-translator/config.toml",
        "/etc/page-translator/config.toml",
    ];
}
