//! 翻译模块
//!
//! 页面内就地翻译，采用清晰的模块化架构：
//! - **core**: `PageTranslator` 上下文对象与翻译周期
//! - **pipeline**: 元素收集、排除规则与 DOM 写回
//! - **provider**: 远程接口与静态占位两种翻译提供者
//! - **bundle**: 可替换的静态译文资源包
//! - **storage**: 语言偏好持久化
//! - **config**: 配置管理
//! - **error**: 错误处理
//!
//! # 基本用法
//!
//! ```rust,no_run
//! use page_translator::parsers::html_to_dom;
//! use page_translator::translation::{PageTranslator, TranslatorConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let translator = PageTranslator::from_config(&TranslatorConfig::default())?;
//! let dom = html_to_dom(b"<h1>Welcome</h1>", "utf-8")?;
//!
//! translator.attach(&dom).await?;
//! translator.change_language(&dom, "hi").await?;
//! assert_eq!(translator.current_language(), "hi");
//! # Ok(())
//! # }
//! ```

// ============================================================================
// 子模块声明
// ============================================================================

/// 资源包 - 标题、描述、占位符、图片说明与自定义键的静态译文
pub mod bundle;

/// 配置管理模块 - 处理翻译相关的所有配置
///
/// 提供提供者选择、偏好存储位置、选择器列表等配置
pub mod config;

/// 核心模块 - 翻译周期的编排
pub mod core;

/// 错误处理模块 - 统一的错误类型和处理机制
pub mod error;

/// 支持的语言列表
pub mod languages;

/// 语言切换事件
pub mod notifier;

/// 文本处理管道模块 - 收集、过滤与写回
///
/// 负责从DOM中收集可翻译元素、应用排除规则并写回译文
pub mod pipeline;

/// 翻译提供者
pub mod provider;

/// 语言选择器界面
pub mod selector_ui;

/// 存储管理模块 - 语言偏好持久化
pub mod storage;

// ============================================================================
// 核心API导出 - 主要的公共接口
// ============================================================================

pub use self::core::{CycleOutcome, CycleReport, PageTranslator, TranslatorStatsSnapshot};

pub use config::{constants, ConfigManager, ProviderKind, TranslatorConfig};

pub use error::{ErrorSeverity, TranslationError, TranslationResult};

pub use languages::{LanguageDescriptor, DEFAULT_LANGUAGE, SUPPORTED_LANGUAGES};

pub use notifier::LanguageEvent;

pub use provider::{build_provider, RemoteProvider, StaticProvider, TranslationProvider};

pub use storage::{FilePreferenceStore, LanguagePreference, MemoryPreferenceStore, PreferenceStore};

pub use bundle::TranslationBundle;

// ============================================================================
// 高级API导出 - 供高级用户和扩展开发使用
// ============================================================================

pub use pipeline::{ExclusionFilter, SkipReason, TextCollector};
