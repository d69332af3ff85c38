//! # Page Translator Library
//!
//! 在页面内就地翻译文本，并在多次访问之间记住用户选择的语言。
//!
//! ## 模块组织
//!
//! - `core` - 文档级处理：字节输入、翻译、字节输出
//! - `env` - 类型化的环境变量
//! - `parsers` - HTML 解析、DOM 辅助函数、选择器与序列化
//! - `translation` - 翻译周期、提供者、资源包、偏好存储与通知

pub mod core;
pub mod env;
pub mod parsers;
pub mod translation;

// Re-export commonly used items for convenience
pub use crate::core::{translate_document, DocumentOptions, DocumentOutcome};
pub use translation::{PageTranslator, TranslationError, TranslationResult, TranslatorConfig};
