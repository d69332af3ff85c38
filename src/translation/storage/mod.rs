//! 存储模块
//!
//! 提供语言偏好的持久化存储。

pub mod preference;

pub use preference::{FilePreferenceStore, LanguagePreference, MemoryPreferenceStore, PreferenceStore};
