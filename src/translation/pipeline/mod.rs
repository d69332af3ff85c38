//! 翻译管道模块
//!
//! 收集可翻译元素、过滤排除项并把译文写回 DOM

pub mod collector;
pub mod filters;
pub mod patcher;

// 重新导出主要类型
pub use collector::{ElementText, TextCollector, TextSegment};
pub use filters::{ExclusionFilter, SkipReason};
pub use patcher::{apply_translations, update_dynamic_content, DynamicContentReport};
