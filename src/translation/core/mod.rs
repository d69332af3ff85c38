//! 翻译系统核心模块
//!
//! `PageTranslator` 把收集、翻译、写回、持久化和通知串成一个周期。

pub mod service;

pub use service::{
    CycleOutcome, CycleReport, PageTranslator, TranslatorStats, TranslatorStatsSnapshot,
};
