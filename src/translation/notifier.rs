//! 语言切换通知
//!
//! 通过广播通道向页面其他组件发布事件；没有订阅者时事件被丢弃。

use serde::Serialize;
use tokio::sync::broadcast;

use crate::translation::languages;

pub const FAILURE_MESSAGE: &str = "Translation failed. Please try again.";

/// 翻译周期事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LanguageEvent {
    /// 显示阻塞式加载提示
    LoadingStarted { target: String },
    /// 隐藏加载提示
    LoadingFinished,
    /// 语言已切换，供其他组件响应
    LanguageChanged { language: String },
    /// 短暂的成功提示
    TranslationSucceeded { language: String, message: String },
    /// 短暂的失败提示
    TranslationFailed { target: String, message: String },
}

impl LanguageEvent {
    pub fn succeeded(language: &str) -> Self {
        LanguageEvent::TranslationSucceeded {
            language: language.to_string(),
            message: format!("Page translated to {}", languages::display_name(language)),
        }
    }

    pub fn failed(target: &str) -> Self {
        LanguageEvent::TranslationFailed {
            target: target.to_string(),
            message: FAILURE_MESSAGE.to_string(),
        }
    }

    /// 用户可见的提示文本
    pub fn message(&self) -> Option<&str> {
        match self {
            LanguageEvent::TranslationSucceeded { message, .. }
            | LanguageEvent::TranslationFailed { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notifier {
    sender: broadcast::Sender<LanguageEvent>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LanguageEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: LanguageEvent) {
        tracing::trace!("发布事件: {:?}", event);
        let _ = self.sender.send(event);
    }
}
