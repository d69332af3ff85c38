//! 翻译提供者
//!
//! 两种实现：远程 HTTP 接口和无需网络的静态占位翻译。
//! 提供者在构造时根据配置一次性选定。

pub mod remote;
pub mod static_provider;

use std::sync::Arc;

use async_trait::async_trait;

pub use remote::RemoteProvider;
pub use static_provider::StaticProvider;

use crate::translation::config::{ProviderKind, TranslatorConfig};
use crate::translation::error::TranslationResult;

/// 翻译提供者接口
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// 提供者名称，用于日志
    fn name(&self) -> &'static str;

    /// 翻译单条文本
    async fn translate_one(&self, text: &str, target: &str) -> TranslationResult<String>;

    /// 批量翻译，结果与输入等长且顺序一致
    ///
    /// 默认实现逐条调用 `translate_one`，单条失败时回退到原文并记录日志，
    /// 不会中断整个批次。
    async fn translate_batch(&self, texts: &[String], target: &str) -> TranslationResult<Vec<String>> {
        let mut results = Vec::with_capacity(texts.len());

        for (index, text) in texts.iter().enumerate() {
            match self.translate_one(text, target).await {
                Ok(translated) => results.push(translated),
                Err(e) => {
                    tracing::warn!(
                        "{}: 第 {}/{} 条翻译失败，使用原文: {}",
                        self.name(),
                        index + 1,
                        texts.len(),
                        e
                    );
                    results.push(text.clone());
                }
            }
        }

        Ok(results)
    }
}

/// 按配置构造提供者
pub fn build_provider(config: &TranslatorConfig) -> TranslationResult<Arc<dyn TranslationProvider>> {
    match config.provider {
        ProviderKind::Remote => {
            let provider = RemoteProvider::from_config(config)?;
            tracing::info!("使用远程翻译接口: {}", config.api_url);
            Ok(Arc::new(provider))
        }
        ProviderKind::Static => {
            tracing::info!("使用静态占位翻译");
            Ok(Arc::new(StaticProvider::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::error::TranslationError;

    struct RejectsSecond;

    #[async_trait]
    impl TranslationProvider for RejectsSecond {
        fn name(&self) -> &'static str {
            "rejects-second"
        }

        async fn translate_one(&self, text: &str, _target: &str) -> TranslationResult<String> {
            if text == "second" {
                Err(TranslationError::NetworkError("connection reset".to_string()))
            } else {
                Ok(text.to_uppercase())
            }
        }
    }

    #[tokio::test]
    async fn test_default_batch_falls_back_per_item() {
        let texts = vec!["first".to_string(), "second".to_string(), "third".to_string()];
        let results = RejectsSecond.translate_batch(&texts, "hi").await.unwrap();
        assert_eq!(results, vec!["FIRST", "second", "THIRD"]);
    }

    #[test]
    fn test_build_provider_follows_flag() {
        let provider = build_provider(&TranslatorConfig::default()).unwrap();
        assert_eq!(provider.name(), "static");

        let provider = build_provider(&TranslatorConfig::remote("key", None)).unwrap();
        assert_eq!(provider.name(), "remote");
    }

    #[test]
    fn test_build_remote_without_key_fails() {
        let config = TranslatorConfig {
            provider: ProviderKind::Remote,
            ..TranslatorConfig::default()
        };
        assert!(build_provider(&config).is_err());
    }
}
