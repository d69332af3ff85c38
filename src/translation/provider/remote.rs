//! 远程翻译接口
//!
//! 每条文本一次 POST 请求，凭据通过 `key` 查询参数传递，
//! 请求体为 `{q, target, format: "text"}`。

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use super::TranslationProvider;
use crate::translation::config::TranslatorConfig;
use crate::translation::error::{TranslationError, TranslationResult};

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    target: &'a str,
    format: &'static str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    translations: Vec<TranslatedText>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslatedText {
    translated_text: String,
}

/// 远程翻译提供者
#[derive(Debug, Clone)]
pub struct RemoteProvider {
    client: reqwest::Client,
    endpoint: Url,
}

impl RemoteProvider {
    pub fn new(api_url: &str, api_key: &str, timeout: Duration) -> TranslationResult<Self> {
        if api_key.trim().is_empty() {
            return Err(TranslationError::ConfigError("远程翻译需要配置 api_key".to_string()));
        }

        let mut endpoint = Url::parse(api_url)?;
        endpoint.query_pairs_mut().append_pair("key", api_key);

        let client = reqwest::Client::builder()
            .user_agent(concat!("page-translator/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| TranslationError::ConfigError(format!("创建HTTP客户端失败: {}", e)))?;

        Ok(Self { client, endpoint })
    }

    pub fn from_config(config: &TranslatorConfig) -> TranslationResult<Self> {
        let api_key = config.api_key.as_deref().unwrap_or_default();
        Self::new(&config.api_url, api_key, config.request_timeout())
    }
}

#[async_trait]
impl TranslationProvider for RemoteProvider {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn translate_one(&self, text: &str, target: &str) -> TranslationResult<String> {
        let body = TranslateRequest {
            q: text,
            target,
            format: "text",
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::TranslationServiceError(format!(
                "HTTP 状态 {}",
                status
            )));
        }

        let payload: TranslateResponse = response.json().await?;
        payload
            .data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or_else(|| TranslationError::ParseError("响应中没有译文".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_goes_into_query() {
        let provider = RemoteProvider::new(
            "https://translation.example.test/v2",
            "abc 123",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            provider.endpoint.as_str(),
            "https://translation.example.test/v2?key=abc+123"
        );
    }

    #[test]
    fn test_rejects_empty_key_and_bad_url() {
        assert!(RemoteProvider::new("https://x.test", " ", Duration::from_secs(1)).is_err());
        assert!(matches!(
            RemoteProvider::new("not a url", "k", Duration::from_secs(1)),
            Err(TranslationError::ConfigError(_))
        ));
    }

    #[test]
    fn test_response_shape() {
        let payload: TranslateResponse = serde_json::from_str(
            r#"{"data":{"translations":[{"translatedText":"नमस्ते","detectedSourceLanguage":"en"}]}}"#,
        )
        .unwrap();
        assert_eq!(payload.data.translations[0].translated_text, "नमस्ते");

        let body = serde_json::to_value(TranslateRequest { q: "Hello", target: "hi", format: "text" }).unwrap();
        assert_eq!(body, serde_json::json!({"q": "Hello", "target": "hi", "format": "text"}));
    }
}
