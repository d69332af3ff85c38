//! 静态占位翻译
//!
//! 不访问网络：英文原样返回，其余已知语言在原文前加上语言标记，
//! 未知语言原样返回。

use async_trait::async_trait;

use super::TranslationProvider;
use crate::translation::error::TranslationResult;

const LANGUAGE_TAGS: &[(&str, &str)] = &[
    ("hi", "हिंदी"),
    ("ta", "தமிழ்"),
    ("te", "తెలుగు"),
    ("bn", "বাংলা"),
    ("mr", "मराठी"),
    ("gu", "ગુજરાતી"),
    ("kn", "ಕನ್ನಡ"),
    ("ml", "മലയാളം"),
    ("pa", "ਪੰਜਾਬੀ"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct StaticProvider;

impl StaticProvider {
    pub fn new() -> Self {
        Self
    }

    /// 确定性的占位译文
    pub fn render(text: &str, target: &str) -> String {
        match LANGUAGE_TAGS.iter().find(|(code, _)| *code == target) {
            Some((_, tag)) => format!("[{}] {}", tag, text),
            None => text.to_string(),
        }
    }
}

#[async_trait]
impl TranslationProvider for StaticProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn translate_one(&self, text: &str, target: &str) -> TranslationResult<String> {
        Ok(Self::render(text, target))
    }

    async fn translate_batch(&self, texts: &[String], target: &str) -> TranslationResult<Vec<String>> {
        Ok(texts.iter().map(|text| Self::render(text, target)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        assert_eq!(StaticProvider::render("Welcome", "hi"), "[हिंदी] Welcome");
        assert_eq!(StaticProvider::render("Welcome", "pa"), "[ਪੰਜਾਬੀ] Welcome");
        assert_eq!(StaticProvider::render("Welcome", "en"), "Welcome");
        assert_eq!(StaticProvider::render("Welcome", "fr"), "Welcome");
    }

    #[tokio::test]
    async fn test_batch_keeps_order() {
        let texts = vec!["a".to_string(), "b".to_string()];
        let out = StaticProvider::new().translate_batch(&texts, "ta").await.unwrap();
        assert_eq!(out, vec!["[தமிழ்] a", "[தமிழ்] b"]);
    }
}
