//! 文档级处理
//!
//! 字节输入、字节输出：解析文档，挂接翻译器（注入选择器并恢复已保存的语言），
//! 按需切换到目标语言，再按原字符集序列化。
//!
//! 翻译周期失败时页面保持原文，文档照常序列化，失败记录在结果中。

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};
use markup5ever_rcdom::RcDom;

use crate::parsers::html::dom::{get_node_attr, html_to_dom};
use crate::parsers::html::{select, select_first, serialize_document};
use crate::translation::{CycleOutcome, CycleReport, PageTranslator, TranslationError, TranslationResult};

pub const DEFAULT_ENCODING: &str = "utf-8";

/// 文档处理选项
#[derive(Clone, Debug)]
pub struct DocumentOptions {
    /// 输入字符集，未指定时从 `<meta charset>` 探测，默认 UTF-8
    pub encoding: Option<String>,
    /// 目标语言，未指定时只恢复已保存的语言
    pub target_language: Option<String>,
    /// 是否注入语言选择器
    pub inject_selector: bool,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            encoding: None,
            target_language: None,
            inject_selector: true,
        }
    }
}

/// 文档处理结果
#[derive(Debug)]
pub struct DocumentOutcome {
    pub data: Vec<u8>,
    /// 处理完成后生效的语言
    pub language: String,
    /// 恢复已保存语言的那一轮
    pub restored: Option<CycleReport>,
    /// 切换到目标语言的那一轮
    pub changed: Option<CycleOutcome>,
    /// 失败的翻译周期；此时 `data` 仍是完整的文档
    pub failure: Option<TranslationError>,
}

/// 翻译整个文档
pub async fn translate_document(
    translator: &PageTranslator,
    input_data: &[u8],
    options: &DocumentOptions,
) -> TranslationResult<DocumentOutcome> {
    let encoding = options
        .encoding
        .clone()
        .or_else(|| sniff_charset(input_data))
        .unwrap_or_else(|| DEFAULT_ENCODING.to_string());
    tracing::debug!("文档字符集: {}", encoding);

    let dom = html_to_dom(input_data, &encoding)?;

    let mut failure = None;

    let restored = if options.inject_selector {
        translator.attach(&dom).await
    } else {
        translator.restore(&dom).await
    };
    let restored = restored.unwrap_or_else(|e| {
        failure = Some(e);
        None
    });

    let changed = match options.target_language.as_deref() {
        Some(target) => match translator.change_language(&dom, target).await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                failure = Some(e);
                None
            }
        },
        None => None,
    };

    Ok(DocumentOutcome {
        data: serialize_document(&dom, &encoding)?,
        language: translator.current_language(),
        restored,
        changed,
        failure,
    })
}

/// 从文档自身声明的字符集探测编码
fn sniff_charset(input_data: &[u8]) -> Option<String> {
    let dom: RcDom = html_to_dom(input_data, DEFAULT_ENCODING).ok()?;

    if let Ok(Some(meta)) = select_first(&dom.document, "meta[charset]") {
        return get_node_attr(&meta, "charset")
            .filter(|c| !c.trim().is_empty())
            .map(declared_charset);
    }

    select(&dom.document, "meta[content]")
        .ok()?
        .iter()
        .filter_map(|meta| get_node_attr(meta, "content"))
        .find_map(|content| {
            content
                .split(';')
                .find_map(|part| part.trim().strip_prefix("charset=").map(|c| c.trim().to_string()))
        })
        .map(declared_charset)
}

/// 文档内声明的 UTF-16 按 UTF-8 处理：能读到这条声明，字节就不是 UTF-16
fn declared_charset(label: String) -> String {
    match Encoding::for_label(label.trim().as_bytes()) {
        Some(encoding) if encoding == UTF_16LE || encoding == UTF_16BE => DEFAULT_ENCODING.to_string(),
        _ => label,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::translation::storage::{LanguagePreference, MemoryPreferenceStore};
    use crate::translation::StaticProvider;

    #[test]
    fn test_sniff_meta_charset() {
        assert_eq!(
            sniff_charset(b"<html><head><meta charset=\"windows-1252\"></head></html>").as_deref(),
            Some("windows-1252")
        );
        assert_eq!(
            sniff_charset(
                b"<meta http-equiv=\"Content-Type\" content=\"text/html; charset=iso-8859-1\">"
            )
            .as_deref(),
            Some("iso-8859-1")
        );
        assert_eq!(sniff_charset(b"<p>plain</p>"), None);
    }

    #[test]
    fn test_declared_utf16_reads_as_utf8() {
        assert_eq!(
            sniff_charset(b"<html><head><meta charset=\"utf-16\"></head></html>").as_deref(),
            Some("utf-8")
        );
        assert_eq!(
            sniff_charset(b"<meta http-equiv=\"Content-Type\" content=\"text/html; charset=UTF-16LE\">")
                .as_deref(),
            Some("utf-8")
        );
    }

    fn translator() -> PageTranslator {
        let preference = LanguagePreference::new(Arc::new(MemoryPreferenceStore::new()), "lang", "en");
        PageTranslator::new(Arc::new(StaticProvider::new()), preference).unwrap()
    }

    #[tokio::test]
    async fn test_utf16_declaration_keeps_text_readable() {
        let input = "<html><head><meta charset=\"utf-16\"></head><body><h1>Welcome</h1></body></html>";
        let options = DocumentOptions {
            target_language: Some("hi".to_string()),
            inject_selector: false,
            ..DocumentOptions::default()
        };

        let outcome = translate_document(&translator(), input.as_bytes(), &options).await.unwrap();
        let html = String::from_utf8(outcome.data).unwrap();
        assert!(html.contains("[हिंदी] Welcome"));
    }

    #[tokio::test]
    async fn test_failed_cycle_still_serialises_document() {
        let options = DocumentOptions {
            target_language: Some("fr".to_string()),
            ..DocumentOptions::default()
        };

        let outcome = translate_document(&translator(), b"<h1>Welcome</h1>", &options).await.unwrap();
        assert!(matches!(outcome.failure, Some(TranslationError::UnsupportedLanguage(_))));
        assert!(outcome.changed.is_none());
        assert_eq!(outcome.language, "en");

        let html = String::from_utf8(outcome.data).unwrap();
        assert!(html.contains("<h1>Welcome</h1>"));
        assert!(!html.contains("data-original-text"));
    }
}
