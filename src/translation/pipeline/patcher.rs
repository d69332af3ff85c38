//! DOM 写回
//!
//! 主文本按元素身份写回：只含文本的元素整体替换，容器元素逐个文本节点原地改写。
//! 标题、描述、占位符、图片说明和自定义键由资源包解析。
//! 每个被改写的值都会先记录原文，之后的各轮总是从原文出发。

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use markup5ever_rcdom::Handle;

use crate::parsers::html::dom::{
    get_node_attr, set_node_attr, set_text_content, set_text_node_contents, text_content,
};
use crate::parsers::html::select;
use crate::translation::bundle::{BundleSection, TranslationBundle};
use crate::translation::config::constants;
use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::pipeline::collector::{ElementText, TextCollector};

const ORIGINAL_CONTENT_ATTR: &str = "data-original-content";
const ORIGINAL_PLACEHOLDER_ATTR: &str = "data-original-placeholder";
const ORIGINAL_ALT_ATTR: &str = "data-original-alt";

/// 把译文写回元素，返回被改写的不同元素数量
///
/// `originals` 与 `translated` 按位置一一对应。元素以源文本（已标记的原文优先）
/// 查找译文，找不到时保持不变。
pub fn apply_translations(
    collector: &TextCollector,
    elements: &[Handle],
    originals: &[String],
    translated: &[String],
) -> TranslationResult<usize> {
    if originals.len() != translated.len() {
        return Err(TranslationError::ProcessingError(format!(
            "译文数量不匹配: 原文 {} 条, 译文 {} 条",
            originals.len(),
            translated.len()
        )));
    }

    let mapping: HashMap<&str, &str> = originals
        .iter()
        .map(String::as_str)
        .zip(translated.iter().map(String::as_str))
        .collect();

    let mut patched: HashSet<*const markup5ever_rcdom::Node> = HashSet::new();

    for element in elements {
        let changed = match collector.element_text(element) {
            ElementText::Whole(original) => {
                let Some(value) = mapping.get(original.as_str()) else {
                    continue;
                };
                if get_node_attr(element, constants::ORIGINAL_TEXT_ATTR).is_none() {
                    set_node_attr(element, constants::ORIGINAL_TEXT_ATTR, Some(original));
                }
                set_text_content(element, value);
                true
            }
            ElementText::Segments(segments) => {
                let mut changed = false;
                for segment in &segments {
                    let Some(value) = mapping.get(segment.source()) else {
                        continue;
                    };
                    let (leading, trailing) = surrounding_whitespace(&segment.original);
                    set_text_node_contents(&segment.node, &format!("{}{}{}", leading, value, trailing));
                    changed = true;
                }
                if changed && get_node_attr(element, constants::ORIGINAL_SEGMENTS_ATTR).is_none() {
                    let originals: Vec<&str> = segments.iter().map(|s| s.original.as_str()).collect();
                    set_node_attr(
                        element,
                        constants::ORIGINAL_SEGMENTS_ATTR,
                        Some(serde_json::to_string(&originals)?),
                    );
                }
                changed
            }
        };

        if changed {
            set_node_attr(element, constants::TRANSLATED_ATTR, Some("true".to_string()));
            patched.insert(Rc::as_ptr(element));
        }
    }

    tracing::debug!("写回 {} 个元素", patched.len());
    Ok(patched.len())
}

/// 文本前后的空白，改写文本节点时保留，避免与相邻元素粘连
fn surrounding_whitespace(text: &str) -> (&str, &str) {
    let leading = &text[..text.len() - text.trim_start().len()];
    let trailing = &text[text.trim_end().len()..];
    (leading, trailing)
}

/// 次要内容的写回统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DynamicContentReport {
    pub titles: usize,
    pub descriptions: usize,
    pub placeholders: usize,
    pub alts: usize,
    pub custom: usize,
}

/// 从资源包更新标题、描述、占位符、图片说明和自定义键内容
pub fn update_dynamic_content(
    document: &Handle,
    bundle: &TranslationBundle,
    target: &str,
) -> TranslationResult<DynamicContentReport> {
    let mut report = DynamicContentReport::default();

    for title in select(document, "title")? {
        let original = stamp_original(&title, constants::ORIGINAL_TEXT_ATTR, || {
            Some(text_content(&title).trim().to_string())
        });
        if let Some(original) = original {
            let value = resolve(bundle, BundleSection::Title, &original, target);
            set_text_content(&title, &value);
            report.titles += 1;
        }
    }

    for meta in select(document, r#"meta[name="description"]"#)? {
        if patch_attr(&meta, "content", ORIGINAL_CONTENT_ATTR, bundle, BundleSection::Description, target) {
            report.descriptions += 1;
        }
    }

    for selector in ["input[placeholder]", "textarea[placeholder]"] {
        for field in select(document, selector)? {
            if patch_attr(&field, "placeholder", ORIGINAL_PLACEHOLDER_ATTR, bundle, BundleSection::Placeholder, target) {
                report.placeholders += 1;
            }
        }
    }

    for image in select(document, "img[alt]")? {
        if patch_attr(&image, "alt", ORIGINAL_ALT_ATTR, bundle, BundleSection::Alt, target) {
            report.alts += 1;
        }
    }

    let custom_selector = format!("[{}]", constants::CUSTOM_KEY_ATTR);
    for element in select(document, &custom_selector)? {
        let Some(key) = get_node_attr(&element, constants::CUSTOM_KEY_ATTR) else {
            continue;
        };
        match bundle.custom_text(&key, target) {
            Some(text) => {
                set_text_content(&element, text);
                report.custom += 1;
            }
            None => tracing::debug!("自定义键 '{}' 没有条目", key),
        }
    }

    tracing::debug!("次要内容更新: {:?}", report);
    Ok(report)
}

/// 读取已记录的原文；首次遇到时记录当前值
fn stamp_original<F>(element: &Handle, stamp_attr: &str, current: F) -> Option<String>
where
    F: FnOnce() -> Option<String>,
{
    if let Some(original) = get_node_attr(element, stamp_attr) {
        return Some(original);
    }
    let original = current()?;
    set_node_attr(element, stamp_attr, Some(original.clone()));
    Some(original)
}

fn patch_attr(
    element: &Handle,
    attr: &str,
    stamp_attr: &str,
    bundle: &TranslationBundle,
    section: BundleSection,
    target: &str,
) -> bool {
    let Some(original) = stamp_original(element, stamp_attr, || get_node_attr(element, attr)) else {
        return false;
    };
    let value = resolve(bundle, section, &original, target);
    set_node_attr(element, attr, Some(value));
    true
}

/// 未知语言或未知原文都回退到原文
fn resolve(bundle: &TranslationBundle, section: BundleSection, original: &str, target: &str) -> String {
    bundle
        .phrase(section, original, target)
        .unwrap_or(original)
        .to_string()
}
