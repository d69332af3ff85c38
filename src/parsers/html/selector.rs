//! 简单选择器
//!
//! 支持 `tag`、`*`、`.class`、`[attr]`、`[attr="value"]` 的组合（复合选择器），
//! 不支持后代或兄弟组合符。

use std::fmt;

use markup5ever_rcdom::Handle;
use regex::Regex;

use super::dom::{get_node_attr, get_node_name, has_class, walk_elements};
use crate::translation::error::{TranslationError, TranslationResult};

const TAG_PATTERN: &str = r"^(?:[A-Za-z][A-Za-z0-9-]*|\*)";
const PART_PATTERN: &str = r#"\.([\w-]+)|\[([\w-]+)(?:="([^"]*)")?\]"#;

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrMatcher {
    name: String,
    value: Option<String>,
}

/// 已解析的复合选择器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    tag: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatcher>,
}

impl Selector {
    pub fn parse(input: &str) -> TranslationResult<Self> {
        let source = input.trim();
        let invalid = |reason: &str| {
            TranslationError::InvalidInput(format!("选择器 '{}' 无效: {}", source, reason))
        };

        if source.is_empty() {
            return Err(invalid("为空"));
        }

        let tag_re = Regex::new(TAG_PATTERN)
            .map_err(|e| TranslationError::InternalError(e.to_string()))?;
        let part_re = Regex::new(PART_PATTERN)
            .map_err(|e| TranslationError::InternalError(e.to_string()))?;

        let (tag, rest) = match tag_re.find(source) {
            Some(m) if m.as_str() == "*" => (None, &source[m.end()..]),
            Some(m) => (Some(m.as_str().to_ascii_lowercase()), &source[m.end()..]),
            None => (None, source),
        };

        let mut classes = Vec::new();
        let mut attrs = Vec::new();
        let mut position = 0;

        for caps in part_re.captures_iter(rest) {
            let whole = caps.get(0).ok_or_else(|| invalid("无法匹配"))?;
            if whole.start() != position {
                return Err(invalid(&format!("位置 {} 处有多余字符", position)));
            }
            position = whole.end();

            if let Some(class) = caps.get(1) {
                classes.push(class.as_str().to_string());
            } else if let Some(name) = caps.get(2) {
                attrs.push(AttrMatcher {
                    name: name.as_str().to_ascii_lowercase(),
                    value: caps.get(3).map(|v| v.as_str().to_string()),
                });
            }
        }

        if position != rest.len() {
            return Err(invalid(&format!("位置 {} 处有多余字符", position)));
        }

        if tag.is_none() && classes.is_empty() && attrs.is_empty() && source != "*" {
            return Err(invalid("没有任何条件"));
        }

        Ok(Self {
            source: source.to_string(),
            tag,
            classes,
            attrs,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// 元素是否匹配；非元素节点永远不匹配
    pub fn matches(&self, node: &Handle) -> bool {
        let Some(name) = get_node_name(node) else {
            return false;
        };

        if let Some(tag) = &self.tag {
            if !name.eq_ignore_ascii_case(tag) {
                return false;
            }
        }

        if !self.classes.iter().all(|class| has_class(node, class)) {
            return false;
        }

        self.attrs.iter().all(|matcher| {
            match (get_node_attr(node, &matcher.name), &matcher.value) {
                (Some(actual), Some(expected)) => &actual == expected,
                (Some(_), None) => true,
                (None, _) => false,
            }
        })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// 按文档顺序返回所有匹配元素
pub fn query_all(root: &Handle, selector: &Selector) -> Vec<Handle> {
    walk_elements(root)
        .into_iter()
        .filter(|node| selector.matches(node))
        .collect()
}

pub fn query_first(root: &Handle, selector: &Selector) -> Option<Handle> {
    walk_elements(root)
        .into_iter()
        .find(|node| selector.matches(node))
}

/// 解析并查询，选择器无效时返回错误
pub fn select(root: &Handle, selector: &str) -> TranslationResult<Vec<Handle>> {
    Ok(query_all(root, &Selector::parse(selector)?))
}

pub fn select_first(root: &Handle, selector: &str) -> TranslationResult<Option<Handle>> {
    Ok(query_first(root, &Selector::parse(selector)?))
}
