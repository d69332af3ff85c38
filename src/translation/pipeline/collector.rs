//! 文本收集器模块
//!
//! 按固定选择器顺序收集可翻译元素，并提取去重后的源文本
//!
//! 只含文本的元素整体翻译；含子元素的元素只翻译归属于它的文本节点，
//! 子元素本身（链接、图标、不翻译的徽标）保持原样。

use std::collections::HashSet;

use markup5ever_rcdom::Handle;

use crate::parsers::html::dom::{
    get_node_attr, has_element_children, is_element, text_content, text_node_contents, walk_elements,
};
use crate::parsers::html::Selector;
use crate::translation::config::{constants, TranslatorConfig};
use crate::translation::error::TranslationResult;
use crate::translation::pipeline::filters::ExclusionFilter;

/// 容器元素中的一个文本节点及其原文（含首尾空白）
#[derive(Debug, Clone)]
pub struct TextSegment {
    pub node: Handle,
    pub original: String,
}

impl TextSegment {
    /// 送去翻译的文本
    pub fn source(&self) -> &str {
        self.original.trim()
    }
}

/// 元素的源文本
///
/// 已记录原文时总是从原文出发，重复翻译不会在上一次的译文上叠加。
#[derive(Debug, Clone)]
pub enum ElementText {
    /// 没有子元素，整体替换
    Whole(String),
    /// 有子元素，逐个文本节点原地改写
    Segments(Vec<TextSegment>),
}

impl ElementText {
    /// 非空的源文本，按文档顺序
    pub fn sources(&self) -> Vec<&str> {
        match self {
            ElementText::Whole(text) if text.is_empty() => Vec::new(),
            ElementText::Whole(text) => vec![text.as_str()],
            ElementText::Segments(segments) => segments
                .iter()
                .map(TextSegment::source)
                .filter(|source| !source.is_empty())
                .collect(),
        }
    }
}

/// 文本收集器
#[derive(Debug, Clone)]
pub struct TextCollector {
    selectors: Vec<Selector>,
    filter: ExclusionFilter,
}

impl TextCollector {
    /// 使用给定选择器列表创建收集器
    pub fn with_selectors<S: AsRef<str>>(selectors: &[S]) -> TranslationResult<Self> {
        let selectors = selectors
            .iter()
            .map(|s| Selector::parse(s.as_ref()))
            .collect::<TranslationResult<Vec<_>>>()?;

        Ok(Self {
            filter: ExclusionFilter::new(selectors.clone()),
            selectors,
        })
    }

    /// 使用内置选择器列表创建收集器
    pub fn standard() -> TranslationResult<Self> {
        Self::with_selectors(constants::TRANSLATABLE_SELECTORS)
    }

    pub fn from_config(config: &TranslatorConfig) -> TranslationResult<Self> {
        Self::with_selectors(config.selectors.as_slice())
    }

    /// 按选择器顺序收集元素
    ///
    /// 同一元素匹配多个选择器时会出现多次；写入按元素身份进行，重复无害。
    pub fn collect_elements(&self, document: &Handle) -> Vec<Handle> {
        let all_elements = walk_elements(document);
        let mut elements = Vec::new();

        for selector in &self.selectors {
            for element in all_elements.iter().filter(|e| selector.matches(e)) {
                if !self.filter.should_skip(element) {
                    elements.push(element.clone());
                }
            }
        }

        tracing::debug!("收集到 {} 个可翻译元素", elements.len());
        elements
    }

    /// 提取去重后的非空源文本，保持首次出现的顺序
    pub fn extract_unique_texts(&self, elements: &[Handle]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut texts = Vec::new();

        for element in elements {
            for text in self.element_text(element).sources() {
                if seen.insert(text.to_string()) {
                    texts.push(text.to_string());
                }
            }
        }

        tracing::debug!("提取到 {} 条唯一文本", texts.len());
        texts
    }

    /// 读取元素的源文本
    pub fn element_text(&self, element: &Handle) -> ElementText {
        if !has_element_children(element) {
            let text = match get_node_attr(element, constants::ORIGINAL_TEXT_ATTR) {
                Some(original) => original,
                None => text_content(element).trim().to_string(),
            };
            return ElementText::Whole(text);
        }

        let mut nodes = Vec::new();
        self.owned_text_nodes(element, &mut nodes);

        // 记录的原文与节点数量对不上时（页面结构已变）按当前文本处理
        let stamped = get_node_attr(element, constants::ORIGINAL_SEGMENTS_ATTR)
            .and_then(|raw| serde_json::from_str::<Vec<String>>(&raw).ok())
            .filter(|originals| originals.len() == nodes.len());

        let segments = match stamped {
            Some(originals) => nodes
                .into_iter()
                .zip(originals)
                .map(|(node, original)| TextSegment { node, original })
                .collect(),
            None => nodes
                .into_iter()
                .map(|node| {
                    let original = text_node_contents(&node).unwrap_or_default();
                    TextSegment { node, original }
                })
                .collect(),
        };

        ElementText::Segments(segments)
    }

    /// 归属于元素的文本节点：不进入自己承载文本或不翻译的子元素
    fn owned_text_nodes(&self, node: &Handle, out: &mut Vec<Handle>) {
        for child in node.children.borrow().iter() {
            if text_node_contents(child).is_some() {
                out.push(child.clone());
            } else if is_element(child) && !self.filter.is_boundary(child) {
                self.owned_text_nodes(child, out);
            }
        }
    }
}
