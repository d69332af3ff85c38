//! 元素排除规则
//!
//! 规则按顺序判断，命中第一条即跳过该元素：
//! 1. 自身带有 `no-translate` class
//! 2. 自身或任一祖先带有 `data-no-translate` 属性
//! 3. 元素类型不允许翻译（code、pre、script）
//! 4. 去除首尾空白后没有文本
//!
//! 含有子元素的元素不会被跳过，收集器只翻译归属于它的文本节点。

use markup5ever_rcdom::Handle;

use crate::parsers::html::dom::{closest_with_attr, get_node_name, has_class, has_node_attr, text_content};
use crate::parsers::html::Selector;
use crate::translation::config::constants;

/// 跳过原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    OptOutClass,
    OptOutAttribute,
    DisallowedElement,
    Empty,
}

/// 排除过滤器
#[derive(Debug, Clone)]
pub struct ExclusionFilter {
    skip_elements: Vec<String>,
    selectors: Vec<Selector>,
}

impl ExclusionFilter {
    pub fn new(selectors: Vec<Selector>) -> Self {
        Self {
            skip_elements: constants::SKIP_ELEMENTS.iter().map(|s| s.to_string()).collect(),
            selectors,
        }
    }

    /// 返回第一条命中的规则
    pub fn skip_reason(&self, element: &Handle) -> Option<SkipReason> {
        if has_class(element, constants::NO_TRANSLATE_CLASS) {
            return Some(SkipReason::OptOutClass);
        }

        if closest_with_attr(element, constants::NO_TRANSLATE_ATTR).is_some() {
            return Some(SkipReason::OptOutAttribute);
        }

        if let Some(name) = get_node_name(element) {
            if self.skip_elements.iter().any(|skip| name.eq_ignore_ascii_case(skip)) {
                return Some(SkipReason::DisallowedElement);
            }
        }

        if text_content(element).trim().is_empty() {
            return Some(SkipReason::Empty);
        }

        None
    }

    pub fn should_skip(&self, element: &Handle) -> bool {
        self.skip_reason(element).is_some()
    }

    /// 收集容器文本时是否停在这个子元素
    ///
    /// 子元素自己匹配选择器（由它自己承载文本）或自身声明不翻译时，
    /// 它的文本不归属于外层容器。
    pub fn is_boundary(&self, child: &Handle) -> bool {
        if self.selectors.iter().any(|s| s.matches(child)) {
            return true;
        }
        if has_class(child, constants::NO_TRANSLATE_CLASS) || has_node_attr(child, constants::NO_TRANSLATE_ATTR) {
            return true;
        }
        get_node_name(child).map_or(false, |name| {
            self.skip_elements.iter().any(|skip| name.eq_ignore_ascii_case(skip))
        })
    }
}
