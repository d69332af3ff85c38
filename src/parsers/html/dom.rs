use std::cell::RefCell;
use std::rc::Rc;

use encoding_rs::Encoding;
use html5ever::interface::{Attribute, QualName};
use html5ever::parse_document;
use html5ever::tendril::{format_tendril, StrTendril, TendrilSink};
use html5ever::tree_builder::create_element as sink_create_element;
use html5ever::{namespace_url, ns, LocalName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom};

use crate::translation::error::{helpers, TranslationResult};

/// 将 HTML 字节转换为 DOM
pub fn html_to_dom(data: &[u8], document_encoding: &str) -> TranslationResult<RcDom> {
    let s: String = match Encoding::for_label(document_encoding.as_bytes()) {
        Some(encoding) => {
            let (string, _, _) = encoding.decode(data);
            string.into_owned()
        }
        None => String::from_utf8_lossy(data).into_owned(),
    };

    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut s.as_bytes())
        .map_err(|e| helpers::dom_error(format!("HTML解析失败: {}", e)))
}

/// 获取节点名称
pub fn get_node_name(node: &Handle) -> Option<&'_ str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

pub fn is_element(node: &Handle) -> bool {
    matches!(node.data, NodeData::Element { .. })
}

/// 获取节点属性值
pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == attr_name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

pub fn has_node_attr(node: &Handle, attr_name: &str) -> bool {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .any(|attr| &*attr.name.local == attr_name),
        _ => false,
    }
}

/// 设置节点属性，`None` 表示删除
pub fn set_node_attr(node: &Handle, attr_name: &str, attr_value: Option<String>) {
    if let NodeData::Element { attrs, .. } = &node.data {
        let attrs_mut = &mut attrs.borrow_mut();
        let mut i = 0;
        let mut found_existing_attr: bool = false;

        while i < attrs_mut.len() {
            if &attrs_mut[i].name.local == attr_name {
                found_existing_attr = true;

                if let Some(attr_value) = attr_value.as_deref() {
                    attrs_mut[i].value.clear();
                    attrs_mut[i].value.push_slice(attr_value);
                } else {
                    // Remove attr completely if attr_value is not defined
                    attrs_mut.remove(i);
                    continue;
                }
            }

            i += 1;
        }

        if !found_existing_attr {
            if let Some(attr_value) = attr_value {
                attrs_mut.push(new_attribute(attr_name, &attr_value));
            }
        }
    };
}

fn new_attribute(name: &str, value: &str) -> Attribute {
    Attribute {
        name: QualName::new(None, ns!(), LocalName::from(name)),
        value: format_tendril!("{}", value),
    }
}

/// 元素的 class 列表
pub fn get_classes(node: &Handle) -> Vec<String> {
    get_node_attr(node, "class")
        .map(|value| value.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

pub fn has_class(node: &Handle, class_name: &str) -> bool {
    get_node_attr(node, "class")
        .map_or(false, |value| value.split_whitespace().any(|c| c == class_name))
}

/// 移除一个 class，返回是否发生了修改
pub fn remove_class(node: &Handle, class_name: &str) -> bool {
    let classes = get_classes(node);
    if !classes.iter().any(|c| c == class_name) {
        return false;
    }

    let remaining: Vec<String> = classes.into_iter().filter(|c| c != class_name).collect();
    if remaining.is_empty() {
        set_node_attr(node, "class", None);
    } else {
        set_node_attr(node, "class", Some(remaining.join(" ")));
    }
    true
}

/// 获取父节点，不会破坏节点上保存的父引用
pub fn get_parent_node(child: &Handle) -> Option<Handle> {
    let weak = child.parent.take();
    let parent = weak.as_ref().and_then(|node| node.upgrade());
    child.parent.set(weak);
    parent
}

/// 自身或任一祖先带有指定属性
pub fn closest_with_attr(node: &Handle, attr_name: &str) -> Option<Handle> {
    let mut current = Some(node.clone());
    while let Some(candidate) = current {
        if has_node_attr(&candidate, attr_name) {
            return Some(candidate);
        }
        current = get_parent_node(&candidate);
    }
    None
}

/// 节点的全部文本内容（等价于 textContent）
pub fn text_content(node: &Handle) -> String {
    let mut text = String::new();
    collect_text(node, &mut text);
    text
}

fn collect_text(node: &Handle, out: &mut String) {
    if let NodeData::Text { contents } = &node.data {
        out.push_str(&contents.borrow());
    }
    for child in node.children.borrow().iter() {
        collect_text(child, out);
    }
}

/// 文本节点的内容；其他节点返回 `None`
pub fn text_node_contents(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Text { contents } => Some(contents.borrow().to_string()),
        _ => None,
    }
}

/// 原地改写文本节点，节点本身保持不变
pub fn set_text_node_contents(node: &Handle, text: &str) -> bool {
    match &node.data {
        NodeData::Text { contents } => {
            *contents.borrow_mut() = StrTendril::from_slice(text);
            true
        }
        _ => false,
    }
}

pub fn has_element_children(node: &Handle) -> bool {
    node.children.borrow().iter().any(is_element)
}

/// 以单个文本节点替换全部子节点
pub fn set_text_content(node: &Handle, text: &str) {
    for child in node.children.borrow_mut().drain(..) {
        child.parent.set(None);
    }
    if !text.is_empty() {
        append_child(node, create_text_node(text));
    }
}

pub fn create_text_node(text: &str) -> Handle {
    Node::new(NodeData::Text {
        contents: RefCell::new(StrTendril::from_slice(text)),
    })
}

/// 创建 HTML 元素
pub fn create_element(dom: &RcDom, tag: &str, attrs: &[(&str, &str)]) -> Handle {
    sink_create_element(
        dom,
        QualName::new(None, ns!(html), LocalName::from(tag)),
        attrs
            .iter()
            .map(|(name, value)| new_attribute(name, value))
            .collect(),
    )
}

/// 把节点从原父节点移除
pub fn detach_node(node: &Handle) {
    if let Some(parent) = get_parent_node(node) {
        parent
            .children
            .borrow_mut()
            .retain(|child| !Rc::ptr_eq(child, node));
    }
    node.parent.set(None);
}

pub fn append_child(parent: &Handle, child: Handle) {
    detach_node(&child);
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

/// 在 `reference` 之前插入；`reference` 不是子节点时追加到末尾
pub fn insert_before(parent: &Handle, child: Handle, reference: &Handle) {
    detach_node(&child);
    child.parent.set(Some(Rc::downgrade(parent)));
    let mut children = parent.children.borrow_mut();
    match children.iter().position(|c| Rc::ptr_eq(c, reference)) {
        Some(index) => children.insert(index, child),
        None => children.push(child),
    }
}

/// 按文档顺序返回所有元素（含根节点自身）
pub fn walk_elements(root: &Handle) -> Vec<Handle> {
    let mut found = Vec::new();
    push_elements(root, &mut found);
    found
}

fn push_elements(node: &Handle, found: &mut Vec<Handle>) {
    if is_element(node) {
        found.push(node.clone());
    }
    for child in node.children.borrow().iter() {
        push_elements(child, found);
    }
}

/// 按名称获取直接子元素
pub fn get_child_node_by_name(parent: &Handle, node_name: &str) -> Option<Handle> {
    parent
        .children
        .borrow()
        .iter()
        .find(|child| get_node_name(child) == Some(node_name))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(dom: &RcDom) -> Handle {
        let html = get_child_node_by_name(&dom.document, "html").unwrap();
        get_child_node_by_name(&html, "body").unwrap()
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let dom = html_to_dom(b"<p>Hello <b>big</b> world</p>", "utf-8").unwrap();
        let p = get_child_node_by_name(&body(&dom), "p").unwrap();
        assert_eq!(text_content(&p), "Hello big world");
    }

    #[test]
    fn test_set_text_content_replaces_children() {
        let dom = html_to_dom(b"<p>Hello <b>big</b> world</p>", "utf-8").unwrap();
        let p = get_child_node_by_name(&body(&dom), "p").unwrap();
        set_text_content(&p, "नमस्ते");
        assert_eq!(text_content(&p), "नमस्ते");
        assert_eq!(p.children.borrow().len(), 1);
        assert!(Rc::ptr_eq(&get_parent_node(&p.children.borrow()[0]).unwrap(), &p));
    }

    #[test]
    fn test_parent_lookup_is_repeatable() {
        let dom = html_to_dom(b"<div><span>x</span></div>", "utf-8").unwrap();
        let div = get_child_node_by_name(&body(&dom), "div").unwrap();
        let span = get_child_node_by_name(&div, "span").unwrap();
        assert!(get_parent_node(&span).is_some());
        assert!(get_parent_node(&span).is_some());
    }

    #[test]
    fn test_attr_helpers() {
        let dom = html_to_dom(b"<div class=\"a active b\" data-x=\"1\"></div>", "utf-8").unwrap();
        let div = get_child_node_by_name(&body(&dom), "div").unwrap();

        assert!(has_class(&div, "active"));
        assert!(remove_class(&div, "active"));
        assert!(!remove_class(&div, "active"));
        assert_eq!(get_node_attr(&div, "class").as_deref(), Some("a b"));

        set_node_attr(&div, "data-x", Some("2".to_string()));
        assert_eq!(get_node_attr(&div, "data-x").as_deref(), Some("2"));
        set_node_attr(&div, "data-x", None);
        assert!(!has_node_attr(&div, "data-x"));
    }

    #[test]
    fn test_insert_before_and_detach() {
        let dom = html_to_dom(b"<ul><li id=\"a\"></li><li id=\"b\"></li></ul>", "utf-8").unwrap();
        let ul = get_child_node_by_name(&body(&dom), "ul").unwrap();
        let b = ul.children.borrow()[1].clone();

        let new_li = create_element(&dom, "li", &[("id", "n")]);
        insert_before(&ul, new_li.clone(), &b);
        let ids: Vec<String> = ul
            .children
            .borrow()
            .iter()
            .filter_map(|c| get_node_attr(c, "id"))
            .collect();
        assert_eq!(ids, vec!["a", "n", "b"]);

        detach_node(&new_li);
        assert_eq!(ul.children.borrow().len(), 2);
        assert!(get_parent_node(&new_li).is_none());
    }

    #[test]
    fn test_text_node_rewrite_keeps_siblings() {
        let dom = html_to_dom(b"<p>Free <a>all</a> today</p>", "utf-8").unwrap();
        let p = get_child_node_by_name(&body(&dom), "p").unwrap();
        assert!(has_element_children(&p));

        let first = p.children.borrow()[0].clone();
        assert_eq!(text_node_contents(&first).as_deref(), Some("Free "));
        assert!(set_text_node_contents(&first, "Gratis "));
        assert!(!set_text_node_contents(&p, "x"));

        assert_eq!(text_content(&p), "Gratis all today");
        assert_eq!(p.children.borrow().len(), 3);
    }

    #[test]
    fn test_decodes_declared_encoding() {
        let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode("<p>caf\u{e9}</p>");
        let dom = html_to_dom(&bytes, "windows-1252").unwrap();
        let p = get_child_node_by_name(&body(&dom), "p").unwrap();
        assert_eq!(text_content(&p), "café");
    }
}
