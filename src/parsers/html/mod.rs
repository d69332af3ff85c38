//! HTML解析和处理模块
//!
//! - `dom`: 基础DOM操作（文本、属性、节点增删）
//! - `selector`: 简单选择器的解析与匹配
//! - `serializer`: 序列化功能

pub mod dom;
pub mod selector;
pub mod serializer;

pub use dom::{
    append_child, closest_with_attr, create_element, create_text_node, detach_node,
    get_child_node_by_name, get_node_attr, get_node_name, get_parent_node, has_class,
    has_node_attr, html_to_dom, insert_before, remove_class, set_node_attr, set_text_content,
    text_content, walk_elements,
};
pub use selector::{query_all, query_first, select, select_first, Selector};
pub use serializer::serialize_document;
