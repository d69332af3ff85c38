//! 语言选择器界面
//!
//! 在移动端导航和页头操作区注入下拉框。容器不存在时跳过，不视为错误。
//! 注入的节点带有 `data-no-translate`，不会被后续翻译改写。

use markup5ever_rcdom::{Handle, RcDom};

use crate::parsers::html::dom::{
    append_child, create_element, create_text_node, detach_node, get_node_attr, get_parent_node,
    insert_before, remove_class, set_node_attr,
};
use crate::parsers::html::{select, select_first};
use crate::translation::config::constants;
use crate::translation::error::TranslationResult;
use crate::translation::languages::{LanguageDescriptor, SUPPORTED_LANGUAGES};

pub const MOBILE_SELECT_ID: &str = "mobile-language-select";
pub const DESKTOP_SELECT_ID: &str = "desktop-language-select";

const MOBILE_LABEL: &str = "🌐 Language / भाषा";

/// 注入结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectorInjection {
    pub mobile: bool,
    pub desktop: bool,
}

/// 移除旧的选择器并重新注入，`current` 对应的选项被选中
pub fn inject_language_selectors(dom: &RcDom, current: &str) -> TranslationResult<SelectorInjection> {
    let document = &dom.document;

    for selector in [".gtranslate-selector", ".language-selector-mobile"] {
        for existing in select(document, selector)? {
            detach_node(&existing);
        }
    }

    let mut injection = SelectorInjection::default();

    if let Some(mobile_nav) = select_first(document, ".mobile-nav-links")? {
        append_child(&mobile_nav, build_mobile_selector(dom, current));
        injection.mobile = true;
    }

    if let Some(header_actions) = select_first(document, ".header-actions")? {
        let selector = build_desktop_selector(dom, current);
        match select_first(&header_actions, ".auth-buttons")? {
            Some(auth_buttons) => match get_parent_node(&auth_buttons) {
                Some(parent) => insert_before(&parent, selector, &auth_buttons),
                None => append_child(&header_actions, selector),
            },
            None => append_child(&header_actions, selector),
        }
        injection.desktop = true;
    }

    tracing::debug!("语言选择器注入: {:?}", injection);
    Ok(injection)
}

/// 让两个下拉框的选中项跟随当前语言，返回更新的下拉框数量
pub fn refresh_language_selectors(document: &Handle, current: &str) -> TranslationResult<usize> {
    let mut refreshed = 0;

    for id in [DESKTOP_SELECT_ID, MOBILE_SELECT_ID] {
        let Some(select_element) = select_first(document, &format!(r#"select[id="{}"]"#, id))? else {
            continue;
        };
        for option in select(&select_element, "option")? {
            let selected = get_node_attr(&option, "value").as_deref() == Some(current);
            set_node_attr(&option, "selected", selected.then(String::new));
        }
        refreshed += 1;
    }

    Ok(refreshed)
}

/// 关闭已展开的移动端导航
pub fn close_mobile_nav(document: &Handle) -> TranslationResult<bool> {
    let mut closed = false;
    for nav in select(document, ".mobile-nav.active")? {
        closed |= remove_class(&nav, "active");
    }
    Ok(closed)
}

fn build_options<F>(dom: &RcDom, select_element: &Handle, current: &str, label: F)
where
    F: Fn(&LanguageDescriptor) -> String,
{
    for lang in SUPPORTED_LANGUAGES {
        let option = if lang.code == current {
            create_element(dom, "option", &[("value", lang.code), ("selected", "")])
        } else {
            create_element(dom, "option", &[("value", lang.code)])
        };
        append_child(&option, create_text_node(&label(lang)));
        append_child(select_element, option);
    }
}

fn build_mobile_selector(dom: &RcDom, current: &str) -> Handle {
    let item = create_element(
        dom,
        "li",
        &[("class", "language-selector-mobile"), (constants::NO_TRANSLATE_ATTR, "")],
    );
    let dropdown = create_element(dom, "div", &[("class", "mobile-language-dropdown")]);

    let label = create_element(dom, "label", &[("for", MOBILE_SELECT_ID)]);
    append_child(&label, create_text_node(MOBILE_LABEL));

    let select_element = create_element(
        dom,
        "select",
        &[("id", MOBILE_SELECT_ID), ("class", "mobile-language-select")],
    );
    build_options(dom, &select_element, current, |lang| {
        format!("{} ({})", lang.native_name, lang.display_name)
    });

    append_child(&dropdown, label);
    append_child(&dropdown, select_element);
    append_child(&item, dropdown);
    item
}

fn build_desktop_selector(dom: &RcDom, current: &str) -> Handle {
    let wrapper = create_element(
        dom,
        "div",
        &[
            ("class", "language-selector gtranslate-selector"),
            (constants::NO_TRANSLATE_ATTR, ""),
        ],
    );
    let select_element = create_element(dom, "select", &[("id", DESKTOP_SELECT_ID)]);
    build_options(dom, &select_element, current, |lang| lang.native_name.to_string());
    append_child(&wrapper, select_element);
    wrapper
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::html::dom::{get_node_name, text_content};
    use crate::parsers::html::{has_class, html_to_dom};

    const SHELL: &str = r#"<header><div class="header-actions"><div class="cart"></div><div class="auth-buttons"><a>Login</a></div></div></header>
        <nav class="mobile-nav active"><ul class="mobile-nav-links"><li><a>Home</a></li></ul></nav>"#;

    fn selected_value(dom: &RcDom, id: &str) -> Option<String> {
        let select_element = select_first(&dom.document, &format!(r#"select[id="{}"]"#, id))
            .unwrap()
            .unwrap();
        select(&select_element, "option[selected]")
            .unwrap()
            .first()
            .and_then(|option| get_node_attr(option, "value"))
    }

    #[test]
    fn test_injects_both_selectors() {
        let dom = html_to_dom(SHELL.as_bytes(), "utf-8").unwrap();
        let injection = inject_language_selectors(&dom, "ta").unwrap();
        assert_eq!(injection, SelectorInjection { mobile: true, desktop: true });

        let actions = select_first(&dom.document, ".header-actions").unwrap().unwrap();
        let children: Vec<Handle> = actions.children.borrow().iter().cloned().collect();
        let position = |class: &str| children.iter().position(|c| has_class(c, class)).unwrap();
        assert_eq!(position("gtranslate-selector") + 1, position("auth-buttons"));

        assert_eq!(selected_value(&dom, DESKTOP_SELECT_ID).as_deref(), Some("ta"));
        assert_eq!(selected_value(&dom, MOBILE_SELECT_ID).as_deref(), Some("ta"));

        let mobile_item = select_first(&dom.document, ".language-selector-mobile").unwrap().unwrap();
        assert_eq!(get_node_name(&mobile_item), Some("li"));
        assert!(text_content(&mobile_item).contains("தமிழ் (Tamil)"));
    }

    #[test]
    fn test_reinjection_replaces_existing() {
        let dom = html_to_dom(SHELL.as_bytes(), "utf-8").unwrap();
        inject_language_selectors(&dom, "en").unwrap();
        inject_language_selectors(&dom, "hi").unwrap();
        assert_eq!(select(&dom.document, ".gtranslate-selector").unwrap().len(), 1);
        assert_eq!(select(&dom.document, ".language-selector-mobile").unwrap().len(), 1);
    }

    #[test]
    fn test_missing_containers_are_tolerated() {
        let dom = html_to_dom(b"<main><p>Hi</p></main>", "utf-8").unwrap();
        let injection = inject_language_selectors(&dom, "en").unwrap();
        assert_eq!(injection, SelectorInjection::default());
        assert_eq!(refresh_language_selectors(&dom.document, "hi").unwrap(), 0);
    }

    #[test]
    fn test_refresh_and_close_nav() {
        let dom = html_to_dom(SHELL.as_bytes(), "utf-8").unwrap();
        inject_language_selectors(&dom, "en").unwrap();

        assert_eq!(refresh_language_selectors(&dom.document, "bn").unwrap(), 2);
        assert_eq!(selected_value(&dom, DESKTOP_SELECT_ID).as_deref(), Some("bn"));
        assert_eq!(selected_value(&dom, MOBILE_SELECT_ID).as_deref(), Some("bn"));

        assert!(close_mobile_nav(&dom.document).unwrap());
        assert!(!close_mobile_nav(&dom.document).unwrap());
        let nav = select_first(&dom.document, ".mobile-nav").unwrap().unwrap();
        assert!(!has_class(&nav, "active"));
    }
}
