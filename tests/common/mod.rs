// 集成测试公共模块
//
// 提供测试辅助工具和共享功能

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use markup5ever_rcdom::{Handle, RcDom};

use page_translator::parsers::html::dom::{get_node_attr, text_content};
use page_translator::parsers::html::{html_to_dom, select, select_first};
use page_translator::translation::error::{TranslationError, TranslationResult};
use page_translator::translation::provider::{StaticProvider, TranslationProvider};
use page_translator::translation::storage::{LanguagePreference, MemoryPreferenceStore, PreferenceStore};
use page_translator::translation::PageTranslator;

pub const STORAGE_KEY: &str = "swadesi-language";

/// HTML 测试助手
pub struct HtmlTestHelper;

impl HtmlTestHelper {
    pub fn create_test_dom(html: &str) -> RcDom {
        html_to_dom(html.as_bytes(), "utf-8").expect("test HTML should parse")
    }

    /// 店面页面：页头、移动端导航、可翻译内容与排除项
    pub fn create_storefront_page() -> String {
        r#"<!DOCTYPE html>
<html>
<head>
    <title>SwaDesi Bazaar | Your Local Market, Powered by AI</title>
    <meta name="description" content="Discover authentic local treasures and connect with artisans in your community. Premium quality handcrafted products with modern e-commerce convenience.">
</head>
<body>
    <header>
        <div class="header-actions">
            <button class="cart">Cart</button>
            <div class="auth-buttons"><button>Login</button></div>
        </div>
    </header>
    <nav class="mobile-nav active">
        <ul class="mobile-nav-links">
            <li><a href="/">Home</a></li>
            <li><a href="/shop">Shop</a></li>
        </ul>
    </nav>
    <main>
        <h1>Welcome</h1>
        <p class="no-translate">Raw</p>
        <span>Welcome</span>
        <h2 data-custom-translate="feature_ai">AI-Powered Assistance</h2>
        <section data-no-translate><p>SwaDesi</p></section>
        <pre>cargo run</pre>
        <input type="search" placeholder="Search for products, artisans, or categories...">
        <img src="craft.png" alt="Handicrafts">
    </main>
</body>
</html>"#
            .to_string()
    }

    /// 第一个匹配元素的文本内容
    pub fn text_of(dom: &RcDom, selector: &str) -> String {
        let element = select_first(&dom.document, selector)
            .expect("selector should parse")
            .unwrap_or_else(|| panic!("no element matches {}", selector));
        text_content(&element)
    }

    pub fn attr_of(dom: &RcDom, selector: &str, attr: &str) -> Option<String> {
        let element: Handle = select_first(&dom.document, selector).ok()??;
        get_node_attr(&element, attr)
    }

    pub fn count(dom: &RcDom, selector: &str) -> usize {
        select(&dom.document, selector).expect("selector should parse").len()
    }
}

/// 记录每次调用的提供者，翻译结果与静态提供者一致
#[derive(Default)]
pub struct CountingProvider {
    calls: Mutex<Vec<String>>,
    batches: AtomicUsize,
}

impl CountingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// 全部被请求过的文本，按请求顺序
    pub fn requested(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn batch_count(&self) -> usize {
        self.batches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationProvider for CountingProvider {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn translate_one(&self, text: &str, target: &str) -> TranslationResult<String> {
        self.calls.lock().expect("calls lock").push(text.to_string());
        Ok(StaticProvider::render(text, target))
    }

    async fn translate_batch(&self, texts: &[String], target: &str) -> TranslationResult<Vec<String>> {
        self.batches.fetch_add(1, Ordering::SeqCst);
        // 像真实的网络调用一样挂起一次，让并发的周期有机会交错
        tokio::task::yield_now().await;
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.translate_one(text, target).await?);
        }
        Ok(results)
    }
}

/// 对指定文本返回错误，其余文本正常翻译；使用默认的逐条回退批处理
pub struct FailingProvider {
    failing_text: String,
}

impl FailingProvider {
    pub fn failing_on(text: &str) -> Self {
        Self {
            failing_text: text.to_string(),
        }
    }
}

#[async_trait]
impl TranslationProvider for FailingProvider {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn translate_one(&self, text: &str, target: &str) -> TranslationResult<String> {
        if text == self.failing_text {
            return Err(TranslationError::TranslationServiceError("HTTP 状态 500".to_string()));
        }
        Ok(StaticProvider::render(text, target))
    }
}

/// 整个批次失败，用来制造周期级错误
pub struct ErrorProvider;

#[async_trait]
impl TranslationProvider for ErrorProvider {
    fn name(&self) -> &'static str {
        "error"
    }

    async fn translate_one(&self, _text: &str, _target: &str) -> TranslationResult<String> {
        Err(TranslationError::NetworkError("unreachable".to_string()))
    }

    async fn translate_batch(&self, _texts: &[String], _target: &str) -> TranslationResult<Vec<String>> {
        Err(TranslationError::ProcessingError("batch rejected".to_string()))
    }
}

/// 统计写入次数的内存存储
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryPreferenceStore,
    writes: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::default();
        store.inner.set(key, value).expect("memory store");
        store
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.inner.get(key).expect("memory store")
    }
}

impl PreferenceStore for CountingStore {
    fn get(&self, key: &str) -> TranslationResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> TranslationResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value)
    }
}

/// 组装好的测试环境
pub struct TestEnvironment<P: TranslationProvider + 'static> {
    pub provider: Arc<P>,
    pub store: Arc<CountingStore>,
    pub translator: PageTranslator,
}

impl<P: TranslationProvider + 'static> TestEnvironment<P> {
    pub fn new(provider: P) -> Self {
        Self::with_store(provider, CountingStore::new())
    }

    pub fn with_store(provider: P, store: CountingStore) -> Self {
        let provider = Arc::new(provider);
        let store = Arc::new(store);
        let preference = LanguagePreference::new(store.clone(), STORAGE_KEY, "en");
        let translator = PageTranslator::new(provider.clone(), preference)
            .expect("translator should build");
        Self {
            provider,
            store,
            translator,
        }
    }
}

/// 每个带有原文标记的元素：原文 -> 当前文本
pub fn stamped_texts(dom: &RcDom) -> HashMap<String, String> {
    select(&dom.document, "[data-original-text]")
        .expect("selector should parse")
        .iter()
        .filter_map(|element| {
            get_node_attr(element, "data-original-text")
                .map(|original| (original, text_content(element)))
        })
        .collect()
}
