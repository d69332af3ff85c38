//! 页面翻译器
//!
//! `PageTranslator` 是显式传递的上下文对象，持有提供者、资源包、偏好存储、
//! 当前语言和通知通道。一次语言切换称为一个周期：
//!
//! 收集元素 -> 提取唯一文本 -> 提供者批量翻译 -> 写回 DOM -> 更新次要内容
//!
//! 成功后更新当前语言、保存偏好、刷新选择器并发布事件；失败时当前语言与
//! 偏好保持不变，已经写回的元素不会回滚。
//!
//! 周期通过单槽异步锁串行执行。等待中的请求拿到锁后重新判断目标语言是否
//! 已经生效。DOM 句柄基于 `Rc`，因此周期的 future 不是 `Send`，需要在
//! 同一个任务内驱动（例如 `current_thread` 运行时或 `tokio::join!`）。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use markup5ever_rcdom::RcDom;
use serde::Serialize;
use tokio::sync::{broadcast, Mutex};

use crate::translation::bundle::TranslationBundle;
use crate::translation::config::TranslatorConfig;
use crate::translation::error::{helpers, TranslationError, TranslationResult};
use crate::translation::languages::{self, LanguageDescriptor, SUPPORTED_LANGUAGES};
use crate::translation::notifier::{LanguageEvent, Notifier};
use crate::translation::pipeline::{
    apply_translations, update_dynamic_content, DynamicContentReport, TextCollector,
};
use crate::translation::provider::{build_provider, TranslationProvider};
use crate::translation::selector_ui;
use crate::translation::storage::LanguagePreference;

/// 一次成功周期的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub target: String,
    /// 收集到的元素数（同一元素匹配多个选择器时重复计数）
    pub elements: usize,
    /// 发送给提供者的唯一文本数
    pub unique_texts: usize,
    /// 被改写的不同元素数
    pub patched: usize,
    #[serde(skip)]
    pub dynamic: DynamicContentReport,
    #[serde(skip)]
    pub duration: Duration,
}

/// `change_language` 的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// 目标语言已经生效，没有任何改动
    Unchanged,
    Applied(CycleReport),
}

impl CycleOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, CycleOutcome::Applied(_))
    }
}

/// 翻译器统计
#[derive(Debug, Default)]
pub struct TranslatorStats {
    pub cycles_started: AtomicUsize,
    pub cycles_applied: AtomicUsize,
    pub cycles_failed: AtomicUsize,
    pub cycles_unchanged: AtomicUsize,
    pub texts_requested: AtomicUsize,
}

impl TranslatorStats {
    pub fn snapshot(&self) -> TranslatorStatsSnapshot {
        TranslatorStatsSnapshot {
            cycles_started: self.cycles_started.load(Ordering::Relaxed),
            cycles_applied: self.cycles_applied.load(Ordering::Relaxed),
            cycles_failed: self.cycles_failed.load(Ordering::Relaxed),
            cycles_unchanged: self.cycles_unchanged.load(Ordering::Relaxed),
            texts_requested: self.texts_requested.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TranslatorStatsSnapshot {
    pub cycles_started: usize,
    pub cycles_applied: usize,
    pub cycles_failed: usize,
    pub cycles_unchanged: usize,
    pub texts_requested: usize,
}

/// 页面翻译器
pub struct PageTranslator {
    provider: Arc<dyn TranslationProvider>,
    collector: TextCollector,
    bundle: Arc<TranslationBundle>,
    preference: LanguagePreference,
    notifier: Notifier,
    current: RwLock<String>,
    cycle_lock: Mutex<()>,
    stats: TranslatorStats,
}

impl PageTranslator {
    /// 创建翻译器，当前语言取自已保存的偏好
    pub fn new(
        provider: Arc<dyn TranslationProvider>,
        preference: LanguagePreference,
    ) -> TranslationResult<Self> {
        Ok(Self {
            provider,
            collector: TextCollector::standard()?,
            bundle: Arc::new(TranslationBundle::builtin()?),
            current: RwLock::new(preference.load()),
            preference,
            notifier: Notifier::new(crate::translation::config::constants::DEFAULT_EVENT_CAPACITY),
            cycle_lock: Mutex::new(()),
            stats: TranslatorStats::default(),
        })
    }

    /// 按配置组装全部协作者
    pub fn from_config(config: &TranslatorConfig) -> TranslationResult<Self> {
        config.validate()?;

        let translator = Self::new(build_provider(config)?, LanguagePreference::from_config(config)?)?
            .with_collector(TextCollector::from_config(config)?)
            .with_bundle(TranslationBundle::load(config.bundle_path.as_deref())?)
            .with_event_capacity(config.event_capacity);

        tracing::info!(
            "页面翻译器就绪: 提供者={}, 当前语言={}",
            translator.provider.name(),
            translator.current_language()
        );
        Ok(translator)
    }

    pub fn with_collector(mut self, collector: TextCollector) -> Self {
        self.collector = collector;
        self
    }

    pub fn with_bundle(mut self, bundle: TranslationBundle) -> Self {
        self.bundle = Arc::new(bundle);
        self
    }

    /// 替换通知通道；已有的订阅者不会收到新通道的事件
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.notifier = Notifier::new(capacity);
        self
    }

    pub fn current_language(&self) -> String {
        match self.current.read() {
            Ok(current) => current.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn supported_languages(&self) -> &'static [LanguageDescriptor] {
        SUPPORTED_LANGUAGES
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LanguageEvent> {
        self.notifier.subscribe()
    }

    pub fn stats(&self) -> TranslatorStatsSnapshot {
        self.stats.snapshot()
    }

    /// 按需翻译单条文本，失败时返回原文
    pub async fn translate_text(&self, text: &str, target: &str) -> String {
        match self.provider.translate_one(text, target).await {
            Ok(translated) => translated,
            Err(e) => {
                tracing::warn!("文本翻译失败，使用原文: {}", e);
                text.to_string()
            }
        }
    }

    /// 切换页面语言
    ///
    /// 目标语言已生效时返回 `Unchanged`，不修改 DOM 也不写偏好。
    /// 周期失败时发布失败事件并返回错误，当前语言与偏好不变。
    pub async fn change_language(&self, dom: &RcDom, target: &str) -> TranslationResult<CycleOutcome> {
        let _cycle = self.cycle_lock.lock().await;

        if self.current_language() == target {
            tracing::debug!("语言 {} 已生效，跳过", target);
            self.stats.cycles_unchanged.fetch_add(1, Ordering::Relaxed);
            return Ok(CycleOutcome::Unchanged);
        }

        tracing::info!("切换语言: {} -> {}", self.current_language(), target);
        self.stats.cycles_started.fetch_add(1, Ordering::Relaxed);

        match self.run_cycle(dom, target).await {
            Ok(report) => {
                self.set_current(target);

                if let Err(e) = self.preference.save(target) {
                    helpers::log_error(&e.with_context("保存语言偏好"));
                }
                self.refresh_ui(dom, target);

                self.notifier.emit(LanguageEvent::LanguageChanged {
                    language: target.to_string(),
                });
                self.notifier.emit(LanguageEvent::succeeded(target));
                self.stats.cycles_applied.fetch_add(1, Ordering::Relaxed);

                tracing::info!(
                    "已切换到 {}: {} 条文本, {} 个元素, 耗时 {:?}",
                    target,
                    report.unique_texts,
                    report.patched,
                    report.duration
                );
                Ok(CycleOutcome::Applied(report))
            }
            Err(e) => {
                tracing::error!("翻译到 {} 失败: {}", target, e);
                self.notifier.emit(LanguageEvent::failed(target));
                self.stats.cycles_failed.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }

    /// 注入语言选择器，然后恢复已保存的语言
    pub async fn attach(&self, dom: &RcDom) -> TranslationResult<Option<CycleReport>> {
        selector_ui::inject_language_selectors(dom, &self.current_language())?;
        self.restore(dom).await
    }

    /// 当前语言不是源语言时对页面执行一次翻译
    ///
    /// 恢复过程不写偏好，也不做已生效判断。
    pub async fn restore(&self, dom: &RcDom) -> TranslationResult<Option<CycleReport>> {
        let _cycle = self.cycle_lock.lock().await;
        let current = self.current_language();

        if current == languages::DEFAULT_LANGUAGE {
            return Ok(None);
        }

        tracing::info!("恢复已保存的语言: {}", current);
        match self.run_cycle(dom, &current).await {
            Ok(report) => Ok(Some(report)),
            Err(e) => {
                tracing::error!("恢复语言 {} 失败: {}", current, e);
                self.notifier.emit(LanguageEvent::failed(&current));
                Err(e)
            }
        }
    }

    /// 加载提示包住的一次完整翻译
    async fn run_cycle(&self, dom: &RcDom, target: &str) -> TranslationResult<CycleReport> {
        self.notifier.emit(LanguageEvent::LoadingStarted {
            target: target.to_string(),
        });
        let result = self.translate_page(dom, target).await;
        self.notifier.emit(LanguageEvent::LoadingFinished);
        result
    }

    async fn translate_page(&self, dom: &RcDom, target: &str) -> TranslationResult<CycleReport> {
        if !languages::is_supported(target) {
            return Err(TranslationError::UnsupportedLanguage(target.to_string()));
        }

        let start = Instant::now();
        let elements = self.collector.collect_elements(&dom.document);
        let texts = self.collector.extract_unique_texts(&elements);

        let patched = if texts.is_empty() {
            tracing::debug!("没有需要翻译的文本");
            0
        } else {
            self.stats
                .texts_requested
                .fetch_add(texts.len(), Ordering::Relaxed);
            let translated = self.provider.translate_batch(&texts, target).await?;
            apply_translations(&self.collector, &elements, &texts, &translated)?
        };

        let dynamic = update_dynamic_content(&dom.document, &self.bundle, target)?;

        Ok(CycleReport {
            target: target.to_string(),
            elements: elements.len(),
            unique_texts: texts.len(),
            patched,
            dynamic,
            duration: start.elapsed(),
        })
    }

    fn set_current(&self, code: &str) {
        match self.current.write() {
            Ok(mut current) => *current = code.to_string(),
            Err(poisoned) => *poisoned.into_inner() = code.to_string(),
        }
    }

    fn refresh_ui(&self, dom: &RcDom, current: &str) {
        let refreshed = selector_ui::refresh_language_selectors(&dom.document, current)
            .and_then(|_| selector_ui::close_mobile_nav(&dom.document));
        if let Err(e) = refreshed {
            helpers::log_error(&e);
        }
    }
}

impl std::fmt::Debug for PageTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageTranslator")
            .field("provider", &self.provider.name())
            .field("current", &self.current_language())
            .field("preference", &self.preference)
            .finish()
    }
}
