use crate::error::{PolyvoxError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Trait for text translation.
///
/// The source language is a property of the implementation, not of the call.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into the language identified by `target`.
    ///
    /// Empty input yields an empty string. Failures are specific to `target`
    /// and are reported as [`PolyvoxError::TranslationFailed`].
    async fn translate(&self, text: &str, target: &str) -> Result<String>;

    /// Name of the backing service, for logs.
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: Translator + ?Sized> Translator for Arc<T> {
    async fn translate(&self, text: &str, target: &str) -> Result<String> {
        (**self).translate(text, target).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Mock translator for testing.
///
/// Returns `"<target>:<text>"` so tests can see which branch produced what.
#[derive(Debug, Default)]
pub struct MockTranslator {
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
}

impl MockTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every translation into `language`
    pub fn with_failure_for(mut self, language: &str) -> Self {
        self.failing.insert(language.to_string());
        self
    }

    /// Sleep before answering for `language`
    pub fn with_delay(mut self, language: &str, delay: Duration) -> Self {
        self.delays.insert(language.to_string(), delay);
        self
    }

    /// Target codes of every call made so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str, target: &str) -> Result<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(target.to_string());
        }
        if let Some(delay) = self.delays.get(target) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(target) {
            return Err(PolyvoxError::TranslationFailed {
                language: target.to_string(),
                message: "mock translation failure".to_string(),
            });
        }
        if text.trim().is_empty() {
            return Ok(String::new());
        }
        Ok(format!("{target}:{text}"))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
