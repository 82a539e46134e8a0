//! Google Translate client using the public `gtx` endpoint.

use crate::defaults;
use crate::error::{PolyvoxError, Result};
use crate::translate::languages;
use crate::translate::translator::Translator;
use async_trait::async_trait;
use serde_json::Value;

/// Connection settings for [`GoogleTranslator`].
#[derive(Debug, Clone)]
pub struct GoogleTranslateConfig {
    pub base_url: String,
    /// Fixed source language, or `"auto"`.
    pub source_language: String,
}

impl Default for GoogleTranslateConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::GOOGLE_TRANSLATE_BASE_URL.to_string(),
            source_language: defaults::SOURCE_LANGUAGE.to_string(),
        }
    }
}

/// [`Translator`] backed by Google Translate.
pub struct GoogleTranslator {
    client: reqwest::Client,
    config: GoogleTranslateConfig,
}

impl GoogleTranslator {
    pub fn new(client: reqwest::Client, config: GoogleTranslateConfig) -> Self {
        Self { client, config }
    }

    pub fn source_language(&self) -> &str {
        &self.config.source_language
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, target: &str) -> Result<String> {
        let fail = |message: String| PolyvoxError::TranslationFailed {
            language: target.to_string(),
            message,
        };

        let Some(code) = languages::canonical_code(target) else {
            return Err(fail("unsupported target language".to_string()));
        };
        if text.trim().is_empty() {
            return Ok(String::new());
        }
        let length = text.chars().count();
        if length > defaults::TRANSLATION_MAX_CHARS {
            return Err(fail(format!(
                "text is {length} characters, limit is {}",
                defaults::TRANSLATION_MAX_CHARS
            )));
        }

        let url = format!(
            "{}/translate_a/single",
            self.config.base_url.trim_end_matches('/')
        );
        let response = self
            .client
            .get(url)
            .query(&[
                ("client", "gtx"),
                ("sl", self.config.source_language.as_str()),
                ("tl", code),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| fail(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fail(format!("service returned {status}")));
        }
        let body: Value = response
            .json()
            .await
            .map_err(|e| fail(format!("unreadable response: {e}")))?;

        let translated = extract_translation(&body)
            .ok_or_else(|| fail("response contained no translation".to_string()))?;
        tracing::debug!(language = code, chars = translated.len(), "translated text");
        Ok(translated)
    }

    fn name(&self) -> &str {
        "google"
    }
}

/// Join the translated segments of a `gtx` response.
///
/// The body looks like `[[["Hola mundo.","Hello world.",null,null,10], ...], null, "en", ...]`.
fn extract_translation(body: &Value) -> Option<String> {
    let segments = body.get(0)?.as_array()?;
    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0)?.as_str())
        .collect();
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn translator() -> GoogleTranslator {
        // Port 9 (discard) is never expected to answer; tests below must not hit it.
        let config = GoogleTranslateConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        };
        GoogleTranslator::new(reqwest::Client::new(), config)
    }

    #[test]
    fn test_extract_joins_segments() {
        let body = json!([
            [["Hola mundo. ", "Hello world. ", null, null, 10], ["Adiós.", "Bye.", null, null, 10]],
            null,
            "en"
        ]);
        assert_eq!(extract_translation(&body).unwrap(), "Hola mundo. Adiós.");
    }

    #[test]
    fn test_extract_rejects_unexpected_shape() {
        assert!(extract_translation(&json!({"error": "nope"})).is_none());
    }

    #[test]
    fn test_default_source_is_english() {
        assert_eq!(translator().source_language(), "en");
    }

    #[tokio::test]
    async fn test_empty_text_skips_network() {
        assert_eq!(translator().translate("   ", "es").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_unsupported_target_fails_for_that_target() {
        let err = translator().translate("Hello", "xx").await.unwrap_err();
        assert_eq!(err.language(), Some("xx"));
        assert!(err.to_string().contains("unsupported target language"));
    }

    #[tokio::test]
    async fn test_text_over_limit_is_rejected() {
        let text = "a".repeat(defaults::TRANSLATION_MAX_CHARS + 1);
        let err = translator().translate(&text, "de").await.unwrap_err();
        assert!(err.to_string().contains("limit"));
    }
}
