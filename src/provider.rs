//! Provider dispatch: a closed enum of supported LLM backends behind one
//! blocking `LanguageModel` trait. All providers are enumerable here and
//! checked exhaustively; there is no string-keyed registry and no global state.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ProviderConfig;
use crate::error::{CoreError, Result};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT_SECS: u64 = 300;
const MAX_OUTPUT_TOKENS: u32 = 4096;

// ── Capability trait ───────────────────────────────────────────────────────────

/// Blocking text-in/text-out capability. The pipeline builds prompts, calls
/// this, and parses the output; retries, timeouts beyond the HTTP one, and
/// cancellation are the caller's business.
pub trait LanguageModel {
    fn complete(&self, prompt: &str) -> Result<String>;
}

impl<M: LanguageModel + ?Sized> LanguageModel for std::rc::Rc<M> {
    fn complete(&self, prompt: &str) -> Result<String> {
        (**self).complete(prompt)
    }
}

// ── Provider kinds ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Ollama,
}

impl ProviderKind {
    fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "https://api.openai.com",
            ProviderKind::Anthropic => "https://api.anthropic.com",
            ProviderKind::Ollama => "http://localhost:11434",
        }
    }

    fn api_key_env(&self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAi => Some("OPENAI_API_KEY"),
            ProviderKind::Anthropic => Some("ANTHROPIC_API_KEY"),
            ProviderKind::Ollama => None,
        }
    }
}

// ── Client ─────────────────────────────────────────────────────────────────────

/// Ready-to-use capability handle for one configured provider.
#[derive(Debug)]
pub struct LlmClient {
    kind: ProviderKind,
    model: String,
    base_url: String,
    api_key: Option<String>,
    temperature: f32,
    http: reqwest::blocking::Client,
}

impl LlmClient {
    /// Build a client from config plus env credentials. Missing credentials
    /// are fatal here, before any round runs.
    pub fn from_config(cfg: &ProviderConfig) -> Result<Self> {
        let api_key = match cfg.kind.api_key_env() {
            Some(var) => match std::env::var(var) {
                Ok(key) if !key.is_empty() => Some(key),
                _ => {
                    return Err(CoreError::Configuration(format!(
                        "{var} is required for the {:?} provider",
                        cfg.kind
                    )))
                }
            },
            None => None,
        };

        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| CoreError::Provider(e.to_string()))?;

        Ok(Self {
            kind: cfg.kind,
            model: cfg.model.clone(),
            base_url: cfg
                .base_url
                .clone()
                .unwrap_or_else(|| cfg.kind.default_base_url().to_string()),
            api_key,
            temperature: cfg.temperature,
            http,
        })
    }

    fn complete_openai(&self, prompt: &str) -> Result<String> {
        #[derive(Deserialize)]
        struct Choice {
            message: Message,
        }
        #[derive(Deserialize)]
        struct Message {
            content: String,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }

        let body = serde_json::json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": [{"role": "user", "content": prompt}],
        });
        let resp: Resp = self
            .post_json(&format!("{}/v1/chat/completions", self.base_url), &body, |req| {
                req.bearer_auth(self.api_key.as_deref().unwrap_or_default())
            })?;
        resp.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| CoreError::Provider("OpenAI response had no choices".into()))
    }

    fn complete_anthropic(&self, prompt: &str) -> Result<String> {
        #[derive(Deserialize)]
        struct Block {
            #[serde(default)]
            text: String,
        }
        #[derive(Deserialize)]
        struct Resp {
            content: Vec<Block>,
        }

        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": MAX_OUTPUT_TOKENS,
            "temperature": self.temperature,
            "messages": [{"role": "user", "content": prompt}],
        });
        let resp: Resp = self.post_json(&format!("{}/v1/messages", self.base_url), &body, |req| {
            req.header("x-api-key", self.api_key.as_deref().unwrap_or_default())
                .header("anthropic-version", ANTHROPIC_VERSION)
        })?;
        resp.content
            .into_iter()
            .next()
            .map(|b| b.text)
            .ok_or_else(|| CoreError::Provider("Anthropic response had no content".into()))
    }

    fn complete_ollama(&self, prompt: &str) -> Result<String> {
        #[derive(Deserialize)]
        struct Resp {
            response: Option<String>,
        }

        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
        });
        let resp: Resp = self.post_json(&format!("{}/api/generate", self.base_url), &body, |req| req)?;
        resp.response
            .ok_or_else(|| CoreError::Provider("Ollama response had no 'response' field".into()))
    }

    fn post_json<T, F>(&self, url: &str, body: &serde_json::Value, decorate: F) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        F: FnOnce(reqwest::blocking::RequestBuilder) -> reqwest::blocking::RequestBuilder,
    {
        let resp = decorate(self.http.post(url).json(body))
            .send()
            .map_err(|e| CoreError::Provider(format!("{url}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().unwrap_or_default();
            return Err(CoreError::Provider(format!("{url}: HTTP {status}: {detail}")));
        }
        resp.json::<T>()
            .map_err(|e| CoreError::Provider(format!("{url}: invalid response body: {e}")))
    }
}

impl LanguageModel for LlmClient {
    fn complete(&self, prompt: &str) -> Result<String> {
        match self.kind {
            ProviderKind::OpenAi => self.complete_openai(prompt),
            ProviderKind::Anthropic => self.complete_anthropic(prompt),
            ProviderKind::Ollama => self.complete_ollama(prompt),
        }
    }
}

// ── Output parsing ─────────────────────────────────────────────────────────────

/// Extract a JSON object from a model response. Tolerates markdown fences and
/// prose around the object by slicing from the first `{` to the last `}`.
pub fn extract_json(text: &str) -> Result<serde_json::Value> {
    let candidate = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    };
    serde_json::from_str(candidate.trim())
        .map_err(|e| CoreError::Provider(format!("capability returned malformed JSON: {e}")))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
