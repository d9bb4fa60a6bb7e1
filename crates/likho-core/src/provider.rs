use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: String },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Provider {
    #[default]
    Gemini,
    Openai,
    Grok,
}

pub struct ProviderConfig {
    pub api_url: &'static str,
    pub model: &'static str,
    pub env_var: &'static str,
}

impl Provider {
    pub fn config(&self) -> ProviderConfig {
        match self {
            Provider::Gemini => ProviderConfig {
                api_url: "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent",
                model: "gemini-2.5-flash",
                env_var: "GEMINI_API_KEY",
            },
            Provider::Openai => ProviderConfig {
                api_url: "https://api.openai.com/v1/chat/completions",
                model: "gpt-5.1",
                env_var: "OPENAI_API_KEY",
            },
            Provider::Grok => ProviderConfig {
                api_url: "https://api.x.ai/v1/chat/completions",
                model: "grok-4-fast",
                env_var: "XAI_API_KEY",
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Gemini => "Gemini",
            Provider::Openai => "OpenAI",
            Provider::Grok => "Grok",
        }
    }

    /// Validate that the API key is set for this provider
    pub fn validate_api_key(&self) -> Result<String, ProviderError> {
        let config = self.config();
        std::env::var(config.env_var).map_err(|_| ProviderError::MissingApiKey {
            env_var: config.env_var.to_string(),
        })
    }
}

/// Sampling parameters sent with every generation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.8,
            top_k: 40,
            max_output_tokens: 2048,
        }
    }
}

/// Moderation severity, ordered weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Negligible,
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "HIGH" => Severity::High,
            "MEDIUM" => Severity::Medium,
            "LOW" => Severity::Low,
            "NEGLIGIBLE" => Severity::Negligible,
            other => {
                tracing::debug!(probability = other, "unknown safety probability");
                Severity::Negligible
            }
        }
    }

    pub fn blocks(&self) -> bool {
        *self >= Severity::Medium
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Negligible => "NEGLIGIBLE",
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SafetyRating {
    pub category: String,
    pub severity: Severity,
}

impl SafetyRating {
    pub fn label(&self) -> String {
        format!("{}: {}", self.category, self.severity.as_str())
    }
}

/// One candidate completion. `text` is the direct accessor some providers
/// give; Gemini delivers content as `parts` instead.
#[derive(Debug, Clone, Default)]
pub struct Candidate {
    pub text: Option<String>,
    pub parts: Vec<String>,
    pub safety_ratings: Vec<SafetyRating>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct GenerationResponse {
    pub candidates: Vec<Candidate>,
    /// Raw textual form of the response, when a provider has one. Last
    /// resort for text extraction.
    pub raw: Option<String>,
}

impl GenerationResponse {
    /// Response carrying one candidate with direct text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                text: Some(text.into()),
                ..Default::default()
            }],
            raw: None,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// One opaque call to an external text-generation service.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, prompt: &str, params: &GenerationParams)
    -> Result<GenerationResponse>;
}

const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

const SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";

/// HTTP-backed client. Gemini speaks its native generateContent API; the
/// other providers speak OpenAI-compatible chat completions.
pub struct HttpGenerationClient {
    provider: Provider,
    api_key: String,
    http: reqwest::Client,
}

impl HttpGenerationClient {
    pub fn new(provider: Provider) -> Result<Self, ProviderError> {
        let api_key = provider.validate_api_key()?;
        Ok(Self {
            provider,
            api_key,
            http: reqwest::Client::new(),
        })
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }
}

#[async_trait]
impl GenerationClient for HttpGenerationClient {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<GenerationResponse> {
        let config = self.provider.config();
        let body = request_body(&self.provider, &config, prompt, params);

        let request = match self.provider {
            Provider::Gemini => self
                .http
                .post(config.api_url)
                .header("x-goog-api-key", &self.api_key),
            Provider::Openai | Provider::Grok => self
                .http
                .post(config.api_url)
                .header("Authorization", format!("Bearer {}", self.api_key)),
        };

        let response = request.json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            anyhow::bail!(
                "{} returned {}: {}",
                self.provider.name(),
                status,
                truncate_for_log(&text)
            );
        }

        match self.provider {
            Provider::Gemini => parse_gemini_response(&text),
            Provider::Openai | Provider::Grok => parse_chat_response(&text),
        }
    }
}

fn request_body(
    provider: &Provider,
    config: &ProviderConfig,
    prompt: &str,
    params: &GenerationParams,
) -> serde_json::Value {
    match provider {
        Provider::Gemini => serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": params.temperature,
                "topP": params.top_p,
                "topK": params.top_k,
                "maxOutputTokens": params.max_output_tokens,
            },
            "safetySettings": HARM_CATEGORIES
                .iter()
                .map(|category| serde_json::json!({
                    "category": category,
                    "threshold": SAFETY_THRESHOLD,
                }))
                .collect::<Vec<_>>(),
        }),
        Provider::Openai | Provider::Grok => serde_json::json!({
            "model": config.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": params.temperature,
            "max_tokens": params.max_output_tokens,
        }),
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    #[serde(default)]
    safety_ratings: Vec<GeminiSafetyRating>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiSafetyRating {
    category: String,
    probability: String,
}

fn parse_gemini_response(body: &str) -> Result<GenerationResponse> {
    let parsed: GeminiResponse = serde_json::from_str(body)?;
    let candidates = parsed
        .candidates
        .into_iter()
        .map(|candidate| {
            let parts: Vec<String> = candidate
                .content
                .map(|content| {
                    content
                        .parts
                        .into_iter()
                        .filter_map(|part| part.text)
                        .filter(|text| !text.is_empty())
                        .collect()
                })
                .unwrap_or_default();
            let safety_ratings = candidate
                .safety_ratings
                .into_iter()
                .map(|rating| SafetyRating {
                    severity: Severity::parse(&rating.probability),
                    category: rating.category,
                })
                .collect();
            Candidate {
                text: None,
                parts,
                safety_ratings,
                finish_reason: candidate.finish_reason,
            }
        })
        .collect();
    Ok(GenerationResponse {
        candidates,
        raw: Some(body.to_string()),
    })
}

fn parse_chat_response(body: &str) -> Result<GenerationResponse> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let mut candidates = Vec::new();
    if let Some(content) = value["choices"][0]["message"]["content"].as_str()
        && !content.is_empty()
    {
        candidates.push(Candidate {
            text: Some(content.to_string()),
            parts: Vec::new(),
            safety_ratings: Vec::new(),
            finish_reason: value["choices"][0]["finish_reason"]
                .as_str()
                .map(str::to_string),
        });
    }
    Ok(GenerationResponse {
        candidates,
        raw: Some(body.to_string()),
    })
}

fn truncate_for_log(body: &str) -> String {
    body.chars().take(200).collect()
}
