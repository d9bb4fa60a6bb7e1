//! Generation orchestrator. One request walks an explicit step sequence:
//! primary call, a single simplified-prompt retry when the service declines
//! to answer, a safety and extraction screen, then two bounded continuation
//! steps (one generic, one guided by missing item indices). External-call
//! failures never propagate as panics or raw errors; they become a
//! [`GenerationError`].

use std::sync::Arc;
use std::time::Instant;

use crate::error::{GenerationError, Result};
use crate::listing;
use crate::postprocess;
use crate::prompt;
use crate::provider::{GenerationClient, GenerationParams, GenerationResponse};
use crate::style::StyleCatalog;
use crate::types::{GeneratedScript, ScriptRequest};

/// A draft below this fraction of the word cap is considered incomplete.
const COMPLETENESS_RATIO: f64 = 0.85;
/// How much accumulated text a continuation call sees.
const CONTINUATION_TAIL_WORDS: usize = 80;
/// Generic continuations are pointless below this remaining budget.
const MIN_GENERIC_BUDGET: u32 = 50;
/// Guided item continuations need a little more room than generic ones.
const MIN_GUIDED_BUDGET: u32 = 60;

const TOKENS_PER_WORD: f64 = 1.3;
const MIN_OUTPUT_TOKENS: u32 = 256;
const MAX_OUTPUT_TOKENS: u32 = 4096;

/// Steps of one generation flow. Each step occurs at most once, so the
/// retry budget (one fallback call, two continuation calls) is visible in
/// the transitions instead of buried in conditionals.
enum Flow {
    CallPrimary,
    CallFallback,
    Screen {
        response: GenerationResponse,
        retried: bool,
    },
    ExtendShort {
        text: String,
    },
    ExtendItems {
        text: String,
    },
    Done {
        text: String,
    },
}

pub struct ScriptPipeline {
    client: Arc<dyn GenerationClient>,
    params: GenerationParams,
}

impl ScriptPipeline {
    pub fn new(client: Arc<dyn GenerationClient>, params: GenerationParams) -> Self {
        Self { client, params }
    }

    /// Generate one script. The request's temperature and the resolved word
    /// cap override the pipeline's base sampling parameters per call.
    pub async fn generate(
        &self,
        request: &ScriptRequest,
        styles: &StyleCatalog,
    ) -> Result<GeneratedScript> {
        validate_request(request)?;

        let started = Instant::now();
        let word_cap = prompt::resolve_word_cap(request.duration_minutes, request.word_cap);
        let call_params = GenerationParams {
            temperature: request.temperature,
            max_output_tokens: output_token_budget(word_cap),
            ..self.params
        };

        let style = request
            .creator_style
            .as_deref()
            .and_then(|name| styles.get(name));
        let primary = prompt::build_prompt(request, style, word_cap);
        let expected_items =
            listing::expected_item_count(&request.topic, request.additional_context.as_deref());

        let mut flow = Flow::CallPrimary;
        let text = loop {
            flow = match flow {
                Flow::CallPrimary => {
                    let response = self.call(&primary, &call_params).await?;
                    if response.candidates.is_empty() {
                        tracing::warn!(
                            topic = %request.topic,
                            "no candidates returned, retrying with simplified prompt"
                        );
                        Flow::CallFallback
                    } else {
                        Flow::Screen {
                            response,
                            retried: false,
                        }
                    }
                }
                Flow::CallFallback => {
                    let fallback =
                        prompt::fallback_prompt(&request.topic, request.duration_minutes);
                    let response = self.call(&fallback, &call_params).await?;
                    if response.candidates.is_empty() {
                        return Err(GenerationError::ContentBlocked {
                            categories: Vec::new(),
                        });
                    }
                    Flow::Screen {
                        response,
                        retried: true,
                    }
                }
                Flow::Screen { response, retried } => {
                    let blocking: Vec<String> = response
                        .candidates
                        .first()
                        .map(|candidate| {
                            candidate
                                .safety_ratings
                                .iter()
                                .filter(|rating| rating.severity.blocks())
                                .map(|rating| rating.label())
                                .collect()
                        })
                        .unwrap_or_default();
                    if !blocking.is_empty() {
                        return Err(GenerationError::ContentBlocked {
                            categories: blocking,
                        });
                    }
                    match extract_text(&response) {
                        Some(text) => Flow::ExtendShort { text },
                        None if retried => {
                            return Err(GenerationError::ContentBlocked {
                                categories: Vec::new(),
                            });
                        }
                        None => return Err(GenerationError::EmptyResponse),
                    }
                }
                Flow::ExtendShort { text } => {
                    let remaining = remaining_budget(&text, word_cap);
                    if needs_more(&text, word_cap, expected_items)
                        && remaining >= MIN_GENERIC_BUDGET
                    {
                        tracing::debug!(
                            words = postprocess::count_words(&text),
                            word_cap,
                            "draft incomplete, requesting continuation"
                        );
                        match self
                            .continuation_call(&text, word_cap, remaining, None, &call_params)
                            .await
                        {
                            Some(more) => Flow::ExtendItems {
                                text: append_and_cap(&text, &more, word_cap),
                            },
                            None => Flow::ExtendItems { text },
                        }
                    } else {
                        Flow::ExtendItems { text }
                    }
                }
                Flow::ExtendItems { text } => {
                    let remaining = remaining_budget(&text, word_cap);
                    let shortfall = expected_items
                        .map(|expected| (listing::count_list_items(&text), expected))
                        .filter(|(produced, expected)| produced < expected);
                    match shortfall {
                        Some((produced, expected)) if remaining >= MIN_GUIDED_BUDGET => {
                            tracing::debug!(
                                produced,
                                expected,
                                "item shortfall, requesting guided continuation"
                            );
                            let guidance = format!(
                                "Continue with items {} to {}. Keep each item concise and balanced. Do not repeat. ",
                                produced + 1,
                                expected
                            );
                            match self
                                .continuation_call(
                                    &text,
                                    word_cap,
                                    remaining,
                                    Some(&guidance),
                                    &call_params,
                                )
                                .await
                            {
                                Some(more) => Flow::Done {
                                    text: append_and_cap(&text, &more, word_cap),
                                },
                                None => Flow::Done { text },
                            }
                        }
                        _ => Flow::Done { text },
                    }
                }
                Flow::Done { text } => break text,
            };
        };

        let script =
            postprocess::finalize(&text, request, word_cap, started.elapsed().as_secs_f64());
        if script.script.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(script)
    }

    async fn call(&self, prompt: &str, params: &GenerationParams) -> Result<GenerationResponse> {
        self.client
            .generate(prompt, params)
            .await
            .map_err(|error| GenerationError::Upstream(error.to_string()))
    }

    /// One continuation call. Failures are logged and swallowed so a usable
    /// draft is never thrown away over an optional extension.
    async fn continuation_call(
        &self,
        current: &str,
        word_cap: u32,
        remaining: u32,
        guidance: Option<&str>,
        params: &GenerationParams,
    ) -> Option<String> {
        let words: Vec<&str> = current.split_whitespace().collect();
        let tail_start = words.len().saturating_sub(CONTINUATION_TAIL_WORDS);
        let tail = words[tail_start..].join(" ");

        let continuation = format!(
            "{}Continue the script from where it stopped. Do not repeat any sentences. Finish the remaining sections and end with a proper outro. You have approximately {remaining} words remaining (total cap {word_cap}). Here are the last lines to continue from:\n{tail}",
            guidance.unwrap_or(""),
        );

        match self.client.generate(&continuation, params).await {
            Ok(response) => extract_text(&response),
            Err(error) => {
                tracing::warn!(error = %error, "continuation call failed, keeping current draft");
                None
            }
        }
    }
}

fn validate_request(request: &ScriptRequest) -> Result<()> {
    if request.topic.trim().is_empty() {
        return Err(GenerationError::InvalidRequest(
            "topic must not be empty".into(),
        ));
    }
    if request.duration_minutes == 0 {
        return Err(GenerationError::InvalidRequest(
            "duration must be at least 1 minute".into(),
        ));
    }
    if !request.temperature.is_finite() || !(0.0..=2.0).contains(&request.temperature) {
        return Err(GenerationError::InvalidRequest(format!(
            "temperature {} outside supported range 0.0..=2.0",
            request.temperature
        )));
    }
    Ok(())
}

/// Extraction ladder: direct text accessor, then the text parts of the
/// first candidate, then the raw response string.
fn extract_text(response: &GenerationResponse) -> Option<String> {
    let candidate = response.candidates.first()?;
    if let Some(text) = candidate.text.as_deref()
        && !text.trim().is_empty()
    {
        return Some(text.to_string());
    }
    let joined = candidate.parts.join("\n");
    if !joined.trim().is_empty() {
        return Some(joined);
    }
    response
        .raw
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(str::to_string)
}

fn needs_more(text: &str, word_cap: u32, expected_items: Option<u32>) -> bool {
    let words = postprocess::count_words(text) as u32;
    if f64::from(words) < f64::from(word_cap) * COMPLETENESS_RATIO {
        return true;
    }
    expected_items.is_some_and(|expected| listing::count_list_items(text) < expected)
}

fn remaining_budget(text: &str, word_cap: u32) -> u32 {
    word_cap.saturating_sub(postprocess::count_words(text) as u32)
}

/// Append a continuation with a blank-line separator and re-apply the cap
/// before the next evaluation.
fn append_and_cap(current: &str, more: &str, word_cap: u32) -> String {
    let combined = format!("{}\n\n{}", current.trim_end(), more.trim());
    postprocess::truncate_to_words(&combined, word_cap)
}

fn output_token_budget(word_cap: u32) -> u32 {
    ((f64::from(word_cap) * TOKENS_PER_WORD) as u32).clamp(MIN_OUTPUT_TOKENS, MAX_OUTPUT_TOKENS)
}
