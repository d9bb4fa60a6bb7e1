use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{LanguageBreakdown, ProcessedTranscript, ToneMarkers};

/// Fraction above which a video counts as single-language dominant.
pub const DOMINANT_RATIO: f64 = 0.6;

/// How many segments from each end of a video feed intro/outro sampling.
const EDGE_SEGMENTS: usize = 5;

/// Upper bound on distinct intro/outro fragments kept per creator.
const MAX_FRAGMENTS: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageCounts {
    pub hindi_dominant: u32,
    pub english_dominant: u32,
    pub balanced: u32,
}

impl LanguageCounts {
    fn record(&mut self, breakdown: &LanguageBreakdown) {
        if breakdown.hindi_ratio > DOMINANT_RATIO {
            self.hindi_dominant += 1;
        } else if breakdown.english_ratio > DOMINANT_RATIO {
            self.english_dominant += 1;
        } else {
            self.balanced += 1;
        }
    }
}

/// Aggregate style of one creator across all their analyzed videos.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatorStyleProfile {
    pub video_count: u32,
    pub language: LanguageCounts,
    pub tone: ToneMarkers,
    pub style_markers: Vec<String>,
    pub intro_fragments: Vec<String>,
    pub outro_fragments: Vec<String>,
}

impl CreatorStyleProfile {
    /// One-line description of the creator's language skew, for prompts.
    pub fn language_summary(&self) -> &'static str {
        if self.language.hindi_dominant > self.language.english_dominant {
            "Hindi-dominant Hinglish (more Hindi expressions, Hindi grammatical structure)"
        } else if self.language.english_dominant > self.language.hindi_dominant {
            "English-dominant Hinglish (more English words, English grammatical structure)"
        } else {
            "Balanced Hinglish (equal mix of Hindi and English)"
        }
    }

    /// Names every tone dimension averaging above 7/10, for prompts.
    pub fn tone_summary(&self) -> String {
        let mut parts = Vec::new();
        if self.tone.enthusiasm > 7.0 {
            parts.push("Highly enthusiastic");
        }
        if self.tone.technical_depth > 7.0 {
            parts.push("Technical and detailed");
        }
        if self.tone.friendliness > 7.0 {
            parts.push("Friendly and approachable");
        }
        if parts.is_empty() {
            "Balanced conversational tone".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Read-only mapping of creator name to aggregated style. Rebuilt wholesale
/// whenever the transcript collection changes, never patched in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleCatalog {
    pub creators: BTreeMap<String, CreatorStyleProfile>,
}

impl StyleCatalog {
    /// Aggregate a transcript collection into per-creator profiles.
    pub fn build(transcripts: &[ProcessedTranscript]) -> Self {
        let mut creators: BTreeMap<String, CreatorStyleProfile> = BTreeMap::new();

        for transcript in transcripts {
            let profile = creators.entry(transcript.creator().to_string()).or_default();
            profile.video_count += 1;
            profile.language.record(&transcript.language);
            profile.tone.enthusiasm += transcript.tone.enthusiasm;
            profile.tone.technical_depth += transcript.tone.technical_depth;
            profile.tone.friendliness += transcript.tone.friendliness;

            for marker in &transcript.style_markers {
                if !profile.style_markers.contains(marker) {
                    profile.style_markers.push(marker.clone());
                }
            }

            let head = transcript.segments.len().min(EDGE_SEGMENTS);
            for segment in &transcript.segments[..head] {
                push_fragment(&mut profile.intro_fragments, &segment.text);
            }
            let tail_start = transcript.segments.len().saturating_sub(EDGE_SEGMENTS);
            for segment in &transcript.segments[tail_start..] {
                push_fragment(&mut profile.outro_fragments, &segment.text);
            }
        }

        for profile in creators.values_mut() {
            let count = profile.video_count as f64;
            profile.tone.enthusiasm /= count;
            profile.tone.technical_depth /= count;
            profile.tone.friendliness /= count;
        }

        StyleCatalog { creators }
    }

    pub fn get(&self, creator: &str) -> Option<&CreatorStyleProfile> {
        self.creators.get(creator)
    }

    pub fn len(&self) -> usize {
        self.creators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creators.is_empty()
    }

    pub fn creator_names(&self) -> Vec<&str> {
        self.creators.keys().map(String::as_str).collect()
    }
}

fn push_fragment(fragments: &mut Vec<String>, text: &str) {
    let text = text.trim();
    if text.is_empty() || fragments.len() >= MAX_FRAGMENTS {
        return;
    }
    if !fragments.iter().any(|existing| existing == text) {
        fragments.push(text.to_string());
    }
}
