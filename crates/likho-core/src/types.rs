use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptMetadata {
    pub video_id: String,
    pub title: String,
    pub uploader: String,
    /// Video duration in seconds.
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub word_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    #[serde(default)]
    pub start: Option<f64>,
    #[serde(default)]
    pub duration: Option<f64>,
    pub text: String,
}

/// Per-video language mix. Fractions are produced by the ingestion layer
/// and sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LanguageBreakdown {
    pub hindi_ratio: f64,
    pub english_ratio: f64,
    pub mixed_ratio: f64,
}

impl LanguageBreakdown {
    pub fn is_normalized(&self) -> bool {
        ((self.hindi_ratio + self.english_ratio + self.mixed_ratio) - 1.0).abs() < 1e-6
    }
}

/// Tone scores on a 0-10 scale, as emitted by transcript analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ToneMarkers {
    pub enthusiasm: f64,
    pub technical_depth: f64,
    pub friendliness: f64,
}

/// One analyzed video transcript, read-only input to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedTranscript {
    pub metadata: TranscriptMetadata,
    pub segments: Vec<TranscriptSegment>,
    pub language: LanguageBreakdown,
    pub tone: ToneMarkers,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub style_markers: Vec<String>,
}

impl ProcessedTranscript {
    pub fn creator(&self) -> &str {
        &self.metadata.uploader
    }

    /// All segment text joined with spaces, in segment order.
    pub fn full_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    FriendlyAndInformative,
    EnthusiasticAndEnergetic,
    ProfessionalAndFormal,
    CasualAndConversational,
    DramaticAndEngaging,
    TechnicalAndDetailed,
    HumorousAndEntertaining,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::FriendlyAndInformative => "friendly_and_informative",
            Tone::EnthusiasticAndEnergetic => "enthusiastic_and_energetic",
            Tone::ProfessionalAndFormal => "professional_and_formal",
            Tone::CasualAndConversational => "casual_and_conversational",
            Tone::DramaticAndEngaging => "dramatic_and_engaging",
            Tone::TechnicalAndDetailed => "technical_and_detailed",
            Tone::HumorousAndEntertaining => "humorous_and_entertaining",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    #[default]
    TechEnthusiasts,
    GeneralAudience,
    Beginners,
    Professionals,
    Students,
    Gamers,
    ContentCreators,
}

impl Audience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Audience::TechEnthusiasts => "tech_enthusiasts",
            Audience::GeneralAudience => "general_audience",
            Audience::Beginners => "beginners",
            Audience::Professionals => "professionals",
            Audience::Students => "students",
            Audience::Gamers => "gamers",
            Audience::ContentCreators => "content_creators",
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Review,
    Comparison,
    Unboxing,
    Tutorial,
    #[default]
    General,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Review => "review",
            ContentType::Comparison => "comparison",
            ContentType::Unboxing => "unboxing",
            ContentType::Tutorial => "tutorial",
            ContentType::General => "general",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the caller controls about one script generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptRequest {
    pub topic: String,
    pub duration_minutes: u32,
    #[serde(default)]
    pub tone: Tone,
    #[serde(default)]
    pub audience: Audience,
    #[serde(default)]
    pub content_type: ContentType,
    #[serde(default)]
    pub creator_style: Option<String>,
    #[serde(default)]
    pub additional_context: Option<String>,
    #[serde(default)]
    pub word_cap: Option<u32>,
    /// Force Latin-script Hinglish output (no Devanagari).
    #[serde(default = "default_roman_hinglish")]
    pub roman_hinglish: bool,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_roman_hinglish() -> bool {
    true
}

fn default_temperature() -> f32 {
    0.7
}

impl ScriptRequest {
    pub fn new(topic: impl Into<String>, duration_minutes: u32) -> Self {
        Self {
            topic: topic.into(),
            duration_minutes,
            tone: Tone::default(),
            audience: Audience::default(),
            content_type: ContentType::default(),
            creator_style: None,
            additional_context: None,
            word_cap: None,
            roman_hinglish: true,
            temperature: default_temperature(),
        }
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    pub fn with_audience(mut self, audience: Audience) -> Self {
        self.audience = audience;
        self
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn with_creator_style(mut self, creator: impl Into<String>) -> Self {
        self.creator_style = Some(creator.into());
        self
    }

    pub fn with_additional_context(mut self, context: impl Into<String>) -> Self {
        self.additional_context = Some(context.into());
        self
    }

    pub fn with_word_cap(mut self, cap: u32) -> Self {
        self.word_cap = Some(cap);
        self
    }

    pub fn with_roman_hinglish(mut self, force: bool) -> Self {
        self.roman_hinglish = force;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Production timing offsets, derived from the target duration only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingPlan {
    pub hook_secs: (u32, u32),
    pub intro_secs: (u32, u32),
    pub main_start_secs: u32,
    pub cta_at_secs: u32,
    pub outro_at_secs: u32,
    pub total_minutes: u32,
}

/// Style vocabulary actually present in the final text, for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedPatterns {
    pub hinglish_expressions: Vec<String>,
    pub engagement_phrases: Vec<String>,
}

/// A finished script plus the metadata downstream validators need.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedScript {
    pub id: Uuid,
    pub script: String,
    pub word_count: u32,
    pub word_cap: u32,
    pub speaking_minutes: f64,
    pub timing: TimingPlan,
    pub applied_patterns: AppliedPatterns,
    pub generation_secs: f64,
    pub request: ScriptRequest,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_serializes_snake_case() {
        let json = serde_json::to_string(&Tone::FriendlyAndInformative).unwrap();
        assert_eq!(json, "\"friendly_and_informative\"");
        let back: Tone = serde_json::from_str("\"humorous_and_entertaining\"").unwrap();
        assert_eq!(back, Tone::HumorousAndEntertaining);
    }

    #[test]
    fn request_defaults_fill_missing_fields() {
        let req: ScriptRequest =
            serde_json::from_str(r#"{"topic": "Best phones", "duration_minutes": 10}"#).unwrap();
        assert_eq!(req.tone, Tone::FriendlyAndInformative);
        assert_eq!(req.audience, Audience::TechEnthusiasts);
        assert_eq!(req.content_type, ContentType::General);
        assert!(req.roman_hinglish);
        assert_eq!(req.temperature, 0.7);
        assert!(req.word_cap.is_none());
    }

    #[test]
    fn language_breakdown_normalization_check() {
        let ok = LanguageBreakdown {
            hindi_ratio: 0.7,
            english_ratio: 0.2,
            mixed_ratio: 0.1,
        };
        assert!(ok.is_normalized());

        let off = LanguageBreakdown {
            hindi_ratio: 0.7,
            english_ratio: 0.7,
            mixed_ratio: 0.1,
        };
        assert!(!off.is_normalized());
    }

    #[test]
    fn full_text_skips_empty_segments() {
        let transcript = ProcessedTranscript {
            metadata: TranscriptMetadata {
                video_id: "abc".into(),
                title: "Test".into(),
                uploader: "Creator".into(),
                duration: 300.0,
                view_count: 0,
                word_count: 4,
            },
            segments: vec![
                TranscriptSegment {
                    start: Some(0.0),
                    duration: Some(2.0),
                    text: "namaste doston".into(),
                },
                TranscriptSegment {
                    start: Some(2.0),
                    duration: Some(1.0),
                    text: "   ".into(),
                },
                TranscriptSegment {
                    start: Some(3.0),
                    duration: Some(2.0),
                    text: "aaj ka topic".into(),
                },
            ],
            language: LanguageBreakdown {
                hindi_ratio: 0.5,
                english_ratio: 0.3,
                mixed_ratio: 0.2,
            },
            tone: ToneMarkers::default(),
            keywords: vec![],
            style_markers: vec![],
        };
        assert_eq!(transcript.full_text(), "namaste doston aaj ka topic");
    }
}
