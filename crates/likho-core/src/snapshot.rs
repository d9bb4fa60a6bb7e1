//! Cached style context: the aggregated creator catalog plus condensed
//! per-creator training examples, persisted between runs so the transcript
//! corpus is not re-read on every generation.

use std::collections::BTreeMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::StoreError;
use crate::provider::GenerationParams;
use crate::style::StyleCatalog;
use crate::types::{LanguageBreakdown, ProcessedTranscript, ToneMarkers};

const SAMPLE_CHARS: usize = 2000;
const MAX_KEYWORDS: usize = 10;
const MAX_EXAMPLES_PER_CREATOR: usize = 3;
const SHORT_VIDEO_MINUTES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleType {
    Review,
    Comparison,
    Unboxing,
    Guide,
    General,
}

/// Classify a video title by keyword. Latin and Devanagari cues both count.
pub fn classify_title(title: &str) -> TitleType {
    let lowered = title.to_lowercase();
    let has = |keywords: &[&str]| keywords.iter().any(|keyword| lowered.contains(keyword));

    if has(&["review", "रीव्यू", "test", "टेस्ट"]) {
        TitleType::Review
    } else if has(&["vs", "versus", "कंपेयर", "comparison"]) {
        TitleType::Comparison
    } else if has(&["unboxing", "अनबॉक्सिंग", "first look"]) {
        TitleType::Unboxing
    } else if has(&["guide", "गाइड", "tips", "how to"]) {
        TitleType::Guide
    } else {
        TitleType::General
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationCategory {
    Short,
    Medium,
}

impl DurationCategory {
    pub fn from_secs(duration_secs: f64) -> Self {
        if (duration_secs / 60.0) as u32 <= SHORT_VIDEO_MINUTES {
            DurationCategory::Short
        } else {
            DurationCategory::Medium
        }
    }
}

/// One condensed transcript kept as style context for a creator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingExample {
    pub title: String,
    pub title_type: TitleType,
    pub duration_category: DurationCategory,
    pub tone: ToneMarkers,
    pub language: LanguageBreakdown,
    /// Opening slice of the transcript text.
    pub sample: String,
    pub keywords: Vec<String>,
}

impl TrainingExample {
    pub fn from_transcript(transcript: &ProcessedTranscript) -> Self {
        Self {
            title: transcript.metadata.title.clone(),
            title_type: classify_title(&transcript.metadata.title),
            duration_category: DurationCategory::from_secs(transcript.metadata.duration),
            tone: transcript.tone,
            language: transcript.language,
            sample: transcript.full_text().chars().take(SAMPLE_CHARS).collect(),
            keywords: transcript
                .keywords
                .iter()
                .take(MAX_KEYWORDS)
                .cloned()
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleSnapshot {
    pub catalog: StyleCatalog,
    pub params: GenerationParams,
    pub examples: BTreeMap<String, Vec<TrainingExample>>,
}

impl StyleSnapshot {
    /// Build the snapshot wholesale from a loaded transcript library. Never
    /// updated in place; a changed corpus means a rebuild.
    pub fn build(transcripts: &[ProcessedTranscript], params: GenerationParams) -> Self {
        let catalog = StyleCatalog::build(transcripts);
        let mut examples: BTreeMap<String, Vec<TrainingExample>> = BTreeMap::new();
        for transcript in transcripts {
            let entry = examples.entry(transcript.creator().to_string()).or_default();
            if entry.len() < MAX_EXAMPLES_PER_CREATOR {
                entry.push(TrainingExample::from_transcript(transcript));
            }
        }
        Self {
            catalog,
            params,
            examples,
        }
    }
}

/// Root directory for cached style context.
pub fn context_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("likho")
}

/// Snapshot location for one transcript directory. Different corpora hash
/// to different cache entries.
pub fn snapshot_path(transcripts_dir: &Path) -> PathBuf {
    let mut hasher = DefaultHasher::new();
    transcripts_dir.hash(&mut hasher);
    let dir_hash = hasher.finish();

    context_cache_dir()
        .join(dir_hash.to_string())
        .join("style_snapshot.json")
}

/// Load a snapshot from a cached file
pub async fn load_snapshot(path: &Path) -> Result<StyleSnapshot, StoreError> {
    let json_content = fs::read_to_string(path).await?;
    let snapshot: StyleSnapshot = serde_json::from_str(&json_content)?;
    Ok(snapshot)
}

/// Save a snapshot to a file
pub async fn save_snapshot(snapshot: &StyleSnapshot, path: &Path) -> Result<(), StoreError> {
    let pretty_json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, &pretty_json).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TranscriptMetadata, TranscriptSegment};

    fn transcript(creator: &str, title: &str, text: &str) -> ProcessedTranscript {
        ProcessedTranscript {
            metadata: TranscriptMetadata {
                video_id: format!("vid-{title}"),
                title: title.to_string(),
                uploader: creator.to_string(),
                duration: 420.0,
                view_count: 50_000,
                word_count: 800,
            },
            segments: vec![TranscriptSegment {
                start: Some(0.0),
                duration: Some(5.0),
                text: text.to_string(),
            }],
            language: LanguageBreakdown {
                hindi_ratio: 0.6,
                english_ratio: 0.3,
                mixed_ratio: 0.1,
            },
            tone: ToneMarkers {
                enthusiasm: 8.2,
                technical_depth: 6.4,
                friendliness: 7.9,
            },
            keywords: (0..15).map(|i| format!("keyword{i}")).collect(),
            style_markers: vec!["doston".into()],
        }
    }

    #[test]
    fn titles_classify_by_keyword() {
        assert_eq!(classify_title("iPhone 16 Review in Hindi"), TitleType::Review);
        assert_eq!(classify_title("Pixel रीव्यू"), TitleType::Review);
        assert_eq!(classify_title("Pixel vs iPhone camera"), TitleType::Comparison);
        assert_eq!(classify_title("New phone First Look"), TitleType::Unboxing);
        assert_eq!(classify_title("How to set up UPI"), TitleType::Guide);
        assert_eq!(classify_title("My desk setup tour"), TitleType::General);
    }

    #[test]
    fn duration_splits_at_five_minutes() {
        assert_eq!(DurationCategory::from_secs(299.0), DurationCategory::Short);
        assert_eq!(DurationCategory::from_secs(340.0), DurationCategory::Short);
        assert_eq!(DurationCategory::from_secs(480.0), DurationCategory::Medium);
    }

    #[test]
    fn examples_are_sampled_and_capped() {
        let long_text = "shabd ".repeat(600);
        let transcripts: Vec<ProcessedTranscript> = (0..5)
            .map(|i| transcript("Trakin Tech", &format!("Video {i} Review"), &long_text))
            .collect();

        let snapshot = StyleSnapshot::build(&transcripts, GenerationParams::default());

        let examples = &snapshot.examples["Trakin Tech"];
        assert_eq!(examples.len(), 3);
        assert_eq!(examples[0].sample.chars().count(), 2000);
        assert_eq!(examples[0].keywords.len(), 10);
        assert_eq!(examples[0].title_type, TitleType::Review);
        assert!(snapshot.catalog.get("Trakin Tech").is_some());
    }

    #[tokio::test]
    async fn snapshot_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("style_snapshot.json");

        let transcripts = vec![transcript("Creator", "Budget phone review", "namaste doston")];
        let snapshot = StyleSnapshot::build(&transcripts, GenerationParams::default());
        save_snapshot(&snapshot, &path).await.unwrap();

        let loaded = load_snapshot(&path).await.unwrap();
        assert_eq!(loaded.examples.len(), 1);
        let example = &loaded.examples["Creator"][0];
        assert!((example.tone.enthusiasm - 8.2).abs() < 1e-9);
        assert_eq!(example.title, "Budget phone review");
        assert_eq!(loaded.params, GenerationParams::default());
        assert_eq!(loaded.catalog.len(), 1);
    }

    #[test]
    fn snapshot_paths_are_stable_per_corpus() {
        let a = snapshot_path(Path::new("data/processed"));
        let b = snapshot_path(Path::new("data/other"));
        assert_eq!(a, snapshot_path(Path::new("data/processed")));
        assert_ne!(a, b);
        assert!(a.ends_with("style_snapshot.json"));
    }
}
