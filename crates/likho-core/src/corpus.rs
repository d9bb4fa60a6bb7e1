//! Loading analyzed transcripts from the ingestion layer's output directory.

use std::path::Path;

use crate::error::StoreError;
use crate::types::ProcessedTranscript;

/// Transcripts with fewer segments than this carry too little signal to
/// aggregate.
pub const MIN_SEGMENTS: usize = 10;

/// Default number of transcript files considered per library load.
pub const DEFAULT_LIBRARY_SIZE: usize = 25;

const TRANSCRIPT_SUFFIX: &str = "_transcript.json";

pub async fn load_transcript(path: &Path) -> Result<ProcessedTranscript, StoreError> {
    let contents = tokio::fs::read_to_string(path).await?;
    let transcript = serde_json::from_str(&contents)?;
    Ok(transcript)
}

/// Load up to `limit` transcripts from `dir`, in file-name order so repeat
/// runs see the same corpus. Malformed and too-short files are skipped with
/// a log entry; a missing directory yields an empty library.
pub async fn load_transcript_library(
    dir: &Path,
    limit: usize,
) -> Result<Vec<ProcessedTranscript>, StoreError> {
    if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "transcript directory not found");
        return Ok(Vec::new());
    }

    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_transcript = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(TRANSCRIPT_SUFFIX));
        if is_transcript {
            files.push(path);
        }
    }
    files.sort();
    files.truncate(limit);

    let mut library = Vec::new();
    for path in files {
        match load_transcript(&path).await {
            Ok(transcript) if transcript.segments.len() < MIN_SEGMENTS => {
                tracing::debug!(
                    path = %path.display(),
                    segments = transcript.segments.len(),
                    "skipping transcript with too few segments"
                );
            }
            Ok(transcript) => library.push(transcript),
            Err(error) => {
                tracing::warn!(path = %path.display(), error = %error, "skipping unreadable transcript");
            }
        }
    }

    tracing::info!(count = library.len(), dir = %dir.display(), "transcript library loaded");
    Ok(library)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        LanguageBreakdown, ToneMarkers, TranscriptMetadata, TranscriptSegment,
    };

    fn sample_transcript(creator: &str, title: &str, segment_count: usize) -> ProcessedTranscript {
        ProcessedTranscript {
            metadata: TranscriptMetadata {
                video_id: format!("vid-{title}"),
                title: title.to_string(),
                uploader: creator.to_string(),
                duration: 480.0,
                view_count: 10_000,
                word_count: 900,
            },
            segments: (0..segment_count)
                .map(|i| TranscriptSegment {
                    start: Some(i as f64 * 4.0),
                    duration: Some(4.0),
                    text: format!("segment {i} ka text"),
                })
                .collect(),
            language: LanguageBreakdown {
                hindi_ratio: 0.6,
                english_ratio: 0.3,
                mixed_ratio: 0.1,
            },
            tone: ToneMarkers {
                enthusiasm: 7.5,
                technical_depth: 6.0,
                friendliness: 8.0,
            },
            keywords: vec!["phone".into()],
            style_markers: vec!["doston".into()],
        }
    }

    async fn write_transcript(dir: &Path, name: &str, transcript: &ProcessedTranscript) {
        let json = serde_json::to_string_pretty(transcript).unwrap();
        tokio::fs::write(dir.join(name), json).await.unwrap();
    }

    #[tokio::test]
    async fn library_skips_short_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        write_transcript(
            dir.path(),
            "a_transcript.json",
            &sample_transcript("Creator A", "Video A", 12),
        )
        .await;
        write_transcript(
            dir.path(),
            "b_transcript.json",
            &sample_transcript("Creator B", "Video B", 3),
        )
        .await;
        tokio::fs::write(dir.path().join("c_transcript.json"), "{ not json")
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("notes.json"), "{}")
            .await
            .unwrap();

        let library = load_transcript_library(dir.path(), DEFAULT_LIBRARY_SIZE)
            .await
            .unwrap();
        assert_eq!(library.len(), 1);
        assert_eq!(library[0].creator(), "Creator A");
    }

    #[tokio::test]
    async fn library_is_ordered_and_capped() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["c", "a", "b"] {
            write_transcript(
                dir.path(),
                &format!("{name}_transcript.json"),
                &sample_transcript(&format!("Creator {name}"), name, 12),
            )
            .await;
        }

        let library = load_transcript_library(dir.path(), 2).await.unwrap();
        assert_eq!(library.len(), 2);
        assert_eq!(library[0].creator(), "Creator a");
        assert_eq!(library[1].creator(), "Creator b");
    }

    #[tokio::test]
    async fn missing_directory_yields_empty_library() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let library = load_transcript_library(&missing, DEFAULT_LIBRARY_SIZE)
            .await
            .unwrap();
        assert!(library.is_empty());
    }

    #[tokio::test]
    async fn raw_ingestion_json_deserializes() {
        let dir = tempfile::tempdir().unwrap();
        let raw = r#"{
            "metadata": {
                "video_id": "xyz123",
                "title": "Top 5 Phones",
                "uploader": "Trakin Tech",
                "duration": 612.5,
                "view_count": 250000,
                "word_count": 1420
            },
            "segments": [
                { "start": 0.0, "duration": 3.5, "text": "namaste doston" },
                { "text": "timing fields are optional" }
            ],
            "language": { "hindi_ratio": 0.55, "english_ratio": 0.30, "mixed_ratio": 0.15 },
            "tone": { "enthusiasm": 8.2, "technical_depth": 6.4, "friendliness": 7.9 },
            "keywords": ["phone", "camera"],
            "style_markers": ["doston", "chaliye shuru karte hain"]
        }"#;
        let path = dir.path().join("xyz_transcript.json");
        tokio::fs::write(&path, raw).await.unwrap();

        let transcript = load_transcript(&path).await.unwrap();
        assert_eq!(transcript.creator(), "Trakin Tech");
        assert_eq!(transcript.segments.len(), 2);
        assert!(transcript.segments[1].start.is_none());
        assert!(transcript.language.is_normalized());
    }
}
