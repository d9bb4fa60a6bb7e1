//! Likho Core Library
//!
//! Core functionality for aggregating creator styles from analyzed YouTube
//! transcripts and generating Hinglish scripts with an LLM, under a hard
//! word cap.

pub mod corpus;
pub mod error;
pub mod format;
pub mod generate;
pub mod listing;
pub mod postprocess;
pub mod prompt;
pub mod provider;
pub mod snapshot;
pub mod style;
pub mod types;

// Re-export commonly used items at crate root
pub use corpus::{load_transcript, load_transcript_library};
pub use error::{GenerationError, Result, StoreError};
pub use format::{format_script_readable, format_timestamp};
pub use generate::ScriptPipeline;
pub use prompt::resolve_word_cap;
pub use provider::{
    GenerationClient, GenerationParams, HttpGenerationClient, Provider, ProviderConfig,
};
pub use snapshot::{StyleSnapshot, load_snapshot, save_snapshot, snapshot_path};
pub use style::{CreatorStyleProfile, StyleCatalog};
pub use types::{
    Audience, ContentType, GeneratedScript, ProcessedTranscript, ScriptRequest, Tone,
};
