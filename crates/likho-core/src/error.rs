use thiserror::Error;

/// Failure taxonomy for one generation attempt. Every variant carries a
/// stable kind string and a message safe to show to end users.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("content blocked by safety filters: {categories:?}")]
    ContentBlocked { categories: Vec<String> },

    #[error("model returned no extractable text")]
    EmptyResponse,

    #[error("generation request failed: {0}")]
    Upstream(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl GenerationError {
    /// Machine-readable kind, stable across releases.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::ContentBlocked { .. } => "content_blocked",
            GenerationError::EmptyResponse => "empty_response",
            GenerationError::Upstream(_) => "generation_exception",
            GenerationError::InvalidRequest(_) => "validation_input_error",
        }
    }

    /// Message suitable for end users.
    pub fn user_message(&self) -> String {
        match self {
            GenerationError::ContentBlocked { categories } if categories.is_empty() => {
                "Content was blocked by safety filters. Please try rephrasing your topic."
                    .to_string()
            }
            GenerationError::ContentBlocked { categories } => format!(
                "Content was blocked by safety filters ({}). Please try rephrasing your topic.",
                categories.join(", ")
            ),
            GenerationError::InvalidRequest(reason) => format!("Invalid request: {}", reason),
            GenerationError::EmptyResponse | GenerationError::Upstream(_) => {
                "Sorry, script generation failed. Please try again.".to_string()
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = GenerationError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_stable() {
        assert_eq!(
            GenerationError::ContentBlocked { categories: vec![] }.kind(),
            "content_blocked"
        );
        assert_eq!(GenerationError::EmptyResponse.kind(), "empty_response");
        assert_eq!(
            GenerationError::Upstream("timeout".into()).kind(),
            "generation_exception"
        );
        assert_eq!(
            GenerationError::InvalidRequest("empty topic".into()).kind(),
            "validation_input_error"
        );
    }

    #[test]
    fn blocked_message_lists_categories() {
        let err = GenerationError::ContentBlocked {
            categories: vec!["HARM_CATEGORY_HATE_SPEECH: HIGH".into()],
        };
        let msg = err.user_message();
        assert!(msg.contains("HARM_CATEGORY_HATE_SPEECH"));
        assert!(msg.contains("rephrasing"));
    }

    #[test]
    fn generic_failures_apologize() {
        let msg = GenerationError::EmptyResponse.user_message();
        assert!(msg.contains("try again"));
    }
}
