use serde::{Deserialize, Serialize};

/// Body of a generation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateRequest {
    /// The user's prompt
    pub prompt: String,
    /// Ask the server to stream the reply as `data:` lines
    pub stream: bool,
}

impl GenerateRequest {
    /// Create a streaming request for `prompt`.
    pub fn streaming(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            stream: true,
        }
    }
}
