use serde::{Deserialize, Serialize};
use std::path::Path;

/// A file picked by the user, held in memory until it is uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content,
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();
        Ok(Self { file_name, content })
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub download_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphsResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub graph_urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AskRequest<'a> {
    pub question: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub answer: Option<String>,
}

impl AskResponse {
    /// The answer text, treating an empty string the same as a missing field.
    pub fn non_empty_answer(&self) -> Option<&str> {
        self.answer.as_deref().filter(|a| !a.is_empty())
    }
}

/// Body of a non-success response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
