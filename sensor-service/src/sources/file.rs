use std::path::PathBuf;

use super::{RecordSource, SourceError};

/// Sensor document stored on the local filesystem.
pub struct FileSource {
    location: String,
    path: PathBuf,
}

impl FileSource {
    pub fn new(location: &str) -> Self {
        Self {
            location: location.to_string(),
            path: PathBuf::from(location),
        }
    }
}

#[async_trait::async_trait]
impl RecordSource for FileSource {
    fn location(&self) -> &str {
        &self.location
    }

    fn kind(&self) -> &'static str {
        "file"
    }

    async fn fetch_text(&self) -> Result<String, SourceError> {
        // Non UTF-8 content surfaces as an InvalidData io error.
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.location.clone(),
                source,
            })
    }
}
