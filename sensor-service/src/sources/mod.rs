pub mod file;
pub mod http;

pub use file::FileSource;
pub use http::HttpSource;

use sensor_model::domain::RawRecord;
use serde_json::Value;

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status} from {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("\"data\" must be an array, found {0}")]
    Shape(&'static str),
}

/// Somewhere a sensor's JSON document can be read from.
#[async_trait::async_trait]
pub trait RecordSource: Send + Sync {
    fn location(&self) -> &str;

    /// Short label for logs and metrics ("file", "http").
    fn kind(&self) -> &'static str;

    async fn fetch_text(&self) -> Result<String, SourceError>;
}

pub fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

pub fn source_for(location: &str, client: &reqwest::Client) -> Box<dyn RecordSource> {
    if is_url(location) {
        Box::new(HttpSource::new(location, client.clone()))
    } else {
        Box::new(FileSource::new(location))
    }
}

/// Extracts the `data` array of a document and flips it to oldest-first.
///
/// A document without `data` (or one that is not an object) has no records.
pub fn parse_records(text: &str) -> Result<Vec<RawRecord>, SourceError> {
    let doc: Value = serde_json::from_str(text)?;

    let mut records: Vec<RawRecord> = match doc.get("data") {
        None => return Ok(Vec::new()),
        Some(Value::Array(items)) => items.iter().cloned().map(RawRecord::new).collect(),
        Some(other) => return Err(SourceError::Shape(json_type_name(other))),
    };

    // Sources store newest first.
    records.reverse();
    Ok(records)
}

pub async fn fetch_records(
    location: &str,
    client: &reqwest::Client,
) -> Result<Vec<RawRecord>, SourceError> {
    read_source(source_for(location, client).as_ref()).await
}

/// Loads the records at `location`, degrading to no records on any failure.
pub async fn load(location: &str, client: &reqwest::Client) -> Vec<RawRecord> {
    let source = source_for(location, client);

    match read_source(source.as_ref()).await {
        Ok(records) => {
            tracing::info!(location = source.location(), records = records.len(), "loaded sensor records");
            records
        }
        Err(e) => {
            metrics::counter!("sensor_source_failures_total", "source" => source.kind()).increment(1);
            tracing::warn!(
                location = source.location(),
                source = source.kind(),
                error = %e,
                "failed to load sensor records"
            );
            Vec::new()
        }
    }
}

async fn read_source(source: &dyn RecordSource) -> Result<Vec<RawRecord>, SourceError> {
    let text = source.fetch_text().await?;
    parse_records(&text)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
