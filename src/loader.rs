//! Loading of a streamer's chat log and generated lines.
//!
//! Data lives under `{root}/{streamer}/logs.csv` and
//! `{root}/{streamer}/generated.txt`, where the root is either a directory or
//! an HTTP base URL. Malformed and too-short lines are skipped, not reported
//! as errors.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::game::text_len;
use crate::types::RealMessage;

/// Messages must be longer than this to be playable
pub const MIN_MESSAGE_CHARS: usize = 10;

pub const LOGS_FILE: &str = "logs.csv";
pub const GENERATED_FILE: &str = "generated.txt";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to fetch {path}: {reason}")]
    Unreachable { path: String, reason: String },

    #[error("Failed to fetch {path}: HTTP status {status}")]
    Status { path: String, status: u16 },

    #[error("No usable messages in {path}")]
    Empty { path: String },
}

impl LoadError {
    pub fn path(&self) -> &str {
        match self {
            LoadError::Unreachable { path, .. }
            | LoadError::Status { path, .. }
            | LoadError::Empty { path } => path,
        }
    }
}

/// Resource paths a streamer's data is expected at, relative to the data root
pub fn expected_paths(streamer: &str) -> Vec<String> {
    vec![
        format!("{}/{}", streamer, LOGS_FILE),
        format!("{}/{}", streamer, GENERATED_FILE),
    ]
}

/// Everything needed to play one streamer's game
#[derive(Debug, Clone)]
pub struct Corpus {
    pub streamer: String,
    pub real: Arc<[RealMessage]>,
    pub ai: Vec<String>,
}

/// Where data files are read from
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch a resource by its path relative to the source root
    async fn fetch(&self, path: &str) -> Result<String, LoadError>;

    /// Human-readable root, for logs
    fn describe(&self) -> String;
}

/// Reads data from a local directory
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl DataSource for FsSource {
    async fn fetch(&self, path: &str) -> Result<String, LoadError> {
        tokio::fs::read_to_string(self.root.join(path))
            .await
            .map_err(|e| LoadError::Unreachable {
                path: path.to_string(),
                reason: e.to_string(),
            })
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Fetches data over HTTP relative to a base URL
pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch(&self, path: &str) -> Result<String, LoadError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LoadError::Unreachable {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(LoadError::Status {
                path: path.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.text().await.map_err(|e| LoadError::Unreachable {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// Pick a source for a configured data root: URLs go over HTTP, anything else is a directory
pub fn source_from_root(root: &str) -> Arc<dyn DataSource> {
    if root.starts_with("http://") || root.starts_with("https://") {
        Arc::new(HttpSource::new(root))
    } else {
        Arc::new(FsSource::new(root))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLogs {
    pub messages: Vec<RealMessage>,
    /// Non-blank rows that were skipped
    pub dropped: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedGenerated {
    pub lines: Vec<String>,
    /// Non-blank lines that were skipped
    pub dropped: usize,
}

/// Parse one chat-log row: `timestamp,author,link,message`.
///
/// The first three fields must be non-empty. The message is the rest of the
/// line, so it may contain commas.
fn parse_log_row(line: &str) -> Option<RealMessage> {
    let mut fields = line.splitn(4, ',');
    let timestamp = fields.next().filter(|f| !f.is_empty())?;
    let author = fields.next().filter(|f| !f.is_empty())?;
    let external_link = fields.next().filter(|f| !f.is_empty())?;
    let raw = fields.next().filter(|f| !f.is_empty())?;

    let text = strip_quotes(raw.trim()).trim();
    if text_len(text) <= MIN_MESSAGE_CHARS {
        return None;
    }

    Some(RealMessage {
        timestamp: timestamp.to_string(),
        author: author.to_string(),
        external_link: external_link.to_string(),
        text: text.to_string(),
    })
}

fn strip_quotes(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
}

/// Parse the chat log. The first line is a header.
pub fn parse_logs(text: &str) -> ParsedLogs {
    let mut parsed = ParsedLogs::default();

    for line in text.lines().skip(1).filter(|l| !l.trim().is_empty()) {
        match parse_log_row(line) {
            Some(message) => parsed.messages.push(message),
            None => parsed.dropped += 1,
        }
    }

    parsed
}

/// Parse generated text, one message per line
pub fn parse_generated(text: &str) -> ParsedGenerated {
    let mut parsed = ParsedGenerated::default();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if text_len(line) > MIN_MESSAGE_CHARS {
            parsed.lines.push(line.to_string());
        } else {
            parsed.dropped += 1;
        }
    }

    parsed
}

/// Fetch and parse both resources for a streamer, chat log first
pub async fn load_corpus(source: &dyn DataSource, streamer: &str) -> Result<Corpus, LoadError> {
    let logs_path = format!("{}/{}", streamer, LOGS_FILE);
    let generated_path = format!("{}/{}", streamer, GENERATED_FILE);

    tracing::info!("Loading data for {} from {}", streamer, source.describe());

    let logs = parse_logs(&source.fetch(&logs_path).await?);
    if logs.dropped > 0 {
        tracing::warn!("Skipped {} malformed or short rows in {}", logs.dropped, logs_path);
    }
    if logs.messages.is_empty() {
        return Err(LoadError::Empty { path: logs_path });
    }

    let generated = parse_generated(&source.fetch(&generated_path).await?);
    if generated.dropped > 0 {
        tracing::warn!("Skipped {} short lines in {}", generated.dropped, generated_path);
    }
    if generated.lines.is_empty() {
        return Err(LoadError::Empty {
            path: generated_path,
        });
    }

    tracing::info!(
        "Loaded {} real and {} generated messages for {}",
        logs.messages.len(),
        generated.lines.len(),
        streamer
    );

    Ok(Corpus {
        streamer: streamer.to_string(),
        real: logs.messages.into(),
        ai: generated.lines,
    })
}
