//! Book sources.
//!
//! A book is two files under its id: `info.json` with metadata and
//! `book.txt` with the text. Sources are either a local directory or an
//! HTTP base URL laid out the same way.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

pub const INFO_FILE: &str = "info.json";
pub const CONTENT_FILE: &str = "book.txt";

/// Title shown when `info.json` carries none.
pub const UNKNOWN_TITLE: &str = "Unknown book";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookInfo {
    #[serde(default)]
    pub title: Option<String>,
}

impl BookInfo {
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => UNKNOWN_TITLE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedBook {
    pub info: BookInfo,
    pub text: String,
}

pub trait BookSource {
    fn info(&self, id: &str) -> Result<BookInfo>;
    fn content(&self, id: &str) -> Result<String>;
}

/// Fetches metadata, then content. The content request is never issued
/// when the metadata request fails.
pub fn load_book(source: &dyn BookSource, id: &str) -> Result<LoadedBook> {
    let info = fetch_info(source, id)?;
    let text = fetch_content(source, id)?;
    Ok(LoadedBook { info, text })
}

/// First step of a load: validates the id and fetches `info.json`.
pub fn fetch_info(source: &dyn BookSource, id: &str) -> Result<BookInfo> {
    validate_id(id)?;
    let info = source.info(id)?;
    tracing::debug!(book = id, title = ?info.title, "loaded book info");
    Ok(info)
}

pub fn fetch_content(source: &dyn BookSource, id: &str) -> Result<String> {
    let text = source.content(id)?;
    tracing::info!(book = id, bytes = text.len(), "loaded book content");
    Ok(text)
}

pub fn validate_id(id: &str) -> Result<()> {
    let bad = id.is_empty()
        || id == "."
        || id == ".."
        || id.contains(['/', '\\'])
        || id.chars().any(char::is_control);
    if bad {
        return Err(Error::InvalidBookId(id.to_string()));
    }
    Ok(())
}

fn parse_info(raw: &[u8]) -> Result<BookInfo> {
    serde_json::from_slice(raw).map_err(Error::Metadata)
}

/// Decodes book text, falling back to charset detection for non-UTF-8 files.
pub fn decode_text(bytes: &[u8]) -> String {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.strip_prefix('\u{feff}').unwrap_or(text).to_string();
    }
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    let (text, used, _) = encoding.decode(bytes);
    tracing::debug!(encoding = used.name(), "decoded non-utf8 book text");
    text.into_owned()
}

#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read(&self, id: &str, file: &str) -> Result<Vec<u8>> {
        let path = self.root.join(id).join(file);
        std::fs::read(&path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound {
                kind: "book file",
                name: path.display().to_string(),
            },
            _ => Error::Io(err),
        })
    }
}

impl BookSource for DirSource {
    fn info(&self, id: &str) -> Result<BookInfo> {
        parse_info(&self.read(id, INFO_FILE)?)
    }

    fn content(&self, id: &str) -> Result<String> {
        Ok(decode_text(&self.read(id, CONTENT_FILE)?))
    }
}

#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("bookpane/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn get(&self, id: &str, file: &str) -> Result<Vec<u8>> {
        let url = format!("{}/{id}/{file}", self.base_url);
        let resp = self.client.get(&url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                url,
                status: status.as_u16(),
            });
        }
        Ok(resp.bytes()?.to_vec())
    }
}

impl BookSource for HttpSource {
    fn info(&self, id: &str) -> Result<BookInfo> {
        parse_info(&self.get(id, INFO_FILE)?)
    }

    fn content(&self, id: &str) -> Result<String> {
        Ok(decode_text(&self.get(id, CONTENT_FILE)?))
    }
}
