//! Retrieval of the base configuration
//!
//! The builder only needs `fetch(url) -> text`. [`SourceFetcher`] picks the
//! transport from the location: `http://` and `https://` go through a
//! blocking `reqwest` client, `file://` URLs and plain paths are read from
//! disk. Every retrieval failure surfaces as [`Error::Network`] (or
//! [`Error::Decode`] for bytes that are not UTF-8) so callers can fall back
//! to an empty model. A client that cannot be built is an
//! [`Error::HttpClient`] and is never treated as an unavailable base.

use std::path::Path;
use std::time::Duration;

use log::debug;

use crate::error::{Error, Result};

/// Time allowed for a single HTTP request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Fetch text by location
pub trait Fetcher {
    fn fetch(&self, location: &str) -> Result<String>;
}

fn decode(bytes: Vec<u8>, location: &str) -> Result<String> {
    String::from_utf8(bytes).map_err(|_| Error::Decode {
        source_name: location.to_string(),
    })
}

/// Blocking HTTP fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Build a client with the given request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("qx-builder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::HttpClient {
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, location: &str) -> Result<String> {
        debug!("GET {location}");
        let network = |e: reqwest::Error| Error::Network {
            url: location.to_string(),
            message: e.to_string(),
        };

        let response = self
            .client
            .get(location)
            .send()
            .map_err(network)?
            .error_for_status()
            .map_err(network)?;
        let bytes = response.bytes().map_err(network)?;
        decode(bytes.to_vec(), location)
    }
}

/// Reads local files, accepting both plain paths and `file://` URLs
#[derive(Debug, Default, Clone, Copy)]
pub struct FileFetcher;

impl Fetcher for FileFetcher {
    fn fetch(&self, location: &str) -> Result<String> {
        let path = location.strip_prefix("file://").unwrap_or(location);
        debug!("Reading {path}");
        let bytes = std::fs::read(Path::new(path)).map_err(|e| Error::Network {
            url: location.to_string(),
            message: e.to_string(),
        })?;
        decode(bytes, location)
    }
}

/// Dispatches to HTTP or local file retrieval by scheme
#[derive(Debug, Clone)]
pub struct SourceFetcher {
    http: HttpFetcher,
    file: FileFetcher,
}

impl SourceFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: HttpFetcher::new(timeout)?,
            file: FileFetcher,
        })
    }
}

/// Whether a location should be fetched over HTTP
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

impl Fetcher for SourceFetcher {
    fn fetch(&self, location: &str) -> Result<String> {
        if is_remote(location) {
            self.http.fetch(location)
        } else {
            self.file.fetch(location)
        }
    }
}
