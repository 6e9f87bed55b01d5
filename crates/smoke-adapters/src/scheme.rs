use smoke_core::{FetchError, Fetcher};
use std::time::Duration;

use crate::{FileFetcher, HttpFetcher};

/// Elige el fetcher según el esquema de la URL.
pub struct SchemeFetcher {
    http: HttpFetcher,
    file: FileFetcher,
}

impl SchemeFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self { http: HttpFetcher::new(timeout),
               file: FileFetcher }
    }
}

impl Fetcher for SchemeFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        match url.split_once("://").map(|(scheme, _)| scheme.to_ascii_lowercase()) {
            Some(s) if s == "http" || s == "https" => self.http.fetch(url),
            Some(s) if s == "file" => self.file.fetch(url),
            _ => Err(FetchError::UnsupportedUrl(url.to_string())),
        }
    }
}
