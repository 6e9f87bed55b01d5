use std::fs;

use smoke_core::{FetchError, Fetcher};

/// Lee URLs `file://` (espejos locales, tests).
#[derive(Debug, Default, Clone, Copy)]
pub struct FileFetcher;

impl Fetcher for FileFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let path = url.strip_prefix("file://")
                      .ok_or_else(|| FetchError::UnsupportedUrl(url.to_string()))?;
        fs::read(path).map_err(|source| FetchError::Io { url: url.to_string(),
                                                          source })
    }
}
