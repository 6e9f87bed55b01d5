use log::debug;
use std::error::Error as _;
use std::io::{self, Read};
use std::time::Duration;

use smoke_core::{FetchError, Fetcher};

/// Tamaño máximo aceptado para un `.cfg` descargado.
pub const MAX_BODY_BYTES: u64 = 4 * 1024 * 1024;

/// Descarga por HTTP(S) con timeout global.
pub struct HttpFetcher {
    agent: ureq::Agent,
    max_bytes: u64,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self { agent: ureq::AgentBuilder::new().timeout(timeout).build(),
               max_bytes: MAX_BODY_BYTES }
    }

    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        debug!("http: GET {url}");
        match self.agent.get(url).call() {
            Ok(response) => {
                let mut body = Vec::new();
                response.into_reader()
                        .take(self.max_bytes.saturating_add(1))
                        .read_to_end(&mut body)
                        .map_err(|source| read_error(url, source))?;
                if body.len() as u64 > self.max_bytes {
                    return Err(FetchError::TooLarge { url: url.to_string(),
                                                      limit: self.max_bytes });
                }
                Ok(body)
            }
            Err(ureq::Error::Status(status, _)) => Err(FetchError::Status { url: url.to_string(),
                                                                            status }),
            Err(ureq::Error::Transport(transport)) => {
                if is_timeout(transport.source()) {
                    Err(FetchError::Timeout { url: url.to_string() })
                } else {
                    Err(FetchError::Transport { url: url.to_string(),
                                                detail: transport.to_string() })
                }
            }
        }
    }
}

fn read_error(url: &str, source: io::Error) -> FetchError {
    if matches!(source.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) {
        FetchError::Timeout { url: url.to_string() }
    } else {
        FetchError::Io { url: url.to_string(),
                         source }
    }
}

fn is_timeout(source: Option<&(dyn std::error::Error + 'static)>) -> bool {
    source.and_then(|e| e.downcast_ref::<io::Error>())
          .is_some_and(|e| matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_are_recognised_in_io_sources() {
        let timed_out = io::Error::new(io::ErrorKind::TimedOut, "slow");
        assert!(is_timeout(Some(&timed_out)));
        let refused = io::Error::new(io::ErrorKind::ConnectionRefused, "nope");
        assert!(!is_timeout(Some(&refused)));
        assert!(!is_timeout(None));
    }

    #[test]
    fn read_errors_keep_their_url() {
        match read_error("https://h/x.cfg", io::Error::new(io::ErrorKind::UnexpectedEof, "eof")) {
            FetchError::Io { url, .. } => assert_eq!(url, "https://h/x.cfg"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
