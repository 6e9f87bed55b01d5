//! Implementaciones de `smoke_core::Fetcher`.
pub mod file;
pub mod http;
pub mod scheme;

pub use file::FileFetcher;
pub use http::HttpFetcher;
pub use scheme::SchemeFetcher;
