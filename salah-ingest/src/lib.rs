//! salah-ingest: provider data formats, the yearly cache, and configuration payloads.

pub mod cache;
pub mod parsers;
pub mod transport;
pub mod types;

pub use cache::YearCache;
pub use parsers::parse_yearly_json;
pub use transport::{ServerConfig, TransportError, decrypt_config_payload};
pub use types::YearlyTable;
