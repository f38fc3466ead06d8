pub mod cache;
pub mod client;
pub mod types;

pub use cache::{CacheConfig, ResponseCache};
pub use client::{create_client, BackendClient};
pub use types::{DiscoverResponse, MovieRecord, SearchResponse};
