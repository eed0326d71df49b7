//! Resource abstraction layer
//!
//! Artifact types are described by data rather than code: definitions are
//! loaded from JSON at compile time, so a new artifact type needs a catalog
//! entry and a schema, nothing else.
//!
//! # Architecture
//!
//! - [`registry`] - Loads and caches resource definitions from embedded JSON
//! - [`fetcher`] - Fetches resources from the management API as typed values
//!
//! # Example
//!
//! ```ignore
//! use micli::artifact::InboundEndpointList;
//! use micli::resource::fetch_list;
//!
//! async fn list(client: &MiClient) -> anyhow::Result<InboundEndpointList> {
//!     fetch_list(client, "inbound-endpoints").await
//! }
//! ```

mod fetcher;
mod registry;

pub use fetcher::{fetch, fetch_list, fetch_one, Lookup};
pub use registry::*;
