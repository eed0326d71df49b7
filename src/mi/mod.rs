//! Management API interaction module
//!
//! # Module Structure
//!
//! - [`client`] - Environment-bound client issuing artifact requests
//! - [`http`] - HTTP utilities for REST API calls
//!
//! # Example
//!
//! ```ignore
//! use micli::mi::client::MiClient;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = MiClient::new("dev", "https://localhost:9164", true)?;
//!     let list: serde_json::Value = client.get_artifact_list("inbound-endpoints").await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod http;
