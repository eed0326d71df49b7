//! Resource Fetcher
//!
//! Fetches artifacts from the management API based on resource definitions.
//! The destination type picks the decoding target; failures from the
//! client are returned as they are.

use super::registry::{require_resource, ResourceDef};
use crate::mi::client::MiClient;
use anyhow::Result;
use serde::de::DeserializeOwned;

/// Selects a single artifact instead of the whole list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub key: String,
    pub value: String,
}

impl Lookup {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    /// Lookup by artifact name, using the resource's lookup parameter
    pub fn by_name(resource_def: &ResourceDef, name: &str) -> Self {
        Self::new(&resource_def.lookup_param, name)
    }
}

/// Fetch a resource into `T`
///
/// Without a lookup the list endpoint is queried; with one, the single
/// artifact it selects.
pub async fn fetch<T: DeserializeOwned>(
    client: &MiClient,
    resource_key: &str,
    lookup: Option<&Lookup>,
) -> Result<T> {
    let resource_def = require_resource(resource_key)?;

    match lookup {
        None => {
            tracing::debug!(
                "Fetching {} list from environment '{}'",
                resource_key,
                client.environment
            );
            client.get_artifact_list(&resource_def.path).await
        }
        Some(lookup) => {
            tracing::debug!(
                "Fetching {} {}={} from environment '{}'",
                resource_key,
                lookup.key,
                lookup.value,
                client.environment
            );
            client
                .get_artifact_info(&resource_def.path, &lookup.key, &lookup.value)
                .await
        }
    }
}

/// Fetch the list form of a resource
pub async fn fetch_list<T: DeserializeOwned>(client: &MiClient, resource_key: &str) -> Result<T> {
    fetch(client, resource_key, None).await
}

/// Fetch a single artifact by name
pub async fn fetch_one<T: DeserializeOwned>(
    client: &MiClient,
    resource_key: &str,
    name: &str,
) -> Result<T> {
    let lookup = Lookup::by_name(require_resource(resource_key)?, name);
    fetch(client, resource_key, Some(&lookup)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::get_resource;
    use serde_json::Value;

    #[test]
    fn test_lookup_by_name_uses_catalog_param() {
        let def = get_resource("inbound-endpoints").unwrap();
        let lookup = Lookup::by_name(def, "ep1");
        assert_eq!(lookup, Lookup::new("inboundEndpointName", "ep1"));
    }

    #[tokio::test]
    async fn test_unknown_resource_fails_before_any_request() {
        // Port 9 (discard) is never contacted: resolution fails first
        let client = MiClient::new("dev", "http://127.0.0.1:9", false).unwrap();

        let err = fetch_list::<Value>(&client, "no-such-artifacts")
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Unknown resource: no-such-artifacts"));

        let err = fetch_one::<Value>(&client, "no-such-artifacts", "x")
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Unknown resource: no-such-artifacts"));
    }
}
