//! `mi get` - fetch artifacts from an environment and print them

use crate::artifact::{ArtifactList, InboundEndpoint, InboundEndpointList};
use crate::format::{RenderOutcome, Renderer};
use crate::mi::client::MiClient;
use crate::resource::{fetch_list, fetch_one, require_resource};
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{self, Write};

/// Catalog key of inbound endpoints
pub const INBOUND_ENDPOINTS: &str = "inbound-endpoints";

/// Print inbound endpoints: the list, or one endpoint when `name` is given
pub async fn get_inbound_endpoints(
    client: &MiClient,
    name: Option<&str>,
    format: &str,
) -> Result<RenderOutcome> {
    get_artifacts::<InboundEndpointList, InboundEndpoint, _, _>(
        client,
        INBOUND_ENDPOINTS,
        name,
        format,
        io::stdout(),
        io::stderr(),
    )
    .await
}

/// Fetch a resource and render it with the resource's default formats
///
/// `L` is the list shape, `T` the single-artifact shape. Fetch errors are
/// returned; template errors are reported on `err` and show up in the
/// outcome only.
pub async fn get_artifacts<L, T, W, E>(
    client: &MiClient,
    resource_key: &str,
    name: Option<&str>,
    format: &str,
    out: W,
    err: E,
) -> Result<RenderOutcome>
where
    L: ArtifactList + DeserializeOwned,
    T: Serialize + DeserializeOwned,
    W: Write,
    E: Write,
{
    let resource_def = require_resource(resource_key)?;
    let mut renderer = Renderer::new(resource_def.format_defaults(), out, err);

    let outcome = match name {
        None => {
            let list: L = fetch_list(client, resource_key).await?;
            renderer.render_list(&list, format)
        }
        Some(name) => {
            let item: T = fetch_one(client, resource_key, name).await?;
            renderer.render_item(&item, format)
        }
    };

    tracing::info!("get {}: {:?}", resource_def.display_name, outcome);
    Ok(outcome)
}
