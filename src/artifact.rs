//! Artifact schemas
//!
//! Wire shapes returned by the management API. Fields are read from the
//! API's lower-case JSON names and exposed to output templates under the
//! capitalized names users write in `--format` (`{{.Name}}`, `{{.Type}}`, ...).

use serde::{Deserialize, Serialize};

/// A list-shaped API response
///
/// The renderer only needs the reported count and the ordered items, so any
/// list response can be rendered once it implements this trait.
pub trait ArtifactList {
    type Item: Serialize;

    /// Count reported by the API
    fn count(&self) -> usize;

    /// Items in the order the API returned them
    fn items(&self) -> &[Self::Item];

    /// True when there is nothing to render
    fn is_empty(&self) -> bool {
        self.count() == 0 || self.items().is_empty()
    }
}

/// A name/value configuration parameter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(rename(serialize = "Name", deserialize = "name"), default)]
    pub name: String,
    #[serde(rename(serialize = "Value", deserialize = "value"), default)]
    pub value: String,
}

impl Parameter {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Summary row of an inbound endpoint, as returned in list responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEndpointSummary {
    #[serde(rename(serialize = "Name", deserialize = "name"), default)]
    pub name: String,
    #[serde(rename(serialize = "Type", deserialize = "protocol"), default)]
    pub kind: String,
    #[serde(rename(serialize = "Status", deserialize = "status"), default)]
    pub status: String,
}

/// Full description of one inbound endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEndpoint {
    #[serde(rename(serialize = "Name", deserialize = "name"), default)]
    pub name: String,
    #[serde(rename(serialize = "Type", deserialize = "protocol"), default)]
    pub kind: String,
    #[serde(rename(serialize = "Stats", deserialize = "stats"), default)]
    pub stats: String,
    #[serde(rename(serialize = "Tracing", deserialize = "tracing"), default)]
    pub tracing: String,
    #[serde(rename(serialize = "Status", deserialize = "status"), default)]
    pub status: String,
    #[serde(rename(serialize = "Parameters", deserialize = "parameters"), default)]
    pub parameters: Vec<Parameter>,
}

/// List response for inbound endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEndpointList {
    #[serde(default)]
    pub count: usize,
    #[serde(rename = "list", default)]
    pub inbound_endpoints: Vec<InboundEndpointSummary>,
}

impl ArtifactList for InboundEndpointList {
    type Item = InboundEndpointSummary;

    fn count(&self) -> usize {
        self.count
    }

    fn items(&self) -> &[InboundEndpointSummary] {
        &self.inbound_endpoints
    }
}
