//! Query artifacts deployed on an integration runtime and print them.
//!
//! - [`mi`] - management API client
//! - [`resource`] - artifact catalog and typed fetching
//! - [`artifact`] - wire schemas
//! - [`format`] - format specifiers, templates and the render engine
//! - [`config`] - configured environments
//! - [`commands`] - CLI command implementations

pub mod artifact;
pub mod commands;
pub mod config;
pub mod format;
pub mod mi;
pub mod resource;
