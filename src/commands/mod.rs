//! Command implementations behind the CLI subcommands
//!
//! - [`get`] - Fetch artifacts and render them
//! - [`env`] - Manage configured environments

pub mod env;
pub mod get;
