//! Output formatting
//!
//! Turns fetched artifacts into terminal text. The `--format` flag selects a
//! layout or supplies a template; see [`spec`] for the accepted specifiers and
//! [`template`] for the template language.
//!
//! # Module Structure
//!
//! - [`spec`] - Resolves a format specifier against the resource defaults
//! - [`template`] - Compiles dot-syntax templates onto minijinja
//! - [`render`] - Writes lists and single artifacts, reporting template failures

mod error;
pub mod render;
pub mod spec;
pub mod template;

use std::collections::BTreeMap;

pub use error::FormatError;
pub use render::{RenderOutcome, Renderer};
pub use spec::{FormatSpec, Layout};
pub use template::Template;

/// Default formats for one resource type
///
/// Passed to the [`Renderer`] when it is built; usually taken from the
/// resource catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatDefaults {
    /// Format used for lists when none is given, normally `table ...`
    pub table: String,
    /// Format used for single artifacts when none (or a table) is given
    pub detail: String,
    /// Header text per field, rendered through table templates
    pub headers: BTreeMap<String, String>,
    /// Printed instead of an empty list
    pub empty_message: String,
}
