//! Format specifier parsing
//!
//! A format specifier is what the user passes to `--format`:
//!
//! - `""` selects the resource's default layout
//! - `table` / `table <template>` selects the table layout
//! - `detail` / `detail <template>` selects the detail layout
//! - `json` / `jsonpretty` print each artifact as JSON
//! - anything else is used as the template itself

use super::FormatDefaults;

pub const TABLE_FORMAT_KEY: &str = "table";
pub const DETAIL_FORMAT_KEY: &str = "detail";
pub const JSON_FORMAT_KEY: &str = "json";
pub const JSON_PRETTY_FORMAT_KEY: &str = "jsonpretty";

const JSON_TEMPLATE: &str = "{{json .}}";
const JSON_PRETTY_TEMPLATE: &str = "{{jsonPretty .}}";

/// Layout a specifier resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One row per artifact, preceded by a header row when headers are configured
    Table,
    /// Free-form block per artifact
    Detail,
    /// Caller template or a structured format, no header row
    Custom,
}

/// A resolved format: the layout plus the template text to compile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    pub layout: Layout,
    pub template: String,
}

impl FormatSpec {
    /// Resolve a specifier for rendering a list
    pub fn for_list(format: &str, defaults: &FormatDefaults) -> Self {
        if format.is_empty() {
            return Self::resolve(&defaults.table, defaults);
        }
        Self::resolve(format, defaults)
    }

    /// Resolve a specifier for rendering a single artifact
    ///
    /// A table makes no sense for one artifact, so table requests fall back
    /// to the detail layout.
    pub fn for_item(format: &str, defaults: &FormatDefaults) -> Self {
        if format.is_empty() || format.starts_with(TABLE_FORMAT_KEY) {
            return Self::resolve(&defaults.detail, defaults);
        }
        Self::resolve(format, defaults)
    }

    fn resolve(format: &str, defaults: &FormatDefaults) -> Self {
        let format = unescape(format);

        match format.trim() {
            JSON_FORMAT_KEY => return Self::custom(JSON_TEMPLATE),
            JSON_PRETTY_FORMAT_KEY => return Self::custom(JSON_PRETTY_TEMPLATE),
            _ => {}
        }

        let (layout, body) = split_layout(&format);
        if !body.is_empty() {
            return Self {
                layout,
                template: body.to_string(),
            };
        }

        // A bare keyword selects the built-in text for that layout
        let fallback = match layout {
            Layout::Table => &defaults.table,
            Layout::Detail => &defaults.detail,
            Layout::Custom => return Self::custom(""),
        };
        let fallback = unescape(fallback);
        let (_, body) = split_layout(&fallback);
        Self {
            layout,
            template: body.to_string(),
        }
    }

    fn custom(template: &str) -> Self {
        Self {
            layout: Layout::Custom,
            template: template.to_string(),
        }
    }
}

/// Split a leading layout keyword from the template text
fn split_layout(format: &str) -> (Layout, &str) {
    if let Some(rest) = format.strip_prefix(TABLE_FORMAT_KEY) {
        (Layout::Table, rest.trim_start_matches(' '))
    } else if let Some(rest) = format.strip_prefix(DETAIL_FORMAT_KEY) {
        (Layout::Detail, rest.trim_start_matches(' '))
    } else {
        (Layout::Custom, format)
    }
}

/// Turn typed `\t` and `\n` sequences into the characters they name
fn unescape(format: &str) -> String {
    format.replace("\\t", "\t").replace("\\n", "\n")
}
