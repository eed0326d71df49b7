//! Render engine
//!
//! Writes a list or a single artifact through the template selected by a
//! format specifier. Template failures never abort the command: they are
//! reported on the error stream and rendering stops.

use super::error::FormatError;
use super::spec::{FormatSpec, Layout};
use super::template::Template;
use super::FormatDefaults;
use crate::artifact::ArtifactList;
use serde::Serialize;
use std::io::Write;

/// How a render call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Nothing to show; the empty message was printed
    Empty,
    /// This many artifacts were written
    Rendered(usize),
    /// A template failed; a diagnostic was printed
    Failed,
}

/// Renders artifacts to an output stream, diagnostics to an error stream
pub struct Renderer<W: Write, E: Write> {
    defaults: FormatDefaults,
    out: W,
    err: E,
}

impl<W: Write, E: Write> Renderer<W, E> {
    pub fn new(defaults: FormatDefaults, out: W, err: E) -> Self {
        Self { defaults, out, err }
    }

    /// Hand back the output and error streams
    pub fn into_writers(self) -> (W, E) {
        (self.out, self.err)
    }

    /// Render every artifact of a list, one block per artifact
    pub fn render_list<L: ArtifactList>(&mut self, list: &L, format: &str) -> RenderOutcome {
        if list.is_empty() {
            tracing::debug!("Empty list, nothing to render");
            if let Err(e) = writeln!(self.out, "{}", self.defaults.empty_message) {
                self.report(&FormatError::from(e));
                return RenderOutcome::Failed;
            }
            return RenderOutcome::Empty;
        }

        let spec = FormatSpec::for_list(format, &self.defaults);
        tracing::debug!("Rendering {} items with {:?} layout", list.items().len(), spec.layout);

        match self.write_list(list.items(), &spec) {
            Ok(count) => RenderOutcome::Rendered(count),
            Err(e) => {
                self.report(&e);
                RenderOutcome::Failed
            }
        }
    }

    /// Render a single artifact
    pub fn render_item<T: Serialize>(&mut self, item: &T, format: &str) -> RenderOutcome {
        let spec = FormatSpec::for_item(format, &self.defaults);
        tracing::debug!("Rendering item with {:?} layout", spec.layout);

        match self.write_item(item, &spec) {
            Ok(()) => RenderOutcome::Rendered(1),
            Err(e) => {
                self.report(&e);
                RenderOutcome::Failed
            }
        }
    }

    fn write_list<T: Serialize>(
        &mut self,
        items: &[T],
        spec: &FormatSpec,
    ) -> Result<usize, FormatError> {
        let template = Template::compile(&spec.template)?;
        tracing::trace!("List template: {:?}", template.source());

        if spec.layout == Layout::Table && !self.defaults.headers.is_empty() {
            let header = template.execute_lenient(&self.defaults.headers)?;
            self.out.write_all(header.as_bytes())?;
            self.out.write_all(b"\n")?;
        }

        for item in items {
            let text = template.execute(item)?;
            self.out.write_all(text.as_bytes())?;
            self.out.write_all(b"\n")?;
        }
        self.out.flush()?;

        Ok(items.len())
    }

    fn write_item<T: Serialize>(&mut self, item: &T, spec: &FormatSpec) -> Result<(), FormatError> {
        let template = Template::compile(&spec.template)?;
        let text = template.execute(item)?;
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    fn report(&mut self, error: &FormatError) {
        tracing::warn!("Template rendering failed: {}", error);
        if let Err(e) = writeln!(self.err, "Error executing template: {}", error) {
            tracing::error!("Cannot write template diagnostic: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{
        InboundEndpoint, InboundEndpointList, InboundEndpointSummary, Parameter,
    };
    use std::collections::BTreeMap;
    use std::io;

    const DETAIL_FORMAT: &str = "detail Name - {{.Name}}\n\
        Type - {{.Type}}\n\
        Stats - {{.Stats}}\n\
        Tracing - {{.Tracing}}\n\
        Status - {{.Status}}\n\
        Parameters :\n\
        NAME\tVALUE\n\
        {{range .Parameters}}{{.Name}}\t{{.Value}}\n{{end}}";

    fn defaults() -> FormatDefaults {
        FormatDefaults {
            table: "table {{.Name}}\t{{.Type}}\t{{.Status}}".to_string(),
            detail: DETAIL_FORMAT.to_string(),
            headers: BTreeMap::new(),
            empty_message: "No Inbound Endpoints found".to_string(),
        }
    }

    fn with_headers() -> FormatDefaults {
        let mut defaults = defaults();
        defaults.headers = [("Name", "NAME"), ("Type", "TYPE"), ("Status", "STATUS")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        defaults
    }

    fn summary(name: &str, kind: &str, status: &str) -> InboundEndpointSummary {
        InboundEndpointSummary {
            name: name.to_string(),
            kind: kind.to_string(),
            status: status.to_string(),
        }
    }

    fn two_endpoints() -> InboundEndpointList {
        InboundEndpointList {
            count: 2,
            inbound_endpoints: vec![
                summary("ep1", "http", "Active"),
                summary("ep2", "file", "Inactive"),
            ],
        }
    }

    fn detailed_endpoint() -> InboundEndpoint {
        InboundEndpoint {
            name: "ep1".to_string(),
            kind: "http".to_string(),
            stats: "enabled".to_string(),
            tracing: "disabled".to_string(),
            status: "Active".to_string(),
            parameters: vec![Parameter::new("sequential", "true")],
        }
    }

    fn render_list(
        defaults: FormatDefaults,
        list: &InboundEndpointList,
        format: &str,
    ) -> (RenderOutcome, String, String) {
        let mut renderer = Renderer::new(defaults, Vec::new(), Vec::new());
        let outcome = renderer.render_list(list, format);
        let (out, err) = renderer.into_writers();
        (
            outcome,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    fn render_item(item: &InboundEndpoint, format: &str) -> (RenderOutcome, String, String) {
        let mut renderer = Renderer::new(defaults(), Vec::new(), Vec::new());
        let outcome = renderer.render_item(item, format);
        let (out, err) = renderer.into_writers();
        (
            outcome,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_empty_list_prints_notice_only() {
        let list = InboundEndpointList::default();
        // An unusable template proves no template is compiled
        let (outcome, out, err) = render_list(defaults(), &list, "{{range}}");

        assert_eq!(outcome, RenderOutcome::Empty);
        assert_eq!(out, "No Inbound Endpoints found\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_zero_count_with_items_is_empty() {
        let mut list = two_endpoints();
        list.count = 0;
        let (outcome, out, _) = render_list(defaults(), &list, "");
        assert_eq!(outcome, RenderOutcome::Empty);
        assert_eq!(out, "No Inbound Endpoints found\n");
    }

    #[test]
    fn test_default_list_is_tab_separated_rows() {
        let (outcome, out, err) = render_list(defaults(), &two_endpoints(), "");

        assert_eq!(outcome, RenderOutcome::Rendered(2));
        assert_eq!(out, "ep1\thttp\tActive\nep2\tfile\tInactive\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_table_layout_writes_header_row() {
        let (_, out, _) = render_list(with_headers(), &two_endpoints(), "");
        assert_eq!(
            out,
            "NAME\tTYPE\tSTATUS\nep1\thttp\tActive\nep2\tfile\tInactive\n"
        );
    }

    #[test]
    fn test_custom_table_columns_get_matching_headers() {
        let format = "table {{.Status}}\\t{{.Name}}";
        let (_, out, _) = render_list(with_headers(), &two_endpoints(), format);
        assert_eq!(out, "STATUS\tNAME\nActive\tep1\nInactive\tep2\n");
    }

    #[test]
    fn test_table_keyword_without_space_keeps_table_layout() {
        let (outcome, out, err) = render_list(with_headers(), &two_endpoints(), "table{{.Name}}");
        assert_eq!(outcome, RenderOutcome::Rendered(2));
        assert_eq!(out, "NAME\nep1\nep2\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_custom_list_template_has_no_header() {
        let (outcome, out, _) = render_list(with_headers(), &two_endpoints(), "{{.Name}}");
        assert_eq!(outcome, RenderOutcome::Rendered(2));
        assert_eq!(out, "ep1\nep2\n");
    }

    #[test]
    fn test_list_as_json() {
        let (_, out, _) = render_list(with_headers(), &two_endpoints(), "json");
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["Name"], "ep2");
        assert_eq!(lines[1]["Type"], "file");
    }

    #[test]
    fn test_list_failure_keeps_earlier_rows() {
        let list = two_endpoints();
        let (outcome, out, err) = render_list(defaults(), &list, "{{if eq}}{{end}}");
        assert_eq!(outcome, RenderOutcome::Failed);
        assert!(out.is_empty());
        assert!(err.starts_with("Error executing template: "));

        // The second item lacks the field the template needs
        let value_list = ValueList(vec![
            serde_json::json!({"Name": "ok"}),
            serde_json::json!({"Other": "x"}),
        ]);
        let mut renderer = Renderer::new(defaults(), Vec::new(), Vec::new());
        let outcome = renderer.render_list(&value_list, "{{.Name}}");
        let (out, err) = renderer.into_writers();

        assert_eq!(outcome, RenderOutcome::Failed);
        assert_eq!(String::from_utf8(out).unwrap(), "ok\n");
        assert!(String::from_utf8(err)
            .unwrap()
            .starts_with("Error executing template: "));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_unwritable_error_stream_still_fails_cleanly() {
        let mut renderer = Renderer::new(defaults(), Vec::new(), BrokenPipe);
        let outcome = renderer.render_item(&detailed_endpoint(), "{{.DoesNotExist}}");
        let (out, _) = renderer.into_writers();

        assert_eq!(outcome, RenderOutcome::Failed);
        assert!(out.is_empty());
    }

    struct ValueList(Vec<serde_json::Value>);

    impl ArtifactList for ValueList {
        type Item = serde_json::Value;

        fn count(&self) -> usize {
            self.0.len()
        }

        fn items(&self) -> &[serde_json::Value] {
            &self.0
        }
    }

    #[test]
    fn test_default_detail_view() {
        let (outcome, out, err) = render_item(&detailed_endpoint(), "");

        assert_eq!(outcome, RenderOutcome::Rendered(1));
        assert!(err.is_empty());
        assert_eq!(
            out,
            "Name - ep1\n\
             Type - http\n\
             Stats - enabled\n\
             Tracing - disabled\n\
             Status - Active\n\
             Parameters :\n\
             NAME\tVALUE\n\
             sequential\ttrue\n"
        );
    }

    #[test]
    fn test_item_table_and_empty_match_detail() {
        let item = detailed_endpoint();
        let (_, detail, _) = render_item(&item, "detail");

        for format in ["", "table", "table {{.Name}}"] {
            let (_, out, _) = render_item(&item, format);
            assert_eq!(out, detail, "format {:?}", format);
        }
    }

    #[test]
    fn test_item_name_round_trip() {
        let (outcome, out, _) = render_item(&detailed_endpoint(), "{{.Name}}");
        assert_eq!(outcome, RenderOutcome::Rendered(1));
        assert_eq!(out, "ep1");
    }

    #[test]
    fn test_item_missing_field_is_reported() {
        let (outcome, out, err) = render_item(&detailed_endpoint(), "{{.DoesNotExist}}");

        assert_eq!(outcome, RenderOutcome::Failed);
        assert!(out.is_empty());
        assert!(err.starts_with("Error executing template: "));
        assert!(err.ends_with('\n'));
    }

    #[test]
    fn test_item_syntax_error_is_reported() {
        let (outcome, out, err) = render_item(&detailed_endpoint(), "{{range .Parameters}}");

        assert_eq!(outcome, RenderOutcome::Failed);
        assert!(out.is_empty());
        assert_eq!(
            err,
            "Error executing template: template: 21: unexpected EOF: unclosed range\n"
        );
    }
}
