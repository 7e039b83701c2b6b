//! Fixture assembly: the HTML+script documents handed to the host.
//!
//! Fixture construction is pure string work. No well-formedness validation
//! happens here - a malformed fixture is a test-author error, not a runtime
//! condition the harness detects.

use crate::resources::{Response, ResponseTable};

/// A self-contained test input: a document string, an optional base URL,
/// and the response table for secondary resources its script may fetch.
///
/// Constructed per test case and discarded after execution.
#[derive(Debug, Clone, Default)]
pub struct Fixture {
    html: String,
    base_url: Option<String>,
    resources: ResponseTable,
}

impl Fixture {
    /// Wraps a complete document string.
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            base_url: None,
            resources: ResponseTable::new(),
        }
    }

    /// Wraps a body fragment and an onload script in the standard page
    /// scaffold most fixtures share.
    #[must_use]
    pub fn page(body: &str, onload_script: &str) -> Self {
        Self::new(format!(
            "<!DOCTYPE html>\n\
             <html>\n\
             <head><title>fixture</title></head>\n\
             <body onload=\"run()\">\n\
             {body}\n\
             <script>\n\
             function run() {{\n\
             {onload_script}\n\
             }}\n\
             </script>\n\
             </body>\n\
             </html>\n"
        ))
    }

    /// Sets the document's base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Registers one secondary resource the fixture's script may fetch.
    #[must_use]
    pub fn with_resource(mut self, url: impl Into<String>, response: Response) -> Self {
        self.resources.insert(url, response);
        self
    }

    /// Replaces the whole secondary-resource table.
    #[must_use]
    pub fn with_resources(mut self, resources: ResponseTable) -> Self {
        self.resources = resources;
        self
    }

    /// The document string.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    /// The base URL, if one was declared.
    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// The secondary-resource table.
    #[must_use]
    pub fn resources(&self) -> &ResponseTable {
        &self.resources
    }
}

/// Assembles a fixture document from a markup template and named
/// substitution values (URLs, attribute values).
///
/// Placeholders use the `{{key}}` form; every occurrence is replaced.
/// Unmatched placeholders are left verbatim.
#[derive(Debug, Clone)]
pub struct FixtureBuilder {
    template: String,
    substitutions: Vec<(String, String)>,
}

impl FixtureBuilder {
    /// Starts from a markup template.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            substitutions: Vec::new(),
        }
    }

    /// Adds a substitution for `{{key}}`.
    #[must_use]
    pub fn substitute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.substitutions.push((key.into(), value.into()));
        self
    }

    /// Produces the complete document string.
    #[must_use]
    pub fn build_html(&self) -> String {
        let mut html = self.template.clone();
        for (key, value) in &self.substitutions {
            html = html.replace(&format!("{{{{{key}}}}}"), value);
        }
        html
    }

    /// Produces the complete fixture.
    #[must_use]
    pub fn build(&self) -> Fixture {
        Fixture::new(self.build_html())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_substitutes_every_occurrence() {
        let html = FixtureBuilder::new("<a href=\"{{url}}\">{{label}}</a><a href=\"{{url}}\">")
            .substitute("url", "http://example.org/x")
            .substitute("label", "click")
            .build_html();

        assert_eq!(
            html,
            "<a href=\"http://example.org/x\">click</a><a href=\"http://example.org/x\">"
        );
    }

    #[test]
    fn unmatched_placeholders_stay_verbatim() {
        let html = FixtureBuilder::new("{{present}} {{missing}}")
            .substitute("present", "here")
            .build_html();
        assert_eq!(html, "here {{missing}}");
    }

    #[test]
    fn page_scaffold_embeds_body_and_script() {
        let fixture = Fixture::page("<div id='out'></div>", "log('Yo!');");
        assert!(fixture.html().contains("<div id='out'></div>"));
        assert!(fixture.html().contains("log('Yo!');"));
        assert!(fixture.html().contains("onload=\"run()\""));
    }

    #[test]
    fn fixture_carries_base_url_and_resources() {
        let fixture = Fixture::page("", "")
            .with_base_url("http://example.org/")
            .with_resource("/data.json", Response::ok("{}", "application/json"));

        assert_eq!(fixture.base_url(), Some("http://example.org/"));
        assert!(fixture.resources().lookup("/data.json").is_success());
    }
}
