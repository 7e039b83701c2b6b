//! The secondary-resource response table.
//!
//! Fixtures that fetch beyond their own document (XHR-style requests,
//! frame sources) resolve against this table. It is a test double, not a
//! server: lookups of unregistered URLs yield a 404 response rather than
//! an error, mirroring what the network would do.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A canned response for one secondary-resource URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// HTTP-like status code.
    pub status: u16,
    /// Content type reported to the fixture.
    pub content_type: String,
    /// Response body.
    pub body: String,
}

impl Response {
    /// A 200 response with the given body and content type.
    pub fn ok(body: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: content_type.into(),
            body: body.into(),
        }
    }

    /// A 200 `text/html` response.
    pub fn html(body: impl Into<String>) -> Self {
        Self::ok(body, "text/html")
    }

    /// A 200 `text/plain` response.
    pub fn text(body: impl Into<String>) -> Self {
        Self::ok(body, "text/plain")
    }

    /// The 404 response unregistered URLs resolve to.
    #[must_use]
    pub fn not_found() -> Self {
        Self {
            status: 404,
            content_type: "text/plain".into(),
            body: "not found".into(),
        }
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Insertion-ordered map from URL to canned [`Response`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseTable {
    responses: IndexMap<String, Response>,
}

impl ResponseTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a response, replacing any previous entry for the URL.
    pub fn insert(&mut self, url: impl Into<String>, response: Response) {
        self.responses.insert(url.into(), response);
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, url: impl Into<String>, response: Response) -> Self {
        self.insert(url, response);
        self
    }

    /// Resolves a URL. Unregistered URLs yield [`Response::not_found`].
    #[must_use]
    pub fn lookup(&self, url: &str) -> Response {
        self.responses
            .get(url)
            .cloned()
            .unwrap_or_else(Response::not_found)
    }

    /// Returns true when a response is registered for `url`.
    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.responses.contains_key(url)
    }

    /// Number of registered responses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    /// Returns true when no responses are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Iterates responses in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Response)> {
        self.responses
            .iter()
            .map(|(url, response)| (url.as_str(), response))
    }
}
