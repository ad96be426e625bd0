//! HTTP exchange types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. The invoker builds an
//! `HttpRequest`, a [`Transport`](crate::transport::Transport) turns it into
//! an `HttpResponse`, and the invoker parses the result. Callers that bring
//! their own HTTP stack can skip the transport entirely and drive
//! `Invoker::build_request` / `Invoker::parse_response` themselves.
//!
//! Every backend operation is a POST, so the method is implicit.

/// Header carrying the shared secret on every request.
pub const SECRET_KEY_HEADER: &str = "x-secretkey";

/// Header identifying the SDK build that issued the request.
pub const SDK_HEADER: &str = "x-sdk";

/// Value sent in [`SDK_HEADER`].
pub const SDK_VERSION: &str = concat!("RustSdk-", env!("CARGO_PKG_VERSION"));

/// A POST request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpRequest {
    /// Look up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Shorthand for a JSON response carrying only a `content-type` header,
    /// mostly for tests and test doubles.
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let req = HttpRequest {
            url: "http://localhost/Server/GetTime".to_string(),
            headers: vec![("X-SecretKey".to_string(), "s3cret".to_string())],
            body: "{}".to_string(),
        };
        assert_eq!(req.header(SECRET_KEY_HEADER), Some("s3cret"));
        assert_eq!(req.header("content-type"), None);
    }

    #[test]
    fn json_response_sets_only_content_type() {
        let resp = HttpResponse::json(200, "{}");
        assert_eq!(
            resp.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        assert_eq!(resp.body, "{}");
    }

    #[test]
    fn sdk_version_carries_crate_version() {
        assert!(SDK_VERSION.starts_with("RustSdk-"));
        assert!(SDK_VERSION.ends_with(env!("CARGO_PKG_VERSION")));
    }
}
