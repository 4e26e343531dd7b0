use crate::http::method::Method;
use bytes::Bytes;
use std::collections::HashMap;

/// An inbound request. Built once per connection by [`parse_request`] and
/// never mutated afterwards.
///
/// [`parse_request`]: crate::http::parse::parse_request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    /// Always starts with `/`; no trailing slash except for the root.
    pub path: String,
    pub version: Option<String>,
    /// Keys are lower-cased.
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl Request {
    pub fn get_header(&self, k: &str) -> Option<&str> {
        self.headers.get(&k.to_lowercase()).map(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let req = Request {
            method: Method::GET,
            path: "/".to_string(),
            version: None,
            headers: HashMap::from([("user-agent".to_string(), "curl".to_string())]),
            body: Bytes::new(),
        };

        assert_eq!(req.get_header("User-Agent"), Some("curl"));
        assert_eq!(req.get_header("USER-AGENT"), Some("curl"));
        assert_eq!(req.get_header("accept"), None);
    }
}
