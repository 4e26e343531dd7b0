use crate::http::status::{Status, reason_phrase};
use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;
use serde_json::json;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_TEXT: &str = "text/plain; charset=utf-8";

/// An outbound response, filled in by a handler and serialized once the
/// handler returns.
///
/// Headers keep insertion order so the serialized bytes are reproducible.
/// `Content-Length` is computed from the body at serialization time unless a
/// handler set it explicitly; an explicit value is written verbatim, even if
/// it disagrees with the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: u16,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl Default for Response {
    fn default() -> Self {
        Response {
            status: Status::OK.code_num,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }
}

impl Response {
    pub fn new() -> Response {
        Response::default()
    }

    pub fn with_status(code: u16) -> Response {
        Response {
            status: code,
            ..Response::default()
        }
    }

    /// A JSON error response: `{"detail": .., "status": ..}`.
    pub fn error(code: u16, detail: &str) -> Response {
        let mut resp = Response::new();
        resp.set_error(code, detail);
        resp
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn set_status(&mut self, code: u16) {
        self.status = code;
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Sets a header, replacing any earlier header of the same name
    /// (compared case-insensitively) in its original position.
    pub fn set_header(&mut self, name: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove_header(&mut self, name: &str) -> Option<String> {
        let pos = self
            .headers
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))?;
        Some(self.headers.remove(pos).1)
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = body.into();
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.set_header("Content-Type", CONTENT_TYPE_TEXT);
        self.body = Bytes::from(text.into());
    }

    /// Serializes `value` as the body and marks it as JSON. The status code
    /// is left alone.
    pub fn set_json<T: Serialize + ?Sized>(&mut self, value: &T) -> serde_json::Result<()> {
        let encoded = serde_json::to_vec(value)?;
        self.set_header("Content-Type", CONTENT_TYPE_JSON);
        self.body = Bytes::from(encoded);
        Ok(())
    }

    pub fn set_error(&mut self, code: u16, detail: &str) {
        let payload = json!({ "detail": detail, "status": code });
        self.status = code;
        self.set_header("Content-Type", CONTENT_TYPE_JSON);
        self.body = Bytes::from(payload.to_string());
    }

    pub fn serialize(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(self.body.len() + self.headers.len() * 32 + 64);

        out.put_slice(
            format!(
                "HTTP/1.1 {} {}\r\n",
                self.status,
                reason_phrase(self.status)
            )
            .as_bytes(),
        );

        for (key, value) in &self.headers {
            out.put_slice(format!("{}: {}\r\n", key, value).as_bytes());
        }

        if self.get_header("content-length").is_none() {
            out.put_slice(format!("Content-Length: {}\r\n", self.body.len()).as_bytes());
        }

        out.put_slice(b"\r\n");
        out.put_slice(&self.body);
        out.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn text(resp: &Response) -> String {
        String::from_utf8(resp.serialize().to_vec()).unwrap()
    }

    #[test]
    fn empty_response_is_200_with_zero_length() {
        assert_eq!(
            text(&Response::new()),
            "HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n"
        );
    }

    #[test]
    fn headers_serialize_in_insertion_order() {
        let mut resp = Response::new();
        resp.set_header("X-B", "2");
        resp.set_header("X-A", "1");
        resp.set_header("x-b", "3");
        resp.set_body("hi");

        assert_eq!(
            text(&resp),
            "HTTP/1.1 200 OK\r\nX-B: 3\r\nX-A: 1\r\nContent-Length: 2\r\n\r\nhi"
        );
    }

    #[test]
    fn content_length_tracks_body_bytes() {
        let mut resp = Response::new();
        resp.set_body("héllo");
        assert!(text(&resp).contains("Content-Length: 6\r\n"));
    }

    #[test]
    fn explicit_content_length_is_never_overwritten() {
        let mut resp = Response::new();
        resp.set_header("Content-Length", "99");
        resp.set_body("abc");

        let out = text(&resp);
        assert!(out.contains("Content-Length: 99\r\n"));
        assert_eq!(out.matches("Content-Length").count(), 1);
        assert!(out.ends_with("\r\n\r\nabc"));
    }

    #[test]
    fn unknown_status_gets_placeholder_phrase() {
        let resp = Response::with_status(299);
        assert!(text(&resp).starts_with("HTTP/1.1 299 Unknown Status\r\n"));
    }

    #[test]
    fn set_json_sets_body_and_content_type() {
        let mut resp = Response::new();
        resp.set_status(201);
        resp.set_json(&json!({"message": "Hello, world!"})).unwrap();

        assert_eq!(resp.status(), 201);
        assert_eq!(resp.get_header("content-type"), Some(CONTENT_TYPE_JSON));
        assert_eq!(&resp.body()[..], br#"{"message":"Hello, world!"}"#);
    }

    #[test]
    fn error_body_carries_detail_and_status() {
        let resp = Response::error(404, "Not Found");
        assert_eq!(resp.status(), 404);

        let body: Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["detail"], "Not Found");
        assert_eq!(body["status"], 404);
    }

    #[test]
    fn remove_header_is_case_insensitive() {
        let mut resp = Response::new();
        resp.set_header("X-Gone", "1");
        assert_eq!(resp.remove_header("x-gone").as_deref(), Some("1"));
        assert!(resp.headers().is_empty());
    }
}
