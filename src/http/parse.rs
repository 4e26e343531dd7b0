use crate::http::error::ParseError;
use crate::http::method::Method;
use crate::http::request::Request;
use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

pub const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

static CONTENT_LENGTH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// Size caps applied while a request is still arriving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Request line plus headers, terminator excluded.
    pub max_head_bytes: usize,
    pub max_body_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_head_bytes: 32 * 1024,
            max_body_bytes: 1_048_576,
        }
    }
}

/// How much of a request the buffer holds so far.
#[derive(Debug, PartialEq, Eq)]
pub enum Framing {
    Partial,
    /// Head and declared body are present; the request spans this many bytes.
    Complete(usize),
}

struct Head {
    method: Method,
    path: String,
    version: Option<String>,
    headers: HashMap<String, String>,
}

fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEAD_TERMINATOR.len())
        .position(|w| w == HEAD_TERMINATOR)
}

pub(crate) fn normalize_path(target: &str) -> String {
    let (path, query) = match target.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (target, None),
    };

    let trimmed = path.trim_end_matches('/');
    let mut normalized = if trimmed.is_empty() {
        String::from("/")
    } else {
        String::from(trimmed)
    };

    if let Some(q) = query {
        normalized.push('?');
        normalized.push_str(q);
    }
    normalized
}

fn parse_head(head: &[u8]) -> Result<Head, ParseError> {
    let text = String::from_utf8_lossy(head);
    let mut lines = text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l));

    let request_line = lines.next().unwrap_or_default();
    let tokens: Vec<&str> = request_line.split_ascii_whitespace().collect();

    let (method, target, version) = match tokens[..] {
        [method, target] => (method, target, None),
        [method, target, version, ..] => (method, target, Some(version.to_string())),
        _ => return Err(ParseError::MalformedRequestLine(request_line.to_string())),
    };

    if !target.starts_with('/') {
        return Err(ParseError::MalformedRequestLine(request_line.to_string()));
    }

    let mut headers = HashMap::new();
    for line in lines {
        if line.is_empty() {
            break;
        }
        // Lines without a colon carry nothing we can use.
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        let value = value.strip_prefix(' ').unwrap_or(value);
        headers.insert(name.to_lowercase(), value.to_string());
    }

    Ok(Head {
        method: Method::parse(method),
        path: normalize_path(target),
        version,
        headers,
    })
}

fn content_length(headers: &HashMap<String, String>) -> Result<usize, ParseError> {
    match headers.get("content-length") {
        None => Ok(0),
        Some(raw) => {
            if !CONTENT_LENGTH_RE.is_match(raw) {
                return Err(ParseError::InvalidContentLength(raw.clone()));
            }
            raw.parse::<usize>()
                .map_err(|_| ParseError::InvalidContentLength(raw.clone()))
        }
    }
}

/// Decides whether `buf` already holds a whole request.
///
/// Errors surface as soon as the head is complete, so a bad or oversized
/// `Content-Length` does not leave the connection waiting for a body that
/// will never be accepted. A head that outgrows `limits` is rejected before
/// its terminator arrives.
pub fn frame(buf: &[u8], limits: &Limits) -> Result<Framing, ParseError> {
    let Some(head_end) = find_head_end(buf) else {
        // The terminator may straddle the cap by up to three bytes.
        if buf.len() > limits.max_head_bytes.saturating_add(HEAD_TERMINATOR.len()) {
            return Err(ParseError::HeadTooLarge {
                limit: limits.max_head_bytes,
            });
        }
        return Ok(Framing::Partial);
    };
    if head_end > limits.max_head_bytes {
        return Err(ParseError::HeadTooLarge {
            limit: limits.max_head_bytes,
        });
    }

    let head = parse_head(&buf[..head_end])?;
    let declared = content_length(&head.headers)?;
    if declared > limits.max_body_bytes {
        return Err(ParseError::BodyTooLarge {
            declared,
            limit: limits.max_body_bytes,
        });
    }

    let body_start = head_end + HEAD_TERMINATOR.len();
    if buf.len() - body_start >= declared {
        Ok(Framing::Complete(body_start + declared))
    } else {
        Ok(Framing::Partial)
    }
}

/// Parses one request out of `buf`.
///
/// Bytes past the declared body are ignored.
pub fn parse_request(buf: &[u8]) -> Result<Request, ParseError> {
    let head_end = find_head_end(buf).ok_or(ParseError::IncompleteHead)?;
    let head = parse_head(&buf[..head_end])?;

    let expected = content_length(&head.headers)?;
    let body_start = head_end + HEAD_TERMINATOR.len();
    let received = buf.len() - body_start;

    if received < expected {
        return Err(ParseError::IncompleteBody { expected, received });
    }

    Ok(Request {
        method: head.method,
        path: head.path,
        version: head.version,
        headers: head.headers,
        body: Bytes::copy_from_slice(&buf[body_start..body_start + expected]),
    })
}
