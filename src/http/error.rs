use crate::http::status::Status;
use thiserror::Error;

/// Everything that can go wrong turning raw bytes into a [`Request`].
///
/// All variants are recovered by the connection into an error response (400,
/// or 413 for oversized requests); none of them reach the router.
///
/// [`Request`]: crate::http::request::Request
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ParseError {
    #[error("Malformed request line: '{0}'")]
    MalformedRequestLine(String),

    #[error("Invalid Content-Length: '{0}'")]
    InvalidContentLength(String),

    #[error("Incomplete body: expected {expected} bytes, received {received}")]
    IncompleteBody { expected: usize, received: usize },

    #[error("Incomplete request head")]
    IncompleteHead,

    #[error("Request head exceeds {limit} bytes")]
    HeadTooLarge { limit: usize },

    #[error("Request body of {declared} bytes exceeds {limit} bytes")]
    BodyTooLarge { declared: usize, limit: usize },
}

impl ParseError {
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::MalformedRequestLine(_) => "MalformedRequestLine",
            ParseError::InvalidContentLength(_) => "InvalidContentLength",
            ParseError::IncompleteBody { .. } => "IncompleteBody",
            ParseError::IncompleteHead => "IncompleteHead",
            ParseError::HeadTooLarge { .. } => "HeadTooLarge",
            ParseError::BodyTooLarge { .. } => "BodyTooLarge",
        }
    }

    /// Status code of the response that rejects the request.
    pub fn status(&self) -> Status {
        match self {
            ParseError::HeadTooLarge { .. } | ParseError::BodyTooLarge { .. } => {
                Status::PAYLOAD_TOO_LARGE
            }
            _ => Status::BAD_REQUEST,
        }
    }
}

/// A handler panicked while building its response.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("handler for {method} {path} panicked: {message}")]
pub struct HandlerFault {
    pub method: String,
    pub path: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_problem() {
        let e = ParseError::IncompleteBody {
            expected: 10,
            received: 5,
        };
        assert_eq!(
            e.to_string(),
            "Incomplete body: expected 10 bytes, received 5"
        );
        assert_eq!(e.kind(), "IncompleteBody");

        let e = ParseError::InvalidContentLength("abc".to_string());
        assert_eq!(e.to_string(), "Invalid Content-Length: 'abc'");
    }

    #[test]
    fn oversized_requests_map_to_413() {
        let e = ParseError::BodyTooLarge {
            declared: 10,
            limit: 5,
        };
        assert_eq!(e.status(), Status::PAYLOAD_TOO_LARGE);
        assert_eq!(e.to_string(), "Request body of 10 bytes exceeds 5 bytes");
        assert_eq!(
            ParseError::HeadTooLarge { limit: 8 }.status(),
            Status::PAYLOAD_TOO_LARGE
        );
        assert_eq!(ParseError::IncompleteHead.status(), Status::BAD_REQUEST);
    }
}
