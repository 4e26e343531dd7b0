use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const UNKNOWN_REASON: &str = "Unknown Status";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub code_num: u16,
    pub message: &'static str,
}

impl Status {
    pub const OK: Status = Status {
        code_num: 200,
        message: "OK",
    };
    pub const CREATED: Status = Status {
        code_num: 201,
        message: "Created",
    };
    pub const NO_CONTENT: Status = Status {
        code_num: 204,
        message: "No Content",
    };
    pub const MOVED_PERMANENTLY: Status = Status {
        code_num: 301,
        message: "Moved Permanently",
    };
    pub const FOUND: Status = Status {
        code_num: 302,
        message: "Found",
    };
    pub const NOT_MODIFIED: Status = Status {
        code_num: 304,
        message: "Not Modified",
    };
    pub const BAD_REQUEST: Status = Status {
        code_num: 400,
        message: "Bad Request",
    };
    pub const UNAUTHORIZED: Status = Status {
        code_num: 401,
        message: "Unauthorized",
    };
    pub const FORBIDDEN: Status = Status {
        code_num: 403,
        message: "Forbidden",
    };
    pub const NOT_FOUND: Status = Status {
        code_num: 404,
        message: "Not Found",
    };
    pub const METHOD_NOT_ALLOWED: Status = Status {
        code_num: 405,
        message: "Method Not Allowed",
    };
    pub const CONFLICT: Status = Status {
        code_num: 409,
        message: "Conflict",
    };
    pub const PAYLOAD_TOO_LARGE: Status = Status {
        code_num: 413,
        message: "Payload Too Large",
    };
    pub const UNSUPPORTED_MEDIA_TYPE: Status = Status {
        code_num: 415,
        message: "Unsupported Media Type",
    };
    pub const UNPROCESSABLE_ENTITY: Status = Status {
        code_num: 422,
        message: "Unprocessable Entity",
    };
    pub const TOO_MANY_REQUESTS: Status = Status {
        code_num: 429,
        message: "Too Many Requests",
    };
    pub const INTERNAL_SERVER_ERROR: Status = Status {
        code_num: 500,
        message: "Internal Server Error",
    };
    pub const NOT_IMPLEMENTED: Status = Status {
        code_num: 501,
        message: "Not Implemented",
    };
    pub const BAD_GATEWAY: Status = Status {
        code_num: 502,
        message: "Bad Gateway",
    };
    pub const SERVICE_UNAVAILABLE: Status = Status {
        code_num: 503,
        message: "Service Unavailable",
    };
    pub const GATEWAY_TIMEOUT: Status = Status {
        code_num: 504,
        message: "Gateway Timeout",
    };

    const ALL: [Status; 21] = [
        Status::OK,
        Status::CREATED,
        Status::NO_CONTENT,
        Status::MOVED_PERMANENTLY,
        Status::FOUND,
        Status::NOT_MODIFIED,
        Status::BAD_REQUEST,
        Status::UNAUTHORIZED,
        Status::FORBIDDEN,
        Status::NOT_FOUND,
        Status::METHOD_NOT_ALLOWED,
        Status::CONFLICT,
        Status::PAYLOAD_TOO_LARGE,
        Status::UNSUPPORTED_MEDIA_TYPE,
        Status::UNPROCESSABLE_ENTITY,
        Status::TOO_MANY_REQUESTS,
        Status::INTERNAL_SERVER_ERROR,
        Status::NOT_IMPLEMENTED,
        Status::BAD_GATEWAY,
        Status::SERVICE_UNAVAILABLE,
        Status::GATEWAY_TIMEOUT,
    ];
}

static REASON_PHRASES: Lazy<HashMap<u16, &'static str>> = Lazy::new(|| {
    Status::ALL
        .iter()
        .map(|s| (s.code_num, s.message))
        .collect()
});

/// Reason phrase for a status code. This is the only place status lines get
/// their text from; codes outside the table render as [`UNKNOWN_REASON`].
pub fn reason_phrase(code: u16) -> &'static str {
    REASON_PHRASES.get(&code).copied().unwrap_or(UNKNOWN_REASON)
}
