pub mod connection;
pub mod error;
pub mod handler;
pub mod method;
pub mod parse;
pub mod request;
pub mod response;
pub mod router;
pub mod server;
pub mod status;

use crate::http::error::ParseError;
use crate::http::method::Method;
use crate::http::response::Response;
use crate::http::status::Status;

pub(crate) const BUFFER_SIZE: usize = 1024;

pub fn not_found() -> Response {
    Response::error(Status::NOT_FOUND.code_num, Status::NOT_FOUND.message)
}

pub fn rejected(e: &ParseError) -> Response {
    Response::error(e.status().code_num, &e.to_string())
}

pub fn method_not_allowed(method: &Method, allowed: &[String]) -> Response {
    let mut resp = Response::error(
        Status::METHOD_NOT_ALLOWED.code_num,
        &format!("{}: '{}'", Status::METHOD_NOT_ALLOWED.message, method),
    );
    if !allowed.is_empty() {
        resp.set_header("Allow", &allowed.join(", "));
    }
    resp
}

pub fn internal_error() -> Response {
    Response::error(
        Status::INTERNAL_SERVER_ERROR.code_num,
        Status::INTERNAL_SERVER_ERROR.message,
    )
}
