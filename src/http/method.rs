use std::fmt;
use std::str::FromStr;
use strum::EnumString;

#[derive(EnumString, Debug, PartialEq, Eq, Hash, Clone, PartialOrd, Ord)]
pub enum Method {
    #[strum(serialize = "GET")]
    GET,
    #[strum(serialize = "HEAD")]
    HEAD,
    #[strum(serialize = "POST")]
    POST,
    #[strum(serialize = "PUT")]
    PUT,
    #[strum(serialize = "DELETE")]
    DELETE,
    #[strum(serialize = "PATCH")]
    PATCH,
    #[strum(serialize = "OPTIONS")]
    OPTIONS,
    #[strum(serialize = "CONNECT")]
    CONNECT,
    #[strum(serialize = "TRACE")]
    TRACE,
    /// Any other token, kept upper-cased.
    #[strum(default)]
    Extension(String),
}

impl Method {
    /// Upper-cases `token` and maps it onto a known verb. Unknown tokens land
    /// in [`Method::Extension`] through `#[strum(default)]`, so `from_str`
    /// never fails here.
    pub fn parse(token: &str) -> Method {
        let upper = token.to_ascii_uppercase();
        match Method::from_str(&upper) {
            Ok(method) => method,
            Err(_) => Method::Extension(upper),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::PATCH => "PATCH",
            Method::OPTIONS => "OPTIONS",
            Method::CONNECT => "CONNECT",
            Method::TRACE => "TRACE",
            Method::Extension(s) => s,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
