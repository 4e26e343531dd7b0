//! A small HTTP/1.1 server that answers exactly one request per connection.
//!
//! Requests are parsed from raw bytes, routed on an exact (method, path)
//! match and handed to a handler that fills in a [`Response`]. Failures at
//! any stage are turned into JSON error responses carrying `detail` and
//! `status`.
//!
//! ```no_run
//! use minihttpd::config::ServerConfig;
//! use minihttpd::http::server::Server;
//!
//! let mut server = Server::bind(&ServerConfig::default())?;
//! server.get("/hello", |_req, resp| resp.set_text("hi"));
//! server.listen()?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! [`Response`]: http::response::Response

pub mod concurrency;
pub mod config;
pub mod http;
