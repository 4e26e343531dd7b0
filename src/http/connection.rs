use crate::concurrency::panic_message;
use crate::http;
use crate::http::error::{HandlerFault, ParseError};
use crate::http::parse::{Framing, Limits, frame, parse_request};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::router::{Router, Verdict};
use crate::http::BUFFER_SIZE;
use anyhow::Context;
use bytes::BytesMut;
use std::io::{self, ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::{debug, error, info, warn};

/// The byte stream a connection reads its request from and writes its
/// response to.
pub trait Transport: Read + Write {
    /// Closes both directions.
    fn shutdown(&mut self) -> io::Result<()>;

    fn peer(&self) -> String {
        String::from("unknown")
    }
}

impl Transport for TcpStream {
    fn shutdown(&mut self) -> io::Result<()> {
        TcpStream::shutdown(self, Shutdown::Both)
    }

    fn peer(&self) -> String {
        self.peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| String::from("unknown"))
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn shutdown(&mut self) -> io::Result<()> {
        (**self).shutdown()
    }

    fn peer(&self) -> String {
        (**self).peer()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AwaitingRequest,
    Parsing,
    Routing,
    HandlerExecuting,
    Serializing,
    Writing,
    Closed,
}

/// What happened on one connection.
#[derive(Debug)]
pub struct Outcome {
    /// Status of the response written, `None` if nothing was written.
    pub status: Option<u16>,
    /// Every stage the connection went through, in order.
    pub stages: Vec<Stage>,
}

enum Received {
    Framed(usize),
    Rejected(ParseError),
    /// The peer stopped sending (end of stream or idle timeout) before the
    /// request was complete.
    Stalled,
    Nothing,
}

/// Drives a single request/response exchange over `T`.
pub struct Connection<'r, T: Transport> {
    transport: T,
    router: &'r Router,
    limits: Limits,
    buf: BytesMut,
    stages: Vec<Stage>,
    peer: String,
}

impl<'r, T: Transport> Connection<'r, T> {
    pub fn new(transport: T, router: &'r Router) -> Connection<'r, T> {
        let peer = transport.peer();
        Connection {
            transport,
            router,
            limits: Limits::default(),
            buf: BytesMut::with_capacity(BUFFER_SIZE),
            stages: vec![Stage::AwaitingRequest],
            peer,
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    fn advance(&mut self, next: Stage) {
        debug!(peer = %self.peer, stage = ?next, "connection stage");
        self.stages.push(next);
    }

    /// Runs the exchange to completion. The transport is shut down before
    /// this returns, whatever happened along the way.
    pub fn run(mut self) -> Outcome {
        let response = match self.read_request() {
            Ok(Received::Framed(len)) => {
                self.advance(Stage::Parsing);
                let parsed = parse_request(&self.buf[..len]);
                self.handle(parsed)
            }
            Ok(Received::Stalled) => {
                self.advance(Stage::Parsing);
                let parsed = parse_request(&self.buf);
                self.handle(parsed)
            }
            Ok(Received::Rejected(e)) => {
                self.advance(Stage::Parsing);
                self.handle(Err(e))
            }
            Ok(Received::Nothing) => {
                debug!(peer = %self.peer, "peer sent nothing");
                None
            }
            Err(e) => {
                error!(peer = %self.peer, "{:#}", e);
                None
            }
        };

        let status = response.map(|resp| {
            self.write_response(&resp);
            resp.status()
        });

        self.close();
        Outcome {
            status,
            stages: self.stages,
        }
    }

    fn read_request(&mut self) -> anyhow::Result<Received> {
        let mut chunk = [0u8; BUFFER_SIZE];
        loop {
            match frame(&self.buf, &self.limits) {
                Ok(Framing::Complete(len)) => return Ok(Received::Framed(len)),
                Ok(Framing::Partial) => {}
                Err(e) => return Ok(Received::Rejected(e)),
            }

            match self.transport.read(&mut chunk) {
                Ok(0) => return Ok(self.stalled()),
                Ok(n) => self.buf.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    debug!(peer = %self.peer, buffered = self.buf.len(), "idle read timeout");
                    return Ok(self.stalled());
                }
                Err(e) => return Err(e).context("Error while reading request"),
            }
        }
    }

    fn stalled(&self) -> Received {
        if self.buf.is_empty() {
            Received::Nothing
        } else {
            Received::Stalled
        }
    }

    fn handle(&mut self, parsed: Result<Request, ParseError>) -> Option<Response> {
        let response = match parsed {
            Ok(req) => {
                debug!(peer = %self.peer, method = %req.method, path = %req.path, "received request");
                let resp = self.dispatch(&req);
                info!(
                    peer = %self.peer,
                    "{} {} -> {}",
                    req.method,
                    req.path,
                    resp.status()
                );
                resp
            }
            Err(e) => {
                warn!(peer = %self.peer, kind = e.kind(), "rejecting request: {}", e);
                http::rejected(&e)
            }
        };
        Some(response)
    }

    fn dispatch(&mut self, req: &Request) -> Response {
        self.advance(Stage::Routing);

        let router = self.router;
        match router.resolve(&req.method, &req.path) {
            Verdict::Matched(f) => {
                self.advance(Stage::HandlerExecuting);
                let mut resp = Response::new();
                match catch_unwind(AssertUnwindSafe(|| f(req, &mut resp))) {
                    Ok(()) => resp,
                    Err(payload) => {
                        let fault = HandlerFault {
                            method: req.method.to_string(),
                            path: req.path.clone(),
                            message: panic_message(payload.as_ref()).to_string(),
                        };
                        error!(peer = %self.peer, "{}", fault);
                        http::internal_error()
                    }
                }
            }
            Verdict::MethodNotAllowed => {
                http::method_not_allowed(&req.method, &router.allowed_methods(&req.path))
            }
            Verdict::NotFound => http::not_found(),
        }
    }

    fn write_response(&mut self, resp: &Response) {
        self.advance(Stage::Serializing);
        let bytes = resp.serialize();

        self.advance(Stage::Writing);
        let written = self
            .transport
            .write_all(&bytes)
            .and_then(|_| self.transport.flush());
        if let Err(e) = written {
            error!(peer = %self.peer, "Error sending response: {}", e);
        }
    }

    fn close(&mut self) {
        self.advance(Stage::Closed);
        if let Err(e) = self.transport.shutdown() {
            // The peer hanging up first is routine.
            debug!(peer = %self.peer, "Error shutting down connection: {}", e);
        }
    }
}
