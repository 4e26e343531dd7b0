//! End-to-end checks against a server listening on a real socket.

use minihttpd::config::ServerConfig;
use minihttpd::http::method::Method;
use minihttpd::http::server::Server;
use serde_json::{Value, json};
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::thread;
use std::time::Duration;

fn start() -> SocketAddr {
    let config = ServerConfig {
        port: 0,
        workers: 2,
        read_timeout_secs: 1,
        ..ServerConfig::default()
    };
    let mut server = Server::bind(&config).unwrap();

    server
        .get("/hello", |_req, resp| {
            resp.set_json(&json!({"message": "Hello, world!"})).unwrap()
        })
        .get("/echo", |req, resp| resp.set_body(req.body.clone()))
        .post("/upload", |req, resp| {
            resp.set_status(201);
            resp.set_header("X-Received", &req.body.len().to_string());
        })
        .get("/panic", |_req, _resp| panic!("boom"))
        .get("/docs/", |_req, resp| resp.set_text("docs"))
        .route(Method::PUT, "/fixed", |_req, resp| {
            resp.set_header("Content-Length", "3");
            resp.set_body("abc");
        });

    let addr = server.local_addr().unwrap();
    thread::spawn(move || server.listen());
    addr
}

struct Reply {
    status: u16,
    head: String,
    body: Vec<u8>,
}

impl Reply {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

fn send(addr: SocketAddr, raw: &[u8]) -> Reply {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream
        .set_read_timeout(Some(Duration::from_secs(10)))
        .unwrap();
    stream.write_all(raw).unwrap();

    let mut out = Vec::new();
    stream.read_to_end(&mut out).unwrap();

    let split = out
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has a head");
    let head = String::from_utf8(out[..split].to_vec()).unwrap();
    let status = head
        .split(' ')
        .nth(1)
        .and_then(|s| s.parse().ok())
        .expect("status line has a code");

    Reply {
        status,
        head,
        body: out[split + 4..].to_vec(),
    }
}

#[test]
fn hello_returns_json() {
    let addr = start();
    let reply = send(addr, b"GET /hello HTTP/1.1\r\nHost: localhost\r\n\r\n");

    assert_eq!(reply.status, 200);
    assert!(reply.head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(reply.head.contains("Content-Type: application/json"));
    assert_eq!(reply.body, br#"{"message":"Hello, world!"}"#);
}

#[test]
fn wrong_method_is_405() {
    let addr = start();
    let reply = send(addr, b"POST /echo HTTP/1.1\r\nContent-Length: 0\r\n\r\n");

    assert_eq!(reply.status, 405);
    assert!(reply.head.contains("Allow: GET"));
    let body = reply.json();
    assert_eq!(body["status"], 405);
    assert!(body["detail"].as_str().unwrap().contains("POST"));
}

#[test]
fn unknown_path_is_404() {
    let addr = start();
    let reply = send(addr, b"GET /missing HTTP/1.1\r\n\r\n");

    assert_eq!(reply.status, 404);
    assert_eq!(reply.json()["detail"], "Not Found");
}

#[test]
fn body_shorter_than_content_length_is_400_after_idle() {
    let addr = start();
    let reply = send(
        addr,
        b"POST /upload HTTP/1.1\r\nContent-Length: 10\r\n\r\n12345",
    );

    assert_eq!(reply.status, 400);
    assert!(
        reply.json()["detail"]
            .as_str()
            .unwrap()
            .starts_with("Incomplete body")
    );
}

#[test]
fn body_is_delivered_to_handler() {
    let addr = start();
    let reply = send(
        addr,
        b"POST /upload/ HTTP/1.1\r\nContent-Length: 10\r\n\r\n0123456789",
    );

    assert_eq!(reply.status, 201);
    assert!(reply.head.contains("X-Received: 10"));
    assert!(reply.head.contains("Content-Length: 0"));
}

#[test]
fn explicit_content_length_survives() {
    let addr = start();
    let reply = send(addr, b"PUT /fixed HTTP/1.1\r\n\r\n");

    assert_eq!(reply.status, 200);
    assert_eq!(reply.head.matches("Content-Length").count(), 1);
    assert_eq!(reply.body, b"abc");
}

#[test]
fn handler_panic_is_500_and_server_keeps_serving() {
    let addr = start();

    let reply = send(addr, b"GET /panic HTTP/1.1\r\n\r\n");
    assert_eq!(reply.status, 500);
    assert_eq!(reply.json()["detail"], "Internal Server Error");

    let reply = send(addr, b"GET /hello HTTP/1.1\r\n\r\n");
    assert_eq!(reply.status, 200);
}

#[test]
fn garbage_is_400() {
    let addr = start();
    let reply = send(addr, b"nonsense\r\n\r\n");

    assert_eq!(reply.status, 400);
    assert_eq!(reply.json()["status"], 400);
}

#[test]
fn route_registered_with_trailing_slash_is_reachable() {
    for target in ["/docs", "/docs/"] {
        let raw = format!("GET {} HTTP/1.1\r\nHost: x\r\n\r\n", target);
        let reply = send(start(), raw.as_bytes());
        assert_eq!(reply.status, 200, "{}", target);
        assert_eq!(reply.body, b"docs");
    }
}

#[test]
fn declared_body_over_default_cap_is_413() {
    let reply = send(
        start(),
        b"POST /upload HTTP/1.1\r\nContent-Length: 2000000\r\n\r\n",
    );

    assert_eq!(reply.status, 413);
    assert_eq!(
        reply.json(),
        json!({
            "detail": "Request body of 2000000 bytes exceeds 1048576 bytes",
            "status": 413,
        })
    );
}
