use crate::concurrency::ThreadPool;
use crate::config::ServerConfig;
use crate::http::connection::Connection;
use crate::http::method::Method;
use crate::http::parse::Limits;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::router::Router;
use anyhow::Context;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Owns the listener, the routing table and the workers.
///
/// Routes are registered on a `Server` before [`listen`](Server::listen) is
/// called; `listen` consumes the server, so the table cannot change while
/// requests are being served.
pub struct Server {
    listener: TcpListener,
    router: Router,
    pool: ThreadPool,
    read_timeout: Option<Duration>,
    limits: Limits,
}

impl Server {
    pub fn bind(config: &ServerConfig) -> anyhow::Result<Server> {
        let addr = config.addr();
        let listener =
            TcpListener::bind(&addr).with_context(|| format!("Can't bind address {}", addr))?;
        let pool = ThreadPool::new(config.workers).context("Can't start worker pool")?;

        Ok(Server {
            listener,
            router: Router::new(),
            pool,
            read_timeout: config.read_timeout(),
            limits: config.limits(),
        })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("Can't read listener address")
    }

    pub fn route<F>(&mut self, method: Method, path: &str, f: F) -> &mut Self
    where
        F: Fn(&Request, &mut Response) + Send + Sync + 'static,
    {
        self.router.register(method, path, Box::new(f));
        self
    }

    pub fn get<F>(&mut self, path: &str, f: F) -> &mut Self
    where
        F: Fn(&Request, &mut Response) + Send + Sync + 'static,
    {
        self.route(Method::GET, path, f)
    }

    pub fn post<F>(&mut self, path: &str, f: F) -> &mut Self
    where
        F: Fn(&Request, &mut Response) + Send + Sync + 'static,
    {
        self.route(Method::POST, path, f)
    }

    /// Accepts connections until the listener fails, handing each one to a
    /// worker. Blocks the calling thread.
    pub fn listen(self) -> anyhow::Result<()> {
        let Server {
            listener,
            router,
            pool,
            read_timeout,
            limits,
        } = self;
        let router = Arc::new(router);

        info!(
            "server running on http://{} with {} workers and {} routes",
            listener.local_addr().context("Can't read listener address")?,
            pool.size(),
            router.len()
        );

        for stream in listener.incoming() {
            let stream = match stream {
                Ok(s) => s,
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                    continue;
                }
            };

            let router = Arc::clone(&router);
            pool.execute(move || serve(stream, &router, read_timeout, limits))?;
        }
        Ok(())
    }
}

fn serve(stream: TcpStream, router: &Router, read_timeout: Option<Duration>, limits: Limits) {
    debug!(peer = ?stream.peer_addr().ok(), "accepted connection");

    let timeouts = stream
        .set_read_timeout(read_timeout)
        .and_then(|_| stream.set_write_timeout(read_timeout));
    if let Err(e) = timeouts {
        error!("Can't set socket timeouts: {}", e);
    }

    Connection::new(stream, router).with_limits(limits).run();
}
