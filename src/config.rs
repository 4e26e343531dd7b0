use crate::http::parse::Limits;
use clap::Args;
use std::time::Duration;

/// Settings for [`Server`](crate::http::server::Server).
///
/// Every field doubles as a command-line flag with an environment fallback,
/// so the binary can flatten this struct straight into its CLI.
#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "MINIHTTPD_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind; 0 picks a free one
    #[arg(short, long, env = "MINIHTTPD_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Worker threads serving connections
    #[arg(short, long, env = "MINIHTTPD_WORKERS", default_value_t = 10)]
    pub workers: usize,

    /// Seconds a connection may sit idle while sending its request; 0 disables
    #[arg(long = "read-timeout", env = "MINIHTTPD_READ_TIMEOUT", default_value_t = 5)]
    pub read_timeout_secs: u64,

    /// Largest accepted request line plus headers, in bytes
    #[arg(long, env = "MINIHTTPD_MAX_HEAD_BYTES", default_value_t = 32 * 1024)]
    pub max_head_bytes: usize,

    /// Largest accepted request body, in bytes
    #[arg(long, env = "MINIHTTPD_MAX_BODY_BYTES", default_value_t = 1_048_576)]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: String::from("127.0.0.1"),
            port: 8080,
            workers: 10,
            read_timeout_secs: 5,
            max_head_bytes: 32 * 1024,
            max_body_bytes: 1_048_576,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn limits(&self) -> Limits {
        Limits {
            max_head_bytes: self.max_head_bytes,
            max_body_bytes: self.max_body_bytes,
        }
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        match self.read_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
