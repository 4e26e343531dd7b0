use clap::Parser;
use minihttpd::config::ServerConfig;
use minihttpd::http::request::Request;
use minihttpd::http::response::Response;
use minihttpd::http::server::Server;
use serde_json::{Value, json};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Serve one HTTP request per connection")]
struct Cli {
    #[command(flatten)]
    config: ServerConfig,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "minihttpd=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut server = Server::bind(&cli.config)?;

    server
        .get("/", |_r, resp| {
            reply_json(resp, &json!({"message": "Welcome to minihttpd"}))
        })
        .get("/hello", |_r, resp| {
            reply_json(resp, &json!({"message": "Hello, world!"}))
        })
        .post("/echo", echo);

    server.listen()
}

fn echo(req: &Request, resp: &mut Response) {
    match serde_json::from_slice::<Value>(&req.body) {
        Ok(v) => reply_json(resp, &v),
        Err(e) => resp.set_error(400, &format!("Invalid JSON body: {}", e)),
    }
}

fn reply_json(resp: &mut Response, value: &Value) {
    if let Err(e) = resp.set_json(value) {
        error!("Can't encode response: {}", e);
        resp.set_error(500, "Internal Server Error");
    }
}
