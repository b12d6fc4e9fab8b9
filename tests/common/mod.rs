//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use edge_redirect::config::RedirectConfig;
use edge_redirect::{HttpServer, Shutdown};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Budget used when asserting compute utilization. The platform allots
/// about 1ms; unoptimized test builds get headroom on top of that.
#[allow(dead_code)]
pub const TEST_BUDGET: Duration = Duration::from_millis(10);

/// A running emulator bound to an ephemeral port.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_tx: mpsc::UnboundedSender<RedirectConfig>,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }
}

/// Start the emulator with `config`. The listener is bound before this
/// returns, so requests can be sent immediately.
#[allow(dead_code)]
pub async fn start_server(config: RedirectConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (config_tx, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    TestServer {
        addr,
        shutdown,
        config_tx,
    }
}

/// Client that reports redirects instead of following them.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// A viewer-request event payload as the platform delivers it.
#[allow(dead_code)]
pub fn viewer_request(host: &str, uri: &str, querystring: Option<Value>) -> Vec<u8> {
    let mut request = json!({
        "method": "GET",
        "uri": uri,
        "headers": {
            "host": { "value": host }
        }
    });
    if let Some(querystring) = querystring {
        request["querystring"] = querystring;
    }

    let event = json!({
        "version": "1.0",
        "context": { "eventType": "viewer-request" },
        "viewer": { "ip": "198.51.100.11" },
        "request": request
    });
    serde_json::to_vec(&event).unwrap()
}
