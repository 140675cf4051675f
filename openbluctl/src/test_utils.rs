//! Test utilities for CLI testing
//!
//! Provides a mock OpenBlu API and record fixtures.

use anyhow::Result;
use axum::{extract::Query, http::StatusCode, response::Json, routing::get, Router};
use openblu_core::{OpenVpnConfig, ServerInfo, ServerRecord};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tokio::net::TcpListener;

/// Access key accepted by the mock API
pub const TEST_KEY: &str = "test-access-key-0001";

/// Build a record with the fields the tests care about
pub fn record(id: &str, country: &str, country_short: &str, score: f64, ping: i64) -> ServerRecord {
    ServerRecord {
        id: id.to_string(),
        ip_address: Some(format!("10.0.0.{}", id.len())),
        host_name: Some(format!("vpn-{}", id)),
        country: country.to_string(),
        country_short: country_short.to_string(),
        score,
        ping,
        sessions: 3,
        total_sessions: 1200,
        last_updated: 1_700_000_000,
        created: 1_600_000_000,
    }
}

/// Servers served by the mock API, in listing order
pub fn sample_servers() -> Vec<ServerRecord> {
    vec![
        record("1", "Japan", "JP", 10.0, 40),
        record("2", "Thailand", "TH", 30.0, 80),
        record("3", "Japan", "JP", 20.0, 25),
        record("4", "Italy", "IT", 30.0, 60),
    ]
}

/// Detail view of a sample server
pub fn sample_info(record: ServerRecord) -> ServerInfo {
    let ovpn_configuration = format!(
        "client\ndev tun\nproto udp\nremote {} 1194\n",
        record.ip_address.clone().unwrap_or_default()
    );
    ServerInfo {
        record,
        openvpn: Some(OpenVpnConfig { ovpn_configuration }),
    }
}

/// Mock server implementation
#[derive(Debug, Default)]
pub struct MockServer {
    port: u16,
}

impl MockServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the mock server and return its base URL
    pub async fn start(mut self) -> Result<(Self, String)> {
        let app = Self::create_router();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        self.port = addr.port();

        let server_url = format!("http://127.0.0.1:{}", self.port);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Mock server error: {}", e);
            }
        });

        for _ in 0..20 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                break;
            }
        }

        Ok((self, server_url))
    }

    fn create_router() -> Router {
        Router::new()
            .route("/servers/list", get(list_servers_handler))
            .route("/servers/get", get(get_server_handler))
            // Returns a body that is not JSON
            .route("/broken/servers/list", get(broken_handler))
    }
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "success": false,
            "response_code": 401,
            "error": {"error_code": 0, "message": "Invalid access key", "type": "CLIENT"}
        })),
    )
}

fn authorized(params: &HashMap<String, String>) -> bool {
    params.get("access_key").map(String::as_str) == Some(TEST_KEY)
}

async fn list_servers_handler(
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&params) {
        return unauthorized();
    }

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "response_code": 200,
            "servers": sample_servers()
        })),
    )
}

async fn get_server_handler(
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&params) {
        return unauthorized();
    }

    let id = params.get("server_id").cloned().unwrap_or_default();
    match sample_servers().into_iter().find(|s| s.id == id) {
        Some(record) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "response_code": 200,
                "server": sample_info(record)
            })),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "success": false,
                "response_code": 404,
                "error": {"error_code": 3, "message": "Server not found", "type": "CLIENT"}
            })),
        ),
    }
}

async fn broken_handler() -> &'static str {
    "<html><body>maintenance</body></html>"
}
