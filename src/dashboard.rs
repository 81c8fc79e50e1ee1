//! Read-only HTTP view over the aggregated event log.
//!
//! Serves the summary the aggregator computes; performs no reconciliation
//! itself and shares no in-memory state with the monitor loop. The event
//! log on disk is the only channel between them. A log that cannot be
//! opened renders as a visible error state, never as zeroed statistics.

use crate::aggregate;
use crate::error::MonitorError;
use crate::types::{Summary, TIMESTAMP_FORMAT};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

/// HTTP server exposing the summary at `/` (HTML) and `/summary.json`.
pub struct DashboardServer {
    listener: TcpListener,
    log_path: PathBuf,
}

impl DashboardServer {
    /// Bind the dashboard listener.
    pub async fn bind(addr: &str, log_path: PathBuf) -> Result<Self, MonitorError> {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %addr, "dashboard listening");
        Ok(DashboardServer { listener, log_path })
    }

    /// Actual bound address; useful when binding to port 0.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until the surrounding task is cancelled.
    pub async fn serve(self) -> Result<(), MonitorError> {
        loop {
            let (stream, peer) = self.listener.accept().await?;
            let log_path = self.log_path.clone();
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, &log_path).await {
                    warn!(peer = %peer, "dashboard connection failed: {e}");
                }
            });
        }
    }
}

async fn handle_connection(mut stream: TcpStream, log_path: &Path) -> std::io::Result<()> {
    let mut request = [0u8; 1024];
    let read = stream.read(&mut request).await?;
    let head = String::from_utf8_lossy(&request[..read]);
    let target = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/");

    let summary = aggregate::summarize_log(log_path);
    let (status, content_type, body) = match target {
        "/" => ("200 OK", "text/html; charset=utf-8", render_summary_html(&summary)),
        "/summary.json" => ("200 OK", "application/json", render_summary_json(&summary)),
        _ => (
            "404 Not Found",
            "text/plain; charset=utf-8",
            "not found\n".to_string(),
        ),
    };

    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

/// JSON body for `/summary.json`: the summary itself, or an error object
/// when the log is unavailable.
fn render_summary_json(summary: &Result<Summary, MonitorError>) -> String {
    match summary {
        Ok(summary) => {
            serde_json::to_string(summary).unwrap_or_else(|_| "{}".to_string())
        }
        Err(e) => serde_json::json!({ "error": e.to_string() }).to_string(),
    }
}

/// Self-refreshing HTML page over the summary.
fn render_summary_html(summary: &Result<Summary, MonitorError>) -> String {
    let body = match summary {
        Ok(summary) => {
            let last_anomaly = summary
                .last_anomaly_time
                .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_else(|| "none recorded".to_string());
            let failed_class = if summary.integrity_failed > 0 { "warn" } else { "ok" };
            let unknown_class = if summary.unknown_files > 0 { "alert" } else { "ok" };
            format!(
                r#"<div class="metric ok"><span>Files verified OK</span><strong>{}</strong></div>
<div class="metric {failed_class}"><span>Modified / deleted files</span><strong>{}</strong></div>
<div class="metric {unknown_class}"><span>Unrecognized new files</span><strong>{}</strong></div>
<div class="metric time"><span>Last anomaly detected</span><strong>{last_anomaly}</strong></div>"#,
                summary.verified_ok, summary.integrity_failed, summary.unknown_files
            )
        }
        Err(e) => format!(r#"<div class="metric alert"><span>Error</span><strong>{e}</strong></div>"#),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta http-equiv="refresh" content="10">
<title>Vigil - File Integrity Dashboard</title>
<style>
body {{ font-family: -apple-system, "Segoe UI", Roboto, sans-serif; background: #f0f2f5; color: #1c1e21; display: flex; justify-content: center; padding-top: 8vh; }}
.container {{ width: 600px; padding: 30px; background: #fff; border-radius: 12px; box-shadow: 0 4px 12px rgba(0,0,0,0.1); }}
h1 {{ text-align: center; border-bottom: 1px solid #ddd; padding-bottom: 15px; }}
.metric {{ display: flex; justify-content: space-between; font-size: 1.2em; padding: 15px; margin-bottom: 10px; border-radius: 8px; }}
.metric.ok {{ background: #e7f3ff; color: #1877f2; }}
.metric.warn {{ background: #fffbe2; color: #b58a00; }}
.metric.alert {{ background: #ffebe2; color: #d93025; }}
.metric.time {{ background: #f0f0f0; color: #555; }}
</style>
</head>
<body>
<div class="container">
<h1>File Integrity Dashboard</h1>
{body}
</div>
</body>
</html>
"#
    )
}
