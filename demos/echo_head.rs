//! A small TCP server that answers every request with a summary of its head.
//!
//! Run with `RUST_LOG=debug cargo run --example echo_head` and try
//! `curl -v http://127.0.0.1:8081/hello?name=world`. Ctrl+C drains open
//! connections before exiting.

use std::time::Duration;

use h1_intake::connection::{Connection, ConnectionConfig, DrainHandle, HeadOutcome};
use h1_intake::parser::{HeadCollector, ParserLimits, RequestHead};
use log::{error, info, warn};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinSet;

const LIMITS: &str = r#"{
    "max_request_line_len": 8192,
    "max_header_line_len": 8192,
    "max_header_bytes": 32768,
    "max_header_count": 100
}"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize the logger
    env_logger::init();

    let limits = ParserLimits::from_json(LIMITS)?;
    let config = ConnectionConfig::default();
    let drain = DrainHandle::new();

    let listener = TcpListener::bind("127.0.0.1:8081").await?;
    info!("Listening on http://127.0.0.1:8081");

    let mut tasks = JoinSet::new();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, draining connections");
                drain.drain();
                break;
            }
            accepted = listener.accept() => {
                let (socket, addr) = match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        error!("Error accepting connection: {e}");
                        continue;
                    }
                };
                let conn = Connection::new(socket, limits.clone(), &config)?
                    .with_drain(drain.signal());
                tasks.spawn(async move {
                    if let Err(e) = serve(conn).await {
                        warn!("Connection from {addr} ended with error: {e}");
                    }
                });
            }
        }
    }

    let _ = tokio::time::timeout(Duration::from_secs(30), async {
        while tasks.join_next().await.is_some() {}
    })
    .await;
    info!("Server shutdown complete");
    Ok(())
}

async fn serve<S>(mut conn: Connection<S>) -> Result<(), h1_intake::connection::Error>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut collector = HeadCollector::new();
    loop {
        match conn.read_head(&mut collector).await? {
            HeadOutcome::Ready => {}
            HeadOutcome::Closed | HeadOutcome::Drained => return Ok(()),
        }
        let Some(head) = collector.take() else {
            return Ok(());
        };

        // Bodies are not echoed; skip whatever part of one is buffered and
        // close if more is still on the wire.
        let body_len = head.content_length().unwrap_or(0) as usize;
        let buffered = conn.buffered().len().min(body_len);
        conn.consume(buffered);
        let keep_alive = head.is_keep_alive() && buffered == body_len;

        let body = describe(&head);
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: {}\r\n\r\n{body}",
            body.len(),
            if keep_alive { "keep-alive" } else { "close" },
        );
        conn.stream_mut().write_all(response.as_bytes()).await?;
        if !keep_alive {
            conn.stream_mut().shutdown().await?;
            return Ok(());
        }
        conn.finish_request();
    }
}

fn describe(head: &RequestHead) -> String {
    let mut out = format!(
        "method: {}\npath: {}\nquery: {}\nversion: {}\n",
        head.method_token, head.path, head.query, head.version
    );
    for (name, value) in &head.headers {
        out.push_str(&format!("{name}: {}\n", String::from_utf8_lossy(value)));
    }
    out
}
