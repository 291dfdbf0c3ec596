//! TCP transport adapter.
//!
//! The consensus engine connects over TCP and exchanges newline-delimited
//! JSON: one [`Request`] per line in, one [`Response`] per line out, in
//! order. A line that does not parse gets an `error` response and the
//! connection stays open. So does one longer than the line limit: the rest
//! of that line is discarded and an `error` response is sent.
//!
//! Each request is handed to the blocking pool, where it waits on the
//! application lock. Calls from different connections therefore serialize on
//! that lock, never on the network tasks.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::handler::App;
use crate::protocol::{ErrorResponse, Request, Response};

/// Longest accepted request line, newline excluded.
pub const MAX_REQUEST_BYTES: u64 = 8 * 1024 * 1024;

/// Accept connections on `listener` until `shutdown` is notified.
pub async fn serve(
    listener: TcpListener,
    app: Arc<App>,
    shutdown: Arc<Notify>,
) -> Result<(), AppError> {
    serve_with_limit(listener, app, shutdown, MAX_REQUEST_BYTES).await
}

/// [`serve`] with an explicit request line limit.
pub async fn serve_with_limit(
    listener: TcpListener,
    app: Arc<App>,
    shutdown: Arc<Notify>,
    max_line: u64,
) -> Result<(), AppError> {
    info!(addr = %listener.local_addr()?, max_line, "transport listening");

    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, peer)) => {
                        let app = app.clone();
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, peer, app, max_line).await {
                                warn!(%peer, error = %e, "connection closed with error");
                            }
                        });
                    }
                    Err(e) => {
                        warn!(error = %e, "accept error");
                    }
                }
            }
            _ = shutdown.notified() => {
                info!("transport shutting down");
                break;
            }
        }
    }
    Ok(())
}

/// Serve one connection until the peer closes it.
async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    app: Arc<App>,
    max_line: u64,
) -> std::io::Result<()> {
    debug!(%peer, "connection opened");
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();

    loop {
        line.clear();
        let n = (&mut reader)
            .take(max_line + 1)
            .read_until(b'\n', &mut line)
            .await?;
        if n == 0 {
            break;
        }

        let response = if !line.ends_with(b"\n") && line.len() as u64 > max_line {
            discard_line(&mut reader).await?;
            warn!(%peer, limit = max_line, "request line too long");
            Response::Error(ErrorResponse {
                message: format!("request exceeds {} bytes", max_line),
            })
        } else {
            let request = line.trim_ascii();
            if request.is_empty() {
                continue;
            }
            match serde_json::from_slice::<Request>(request) {
                Ok(request) => dispatch(&app, request).await,
                Err(e) => Response::Error(ErrorResponse {
                    message: format!("bad request: {}", e),
                }),
            }
        };

        let mut out = serde_json::to_vec(&response)?;
        out.push(b'\n');
        writer.write_all(&out).await?;
    }

    debug!(%peer, "connection closed");
    Ok(())
}

/// Skip input up to and including the next newline.
async fn discard_line(reader: &mut BufReader<OwnedReadHalf>) -> std::io::Result<()> {
    loop {
        let buf = reader.fill_buf().await?;
        if buf.is_empty() {
            return Ok(());
        }
        match buf.iter().position(|b| *b == b'\n') {
            Some(i) => {
                reader.consume(i + 1);
                return Ok(());
            }
            None => {
                let len = buf.len();
                reader.consume(len);
            }
        }
    }
}

/// Run a request on the blocking pool.
async fn dispatch(app: &Arc<App>, request: Request) -> Response {
    let method = request.method();
    let app = app.clone();
    match tokio::task::spawn_blocking(move || app.handle(request)).await {
        Ok(response) => response,
        Err(e) => {
            warn!(method, error = %e, "handler task failed");
            Response::Error(ErrorResponse {
                message: format!("{} failed: {}", method, e),
            })
        }
    }
}
