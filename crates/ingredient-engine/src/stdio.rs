//! Line-delimited JSON-RPC 2.0 over stdin/stdout.
//!
//! Methods: `initialize`, `ingredients/list`, `query` (params are a
//! [`Query`]). A failing request produces an error response and the session
//! keeps going.

use crate::query::{Query, QueryEngine};
use crate::rpc_types::{
    RpcRequest, RpcResponse, GRAPH_ERROR, INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR,
};
use serde_json::json;
use tokio::io::{stdin, stdout, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

pub async fn run_stdio(engine: QueryEngine) -> std::io::Result<()> {
    info!(vertices = engine.graph().len(), "serving queries on stdio");
    serve_lines(&engine, BufReader::new(stdin()), stdout()).await
}

/// Answer one response line per non-blank request line until EOF.
pub async fn serve_lines<R, W>(engine: &QueryEngine, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_line(engine, &line);
        let mut encoded = serde_json::to_vec(&response)?;
        encoded.push(b'\n');
        writer.write_all(&encoded).await?;
        writer.flush().await?;
    }
    Ok(())
}

pub fn handle_line(engine: &QueryEngine, line: &str) -> RpcResponse {
    let request: RpcRequest = match serde_json::from_str(line) {
        Ok(req) => req,
        Err(e) => {
            warn!(error = %e, "unparseable request");
            return RpcResponse::failure(None, PARSE_ERROR, format!("parse error: {}", e));
        }
    };
    debug!(method = %request.method, "request");

    match request.method.as_str() {
        "initialize" => RpcResponse::success(
            request.id,
            json!({
                "serverInfo": {
                    "name": "ingraph",
                    "version": env!("CARGO_PKG_VERSION")
                },
                "vertices": engine.graph().len(),
                "methods": ["initialize", "ingredients/list", "query"]
            }),
        ),
        "ingredients/list" => RpcResponse::success(request.id, json!(engine.graph().labels())),
        "query" => {
            let params = request.params.unwrap_or(json!({}));
            let query: Query = match serde_json::from_value(params) {
                Ok(q) => q,
                Err(e) => {
                    return RpcResponse::failure(
                        request.id,
                        INVALID_PARAMS,
                        format!("invalid query: {}", e),
                    )
                }
            };
            match engine.execute(query) {
                Ok(response) => match serde_json::to_value(&response) {
                    Ok(value) => RpcResponse::success(request.id, value),
                    Err(e) => RpcResponse::failure(request.id, GRAPH_ERROR, e.to_string()),
                },
                Err(e) => RpcResponse::failure(request.id, GRAPH_ERROR, e.to_string()),
            }
        }
        other => RpcResponse::failure(
            request.id,
            METHOD_NOT_FOUND,
            format!("method not found: {}", other),
        ),
    }
}
