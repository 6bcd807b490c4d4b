use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::mcp::{
    InitializeParams, JsonRpcError, JsonRpcRequest, JsonRpcResponse, Tool, ToolCallParams,
};

#[async_trait]
pub trait McpHandler: Send + Sync {
    async fn initialize(&self, params: InitializeParams) -> Result<Value>;
    async fn list_tools(&self) -> Result<Vec<Tool>>;
    async fn call_tool(&self, params: ToolCallParams) -> Result<Value>;
}

/// Line-delimited JSON-RPC server in front of one [`McpHandler`]
#[derive(Clone)]
pub struct McpServer {
    handler: Arc<dyn McpHandler>,
}

impl McpServer {
    pub fn new(handler: Arc<dyn McpHandler>) -> Self {
        Self { handler }
    }

    /// Dispatch one request; notifications yield `None`
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!("Received request: method={}", request.method);

        let result = self.dispatch(&request).await;

        let id = match request.id {
            Some(id) => id,
            None => {
                if let Err(e) = result {
                    warn!("Notification {} failed: {}", request.method, e);
                }
                return None;
            }
        };

        Some(match result {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => {
                warn!("Request {} failed: {}", request.method, e);
                JsonRpcResponse::failure(id, JsonRpcError::from(&e))
            }
        })
    }

    async fn dispatch(&self, request: &JsonRpcRequest) -> Result<Value> {
        match request.method.as_str() {
            "initialize" => {
                let params: InitializeParams = match &request.params {
                    Some(params) => serde_json::from_value(params.clone())
                        .map_err(|e| Error::InvalidParams(e.to_string()))?,
                    None => InitializeParams::default(),
                };
                self.handler.initialize(params).await
            }
            "notifications/initialized" | "notifications/cancelled" => Ok(Value::Null),
            "ping" => Ok(json!({})),
            "tools/list" => {
                let tools = self.handler.list_tools().await?;
                Ok(json!({ "tools": tools }))
            }
            "tools/call" => {
                let params: ToolCallParams = serde_json::from_value(
                    request.params.clone().unwrap_or_default(),
                )
                .map_err(|e| Error::InvalidParams(e.to_string()))?;
                self.handler.call_tool(params).await
            }
            _ => Err(Error::MethodNotFound(request.method.clone())),
        }
    }

    /// Parse and dispatch one line of input
    pub async fn process_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                error!("Error parsing request: {}", e);
                Some(JsonRpcResponse::failure(
                    Value::Null,
                    JsonRpcError::from(Error::Parse(e.to_string())),
                ))
            }
        }
    }

    /// Serve requests from `reader` until EOF, one response line per request
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            if let Some(response) = self.process_line(&line).await {
                let response_str = serde_json::to_string(&response)?;
                writer.write_all(response_str.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }

        Ok(())
    }

    pub async fn run_stdio(&self) -> Result<()> {
        info!("MCP server running on stdio");
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        self.serve(stdin, tokio::io::stdout()).await?;
        info!("stdin closed, MCP server stopping");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoHandler;

    #[async_trait]
    impl McpHandler for EchoHandler {
        async fn initialize(&self, _params: InitializeParams) -> Result<Value> {
            Ok(json!({"serverInfo": {"name": "echo"}}))
        }

        async fn list_tools(&self) -> Result<Vec<Tool>> {
            Ok(vec![])
        }

        async fn call_tool(&self, params: ToolCallParams) -> Result<Value> {
            match params.name.as_str() {
                "echo" => Ok(params.arguments.unwrap_or_default()),
                other => Err(Error::ToolNotFound(other.to_string())),
            }
        }
    }

    fn server() -> McpServer {
        McpServer::new(Arc::new(EchoHandler))
    }

    #[tokio::test]
    async fn test_process_line_dispatches() {
        let response = server()
            .process_line(r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"echo","arguments":{"a":1}}}"#)
            .await
            .unwrap();
        assert_eq!(response.result.unwrap()["a"], 1);
        assert_eq!(response.id, json!(1));
    }

    #[tokio::test]
    async fn test_parse_error_has_null_id() {
        let response = server().process_line("{not json").await.unwrap();
        assert_eq!(response.error.unwrap().code, -32700);
        assert!(response.id.is_null());
    }

    #[tokio::test]
    async fn test_notifications_and_blank_lines_get_no_reply() {
        let server = server();
        assert!(server
            .process_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await
            .is_none());
        assert!(server.process_line("   ").await.is_none());
    }

    #[tokio::test]
    async fn test_null_id_gets_a_reply() {
        let response = server()
            .process_line(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#)
            .await
            .unwrap();
        assert!(response.id.is_null());
        assert_eq!(response.result.unwrap(), json!({}));
    }

    #[tokio::test]
    async fn test_unknown_method_and_tool() {
        let server = server();
        let response = server
            .process_line(r#"{"jsonrpc":"2.0","id":"a","method":"resources/list"}"#)
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, -32601);

        let response = server
            .process_line(r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"nope"}}"#)
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn test_serve_writes_one_line_per_request() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n"
        );
        let mut output = Vec::new();
        server().serve(input.as_bytes(), &mut output).await.unwrap();

        let lines: Vec<&str> = std::str::from_utf8(&output).unwrap().lines().collect();
        assert_eq!(lines.len(), 2);
        let second: Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["id"], 2);
        assert!(second["result"]["tools"].as_array().unwrap().is_empty());
    }
}
