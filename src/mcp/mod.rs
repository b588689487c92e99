//! MCP server over stdio.
//!
//! One JSON-RPC 2.0 request per line on stdin, one response per line on
//! stdout. Logging goes to stderr so it never corrupts the protocol
//! stream. Notifications (no id) are consumed without a response.

pub mod tools;

use crate::library::Library;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{BufRead, BufReader, Write};
use tools::ToolRegistry;

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "promptstash";

/// Result type for method dispatch: a JSON value, or a JSON-RPC error
/// code with message.
type DispatchResult = Result<Value, (i32, String)>;

pub struct McpServer {
    library: Library,
    tools: ToolRegistry,
}

impl McpServer {
    #[must_use]
    pub fn new(library: Library) -> Self {
        Self {
            library,
            tools: ToolRegistry::new(),
        }
    }

    /// Serves requests from stdin until EOF.
    pub fn run(&mut self) -> std::io::Result<()> {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        let reader = BufReader::new(stdin.lock());

        tracing::info!(server = SERVER_NAME, "mcp server listening on stdio");

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            if let Some(response) = self.handle_request(&line) {
                writeln!(stdout, "{response}")?;
                stdout.flush()?;
            }
        }
        Ok(())
    }

    /// Handles one raw request line. Returns `None` for notifications.
    fn handle_request(&mut self, request: &str) -> Option<String> {
        let parsed: Result<JsonRpcRequest, _> = serde_json::from_str(request);

        match parsed {
            Ok(req) => {
                tracing::debug!(method = %req.method, "handling request");
                if req.id.is_none() {
                    // Notification; never answered, even on failure.
                    let _ = self.dispatch_method(&req.method, req.params);
                    return None;
                }
                let result = self.dispatch_method(&req.method, req.params);
                Some(format_response(req.id, result))
            },
            Err(e) => Some(format_error(None, -32700, &format!("Parse error: {e}"))),
        }
    }

    fn dispatch_method(&mut self, method: &str, params: Option<Value>) -> DispatchResult {
        match method {
            "initialize" => Ok(serde_json::json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION")
                }
            })),
            "ping" => Ok(serde_json::json!({})),
            "tools/list" => self.handle_list_tools(),
            "tools/call" => self.handle_call_tool(params),
            name if name.starts_with("notifications/") => Ok(Value::Null),
            name => Err((-32601, format!("Method not found: {name}"))),
        }
    }

    fn handle_list_tools(&self) -> DispatchResult {
        let tools: Vec<Value> = self
            .tools
            .list_tools()
            .iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect();
        Ok(serde_json::json!({ "tools": tools }))
    }

    fn handle_call_tool(&mut self, params: Option<Value>) -> DispatchResult {
        let params = params.ok_or((-32602, "Missing params".to_string()))?;
        let name = params
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or((-32602, "Missing tool name".to_string()))?;
        let arguments = params
            .get("arguments")
            .cloned()
            .unwrap_or(serde_json::json!({}));

        tracing::debug!(tool = name, "tool call");

        match self.tools.execute(&mut self.library, name, arguments) {
            Ok(result) => Ok(serde_json::json!({
                "content": result.content,
                "isError": result.is_error
            })),
            Err(message) => Err((-32602, message)),
        }
    }
}

fn format_response(id: Option<Value>, result: DispatchResult) -> String {
    match result {
        Ok(value) => {
            let response = JsonRpcResponse {
                jsonrpc: "2.0".to_string(),
                id,
                result: Some(value),
                error: None,
            };
            serde_json::to_string(&response).unwrap_or_else(|_| "{}".to_string())
        },
        Err((code, message)) => format_error(id, code, &message),
    }
}

fn format_error(id: Option<Value>, code: i32, message: &str) -> String {
    let response = JsonRpcResponse {
        jsonrpc: "2.0".to_string(),
        id,
        result: None,
        error: Some(JsonRpcError {
            code,
            message: message.to_string(),
        }),
    };
    serde_json::to_string(&response).unwrap_or_else(|_| "{}".to_string())
}

#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    #[allow(dead_code)]
    jsonrpc: Option<String>,
    id: Option<Value>,
    method: String,
    params: Option<Value>,
}

#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> McpServer {
        McpServer::new(Library::in_memory().unwrap())
    }

    #[test]
    fn initialize_reports_server_info() {
        let mut server = server();
        let response = server
            .handle_request(r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#)
            .unwrap();
        assert!(response.contains("protocolVersion"));
        assert!(response.contains("promptstash"));
    }

    #[test]
    fn ping_returns_empty_object() {
        let mut server = server();
        let response = server
            .handle_request(r#"{"jsonrpc":"2.0","id":7,"method":"ping"}"#)
            .unwrap();
        let value: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["result"], serde_json::json!({}));
    }

    #[test]
    fn tools_list_includes_prompt_tools() {
        let mut server = server();
        let response = server
            .handle_request(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#)
            .unwrap();
        assert!(response.contains("create_prompt"));
        assert!(response.contains("delete_folder"));
        assert!(response.contains("inputSchema"));
    }

    #[test]
    fn tools_call_runs_against_the_library() {
        let mut server = server();
        let request = r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"create_prompt","arguments":{"title":"t","content":"c"}}}"#;
        let response = server.handle_request(request).unwrap();
        let value: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["result"]["isError"], false);
    }

    #[test]
    fn domain_error_is_tool_result_not_rpc_error() {
        let mut server = server();
        let request = r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"get_prompt","arguments":{"id":99}}}"#;
        let response = server.handle_request(request).unwrap();
        let value: Value = serde_json::from_str(&response).unwrap();
        assert!(value["error"].is_null());
        assert_eq!(value["result"]["isError"], true);
    }

    #[test]
    fn unknown_method_is_32601() {
        let mut server = server();
        let response = server
            .handle_request(r#"{"jsonrpc":"2.0","id":1,"method":"resources/list"}"#)
            .unwrap();
        assert!(response.contains("-32601"));
    }

    #[test]
    fn parse_error_is_32700() {
        let mut server = server();
        let response = server.handle_request("not json at all").unwrap();
        assert!(response.contains("-32700"));
    }

    #[test]
    fn missing_params_is_32602() {
        let mut server = server();
        let response = server
            .handle_request(r#"{"jsonrpc":"2.0","id":1,"method":"tools/call"}"#)
            .unwrap();
        assert!(response.contains("-32602"));
    }

    #[test]
    fn notifications_get_no_response() {
        let mut server = server();
        let response =
            server.handle_request(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#);
        assert!(response.is_none());
    }
}
