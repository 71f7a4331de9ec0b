//! MCP tool server over stdio.
//!
//! Exposes the ticket search pipeline as a single `search` tool. Results and
//! errors are returned as one JSON text content block.

use std::borrow::Cow;
use std::sync::Arc;

use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler};
use serde_json::{Map, Value, json};
use ticket_agent::TicketSearchAgent;
use tracing::{debug, error, warn};

pub const SERVER_NAME: &str = "zendesk-search-mcp-server";
pub const SEARCH_TOOL: &str = "search";
const SEARCH_DESCRIPTION: &str = "Search for information in Zendesk tickets";

/// Tool handler bound to the shared pipeline.
#[derive(Clone)]
pub struct TicketSearchMcp {
    agent: Arc<TicketSearchAgent>,
}

impl TicketSearchMcp {
    pub fn new(agent: Arc<TicketSearchAgent>) -> Self {
        Self { agent }
    }

    fn search_tool() -> Tool {
        let schema = json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of results to return"
                }
            },
            "required": ["query"]
        });
        let input_schema = match schema {
            Value::Object(map) => Arc::new(map),
            _ => Arc::new(Map::new()),
        };

        Tool {
            name: Cow::Borrowed(SEARCH_TOOL),
            title: None,
            description: Some(Cow::Borrowed(SEARCH_DESCRIPTION)),
            input_schema,
            output_schema: None,
            annotations: Some(ToolAnnotations::new().read_only(true)),
            execution: None,
            icons: None,
            meta: None,
        }
    }

    /// Routes one tool call by name.
    ///
    /// Never returns a protocol error: unknown tools, bad arguments and
    /// pipeline failures all come back as `{"error": ...}` text.
    pub async fn dispatch(&self, name: &str, arguments: Option<Map<String, Value>>) -> CallToolResult {
        if name != SEARCH_TOOL {
            warn!(target: "api::mcp", tool = name, "unknown tool");
            return error_result(format!("Tool '{name}' not found"));
        }

        let args = arguments.unwrap_or_default();
        let (query, limit) = match self.search_args(&args) {
            Ok(v) => v,
            Err(msg) => return error_result(msg),
        };

        debug!(target: "api::mcp", query = %query, limit, "search: start");

        let agent = self.agent.clone();
        match tokio::spawn(async move { agent.execute(&query, limit).await }).await {
            Ok(result) => match serde_json::to_string(&result) {
                Ok(text) => CallToolResult::success(vec![Content::text(text)]),
                Err(e) => error_result(e.to_string()),
            },
            Err(e) => {
                error!(target: "api::mcp", error = %e, "search: pipeline task failed");
                error_result(e.to_string())
            }
        }
    }

    fn search_args(&self, args: &Map<String, Value>) -> Result<(String, u64), String> {
        let query = match args.get("query") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(_) => return Err("query must be a string".to_string()),
        };

        let limit = match args.get("limit") {
            None | Some(Value::Null) => self.agent.default_limit(),
            Some(v) => match positive_integer(v) {
                Some(n) => n,
                None => return Err(format!("limit must be a positive integer, got {v}")),
            },
        };

        Ok((query, limit))
    }

    fn instructions(&self) -> String {
        let info = self.agent.info();
        format!(
            "{} ({}). {} Model: {}. Collection: {}. Use the `search` tool with a natural \
             language query.",
            info.agent_name,
            SERVER_NAME,
            info.description,
            info.model,
            info.collection
        )
    }
}

/// Accepts `5` and integral floats such as `5.0`.
fn positive_integer(v: &Value) -> Option<u64> {
    if let Some(n) = v.as_u64() {
        return (n > 0).then_some(n);
    }
    let f = v.as_f64()?;
    (f >= 1.0 && f.fract() == 0.0 && f <= u64::MAX as f64).then_some(f as u64)
}

fn error_result(message: String) -> CallToolResult {
    CallToolResult::error(vec![Content::text(json!({ "error": message }).to_string())])
}

impl ServerHandler for TicketSearchMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                title: Some("Zendesk Search".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(self.instructions()),
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult::with_all_items(vec![Self::search_tool()])))
    }

    fn get_tool(&self, name: &str) -> Option<Tool> {
        (name == SEARCH_TOOL).then(Self::search_tool)
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(&request.name, request.arguments).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_accepts_integral_numbers_only() {
        assert_eq!(positive_integer(&json!(5)), Some(5));
        assert_eq!(positive_integer(&json!(5.0)), Some(5));
        assert_eq!(positive_integer(&json!(2.5)), None);
        assert_eq!(positive_integer(&json!(0)), None);
        assert_eq!(positive_integer(&json!(0.0)), None);
        assert_eq!(positive_integer(&json!(-3)), None);
        assert_eq!(positive_integer(&json!("5")), None);
    }

    #[test]
    fn search_tool_schema_requires_query() {
        let tool = TicketSearchMcp::search_tool();
        assert_eq!(tool.name, SEARCH_TOOL);
        assert_eq!(tool.description.as_deref(), Some(SEARCH_DESCRIPTION));
        assert_eq!(tool.input_schema["required"], json!(["query"]));
        assert_eq!(
            tool.input_schema["properties"]["limit"]["type"],
            json!("integer")
        );
    }
}
