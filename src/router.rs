use crate::error::ImportError;
use crate::server::TechfestMindServer;
use rmcp::{
    ErrorData as McpError,
    handler::server::ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Implementation, InitializeRequestParam,
        InitializeResult, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo, Tool, ToolsCapability,
    },
    service::RequestContext,
};

#[derive(Clone)]
pub struct Router(pub TechfestMindServer);

impl ServerHandler for Router {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                ..Default::default()
            },
            server_info: Implementation {
                name: "techfest-mind".to_string(),
                title: Some("Techfest Mind".to_string()),
                version: "0.1.0".to_string(),
                website_url: None,
                icons: None,
            },
            ..Default::default()
        }
    }

    async fn initialize(
        &self,
        request: InitializeRequestParam,
        _context: RequestContext<rmcp::service::RoleServer>,
    ) -> std::result::Result<InitializeResult, McpError> {
        let mut info = self.get_info();
        info.protocol_version = request.protocol_version.clone();
        Ok(info)
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<rmcp::service::RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        // Minimal schemas (untyped) just to advertise availability
        let object_schema = std::sync::Arc::new(
            serde_json::json!({ "type": "object" })
                .as_object()
                .cloned()
                .unwrap_or_default(),
        );

        let tool = |name: &str, title: &str, description: &str| Tool {
            name: name.to_string().into(),
            title: Some(title.into()),
            description: Some(description.to_string().into()),
            input_schema: object_schema.clone(),
            icons: None,
            annotations: None,
            output_schema: None,
            meta: None,
        };

        let tools = vec![
            tool(
                "health",
                "Health",
                "Check SurrealDB connectivity and config surface",
            ),
            tool(
                "status",
                "Status",
                "Event count and per-department breakdown",
            ),
            tool(
                "import_events",
                "Import Events",
                "Import events from the CSV/XLSX drop files (csv_path/xlsx_path override the configured paths)",
            ),
            tool(
                "registration_gate",
                "Registration Gate",
                "Inspect or change the registration gate (action: status|open|close|schedule, at: RFC 3339)",
            ),
        ];

        Ok(ListToolsResult {
            tools,
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<rmcp::service::RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        match request.name.as_ref() {
            "health" => self.0.handle_health(request).await.map_err(tool_error),
            "status" => self.0.handle_status(request).await.map_err(tool_error),
            "import_events" => self.0.handle_import(request).await.map_err(tool_error),
            "registration_gate" => self
                .0
                .handle_registration_gate(request)
                .await
                .map_err(tool_error),
            _ => Err(McpError {
                code: rmcp::model::ErrorCode::METHOD_NOT_FOUND,
                message: format!("Unknown tool: {}", request.name).into(),
                data: None,
            }),
        }
    }
}

/// A missing import source is the caller's problem (there is nothing to
/// import), not an internal fault; everything else stays internal.
fn tool_error(e: anyhow::Error) -> McpError {
    let code = match e.downcast_ref::<ImportError>() {
        Some(ImportError::NoSource { .. }) => rmcp::model::ErrorCode::INVALID_PARAMS,
        _ => rmcp::model::ErrorCode::INTERNAL_ERROR,
    };
    McpError {
        code,
        message: e.to_string().into(),
        data: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_source_is_not_an_internal_fault() {
        let err = anyhow::Error::new(ImportError::NoSource {
            csv: "data/events.csv".to_string(),
            xlsx: "data/events.xlsx".to_string(),
        });
        assert_eq!(tool_error(err).code, rmcp::model::ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn other_failures_stay_internal() {
        let err = anyhow::anyhow!("connection reset");
        assert_eq!(tool_error(err).code, rmcp::model::ErrorCode::INTERNAL_ERROR);
    }
}
