//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::tools::{CepLookupParams, lookup_impl};

use cep_core::CepLookup;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The MCP server handler for cep-cache.
#[derive(Clone)]
pub struct CepMcpServer {
    lookup: CepLookup,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
#[tool_router]
impl CepMcpServer {
    /// Create a new server handler around a lookup orchestrator.
    pub fn new(lookup: CepLookup) -> Self {
        Self { lookup, tool_router: Self::tool_router() }
    }

    /// Look up a Brazilian postal code.
    ///
    /// Served from the local cache when the CEP has been seen before,
    /// otherwise resolved through ViaCEP and cached.
    #[tool(description = "Look up a Brazilian postal code (CEP, 8 digits). Returns street, neighborhood, city and state.")]
    async fn cep_lookup(&self, params: Parameters<CepLookupParams>) -> Result<CallToolResult, McpError> {
        lookup_impl(&self.lookup, params.0).await
    }
}

impl ServerHandler for CepMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "cep-cache".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
