//! cep_lookup tool implementation.
//!
//! Resolves a CEP through the cache-through orchestrator.

use cep_core::{CepLookup, LookupError, WireResponse};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the cep_lookup tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CepLookupParams {
    /// Brazilian postal code, 8 digits without separators (e.g. "01001000").
    pub cep: String,
}

/// Implementation of the cep_lookup tool.
pub async fn lookup_impl(lookup: &CepLookup, params: CepLookupParams) -> Result<CallToolResult, McpError> {
    let record = lookup.lookup(&params.cep).await.inspect_err(|e| match e {
        LookupError::Internal(detail) => tracing::error!(error = %detail, "unhandled lookup failure"),
        other => tracing::debug!(error = %other, "lookup rejected"),
    })?;

    let output = WireResponse::from(record);
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| McpError::internal_error(format!("failed to serialize address: {e}"), None))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
