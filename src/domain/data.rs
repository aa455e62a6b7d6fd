//! Data export/import tools
//!
//! Export returns the full bookkeeping snapshot; import replays one, either
//! replacing everything (`reset`) or layering on top (`increment`). The
//! snapshot payload is passed through opaquely, its inner shape is owned by
//! the upstream API.

use std::sync::Arc;

use rust_mcp_sdk::macros;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api_client::ApiTransport;
use crate::domain::registry::{parse_args, request_body, RegistryError, ToolRegistry};
use crate::domain::{render, validate};
use crate::errors::AppError;

#[macros::mcp_tool(
    name = "export_data",
    description = "Export all financial data as a snapshot"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct ExportDataTool {}

#[macros::mcp_tool(
    name = "import_data",
    description = "Import a previously exported snapshot. Mode 'reset' replaces all data, 'increment' adds on top"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportDataTool {
    pub mode: String,
    pub version: String,
    pub exported_at: String,
    pub data: Option<serde_json::Value>,
}

pub fn register_tools(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(ExportDataTool::tool(), export_data)?;
    registry.register(ImportDataTool::tool(), import_data)?;
    Ok(())
}

async fn export_data(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let _: ExportDataTool = parse_args(args)?;
    let snapshot = api.get("/export").await?;
    Ok(render::success("Export", &snapshot))
}

async fn import_data(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: ImportDataTool = parse_args(args)?;
    validate::one_of(&input.mode, &validate::IMPORT_MODES, "invalid_mode", "mode")?;
    if input.data.is_none() {
        return Err(AppError::validation(
            "invalid_arguments",
            "data is required",
        ));
    }

    let body = request_body(&input, &[])?;
    let result = api.post("/import", body).await?;
    Ok(render::success("Import result", &result))
}
