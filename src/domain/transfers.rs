//! Transfer tools
//!
//! Money movements between two accounts. The list endpoint takes the richest
//! filter set of the API: account, month and an explicit date window.

use std::sync::Arc;

use rust_mcp_sdk::macros;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api_client::ApiTransport;
use crate::domain::query::path_with_query;
use crate::domain::registry::{parse_args, request_body, RegistryError, ToolRegistry};
use crate::domain::{render, validate};
use crate::errors::AppError;

#[macros::mcp_tool(
    name = "create_transfer",
    description = "Transfer money between two accounts"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransferTool {
    pub from_account_id: String,
    pub to_account_id: String,
    pub amount: f64,
    pub date: String,
    pub description: Option<String>,
}

#[macros::mcp_tool(
    name = "get_transfers",
    description = "List transfers, filterable by account, month or date range"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetTransfersTool {
    pub account_id: Option<String>,
    pub month: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[macros::mcp_tool(
    name = "get_transfer",
    description = "Get details of a specific transfer by ID"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetTransferTool {
    pub id: String,
}

#[macros::mcp_tool(name = "update_transfer", description = "Update an existing transfer")]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransferTool {
    pub id: String,
    pub from_account_id: Option<String>,
    pub to_account_id: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<String>,
    pub description: Option<String>,
}

#[macros::mcp_tool(name = "delete_transfer", description = "Delete a transfer by ID")]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct DeleteTransferTool {
    pub id: String,
}

pub fn register_tools(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(CreateTransferTool::tool(), create_transfer)?;
    registry.register(GetTransfersTool::tool(), get_transfers)?;
    registry.register(GetTransferTool::tool(), get_transfer)?;
    registry.register(UpdateTransferTool::tool(), update_transfer)?;
    registry.register(DeleteTransferTool::tool(), delete_transfer)?;
    Ok(())
}

async fn create_transfer(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: CreateTransferTool = parse_args(args)?;
    validate::positive_amount(input.amount, "amount")?;
    validate::date(&input.date, "date")?;

    let body = request_body(&input, &[])?;
    let transfer = api.post("/transfers", body).await?;
    Ok(render::success("Transfer created", &transfer))
}

async fn get_transfers(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: GetTransfersTool = parse_args(args)?;
    validate::opt_month(input.month.as_deref(), "month")?;
    validate::opt_date(input.start_date.as_deref(), "startDate")?;
    validate::opt_date(input.end_date.as_deref(), "endDate")?;

    let path = path_with_query(
        "/transfers",
        &[
            ("accountId", input.account_id.as_deref()),
            ("month", input.month.as_deref()),
            ("startDate", input.start_date.as_deref()),
            ("endDate", input.end_date.as_deref()),
        ],
    );
    let transfers = api.get(&path).await?;
    Ok(render::success("Transfers", &transfers))
}

async fn get_transfer(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: GetTransferTool = parse_args(args)?;
    let transfer = api.get(&format!("/transfers/{}", input.id)).await?;
    Ok(render::success("Transfer", &transfer))
}

async fn update_transfer(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: UpdateTransferTool = parse_args(args)?;
    validate::opt_positive_amount(input.amount, "amount")?;
    validate::opt_date(input.date.as_deref(), "date")?;

    let body = request_body(&input, &["id"])?;
    let transfer = api
        .patch(&format!("/transfers/{}", input.id), Some(body))
        .await?;
    Ok(render::success("Transfer updated", &transfer))
}

async fn delete_transfer(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: DeleteTransferTool = parse_args(args)?;
    api.delete(&format!("/transfers/{}", input.id)).await?;
    Ok(format!("Transfer deleted: {}", input.id))
}
