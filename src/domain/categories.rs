//! Category tools
//!
//! Categories partition transactions by type (INCOME or EXPENSE) and carry an
//! optional display color.

use std::sync::Arc;

use rust_mcp_sdk::macros;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api_client::ApiTransport;
use crate::domain::registry::{parse_args, request_body, RegistryError, ToolRegistry};
use crate::domain::{render, validate};
use crate::errors::AppError;

#[macros::mcp_tool(
    name = "create_category",
    description = "Create a new income or expense category"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct CreateCategoryTool {
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: String,
    pub color: Option<String>,
}

#[macros::mcp_tool(name = "get_categories", description = "List all categories")]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetCategoriesTool {}

#[macros::mcp_tool(name = "update_category", description = "Update an existing category")]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct UpdateCategoryTool {
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub category_type: Option<String>,
    pub color: Option<String>,
}

#[macros::mcp_tool(name = "delete_category", description = "Delete a category by ID")]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct DeleteCategoryTool {
    pub id: String,
}

pub fn register_tools(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(CreateCategoryTool::tool(), create_category)?;
    registry.register(GetCategoriesTool::tool(), get_categories)?;
    registry.register(UpdateCategoryTool::tool(), update_category)?;
    registry.register(DeleteCategoryTool::tool(), delete_category)?;
    Ok(())
}

async fn create_category(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: CreateCategoryTool = parse_args(args)?;
    validate::one_of(
        &input.category_type,
        &validate::TRANSACTION_TYPES,
        "invalid_type",
        "type",
    )?;
    validate::opt_hex_color(input.color.as_deref(), "color")?;

    let body = request_body(&input, &[])?;
    let category = api.post("/categories", body).await?;
    Ok(render::success("Category created", &category))
}

async fn get_categories(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let _: GetCategoriesTool = parse_args(args)?;
    let categories = api.get("/categories").await?;
    Ok(render::success("Categories", &categories))
}

async fn update_category(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: UpdateCategoryTool = parse_args(args)?;
    validate::opt_one_of(
        input.category_type.as_deref(),
        &validate::TRANSACTION_TYPES,
        "invalid_type",
        "type",
    )?;
    validate::opt_hex_color(input.color.as_deref(), "color")?;

    let body = request_body(&input, &["id"])?;
    let category = api
        .patch(&format!("/categories/{}", input.id), Some(body))
        .await?;
    Ok(render::success("Category updated", &category))
}

async fn delete_category(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: DeleteCategoryTool = parse_args(args)?;
    api.delete(&format!("/categories/{}", input.id)).await?;
    Ok(format!("Category deleted successfully (ID: {})", input.id))
}
