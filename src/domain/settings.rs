//! User settings tools
//!
//! Settings are a singleton resource: created once, then read or patched at
//! the collection path.

use std::sync::Arc;

use rust_mcp_sdk::macros;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api_client::ApiTransport;
use crate::domain::registry::{parse_args, request_body, RegistryError, ToolRegistry};
use crate::domain::{render, validate};
use crate::errors::AppError;

#[macros::mcp_tool(
    name = "create_settings",
    description = "Create the user settings (name, language and currency)"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSettingsTool {
    pub user_name: String,
    pub language: String,
    pub currency: String,
}

#[macros::mcp_tool(name = "get_settings", description = "Get the current user settings")]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetSettingsTool {}

#[macros::mcp_tool(name = "update_settings", description = "Update the user settings")]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsTool {
    pub user_name: Option<String>,
    pub language: Option<String>,
    pub currency: Option<String>,
}

pub fn register_tools(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(CreateSettingsTool::tool(), create_settings)?;
    registry.register(GetSettingsTool::tool(), get_settings)?;
    registry.register(UpdateSettingsTool::tool(), update_settings)?;
    Ok(())
}

async fn create_settings(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: CreateSettingsTool = parse_args(args)?;
    validate::one_of(
        &input.language,
        &validate::LANGUAGES,
        "invalid_language",
        "language",
    )?;
    validate::one_of(
        &input.currency,
        &validate::CURRENCIES,
        "invalid_currency",
        "currency",
    )?;

    let body = request_body(&input, &[])?;
    let settings = api.post("/settings", body).await?;
    Ok(render::success("Settings created", &settings))
}

async fn get_settings(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let _: GetSettingsTool = parse_args(args)?;
    let settings = api.get("/settings").await?;
    Ok(render::success("Settings", &settings))
}

async fn update_settings(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: UpdateSettingsTool = parse_args(args)?;
    validate::opt_one_of(
        input.language.as_deref(),
        &validate::LANGUAGES,
        "invalid_language",
        "language",
    )?;
    validate::opt_one_of(
        input.currency.as_deref(),
        &validate::CURRENCIES,
        "invalid_currency",
        "currency",
    )?;

    let body = request_body(&input, &[])?;
    let settings = api.patch("/settings", Some(body)).await?;
    Ok(render::success("Settings updated", &settings))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::api_client::test_support::{RecordedCall, RecordingApi};

    use super::*;

    #[tokio::test]
    async fn create_settings_posts_name_language_and_currency() {
        let api = Arc::new(RecordingApi::returning(
            json!({"language": "pt-BR", "currency": "BRL"}),
        ));

        let text = create_settings(
            api.clone(),
            json!({"userName": "Ana", "language": "pt-BR", "currency": "BRL"}),
        )
        .await
        .expect("create succeeds");

        assert!(text.starts_with("Settings created: "));
        assert_eq!(
            api.calls(),
            vec![RecordedCall {
                method: "POST",
                path: "/settings".to_string(),
                body: Some(json!({"userName": "Ana", "language": "pt-BR", "currency": "BRL"})),
            }]
        );
    }

    #[tokio::test]
    async fn create_settings_rejects_unknown_currency() {
        let api = Arc::new(RecordingApi::new());

        let error = create_settings(
            api.clone(),
            json!({"userName": "Ana", "language": "en-US", "currency": "XYZ"}),
        )
        .await
        .expect_err("unknown currency must fail");

        assert!(matches!(error, AppError::Validation { .. }));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn update_settings_patches_collection_path() {
        let api = Arc::new(RecordingApi::new());

        update_settings(api.clone(), json!({"currency": "USD"}))
            .await
            .expect("update succeeds");

        assert_eq!(
            api.calls(),
            vec![RecordedCall {
                method: "PATCH",
                path: "/settings".to_string(),
                body: Some(json!({"currency": "USD"})),
            }]
        );
    }
}
