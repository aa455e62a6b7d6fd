//! Account tools
//!
//! Create/read/update/delete plus the balance and per-account transaction
//! listings. All state lives upstream; these handlers only marshal arguments
//! into `/accounts` requests.

use std::sync::Arc;

use rust_mcp_sdk::macros;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api_client::ApiTransport;
use crate::domain::registry::{parse_args, request_body, RegistryError, ToolRegistry};
use crate::domain::{render, validate};
use crate::errors::AppError;

#[macros::mcp_tool(
    name = "create_account",
    description = "Create a new financial account (BANK_ACCOUNT, WALLET, etc.)"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountTool {
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub initial_balance: f64,
}

#[macros::mcp_tool(
    name = "get_accounts",
    description = "List all financial accounts with current balances"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetAccountsTool {}

#[macros::mcp_tool(
    name = "get_account",
    description = "Get details of a specific account by ID"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetAccountTool {
    pub id: String,
}

#[macros::mcp_tool(name = "update_account", description = "Update an existing account")]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountTool {
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub account_type: Option<String>,
}

#[macros::mcp_tool(name = "delete_account", description = "Delete an account by ID")]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct DeleteAccountTool {
    pub id: String,
}

#[macros::mcp_tool(
    name = "get_account_balance",
    description = "Get the current balance for a specific account"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetAccountBalanceTool {
    pub id: String,
}

#[macros::mcp_tool(
    name = "get_account_transactions",
    description = "Get all transactions linked to an account"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetAccountTransactionsTool {
    pub id: String,
}

pub fn register_tools(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(CreateAccountTool::tool(), create_account)?;
    registry.register(GetAccountsTool::tool(), get_accounts)?;
    registry.register(GetAccountTool::tool(), get_account)?;
    registry.register(UpdateAccountTool::tool(), update_account)?;
    registry.register(DeleteAccountTool::tool(), delete_account)?;
    registry.register(GetAccountBalanceTool::tool(), get_account_balance)?;
    registry.register(GetAccountTransactionsTool::tool(), get_account_transactions)?;
    Ok(())
}

async fn create_account(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: CreateAccountTool = parse_args(args)?;
    validate::one_of(
        &input.account_type,
        &validate::ACCOUNT_TYPES,
        "invalid_type",
        "type",
    )?;

    let body = request_body(&input, &[])?;
    let account = api.post("/accounts", body).await?;
    Ok(render::success("Account created", &account))
}

async fn get_accounts(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let _: GetAccountsTool = parse_args(args)?;
    let accounts = api.get("/accounts").await?;
    Ok(render::success("Accounts", &accounts))
}

async fn get_account(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: GetAccountTool = parse_args(args)?;
    let account = api.get(&format!("/accounts/{}", input.id)).await?;
    Ok(render::success("Account details", &account))
}

async fn update_account(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: UpdateAccountTool = parse_args(args)?;
    validate::opt_one_of(
        input.account_type.as_deref(),
        &validate::ACCOUNT_TYPES,
        "invalid_type",
        "type",
    )?;

    let body = request_body(&input, &["id"])?;
    let account = api
        .patch(&format!("/accounts/{}", input.id), Some(body))
        .await?;
    Ok(render::success("Account updated", &account))
}

async fn delete_account(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: DeleteAccountTool = parse_args(args)?;
    api.delete(&format!("/accounts/{}", input.id)).await?;
    Ok(format!("Account deleted successfully (ID: {})", input.id))
}

async fn get_account_balance(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: GetAccountBalanceTool = parse_args(args)?;
    let balance = api.get(&format!("/accounts/{}/balance", input.id)).await?;
    Ok(render::success("Account balance", &balance))
}

async fn get_account_transactions(
    api: Arc<dyn ApiTransport>,
    args: Value,
) -> Result<String, AppError> {
    let input: GetAccountTransactionsTool = parse_args(args)?;
    let transactions = api
        .get(&format!("/accounts/{}/transactions", input.id))
        .await?;
    Ok(render::success("Account transactions", &transactions))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::api_client::test_support::{RecordedCall, RecordingApi};

    use super::*;

    #[tokio::test]
    async fn create_account_posts_full_body() {
        let api = Arc::new(RecordingApi::returning(json!({"id": "acc_1"})));

        let text = create_account(
            api.clone(),
            json!({"name": "Checking", "type": "BANK_ACCOUNT", "initialBalance": 250.0}),
        )
        .await
        .expect("create succeeds");

        assert!(text.starts_with("Account created: "));
        assert_eq!(
            api.calls(),
            vec![RecordedCall {
                method: "POST",
                path: "/accounts".to_string(),
                body: Some(
                    json!({"name": "Checking", "type": "BANK_ACCOUNT", "initialBalance": 250.0})
                ),
            }]
        );
    }

    #[tokio::test]
    async fn create_account_rejects_unknown_type_before_any_call() {
        let api = Arc::new(RecordingApi::new());

        let error = create_account(
            api.clone(),
            json!({"name": "Checking", "type": "CHECKING", "initialBalance": 0.0}),
        )
        .await
        .expect_err("unknown type must fail");

        assert!(matches!(error, AppError::Validation { .. }));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn update_account_strips_id_from_body() {
        let api = Arc::new(RecordingApi::returning(json!({"id": "acc_1"})));

        update_account(api.clone(), json!({"id": "acc_1", "name": "Main"}))
            .await
            .expect("update succeeds");

        assert_eq!(
            api.calls(),
            vec![RecordedCall {
                method: "PATCH",
                path: "/accounts/acc_1".to_string(),
                body: Some(json!({"name": "Main"})),
            }]
        );
    }

    #[tokio::test]
    async fn delete_account_reports_id() {
        let api = Arc::new(RecordingApi::new());

        let text = delete_account(api.clone(), json!({"id": "acc_9"}))
            .await
            .expect("delete succeeds");

        assert_eq!(text, "Account deleted successfully (ID: acc_9)");
        assert_eq!(
            api.calls(),
            vec![RecordedCall {
                method: "DELETE",
                path: "/accounts/acc_9".to_string(),
                body: None,
            }]
        );
    }

    #[tokio::test]
    async fn balance_and_transactions_use_sub_resource_paths() {
        let api = Arc::new(RecordingApi::new());

        get_account_balance(api.clone(), json!({"id": "acc_1"}))
            .await
            .expect("balance succeeds");
        get_account_transactions(api.clone(), json!({"id": "acc_1"}))
            .await
            .expect("transactions succeed");

        let paths: Vec<String> = api.calls().into_iter().map(|call| call.path).collect();
        assert_eq!(
            paths,
            vec![
                "/accounts/acc_1/balance".to_string(),
                "/accounts/acc_1/transactions".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn upstream_failure_propagates_untouched() {
        let api = Arc::new(RecordingApi::failing(AppError::api(404, "Not Found")));

        let error = get_account(api.clone(), json!({"id": "missing"}))
            .await
            .expect_err("missing account must fail");

        assert!(matches!(error, AppError::Api { status: 404, .. }));
    }
}
