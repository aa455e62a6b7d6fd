//! Credit card tools
//!
//! Card CRUD plus the statement lifecycle: inspect a monthly statement, check
//! whether it is payable, pay it from an account, and reopen a paid one.

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
    name = "create_credit_card",
    description = "Create a new credit card with limit and billing cycle days"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCreditCardTool {
    pub name: String,
    pub brand: Option<String>,
    pub limit_amount: f64,
    pub closing_day: u32,
    pub due_day: u32,
}

#[macros::mcp_tool(name = "get_credit_cards", description = "List all credit cards")]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetCreditCardsTool {}

#[macros::mcp_tool(name = "update_credit_card", description = "Update an existing credit card")]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCreditCardTool {
    pub id: String,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub limit_amount: Option<f64>,
    pub closing_day: Option<u32>,
    pub due_day: Option<u32>,
}

#[macros::mcp_tool(name = "delete_credit_card", description = "Delete a credit card by ID")]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct DeleteCreditCardTool {
    pub id: String,
}

#[macros::mcp_tool(
    name = "get_statement",
    description = "Get the statement of a credit card for a given month"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetStatementTool {
    pub id: String,
    pub month: String,
}

#[macros::mcp_tool(
    name = "get_statement_status",
    description = "Check whether a credit card statement is open, closed or paid"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetStatementStatusTool {
    pub id: String,
    pub month: String,
}

#[macros::mcp_tool(
    name = "pay_statement",
    description = "Pay a credit card statement from a given account"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayStatementTool {
    pub card_id: String,
    pub month: String,
    pub payment_account_id: String,
}

#[macros::mcp_tool(
    name = "reopen_statement",
    description = "Reopen a previously paid credit card statement"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct ReopenStatementTool {
    pub id: String,
    pub month: String,
}

pub fn register_tools(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(CreateCreditCardTool::tool(), create_credit_card)?;
    registry.register(GetCreditCardsTool::tool(), get_credit_cards)?;
    registry.register(UpdateCreditCardTool::tool(), update_credit_card)?;
    registry.register(DeleteCreditCardTool::tool(), delete_credit_card)?;
    registry.register(GetStatementTool::tool(), get_statement)?;
    registry.register(GetStatementStatusTool::tool(), get_statement_status)?;
    registry.register(PayStatementTool::tool(), pay_statement)?;
    registry.register(ReopenStatementTool::tool(), reopen_statement)?;
    Ok(())
}

async fn create_credit_card(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: CreateCreditCardTool = parse_args(args)?;
    validate::non_negative_amount(input.limit_amount, "limitAmount")?;
    validate::day_of_month(input.closing_day, "closingDay")?;
    validate::day_of_month(input.due_day, "dueDay")?;

    let body = request_body(&input, &[])?;
    let card = api.post("/credit-cards", body).await?;
    Ok(render::success("Credit Card created", &card))
}

async fn get_credit_cards(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let _: GetCreditCardsTool = parse_args(args)?;
    let cards = api.get("/credit-cards").await?;
    Ok(render::success("Credit Cards", &cards))
}

async fn update_credit_card(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: UpdateCreditCardTool = parse_args(args)?;
    validate::opt_non_negative_amount(input.limit_amount, "limitAmount")?;
    validate::opt_day_of_month(input.closing_day, "closingDay")?;
    validate::opt_day_of_month(input.due_day, "dueDay")?;

    let body = request_body(&input, &["id"])?;
    let card = api
        .patch(&format!("/credit-cards/{}", input.id), Some(body))
        .await?;
    Ok(render::success("Credit Card updated", &card))
}

async fn delete_credit_card(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: DeleteCreditCardTool = parse_args(args)?;
    api.delete(&format!("/credit-cards/{}", input.id)).await?;
    Ok(format!("Credit Card deleted successfully (ID: {})", input.id))
}

async fn get_statement(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: GetStatementTool = parse_args(args)?;
    validate::month(&input.month, "month")?;

    let path = path_with_query(
        &format!("/credit-cards/{}/statement", input.id),
        &[("month", Some(input.month.as_str()))],
    );
    let statement = api.get(&path).await?;
    Ok(render::success("Statement", &statement))
}

async fn get_statement_status(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: GetStatementStatusTool = parse_args(args)?;
    validate::month(&input.month, "month")?;

    let path = path_with_query(
        &format!("/credit-cards/{}/statement-status", input.id),
        &[("month", Some(input.month.as_str()))],
    );
    let status = api.get(&path).await?;
    Ok(render::success("Statement status", &status))
}

async fn pay_statement(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: PayStatementTool = parse_args(args)?;
    validate::month(&input.month, "month")?;

    let body = request_body(&input, &["cardId"])?;
    api.post(
        &format!("/credit-cards/{}/pay-statement", input.card_id),
        body,
    )
    .await?;
    Ok(format!("Statement for {} paid successfully.", input.month))
}

async fn reopen_statement(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: ReopenStatementTool = parse_args(args)?;
    validate::month(&input.month, "month")?;

    let path = path_with_query(
        &format!("/credit-cards/{}/reopen-statement", input.id),
        &[("month", Some(input.month.as_str()))],
    );
    api.patch(&path, None).await?;
    Ok(format!("Statement for {} reopened.", input.month))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::api_client::test_support::{RecordedCall, RecordingApi};

    use super::*;

    #[tokio::test]
    async fn create_credit_card_accepts_zero_limit() {
        let api = Arc::new(RecordingApi::returning(json!({"id": "card_1"})));

        let text = create_credit_card(
            api.clone(),
            json!({"name": "Platinum", "limitAmount": 0.0, "closingDay": 5, "dueDay": 15}),
        )
        .await
        .expect("create succeeds");

        assert!(text.starts_with("Credit Card created: "));
        assert_eq!(
            api.calls(),
            vec![RecordedCall {
                method: "POST",
                path: "/credit-cards".to_string(),
                body: Some(
                    json!({"name": "Platinum", "limitAmount": 0.0, "closingDay": 5, "dueDay": 15})
                ),
            }]
        );
    }

    #[tokio::test]
    async fn create_credit_card_rejects_day_out_of_range() {
        let api = Arc::new(RecordingApi::new());

        let error = create_credit_card(
            api.clone(),
            json!({"name": "Platinum", "limitAmount": 1000.0, "closingDay": 32, "dueDay": 15}),
        )
        .await
        .expect_err("day 32 must fail");

        assert!(matches!(error, AppError::Validation { .. }));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn statement_reads_use_month_query() {
        let api = Arc::new(RecordingApi::new());

        get_statement(api.clone(), json!({"id": "card_1", "month": "2026-03"}))
            .await
            .expect("statement succeeds");
        get_statement_status(api.clone(), json!({"id": "card_1", "month": "2026-03"}))
            .await
            .expect("status succeeds");

        let paths: Vec<String> = api.calls().into_iter().map(|call| call.path).collect();
        assert_eq!(
            paths,
            vec![
                "/credit-cards/card_1/statement?month=2026-03".to_string(),
                "/credit-cards/card_1/statement-status?month=2026-03".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn pay_statement_sends_month_and_account_in_body() {
        let api = Arc::new(RecordingApi::new());

        let text = pay_statement(
            api.clone(),
            json!({"cardId": "card_1", "month": "2026-03", "paymentAccountId": "acc_1"}),
        )
        .await
        .expect("pay succeeds");

        assert_eq!(text, "Statement for 2026-03 paid successfully.");
        assert_eq!(
            api.calls(),
            vec![RecordedCall {
                method: "POST",
                path: "/credit-cards/card_1/pay-statement".to_string(),
                body: Some(json!({"month": "2026-03", "paymentAccountId": "acc_1"})),
            }]
        );
    }

    #[tokio::test]
    async fn reopen_statement_is_a_bodyless_patch() {
        let api = Arc::new(RecordingApi::new());

        let text = reopen_statement(api.clone(), json!({"id": "card_1", "month": "2026-03"}))
            .await
            .expect("reopen succeeds");

        assert_eq!(text, "Statement for 2026-03 reopened.");
        assert_eq!(
            api.calls(),
            vec![RecordedCall {
                method: "PATCH",
                path: "/credit-cards/card_1/reopen-statement?month=2026-03".to_string(),
                body: None,
            }]
        );
    }

    #[tokio::test]
    async fn malformed_month_fails_before_any_call() {
        let api = Arc::new(RecordingApi::new());

        let error = get_statement(api.clone(), json!({"id": "card_1", "month": "03/2026"}))
            .await
            .expect_err("malformed month must fail");

        assert!(matches!(error, AppError::Validation { .. }));
        assert!(api.calls().is_empty());
    }
}
