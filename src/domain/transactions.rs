//! Transaction tools
//!
//! Income/expense bookkeeping operations. Recurring entries carry a `mode`
//! on update/delete selecting the affected occurrences (SINGLE is the
//! upstream default and is therefore never sent explicitly). `anticipate`
//! settles an installment early; the upstream API records that as a linked
//! income/expense pair from this single call.

use std::sync::Arc;

use rust_mcp_sdk::macros;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api_client::ApiTransport;
use crate::domain::query::path_with_query;
use crate::domain::registry::{parse_args, request_body, RegistryError, ToolRegistry};
use crate::domain::{render, validate};
use crate::errors::AppError;

const RECURRENCE_FIELDS: [&str; 3] = [
    "recurrenceFrequency",
    "recurrenceInterval",
    "recurrenceEndDate",
];

#[macros::mcp_tool(
    name = "create_transaction",
    description = "Record a new income or expense"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionTool {
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub name: String,
    pub amount: f64,
    pub date: String,
    pub category_id: Option<String>,
    pub payment_method: Option<String>,
    pub credit_card_id: Option<String>,
    pub account_id: Option<String>,
    pub installments: Option<u32>,
    pub target_due_month: Option<String>,
    pub recurrence_frequency: Option<String>,
    pub recurrence_interval: Option<u32>,
    pub recurrence_end_date: Option<String>,
}

#[macros::mcp_tool(
    name = "get_transactions",
    description = "List transactions, optionally for a specific month"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetTransactionsTool {
    pub month: Option<String>,
}

#[macros::mcp_tool(
    name = "get_transaction",
    description = "Get details of a specific transaction by ID"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetTransactionTool {
    pub id: String,
}

#[macros::mcp_tool(
    name = "update_transaction",
    description = "Update a transaction. For recurring entries, mode selects the affected occurrences (SINGLE, PENDING or ALL; defaults to SINGLE)"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionTool {
    pub id: String,
    pub mode: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<String>,
    pub category_id: Option<String>,
    pub payment_method: Option<String>,
    pub credit_card_id: Option<String>,
    pub account_id: Option<String>,
    pub target_due_month: Option<String>,
    pub recurrence_frequency: Option<String>,
    pub recurrence_interval: Option<u32>,
    pub recurrence_end_date: Option<String>,
}

#[macros::mcp_tool(
    name = "pay_transaction",
    description = "Mark a transaction as paid/received"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct PayTransactionTool {
    pub id: String,
}

#[macros::mcp_tool(
    name = "unpay_transaction",
    description = "Mark a transaction as not paid yet"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct UnpayTransactionTool {
    pub id: String,
}

#[macros::mcp_tool(
    name = "delete_transaction",
    description = "Delete a transaction. For recurring entries, mode selects the affected occurrences (SINGLE, PENDING or ALL; defaults to SINGLE)"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct DeleteTransactionTool {
    pub id: String,
    pub mode: Option<String>,
}

#[macros::mcp_tool(
    name = "anticipate_transaction",
    description = "Settle a future installment early; the upstream API records the anticipation as a linked income/expense pair"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct AnticipateTransactionTool {
    pub id: String,
    pub date: Option<String>,
}

pub fn register_tools(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(CreateTransactionTool::tool(), create_transaction)?;
    registry.register(GetTransactionsTool::tool(), get_transactions)?;
    registry.register(GetTransactionTool::tool(), get_transaction)?;
    registry.register(UpdateTransactionTool::tool(), update_transaction)?;
    registry.register(PayTransactionTool::tool(), pay_transaction)?;
    registry.register(UnpayTransactionTool::tool(), unpay_transaction)?;
    registry.register(DeleteTransactionTool::tool(), delete_transaction)?;
    registry.register(AnticipateTransactionTool::tool(), anticipate_transaction)?;
    Ok(())
}

/// Reassembles the nested `recurrence` object the upstream API expects from
/// the flat contract fields. `require_frequency` distinguishes create (a
/// recurrence must name its frequency) from update (partial edits allowed).
fn recurrence_object(
    frequency: Option<&str>,
    interval: Option<u32>,
    end_date: Option<&str>,
    require_frequency: bool,
) -> Result<Option<Value>, AppError> {
    if frequency.is_none() && interval.is_none() && end_date.is_none() {
        return Ok(None);
    }

    validate::opt_one_of(
        frequency,
        &validate::RECURRENCE_FREQUENCIES,
        "invalid_recurrence",
        "recurrenceFrequency",
    )?;
    if require_frequency && frequency.is_none() {
        return Err(AppError::validation(
            "invalid_recurrence",
            "recurrenceFrequency is required when recurrence fields are provided",
        ));
    }
    validate::opt_at_least_one(interval, "recurrenceInterval")?;
    validate::opt_date(end_date, "recurrenceEndDate")?;

    let mut recurrence = Map::new();
    if let Some(frequency) = frequency {
        recurrence.insert("frequency".to_string(), Value::String(frequency.to_string()));
    }
    if let Some(interval) = interval {
        recurrence.insert("interval".to_string(), Value::from(interval));
    }
    if let Some(end_date) = end_date {
        recurrence.insert("endDate".to_string(), Value::String(end_date.to_string()));
    }
    Ok(Some(Value::Object(recurrence)))
}

fn attach_recurrence(body: &mut Value, recurrence: Option<Value>) {
    if let (Value::Object(map), Some(recurrence)) = (body, recurrence) {
        map.insert("recurrence".to_string(), recurrence);
    }
}

async fn create_transaction(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: CreateTransactionTool = parse_args(args)?;
    validate::one_of(
        &input.transaction_type,
        &validate::TRANSACTION_TYPES,
        "invalid_type",
        "type",
    )?;
    validate::positive_amount(input.amount, "amount")?;
    validate::date(&input.date, "date")?;
    validate::opt_one_of(
        input.payment_method.as_deref(),
        &validate::PAYMENT_METHODS,
        "invalid_payment_method",
        "paymentMethod",
    )?;
    validate::opt_at_least_one(input.installments, "installments")?;
    validate::opt_month(input.target_due_month.as_deref(), "targetDueMonth")?;
    let recurrence = recurrence_object(
        input.recurrence_frequency.as_deref(),
        input.recurrence_interval,
        input.recurrence_end_date.as_deref(),
        true,
    )?;

    let mut body = request_body(&input, &RECURRENCE_FIELDS)?;
    attach_recurrence(&mut body, recurrence);
    let transaction = api.post("/transactions", body).await?;
    Ok(render::success("Transaction created", &transaction))
}

async fn get_transactions(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: GetTransactionsTool = parse_args(args)?;
    validate::opt_month(input.month.as_deref(), "month")?;

    let path = path_with_query("/transactions", &[("month", input.month.as_deref())]);
    let transactions = api.get(&path).await?;
    Ok(render::success("Transactions", &transactions))
}

async fn get_transaction(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: GetTransactionTool = parse_args(args)?;
    let transaction = api.get(&format!("/transactions/{}", input.id)).await?;
    Ok(render::success("Transaction", &transaction))
}

async fn update_transaction(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: UpdateTransactionTool = parse_args(args)?;
    validate::opt_one_of(
        input.mode.as_deref(),
        &validate::EDIT_MODES,
        "invalid_mode",
        "mode",
    )?;
    validate::opt_one_of(
        input.transaction_type.as_deref(),
        &validate::TRANSACTION_TYPES,
        "invalid_type",
        "type",
    )?;
    validate::opt_positive_amount(input.amount, "amount")?;
    validate::opt_date(input.date.as_deref(), "date")?;
    validate::opt_one_of(
        input.payment_method.as_deref(),
        &validate::PAYMENT_METHODS,
        "invalid_payment_method",
        "paymentMethod",
    )?;
    validate::opt_month(input.target_due_month.as_deref(), "targetDueMonth")?;
    let recurrence = recurrence_object(
        input.recurrence_frequency.as_deref(),
        input.recurrence_interval,
        input.recurrence_end_date.as_deref(),
        false,
    )?;

    let path = path_with_query(
        &format!("/transactions/{}", input.id),
        &[("mode", input.mode.as_deref())],
    );
    let mut strip = vec!["id", "mode"];
    strip.extend_from_slice(&RECURRENCE_FIELDS);
    let mut body = request_body(&input, &strip)?;
    attach_recurrence(&mut body, recurrence);
    let transaction = api.patch(&path, Some(body)).await?;
    Ok(render::success("Transaction updated", &transaction))
}

async fn pay_transaction(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: PayTransactionTool = parse_args(args)?;
    api.patch(&format!("/transactions/{}/pay", input.id), None)
        .await?;
    Ok(format!("Transaction {} marked as paid.", input.id))
}

async fn unpay_transaction(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: UnpayTransactionTool = parse_args(args)?;
    api.patch(&format!("/transactions/{}/unpay", input.id), None)
        .await?;
    Ok(format!("Transaction {} marked as unpaid.", input.id))
}

async fn delete_transaction(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: DeleteTransactionTool = parse_args(args)?;
    validate::opt_one_of(
        input.mode.as_deref(),
        &validate::EDIT_MODES,
        "invalid_mode",
        "mode",
    )?;

    let path = path_with_query(
        &format!("/transactions/{}", input.id),
        &[("mode", input.mode.as_deref())],
    );
    api.delete(&path).await?;
    Ok(format!("Transaction {} deleted.", input.id))
}

async fn anticipate_transaction(
    api: Arc<dyn ApiTransport>,
    args: Value,
) -> Result<String, AppError> {
    let input: AnticipateTransactionTool = parse_args(args)?;
    validate::opt_date(input.date.as_deref(), "date")?;

    let body = request_body(&input, &["id"])?;
    let result = api
        .post(&format!("/transactions/{}/anticipate", input.id), body)
        .await?;
    Ok(render::success("Transaction anticipated", &result))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::api_client::test_support::{RecordedCall, RecordingApi};

    use super::*;

    #[tokio::test]
    async fn create_transaction_posts_validated_body() {
        let api = Arc::new(RecordingApi::returning(json!({"id": "tx_1"})));

        let text = create_transaction(
            api.clone(),
            json!({"type": "EXPENSE", "name": "Lunch", "amount": 20.0, "date": "2026-03-01"}),
        )
        .await
        .expect("create succeeds");

        assert!(text.starts_with("Transaction created: "));
        assert_eq!(
            api.calls(),
            vec![RecordedCall {
                method: "POST",
                path: "/transactions".to_string(),
                body: Some(
                    json!({"type": "EXPENSE", "name": "Lunch", "amount": 20.0, "date": "2026-03-01"})
                ),
            }]
        );
    }

    #[tokio::test]
    async fn create_transaction_nests_recurrence_fields() {
        let api = Arc::new(RecordingApi::new());

        create_transaction(
            api.clone(),
            json!({
                "type": "EXPENSE",
                "name": "Rent",
                "amount": 1200.0,
                "date": "2026-03-05",
                "recurrenceFrequency": "MONTHLY",
                "recurrenceInterval": 1
            }),
        )
        .await
        .expect("create succeeds");

        let calls = api.calls();
        let body = calls[0].body.as_ref().expect("body present");
        assert_eq!(
            body["recurrence"],
            json!({"frequency": "MONTHLY", "interval": 1})
        );
        assert!(body.get("recurrenceFrequency").is_none());
    }

    #[tokio::test]
    async fn create_transaction_rejects_recurrence_without_frequency() {
        let api = Arc::new(RecordingApi::new());

        let error = create_transaction(
            api.clone(),
            json!({
                "type": "EXPENSE",
                "name": "Rent",
                "amount": 1200.0,
                "date": "2026-03-05",
                "recurrenceInterval": 2
            }),
        )
        .await
        .expect_err("recurrence without frequency must fail");

        assert!(matches!(error, AppError::Validation { .. }));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn create_transaction_rejects_non_positive_amount() {
        let api = Arc::new(RecordingApi::new());

        let error = create_transaction(
            api.clone(),
            json!({"type": "EXPENSE", "name": "Lunch", "amount": 0.0, "date": "2026-03-01"}),
        )
        .await
        .expect_err("zero amount must fail");

        assert!(matches!(error, AppError::Validation { .. }));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn get_transactions_appends_month_only_when_present() {
        let api = Arc::new(RecordingApi::new());

        get_transactions(api.clone(), json!({"month": "2026-03"}))
            .await
            .expect("filtered list succeeds");
        get_transactions(api.clone(), json!({}))
            .await
            .expect("unfiltered list succeeds");

        let paths: Vec<String> = api.calls().into_iter().map(|call| call.path).collect();
        assert_eq!(
            paths,
            vec![
                "/transactions?month=2026-03".to_string(),
                "/transactions".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn identical_reads_produce_identical_requests() {
        let api = Arc::new(RecordingApi::new());

        for _ in 0..3 {
            get_transactions(api.clone(), json!({"month": "2026-03"}))
                .await
                .expect("list succeeds");
        }

        let calls = api.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|call| call == &calls[0]));
    }

    #[tokio::test]
    async fn update_transaction_sends_mode_as_query_not_body() {
        let api = Arc::new(RecordingApi::new());

        update_transaction(
            api.clone(),
            json!({"id": "tx_1", "mode": "PENDING", "amount": 42.5}),
        )
        .await
        .expect("update succeeds");

        assert_eq!(
            api.calls(),
            vec![RecordedCall {
                method: "PATCH",
                path: "/transactions/tx_1?mode=PENDING".to_string(),
                body: Some(json!({"amount": 42.5})),
            }]
        );
    }

    #[tokio::test]
    async fn pay_and_unpay_are_bodyless_transitions() {
        let api = Arc::new(RecordingApi::new());

        let paid = pay_transaction(api.clone(), json!({"id": "tx_1"}))
            .await
            .expect("pay succeeds");
        let unpaid = unpay_transaction(api.clone(), json!({"id": "tx_1"}))
            .await
            .expect("unpay succeeds");

        assert_eq!(paid, "Transaction tx_1 marked as paid.");
        assert_eq!(unpaid, "Transaction tx_1 marked as unpaid.");
        assert_eq!(
            api.calls(),
            vec![
                RecordedCall {
                    method: "PATCH",
                    path: "/transactions/tx_1/pay".to_string(),
                    body: None,
                },
                RecordedCall {
                    method: "PATCH",
                    path: "/transactions/tx_1/unpay".to_string(),
                    body: None,
                },
            ]
        );
    }

    #[tokio::test]
    async fn delete_transaction_omits_mode_when_absent() {
        let api = Arc::new(RecordingApi::new());

        delete_transaction(api.clone(), json!({"id": "tx_1"}))
            .await
            .expect("delete succeeds");

        assert_eq!(
            api.calls(),
            vec![RecordedCall {
                method: "DELETE",
                path: "/transactions/tx_1".to_string(),
                body: None,
            }]
        );
    }

    #[tokio::test]
    async fn delete_transaction_appends_explicit_mode() {
        let api = Arc::new(RecordingApi::new());

        delete_transaction(api.clone(), json!({"id": "tx_1", "mode": "ALL"}))
            .await
            .expect("delete succeeds");

        assert_eq!(api.calls()[0].path, "/transactions/tx_1?mode=ALL");
    }

    #[tokio::test]
    async fn delete_transaction_rejects_unknown_mode() {
        let api = Arc::new(RecordingApi::new());

        let error = delete_transaction(api.clone(), json!({"id": "tx_1", "mode": "EVERYTHING"}))
            .await
            .expect_err("unknown mode must fail");

        assert!(matches!(error, AppError::Validation { .. }));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn anticipate_issues_exactly_one_call() {
        let api = Arc::new(RecordingApi::returning(json!({"pairId": "pair_1"})));

        anticipate_transaction(api.clone(), json!({"id": "tx_1", "date": "2026-03-10"}))
            .await
            .expect("anticipate succeeds");

        assert_eq!(
            api.calls(),
            vec![RecordedCall {
                method: "POST",
                path: "/transactions/tx_1/anticipate".to_string(),
                body: Some(json!({"date": "2026-03-10"})),
            }]
        );
    }
}
