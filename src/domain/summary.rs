//! Monthly summary tool

use std::sync::Arc;

use rust_mcp_sdk::macros;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api_client::ApiTransport;
use crate::domain::query::path_with_query;
use crate::domain::registry::{parse_args, RegistryError, ToolRegistry};
use crate::domain::{render, validate};
use crate::errors::AppError;

#[macros::mcp_tool(
    name = "get_summary",
    description = "Get the financial summary (income, expenses, balance) for a month"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetSummaryTool {
    pub month: String,
}

pub fn register_tools(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(GetSummaryTool::tool(), get_summary)?;
    Ok(())
}

async fn get_summary(api: Arc<dyn ApiTransport>, args: Value) -> Result<String, AppError> {
    let input: GetSummaryTool = parse_args(args)?;
    validate::month(&input.month, "month")?;

    let path = path_with_query("/summary", &[("month", Some(input.month.as_str()))]);
    let summary = api.get(&path).await?;
    Ok(render::success(
        &format!("Summary for {}", input.month),
        &summary,
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::api_client::test_support::{RecordedCall, RecordingApi};

    use super::*;

    #[tokio::test]
    async fn summary_requires_month_query() {
        let api = Arc::new(RecordingApi::returning(
            json!({"income": 100.0, "expenses": 40.0}),
        ));

        let text = get_summary(api.clone(), json!({"month": "2026-03"}))
            .await
            .expect("summary succeeds");

        assert!(text.starts_with("Summary for 2026-03: "));
        assert_eq!(
            api.calls(),
            vec![RecordedCall {
                method: "GET",
                path: "/summary?month=2026-03".to_string(),
                body: None,
            }]
        );
    }

    #[tokio::test]
    async fn summary_rejects_missing_month() {
        let api = Arc::new(RecordingApi::new());

        let error = get_summary(api.clone(), json!({}))
            .await
            .expect_err("missing month must fail");

        assert!(matches!(error, AppError::Validation { .. }));
        assert!(api.calls().is_empty());
    }
}
