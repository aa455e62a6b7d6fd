//! JSON-RPC envelope helpers
//!
//! Builds conformant result and error payloads and maps `AppError` onto the
//! protocol error space. Tool-level failures never pass through here; they
//! render as result text. Only envelope and transport problems become
//! protocol errors.

use rust_mcp_sdk::schema::{
    JsonrpcErrorResponse, JsonrpcResultResponse, RequestId, Result as McpResult, RpcError,
};
use serde_json::{json, Value};

use crate::errors::AppError;

pub fn is_json_rpc_error(value: &Value) -> bool {
    value.get("error").is_some()
}

pub fn app_error_to_json_rpc(id: Option<Value>, err: AppError) -> Value {
    match err {
        AppError::Validation { code, message } => json_rpc_error_with_data(
            id,
            -32602,
            "Invalid params",
            Some(json!({
                "code": code,
                "message": message,
                "details": {}
            })),
        ),
        AppError::Unauthorized { code, message } => json_rpc_error_with_data(
            id,
            -32001,
            "Unauthorized",
            Some(json!({
                "code": code,
                "message": message,
                "details": {}
            })),
        ),
        AppError::Api { .. } | AppError::Transport { .. } | AppError::Unexpected { .. } => {
            json_rpc_error(id, -32603, "Internal error")
        }
    }
}

pub fn json_rpc_error(id: Option<Value>, code: i32, message: &str) -> Value {
    json_rpc_error_with_data(id, code, message, None)
}

pub fn json_rpc_error_with_data(
    id: Option<Value>,
    code: i32,
    message: &str,
    data: Option<Value>,
) -> Value {
    let response = JsonrpcErrorResponse::new(
        RpcError {
            code: i64::from(code),
            data,
            message: message.to_string(),
        },
        id.as_ref().and_then(value_to_request_id),
    );
    serde_json::to_value(response).expect("jsonrpc error response serialization")
}

pub fn json_rpc_result(id: Option<Value>, result: Value) -> Value {
    if let Some(request_id) = id.as_ref().and_then(value_to_request_id) {
        let extra = result.as_object().cloned();
        let response = JsonrpcResultResponse::new(request_id, McpResult { meta: None, extra });
        return serde_json::to_value(response).expect("jsonrpc result response serialization");
    }

    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    })
}

pub fn value_to_request_id(value: &Value) -> Option<RequestId> {
    if let Some(string_id) = value.as_str() {
        return Some(RequestId::String(string_id.to_string()));
    }

    value.as_i64().map(RequestId::Integer)
}

pub fn request_id_to_value(id: RequestId) -> Value {
    match id {
        RequestId::String(value) => Value::String(value),
        RequestId::Integer(value) => Value::Number(value.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_invalid_params() {
        let response = app_error_to_json_rpc(
            Some(json!(1)),
            AppError::validation("invalid_month", "month must be in YYYY-MM format"),
        );

        assert_eq!(response["error"]["code"], json!(-32602));
        assert_eq!(response["error"]["data"]["code"], json!("invalid_month"));
    }

    #[test]
    fn upstream_errors_map_to_internal_error_without_detail() {
        let response = app_error_to_json_rpc(Some(json!(1)), AppError::api(502, "Bad Gateway"));

        assert_eq!(response["error"]["code"], json!(-32603));
        assert!(response["error"]["data"].is_null());
    }

    #[test]
    fn result_keeps_string_and_integer_ids() {
        let by_int = json_rpc_result(Some(json!(7)), json!({"ok": true}));
        assert_eq!(by_int["id"], json!(7));

        let by_string = json_rpc_result(Some(json!("req-1")), json!({"ok": true}));
        assert_eq!(by_string["id"], json!("req-1"));
    }
}
