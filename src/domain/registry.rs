//! Tool registry and `tools/call` dispatch
//!
//! Binds each tool name to its schema descriptor and handler. Duplicate names
//! are rejected at registration time, which happens during startup, so a
//! collision is fatal before the server accepts any call. Dispatch is a name
//! lookup, making registration order irrelevant.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use rust_mcp_sdk::schema::{
    CallToolRequestParams, CallToolResult, ContentBlock, TextContent, Tool,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::api_client::ApiTransport;
use crate::domain::render;
use crate::errors::AppError;
use crate::mcp::rpc::{json_rpc_error, json_rpc_error_with_data, json_rpc_result};
use crate::AppState;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate tool name: {0}")]
    DuplicateName(String),
}

type HandlerFuture = Pin<Box<dyn Future<Output = Result<String, AppError>> + Send>>;
type BoxedHandler = Box<dyn Fn(Arc<dyn ApiTransport>, Value) -> HandlerFuture + Send + Sync>;

pub struct ToolEntry {
    tool: Tool,
    handler: BoxedHandler,
}

impl ToolEntry {
    pub fn descriptor(&self) -> &Tool {
        &self.tool
    }

    pub fn invoke(&self, api: Arc<dyn ApiTransport>, args: Value) -> HandlerFuture {
        (self.handler)(api, args)
    }
}

#[derive(Default)]
pub struct ToolRegistry {
    entries: Vec<ToolEntry>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F, Fut>(&mut self, tool: Tool, handler: F) -> Result<(), RegistryError>
    where
        F: Fn(Arc<dyn ApiTransport>, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, AppError>> + Send + 'static,
    {
        let name = tool.name.clone();
        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }

        self.index.insert(name, self.entries.len());
        self.entries.push(ToolEntry {
            tool,
            handler: Box::new(move |api, args| Box::pin(handler(api, args))),
        });
        Ok(())
    }

    pub fn entry(&self, name: &str) -> Option<&ToolEntry> {
        self.index.get(name).map(|position| &self.entries[*position])
    }

    pub fn tools(&self) -> Vec<Tool> {
        self.entries.iter().map(|entry| entry.tool.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Deserializes the caller's argument object into a typed contract. Unknown
/// extra fields are ignored; shape violations surface as a validation failure
/// naming the offending field.
pub fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, AppError> {
    serde_json::from_value(args)
        .map_err(|err| AppError::validation("invalid_arguments", err.to_string()))
}

/// Serializes a validated contract into a request body, dropping the fields
/// already spent on path segments or query parameters and any absent
/// optionals.
pub fn request_body<T: Serialize>(input: &T, strip: &[&str]) -> Result<Value, AppError> {
    let mut value = serde_json::to_value(input)
        .map_err(|err| AppError::unexpected(format!("failed to serialize request body: {err}")))?;

    if let Value::Object(map) = &mut value {
        map.retain(|key, item| !item.is_null() && !strip.contains(&key.as_str()));
    }

    Ok(value)
}

pub async fn handle_tools_call(state: &AppState, id: Option<Value>, params: Option<Value>) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, -32602, "Invalid params");
    };

    let tool_call: CallToolRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
    };

    let Some(entry) = state.registry.entry(&tool_call.name) else {
        return json_rpc_error_with_data(
            id,
            -32601,
            "Method not found",
            Some(json!({
                "code": "tool_not_found",
                "message": "unknown tool name",
                "details": {
                    "name": tool_call.name,
                },
            })),
        );
    };

    let args = Value::Object(tool_call.arguments.unwrap_or_default());
    // Failures become result text through the render chokepoint; they are
    // never protocol-level errors.
    let (text, is_error) = match entry.invoke(state.api.clone(), args).await {
        Ok(text) => (text, None),
        Err(error) => (render::failure(&error), Some(true)),
    };

    json_rpc_result(
        id,
        serde_json::to_value(CallToolResult {
            content: vec![ContentBlock::from(TextContent::new(text, None, None))],
            is_error,
            meta: None,
            structured_content: None,
        })
        .expect("tool result serialization"),
    )
}
