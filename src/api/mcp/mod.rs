mod tools;

use axum::debug_handler;
use axum::extract::{Json as ExtractJson, State as ExtractState};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::Value as JsnVal;

use crate::constant::api::mcp as McpConst;
use crate::constant::app_meta;
use crate::logging::{app_log_event, AppLogLevel};
use crate::AppSharedState;

use super::web::json_resp_headers;

// the tool surface speaks plain JSON-RPC 2.0 over one POST route, the
// protocol handshake below is the minimum an MCP client expects
#[derive(Deserialize)]
struct McpRpcReqDto {
    #[serde(default)]
    id: Option<JsnVal>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    params: Option<JsnVal>,
}

#[derive(Deserialize)]
struct ToolCallParamsDto {
    name: Option<String>,
    #[serde(default)]
    arguments: Option<JsnVal>,
}

fn rpc_result(id: JsnVal, result: JsnVal) -> String {
    let obj = serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result,
    });
    obj.to_string()
}

fn rpc_error(id: JsnVal, code: i64, message: &str) -> String {
    let obj = serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": code, "message": message },
    });
    obj.to_string()
}

fn initialize_result() -> JsnVal {
    serde_json::json!({
        "protocolVersion": McpConst::PROTOCOL_VERSION,
        "capabilities": { "tools": {} },
        "serverInfo": {
            "name": app_meta::LABEL,
            "version": app_meta::VERSION,
        },
    })
}

#[debug_handler(state = AppSharedState)]
pub async fn entry_handler(
    ExtractState(appstate): ExtractState<AppSharedState>,
    ExtractJson(raw): ExtractJson<JsnVal>,
) -> impl IntoResponse {
    let hdr_map = json_resp_headers();
    let logctx = appstate.log_context().clone();
    let req = match serde_json::from_value::<McpRpcReqDto>(raw) {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::WARNING, "rpc parse, {}", e);
            let body = rpc_error(JsnVal::Null, -32700, "Parse error");
            return (StatusCode::OK, hdr_map, body);
        }
    };
    let method = req.method.unwrap_or_default();
    let id = match req.id {
        Some(v) => v,
        // notifications expect no response body at all
        None => return (StatusCode::ACCEPTED, hdr_map, String::new()),
    };
    app_log_event!(logctx, AppLogLevel::DEBUG, "method:{}", method.as_str());
    let body = match method.as_str() {
        "initialize" => rpc_result(id, initialize_result()),
        "ping" => rpc_result(id, serde_json::json!({})),
        "tools/list" => rpc_result(id, serde_json::json!({ "tools": tools::descriptors() })),
        "tools/call" => {
            let params = req
                .params
                .and_then(|p| serde_json::from_value::<ToolCallParamsDto>(p).ok());
            match params.and_then(|p| p.name.map(|n| (n, p.arguments))) {
                Some((name, arguments)) => {
                    let args = arguments.unwrap_or(serde_json::json!({}));
                    let (text, is_error) = tools::invoke(name.as_str(), args, appstate).await;
                    let result = serde_json::json!({
                        "content": [ { "type": "text", "text": text } ],
                        "isError": is_error,
                    });
                    rpc_result(id, result)
                }
                None => rpc_error(id, -32602, "Invalid params"),
            }
        }
        _others => rpc_error(id, -32601, "Method not found"),
    };
    (StatusCode::OK, hdr_map, body)
} // end of fn entry_handler
