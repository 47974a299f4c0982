use axum::extract::{Json as ExtractJson, State as ExtractState};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::{json, Value as JsnVal};

use storefront::api::mcp::entry_handler;
use storefront::repository::ProductInMemRepo;
use storefront::AppSharedState;

use crate::{ut_product_fixtures, ut_setup_share_state};

async fn ut_rpc_roundtrip(state: AppSharedState, req: JsnVal) -> (StatusCode, JsnVal) {
    let resp = entry_handler(ExtractState(state), ExtractJson(req))
        .await
        .into_response();
    let status = resp.status();
    let raw = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if raw.is_empty() {
        JsnVal::Null
    } else {
        serde_json::from_slice::<JsnVal>(&raw).unwrap()
    };
    (status, body)
}

async fn ut_seed_catalog(state: &AppSharedState) {
    let ds = state.datastore().in_mem.clone().unwrap();
    let repo = ProductInMemRepo::new(ds).await.unwrap();
    repo.save_products(ut_product_fixtures()).await.unwrap();
}

#[tokio::test]
async fn initialize_and_list_tools() {
    let state = ut_setup_share_state();
    let req = json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}});
    let (status, body) = ut_rpc_roundtrip(state.clone(), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["serverInfo"]["name"], json!("storefront"));
    assert!(body["result"]["capabilities"]["tools"].is_object());

    let req = json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"});
    let (_status, body) = ut_rpc_roundtrip(state, req).await;
    let tools = body["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 12);
    let names = tools
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect::<Vec<_>>();
    for expect in [
        "list_products",
        "get_product_details",
        "create_cart",
        "add_to_cart",
        "get_cart",
        "update_cart_item",
        "remove_from_cart",
        "get_or_create_client",
        "request_human_agent",
        "send_chatwoot_message",
        "add_conversation_labels",
        "update_conversation_status",
    ] {
        assert!(names.contains(&expect), "missing tool {}", expect);
    }
} // end of fn initialize_and_list_tools

#[tokio::test]
async fn notification_gets_no_body() {
    let state = ut_setup_share_state();
    let req = json!({"jsonrpc": "2.0", "method": "notifications/initialized"});
    let (status, body) = ut_rpc_roundtrip(state, req).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert!(body.is_null());
}

#[tokio::test]
async fn unknown_method_rejected() {
    let state = ut_setup_share_state();
    let req = json!({"jsonrpc": "2.0", "id": 9, "method": "resources/list"});
    let (_status, body) = ut_rpc_roundtrip(state, req).await;
    assert_eq!(body["error"]["code"], json!(-32601));
}

#[tokio::test]
async fn cart_flow_through_tool_calls() {
    let state = ut_setup_share_state();
    ut_seed_catalog(&state).await;
    let req = json!({
        "jsonrpc": "2.0", "id": 10, "method": "tools/call",
        "params": {"name": "create_cart", "arguments": {}}
    });
    let (_status, body) = ut_rpc_roundtrip(state.clone(), req).await;
    assert_eq!(body["result"]["isError"], json!(false));
    let text = body["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("Carrito creado exitosamente"));
    assert!(text.contains("ID del carrito: 1"));

    let req = json!({
        "jsonrpc": "2.0", "id": 11, "method": "tools/call",
        "params": {"name": "add_to_cart", "arguments": {"cartId": 1, "productVariantId": 5002, "qty": 2}}
    });
    let (_status, body) = ut_rpc_roundtrip(state.clone(), req).await;
    assert_eq!(body["result"]["isError"], json!(false));
    let text = body["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("Producto agregado al carrito exitosamente"));

    // the same variant again exceeding stock surfaces the localized error
    let req = json!({
        "jsonrpc": "2.0", "id": 12, "method": "tools/call",
        "params": {"name": "add_to_cart", "arguments": {"cartId": "1", "productVariantId": 5002, "qty": 9}}
    });
    let (_status, body) = ut_rpc_roundtrip(state.clone(), req).await;
    assert_eq!(body["result"]["isError"], json!(true));
    let text = body["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("Error: Stock insuficiente"));

    let req = json!({
        "jsonrpc": "2.0", "id": 13, "method": "tools/call",
        "params": {"name": "get_cart", "arguments": {"cartId": 1}}
    });
    let (_status, body) = ut_rpc_roundtrip(state, req).await;
    assert_eq!(body["result"]["isError"], json!(false));
    let text = body["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("Total de items: 1"));
    assert!(text.contains("Total: $20"));
} // end of fn cart_flow_through_tool_calls

#[tokio::test]
async fn tool_without_relay_reports_error() {
    let state = ut_setup_share_state();
    let req = json!({
        "jsonrpc": "2.0", "id": 20, "method": "tools/call",
        "params": {"name": "send_chatwoot_message", "arguments": {"conversationId": 5, "message": "hola"}}
    });
    let (_status, body) = ut_rpc_roundtrip(state, req).await;
    assert_eq!(body["result"]["isError"], json!(true));
}
