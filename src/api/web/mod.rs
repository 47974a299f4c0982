use std::collections::HashMap;

use axum::http::{header, HeaderMap, HeaderValue};
use axum::routing::{delete, get, patch, post, MethodRouter};

use crate::constant::api::web as WebConst;
use crate::constant::HTTP_CONTENT_TYPE_JSON;
use crate::{AppSharedState, WebApiHdlrLabel};

mod cart;
mod chat;
mod client;
pub mod dto;
mod product;

pub type ApiRouteType = MethodRouter<AppSharedState>;
pub type ApiRouteTableType = HashMap<WebApiHdlrLabel, ApiRouteType>;

pub fn route_table() -> ApiRouteTableType {
    let mut out: ApiRouteTableType = HashMap::new();
    out.insert(WebConst::CREATE_CART, post(cart::create_handler));
    out.insert(WebConst::ADD_CART_ITEM, post(cart::add_handler));
    out.insert(WebConst::RETRIEVE_CART, get(cart::retrieve_handler));
    out.insert(WebConst::UPDATE_CART_ITEM, patch(cart::update_handler));
    out.insert(WebConst::REMOVE_CART_ITEM, delete(cart::remove_handler));
    out.insert(WebConst::SEARCH_PRODUCTS, get(product::search_handler));
    out.insert(WebConst::PRODUCT_DETAIL, get(product::detail_handler));
    out.insert(WebConst::CLIENT_SESSION, post(client::session_handler));
    out.insert(WebConst::CHAT_EVENT_LOG, post(chat::event_log_handler));
    out.insert(WebConst::CHAT_EVENT_ADAPTER, post(chat::adapter_handler));
    out.insert(
        WebConst::REQUEST_HUMAN_AGENT,
        post(chat::request_human_handler),
    );
    out.insert(WebConst::MCP_ENTRY, post(crate::api::mcp::entry_handler));
    out
}

pub(super) fn json_resp_headers() -> HeaderMap {
    let mut hdr_map = HeaderMap::new();
    let ctype_val = HeaderValue::from_str(HTTP_CONTENT_TYPE_JSON).unwrap();
    hdr_map.insert(header::CONTENT_TYPE, ctype_val);
    hdr_map
}

pub(super) fn error_body(detail: String) -> String {
    let obj = dto::ErrorRespDto { error: detail };
    serde_json::to_string(&obj).unwrap()
}
