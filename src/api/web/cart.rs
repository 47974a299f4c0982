use std::str::FromStr;

use axum::debug_handler;
use axum::extract::{Json as ExtractJson, Path as ExtractPath, State as ExtractState};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::logging::{app_log_event, AppLogLevel};
use crate::model::CartIdentifier;
use crate::repository::{app_repo_cart, app_repo_product};
use crate::usecase::{
    AddCartItemUcResult, AddCartItemUseCase, CreateCartUcResult, CreateCartUseCase,
    RemoveCartItemUcResult, RemoveCartItemUseCase, RetrieveCartUcResult, RetrieveCartUseCase,
    UpdateCartItemUcResult, UpdateCartItemUseCase,
};
use crate::AppSharedState;

use super::dto::{
    msg, CartDetailRespDto, CartItemQtyDto, CartItemReqDto, CartItemRespDto, CartRespDto,
};
use super::{error_body, json_resp_headers};

#[debug_handler(state = AppSharedState)]
pub(super) async fn create_handler(
    ExtractState(appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let hdr_map = json_resp_headers();
    let logctx = appstate.log_context().clone();
    let repo = match app_repo_cart(appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            let body = error_body(format!("Error al crear el carrito: {}", e));
            return (StatusCode::INTERNAL_SERVER_ERROR, hdr_map, body);
        }
    };
    let uc = CreateCartUseCase { repo };
    let (status, resp_body) = match uc.execute().await {
        CreateCartUcResult::Success(m) => {
            let obj = CartRespDto {
                message: msg::CART_CREATED.to_string(),
                data: m.into(),
            };
            (StatusCode::CREATED, serde_json::to_string(&obj).unwrap())
        }
        CreateCartUcResult::ServerError(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            let body = error_body(format!("Error al crear el carrito: {}", e));
            (StatusCode::INTERNAL_SERVER_ERROR, body)
        }
    };
    (status, hdr_map, resp_body)
} // end of fn create_handler

#[debug_handler(state = AppSharedState)]
pub(super) async fn add_handler(
    ExtractPath(cart_id_raw): ExtractPath<String>,
    ExtractState(appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<CartItemReqDto>,
) -> impl IntoResponse {
    let hdr_map = json_resp_headers();
    let logctx = appstate.log_context().clone();
    let cart_id = match CartIdentifier::from_str(cart_id_raw.as_str()) {
        Ok(v) => v,
        Err(_e) => {
            let body = error_body(msg::CART_ID_INVALID.to_string());
            return (StatusCode::BAD_REQUEST, hdr_map, body);
        }
    };
    let (c_repo, p_repo) = match (
        app_repo_cart(appstate.datastore()).await,
        app_repo_product(appstate.datastore()).await,
    ) {
        (Ok(c), Ok(p)) => (c, p),
        (Err(e), _) | (_, Err(e)) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            let body = error_body(format!("Error al agregar item al carrito: {}", e));
            return (StatusCode::INTERNAL_SERVER_ERROR, hdr_map, body);
        }
    };
    let uc = AddCartItemUseCase {
        c_repo,
        p_repo,
        chat_relay: appstate.chat_relay(),
        log_ctx: logctx.clone(),
    };
    let (status, resp_body) = match uc.execute(cart_id, req_body).await {
        AddCartItemUcResult::Created(line) => {
            let obj = CartItemRespDto {
                message: msg::ITEM_ADDED.to_string(),
                data: line.into(),
            };
            (StatusCode::CREATED, serde_json::to_string(&obj).unwrap())
        }
        AddCartItemUcResult::Updated(line) => {
            let obj = CartItemRespDto {
                message: msg::ITEM_MERGED.to_string(),
                data: line.into(),
            };
            (StatusCode::OK, serde_json::to_string(&obj).unwrap())
        }
        AddCartItemUcResult::CartNotFound(id_) => (
            StatusCode::NOT_FOUND,
            error_body(msg::cart_not_found(&id_)),
        ),
        AddCartItemUcResult::VariantNotFound(id_) => (
            StatusCode::NOT_FOUND,
            error_body(msg::variant_not_found(id_)),
        ),
        AddCartItemUcResult::InvalidRequest => (
            StatusCode::BAD_REQUEST,
            error_body(msg::ITEM_BODY_REQUIRED.to_string()),
        ),
        AddCartItemUcResult::InsufficientStock { available } => (
            StatusCode::BAD_REQUEST,
            error_body(msg::insufficient_stock(available)),
        ),
        AddCartItemUcResult::ServerError(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            let body = error_body(format!("Error al agregar item al carrito: {}", e));
            (StatusCode::INTERNAL_SERVER_ERROR, body)
        }
    };
    (status, hdr_map, resp_body)
} // end of fn add_handler

#[debug_handler(state = AppSharedState)]
pub(super) async fn retrieve_handler(
    ExtractPath(cart_id_raw): ExtractPath<String>,
    ExtractState(appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let hdr_map = json_resp_headers();
    let logctx = appstate.log_context().clone();
    let cart_id = match CartIdentifier::from_str(cart_id_raw.as_str()) {
        Ok(v) => v,
        Err(_e) => {
            let body = error_body(msg::CART_ID_INVALID.to_string());
            return (StatusCode::BAD_REQUEST, hdr_map, body);
        }
    };
    let repo = match app_repo_cart(appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            let body = error_body(format!("Error al obtener items del carrito: {}", e));
            return (StatusCode::INTERNAL_SERVER_ERROR, hdr_map, body);
        }
    };
    let uc = RetrieveCartUseCase { repo };
    let (status, resp_body) = match uc.execute(cart_id).await {
        RetrieveCartUcResult::Success(summary) => {
            let obj = CartDetailRespDto {
                data: summary.into(),
            };
            (StatusCode::OK, serde_json::to_string(&obj).unwrap())
        }
        RetrieveCartUcResult::NotFound(id_) => (
            StatusCode::NOT_FOUND,
            error_body(msg::cart_not_found(&id_)),
        ),
        RetrieveCartUcResult::ServerError(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            let body = error_body(format!("Error al obtener items del carrito: {}", e));
            (StatusCode::INTERNAL_SERVER_ERROR, body)
        }
    };
    (status, hdr_map, resp_body)
} // end of fn retrieve_handler

#[debug_handler(state = AppSharedState)]
pub(super) async fn update_handler(
    ExtractPath((cart_id_raw, item_id_raw)): ExtractPath<(String, String)>,
    ExtractState(appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<CartItemQtyDto>,
) -> impl IntoResponse {
    let hdr_map = json_resp_headers();
    let logctx = appstate.log_context().clone();
    let parsed = (
        CartIdentifier::from_str(cart_id_raw.as_str()),
        item_id_raw.parse::<u64>(),
    );
    let (cart_id, item_id) = match parsed {
        (Ok(c), Ok(i)) => (c, i),
        _others => {
            let body = error_body(msg::CART_OR_ITEM_ID_INVALID.to_string());
            return (StatusCode::BAD_REQUEST, hdr_map, body);
        }
    };
    let (c_repo, p_repo) = match (
        app_repo_cart(appstate.datastore()).await,
        app_repo_product(appstate.datastore()).await,
    ) {
        (Ok(c), Ok(p)) => (c, p),
        (Err(e), _) | (_, Err(e)) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            let body = error_body(format!("Error al actualizar el item: {}", e));
            return (StatusCode::INTERNAL_SERVER_ERROR, hdr_map, body);
        }
    };
    let uc = UpdateCartItemUseCase { c_repo, p_repo };
    let (status, resp_body) = match uc.execute(cart_id.clone(), item_id, req_body).await {
        UpdateCartItemUcResult::Success(line) => {
            let obj = CartItemRespDto {
                message: msg::ITEM_UPDATED.to_string(),
                data: line.into(),
            };
            (StatusCode::OK, serde_json::to_string(&obj).unwrap())
        }
        UpdateCartItemUcResult::InvalidRequest => (
            StatusCode::BAD_REQUEST,
            error_body(msg::QTY_REQUIRED.to_string()),
        ),
        UpdateCartItemUcResult::NotFound => (
            StatusCode::NOT_FOUND,
            error_body(msg::item_not_found(&cart_id, item_id)),
        ),
        UpdateCartItemUcResult::InsufficientStock { available } => (
            StatusCode::BAD_REQUEST,
            error_body(msg::insufficient_stock(available)),
        ),
        UpdateCartItemUcResult::ServerError(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            let body = error_body(format!("Error al actualizar el item: {}", e));
            (StatusCode::INTERNAL_SERVER_ERROR, body)
        }
    };
    (status, hdr_map, resp_body)
} // end of fn update_handler

#[debug_handler(state = AppSharedState)]
pub(super) async fn remove_handler(
    ExtractPath((cart_id_raw, item_id_raw)): ExtractPath<(String, String)>,
    ExtractState(appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let hdr_map = json_resp_headers();
    let logctx = appstate.log_context().clone();
    let parsed = (
        CartIdentifier::from_str(cart_id_raw.as_str()),
        item_id_raw.parse::<u64>(),
    );
    let (cart_id, item_id) = match parsed {
        (Ok(c), Ok(i)) => (c, i),
        _others => {
            let body = error_body(msg::CART_OR_ITEM_ID_INVALID.to_string());
            return (StatusCode::BAD_REQUEST, hdr_map, body);
        }
    };
    let repo = match app_repo_cart(appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            let body = error_body(format!("Error al eliminar el item: {}", e));
            return (StatusCode::INTERNAL_SERVER_ERROR, hdr_map, body);
        }
    };
    let uc = RemoveCartItemUseCase { repo };
    let (status, resp_body) = match uc.execute(cart_id.clone(), item_id).await {
        RemoveCartItemUcResult::Success => {
            let obj = super::dto::MessageRespDto {
                message: msg::ITEM_REMOVED.to_string(),
            };
            (StatusCode::OK, serde_json::to_string(&obj).unwrap())
        }
        RemoveCartItemUcResult::NotFound => (
            StatusCode::NOT_FOUND,
            error_body(msg::item_not_found(&cart_id, item_id)),
        ),
        RemoveCartItemUcResult::ServerError(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            let body = error_body(format!("Error al eliminar el item: {}", e));
            (StatusCode::INTERNAL_SERVER_ERROR, body)
        }
    };
    (status, hdr_map, resp_body)
} // end of fn remove_handler
