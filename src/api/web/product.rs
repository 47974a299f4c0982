use axum::debug_handler;
use axum::extract::{Path as ExtractPath, Query as ExtractQuery, State as ExtractState};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::logging::{app_log_event, AppLogLevel};
use crate::repository::app_repo_product;
use crate::usecase::{
    ListProductsUcResult, ListProductsUseCase, ProductDetailUcResult, ProductDetailUseCase,
};
use crate::AppSharedState;

use super::dto::{
    msg, ProductDetailRespDto, ProductDto, ProductListRespDto, ProductSearchQueryDto,
};
use super::{error_body, json_resp_headers};

#[debug_handler(state = AppSharedState)]
pub(super) async fn search_handler(
    ExtractQuery(params): ExtractQuery<ProductSearchQueryDto>,
    ExtractState(appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let hdr_map = json_resp_headers();
    let logctx = appstate.log_context().clone();
    let repo = match app_repo_product(appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            let body = error_body(format!("Error al obtener productos: {}", e));
            return (StatusCode::INTERNAL_SERVER_ERROR, hdr_map, body);
        }
    };
    let uc = ListProductsUseCase { repo };
    let (status, resp_body) = match uc.execute(params.into()).await {
        ListProductsUcResult::Success(found) => {
            let obj = if found.is_empty() {
                ProductListRespDto {
                    message: msg::PRODUCTS_NONE_FOUND.to_string(),
                    count: None,
                    data: Vec::new(),
                }
            } else {
                ProductListRespDto {
                    message: msg::products_found(found.len()),
                    count: Some(found.len()),
                    data: found.into_iter().map(ProductDto::from).collect(),
                }
            };
            (StatusCode::OK, serde_json::to_string(&obj).unwrap())
        }
        ListProductsUcResult::ServerError(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            let body = error_body(format!("Error al obtener productos: {}", e));
            (StatusCode::INTERNAL_SERVER_ERROR, body)
        }
    };
    (status, hdr_map, resp_body)
} // end of fn search_handler

#[debug_handler(state = AppSharedState)]
pub(super) async fn detail_handler(
    ExtractPath(product_id_raw): ExtractPath<String>,
    ExtractState(appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let hdr_map = json_resp_headers();
    let logctx = appstate.log_context().clone();
    let product_id = match product_id_raw.parse::<u64>() {
        Ok(v) => v,
        Err(_e) => {
            let body = error_body(msg::PRODUCT_ID_INVALID.to_string());
            return (StatusCode::BAD_REQUEST, hdr_map, body);
        }
    };
    let repo = match app_repo_product(appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            let body = error_body(format!("Error al obtener el producto: {}", e));
            return (StatusCode::INTERNAL_SERVER_ERROR, hdr_map, body);
        }
    };
    let uc = ProductDetailUseCase { repo };
    let (status, resp_body) = match uc.execute(product_id).await {
        ProductDetailUcResult::Success(m) => {
            let obj = ProductDetailRespDto { data: m.into() };
            (StatusCode::OK, serde_json::to_string(&obj).unwrap())
        }
        ProductDetailUcResult::NotFound(id_) => (
            StatusCode::NOT_FOUND,
            error_body(msg::product_not_found(id_)),
        ),
        ProductDetailUcResult::ServerError(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            let body = error_body(format!("Error al obtener el producto: {}", e));
            (StatusCode::INTERNAL_SERVER_ERROR, body)
        }
    };
    (status, hdr_map, resp_body)
} // end of fn detail_handler
