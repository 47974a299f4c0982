use axum::debug_handler;
use axum::extract::{Json as ExtractJson, State as ExtractState};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::logging::{app_log_event, AppLogLevel};
use crate::repository::{app_repo_cart, app_repo_client};
use crate::usecase::{ClientSessionUcResult, GetOrCreateClientUseCase};
use crate::AppSharedState;

use super::dto::{msg, ClientSessionReqDto, ClientSessionRespDto};
use super::{error_body, json_resp_headers};

#[debug_handler(state = AppSharedState)]
pub(super) async fn session_handler(
    ExtractState(appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<ClientSessionReqDto>,
) -> impl IntoResponse {
    let hdr_map = json_resp_headers();
    let logctx = appstate.log_context().clone();
    let (cl_repo, c_repo) = match (
        app_repo_client(appstate.datastore()).await,
        app_repo_cart(appstate.datastore()).await,
    ) {
        (Ok(cl), Ok(c)) => (cl, c),
        (Err(e), _) | (_, Err(e)) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            let body = error_body(format!("Error al crear el cliente: {}", e));
            return (StatusCode::INTERNAL_SERVER_ERROR, hdr_map, body);
        }
    };
    let uc = GetOrCreateClientUseCase { cl_repo, c_repo };
    let (status, resp_body) = match uc.execute(req_body).await {
        ClientSessionUcResult::Success {
            client_id,
            cart_id,
            cart_status,
        } => {
            let obj = ClientSessionRespDto {
                client_id,
                cart_id,
                cart_status,
            };
            (StatusCode::OK, serde_json::to_string(&obj).unwrap())
        }
        ClientSessionUcResult::InvalidRequest => (
            StatusCode::BAD_REQUEST,
            error_body(msg::CLIENT_FIELDS_REQUIRED.to_string()),
        ),
        ClientSessionUcResult::ServerError(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            let body = error_body(format!("Error al crear el cliente: {}", e));
            (StatusCode::INTERNAL_SERVER_ERROR, body)
        }
    };
    (status, hdr_map, resp_body)
} // end of fn session_handler
