use axum::body::Bytes as BodyBytes;
use axum::debug_handler;
use axum::extract::{Json as ExtractJson, State as ExtractState};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::Value as JsnVal;

use crate::logging::{app_log_event, AppLogLevel};
use crate::usecase::{HandoffReason, RequestHumanAgentUseCase, RequestHumanUcResult};
use crate::AppSharedState;

use super::dto::{msg, MessageRespDto, RequestHumanReqDto};
use super::{error_body, json_resp_headers};

// inbound chat-platform event, plain webhook variant
#[derive(Deserialize)]
struct ChatEventDto {
    event: Option<String>,
    message_type: Option<String>,
    content: Option<String>,
    conversation: Option<ConversationRefDto>,
    sender: Option<SenderRefDto>,
}

#[derive(Deserialize)]
struct ConversationRefDto {
    id: Option<u64>,
}

#[derive(Deserialize)]
struct SenderRefDto {
    name: Option<String>,
}

// inbound chat-platform event fired by an automation rule, the whole
// payload is forwarded to the external agent verbatim
#[derive(Deserialize)]
struct AutomationEventDto {
    event: Option<String>,
    id: Option<u64>,
    messages: Option<Vec<AutomationMessageDto>>,
}

#[derive(Deserialize)]
struct AutomationMessageDto {
    content: Option<String>,
    message_type: Option<i64>,
    sender: Option<SenderRefDto>,
}

const MSG_TYPE_INCOMING: i64 = 0;

/// Log-only webhook receiver. Whatever happens inside, the chat platform
/// gets a 200 so it never starts a retry storm against this service.
// the two webhook receivers read the raw bytes themselves, a malformed
// body must still end in a 200 rather than an extractor rejection
#[debug_handler(state = AppSharedState)]
pub(super) async fn event_log_handler(
    ExtractState(appstate): ExtractState<AppSharedState>,
    body: BodyBytes,
) -> impl IntoResponse {
    let logctx = appstate.log_context().clone();
    let event = match serde_json::from_slice::<ChatEventDto>(&body) {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::WARNING, "malformed event, {}", e);
            return (StatusCode::OK, "OK - Error interno manejado");
        }
    };
    let is_incoming_message = event.event.as_deref() == Some("message_created")
        && event.message_type.as_deref() == Some("incoming");
    if !is_incoming_message {
        return (StatusCode::OK, "OK - Evento ignorado");
    }
    let conversation_id = event.conversation.and_then(|c| c.id);
    let content = event.content.as_deref();
    if conversation_id.is_none() || content.is_none() {
        return (StatusCode::OK, "OK - Datos incompletos");
    }
    let sender_name = event
        .sender
        .and_then(|s| s.name)
        .unwrap_or("Cliente".to_string());
    app_log_event!(
        logctx,
        AppLogLevel::INFO,
        "conversation:{}, sender:{}, content:{}",
        conversation_id.unwrap(),
        sender_name,
        content.unwrap()
    );
    (StatusCode::OK, "OK - Evento registrado")
} // end of fn event_log_handler

/// Adapter webhook. Forwards the automation payload to the external
/// conversational agent, posts the agent's answer back to the
/// conversation, and answers 200 on every path.
#[debug_handler(state = AppSharedState)]
pub(super) async fn adapter_handler(
    ExtractState(appstate): ExtractState<AppSharedState>,
    body: BodyBytes,
) -> impl IntoResponse {
    let logctx = appstate.log_context().clone();
    let raw = match serde_json::from_slice::<JsnVal>(&body) {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::WARNING, "malformed event, {}", e);
            return (StatusCode::OK, "OK - Error manejado");
        }
    };
    let event = match serde_json::from_value::<AutomationEventDto>(raw.clone()) {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::WARNING, "malformed event, {}", e);
            return (StatusCode::OK, "OK - Error manejado");
        }
    };
    if event.event.as_deref() != Some("automation_event.message_created") {
        return (StatusCode::OK, "OK - Evento ignorado");
    }
    let conversation_id = match event.id {
        Some(v) => v,
        None => return (StatusCode::OK, "OK - Datos incompletos"),
    };
    let first_message = event.messages.as_ref().and_then(|ms| ms.first());
    let incoming = first_message
        .filter(|m| m.message_type == Some(MSG_TYPE_INCOMING))
        .filter(|m| m.content.is_some());
    let message = match incoming {
        Some(m) => m,
        None => return (StatusCode::OK, "OK - No es incoming"),
    };
    let sender_name = message
        .sender
        .as_ref()
        .and_then(|s| s.name.as_deref())
        .unwrap_or("Cliente");
    app_log_event!(
        logctx,
        AppLogLevel::DEBUG,
        "conversation:{}, sender:{}",
        conversation_id,
        sender_name
    );
    let agent = match appstate.agent_relay() {
        Some(a) => a,
        None => {
            // static-reply deployment variant, nothing to forward to
            app_log_event!(logctx, AppLogLevel::INFO, "agent relay not configured");
            return (StatusCode::OK, "OK - Evento registrado");
        }
    };
    let answer = match agent.relay_event(&raw).await {
        Ok(reply) => reply.answer,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            return (StatusCode::OK, "OK - Error al llamar agente");
        }
    };
    let relay = match appstate.chat_relay() {
        Some(r) => r,
        None => {
            app_log_event!(logctx, AppLogLevel::ERROR, "chat relay not configured");
            return (StatusCode::OK, "OK - Error manejado");
        }
    };
    if let Err(e) = relay.send_message(conversation_id, answer.as_str()).await {
        app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
        return (StatusCode::OK, "OK - Error manejado");
    }
    (StatusCode::OK, "OK")
} // end of fn adapter_handler

#[debug_handler(state = AppSharedState)]
pub(super) async fn request_human_handler(
    ExtractState(appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<RequestHumanReqDto>,
) -> impl IntoResponse {
    let hdr_map = json_resp_headers();
    let logctx = appstate.log_context().clone();
    let conversation_id = match req_body.conversation_id {
        Some(v) => v,
        None => {
            let body = error_body(msg::CONVERSATION_ID_REQUIRED.to_string());
            return (StatusCode::BAD_REQUEST, hdr_map, body);
        }
    };
    let reason = match req_body.reason.as_deref() {
        Some(raw) => match HandoffReason::try_parse(raw) {
            Some(r) => Some(r),
            None => {
                let body = error_body(msg::HANDOFF_REASON_INVALID.to_string());
                return (StatusCode::BAD_REQUEST, hdr_map, body);
            }
        },
        None => None,
    };
    let uc = RequestHumanAgentUseCase {
        chat_relay: appstate.chat_relay(),
        log_ctx: logctx.clone(),
    };
    let (status, resp_body) = match uc.execute(conversation_id, reason).await {
        RequestHumanUcResult::Success => {
            let obj = MessageRespDto {
                message: msg::HANDOFF_DONE.to_string(),
            };
            (StatusCode::OK, serde_json::to_string(&obj).unwrap())
        }
        RequestHumanUcResult::RelayFailure(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            let body = error_body(msg::BOT_FLAG_UPDATE_FAILED.to_string());
            (StatusCode::INTERNAL_SERVER_ERROR, body)
        }
    };
    (status, hdr_map, resp_body)
} // end of fn request_human_handler
