use std::sync::Arc;

use crate::error::{AppError, AppErrorCode};
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};
use crate::thirdparty::AbstractChatRelay;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoffReason {
    Reembolso,
    ProductoDanado,
    Otros,
}

impl HandoffReason {
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Reembolso => "reembolso",
            Self::ProductoDanado => "producto_danado",
            Self::Otros => "otros",
        }
    }

    pub fn try_parse(raw: &str) -> Option<Self> {
        match raw {
            "reembolso" => Some(Self::Reembolso),
            "producto_danado" => Some(Self::ProductoDanado),
            "otros" => Some(Self::Otros),
            _others => None,
        }
    }
}

/// Hand one conversation over to a human agent: flip the `bot` custom
/// attribute off so the automation stops answering, then tag the
/// conversation with the handoff labels.
pub struct RequestHumanAgentUseCase {
    pub chat_relay: Option<Arc<Box<dyn AbstractChatRelay>>>,
    pub log_ctx: Arc<AppLogContext>,
}

pub enum RequestHumanUcResult {
    Success,
    RelayFailure(AppError),
}

impl RequestHumanAgentUseCase {
    pub async fn execute(
        self,
        conversation_id: u64,
        reason: Option<HandoffReason>,
    ) -> RequestHumanUcResult {
        let relay = match self.chat_relay.as_ref() {
            Some(r) => r.clone(),
            None => {
                return RequestHumanUcResult::RelayFailure(AppError {
                    code: AppErrorCode::MissingConfig,
                    detail: Some("chat-relay".to_string()),
                })
            }
        };
        // the bot flag is the one step that must succeed, a conversation
        // left with bot=true keeps answering the customer automatically
        let attributes = serde_json::json!({ "bot": false });
        if let Err(e) = relay.update_attributes(conversation_id, attributes).await {
            return RequestHumanUcResult::RelayFailure(e);
        }
        let mut labels = vec!["humano".to_string()];
        if let Some(r) = reason.as_ref() {
            labels.push(r.as_label().to_string());
        }
        if let Err(e) = relay.add_labels(conversation_id, &labels).await {
            let logctx = &self.log_ctx;
            app_log_event!(logctx, AppLogLevel::WARNING, "handoff-labels, {:?}", e);
        }
        RequestHumanUcResult::Success
    } // end of fn execute
} // end of impl RequestHumanAgentUseCase
