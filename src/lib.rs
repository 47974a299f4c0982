use std::result::Result as DefaultResult;
use std::sync::Arc;

pub mod api;
pub mod confidentiality;
pub mod constant;
pub mod error;
pub mod logging;
pub mod model;
pub mod network;
pub mod repository;
pub mod usecase;

mod config;
pub use config::{
    ApiServerCfg, App3rdPartyCfg, AppBasepathCfg, AppConfidentialCfg, AppConfig, AppDataStoreCfg,
    AppInMemoryDbCfg, AppLogHandlerCfg, AppLoggerCfg, AppLoggingCfg, AppRestStoreCfg,
    WebApiListenCfg, WebApiRouteCfg,
};

mod adapter;
pub use adapter::datastore;
pub use adapter::thirdparty;

use adapter::thirdparty::{AbstractAgentRelay, AbstractChatRelay};
use confidentiality::AbstractConfidentiality;
use error::{AppError, AppErrorCode};

type WebApiPath = String;
type WebApiHdlrLabel = &'static str;
type AppLogAlias = Arc<String>;

pub struct AppDataStoreContext {
    pub in_mem: Option<Arc<Box<dyn datastore::AbstInMemoryDStore>>>,
    pub rest_node: Option<Arc<datastore::AppRestStoreNode>>,
}

// global state shared by all request-handling tasks, everything inside is
// reference-counted so the handlers clone freely
pub struct AppSharedState {
    _cfg: Arc<AppConfig>,
    _log: Arc<logging::AppLogContext>,
    dstore: Arc<AppDataStoreContext>,
    _chat_relay: Option<Arc<Box<dyn AbstractChatRelay>>>,
    _agent_relay: Option<Arc<Box<dyn AbstractAgentRelay>>>,
}

impl AppSharedState {
    pub fn new(
        cfg: AppConfig,
        log: logging::AppLogContext,
        confidential: Box<dyn AbstractConfidentiality>,
    ) -> DefaultResult<Self, AppError> {
        let confidential = Arc::new(confidential);
        let log = Arc::new(log);
        let (in_mem, rest_node) = datastore::build_context(
            log.clone(),
            &cfg.api_server.data_store,
            confidential.clone(),
        );
        let in_mem = in_mem.map(Arc::new);
        let rest_node = rest_node.map(Arc::new);
        let ds_ctx = Arc::new(AppDataStoreContext { in_mem, rest_node });
        let _chat_relay = match thirdparty::app_chat_relay_context(
            &cfg.api_server.third_parties,
            confidential.clone(),
            log.clone(),
        ) {
            Ok(v) => Some(Arc::new(v)),
            Err(e) if e.code == AppErrorCode::MissingConfig => None,
            Err(e) => return Err(e),
        };
        let _agent_relay = match thirdparty::app_agent_relay_context(
            &cfg.api_server.third_parties,
            confidential.clone(),
            log.clone(),
        ) {
            Ok(v) => Some(Arc::new(v)),
            Err(e) if e.code == AppErrorCode::MissingConfig => None,
            Err(e) => return Err(e),
        };
        Ok(Self {
            _cfg: Arc::new(cfg),
            _log: log,
            dstore: ds_ctx,
            _chat_relay,
            _agent_relay,
        })
    } // end of fn new

    pub fn config(&self) -> &Arc<AppConfig> {
        &self._cfg
    }

    pub fn log_context(&self) -> &Arc<logging::AppLogContext> {
        &self._log
    }

    pub fn datastore(&self) -> Arc<AppDataStoreContext> {
        self.dstore.clone()
    }

    pub fn chat_relay(&self) -> Option<Arc<Box<dyn AbstractChatRelay>>> {
        self._chat_relay.clone()
    }

    pub fn agent_relay(&self) -> Option<Arc<Box<dyn AbstractAgentRelay>>> {
        self._agent_relay.clone()
    }
} // end of impl AppSharedState

impl Clone for AppSharedState {
    fn clone(&self) -> Self {
        Self {
            _cfg: self._cfg.clone(),
            _log: self._log.clone(),
            dstore: self.dstore.clone(),
            _chat_relay: self._chat_relay.clone(),
            _agent_relay: self._agent_relay.clone(),
        }
    }
}
