use crate::WebApiHdlrLabel;

pub mod app_meta {
    pub const LABEL: &str = "storefront";
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}

pub const ENV_VAR_SYS_BASE_PATH: &str = "SYS_BASE_PATH";
pub const ENV_VAR_SERVICE_BASE_PATH: &str = "SERVICE_BASE_PATH";
pub const ENV_VAR_CONFIG_FILE_PATH: &str = "CONFIG_FILE_PATH";

pub const EXPECTED_ENV_VAR_LABELS: [&str; 3] = [
    ENV_VAR_SYS_BASE_PATH,
    ENV_VAR_SERVICE_BASE_PATH,
    ENV_VAR_CONFIG_FILE_PATH,
];

pub mod hard_limit {
    pub const MAX_ITEMS_STORED_PER_MODEL: u32 = 2200u32;
    pub const MAX_NUM_CONVERSATION_LABELS: usize = 16;
}

pub(crate) mod api {
    use super::WebApiHdlrLabel;

    #[allow(non_camel_case_types)]
    pub(crate) struct web {}

    impl web {
        pub(crate) const CREATE_CART: WebApiHdlrLabel = "create_cart";
        pub(crate) const ADD_CART_ITEM: WebApiHdlrLabel = "add_cart_item";
        pub(crate) const RETRIEVE_CART: WebApiHdlrLabel = "retrieve_cart";
        pub(crate) const UPDATE_CART_ITEM: WebApiHdlrLabel = "update_cart_item";
        pub(crate) const REMOVE_CART_ITEM: WebApiHdlrLabel = "remove_cart_item";
        pub(crate) const SEARCH_PRODUCTS: WebApiHdlrLabel = "search_products";
        pub(crate) const PRODUCT_DETAIL: WebApiHdlrLabel = "product_detail";
        pub(crate) const CLIENT_SESSION: WebApiHdlrLabel = "client_get_or_create";
        pub(crate) const CHAT_EVENT_LOG: WebApiHdlrLabel = "chat_event_log";
        pub(crate) const CHAT_EVENT_ADAPTER: WebApiHdlrLabel = "chat_event_adapter";
        pub(crate) const REQUEST_HUMAN_AGENT: WebApiHdlrLabel = "request_human_agent";
        pub(crate) const MCP_ENTRY: WebApiHdlrLabel = "mcp_entry";
    }

    pub(crate) mod mcp {
        // revision of the model-context-protocol spec this server replies with
        pub(crate) const PROTOCOL_VERSION: &str = "2024-11-05";
    }
} // end of inner-mod api

pub(crate) const HTTP_CONTENT_TYPE_JSON: &str = "application/json";

// status value this service writes and matches on cart rows, lifecycle
// beyond that is owned by the backing store
pub(crate) const CART_STATUS_ACTIVE: &str = "active";

pub(crate) const REGEX_EMAIL_RFC5322 : &str = r#"(?:[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21\x23-\x5b\x5d-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*")@(?:(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?|\[(?:(?:(2(5[0-5]|[0-4][0-9])|1[0-9][0-9]|[1-9]?[0-9]))\.){3}(?:(2(5[0-5]|[0-4][0-9])|1[0-9][0-9]|[1-9]?[0-9])|[a-z0-9-]*[a-z0-9]:(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21-\x5a\x53-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])+)\])"#;

pub mod logging {
    use serde::Deserialize;

    #[derive(Deserialize)]
    pub enum Level {
        TRACE,
        DEBUG,
        INFO,
        WARNING,
        ERROR,
        FATAL,
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Destination {
        CONSOLE,
        LOCALFS,
    }
}
