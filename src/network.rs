use std::io::ErrorKind;
use std::net::ToSocketAddrs;
use std::result::Result as DefaultResult;

use axum::Router;
use tokio::net::TcpListener;

use crate::api::web::ApiRouteTableType;
use crate::config::{WebApiListenCfg, WebApiRouteCfg};
use crate::error::{AppError, AppErrorCode};
use crate::AppSharedState;

pub type WebServiceRoute = Router<()>;

pub fn app_web_service(
    cfg: &WebApiListenCfg,
    rtable: ApiRouteTableType,
    shr_state: AppSharedState,
) -> (WebServiceRoute, u16) {
    // the route set comes from the config file, a handler label the
    // table does not know is skipped rather than rejected so deployments
    // can disable surfaces by editing routes only
    let mut router: Router<AppSharedState> = Router::new();
    let filt_fn = |item: &&WebApiRouteCfg| -> bool { rtable.contains_key(item.handler.as_str()) };
    let filtered = cfg.routes.iter().filter(filt_fn);
    let mut num_applied: u16 = 0;
    for item in filtered {
        if let Some(route) = rtable.get(item.handler.as_str()) {
            router = router.route(item.path.as_str(), route.clone());
            num_applied += 1u16;
        } // 2 different paths might be linked to the same handler
    }
    let router = if num_applied > 0 {
        let prefix_path = String::from("/") + &cfg.api_version;
        Router::new().nest(prefix_path.as_str(), router)
    } else {
        router
    };
    let router = router.with_state(shr_state);
    (router, num_applied)
} // end of fn app_web_service

pub mod middleware {
    use std::fs::File;
    use std::str::FromStr;
    use std::time::Duration;

    use axum::http;
    use serde::Deserialize;
    use tower::limit::GlobalConcurrencyLimitLayer;
    use tower_http::cors::CorsLayer;
    use tower_http::limit::RequestBodyLimitLayer;

    use super::{AppError, AppErrorCode, DefaultResult};

    #[derive(Deserialize)]
    struct CorsAllowedOrigin {
        storefront: String,
    }

    #[allow(non_snake_case)]
    #[derive(Deserialize)]
    struct CorsConfig {
        ALLOWED_ORIGIN: CorsAllowedOrigin,
        ALLOWED_METHODS: Vec<String>,
        ALLOWED_HEADERS: Vec<String>,
        ALLOW_CREDENTIALS: bool,
        PREFLIGHT_MAX_AGE: u64,
    }

    pub fn conn_limit(max_conn: u32) -> GlobalConcurrencyLimitLayer {
        GlobalConcurrencyLimitLayer::new(max_conn as usize)
    }

    pub fn cors(cfg_path: String) -> DefaultResult<CorsLayer, AppError> {
        let f = File::open(cfg_path).map_err(|e| AppError {
            detail: Some(e.to_string()),
            code: AppErrorCode::IOerror(e.kind()),
        })?;
        let val = serde_json::from_reader::<File, CorsConfig>(f).map_err(|e| AppError {
            detail: Some(e.to_string()),
            code: AppErrorCode::InvalidJsonFormat,
        })?;
        let methods = val
            .ALLOWED_METHODS
            .iter()
            .filter_map(|m| http::Method::from_bytes(m.as_bytes()).ok())
            .collect::<Vec<http::Method>>();
        if val.ALLOWED_METHODS.len() > methods.len() {
            return Err(AppError {
                detail: Some("invalid-allowed-method".to_string()),
                code: AppErrorCode::InvalidInput,
            });
        }
        let headers = val
            .ALLOWED_HEADERS
            .iter()
            .filter_map(|h| http::HeaderName::from_str(h.as_str()).ok())
            .collect::<Vec<http::HeaderName>>();
        if !headers.contains(&http::header::CONTENT_TYPE) || !headers.contains(&http::header::ACCEPT)
        {
            return Err(AppError {
                detail: Some("invalid-allowed-header".to_string()),
                code: AppErrorCode::InvalidInput,
            });
        }
        let origin = val
            .ALLOWED_ORIGIN
            .storefront
            .parse::<http::HeaderValue>()
            .map_err(|e| AppError {
                detail: Some(format!("invalid-origin-header: {}", e)),
                code: AppErrorCode::InvalidInput,
            })?;
        let co = CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(val.ALLOW_CREDENTIALS)
            .max_age(Duration::from_secs(val.PREFLIGHT_MAX_AGE));
        Ok(co)
    } // end of fn cors

    pub fn req_body_limit(limit: usize) -> RequestBodyLimitLayer {
        RequestBodyLimitLayer::new(limit)
    }
} // end of inner-module middleware

pub async fn net_server_listener(
    mut domain_host: String,
    port: u16,
) -> DefaultResult<TcpListener, AppError> {
    if !domain_host.contains(':') {
        domain_host += ":0";
    }
    let mut iterator = domain_host.to_socket_addrs().map_err(
        // IP not found after domain name resolution
        |e| AppError {
            detail: Some(e.to_string() + ", domain_host:" + &domain_host),
            code: AppErrorCode::IOerror(ErrorKind::AddrNotAvailable),
        },
    )?;
    loop {
        let mut addr = iterator.next().ok_or(AppError {
            detail: Some("failed to bound with all IPs".to_string()),
            code: AppErrorCode::IOerror(ErrorKind::AddrInUse),
        })?;
        addr.set_port(port);
        if let Ok(b) = TcpListener::bind(addr).await {
            break Ok(b);
        }
    } // end of loop
} // end of fn net_server_listener
