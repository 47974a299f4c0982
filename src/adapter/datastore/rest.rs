use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use hyper::header::{HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use hyper::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value as JsnVal;
use tokio_native_tls::{native_tls, TlsConnector};

use crate::adapter::BaseClient;
use crate::confidentiality::AbstractConfidentiality;
use crate::config::AppRestStoreCfg;
use crate::constant::HTTP_CONTENT_TYPE_JSON;
use crate::error::{AppError, AppErrorCode};
use crate::logging::AppLogContext;

/// Filter set for one backing-store request, rendered to the query/filter
/// API's query string. Every filter value carries its operator prefix,
/// e.g. `eq.5`, `ilike.*shirt*`, the way the store expects them.
#[derive(Serialize, Default)]
pub struct StoreQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_variant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<String>,
}

impl StoreQuery<'_> {
    fn to_query_string(&self) -> DefaultResult<String, AppError> {
        serde_qs::to_string(self).map_err(|e| AppError {
            code: AppErrorCode::InvalidInput,
            detail: Some(e.to_string()),
        })
    }

    pub(crate) fn op_eq<T: std::fmt::Display>(v: T) -> Option<String> {
        Some(format!("eq.{}", v))
    }

    pub(crate) fn op_ilike(keyword: &str) -> Option<String> {
        Some(format!("ilike.*{}*", keyword))
    }
}

/// Access node for the remote relational store, which this service only
/// ever reaches through its query/filter web API. One logical operation
/// here is one HTTP round trip, no pooling and no transaction spanning
/// multiple calls.
pub struct AppRestStoreNode {
    host: String,
    port: u16,
    root_path: String,
    api_key: String,
    secure_connector: TlsConnector,
    logctx: Arc<AppLogContext>,
}

impl AppRestStoreNode {
    pub(crate) fn try_build(
        cfg: &AppRestStoreCfg,
        cfdntl: Arc<Box<dyn AbstractConfidentiality>>,
        logctx: Arc<AppLogContext>,
    ) -> DefaultResult<Self, AppError> {
        let serial = cfdntl.try_get_payload(cfg.confidentiality_path.as_str())?;
        let api_key = serde_json::from_str::<String>(serial.as_str()).map_err(|_e| AppError {
            code: AppErrorCode::DataCorruption,
            detail: Some("credential-parse-failure".to_string()),
        })?;
        let secure_connector = {
            let mut builder = native_tls::TlsConnector::builder();
            builder.min_protocol_version(Some(native_tls::Protocol::Tlsv12));
            let sc = builder.build().map_err(|e| AppError {
                code: AppErrorCode::CryptoFailure,
                detail: Some(e.to_string()),
            })?;
            sc.into()
        };
        Ok(Self {
            host: cfg.host.clone(),
            port: cfg.port,
            root_path: cfg.root_path.clone(),
            api_key,
            secure_connector,
            logctx,
        })
    } // end of fn try_build

    fn auth_headers(&self) -> DefaultResult<Vec<(HeaderName, HeaderValue)>, AppError> {
        let key_val = HeaderValue::from_str(self.api_key.as_str()).map_err(|e| AppError {
            code: AppErrorCode::CryptoFailure,
            detail: Some(e.to_string()),
        })?;
        let bearer = format!("Bearer {}", self.api_key.as_str());
        let bearer_val = HeaderValue::from_str(bearer.as_str()).map_err(|e| AppError {
            code: AppErrorCode::CryptoFailure,
            detail: Some(e.to_string()),
        })?;
        Ok(vec![
            (HeaderName::from_static("apikey"), key_val),
            (AUTHORIZATION, bearer_val),
            (CONTENT_TYPE, HeaderValue::from_static(HTTP_CONTENT_TYPE_JSON)),
        ])
    }

    async fn execute(
        &self,
        method: Method,
        table: &str,
        query: Option<&StoreQuery<'_>>,
        body: Option<Vec<u8>>,
    ) -> DefaultResult<(Vec<u8>, StatusCode), AppError> {
        let resource_path = match query {
            Some(q) => {
                let qs = q.to_query_string()?;
                if qs.is_empty() {
                    format!("{}/{}", self.root_path, table)
                } else {
                    format!("{}/{}?{}", self.root_path, table, qs)
                }
            }
            None => format!("{}/{}", self.root_path, table),
        };
        let mut headers = self.auth_headers()?;
        // mutating calls always ask the store to echo the affected rows
        if !matches!(method, Method::GET) {
            headers.push((
                HeaderName::from_static("prefer"),
                HeaderValue::from_static("return=representation"),
            ));
        }
        let mut client = BaseClient::try_build(
            self.host.clone(),
            self.port,
            &self.secure_connector,
            self.logctx.clone(),
        )
        .await?;
        client
            .execute(resource_path.as_str(), method, headers, body)
            .await
    } // end of fn execute

    fn parse_rows(raw: Vec<u8>, status: StatusCode) -> DefaultResult<Vec<JsnVal>, AppError> {
        if !status.is_success() {
            return Err(AppError {
                code: AppErrorCode::RemoteStoreFailure,
                detail: Some(format!(
                    "status:{}, body:{}",
                    status.as_u16(),
                    String::from_utf8_lossy(&raw)
                )),
            });
        }
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        let parsed = serde_json::from_slice::<JsnVal>(&raw).map_err(|e| AppError {
            code: AppErrorCode::DataCorruption,
            detail: Some(e.to_string()),
        })?;
        match parsed {
            JsnVal::Array(a) => Ok(a),
            other => Ok(vec![other]),
        }
    }

    pub async fn select(
        &self,
        table: &str,
        query: &StoreQuery<'_>,
    ) -> DefaultResult<Vec<JsnVal>, AppError> {
        let (raw, status) = self.execute(Method::GET, table, Some(query), None).await?;
        Self::parse_rows(raw, status)
    }

    pub async fn insert(&self, table: &str, row: JsnVal) -> DefaultResult<Vec<JsnVal>, AppError> {
        let body = serde_json::to_vec(&row).map_err(|e| AppError {
            code: AppErrorCode::InvalidJsonFormat,
            detail: Some(e.to_string()),
        })?;
        let (raw, status) = self.execute(Method::POST, table, None, Some(body)).await?;
        Self::parse_rows(raw, status)
    }

    pub async fn update(
        &self,
        table: &str,
        query: &StoreQuery<'_>,
        patch: JsnVal,
    ) -> DefaultResult<Vec<JsnVal>, AppError> {
        let body = serde_json::to_vec(&patch).map_err(|e| AppError {
            code: AppErrorCode::InvalidJsonFormat,
            detail: Some(e.to_string()),
        })?;
        let (raw, status) = self
            .execute(Method::PATCH, table, Some(query), Some(body))
            .await?;
        Self::parse_rows(raw, status)
    }

    pub async fn delete(
        &self,
        table: &str,
        query: &StoreQuery<'_>,
    ) -> DefaultResult<Vec<JsnVal>, AppError> {
        let (raw, status) = self
            .execute(Method::DELETE, table, Some(query), None)
            .await?;
        Self::parse_rows(raw, status)
    }
} // end of impl AppRestStoreNode
