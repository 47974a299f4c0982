use std::collections::hash_map::RandomState;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use serde::de::{Error as DeserializeError, Expected};
use serde::Deserialize;

use crate::constant as AppConst;
use crate::error::{AppError, AppErrorCode};
use crate::{AppLogAlias, WebApiPath};

#[derive(Deserialize)]
pub struct AppLogHandlerCfg {
    pub min_level: AppConst::logging::Level,
    pub destination: AppConst::logging::Destination,
    pub alias: AppLogAlias,
    pub path: Option<String>,
}

#[derive(Deserialize)]
pub struct AppLoggerCfg {
    pub alias: AppLogAlias,
    pub handlers: Vec<String>,
    pub level: Option<AppConst::logging::Level>,
}

#[derive(Deserialize)]
pub struct AppLoggingCfg {
    pub handlers: Vec<AppLogHandlerCfg>,
    pub loggers: Vec<AppLoggerCfg>,
}

#[derive(Deserialize)]
pub struct WebApiRouteCfg {
    pub path: WebApiPath,
    #[serde(deserialize_with = "jsn_deny_empty_string")]
    pub handler: String,
}

impl std::fmt::Display for WebApiRouteCfg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "path:{}, handler:{}", self.path, self.handler)
    }
}

#[derive(Deserialize)]
pub struct WebApiListenCfg {
    // path prefix all the routes are nested under, e.g. "api"
    #[serde(deserialize_with = "jsn_deny_empty_string")]
    pub api_version: String,
    #[serde(deserialize_with = "jsn_deny_empty_string")]
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub cors: String,
    pub routes: Vec<WebApiRouteCfg>,
}

#[derive(Deserialize, Debug)]
pub struct AppInMemoryDbCfg {
    #[serde(deserialize_with = "jsn_deny_empty_string")]
    pub alias: String,
    pub max_items: u32,
}

#[derive(Deserialize, Debug)]
pub struct AppRestStoreCfg {
    #[serde(deserialize_with = "jsn_deny_empty_string")]
    pub alias: String,
    pub host: String,
    pub port: u16,
    // path the query/filter API is rooted at, e.g. "/rest/v1"
    pub root_path: String,
    pub confidentiality_path: String,
}

#[allow(non_camel_case_types)]
#[derive(Deserialize)]
#[serde(tag = "_type")]
pub enum AppDataStoreCfg {
    InMemory(AppInMemoryDbCfg),
    RestStore(AppRestStoreCfg),
}

#[derive(Deserialize)]
pub struct App3rdPartyCfg {
    #[serde(deserialize_with = "jsn_deny_empty_string")]
    pub name: String,
    pub host: String,
    pub port: u16,
    // fixed resource path, for relays which always hit one endpoint
    pub resource_path: Option<String>,
    // Chatwoot scopes every conversation under an account
    pub account_id: Option<u64>,
    pub confidentiality_path: Option<String>,
}

#[derive(Deserialize)]
#[serde(tag = "source")]
pub enum AppConfidentialCfg {
    UserSpace {
        #[serde(deserialize_with = "jsn_deny_empty_string")]
        sys_path: String,
    },
}

#[derive(Deserialize)]
pub struct ApiServerCfg {
    pub logging: AppLoggingCfg,
    pub listen: WebApiListenCfg,
    pub limit_req_body_in_bytes: usize,
    pub num_workers: u8,
    pub stack_sz_kb: u16,
    pub data_store: Vec<AppDataStoreCfg>,
    pub third_parties: Option<Vec<Arc<App3rdPartyCfg>>>,
    pub confidentiality: AppConfidentialCfg,
}

pub struct AppBasepathCfg {
    pub system: String,
    pub service: String,
}

pub struct AppConfig {
    pub basepath: AppBasepathCfg,
    pub api_server: ApiServerCfg,
}

impl AppConfig {
    pub fn new(mut args: HashMap<String, String, RandomState>) -> DefaultResult<Self, AppError> {
        let sys_basepath = if let Some(s) = args.remove(AppConst::ENV_VAR_SYS_BASE_PATH) {
            s + "/"
        } else {
            return Err(AppError {
                detail: None,
                code: AppErrorCode::MissingSysBasePath,
            });
        };
        let app_basepath = if let Some(a) = args.remove(AppConst::ENV_VAR_SERVICE_BASE_PATH) {
            a + "/"
        } else {
            return Err(AppError {
                detail: None,
                code: AppErrorCode::MissingAppBasePath,
            });
        };
        let api_srv_cfg = if let Some(cfg_path) = args.remove(AppConst::ENV_VAR_CONFIG_FILE_PATH) {
            let fullpath = app_basepath.clone() + &cfg_path;
            Self::parse_from_file(fullpath)?
        } else {
            return Err(AppError {
                detail: None,
                code: AppErrorCode::MissingConfigPath,
            });
        };
        Ok(Self {
            api_server: api_srv_cfg,
            basepath: AppBasepathCfg {
                system: sys_basepath,
                service: app_basepath,
            },
        })
    } // end of fn new

    // load and parse a config file with given path
    pub fn parse_from_file(filepath: String) -> DefaultResult<ApiServerCfg, AppError> {
        let fileobj = File::open(filepath).map_err(|e| AppError {
            detail: Some(e.to_string()),
            code: AppErrorCode::IOerror(e.kind()),
        })?;
        let reader = BufReader::new(fileobj);
        let jsnobj = serde_json::from_reader::<BufReader<File>, ApiServerCfg>(reader).map_err(
            |e| AppError {
                detail: Some(e.to_string()),
                code: AppErrorCode::InvalidJsonFormat,
            },
        )?;
        Self::_check_web_listener(&jsnobj.listen)?;
        Self::_check_logging(&jsnobj.logging)?;
        Self::_check_datastore(&jsnobj.data_store)?;
        Self::_check_third_parties(&jsnobj.third_parties)?;
        Ok(jsnobj)
    }

    fn _check_web_listener(obj: &WebApiListenCfg) -> DefaultResult<(), AppError> {
        let mut badroutes = obj
            .routes
            .iter()
            .filter(|i| i.path.is_empty() || !i.path.starts_with('/'));
        if obj.routes.is_empty() {
            Err(AppError {
                detail: None,
                code: AppErrorCode::NoRouteApiServerCfg,
            })
        } else if let Some(badroute) = badroutes.next() {
            Err(AppError {
                detail: Some(badroute.to_string()),
                code: AppErrorCode::InvalidRouteConfig,
            })
        } else {
            Ok(())
        }
    }

    fn _check_logging(obj: &AppLoggingCfg) -> DefaultResult<(), AppError> {
        let mut no_handler = obj.loggers.iter().filter(|item| item.handlers.is_empty());
        // for file-type handler, the field `path` has to be provided
        let mut no_file_path = obj.handlers.iter().filter(|item| {
            matches!(item.destination, AppConst::logging::Destination::LOCALFS)
                && item.path.is_none()
        });
        let mut hdlr_no_alias = obj.handlers.iter().filter(|item| item.alias.is_empty());
        let mut logger_no_alias = obj.loggers.iter().filter(|item| item.alias.is_empty());
        if obj.handlers.is_empty() {
            Err(AppError {
                detail: None,
                code: AppErrorCode::NoLogHandlerCfg,
            })
        } else if obj.loggers.is_empty() {
            Err(AppError {
                detail: None,
                code: AppErrorCode::NoLoggerCfg,
            })
        } else if let Some(alogger) = no_handler.next() {
            let msg = format!("the logger does not have handler: {}", alogger.alias);
            Err(AppError {
                detail: Some(msg),
                code: AppErrorCode::NoHandlerInLoggerCfg,
            })
        } else if hdlr_no_alias.next().is_some() {
            Err(AppError {
                detail: None,
                code: AppErrorCode::MissingAliasLogHdlerCfg,
            })
        } else if logger_no_alias.next().is_some() {
            Err(AppError {
                detail: None,
                code: AppErrorCode::MissingAliasLoggerCfg,
            })
        } else if let Some(ahandler) = no_file_path.next() {
            let msg = format!("file-type handler does not contain path: {}", ahandler.alias);
            Err(AppError {
                detail: Some(msg),
                code: AppErrorCode::InvalidHandlerLoggerCfg,
            })
        } else {
            let iter = obj.handlers.iter().map(|i| i.alias.as_str());
            let hdlr_alias_map: HashSet<&str> = HashSet::from_iter(iter);
            // handler alias in each logger has to be present
            let mut bad_alias = obj.loggers.iter().filter(|item| {
                item.handlers
                    .iter()
                    .any(|i| !hdlr_alias_map.contains(i.as_str()))
            });
            if let Some(alogger) = bad_alias.next() {
                let msg = format!("the logger contains invalid handler alias: {}", alogger.alias);
                Err(AppError {
                    detail: Some(msg),
                    code: AppErrorCode::InvalidHandlerLoggerCfg,
                })
            } else {
                Ok(())
            }
        }
    } // end of fn _check_logging

    fn _check_datastore(obj: &Vec<AppDataStoreCfg>) -> DefaultResult<(), AppError> {
        if obj.is_empty() {
            return Err(AppError {
                detail: None,
                code: AppErrorCode::NoDatabaseCfg,
            });
        }
        for item in obj {
            match item {
                AppDataStoreCfg::InMemory(c) => {
                    let lmt = AppConst::hard_limit::MAX_ITEMS_STORED_PER_MODEL;
                    if c.max_items > lmt {
                        let e = AppError {
                            detail: Some(format!("limit:{}", lmt)),
                            code: AppErrorCode::ExceedingMaxLimit,
                        };
                        return Err(e);
                    }
                }
                AppDataStoreCfg::RestStore(c) => {
                    if c.host.is_empty() || !c.root_path.starts_with('/') {
                        let e = AppError {
                            detail: Some(format!("rest-store:{}", c.alias)),
                            code: AppErrorCode::InvalidRouteConfig,
                        };
                        return Err(e);
                    }
                }
            }
        } // end of loop
        Ok(())
    } // end of fn _check_datastore

    fn _check_third_parties(
        obj: &Option<Vec<Arc<App3rdPartyCfg>>>,
    ) -> DefaultResult<(), AppError> {
        if let Some(cfgs) = obj.as_ref() {
            let mut bad = cfgs.iter().filter(|c| c.host.is_empty());
            if let Some(c) = bad.next() {
                return Err(AppError {
                    detail: Some(c.name.clone()),
                    code: AppErrorCode::MissingConfig,
                });
            }
        }
        Ok(())
    }
} // end of impl AppConfig

struct ExpectNonEmptyString {
    min_len: u32,
}

impl Expected for ExpectNonEmptyString {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        let msg = format!("minimum string length >= {}", self.min_len);
        formatter.write_str(msg.as_str())
    }
}

fn jsn_deny_empty_string<'de, D>(raw: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(raw)?;
    if s.is_empty() {
        let exp = ExpectNonEmptyString { min_len: 1 };
        Err(DeserializeError::invalid_length(0, &exp))
    } else {
        Ok(s)
    }
}
