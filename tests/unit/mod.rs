mod adapter;
mod model;
mod repository;
mod usecase;

use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use rust_decimal::Decimal;

use storefront::confidentiality::AbstractConfidentiality;
use storefront::constant::logging::{Destination, Level};
use storefront::datastore::{AbstInMemoryDStore, AppInMemoryDStore};
use storefront::error::AppError;
use storefront::logging::AppLogContext;
use storefront::model::{
    GarmentTypeModel, ProductModel, ProductVariantModel, VariantOptionModel,
};
use storefront::{
    ApiServerCfg, AppBasepathCfg, AppConfidentialCfg, AppConfig, AppDataStoreCfg,
    AppInMemoryDbCfg, AppLogHandlerCfg, AppLoggerCfg, AppLoggingCfg, AppSharedState,
    WebApiListenCfg, WebApiRouteCfg,
};

pub(crate) struct MockConfidential {}

impl AbstractConfidentiality for MockConfidential {
    fn try_get_payload(&self, _id: &str) -> DefaultResult<String, AppError> {
        Ok("\"unit-test\"".to_string())
    }
}

pub(crate) fn ut_setup_logging_cfg() -> AppLoggingCfg {
    AppLoggingCfg {
        handlers: vec![AppLogHandlerCfg {
            min_level: Level::INFO,
            destination: Destination::CONSOLE,
            alias: Arc::new("console".to_string()),
            path: None,
        }],
        loggers: vec![AppLoggerCfg {
            alias: Arc::new("storefront::usecase::manage_cart".to_string()),
            handlers: vec!["console".to_string()],
            level: Some(Level::WARNING),
        }],
    }
}

pub(crate) fn ut_setup_log_context() -> Arc<AppLogContext> {
    let basepath = AppBasepathCfg {
        system: ".".to_string(),
        service: ".".to_string(),
    };
    Arc::new(AppLogContext::new(&basepath, &ut_setup_logging_cfg()))
}

pub(crate) fn ut_setup_datastore(max_items: u32) -> Arc<Box<dyn AbstInMemoryDStore>> {
    let cfg = AppInMemoryDbCfg {
        alias: "unit-test".to_string(),
        max_items,
    };
    let obj: Box<dyn AbstInMemoryDStore> = Box::new(AppInMemoryDStore::new(&cfg));
    Arc::new(obj)
}

pub(crate) fn ut_setup_share_state() -> AppSharedState {
    let cfg = AppConfig {
        basepath: AppBasepathCfg {
            system: ".".to_string(),
            service: ".".to_string(),
        },
        api_server: ApiServerCfg {
            logging: ut_setup_logging_cfg(),
            listen: WebApiListenCfg {
                api_version: "api".to_string(),
                host: "localhost".to_string(),
                port: 8012,
                max_connections: 64,
                cors: "settings/cors.json".to_string(),
                routes: vec![WebApiRouteCfg {
                    path: "/carts".to_string(),
                    handler: "create_cart".to_string(),
                }],
            },
            limit_req_body_in_bytes: 65536,
            num_workers: 1,
            stack_sz_kb: 256,
            data_store: vec![AppDataStoreCfg::InMemory(AppInMemoryDbCfg {
                alias: "unit-test".to_string(),
                max_items: 200,
            })],
            third_parties: None,
            confidentiality: AppConfidentialCfg::UserSpace {
                sys_path: "settings/secrets.json".to_string(),
            },
        },
    };
    let logctx = AppLogContext::new(&cfg.basepath, &cfg.api_server.logging);
    AppSharedState::new(cfg, logctx, Box::new(MockConfidential {})).unwrap()
}

pub(crate) fn ut_product_fixtures() -> Vec<ProductModel> {
    vec![
        ProductModel {
            id_: 1001,
            name: "Remera Básica".to_string(),
            description: Some("remera de algodón peinado".to_string()),
            price: Decimal::from(10u32),
            available: true,
            category: Some(VariantOptionModel {
                id_: 3,
                name: "Ropa".to_string(),
            }),
            garment_type: Some(GarmentTypeModel {
                id_: 7,
                name: "Remera Niño".to_string(),
            }),
            variants: vec![
                ProductVariantModel {
                    id_: 5001,
                    stock: 5,
                    color: Some(VariantOptionModel {
                        id_: 1,
                        name: "Rojo".to_string(),
                    }),
                    size: Some(VariantOptionModel {
                        id_: 2,
                        name: "M".to_string(),
                    }),
                },
                ProductVariantModel {
                    id_: 5002,
                    stock: 10,
                    color: Some(VariantOptionModel {
                        id_: 4,
                        name: "Negro".to_string(),
                    }),
                    size: Some(VariantOptionModel {
                        id_: 2,
                        name: "M".to_string(),
                    }),
                },
            ],
        },
        ProductModel {
            id_: 1002,
            name: "Pantalón Cargo".to_string(),
            description: Some("pantalón resistente con bolsillos".to_string()),
            price: Decimal::from(5u32),
            available: true,
            category: Some(VariantOptionModel {
                id_: 3,
                name: "Ropa".to_string(),
            }),
            garment_type: Some(GarmentTypeModel {
                id_: 8,
                name: "Pantalón".to_string(),
            }),
            variants: vec![ProductVariantModel {
                id_: 5003,
                stock: 8,
                color: Some(VariantOptionModel {
                    id_: 5,
                    name: "Verde".to_string(),
                }),
                size: Some(VariantOptionModel {
                    id_: 6,
                    name: "L".to_string(),
                }),
            }],
        },
        ProductModel {
            id_: 1003,
            name: "Buzo Descontinuado".to_string(),
            description: None,
            price: Decimal::from(20u32),
            available: false,
            category: None,
            garment_type: None,
            variants: vec![ProductVariantModel {
                id_: 5004,
                stock: 3,
                color: None,
                size: None,
            }],
        },
    ]
} // end of fn ut_product_fixtures
