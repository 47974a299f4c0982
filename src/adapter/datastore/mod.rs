mod in_mem;
mod rest;

use std::boxed::Box;
use std::sync::Arc;

use crate::confidentiality::AbstractConfidentiality;
use crate::config::AppDataStoreCfg;
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};

pub use in_mem::{
    AbsDStoreFilterKeyOp, AbstInMemoryDStore, AppInMemDeleteInfo, AppInMemDstoreLock,
    AppInMemFetchKeys, AppInMemFetchedData, AppInMemFetchedSingleRow, AppInMemFetchedSingleTable,
    AppInMemUpdateData, AppInMemoryDStore,
};
pub use rest::{AppRestStoreNode, StoreQuery};

pub(crate) fn build_context(
    logctx: Arc<AppLogContext>,
    cfg: &Vec<AppDataStoreCfg>,
    confidential: Arc<Box<dyn AbstractConfidentiality>>,
) -> (
    Option<Box<dyn AbstInMemoryDStore>>,
    Option<AppRestStoreNode>,
) {
    let mut inmem = None;
    let mut restnode = None;
    for c in cfg {
        match c {
            AppDataStoreCfg::InMemory(d) => {
                let item: Box<dyn AbstInMemoryDStore> = Box::new(AppInMemoryDStore::new(d));
                inmem = Some(item);
            }
            AppDataStoreCfg::RestStore(d) => {
                match AppRestStoreNode::try_build(d, confidential.clone(), logctx.clone()) {
                    Ok(item) => {
                        restnode = Some(item);
                    }
                    Err(e) => {
                        app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
                    }
                }
            }
        }
    }
    (inmem, restnode)
}
