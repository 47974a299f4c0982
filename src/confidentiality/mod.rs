mod userspace;

use std::boxed::Box;
use std::result::Result as DefaultResult;

use crate::config::{AppConfidentialCfg, AppConfig};
use crate::error::AppError;

pub use userspace::UserSpaceConfidentiality;

pub trait AbstractConfidentiality: Send + Sync {
    // read confidential data from whatever source the implementation
    // wraps, the `id` argument is a slash-separated path to the payload
    fn try_get_payload(&self, id_: &str) -> DefaultResult<String, AppError>;
}

pub fn build_context(cfg: &AppConfig) -> DefaultResult<Box<dyn AbstractConfidentiality>, AppError> {
    match &cfg.api_server.confidentiality {
        AppConfidentialCfg::UserSpace { sys_path } => {
            let fullpath = cfg.basepath.system.clone() + "/" + sys_path;
            let obj = UserSpaceConfidentiality::build(fullpath);
            Ok(Box::new(obj))
        }
    }
}
