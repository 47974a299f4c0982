use regex::Regex;

use crate::constant::REGEX_EMAIL_RFC5322;
use crate::error::{AppError, AppErrorCode};

pub struct ClientModel {
    pub id_: u64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl ClientModel {
    pub fn validate_email(value: &str) -> Result<(), AppError> {
        let re = Regex::new(REGEX_EMAIL_RFC5322).unwrap();
        let ok = if let Some(m) = re.find(value) {
            // given data should match the mail pattern exactly once
            m.start() == 0 && m.end() == value.len()
        } else {
            false
        };
        if ok {
            Ok(())
        } else {
            Err(AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some(format!("email:{}", value)),
            })
        }
    }
}
