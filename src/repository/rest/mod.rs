pub(super) mod cart;
pub(super) mod client;
pub(super) mod product;

use serde::Deserialize;

use crate::error::{AppError, AppErrorCode};
use crate::model::VariantOptionModel;

// descriptor rows the store embeds for colors / sizes / categories /
// garment types all share one shape
#[derive(Deserialize)]
pub(super) struct OptionRow {
    pub(super) id: u32,
    pub(super) name: String,
}

impl From<OptionRow> for VariantOptionModel {
    fn from(value: OptionRow) -> Self {
        Self {
            id_: value.id,
            name: value.name,
        }
    }
}

pub(super) fn decode_row<T: serde::de::DeserializeOwned>(
    raw: serde_json::Value,
) -> Result<T, AppError> {
    serde_json::from_value::<T>(raw).map_err(|e| AppError {
        code: AppErrorCode::DataCorruption,
        detail: Some(e.to_string()),
    })
}
