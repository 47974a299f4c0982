pub(super) mod cart;
pub(super) mod client;
pub(super) mod product;

use crate::adapter::datastore::AbsDStoreFilterKeyOp;

// table labels are shared between the repos, cart detail joins across
// the product tables on the same datastore instance
pub(super) const TABLE_CART_TOPLVL: &str = "cart_toplvl";
pub(super) const TABLE_CART_LINE: &str = "cart_line";
pub(super) const TABLE_PRODUCT_TOPLVL: &str = "product_toplvl";
pub(super) const TABLE_PRODUCT_VARIANT: &str = "product_variant";
pub(super) const TABLE_CLIENT_CONTACT: &str = "client_contact";

// sentinel for optional columns in string rows
pub(super) const EMPTY_CELL: &str = "";

pub(super) struct AcceptAllKeyOp;

impl AbsDStoreFilterKeyOp for AcceptAllKeyOp {
    fn filter(&self, _k: &String, _v: &Vec<String>) -> bool {
        true
    }
}

/// next primary key for a table whose keys this repo mints as decimal
/// integers, scans under the datastore's own lock per call
pub(super) async fn next_pkey(
    datastore: &std::sync::Arc<Box<dyn crate::adapter::datastore::AbstInMemoryDStore>>,
    table: &str,
) -> Result<u64, crate::error::AppError> {
    let keys = datastore
        .filter_keys(table.to_string(), &AcceptAllKeyOp)
        .await?;
    let maxid = keys
        .iter()
        .filter_map(|k| k.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    Ok(maxid + 1)
}
