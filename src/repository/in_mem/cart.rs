use std::boxed::Box;
use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local as LocalTime};
use rust_decimal::Decimal;

use crate::adapter::datastore::{
    AbsDStoreFilterKeyOp, AbstInMemoryDStore, AppInMemFetchKeys, AppInMemFetchedSingleRow,
};
use crate::error::{AppError, AppErrorCode};
use crate::model::{
    CartIdentifier, CartLineDetailModel, CartLineModel, CartModel, CartStatus, ProductBriefModel,
    VariantOptionModel,
};
use crate::repository::AbsCartRepo;

use super::{
    next_pkey, EMPTY_CELL, TABLE_CART_LINE, TABLE_CART_TOPLVL, TABLE_PRODUCT_TOPLVL,
    TABLE_PRODUCT_VARIANT,
};

#[allow(non_snake_case)]
mod CartTable {
    use super::{
        AppInMemFetchedSingleRow, CartIdentifier, CartModel, CartStatus, DateTime, EMPTY_CELL,
    };

    pub(super) fn to_row(obj: &CartModel) -> AppInMemFetchedSingleRow {
        let owner = obj
            .owner
            .map(|v| v.to_string())
            .unwrap_or(EMPTY_CELL.to_string());
        let status = obj
            .status
            .as_ref()
            .map(|s| s.as_str().to_string())
            .unwrap_or(EMPTY_CELL.to_string());
        vec![owner, status, obj.created_at.to_rfc3339()]
    }

    pub(super) fn to_model(key: &str, row: &AppInMemFetchedSingleRow) -> CartModel {
        let owner = row[0].parse::<u64>().ok();
        let status = if row[1].is_empty() {
            None
        } else {
            Some(CartStatus::from(row[1].as_str()))
        };
        CartModel {
            id_: key.parse::<CartIdentifier>().unwrap(),
            owner,
            status,
            created_at: DateTime::parse_from_rfc3339(row[2].as_str()).unwrap(),
        }
    }
} // end of inner-mod CartTable

#[allow(non_snake_case)]
mod CartLineTable {
    use super::{AppInMemFetchedSingleRow, CartIdentifier, CartLineModel};

    pub(super) fn to_row(obj: &CartLineModel) -> AppInMemFetchedSingleRow {
        vec![
            obj.cart_id.to_string(),
            obj.variant_id.to_string(),
            obj.qty.to_string(),
        ]
    }

    pub(super) fn to_model(key: &str, row: &AppInMemFetchedSingleRow) -> CartLineModel {
        CartLineModel {
            id_: key.parse().unwrap(),
            cart_id: row[0].parse::<CartIdentifier>().unwrap(),
            variant_id: row[1].parse().unwrap(),
            qty: row[2].parse().unwrap(),
        }
    }
} // end of inner-mod CartLineTable

struct LineFilterKeyOp {
    cart_id: String,
    variant_id: Option<u64>,
}

impl AbsDStoreFilterKeyOp for LineFilterKeyOp {
    fn filter(&self, _k: &String, v: &Vec<String>) -> bool {
        let mut cond = v[0] == self.cart_id;
        if let Some(vid) = self.variant_id.as_ref() {
            cond = cond && v[1].parse::<u64>().ok() == Some(*vid);
        }
        cond
    }
}

struct ActiveCartFilterKeyOp {
    owner: String,
}

impl AbsDStoreFilterKeyOp for ActiveCartFilterKeyOp {
    fn filter(&self, _k: &String, v: &Vec<String>) -> bool {
        v[0] == self.owner && v[1] == crate::constant::CART_STATUS_ACTIVE
    }
}

pub struct CartInMemRepo {
    datastore: Arc<Box<dyn AbstInMemoryDStore>>,
}

impl CartInMemRepo {
    pub async fn new(m: Arc<Box<dyn AbstInMemoryDStore>>) -> DefaultResult<Self, AppError> {
        m.create_table(TABLE_CART_TOPLVL).await?;
        m.create_table(TABLE_CART_LINE).await?;
        // cart detail joins across the product tables, ensure they exist
        // even when no product repo was built on this datastore yet
        m.create_table(TABLE_PRODUCT_TOPLVL).await?;
        m.create_table(TABLE_PRODUCT_VARIANT).await?;
        Ok(Self { datastore: m })
    }

    async fn fetch_single_row(
        &self,
        table: &str,
        key: String,
    ) -> DefaultResult<Option<AppInMemFetchedSingleRow>, AppError> {
        let info: AppInMemFetchKeys = HashMap::from([(table.to_string(), vec![key.clone()])]);
        let mut result = self.datastore.fetch(info).await?;
        let mut rows = result.remove(table).unwrap();
        Ok(rows.remove(&key))
    }

    async fn fetch_lines_filtered(
        &self,
        cart_id: &CartIdentifier,
        variant_id: Option<u64>,
    ) -> DefaultResult<Vec<CartLineModel>, AppError> {
        let op = LineFilterKeyOp {
            cart_id: cart_id.to_string(),
            variant_id,
        };
        let keys = self
            .datastore
            .filter_keys(TABLE_CART_LINE.to_string(), &op)
            .await?;
        let info: AppInMemFetchKeys = HashMap::from([(TABLE_CART_LINE.to_string(), keys)]);
        let mut result = self.datastore.fetch(info).await?;
        let rows = result.remove(TABLE_CART_LINE).unwrap();
        let mut out = rows
            .iter()
            .map(|(k, v)| CartLineTable::to_model(k, v))
            .collect::<Vec<_>>();
        out.sort_by_key(|l| l.id_);
        Ok(out)
    }

    fn join_detail(
        line: &CartLineModel,
        variant_row: &AppInMemFetchedSingleRow,
        product_row: &AppInMemFetchedSingleRow,
        product_id: u64,
    ) -> DefaultResult<CartLineDetailModel, AppError> {
        let price = Decimal::from_str(product_row[2].as_str()).map_err(|e| AppError {
            code: AppErrorCode::DataCorruption,
            detail: Some(e.to_string()),
        })?;
        let color = if variant_row[2].is_empty() {
            None
        } else {
            Some(VariantOptionModel {
                id_: variant_row[2].parse().unwrap(),
                name: variant_row[3].clone(),
            })
        };
        let size = if variant_row[4].is_empty() {
            None
        } else {
            Some(VariantOptionModel {
                id_: variant_row[4].parse().unwrap(),
                name: variant_row[5].clone(),
            })
        };
        Ok(CartLineDetailModel {
            line_id: line.id_,
            qty: line.qty,
            variant_id: line.variant_id,
            stock: variant_row[1].parse().unwrap(),
            product: ProductBriefModel {
                id_: product_id,
                name: product_row[0].clone(),
                description: if product_row[1].is_empty() {
                    None
                } else {
                    Some(product_row[1].clone())
                },
                price,
            },
            color,
            size,
        })
    } // end of fn join_detail
} // end of impl CartInMemRepo

#[async_trait]
impl AbsCartRepo for CartInMemRepo {
    async fn create(
        &self,
        owner: Option<u64>,
        status: Option<CartStatus>,
    ) -> DefaultResult<CartModel, AppError> {
        let new_id = next_pkey(&self.datastore, TABLE_CART_TOPLVL).await?;
        let obj = CartModel {
            id_: CartIdentifier::Numeric(new_id as i64),
            owner,
            status,
            created_at: LocalTime::now().fixed_offset(),
        };
        let rows = HashMap::from([(new_id.to_string(), CartTable::to_row(&obj))]);
        let data = HashMap::from([(TABLE_CART_TOPLVL.to_string(), rows)]);
        let _num = self.datastore.save(data).await?;
        Ok(obj)
    }

    async fn fetch(&self, id_: &CartIdentifier) -> DefaultResult<Option<CartModel>, AppError> {
        let key = id_.to_string();
        let result = self.fetch_single_row(TABLE_CART_TOPLVL, key.clone()).await?;
        Ok(result.map(|row| CartTable::to_model(key.as_str(), &row)))
    }

    async fn fetch_active_by_client(
        &self,
        client_id: u64,
    ) -> DefaultResult<Option<CartModel>, AppError> {
        let op = ActiveCartFilterKeyOp {
            owner: client_id.to_string(),
        };
        let mut keys = self
            .datastore
            .filter_keys(TABLE_CART_TOPLVL.to_string(), &op)
            .await?;
        keys.sort();
        match keys.into_iter().next() {
            Some(key) => {
                let row = self.fetch_single_row(TABLE_CART_TOPLVL, key.clone()).await?;
                Ok(row.map(|r| CartTable::to_model(key.as_str(), &r)))
            }
            None => Ok(None),
        }
    }

    async fn fetch_line_by_variant(
        &self,
        cart_id: &CartIdentifier,
        variant_id: u64,
    ) -> DefaultResult<Option<CartLineModel>, AppError> {
        let mut found = self
            .fetch_lines_filtered(cart_id, Some(variant_id))
            .await?;
        if found.is_empty() {
            Ok(None)
        } else {
            Ok(Some(found.remove(0)))
        }
    }

    async fn fetch_line(
        &self,
        cart_id: &CartIdentifier,
        line_id: u64,
    ) -> DefaultResult<Option<CartLineModel>, AppError> {
        let key = line_id.to_string();
        let result = self.fetch_single_row(TABLE_CART_LINE, key.clone()).await?;
        let found = result
            .map(|row| CartLineTable::to_model(key.as_str(), &row))
            .filter(|line| &line.cart_id == cart_id);
        Ok(found)
    }

    async fn insert_line(
        &self,
        cart_id: &CartIdentifier,
        variant_id: u64,
        qty: u32,
    ) -> DefaultResult<CartLineModel, AppError> {
        let new_id = next_pkey(&self.datastore, TABLE_CART_LINE).await?;
        let obj = CartLineModel {
            id_: new_id,
            cart_id: cart_id.clone(),
            variant_id,
            qty,
        };
        let rows = HashMap::from([(new_id.to_string(), CartLineTable::to_row(&obj))]);
        let data = HashMap::from([(TABLE_CART_LINE.to_string(), rows)]);
        let _num = self.datastore.save(data).await?;
        Ok(obj)
    }

    async fn update_line_qty(
        &self,
        cart_id: &CartIdentifier,
        line_id: u64,
        qty: u32,
    ) -> DefaultResult<CartLineModel, AppError> {
        let key = line_id.to_string();
        let info: AppInMemFetchKeys =
            HashMap::from([(TABLE_CART_LINE.to_string(), vec![key.clone()])]);
        // overwrite runs under the datastore lock so the read row cannot
        // be swapped out between the check and the write
        let (mut fetched, lock) = self.datastore.fetch_acquire(info).await?;
        let rows = fetched.remove(TABLE_CART_LINE).unwrap();
        let found = rows
            .get(&key)
            .map(|row| CartLineTable::to_model(key.as_str(), row))
            .filter(|line| &line.cart_id == cart_id);
        let mut obj = match found {
            Some(v) => v,
            None => {
                drop(lock);
                return Err(AppError {
                    code: AppErrorCode::CartItemNotExist,
                    detail: Some(format!("cart:{}, item:{}", cart_id, line_id)),
                });
            }
        };
        obj.qty = qty;
        let rows = HashMap::from([(key, CartLineTable::to_row(&obj))]);
        let data = HashMap::from([(TABLE_CART_LINE.to_string(), rows)]);
        let _num = self.datastore.save_release(data, lock)?;
        Ok(obj)
    } // end of fn update_line_qty

    async fn delete_line(
        &self,
        cart_id: &CartIdentifier,
        line_id: u64,
    ) -> DefaultResult<(), AppError> {
        let found = self.fetch_line(cart_id, line_id).await?;
        if found.is_none() {
            return Err(AppError {
                code: AppErrorCode::CartItemNotExist,
                detail: Some(format!("cart:{}, item:{}", cart_id, line_id)),
            });
        }
        let info = HashMap::from([(TABLE_CART_LINE.to_string(), vec![line_id.to_string()])]);
        let _num = self.datastore.delete(info).await?;
        Ok(())
    }

    async fn fetch_detail(
        &self,
        id_: &CartIdentifier,
    ) -> DefaultResult<Vec<CartLineDetailModel>, AppError> {
        let lines = self.fetch_lines_filtered(id_, None).await?;
        let mut out = Vec::with_capacity(lines.len());
        for line in lines.iter() {
            let variant_row = self
                .fetch_single_row(TABLE_PRODUCT_VARIANT, line.variant_id.to_string())
                .await?
                .ok_or(AppError {
                    code: AppErrorCode::DataCorruption,
                    detail: Some(format!("missing-variant:{}", line.variant_id)),
                })?;
            let product_id = variant_row[0].parse::<u64>().unwrap();
            let product_row = self
                .fetch_single_row(TABLE_PRODUCT_TOPLVL, product_id.to_string())
                .await?
                .ok_or(AppError {
                    code: AppErrorCode::DataCorruption,
                    detail: Some(format!("missing-product:{}", product_id)),
                })?;
            out.push(Self::join_detail(line, &variant_row, &product_row, product_id)?);
        }
        Ok(out)
    } // end of fn fetch_detail
} // end of impl AbsCartRepo for CartInMemRepo
