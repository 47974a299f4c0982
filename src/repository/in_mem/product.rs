use std::boxed::Box;
use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::adapter::datastore::{
    AbsDStoreFilterKeyOp, AbstInMemoryDStore, AppInMemFetchKeys, AppInMemFetchedSingleRow,
    AppInMemFetchedSingleTable,
};
use crate::error::{AppError, AppErrorCode};
use crate::model::{
    GarmentTypeModel, ProductBriefModel, ProductModel, ProductSearchFilter, ProductVariantModel,
    VariantOptionModel, VariantPurchaseModel,
};
use crate::repository::AbsProductRepo;

use super::{EMPTY_CELL, TABLE_PRODUCT_TOPLVL, TABLE_PRODUCT_VARIANT};

#[allow(non_snake_case)]
mod ProductTable {
    use super::{
        AppInMemFetchedSingleRow, Decimal, FromStr, GarmentTypeModel, ProductModel,
        VariantOptionModel, EMPTY_CELL,
    };

    pub(super) fn to_row(obj: &ProductModel) -> AppInMemFetchedSingleRow {
        let (cat_id, cat_name) = obj
            .category
            .as_ref()
            .map(|c| (c.id_.to_string(), c.name.clone()))
            .unwrap_or((EMPTY_CELL.to_string(), EMPTY_CELL.to_string()));
        let (gmt_id, gmt_name) = obj
            .garment_type
            .as_ref()
            .map(|g| (g.id_.to_string(), g.name.clone()))
            .unwrap_or((EMPTY_CELL.to_string(), EMPTY_CELL.to_string()));
        vec![
            obj.name.clone(),
            obj.description.clone().unwrap_or(EMPTY_CELL.to_string()),
            obj.price.to_string(),
            if obj.available { "1" } else { "0" }.to_string(),
            cat_id,
            cat_name,
            gmt_id,
            gmt_name,
        ]
    }

    pub(super) fn to_model(key: &str, row: &AppInMemFetchedSingleRow) -> ProductModel {
        let category = if row[4].is_empty() {
            None
        } else {
            Some(VariantOptionModel {
                id_: row[4].parse().unwrap(),
                name: row[5].clone(),
            })
        };
        let garment_type = if row[6].is_empty() {
            None
        } else {
            Some(GarmentTypeModel {
                id_: row[6].parse().unwrap(),
                name: row[7].clone(),
            })
        };
        ProductModel {
            id_: key.parse().unwrap(),
            name: row[0].clone(),
            description: if row[1].is_empty() {
                None
            } else {
                Some(row[1].clone())
            },
            price: Decimal::from_str(row[2].as_str()).unwrap(),
            available: row[3] == "1",
            category,
            garment_type,
            variants: Vec::new(),
        }
    }
} // end of inner-mod ProductTable

#[allow(non_snake_case)]
mod VariantTable {
    use super::{AppInMemFetchedSingleRow, ProductVariantModel, VariantOptionModel, EMPTY_CELL};

    pub(super) fn to_row(product_id: u64, obj: &ProductVariantModel) -> AppInMemFetchedSingleRow {
        let (color_id, color_name) = obj
            .color
            .as_ref()
            .map(|c| (c.id_.to_string(), c.name.clone()))
            .unwrap_or((EMPTY_CELL.to_string(), EMPTY_CELL.to_string()));
        let (size_id, size_name) = obj
            .size
            .as_ref()
            .map(|s| (s.id_.to_string(), s.name.clone()))
            .unwrap_or((EMPTY_CELL.to_string(), EMPTY_CELL.to_string()));
        vec![
            product_id.to_string(),
            obj.stock.to_string(),
            color_id,
            color_name,
            size_id,
            size_name,
        ]
    }

    pub(super) fn to_model(key: &str, row: &AppInMemFetchedSingleRow) -> ProductVariantModel {
        ProductVariantModel {
            id_: key.parse().unwrap(),
            stock: row[1].parse().unwrap(),
            color: if row[2].is_empty() {
                None
            } else {
                Some(VariantOptionModel {
                    id_: row[2].parse().unwrap(),
                    name: row[3].clone(),
                })
            },
            size: if row[4].is_empty() {
                None
            } else {
                Some(VariantOptionModel {
                    id_: row[4].parse().unwrap(),
                    name: row[5].clone(),
                })
            },
        }
    }
} // end of inner-mod VariantTable

struct SearchFilterKeyOp {
    name_kw: Option<String>,
    descr_kw: Option<String>,
}

impl AbsDStoreFilterKeyOp for SearchFilterKeyOp {
    fn filter(&self, _k: &String, v: &Vec<String>) -> bool {
        let mut cond = v[3] == "1"; // only available products
        if let Some(kw) = self.name_kw.as_ref() {
            cond = cond && v[0].to_lowercase().contains(kw.as_str());
        }
        if let Some(kw) = self.descr_kw.as_ref() {
            cond = cond && v[1].to_lowercase().contains(kw.as_str());
        }
        cond
    }
}

struct VariantOfProductKeyOp {
    product_id: String,
}

impl AbsDStoreFilterKeyOp for VariantOfProductKeyOp {
    fn filter(&self, _k: &String, v: &Vec<String>) -> bool {
        v[0] == self.product_id
    }
}

pub struct ProductInMemRepo {
    datastore: Arc<Box<dyn AbstInMemoryDStore>>,
}

impl ProductInMemRepo {
    pub async fn new(m: Arc<Box<dyn AbstInMemoryDStore>>) -> DefaultResult<Self, AppError> {
        m.create_table(TABLE_PRODUCT_TOPLVL).await?;
        m.create_table(TABLE_PRODUCT_VARIANT).await?;
        Ok(Self { datastore: m })
    }

    /// seed the catalog, the search / fetch surface of this repo is
    /// read-only so unit tests load fixtures through here
    pub async fn save_products(&self, items: Vec<ProductModel>) -> DefaultResult<(), AppError> {
        let mut prod_rows: AppInMemFetchedSingleTable = HashMap::new();
        let mut var_rows: AppInMemFetchedSingleTable = HashMap::new();
        for item in items.iter() {
            prod_rows.insert(item.id_.to_string(), ProductTable::to_row(item));
            for v in item.variants.iter() {
                var_rows.insert(v.id_.to_string(), VariantTable::to_row(item.id_, v));
            }
        }
        let data = HashMap::from([
            (TABLE_PRODUCT_TOPLVL.to_string(), prod_rows),
            (TABLE_PRODUCT_VARIANT.to_string(), var_rows),
        ]);
        let _num = self.datastore.save(data).await?;
        Ok(())
    }

    async fn fetch_rows(
        &self,
        table: &str,
        keys: Vec<String>,
    ) -> DefaultResult<AppInMemFetchedSingleTable, AppError> {
        let info: AppInMemFetchKeys = HashMap::from([(table.to_string(), keys)]);
        let mut result = self.datastore.fetch(info).await?;
        Ok(result.remove(table).unwrap())
    }

    async fn variants_of(&self, product_id: u64) -> DefaultResult<Vec<ProductVariantModel>, AppError> {
        let op = VariantOfProductKeyOp {
            product_id: product_id.to_string(),
        };
        let keys = self
            .datastore
            .filter_keys(TABLE_PRODUCT_VARIANT.to_string(), &op)
            .await?;
        let rows = self.fetch_rows(TABLE_PRODUCT_VARIANT, keys).await?;
        let mut out = rows
            .iter()
            .map(|(k, v)| VariantTable::to_model(k, v))
            .collect::<Vec<_>>();
        out.sort_by_key(|v| v.id_);
        Ok(out)
    }
} // end of impl ProductInMemRepo

#[async_trait]
impl AbsProductRepo for ProductInMemRepo {
    async fn search(
        &self,
        filt: ProductSearchFilter,
    ) -> DefaultResult<Vec<ProductModel>, AppError> {
        let op = SearchFilterKeyOp {
            name_kw: filt.name.map(|s| s.to_lowercase()),
            descr_kw: filt.description.map(|s| s.to_lowercase()),
        };
        let keys = self
            .datastore
            .filter_keys(TABLE_PRODUCT_TOPLVL.to_string(), &op)
            .await?;
        let rows = self.fetch_rows(TABLE_PRODUCT_TOPLVL, keys).await?;
        let mut found = rows
            .iter()
            .map(|(k, v)| ProductTable::to_model(k, v))
            .collect::<Vec<_>>();
        found.sort_by_key(|p| p.id_);
        let mut out = Vec::with_capacity(found.len());
        for mut item in found {
            item.variants = self.variants_of(item.id_).await?;
            // the search view does not expose category / garment columns
            item.category = None;
            item.garment_type = None;
            out.push(item);
        }
        Ok(out)
    } // end of fn search

    async fn fetch_product(&self, id_: u64) -> DefaultResult<Option<ProductModel>, AppError> {
        let key = id_.to_string();
        let mut rows = self
            .fetch_rows(TABLE_PRODUCT_TOPLVL, vec![key.clone()])
            .await?;
        match rows.remove(&key) {
            Some(row) => {
                let mut obj = ProductTable::to_model(key.as_str(), &row);
                obj.variants = self.variants_of(id_).await?;
                Ok(Some(obj))
            }
            None => Ok(None),
        }
    }

    async fn fetch_variant(
        &self,
        id_: u64,
    ) -> DefaultResult<Option<VariantPurchaseModel>, AppError> {
        let key = id_.to_string();
        let mut rows = self
            .fetch_rows(TABLE_PRODUCT_VARIANT, vec![key.clone()])
            .await?;
        let variant_row = match rows.remove(&key) {
            Some(v) => v,
            None => return Ok(None),
        };
        let product_id = variant_row[0].parse::<u64>().unwrap();
        let pkey = product_id.to_string();
        let mut prows = self
            .fetch_rows(TABLE_PRODUCT_TOPLVL, vec![pkey.clone()])
            .await?;
        let product_row = prows.remove(&pkey).ok_or(AppError {
            code: AppErrorCode::DataCorruption,
            detail: Some(format!("missing-product:{}", product_id)),
        })?;
        let product = ProductTable::to_model(pkey.as_str(), &product_row);
        let out = VariantPurchaseModel {
            variant_id: id_,
            stock: variant_row[1].parse().unwrap(),
            product: ProductBriefModel {
                id_: product.id_,
                name: product.name.clone(),
                description: product.description.clone(),
                price: product.price,
            },
            garment_type: product.garment_type,
        };
        Ok(Some(out))
    } // end of fn fetch_variant
} // end of impl AbsProductRepo for ProductInMemRepo
