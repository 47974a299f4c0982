use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Local as LocalTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value as JsnVal;

use crate::adapter::datastore::{AppRestStoreNode, StoreQuery};
use crate::error::{AppError, AppErrorCode};
use crate::model::{
    CartIdentifier, CartLineDetailModel, CartLineModel, CartModel, CartStatus, ProductBriefModel,
};
use crate::repository::AbsCartRepo;

use super::{decode_row, OptionRow};

const TABLE_CARTS: &str = "carts";
const TABLE_CART_ITEMS: &str = "cart_items";

const SELECT_CART: &str = "id,client_id,status,created_at";
const SELECT_CART_ITEM: &str = "id,cart_id,product_variant_id,qty";
const SELECT_CART_DETAIL: &str = "id,qty,product_variants(id,stock,products(id,name,description,price),colors(id,name),sizes(id,name))";

#[derive(Deserialize)]
struct CartRow {
    id: CartIdentifier,
    client_id: Option<u64>,
    status: Option<String>,
    created_at: Option<String>,
}

impl TryFrom<CartRow> for CartModel {
    type Error = AppError;
    fn try_from(value: CartRow) -> DefaultResult<Self, Self::Error> {
        let created_at = match value.created_at.as_deref() {
            Some(raw) => parse_store_time(raw)?,
            None => LocalTime::now().fixed_offset(),
        };
        Ok(Self {
            id_: value.id,
            owner: value.client_id,
            status: value.status.map(|s| CartStatus::from(s.as_str())),
            created_at,
        })
    }
}

#[derive(Deserialize)]
struct CartItemRow {
    id: u64,
    cart_id: CartIdentifier,
    product_variant_id: u64,
    qty: u32,
}

impl From<CartItemRow> for CartLineModel {
    fn from(value: CartItemRow) -> Self {
        Self {
            id_: value.id,
            cart_id: value.cart_id,
            variant_id: value.product_variant_id,
            qty: value.qty,
        }
    }
}

#[derive(Deserialize)]
struct CartDetailRow {
    id: u64,
    qty: u32,
    product_variants: DetailVariantRow,
}

#[derive(Deserialize)]
struct DetailVariantRow {
    id: u64,
    stock: u32,
    products: DetailProductRow,
    colors: Option<OptionRow>,
    sizes: Option<OptionRow>,
}

#[derive(Deserialize)]
struct DetailProductRow {
    id: u64,
    name: String,
    description: Option<String>,
    price: Decimal,
}

impl From<CartDetailRow> for CartLineDetailModel {
    fn from(value: CartDetailRow) -> Self {
        let v = value.product_variants;
        Self {
            line_id: value.id,
            qty: value.qty,
            variant_id: v.id,
            stock: v.stock,
            product: ProductBriefModel {
                id_: v.products.id,
                name: v.products.name,
                description: v.products.description,
                price: v.products.price,
            },
            color: v.colors.map(OptionRow::into),
            size: v.sizes.map(OptionRow::into),
        }
    }
}

// the store emits RFC-3339 timestamps, anything else is corrupted data
fn parse_store_time(raw: &str) -> DefaultResult<DateTime<FixedOffset>, AppError> {
    DateTime::parse_from_rfc3339(raw).map_err(|e| AppError {
        code: AppErrorCode::DataCorruption,
        detail: Some(format!("created-at:{}, {}", raw, e)),
    })
}

pub(in crate::repository) struct CartRestRepo {
    node: Arc<AppRestStoreNode>,
}

impl CartRestRepo {
    pub(in crate::repository) fn new(node: Arc<AppRestStoreNode>) -> Self {
        Self { node }
    }

    fn single_row(mut rows: Vec<JsnVal>) -> Option<JsnVal> {
        if rows.is_empty() {
            None
        } else {
            Some(rows.remove(0))
        }
    }
} // end of impl CartRestRepo

#[async_trait]
impl AbsCartRepo for CartRestRepo {
    async fn create(
        &self,
        owner: Option<u64>,
        status: Option<CartStatus>,
    ) -> DefaultResult<CartModel, AppError> {
        let mut row = serde_json::json!({
            "created_at": LocalTime::now().fixed_offset().to_rfc3339(),
        });
        if let Some(o) = owner {
            row["client_id"] = serde_json::json!(o);
        }
        if let Some(s) = status.as_ref() {
            row["status"] = serde_json::json!(s.as_str());
        }
        let rows = self.node.insert(TABLE_CARTS, row).await?;
        let raw = Self::single_row(rows).ok_or(AppError {
            code: AppErrorCode::RemoteStoreFailure,
            detail: Some("cart-insert-no-representation".to_string()),
        })?;
        decode_row::<CartRow>(raw)?.try_into()
    }

    async fn fetch(&self, id_: &CartIdentifier) -> DefaultResult<Option<CartModel>, AppError> {
        let query = StoreQuery {
            select: Some(SELECT_CART),
            id: StoreQuery::op_eq(id_),
            ..Default::default()
        };
        let rows = self.node.select(TABLE_CARTS, &query).await?;
        match Self::single_row(rows) {
            Some(raw) => Ok(Some(decode_row::<CartRow>(raw)?.try_into()?)),
            None => Ok(None),
        }
    }

    async fn fetch_active_by_client(
        &self,
        client_id: u64,
    ) -> DefaultResult<Option<CartModel>, AppError> {
        let query = StoreQuery {
            select: Some(SELECT_CART),
            client_id: StoreQuery::op_eq(client_id),
            status: StoreQuery::op_eq(crate::constant::CART_STATUS_ACTIVE),
            ..Default::default()
        };
        let rows = self.node.select(TABLE_CARTS, &query).await?;
        match Self::single_row(rows) {
            Some(raw) => Ok(Some(decode_row::<CartRow>(raw)?.try_into()?)),
            None => Ok(None),
        }
    }

    async fn fetch_line_by_variant(
        &self,
        cart_id: &CartIdentifier,
        variant_id: u64,
    ) -> DefaultResult<Option<CartLineModel>, AppError> {
        let query = StoreQuery {
            select: Some(SELECT_CART_ITEM),
            cart_id: StoreQuery::op_eq(cart_id),
            product_variant_id: StoreQuery::op_eq(variant_id),
            ..Default::default()
        };
        let rows = self.node.select(TABLE_CART_ITEMS, &query).await?;
        match Self::single_row(rows) {
            Some(raw) => Ok(Some(decode_row::<CartItemRow>(raw)?.into())),
            None => Ok(None),
        }
    }

    async fn fetch_line(
        &self,
        cart_id: &CartIdentifier,
        line_id: u64,
    ) -> DefaultResult<Option<CartLineModel>, AppError> {
        let query = StoreQuery {
            select: Some(SELECT_CART_ITEM),
            id: StoreQuery::op_eq(line_id),
            cart_id: StoreQuery::op_eq(cart_id),
            ..Default::default()
        };
        let rows = self.node.select(TABLE_CART_ITEMS, &query).await?;
        match Self::single_row(rows) {
            Some(raw) => Ok(Some(decode_row::<CartItemRow>(raw)?.into())),
            None => Ok(None),
        }
    }

    async fn insert_line(
        &self,
        cart_id: &CartIdentifier,
        variant_id: u64,
        qty: u32,
    ) -> DefaultResult<CartLineModel, AppError> {
        let row = serde_json::json!({
            "cart_id": cart_id,
            "product_variant_id": variant_id,
            "qty": qty,
        });
        let rows = self.node.insert(TABLE_CART_ITEMS, row).await?;
        let raw = Self::single_row(rows).ok_or(AppError {
            code: AppErrorCode::RemoteStoreFailure,
            detail: Some("cart-item-insert-no-representation".to_string()),
        })?;
        Ok(decode_row::<CartItemRow>(raw)?.into())
    }

    async fn update_line_qty(
        &self,
        cart_id: &CartIdentifier,
        line_id: u64,
        qty: u32,
    ) -> DefaultResult<CartLineModel, AppError> {
        let query = StoreQuery {
            id: StoreQuery::op_eq(line_id),
            cart_id: StoreQuery::op_eq(cart_id),
            ..Default::default()
        };
        let patch = serde_json::json!({ "qty": qty });
        let rows = self.node.update(TABLE_CART_ITEMS, &query, patch).await?;
        let raw = Self::single_row(rows).ok_or(AppError {
            code: AppErrorCode::CartItemNotExist,
            detail: Some(format!("cart:{}, item:{}", cart_id, line_id)),
        })?;
        Ok(decode_row::<CartItemRow>(raw)?.into())
    }

    async fn delete_line(
        &self,
        cart_id: &CartIdentifier,
        line_id: u64,
    ) -> DefaultResult<(), AppError> {
        let query = StoreQuery {
            id: StoreQuery::op_eq(line_id),
            cart_id: StoreQuery::op_eq(cart_id),
            ..Default::default()
        };
        let rows = self.node.delete(TABLE_CART_ITEMS, &query).await?;
        if rows.is_empty() {
            Err(AppError {
                code: AppErrorCode::CartItemNotExist,
                detail: Some(format!("cart:{}, item:{}", cart_id, line_id)),
            })
        } else {
            Ok(())
        }
    }

    async fn fetch_detail(
        &self,
        id_: &CartIdentifier,
    ) -> DefaultResult<Vec<CartLineDetailModel>, AppError> {
        let query = StoreQuery {
            select: Some(SELECT_CART_DETAIL),
            cart_id: StoreQuery::op_eq(id_),
            ..Default::default()
        };
        let rows = self.node.select(TABLE_CART_ITEMS, &query).await?;
        let mut out = Vec::with_capacity(rows.len());
        for raw in rows {
            let row = decode_row::<CartDetailRow>(raw)?;
            out.push(row.into());
        }
        Ok(out)
    }
} // end of impl AbsCartRepo for CartRestRepo
