use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::adapter::datastore::{AppRestStoreNode, StoreQuery};
use crate::error::AppError;
use crate::model::{
    GarmentTypeModel, ProductBriefModel, ProductModel, ProductSearchFilter, ProductVariantModel,
    VariantPurchaseModel,
};
use crate::repository::AbsProductRepo;

use super::{decode_row, OptionRow};

const TABLE_PRODUCTS: &str = "products";
const TABLE_PRODUCT_VARIANTS: &str = "product_variants";

const SELECT_SEARCH: &str = "*,product_variants(id,stock,colors(id,name),sizes(id,name))";
const SELECT_DETAIL: &str =
    "*,categories(id,name),garment_types(id,name),product_variants(id,stock,colors(id,name),sizes(id,name))";
const SELECT_PURCHASE: &str =
    "id,stock,products(id,name,description,price,garment_types(id,name))";

#[derive(Deserialize)]
struct VariantRow {
    id: u64,
    stock: u32,
    colors: Option<OptionRow>,
    sizes: Option<OptionRow>,
}

impl From<VariantRow> for ProductVariantModel {
    fn from(value: VariantRow) -> Self {
        Self {
            id_: value.id,
            stock: value.stock,
            color: value.colors.map(OptionRow::into),
            size: value.sizes.map(OptionRow::into),
        }
    }
}

#[derive(Deserialize)]
struct ProductRow {
    id: u64,
    name: String,
    description: Option<String>,
    price: Decimal,
    #[serde(default)]
    available: Option<bool>,
    categories: Option<OptionRow>,
    garment_types: Option<OptionRow>,
    #[serde(default)]
    product_variants: Vec<VariantRow>,
}

impl From<ProductRow> for ProductModel {
    fn from(value: ProductRow) -> Self {
        Self {
            id_: value.id,
            name: value.name,
            description: value.description,
            price: value.price,
            available: value.available.unwrap_or(true),
            category: value.categories.map(OptionRow::into),
            garment_type: value.garment_types.map(|g| GarmentTypeModel {
                id_: g.id,
                name: g.name,
            }),
            variants: value
                .product_variants
                .into_iter()
                .map(VariantRow::into)
                .collect(),
        }
    }
}

#[derive(Deserialize)]
struct PurchaseVariantRow {
    id: u64,
    stock: u32,
    products: PurchaseProductRow,
}

#[derive(Deserialize)]
struct PurchaseProductRow {
    id: u64,
    name: String,
    description: Option<String>,
    price: Decimal,
    garment_types: Option<OptionRow>,
}

impl From<PurchaseVariantRow> for VariantPurchaseModel {
    fn from(value: PurchaseVariantRow) -> Self {
        Self {
            variant_id: value.id,
            stock: value.stock,
            product: ProductBriefModel {
                id_: value.products.id,
                name: value.products.name,
                description: value.products.description,
                price: value.products.price,
            },
            garment_type: value.products.garment_types.map(|g| GarmentTypeModel {
                id_: g.id,
                name: g.name,
            }),
        }
    }
}

pub(in crate::repository) struct ProductRestRepo {
    node: Arc<AppRestStoreNode>,
}

impl ProductRestRepo {
    pub(in crate::repository) fn new(node: Arc<AppRestStoreNode>) -> Self {
        Self { node }
    }
}

#[async_trait]
impl AbsProductRepo for ProductRestRepo {
    async fn search(
        &self,
        filt: ProductSearchFilter,
    ) -> DefaultResult<Vec<ProductModel>, AppError> {
        let query = StoreQuery {
            select: Some(SELECT_SEARCH),
            available: StoreQuery::op_eq("true"),
            name: filt.name.as_deref().and_then(StoreQuery::op_ilike),
            description: filt.description.as_deref().and_then(StoreQuery::op_ilike),
            ..Default::default()
        };
        let rows = self.node.select(TABLE_PRODUCTS, &query).await?;
        let mut out = Vec::with_capacity(rows.len());
        for raw in rows {
            let row = decode_row::<ProductRow>(raw)?;
            out.push(row.into());
        }
        Ok(out)
    }

    async fn fetch_product(&self, id_: u64) -> DefaultResult<Option<ProductModel>, AppError> {
        let query = StoreQuery {
            select: Some(SELECT_DETAIL),
            id: StoreQuery::op_eq(id_),
            ..Default::default()
        };
        let mut rows = self.node.select(TABLE_PRODUCTS, &query).await?;
        if rows.is_empty() {
            Ok(None)
        } else {
            let row = decode_row::<ProductRow>(rows.remove(0))?;
            Ok(Some(row.into()))
        }
    }

    async fn fetch_variant(
        &self,
        id_: u64,
    ) -> DefaultResult<Option<VariantPurchaseModel>, AppError> {
        let query = StoreQuery {
            select: Some(SELECT_PURCHASE),
            id: StoreQuery::op_eq(id_),
            ..Default::default()
        };
        let mut rows = self.node.select(TABLE_PRODUCT_VARIANTS, &query).await?;
        if rows.is_empty() {
            Ok(None)
        } else {
            let row = decode_row::<PurchaseVariantRow>(rows.remove(0))?;
            Ok(Some(row.into()))
        }
    }
} // end of impl AbsProductRepo for ProductRestRepo
