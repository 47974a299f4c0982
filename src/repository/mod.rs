mod in_mem;
mod rest;

use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{AppError, AppErrorCode};
use crate::model::{
    CartIdentifier, CartLineDetailModel, CartLineModel, CartModel, CartStatus, ClientModel,
    ProductModel, ProductSearchFilter, VariantPurchaseModel,
};
use crate::AppDataStoreContext;

// make in-memory repos visible for testing purpose
pub use in_mem::cart::CartInMemRepo;
pub use in_mem::client::ClientInMemRepo;
pub use in_mem::product::ProductInMemRepo;

use rest::cart::CartRestRepo;
use rest::client::ClientRestRepo;
use rest::product::ProductRestRepo;

// the repository instance may be used across an await,
// the future created by app callers has to be able to pass to different
// threads, it is the reason to add `Send` and `Sync` as super-traits
#[async_trait]
pub trait AbsCartRepo: Sync + Send {
    async fn create(
        &self,
        owner: Option<u64>,
        status: Option<CartStatus>,
    ) -> DefaultResult<CartModel, AppError>;

    async fn fetch(&self, id_: &CartIdentifier) -> DefaultResult<Option<CartModel>, AppError>;

    async fn fetch_active_by_client(
        &self,
        client_id: u64,
    ) -> DefaultResult<Option<CartModel>, AppError>;

    async fn fetch_line_by_variant(
        &self,
        cart_id: &CartIdentifier,
        variant_id: u64,
    ) -> DefaultResult<Option<CartLineModel>, AppError>;

    async fn fetch_line(
        &self,
        cart_id: &CartIdentifier,
        line_id: u64,
    ) -> DefaultResult<Option<CartLineModel>, AppError>;

    async fn insert_line(
        &self,
        cart_id: &CartIdentifier,
        variant_id: u64,
        qty: u32,
    ) -> DefaultResult<CartLineModel, AppError>;

    async fn update_line_qty(
        &self,
        cart_id: &CartIdentifier,
        line_id: u64,
        qty: u32,
    ) -> DefaultResult<CartLineModel, AppError>;

    async fn delete_line(
        &self,
        cart_id: &CartIdentifier,
        line_id: u64,
    ) -> DefaultResult<(), AppError>;

    /// all lines of one cart joined with variant / product / color / size
    /// descriptors, an empty cart yields an empty vector, not an error
    async fn fetch_detail(
        &self,
        id_: &CartIdentifier,
    ) -> DefaultResult<Vec<CartLineDetailModel>, AppError>;
} // end of trait AbsCartRepo

#[async_trait]
pub trait AbsProductRepo: Sync + Send {
    async fn search(
        &self,
        filt: ProductSearchFilter,
    ) -> DefaultResult<Vec<ProductModel>, AppError>;

    async fn fetch_product(&self, id_: u64) -> DefaultResult<Option<ProductModel>, AppError>;

    async fn fetch_variant(
        &self,
        id_: u64,
    ) -> DefaultResult<Option<VariantPurchaseModel>, AppError>;
}

#[async_trait]
pub trait AbsClientRepo: Sync + Send {
    async fn fetch_by_email(&self, email: &str) -> DefaultResult<Option<ClientModel>, AppError>;

    async fn create(
        &self,
        name: &str,
        email: &str,
        phone: Option<&str>,
    ) -> DefaultResult<ClientModel, AppError>;

    async fn update_phone(&self, client_id: u64, phone: &str) -> DefaultResult<(), AppError>;
}

pub async fn app_repo_cart(
    ds: Arc<AppDataStoreContext>,
) -> DefaultResult<Box<dyn AbsCartRepo>, AppError> {
    if let Some(node) = ds.rest_node.as_ref() {
        let obj = CartRestRepo::new(node.clone());
        Ok(Box::new(obj))
    } else if let Some(m) = ds.in_mem.as_ref() {
        let obj = CartInMemRepo::new(m.clone()).await?;
        Ok(Box::new(obj))
    } else {
        Err(AppError {
            code: AppErrorCode::MissingDataStore,
            detail: Some("cart".to_string()),
        })
    }
}

pub async fn app_repo_product(
    ds: Arc<AppDataStoreContext>,
) -> DefaultResult<Box<dyn AbsProductRepo>, AppError> {
    if let Some(node) = ds.rest_node.as_ref() {
        let obj = ProductRestRepo::new(node.clone());
        Ok(Box::new(obj))
    } else if let Some(m) = ds.in_mem.as_ref() {
        let obj = ProductInMemRepo::new(m.clone()).await?;
        Ok(Box::new(obj))
    } else {
        Err(AppError {
            code: AppErrorCode::MissingDataStore,
            detail: Some("product".to_string()),
        })
    }
}

pub async fn app_repo_client(
    ds: Arc<AppDataStoreContext>,
) -> DefaultResult<Box<dyn AbsClientRepo>, AppError> {
    if let Some(node) = ds.rest_node.as_ref() {
        let obj = ClientRestRepo::new(node.clone());
        Ok(Box::new(obj))
    } else if let Some(m) = ds.in_mem.as_ref() {
        let obj = ClientInMemRepo::new(m.clone()).await?;
        Ok(Box::new(obj))
    } else {
        Err(AppError {
            code: AppErrorCode::MissingDataStore,
            detail: Some("client".to_string()),
        })
    }
}
