use std::boxed::Box;

use crate::error::AppError;
use crate::model::{ProductModel, ProductSearchFilter};
use crate::repository::AbsProductRepo;

pub struct ListProductsUseCase {
    pub repo: Box<dyn AbsProductRepo>,
}

pub struct ProductDetailUseCase {
    pub repo: Box<dyn AbsProductRepo>,
}

pub enum ListProductsUcResult {
    Success(Vec<ProductModel>),
    ServerError(AppError),
}

pub enum ProductDetailUcResult {
    Success(ProductModel),
    NotFound(u64),
    ServerError(AppError),
}

impl ListProductsUseCase {
    pub async fn execute(self, filt: ProductSearchFilter) -> ListProductsUcResult {
        match self.repo.search(filt).await {
            Ok(found) => ListProductsUcResult::Success(found),
            Err(e) => ListProductsUcResult::ServerError(e),
        }
    }
}

impl ProductDetailUseCase {
    pub async fn execute(self, product_id: u64) -> ProductDetailUcResult {
        match self.repo.fetch_product(product_id).await {
            Ok(Some(m)) => ProductDetailUcResult::Success(m),
            Ok(None) => ProductDetailUcResult::NotFound(product_id),
            Err(e) => ProductDetailUcResult::ServerError(e),
        }
    }
}
