use std::str::FromStr;

use rust_decimal::Decimal;

use storefront::error::AppErrorCode;
use storefront::model::{CartIdentifier, CartStatus};
use storefront::repository::{AbsCartRepo, CartInMemRepo, ProductInMemRepo};

use crate::{ut_product_fixtures, ut_setup_datastore};

#[tokio::test]
async fn create_then_fetch_ok() {
    let ds = ut_setup_datastore(200);
    let repo = CartInMemRepo::new(ds.clone()).await.unwrap();
    let created = repo.create(None, None).await.unwrap();
    assert_eq!(created.id_, CartIdentifier::Numeric(1));
    assert!(created.owner.is_none());
    assert!(created.status.is_none());
    let fetched = repo.fetch(&created.id_).await.unwrap().unwrap();
    assert_eq!(fetched.id_, created.id_);
    // identifiers this repo never minted resolve to nothing
    let absent = repo.fetch(&CartIdentifier::Numeric(555)).await.unwrap();
    assert!(absent.is_none());
    let opaque = CartIdentifier::from_str("3fa9c1aa-0b0e-4ec7-9f04-3c2b11d0a5b3").unwrap();
    let absent = repo.fetch(&opaque).await.unwrap();
    assert!(absent.is_none());
}

#[tokio::test]
async fn active_cart_per_client() {
    let ds = ut_setup_datastore(200);
    let repo = CartInMemRepo::new(ds.clone()).await.unwrap();
    let created = repo
        .create(Some(41), Some(CartStatus::Active))
        .await
        .unwrap();
    let found = repo.fetch_active_by_client(41).await.unwrap().unwrap();
    assert_eq!(found.id_, created.id_);
    assert_eq!(found.status, Some(CartStatus::Active));
    let absent = repo.fetch_active_by_client(42).await.unwrap();
    assert!(absent.is_none());
}

#[tokio::test]
async fn line_insert_update_delete() {
    let ds = ut_setup_datastore(200);
    let repo = CartInMemRepo::new(ds.clone()).await.unwrap();
    let cart = repo.create(None, None).await.unwrap();

    let line = repo.insert_line(&cart.id_, 5001, 3).await.unwrap();
    assert_eq!(line.qty, 3);
    let found = repo
        .fetch_line_by_variant(&cart.id_, 5001)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id_, line.id_);
    assert_eq!(found.qty, 3);
    let absent = repo.fetch_line_by_variant(&cart.id_, 9999).await.unwrap();
    assert!(absent.is_none());

    let updated = repo.update_line_qty(&cart.id_, line.id_, 5).await.unwrap();
    assert_eq!(updated.qty, 5);
    let found = repo.fetch_line(&cart.id_, line.id_).await.unwrap().unwrap();
    assert_eq!(found.qty, 5);

    // a line is scoped to its own cart, another cart id sees nothing
    let other = repo.create(None, None).await.unwrap();
    let cross = repo.fetch_line(&other.id_, line.id_).await.unwrap();
    assert!(cross.is_none());
    let error = repo.update_line_qty(&other.id_, line.id_, 2).await.unwrap_err();
    assert_eq!(error.code, AppErrorCode::CartItemNotExist);

    repo.delete_line(&cart.id_, line.id_).await.unwrap();
    let error = repo.delete_line(&cart.id_, line.id_).await.unwrap_err();
    assert_eq!(error.code, AppErrorCode::CartItemNotExist);
} // end of fn line_insert_update_delete

#[tokio::test]
async fn detail_joins_catalog_rows() {
    let ds = ut_setup_datastore(200);
    let p_repo = ProductInMemRepo::new(ds.clone()).await.unwrap();
    p_repo.save_products(ut_product_fixtures()).await.unwrap();
    let repo = CartInMemRepo::new(ds.clone()).await.unwrap();
    let cart = repo.create(None, None).await.unwrap();
    let _l1 = repo.insert_line(&cart.id_, 5001, 2).await.unwrap();
    let _l2 = repo.insert_line(&cart.id_, 5003, 3).await.unwrap();

    let detail = repo.fetch_detail(&cart.id_).await.unwrap();
    assert_eq!(detail.len(), 2);
    let first = detail.iter().find(|d| d.variant_id == 5001).unwrap();
    assert_eq!(first.qty, 2);
    assert_eq!(first.product.price, Decimal::from(10u32));
    assert_eq!(first.product.name.as_str(), "Remera Básica");
    assert_eq!(first.color.as_ref().unwrap().name.as_str(), "Rojo");
    let second = detail.iter().find(|d| d.variant_id == 5003).unwrap();
    assert_eq!(second.product.price, Decimal::from(5u32));
    assert_eq!(second.size.as_ref().unwrap().name.as_str(), "L");

    let empty = repo.create(None, None).await.unwrap();
    let detail = repo.fetch_detail(&empty.id_).await.unwrap();
    assert!(detail.is_empty());
} // end of fn detail_joins_catalog_rows
