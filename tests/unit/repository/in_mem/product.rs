use rust_decimal::Decimal;

use storefront::model::ProductSearchFilter;
use storefront::repository::{AbsProductRepo, ProductInMemRepo};

use crate::{ut_product_fixtures, ut_setup_datastore};

async fn ut_seeded_repo() -> ProductInMemRepo {
    let ds = ut_setup_datastore(200);
    let repo = ProductInMemRepo::new(ds).await.unwrap();
    repo.save_products(ut_product_fixtures()).await.unwrap();
    repo
}

#[tokio::test]
async fn search_without_filters() {
    let repo = ut_seeded_repo().await;
    let found = repo.search(ProductSearchFilter::default()).await.unwrap();
    // unavailable products never show up
    let ids = found.iter().map(|p| p.id_).collect::<Vec<_>>();
    assert_eq!(ids.as_slice(), [1001, 1002]);
    let first = &found[0];
    assert_eq!(first.variants.len(), 2);
    assert!(first.category.is_none());
    assert!(first.garment_type.is_none());
}

#[tokio::test]
async fn search_partial_match_is_case_insensitive() {
    let repo = ut_seeded_repo().await;
    let filt = ProductSearchFilter {
        name: Some("REMERA".to_string()),
        description: None,
    };
    let found = repo.search(filt).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id_, 1001);
    let filt = ProductSearchFilter {
        name: None,
        description: Some("resistente".to_string()),
    };
    let found = repo.search(filt).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id_, 1002);
    let filt = ProductSearchFilter {
        name: Some("inexistente".to_string()),
        description: None,
    };
    let found = repo.search(filt).await.unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn fetch_product_with_descriptors() {
    let repo = ut_seeded_repo().await;
    let found = repo.fetch_product(1001).await.unwrap().unwrap();
    assert_eq!(found.name.as_str(), "Remera Básica");
    assert_eq!(found.price, Decimal::from(10u32));
    assert_eq!(found.category.as_ref().unwrap().name.as_str(), "Ropa");
    assert_eq!(
        found.garment_type.as_ref().unwrap().name.as_str(),
        "Remera Niño"
    );
    assert_eq!(found.variants.len(), 2);
    let absent = repo.fetch_product(9999).await.unwrap();
    assert!(absent.is_none());
}

#[tokio::test]
async fn fetch_variant_for_purchase() {
    let repo = ut_seeded_repo().await;
    let found = repo.fetch_variant(5003).await.unwrap().unwrap();
    assert_eq!(found.stock, 8);
    assert_eq!(found.product.id_, 1002);
    assert_eq!(found.product.price, Decimal::from(5u32));
    assert_eq!(
        found.garment_type.as_ref().unwrap().name.as_str(),
        "Pantalón"
    );
    let absent = repo.fetch_variant(404).await.unwrap();
    assert!(absent.is_none());
}
