use std::time::Duration;

use rust_decimal::Decimal;

use storefront::api::web::dto::{CartItemQtyDto, CartItemReqDto};
use storefront::model::CartIdentifier;
use storefront::repository::AbsCartRepo;
use storefront::usecase::{
    AddCartItemUcResult, AddCartItemUseCase, CreateCartUcResult, CreateCartUseCase,
    RemoveCartItemUcResult, RemoveCartItemUseCase, RetrieveCartUcResult, RetrieveCartUseCase,
    UpdateCartItemUcResult, UpdateCartItemUseCase,
};

use super::{ut_cart_repo, ut_product_repo, ut_relay_handle, ut_seeded_store, MockChatRelay};
use crate::ut_setup_log_context;

fn ut_item_req(variant_id: u64, qty: i64) -> CartItemReqDto {
    CartItemReqDto {
        product_variant_id: Some(variant_id),
        qty: Some(qty),
        conversation_id: None,
    }
}

async fn ut_new_cart(repo: Box<dyn AbsCartRepo>) -> CartIdentifier {
    let uc = CreateCartUseCase { repo };
    match uc.execute().await {
        CreateCartUcResult::Success(m) => m.id_,
        CreateCartUcResult::ServerError(e) => panic!("cart setup failure: {}", e),
    }
}

async fn ut_add_uc(
    ds: &std::sync::Arc<Box<dyn storefront::datastore::AbstInMemoryDStore>>,
) -> AddCartItemUseCase {
    AddCartItemUseCase {
        c_repo: ut_cart_repo(ds).await,
        p_repo: ut_product_repo(ds).await,
        chat_relay: None,
        log_ctx: ut_setup_log_context(),
    }
}

#[tokio::test]
async fn add_twice_merges_into_single_line() {
    let ds = ut_seeded_store().await;
    let cart_id = ut_new_cart(ut_cart_repo(&ds).await).await;
    // variant 5002 has stock 10, two sequential adds stay within it
    let uc = ut_add_uc(&ds).await;
    let result = uc.execute(cart_id.clone(), ut_item_req(5002, 2)).await;
    let line_id = match result {
        AddCartItemUcResult::Created(line) => {
            assert_eq!(line.qty, 2);
            line.id_
        }
        _others => panic!("expected insert path"),
    };
    let uc = ut_add_uc(&ds).await;
    let result = uc.execute(cart_id.clone(), ut_item_req(5002, 3)).await;
    match result {
        AddCartItemUcResult::Updated(line) => {
            assert_eq!(line.id_, line_id);
            assert_eq!(line.qty, 5);
        }
        _others => panic!("expected merge path"),
    }
    // still exactly one saved line for the (cart, variant) pair
    let repo = ut_cart_repo(&ds).await;
    let detail = repo.fetch_detail(&cart_id).await.unwrap();
    assert_eq!(detail.len(), 1);
    assert_eq!(detail[0].qty, 5);
} // end of fn add_twice_merges_into_single_line

#[tokio::test]
async fn add_single_call_exceeding_stock() {
    let ds = ut_seeded_store().await;
    let cart_id = ut_new_cart(ut_cart_repo(&ds).await).await;
    // variant 5001 has stock 5
    let uc = ut_add_uc(&ds).await;
    let result = uc.execute(cart_id.clone(), ut_item_req(5001, 9)).await;
    match result {
        AddCartItemUcResult::InsufficientStock { available } => assert_eq!(available, 5),
        _others => panic!("expected stock rejection"),
    }
    // nothing was written
    let repo = ut_cart_repo(&ds).await;
    let saved = repo.fetch_line_by_variant(&cart_id, 5001).await.unwrap();
    assert!(saved.is_none());
}

#[tokio::test]
async fn add_merge_exceeding_stock_keeps_saved_qty() {
    let ds = ut_seeded_store().await;
    let cart_id = ut_new_cart(ut_cart_repo(&ds).await).await;
    let uc = ut_add_uc(&ds).await;
    let result = uc.execute(cart_id.clone(), ut_item_req(5001, 3)).await;
    assert!(matches!(result, AddCartItemUcResult::Created(_)));
    // 3 saved + 3 requested exceeds the stock of 5
    let uc = ut_add_uc(&ds).await;
    let result = uc.execute(cart_id.clone(), ut_item_req(5001, 3)).await;
    match result {
        AddCartItemUcResult::InsufficientStock { available } => assert_eq!(available, 5),
        _others => panic!("expected stock rejection on merge"),
    }
    let repo = ut_cart_repo(&ds).await;
    let saved = repo
        .fetch_line_by_variant(&cart_id, 5001)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved.qty, 3);
} // end of fn add_merge_exceeding_stock_keeps_saved_qty

#[tokio::test]
async fn add_rejects_bad_references() {
    let ds = ut_seeded_store().await;
    let uc = ut_add_uc(&ds).await;
    let ghost = CartIdentifier::Numeric(404);
    let result = uc.execute(ghost.clone(), ut_item_req(5001, 1)).await;
    assert!(matches!(result, AddCartItemUcResult::CartNotFound(_)));

    let cart_id = ut_new_cart(ut_cart_repo(&ds).await).await;
    let uc = ut_add_uc(&ds).await;
    let result = uc.execute(cart_id.clone(), ut_item_req(77777, 1)).await;
    match result {
        AddCartItemUcResult::VariantNotFound(id_) => assert_eq!(id_, 77777),
        _others => panic!("expected variant rejection"),
    }

    let uc = ut_add_uc(&ds).await;
    let result = uc.execute(cart_id.clone(), ut_item_req(5001, 0)).await;
    assert!(matches!(result, AddCartItemUcResult::InvalidRequest));
    let uc = ut_add_uc(&ds).await;
    let data = CartItemReqDto {
        product_variant_id: None,
        qty: Some(2),
        conversation_id: None,
    };
    let result = uc.execute(cart_id, data).await;
    assert!(matches!(result, AddCartItemUcResult::InvalidRequest));
} // end of fn add_rejects_bad_references

#[tokio::test]
async fn add_attaches_garment_label_detached() {
    let ds = ut_seeded_store().await;
    let cart_id = ut_new_cart(ut_cart_repo(&ds).await).await;
    let mock = MockChatRelay::new();
    let uc = AddCartItemUseCase {
        c_repo: ut_cart_repo(&ds).await,
        p_repo: ut_product_repo(&ds).await,
        chat_relay: Some(ut_relay_handle(&mock)),
        log_ctx: ut_setup_log_context(),
    };
    let data = CartItemReqDto {
        product_variant_id: Some(5001),
        qty: Some(1),
        conversation_id: Some(900),
    };
    let result = uc.execute(cart_id, data).await;
    assert!(matches!(result, AddCartItemUcResult::Created(_)));
    // labeling runs on a detached task, give it a moment
    tokio::time::sleep(Duration::from_millis(50)).await;
    let calls = mock.recorded();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0.as_str(), "labels");
    assert_eq!(calls[0].1, 900);
    assert_eq!(calls[0].2.as_str(), "remeranino");
} // end of fn add_attaches_garment_label_detached

#[tokio::test]
async fn add_succeeds_even_when_relay_fails() {
    let ds = ut_seeded_store().await;
    let cart_id = ut_new_cart(ut_cart_repo(&ds).await).await;
    let mock = {
        let mut m = MockChatRelay::new();
        m.fail_labels = true;
        m
    };
    let uc = AddCartItemUseCase {
        c_repo: ut_cart_repo(&ds).await,
        p_repo: ut_product_repo(&ds).await,
        chat_relay: Some(ut_relay_handle(&mock)),
        log_ctx: ut_setup_log_context(),
    };
    let data = CartItemReqDto {
        product_variant_id: Some(5001),
        qty: Some(2),
        conversation_id: Some(901),
    };
    let result = uc.execute(cart_id.clone(), data).await;
    assert!(matches!(result, AddCartItemUcResult::Created(_)));
    tokio::time::sleep(Duration::from_millis(50)).await;
    let repo = ut_cart_repo(&ds).await;
    let saved = repo
        .fetch_line_by_variant(&cart_id, 5001)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved.qty, 2);
} // end of fn add_succeeds_even_when_relay_fails

#[tokio::test]
async fn retrieve_cart_totals() {
    let ds = ut_seeded_store().await;
    let cart_id = ut_new_cart(ut_cart_repo(&ds).await).await;
    let uc = ut_add_uc(&ds).await;
    let _r = uc.execute(cart_id.clone(), ut_item_req(5001, 2)).await;
    let uc = ut_add_uc(&ds).await;
    let _r = uc.execute(cart_id.clone(), ut_item_req(5003, 3)).await;

    let uc = RetrieveCartUseCase {
        repo: ut_cart_repo(&ds).await,
    };
    match uc.execute(cart_id).await {
        RetrieveCartUcResult::Success(summary) => {
            // unit price 10 x 2 + unit price 5 x 3
            assert_eq!(summary.total(), Decimal::from(35u32));
            assert_eq!(summary.item_count(), 2);
        }
        _others => panic!("expected populated summary"),
    }
}

#[tokio::test]
async fn retrieve_empty_and_missing_cart() {
    let ds = ut_seeded_store().await;
    let cart_id = ut_new_cart(ut_cart_repo(&ds).await).await;
    let uc = RetrieveCartUseCase {
        repo: ut_cart_repo(&ds).await,
    };
    match uc.execute(cart_id).await {
        RetrieveCartUcResult::Success(summary) => {
            assert_eq!(summary.total(), Decimal::ZERO);
            assert_eq!(summary.item_count(), 0);
        }
        _others => panic!("an empty cart is a valid summary"),
    }
    let uc = RetrieveCartUseCase {
        repo: ut_cart_repo(&ds).await,
    };
    let result = uc.execute(CartIdentifier::Numeric(404)).await;
    assert!(matches!(result, RetrieveCartUcResult::NotFound(_)));
}

#[tokio::test]
async fn update_item_rejects_non_positive_qty() {
    let ds = ut_seeded_store().await;
    let cart_id = ut_new_cart(ut_cart_repo(&ds).await).await;
    let uc = ut_add_uc(&ds).await;
    let line_id = match uc.execute(cart_id.clone(), ut_item_req(5002, 4)).await {
        AddCartItemUcResult::Created(line) => line.id_,
        _others => panic!("setup failed"),
    };
    for bad_qty in [Some(0i64), Some(-2i64), None] {
        let uc = UpdateCartItemUseCase {
            c_repo: ut_cart_repo(&ds).await,
            p_repo: ut_product_repo(&ds).await,
        };
        let result = uc
            .execute(cart_id.clone(), line_id, CartItemQtyDto { qty: bad_qty })
            .await;
        assert!(matches!(result, UpdateCartItemUcResult::InvalidRequest));
    }
    // the stored quantity stayed untouched
    let repo = ut_cart_repo(&ds).await;
    let saved = repo.fetch_line(&cart_id, line_id).await.unwrap().unwrap();
    assert_eq!(saved.qty, 4);
} // end of fn update_item_rejects_non_positive_qty

#[tokio::test]
async fn update_item_absolute_stock_check() {
    let ds = ut_seeded_store().await;
    let cart_id = ut_new_cart(ut_cart_repo(&ds).await).await;
    let uc = ut_add_uc(&ds).await;
    let line_id = match uc.execute(cart_id.clone(), ut_item_req(5001, 2)).await {
        AddCartItemUcResult::Created(line) => line.id_,
        _others => panic!("setup failed"),
    };
    // replacement beyond the stock of 5 is rejected outright
    let uc = UpdateCartItemUseCase {
        c_repo: ut_cart_repo(&ds).await,
        p_repo: ut_product_repo(&ds).await,
    };
    let result = uc
        .execute(cart_id.clone(), line_id, CartItemQtyDto { qty: Some(6) })
        .await;
    match result {
        UpdateCartItemUcResult::InsufficientStock { available } => assert_eq!(available, 5),
        _others => panic!("expected stock rejection"),
    }
    // replacement equal to stock passes, it is not a delta check
    let uc = UpdateCartItemUseCase {
        c_repo: ut_cart_repo(&ds).await,
        p_repo: ut_product_repo(&ds).await,
    };
    let result = uc
        .execute(cart_id.clone(), line_id, CartItemQtyDto { qty: Some(5) })
        .await;
    match result {
        UpdateCartItemUcResult::Success(line) => assert_eq!(line.qty, 5),
        _others => panic!("expected accepted replacement"),
    }
} // end of fn update_item_absolute_stock_check

#[tokio::test]
async fn update_missing_item_not_found() {
    let ds = ut_seeded_store().await;
    let cart_id = ut_new_cart(ut_cart_repo(&ds).await).await;
    let uc = UpdateCartItemUseCase {
        c_repo: ut_cart_repo(&ds).await,
        p_repo: ut_product_repo(&ds).await,
    };
    let result = uc
        .execute(cart_id, 12345, CartItemQtyDto { qty: Some(1) })
        .await;
    assert!(matches!(result, UpdateCartItemUcResult::NotFound));
}

#[tokio::test]
async fn remove_item_twice_second_not_found() {
    let ds = ut_seeded_store().await;
    let cart_id = ut_new_cart(ut_cart_repo(&ds).await).await;
    let uc = ut_add_uc(&ds).await;
    let line_id = match uc.execute(cart_id.clone(), ut_item_req(5003, 1)).await {
        AddCartItemUcResult::Created(line) => line.id_,
        _others => panic!("setup failed"),
    };
    let uc = RemoveCartItemUseCase {
        repo: ut_cart_repo(&ds).await,
    };
    let result = uc.execute(cart_id.clone(), line_id).await;
    assert!(matches!(result, RemoveCartItemUcResult::Success));
    let uc = RemoveCartItemUseCase {
        repo: ut_cart_repo(&ds).await,
    };
    let result = uc.execute(cart_id.clone(), line_id).await;
    assert!(matches!(result, RemoveCartItemUcResult::NotFound));
    // removing something that never existed behaves the same way
    let uc = RemoveCartItemUseCase {
        repo: ut_cart_repo(&ds).await,
    };
    let result = uc.execute(cart_id, 99999).await;
    assert!(matches!(result, RemoveCartItemUcResult::NotFound));
} // end of fn remove_item_twice_second_not_found
