use storefront::api::web::dto::ClientSessionReqDto;
use storefront::repository::AbsClientRepo;
use storefront::usecase::{ClientSessionUcResult, GetOrCreateClientUseCase};

use super::{ut_cart_repo, ut_client_repo, ut_seeded_store};

fn ut_req(name: &str, email: &str, phone: Option<&str>) -> ClientSessionReqDto {
    ClientSessionReqDto {
        name: Some(name.to_string()),
        email: Some(email.to_string()),
        phone: phone.map(|p| p.to_string()),
    }
}

#[tokio::test]
async fn get_or_create_is_idempotent() {
    let ds = ut_seeded_store().await;
    let uc = GetOrCreateClientUseCase {
        cl_repo: ut_client_repo(&ds).await,
        c_repo: ut_cart_repo(&ds).await,
    };
    let first = uc.execute(ut_req("Lucía", "lucia@example.com", None)).await;
    let (client_a, cart_a, status_a) = match first {
        ClientSessionUcResult::Success {
            client_id,
            cart_id,
            cart_status,
        } => (client_id, cart_id, cart_status),
        _others => panic!("expected session on first call"),
    };
    assert_eq!(status_a.as_str(), "active");

    let uc = GetOrCreateClientUseCase {
        cl_repo: ut_client_repo(&ds).await,
        c_repo: ut_cart_repo(&ds).await,
    };
    let second = uc.execute(ut_req("Lucía", "lucia@example.com", None)).await;
    match second {
        ClientSessionUcResult::Success {
            client_id,
            cart_id,
            cart_status,
        } => {
            // same client row, same single active cart, no duplicates
            assert_eq!(client_id, client_a);
            assert_eq!(cart_id, cart_a);
            assert_eq!(cart_status.as_str(), "active");
        }
        _others => panic!("expected session on second call"),
    }
} // end of fn get_or_create_is_idempotent

#[tokio::test]
async fn phone_refresh_on_existing_client() {
    let ds = ut_seeded_store().await;
    let uc = GetOrCreateClientUseCase {
        cl_repo: ut_client_repo(&ds).await,
        c_repo: ut_cart_repo(&ds).await,
    };
    let _first = uc.execute(ut_req("Mateo", "mateo@example.com", None)).await;
    let uc = GetOrCreateClientUseCase {
        cl_repo: ut_client_repo(&ds).await,
        c_repo: ut_cart_repo(&ds).await,
    };
    let second = uc
        .execute(ut_req("Mateo", "mateo@example.com", Some("+54 11 5555-1234")))
        .await;
    assert!(matches!(second, ClientSessionUcResult::Success { .. }));
    let repo = ut_client_repo(&ds).await;
    let saved = repo.fetch_by_email("mateo@example.com").await.unwrap().unwrap();
    assert_eq!(saved.phone.as_deref(), Some("+54 11 5555-1234"));
}

#[tokio::test]
async fn rejects_missing_or_malformed_fields() {
    let ds = ut_seeded_store().await;
    let cases = [
        ClientSessionReqDto {
            name: None,
            email: Some("a@b.co".to_string()),
            phone: None,
        },
        ClientSessionReqDto {
            name: Some("Ana".to_string()),
            email: None,
            phone: None,
        },
        ut_req("  ", "a@b.co", None),
        ut_req("Ana", "not-an-email", None),
    ];
    for data in cases {
        let uc = GetOrCreateClientUseCase {
            cl_repo: ut_client_repo(&ds).await,
            c_repo: ut_cart_repo(&ds).await,
        };
        let result = uc.execute(data).await;
        assert!(matches!(result, ClientSessionUcResult::InvalidRequest));
    }
}
