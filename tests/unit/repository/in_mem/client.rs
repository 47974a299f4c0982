use storefront::repository::{AbsClientRepo, ClientInMemRepo};

use crate::ut_setup_datastore;

#[tokio::test]
async fn create_then_fetch_by_email() {
    let ds = ut_setup_datastore(200);
    let repo = ClientInMemRepo::new(ds).await.unwrap();
    let created = repo
        .create("Lucía", "lucia@example.com", None)
        .await
        .unwrap();
    assert_eq!(created.id_, 1);
    assert!(created.phone.is_none());
    let found = repo.fetch_by_email("lucia@example.com").await.unwrap().unwrap();
    assert_eq!(found.id_, created.id_);
    assert_eq!(found.name.as_str(), "Lucía");
    let absent = repo.fetch_by_email("nadie@example.com").await.unwrap();
    assert!(absent.is_none());
}

#[tokio::test]
async fn update_phone_overwrites() {
    let ds = ut_setup_datastore(200);
    let repo = ClientInMemRepo::new(ds).await.unwrap();
    let created = repo
        .create("Mateo", "mateo@example.com", Some("+54 11 1111-2222"))
        .await
        .unwrap();
    assert_eq!(created.phone.as_deref(), Some("+54 11 1111-2222"));
    repo.update_phone(created.id_, "+54 11 9999-0000")
        .await
        .unwrap();
    let found = repo.fetch_by_email("mateo@example.com").await.unwrap().unwrap();
    assert_eq!(found.phone.as_deref(), Some("+54 11 9999-0000"));
}
