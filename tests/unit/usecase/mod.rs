mod client_session;
mod manage_cart;

use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value as JsnVal;

use storefront::datastore::AbstInMemoryDStore;
use storefront::error::{AppError, AppErrorCode};
use storefront::repository::{
    AbsCartRepo, AbsClientRepo, AbsProductRepo, CartInMemRepo, ClientInMemRepo, ProductInMemRepo,
};
use storefront::thirdparty::{AbstractChatRelay, ConversationStatus};

use crate::{ut_product_fixtures, ut_setup_datastore};

#[derive(Clone)]
pub(super) struct MockChatRelay {
    pub(super) fail_attributes: bool,
    pub(super) fail_labels: bool,
    pub(super) calls: Arc<Mutex<Vec<(String, u64, String)>>>,
}

impl MockChatRelay {
    pub(super) fn new() -> Self {
        Self {
            fail_attributes: false,
            fail_labels: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn record(&self, op: &str, conversation_id: u64, payload: String) {
        self.calls
            .lock()
            .unwrap()
            .push((op.to_string(), conversation_id, payload));
    }

    pub(super) fn recorded(&self) -> Vec<(String, u64, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AbstractChatRelay for MockChatRelay {
    async fn send_message(
        &self,
        conversation_id: u64,
        content: &str,
    ) -> DefaultResult<(), AppError> {
        self.record("message", conversation_id, content.to_string());
        Ok(())
    }

    async fn add_labels(
        &self,
        conversation_id: u64,
        labels: &[String],
    ) -> DefaultResult<(), AppError> {
        if self.fail_labels {
            return Err(AppError {
                code: AppErrorCode::ChatRelayFailure,
                detail: Some("mock-labels".to_string()),
            });
        }
        self.record("labels", conversation_id, labels.join(","));
        Ok(())
    }

    async fn update_status(
        &self,
        conversation_id: u64,
        status: ConversationStatus,
    ) -> DefaultResult<(), AppError> {
        self.record("status", conversation_id, status.as_str().to_string());
        Ok(())
    }

    async fn update_attributes(
        &self,
        conversation_id: u64,
        attributes: JsnVal,
    ) -> DefaultResult<(), AppError> {
        if self.fail_attributes {
            return Err(AppError {
                code: AppErrorCode::ChatRelayFailure,
                detail: Some("mock-attributes".to_string()),
            });
        }
        self.record("attributes", conversation_id, attributes.to_string());
        Ok(())
    }
} // end of impl AbstractChatRelay for MockChatRelay

pub(super) fn ut_relay_handle(mock: &MockChatRelay) -> Arc<Box<dyn AbstractChatRelay>> {
    let boxed: Box<dyn AbstractChatRelay> = Box::new(mock.clone());
    Arc::new(boxed)
}

pub(super) async fn ut_seeded_store() -> Arc<Box<dyn AbstInMemoryDStore>> {
    let ds = ut_setup_datastore(200);
    let p_repo = ProductInMemRepo::new(ds.clone()).await.unwrap();
    p_repo.save_products(ut_product_fixtures()).await.unwrap();
    let _c_repo = CartInMemRepo::new(ds.clone()).await.unwrap();
    ds
}

pub(super) async fn ut_cart_repo(ds: &Arc<Box<dyn AbstInMemoryDStore>>) -> Box<dyn AbsCartRepo> {
    Box::new(CartInMemRepo::new(ds.clone()).await.unwrap())
}

pub(super) async fn ut_product_repo(
    ds: &Arc<Box<dyn AbstInMemoryDStore>>,
) -> Box<dyn AbsProductRepo> {
    Box::new(ProductInMemRepo::new(ds.clone()).await.unwrap())
}

pub(super) async fn ut_client_repo(
    ds: &Arc<Box<dyn AbstInMemoryDStore>>,
) -> Box<dyn AbsClientRepo> {
    Box::new(ClientInMemRepo::new(ds.clone()).await.unwrap())
}
