use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::adapter::datastore::{AppRestStoreNode, StoreQuery};
use crate::error::{AppError, AppErrorCode};
use crate::model::ClientModel;
use crate::repository::AbsClientRepo;

use super::decode_row;

const TABLE_CLIENTS: &str = "clients";

const SELECT_CLIENT: &str = "id,name,email,phone";

#[derive(Deserialize)]
struct ClientRow {
    id: u64,
    name: String,
    email: String,
    phone: Option<String>,
}

impl From<ClientRow> for ClientModel {
    fn from(value: ClientRow) -> Self {
        Self {
            id_: value.id,
            name: value.name,
            email: value.email,
            phone: value.phone,
        }
    }
}

pub(in crate::repository) struct ClientRestRepo {
    node: Arc<AppRestStoreNode>,
}

impl ClientRestRepo {
    pub(in crate::repository) fn new(node: Arc<AppRestStoreNode>) -> Self {
        Self { node }
    }
}

#[async_trait]
impl AbsClientRepo for ClientRestRepo {
    async fn fetch_by_email(&self, email: &str) -> DefaultResult<Option<ClientModel>, AppError> {
        let query = StoreQuery {
            select: Some(SELECT_CLIENT),
            email: StoreQuery::op_eq(email),
            ..Default::default()
        };
        let mut rows = self.node.select(TABLE_CLIENTS, &query).await?;
        if rows.is_empty() {
            Ok(None)
        } else {
            let row = decode_row::<ClientRow>(rows.remove(0))?;
            Ok(Some(row.into()))
        }
    }

    async fn create(
        &self,
        name: &str,
        email: &str,
        phone: Option<&str>,
    ) -> DefaultResult<ClientModel, AppError> {
        let mut row = serde_json::json!({ "name": name, "email": email });
        if let Some(p) = phone {
            row["phone"] = serde_json::json!(p);
        }
        let mut rows = self.node.insert(TABLE_CLIENTS, row).await?;
        if rows.is_empty() {
            Err(AppError {
                code: AppErrorCode::RemoteStoreFailure,
                detail: Some("client-insert-no-representation".to_string()),
            })
        } else {
            let row = decode_row::<ClientRow>(rows.remove(0))?;
            Ok(row.into())
        }
    }

    async fn update_phone(&self, client_id: u64, phone: &str) -> DefaultResult<(), AppError> {
        let query = StoreQuery {
            id: StoreQuery::op_eq(client_id),
            ..Default::default()
        };
        let patch = serde_json::json!({ "phone": phone });
        let _rows = self.node.update(TABLE_CLIENTS, &query, patch).await?;
        Ok(())
    }
} // end of impl AbsClientRepo for ClientRestRepo
