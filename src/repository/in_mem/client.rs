use std::boxed::Box;
use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;

use crate::adapter::datastore::{
    AbsDStoreFilterKeyOp, AbstInMemoryDStore, AppInMemFetchKeys, AppInMemFetchedSingleRow,
};
use crate::error::{AppError, AppErrorCode};
use crate::model::ClientModel;
use crate::repository::AbsClientRepo;

use super::{next_pkey, EMPTY_CELL, TABLE_CLIENT_CONTACT};

fn to_row(obj: &ClientModel) -> AppInMemFetchedSingleRow {
    vec![
        obj.name.clone(),
        obj.email.clone(),
        obj.phone.clone().unwrap_or(EMPTY_CELL.to_string()),
    ]
}

fn to_model(key: &str, row: &AppInMemFetchedSingleRow) -> ClientModel {
    ClientModel {
        id_: key.parse().unwrap(),
        name: row[0].clone(),
        email: row[1].clone(),
        phone: if row[2].is_empty() {
            None
        } else {
            Some(row[2].clone())
        },
    }
}

struct EmailFilterKeyOp {
    email: String,
}

impl AbsDStoreFilterKeyOp for EmailFilterKeyOp {
    fn filter(&self, _k: &String, v: &Vec<String>) -> bool {
        v[1] == self.email
    }
}

pub struct ClientInMemRepo {
    datastore: Arc<Box<dyn AbstInMemoryDStore>>,
}

impl ClientInMemRepo {
    pub async fn new(m: Arc<Box<dyn AbstInMemoryDStore>>) -> DefaultResult<Self, AppError> {
        m.create_table(TABLE_CLIENT_CONTACT).await?;
        Ok(Self { datastore: m })
    }
}

#[async_trait]
impl AbsClientRepo for ClientInMemRepo {
    async fn fetch_by_email(&self, email: &str) -> DefaultResult<Option<ClientModel>, AppError> {
        let op = EmailFilterKeyOp {
            email: email.to_string(),
        };
        let mut keys = self
            .datastore
            .filter_keys(TABLE_CLIENT_CONTACT.to_string(), &op)
            .await?;
        keys.sort();
        let key = match keys.into_iter().next() {
            Some(k) => k,
            None => return Ok(None),
        };
        let info: AppInMemFetchKeys =
            HashMap::from([(TABLE_CLIENT_CONTACT.to_string(), vec![key.clone()])]);
        let mut result = self.datastore.fetch(info).await?;
        let mut rows = result.remove(TABLE_CLIENT_CONTACT).unwrap();
        Ok(rows.remove(&key).map(|row| to_model(key.as_str(), &row)))
    }

    async fn create(
        &self,
        name: &str,
        email: &str,
        phone: Option<&str>,
    ) -> DefaultResult<ClientModel, AppError> {
        let new_id = next_pkey(&self.datastore, TABLE_CLIENT_CONTACT).await?;
        let obj = ClientModel {
            id_: new_id,
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.map(|p| p.to_string()),
        };
        let rows = HashMap::from([(new_id.to_string(), to_row(&obj))]);
        let data = HashMap::from([(TABLE_CLIENT_CONTACT.to_string(), rows)]);
        let _num = self.datastore.save(data).await?;
        Ok(obj)
    }

    async fn update_phone(&self, client_id: u64, phone: &str) -> DefaultResult<(), AppError> {
        let key = client_id.to_string();
        let info: AppInMemFetchKeys =
            HashMap::from([(TABLE_CLIENT_CONTACT.to_string(), vec![key.clone()])]);
        let (mut fetched, lock) = self.datastore.fetch_acquire(info).await?;
        let mut rows = fetched.remove(TABLE_CLIENT_CONTACT).unwrap();
        let mut row = match rows.remove(&key) {
            Some(v) => v,
            None => {
                drop(lock);
                return Err(AppError {
                    code: AppErrorCode::DataCorruption,
                    detail: Some(format!("missing-client:{}", client_id)),
                });
            }
        };
        row[2] = phone.to_string();
        let rows = HashMap::from([(key, row)]);
        let data = HashMap::from([(TABLE_CLIENT_CONTACT.to_string(), rows)]);
        let _num = self.datastore.save_release(data, lock)?;
        Ok(())
    } // end of fn update_phone
} // end of impl AbsClientRepo for ClientInMemRepo
