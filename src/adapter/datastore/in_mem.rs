use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::config::AppInMemoryDbCfg;
use crate::error::{AppError, AppErrorCode};

pub type AppInMemFetchedSingleRow = Vec<String>;
pub type AppInMemFetchedSingleTable = HashMap<String, AppInMemFetchedSingleRow>;
pub type AppInMemFetchedData = HashMap<String, AppInMemFetchedSingleTable>;
pub type AppInMemUpdateData = AppInMemFetchedData;
pub type AppInMemFetchKeys = HashMap<String, Vec<String>>;
pub type AppInMemDeleteInfo = AppInMemFetchKeys;

type AllTables = HashMap<String, AppInMemFetchedSingleTable>;

/// Guard returned by `fetch_acquire`. While it is alive every other access
/// to the same datastore instance blocks, the caller finishes its
/// read-modify-write with `save_release`.
pub struct AppInMemDstoreLock {
    guard: OwnedMutexGuard<AllTables>,
}

pub trait AbsDStoreFilterKeyOp: Sync {
    fn filter(&self, k: &String, v: &Vec<String>) -> bool;
}

// the datastore instance is shared across request-handling tasks, the
// future created by app callers has to be able to pass between threads
#[async_trait]
pub trait AbstInMemoryDStore: Send + Sync {
    async fn create_table(&self, label: &str) -> DefaultResult<(), AppError>;
    async fn save(&self, data: AppInMemUpdateData) -> DefaultResult<usize, AppError>;
    async fn fetch(&self, keys: AppInMemFetchKeys) -> DefaultResult<AppInMemFetchedData, AppError>;
    async fn delete(&self, info: AppInMemDeleteInfo) -> DefaultResult<usize, AppError>;
    async fn filter_keys(
        &self,
        table: String,
        op: &dyn AbsDStoreFilterKeyOp,
    ) -> DefaultResult<Vec<String>, AppError>;
    async fn fetch_acquire(
        &self,
        keys: AppInMemFetchKeys,
    ) -> DefaultResult<(AppInMemFetchedData, AppInMemDstoreLock), AppError>;
    fn save_release(
        &self,
        data: AppInMemUpdateData,
        lock: AppInMemDstoreLock,
    ) -> DefaultResult<usize, AppError>;
}

pub struct AppInMemoryDStore {
    max_items_per_table: u32,
    tables: Arc<Mutex<AllTables>>,
}

impl AppInMemoryDStore {
    pub fn new(cfg: &AppInMemoryDbCfg) -> Self {
        Self {
            max_items_per_table: cfg.max_items,
            tables: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn fetch_common(
        all_tables: &AllTables,
        keys: AppInMemFetchKeys,
    ) -> DefaultResult<AppInMemFetchedData, AppError> {
        let mut out = HashMap::new();
        for (t_label, row_keys) in keys {
            let table = all_tables.get(&t_label).ok_or(AppError {
                code: AppErrorCode::DataTableNotExist,
                detail: Some(t_label.clone()),
            })?;
            let mut rows = HashMap::new();
            for rk in row_keys {
                if let Some(row) = table.get(&rk) {
                    rows.insert(rk, row.clone());
                }
            }
            out.insert(t_label, rows);
        }
        Ok(out)
    }

    fn save_common(
        all_tables: &mut AllTables,
        data: AppInMemUpdateData,
        max_items: u32,
    ) -> DefaultResult<usize, AppError> {
        let mut num_saved = 0;
        for (t_label, rows) in data {
            let table = all_tables.get_mut(&t_label).ok_or(AppError {
                code: AppErrorCode::DataTableNotExist,
                detail: Some(t_label.clone()),
            })?;
            for (rk, row) in rows {
                table.insert(rk, row);
                num_saved += 1;
            }
            if table.len() > (max_items as usize) {
                return Err(AppError {
                    code: AppErrorCode::ExceedingMaxLimit,
                    detail: Some(format!("table:{}, limit:{}", t_label, max_items)),
                });
            }
        }
        Ok(num_saved)
    }
} // end of impl AppInMemoryDStore

#[async_trait]
impl AbstInMemoryDStore for AppInMemoryDStore {
    async fn create_table(&self, label: &str) -> DefaultResult<(), AppError> {
        let mut guard = self.tables.lock().await;
        if !guard.contains_key(label) {
            guard.insert(label.to_string(), HashMap::new());
        }
        Ok(())
    }

    async fn save(&self, data: AppInMemUpdateData) -> DefaultResult<usize, AppError> {
        let mut guard = self.tables.lock().await;
        Self::save_common(&mut guard, data, self.max_items_per_table)
    }

    async fn fetch(&self, keys: AppInMemFetchKeys) -> DefaultResult<AppInMemFetchedData, AppError> {
        let guard = self.tables.lock().await;
        Self::fetch_common(&guard, keys)
    }

    async fn delete(&self, info: AppInMemDeleteInfo) -> DefaultResult<usize, AppError> {
        let mut guard = self.tables.lock().await;
        let mut num_removed = 0;
        for (t_label, row_keys) in info {
            let table = guard.get_mut(&t_label).ok_or(AppError {
                code: AppErrorCode::DataTableNotExist,
                detail: Some(t_label.clone()),
            })?;
            for rk in row_keys {
                if table.remove(&rk).is_some() {
                    num_removed += 1;
                }
            }
        }
        Ok(num_removed)
    }

    async fn filter_keys(
        &self,
        table: String,
        op: &dyn AbsDStoreFilterKeyOp,
    ) -> DefaultResult<Vec<String>, AppError> {
        let guard = self.tables.lock().await;
        let table = guard.get(&table).ok_or(AppError {
            code: AppErrorCode::DataTableNotExist,
            detail: Some(table.clone()),
        })?;
        let keys = table
            .iter()
            .filter(|(k, v)| op.filter(k, v))
            .map(|(k, _v)| k.clone())
            .collect::<Vec<_>>();
        Ok(keys)
    }

    async fn fetch_acquire(
        &self,
        keys: AppInMemFetchKeys,
    ) -> DefaultResult<(AppInMemFetchedData, AppInMemDstoreLock), AppError> {
        let guard = self.tables.clone().lock_owned().await;
        let data = Self::fetch_common(&guard, keys)?;
        Ok((data, AppInMemDstoreLock { guard }))
    }

    fn save_release(
        &self,
        data: AppInMemUpdateData,
        lock: AppInMemDstoreLock,
    ) -> DefaultResult<usize, AppError> {
        let mut lock = lock;
        let num = Self::save_common(&mut lock.guard, data, self.max_items_per_table)?;
        drop(lock); // the mutex opens up for other callers at here
        Ok(num)
    }
} // end of impl AbstInMemoryDStore for AppInMemoryDStore
