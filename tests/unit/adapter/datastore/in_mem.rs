use std::collections::HashMap;

use storefront::datastore::{
    AbsDStoreFilterKeyOp, AbstInMemoryDStore, AppInMemDeleteInfo, AppInMemFetchKeys,
    AppInMemUpdateData, AppInMemoryDStore,
};
use storefront::error::AppErrorCode;
use storefront::AppInMemoryDbCfg;

const UT_TABLE_A: &str = "ut-variant";
const UT_TABLE_B: &str = "ut-line";

fn ut_store(max_items: u32) -> AppInMemoryDStore {
    let cfg = AppInMemoryDbCfg {
        alias: "Lemni".to_string(),
        max_items,
    };
    AppInMemoryDStore::new(&cfg)
}

fn ut_row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

#[tokio::test]
async fn save_fetch_ok() {
    let dstore = ut_store(10);
    for label in [UT_TABLE_A, UT_TABLE_B] {
        let result = dstore.create_table(label).await;
        assert!(result.is_ok());
    }
    let new_data: AppInMemUpdateData = {
        let t1 = HashMap::from([
            ("5001".to_string(), ut_row(&["1001", "5", "1", "Rojo"])),
            ("5002".to_string(), ut_row(&["1001", "10", "4", "Negro"])),
        ]);
        let t2 = HashMap::from([("31".to_string(), ut_row(&["6", "5001", "3"]))]);
        HashMap::from([(UT_TABLE_A.to_string(), t1), (UT_TABLE_B.to_string(), t2)])
    };
    let result = dstore.save(new_data).await;
    assert_eq!(result.unwrap(), 3);

    let fetching_keys: AppInMemFetchKeys = HashMap::from([
        (
            UT_TABLE_A.to_string(),
            vec!["5001".to_string(), "5077".to_string()],
        ),
        (UT_TABLE_B.to_string(), vec!["31".to_string()]),
    ]);
    let actual = dstore.fetch(fetching_keys).await.unwrap();
    let a_table = actual.get(UT_TABLE_A).unwrap();
    let item = a_table.get("5001").unwrap();
    assert_eq!(item.as_slice(), ut_row(&["1001", "5", "1", "Rojo"]).as_slice());
    assert!(a_table.get("5077").is_none());
    let b_table = actual.get(UT_TABLE_B).unwrap();
    assert_eq!(b_table.get("31").unwrap()[2].as_str(), "3");
} // end of fn save_fetch_ok

#[tokio::test]
async fn save_overwrites_existing_row() {
    let dstore = ut_store(10);
    dstore.create_table(UT_TABLE_B).await.unwrap();
    let data = HashMap::from([(
        UT_TABLE_B.to_string(),
        HashMap::from([("31".to_string(), ut_row(&["6", "5001", "3"]))]),
    )]);
    assert_eq!(dstore.save(data).await.unwrap(), 1);
    let data = HashMap::from([(
        UT_TABLE_B.to_string(),
        HashMap::from([("31".to_string(), ut_row(&["6", "5001", "6"]))]),
    )]);
    assert_eq!(dstore.save(data).await.unwrap(), 1);
    let keys = HashMap::from([(UT_TABLE_B.to_string(), vec!["31".to_string()])]);
    let actual = dstore.fetch(keys).await.unwrap();
    let row = actual.get(UT_TABLE_B).unwrap().get("31").unwrap();
    assert_eq!(row[2].as_str(), "6");
}

#[tokio::test]
async fn delete_counts_removed_rows() {
    let dstore = ut_store(10);
    dstore.create_table(UT_TABLE_A).await.unwrap();
    let data = HashMap::from([(
        UT_TABLE_A.to_string(),
        HashMap::from([
            ("5001".to_string(), ut_row(&["1001", "5"])),
            ("5002".to_string(), ut_row(&["1001", "10"])),
        ]),
    )]);
    dstore.save(data).await.unwrap();
    let info: AppInMemDeleteInfo = HashMap::from([(
        UT_TABLE_A.to_string(),
        vec!["5001".to_string(), "absent".to_string()],
    )]);
    assert_eq!(dstore.delete(info).await.unwrap(), 1);
    let keys = HashMap::from([(UT_TABLE_A.to_string(), vec!["5001".to_string()])]);
    let actual = dstore.fetch(keys).await.unwrap();
    assert!(actual.get(UT_TABLE_A).unwrap().get("5001").is_none());
}

struct StockBelowOp {
    limit: u32,
}

impl AbsDStoreFilterKeyOp for StockBelowOp {
    fn filter(&self, _k: &String, v: &Vec<String>) -> bool {
        v[1].parse::<u32>().unwrap() < self.limit
    }
}

#[tokio::test]
async fn filter_keys_by_row_content() {
    let dstore = ut_store(10);
    dstore.create_table(UT_TABLE_A).await.unwrap();
    let data = HashMap::from([(
        UT_TABLE_A.to_string(),
        HashMap::from([
            ("5001".to_string(), ut_row(&["1001", "5"])),
            ("5002".to_string(), ut_row(&["1001", "10"])),
            ("5003".to_string(), ut_row(&["1002", "8"])),
        ]),
    )]);
    dstore.save(data).await.unwrap();
    let op = StockBelowOp { limit: 9 };
    let mut keys = dstore
        .filter_keys(UT_TABLE_A.to_string(), &op)
        .await
        .unwrap();
    keys.sort();
    assert_eq!(keys.as_slice(), ["5001", "5003"]);
}

#[tokio::test]
async fn fetch_acquire_save_release_ok() {
    let dstore = ut_store(10);
    dstore.create_table(UT_TABLE_B).await.unwrap();
    let data = HashMap::from([(
        UT_TABLE_B.to_string(),
        HashMap::from([("31".to_string(), ut_row(&["6", "5001", "3"]))]),
    )]);
    dstore.save(data).await.unwrap();

    let keys = HashMap::from([(UT_TABLE_B.to_string(), vec!["31".to_string()])]);
    let (fetched, lock) = dstore.fetch_acquire(keys).await.unwrap();
    let mut row = fetched.get(UT_TABLE_B).unwrap().get("31").unwrap().clone();
    row[2] = "5".to_string();
    let update = HashMap::from([(
        UT_TABLE_B.to_string(),
        HashMap::from([("31".to_string(), row)]),
    )]);
    let num = dstore.save_release(update, lock).unwrap();
    assert_eq!(num, 1);

    let keys = HashMap::from([(UT_TABLE_B.to_string(), vec!["31".to_string()])]);
    let actual = dstore.fetch(keys).await.unwrap();
    let row = actual.get(UT_TABLE_B).unwrap().get("31").unwrap();
    assert_eq!(row[2].as_str(), "5");
} // end of fn fetch_acquire_save_release_ok

#[tokio::test]
async fn save_exceeding_limit_error() {
    let dstore = ut_store(2);
    dstore.create_table(UT_TABLE_A).await.unwrap();
    let data = HashMap::from([(
        UT_TABLE_A.to_string(),
        HashMap::from([
            ("1".to_string(), ut_row(&["a"])),
            ("2".to_string(), ut_row(&["b"])),
            ("3".to_string(), ut_row(&["c"])),
        ]),
    )]);
    let error = dstore.save(data).await.unwrap_err();
    assert_eq!(error.code, AppErrorCode::ExceedingMaxLimit);
}

#[tokio::test]
async fn missing_table_error() {
    let dstore = ut_store(10);
    let keys = HashMap::from([("no-such-table".to_string(), vec!["1".to_string()])]);
    let error = dstore.fetch(keys).await.unwrap_err();
    assert_eq!(error.code, AppErrorCode::DataTableNotExist);
}
