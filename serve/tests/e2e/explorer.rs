use nl2sql::MockLlm;
use serde_json::json;

use super::common;

#[tokio::test]
async fn e2e_root_reports_running() {
    let server = common::spawn_server(common::shop_db(), MockLlm::new("SELECT 1;")).await;
    let (status, body) = common::get(&server, "/").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"message": "AI SQL Query Generator API is running!"}));
}

#[tokio::test]
async fn e2e_list_databases() {
    let server = common::spawn_server(common::shop_db(), MockLlm::new("SELECT 1;")).await;
    let (status, body) = common::get(&server, "/list_databases/").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"databases": ["information_schema", "shop"]}));
}

#[tokio::test]
async fn e2e_list_tables_queries_requested_database() {
    let server = common::spawn_server(common::shop_db(), MockLlm::new("SELECT 1;")).await;
    let (status, body) = common::get(&server, "/list_tables/shop").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"tables": ["customers", "orders"]}));
    let last = server.db.executed().last().cloned().unwrap_or_default();
    assert!(last.contains("TABLE_SCHEMA = 'shop'"), "{}", last);
}

#[tokio::test]
async fn e2e_list_columns_returns_names() {
    let server = common::spawn_server(common::shop_db(), MockLlm::new("SELECT 1;")).await;
    let (status, body) = common::get(&server, "/list_columns/shop/customers").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"columns": ["id", "name", "city"]}));
}

#[tokio::test]
async fn e2e_schema_lists_tables_with_typed_columns() {
    let server = common::spawn_server(common::shop_db(), MockLlm::new("SELECT 1;")).await;
    let (status, body) = common::get(&server, "/schema/").await;
    assert_eq!(status, 200);
    assert_eq!(body["tables"][0]["name"], "customers");
    assert_eq!(
        body["tables"][1]["columns"][2],
        json!({"name": "total", "data_type": "decimal(10,2)"})
    );
    assert_eq!(server.llm.calls(), 0);
}
