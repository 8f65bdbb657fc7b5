use nl2sql::{MockLlm, ResultSet, SqlPolicy};
use serde_json::json;

use super::common;

#[tokio::test]
async fn e2e_generate_sql_returns_cleaned_query() {
    let llm = MockLlm::new(format!("```sql\n{}\n```", common::NY_SQL));
    let server = common::spawn_server(common::shop_db(), llm).await;

    let (status, body) =
        common::post_query(&server, "/generate_sql/", "show all customers from New York").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"sql_query": common::NY_SQL}));

    let prompt = server.llm.last_prompt().unwrap_or_default();
    assert!(prompt.contains("customers: id int, name varchar(100), city varchar(100)"));
    assert!(prompt.contains("User Query: show all customers from New York"));
    assert!(
        !server.db.executed().iter().any(|s| s == common::NY_SQL),
        "generate_sql must not execute"
    );
}

#[tokio::test]
async fn e2e_execute_sql_returns_columns_rows_and_records() {
    let server = common::spawn_server(common::shop_db(), MockLlm::new("unused")).await;

    let (status, body) = common::post_query(&server, "/execute_sql/", common::NY_SQL).await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({
            "columns": ["id", "name"],
            "rows": [[1, "Ada Lovelace"], [4, "Grace Hopper"]],
            "results": [
                {"id": 1, "name": "Ada Lovelace"},
                {"id": 4, "name": "Grace Hopper"}
            ]
        })
    );
    assert_eq!(server.llm.calls(), 0);
    assert_eq!(server.db.executed(), vec![common::NY_SQL.to_string()]);
}

#[tokio::test]
async fn e2e_ask_runs_full_pipeline() {
    let server = common::spawn_server(common::shop_db(), MockLlm::new(common::NY_SQL)).await;

    let (status, body) =
        common::post_query(&server, "/ask/", "show all customers from New York").await;
    assert_eq!(status, 200);
    assert_eq!(body["sql_query"], common::NY_SQL);
    assert_eq!(body["columns"], json!(["id", "name"]));
    assert_eq!(body["results"][1]["name"], "Grace Hopper");
    assert_eq!(server.llm.calls(), 1);
    assert_eq!(
        server.db.executed().last().map(String::as_str),
        Some(common::NY_SQL)
    );
}

#[tokio::test]
async fn e2e_empty_result_keeps_columns() {
    let db = common::shop_db().with_result(
        "city = 'Nowhere'",
        ResultSet::from_rows(["id", "name"], Vec::new()),
    );
    let server = common::spawn_server(db, MockLlm::new("unused")).await;

    let (status, body) = common::post_query(
        &server,
        "/execute_sql/",
        "SELECT id, name FROM customers WHERE city = 'Nowhere'",
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"columns": ["id", "name"], "rows": [], "results": []}));
}

#[tokio::test]
async fn e2e_unrestricted_policy_executes_writes() {
    let server = common::spawn_server_with_policy(
        common::shop_db(),
        MockLlm::new("unused"),
        SqlPolicy::Unrestricted,
    )
    .await;

    let (status, body) =
        common::post_query(&server, "/execute_sql/", "DELETE FROM orders WHERE id = 9").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"columns": [], "rows": [], "results": []}));
    assert_eq!(server.db.executed(), vec!["DELETE FROM orders WHERE id = 9".to_string()]);
}

#[tokio::test]
async fn e2e_cors_preflight_allows_any_origin() {
    let server = common::spawn_server(common::shop_db(), MockLlm::new("unused")).await;

    let resp = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("{}/ask/", server.base))
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success(), "{}", resp.status());
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
