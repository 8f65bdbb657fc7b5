use nl2sql::{MockLlm, ScriptedDatabase};

use super::common;

#[tokio::test]
async fn e2e_policy_rejection_is_400_and_never_executes() {
    let server = common::spawn_server(common::shop_db(), MockLlm::new("unused")).await;

    let (status, body) =
        common::post_query(&server, "/execute_sql/", "DROP TABLE customers").await;
    assert_eq!(status, 400);
    let detail = body["detail"].as_str().unwrap_or_default();
    assert!(detail.contains("statement rejected"), "{}", detail);
    assert!(server.db.executed().is_empty());
}

#[tokio::test]
async fn e2e_database_error_is_400_with_server_message() {
    let server = common::spawn_server(common::shop_db(), MockLlm::new("SELECT * FROM missing;")).await;

    let (status, body) = common::post_query(&server, "/ask/", "what is missing?").await;
    assert_eq!(status, 400);
    let detail = body["detail"].as_str().unwrap_or_default();
    assert!(detail.contains("shop.missing"), "{}", detail);
}

#[tokio::test]
async fn e2e_model_failure_is_502() {
    let server = common::spawn_server(common::shop_db(), MockLlm::failing("quota exceeded")).await;

    let (status, body) = common::post_query(&server, "/generate_sql/", "anything").await;
    assert_eq!(status, 502);
    assert!(body["detail"].as_str().unwrap_or_default().contains("quota exceeded"));
}

#[tokio::test]
async fn e2e_unreachable_database_is_500_without_model_call() {
    let db = ScriptedDatabase::new().unreachable("Can't connect to MySQL server on 'db:3306'");
    let server = common::spawn_server(db, MockLlm::new("SELECT 1;")).await;

    let (status, body) = common::post_query(&server, "/ask/", "anything").await;
    assert_eq!(status, 500);
    assert!(body["detail"].as_str().unwrap_or_default().contains("db:3306"));
    assert_eq!(server.llm.calls(), 0);

    let (status, _) = common::get(&server, "/list_databases/").await;
    assert_eq!(status, 500);
}

#[tokio::test]
async fn e2e_invalid_json_body_is_422() {
    let server = common::spawn_server(common::shop_db(), MockLlm::new("unused")).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/ask/", server.base))
        .header("content-type", "application/json")
        .body("not valid json")
        .send()
        .await
        .unwrap();
    let (status, body) = common::read(resp).await;
    assert_eq!(status, 422);
    assert!(body["detail"].is_string());

    let (status, _) = {
        let resp = reqwest::Client::new()
            .post(format!("{}/ask/", server.base))
            .json(&serde_json::json!({"question": "wrong field"}))
            .send()
            .await
            .unwrap();
        common::read(resp).await
    };
    assert_eq!(status, 422);
    assert_eq!(server.llm.calls(), 0);
}
