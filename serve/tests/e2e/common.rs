//! Shared helpers for e2e tests. Received bodies are logged with `[e2e] received: ...`.

use std::sync::Arc;

use nl2sql::config::SchemaLimits;
use nl2sql::{
    ColumnSchema, MockLlm, Pipeline, QueryExecutor, ResultSet, SchemaDescription, SchemaInspector,
    ScriptedDatabase, SqlPolicy, TableSchema,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const NY_SQL: &str = "SELECT id, name FROM customers WHERE city = 'New York';";

pub fn shop_schema() -> SchemaDescription {
    SchemaDescription::new(vec![
        TableSchema::new(
            "customers",
            vec![
                ColumnSchema::new("id", "int"),
                ColumnSchema::new("name", "varchar(100)"),
                ColumnSchema::new("city", "varchar(100)"),
            ],
        ),
        TableSchema::new(
            "orders",
            vec![
                ColumnSchema::new("id", "int"),
                ColumnSchema::new("customer_id", "int"),
                ColumnSchema::new("total", "decimal(10,2)"),
            ],
        ),
    ])
}

/// Scripted `shop` database: schema, explorer listings, and the New York customers query.
pub fn shop_db() -> ScriptedDatabase {
    ScriptedDatabase::new()
        .with_schema(&shop_schema())
        .with_result(
            "SHOW DATABASES",
            ResultSet::from_rows(
                ["Database"],
                vec![vec![json!("information_schema")], vec![json!("shop")]],
            ),
        )
        .with_result(
            "information_schema.TABLES",
            ResultSet::from_rows(
                ["TABLE_NAME"],
                vec![vec![json!("customers")], vec![json!("orders")]],
            ),
        )
        .with_result(
            "TABLE_NAME = 'customers'",
            ResultSet::from_rows(
                ["TABLE_NAME", "COLUMN_NAME", "COLUMN_TYPE"],
                vec![
                    vec![json!("customers"), json!("id"), json!("int")],
                    vec![json!("customers"), json!("name"), json!("varchar(100)")],
                    vec![json!("customers"), json!("city"), json!("varchar(100)")],
                ],
            ),
        )
        .with_result(
            "city = 'New York'",
            ResultSet::from_rows(
                ["id", "name"],
                vec![
                    vec![json!(1), json!("Ada Lovelace")],
                    vec![json!(4), json!("Grace Hopper")],
                ],
            ),
        )
        .with_error("FROM missing", "Table 'shop.missing' doesn't exist")
}

pub struct TestServer {
    pub base: String,
    pub db: Arc<ScriptedDatabase>,
    pub llm: Arc<MockLlm>,
    handle: tokio::task::JoinHandle<Result<(), Box<dyn std::error::Error + Send + Sync>>>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Bind to a random port and spawn the server over `db` and `llm` (read-only policy).
pub async fn spawn_server(db: ScriptedDatabase, llm: MockLlm) -> TestServer {
    spawn_server_with_policy(db, llm, SqlPolicy::ReadOnly).await
}

pub async fn spawn_server_with_policy(
    db: ScriptedDatabase,
    llm: MockLlm,
    policy: SqlPolicy,
) -> TestServer {
    let db = Arc::new(db);
    let llm = Arc::new(llm);
    let inspector = SchemaInspector::new(db.clone(), "shop", SchemaLimits::default());
    let pipeline = Arc::new(Pipeline::new(
        inspector,
        llm.clone(),
        QueryExecutor::new(db.clone(), policy),
    ));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(serve::run_serve_on_listener(listener, pipeline));
    TestServer {
        base: format!("http://{}", addr),
        db,
        llm,
        handle,
    }
}

/// GET `path`; returns status and parsed JSON body.
pub async fn get(server: &TestServer, path: &str) -> (u16, Value) {
    let resp = reqwest::get(format!("{}{}", server.base, path))
        .await
        .expect("GET");
    read(resp).await
}

/// POST `{"query": query}` to `path`; returns status and parsed JSON body.
pub async fn post_query(server: &TestServer, path: &str, query: &str) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{}{}", server.base, path))
        .json(&json!({ "query": query }))
        .send()
        .await
        .expect("POST");
    read(resp).await
}

pub async fn read(resp: reqwest::Response) -> (u16, Value) {
    let status = resp.status().as_u16();
    let text = resp.text().await.expect("body");
    eprintln!("[e2e] received: {} {}", status, text);
    let body = serde_json::from_str(&text).unwrap_or(Value::Null);
    (status, body)
}
