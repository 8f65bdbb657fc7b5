//! Axum app: router and route handlers.
//!
//! Each handler awaits one [`Pipeline`] operation and maps its result to JSON; failures become
//! [`ApiError`] responses.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use nl2sql::{
    AskResponse, ColumnsResponse, DatabasesResponse, ExecuteResponse, GenerateResponse, Pipeline,
    QueryRequest, SchemaDescription, StatusResponse, TablesResponse,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::response::ApiError;

pub(crate) const STATUS_MESSAGE: &str = "AI SQL Query Generator API is running!";

type ApiResult<T> = Result<Json<T>, ApiError>;
type AppState = Arc<Pipeline>;

/// Builds the router over a shared pipeline. CORS allows any origin, method and header.
pub fn router(pipeline: Arc<Pipeline>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    Router::new()
        .route("/", get(status))
        .route("/list_databases/", get(list_databases))
        .route("/list_tables/:database", get(list_tables))
        .route("/list_columns/:database/:table", get(list_columns))
        .route("/schema/", get(schema))
        .route("/generate_sql/", post(generate_sql))
        .route("/execute_sql/", post(execute_sql))
        .route("/ask/", post(ask))
        .layer(cors)
        .with_state(pipeline)
}

async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: STATUS_MESSAGE.to_string(),
    })
}

async fn list_databases(State(pipeline): State<AppState>) -> ApiResult<DatabasesResponse> {
    let databases = pipeline.list_databases().await?;
    Ok(Json(DatabasesResponse { databases }))
}

async fn list_tables(
    State(pipeline): State<AppState>,
    Path(database): Path<String>,
) -> ApiResult<TablesResponse> {
    let tables = pipeline.list_tables(&database).await?;
    Ok(Json(TablesResponse { tables }))
}

async fn list_columns(
    State(pipeline): State<AppState>,
    Path((database, table)): Path<(String, String)>,
) -> ApiResult<ColumnsResponse> {
    let columns = pipeline.list_columns(&database, &table).await?;
    Ok(Json(ColumnsResponse::from_columns(columns)))
}

async fn schema(State(pipeline): State<AppState>) -> ApiResult<SchemaDescription> {
    Ok(Json(pipeline.schema().await?))
}

async fn generate_sql(
    State(pipeline): State<AppState>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> ApiResult<GenerateResponse> {
    let Json(req) = body?;
    info!(query = %req.query, "generate_sql");
    let sql_query = pipeline.generate(&req.query).await?;
    Ok(Json(GenerateResponse { sql_query }))
}

async fn execute_sql(
    State(pipeline): State<AppState>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> ApiResult<ExecuteResponse> {
    let Json(req) = body?;
    info!(sql = %req.query, "execute_sql");
    let table = pipeline.execute(&req.query).await?;
    Ok(Json(table.into()))
}

async fn ask(
    State(pipeline): State<AppState>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> ApiResult<AskResponse> {
    let Json(req) = body?;
    info!(query = %req.query, "ask");
    let answer = pipeline.ask(&req.query).await?;
    Ok(Json(answer.into()))
}
