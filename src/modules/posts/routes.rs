use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use quill_db::{Row, Table};
use quill_http::{error::AppError, extract::AppJson};

use super::models::{NewPost, Post, PostPatch};
use super::validation;

pub type PostTable = Arc<Table<Post>>;

/// Endpoints relative to `/api/posts`.
pub fn router(posts: PostTable) -> Router {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/health", get(health_check))
        .route(
            "/{id}",
            get(get_post).patch(update_post).delete(delete_post),
        )
        .with_state(posts)
}

async fn health_check() -> &'static str {
    "posts module is healthy"
}

async fn list_posts(State(posts): State<PostTable>) -> Json<Vec<Row<Post>>> {
    Json(posts.list())
}

async fn create_post(
    State(posts): State<PostTable>,
    AppJson(candidate): AppJson<NewPost>,
) -> Result<(StatusCode, Json<Row<Post>>), AppError> {
    let post = validation::validate_new(candidate)?;
    let row = posts.insert(post)?;

    tracing::info!(
        post_id = row.id,
        category = %row.fields.category,
        "post created"
    );
    Ok((StatusCode::CREATED, Json(row)))
}

async fn get_post(
    State(posts): State<PostTable>,
    Path(id): Path<u64>,
) -> Result<Json<Row<Post>>, AppError> {
    Ok(Json(posts.get(id)?))
}

async fn update_post(
    State(posts): State<PostTable>,
    Path(id): Path<u64>,
    AppJson(patch): AppJson<PostPatch>,
) -> Result<Json<Row<Post>>, AppError> {
    let row = posts.modify(id, |current| {
        validation::apply_patch(current, patch).map_err(AppError::from)
    })?;

    tracing::info!(post_id = row.id, "post updated");
    Ok(Json(row))
}

async fn delete_post(
    State(posts): State<PostTable>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    posts.delete(id)?;

    tracing::info!(post_id = id, "post deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Method, Request},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(router: &Router, method: Method, uri: &str, body: Value) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        router.clone().oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn app() -> Router {
        router(Arc::new(Table::new()))
    }

    #[tokio::test]
    async fn create_returns_stored_post() {
        let app = app();
        let response = send(
            &app,
            Method::POST,
            "/",
            json!({
                "title": "A Quiet Morning",
                "content": "a".repeat(300),
                "category": "Non-Fiction",
                "summary": "Dawn over the harbour."
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["id"], 1);
        assert_eq!(body["category"], "Non-Fiction");
        assert_eq!(body["summary"], "Dawn over the harbour.");
        assert!(body["updated_at"].is_null());
    }

    #[tokio::test]
    async fn clickbait_with_short_content_reports_clickbait() {
        let app = app();
        let response = send(
            &app,
            Method::POST,
            "/",
            json!({
                "title": "Why This Works",
                "content": "a".repeat(100),
                "category": "Fiction"
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "clickbait title");
        assert_eq!(body["error"]["details"][0]["field"], "title");
    }

    #[tokio::test]
    async fn unknown_category_is_a_validation_error() {
        let app = app();
        let response = send(
            &app,
            Method::POST,
            "/",
            json!({ "title": "A Quiet Morning", "category": "Poetry" }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["error"]["message"], "invalid category");
    }

    #[tokio::test]
    async fn patch_with_unchanged_fields_succeeds() {
        let app = app();
        let created = body_json(
            send(
                &app,
                Method::POST,
                "/",
                json!({ "title": "A Quiet Morning", "category": "Fiction" }),
            )
            .await,
        )
        .await;

        let response = send(
            &app,
            Method::PATCH,
            "/1",
            json!({ "title": "A Quiet Morning", "category": "Fiction" }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["title"], created["title"]);
        assert_eq!(body["created_at"], created["created_at"]);
        assert!(body["updated_at"].is_string());
    }

    #[tokio::test]
    async fn patch_cannot_touch_storage_fields() {
        let app = app();
        send(
            &app,
            Method::POST,
            "/",
            json!({ "title": "A Quiet Morning", "category": "Fiction" }),
        )
        .await;

        let response = send(
            &app,
            Method::PATCH,
            "/1",
            json!({ "created_at": "2020-01-01T00:00:00Z" }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "validation_error");
        assert!(body["error"]["trace_id"].is_string());
    }

    #[tokio::test]
    async fn malformed_body_gets_error_envelope() {
        let app = app();
        let request = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"title": "A Quiet"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn patch_on_missing_post_is_not_found() {
        let response = send(&app(), Method::PATCH, "/42", json!({ "summary": null })).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
