use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use quill_db::{Row, Table};
use quill_http::{error::AppError, extract::AppJson};

use super::models::{Author, AuthorPatch, NewAuthor};
use super::validation;

pub type AuthorTable = Arc<Table<Author>>;

/// Endpoints relative to `/api/authors`.
pub fn router(authors: AuthorTable) -> Router {
    Router::new()
        .route("/", get(list_authors).post(create_author))
        .route("/health", get(health_check))
        .route(
            "/{id}",
            get(get_author).patch(update_author).delete(delete_author),
        )
        .with_state(authors)
}

async fn health_check() -> &'static str {
    "authors module is healthy"
}

async fn list_authors(State(authors): State<AuthorTable>) -> Json<Vec<Row<Author>>> {
    Json(authors.list())
}

async fn create_author(
    State(authors): State<AuthorTable>,
    AppJson(candidate): AppJson<NewAuthor>,
) -> Result<(StatusCode, Json<Row<Author>>), AppError> {
    let author = validation::validate_new(candidate, authors.as_ref())?;
    let row = authors.insert(author)?;

    tracing::info!(author_id = row.id, name = %row.fields.name, "author created");
    Ok((StatusCode::CREATED, Json(row)))
}

async fn get_author(
    State(authors): State<AuthorTable>,
    Path(id): Path<u64>,
) -> Result<Json<Row<Author>>, AppError> {
    Ok(Json(authors.get(id)?))
}

async fn update_author(
    State(authors): State<AuthorTable>,
    Path(id): Path<u64>,
    AppJson(patch): AppJson<AuthorPatch>,
) -> Result<Json<Row<Author>>, AppError> {
    let row = authors.modify(id, |current| {
        validation::apply_patch(current, patch).map_err(AppError::from)
    })?;

    tracing::info!(author_id = row.id, "author updated");
    Ok(Json(row))
}

async fn delete_author(
    State(authors): State<AuthorTable>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    authors.delete(id)?;

    tracing::info!(author_id = id, "author deleted");
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

    async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
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
    async fn create_returns_stored_author() {
        let app = app();
        let response = send(
            &app,
            Method::POST,
            "/",
            Some(json!({"name": "Ada Lovelace", "phone_number": "0123456789"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["id"], 1);
        assert_eq!(body["name"], "Ada Lovelace");
        assert_eq!(body["phone_number"], "0123456789");
        assert!(body["created_at"].is_string());
        assert!(body["updated_at"].is_null());
    }

    #[tokio::test]
    async fn second_author_with_same_name_is_rejected() {
        let app = app();
        send(&app, Method::POST, "/", Some(json!({"name": "Ada"}))).await;

        let response = send(&app, Method::POST, "/", Some(json!({"name": "Ada"}))).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "duplicate name");
        assert_eq!(body["error"]["details"][0]["field"], "name");

        let list = body_json(send(&app, Method::GET, "/", None).await).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_name_is_rejected() {
        let app = app();
        let response = send(&app, Method::POST, "/", Some(json!({"phone_number": null}))).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["error"]["message"], "name required");
    }

    #[tokio::test]
    async fn mistyped_field_gets_error_envelope() {
        let app = app();
        let response = send(&app, Method::POST, "/", Some(json!({"name": 42}))).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "validation_error");
        assert!(body["error"]["timestamp"].is_string());
    }

    #[tokio::test]
    async fn unknown_keys_are_rejected_on_create_and_patch() {
        let app = app();
        let response = send(
            &app,
            Method::POST,
            "/",
            Some(json!({"name": "Ada", "id": 99})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["error"]["code"], "validation_error");
        assert_eq!(
            body_json(send(&app, Method::GET, "/", None).await).await,
            json!([])
        );

        send(&app, Method::POST, "/", Some(json!({"name": "Ada"}))).await;
        let response = send(
            &app,
            Method::PATCH,
            "/1",
            Some(json!({"created_at": "2020-01-01T00:00:00Z"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn patch_stamps_updated_at_and_keeps_created_at() {
        let app = app();
        let created = body_json(
            send(&app, Method::POST, "/", Some(json!({"name": "Ada"}))).await,
        )
        .await;

        let response = send(
            &app,
            Method::PATCH,
            "/1",
            Some(json!({"phone_number": "5555555555"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["name"], "Ada");
        assert_eq!(body["phone_number"], "5555555555");
        assert_eq!(body["created_at"], created["created_at"]);
        assert!(body["updated_at"].is_string());
    }

    #[tokio::test]
    async fn rejected_patch_commits_nothing() {
        let app = app();
        send(&app, Method::POST, "/", Some(json!({"name": "Ada"}))).await;

        let response = send(
            &app,
            Method::PATCH,
            "/1",
            Some(json!({"name": "Grace", "phone_number": "12"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(send(&app, Method::GET, "/1", None).await).await;
        assert_eq!(body["name"], "Ada");
        assert!(body["updated_at"].is_null());
    }

    #[tokio::test]
    async fn rename_onto_existing_name_conflicts_in_storage() {
        let app = app();
        send(&app, Method::POST, "/", Some(json!({"name": "Ada"}))).await;
        send(&app, Method::POST, "/", Some(json!({"name": "Grace"}))).await;

        let response = send(&app, Method::PATCH, "/2", Some(json!({"name": "Ada"}))).await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let app = app();
        send(&app, Method::POST, "/", Some(json!({"name": "Ada"}))).await;

        let response = send(&app, Method::DELETE, "/1", None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&app, Method::GET, "/1", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
