pub mod models;
pub mod routes;
pub mod validation;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use quill_db::Table;
use quill_kernel::{InitCtx, Module};
use serde_json::json;

use routes::AuthorTable;

/// Authors: unique display names and optional phone numbers.
pub struct AuthorsModule {
    authors: AuthorTable,
}

impl AuthorsModule {
    pub fn new(authors: AuthorTable) -> Self {
        Self { authors }
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "authors module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(Arc::clone(&self.authors))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let author_ref = json!({ "$ref": "#/components/schemas/Author" });
        let error_ref = json!({ "$ref": "#/components/schemas/ErrorResponse" });
        let json_content = |schema: &serde_json::Value| json!({ "application/json": { "schema": schema } });
        let id_param = json!([{
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer", "format": "int64" }
        }]);

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List authors",
                        "tags": ["Authors"],
                        "responses": {
                            "200": {
                                "description": "All authors in id order",
                                "content": json_content(&json!({ "type": "array", "items": author_ref }))
                            }
                        }
                    },
                    "post": {
                        "summary": "Create an author",
                        "tags": ["Authors"],
                        "requestBody": {
                            "required": true,
                            "content": json_content(&json!({ "$ref": "#/components/schemas/NewAuthor" }))
                        },
                        "responses": {
                            "201": { "description": "Author created", "content": json_content(&author_ref) },
                            "409": { "description": "Name taken at write time", "content": json_content(&error_ref) },
                            "422": { "description": "Validation failed", "content": json_content(&error_ref) }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get an author",
                        "tags": ["Authors"],
                        "parameters": id_param,
                        "responses": {
                            "200": { "description": "Author", "content": json_content(&author_ref) },
                            "404": { "description": "Author not found", "content": json_content(&error_ref) }
                        }
                    },
                    "patch": {
                        "summary": "Update author fields",
                        "tags": ["Authors"],
                        "parameters": id_param,
                        "requestBody": {
                            "required": true,
                            "content": json_content(&json!({ "$ref": "#/components/schemas/AuthorPatch" }))
                        },
                        "responses": {
                            "200": { "description": "Updated author", "content": json_content(&author_ref) },
                            "404": { "description": "Author not found", "content": json_content(&error_ref) },
                            "409": { "description": "Name already taken", "content": json_content(&error_ref) },
                            "422": { "description": "Validation failed", "content": json_content(&error_ref) }
                        }
                    },
                    "delete": {
                        "summary": "Delete an author",
                        "tags": ["Authors"],
                        "parameters": id_param,
                        "responses": {
                            "204": { "description": "Author deleted" },
                            "404": { "description": "Author not found", "content": json_content(&error_ref) }
                        }
                    }
                },
                "/health": {
                    "get": {
                        "summary": "Authors health check",
                        "tags": ["Authors"],
                        "responses": {
                            "200": {
                                "description": "OK",
                                "content": { "text/plain": { "schema": { "type": "string" } } }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Author": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "name": { "type": "string", "description": "Unique display name" },
                            "phone_number": { "type": "string", "description": "Exactly 10 digits, or null" },
                            "created_at": { "type": "string", "format": "date-time" },
                            "updated_at": { "type": "string", "format": "date-time", "description": "Null until first update" }
                        },
                        "required": ["id", "name", "created_at"]
                    },
                    "NewAuthor": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "phone_number": { "type": "string" }
                        },
                        "required": ["name"]
                    },
                    "AuthorPatch": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "phone_number": { "type": "string" }
                        }
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            authors = self.authors.count(),
            "authors module stopped"
        );
        Ok(())
    }
}

/// Create the authors module backed by a fresh table.
pub fn create_module() -> Arc<dyn Module> {
    Arc::new(AuthorsModule::new(Arc::new(Table::new())))
}
