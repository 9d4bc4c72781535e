pub mod models;
pub mod routes;
pub mod validation;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use quill_db::Table;
use quill_kernel::{InitCtx, Module};
use serde_json::json;

use routes::PostTable;

/// Posts: titled, categorized writing with optional content and summary.
pub struct PostsModule {
    posts: PostTable,
}

impl PostsModule {
    pub fn new(posts: PostTable) -> Self {
        Self { posts }
    }
}

#[async_trait]
impl Module for PostsModule {
    fn name(&self) -> &'static str {
        "posts"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            min_content_chars = validation::MIN_CONTENT_CHARS,
            max_summary_chars = validation::MAX_SUMMARY_CHARS,
            "posts module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(Arc::clone(&self.posts))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let post_ref = json!({ "$ref": "#/components/schemas/Post" });
        let error_ref = json!({ "$ref": "#/components/schemas/ErrorResponse" });
        let json_content = |schema: &serde_json::Value| json!({ "application/json": { "schema": schema } });
        let id_param = json!([{
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer", "format": "int64" }
        }]);
        let category = json!({ "type": "string", "enum": ["Fiction", "Non-Fiction"] });

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List posts",
                        "tags": ["Posts"],
                        "responses": {
                            "200": {
                                "description": "All posts in id order",
                                "content": json_content(&json!({ "type": "array", "items": post_ref }))
                            }
                        }
                    },
                    "post": {
                        "summary": "Create a post",
                        "tags": ["Posts"],
                        "requestBody": {
                            "required": true,
                            "content": json_content(&json!({ "$ref": "#/components/schemas/NewPost" }))
                        },
                        "responses": {
                            "201": { "description": "Post created", "content": json_content(&post_ref) },
                            "422": { "description": "Validation failed", "content": json_content(&error_ref) }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a post",
                        "tags": ["Posts"],
                        "parameters": id_param,
                        "responses": {
                            "200": { "description": "Post", "content": json_content(&post_ref) },
                            "404": { "description": "Post not found", "content": json_content(&error_ref) }
                        }
                    },
                    "patch": {
                        "summary": "Update post fields",
                        "tags": ["Posts"],
                        "parameters": id_param,
                        "requestBody": {
                            "required": true,
                            "content": json_content(&json!({ "$ref": "#/components/schemas/PostPatch" }))
                        },
                        "responses": {
                            "200": { "description": "Updated post", "content": json_content(&post_ref) },
                            "404": { "description": "Post not found", "content": json_content(&error_ref) },
                            "422": { "description": "Validation failed", "content": json_content(&error_ref) }
                        }
                    },
                    "delete": {
                        "summary": "Delete a post",
                        "tags": ["Posts"],
                        "parameters": id_param,
                        "responses": {
                            "204": { "description": "Post deleted" },
                            "404": { "description": "Post not found", "content": json_content(&error_ref) }
                        }
                    }
                },
                "/health": {
                    "get": {
                        "summary": "Posts health check",
                        "tags": ["Posts"],
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
                    "Post": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "title": { "type": "string", "description": "Never starts with Why, Top or Secret" },
                            "content": { "type": "string", "minLength": validation::MIN_CONTENT_CHARS },
                            "category": category,
                            "summary": { "type": "string", "maxLength": validation::MAX_SUMMARY_CHARS },
                            "created_at": { "type": "string", "format": "date-time" },
                            "updated_at": { "type": "string", "format": "date-time", "description": "Null until first update" }
                        },
                        "required": ["id", "title", "category", "created_at"]
                    },
                    "NewPost": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "content": { "type": "string" },
                            "category": category,
                            "summary": { "type": "string" }
                        },
                        "required": ["title", "category"]
                    },
                    "PostPatch": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "content": { "type": "string" },
                            "category": category,
                            "summary": { "type": "string" }
                        }
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "posts module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            posts = self.posts.count(),
            "posts module stopped"
        );
        Ok(())
    }
}

/// Create the posts module backed by a fresh table.
pub fn create_module() -> Arc<dyn Module> {
    Arc::new(PostsModule::new(Arc::new(Table::new())))
}
