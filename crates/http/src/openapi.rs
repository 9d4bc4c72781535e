//! Merges module OpenAPI fragments into a single served document.

use quill_kernel::ModuleRegistry;
use serde_json::{json, Value};

/// Base document with the shared error schema and the health endpoint.
fn base_document() -> Value {
    json!({
        "openapi": "3.1.0",
        "info": {
            "title": "quill API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Authors and posts with field-level validation"
        },
        "paths": {
            "/healthz": {
                "get": {
                    "summary": "Health check",
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
                "ErrorResponse": {
                    "type": "object",
                    "properties": {
                        "error": {
                            "type": "object",
                            "properties": {
                                "code": { "type": "string" },
                                "message": { "type": "string" },
                                "details": { "type": "array", "items": { "type": "object" } },
                                "trace_id": { "type": "string" },
                                "timestamp": { "type": "string", "format": "date-time" }
                            },
                            "required": ["code", "message", "trace_id", "timestamp"]
                        }
                    },
                    "required": ["error"]
                }
            }
        }
    })
}

/// Merge one module fragment into `doc`, prefixing its paths with
/// `/api/{module}`. A trailing `/` on the module root is dropped.
pub fn merge_fragment(doc: &mut Value, module: &str, fragment: &Value) {
    if let Some(paths) = fragment.get("paths").and_then(Value::as_object) {
        for (path, item) in paths {
            let mounted = match path.as_str() {
                "/" => format!("/api/{module}"),
                other => format!("/api/{module}{other}"),
            };
            doc["paths"][mounted] = item.clone();
        }
    }

    if let Some(schemas) = fragment
        .pointer("/components/schemas")
        .and_then(Value::as_object)
    {
        for (name, schema) in schemas {
            doc["components"]["schemas"][name] = schema.clone();
        }
    }
}

/// Build the full document from every registered module.
pub fn build_document(registry: &ModuleRegistry) -> Value {
    let mut doc = base_document();
    for module in registry.modules() {
        if let Some(fragment) = module.openapi() {
            merge_fragment(&mut doc, module.name(), &fragment);
        }
    }
    doc
}

/// Typed view of the document for Swagger UI. Falls back to an empty
/// document when a fragment does not fit the OpenAPI model.
pub fn to_openapi(doc: &Value) -> utoipa::openapi::OpenApi {
    serde_json::from_value(doc.clone()).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "merged OpenAPI document did not parse; serving a stub");
        utoipa::openapi::OpenApiBuilder::new()
            .info(
                utoipa::openapi::InfoBuilder::new()
                    .title("quill API")
                    .version(env!("CARGO_PKG_VERSION"))
                    .build(),
            )
            .build()
    })
}
