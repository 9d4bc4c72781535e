use async_trait::async_trait;
use axum::Router;

/// Context handed to modules during initialization and start-up.
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
}

/// A self-contained slice of the application: its routes, its API
/// description and its lifecycle hooks.
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name for this module; also the mount point `/api/{name}`.
    fn name(&self) -> &'static str;

    /// Called once during startup, before any module is started.
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Router for this module's endpoints, relative to `/api/{name}`.
    fn routes(&self) -> Router {
        Router::new()
    }

    /// OpenAPI fragment (`paths` and `components.schemas`) merged into the
    /// served document. Paths are relative to the module mount point.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Called after every module has been initialized.
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called during shutdown, in reverse registration order.
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
