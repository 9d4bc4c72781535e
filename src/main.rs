use anyhow::Context;
use quill_kernel::{InitCtx, ModuleRegistry, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load quill settings")?;
    quill_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        addr = %settings.server.bind_addr(),
        "quill-app bootstrap starting"
    );

    let mut registry = ModuleRegistry::new();
    quill_app::modules::register_all(&mut registry)?;

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    tracing::info!(modules = registry.len(), "quill-app bootstrap complete");

    let served = quill_http::start_server(&registry, &settings).await;
    registry.stop_all().await?;
    served
}
