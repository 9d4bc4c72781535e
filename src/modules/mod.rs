pub mod authors;
pub mod posts;

use quill_kernel::ModuleRegistry;

/// Register every application module with the registry.
pub fn register_all(registry: &mut ModuleRegistry) -> anyhow::Result<()> {
    registry.register(authors::create_module())?;
    registry.register(posts::create_module())?;
    Ok(())
}
