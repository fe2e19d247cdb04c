use anyhow::Context;
use orbit::{AppConfig, Bootstrap, SettingKey, SettingsStore, spawn_startup_tasks};
use orbit_logger::{Diagnostics, LevelFilter};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    Diagnostics::builder()
        .level(LevelFilter::INFO)
        .init()
        .context("failed to install the diagnostic subscriber")?;

    // Optional manifest path as the single argument.
    let mut bootstrap = Bootstrap::new().data_dir("var/settings");
    if let Some(path) = std::env::args().nth(1) {
        bootstrap = bootstrap.manifest_path(path);
    }

    let registry = bootstrap.init().await.context("platform bootstrap failed")?;
    spawn_startup_tasks(&registry)?;

    let config = registry.resolve::<AppConfig>()?;
    let snapshot = config.snapshot();
    tracing::info!(
        environment = %snapshot.environment,
        base_url = %snapshot.base_url,
        encryption = snapshot.enable_encryption,
        "Shell ready"
    );

    // The startup tasks are detached; give them a beat before reporting.
    tokio::time::sleep(Duration::from_millis(200)).await;

    let settings = registry.resolve::<SettingsStore>()?;
    tracing::info!(
        launches = settings.get_int(SettingKey::AppUsageCount).await,
        theme = %settings.get_string(SettingKey::PreferredTheme).await.unwrap_or_default(),
        "Persisted state"
    );

    Ok(())
}
