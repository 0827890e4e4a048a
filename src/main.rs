use anyhow::{Context, Result};
use overlay_bridge::config::{validate_config, Config, ConfigLoader, DEFAULT_CONFIG_FILE};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
    let config = ConfigLoader::new(&config_path)
        .load_or_default()
        .with_context(|| format!("loading {}", config_path))?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.to_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting overlay-probe v{}", overlay_bridge::core::VERSION);
    validate_config(&config).context("invalid configuration")?;

    run(config).await
}

#[cfg(windows)]
async fn run(config: Config) -> Result<()> {
    use overlay_bridge::overlay::NativeOverlay;
    use overlay_bridge::{FrameBridge, MemoryAccessor, Projector, SystemLocator, Vector3};
    use std::sync::Arc;
    use tracing::debug;

    let backend = NativeOverlay::load(&config.target.backend_library)
        .with_context(|| format!("loading {}", config.target.backend_library))?;
    info!("Overlay backend loaded from {}", backend.path().display());

    let mut bridge = FrameBridge::new(Arc::new(backend), SystemLocator);
    bridge.set_options(config.bridge_options());

    let painter = bridge.painter();
    let probe = config.probe.clone();
    bridge.attach(
        &config.target.process_name,
        move |memory: &MemoryAccessor, projector: &mut Projector, _width: i32, _height: i32| {
            if let Some(address) = probe.view_matrix {
                match memory.read_matrix(address) {
                    Ok(matrix) => projector.set_projection(matrix),
                    Err(e) => debug!("View matrix read at {} failed: {}", address, e),
                }
            }

            for (index, address) in probe.points.iter().enumerate() {
                let point: Vector3 = match memory.read_vector3(*address) {
                    Ok(point) => point,
                    Err(e) => {
                        debug!("Point {} read at {} failed: {}", index, address, e);
                        continue;
                    }
                };

                let Some(screen) = projector.world_to_screen(point) else {
                    continue;
                };
                if !projector.is_on_screen(screen) {
                    continue;
                }

                painter.draw_circle(screen.x, screen.y, probe.radius, 1.5, probe.color, false);
                painter.draw_string_sized(
                    screen.x + probe.radius + 2.0,
                    screen.y,
                    index.to_string(),
                    probe.color,
                    14.0,
                );
            }
        },
    )?;

    info!("overlay-probe attached. Press Ctrl+C to detach.");
    tokio::signal::ctrl_c().await?;

    bridge.detach();
    info!("Shutting down overlay-probe");
    Ok(())
}

#[cfg(not(windows))]
async fn run(_config: Config) -> Result<()> {
    anyhow::bail!("overlay-probe only supports the Windows platform");
}
