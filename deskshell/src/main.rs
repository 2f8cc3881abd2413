use clap::Parser;
use deskshell::{Application, Config, errors::Error, telemetry};

use deskshell::shutdown::TerminationSource;
use deskshell::surface::{HeadlessSurface, PresentationSurface};

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI args
    let args = deskshell::config::Args::parse();

    // Load configuration
    let config = Config::load(&args)?;

    // If --validate flag is set, exit successfully after config validation
    if args.validate {
        println!("Configuration is valid.");
        return Ok(());
    }

    telemetry::init_telemetry()?;

    tracing::debug!("{:?}", args);

    let app = Application::new(config.clone()).await?;
    let url = app.local_url()?;

    // The core ships the headless surface; a windowed host links in its own
    // PresentationSurface implementation.
    let surface: Box<dyn PresentationSurface> = Box::new(HeadlessSurface);
    if config.window.enabled {
        let (width, height) = config.window.geometry(surface.display_metrics());
        tracing::info!("Window geometry: {width}x{height}");
    }
    surface.navigate(&url);

    // Either termination trigger ends the idle state; only the first one
    // counts.
    let termination = TerminationSource::new();

    let signal_trigger = termination.trigger();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_trigger.fire();
    });

    let close_trigger = termination.trigger();
    tokio::spawn(async move {
        surface.closed().await;
        tracing::info!("Presentation surface closed, shutting down gracefully...");
        close_trigger.fire();
    });

    // Run the application; a cleanup-timeout is a hard fault and must kill
    // the process rather than be reported as an ordinary error.
    if let Err(err) = app.serve(async move { termination.wait().await }).await {
        if matches!(err.downcast_ref::<Error>(), Some(Error::CleanupTimeout { .. })) {
            tracing::error!("{err}");
            std::process::exit(1);
        }
        return Err(err);
    }

    Ok(())
}
