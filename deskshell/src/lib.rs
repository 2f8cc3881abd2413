//! # deskshell: local desktop shell
//!
//! `deskshell` serves a bundled web front-end and a minimal file-access API
//! on a loopback port, then optionally hands the URL to a native window host
//! for display. It is the plumbing of a desktop app whose UI is a web page:
//! the page talks to the local file system through `/api/file`, and closing
//! the window (or interrupting the process) shuts the whole thing down within
//! a bounded cleanup deadline.
//!
//! ## Architecture
//!
//! The HTTP layer is built on [Axum](https://github.com/tokio-rs/axum). Two
//! components compose linearly:
//!
//! - The **file service** ([`api::handlers::file`]) implements read, write,
//!   and delete of arbitrary files named by a `filename` query parameter.
//!   Paths are used verbatim; the front-end is the trusted, only caller.
//! - The **lifecycle controller** ([`Application`]) binds the loopback
//!   listener, serves the router, waits for a termination trigger (OS signal
//!   or the presentation surface reporting its window closed, see
//!   [`shutdown::TerminationSource`]), then runs cleanup raced against a
//!   deadline. Overrunning the deadline yields
//!   [`errors::Error::CleanupTimeout`], which the binary treats as a fatal
//!   process exit: a shell that cannot release its resources in bounded time
//!   must not linger.
//!
//! The front-end bundle is embedded at compile time ([`static_assets`]) and
//! served on every route the API does not claim.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use deskshell::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = deskshell::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     deskshell::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await
//! }
//! ```

pub mod api;
pub mod config;
pub mod errors;
pub mod shutdown;
mod static_assets;
pub mod surface;
pub mod telemetry;

pub use config::Config;

use axum::{
    Router,
    routing::{any, get},
};
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use url::Url;

/// Build the application router: the file-access API plus the embedded
/// static bundle on every other path.
///
/// Routes live on an explicit [`Router`] owned by the [`Application`]; no
/// process-global registration anywhere.
pub fn build_router() -> Router {
    // Serve embedded static assets, falling back to the SPA entry point for
    // unmatched routes
    let fallback = get(api::handlers::static_assets::serve_embedded_asset).fallback(get(api::handlers::static_assets::spa_fallback));

    Router::new()
        .route("/api/file", any(api::handlers::file::file_handler))
        .fallback_service(fallback)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// Main application struct owning the listener, router, and shutdown timing.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] binds the loopback listener and builds
///    the router. A bind failure is fatal and propagates out of `main`.
/// 2. **Serve**: [`Application::serve`] handles requests until the shutdown
///    future resolves.
/// 3. **Shutdown**: cleanup runs under the configured deadline; completion
///    returns `Ok(())`, an overrun returns the distinguished timeout error.
pub struct Application {
    router: Router,
    listener: TcpListener,
    config: Config,
}

impl Application {
    /// Bind the loopback listener and assemble the router.
    ///
    /// Binding happens here rather than in [`serve`](Application::serve) so
    /// the caller can read the resolved URL (port 0 picks an ephemeral port)
    /// and hand it to the presentation surface before serving begins.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(config.bind_address()).await?;
        let router = build_router();

        Ok(Self { router, listener, config })
    }

    /// The URL the shell is reachable at, for the presentation surface
    pub fn local_url(&self) -> anyhow::Result<Url> {
        let addr = self.listener.local_addr()?;
        Ok(Url::parse(&format!("http://{addr}"))?)
    }

    /// Serve until `shutdown` resolves, then run the bounded cleanup
    /// sequence.
    ///
    /// Returns `Ok(())` after cleanup finishes inside the deadline. A
    /// deadline overrun returns [`errors::Error::CleanupTimeout`]; callers at
    /// the process boundary must exit fatally on it rather than continue.
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        info!("Listening at {}", self.local_url()?);

        axum::serve(self.listener, self.router).with_graceful_shutdown(shutdown).await?;

        shutdown::run_cleanup(&self.config.shutdown).await?;

        Ok(())
    }
}
