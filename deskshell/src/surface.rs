//! Presentation surface: the windowed UI host that displays the served site.
//!
//! The surface is an external collaborator behind a trait. The shell hands it
//! the listen URL and waits for its close notification as one of the two
//! termination triggers (the other being OS signals, see
//! [`crate::shutdown`]). Platform display probing stays on the other side of
//! this boundary; [`DisplayMetrics`] is the capability the surface provides,
//! with a portable fallback when the host cannot be probed.

use async_trait::async_trait;
use url::Url;

/// Width and height of the display the window opens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayMetrics {
    pub width: u32,
    pub height: u32,
}

impl Default for DisplayMetrics {
    /// Portable fallback for hosts without display probing
    fn default() -> Self {
        Self { width: 1024, height: 768 }
    }
}

#[async_trait]
pub trait PresentationSurface: Send + Sync {
    /// Hand the served URL to the surface for display
    fn navigate(&self, url: &Url);

    /// Resolves when the user closes the surface. Headless hosts never
    /// resolve, leaving OS signals as the only termination trigger.
    async fn closed(&self);

    /// Display metrics of the host
    fn display_metrics(&self) -> DisplayMetrics {
        DisplayMetrics::default()
    }
}

/// Surface for the windowless variant: logs the URL instead of displaying it
/// and never reports a close.
pub struct HeadlessSurface;

#[async_trait]
impl PresentationSurface for HeadlessSurface {
    fn navigate(&self, url: &Url) {
        tracing::info!("No window host attached, open {url} in a browser");
    }

    async fn closed(&self) {
        std::future::pending::<()>().await
    }
}
