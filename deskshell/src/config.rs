//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable
//! overrides. The file path defaults to `deskshell.yaml` and can be set via
//! `-f` flag or the `DESKSHELL_CONFIG` environment variable.
//!
//! ## Loading Priority
//!
//! Sources are merged in order (later sources override earlier ones):
//!
//! 1. **YAML config file** - base configuration (default: `deskshell.yaml`)
//! 2. **Environment variables** - variables prefixed with `DESKSHELL_`
//! 3. **PORT** - special case: overrides `port` if set
//!
//! Nested values use double underscores, e.g.
//! `DESKSHELL_SHUTDOWN__DEADLINE=30s` sets `shutdown.deadline`.
//!
//! The server always binds to loopback; only the port is configurable.

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::Error;
use crate::surface::DisplayMetrics;

/// Loopback-only deployment model: the listener is never reachable from
/// outside the machine, so the host is not configurable.
pub static LOOPBACK_HOST: &str = "127.0.0.1";

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "DESKSHELL_CONFIG", default_value = "deskshell.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// Loaded from YAML and environment variables; every field has a default.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// TCP port to bind on loopback. `PORT` overrides this.
    pub port: u16,
    /// Bounded-time shutdown behavior
    pub shutdown: ShutdownConfig,
    /// Native window host configuration
    pub window: WindowConfig,
}

/// Shutdown timing. The grace period is the cleanup action itself (a
/// placeholder pause until real teardown lands); the deadline is the hard
/// upper bound after which the process exits fatally.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShutdownConfig {
    /// Duration of the cleanup action (e.g. "2s")
    #[serde(with = "humantime_serde")]
    pub grace: Duration,
    /// Maximum wall-clock time allowed for cleanup before fatal exit (e.g. "10s")
    #[serde(with = "humantime_serde")]
    pub deadline: Duration,
}

/// Native window settings. The shell runs headless when disabled; width and
/// height fall back to the surface's display metrics when unset.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub enabled: bool,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl WindowConfig {
    /// Resolve the window geometry against the surface's display metrics
    pub fn geometry(&self, metrics: DisplayMetrics) -> (u32, u32) {
        (self.width.unwrap_or(metrics.width), self.height.unwrap_or(metrics.height))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 24000,
            shutdown: ShutdownConfig::default(),
            window: WindowConfig::default(),
        }
    }
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            grace: Duration::from_secs(2),
            deadline: Duration::from_secs(10),
        }
    }
}

impl Config {
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required fields
    pub fn validate(&self) -> Result<(), Error> {
        if self.shutdown.deadline.is_zero() {
            return Err(Error::Startup {
                message: "Config validation: shutdown.deadline cannot be zero. Give cleanup a positive duration (default: 10s).".to_string(),
            });
        }

        if self.window.width == Some(0) || self.window.height == Some(0) {
            return Err(Error::Startup {
                message: "Config validation: window dimensions cannot be zero. Omit them to use the display metrics.".to_string(),
            });
        }

        Ok(())
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can still override specific values
            .merge(Env::prefixed("DESKSHELL_").split("__"))
            // Plain PORT is the conventional override for local tools
            .merge(Env::raw().only(&["PORT"]))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", LOOPBACK_HOST, self.port)
    }
}
