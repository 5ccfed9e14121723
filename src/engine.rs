//! The seam to the external browser-automation engine.
//!
//! The session registry hands a fully resolved configuration to an
//! `AutomationEngine` and gets back an opaque handle; nothing else in the
//! crate talks to the engine.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::geolocation::Geolocation;

/// Engine-native proxy descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EngineProxy {
  pub server: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub username: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub password: Option<String>,
}

/// Everything the engine needs to start one browser instance. Screen
/// constraints are pinned (min == max) to force the sampled size.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedLaunchConfig {
  pub os: String,
  pub screen_min_width: u32,
  pub screen_max_width: u32,
  pub screen_min_height: u32,
  pub screen_max_height: u32,
  pub window_width: u32,
  pub window_height: u32,
  pub headless: bool,
  pub humanize: bool,
  pub show_cursor: bool,
  pub proxy: Option<EngineProxy>,
  /// IP-based geolocation, enabled automatically whenever a proxy is present.
  pub geoip: bool,
  /// Timezone-derived fallback hint, set when no proxy is available.
  pub geolocation_hint: Option<Geolocation>,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
  #[error("Failed to launch browser: {0}")]
  Launch(String),

  #[error("Navigation failed: {0}")]
  Navigate(String),

  #[error("Failed to stop browser: {0}")]
  Stop(String),
}

#[async_trait]
pub trait AutomationEngine: Send + Sync {
  async fn launch(&self, config: &ResolvedLaunchConfig)
    -> Result<Arc<dyn EngineHandle>, EngineError>;
}

#[async_trait]
pub trait EngineHandle: Send + Sync {
  async fn navigate(&self, url: &str) -> Result<(), EngineError>;
  async fn close(&self) -> Result<(), EngineError>;
}

/// Engine that simulates sessions without spawning a browser. Used for
/// development without a Camoufox binary (`--engine null`) and by tests.
#[derive(Debug, Default)]
pub struct NullEngine;

struct NullHandle;

#[async_trait]
impl AutomationEngine for NullEngine {
  async fn launch(
    &self,
    config: &ResolvedLaunchConfig,
  ) -> Result<Arc<dyn EngineHandle>, EngineError> {
    log::info!(
      "Null engine launch: os={} window={}x{} proxy={}",
      config.os,
      config.window_width,
      config.window_height,
      config.proxy.is_some()
    );
    Ok(Arc::new(NullHandle))
  }
}

#[async_trait]
impl EngineHandle for NullHandle {
  async fn navigate(&self, url: &str) -> Result<(), EngineError> {
    log::info!("Null engine navigate: {url}");
    Ok(())
  }

  async fn close(&self) -> Result<(), EngineError> {
    Ok(())
  }
}
