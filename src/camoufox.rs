//! Camoufox engine adapter.
//!
//! Spawns a Camoufox executable directly, passing the fingerprint
//! configuration through chunked CAMOU_CONFIG_N environment variables, and
//! terminates it by PID on stop. Camoufox's internal spoofing behavior is
//! entirely its own; this adapter only feeds it a resolved configuration.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command as TokioCommand;

use crate::engine::{AutomationEngine, EngineError, EngineHandle, ResolvedLaunchConfig};

/// Maximum chunk size for environment variables on Windows.
const CHUNK_SIZE_WINDOWS: usize = 2047;

/// Maximum chunk size for environment variables on Unix systems.
const CHUNK_SIZE_UNIX: usize = 32767;

fn chunk_size() -> usize {
  if cfg!(windows) {
    CHUNK_SIZE_WINDOWS
  } else {
    CHUNK_SIZE_UNIX
  }
}

/// Split the config JSON into CAMOU_CONFIG_1..n environment variables so it
/// fits platform env size limits.
fn chunk_config_string(config_str: &str) -> HashMap<String, String> {
  let mut env_vars = HashMap::new();
  for (i, chunk) in config_str.as_bytes().chunks(chunk_size()).enumerate() {
    let chunk_str = String::from_utf8_lossy(chunk).to_string();
    env_vars.insert(format!("CAMOU_CONFIG_{}", i + 1), chunk_str);
  }
  env_vars
}

/// Render a resolved launch config into the flat key space Camoufox reads.
fn config_to_json(config: &ResolvedLaunchConfig) -> serde_json::Value {
  let mut map = serde_json::Map::new();
  map.insert("screen.minWidth".to_string(), config.screen_min_width.into());
  map.insert("screen.maxWidth".to_string(), config.screen_max_width.into());
  map.insert(
    "screen.minHeight".to_string(),
    config.screen_min_height.into(),
  );
  map.insert(
    "screen.maxHeight".to_string(),
    config.screen_max_height.into(),
  );
  map.insert("window.outerWidth".to_string(), config.window_width.into());
  map.insert("window.outerHeight".to_string(), config.window_height.into());
  map.insert("humanize".to_string(), config.humanize.into());
  map.insert("showcursor".to_string(), config.show_cursor.into());
  if let Some(geo) = &config.geolocation_hint {
    map.insert("geolocation:latitude".to_string(), geo.latitude.into());
    map.insert("geolocation:longitude".to_string(), geo.longitude.into());
  }
  serde_json::Value::Object(map)
}

pub struct CamoufoxEngine {
  executable_path: PathBuf,
}

impl CamoufoxEngine {
  pub fn new(executable_path: impl Into<PathBuf>) -> Self {
    Self {
      executable_path: executable_path.into(),
    }
  }

  pub fn executable_path(&self) -> &Path {
    &self.executable_path
  }
}

#[async_trait]
impl AutomationEngine for CamoufoxEngine {
  async fn launch(
    &self,
    config: &ResolvedLaunchConfig,
  ) -> Result<Arc<dyn EngineHandle>, EngineError> {
    let config_json = serde_json::to_string(&config_to_json(config))
      .map_err(|e| EngineError::Launch(format!("Failed to serialize config: {e}")))?;
    let env_vars = chunk_config_string(&config_json);

    let mut args: Vec<String> = Vec::new();
    if config.headless {
      args.push("--headless".to_string());
    }
    args.push("--width".to_string());
    args.push(config.window_width.to_string());
    args.push("--height".to_string());
    args.push(config.window_height.to_string());

    let mut command = TokioCommand::new(&self.executable_path);
    command
      .args(&args)
      .stdin(Stdio::null())
      .stdout(Stdio::null())
      .stderr(Stdio::null());

    for (key, value) in &env_vars {
      command.env(key, value);
    }
    command.env("CAMOU_OS", &config.os);
    if let Some(proxy) = &config.proxy {
      command.env("CAMOU_PROXY_SERVER", &proxy.server);
      if let (Some(username), Some(password)) = (&proxy.username, &proxy.password) {
        command.env("CAMOU_PROXY_USERNAME", username);
        command.env("CAMOU_PROXY_PASSWORD", password);
      }
    }
    command.env("CAMOU_GEOIP", if config.geoip { "1" } else { "0" });

    log::info!("Launching Camoufox: {:?} with args: {args:?}", self.executable_path);

    let child = command
      .spawn()
      .map_err(|e| EngineError::Launch(format!("Failed to spawn Camoufox process: {e}")))?;

    let process_id = child
      .id()
      .ok_or_else(|| EngineError::Launch("Camoufox process exited immediately".to_string()))?;

    log::info!("Camoufox launched with PID: {process_id}");

    Ok(Arc::new(CamoufoxHandle {
      executable_path: self.executable_path.clone(),
      process_id,
    }))
  }
}

pub struct CamoufoxHandle {
  executable_path: PathBuf,
  process_id: u32,
}

impl CamoufoxHandle {
  fn is_running(&self) -> bool {
    use sysinfo::{Pid, System};
    let system = System::new_all();
    system.process(Pid::from(self.process_id as usize)).is_some()
  }
}

#[async_trait]
impl EngineHandle for CamoufoxHandle {
  /// Open a URL in the running instance via the browser's remote-tab
  /// mechanism (a second invocation without -no-remote reuses the first).
  async fn navigate(&self, url: &str) -> Result<(), EngineError> {
    if !self.is_running() {
      return Err(EngineError::Navigate(format!(
        "Browser process {} is no longer running",
        self.process_id
      )));
    }

    let status = TokioCommand::new(&self.executable_path)
      .args(["-new-tab", url])
      .stdin(Stdio::null())
      .stdout(Stdio::null())
      .stderr(Stdio::null())
      .status()
      .await
      .map_err(|e| EngineError::Navigate(format!("Failed to signal browser: {e}")))?;

    if status.success() {
      log::info!("Opened {url} in Camoufox instance (PID: {})", self.process_id);
      Ok(())
    } else {
      Err(EngineError::Navigate(format!(
        "Browser rejected navigation (exit status {status})"
      )))
    }
  }

  async fn close(&self) -> Result<(), EngineError> {
    if kill_process(self.process_id) {
      log::info!("Stopped Camoufox instance (PID: {})", self.process_id);
      Ok(())
    } else {
      Err(EngineError::Stop(format!(
        "Failed to terminate browser process {}",
        self.process_id
      )))
    }
  }
}

fn kill_process(pid: u32) -> bool {
  #[cfg(unix)]
  {
    let result = std::process::Command::new("kill")
      .args(["-TERM", &pid.to_string()])
      .status();

    match result {
      Ok(status) => status.success(),
      Err(e) => {
        log::warn!("Failed to kill process {pid}: {e}");
        false
      }
    }
  }

  #[cfg(windows)]
  {
    let result = std::process::Command::new("taskkill")
      .args(["/PID", &pid.to_string(), "/T"])
      .status();

    match result {
      Ok(status) => status.success(),
      Err(e) => {
        log::warn!("Failed to kill process {pid}: {e}");
        false
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::engine::EngineProxy;

  fn sample_config() -> ResolvedLaunchConfig {
    ResolvedLaunchConfig {
      os: "linux".to_string(),
      screen_min_width: 1920,
      screen_max_width: 1920,
      screen_min_height: 1080,
      screen_max_height: 1080,
      window_width: 1500,
      window_height: 900,
      headless: false,
      humanize: true,
      show_cursor: true,
      proxy: Some(EngineProxy {
        server: "http://proxy.example.com:8080".to_string(),
        username: None,
        password: None,
      }),
      geoip: true,
      geolocation_hint: None,
    }
  }

  #[test]
  fn test_chunking_splits_large_configs() {
    let long = "x".repeat(chunk_size() * 2 + 10);
    let env_vars = chunk_config_string(&long);
    assert_eq!(env_vars.len(), 3);
    assert!(env_vars.contains_key("CAMOU_CONFIG_1"));
    assert!(env_vars.contains_key("CAMOU_CONFIG_3"));
  }

  #[test]
  fn test_chunking_small_config_is_single_var() {
    let env_vars = chunk_config_string("{\"humanize\":true}");
    assert_eq!(env_vars.len(), 1);
  }

  #[test]
  fn test_config_json_pins_screen_constraints() {
    let json = config_to_json(&sample_config());
    assert_eq!(json["screen.minWidth"], json["screen.maxWidth"]);
    assert_eq!(json["window.outerWidth"], 1500);
  }

  #[test]
  fn test_spawn_failure_is_launch_error() {
    let engine = CamoufoxEngine::new("/nonexistent/camoufox-binary");
    let config = sample_config();
    let result = tokio::runtime::Runtime::new()
      .unwrap()
      .block_on(engine.launch(&config));
    assert!(matches!(result, Err(EngineError::Launch(_))));
  }
}
