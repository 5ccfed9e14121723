use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::screen::ScreenSize;

/// Screen-geometry selection strategy, tagged so the persisted JSON carries
/// the `screen_mode` discriminator the migration logic keys on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(tag = "screen_mode", rename_all = "snake_case")]
pub enum ScreenConfig {
  /// Fresh weighted pick from the built-in catalog on every launch.
  RandomSession,
  /// One pinned size for the profile's lifetime.
  FixedProfile { fixed_screen: ScreenSize },
  /// Weighted pick from a user-supplied distribution on every launch.
  CustomDistribution { distribution: Vec<ScreenSize> },
}

impl ScreenConfig {
  pub fn mode_name(&self) -> &'static str {
    match self {
      ScreenConfig::RandomSession => "random_session",
      ScreenConfig::FixedProfile { .. } => "fixed_profile",
      ScreenConfig::CustomDistribution { .. } => "custom_distribution",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProfileStatus {
  #[default]
  Inactive,
  Active,
}

/// Derived launch defaults, generated at creation and regenerated at launch
/// when a stored profile predates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProfileConfig {
  pub effective_os: String,
  pub timezone: String,
  pub locale_language: String,
  pub locale_region: String,
  pub humanize: bool,
  pub show_cursor: bool,
  pub headless: bool,
}

impl ProfileConfig {
  pub fn generate(effective_os: &str, timezone: &str) -> Self {
    Self {
      effective_os: effective_os.to_string(),
      timezone: timezone.to_string(),
      locale_language: "en".to_string(),
      locale_region: "US".to_string(),
      humanize: true,
      show_cursor: true,
      headless: false,
    }
  }
}

pub fn default_timezone() -> String {
  "GMT+00:00".to_string()
}

fn default_true() -> bool {
  true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
  pub id: uuid::Uuid,
  pub name: String,
  #[serde(flatten)]
  pub screen: ScreenConfig,
  /// Vault ciphertext; the plaintext proxy URL is never persisted.
  #[serde(default)]
  pub proxy_encrypted: Option<String>,
  #[serde(default)]
  pub has_proxy: bool,
  #[serde(default = "default_true")]
  pub use_host_os: bool,
  #[serde(default)]
  pub os_override: Option<String>,
  /// Persisted so the fingerprint stays stable across host migrations.
  pub effective_os: String,
  #[serde(default = "default_timezone")]
  pub timezone: String,
  /// Cached projection of the session registry's state, not authoritative.
  #[serde(default)]
  pub status: ProfileStatus,
  pub created_at: DateTime<Utc>,
  #[serde(default)]
  pub config: Option<ProfileConfig>,
  #[serde(default)]
  pub warnings: Vec<String>,
}

/// Request body for profile creation. Screen fields stay loose here so a
/// missing payload surfaces as a validation error rather than a parse error.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateProfileRequest {
  pub name: String,
  #[serde(default = "default_screen_mode")]
  pub screen_mode: String,
  #[serde(default)]
  pub fixed_screen: Option<ScreenSize>,
  #[serde(default)]
  pub distribution: Option<Vec<ScreenSize>>,
  /// Proxy URL in the form protocol://[user:pass@]host:port.
  #[serde(default)]
  pub proxy: Option<String>,
  #[serde(default = "default_true")]
  pub use_host_os: bool,
  #[serde(default)]
  pub os_override: Option<String>,
  #[serde(default = "default_timezone")]
  pub timezone: String,
}

fn default_screen_mode() -> String {
  "random_session".to_string()
}

/// Profile view returned by the API: ciphertext stays server-side, the proxy
/// appears only as a display host.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ProfileResponse {
  #[schema(value_type = String)]
  pub id: uuid::Uuid,
  pub name: String,
  #[serde(flatten)]
  pub screen: ScreenConfig,
  pub has_proxy: bool,
  pub proxy_host: Option<String>,
  pub use_host_os: bool,
  pub os_override: Option<String>,
  pub effective_os: String,
  pub timezone: String,
  pub status: ProfileStatus,
  pub created_at: DateTime<Utc>,
  pub warnings: Vec<String>,
}

impl ProfileResponse {
  pub fn from_profile(profile: &Profile, proxy_url: Option<&str>) -> Self {
    let proxy_host = proxy_url.map(|url| match crate::proxy::parse_proxy_url(url) {
      Ok(endpoint) => endpoint.display_host(),
      Err(_) => "configured".to_string(),
    });

    Self {
      id: profile.id,
      name: profile.name.clone(),
      screen: profile.screen.clone(),
      has_proxy: profile.has_proxy,
      proxy_host,
      use_host_os: profile.use_host_os,
      os_override: profile.os_override.clone(),
      effective_os: profile.effective_os.clone(),
      timezone: profile.timezone.clone(),
      status: profile.status,
      created_at: profile.created_at,
      warnings: profile.warnings.clone(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_screen_config_serializes_with_mode_tag() {
    let json = serde_json::to_value(ScreenConfig::RandomSession).unwrap();
    assert_eq!(json["screen_mode"], "random_session");

    let json = serde_json::to_value(ScreenConfig::FixedProfile {
      fixed_screen: ScreenSize::new(1920, 1080, 1500, 900, 1.0),
    })
    .unwrap();
    assert_eq!(json["screen_mode"], "fixed_profile");
    assert_eq!(json["fixed_screen"]["screen_width"], 1920);
  }

  #[test]
  fn test_profile_round_trips_through_json() {
    let profile = Profile {
      id: uuid::Uuid::new_v4(),
      name: "Roundtrip".to_string(),
      screen: ScreenConfig::CustomDistribution {
        distribution: vec![ScreenSize::new(1920, 1080, 1500, 900, 70.0)],
      },
      proxy_encrypted: Some("AAAA".to_string()),
      has_proxy: true,
      use_host_os: false,
      os_override: Some("windows".to_string()),
      effective_os: "windows".to_string(),
      timezone: "GMT+01:00".to_string(),
      status: ProfileStatus::Inactive,
      created_at: Utc::now(),
      config: Some(ProfileConfig::generate("windows", "GMT+01:00")),
      warnings: vec!["advisory".to_string()],
    };

    let json = serde_json::to_string(&profile).unwrap();
    let parsed: Profile = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.screen, profile.screen);
    assert_eq!(parsed.effective_os, "windows");
    assert!(parsed.has_proxy);
  }

  #[test]
  fn test_create_request_defaults() {
    let request: CreateProfileRequest = serde_json::from_str(r#"{"name": "Minimal"}"#).unwrap();
    assert_eq!(request.screen_mode, "random_session");
    assert!(request.use_host_os);
    assert_eq!(request.timezone, "GMT+00:00");
  }

  #[test]
  fn test_response_never_carries_ciphertext() {
    let profile = Profile {
      id: uuid::Uuid::new_v4(),
      name: "NoLeak".to_string(),
      screen: ScreenConfig::RandomSession,
      proxy_encrypted: Some("ciphertext-blob".to_string()),
      has_proxy: true,
      use_host_os: true,
      os_override: None,
      effective_os: "linux".to_string(),
      timezone: default_timezone(),
      status: ProfileStatus::Active,
      created_at: Utc::now(),
      config: None,
      warnings: Vec::new(),
    };

    let response =
      ProfileResponse::from_profile(&profile, Some("http://u:p@proxy.example.com:8080"));
    let json = serde_json::to_string(&response).unwrap();
    assert!(!json.contains("ciphertext-blob"));
    assert!(!json.contains(":p@"));
    assert_eq!(response.proxy_host.as_deref(), Some("proxy.example.com:8080"));
  }
}
