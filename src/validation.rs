//! Whole-request validation for profile creation.
//!
//! Validation outcomes are plain values: callers branch on `valid` and show
//! `errors`/`warnings`, nothing here is reported through error control flow.

use serde::Serialize;

use crate::host_os;
use crate::profile::{CreateProfileRequest, ScreenConfig};
use crate::proxy;
use crate::screen;

pub const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ValidationReport {
  pub valid: bool,
  pub errors: Vec<String>,
  pub warnings: Vec<String>,
}

impl Default for ValidationReport {
  fn default() -> Self {
    Self::new()
  }
}

impl ValidationReport {
  pub fn new() -> Self {
    Self {
      valid: true,
      errors: Vec::new(),
      warnings: Vec::new(),
    }
  }

  pub fn error(&mut self, message: impl Into<String>) {
    self.valid = false;
    self.errors.push(message.into());
  }

  pub fn warn(&mut self, message: impl Into<String>) {
    self.warnings.push(message.into());
  }

  pub fn merge(&mut self, other: ValidationReport) {
    self.valid = self.valid && other.valid;
    self.errors.extend(other.errors);
    self.warnings.extend(other.warnings);
  }

  /// Merge with every message tagged by a context prefix.
  pub fn merge_prefixed(&mut self, prefix: impl AsRef<str>, other: ValidationReport) {
    let prefix = prefix.as_ref();
    self.valid = self.valid && other.valid;
    self
      .errors
      .extend(other.errors.into_iter().map(|e| format!("{prefix}: {e}")));
    self
      .warnings
      .extend(other.warnings.into_iter().map(|w| format!("{prefix}: {w}")));
  }
}

/// Result of validating a creation request as a whole.
#[derive(Debug, Clone, Serialize)]
pub struct CreateValidation {
  pub valid: bool,
  pub errors: Vec<String>,
  pub warnings: Vec<String>,
  pub effective_os: String,
  /// Typed screen configuration, present when the screen part validated.
  #[serde(skip)]
  pub screen: Option<ScreenConfig>,
}

/// Validate a profile creation request and compute the effective OS.
///
/// The request is valid iff no sub-validation produced an error; warnings
/// never affect validity.
pub fn validate_create_request(request: &CreateProfileRequest, host: &str) -> CreateValidation {
  let mut report = ValidationReport::new();

  let name = request.name.trim();
  if name.is_empty() {
    report.error("Profile name must not be empty");
  } else if name.len() > MAX_NAME_LEN {
    report.error(format!("Profile name must be at most {MAX_NAME_LEN} characters"));
  }

  // Effective OS: host detection is authoritative when opted in, otherwise
  // the override is mandatory and checked against the supported set.
  let effective_os = if request.use_host_os {
    host.to_string()
  } else {
    match &request.os_override {
      Some(os_override) => {
        let check = host_os::validate_os_override(os_override, host);
        if check.valid {
          for warning in check.warnings {
            report.warn(warning);
          }
          check.normalized
        } else {
          for warning in check.warnings {
            report.error(warning);
          }
          host.to_string()
        }
      }
      None => {
        report.error("os_override is required when use_host_os is false");
        host.to_string()
      }
    }
  };

  report.merge(screen::validate_mode_config(
    &request.screen_mode,
    request.fixed_screen.as_ref(),
    request.distribution.as_deref(),
  ));

  if let Some(proxy_url) = &request.proxy {
    report.merge(proxy::validation_report(proxy_url));
  }

  let screen = if report.valid {
    Some(screen_config_from_request(request))
  } else {
    None
  };

  CreateValidation {
    valid: report.valid,
    errors: report.errors,
    warnings: report.warnings,
    effective_os,
    screen,
  }
}

/// Build the typed screen configuration from an already-validated request.
fn screen_config_from_request(request: &CreateProfileRequest) -> ScreenConfig {
  match request.screen_mode.as_str() {
    "fixed_profile" => match request.fixed_screen {
      Some(fixed_screen) => ScreenConfig::FixedProfile { fixed_screen },
      None => ScreenConfig::RandomSession,
    },
    "custom_distribution" => match &request.distribution {
      Some(distribution) => ScreenConfig::CustomDistribution {
        distribution: distribution.clone(),
      },
      None => ScreenConfig::RandomSession,
    },
    _ => ScreenConfig::RandomSession,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::screen::ScreenSize;

  fn base_request() -> CreateProfileRequest {
    CreateProfileRequest {
      name: "Test Profile".to_string(),
      screen_mode: "random_session".to_string(),
      fixed_screen: None,
      distribution: None,
      proxy: None,
      use_host_os: true,
      os_override: None,
      timezone: "GMT+00:00".to_string(),
    }
  }

  #[test]
  fn test_minimal_request_is_valid() {
    let validation = validate_create_request(&base_request(), "linux");
    assert!(validation.valid);
    assert_eq!(validation.effective_os, "linux");
    assert_eq!(validation.screen, Some(ScreenConfig::RandomSession));
  }

  #[test]
  fn test_empty_name_is_error() {
    let mut request = base_request();
    request.name = "  ".to_string();
    let validation = validate_create_request(&request, "linux");
    assert!(!validation.valid);
  }

  #[test]
  fn test_overlong_name_is_error() {
    let mut request = base_request();
    request.name = "x".repeat(101);
    assert!(!validate_create_request(&request, "linux").valid);
  }

  #[test]
  fn test_missing_override_when_host_os_disabled() {
    let mut request = base_request();
    request.use_host_os = false;
    let validation = validate_create_request(&request, "linux");
    assert!(!validation.valid);
    assert!(validation
      .errors
      .iter()
      .any(|e| e.contains("os_override is required")));
  }

  #[test]
  fn test_override_mismatch_is_warning_not_error() {
    let mut request = base_request();
    request.use_host_os = false;
    request.os_override = Some("windows".to_string());
    let validation = validate_create_request(&request, "linux");
    assert!(validation.valid);
    assert_eq!(validation.effective_os, "windows");
    assert!(validation
      .warnings
      .iter()
      .any(|w| w.contains("differs from host")));
  }

  #[test]
  fn test_unsupported_override_is_error() {
    let mut request = base_request();
    request.use_host_os = false;
    request.os_override = Some("templeos".to_string());
    assert!(!validate_create_request(&request, "linux").valid);
  }

  #[test]
  fn test_fixed_mode_without_payload_is_error() {
    let mut request = base_request();
    request.screen_mode = "fixed_profile".to_string();
    let validation = validate_create_request(&request, "linux");
    assert!(!validation.valid);
    assert!(validation.screen.is_none());
  }

  #[test]
  fn test_fixed_mode_with_zero_width_is_error() {
    let mut request = base_request();
    request.screen_mode = "fixed_profile".to_string();
    request.fixed_screen = Some(ScreenSize::new(0, 1080, 1500, 900, 1.0));
    assert!(!validate_create_request(&request, "linux").valid);
  }

  #[test]
  fn test_valid_fixed_mode_yields_typed_config() {
    let size = ScreenSize::new(1920, 1080, 1500, 900, 1.0);
    let mut request = base_request();
    request.screen_mode = "fixed_profile".to_string();
    request.fixed_screen = Some(size);
    let validation = validate_create_request(&request, "linux");
    assert!(validation.valid);
    assert_eq!(
      validation.screen,
      Some(ScreenConfig::FixedProfile { fixed_screen: size })
    );
  }

  #[test]
  fn test_bad_proxy_fails_whole_request() {
    let mut request = base_request();
    request.proxy = Some("ftp://host:21".to_string());
    let validation = validate_create_request(&request, "linux");
    assert!(!validation.valid);
    assert!(validation.errors.iter().any(|e| e.contains("Unsupported")));
  }

  #[test]
  fn test_proxy_warnings_are_aggregated() {
    let mut request = base_request();
    request.proxy = Some("http://user:pw@127.0.0.1:8080".to_string());
    let validation = validate_create_request(&request, "linux");
    assert!(validation.valid);
    assert!(validation.warnings.len() >= 2);
  }
}
