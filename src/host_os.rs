use serde::Serialize;

/// OS identifiers the fingerprint engine understands.
pub const SUPPORTED_OS: [&str; 3] = ["windows", "macos", "linux"];

pub fn detect_host_os() -> &'static str {
  if cfg!(target_os = "macos") {
    "macos"
  } else if cfg!(target_os = "windows") {
    "windows"
  } else {
    "linux"
  }
}

pub fn is_supported_os(os: &str) -> bool {
  SUPPORTED_OS.contains(&os)
}

#[derive(Debug, Clone)]
pub struct OsOverrideCheck {
  pub valid: bool,
  pub warnings: Vec<String>,
  pub normalized: String,
}

/// Check an OS override against the host. An unsupported value is invalid;
/// a supported value that differs from the host gets advisory warnings only.
pub fn validate_os_override(os_override: &str, host_os: &str) -> OsOverrideCheck {
  let normalized = os_override.to_lowercase();

  if !is_supported_os(&normalized) {
    return OsOverrideCheck {
      valid: false,
      warnings: vec![format!(
        "Invalid OS value '{os_override}'. Must be one of: {}",
        SUPPORTED_OS.join(", ")
      )],
      normalized,
    };
  }

  let mut warnings = Vec::new();
  if normalized != host_os.to_lowercase() {
    warnings.push(format!(
      "OS override '{normalized}' differs from host OS '{host_os}'"
    ));
    warnings.push("This may cause fingerprint mismatches and site breakage".to_string());
    warnings.push(
      "Browser fonts, GPU info, and platform APIs may not match the spoofed OS".to_string(),
    );
    warnings.push("Consider using host OS for better compatibility".to_string());
  }

  OsOverrideCheck {
    valid: true,
    warnings,
    normalized,
  }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HostInfo {
  pub os: String,
  pub arch: String,
  pub os_version: Option<String>,
  pub kernel_version: Option<String>,
  pub hostname: Option<String>,
}

pub fn host_info() -> HostInfo {
  HostInfo {
    os: detect_host_os().to_string(),
    arch: std::env::consts::ARCH.to_string(),
    os_version: sysinfo::System::os_version(),
    kernel_version: sysinfo::System::kernel_version(),
    hostname: sysinfo::System::host_name(),
  }
}
