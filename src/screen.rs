//! Screen and window geometry selection.
//!
//! Profiles either pin a fixed size, sample a custom weighted distribution,
//! or fall back to a built-in catalog of common resolutions.

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use serde::{Deserialize, Serialize};

use crate::validation::ValidationReport;

pub const MAX_DIMENSION: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ScreenSize {
  pub screen_width: u32,
  pub screen_height: u32,
  pub window_width: u32,
  pub window_height: u32,
  #[serde(default = "default_weight")]
  pub weight: f64,
}

fn default_weight() -> f64 {
  1.0
}

impl ScreenSize {
  pub const fn new(
    screen_width: u32,
    screen_height: u32,
    window_width: u32,
    window_height: u32,
    weight: f64,
  ) -> Self {
    Self {
      screen_width,
      screen_height,
      window_width,
      window_height,
      weight,
    }
  }
}

/// Common screen resolutions with realistic usage weights.
pub const COMMON_RESOLUTIONS: [ScreenSize; 9] = [
  ScreenSize::new(1920, 1080, 1500, 900, 35.0), // Full HD - most common
  ScreenSize::new(1366, 768, 1200, 700, 20.0),  // HD - laptops
  ScreenSize::new(1440, 900, 1300, 800, 12.0),  // MacBook Air
  ScreenSize::new(2560, 1440, 2000, 1200, 10.0), // 2K
  ScreenSize::new(1536, 864, 1400, 750, 8.0),   // 1.5K
  ScreenSize::new(1280, 720, 1100, 650, 6.0),   // HD
  ScreenSize::new(1600, 900, 1400, 800, 4.0),   // HD+
  ScreenSize::new(3840, 2160, 2800, 1800, 3.0), // 4K
  ScreenSize::new(1280, 1024, 1100, 900, 2.0),  // SXGA (older monitors)
];

/// Pick a plausible screen size from the built-in catalog.
pub fn random_catalog_screen() -> ScreenSize {
  let weights: Vec<f64> = COMMON_RESOLUTIONS.iter().map(|r| r.weight).collect();
  let mut rng = rand::rng();
  match WeightedIndex::new(&weights) {
    Ok(dist) => COMMON_RESOLUTIONS[dist.sample(&mut rng)],
    // Catalog weights are fixed and positive, so this branch is unreachable
    // in practice, but never fail the caller over a screen pick.
    Err(_) => COMMON_RESOLUTIONS[0],
  }
}

/// Sample one size from a custom weighted distribution.
///
/// An empty distribution falls back to the catalog. All-nonpositive weights
/// are replaced with uniform weights rather than failing.
pub fn sample_from_distribution(distribution: &[ScreenSize]) -> ScreenSize {
  if distribution.is_empty() {
    log::warn!("Empty distribution provided, using random catalog screen");
    return random_catalog_screen();
  }

  let mut weights: Vec<f64> = distribution.iter().map(|s| s.weight).collect();
  if weights.iter().all(|w| *w <= 0.0) {
    log::warn!("All distribution weights are zero or negative, using equal weights");
    weights = vec![1.0; distribution.len()];
  }

  let mut rng = rand::rng();
  match WeightedIndex::new(&weights) {
    Ok(dist) => {
      let selected = distribution[dist.sample(&mut rng)];
      log::info!(
        "Sampled screen size: {}x{}",
        selected.screen_width,
        selected.screen_height
      );
      selected
    }
    Err(e) => {
      log::error!("Error sampling from distribution: {e}");
      random_catalog_screen()
    }
  }
}

/// Resolve the concrete screen size for a session from a profile's
/// screen configuration. Never fails; malformed fixed sizes fall back
/// to the catalog.
pub fn select_for_profile(config: &crate::profile::ScreenConfig) -> ScreenSize {
  use crate::profile::ScreenConfig;

  match config {
    ScreenConfig::FixedProfile { fixed_screen } => {
      if fixed_screen.screen_width == 0
        || fixed_screen.screen_height == 0
        || fixed_screen.window_width == 0
        || fixed_screen.window_height == 0
      {
        log::warn!("Fixed screen config has zero dimensions, using random catalog screen");
        random_catalog_screen()
      } else {
        *fixed_screen
      }
    }
    ScreenConfig::CustomDistribution { distribution } => sample_from_distribution(distribution),
    ScreenConfig::RandomSession => random_catalog_screen(),
  }
}

/// Structural and plausibility checks for a single screen size.
pub fn validate_screen_size(size: &ScreenSize) -> ValidationReport {
  let mut report = ValidationReport::new();

  if size.screen_width == 0 || size.screen_height == 0 {
    report.error("Screen dimensions must be positive");
  }
  if size.window_width == 0 || size.window_height == 0 {
    report.error("Window dimensions must be positive");
  }
  if size.screen_width > MAX_DIMENSION
    || size.screen_height > MAX_DIMENSION
    || size.window_width > MAX_DIMENSION
    || size.window_height > MAX_DIMENSION
  {
    report.error(format!("Dimensions must be at most {MAX_DIMENSION} pixels"));
  }
  if size.weight <= 0.0 {
    report.error("Weight must be positive");
  }

  if size.window_width > size.screen_width {
    report.warn("Window width exceeds screen width");
  }
  if size.window_height > size.screen_height {
    report.warn("Window height exceeds screen height");
  }
  if size.screen_width < 800 || size.screen_height < 600 {
    report.warn("Very small screen resolution may cause compatibility issues");
  }
  if size.screen_width > 7680 || size.screen_height > 4320 {
    report.warn("Very large screen resolution is uncommon and may be suspicious");
  }
  if size.window_width < 400 || size.window_height < 300 {
    report.warn("Very small window size may cause usability issues");
  }

  report
}

pub const SCREEN_MODES: [&str; 3] = ["random_session", "fixed_profile", "custom_distribution"];

/// Pre-creation validation of a screen-mode configuration.
pub fn validate_mode_config(
  screen_mode: &str,
  fixed_screen: Option<&ScreenSize>,
  distribution: Option<&[ScreenSize]>,
) -> ValidationReport {
  let mut report = ValidationReport::new();

  if !SCREEN_MODES.contains(&screen_mode) {
    report.error(format!(
      "Invalid screen mode '{screen_mode}'. Must be one of: {}",
      SCREEN_MODES.join(", ")
    ));
    return report;
  }

  match screen_mode {
    "fixed_profile" => match fixed_screen {
      Some(size) => report.merge(validate_screen_size(size)),
      None => report.error("fixed_profile mode requires fixed_screen configuration"),
    },
    "custom_distribution" => match distribution {
      Some(items) if !items.is_empty() => {
        let mut total_weight = 0.0;
        for (i, item) in items.iter().enumerate() {
          report.merge_prefixed(format!("Distribution item {i}"), validate_screen_size(item));
          total_weight += item.weight;
        }
        if total_weight <= 0.0 {
          report.error("Total weight of distribution must be positive");
        }
      }
      _ => report.error("custom_distribution mode requires distribution configuration"),
    },
    _ => {}
  }

  report
}

/// Default screen size suggestions for the UI (most common first).
pub fn default_screen_sizes() -> Vec<ScreenSize> {
  COMMON_RESOLUTIONS[..5].to_vec()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_catalog_screen_comes_from_catalog() {
    for _ in 0..50 {
      let picked = random_catalog_screen();
      assert!(COMMON_RESOLUTIONS.contains(&picked));
    }
  }

  #[test]
  fn test_empty_distribution_falls_back_to_catalog() {
    let picked = sample_from_distribution(&[]);
    assert!(COMMON_RESOLUTIONS.contains(&picked));
  }

  #[test]
  fn test_all_zero_weights_sample_uniformly() {
    let items = [
      ScreenSize::new(1000, 1000, 900, 900, 0.0),
      ScreenSize::new(2000, 2000, 1800, 1800, 0.0),
    ];
    let mut seen = [0usize; 2];
    for _ in 0..2000 {
      let picked = sample_from_distribution(&items);
      let idx = items.iter().position(|i| *i == picked).unwrap();
      seen[idx] += 1;
    }
    // Both items must actually be reachable under the uniform substitute.
    assert!(seen[0] > 0 && seen[1] > 0);
  }

  #[test]
  fn test_weighted_sampling_converges() {
    let items = [
      ScreenSize::new(1920, 1080, 1500, 900, 70.0),
      ScreenSize::new(1366, 768, 1200, 700, 30.0),
    ];
    let draws = 10_000usize;
    let mut first = 0usize;
    for _ in 0..draws {
      if sample_from_distribution(&items) == items[0] {
        first += 1;
      }
    }
    let observed = first as f64 / draws as f64;
    assert!(
      (observed - 0.70).abs() < 0.03,
      "expected ~70% of draws for the heavier item, got {observed}"
    );
  }

  #[test]
  fn test_fixed_profile_returns_configured_size() {
    let size = ScreenSize::new(1920, 1080, 1600, 900, 1.0);
    let config = crate::profile::ScreenConfig::FixedProfile { fixed_screen: size };
    assert_eq!(select_for_profile(&config), size);
  }

  #[test]
  fn test_malformed_fixed_profile_falls_back() {
    let config = crate::profile::ScreenConfig::FixedProfile {
      fixed_screen: ScreenSize::new(0, 1080, 1600, 900, 1.0),
    };
    let picked = select_for_profile(&config);
    assert!(COMMON_RESOLUTIONS.contains(&picked));
  }

  #[test]
  fn test_validate_rejects_zero_width() {
    let report = validate_screen_size(&ScreenSize::new(0, 1080, 800, 600, 1.0));
    assert!(!report.valid);
    assert!(report.errors.iter().any(|e| e.contains("Screen dimensions")));
  }

  #[test]
  fn test_validate_rejects_oversized_dimensions() {
    let report = validate_screen_size(&ScreenSize::new(10_001, 1080, 800, 600, 1.0));
    assert!(!report.valid);
  }

  #[test]
  fn test_validate_warns_on_window_larger_than_screen() {
    let report = validate_screen_size(&ScreenSize::new(1024, 768, 1100, 650, 1.0));
    assert!(report.valid);
    assert!(report
      .warnings
      .iter()
      .any(|w| w.contains("Window width exceeds")));
  }

  #[test]
  fn test_validate_warns_on_tiny_resolution() {
    let report = validate_screen_size(&ScreenSize::new(640, 480, 600, 400, 1.0));
    assert!(report.valid);
    assert!(!report.warnings.is_empty());
  }

  #[test]
  fn test_mode_config_unknown_mode_is_error() {
    let report = validate_mode_config("fullscreen", None, None);
    assert!(!report.valid);
  }

  #[test]
  fn test_mode_config_fixed_requires_payload() {
    let report = validate_mode_config("fixed_profile", None, None);
    assert!(!report.valid);
    assert!(report.errors[0].contains("requires fixed_screen"));
  }

  #[test]
  fn test_mode_config_distribution_zero_total_weight_is_error() {
    let items = [
      ScreenSize::new(1920, 1080, 1500, 900, 1.0),
      ScreenSize::new(1366, 768, 1200, 700, -1.0),
    ];
    let report = validate_mode_config("custom_distribution", None, Some(&items));
    assert!(!report.valid);
    assert!(report
      .errors
      .iter()
      .any(|e| e.contains("Total weight") || e.contains("Weight must be positive")));
  }

  #[test]
  fn test_mode_config_tags_item_index() {
    let items = [ScreenSize::new(1920, 1080, 1500, 900, 1.0), ScreenSize::new(0, 768, 1200, 700, 1.0)];
    let report = validate_mode_config("custom_distribution", None, Some(&items));
    assert!(!report.valid);
    assert!(report.errors.iter().any(|e| e.starts_with("Distribution item 1:")));
  }

  #[test]
  fn test_default_screen_sizes_are_top_five() {
    let sizes = default_screen_sizes();
    assert_eq!(sizes.len(), 5);
    assert_eq!(sizes[0], COMMON_RESOLUTIONS[0]);
  }
}
