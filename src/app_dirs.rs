use directories::BaseDirs;
use std::path::PathBuf;
use std::sync::OnceLock;

static BASE_DIRS: OnceLock<BaseDirs> = OnceLock::new();

fn base_dirs() -> &'static BaseDirs {
  BASE_DIRS.get_or_init(|| BaseDirs::new().expect("Failed to get base directories"))
}

pub fn app_name() -> &'static str {
  if cfg!(debug_assertions) {
    "FoxdenDev"
  } else {
    "Foxden"
  }
}

pub fn data_dir() -> PathBuf {
  #[cfg(test)]
  {
    if let Some(dir) = TEST_DATA_DIR.with(|cell| cell.borrow().clone()) {
      return dir;
    }
  }

  if let Ok(dir) = std::env::var("FOXDEN_DATA_DIR") {
    return PathBuf::from(dir);
  }

  base_dirs().data_local_dir().join(app_name())
}

pub fn profiles_file() -> PathBuf {
  data_dir().join("profiles.json")
}

pub fn keys_dir() -> PathBuf {
  data_dir().join("keys")
}

/// Vault key lives outside the profile store so that copying `profiles.json`
/// never copies the material needed to read its ciphertexts.
pub fn vault_key_file() -> PathBuf {
  keys_dir().join("vault.key")
}

#[cfg(test)]
thread_local! {
  static TEST_DATA_DIR: std::cell::RefCell<Option<PathBuf>> = const { std::cell::RefCell::new(None) };
}

#[cfg(test)]
pub struct TestDirGuard;

#[cfg(test)]
impl Drop for TestDirGuard {
  fn drop(&mut self) {
    TEST_DATA_DIR.with(|cell| *cell.borrow_mut() = None);
  }
}

#[cfg(test)]
pub fn set_test_data_dir(dir: PathBuf) -> TestDirGuard {
  TEST_DATA_DIR.with(|cell| *cell.borrow_mut() = Some(dir));
  TestDirGuard
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_app_name() {
    let name = app_name();
    assert!(
      name == "Foxden" || name == "FoxdenDev",
      "app_name should be Foxden or FoxdenDev, got: {name}"
    );
  }

  #[test]
  fn test_subdirectory_helpers() {
    assert!(profiles_file().ends_with("profiles.json"));
    assert!(keys_dir().ends_with("keys"));
    assert!(vault_key_file().ends_with("keys/vault.key"));
  }

  #[test]
  fn test_set_test_data_dir() {
    let tmp = PathBuf::from("/tmp/test-foxden-data");
    let _guard = set_test_data_dir(tmp.clone());
    assert_eq!(data_dir(), tmp);
    assert_eq!(profiles_file(), tmp.join("profiles.json"));
  }

  #[test]
  fn test_guard_cleanup() {
    let original = data_dir();
    {
      let _guard = set_test_data_dir(PathBuf::from("/tmp/test-cleanup-data"));
      assert_eq!(data_dir(), PathBuf::from("/tmp/test-cleanup-data"));
    }
    assert_eq!(data_dir(), original);
  }
}
