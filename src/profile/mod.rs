pub mod manager;
pub mod types;

pub use manager::{ProfileManager, RegistryError};
pub use types::{
  CreateProfileRequest, Profile, ProfileConfig, ProfileResponse, ProfileStatus, ScreenConfig,
};
