// Locally saved profile page data.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{ConfigError, data_dir};

/// Avatar shown when no image has been saved.
pub const DEFAULT_AVATAR: &str = "https://www.w3schools.com/w3images/avatar2.png";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileData {
    pub username: String,
    pub email: String,
    pub bio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Default for ProfileData {
    fn default() -> Self {
        Self {
            username: "johndoe".into(),
            email: "johndoe@example.com".into(),
            bio: "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Sed do eiusmod \
                  tempor incididunt ut labore et dolore magna aliqua."
                .into(),
            image: None,
        }
    }
}

impl ProfileData {
    pub const FIELDS: [&'static str; 4] = ["username", "email", "bio", "image"];

    /// Set one field by name. An empty `image` clears it.
    pub fn set(&mut self, field: &str, value: &str) -> Result<(), ConfigError> {
        match field {
            "username" => self.username = value.to_owned(),
            "email" => self.email = value.to_owned(),
            "bio" => self.bio = value.to_owned(),
            "image" => {
                self.image = Some(value.to_owned()).filter(|v| !v.trim().is_empty());
            }
            other => {
                return Err(ConfigError::Validation {
                    field: other.to_owned(),
                    reason: format!("unknown profile field; expected one of {}", Self::FIELDS.join(", ")),
                });
            }
        }
        Ok(())
    }

    pub fn avatar(&self) -> &str {
        self.image.as_deref().unwrap_or(DEFAULT_AVATAR)
    }
}

pub fn profile_data_path() -> PathBuf {
    data_dir().join("profile.toml")
}

/// Load saved profile data, or the defaults when nothing is saved.
pub fn load_profile_data(path: &Path) -> Result<ProfileData, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ProfileData::default()),
        Err(e) => return Err(e.into()),
    };
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save_profile_data(path: &Path, data: &ProfileData) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(data)?)?;
    Ok(())
}
