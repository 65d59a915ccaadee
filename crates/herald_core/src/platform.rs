//! Social platforms content can be published to.

use herald_error::{ContentError, ContentErrorKind};
use serde::{Deserialize, Serialize};

/// A social platform with a publishing adapter.
///
/// # Examples
///
/// ```
/// use herald_core::Platform;
///
/// let platform: Platform = "linkedin".parse().unwrap();
/// assert_eq!(platform, Platform::LinkedIn);
/// assert_eq!(platform.to_string(), "LinkedIn");
/// assert_eq!(platform.account_key(), "linkedin");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
pub enum Platform {
    /// Facebook pages
    Facebook,
    /// Instagram business accounts
    Instagram,
    /// LinkedIn members
    #[display("LinkedIn")]
    LinkedIn,
}

impl Platform {
    /// Name as stored on content rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Facebook => "Facebook",
            Platform::Instagram => "Instagram",
            Platform::LinkedIn => "LinkedIn",
        }
    }

    /// Lowercase key used on linked account rows and in artifact names.
    pub fn account_key(&self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
            Platform::LinkedIn => "linkedin",
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "facebook" => Ok(Platform::Facebook),
            "instagram" => Ok(Platform::Instagram),
            "linkedin" => Ok(Platform::LinkedIn),
            _ => Err(ContentError::new(ContentErrorKind::UnknownPlatform(
                s.to_string(),
            ))),
        }
    }
}
