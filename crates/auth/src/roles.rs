use serde::{Deserialize, Serialize};

/// Coarse authority tier of a member inside an organization.
///
/// Ordered from lowest to highest; `Level_4` carries full organizational
/// authority (the rank given to an organization's creator).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "Level_1")]
    Level1,
    #[serde(rename = "Level_2")]
    Level2,
    #[serde(rename = "Level_3")]
    Level3,
    #[serde(rename = "Level_4")]
    Level4,
}

impl Level {
    /// Rank required for organization-wide creation.
    pub const TOP: Level = Level::Level4;

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Level1 => "Level_1",
            Level::Level2 => "Level_2",
            Level::Level3 => "Level_3",
            Level::Level4 => "Level_4",
        }
    }

    pub fn is_top(&self) -> bool {
        *self == Self::TOP
    }
}

impl core::fmt::Display for Level {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-form label of a member's position (e.g. `CREATOR`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(String);

impl Position {
    pub const CREATOR: &'static str = "CREATOR";

    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn creator() -> Self {
        Self::new(Self::CREATOR)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Global account type.
///
/// `Admin` is the administrative type that bypasses organization and
/// resource permission checks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    #[default]
    User,
    Admin,
}

impl AccountType {
    pub fn is_admin(&self) -> bool {
        matches!(self, AccountType::Admin)
    }
}
