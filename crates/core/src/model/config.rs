use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("category name cannot be empty")]
    EmptyCategory,

    #[error("bounded sessions need a question count > 0")]
    InvalidLimit,

    #[error("unknown practice mode: {0}")]
    UnknownMode(String),
}

/// Username recorded when the user leaves the name field blank.
pub const GUEST_USERNAME: &str = "guest";

//
// ─── MODE & STYLE ──────────────────────────────────────────────────────────────
//

/// Drill category for a practice run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PracticeMode {
    /// Simple-past conjugation drills, in both directions.
    #[serde(rename = "simple")]
    SimplePast,
    /// Continuous-form drills.
    #[serde(rename = "continuous")]
    Continuous,
    /// Translation drills.
    #[serde(rename = "translation")]
    Translation,
    /// Question-formation drills.
    #[serde(rename = "wh")]
    WhQuestion,
}

impl PracticeMode {
    /// Short label used on the wire and in persisted results.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::SimplePast => "simple",
            Self::Continuous => "continuous",
            Self::Translation => "translation",
            Self::WhQuestion => "wh",
        }
    }

    /// Parse a mode from its label.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownMode` for anything but the four labels.
    pub fn from_label(label: &str) -> Result<Self, ConfigError> {
        match label {
            "simple" => Ok(Self::SimplePast),
            "continuous" => Ok(Self::Continuous),
            "translation" => Ok(Self::Translation),
            "wh" => Ok(Self::WhQuestion),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for PracticeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Whether answers are typed or picked from fixed options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerStyle {
    Typed,
    Choice,
}

//
// ─── CATEGORY ──────────────────────────────────────────────────────────────────
//

/// Validated verb category name (trimmed, lowercased, non-empty).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a validated category name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptyCategory` if the name is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyCategory);
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CategoryName {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CategoryName> for String {
    fn from(name: CategoryName) -> Self {
        name.0
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Restricts a session to part of the verb dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Named(CategoryName),
}

impl CategoryFilter {
    /// Whether an entry in `category` passes this filter.
    #[must_use]
    pub fn accepts(&self, category: &CategoryName) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => name == category,
        }
    }
}

//
// ─── LIMIT ─────────────────────────────────────────────────────────────────────
//

/// Bounded question count or unlimited cycling through the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionLimit {
    Bounded(u32),
    Unlimited,
}

impl QuestionLimit {
    /// Create a bounded limit.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidLimit` when `count` is zero.
    pub fn bounded(count: u32) -> Result<Self, ConfigError> {
        if count == 0 {
            return Err(ConfigError::InvalidLimit);
        }
        Ok(Self::Bounded(count))
    }

    #[must_use]
    pub fn is_bounded(&self) -> bool {
        matches!(self, Self::Bounded(_))
    }

    /// The configured count, `None` for unlimited runs.
    #[must_use]
    pub fn count(&self) -> Option<u32> {
        match self {
            Self::Bounded(n) => Some(*n),
            Self::Unlimited => None,
        }
    }
}

//
// ─── SESSION CONFIG ────────────────────────────────────────────────────────────
//

/// Immutable input to a practice session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    mode: PracticeMode,
    style: AnswerStyle,
    category: CategoryFilter,
    limit: QuestionLimit,
    username: String,
}

impl SessionConfig {
    /// Create a session configuration. A blank username collapses to
    /// [`GUEST_USERNAME`].
    #[must_use]
    pub fn new(
        mode: PracticeMode,
        style: AnswerStyle,
        category: CategoryFilter,
        limit: QuestionLimit,
        username: impl Into<String>,
    ) -> Self {
        let username = username.into();
        let username = if username.trim().is_empty() {
            GUEST_USERNAME.to_string()
        } else {
            username.trim().to_string()
        };
        Self {
            mode,
            style,
            category,
            limit,
            username,
        }
    }

    #[must_use]
    pub fn mode(&self) -> PracticeMode {
        self.mode
    }

    #[must_use]
    pub fn style(&self) -> AnswerStyle {
        self.style
    }

    #[must_use]
    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    #[must_use]
    pub fn limit(&self) -> QuestionLimit {
        self.limit
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_username_becomes_guest() {
        let config = SessionConfig::new(
            PracticeMode::SimplePast,
            AnswerStyle::Typed,
            CategoryFilter::All,
            QuestionLimit::Unlimited,
            "   ",
        );
        assert_eq!(config.username(), GUEST_USERNAME);

        let config = SessionConfig::new(
            PracticeMode::SimplePast,
            AnswerStyle::Typed,
            CategoryFilter::All,
            QuestionLimit::Unlimited,
            "  maria ",
        );
        assert_eq!(config.username(), "maria");
    }

    #[test]
    fn zero_limit_is_rejected() {
        assert_eq!(QuestionLimit::bounded(0).unwrap_err(), ConfigError::InvalidLimit);
        assert_eq!(QuestionLimit::bounded(10).unwrap(), QuestionLimit::Bounded(10));
    }

    #[test]
    fn mode_labels_round_trip() {
        for mode in [
            PracticeMode::SimplePast,
            PracticeMode::Continuous,
            PracticeMode::Translation,
            PracticeMode::WhQuestion,
        ] {
            assert_eq!(PracticeMode::from_label(mode.label()).unwrap(), mode);
        }
        assert!(PracticeMode::from_label("mixed").is_err());
    }

    #[test]
    fn category_names_are_normalized() {
        let name = CategoryName::new("  Irregular ").unwrap();
        assert_eq!(name.as_str(), "irregular");

        let filter = CategoryFilter::Named(name.clone());
        assert!(filter.accepts(&name));
        assert!(!filter.accepts(&CategoryName::new("regular").unwrap()));
        assert!(CategoryFilter::All.accepts(&name));
    }
}
