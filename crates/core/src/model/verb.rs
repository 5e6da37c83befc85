use thiserror::Error;

use crate::model::config::CategoryName;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum VerbError {
    #[error("verb form cannot be blank: {0}")]
    BlankForm(&'static str),
}

/// One dictionary verb with the forms drills are built from.
///
/// The `past` form may carry several accepted variants separated by `/`
/// (e.g. `got/gotten`); [`VerbEntry::past_variants`] splits them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerbEntry {
    present: String,
    past: String,
    continuous: String,
    translation: String,
    category: CategoryName,
}

impl VerbEntry {
    /// Create a validated verb entry.
    ///
    /// # Errors
    ///
    /// Returns `VerbError::BlankForm` naming the first blank form.
    pub fn new(
        present: impl Into<String>,
        past: impl Into<String>,
        continuous: impl Into<String>,
        translation: impl Into<String>,
        category: CategoryName,
    ) -> Result<Self, VerbError> {
        let present = checked_form("present", present.into())?;
        let past = checked_form("past", past.into())?;
        let continuous = checked_form("continuous", continuous.into())?;
        let translation = checked_form("translation", translation.into())?;
        Ok(Self {
            present,
            past,
            continuous,
            translation,
            category,
        })
    }

    #[must_use]
    pub fn present(&self) -> &str {
        &self.present
    }

    #[must_use]
    pub fn past(&self) -> &str {
        &self.past
    }

    /// Accepted past-form variants, in dictionary order. Never empty.
    #[must_use]
    pub fn past_variants(&self) -> Vec<String> {
        let variants: Vec<String> = self
            .past
            .split('/')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(ToString::to_string)
            .collect();
        if variants.is_empty() {
            return vec![self.past.clone()];
        }
        variants
    }

    #[must_use]
    pub fn continuous(&self) -> &str {
        &self.continuous
    }

    #[must_use]
    pub fn translation(&self) -> &str {
        &self.translation
    }

    #[must_use]
    pub fn category(&self) -> &CategoryName {
        &self.category
    }
}

fn checked_form(name: &'static str, value: String) -> Result<String, VerbError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(VerbError::BlankForm(name));
    }
    Ok(trimmed.to_string())
}
