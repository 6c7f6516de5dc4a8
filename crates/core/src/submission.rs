//! Client-side checks run before a draft is submitted, and the form-level
//! submit state.

use crate::draft::ProductDraft;
use crate::error::CoreError;
use crate::payload::SubmitMode;

/// `Editing → Submitting → Editing` (error shown) or done (navigated away).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitState {
    #[default]
    Editing,
    Submitting,
}

/// Which preconditions apply to a submission.
///
/// Creating a product always requires a category. Updating historically did
/// not, so that rule is a flag rather than being unified silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitPolicy {
    pub require_category: bool,
}

impl SubmitPolicy {
    pub fn for_mode(mode: SubmitMode, edit_requires_category: bool) -> Self {
        match mode {
            SubmitMode::Create => Self {
                require_category: true,
            },
            SubmitMode::Update => Self {
                require_category: edit_requires_category,
            },
        }
    }

    pub fn check(&self, draft: &ProductDraft) -> Result<(), CoreError> {
        if draft.name.trim().is_empty() {
            return Err(CoreError::Validation("product name is required".to_string()));
        }
        if self.require_category && draft.categories.is_empty() {
            return Err(CoreError::Validation(
                "select at least one category".to_string(),
            ));
        }
        Ok(())
    }
}
