//! Shared form behaviour: focus cycling, validation policy and errors

use super::list_form::ListFormError;
use super::violation::Violations;
use thiserror::Error;

/// Trait for common form operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
}

/// When violations are computed and shown
///
/// Nothing is reported until the first submit attempt. From then on every
/// change re-runs validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    #[default]
    BeforeSubmit,
    OnChange,
}

impl ValidationMode {
    pub fn revalidates(&self) -> bool {
        matches!(self, Self::OnChange)
    }
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Form has {count} invalid field(s): {0}", count = .0.len())]
    Validation(Violations),
    #[error(transparent)]
    List(#[from] ListFormError),
}

impl FormError {
    pub fn violations(&self) -> Option<&Violations> {
        match self {
            FormError::Validation(v) => Some(v),
            FormError::List(_) => None,
        }
    }
}
