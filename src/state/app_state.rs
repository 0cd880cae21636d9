//! Application state definitions

use super::forms::{CategoryForm, ListForm, Submission};
use std::collections::VecDeque;

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    CategoryForm,
    ListForm,
}

impl View {
    pub const ALL: [View; 2] = [View::CategoryForm, View::ListForm];

    pub fn label(&self) -> &'static str {
        match self {
            Self::CategoryForm => "Category",
            Self::ListForm => "List",
        }
    }

    /// Parse the `start_view` config value
    pub fn from_config(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "category" => Some(Self::CategoryForm),
            "list" => Some(Self::ListForm),
            _ => None,
        }
    }

    /// Position in the sidebar
    pub fn sidebar_index(&self) -> usize {
        match self {
            Self::CategoryForm => 0,
            Self::ListForm => 1,
        }
    }
}

/// Main application state
#[derive(Debug, Default)]
pub struct AppState {
    // Navigation
    pub current_view: View,

    // Forms (each owned exclusively, nothing shared between them)
    pub category_form: CategoryForm,
    pub list_form: ListForm,

    // Feedback
    pub status_message: Option<String>,
    pub last_submission: Option<Submission>,
    errors: VecDeque<String>,
}

impl AppState {
    pub fn new(start_view: View) -> Self {
        Self {
            current_view: start_view,
            ..Default::default()
        }
    }

    /// Queue an error for the modal dialog
    pub fn push_error(&mut self, message: String) {
        tracing::warn!(%message, "Error surfaced to user");
        self.errors.push_back(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Error currently shown in the dialog
    pub fn current_error(&self) -> Option<&str> {
        self.errors.front().map(String::as_str)
    }

    /// Dismiss the error currently shown
    pub fn dismiss_error(&mut self) {
        self.errors.pop_front();
    }

    pub fn switch_view(&mut self, view: View) {
        if self.current_view != view {
            tracing::debug!(from = ?self.current_view, to = ?view, "Switching view");
            self.current_view = view;
        }
    }
}
