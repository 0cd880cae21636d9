//! Form domain layer
//!
//! Validation rules are plain functions over borrowed records so they can
//! be exercised without any UI. The form structs own their state and
//! expose explicit mutation entry points.

mod attachment;
mod category_form;
mod field;
mod form_state;
mod list_form;
mod submission;
mod violation;

pub use attachment::{AttachmentLoader, FsAttachmentLoader};
pub use category_form::{Category, CategoryField, CategoryFocus, CategoryForm};
pub use field::FormField;
pub use form_state::{Form, FormError};
pub use list_form::{ListFocus, ListForm};
pub use submission::{CompositeSink, JsonlFileSink, Submission, SubmissionSink, TracingSink};
pub use violation::{EntryField, FieldPath};

#[cfg(test)]
pub use attachment::{Attachment, AttachmentError, MockAttachmentLoader};
#[cfg(test)]
pub use submission::MockSubmissionSink;
