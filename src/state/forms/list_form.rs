//! List form: a repeatable group of tin + file entries

use super::attachment::Attachment;
use super::field::FormField;
use super::form_state::{Form, FormError, ValidationMode};
use super::submission::{ListItemSubmission, ListSubmission};
use super::violation::{EntryField, FieldPath, Violations};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

pub const TIN_REQUIRED: &str = "Tin/Bin is required";
pub const FILE_REQUIRED: &str = "File is required";

/// Stable identity of a list entry, assigned when the entry is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ListFormError {
    #[error("Entry {index} does not exist (list has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("At least one entry is required")]
    LastEntry,
    #[error("Unknown entry {0}")]
    UnknownEntry(EntryId),
}

/// Values of one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub tin: FormField,
    pub file: FormField,
}

impl ListEntry {
    pub fn new() -> Self {
        Self {
            tin: FormField::text("Tin/Bin"),
            file: FormField::file("File"),
        }
    }

    pub fn field(&self, field: EntryField) -> &FormField {
        match field {
            EntryField::Tin => &self.tin,
            EntryField::File => &self.file,
        }
    }

    fn field_mut(&mut self, field: EntryField) -> &mut FormField {
        match field {
            EntryField::Tin => &mut self.tin,
            EntryField::File => &mut self.file,
        }
    }

    pub fn record(&self) -> EntryRecord<'_> {
        EntryRecord {
            tin: self.tin.as_text(),
            file: self.file.attachment(),
        }
    }
}

impl Default for ListEntry {
    fn default() -> Self {
        Self::new()
    }
}

/// Candidate entry handed to the validation rule
#[derive(Debug, Clone, Copy, Default)]
pub struct EntryRecord<'a> {
    pub tin: &'a str,
    pub file: Option<&'a Attachment>,
}

/// Validate every entry; paths use each entry's current position.
pub fn validate_entries<'a, I>(entries: I) -> Violations
where
    I: IntoIterator<Item = (EntryId, EntryRecord<'a>)>,
{
    let mut violations = Violations::new();

    for (index, (id, entry)) in entries.into_iter().enumerate() {
        if entry.tin.is_empty() {
            violations.push(
                FieldPath::Item {
                    index,
                    id,
                    field: EntryField::Tin,
                },
                TIN_REQUIRED,
            );
        }
        if entry.file.map_or(true, |f| f.is_empty()) {
            violations.push(
                FieldPath::Item {
                    index,
                    id,
                    field: EntryField::File,
                },
                FILE_REQUIRED,
            );
        }
    }

    violations
}

/// What currently has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFocus {
    Entry { index: usize, field: EntryField },
    Submit,
}

/// List form state: entries kept in insertion order, addressed by id
#[derive(Debug, Clone)]
pub struct ListForm {
    entries: Vec<(EntryId, ListEntry)>,
    pub active_field_index: usize,
    mode: ValidationMode,
    violations: Violations,
}

impl ListForm {
    pub fn new() -> Self {
        Self {
            entries: vec![(EntryId::new(), ListEntry::new())],
            active_field_index: 0,
            mode: ValidationMode::default(),
            violations: Violations::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in display order
    pub fn entries(&self) -> impl Iterator<Item = (EntryId, &ListEntry)> {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }

    pub fn entry(&self, id: EntryId) -> Option<&ListEntry> {
        self.entries
            .iter()
            .find(|(eid, _)| *eid == id)
            .map(|(_, entry)| entry)
    }

    pub fn entry_at(&self, index: usize) -> Option<(EntryId, &ListEntry)> {
        self.entries.get(index).map(|(id, entry)| (*id, entry))
    }

    /// Current position of an entry
    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|(eid, _)| *eid == id)
    }

    fn entry_mut(&mut self, id: EntryId) -> Result<&mut ListEntry, ListFormError> {
        self.entries
            .iter_mut()
            .find(|(eid, _)| *eid == id)
            .map(|(_, entry)| entry)
            .ok_or(ListFormError::UnknownEntry(id))
    }

    /// Add a blank entry at the end and focus it
    pub fn append(&mut self) -> EntryId {
        let id = EntryId::new();
        self.entries.push((id, ListEntry::new()));
        self.active_field_index = (self.entries.len() - 1) * 2;
        tracing::debug!(%id, len = self.entries.len(), "Entry appended");
        self.revalidate();
        id
    }

    /// Remove the entry at `index`; later entries move up one position
    pub fn remove(&mut self, index: usize) -> Result<ListEntry, ListFormError> {
        let len = self.entries.len();
        if index >= len {
            tracing::warn!(index, len, "Rejected removal of missing entry");
            return Err(ListFormError::IndexOutOfRange { index, len });
        }
        if len == 1 {
            tracing::warn!("Rejected removal of the last entry");
            return Err(ListFormError::LastEntry);
        }

        let focus = self.focus();
        let (id, entry) = self.entries.remove(index);
        let new_len = self.entries.len();

        self.active_field_index = match focus {
            ListFocus::Submit => new_len * 2,
            ListFocus::Entry { index: i, field } => {
                let i = if i > index { i - 1 } else { i.min(new_len - 1) };
                i * 2 + column(field)
            }
        };

        tracing::debug!(%id, index, len = new_len, "Entry removed");
        self.revalidate();
        Ok(entry)
    }

    /// Remove an entry by id
    pub fn remove_entry(&mut self, id: EntryId) -> Result<ListEntry, ListFormError> {
        let index = self.position(id).ok_or(ListFormError::UnknownEntry(id))?;
        self.remove(index)
    }

    /// Replace a field's typed value
    pub fn set_field(
        &mut self,
        id: EntryId,
        field: EntryField,
        value: impl Into<String>,
    ) -> Result<(), ListFormError> {
        self.entry_mut(id)?.field_mut(field).set_text(value.into());
        self.revalidate();
        Ok(())
    }

    pub fn set_attachment(
        &mut self,
        id: EntryId,
        attachment: Attachment,
    ) -> Result<(), ListFormError> {
        self.entry_mut(id)?.file.set_attachment(attachment);
        self.revalidate();
        Ok(())
    }

    pub fn focus(&self) -> ListFocus {
        let index = self.active_field_index / 2;
        if index >= self.entries.len() {
            return ListFocus::Submit;
        }
        let field = if self.active_field_index % 2 == 0 {
            EntryField::Tin
        } else {
            EntryField::File
        };
        ListFocus::Entry { index, field }
    }

    /// Id of the entry holding focus
    pub fn focused_entry(&self) -> Option<EntryId> {
        match self.focus() {
            ListFocus::Entry { index, .. } => self.entries.get(index).map(|(id, _)| *id),
            ListFocus::Submit => None,
        }
    }

    /// Type into the focused field
    pub fn input_char(&mut self, c: char) {
        if let ListFocus::Entry { index, field } = self.focus() {
            if let Some((_, entry)) = self.entries.get_mut(index) {
                entry.field_mut(field).push_char(c);
                self.revalidate();
            }
        }
    }

    pub fn backspace(&mut self) {
        if let ListFocus::Entry { index, field } = self.focus() {
            if let Some((_, entry)) = self.entries.get_mut(index) {
                entry.field_mut(field).pop_char();
                self.revalidate();
            }
        }
    }

    /// Run the validation rule against the current entries
    pub fn validate(&self) -> Violations {
        validate_entries(self.entries().map(|(id, entry)| (id, entry.record())))
    }

    fn revalidate(&mut self) {
        if self.mode.revalidates() {
            self.violations = self.validate();
        }
    }

    /// Violations currently displayed
    #[cfg(test)]
    pub fn violations(&self) -> &Violations {
        &self.violations
    }

    pub fn entry_message(&self, id: EntryId, field: EntryField) -> Option<&'static str> {
        self.violations.entry_message(id, field)
    }

    /// Validate and build the payload
    pub fn submit(&mut self) -> Result<ListSubmission, FormError> {
        self.mode = ValidationMode::OnChange;
        self.violations = self.validate();

        if !self.violations.is_empty() {
            tracing::debug!(violations = %self.violations, "List form rejected");
            return Err(FormError::Validation(self.violations.clone()));
        }

        let items = self
            .entries()
            .filter_map(|(_, entry)| {
                entry.file.attachment().map(|file| ListItemSubmission {
                    tin: entry.tin.as_text().to_string(),
                    file_name: file.name.clone(),
                    size: file.size,
                })
            })
            .collect();

        Ok(ListSubmission { items })
    }

    /// Back to a single blank, unvalidated entry
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

fn column(field: EntryField) -> usize {
    match field {
        EntryField::Tin => 0,
        EntryField::File => 1,
    }
}

impl Default for ListForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for ListForm {
    fn field_count(&self) -> usize {
        self.entries.len() * 2 + 1 // two fields per entry, then submit
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(self.field_count() - 1);
    }
}
