//! Field-scoped validation failures

use super::list_form::EntryId;
use std::fmt;

/// Field within a list entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryField {
    Tin,
    File,
}

impl EntryField {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tin => "tin",
            Self::File => "file",
        }
    }
}

/// Path to the field a violation is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Category,
    Tin,
    File,
    Date,
    /// A field of the list entry currently at `index`
    Item {
        index: usize,
        id: EntryId,
        field: EntryField,
    },
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category => write!(f, "category"),
            Self::Tin => write!(f, "tin"),
            Self::File => write!(f, "file"),
            Self::Date => write!(f, "date"),
            Self::Item { index, field, .. } => write!(f, "items[{}].{}", index, field.name()),
        }
    }
}

/// A single validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: FieldPath,
    pub message: &'static str,
}

impl Violation {
    pub fn new(path: FieldPath, message: &'static str) -> Self {
        Self { path, message }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Ordered set of violations produced by one validation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: FieldPath, message: &'static str) {
        self.0.push(Violation::new(path, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// Message for a top-level field, if it has a violation
    pub fn message_for(&self, path: FieldPath) -> Option<&'static str> {
        self.0.iter().find(|v| v.path == path).map(|v| v.message)
    }

    /// Message for a field of a list entry, looked up by the entry's id
    pub fn entry_message(&self, id: EntryId, field: EntryField) -> Option<&'static str> {
        self.0
            .iter()
            .find(|v| {
                matches!(v.path, FieldPath::Item { id: vid, field: vfield, .. }
                    if vid == id && vfield == field)
            })
            .map(|v| v.message)
    }

    /// Whether the entry with `id` has any violation
    #[cfg(test)]
    pub fn entry_has_violation(&self, id: EntryId) -> bool {
        self.0
            .iter()
            .any(|v| matches!(v.path, FieldPath::Item { id: vid, .. } if vid == id))
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|v| v.to_string()).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level_paths_display() {
        assert_eq!(FieldPath::Category.to_string(), "category");
        assert_eq!(FieldPath::Tin.to_string(), "tin");
        assert_eq!(FieldPath::File.to_string(), "file");
        assert_eq!(FieldPath::Date.to_string(), "date");
    }

    #[test]
    fn test_item_path_display() {
        let path = FieldPath::Item {
            index: 2,
            id: EntryId::new(),
            field: EntryField::File,
        };
        assert_eq!(path.to_string(), "items[2].file");
    }

    #[test]
    fn test_message_for() {
        let mut violations = Violations::new();
        violations.push(FieldPath::Tin, "Tin/Bin is required");
        assert_eq!(
            violations.message_for(FieldPath::Tin),
            Some("Tin/Bin is required")
        );
        assert_eq!(violations.message_for(FieldPath::Date), None);
    }

    #[test]
    fn test_entry_lookup_is_by_id() {
        let first = EntryId::new();
        let second = EntryId::new();
        let mut violations = Violations::new();
        violations.push(
            FieldPath::Item {
                index: 1,
                id: second,
                field: EntryField::Tin,
            },
            "Tin/Bin is required",
        );

        assert!(violations.entry_has_violation(second));
        assert!(!violations.entry_has_violation(first));
        assert_eq!(
            violations.entry_message(second, EntryField::Tin),
            Some("Tin/Bin is required")
        );
        assert_eq!(violations.entry_message(second, EntryField::File), None);
    }

    #[test]
    fn test_display_joins_violations() {
        let mut violations = Violations::new();
        violations.push(FieldPath::Tin, "Tin/Bin is required");
        violations.push(FieldPath::Date, "Date is required");
        assert_eq!(
            violations.to_string(),
            "tin: Tin/Bin is required; date: Date is required"
        );
    }
}
