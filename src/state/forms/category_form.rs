//! Category form: a discriminator with conditionally required details

use super::attachment::Attachment;
use super::field::{FormField, DATE_FORMAT};
use super::form_state::{Form, FormError, ValidationMode};
use super::submission::CategorySubmission;
use super::violation::{FieldPath, Violations};
use serde::{Deserialize, Serialize};

pub const CATEGORY_REQUIRED: &str = "Please select a category";
pub const TIN_REQUIRED: &str = "Tin/Bin is required";
pub const FILE_REQUIRED: &str = "File is required";
pub const DATE_REQUIRED: &str = "Date is required";

/// Closed set of categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Regular,
    Flagship,
    Diamond,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Regular, Category::Flagship, Category::Diamond];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Regular => "Regular",
            Self::Flagship => "Flagship",
            Self::Diamond => "Diamond",
        }
    }

    /// Whether this category requires (and reveals) tin, file and date
    pub fn requires_details(&self) -> bool {
        matches!(self, Self::Flagship | Self::Diamond)
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Regular => Self::Flagship,
            Self::Flagship => Self::Diamond,
            Self::Diamond => Self::Regular,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Self::Regular => Self::Diamond,
            Self::Flagship => Self::Regular,
            Self::Diamond => Self::Flagship,
        }
    }

    /// Quick-select key for the radio group
    pub fn from_key(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'r' => Some(Self::Regular),
            'f' => Some(Self::Flagship),
            'd' => Some(Self::Diamond),
            _ => None,
        }
    }
}

/// Dependent fields of the category form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryField {
    Tin,
    File,
    Date,
}

impl CategoryField {
    pub const ALL: [CategoryField; 3] = [CategoryField::Tin, CategoryField::File, CategoryField::Date];

    pub fn path(&self) -> FieldPath {
        match self {
            Self::Tin => FieldPath::Tin,
            Self::File => FieldPath::File,
            Self::Date => FieldPath::Date,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Tin => "Tin/Bin",
            Self::File => "Filepath",
            Self::Date => "Date",
        }
    }
}

/// Candidate record handed to the validation rule
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryRecord<'a> {
    pub category: Option<Category>,
    pub tin: Option<&'a str>,
    pub file: Option<&'a Attachment>,
    pub date: Option<&'a str>,
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Validate a category record.
///
/// Regular accepts anything; Flagship and Diamond require a non-blank tin,
/// an attachment and a non-blank date.
pub fn validate_category(record: &CategoryRecord<'_>) -> Violations {
    let mut violations = Violations::new();

    let Some(category) = record.category else {
        violations.push(FieldPath::Category, CATEGORY_REQUIRED);
        return violations;
    };

    if !category.requires_details() {
        return violations;
    }

    if is_blank(record.tin) {
        violations.push(FieldPath::Tin, TIN_REQUIRED);
    }
    if record.file.is_none() {
        violations.push(FieldPath::File, FILE_REQUIRED);
    }
    if is_blank(record.date) {
        violations.push(FieldPath::Date, DATE_REQUIRED);
    }

    violations
}

/// What currently has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFocus {
    Category,
    Field(CategoryField),
    Submit,
}

/// Category form state
#[derive(Debug, Clone)]
pub struct CategoryForm {
    pub category: Option<Category>,
    pub tin: FormField,
    pub file: FormField,
    pub date: FormField,
    pub active_field_index: usize,
    mode: ValidationMode,
    violations: Violations,
}

impl CategoryForm {
    pub fn new() -> Self {
        Self {
            category: None,
            tin: FormField::text(CategoryField::Tin.label()),
            file: FormField::file(CategoryField::File.label()),
            date: FormField::date(CategoryField::Date.label()),
            active_field_index: 0,
            mode: ValidationMode::default(),
            violations: Violations::new(),
        }
    }

    /// Whether tin, file and date are shown
    pub fn dependent_fields_visible(&self) -> bool {
        self.category.is_some_and(|c| c.requires_details())
    }

    /// Focusable items in order
    pub fn focus_order(&self) -> Vec<CategoryFocus> {
        let mut order = vec![CategoryFocus::Category];
        if self.dependent_fields_visible() {
            order.extend(CategoryField::ALL.iter().map(|f| CategoryFocus::Field(*f)));
        }
        order.push(CategoryFocus::Submit);
        order
    }

    pub fn focus(&self) -> CategoryFocus {
        self.focus_order()
            .get(self.active_field_index)
            .copied()
            .unwrap_or(CategoryFocus::Submit)
    }

    pub fn field(&self, field: CategoryField) -> &FormField {
        match field {
            CategoryField::Tin => &self.tin,
            CategoryField::File => &self.file,
            CategoryField::Date => &self.date,
        }
    }

    fn field_mut(&mut self, field: CategoryField) -> &mut FormField {
        match field {
            CategoryField::Tin => &mut self.tin,
            CategoryField::File => &mut self.file,
            CategoryField::Date => &mut self.date,
        }
    }

    /// Label shown above a dependent field, prefixed with the category
    pub fn field_label(&self, field: CategoryField) -> String {
        match self.category {
            Some(c) => format!("{} {}", c.label(), self.field(field).label),
            None => self.field(field).label.clone(),
        }
    }

    /// Set the discriminator. Hiding the dependent fields pulls focus back
    /// to the category selector.
    pub fn set_category(&mut self, category: Option<Category>) {
        let focus = self.focus();
        self.category = category;
        self.active_field_index = self
            .focus_order()
            .iter()
            .position(|f| *f == focus)
            .unwrap_or(0);
        tracing::debug!(?category, "Category changed");
        self.revalidate();
    }

    /// Step the radio selection forward or backward
    pub fn cycle_category(&mut self, forward: bool) {
        let next = match self.category {
            None if forward => Category::Regular,
            None => Category::Diamond,
            Some(c) if forward => c.next(),
            Some(c) => c.prev(),
        };
        self.set_category(Some(next));
    }

    /// Replace a dependent field's typed value
    pub fn set_field(&mut self, field: CategoryField, value: impl Into<String>) {
        self.field_mut(field).set_text(value.into());
        self.revalidate();
    }

    pub fn set_attachment(&mut self, attachment: Attachment) {
        self.file.set_attachment(attachment);
        self.revalidate();
    }

    /// Type into the focused dependent field
    pub fn input_char(&mut self, c: char) {
        if let CategoryFocus::Field(field) = self.focus() {
            self.field_mut(field).push_char(c);
            self.revalidate();
        }
    }

    pub fn backspace(&mut self) {
        if let CategoryFocus::Field(field) = self.focus() {
            self.field_mut(field).pop_char();
            self.revalidate();
        }
    }

    pub fn record(&self) -> CategoryRecord<'_> {
        CategoryRecord {
            category: self.category,
            tin: Some(self.tin.as_text()),
            file: self.file.attachment(),
            // Only a parseable date counts as filled in
            date: self
                .date
                .as_date()
                .map(|_| self.date.as_text().trim()),
        }
    }

    /// Run the validation rule against the current values
    pub fn validate(&self) -> Violations {
        validate_category(&self.record())
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

    pub fn message_for(&self, path: FieldPath) -> Option<&'static str> {
        self.violations.message_for(path)
    }

    /// Validate and build the payload. Details are left out for Regular.
    pub fn submit(&mut self) -> Result<CategorySubmission, FormError> {
        self.mode = ValidationMode::OnChange;
        self.violations = self.validate();

        if !self.violations.is_empty() {
            tracing::debug!(violations = %self.violations, "Category form rejected");
            return Err(FormError::Validation(self.violations.clone()));
        }

        let Some(category) = self.category else {
            // A missing category is always a violation
            return Err(FormError::Validation(self.violations.clone()));
        };

        if !category.requires_details() {
            return Ok(CategorySubmission {
                category,
                tin: None,
                file_name: None,
                date: None,
            });
        }

        Ok(CategorySubmission {
            category,
            tin: Some(self.tin.as_text().to_string()),
            file_name: self.file.attachment().map(|a| a.name.clone()),
            date: self.date.as_date().map(|d| d.format(DATE_FORMAT).to_string()),
        })
    }

    /// Back to a blank, unvalidated form
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for CategoryForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for CategoryForm {
    fn field_count(&self) -> usize {
        self.focus_order().len()
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(self.field_count() - 1);
    }
}
