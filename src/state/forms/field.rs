//! Form field value objects

use super::attachment::Attachment;
use chrono::NaiveDate;

/// Accepted date layout
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Path typed into a file field plus the attachment loaded from it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInput {
    pub path: String,
    pub attachment: Option<Attachment>,
}

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    /// Calendar date typed as `YYYY-MM-DD`
    Date(String),
    File(FileInput),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

/// Represents a single form field with its configuration and value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub label: String,
    pub value: FieldValue,
}

impl FormField {
    /// Create a new text field
    pub fn text(label: &str) -> Self {
        Self {
            label: label.to_string(),
            value: FieldValue::Text(String::new()),
        }
    }

    /// Create a new date field
    pub fn date(label: &str) -> Self {
        Self {
            label: label.to_string(),
            value: FieldValue::Date(String::new()),
        }
    }

    /// Create a new file field
    pub fn file(label: &str) -> Self {
        Self {
            label: label.to_string(),
            value: FieldValue::File(FileInput::default()),
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self.value, FieldValue::File(_))
    }

    /// Get the typed text (file fields return the typed path)
    pub fn as_text(&self) -> &str {
        match &self.value {
            FieldValue::Text(s) | FieldValue::Date(s) => s,
            FieldValue::File(input) => &input.path,
        }
    }

    /// Parse a date field. Partial or impossible dates give `None`.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match &self.value {
            FieldValue::Date(s) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok(),
            _ => None,
        }
    }

    /// Get the loaded attachment (always `None` for non-file fields)
    pub fn attachment(&self) -> Option<&Attachment> {
        match &self.value {
            FieldValue::File(input) => input.attachment.as_ref(),
            _ => None,
        }
    }

    /// Replace the typed value. Editing a file path drops the loaded attachment.
    pub fn set_text(&mut self, value: String) {
        match &mut self.value {
            FieldValue::Text(s) | FieldValue::Date(s) => *s = value,
            FieldValue::File(input) => {
                input.path = value;
                input.attachment = None;
            }
        }
    }

    /// Attach a loaded file. No-op for non-file fields.
    pub fn set_attachment(&mut self, attachment: Attachment) {
        if let FieldValue::File(input) = &mut self.value {
            input.attachment = Some(attachment);
        }
    }

    /// Push a character to the field value
    pub fn push_char(&mut self, c: char) {
        match &mut self.value {
            FieldValue::Text(s) => s.push(c),
            FieldValue::Date(s) => {
                // Dates only take digits and separators
                if c.is_ascii_digit() || c == '-' {
                    s.push(c);
                }
            }
            FieldValue::File(input) => {
                input.path.push(c);
                input.attachment = None;
            }
        }
    }

    /// Remove the last character from the field value
    pub fn pop_char(&mut self) {
        match &mut self.value {
            FieldValue::Text(s) | FieldValue::Date(s) => {
                s.pop();
            }
            FieldValue::File(input) => {
                input.path.pop();
                input.attachment = None;
            }
        }
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match &self.value {
            FieldValue::Text(s) | FieldValue::Date(s) => s.clone(),
            FieldValue::File(input) => match &input.attachment {
                Some(a) => format!("{} ({})", a.name, a.display_size()),
                None => input.path.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_field_push_and_pop() {
        let mut field = FormField::text("Tin/Bin");
        field.push_char('4');
        field.push_char('2');
        assert_eq!(field.as_text(), "42");
        field.pop_char();
        assert_eq!(field.as_text(), "4");
    }

    #[test]
    fn test_date_field_filters_input() {
        let mut field = FormField::date("Date");
        for c in "2024-0a1-01".chars() {
            field.push_char(c);
        }
        assert_eq!(field.as_text(), "2024-01-01");
    }

    #[test]
    fn test_file_field_edit_drops_attachment() {
        let mut field = FormField::file("Filepath");
        field.set_text("scan.pdf".to_string());
        field.set_attachment(Attachment::new("scan.pdf", vec![1]));
        assert!(field.attachment().is_some());

        field.push_char('x');
        assert!(field.attachment().is_none());
        assert_eq!(field.as_text(), "scan.pdfx");
    }

    #[test]
    fn test_set_attachment_ignored_on_text_field() {
        let mut field = FormField::text("Tin/Bin");
        field.set_attachment(Attachment::new("scan.pdf", vec![1]));
        assert!(field.attachment().is_none());
    }

    #[test]
    fn test_display_value_shows_attachment() {
        let mut field = FormField::file("Filepath");
        field.set_text("/tmp/scan.pdf".to_string());
        assert_eq!(field.display_value(), "/tmp/scan.pdf");
        field.set_attachment(Attachment::new("scan.pdf", vec![0; 12]));
        assert_eq!(field.display_value(), "scan.pdf (12 B)");
    }

    #[test]
    fn test_as_date_requires_full_date() {
        let mut field = FormField::date("Date");
        for c in "2024-02-".chars() {
            field.push_char(c);
        }
        assert_eq!(field.as_date(), None);

        field.push_char('9');
        assert_eq!(field.as_date(), NaiveDate::from_ymd_opt(2024, 2, 9));
    }

    #[test]
    fn test_as_date_rejects_impossible_day() {
        let mut field = FormField::date("Date");
        field.set_text("2023-02-30".to_string());
        assert_eq!(field.as_date(), None);
    }

    #[test]
    fn test_as_date_on_text_field() {
        let mut field = FormField::text("Tin/Bin");
        field.set_text("2024-01-01".to_string());
        assert_eq!(field.as_date(), None);
    }
}
