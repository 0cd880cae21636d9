//! Application state and core logic

use crate::config::TuiConfig;
use crate::state::{
    AppState, AttachmentLoader, CategoryFocus, CompositeSink, Form, FormError, FsAttachmentLoader,
    JsonlFileSink, ListFocus, Submission, SubmissionSink, TracingSink, View,
};
use crate::ui::layout::sidebar_view_at;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// User configuration
    pub config: TuiConfig,
    /// Produces attachments from typed file paths
    loader: Box<dyn AttachmentLoader>,
    /// Receives validated submissions
    sink: Box<dyn SubmissionSink>,
    /// Whether the app should quit
    quit: bool,
    /// Terminal size for mouse hit testing (height, width)
    pub terminal_size: Option<(u16, u16)>,
}

impl App {
    /// Create a new App with the filesystem loader and configured sinks
    pub fn new(config: TuiConfig) -> Result<Self> {
        let mut sink = CompositeSink::new().with(TracingSink);
        if let Some(path) = config.submission_log.as_deref() {
            tracing::info!(path, "Logging submissions to file");
            sink = sink.with(JsonlFileSink::new(path));
        }
        Ok(Self::with_services(
            config,
            Box::new(FsAttachmentLoader),
            Box::new(sink),
        ))
    }

    /// Create an App with explicit loader and sink
    pub fn with_services(
        config: TuiConfig,
        loader: Box<dyn AttachmentLoader>,
        sink: Box<dyn SubmissionSink>,
    ) -> Self {
        let start_view = config
            .start_view
            .as_deref()
            .and_then(View::from_config)
            .unwrap_or_default();

        Self {
            state: AppState::new(start_view),
            config,
            loader,
            sink,
            quit: false,
            terminal_size: None,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        // Clear any status messages on key press
        self.state.status_message = None;

        match key.code {
            KeyCode::F(1) => {
                self.state.switch_view(View::CategoryForm);
                return Ok(());
            }
            KeyCode::F(2) => {
                self.state.switch_view(View::ListForm);
                return Ok(());
            }
            KeyCode::Esc => {
                self.quit = true;
                return Ok(());
            }
            KeyCode::Char('y') if key.modifiers.contains(crate::platform::COPY_MODIFIER) => {
                self.copy_last_submission();
                return Ok(());
            }
            _ => {}
        }

        match self.state.current_view {
            View::CategoryForm => self.handle_category_form_key(key).await?,
            View::ListForm => self.handle_list_form_key(key).await?,
        }

        Ok(())
    }

    /// Handle keys in the category form
    async fn handle_category_form_key(&mut self, key: KeyEvent) -> Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let focus = self.state.category_form.focus();
        let form = &mut self.state.category_form;

        match key.code {
            KeyCode::Tab => form.next_field(),
            KeyCode::BackTab => form.prev_field(),
            KeyCode::Char('s') if ctrl => self.submit_category_form(),
            // Radio group
            KeyCode::Left | KeyCode::Up if focus == CategoryFocus::Category => {
                form.cycle_category(false)
            }
            KeyCode::Right | KeyCode::Down | KeyCode::Char(' ')
                if focus == CategoryFocus::Category =>
            {
                form.cycle_category(true)
            }
            KeyCode::Char('u') if ctrl => {
                if let CategoryFocus::Field(field) = focus {
                    form.set_field(field, String::new());
                }
            }
            KeyCode::Char(c) if focus == CategoryFocus::Category && !ctrl => {
                if let Some(category) = crate::state::Category::from_key(c) {
                    form.set_category(Some(category));
                }
            }
            // Enter attaches on the file field, submits on the button
            KeyCode::Enter => match focus {
                CategoryFocus::Field(crate::state::CategoryField::File) => {
                    self.attach_category_file().await
                }
                CategoryFocus::Submit => self.submit_category_form(),
                _ => form.next_field(),
            },
            KeyCode::Char(c) if !ctrl => form.input_char(c),
            KeyCode::Backspace => form.backspace(),
            _ => {}
        }
        Ok(())
    }

    /// Handle keys in the list form
    async fn handle_list_form_key(&mut self, key: KeyEvent) -> Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let focus = self.state.list_form.focus();
        let form = &mut self.state.list_form;

        match key.code {
            KeyCode::Tab => form.next_field(),
            KeyCode::BackTab => form.prev_field(),
            KeyCode::Char('s') if ctrl => self.submit_list_form(),
            KeyCode::Char('a') if ctrl => {
                form.append();
                self.state.status_message = Some(format!("{} entries", form.len()));
            }
            KeyCode::Char('u') if ctrl => {
                if let (Some(id), ListFocus::Entry { field, .. }) = (form.focused_entry(), focus) {
                    if let Err(e) = form.set_field(id, field, String::new()) {
                        self.push_error(e.to_string());
                    }
                }
            }
            KeyCode::Char('x') if ctrl => match form.focused_entry() {
                Some(id) => {
                    if let Err(e) = form.remove_entry(id) {
                        self.state.status_message = Some(e.to_string());
                    }
                }
                None => {
                    self.state.status_message = Some("Focus an entry to remove it".to_string());
                }
            },
            KeyCode::Enter => match focus {
                ListFocus::Entry {
                    field: crate::state::EntryField::File,
                    ..
                } => self.attach_list_file().await,
                ListFocus::Submit => self.submit_list_form(),
                ListFocus::Entry { .. } => form.next_field(),
            },
            KeyCode::Char(c) if !ctrl => form.input_char(c),
            KeyCode::Backspace => form.backspace(),
            _ => {}
        }
        Ok(())
    }

    /// Handle a mouse event: clicking a sidebar button switches views
    pub async fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<()> {
        if self.state.has_errors() {
            return Ok(());
        }
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            if let Some((height, width)) = self.terminal_size {
                let screen = Rect::new(0, 0, width, height);
                if let Some(view) = sidebar_view_at(screen, mouse.column, mouse.row) {
                    self.state.switch_view(view);
                }
            }
        }
        Ok(())
    }

    /// Load the path typed into the category form's file field
    async fn attach_category_file(&mut self) {
        let path = self.state.category_form.file.as_text().to_string();
        match self.loader.load(&path).await {
            Ok(attachment) => {
                self.state.status_message = Some(format!("Attached {}", attachment.name));
                self.state.category_form.set_attachment(attachment);
            }
            Err(e) => self.push_error(e.to_string()),
        }
    }

    /// Load the path typed into the focused list entry's file field
    async fn attach_list_file(&mut self) {
        let Some(id) = self.state.list_form.focused_entry() else {
            return;
        };
        let Some(path) = self
            .state
            .list_form
            .entry(id)
            .map(|entry| entry.file.as_text().to_string())
        else {
            return;
        };

        match self.loader.load(&path).await {
            Ok(attachment) => {
                self.state.status_message = Some(format!("Attached {}", attachment.name));
                if let Err(e) = self.state.list_form.set_attachment(id, attachment) {
                    self.push_error(e.to_string());
                }
            }
            Err(e) => self.push_error(e.to_string()),
        }
    }

    fn submit_category_form(&mut self) {
        match self.state.category_form.submit() {
            Ok(payload) => {
                if self.deliver(payload.into()) && self.config.reset_after_submit() {
                    self.state.category_form.reset();
                }
            }
            Err(e) => self.report_rejection(&e),
        }
    }

    fn submit_list_form(&mut self) {
        match self.state.list_form.submit() {
            Ok(payload) => {
                if self.deliver(payload.into()) && self.config.reset_after_submit() {
                    self.state.list_form.reset();
                }
            }
            Err(e) => self.report_rejection(&e),
        }
    }

    /// Hand a submission to the sink. Returns whether it was accepted.
    fn deliver(&mut self, submission: Submission) -> bool {
        match self.sink.submit(&submission) {
            Ok(()) => {
                self.state.status_message = Some("Submitted".to_string());
                self.state.last_submission = Some(submission);
                true
            }
            Err(e) => {
                self.push_error(format!("Failed to submit: {e}"));
                false
            }
        }
    }

    fn report_rejection(&mut self, error: &FormError) {
        match error.violations() {
            Some(violations) => {
                self.state.status_message =
                    Some(format!("Fix {} field(s) before submitting", violations.len()));
            }
            None => self.push_error(error.to_string()),
        }
    }

    /// Copy the last accepted submission to the clipboard as JSON
    fn copy_last_submission(&mut self) {
        let Some(submission) = &self.state.last_submission else {
            self.state.status_message = Some("Nothing submitted yet".to_string());
            return;
        };

        let result = submission
            .to_json_pretty()
            .and_then(|json| self.copy_to_clipboard(&json));
        match result {
            Ok(()) => self.state.status_message = Some("Copied submission".to_string()),
            Err(e) => self.push_error(format!("Failed to copy: {e}")),
        }
    }

    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        use arboard::Clipboard;
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{
        Attachment, AttachmentError, Category, CategoryField, EntryField, FieldPath,
        MockAttachmentLoader, MockSubmissionSink,
    };
    use crossterm::event::KeyEventKind;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn press(app: &mut App, event: KeyEvent) {
        tokio_test::block_on(app.handle_key(event)).unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, key(KeyCode::Char(c)));
        }
    }

    /// Sink that records every submission it receives
    fn recording_sink() -> (MockSubmissionSink, Arc<Mutex<Vec<Submission>>>) {
        let received = Arc::new(Mutex::new(Vec::new()));
        let store = Arc::clone(&received);
        let mut sink = MockSubmissionSink::new();
        sink.expect_submit().returning(move |s| {
            store.lock().unwrap().push(s.clone());
            Ok(())
        });
        (sink, received)
    }

    /// Loader that returns a 3 byte attachment named after the path
    fn stub_loader() -> MockAttachmentLoader {
        let mut loader = MockAttachmentLoader::new();
        loader
            .expect_load()
            .returning(|path| Ok(Attachment::new(path, vec![1, 2, 3])));
        loader
    }

    fn app_with(loader: MockAttachmentLoader, sink: MockSubmissionSink) -> App {
        App::with_services(TuiConfig::default(), Box::new(loader), Box::new(sink))
    }

    mod navigation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_starts_on_category_form() {
            let app = app_with(MockAttachmentLoader::new(), MockSubmissionSink::new());
            assert_eq!(app.state.current_view, View::CategoryForm);
            assert!(!app.should_quit());
        }

        #[test]
        fn test_start_view_from_config() {
            let config = TuiConfig {
                start_view: Some("list".to_string()),
                ..Default::default()
            };
            let app = App::with_services(
                config,
                Box::new(MockAttachmentLoader::new()),
                Box::new(MockSubmissionSink::new()),
            );
            assert_eq!(app.state.current_view, View::ListForm);
        }

        #[test]
        fn test_function_keys_switch_views() {
            let mut app = app_with(MockAttachmentLoader::new(), MockSubmissionSink::new());
            press(&mut app, key(KeyCode::F(2)));
            assert_eq!(app.state.current_view, View::ListForm);
            press(&mut app, key(KeyCode::F(1)));
            assert_eq!(app.state.current_view, View::CategoryForm);
        }

        #[test]
        fn test_escape_quits() {
            let mut app = app_with(MockAttachmentLoader::new(), MockSubmissionSink::new());
            press(&mut app, key(KeyCode::Esc));
            assert!(app.should_quit());
        }

        #[test]
        fn test_error_dialog_swallows_keys_until_dismissed() {
            let mut app = app_with(MockAttachmentLoader::new(), MockSubmissionSink::new());
            app.push_error("boom");
            press(&mut app, key(KeyCode::F(2)));
            assert_eq!(app.state.current_view, View::CategoryForm);
            press(&mut app, key(KeyCode::Esc));
            assert!(!app.state.has_errors());
            assert!(!app.should_quit());
        }

        #[test]
        fn test_sidebar_click_switches_view() {
            let mut app = app_with(MockAttachmentLoader::new(), MockSubmissionSink::new());
            app.terminal_size = Some((24, 80));
            let (sidebar, _) = crate::ui::layout::create_layout(Rect::new(0, 0, 80, 24));
            let list_button = crate::ui::layout::sidebar_button_areas(sidebar)[1];

            let click = MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: list_button.x + 1,
                row: list_button.y + 1,
                modifiers: KeyModifiers::NONE,
            };
            tokio_test::block_on(app.handle_mouse(click)).unwrap();
            assert_eq!(app.state.current_view, View::ListForm);
        }
    }

    mod category_form {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_regular_submission_payload() {
            let (sink, received) = recording_sink();
            let mut app = app_with(MockAttachmentLoader::new(), sink);

            press(&mut app, key(KeyCode::Char('r')));
            press(&mut app, ctrl('s'));

            let received = received.lock().unwrap();
            assert_eq!(received.len(), 1);
            assert_eq!(received[0].to_json().unwrap(), r#"{"category":"Regular"}"#);
            assert_eq!(app.state.status_message.as_deref(), Some("Submitted"));
        }

        #[test]
        fn test_flagship_full_flow() {
            let (sink, received) = recording_sink();
            let mut app = app_with(stub_loader(), sink);

            press(&mut app, key(KeyCode::Char('f')));
            press(&mut app, key(KeyCode::Tab));
            type_text(&mut app, "123");
            press(&mut app, key(KeyCode::Tab));
            type_text(&mut app, "scan.pdf");
            press(&mut app, key(KeyCode::Enter));
            press(&mut app, key(KeyCode::Tab));
            type_text(&mut app, "2024-01-01");
            press(&mut app, key(KeyCode::Tab));
            press(&mut app, key(KeyCode::Enter));

            let received = received.lock().unwrap();
            assert_eq!(received.len(), 1);
            assert_eq!(
                received[0].to_json().unwrap(),
                r#"{"category":"Flagship","tin":"123","fileName":"scan.pdf","date":"2024-01-01"}"#
            );
        }

        #[test]
        fn test_missing_tin_blocks_submission() {
            let mut sink = MockSubmissionSink::new();
            sink.expect_submit().times(0);
            let mut app = app_with(MockAttachmentLoader::new(), sink);

            let form = &mut app.state.category_form;
            form.set_category(Some(Category::Flagship));
            form.set_field(CategoryField::Tin, "");
            form.set_attachment(Attachment::new("scan.pdf", vec![1]));
            form.set_field(CategoryField::Date, "2024-01-01");
            press(&mut app, ctrl('s'));

            let violations = app.state.category_form.violations();
            assert_eq!(violations.len(), 1);
            assert_eq!(
                violations.iter().next().map(|v| v.path),
                Some(FieldPath::Tin)
            );
            assert_eq!(
                app.state.status_message.as_deref(),
                Some("Fix 1 field(s) before submitting")
            );
        }

        #[test]
        fn test_attach_failure_shows_error() {
            let mut loader = MockAttachmentLoader::new();
            loader
                .expect_load()
                .returning(|_| Err(AttachmentError::EmptyPath));
            let mut app = app_with(loader, MockSubmissionSink::new());

            press(&mut app, key(KeyCode::Char('d')));
            app.state.category_form.set_active_field(2);
            press(&mut app, key(KeyCode::Enter));

            assert_eq!(app.state.current_error(), Some("No file path entered"));
            assert!(app.state.category_form.file.attachment().is_none());
        }

        #[test]
        fn test_arrow_keys_cycle_category() {
            let mut app = app_with(MockAttachmentLoader::new(), MockSubmissionSink::new());
            press(&mut app, key(KeyCode::Right));
            assert_eq!(app.state.category_form.category, Some(Category::Regular));
            press(&mut app, key(KeyCode::Right));
            assert_eq!(app.state.category_form.category, Some(Category::Flagship));
            press(&mut app, key(KeyCode::Left));
            assert_eq!(app.state.category_form.category, Some(Category::Regular));
        }

        #[test]
        fn test_ctrl_u_clears_focused_field() {
            let mut app = app_with(stub_loader(), MockSubmissionSink::new());
            press(&mut app, key(KeyCode::Char('f')));
            app.state.category_form.set_active_field(2);
            type_text(&mut app, "scan.pdf");
            press(&mut app, key(KeyCode::Enter));
            assert!(app.state.category_form.file.attachment().is_some());

            press(&mut app, ctrl('u'));
            assert_eq!(app.state.category_form.file.as_text(), "");
            assert!(app.state.category_form.file.attachment().is_none());
        }

        #[test]
        fn test_reset_after_submit_when_configured() {
            let (sink, _) = recording_sink();
            let config = TuiConfig {
                reset_after_submit: Some(true),
                ..Default::default()
            };
            let mut app = App::with_services(
                config,
                Box::new(MockAttachmentLoader::new()),
                Box::new(sink),
            );

            press(&mut app, key(KeyCode::Char('r')));
            press(&mut app, ctrl('s'));
            assert!(app.state.category_form.category.is_none());
            assert!(app.state.last_submission.is_some());
        }

        #[test]
        fn test_form_kept_after_submit_by_default() {
            let (sink, _) = recording_sink();
            let mut app = app_with(MockAttachmentLoader::new(), sink);
            press(&mut app, key(KeyCode::Char('r')));
            press(&mut app, ctrl('s'));
            assert_eq!(app.state.category_form.category, Some(Category::Regular));
        }

        #[test]
        fn test_sink_failure_shows_error() {
            let mut sink = MockSubmissionSink::new();
            sink.expect_submit()
                .returning(|_| Err(anyhow::anyhow!("disk full")));
            let mut app = app_with(MockAttachmentLoader::new(), sink);

            press(&mut app, key(KeyCode::Char('r')));
            press(&mut app, ctrl('s'));

            assert_eq!(
                app.state.current_error(),
                Some("Failed to submit: disk full")
            );
            assert!(app.state.last_submission.is_none());
        }
    }

    mod list_form {
        use super::*;
        use pretty_assertions::assert_eq;

        fn list_app(loader: MockAttachmentLoader, sink: MockSubmissionSink) -> App {
            let mut app = app_with(loader, sink);
            press(&mut app, key(KeyCode::F(2)));
            app
        }

        #[test]
        fn test_append_and_remove_shortcuts() {
            let mut app = list_app(MockAttachmentLoader::new(), MockSubmissionSink::new());
            press(&mut app, ctrl('a'));
            press(&mut app, ctrl('a'));
            assert_eq!(app.state.list_form.len(), 3);
            press(&mut app, ctrl('x'));
            assert_eq!(app.state.list_form.len(), 2);
        }

        #[test]
        fn test_remove_only_entry_reports_status() {
            let mut app = list_app(MockAttachmentLoader::new(), MockSubmissionSink::new());
            press(&mut app, ctrl('x'));
            assert_eq!(app.state.list_form.len(), 1);
            assert_eq!(
                app.state.status_message.as_deref(),
                Some("At least one entry is required")
            );
        }

        #[test]
        fn test_ctrl_u_clears_entry_field() {
            let mut app = list_app(MockAttachmentLoader::new(), MockSubmissionSink::new());
            type_text(&mut app, "ABC");
            press(&mut app, ctrl('u'));
            let (_, entry) = app.state.list_form.entry_at(0).unwrap();
            assert_eq!(entry.tin.as_text(), "");
        }

        #[test]
        fn test_remove_on_submit_button_keeps_entries() {
            let mut app = list_app(MockAttachmentLoader::new(), MockSubmissionSink::new());
            press(&mut app, ctrl('a'));
            app.state.list_form.set_active_field(4);
            assert_eq!(app.state.list_form.focus(), ListFocus::Submit);

            press(&mut app, ctrl('x'));
            assert_eq!(app.state.list_form.len(), 2);
            assert_eq!(
                app.state.status_message.as_deref(),
                Some("Focus an entry to remove it")
            );
        }

        #[test]
        fn test_fill_and_submit() {
            let (sink, received) = recording_sink();
            let mut app = list_app(stub_loader(), sink);

            type_text(&mut app, "A");
            press(&mut app, key(KeyCode::Tab));
            type_text(&mut app, "a.pdf");
            press(&mut app, key(KeyCode::Enter));
            press(&mut app, key(KeyCode::Tab));
            press(&mut app, key(KeyCode::Enter));

            let received = received.lock().unwrap();
            assert_eq!(received.len(), 1);
            assert_eq!(
                received[0].to_json().unwrap(),
                r#"{"items":[{"tin":"A","fileName":"a.pdf","size":3}]}"#
            );
        }

        #[test]
        fn test_second_entry_missing_tin_blocks_submit() {
            let mut sink = MockSubmissionSink::new();
            sink.expect_submit().times(0);
            let mut app = list_app(MockAttachmentLoader::new(), sink);

            let form = &mut app.state.list_form;
            let first = form.entry_at(0).map(|(id, _)| id).unwrap();
            form.set_field(first, EntryField::Tin, "A").unwrap();
            form.set_attachment(first, Attachment::new("a.pdf", vec![1]))
                .unwrap();
            let second = form.append();
            form.set_attachment(second, Attachment::new("b.pdf", vec![1]))
                .unwrap();

            press(&mut app, ctrl('s'));

            let violations = app.state.list_form.violations();
            assert_eq!(violations.len(), 1);
            assert_eq!(
                violations.iter().next().map(|v| v.path.to_string()),
                Some("items[1].tin".to_string())
            );
        }
    }

    #[test]
    fn test_copy_without_submission() {
        let mut app = app_with(MockAttachmentLoader::new(), MockSubmissionSink::new());
        let mut event = ctrl('y');
        event.modifiers = crate::platform::COPY_MODIFIER;
        event.kind = KeyEventKind::Press;
        press(&mut app, event);
        assert_eq!(
            app.state.status_message.as_deref(),
            Some("Nothing submitted yet")
        );
    }
}
