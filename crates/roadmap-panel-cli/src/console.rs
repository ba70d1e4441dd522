//! Terminal dialog and notifier

use roadmap_panel::{Dialog, Notifier};

/// Dialog answering every prompt with a name given on the command line
#[derive(Debug, Clone, Default)]
pub(crate) struct ArgDialog {
    answer: Option<String>,
}

impl ArgDialog {
    pub(crate) fn new(answer: Option<String>) -> Self {
        Self { answer }
    }
}

impl Dialog for ArgDialog {
    fn prompt_for_text(&self, message: &str, default_value: &str) -> Option<String> {
        eprintln!("? {message} [{default_value}]");
        match &self.answer {
            Some(answer) => eprintln!("> {answer}"),
            None => eprintln!("> (cancelled)"),
        }
        self.answer.clone()
    }
}

/// Notifier writing to stderr
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        tracing::info!(notification = "success", "{message}");
        eprintln!("✔ {message}");
    }

    fn warning(&self, message: &str) {
        tracing::warn!(notification = "warning", "{message}");
        eprintln!("⚠ {message}");
    }
}
