use crate::domain::interfaces::NotificationSurface;
use crate::domain::models::{Notification, Severity};
use console::{style, Color, StyledObject, Term};
use log::debug;
use uuid::Uuid;

/// Prints notifications to stderr on a background of the severity color.
/// Styling is dropped when stderr is not a terminal.
#[derive(Default)]
pub struct TerminalSurface;

impl TerminalSurface {
    pub fn new() -> Self {
        Self
    }
}

fn background(severity: Severity) -> Color {
    match severity {
        Severity::Success => Color::Green,
        Severity::Error => Color::Red,
        Severity::Warning => Color::Yellow,
        Severity::Info => Color::Cyan,
    }
}

pub fn paint(notification: &Notification) -> StyledObject<String> {
    let text = style(format!(" {} ", notification.message))
        .bg(background(notification.severity))
        .for_stderr();
    // Black text on yellow
    match notification.severity {
        Severity::Warning => text.black(),
        _ => text.white().bold(),
    }
}

impl NotificationSurface for TerminalSurface {
    fn render(&self, notification: &Notification) {
        let _ = Term::stderr().write_line(&paint(notification).to_string());
    }

    // Printed lines cannot be taken back; expiry is only logged.
    fn remove(&self, id: Uuid) {
        debug!("Notification {} dismissed", id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::NotificationRequest;

    fn notification(message: &str, severity: Severity) -> Notification {
        Notification::new(NotificationRequest {
            message: message.to_string(),
            severity,
        })
    }

    #[test]
    fn test_plain_output_has_no_escapes() {
        let painted = paint(&notification("saved", Severity::Error))
            .force_styling(false)
            .to_string();
        assert_eq!(painted, " saved ");
    }

    #[test]
    fn test_styled_output_uses_severity_background() {
        let error = paint(&notification("saved", Severity::Error))
            .force_styling(true)
            .to_string();
        let success = paint(&notification("saved", Severity::Success))
            .force_styling(true)
            .to_string();
        assert!(error.contains('\x1b'));
        assert!(error.contains("saved"));
        assert_ne!(error, success);
    }
}
