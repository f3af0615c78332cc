use crate::controller::events::{Notification, Severity, ToastPosition};

pub fn render_notification(notification: &Notification) -> String {
    let marker = match notification.severity {
        Severity::Success => "ok",
        Severity::Error => "error",
    };
    let mut line = format!("[{marker}] {}", notification.title);
    if let Some(detail) = &notification.detail {
        line.push_str(": ");
        line.push_str(detail);
    }
    match notification.position {
        ToastPosition::TopEnd => line,
        ToastPosition::Center => format!("\n    {line}\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_toast_is_single_line() {
        assert_eq!(render_notification(&Notification::saved()), "[ok] Saved");
    }

    #[test]
    fn centered_error_toast_is_set_apart() {
        let toast = Notification::new(Severity::Error, ToastPosition::Center, "Sign-in failed")
            .with_detail("bad password");
        assert_eq!(
            render_notification(&toast),
            "\n    [error] Sign-in failed: bad password\n"
        );
    }
}
