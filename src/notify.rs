//! Operator notification seam.
//!
//! Busy and exhausted conditions must reach a human (the proctor who typed
//! the marker), but failing to notify must never fail the operation; the
//! event log remains the durable record.

/// Best-effort, user-visible surfacing of transient conditions.
pub trait Notifier {
    /// Surface a message to the operator. Infallible by contract.
    fn alert(&self, text: &str);
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn alert(&self, text: &str) {
        (**self).alert(text);
    }
}

/// Notifier that writes to stderr.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, text: &str) {
        eprintln!("Notice: {}", text);
    }
}

/// Notifier that records alerts for assertions in tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    alerts: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn alerts(&self) -> Vec<String> {
        self.alerts
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .clone()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn alert(&self, text: &str) {
        self.alerts
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_notifier_collects_alerts() {
        let notifier = RecordingNotifier::default();
        notifier.alert("desk is busy");
        notifier.alert("no slots left");

        assert_eq!(notifier.alerts(), vec!["desk is busy", "no slots left"]);
    }

    #[test]
    fn console_notifier_does_not_panic() {
        ConsoleNotifier.alert("hello");
    }
}
