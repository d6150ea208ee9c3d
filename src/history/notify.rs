//! User-facing warnings raised by the history manager.

/// Surfaces a warning to the user, e.g. as a toast.
pub trait Notifier {
    fn warn(&self, title: &str, message: &str);
}

/// Routes warnings to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn warn(&self, title: &str, message: &str) {
        log::warn!("{}: {}", title, message);
    }
}
