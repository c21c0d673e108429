/// Channel receiving the diagnostics a [Notifier][crate::Notifier] emits instead of failing loudly
#[cfg_attr(test, mockall::automock)]
pub trait DiagnosticSink {
    /// Called once each time a toast could not be shown because its container is absent
    fn container_missing(&self, container_id: &str);
}

/// Default [DiagnosticSink] forwarding to the [log] facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn container_missing(&self, container_id: &str) {
        log::error!("Toast container `{container_id}` not found!");
    }
}
