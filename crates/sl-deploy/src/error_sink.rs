//! Destination for messages about failed runs

use async_trait::async_trait;

/// Boxed error returned by a failing sink
pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// Receives a free-text message for every failed script creation run
#[async_trait]
pub trait ErrorSink: Send + Sync {
    async fn log_error(&self, message: &str) -> Result<(), SinkError>;
}

/// [`ErrorSink`] that forwards to `log::error!`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogErrorSink;

#[async_trait]
impl ErrorSink for LogErrorSink {
    async fn log_error(&self, message: &str) -> Result<(), SinkError> {
        log::error!("{message}");
        Ok(())
    }
}

/// Send `message` to the sink; a failing sink is noted and otherwise ignored
pub(crate) async fn report(sink: &dyn ErrorSink, message: &str) {
    if let Err(e) = sink.log_error(message).await {
        log::debug!("Error sink failed while recording '{message}': {e}");
    }
}
