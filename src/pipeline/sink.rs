use tokio::sync::mpsc;
use tracing::warn;

/// Display side of the pipeline. Receives formatted results only.
pub trait ResultSink: Send + Sync {
    fn on_result(&self, formatted: String);
}

impl<F> ResultSink for F
where
    F: Fn(String) + Send + Sync,
{
    fn on_result(&self, formatted: String) {
        self(formatted)
    }
}

/// Forwards results to whichever task owns the receiving end, typically the
/// display's own event loop.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ResultSink for ChannelSink {
    fn on_result(&self, formatted: String) {
        if let Err(e) = self.tx.send(formatted) {
            warn!("Display receiver is gone, dropping result '{}'", e.0);
        }
    }
}
