pub mod sms;

use tracing::info;

use crate::model::NotifyError;

/// Narrow interface the poll loop talks to. `log` is fire-and-forget and
/// must never fail the poll; `alert` is best-effort and callers absorb its
/// failures.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    fn log(&self, lines: &[String]);

    async fn alert(&self, message: &str) -> Result<(), NotifyError>;
}

/// Fallback channel when no SMS credentials are configured; alerts land in
/// the log instead of a phone.
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    fn log(&self, lines: &[String]) {
        for line in lines {
            info!("{line}");
        }
    }

    async fn alert(&self, message: &str) -> Result<(), NotifyError> {
        info!("ALERT: {message}");
        Ok(())
    }
}
