pub mod webdriver;

#[cfg(test)]
pub mod fake;

use std::time::Duration;

use crate::model::DriverError;

/// What the pipeline needs from a browser session. The concrete backend is
/// WebDriver, but the submitter only ever sees this seam, so tests can
/// script a page that misbehaves in controlled ways.
#[async_trait::async_trait]
pub trait PageDriver: Send + Sync {
    async fn goto(&self, url: &str) -> Result<(), DriverError>;

    /// Blocks until the selector resolves, up to `timeout`.
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), DriverError>;

    async fn exists(&self, selector: &str) -> Result<bool, DriverError>;

    async fn fill(&self, selector: &str, value: &str) -> Result<(), DriverError>;

    async fn click(&self, selector: &str) -> Result<(), DriverError>;

    /// Sends Escape to the element, used to dismiss overlays that would
    /// otherwise swallow the next click.
    async fn press_escape(&self, selector: &str) -> Result<(), DriverError>;

    /// Resolves once the current document has finished loading.
    async fn wait_for_navigation(&self, timeout: Duration) -> Result<(), DriverError>;

    /// Snapshot of the rendered page HTML.
    async fn source(&self) -> Result<String, DriverError>;
}
