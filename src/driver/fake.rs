// Scripted PageDriver for tests. The page "navigates" when the submit
// control is clicked, which lets tests pin down the click/wait join order.
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::PageDriver;
use crate::model::DriverError;

pub struct FakeDriver {
    /// Page HTML returned by `source` after submission.
    pub html: String,
    /// Selectors that resolve to nothing on this page.
    pub missing: Vec<String>,
    /// Selector the results-ready wait is expected to use; it only resolves
    /// once the page has navigated.
    pub results_selector: String,
    /// When false, clicking submit never produces a navigation.
    pub submit_navigates: bool,
    /// When true, every wait hangs forever (a page that never loads).
    pub hang: bool,
    /// Pre-set to simulate navigation finishing before any wait is polled.
    pub navigated: AtomicBool,
    pub fills: Mutex<HashMap<String, String>>,
    pub clicks: Mutex<Vec<String>>,
    pub escapes: Mutex<Vec<String>>,
}

impl Default for FakeDriver {
    fn default() -> Self {
        Self {
            html: String::new(),
            missing: Vec::new(),
            results_selector: "#results".into(),
            submit_navigates: true,
            hang: false,
            navigated: AtomicBool::new(false),
            fills: Mutex::new(HashMap::new()),
            clicks: Mutex::new(Vec::new()),
            escapes: Mutex::new(Vec::new()),
        }
    }
}

impl FakeDriver {
    pub fn with_html(html: &str) -> Self {
        Self { html: html.to_string(), ..Self::default() }
    }

    fn is_missing(&self, selector: &str) -> bool {
        self.missing.iter().any(|m| m == selector)
    }

    /// Bounded cooperative poll; gives a concurrently-running click a chance
    /// to land, then gives up the way a real wait would.
    async fn await_navigated(&self) -> Result<(), DriverError> {
        for _ in 0..64 {
            if self.navigated.load(Ordering::SeqCst) {
                return Ok(());
            }
            tokio::task::yield_now().await;
        }
        Err(DriverError::Timeout)
    }
}

#[async_trait::async_trait]
impl PageDriver for FakeDriver {
    async fn goto(&self, _url: &str) -> Result<(), DriverError> {
        Ok(())
    }

    async fn wait_for(&self, selector: &str, _timeout: Duration) -> Result<(), DriverError> {
        if self.hang {
            std::future::pending::<()>().await;
        }
        if self.is_missing(selector) {
            return Err(DriverError::Timeout);
        }
        if selector == self.results_selector {
            return self.await_navigated().await;
        }
        Ok(())
    }

    async fn exists(&self, selector: &str) -> Result<bool, DriverError> {
        Ok(!self.is_missing(selector))
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<(), DriverError> {
        if self.is_missing(selector) {
            return Err(DriverError::NotFound(selector.to_string()));
        }
        self.fills
            .lock()
            .unwrap()
            .insert(selector.to_string(), value.to_string());
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<(), DriverError> {
        self.clicks.lock().unwrap().push(selector.to_string());
        if self.submit_navigates {
            // Let any already-started waits get polled at least once before
            // the navigation "completes".
            tokio::task::yield_now().await;
            self.navigated.store(true, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn press_escape(&self, selector: &str) -> Result<(), DriverError> {
        self.escapes.lock().unwrap().push(selector.to_string());
        Ok(())
    }

    async fn wait_for_navigation(&self, _timeout: Duration) -> Result<(), DriverError> {
        self.await_navigated().await
    }

    async fn source(&self) -> Result<String, DriverError> {
        Ok(self.html.clone())
    }
}
