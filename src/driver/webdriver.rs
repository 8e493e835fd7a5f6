use std::time::Duration;

use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::key::Key;
use fantoccini::{Client, ClientBuilder, Locator};
use tokio::time::{sleep, timeout};

use super::PageDriver;
use crate::model::DriverError;

const READY_STATE_POLL: Duration = Duration::from_millis(250);

/// One WebDriver session. Acquired fresh for every poll cycle and closed at
/// cycle end, so navigation state and cookies never leak between polls.
pub struct WebDriverPage {
    client: Client,
}

impl WebDriverPage {
    pub async fn connect(webdriver_url: &str) -> Result<Self, DriverError> {
        let client = ClientBuilder::native()
            .connect(webdriver_url)
            .await
            .map_err(|e| DriverError::Backend(e.to_string()))?;
        Ok(Self { client })
    }

    pub async fn close(self) -> Result<(), DriverError> {
        self.client
            .close()
            .await
            .map_err(|e| DriverError::Backend(e.to_string()))
    }

    async fn element(&self, selector: &str) -> Result<Element, DriverError> {
        self.client
            .find(Locator::Css(selector))
            .await
            .map_err(|e| map_cmd_error(selector, e))
    }
}

fn map_cmd_error(selector: &str, error: CmdError) -> DriverError {
    match error {
        ref e if e.is_no_such_element() => DriverError::NotFound(selector.to_string()),
        CmdError::WaitTimeout => DriverError::Timeout,
        other => DriverError::Backend(other.to_string()),
    }
}

#[async_trait::async_trait]
impl PageDriver for WebDriverPage {
    async fn goto(&self, url: &str) -> Result<(), DriverError> {
        self.client
            .goto(url)
            .await
            .map_err(|e| DriverError::Backend(e.to_string()))
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), DriverError> {
        self.client
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css(selector))
            .await
            .map(|_| ())
            .map_err(|e| map_cmd_error(selector, e))
    }

    async fn exists(&self, selector: &str) -> Result<bool, DriverError> {
        match self.client.find(Locator::Css(selector)).await {
            Ok(_) => Ok(true),
            Err(ref e) if e.is_no_such_element() => Ok(false),
            Err(e) => Err(DriverError::Backend(e.to_string())),
        }
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<(), DriverError> {
        let element = self.element(selector).await?;
        element
            .clear()
            .await
            .map_err(|e| map_cmd_error(selector, e))?;
        element
            .send_keys(value)
            .await
            .map_err(|e| map_cmd_error(selector, e))
    }

    async fn click(&self, selector: &str) -> Result<(), DriverError> {
        self.element(selector)
            .await?
            .click()
            .await
            .map(|_| ())
            .map_err(|e| map_cmd_error(selector, e))
    }

    async fn press_escape(&self, selector: &str) -> Result<(), DriverError> {
        let element = self.element(selector).await?;
        let escape = String::from(char::from(Key::Escape));
        element
            .send_keys(&escape)
            .await
            .map_err(|e| map_cmd_error(selector, e))
    }

    async fn wait_for_navigation(&self, limit: Duration) -> Result<(), DriverError> {
        // WebDriver exposes no navigation event, so poll the document until
        // it reports itself loaded.
        timeout(limit, async {
            loop {
                let state = self
                    .client
                    .execute("return document.readyState", vec![])
                    .await
                    .map_err(|e| DriverError::Backend(e.to_string()))?;
                if state.as_str() == Some("complete") {
                    return Ok(());
                }
                sleep(READY_STATE_POLL).await;
            }
        })
        .await
        .map_err(|_| DriverError::Timeout)?
    }

    async fn source(&self) -> Result<String, DriverError> {
        self.client
            .source()
            .await
            .map_err(|e| DriverError::Backend(e.to_string()))
    }
}
