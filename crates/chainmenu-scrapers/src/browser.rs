//! Rendered-DOM collaborator and the nutrition-modal interaction flow.
//!
//! No live headless-browser implementation ships in this crate; the session
//! is an opaque capability the caller supplies. Brands that need one fall
//! back to the static nutrition tables when no session is provided.

use std::time::Duration;

use async_trait::async_trait;

use crate::ScrapeError;

/// A scoped rendered-DOM session. The owner opens it at the start of a run
/// phase and must close it on every exit path.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<(), ScrapeError>;
    async fn exists(&self, selector: &str) -> Result<bool, ScrapeError>;
    async fn click(&self, selector: &str) -> Result<(), ScrapeError>;
    async fn inner_text(&self, selector: &str) -> Result<String, ScrapeError>;
    async fn html(&self) -> Result<String, ScrapeError>;
    async fn close(&self) -> Result<(), ScrapeError>;
}

/// Opens browser sessions for runs that need rendered DOM. The returned
/// session is scoped to one run phase; the caller closes it on every exit
/// path.
#[async_trait]
pub trait BrowserProvider: Send + Sync {
    async fn open(&self) -> Result<Box<dyn BrowserSession>, ScrapeError>;
}

/// States of the in-page nutrition modal interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    PageLoaded,
    ModalTriggerFound,
    ModalOpen,
    DataExtracted,
}

/// Explicit state machine for dynamic pages that hide nutrition behind a
/// modal: PageLoaded -> ModalTriggerFound -> ModalOpen -> DataExtracted,
/// with bounded retries per transition instead of sleep-based polling.
#[derive(Debug, Clone)]
pub struct ModalFlow {
    pub trigger_selector: String,
    pub modal_selector: String,
    pub content_selector: String,
    pub max_attempts_per_step: usize,
    pub retry_pause: Duration,
}

impl ModalFlow {
    pub fn new(trigger_selector: &str, modal_selector: &str, content_selector: &str) -> Self {
        Self {
            trigger_selector: trigger_selector.to_string(),
            modal_selector: modal_selector.to_string(),
            content_selector: content_selector.to_string(),
            max_attempts_per_step: 3,
            retry_pause: Duration::from_millis(300),
        }
    }

    /// Navigate to `url` and drive the modal open, returning the modal's
    /// inner text. Fails with the state that could not be left.
    pub async fn run(
        &self,
        session: &dyn BrowserSession,
        url: &str,
    ) -> Result<String, ScrapeError> {
        session.navigate(url).await?;
        let mut state = ModalState::PageLoaded;

        self.await_selector(session, &self.trigger_selector, state)
            .await?;
        state = ModalState::ModalTriggerFound;

        let mut last_err = None;
        for attempt in 0..self.max_attempts_per_step {
            if attempt > 0 {
                tokio::time::sleep(self.retry_pause).await;
            }
            if let Err(err) = session.click(&self.trigger_selector).await {
                last_err = Some(err);
                continue;
            }
            if session.exists(&self.modal_selector).await? {
                state = ModalState::ModalOpen;
                break;
            }
        }
        if state != ModalState::ModalOpen {
            return Err(last_err.unwrap_or_else(|| {
                ScrapeError::Browser(format!(
                    "modal `{}` never opened after {} attempts",
                    self.modal_selector, self.max_attempts_per_step
                ))
            }));
        }

        self.await_selector(session, &self.content_selector, state)
            .await?;
        let text = session.inner_text(&self.content_selector).await?;
        Ok(text)
    }

    async fn await_selector(
        &self,
        session: &dyn BrowserSession,
        selector: &str,
        state: ModalState,
    ) -> Result<(), ScrapeError> {
        for attempt in 0..self.max_attempts_per_step {
            if attempt > 0 {
                tokio::time::sleep(self.retry_pause).await;
            }
            if session.exists(selector).await? {
                return Ok(());
            }
        }
        Err(ScrapeError::Browser(format!(
            "selector `{selector}` not found after {} attempts (state {state:?})",
            self.max_attempts_per_step
        )))
    }
}
