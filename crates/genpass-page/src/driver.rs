//! Page driver.
//!
//! Executes the controller's actions against real I/O. The driver runs on a
//! single-threaded tokio runtime inside a [`tokio::task::LocalSet`]: update
//! fetches are spawned as local tasks and report back over a channel, so
//! events keep flowing while a fetch is in flight.
//!
//! ```text
//!   events ──▶ FormController::handle ──▶ actions
//!                     ▲                     │
//!                     │          Post ──────┼──▶ MessageSource::post_message
//!                     │   PersistConfig ────┼──▶ KeyValueStore
//!                     └── fetch result ◀────┴─── FetchUpdate (spawn_local)
//! ```

use std::rc::Rc;

use genpass_core::{FormController, GenPass, KeyValueStore, MessageSource, PageAction, PageEvent};
use tokio::sync::mpsc;

use crate::{error::PageError, fetch::AssetFetcher, system_env::SystemEnv};

/// Controller type hosted by the runtime.
pub type PageForm<S> = FormController<SystemEnv, GenPass, S>;

/// Runs a page: feeds events to the controller and executes its actions.
///
/// # Type Parameters
///
/// - `S`: Handle type of the bookmarklet's browsing context
/// - `K`: Settings storage
/// - `F`: Update asset source
pub struct PageDriver<S, K, F> {
    form: PageForm<S>,
    store: K,
    fetcher: Rc<F>,
    fetch_tx: mpsc::UnboundedSender<PageEvent<S>>,
    fetch_rx: mpsc::UnboundedReceiver<PageEvent<S>>,
    in_flight: usize,
}

impl<S, K, F> PageDriver<S, K, F>
where
    S: MessageSource + 'static,
    K: KeyValueStore,
    F: AssetFetcher + 'static,
{
    /// Host `form`, persisting to `store` and fetching from `fetcher`.
    pub fn new(form: PageForm<S>, store: K, fetcher: F) -> Self {
        let (fetch_tx, fetch_rx) = mpsc::unbounded_channel();
        Self { form, store, fetcher: Rc::new(fetcher), fetch_tx, fetch_rx, in_flight: 0 }
    }

    /// The hosted controller.
    pub fn form(&self) -> &PageForm<S> {
        &self.form
    }

    /// Settings storage.
    pub fn store(&self) -> &K {
        &self.store
    }

    /// Update fetches started but not yet reported back.
    pub fn fetches_in_flight(&self) -> usize {
        self.in_flight
    }

    /// Feed one event to the controller and execute the resulting actions.
    ///
    /// Must be called from within a `LocalSet` if the event can start an
    /// update fetch.
    pub fn handle(&mut self, event: PageEvent<S>) -> Result<(), PageError> {
        let actions = self.form.handle(event)?;
        for action in actions {
            self.execute(action);
        }
        Ok(())
    }

    /// Process events until `events` closes and every fetch has reported
    /// back, then hand the driver back.
    ///
    /// Non-fatal errors are logged and the event is skipped.
    ///
    /// # Errors
    ///
    /// Returns the first fatal [`PageError`].
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<PageEvent<S>>,
    ) -> Result<Self, PageError> {
        let mut input_open = true;

        while input_open || self.in_flight > 0 {
            let event = tokio::select! {
                event = events.recv(), if input_open => match event {
                    Some(event) => event,
                    None => {
                        tracing::debug!(in_flight = self.in_flight, "input closed");
                        input_open = false;
                        continue;
                    },
                },
                Some(event) = self.fetch_rx.recv(), if self.in_flight > 0 => {
                    self.in_flight -= 1;
                    event
                },
                else => break,
            };

            if let Err(e) = self.handle(event) {
                if e.is_fatal() {
                    return Err(e);
                }
                tracing::warn!(error = %e, "event processing error");
            }
        }

        Ok(self)
    }

    fn execute(&mut self, action: PageAction<S>) {
        match action {
            PageAction::Post(outbound) => {
                tracing::debug!(
                    key = outbound.envelope.key(),
                    origin = %outbound.endpoint.origin(),
                    "posting envelope"
                );
                outbound.dispatch();
            },
            PageAction::PersistConfig(config) => {
                if let Err(e) = config.save(&mut self.store) {
                    tracing::warn!(error = %e, "failed to persist settings");
                }
            },
            PageAction::FetchUpdate { path } => self.spawn_fetch(path),
            PageAction::BlurActiveField => tracing::trace!("blur active field"),
            PageAction::PreventDefault => tracing::trace!("prevent default"),
            PageAction::Log { message } => tracing::debug!("{}", message),
        }
    }

    fn spawn_fetch(&mut self, path: &'static str) {
        let fetcher = Rc::clone(&self.fetcher);
        let tx = self.fetch_tx.clone();
        self.in_flight += 1;

        tokio::task::spawn_local(async move {
            let event = match fetcher.fetch(path).await {
                Ok(body) => PageEvent::UpdateFetched { body },
                Err(e) => PageEvent::UpdateFetchFailed { reason: e.to_string() },
            };
            // Receiver lives as long as the driver.
            let _ = tx.send(event);
        });
    }
}
