//! Simulated page.
//!
//! `SimPage` plays the host: it owns a real `FormController`, executes every
//! action it returns against in-memory storage and simulated browsing
//! contexts, and answers update fetches from a scripted asset table.

use std::collections::HashMap;

use genpass_core::{
    Envelope, FormController, FormError, GenPass, InboundEvent, Language, MemoryStore, PageAction,
    PageEvent, PersistedConfig,
};

use crate::{
    model::{ContextId, ObservableState},
    sim_env::SimEnv,
    sim_source::SimSource,
};

/// Origins of the simulated browsing contexts, indexed by `ContextId`.
///
/// The last one is a sandboxed frame whose opaque origin the page can't
/// reply to.
pub const CONTEXT_ORIGINS: [&str; 4] =
    ["https://one.example", "https://login.two.example.co.uk", "http://localhost:8080", "null"];

/// Height the update notice adds to the page.
pub const UPDATE_NOTICE_HEIGHT: u32 = 48;

/// Simulated page hosting the real controller.
pub struct SimPage {
    form: FormController<SimEnv, GenPass, SimSource>,
    env: SimEnv,
    store: MemoryStore,
    contexts: Vec<SimSource>,
    assets: HashMap<String, String>,
    pending_fetches: Vec<&'static str>,
    notice_shown: bool,
    blurs: usize,
    prevented: usize,
    log: Vec<String>,
}

impl SimPage {
    /// Load a fresh page with empty storage.
    pub fn new(seed: u64) -> Self {
        Self::open(seed, MemoryStore::new(), None)
    }

    /// Load a page over existing storage, as a reload would.
    pub fn open(seed: u64, store: MemoryStore, language: Option<Language>) -> Self {
        let env = SimEnv::with_seed(seed);
        let config = PersistedConfig::load(&store);
        let form =
            FormController::new(env.clone(), GenPass::default(), config).with_language(language);

        let contexts = CONTEXT_ORIGINS
            .iter()
            .zip(0u8..)
            .map(|(origin, id)| SimSource::new(id, *origin))
            .collect();

        Self {
            form,
            env,
            store,
            contexts,
            assets: HashMap::new(),
            pending_fetches: Vec::new(),
            notice_shown: false,
            blurs: 0,
            prevented: 0,
            log: Vec::new(),
        }
    }

    /// Serve `body` for fetches of `path`.
    #[must_use]
    pub fn with_asset(mut self, path: &str, body: impl Into<String>) -> Self {
        self.assets.insert(path.to_string(), body.into());
        self
    }

    /// The controller under test.
    pub fn form(&self) -> &FormController<SimEnv, GenPass, SimSource> {
        &self.form
    }

    /// Page layout.
    pub fn env(&self) -> &SimEnv {
        &self.env
    }

    /// Page storage.
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Close the page, keeping its storage.
    pub fn into_store(self) -> MemoryStore {
        self.store
    }

    /// A simulated browsing context.
    pub fn context(&self, id: ContextId) -> Option<&SimSource> {
        self.contexts.get(usize::from(id))
    }

    /// All simulated browsing contexts.
    pub fn contexts(&self) -> &[SimSource] {
        &self.contexts
    }

    /// Fetches requested but not yet completed.
    pub fn pending_fetches(&self) -> usize {
        self.pending_fetches.len()
    }

    /// Times the active field was blurred.
    pub fn blurs(&self) -> usize {
        self.blurs
    }

    /// Times a default browser action was suppressed.
    pub fn prevented(&self) -> usize {
        self.prevented
    }

    /// Notes logged by the controller.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Feed an event to the controller and execute the resulting actions.
    pub fn dispatch(&mut self, event: PageEvent<SimSource>) -> Result<(), FormError> {
        let actions = self.form.handle(event)?;
        for action in actions {
            self.execute(action);
        }
        Ok(())
    }

    /// Deliver `data` to the page from a simulated context.
    ///
    /// Unknown context ids send nothing.
    pub fn send_from(&mut self, context: ContextId, data: &str) -> Result<(), FormError> {
        let Some(source) = self.context(context).cloned() else {
            return Ok(());
        };

        let origin = source.origin().to_string();
        self.dispatch(PageEvent::MessageReceived(InboundEvent {
            source,
            origin,
            data: data.to_string(),
        }))
    }

    /// Complete every pending fetch from the asset table.
    pub fn complete_fetches(&mut self) -> Result<(), FormError> {
        for path in std::mem::take(&mut self.pending_fetches) {
            let event = match self.assets.get(path) {
                Some(body) => {
                    if !self.notice_shown {
                        self.env.grow(UPDATE_NOTICE_HEIGHT);
                        self.notice_shown = true;
                    }
                    PageEvent::UpdateFetched { body: body.clone() }
                },
                None => PageEvent::UpdateFetchFailed { reason: format!("{path}: not found") },
            };
            self.dispatch(event)?;
        }
        Ok(())
    }

    /// Extract observable state for comparison with the model.
    pub fn observable_state(&self) -> ObservableState {
        let state = self.form.state();
        let deliveries = self
            .contexts
            .iter()
            .map(|context| {
                let envelopes: Vec<_> = context
                    .delivered()
                    .iter()
                    .filter_map(|delivery| Envelope::decode(&delivery.data).ok())
                    .collect();
                let results = envelopes.iter().filter(|e| matches!(e, Envelope::Result(_))).count();
                let heights = envelopes.iter().filter(|e| matches!(e, Envelope::Height(_))).count();
                (results, heights)
            })
            .collect();

        ObservableState {
            domain: state.domain().to_string(),
            length: state.length().to_string(),
            case: state.case(),
            status: state.status(),
            bound: self.form.channel().endpoint().map(|endpoint| endpoint.source().id()),
            deliveries,
            persisted: (!self.store.is_empty()).then(|| PersistedConfig::load(&self.store)),
            pending_fetches: self.pending_fetches.len(),
            update_link: self.form.view().update_link.is_some(),
        }
    }

    fn execute(&mut self, action: PageAction<SimSource>) {
        match action {
            PageAction::Post(outbound) => outbound.dispatch(),
            PageAction::PersistConfig(config) => {
                if let Err(e) = config.save(&mut self.store) {
                    tracing::warn!(error = %e, "failed to persist settings");
                }
            },
            PageAction::FetchUpdate { path } => self.pending_fetches.push(path),
            PageAction::BlurActiveField => self.blurs += 1,
            PageAction::PreventDefault => self.prevented += 1,
            PageAction::Log { message } => {
                tracing::debug!(%message, "controller note");
                self.log.push(message);
            },
        }
    }
}
