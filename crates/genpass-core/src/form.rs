//! Form state machine.
//!
//! The `FormController` owns the form values and the messaging channel. It
//! is a pure state machine: events in, actions out, caller handles I/O.
//!
//! # States
//!
//! ```text
//!        submit (field missing)            submit (ok)
//!   ┌─────────────────────────┐     ┌──────────────────────────┐
//!   │                         ▼     │                          ▼
//! Idle ◀──── input ──── MissingInput   Idle ◀── input ── Revealed { masked }
//!                                                        masked ──reveal──▶ visible
//! ```
//!
//! Every tracked input change (typing, length adjustment, case selection,
//! domain populated from a message) returns the form to `Idle`: the result
//! is hidden and the missing-field markers are cleared.

use genpass_proto::{Envelope, InboundField};

use crate::{
    UPDATE_ASSET_PATH,
    channel::{InboundEvent, MessageChannel, MessageSource},
    config::PersistedConfig,
    derivation::{DerivationService, DeriveOptions},
    env::Environment,
    error::FormError,
    event::{Field, PageAction, PageEvent, Step},
    keys::KeyClass,
    locale::{Labels, Language},
    validator::{PasswordCase, clamp_length, selected_case, validate_length},
};

/// Where the form is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Waiting for input or submit.
    Idle,
    /// Last submit lacked required input.
    MissingInput {
        /// Master password was empty.
        password: bool,
        /// Domain was empty after normalization.
        domain: bool,
    },
    /// A password was generated and sent.
    Revealed {
        /// True until the user acknowledges the result.
        masked: bool,
    },
}

/// Current form values.
///
/// # Security
///
/// - **Debug Redaction**: the `Debug` impl redacts the master password and
///   the generated result.
#[derive(Clone, PartialEq, Eq)]
pub struct FormState {
    master_password: String,
    domain: String,
    length: String,
    case: PasswordCase,
    status: Status,
    result: Option<String>,
}

impl FormState {
    fn seeded(config: PersistedConfig) -> Self {
        Self {
            master_password: String::new(),
            domain: String::new(),
            length: validate_length(&config.length.to_string()).to_string(),
            case: config.case,
            status: Status::Idle,
            result: None,
        }
    }

    /// Master password field content.
    pub fn master_password(&self) -> &str {
        &self.master_password
    }

    /// Domain field content.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Length field content, as typed.
    pub fn length(&self) -> &str {
        &self.length
    }

    /// Selected case.
    pub fn case(&self) -> PasswordCase {
        self.case
    }

    /// Current status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Generated password, present only while `Revealed`.
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// Both required fields are filled in.
    pub fn is_ready(&self) -> bool {
        !self.master_password.is_empty() && !self.domain.is_empty()
    }
}

impl std::fmt::Debug for FormState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormState")
            .field("master_password", &format_args!("<redacted>"))
            .field("domain", &self.domain)
            .field("length", &self.length)
            .field("case", &self.case)
            .field("status", &self.status)
            .field("result", &self.result.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// What the page should currently render.
///
/// # Security
///
/// - **Debug Redaction**: the `Debug` impl redacts `output`.
#[derive(Clone, PartialEq, Eq)]
pub struct ViewModel {
    /// Localized labels and placeholders.
    pub labels: Labels,
    /// Domain field content.
    pub domain: String,
    /// Length field content.
    pub length: String,
    /// Checked case option.
    pub case: PasswordCase,
    /// Mark the master password field as missing.
    pub password_missing: bool,
    /// Mark the domain field as missing.
    pub domain_missing: bool,
    /// Show the generate button.
    pub generate_visible: bool,
    /// Show the mask covering a generated password.
    pub mask_visible: bool,
    /// Generated password to display, once unmasked.
    pub output: Option<String>,
    /// Link target of the bookmarklet update notice, once fetched.
    pub update_link: Option<String>,
}

impl std::fmt::Debug for ViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewModel")
            .field("labels", &self.labels)
            .field("domain", &self.domain)
            .field("length", &self.length)
            .field("case", &self.case)
            .field("password_missing", &self.password_missing)
            .field("domain_missing", &self.domain_missing)
            .field("generate_visible", &self.generate_visible)
            .field("mask_visible", &self.mask_visible)
            .field("output", &self.output.as_ref().map(|_| "<redacted>"))
            .field("update_link", &self.update_link)
            .finish()
    }
}

/// Form state machine.
///
/// Owns the form values and the messaging channel, and turns events into
/// actions. Pure state machine - returns actions, caller handles I/O.
///
/// # Type Parameters
///
/// - `E`: Environment reporting page layout
/// - `D`: Password derivation
/// - `S`: Handle type of the bookmarklet's browsing context
pub struct FormController<E, D, S> {
    /// Page layout facts.
    env: E,

    /// Password derivation and hostname normalization.
    deriver: D,

    /// Session with the bookmarklet.
    channel: MessageChannel<S>,

    /// Form values.
    state: FormState,

    /// Localized texts.
    labels: Labels,

    /// Update link, once the update asset arrived.
    update_link: Option<String>,
}

impl<E, D, S> FormController<E, D, S>
where
    E: Environment,
    D: DerivationService,
    S: MessageSource,
{
    /// Create a controller seeded from stored settings.
    pub fn new(env: E, deriver: D, config: PersistedConfig) -> Self {
        Self {
            env,
            deriver,
            channel: MessageChannel::new(),
            state: FormState::seeded(config),
            labels: Labels::default(),
            update_link: None,
        }
    }

    /// Use the label table of `language`, if one was requested.
    #[must_use]
    pub fn with_language(mut self, language: Option<Language>) -> Self {
        if let Some(language) = language {
            self.labels = language.labels();
        }
        self
    }

    /// Current form values.
    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Messaging session.
    pub fn channel(&self) -> &MessageChannel<S> {
        &self.channel
    }

    /// Page environment.
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Render model of the current state.
    pub fn view(&self) -> ViewModel {
        let (password_missing, domain_missing) = match self.state.status {
            Status::MissingInput { password, domain } => (password, domain),
            _ => (false, false),
        };
        let (generate_visible, mask_visible, output) = match self.state.status {
            Status::Revealed { masked: true } => (false, true, None),
            Status::Revealed { masked: false } => (false, false, self.state.result.clone()),
            _ => (true, false, None),
        };

        ViewModel {
            labels: self.labels,
            domain: self.state.domain.clone(),
            length: self.state.length.clone(),
            case: self.state.case,
            password_missing,
            domain_missing,
            generate_visible,
            mask_visible,
            output,
            update_link: self.update_link.clone(),
        }
    }

    /// Process an event and return resulting actions.
    ///
    /// # Errors
    ///
    /// Returns `FormError` only when the page can't encode its own
    /// envelopes. Bad input and bad messages are handled in-band.
    pub fn handle(&mut self, event: PageEvent<S>) -> Result<Vec<PageAction<S>>, FormError> {
        match event {
            PageEvent::Loaded { config, language } => {
                self.handle_loaded(config, language);
                Ok(vec![])
            },
            PageEvent::Input { field, value } => {
                self.set_field(field, value);
                Ok(vec![])
            },
            PageEvent::CaseSelected(selection) => {
                self.state.case = selected_case(selection.as_deref());
                self.reset();
                Ok(vec![])
            },
            PageEvent::KeyDown { code } => self.handle_key_down(code),
            PageEvent::Submit => self.handle_submit(),
            PageEvent::Reveal => {
                self.handle_reveal();
                Ok(vec![])
            },
            PageEvent::AdjustLength(step) => Ok(self.handle_adjust_length(step)),
            PageEvent::MessageReceived(event) => self.handle_message(event),
            PageEvent::UpdateFetched { body } => self.handle_update_fetched(body),
            PageEvent::UpdateFetchFailed { reason } => {
                tracing::debug!(%reason, "update asset fetch failed");
                Ok(vec![])
            },
        }
    }

    /// Seed length, case and labels. Typed text is left alone.
    fn handle_loaded(&mut self, config: PersistedConfig, language: Option<Language>) {
        tracing::debug!(length = config.length, case = config.case.as_str(), "page loaded");
        self.state.length = validate_length(&config.length.to_string()).to_string();
        self.state.case = config.case;
        self.labels = language.map(Language::labels).unwrap_or_default();
        self.reset();
    }

    /// Hide any result and clear missing-field markers.
    fn reset(&mut self) {
        self.state.status = Status::Idle;
        self.state.result = None;
    }

    /// Write a field, as if the user changed it.
    fn set_field(&mut self, field: Field, value: String) {
        match field {
            Field::MasterPassword => self.state.master_password = value,
            Field::Domain => self.state.domain = value,
            Field::Length => self.state.length = value,
        }
        self.reset();
    }

    /// Handle keydown inside a form field.
    fn handle_key_down(&mut self, code: u32) -> Result<Vec<PageAction<S>>, FormError> {
        match KeyClass::of(code) {
            KeyClass::ContentAltering => {
                self.reset();
                Ok(vec![])
            },
            KeyClass::Submit => {
                let mut actions = vec![PageAction::BlurActiveField];
                actions.extend(self.handle_submit()?);
                actions.push(PageAction::PreventDefault);
                Ok(actions)
            },
            KeyClass::Other => Ok(vec![]),
        }
    }

    /// Handle submit: validate, then derive and send, or mark what's missing.
    fn handle_submit(&mut self) -> Result<Vec<PageAction<S>>, FormError> {
        let length = validate_length(&self.state.length);
        let domain = self.normalize_domain(&self.state.domain);

        // Validated values go back into the form.
        self.set_field(Field::Domain, domain);
        self.set_field(Field::Length, length.to_string());

        let password_missing = self.state.master_password.is_empty();
        let domain_missing = self.state.domain.is_empty();

        if password_missing || domain_missing {
            self.state.status =
                Status::MissingInput { password: password_missing, domain: domain_missing };
            return Ok(vec![PageAction::Log {
                message: format!(
                    "submit blocked: password missing={password_missing}, domain missing={domain_missing}"
                ),
            }]);
        }

        let case = self.state.case;
        let options = DeriveOptions { length, case };
        let password = self.deriver.derive(&self.state.master_password, &self.state.domain, &options);

        let mut actions = Vec::new();
        actions.extend(self.post(Envelope::Result(password.clone()))?);
        actions.push(PageAction::PersistConfig(PersistedConfig { length, case }));

        self.state.result = Some(password);
        self.state.status = Status::Revealed { masked: true };

        tracing::debug!(length, case = case.as_str(), "password generated");
        Ok(actions)
    }

    /// Unmask a generated password.
    fn handle_reveal(&mut self) {
        if let Status::Revealed { masked: true } = self.state.status {
            self.state.status = Status::Revealed { masked: false };
        }
    }

    /// Step the length by one, staying inside the valid range.
    fn handle_adjust_length(&mut self, step: Step) -> Vec<PageAction<S>> {
        let current = validate_length(&self.state.length);
        let adjusted = clamp_length(i64::from(current) + step.delta());

        self.set_field(Field::Length, adjusted.to_string());
        vec![PageAction::PreventDefault]
    }

    /// Handle a message from the bookmarklet.
    fn handle_message(&mut self, event: InboundEvent<S>) -> Result<Vec<PageAction<S>>, FormError> {
        let message = match self.channel.on_message(event) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(error = %e, "dropping inbound message");
                return Ok(vec![PageAction::Log { message: format!("dropped inbound message: {e}") }]);
            },
        };

        let ignored = message.fields.len() - message.known().count();
        if ignored > 0 {
            tracing::trace!(ignored, "ignoring unknown inbound keys");
        }

        let mut actions = Vec::new();
        for field in message.known() {
            if let InboundField::Version(version) = field
                && field.is_stale_version()
            {
                tracing::debug!(version, "stale bookmarklet, fetching update");
                actions.push(PageAction::FetchUpdate { path: UPDATE_ASSET_PATH });
            }
        }

        // The sender's origin doubles as the domain to generate for.
        let origin =
            self.channel.endpoint().map(|endpoint| endpoint.origin().to_string()).unwrap_or_default();
        let domain = self.deriver.hostname(&origin);
        self.set_field(Field::Domain, domain);

        actions.extend(self.post_height()?);
        Ok(actions)
    }

    /// Show the update notice and report the new height.
    fn handle_update_fetched(&mut self, body: String) -> Result<Vec<PageAction<S>>, FormError> {
        self.update_link = Some(body);
        Ok(self.post_height()?.into_iter().collect())
    }

    fn normalize_domain(&self, raw: &str) -> String {
        let compact = raw.replace(' ', "");
        if compact.is_empty() { compact } else { self.deriver.hostname(&compact) }
    }

    fn post_height(&self) -> Result<Option<PageAction<S>>, FormError> {
        self.post(Envelope::Height(self.env.content_height()))
    }

    fn post(&self, envelope: Envelope) -> Result<Option<PageAction<S>>, FormError> {
        Ok(self.channel.send(envelope)?.map(PageAction::Post))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use genpass_proto::Origin;

    use super::*;

    #[derive(Debug, Clone, Copy)]
    struct TestEnv;

    impl Environment for TestEnv {
        fn content_height(&self) -> u32 {
            480
        }
    }

    /// Deterministic stand-in that makes its inputs visible.
    struct EchoDeriver;

    impl DerivationService for EchoDeriver {
        fn derive(&self, master_password: &str, domain: &str, options: &DeriveOptions) -> String {
            format!("{master_password}@{domain}#{}{}", options.length, options.case.as_str())
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct TestSource(u8);

    impl MessageSource for TestSource {
        fn post_message(&self, _data: &str, _target_origin: &Origin) {}
    }

    type Controller = FormController<TestEnv, EchoDeriver, TestSource>;

    fn controller() -> Controller {
        FormController::new(TestEnv, EchoDeriver, PersistedConfig::default())
    }

    fn input(field: Field, value: &str) -> PageEvent<TestSource> {
        PageEvent::Input { field, value: value.to_string() }
    }

    fn message(id: u8, origin: &str, data: &str) -> PageEvent<TestSource> {
        PageEvent::MessageReceived(InboundEvent {
            source: TestSource(id),
            origin: origin.to_string(),
            data: data.to_string(),
        })
    }

    fn posts(actions: &[PageAction<TestSource>]) -> Vec<(u8, String, String)> {
        actions
            .iter()
            .filter_map(PageAction::as_post)
            .map(|post| {
                (post.endpoint.source().0, post.endpoint.origin().to_string(), post.data.clone())
            })
            .collect()
    }

    #[test]
    fn seeded_from_config() {
        let config = PersistedConfig { length: 14, case: PasswordCase::Uppercase };
        let form: Controller = FormController::new(TestEnv, EchoDeriver, config);

        assert_eq!(form.state().length(), "14");
        assert_eq!(form.state().case(), PasswordCase::Uppercase);
        assert_eq!(form.state().status(), Status::Idle);
    }

    #[test]
    fn loaded_seeds_settings_and_labels() {
        let mut form = controller();
        form.handle(input(Field::MasterPassword, "secret")).unwrap();
        form.handle(input(Field::Domain, "example.com")).unwrap();
        form.handle(PageEvent::Submit).unwrap();

        let config = PersistedConfig { length: 40, case: PasswordCase::Mixed };
        let actions = form
            .handle(PageEvent::Loaded { config, language: Language::from_code("es") })
            .unwrap();

        assert!(actions.is_empty());
        assert_eq!(form.state().length(), "32");
        assert_eq!(form.state().case(), PasswordCase::Mixed);
        assert_eq!(form.state().status(), Status::Idle);
        assert_eq!(form.state().domain(), "example.com");
        assert_eq!(form.view().labels, Language::Es.labels());

        form.handle(PageEvent::Loaded { config, language: None }).unwrap();
        assert_eq!(form.view().labels, Labels::default());
    }

    #[test]
    fn missing_password_only() {
        let mut form = controller();
        form.handle(input(Field::Domain, "example.com")).unwrap();

        let actions = form.handle(PageEvent::Submit).unwrap();

        assert_eq!(form.state().status(), Status::MissingInput { password: true, domain: false });
        assert!(posts(&actions).is_empty());
        assert!(!actions.iter().any(|a| matches!(a, PageAction::PersistConfig(_))));
    }

    #[test]
    fn missing_both() {
        let mut form = controller();
        form.handle(input(Field::Domain, "   ")).unwrap();
        form.handle(PageEvent::Submit).unwrap();

        assert_eq!(form.state().status(), Status::MissingInput { password: true, domain: true });
        let view = form.view();
        assert!(view.password_missing && view.domain_missing);
    }

    #[test]
    fn input_clears_missing_markers() {
        let mut form = controller();
        form.handle(PageEvent::Submit).unwrap();
        form.handle(input(Field::MasterPassword, "s")).unwrap();

        assert_eq!(form.state().status(), Status::Idle);
    }

    #[test]
    fn submit_validates_and_normalizes() {
        let mut form = controller();
        form.handle(message(1, "https://bookmarklet.example", "{}")).unwrap();
        form.handle(input(Field::MasterPassword, "secret")).unwrap();
        form.handle(input(Field::Domain, "https://Example.COM/")).unwrap();
        form.handle(input(Field::Length, "200")).unwrap();

        let actions = form.handle(PageEvent::Submit).unwrap();

        assert_eq!(form.state().length(), "32");
        assert_eq!(form.state().domain(), "example.com");
        assert_eq!(
            posts(&actions),
            vec![(
                1,
                "https://bookmarklet.example".to_string(),
                r#"{"result":"secret@example.com#32lowercase"}"#.to_string()
            )]
        );
        assert!(actions.contains(&PageAction::PersistConfig(PersistedConfig {
            length: 32,
            case: PasswordCase::Lowercase
        })));
        assert_eq!(form.state().status(), Status::Revealed { masked: true });
    }

    #[test]
    fn submit_without_bookmarklet_still_generates() {
        let mut form = controller();
        form.handle(input(Field::MasterPassword, "secret")).unwrap();
        form.handle(input(Field::Domain, "example.com")).unwrap();

        let actions = form.handle(PageEvent::Submit).unwrap();

        assert!(posts(&actions).is_empty());
        assert_eq!(form.state().result(), Some("secret@example.com#8lowercase"));
        assert!(matches!(actions.last(), Some(PageAction::PersistConfig(_))));
    }

    #[test]
    fn domain_spaces_removed_before_hostname() {
        let mut form = controller();
        form.handle(input(Field::MasterPassword, "secret")).unwrap();
        form.handle(input(Field::Domain, " mail. exam ple.com ")).unwrap();
        form.handle(PageEvent::Submit).unwrap();

        assert_eq!(form.state().domain(), "example.com");
    }

    #[test]
    fn reveal_unmasks_until_next_input() {
        let mut form = controller();
        form.handle(input(Field::MasterPassword, "secret")).unwrap();
        form.handle(input(Field::Domain, "example.com")).unwrap();
        form.handle(PageEvent::Submit).unwrap();

        assert!(form.view().mask_visible);
        assert_eq!(form.view().output, None);

        form.handle(PageEvent::Reveal).unwrap();
        assert_eq!(form.state().status(), Status::Revealed { masked: false });
        assert_eq!(form.view().output.as_deref(), Some("secret@example.com#8lowercase"));

        form.handle(PageEvent::KeyDown { code: 65 }).unwrap();
        assert_eq!(form.state().status(), Status::Idle);
        assert_eq!(form.state().result(), None);
        assert!(form.view().generate_visible);
    }

    #[test]
    fn reveal_without_result_is_noop() {
        let mut form = controller();
        form.handle(PageEvent::Reveal).unwrap();
        assert_eq!(form.state().status(), Status::Idle);
    }

    #[test]
    fn navigation_keys_keep_result() {
        let mut form = controller();
        form.handle(input(Field::MasterPassword, "secret")).unwrap();
        form.handle(input(Field::Domain, "example.com")).unwrap();
        form.handle(PageEvent::Submit).unwrap();

        form.handle(PageEvent::KeyDown { code: 9 }).unwrap();
        assert_eq!(form.state().status(), Status::Revealed { masked: true });
    }

    #[test]
    fn enter_blurs_and_submits() {
        let mut form = controller();
        form.handle(input(Field::MasterPassword, "secret")).unwrap();
        form.handle(input(Field::Domain, "example.com")).unwrap();

        let actions = form.handle(PageEvent::KeyDown { code: 13 }).unwrap();

        assert_eq!(actions.first(), Some(&PageAction::BlurActiveField));
        assert_eq!(actions.last(), Some(&PageAction::PreventDefault));
        assert_eq!(form.state().status(), Status::Revealed { masked: true });
    }

    #[test]
    fn adjust_length_clamps_at_bounds() {
        let mut form = controller();

        form.handle(input(Field::Length, "32")).unwrap();
        form.handle(PageEvent::AdjustLength(Step::Up)).unwrap();
        assert_eq!(form.state().length(), "32");

        form.handle(input(Field::Length, "4")).unwrap();
        form.handle(PageEvent::AdjustLength(Step::Down)).unwrap();
        assert_eq!(form.state().length(), "4");

        form.handle(input(Field::Length, "nonsense")).unwrap();
        form.handle(PageEvent::AdjustLength(Step::Up)).unwrap();
        assert_eq!(form.state().length(), "9");
    }

    #[test]
    fn case_selection_feeds_derivation() {
        let mut form = controller();
        form.handle(PageEvent::CaseSelected(Some("mixed".to_string()))).unwrap();
        form.handle(input(Field::MasterPassword, "secret")).unwrap();
        form.handle(input(Field::Domain, "example.com")).unwrap();

        let actions = form.handle(PageEvent::Submit).unwrap();
        assert!(actions.contains(&PageAction::PersistConfig(PersistedConfig {
            length: 8,
            case: PasswordCase::Mixed
        })));

        form.handle(PageEvent::CaseSelected(None)).unwrap();
        assert_eq!(form.state().case(), PasswordCase::Lowercase);
    }

    #[test]
    fn message_populates_domain_and_reports_height() {
        let mut form = controller();

        let actions = form.handle(message(3, "https://login.shop.example.co.uk", "{}")).unwrap();

        assert_eq!(form.state().domain(), "example.co.uk");
        assert_eq!(
            posts(&actions),
            vec![(
                3,
                "https://login.shop.example.co.uk".to_string(),
                r#"{"height":480}"#.to_string()
            )]
        );
    }

    #[test]
    fn stale_version_requests_one_fetch() {
        let mut form = controller();

        let actions = form.handle(message(1, "https://a.example", r#"{"version":1}"#)).unwrap();

        let fetches: Vec<_> =
            actions.iter().filter(|a| matches!(a, PageAction::FetchUpdate { .. })).collect();
        assert_eq!(fetches, vec![&PageAction::FetchUpdate { path: UPDATE_ASSET_PATH }]);
    }

    #[test]
    fn unknown_keys_do_not_block_version_check() {
        let mut form = controller();

        let actions = form
            .handle(message(1, "https://a.example", r#"{"theme":"dark","version":null,"x":[1]}"#))
            .unwrap();

        let fetches = actions.iter().filter(|a| matches!(a, PageAction::FetchUpdate { .. })).count();
        assert_eq!(fetches, 1);
        assert_eq!(posts(&actions).len(), 1);
    }

    #[test]
    fn current_version_requests_nothing() {
        let mut form = controller();

        let actions =
            form.handle(message(1, "https://a.example", r#"{"version":20140531}"#)).unwrap();

        assert!(!actions.iter().any(|a| matches!(a, PageAction::FetchUpdate { .. })));
        assert_eq!(posts(&actions).len(), 1);
    }

    #[test]
    fn update_fetched_shows_notice_and_posts_height() {
        let mut form = controller();
        form.handle(message(1, "https://a.example", r#"{"version":1}"#)).unwrap();

        let actions =
            form.handle(PageEvent::UpdateFetched { body: "javascript:void(0)".to_string() }).unwrap();

        assert_eq!(form.view().update_link.as_deref(), Some("javascript:void(0)"));
        assert_eq!(posts(&actions).len(), 1);
        assert_eq!(posts(&actions)[0].2, r#"{"height":480}"#);
    }

    #[test]
    fn update_fetch_failure_is_silent() {
        let mut form = controller();
        let actions =
            form.handle(PageEvent::UpdateFetchFailed { reason: "404".to_string() }).unwrap();

        assert!(actions.is_empty());
        assert_eq!(form.view().update_link, None);
    }

    #[test]
    fn malformed_message_sends_nothing() {
        let mut form = controller();
        form.handle(input(Field::Domain, "keep.example")).unwrap();

        let actions = form.handle(message(1, "https://a.example", "{{{")).unwrap();

        assert!(posts(&actions).is_empty());
        assert_eq!(form.state().domain(), "keep.example");
    }

    #[test]
    fn message_resets_revealed_result() {
        let mut form = controller();
        form.handle(input(Field::MasterPassword, "secret")).unwrap();
        form.handle(input(Field::Domain, "example.com")).unwrap();
        form.handle(PageEvent::Submit).unwrap();

        form.handle(message(1, "https://other.example", "{}")).unwrap();

        assert_eq!(form.state().status(), Status::Idle);
        assert_eq!(form.state().domain(), "other.example");
    }

    #[test]
    fn result_goes_to_latest_sender() {
        let mut form = controller();
        form.handle(message(1, "https://one.example", "{}")).unwrap();
        form.handle(message(2, "https://two.example", "{}")).unwrap();
        form.handle(input(Field::MasterPassword, "secret")).unwrap();

        let actions = form.handle(PageEvent::Submit).unwrap();

        let sent = posts(&actions);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, 2);
        assert_eq!(sent[0].1, "https://two.example");
    }

    #[test]
    fn language_changes_labels() {
        let form = controller().with_language(Language::from_query("?fr"));
        assert_eq!(form.view().labels.generate, "Soumettre");

        let form = controller().with_language(Language::from_query("?xx"));
        assert_eq!(form.view().labels.generate, "Generate");
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut form = controller();
        form.handle(input(Field::MasterPassword, "topsecret")).unwrap();
        form.handle(input(Field::Domain, "example.com")).unwrap();
        form.handle(PageEvent::Submit).unwrap();
        form.handle(PageEvent::Reveal).unwrap();

        let rendered = format!("{:?} {:?}", form.state(), form.view());
        assert!(!rendered.contains("topsecret"));
    }
}
