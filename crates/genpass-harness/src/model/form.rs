//! Model page.
//!
//! Tracks form values, who the page talks to and how many envelopes each
//! context received. Password derivation and hostname reduction are not
//! modeled: a result post is counted, not computed, and domains are reduced
//! with the same pure `hostname` function the page uses.

use genpass_core::{PasswordCase, PersistedConfig, Status, hostname::hostname};

use super::operation::{CASE_NAMES, ContextId, Operation, PayloadChoice};

/// Length used when the field holds no number.
const DEFAULT: i64 = 8;
const MIN: i64 = 4;
const MAX: i64 = 32;

/// Observable state for oracle comparison.
///
/// This is the subset of page state that can be compared against the
/// simulated page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservableState {
    /// Domain field content.
    pub domain: String,
    /// Length field content.
    pub length: String,
    /// Selected case.
    pub case: PasswordCase,
    /// Form status.
    pub status: Status,
    /// Context replies go to.
    pub bound: Option<ContextId>,
    /// Per-context `(result, height)` envelope counts.
    pub deliveries: Vec<(usize, usize)>,
    /// Stored settings, if any were written.
    pub persisted: Option<PersistedConfig>,
    /// Update fetches not yet completed.
    pub pending_fetches: usize,
    /// Update notice shown.
    pub update_link: bool,
}

/// Model page - the reference implementation.
#[derive(Debug, Clone)]
pub struct ModelForm {
    origins: Vec<&'static str>,
    master_password: String,
    domain: String,
    length: String,
    case: PasswordCase,
    status: Status,
    bound: Option<ContextId>,
    deliveries: Vec<(usize, usize)>,
    persisted: Option<PersistedConfig>,
    pending_fetches: usize,
    update_link: bool,
}

impl ModelForm {
    /// Create a model of a freshly loaded page with empty storage.
    pub fn new(origins: &[&'static str]) -> Self {
        Self {
            origins: origins.to_vec(),
            master_password: String::new(),
            domain: String::new(),
            length: DEFAULT.to_string(),
            case: PasswordCase::Lowercase,
            status: Status::Idle,
            bound: None,
            deliveries: vec![(0, 0); origins.len()],
            persisted: None,
            pending_fetches: 0,
            update_link: false,
        }
    }

    /// Apply an operation.
    pub fn apply(&mut self, op: &Operation) {
        match op {
            Operation::Type { field, text } => {
                let text = text.to_text();
                match field {
                    super::FieldChoice::MasterPassword => self.master_password = text,
                    super::FieldChoice::Domain => self.domain = text,
                    super::FieldChoice::Length => self.length = text,
                }
                self.reset();
            },
            Operation::SelectCase { choice } => {
                self.case = match choice.map(|i| CASE_NAMES[usize::from(i) % CASE_NAMES.len()]) {
                    Some("uppercase") => PasswordCase::Uppercase,
                    Some("mixed") => PasswordCase::Mixed,
                    _ => PasswordCase::Lowercase,
                };
                self.reset();
            },
            Operation::KeyDown { code } => match code {
                13 => self.submit(),
                8 | 32 | 46..=90 | 96..=111 | 186..=222 => self.reset(),
                _ => {},
            },
            Operation::Submit => self.submit(),
            Operation::Reveal => {
                if self.status == (Status::Revealed { masked: true }) {
                    self.status = Status::Revealed { masked: false };
                }
            },
            Operation::AdjustLength { up } => {
                let step = if *up { 1 } else { -1 };
                self.length = (validated(&self.length) + step).clamp(MIN, MAX).to_string();
                self.reset();
            },
            Operation::Message { context, payload } => self.message(*context, *payload),
            Operation::CompleteFetches => {
                for _ in 0..self.pending_fetches {
                    self.update_link = true;
                    self.post_height();
                }
                self.pending_fetches = 0;
            },
        }
    }

    /// Extract observable state for comparison.
    pub fn observable_state(&self) -> ObservableState {
        ObservableState {
            domain: self.domain.clone(),
            length: self.length.clone(),
            case: self.case,
            status: self.status,
            bound: self.bound,
            deliveries: self.deliveries.clone(),
            persisted: self.persisted,
            pending_fetches: self.pending_fetches,
            update_link: self.update_link,
        }
    }

    fn reset(&mut self) {
        self.status = Status::Idle;
    }

    fn submit(&mut self) {
        let length = validated(&self.length);
        let compact: String = self.domain.chars().filter(|c| *c != ' ').collect();
        self.domain = if compact.is_empty() { compact } else { hostname(&compact) };
        self.length = length.to_string();

        let password = self.master_password.is_empty();
        let domain = self.domain.is_empty();
        if password || domain {
            self.status = Status::MissingInput { password, domain };
            return;
        }

        if let Some(bound) = self.bound {
            self.deliveries[usize::from(bound)].0 += 1;
        }
        self.persisted = Some(PersistedConfig {
            length: u8::try_from(length).unwrap_or_default(),
            case: self.case,
        });
        self.status = Status::Revealed { masked: true };
    }

    fn message(&mut self, context: ContextId, payload: PayloadChoice) {
        let Some(origin) = self.origins.get(usize::from(context)).copied() else {
            return;
        };
        // An opaque sender can't be replied to, but it still displaces the
        // previous one.
        if origin == "null" {
            self.bound = None;
            return;
        }

        self.bound = Some(context);
        let Some(stale) = payload.decoded_staleness() else {
            return;
        };

        if stale {
            self.pending_fetches += 1;
        }
        self.domain = hostname(origin);
        self.reset();
        self.post_height();
    }

    fn post_height(&mut self) {
        if let Some(bound) = self.bound {
            self.deliveries[usize::from(bound)].1 += 1;
        }
    }
}

/// Length after validation: leading integer clamped, default when absent.
fn validated(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return DEFAULT;
    }

    // Typed text is short, but saturate anyway.
    let value = digits.parse::<i64>().unwrap_or(i64::MAX);
    (sign * value).clamp(MIN, MAX)
}
