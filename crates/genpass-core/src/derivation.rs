//! Password derivation.
//!
//! The form only depends on [`DerivationService`]. [`GenPass`] is the default
//! implementation: SuperGenPass-style iterated hashing of
//! `"{master}:{domain}"`.
//!
//! # Invariants
//!
//! - Determinism: identical master password, domain and options always
//!   produce the identical password. Nothing here reads time, randomness or
//!   state.
//! - Output length: at most `options.length` characters, and exactly that
//!   many whenever the digest is long enough (MD5 yields 24 characters).

use base64::{Engine, engine::general_purpose::STANDARD};
use md5::Md5;
use sha2::{Digest, Sha512};

use crate::validator::PasswordCase;

/// Minimum number of hash rounds before a candidate may be accepted.
const MIN_ROUNDS: u32 = 10;

/// Formatting options for a derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeriveOptions {
    /// Requested password length.
    pub length: u8,
    /// Letter case applied to the result.
    pub case: PasswordCase,
}

/// Derives site passwords.
///
/// Callers guarantee that `master_password` and `domain` are non-empty and
/// that `domain` went through [`hostname`](Self::hostname) first.
pub trait DerivationService {
    /// Derive the password for `domain`.
    fn derive(&self, master_password: &str, domain: &str, options: &DeriveOptions) -> String;

    /// Normalize a URL, origin or host to the domain passwords are keyed on.
    fn hostname(&self, raw: &str) -> String {
        crate::hostname::hostname(raw)
    }
}

impl<D: DerivationService + ?Sized> DerivationService for &D {
    fn derive(&self, master_password: &str, domain: &str, options: &DeriveOptions) -> String {
        (**self).derive(master_password, domain, options)
    }

    fn hostname(&self, raw: &str) -> String {
        (**self).hostname(raw)
    }
}

/// Digest used by [`GenPass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    /// MD5, compatible with classic SuperGenPass. Caps passwords at 24
    /// characters.
    Md5,
    /// SHA-512. Long enough for every supported length.
    #[default]
    Sha512,
}

impl HashAlgorithm {
    fn round(self, input: &str) -> String {
        let encoded = match self {
            Self::Md5 => STANDARD.encode(Md5::digest(input.as_bytes())),
            Self::Sha512 => STANDARD.encode(Sha512::digest(input.as_bytes())),
        };

        encoded
            .chars()
            .map(|c| match c {
                '+' => '9',
                '/' => '8',
                '=' => 'A',
                other => other,
            })
            .collect()
    }
}

/// Default derivation: iterated hashing until the candidate is acceptable.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenPass {
    algorithm: HashAlgorithm,
}

impl GenPass {
    /// Create a deriver using the given digest.
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Digest in use.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }
}

impl DerivationService for GenPass {
    fn derive(&self, master_password: &str, domain: &str, options: &DeriveOptions) -> String {
        let length = usize::from(options.length);
        let mut candidate = format!("{master_password}:{domain}");
        let mut rounds = 0;

        loop {
            candidate = self.algorithm.round(&candidate);
            rounds += 1;

            if rounds >= MIN_ROUNDS && acceptable(prefix(&candidate, length)) {
                break;
            }
        }

        options.case.apply(prefix(&candidate, length))
    }
}

/// Base64 output is ASCII, so byte slicing is char slicing.
fn prefix(candidate: &str, length: usize) -> &str {
    &candidate[..length.min(candidate.len())]
}

/// Starts with a lowercase letter, contains an uppercase letter and a digit.
fn acceptable(password: &str) -> bool {
    password.starts_with(|c: char| c.is_ascii_lowercase())
        && password.contains(|c: char| c.is_ascii_uppercase())
        && password.contains(|c: char| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn options(length: u8, case: PasswordCase) -> DeriveOptions {
        DeriveOptions { length, case }
    }

    #[test]
    fn deterministic() {
        let deriver = GenPass::default();
        let opts = options(16, PasswordCase::Mixed);
        assert_eq!(
            deriver.derive("correct horse", "example.com", &opts),
            deriver.derive("correct horse", "example.com", &opts)
        );
    }

    #[test]
    fn domain_changes_password() {
        let deriver = GenPass::default();
        let opts = options(16, PasswordCase::Mixed);
        assert_ne!(
            deriver.derive("correct horse", "example.com", &opts),
            deriver.derive("correct horse", "example.org", &opts)
        );
    }

    #[test]
    fn mixed_result_is_acceptable() {
        let deriver = GenPass::default();
        for length in 4..=32 {
            let password =
                deriver.derive("master", "example.com", &options(length, PasswordCase::Mixed));
            assert_eq!(password.len(), usize::from(length));
            assert!(acceptable(&password), "{length}: {password}");
        }
    }

    #[test]
    fn default_digest_covers_longest_length() {
        assert_eq!(HashAlgorithm::default(), HashAlgorithm::Sha512);

        let password =
            GenPass::default().derive("master", "example.com", &options(32, PasswordCase::Mixed));
        assert_eq!(password.len(), 32);
    }

    #[test]
    fn md5_caps_at_digest_length() {
        let deriver = GenPass::new(HashAlgorithm::Md5);
        let password = deriver.derive("master", "example.com", &options(32, PasswordCase::Mixed));
        assert_eq!(password.len(), 24);
    }

    #[test]
    fn case_is_applied_after_derivation() {
        let deriver = GenPass::default();
        let mixed = deriver.derive("master", "example.com", &options(12, PasswordCase::Mixed));
        let lower = deriver.derive("master", "example.com", &options(12, PasswordCase::Lowercase));
        let upper = deriver.derive("master", "example.com", &options(12, PasswordCase::Uppercase));

        assert_eq!(lower, mixed.to_lowercase());
        assert_eq!(upper, mixed.to_uppercase());
    }

    #[test]
    fn round_uses_url_friendly_alphabet() {
        for algorithm in [HashAlgorithm::Md5, HashAlgorithm::Sha512] {
            let round = algorithm.round("anything at all");
            assert!(round.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn default_hostname_collaborator() {
        assert_eq!(GenPass::default().hostname("https://a.example.com/x"), "example.com");
    }

    proptest! {
        #[test]
        fn deterministic_for_any_input(
            master in ".{1,24}",
            domain in "[a-z]{1,12}\\.com",
            length in 4u8..=32,
        ) {
            let deriver = GenPass::default();
            let opts = options(length, PasswordCase::Mixed);
            let first = deriver.derive(&master, &domain, &opts);
            prop_assert_eq!(&first, &deriver.derive(&master, &domain, &opts));
            prop_assert_eq!(first.len(), usize::from(length));
        }
    }
}
