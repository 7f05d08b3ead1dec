//! Message origins.
//!
//! An origin is both the reply address and the security boundary of the
//! channel: a derived password must only ever be posted to the origin that
//! last contacted the page. [`Origin`] therefore cannot represent the `*`
//! wildcard or the opaque `null` origin.

use std::fmt;

use crate::errors::ProtoError;

/// Serialized URL origin, `scheme://host[:port]`, lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin(String);

impl Origin {
    /// Validate an origin string as delivered by a message event.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoError::InvalidOrigin`] for wildcards, opaque origins,
    /// missing scheme or host, non-numeric ports, and anything with a path.
    pub fn parse(raw: &str) -> Result<Self, ProtoError> {
        let invalid = |reason| ProtoError::InvalidOrigin { origin: raw.to_string(), reason };

        let trimmed = raw.trim();
        match trimmed {
            "" => return Err(invalid("empty")),
            "*" => return Err(invalid("wildcard")),
            "null" => return Err(invalid("opaque origin")),
            _ => {},
        }

        let (scheme, rest) = trimmed.split_once("://").ok_or_else(|| invalid("missing scheme"))?;

        let scheme_ok = scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
            && scheme.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if !scheme_ok {
            return Err(invalid("bad scheme"));
        }

        if rest.contains(['/', '?', '#', '@']) {
            return Err(invalid("origin must not carry a path or credentials"));
        }

        let (host, port) = match rest.rsplit_once(':') {
            // Bare IPv6 literal without a port.
            Some((host, _)) if !host.ends_with(']') && host.contains(':') => (rest, None),
            Some((host, port)) => (host, Some(port)),
            None => (rest, None),
        };

        if host.is_empty() {
            return Err(invalid("missing host"));
        }
        if let Some(port) = port {
            if port.is_empty() || !port.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid("bad port"));
            }
        }

        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// The serialized origin.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Origin {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_origins() {
        assert_eq!(Origin::parse("https://example.com").unwrap().as_str(), "https://example.com");
        assert_eq!(
            Origin::parse("http://localhost:8080").unwrap().as_str(),
            "http://localhost:8080"
        );
    }

    #[test]
    fn lowercases() {
        assert_eq!(Origin::parse("HTTPS://Example.COM").unwrap().as_str(), "https://example.com");
    }

    #[test]
    fn rejects_wildcard_and_opaque() {
        assert!(matches!(
            Origin::parse("*"),
            Err(ProtoError::InvalidOrigin { reason: "wildcard", .. })
        ));
        assert!(matches!(
            Origin::parse("null"),
            Err(ProtoError::InvalidOrigin { reason: "opaque origin", .. })
        ));
        assert!(Origin::parse("").is_err());
    }

    #[test]
    fn rejects_paths_and_missing_parts() {
        assert!(Origin::parse("https://example.com/login").is_err());
        assert!(Origin::parse("example.com").is_err());
        assert!(Origin::parse("https://").is_err());
        assert!(Origin::parse("https://example.com:").is_err());
        assert!(Origin::parse("https://example.com:http").is_err());
        assert!(Origin::parse("https://user@example.com").is_err());
        assert!(Origin::parse("1http://example.com").is_err());
    }

    #[test]
    fn accepts_ipv6_hosts() {
        assert!(Origin::parse("http://[::1]:3000").is_ok());
        assert!(Origin::parse("http://[::1]").is_ok());
    }
}
