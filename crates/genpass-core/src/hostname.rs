//! Hostname extraction.
//!
//! Reduces whatever the user typed (or a message origin) to the registrable
//! domain the password is derived for, so `https://mail.example.com/inbox`
//! and `example.com` yield the same password.

use std::net::Ipv4Addr;

/// Second-level labels that act as public suffixes under a country TLD
/// (`bbc.co.uk`, `example.com.au`).
const GENERIC_SECOND_LEVEL: &[&str] =
    &["ac", "co", "com", "edu", "go", "gov", "ne", "net", "or", "org"];

/// Extract the registrable hostname from a URL, origin or bare host.
///
/// ```
/// use genpass_core::hostname::hostname;
///
/// assert_eq!(hostname("https://Sub.Example.com/path"), "example.com");
/// assert_eq!(hostname("news.bbc.co.uk"), "bbc.co.uk");
/// assert_eq!(hostname("http://192.168.1.10:8080/"), "192.168.1.10");
/// ```
pub fn hostname(raw: &str) -> String {
    let lowered = raw.trim().to_ascii_lowercase();

    let without_scheme = lowered.split_once("://").map_or(lowered.as_str(), |(_, rest)| rest);
    let authority = without_scheme.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    let host = strip_port(host_port).trim_end_matches('.');

    if host.is_empty() || host.starts_with('[') || host.parse::<Ipv4Addr>().is_ok() {
        return host.to_string();
    }

    let labels: Vec<&str> = host.split('.').filter(|label| !label.is_empty()).collect();
    let n = labels.len();
    let keep = if n >= 3
        && labels[n - 1].len() == 2
        && GENERIC_SECOND_LEVEL.contains(&labels[n - 2])
    {
        3
    } else {
        2
    };

    labels[n.saturating_sub(keep)..].join(".")
}

fn strip_port(host_port: &str) -> &str {
    if host_port.starts_with('[') {
        return host_port.find(']').map_or(host_port, |end| &host_port[..=end]);
    }
    host_port.split(':').next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scheme_path_and_subdomains() {
        assert_eq!(hostname("https://Example.COM/"), "example.com");
        assert_eq!(hostname("https://www.example.com/a/b?c=d#e"), "example.com");
        assert_eq!(hostname("example.com"), "example.com");
    }

    #[test]
    fn strips_port_and_credentials() {
        assert_eq!(hostname("https://user:pw@login.example.org:8443/"), "example.org");
    }

    #[test]
    fn keeps_country_second_level() {
        assert_eq!(hostname("https://www.amazon.co.jp"), "amazon.co.jp");
        assert_eq!(hostname("shop.example.com.au"), "example.com.au");
        assert_eq!(hostname("co.uk"), "co.uk");
    }

    #[test]
    fn long_tld_is_not_country_suffix() {
        assert_eq!(hostname("a.b.co.example"), "co.example");
    }

    #[test]
    fn addresses_and_single_labels_pass_through() {
        assert_eq!(hostname("10.0.0.1"), "10.0.0.1");
        assert_eq!(hostname("http://localhost:3000"), "localhost");
        assert_eq!(hostname("http://[::1]:3000/"), "[::1]");
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(hostname(""), "");
        assert_eq!(hostname("https://"), "");
    }
}
